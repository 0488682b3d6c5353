// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid panel state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Connection settings are locked while {0}")]
    ConfigLocked(String),

    #[error("Unknown connection field: {0}")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
