// Domain Layer - Pure panel state and transition functions

pub mod connection;
pub mod error;
pub mod feed;
pub mod lifecycle;
pub mod panel;

// Re-exports
pub use connection::{ConfigField, ConnectionConfig};
pub use error::DomainError;
pub use feed::{BoundedFeed, LogEntry, Message, Severity};
pub use lifecycle::{ConnectionState, ConsumptionState};
pub use panel::{Controls, Effect, PanelState, TimerId, Transition};
