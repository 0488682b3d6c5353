// Queue Console Core - Domain Logic & Ports
// NO terminal or OS dependencies (hexagonal layout)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
