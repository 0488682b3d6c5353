// Port Layer - Interfaces for external dependencies

pub mod time_provider; // For deterministic testing
pub mod timer_scheduler;
pub mod token_provider;

// Re-exports
pub use time_provider::TimeProvider;
pub use timer_scheduler::TimerScheduler;
pub use token_provider::TokenProvider;
