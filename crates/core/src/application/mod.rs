// Application Layer - Use cases driving the panel

pub mod constants;
pub mod panel_service;
pub mod runtime;

// Re-exports
pub use panel_service::{LifecycleTimings, PanelCommand, PanelService};
pub use runtime::{shutdown_channel, PanelHandle, PanelRuntime, ShutdownSender, ShutdownToken};
