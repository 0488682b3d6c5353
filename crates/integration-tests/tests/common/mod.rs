//! Shared wiring: a real panel runtime on tokio timers

#![allow(dead_code)]

use std::sync::Arc;

use queue_console_core::application::{LifecycleTimings, PanelHandle, PanelRuntime, PanelService};
use queue_console_core::port::time_provider::SystemTimeProvider;
use queue_console_core::port::token_provider::mocks::SequentialTokenProvider;
use queue_console_core::Result;
use queue_console_infra_system::TokioTimerScheduler;
use tokio::task::JoinHandle;

pub struct Panel {
    pub handle: PanelHandle,
    pub task: JoinHandle<Result<()>>,
    pub scheduler: Arc<TokioTimerScheduler>,
}

/// Must be called inside a paused tokio runtime
pub fn spawn_panel() -> Panel {
    let (scheduler, fired) = TokioTimerScheduler::new();
    let scheduler = Arc::new(scheduler);
    let service = PanelService::new(
        LifecycleTimings::default(),
        Arc::new(SystemTimeProvider),
        Arc::new(SequentialTokenProvider::new()),
        scheduler.clone(),
    );
    let (handle, task) = PanelRuntime::spawn(service, fired);
    Panel {
        handle,
        task,
        scheduler,
    }
}
