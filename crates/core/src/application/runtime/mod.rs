// Panel Runtime - event loop owning the panel service

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::constants::COMMAND_CHANNEL_CAPACITY;
use crate::application::panel_service::{PanelCommand, PanelService};
use crate::domain::{PanelState, TimerId};
use crate::error::Result;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Reply = oneshot::Sender<Result<PanelState>>;

/// Runs a `PanelService` on a single task
///
/// Commands from the control surface and fired timer ids are handled one
/// at a time, so the service is never touched concurrently. After every
/// handled event the new snapshot is published on a watch channel.
pub struct PanelRuntime {
    service: PanelService,
    requests: mpsc::Receiver<(PanelCommand, Reply)>,
    fired: mpsc::UnboundedReceiver<TimerId>,
    snapshots: watch::Sender<PanelState>,
    shutdown: ShutdownToken,
}

impl PanelRuntime {
    /// Spawn the runtime; `fired` must be the receiving end of the channel
    /// the service's scheduler posts timer ids into
    pub fn spawn(
        service: PanelService,
        fired: mpsc::UnboundedReceiver<TimerId>,
    ) -> (PanelHandle, JoinHandle<Result<()>>) {
        let (request_tx, request_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(service.state().clone());
        let (shutdown_tx, shutdown_rx) = shutdown_channel();

        let runtime = Self {
            service,
            requests: request_rx,
            fired,
            snapshots: snapshot_tx,
            shutdown: shutdown_rx,
        };
        let task = tokio::spawn(runtime.run());

        let handle = PanelHandle {
            requests: request_tx,
            snapshots: snapshot_rx,
            shutdown: shutdown_tx,
        };
        (handle, task)
    }

    /// Run until shutdown is signalled or every handle is dropped
    pub async fn run(self) -> Result<()> {
        let Self {
            mut service,
            mut requests,
            mut fired,
            snapshots,
            mut shutdown,
        } = self;

        info!("Panel runtime started");
        loop {
            if shutdown.is_shutdown() {
                break;
            }
            tokio::select! {
                _ = shutdown.wait() => {
                    info!("Panel runtime received shutdown");
                    break;
                }
                request = requests.recv() => {
                    let Some((command, reply)) = request else {
                        info!("All panel handles dropped");
                        break;
                    };
                    let outcome = service.handle(command.clone());
                    if let Err(e) = &outcome {
                        warn!(command = command.name(), error = %e, "Command refused");
                    }
                    snapshots.send_replace(service.state().clone());
                    let _ = reply.send(outcome.map(|_| service.state().clone()));
                }
                Some(id) = fired.recv() => {
                    service.on_timer(id);
                    snapshots.send_replace(service.state().clone());
                }
            }
        }

        service.teardown();
        snapshots.send_replace(service.state().clone());
        debug!("Panel runtime stopped");
        Ok(())
    }
}

/// Client side of a running panel
#[derive(Clone)]
pub struct PanelHandle {
    requests: mpsc::Sender<(PanelCommand, Reply)>,
    snapshots: watch::Receiver<PanelState>,
    shutdown: ShutdownSender,
}

impl PanelHandle {
    /// Send a command and wait for the resulting snapshot
    pub async fn execute(&self, command: PanelCommand) -> Result<PanelState> {
        let (tx, rx) = oneshot::channel();
        self.requests.send((command, tx)).await?;
        rx.await?
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PanelState {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every state change (timer firings included)
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.snapshots.clone()
    }

    /// Ask the runtime to cancel its timers and stop
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    pub fn is_running(&self) -> bool {
        !self.requests.is_closed()
    }
}
