// Panel Service - owns the current snapshot and carries out timer effects

pub mod command;

#[cfg(test)]
mod panel_service_test;

pub use command::PanelCommand;

use crate::application::constants::{CONNECT_DELAY, CONSUME_INTERVAL};
use crate::domain::{Effect, PanelState, TimerId, Transition};
use crate::error::Result;
use crate::port::{TimeProvider, TimerScheduler, TokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Delays of the simulated broker actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTimings {
    pub connect_delay: Duration,
    pub consume_interval: Duration,
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self {
            connect_delay: CONNECT_DELAY,
            consume_interval: CONSUME_INTERVAL,
        }
    }
}

/// Panel Service
///
/// Single owner of the panel state. Every action goes through a pure
/// transition on `PanelState`; the service then swaps in the new snapshot
/// and forwards the resulting timer effects to the scheduler.
pub struct PanelService {
    state: PanelState,
    timings: LifecycleTimings,
    time_provider: Arc<dyn TimeProvider>,
    token_provider: Arc<dyn TokenProvider>,
    scheduler: Arc<dyn TimerScheduler>,
    next_timer: TimerId,
}

impl PanelService {
    pub fn new(
        timings: LifecycleTimings,
        time_provider: Arc<dyn TimeProvider>,
        token_provider: Arc<dyn TokenProvider>,
        scheduler: Arc<dyn TimerScheduler>,
    ) -> Self {
        Self {
            state: PanelState::new(),
            timings,
            time_provider,
            token_provider,
            scheduler,
            next_timer: 1,
        }
    }

    /// Current snapshot
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn timings(&self) -> LifecycleTimings {
        self.timings
    }

    /// Dispatch a user command
    pub fn handle(&mut self, command: PanelCommand) -> Result<()> {
        debug!(command = command.name(), state = %self.state.connection, "Handling command");
        match command {
            PanelCommand::Connect => self.connect(),
            PanelCommand::Disconnect => self.disconnect(),
            PanelCommand::StartConsume => self.start_consume(),
            PanelCommand::StopConsume => self.stop_consume(),
            PanelCommand::Reset => {
                self.reset();
                Ok(())
            }
            PanelCommand::EditField { field, value } => {
                let transition = self.state.edit_field(field, value)?;
                self.commit(transition);
                Ok(())
            }
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        let timer = self.allocate_timer();
        let at = self.time_provider.wall_clock();
        let transition = self.state.connect(timer, self.timings.connect_delay, &at)?;
        info!(
            endpoint = %self.state.config.endpoint(),
            timer,
            "Simulated connect started"
        );
        self.commit(transition);
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<()> {
        let at = self.time_provider.wall_clock();
        let transition = self.state.disconnect(&at)?;
        info!(from = %self.state.connection, "Disconnected");
        self.commit(transition);
        Ok(())
    }

    pub fn start_consume(&mut self) -> Result<()> {
        let timer = self.allocate_timer();
        let at = self.time_provider.wall_clock();
        let transition =
            self.state
                .start_consume(timer, self.timings.consume_interval, &at)?;
        info!(queue = %self.state.config.queue, timer, "Simulated consumption started");
        self.commit(transition);
        Ok(())
    }

    pub fn stop_consume(&mut self) -> Result<()> {
        let at = self.time_provider.wall_clock();
        let transition = self.state.stop_consume(&at)?;
        info!(
            messages_received = self.state.messages_received,
            "Simulated consumption stopped"
        );
        self.commit(transition);
        Ok(())
    }

    /// Reset never fails: it is valid from every state
    pub fn reset(&mut self) {
        let at = self.time_provider.wall_clock();
        let transition = self.state.reset(&at);
        info!(from = %self.state.connection, "Panel reset to defaults");
        self.commit(transition);
    }

    /// A scheduled timer fired; stale ids leave the state untouched
    pub fn on_timer(&mut self, id: TimerId) {
        let at = self.time_provider.wall_clock();
        let transition = if self.state.pending_connect == Some(id) {
            self.state.connect_elapsed(id, &at)
        } else if self.state.consume_timer == Some(id) {
            let token = self.token_provider.generate_token();
            self.state.consume_tick(id, &token, &at)
        } else {
            debug!(timer = id, "Ignoring stale timer");
            return;
        };

        let before = self.state.connection;
        self.commit(transition);
        if before != self.state.connection {
            match self.state.log.latest() {
                Some(entry) => info!(
                    state = %self.state.connection,
                    severity = %entry.severity,
                    "{}",
                    entry.message
                ),
                None => info!(state = %self.state.connection, "Connect attempt resolved"),
            }
        }
    }

    /// Cancel every live timer; the service must not be driven afterwards
    pub fn teardown(&mut self) {
        let transition = self.state.release_timers();
        if !transition.effects.is_empty() {
            info!(timers = transition.effects.len(), "Cancelling live timers on teardown");
        }
        self.commit(transition);
    }

    fn allocate_timer(&mut self) -> TimerId {
        let id = self.next_timer;
        self.next_timer += 1;
        id
    }

    fn commit(&mut self, transition: Transition) {
        let Transition { state, effects } = transition;
        self.state = state;
        for effect in effects {
            match effect {
                Effect::ScheduleOnce { id, delay } => self.scheduler.schedule_once(id, delay),
                Effect::ScheduleRepeating { id, period } => {
                    self.scheduler.schedule_repeating(id, period)
                }
                Effect::Cancel(id) => self.scheduler.cancel(id),
            }
        }
    }
}

impl Drop for PanelService {
    fn drop(&mut self) {
        self.teardown();
    }
}
