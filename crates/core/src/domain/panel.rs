//! Panel state snapshot and its transition functions.
//!
//! `PanelState` is never mutated in place by callers: every lifecycle action
//! is a function from the current snapshot to a [`Transition`], which carries
//! the next snapshot plus the timer effects the caller must carry out.
//! Timers are identified by [`TimerId`]; the snapshot remembers which id it
//! expects for the pending connect and for the running consume loop, so a
//! firing with any other id is stale and leaves the state untouched.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::connection::{ConfigField, ConnectionConfig};
use crate::domain::error::{DomainError, Result};
use crate::domain::feed::{BoundedFeed, LogEntry, Message, Severity};
use crate::domain::lifecycle::{ConnectionState, ConsumptionState};

/// Maximum number of messages kept in the feed
pub const MAX_MESSAGES: usize = 50;

/// Maximum number of entries kept in the activity log
pub const MAX_LOG_ENTRIES: usize = 100;

/// Timer identifier (allocated by the caller, unique per panel)
pub type TimerId = u64;

/// Timer command emitted by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleOnce { id: TimerId, delay: Duration },
    ScheduleRepeating { id: TimerId, period: Duration },
    Cancel(TimerId),
}

/// Result of applying one action to a snapshot
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: PanelState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(state: PanelState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    fn unchanged(state: &PanelState) -> Self {
        Self::new(state.clone(), Vec::new())
    }
}

/// Which controls of the panel are currently enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub connect: bool,
    pub disconnect: bool,
    pub start_consume: bool,
    pub stop_consume: bool,
    pub reset: bool,
    pub edit_config: bool,
}

/// Complete observable state of the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    pub config: ConnectionConfig,
    pub connection: ConnectionState,
    pub consumption: ConsumptionState,
    pub messages: BoundedFeed<Message>,
    pub log: BoundedFeed<LogEntry>,
    /// Id of the one-shot timer that completes a connect attempt
    pub pending_connect: Option<TimerId>,
    /// Id of the repeating timer producing messages
    pub consume_timer: Option<TimerId>,
    /// Messages produced since the last reset (not capped)
    pub messages_received: u64,
    /// Log entries ever written; never decreases
    pub log_written: u64,
    /// Number of resets so far; never decreases
    pub resets: u64,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            config: ConnectionConfig::default(),
            connection: ConnectionState::Disconnected,
            consumption: ConsumptionState::Idle,
            messages: BoundedFeed::new(MAX_MESSAGES),
            log: BoundedFeed::new(MAX_LOG_ENTRIES),
            pending_connect: None,
            consume_timer: None,
            messages_received: 0,
            log_written: 0,
            resets: 0,
        }
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enabled/disabled projection used by the control surface
    pub fn controls(&self) -> Controls {
        let disconnected = self.connection == ConnectionState::Disconnected;
        let connected = self.connection == ConnectionState::Connected;
        let consuming = self.consumption == ConsumptionState::Consuming;
        Controls {
            connect: disconnected,
            disconnect: !disconnected,
            start_consume: connected && !consuming,
            stop_consume: consuming,
            reset: true,
            edit_config: disconnected,
        }
    }

    /// Disconnected -> Connecting, arming the connect timer
    pub fn connect(&self, timer: TimerId, delay: Duration, at: &str) -> Result<Transition> {
        if self.connection != ConnectionState::Disconnected {
            return Err(self.invalid(ConnectionState::Connecting));
        }
        let mut next = self.clone();
        next.connection = ConnectionState::Connecting;
        next.pending_connect = Some(timer);
        next.append_log(
            at,
            format!("Connecting to {}...", self.config.endpoint()),
            Severity::Info,
        );
        Ok(Transition::new(
            next,
            vec![Effect::ScheduleOnce { id: timer, delay }],
        ))
    }

    /// Completion of the connect delay; validates the settings lazily
    pub fn connect_elapsed(&self, timer: TimerId, at: &str) -> Transition {
        if self.connection != ConnectionState::Connecting || self.pending_connect != Some(timer) {
            return Transition::unchanged(self);
        }
        let mut next = self.clone();
        next.pending_connect = None;
        if self.config.is_complete() {
            next.connection = ConnectionState::Connected;
            next.append_log(
                at,
                format!("Connected to {}", self.config.endpoint()),
                Severity::Success,
            );
        } else {
            next.connection = ConnectionState::Disconnected;
            next.append_log(
                at,
                "Connection failed: missing configuration",
                Severity::Error,
            );
        }
        Transition::new(next, Vec::new())
    }

    /// Connecting|Connected -> Disconnected, cancelling every timer
    pub fn disconnect(&self, at: &str) -> Result<Transition> {
        if self.connection == ConnectionState::Disconnected {
            return Err(self.invalid(ConnectionState::Disconnected));
        }
        let mut next = self.clone();
        let effects = next.release_timers_in_place();
        next.connection = ConnectionState::Disconnected;
        next.consumption = ConsumptionState::Idle;
        next.append_log(at, "Disconnected from broker", Severity::Warning);
        Ok(Transition::new(next, effects))
    }

    /// Connected+Idle -> Consuming, arming the repeating message timer
    pub fn start_consume(&self, timer: TimerId, period: Duration, at: &str) -> Result<Transition> {
        if self.connection != ConnectionState::Connected
            || self.consumption != ConsumptionState::Idle
        {
            return Err(self.invalid_consumption(ConsumptionState::Consuming));
        }
        let mut next = self.clone();
        next.consumption = ConsumptionState::Consuming;
        next.consume_timer = Some(timer);
        next.append_log(
            at,
            format!("Started consuming from queue: {}", self.config.queue),
            Severity::Success,
        );
        Ok(Transition::new(
            next,
            vec![Effect::ScheduleRepeating { id: timer, period }],
        ))
    }

    /// One tick of the consume loop: prepend a synthetic message
    pub fn consume_tick(&self, timer: TimerId, token: &str, at: &str) -> Transition {
        if self.consumption != ConsumptionState::Consuming || self.consume_timer != Some(timer) {
            return Transition::unchanged(self);
        }
        let mut next = self.clone();
        next.messages.push(Message::received(at, token));
        next.messages_received += 1;
        Transition::new(next, Vec::new())
    }

    /// Consuming -> Idle
    pub fn stop_consume(&self, at: &str) -> Result<Transition> {
        if self.consumption != ConsumptionState::Consuming {
            return Err(self.invalid_consumption(ConsumptionState::Idle));
        }
        let mut next = self.clone();
        let effects: Vec<Effect> = next.consume_timer.take().map(Effect::Cancel).into_iter().collect();
        next.consumption = ConsumptionState::Idle;
        next.append_log(at, "Stopped consuming", Severity::Info);
        Ok(Transition::new(next, effects))
    }

    /// Back to a fresh panel from any state; the reset itself is logged
    pub fn reset(&self, at: &str) -> Transition {
        let effects = self.release_timers().effects;
        let mut next = PanelState {
            log_written: self.log_written,
            resets: self.resets + 1,
            ..PanelState::default()
        };
        next.append_log(at, "Configuration reset", Severity::Info);
        Transition::new(next, effects)
    }

    /// Replace one connection field; only allowed while disconnected
    pub fn edit_field(&self, field: ConfigField, value: impl Into<String>) -> Result<Transition> {
        if self.connection != ConnectionState::Disconnected {
            return Err(DomainError::ConfigLocked(self.connection.to_string()));
        }
        let mut next = self.clone();
        next.config = self.config.with_field(field, value);
        Ok(Transition::new(next, Vec::new()))
    }

    /// Drop every live timer without touching the lifecycle (teardown)
    pub fn release_timers(&self) -> Transition {
        let mut next = self.clone();
        let effects = next.release_timers_in_place();
        Transition::new(next, effects)
    }

    fn release_timers_in_place(&mut self) -> Vec<Effect> {
        self.pending_connect
            .take()
            .into_iter()
            .chain(self.consume_timer.take())
            .map(Effect::Cancel)
            .collect()
    }

    fn append_log(&mut self, at: &str, message: impl Into<String>, severity: Severity) {
        self.log.push(LogEntry::new(at, message, severity));
        self.log_written += 1;
    }

    fn invalid(&self, to: ConnectionState) -> DomainError {
        DomainError::InvalidStateTransition {
            from: self.connection.to_string(),
            to: to.to_string(),
        }
    }

    fn invalid_consumption(&self, to: ConsumptionState) -> DomainError {
        DomainError::InvalidStateTransition {
            from: format!("{}/{}", self.connection, self.consumption),
            to: to.to_string(),
        }
    }
}
