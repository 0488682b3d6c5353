//! Unit tests for the panel service, driven by a manual clock

use super::*;
use crate::domain::{
    ConfigField, ConnectionConfig, ConnectionState, ConsumptionState, DomainError, Severity,
};
use crate::error::AppError;
use crate::port::timer_scheduler::mocks::ManualScheduler;
use crate::port::token_provider::mocks::SequentialTokenProvider;

struct Harness {
    service: PanelService,
    clock: Arc<ManualScheduler>,
    tokens: Arc<SequentialTokenProvider>,
}

impl Harness {
    fn new() -> Self {
        let clock = Arc::new(ManualScheduler::new(1_700_000_000_000));
        let tokens = Arc::new(SequentialTokenProvider::new());
        let service = PanelService::new(
            LifecycleTimings::default(),
            clock.clone(),
            tokens.clone(),
            clock.clone(),
        );
        Self {
            service,
            clock,
            tokens,
        }
    }

    fn advance(&mut self, by: Duration) {
        for id in self.clock.advance(by) {
            self.service.on_timer(id);
        }
    }

    fn connected() -> Self {
        let mut h = Self::new();
        h.service.connect().unwrap();
        h.advance(CONNECT_DELAY);
        assert_eq!(h.service.state().connection, ConnectionState::Connected);
        h
    }

    fn count(&self, severity: Severity) -> usize {
        self.service
            .state()
            .log
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }
}

#[test]
fn test_connect_completes_after_delay() {
    let mut h = Harness::new();
    h.service.connect().unwrap();
    assert_eq!(h.service.state().connection, ConnectionState::Connecting);

    h.advance(Duration::from_millis(1999));
    assert_eq!(h.service.state().connection, ConnectionState::Connecting);

    h.advance(Duration::from_millis(1));
    assert_eq!(h.service.state().connection, ConnectionState::Connected);
    assert_eq!(h.count(Severity::Success), 1);
    assert_eq!(h.service.state().log.len(), 2);
    assert!(h.clock.pending().is_empty());
}

#[test]
fn test_connect_with_missing_field_fails() {
    let mut h = Harness::new();
    h.service
        .handle(PanelCommand::EditField {
            field: ConfigField::Password,
            value: String::new(),
        })
        .unwrap();
    h.service.connect().unwrap();

    h.advance(Duration::from_millis(500));
    assert_ne!(h.service.state().connection, ConnectionState::Connected);
    h.advance(Duration::from_secs(10));

    assert_eq!(h.service.state().connection, ConnectionState::Disconnected);
    assert_eq!(h.count(Severity::Error), 1);
    assert_eq!(h.count(Severity::Success), 0);
}

#[test]
fn test_disconnect_while_connecting_discards_attempt() {
    let mut h = Harness::new();
    h.service.connect().unwrap();
    h.advance(Duration::from_secs(1));

    h.service.disconnect().unwrap();
    assert!(h.clock.pending().is_empty());
    h.advance(Duration::from_secs(5));

    let state = h.service.state();
    assert_eq!(state.connection, ConnectionState::Disconnected);
    assert_eq!(state.log.len(), 2);
    assert_eq!(h.count(Severity::Success), 0);
    assert_eq!(h.count(Severity::Error), 0);
}

#[test]
fn test_stale_timer_after_reconnect_is_ignored() {
    let mut h = Harness::new();
    h.service.connect().unwrap();
    let first = h.service.state().pending_connect.unwrap();
    h.service.disconnect().unwrap();
    h.service.connect().unwrap();

    h.service.on_timer(first);
    assert_eq!(h.service.state().connection, ConnectionState::Connecting);

    h.advance(CONNECT_DELAY);
    assert_eq!(h.service.state().connection, ConnectionState::Connected);
}

#[test]
fn test_consume_produces_one_message_per_interval() {
    let mut h = Harness::connected();
    h.service.start_consume().unwrap();

    h.advance(Duration::from_millis(2999));
    assert!(h.service.state().messages.is_empty());

    h.advance(Duration::from_millis(1));
    assert_eq!(h.service.state().messages.len(), 1);
    assert_eq!(
        h.service.state().messages.latest().unwrap().as_str(),
        format!("[{}] Message received: tok1", h.clock.wall_clock())
    );

    h.advance(Duration::from_secs(6));
    assert_eq!(h.service.state().messages.len(), 3);
    assert_eq!(h.tokens.issued(), 3);

    h.service.stop_consume().unwrap();
    h.advance(Duration::from_secs(30));
    assert_eq!(h.service.state().messages.len(), 3);
    assert_eq!(h.service.state().consumption, ConsumptionState::Idle);
}

#[test]
fn test_message_feed_never_exceeds_cap() {
    let mut h = Harness::connected();
    h.service.start_consume().unwrap();
    h.advance(CONSUME_INTERVAL * 60);

    let state = h.service.state();
    assert_eq!(state.messages.len(), 50);
    assert_eq!(state.messages_received, 60);
    assert!(state.messages.latest().unwrap().as_str().ends_with("tok60"));
    assert!(state.messages.iter().last().unwrap().as_str().ends_with("tok11"));
}

#[test]
fn test_log_never_exceeds_cap() {
    let mut h = Harness::new();
    for _ in 0..40 {
        h.service.connect().unwrap();
        h.advance(CONNECT_DELAY);
        h.service.disconnect().unwrap();
    }

    let state = h.service.state();
    assert_eq!(state.log.len(), 100);
    assert_eq!(state.log_written, 120);
    assert_eq!(state.log.latest().unwrap().severity, Severity::Warning);
}

#[test]
fn test_reset_from_consuming() {
    let mut h = Harness::connected();
    h.service.start_consume().unwrap();
    h.advance(Duration::from_secs(9));
    assert_eq!(h.service.state().messages.len(), 3);

    h.service.handle(PanelCommand::Reset).unwrap();
    assert!(h.clock.pending().is_empty());
    h.advance(Duration::from_secs(9));

    let state = h.service.state();
    assert_eq!(state.connection, ConnectionState::Disconnected);
    assert_eq!(state.consumption, ConsumptionState::Idle);
    assert_eq!(state.config, ConnectionConfig::default());
    assert!(state.messages.is_empty());
    assert_eq!(state.log.len(), 1);
}

#[test]
fn test_reset_while_connecting() {
    let mut h = Harness::new();
    h.service
        .handle(PanelCommand::EditField {
            field: ConfigField::Queue,
            value: "orders".to_string(),
        })
        .unwrap();
    h.service.connect().unwrap();
    h.service.reset();
    h.advance(Duration::from_secs(5));

    let state = h.service.state();
    assert_eq!(state.connection, ConnectionState::Disconnected);
    assert_eq!(state.config.queue, "my_queue");
    assert_eq!(h.count(Severity::Success), 0);
}

#[test]
fn test_edit_rejected_while_connected() {
    let mut h = Harness::connected();
    let err = h
        .service
        .handle(PanelCommand::EditField {
            field: ConfigField::Host,
            value: "elsewhere".to_string(),
        })
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Domain(DomainError::ConfigLocked(_))
    ));
    assert_eq!(h.service.state().config.host, "localhost");
}

#[test]
fn test_invalid_commands_leave_state_untouched() {
    let mut h = Harness::new();
    let before = h.service.state().clone();

    assert!(h.service.handle(PanelCommand::StartConsume).is_err());
    assert!(h.service.handle(PanelCommand::StopConsume).is_err());
    assert!(h.service.handle(PanelCommand::Disconnect).is_err());
    assert_eq!(h.service.state(), &before);
}

#[test]
fn test_drop_cancels_live_timers() {
    let mut h = Harness::connected();
    h.service.start_consume().unwrap();
    assert_eq!(h.clock.pending().len(), 1);

    let Harness { service, clock, .. } = h;
    drop(service);
    assert!(clock.pending().is_empty());
}

mod with_mock_scheduler {
    use super::*;
    use mockall::{mock, predicate::eq, Sequence};

    mock! {
        pub Scheduler {}
        impl TimerScheduler for Scheduler {
            fn schedule_once(&self, id: TimerId, delay: Duration);
            fn schedule_repeating(&self, id: TimerId, period: Duration);
            fn cancel(&self, id: TimerId);
        }
    }

    fn service_with(scheduler: MockScheduler) -> PanelService {
        let clock = Arc::new(ManualScheduler::new(0));
        PanelService::new(
            LifecycleTimings::default(),
            clock,
            Arc::new(SequentialTokenProvider::new()),
            Arc::new(scheduler),
        )
    }

    #[test]
    fn test_disconnect_cancels_exact_connect_timer() {
        let mut seq = Sequence::new();
        let mut scheduler = MockScheduler::new();
        scheduler
            .expect_schedule_once()
            .with(eq(1), eq(CONNECT_DELAY))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        scheduler
            .expect_cancel()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        scheduler.expect_schedule_repeating().never();

        let mut service = service_with(scheduler);
        service.connect().unwrap();
        service.disconnect().unwrap();
        // Nothing left to cancel on drop
    }

    #[test]
    fn test_custom_timings_reach_scheduler() {
        let timings = LifecycleTimings {
            connect_delay: Duration::from_millis(10),
            consume_interval: Duration::from_millis(20),
        };
        let mut scheduler = MockScheduler::new();
        scheduler
            .expect_schedule_once()
            .with(eq(1), eq(Duration::from_millis(10)))
            .times(1)
            .return_const(());
        scheduler
            .expect_schedule_repeating()
            .with(eq(2), eq(Duration::from_millis(20)))
            .times(1)
            .return_const(());
        scheduler.expect_cancel().with(eq(2)).times(1).return_const(());

        let clock = Arc::new(ManualScheduler::new(0));
        let mut service = PanelService::new(
            timings,
            clock,
            Arc::new(SequentialTokenProvider::new()),
            Arc::new(scheduler),
        );
        service.connect().unwrap();
        service.on_timer(1);
        service.start_consume().unwrap();
        // Dropping the service tears down the consume timer
    }
}
