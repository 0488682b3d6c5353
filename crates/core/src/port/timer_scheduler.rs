// Timer Scheduler Port
// The panel never sleeps itself: it asks a scheduler to fire a TimerId later.

use crate::domain::TimerId;
use std::time::Duration;

/// Scheduler interface for the two panel timers
///
/// Implementations deliver fired ids back to whoever drives the panel
/// (see `application::runtime`). Cancelling an unknown or already-fired id
/// is a no-op.
pub trait TimerScheduler: Send + Sync {
    /// Fire `id` once after `delay`
    fn schedule_once(&self, id: TimerId, delay: Duration);

    /// Fire `id` every `period`, first firing one period from now
    fn schedule_repeating(&self, id: TimerId, period: Duration);

    /// Stop a scheduled timer
    fn cancel(&self, id: TimerId);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::port::TimeProvider;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy)]
    struct ManualTimer {
        due: Duration,
        period: Option<Duration>,
    }

    #[derive(Debug, Default)]
    struct ManualInner {
        now: Duration,
        timers: BTreeMap<TimerId, ManualTimer>,
    }

    /// Fake clock + scheduler; time only moves when `advance` is called
    ///
    /// Also implements `TimeProvider`, so one instance can drive both the
    /// timers and the timestamps of a panel under test.
    pub struct ManualScheduler {
        epoch_millis: i64,
        inner: Mutex<ManualInner>,
    }

    impl ManualScheduler {
        pub fn new(epoch_millis: i64) -> Self {
            Self {
                epoch_millis,
                inner: Mutex::new(ManualInner::default()),
            }
        }

        /// Move time forward and return every firing in due order
        ///
        /// Repeating timers fire once per elapsed period. Ties fire in id order.
        pub fn advance(&self, by: Duration) -> Vec<TimerId> {
            let mut inner = self.inner.lock().unwrap();
            let target = inner.now + by;
            let mut fired = Vec::new();

            loop {
                let next = inner
                    .timers
                    .iter()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(id, timer)| (timer.due, **id))
                    .map(|(id, timer)| (*id, *timer));

                let Some((id, timer)) = next else { break };
                inner.now = timer.due;
                fired.push(id);
                match timer.period {
                    Some(period) => {
                        if let Some(t) = inner.timers.get_mut(&id) {
                            t.due += period;
                        }
                    }
                    None => {
                        inner.timers.remove(&id);
                    }
                }
            }

            inner.now = target;
            fired
        }

        /// Ids currently scheduled
        pub fn pending(&self) -> Vec<TimerId> {
            self.inner.lock().unwrap().timers.keys().copied().collect()
        }

        pub fn is_scheduled(&self, id: TimerId) -> bool {
            self.inner.lock().unwrap().timers.contains_key(&id)
        }

        /// Time elapsed since creation
        pub fn elapsed(&self) -> Duration {
            self.inner.lock().unwrap().now
        }
    }

    impl TimerScheduler for ManualScheduler {
        fn schedule_once(&self, id: TimerId, delay: Duration) {
            let mut inner = self.inner.lock().unwrap();
            let due = inner.now + delay;
            inner.timers.insert(id, ManualTimer { due, period: None });
        }

        fn schedule_repeating(&self, id: TimerId, period: Duration) {
            let mut inner = self.inner.lock().unwrap();
            let due = inner.now + period;
            inner.timers.insert(
                id,
                ManualTimer {
                    due,
                    period: Some(period),
                },
            );
        }

        fn cancel(&self, id: TimerId) {
            self.inner.lock().unwrap().timers.remove(&id);
        }
    }

    impl TimeProvider for ManualScheduler {
        fn now_millis(&self) -> i64 {
            self.epoch_millis + self.elapsed().as_millis() as i64
        }
    }

}
