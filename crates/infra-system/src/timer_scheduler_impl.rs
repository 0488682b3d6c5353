// Timer scheduler implementation
// reason: tokio timers, each scheduled id owns one abortable task
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use queue_console_core::domain::TimerId;
use queue_console_core::port::TimerScheduler;

/// Tokio-backed timer scheduler
///
/// Every fired id is posted into `fired`; the panel runtime owns the
/// receiving end. Cancelling aborts the task, and dropping the scheduler
/// aborts all of them.
pub struct TokioTimerScheduler {
    fired: mpsc::UnboundedSender<TimerId>,
    tasks: Mutex<HashMap<TimerId, JoinHandle<()>>>,
}

impl TokioTimerScheduler {
    /// Create a scheduler and the channel its firings arrive on
    ///
    /// # Example
    /// ```ignore
    /// let (scheduler, fired) = TokioTimerScheduler::new();
    /// let service = PanelService::new(timings, clock, tokens, Arc::new(scheduler));
    /// let (handle, task) = PanelRuntime::spawn(service, fired);
    /// ```
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            fired: tx,
            tasks: Mutex::new(HashMap::new()),
        };
        (scheduler, rx)
    }

    /// Number of timers still alive
    pub fn active(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.retain(|_, task| !task.is_finished());
        tasks.len()
    }

    fn track(&self, id: TimerId, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.retain(|_, task| !task.is_finished());
        if let Some(previous) = tasks.insert(id, task) {
            previous.abort();
        }
    }
}

impl TimerScheduler for TokioTimerScheduler {
    fn schedule_once(&self, id: TimerId, delay: Duration) {
        debug!(timer = id, delay_ms = delay.as_millis() as u64, "Scheduling one-shot timer");
        let fired = self.fired.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            trace!(timer = id, "One-shot timer fired");
            let _ = fired.send(id);
        });
        self.track(id, task);
    }

    fn schedule_repeating(&self, id: TimerId, period: Duration) {
        debug!(timer = id, period_ms = period.as_millis() as u64, "Scheduling repeating timer");
        let fired = self.fired.clone();
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                trace!(timer = id, "Repeating timer fired");
                if fired.send(id).is_err() {
                    break;
                }
            }
        });
        self.track(id, task);
    }

    fn cancel(&self, id: TimerId) {
        if let Some(task) = self.tasks.lock().unwrap().remove(&id) {
            debug!(timer = id, "Cancelling timer");
            task.abort();
        }
    }
}

impl Drop for TokioTimerScheduler {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for (_, task) in tasks.drain() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_once() {
        let (scheduler, mut fired) = TokioTimerScheduler::new();
        scheduler.schedule_once(1, Duration::from_secs(2));

        sleep(Duration::from_millis(1900)).await;
        assert!(fired.try_recv().is_err());

        sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.try_recv().unwrap(), 1);

        sleep(Duration::from_secs(5)).await;
        assert!(fired.try_recv().is_err());
        assert_eq!(scheduler.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_fires_each_period() {
        let (scheduler, mut fired) = TokioTimerScheduler::new();
        scheduler.schedule_repeating(7, Duration::from_secs(3));

        sleep(Duration::from_millis(9100)).await;
        let mut count = 0;
        while let Ok(id) = fired.try_recv() {
            assert_eq!(id, 7);
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(scheduler.active(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_firing() {
        let (scheduler, mut fired) = TokioTimerScheduler::new();
        scheduler.schedule_once(1, Duration::from_secs(2));
        scheduler.schedule_repeating(2, Duration::from_secs(3));

        sleep(Duration::from_secs(1)).await;
        scheduler.cancel(1);
        scheduler.cancel(2);
        scheduler.cancel(99);

        sleep(Duration::from_secs(10)).await;
        assert!(fired.try_recv().is_err());
        assert_eq!(scheduler.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_all_timers() {
        let (scheduler, mut fired) = TokioTimerScheduler::new();
        scheduler.schedule_repeating(3, Duration::from_secs(1));
        drop(scheduler);

        sleep(Duration::from_secs(5)).await;
        assert!(fired.recv().await.is_none());
    }
}
