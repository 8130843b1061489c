// src/scheduler.rs
//
// Single-slot periodic scheduler for the foreground task.
// Holds at most one armed callback and invokes it with the tick timestamp.

use chrono::{DateTime, Local};
use log::{debug, info};
use std::mem;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Callback invoked on every tick with the current local time.
pub type TaskCallback = Arc<dyn Fn(DateTime<Local>) + Send + Sync + 'static>;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A live periodic timer and the gate its ticks pass through.
struct ArmedCallback {
    handle: JoinHandle<()>,
    // `true` while ticks may invoke the callback. Cleared under the lock on cancel,
    // so no invocation can begin once cancel returns.
    gate: Arc<Mutex<bool>>,
    interval: Duration,
}

impl ArmedCallback {
    fn cancel(self) {
        let mut open = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        *open = false;
        drop(open);
        self.handle.abort();
    }
}

enum SlotState {
    Idle,
    Armed(ArmedCallback),
}

/// Owns the single active-callback slot.
pub struct PeriodicScheduler {
    state: SlotState,
}

impl PeriodicScheduler {
    pub fn new() -> Self {
        Self {
            state: SlotState::Idle,
        }
    }

    /// Cancel any armed callback, then arm `callback` to fire every `interval`.
    /// The first tick happens one interval after arming. Must be called within a tokio runtime.
    pub fn arm(&mut self, callback: TaskCallback, interval: Duration) {
        self.disarm();

        let interval = interval.max(MIN_INTERVAL);
        let gate = Arc::new(Mutex::new(true));
        let handle = tokio::spawn(run_ticks(callback, interval, Arc::clone(&gate)));

        info!("Periodic callback armed with interval {:?}", interval);
        self.state = SlotState::Armed(ArmedCallback {
            handle,
            gate,
            interval,
        });
    }

    /// Cancel the armed callback, if any. Safe to call repeatedly.
    pub fn disarm(&mut self) {
        if let SlotState::Armed(armed) = mem::replace(&mut self.state, SlotState::Idle) {
            armed.cancel();
            info!("Periodic callback disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, SlotState::Armed(_))
    }

    /// Interval of the armed callback.
    pub fn interval(&self) -> Option<Duration> {
        match &self.state {
            SlotState::Armed(armed) => Some(armed.interval),
            SlotState::Idle => None,
        }
    }
}

impl Default for PeriodicScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PeriodicScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

async fn run_ticks(callback: TaskCallback, interval: Duration, gate: Arc<Mutex<bool>>) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let open = gate.lock().unwrap_or_else(|e| e.into_inner());
        if !*open {
            debug!("Tick after cancellation ignored");
            return;
        }
        callback(Local::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, TaskCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let callback: TaskCallback = Arc::new(move |_: DateTime<Local>| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_interval() {
        let mut scheduler = PeriodicScheduler::new();
        let (count, callback) = counter();
        scheduler.arm(callback, Duration::from_millis(100));

        time::sleep(Duration::from_millis(99)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_spaced_by_interval() {
        let mut scheduler = PeriodicScheduler::new();
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&stamps);
        scheduler.arm(
            Arc::new(move |_: DateTime<Local>| s.lock().unwrap().push(Instant::now())),
            Duration::from_millis(250),
        );

        time::sleep(Duration::from_millis(1001)).await;
        let stamps = stamps.lock().unwrap();
        assert_eq!(stamps.len(), 4);
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(250));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_replaces_previous_callback() {
        let mut scheduler = PeriodicScheduler::new();
        let (first, first_cb) = counter();
        let (second, second_cb) = counter();

        scheduler.arm(first_cb, Duration::from_millis(100));
        time::sleep(Duration::from_millis(150)).await;
        scheduler.arm(second_cb, Duration::from_millis(100));
        time::sleep(Duration::from_millis(1001)).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 10);
        assert_eq!(scheduler.interval(), Some(Duration::from_millis(100)));
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_is_idempotent_and_stops_ticks() {
        let mut scheduler = PeriodicScheduler::new();
        scheduler.disarm();

        let (count, callback) = counter();
        scheduler.arm(callback, Duration::from_millis(100));
        assert!(scheduler.is_armed());

        scheduler.disarm();
        scheduler.disarm();
        assert!(!scheduler.is_armed());

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_clamped() {
        let mut scheduler = PeriodicScheduler::new();
        let (count, callback) = counter();
        scheduler.arm(callback, Duration::ZERO);

        assert_eq!(scheduler.interval(), Some(MIN_INTERVAL));
        time::sleep(Duration::from_millis(5)).await;
        assert!(count.load(Ordering::SeqCst) >= 4);
        scheduler.disarm();
    }
}
