//! Per-question countdown timer.
//!
//! A cancellable one-second ticker. Remaining seconds are published on a
//! watch channel for the presentation layer; the expiry hook fires exactly
//! once when the countdown reaches zero, after which the task exits. Whoever
//! arms a timer must cancel the previous one before arming the next: a
//! dangling timer firing after its question has moved on is the defect class
//! the engine's epoch guard exists for.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub struct TimerHandle {
    task: JoinHandle<()>,
    remaining: watch::Receiver<u32>,
}

impl TimerHandle {
    /// Stop the countdown. An expiry already in flight cannot be recalled,
    /// which is why expiries also carry an epoch the engine can reject.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Watch channel carrying the seconds left on the countdown.
    pub fn remaining(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Arm a countdown of `duration_secs`, invoking `on_expire` once at zero.
///
/// Must be called from within a tokio runtime.
pub fn arm<F>(duration_secs: u32, on_expire: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = watch::channel(duration_secs);
    let task = tokio::spawn(async move {
        let mut on_expire = Some(on_expire);
        let mut remaining = duration_secs;
        if remaining == 0 {
            if let Some(expire) = on_expire.take() {
                expire();
            }
            return;
        }

        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            remaining = remaining.saturating_sub(1);
            let _ = tx.send(remaining);
            if remaining == 0 {
                if let Some(expire) = on_expire.take() {
                    expire();
                }
                break;
            }
        }
    });

    TimerHandle { task, remaining: rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_expiry_fires_exactly_once() {
        let fired = Arc::new(AtomicU32::new(0));
        let fired_clone = fired.clone();
        let handle = arm(3, move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_counts_down() {
        let handle = arm(5, || {});
        let remaining = handle.remaining();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*remaining.borrow(), 3);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(*remaining.borrow(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_expiry() {
        let fired = Arc::new(AtomicU32::new(0));
        let fired_clone = fired.clone();
        let handle = arm(3, move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_expires_immediately() {
        let fired = Arc::new(AtomicU32::new(0));
        let fired_clone = fired.clone();
        let _handle = arm(0, move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
