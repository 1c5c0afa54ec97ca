//! Periodic refresh tasks for live views.
//!
//! A [`PollHandle`] owns a background task that invokes a fallible async
//! closure on a fixed period, starting immediately. Dropping the handle
//! aborts the task, so a live view cannot outlive its owner and keep
//! polling a server nobody is watching.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Handle to a running poll task. Aborts the task on drop.
#[derive(Debug)]
pub struct PollHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Spawn a poll task named `name` that runs `tick` every `period`.
    ///
    /// The first tick fires immediately. A failed tick is logged and the
    /// schedule continues; a slow tick delays the next one rather than
    /// bunching missed ticks together.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), crate::error::ApiError>> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Err(err) = tick().await {
                    warn!(poll = name, error = %err, "poll tick failed");
                }
            }
        });
        debug!(poll = name, ?period, "poll task started");
        Self { name, task }
    }

    /// Whether the task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the task explicitly. Equivalent to dropping the handle.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!(poll = self.name, "poll task stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_on_period() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let handle = PollHandle::spawn("test", Duration::from_secs(5), move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_schedule() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let _handle = PollHandle::spawn("failing", Duration::from_secs(1), move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Err(crate::error::ApiError::SessionExpired)
            }
        });

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let handle = PollHandle::spawn("dropped", Duration::from_secs(1), move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);
        let before = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), before);
    }
}
