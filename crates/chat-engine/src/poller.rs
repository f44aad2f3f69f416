//! Cancellable interval loops.
//!
//! A loop is: run the tick, then sleep the interval, until the tick asks to
//! stop or the handle is cancelled. Cancellation is cooperative: the stop
//! flag is checked before each tick and an in-flight request is never
//! aborted from outside.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

/// What a tick tells the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Terminate the loop permanently (window closed or hard backend error).
    Stop,
}

/// Handle to a running poll loop.
pub struct PollHandle {
    stop: Arc<AtomicBool>,
    notify: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Request cooperative shutdown and wake the loop if it is sleeping.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Whether the loop task has exited (cancelled or self-stopped).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("cancelled", &self.is_cancelled())
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Spawn a poll loop: immediate first tick, then one tick per interval.
pub(crate) fn spawn_poll_loop<F, Fut>(name: &'static str, interval: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = TickOutcome> + Send,
{
    let stop = Arc::new(AtomicBool::new(false));
    let notify = Arc::new(Notify::new());

    let loop_stop = stop.clone();
    let loop_notify = notify.clone();
    let task = tokio::spawn(async move {
        debug!("poll loop {name} started");
        loop {
            if loop_stop.load(Ordering::SeqCst) {
                break;
            }
            if tick().await == TickOutcome::Stop {
                break;
            }
            if loop_stop.load(Ordering::SeqCst) {
                break;
            }
            tokio::select! {
                _ = loop_notify.notified() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        debug!("poll loop {name} stopped");
    });

    PollHandle { stop, notify, task }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_runs_immediately_and_then_per_interval() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let handle = spawn_poll_loop("test", Duration::from_secs(4), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                TickOutcome::Continue
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn a_stop_outcome_ends_the_loop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let handle = spawn_poll_loop("test", Duration::from_secs(1), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                TickOutcome::Stop
            }
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }
}
