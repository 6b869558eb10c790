// src/services/poller.rs
//! Cancellable fixed-interval polling primitive.
//!
//! Replaces ad hoc interval-plus-manual-clear logic with one structured
//! task: a `check` operation runs once per tick until it reports a
//! terminal outcome or fails, and the returned handle makes the
//! cancellation-on-teardown property enforceable from the outside. At
//! most one check is in flight at a time; a pending result continues
//! silently.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Result of one poll check.
pub enum PollOutcome<T> {
    /// Not done yet; poll again next tick
    Pending,
    /// Done; stop polling and report
    Terminal(T),
}

/// Handle to a running poll task.
///
/// Dropping the handle does not stop the task; call [`PollHandle::cancel`].
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops the poll task. No further checks run after this returns.
    /// Cancelling an already-finished task is a no-op.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the task has ended, by outcome or cancellation.
    #[allow(dead_code)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a poll task that runs `check` once per `interval` tick.
///
/// The first check happens one full interval after the call, matching
/// the scan-then-poll flow where the applicant needs time to scan the
/// QR code before a status can exist.
///
/// `on_outcome` fires exactly once: with `Ok` on a terminal check, or
/// with `Err` on the first failed check (fail-fast; a failed check is
/// never retried).
pub fn spawn_poller<C, Fut, T, E, F>(interval: Duration, mut check: C, on_outcome: F) -> PollHandle
where
    C: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<PollOutcome<T>, E>> + Send,
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Result<T, E>) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the interval's first tick fires immediately; consume it so
        // checks start one period in
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match check().await {
                Ok(PollOutcome::Pending) => continue,
                Ok(PollOutcome::Terminal(value)) => {
                    on_outcome(Ok(value));
                    break;
                }
                Err(error) => {
                    on_outcome(Err(error));
                    break;
                }
            }
        }
    });

    PollHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Scripted check: walks a fixed status sequence, counting calls.
    fn scripted(
        script: Vec<Result<PollOutcome<&'static str>, &'static str>>,
        calls: Arc<AtomicUsize>,
    ) -> impl FnMut() -> std::future::Ready<Result<PollOutcome<&'static str>, &'static str>> {
        let script = Arc::new(Mutex::new(script));
        move || {
            let step = calls.fetch_add(1, Ordering::SeqCst);
            let result = script
                .lock()
                .unwrap()
                .get_mut(step)
                .map(|r| std::mem::replace(r, Ok(PollOutcome::Pending)))
                .unwrap_or(Ok(PollOutcome::Pending));
            std::future::ready(result)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_pending_verified_polls_exactly_three_times() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcomes = Arc::new(Mutex::new(Vec::new()));

        let script = vec![
            Ok(PollOutcome::Pending),
            Ok(PollOutcome::Pending),
            Ok(PollOutcome::Terminal("verified")),
        ];
        let handle = {
            let outcomes = outcomes.clone();
            spawn_poller(Duration::from_secs(3), scripted(script, calls.clone()), move |r| {
                outcomes.lock().unwrap().push(r);
            })
        };

        // well past the third tick; a still-running poller would keep checking
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(handle.is_finished());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(*outcomes.lock().unwrap(), vec![Ok("verified")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_stops_after_two_polls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcomes = Arc::new(Mutex::new(Vec::new()));

        let script = vec![Ok(PollOutcome::Pending), Ok(PollOutcome::Terminal("rejected"))];
        let _handle = {
            let outcomes = outcomes.clone();
            spawn_poller(Duration::from_secs(3), scripted(script, calls.clone()), move |r| {
                outcomes.lock().unwrap().push(r);
            })
        };

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*outcomes.lock().unwrap(), vec![Ok("rejected")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_error_fails_fast() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcomes = Arc::new(Mutex::new(Vec::new()));

        let script = vec![Ok(PollOutcome::Pending), Err("connection reset")];
        let _handle = {
            let outcomes = outcomes.clone();
            spawn_poller(Duration::from_secs(3), scripted(script, calls.clone()), move |r| {
                outcomes.lock().unwrap().push(r);
            })
        };

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*outcomes.lock().unwrap(), vec![Err("connection reset")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_future_polls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcomes = Arc::new(Mutex::new(Vec::new()));

        // all pending: would poll forever without cancellation
        let script = (0..100).map(|_| Ok(PollOutcome::Pending)).collect();
        let handle = {
            let outcomes = outcomes.clone();
            spawn_poller(Duration::from_secs(3), scripted(script, calls.clone()), move |r| {
                outcomes.lock().unwrap().push(r);
            })
        };

        tokio::time::sleep(Duration::from_secs(7)).await;
        let polls_before_cancel = calls.load(Ordering::SeqCst);
        assert_eq!(polls_before_cancel, 2);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), polls_before_cancel);
        // teardown produces no outcome; the session stays wherever it was
        assert!(outcomes.lock().unwrap().is_empty());
    }
}
