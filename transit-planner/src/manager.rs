//! Background execution with last-request-wins delivery.
//!
//! The UI re-runs a search whenever its query changes (a clicked
//! station, a dragged time slider), often faster than searches finish.
//! [`RequestManager`] keeps at most one task "current": submitting a
//! new task cancels the previous one, and a finishing worker delivers
//! its result only if it is still the current task at that moment.
//! A superseded or cancelled task is simply silence to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// Cooperative cancellation signal handed to a running task.
///
/// Long-running tasks poll [`is_cancelled`](CancelToken::is_cancelled)
/// regularly (the route search checks once per queue pop) and wind down
/// promptly once it flips.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The manager's view of the in-flight task.
struct CurrentTask {
    /// Bumped on every submission; a worker delivers only if its own
    /// generation still matches.
    generation: u64,

    /// Token of the running task, if one is still in flight.
    cancel: Option<CancelToken>,
}

/// Runs tasks on background workers, delivering only the most recent,
/// non-superseded result.
///
/// One mutex guards both the current-task reference and the decision to
/// invoke a completion callback, so a superseded task's callback can
/// never fire after a newer task has delivered, and two callbacks can
/// never fire for overlapping submissions. Because the callback runs
/// under that mutex, it must not call back into the same manager.
///
/// Workers run on the tokio blocking pool; [`submit`](Self::submit)
/// must be called from within a tokio runtime and returns immediately.
pub struct RequestManager {
    current: Arc<Mutex<CurrentTask>>,
}

impl RequestManager {
    /// Create a manager with no task in flight.
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(CurrentTask {
                generation: 0,
                cancel: None,
            })),
        }
    }

    /// Submit a task, superseding any task still in flight.
    ///
    /// The previous task's token is cancelled and `task` becomes
    /// current, atomically. `task` runs on a background worker with its
    /// own [`CancelToken`]; it returns `Some(value)` to offer a result
    /// or `None` after observing cancellation. `on_complete` is invoked
    /// with the value only if the task is still current when it
    /// finishes; otherwise the result is discarded silently. A
    /// cancelled task never invokes `on_complete`.
    pub fn submit<T, F, C>(&self, task: F, on_complete: C)
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> Option<T> + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let token = CancelToken::new();
        let generation = {
            let mut current = self.current.lock();
            if let Some(previous) = current.cancel.take() {
                previous.cancel();
            }
            current.generation += 1;
            current.cancel = Some(token.clone());
            current.generation
        };
        tracing::debug!(generation, "task submitted");

        let shared = Arc::clone(&self.current);
        tokio::task::spawn_blocking(move || {
            let outcome = task(&token);

            let mut current = shared.lock();
            if current.generation != generation {
                tracing::debug!(generation, "discarding superseded result");
                return;
            }
            current.cancel = None;
            match outcome {
                Some(value) => {
                    tracing::debug!(generation, "delivering result");
                    on_complete(value);
                }
                None => tracing::debug!(generation, "task observed cancellation"),
            }
        });
    }

    /// Cancel the current task without submitting a replacement.
    ///
    /// Any still-running worker becomes stale: even if it ignores its
    /// token and runs to completion, its result is discarded.
    pub fn cancel(&self) {
        let mut current = self.current.lock();
        if let Some(token) = current.cancel.take() {
            token.cancel();
            tracing::debug!(generation = current.generation, "cancelled current task");
        }
        current.generation += 1;
    }
}

impl Default for RequestManager {
    fn default() -> Self {
        Self::new()
    }
}
