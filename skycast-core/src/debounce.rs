use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Cancel-and-reschedule debouncer.
///
/// Each `call` supersedes any pending one: within a burst of calls closer
/// together than the quiet interval, only the last call's argument reaches
/// the wrapped action, once the interval elapses with no further calls.
/// Earlier scheduled invocations are aborted, not queued.
///
/// `call` must run inside a tokio runtime; the pending invocation is a
/// spawned task holding a timer.
pub struct Debouncer<T> {
    interval: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(interval: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            interval,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    /// Schedule `value`, superseding any not-yet-fired call.
    pub fn call(&self, value: T) {
        let action = Arc::clone(&self.action);
        let interval = self.interval;

        // Anchor the quiet interval at the call itself, not at the spawned
        // task's first poll.
        let deadline = tokio::time::Instant::now() + interval;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            action(value);
        });

        let mut pending = self.lock_pending();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        // A poisoned lock only means a panic elsewhere; the slot itself
        // stays usable.
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
