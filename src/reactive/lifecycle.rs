//! Subscription lifecycle for a view instance.
//!
//! Every component task and every in-flight action is a [`Subscription`].
//! The view owns one [`Subscriptions`] scope and releases all of them at
//! teardown with a single [`Subscriptions::dispose`].

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::{AbortHandle, JoinHandle};

/// A running task that delivers into the view's state.
///
/// Releasing aborts the task; an aborted task is never polled again, so no
/// callback runs after release. Dropping releases too.
#[derive(Debug)]
#[must_use = "a subscription is released as soon as it is dropped"]
pub struct Subscription {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Spawn `task` on the current runtime.
    pub fn spawn<F>(name: &'static str, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::debug!(subscription = name, "Subscription started");
        Self {
            name,
            handle: tokio::spawn(task),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Handle for cancelling the task without owning the subscription.
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Resource scope owning every subscription of one view instance.
#[derive(Debug, Default)]
pub struct Subscriptions {
    entries: Vec<Subscription>,
    disposed: bool,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `subscription`.
    ///
    /// Finished subscriptions are pruned first so that short-lived action
    /// tasks do not accumulate. After [`dispose`](Self::dispose) the new
    /// subscription is released immediately.
    pub fn register(&mut self, subscription: Subscription) {
        if self.disposed {
            tracing::debug!(
                subscription = subscription.name(),
                "Scope already disposed, releasing immediately"
            );
            return;
        }
        self.entries.retain(|s| !s.is_finished());
        self.entries.push(subscription);
    }

    /// Release every registered subscription exactly once.
    ///
    /// Returns how many were released. Calling it again is a no-op.
    pub fn dispose(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;

        let released = self.entries.len();
        for subscription in self.entries.drain(..) {
            tracing::debug!(subscription = subscription.name(), "Releasing subscription");
        }
        tracing::debug!(released, "Subscription scope disposed");
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing, the panic message comes back
/// as `Err(String)` so it can be reported to the view.
pub(crate) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}
