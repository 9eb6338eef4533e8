//! Events surfaced from the composition to the owning view.
//!
//! Components never fail loudly on their own; they hand errors and timed
//! notifications to a [`Reporter`], which logs them and forwards them over a
//! bounded channel the view drains at its own pace.

use crate::error::ShellError;
use std::fmt;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Default capacity of the event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 32;

/// Notification for the owning view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Something went wrong; the view decides whether to retry, show a
    /// banner, or ignore it.
    Error(ShellError),
    /// The search entry was just shown and should receive input focus.
    FocusSearchInput,
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

impl fmt::Display for ShellEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => write!(f, "error: {}", error),
            Self::FocusSearchInput => f.write_str("focus search input"),
            Self::TaskPanicked { task, error } => write!(f, "task {} panicked: {}", task, error),
        }
    }
}

/// Sending half of the event channel, cloned into every component task.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: mpsc::Sender<ShellEvent>,
}

impl Reporter {
    /// Create a reporter and the receiver the view drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ShellEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Log an error at a level matching its kind and forward it to the view.
    pub fn report(&self, error: ShellError) {
        match &error {
            ShellError::Transient { upstream, error } => {
                tracing::warn!(upstream, error = %error, "Upstream failed, keeping last derived state");
            }
            ShellError::DataInconsistency(missing) => {
                tracing::warn!(
                    tag_id = missing.tag_id,
                    feed_id = missing.feed_id,
                    "Tag references a feed missing from the snapshot"
                );
            }
            ShellError::Invariant(violation) => {
                tracing::error!(violation = %violation, "Action requested in an invalid state");
            }
            ShellError::Action { action, error } => {
                tracing::warn!(action, error = %error, "Action request failed");
            }
        }
        self.emit(ShellEvent::Error(error));
    }

    /// Forward an event without blocking the caller.
    ///
    /// A full channel drops the event so a slow view can never stall the
    /// composition.
    pub fn emit(&self, event: ShellEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(event = %event, "Event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Event receiver dropped");
            }
        }
    }
}
