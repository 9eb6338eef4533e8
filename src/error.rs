//! Error taxonomy for the composition.
//!
//! Three kinds of failure are kept apart because the view reacts to them
//! differently: environmental failures of an upstream (keep showing the last
//! good state), inconsistent data (handled locally, reported), and logic bugs
//! in the caller (surfaced loudly).
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Upstream Errors
// ============================================================================

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The collaborator reported a failure (network, server error, ...).
    #[error("{source_name} failed: {message}")]
    Failed {
        source_name: String,
        message: String,
    },

    /// The collaborator went away.
    #[error("upstream closed")]
    Closed,
}

impl UpstreamError {
    pub fn failed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Data Inconsistency
// ============================================================================

/// A tag lists a feed id that is not in the current feed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("tag {tag_id} references unknown feed {feed_id}")]
pub struct MissingReferenceError {
    pub tag_id: i64,
    pub feed_id: i64,
}

// ============================================================================
// Invariant Violations
// ============================================================================

/// An action was requested in a state where it cannot apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("no article is being viewed")]
    NoCurrentArticle,

    #[error("article {0} is not in the article cache")]
    ArticleNotCached(i64),

    #[error("search requires a list view")]
    NotInList,

    #[error("share target {0} is not enabled")]
    UnknownShareTarget(i64),
}

// ============================================================================
// Shell Errors
// ============================================================================

/// Everything the composition reports to its owning view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// An upstream stream failed; the last derived value stays in place.
    #[error("{upstream} upstream failed: {error}")]
    Transient {
        upstream: &'static str,
        error: UpstreamError,
    },

    #[error(transparent)]
    DataInconsistency(#[from] MissingReferenceError),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// The side effect behind a user action failed.
    #[error("{action} request failed: {error}")]
    Action {
        action: &'static str,
        error: UpstreamError,
    },
}

impl ShellError {
    /// Whether this indicates a bug in the caller rather than the environment.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Action { .. })
    }
}
