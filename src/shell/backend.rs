use crate::error::UpstreamError;
use crate::model::{Article, ShareTarget};
use serde::Serialize;
use std::future::{ready, Future};
use std::sync::{Mutex, MutexGuard};

/// External services behind the toolbar's actions.
///
/// Each call is a request; its effect comes back through the upstreams, never
/// through the return value.
pub trait Backend: Send + Sync + 'static {
    fn set_article_read(
        &self,
        article_id: i64,
        read: bool,
    ) -> impl Future<Output = Result<(), UpstreamError>> + Send;

    fn mark_all_read(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send;

    fn toggle_older_first(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send;

    fn toggle_unread_only(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send;

    fn refresh_articles(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send;

    fn title_clicked(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send;

    fn navigate(&self, path: String) -> impl Future<Output = Result<(), UpstreamError>> + Send;

    fn submit_share(
        &self,
        target: ShareTarget,
        article: Article,
    ) -> impl Future<Output = Result<(), UpstreamError>> + Send;
}

// ============================================================================
// Recording Backend
// ============================================================================

/// A request made to the [`Backend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BackendCall {
    SetArticleRead { article_id: i64, read: bool },
    MarkAllRead,
    ToggleOlderFirst,
    ToggleUnreadOnly,
    RefreshArticles,
    TitleClicked,
    Navigate { path: String },
    SubmitShare { target_id: i64, article_id: i64 },
}

/// In-memory backend that records every request.
///
/// Used by the CLI runner and tests. Requests can be made to fail with
/// [`fail_with`](Self::fail_with); failed requests are still recorded.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    failure: Mutex<Option<String>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later request fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *lock(&self.failure) = Some(message.into());
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: BackendCall) -> std::future::Ready<Result<(), UpstreamError>> {
        tracing::debug!(?call, "Backend request");
        lock(&self.calls).push(call);
        let result = match lock(&self.failure).as_ref() {
            Some(message) => Err(UpstreamError::failed("backend", message.clone())),
            None => Ok(()),
        };
        ready(result)
    }
}

/// Recording must survive a panicking test thread, so poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Backend for RecordingBackend {
    fn set_article_read(
        &self,
        article_id: i64,
        read: bool,
    ) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::SetArticleRead { article_id, read })
    }

    fn mark_all_read(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::MarkAllRead)
    }

    fn toggle_older_first(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::ToggleOlderFirst)
    }

    fn toggle_unread_only(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::ToggleUnreadOnly)
    }

    fn refresh_articles(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::RefreshArticles)
    }

    fn title_clicked(&self) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::TitleClicked)
    }

    fn navigate(&self, path: String) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::Navigate { path })
    }

    fn submit_share(
        &self,
        target: ShareTarget,
        article: Article,
    ) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        self.record(BackendCall::SubmitShare {
            target_id: target.id,
            article_id: article.id,
        })
    }
}
