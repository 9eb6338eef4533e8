//! User actions on the toolbar and sidebar.
//!
//! Each action issues exactly one backend request and never touches derived
//! state itself; the effect arrives later through the upstreams. Requests
//! run as registered subscriptions, so disposing the shell cancels them.

use super::{Backend, Shell};
use crate::error::{InvariantViolation, ShellError, UpstreamError};
use crate::events::ShellEvent;
use crate::model::{Article, ArticleList, ListContext};
use crate::reactive::{catch_task_panic, Subscription};
use crate::sidebar::CollapseKey;
use crate::toolbar::{search_path, up_path};
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::AbortHandle;

impl<B: Backend> Shell<B> {
    pub fn toggle_older_first(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.request("toggle_older_first", async move {
            backend.toggle_older_first().await
        });
    }

    pub fn toggle_unread_only(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.request("toggle_unread_only", async move {
            backend.toggle_unread_only().await
        });
    }

    pub fn mark_all_read(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.request("mark_all_read", async move { backend.mark_all_read().await });
    }

    pub fn refresh(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.request("refresh", async move { backend.refresh_articles().await });
    }

    pub fn title_click(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.request("title_click", async move { backend.title_clicked().await });
    }

    /// Flip the read flag of the viewed article.
    ///
    /// Uses the last concrete article list, even if the cache has failed or
    /// is loading since. Waits only if no list has arrived yet.
    pub fn toggle_read_on_current_article(&mut self) {
        let Some(article_id) = self.article_id() else {
            self.reporter.report(InvariantViolation::NoCurrentArticle.into());
            return;
        };

        let backend = Arc::clone(&self.backend);
        let mut articles = self.read_status.articles.subscribe();
        self.spawn_action("toggle_read", async move {
            let list = cached_list(&mut articles, |_| true).await?;
            let article = find_article(&list, article_id)?;

            tracing::debug!(article_id, read = !article.read, "Requesting read flag change");
            backend
                .set_article_read(article_id, !article.read)
                .await
                .map_err(|error| ShellError::Action {
                    action: "toggle_read",
                    error,
                })
        });
    }

    /// Show the results of `query` for the current list.
    pub fn perform_search(&mut self, query: &str) {
        let path = match search_path(&self.route(), query) {
            Ok(path) => path,
            Err(violation) => {
                self.reporter.report(violation.into());
                return;
            }
        };
        tracing::debug!(query, path = %path, "Searching");
        let backend = Arc::clone(&self.backend);
        self.request("search", async move { backend.navigate(path).await });
    }

    /// Enter in the search entry: search for the local query if the entry is
    /// shown and the query is not empty.
    pub fn submit_search(&mut self) {
        if !self.controls().search_entry || self.search_query.is_empty() {
            tracing::debug!("Search submit ignored");
            return;
        }
        let query = self.search_query.clone();
        self.perform_search(&query);
    }

    /// Leave the article for its list, or the search for the searched list.
    pub fn up(&mut self) {
        let route = self.route();
        let Some(path) = up_path(&route) else {
            tracing::debug!(path = route.path(), "Nowhere to go up to");
            return;
        };
        if route.list_context() == Some(ListContext::Search) {
            self.search_query.clear();
        }
        let backend = Arc::clone(&self.backend);
        self.request("up", async move { backend.navigate(path).await });
    }

    /// Share the viewed article with `target_id`.
    ///
    /// Replaces any submission still waiting for its article. The request is
    /// sent once the article is in the last concrete article list.
    pub fn share_current_article(&mut self, target_id: i64) {
        let Some(target) = self.shares().find(target_id).cloned() else {
            self.reporter
                .report(InvariantViolation::UnknownShareTarget(target_id).into());
            return;
        };
        let Some(article_id) = self.article_id() else {
            self.reporter.report(InvariantViolation::NoCurrentArticle.into());
            return;
        };

        if let Some(handle) = self.share_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous share submission");
        }
        let generation = self.share_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.share_generation);

        tracing::debug!(target_id, article_id, generation, "Spawning share submission");

        let backend = Arc::clone(&self.backend);
        let mut articles = self.read_status.articles.subscribe();
        let handle = self.spawn_action("share", async move {
            let list = cached_list(&mut articles, |list| list.iter().any(|a| a.id == article_id))
                .await?;
            let article = find_article(&list, article_id)?;

            if current.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "Share superseded, not submitting");
                return Ok(());
            }
            backend
                .submit_share(target, article)
                .await
                .map_err(|error| ShellError::Action {
                    action: "share",
                    error,
                })
        });
        self.share_handle = Some(handle);
    }

    /// Collapse or expand a sidebar section.
    pub fn toggle_collapse(&self, key: CollapseKey) {
        self.sidebar.toggle(key);
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    /// Spawn a plain backend request.
    fn request<F>(&mut self, action: &'static str, request: F)
    where
        F: Future<Output = Result<(), UpstreamError>> + Send + 'static,
    {
        self.spawn_action(action, async move {
            request
                .await
                .map_err(|error| ShellError::Action { action, error })
        });
    }

    /// Run `task` as a registered subscription, reporting its error or panic.
    fn spawn_action<F>(&mut self, action: &'static str, task: F) -> AbortHandle
    where
        F: Future<Output = Result<(), ShellError>> + Send + 'static,
    {
        let reporter = self.reporter.clone();
        let subscription = Subscription::spawn(action, async move {
            match catch_task_panic(task).await {
                Ok(Ok(())) => tracing::debug!(action, "Action completed"),
                Ok(Err(error)) => reporter.report(error),
                Err(error) => {
                    tracing::error!(task = action, error = %error, "Action task panicked");
                    reporter.emit(ShellEvent::TaskPanicked {
                        task: action,
                        error,
                    });
                }
            }
        });
        let handle = subscription.abort_handle();
        self.subscriptions.register(subscription);
        handle
    }
}

/// Wait for a cached article list accepted by `accept`.
async fn cached_list(
    articles: &mut watch::Receiver<Option<ArticleList>>,
    mut accept: impl FnMut(&ArticleList) -> bool,
) -> Result<ArticleList, ShellError> {
    let list = articles
        .wait_for(|list| list.as_ref().is_some_and(&mut accept))
        .await
        .map_err(|_| articles_closed())?;
    list.clone().ok_or_else(articles_closed)
}

fn find_article(list: &ArticleList, article_id: i64) -> Result<Article, ShellError> {
    list.iter()
        .find(|a| a.id == article_id)
        .cloned()
        .ok_or_else(|| InvariantViolation::ArticleNotCached(article_id).into())
}

fn articles_closed() -> ShellError {
    ShellError::Transient {
        upstream: "articles",
        error: UpstreamError::Closed,
    }
}
