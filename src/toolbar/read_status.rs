//! Read flag of the article being viewed, with delayed "became read".
//!
//! Switching to an article surfaces its first observed flag at once. After
//! that, a change to "unread" is surfaced at once while a change to "read"
//! waits [`READ_DEBOUNCE`], so the title does not dim the instant the
//! article is opened.
//!
//! Every switch advances a generation counter. A pending delayed value
//! carries the generation it was scheduled under and is dropped if the
//! generation has moved on; the timer itself is cancelled on the switch.
//!
//! The component also keeps the last concrete article list it has seen, so
//! actions can act on it while the cache upstream is failing.

use crate::events::Reporter;
use crate::model::{ArticleList, ArticleSnapshot};
use crate::reactive::{Input, Latest, Subscription, Upstream};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Delay before a transition to "read" is surfaced.
pub const READ_DEBOUNCE: Duration = Duration::from_millis(1000);

// ============================================================================
// Policy
// ============================================================================

/// A "read" waiting to be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRead {
    pub generation: u64,
    pub due: Instant,
}

/// What to do with an observed read flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Surface this value now.
    Surface(bool),
    /// A "read" is scheduled for this instant.
    Defer(Instant),
    /// Nothing to surface.
    Hold,
}

/// Timing policy for the viewed article's read flag, independent of any
/// runtime so it can be driven directly.
#[derive(Debug, Default)]
pub struct ReadDebounce {
    generation: u64,
    article: Option<i64>,
    awaiting_first: bool,
    surfaced: bool,
    pending: Option<PendingRead>,
}

impl ReadDebounce {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn article(&self) -> Option<i64> {
        self.article
    }

    pub fn pending(&self) -> Option<PendingRead> {
        self.pending
    }

    /// Start tracking `article`, cancelling anything pending for the
    /// previous one.
    ///
    /// Returns the value to surface immediately: `false` when no article is
    /// viewed, nothing otherwise (the first observation decides).
    pub fn switch_to(&mut self, article: Option<i64>) -> Option<bool> {
        self.generation = self.generation.wrapping_add(1);
        if let Some(pending) = self.pending.take() {
            tracing::debug!(
                generation = pending.generation,
                "Cancelled delayed read for superseded article"
            );
        }
        self.article = article;

        match article {
            None => {
                self.awaiting_first = false;
                self.surfaced = false;
                Some(false)
            }
            Some(_) => {
                self.awaiting_first = true;
                None
            }
        }
    }

    /// Record an observed read flag for the tracked article.
    ///
    /// Any observation supersedes a pending "read": an "unread" cancels it,
    /// a repeated "read" keeps its original due time.
    pub fn observe(&mut self, read: bool, now: Instant) -> Decision {
        if self.article.is_none() {
            return Decision::Hold;
        }

        if self.awaiting_first {
            self.awaiting_first = false;
            self.surfaced = read;
            return Decision::Surface(read);
        }

        if !read {
            self.pending = None;
            self.surfaced = false;
            return Decision::Surface(false);
        }

        if let Some(pending) = self.pending {
            return Decision::Defer(pending.due);
        }
        if self.surfaced {
            return Decision::Hold;
        }

        let due = now + READ_DEBOUNCE;
        self.pending = Some(PendingRead {
            generation: self.generation,
            due,
        });
        Decision::Defer(due)
    }

    /// Timer expiry for a read scheduled under `generation`.
    ///
    /// Returns the value to surface, or `None` if the read was superseded.
    pub fn fire(&mut self, generation: u64) -> Option<bool> {
        match self.pending {
            Some(pending) if pending.generation == generation && generation == self.generation => {
                self.pending = None;
                self.surfaced = true;
                Some(true)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Component
// ============================================================================

/// Cells published by the read status component.
#[derive(Debug, Clone)]
pub struct ReadStatus {
    /// Surfaced read flag of the viewed article.
    pub read: Arc<Latest<bool>>,
    /// Last concrete article list. `None` until the cache first publishes
    /// one; loading and failures leave it as it was.
    pub articles: Arc<Latest<Option<ArticleList>>>,
}

/// Start tracking the read flag of the article named by `article_id`.
pub fn spawn(
    article_id: watch::Receiver<Option<i64>>,
    articles: Upstream<ArticleSnapshot>,
    reporter: Reporter,
) -> (ReadStatus, Subscription) {
    let status = ReadStatus {
        read: Arc::new(Latest::new(false)),
        articles: Arc::new(Latest::new(None)),
    };
    let task = ReadStatusTask {
        article_id,
        articles: Input::new("articles", articles),
        policy: ReadDebounce::default(),
        status: status.clone(),
        reporter,
    };
    (status, Subscription::spawn("read_status", task.run()))
}

struct ReadStatusTask {
    article_id: watch::Receiver<Option<i64>>,
    articles: Input<ArticleSnapshot>,
    policy: ReadDebounce,
    status: ReadStatus,
    reporter: Reporter,
}

impl ReadStatusTask {
    async fn run(mut self) {
        if self.articles.absorb(&self.reporter) {
            self.keep_list();
        }
        let initial = *self.article_id.borrow_and_update();
        self.switch(initial);

        loop {
            let pending = self.policy.pending();
            let due = pending.map_or_else(Instant::now, |p| p.due);

            tokio::select! {
                biased;  // A switch must win over a timer that is due at the same time

                Ok(()) = self.article_id.changed() => {
                    let id = *self.article_id.borrow_and_update();
                    self.switch(id);
                }
                Ok(()) = self.articles.changed() => {
                    if self.articles.absorb(&self.reporter) {
                        self.keep_list();
                        self.observe();
                    }
                }
                () = tokio::time::sleep_until(due), if pending.is_some() => {
                    if let Some(pending) = pending {
                        if let Some(value) = self.policy.fire(pending.generation) {
                            tracing::debug!(generation = pending.generation, "Delayed read surfaced");
                            self.status.read.set_if_changed(value);
                        }
                    }
                }
                else => break,
            }
        }

        tracing::debug!("Read status inputs closed");
    }

    fn switch(&mut self, article: Option<i64>) {
        // Judge the new article against the freshest list, not a stale one.
        if self.articles.refresh(&self.reporter) {
            self.keep_list();
        }
        if let Some(value) = self.policy.switch_to(article) {
            self.status.read.set_if_changed(value);
        }
        tracing::debug!(
            ?article,
            generation = self.policy.generation(),
            "Tracking read status"
        );
        self.observe();
    }

    fn keep_list(&self) {
        if let Some(ArticleSnapshot::Ready(list)) = self.articles.latest() {
            self.status.articles.replace(Some(Arc::clone(list)));
        }
    }

    /// Look up the tracked article in the latest concrete article list.
    /// While the cache is loading nothing is observed.
    fn observe(&mut self) {
        let Some(id) = self.policy.article() else {
            return;
        };
        let Some(snapshot) = self.articles.latest().filter(|s| !s.is_loading()) else {
            return;
        };
        let read = snapshot.find(id).is_some_and(|a| a.read);

        match self.policy.observe(read, Instant::now()) {
            Decision::Surface(value) => {
                self.status.read.set_if_changed(value);
            }
            Decision::Defer(due) => {
                tracing::debug!(article_id = id, ?due, "Read transition deferred");
            }
            Decision::Hold => {}
        }
    }
}
