use crate::events::{Reporter, ShellEvent};
use crate::model::{FeatureFlags, ListContext};
use crate::reactive::{Input, Latest, Subscription, Upstream};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Which search and bulk controls the toolbar shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControlVisibility {
    pub search_button: bool,
    pub search_entry: bool,
    pub mark_all_read: bool,
}

impl ControlVisibility {
    pub const HIDDEN: Self = Self {
        search_button: false,
        search_entry: false,
        mark_all_read: false,
    };

    /// Resolve the controls for the current view.
    ///
    /// Everything is hidden while an article is shown, when search is
    /// disabled, or when no list is shown. The popular list hides every
    /// control; a search list shows the entry but not mark-all-read.
    pub fn resolve(search_enabled: bool, shows_article: bool, list: Option<ListContext>) -> Self {
        if !search_enabled || shows_article {
            return Self::HIDDEN;
        }
        match list {
            None | Some(ListContext::Popular) => Self::HIDDEN,
            Some(ListContext::Search) => Self {
                search_button: true,
                search_entry: true,
                mark_all_read: false,
            },
            Some(ListContext::Favorite) | Some(ListContext::Default) => Self {
                search_button: true,
                search_entry: false,
                mark_all_read: true,
            },
        }
    }
}

/// Start resolving control visibility.
///
/// Each time the search entry appears, [`ShellEvent::FocusSearchInput`] is
/// emitted after `focus_delay`, unless the entry disappears first.
///
/// `features` is shared with the sidebar, which reports its failures.
/// Here a failure only keeps the last flags.
pub fn spawn(
    features: Upstream<FeatureFlags>,
    shows_article: watch::Receiver<bool>,
    list_context: watch::Receiver<Option<ListContext>>,
    reporter: Reporter,
    focus_delay: Duration,
) -> (Arc<Latest<ControlVisibility>>, Subscription) {
    let controls = Arc::new(Latest::new(ControlVisibility::HIDDEN));
    let task = VisibilityTask {
        features: Input::follower("features", features),
        shows_article,
        list_context,
        controls: Arc::clone(&controls),
        focus_delay,
        focus_due: None,
        reporter,
    };
    (controls, Subscription::spawn("visibility", task.run()))
}

struct VisibilityTask {
    features: Input<FeatureFlags>,
    shows_article: watch::Receiver<bool>,
    list_context: watch::Receiver<Option<ListContext>>,
    controls: Arc<Latest<ControlVisibility>>,
    focus_delay: Duration,
    focus_due: Option<Instant>,
    reporter: Reporter,
}

impl VisibilityTask {
    async fn run(mut self) {
        self.features.absorb(&self.reporter);
        self.shows_article.borrow_and_update();
        self.list_context.borrow_and_update();
        self.resolve();

        loop {
            let focus_due = self.focus_due;
            let due = focus_due.unwrap_or_else(Instant::now);

            tokio::select! {
                Ok(()) = self.features.changed() => {
                    if self.features.absorb(&self.reporter) {
                        self.resolve();
                    }
                }
                Ok(()) = self.shows_article.changed() => {
                    self.shows_article.borrow_and_update();
                    self.resolve();
                }
                Ok(()) = self.list_context.changed() => {
                    self.list_context.borrow_and_update();
                    self.resolve();
                }
                () = tokio::time::sleep_until(due), if focus_due.is_some() => {
                    self.focus_due = None;
                    tracing::debug!("Focusing search input");
                    self.reporter.emit(ShellEvent::FocusSearchInput);
                }
                else => break,
            }
        }

        tracing::debug!("Visibility inputs closed");
    }

    fn resolve(&mut self) {
        let search_enabled = self.features.latest().is_some_and(|f| f.search);
        let next = ControlVisibility::resolve(
            search_enabled,
            *self.shows_article.borrow(),
            *self.list_context.borrow(),
        );
        let previous = self.controls.get();
        if !self.controls.set_if_changed(next) {
            return;
        }
        tracing::debug!(
            search_button = next.search_button,
            search_entry = next.search_entry,
            mark_all_read = next.mark_all_read,
            "Toolbar controls changed"
        );

        match (previous.search_entry, next.search_entry) {
            (false, true) => self.focus_due = Some(Instant::now() + self.focus_delay),
            (true, false) => {
                if self.focus_due.take().is_some() {
                    tracing::debug!("Search entry hidden, pending focus cancelled");
                }
            }
            _ => {}
        }
    }
}
