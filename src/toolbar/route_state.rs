use crate::events::Reporter;
use crate::model::{ListContext, RouteState};
use crate::reactive::{Input, Latest, Subscription, Upstream};
use std::sync::Arc;
use tokio::sync::watch;

/// Values derived from the current navigation.
///
/// Each cell publishes only on change and replays its latest value to new
/// subscribers.
#[derive(Debug, Clone, Default)]
pub struct RouteDerivation {
    route: Arc<Latest<RouteState>>,
    article_id: Arc<Latest<Option<i64>>>,
    shows_article: Arc<Latest<bool>>,
    list_context: Arc<Latest<Option<ListContext>>>,
}

impl RouteDerivation {
    /// Last successfully received route.
    pub fn route(&self) -> RouteState {
        self.route.get()
    }

    /// Id of the viewed article; `None` when no article (or a malformed id).
    pub fn article_id(&self) -> Option<i64> {
        self.article_id.get()
    }

    pub fn watch_article_id(&self) -> watch::Receiver<Option<i64>> {
        self.article_id.subscribe()
    }

    pub fn shows_article(&self) -> bool {
        self.shows_article.get()
    }

    pub fn watch_shows_article(&self) -> watch::Receiver<bool> {
        self.shows_article.subscribe()
    }

    /// Context of the list being viewed; `None` unless a list is shown.
    pub fn list_context(&self) -> Option<ListContext> {
        self.list_context.get()
    }

    pub fn watch_list_context(&self) -> watch::Receiver<Option<ListContext>> {
        self.list_context.subscribe()
    }

    pub fn in_search(&self) -> bool {
        self.list_context() == Some(ListContext::Search)
    }

    fn apply(&self, route: &RouteState) {
        let article_id = route.article_id();
        if self.article_id.set_if_changed(article_id) {
            tracing::debug!(?article_id, "Current article changed");
        }
        self.shows_article.set_if_changed(route.is_article());
        self.list_context.set_if_changed(route.list_context());
        self.route.set_if_changed(route.clone());
    }
}

/// Start deriving article id and list context from `navigation`.
pub fn spawn(
    navigation: Upstream<RouteState>,
    reporter: Reporter,
) -> (RouteDerivation, Subscription) {
    let derivation = RouteDerivation::default();
    let out = derivation.clone();
    let mut input = Input::new("navigation", navigation);

    let subscription = Subscription::spawn("route", async move {
        if input.absorb(&reporter) {
            if let Some(route) = input.latest() {
                out.apply(route);
            }
        }
        while input.changed().await.is_ok() {
            if input.absorb(&reporter) {
                if let Some(route) = input.latest() {
                    out.apply(route);
                }
            }
        }
        tracing::debug!("Navigation upstream closed");
    });

    (derivation, subscription)
}
