use crate::error::UpstreamError;
use crate::model::{ArticleSnapshot, FeatureFlags, FeedList, RouteState, ShareTargetList, TagList};
use crate::reactive::{Emission, Latest, Upstream};

/// Every upstream the shell consumes.
#[derive(Debug, Clone)]
pub struct Sources {
    pub features: Upstream<FeatureFlags>,
    pub feeds: Upstream<FeedList>,
    pub tags: Upstream<TagList>,
    pub articles: Upstream<ArticleSnapshot>,
    pub navigation: Upstream<RouteState>,
    pub share_targets: Upstream<ShareTargetList>,
}

/// In-memory publishing side of [`Sources`].
///
/// Stands in for the real services: whatever is published here is what the
/// shell sees. Dropping it closes every upstream.
#[derive(Debug)]
pub struct Publishers {
    pub features: Latest<Emission<FeatureFlags>>,
    pub feeds: Latest<Emission<FeedList>>,
    pub tags: Latest<Emission<TagList>>,
    pub articles: Latest<Emission<ArticleSnapshot>>,
    pub navigation: Latest<Emission<RouteState>>,
    pub share_targets: Latest<Emission<ShareTargetList>>,
}

impl Publishers {
    /// All upstreams pending.
    pub fn new() -> Self {
        Self {
            features: Latest::pending(),
            feeds: Latest::pending(),
            tags: Latest::pending(),
            articles: Latest::pending(),
            navigation: Latest::pending(),
            share_targets: Latest::pending(),
        }
    }

    pub fn sources(&self) -> Sources {
        Sources {
            features: self.features.subscribe(),
            feeds: self.feeds.subscribe(),
            tags: self.tags.subscribe(),
            articles: self.articles.subscribe(),
            navigation: self.navigation.subscribe(),
            share_targets: self.share_targets.subscribe(),
        }
    }

    /// Navigate to `path`.
    pub fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigation published");
        self.navigation.publish(RouteState::from_path(path));
    }

    /// Report a transient failure on every upstream at once.
    pub fn fail_all(&self, error: UpstreamError) {
        self.features.fail(error.clone());
        self.feeds.fail(error.clone());
        self.tags.fail(error.clone());
        self.articles.fail(error.clone());
        self.navigation.fail(error.clone());
        self.share_targets.fail(error);
    }
}

impl Default for Publishers {
    fn default() -> Self {
        Self::new()
    }
}
