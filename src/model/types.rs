use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Upstream Snapshots
// ============================================================================

/// Subscribed content source, as published by the feed service.
///
/// Snapshots are immutable; a changed feed arrives as a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub title: String,
    /// Canonical site link (used for favicons by the view layer).
    #[serde(default)]
    pub link: String,
}

/// User-defined label grouping a set of feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub value: String,
}

/// A tag together with the ordered feed ids it covers.
///
/// The order of `ids` is the display order of the category's items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFeedIds {
    pub tag: Tag,
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Article entry as held by the article cache.
///
/// Only `id` and `read` matter to the composition; the rest is carried
/// through untouched for share submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    #[serde(default)]
    pub feed_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub read: bool,
}

/// State of the article cache.
///
/// `Loading` is distinct from an empty list: while loading, nothing can be
/// said about any article's read flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSnapshot {
    Loading,
    Ready(ArticleList),
}

impl ArticleSnapshot {
    pub fn ready(articles: Vec<Article>) -> Self {
        Self::Ready(Arc::new(articles))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Find an article by id. Always `None` while loading.
    pub fn find(&self, id: i64) -> Option<&Article> {
        match self {
            Self::Loading => None,
            Self::Ready(articles) => articles.iter().find(|a| a.id == id),
        }
    }
}

/// Capabilities switched on by the server.
///
/// Missing keys deserialize as disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub popularity: bool,
    pub search: bool,
}

/// An enabled sharing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareTarget {
    pub id: i64,
    pub name: String,
}

/// Concrete article list held by the cache.
pub type ArticleList = Arc<Vec<Article>>;

/// Feed snapshot as published upstream.
pub type FeedList = Arc<Vec<Feed>>;

/// Tag snapshot as published upstream.
pub type TagList = Arc<Vec<TagFeedIds>>;

/// Share target snapshot as published upstream.
pub type ShareTargetList = Arc<Vec<ShareTarget>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, read: bool) -> Article {
        Article {
            id,
            feed_id: 1,
            title: format!("Article {}", id),
            read,
        }
    }

    #[test]
    fn test_find_in_ready_snapshot() {
        let snapshot = ArticleSnapshot::ready(vec![article(1, false), article(2, true)]);
        assert!(snapshot.find(2).is_some_and(|a| a.read));
        assert!(snapshot.find(3).is_none());
    }

    #[test]
    fn test_loading_snapshot_finds_nothing() {
        assert!(ArticleSnapshot::Loading.find(1).is_none());
        assert!(ArticleSnapshot::Loading.is_loading());
        assert!(!ArticleSnapshot::ready(Vec::new()).is_loading());
    }

    #[test]
    fn test_feature_flags_default_missing_keys() {
        let flags: FeatureFlags = serde_json::from_str(r#"{"search": true}"#).unwrap();
        assert!(flags.search);
        assert!(!flags.popularity);
    }
}
