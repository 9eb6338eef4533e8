//! JSON fixtures standing in for the feed reader's services.
//!
//! A fixture is one snapshot of every upstream:
//!
//! ```json
//! {
//!   "features": { "popularity": true, "search": true },
//!   "feeds": [{ "id": 1, "title": "Alpha", "link": "https://alpha.example" }],
//!   "tags": [{ "tag": { "id": 5, "value": "News" }, "ids": [1] }],
//!   "articles": [{ "id": 9, "feed_id": 1, "title": "Hello", "read": false }],
//!   "share_targets": [{ "id": 1, "name": "Mail" }],
//!   "route": "/feed/1/article/9"
//! }
//! ```
//!
//! Omitted `features` fall back to the configured defaults; `"articles": null`
//! (or omitting it) leaves the article cache loading.

use crate::model::{
    Article, ArticleSnapshot, FeatureFlags, Feed, RouteState, ShareTarget, TagFeedIds,
};
use crate::shell::Publishers;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fixture {
    pub features: Option<FeatureFlags>,
    pub feeds: Vec<Feed>,
    pub tags: Vec<TagFeedIds>,
    pub articles: Option<Vec<Article>>,
    pub share_targets: Vec<ShareTarget>,
    pub route: String,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture '{}'", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid fixture '{}'", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(content)?;
        tracing::debug!(
            feeds = fixture.feeds.len(),
            tags = fixture.tags.len(),
            articles = fixture.articles.as_ref().map(Vec::len),
            "Parsed fixture"
        );
        Ok(fixture)
    }

    /// Publish every snapshot. `default_features` applies when the fixture
    /// has none of its own.
    pub fn publish(&self, publishers: &Publishers, default_features: FeatureFlags) {
        publishers
            .features
            .publish(self.features.unwrap_or(default_features));
        publishers.feeds.publish(Arc::new(self.feeds.clone()));
        publishers.tags.publish(Arc::new(self.tags.clone()));
        publishers.articles.publish(match &self.articles {
            Some(articles) => ArticleSnapshot::ready(articles.clone()),
            None => ArticleSnapshot::Loading,
        });
        publishers
            .share_targets
            .publish(Arc::new(self.share_targets.clone()));
        publishers
            .navigation
            .publish(RouteState::from_path(&self.route));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Emission;

    #[test]
    fn test_empty_object_is_default() {
        let fixture = Fixture::parse("{}").unwrap();
        assert_eq!(fixture, Fixture::default());
        assert!(fixture.articles.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Fixture::parse(r#"{"feedz": []}"#).unwrap_err();
        assert!(err.to_string().contains("feedz"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = Fixture::load(Path::new("/tmp/navshell_missing_fixture.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read fixture"));
    }

    #[test]
    fn test_publish_uses_default_features_and_loading() {
        let fixture = Fixture::parse(r#"{"route": "/favorite"}"#).unwrap();
        let publishers = Publishers::new();
        let defaults = FeatureFlags {
            popularity: false,
            search: true,
        };
        fixture.publish(&publishers, defaults);

        assert_eq!(publishers.features.get(), Emission::Value(defaults));
        assert_eq!(
            publishers.articles.get(),
            Emission::Value(ArticleSnapshot::Loading)
        );
        assert_eq!(
            publishers.navigation.get(),
            Emission::Value(RouteState::from_path("/favorite"))
        );
    }
}
