//! Navigation state as seen by the toolbar.
//!
//! The router itself is external; this module only classifies the state it
//! publishes and provides a small path classifier for fixtures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path segment introducing an article id.
pub const ARTICLE_SEGMENT: &str = "/article/";

/// Path segment introducing a search query.
pub const SEARCH_SEGMENT: &str = "/search/";

/// Which kind of article list is being shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListContext {
    #[default]
    Default,
    Favorite,
    Popular,
    Search,
}

impl ListContext {
    /// Parse a route's context name. Unknown names are plain lists.
    pub fn from_name(name: &str) -> Self {
        match name {
            "favorite" => Self::Favorite,
            "popular" => Self::Popular,
            "search" => Self::Search,
            _ => Self::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Favorite => "favorite",
            Self::Popular => "popular",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for ListContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current navigation target.
///
/// `article` holds the raw route parameter; it is parsed lazily so that a
/// malformed id degrades to "no article" instead of failing the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouteState {
    #[default]
    None,
    List {
        path: String,
        context: ListContext,
    },
    Article {
        path: String,
        article: String,
    },
}

impl RouteState {
    /// Classify a location path.
    ///
    /// `/article/<x>` anywhere makes it an article route. Otherwise a
    /// `/search/` segment wins over the context named by the first segment
    /// (`/favorite/..`, `/popular/..`).
    pub fn from_path(path: &str) -> Self {
        let path = path.trim();
        if path.is_empty() {
            return Self::None;
        }

        if let Some(idx) = path.find(ARTICLE_SEGMENT) {
            let article = path[idx + ARTICLE_SEGMENT.len()..]
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string();
            return Self::Article {
                path: path.to_string(),
                article,
            };
        }

        let context = if path.contains(SEARCH_SEGMENT) {
            ListContext::Search
        } else {
            let first = path.trim_start_matches('/').split('/').next();
            ListContext::from_name(first.unwrap_or_default())
        };

        Self::List {
            path: path.to_string(),
            context,
        }
    }

    /// Id of the viewed article. Malformed or negative ids yield `None`.
    pub fn article_id(&self) -> Option<i64> {
        match self {
            Self::Article { article, .. } => article.parse::<i64>().ok().filter(|id| *id >= 0),
            _ => None,
        }
    }

    pub fn is_article(&self) -> bool {
        matches!(self, Self::Article { .. })
    }

    /// Context of the list being viewed, `None` unless this is a list route.
    pub fn list_context(&self) -> Option<ListContext> {
        match self {
            Self::List { context, .. } => Some(*context),
            _ => None,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::None => "",
            Self::List { path, .. } | Self::Article { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_is_none() {
        assert_eq!(RouteState::from_path(""), RouteState::None);
        assert_eq!(RouteState::from_path("   "), RouteState::None);
    }

    #[test]
    fn test_article_route_parses_id() {
        let route = RouteState::from_path("/feed/5/article/42");
        assert!(route.is_article());
        assert_eq!(route.article_id(), Some(42));
        assert_eq!(route.list_context(), None);
    }

    #[test]
    fn test_malformed_article_id_degrades_to_none() {
        let route = RouteState::from_path("/feed/5/article/abc");
        assert!(route.is_article());
        assert_eq!(route.article_id(), None);

        let negative = RouteState::from_path("/feed/5/article/-3");
        assert_eq!(negative.article_id(), None);
    }

    #[test]
    fn test_list_contexts() {
        assert_eq!(
            RouteState::from_path("/favorite").list_context(),
            Some(ListContext::Favorite)
        );
        assert_eq!(
            RouteState::from_path("/popular/tag/3").list_context(),
            Some(ListContext::Popular)
        );
        assert_eq!(
            RouteState::from_path("/favorite/search/rust").list_context(),
            Some(ListContext::Search)
        );
        assert_eq!(
            RouteState::from_path("/feed/7").list_context(),
            Some(ListContext::Default)
        );
        assert_eq!(
            RouteState::from_path("/favorites/7").list_context(),
            Some(ListContext::Default)
        );
    }

    #[test]
    fn test_unknown_context_name_is_default() {
        assert_eq!(ListContext::from_name("tag"), ListContext::Default);
        assert_eq!(ListContext::from_name("search"), ListContext::Search);
    }

    #[test]
    fn test_route_deserializes_from_tagged_json() {
        let route: RouteState =
            serde_json::from_str(r#"{"kind": "list", "path": "/popular", "context": "popular"}"#)
                .unwrap();
        assert_eq!(route.list_context(), Some(ListContext::Popular));
        assert_eq!(route.path(), "/popular");
    }
}
