mod route;
mod types;

pub use route::{ListContext, RouteState, ARTICLE_SEGMENT, SEARCH_SEGMENT};
pub use types::{
    Article, ArticleList, ArticleSnapshot, FeatureFlags, Feed, FeedList, ShareTarget, ShareTargetList, Tag,
    TagFeedIds, TagList,
};
