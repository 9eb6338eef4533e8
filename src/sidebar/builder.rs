use super::collate::LocaleOrder;
use crate::error::MissingReferenceError;
use crate::model::{FeatureFlags, Feed, Tag, TagFeedIds};
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// View Model
// ============================================================================

/// Leaf entry of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: i64,
    pub link: String,
    pub title: String,
    /// Site link of the underlying feed; absent for tag entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Item {
    /// Entry in the popularity list for a tag. The id is negated so it can
    /// never collide with a feed id.
    fn popular_tag(tag: &Tag) -> Self {
        Self {
            id: -tag.id,
            link: format!("/popular/tag/{}", tag.id),
            title: tag.value.clone(),
            url: None,
        }
    }

    fn popular_feed(feed: &Feed) -> Self {
        Self {
            id: feed.id,
            link: format!("/popular/feed/{}", feed.id),
            title: feed.title.clone(),
            url: Some(feed.link.clone()),
        }
    }

    fn feed(feed: &Feed) -> Self {
        Self {
            id: feed.id,
            link: format!("/feed/{}", feed.id),
            title: feed.title.clone(),
            url: Some(feed.link.clone()),
        }
    }

    /// Entry inside a category. The link is the bare feed id, which lets the
    /// view tell it apart from a top-level feed link.
    fn category_member(feed: &Feed) -> Self {
        Self {
            id: feed.id,
            link: feed.id.to_string(),
            title: feed.title.clone(),
            url: Some(feed.link.clone()),
        }
    }
}

/// A tag rendered as a collapsible group of feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub link: String,
    pub title: String,
    pub items: Vec<Item>,
}

/// Everything the sidebar shows, rebuilt from scratch on every upstream change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarModel {
    /// Popular tags followed by popular feeds; `None` when the feature is off.
    pub popularity: Option<Vec<Item>>,
    pub all_items: Vec<Item>,
    pub categories: Vec<Category>,
    /// Categories left out because they reference unknown feeds.
    pub problems: Vec<MissingReferenceError>,
}

// ============================================================================
// Builder
// ============================================================================

/// Build the sidebar from the latest feature flags, feeds, and tags.
///
/// Feeds sort by title and tags by value, both locale-aware; sorting is
/// stable, so equal titles keep upstream order. A category's items follow
/// the tag's own id order. A tag naming a feed that is not in `feeds` fails
/// only its own category, which is omitted and recorded in `problems`.
pub fn build(features: &FeatureFlags, feeds: &[Feed], tags: &[TagFeedIds]) -> SidebarModel {
    let mut order = LocaleOrder::new();

    let mut feeds: Vec<&Feed> = feeds.iter().collect();
    feeds.sort_by(|a, b| order.compare(&a.title, &b.title));

    let mut tags: Vec<&TagFeedIds> = tags.iter().collect();
    tags.sort_by(|a, b| order.compare(&a.tag.value, &b.tag.value));

    let popularity = features.popularity.then(|| {
        let mut items: Vec<Item> = tags.iter().map(|t| Item::popular_tag(&t.tag)).collect();
        items.extend(feeds.iter().map(|f| Item::popular_feed(f)));
        items
    });

    let all_items = feeds.iter().map(|f| Item::feed(f)).collect();

    let by_id: HashMap<i64, &Feed> = feeds.iter().map(|f| (f.id, *f)).collect();
    let mut categories = Vec::with_capacity(tags.len());
    let mut problems = Vec::new();
    for entry in tags {
        match build_category(entry, &by_id) {
            Ok(category) => categories.push(category),
            Err(missing) => problems.push(missing),
        }
    }

    SidebarModel {
        popularity,
        all_items,
        categories,
        problems,
    }
}

fn build_category(
    entry: &TagFeedIds,
    feeds: &HashMap<i64, &Feed>,
) -> Result<Category, MissingReferenceError> {
    let items = entry
        .ids
        .iter()
        .map(|&feed_id| {
            feeds
                .get(&feed_id)
                .map(|feed| Item::category_member(feed))
                .ok_or(MissingReferenceError {
                    tag_id: entry.tag.id,
                    feed_id,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Category {
        id: entry.tag.id,
        link: format!("/tag/{}", entry.tag.id),
        title: entry.tag.value.clone(),
        items,
    })
}
