//! Integration tests for the composed shell: sidebar and toolbar view models
//! derived from in-memory upstreams.
//!
//! Each test publishes its own snapshots through `Publishers` and inspects
//! the shell's derived state after the component tasks have settled.

use navshell::model::{Article, ArticleSnapshot, FeatureFlags, Feed, ListContext, Tag, TagFeedIds};
use navshell::sidebar::CollapseKey;
use navshell::toolbar::ControlVisibility;
use navshell::{
    Config, Publishers, RecordingBackend, Shell, ShellError, ShellEvent, UpstreamError,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Helpers
// ============================================================================

fn feed(id: i64, title: &str) -> Feed {
    Feed {
        id,
        title: title.to_string(),
        link: format!("https://{}.example", title.to_lowercase()),
    }
}

fn article(id: i64, read: bool) -> Article {
    Article {
        id,
        feed_id: 1,
        title: format!("Article {}", id),
        read,
    }
}

fn publish_articles(publishers: &Publishers, articles: Vec<Article>) {
    publishers.articles.publish(ArticleSnapshot::ready(articles));
}

/// Publishers with two feeds, one tag, and two unread articles.
fn seeded(search: bool) -> Publishers {
    let publishers = Publishers::new();
    publishers.features.publish(FeatureFlags {
        popularity: true,
        search,
    });
    publishers
        .feeds
        .publish(Arc::new(vec![feed(2, "Zeta"), feed(1, "Alpha")]));
    publishers.tags.publish(Arc::new(vec![TagFeedIds {
        tag: Tag {
            id: 5,
            value: "News".to_string(),
        },
        ids: vec![1, 2],
    }]));
    publish_articles(&publishers, vec![article(1, false), article(2, false)]);
    publishers.share_targets.publish(Arc::new(vec![]));
    publishers
}

fn start(publishers: &Publishers) -> (Shell<RecordingBackend>, mpsc::Receiver<ShellEvent>) {
    Shell::start(
        publishers.sources(),
        Arc::new(RecordingBackend::new()),
        &Config::default(),
    )
}

/// Let every component task react to what was just published.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

fn drain(events: &mut mpsc::Receiver<ShellEvent>) -> Vec<ShellEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

// ============================================================================
// Sidebar
// ============================================================================

#[tokio::test]
async fn test_sidebar_built_from_upstreams() {
    let publishers = seeded(false);
    let (shell, _events) = start(&publishers);
    publishers.navigate("/feed/1");
    settle().await;

    let sidebar = shell.sidebar();
    let titles: Vec<&str> = sidebar.all_items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Zeta"]);

    assert_eq!(sidebar.categories.len(), 1);
    let members: Vec<&str> = sidebar.categories[0]
        .items
        .iter()
        .map(|i| i.link.as_str())
        .collect();
    assert_eq!(members, vec!["1", "2"]);

    let popular: Vec<&str> = sidebar
        .popularity
        .as_ref()
        .map(|items| items.iter().map(|i| i.link.as_str()).collect())
        .unwrap_or_default();
    assert_eq!(
        popular,
        vec!["/popular/tag/5", "/popular/feed/1", "/popular/feed/2"]
    );
}

#[tokio::test]
async fn test_collapse_toggle_survives_data_refresh() {
    let publishers = seeded(false);
    let (shell, _events) = start(&publishers);
    settle().await;

    shell.toggle_collapse(CollapseKey::Category(5));
    shell.toggle_collapse(CollapseKey::All);
    settle().await;

    publishers.tags.publish(Arc::new(vec![
        TagFeedIds {
            tag: Tag {
                id: 5,
                value: "News".to_string(),
            },
            ids: vec![1],
        },
        TagFeedIds {
            tag: Tag {
                id: 6,
                value: "Tech".to_string(),
            },
            ids: vec![2],
        },
    ]));
    settle().await;

    let json = serde_json::to_string(&shell.collapse_state()).unwrap();
    assert_eq!(json, r#"{"__popularity":true,"__all":false,"5":true,"6":false}"#);
}

#[tokio::test]
async fn test_missing_feed_reported_as_inconsistency() {
    let publishers = seeded(false);
    publishers.tags.publish(Arc::new(vec![TagFeedIds {
        tag: Tag {
            id: 7,
            value: "Broken".to_string(),
        },
        ids: vec![1, 404],
    }]));
    let (shell, mut events) = start(&publishers);
    settle().await;

    assert!(shell.sidebar().categories.is_empty());
    assert_eq!(shell.sidebar().all_items.len(), 2);
    let inconsistencies: Vec<ShellEvent> = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, ShellEvent::Error(ShellError::DataInconsistency(_))))
        .collect();
    assert_eq!(inconsistencies.len(), 1);
}

// ============================================================================
// Toolbar
// ============================================================================

#[tokio::test]
async fn test_controls_follow_route() {
    let publishers = seeded(true);
    let (shell, _events) = start(&publishers);

    publishers.navigate("/favorite");
    settle().await;
    assert_eq!(
        shell.controls(),
        ControlVisibility {
            search_button: true,
            search_entry: false,
            mark_all_read: true,
        }
    );

    publishers.navigate("/popular/feed/1");
    settle().await;
    assert_eq!(shell.controls(), ControlVisibility::HIDDEN);

    publishers.navigate("/feed/1/search/rust");
    settle().await;
    assert!(shell.in_search());
    assert_eq!(
        shell.controls(),
        ControlVisibility {
            search_button: true,
            search_entry: true,
            mark_all_read: false,
        }
    );

    publishers.navigate("/feed/1/search/rust/article/2");
    settle().await;
    assert!(shell.shows_article());
    assert_eq!(shell.controls(), ControlVisibility::HIDDEN);
}

#[tokio::test]
async fn test_search_disabled_hides_controls_on_favorite() {
    let publishers = seeded(false);
    let (shell, _events) = start(&publishers);
    publishers.navigate("/favorite");
    settle().await;

    assert_eq!(shell.route().list_context(), Some(ListContext::Favorite));
    assert_eq!(shell.controls(), ControlVisibility::HIDDEN);
}

#[tokio::test(start_paused = true)]
async fn test_search_entry_requests_focus() {
    let publishers = seeded(true);
    let (_shell, mut events) = start(&publishers);
    publishers.navigate("/feed/1/search/rust");
    settle().await;
    assert!(!drain(&mut events).contains(&ShellEvent::FocusSearchInput));

    tokio::time::advance(Duration::from_millis(10)).await;
    settle().await;
    assert!(drain(&mut events).contains(&ShellEvent::FocusSearchInput));
}

#[tokio::test(start_paused = true)]
async fn test_read_flag_debounced_through_shell() {
    let publishers = seeded(false);
    let (shell, _events) = start(&publishers);
    publishers.navigate("/feed/1/article/1");
    settle().await;
    assert_eq!(shell.article_id(), Some(1));
    assert!(!shell.article_read());

    publish_articles(&publishers, vec![article(1, true), article(2, false)]);
    settle().await;
    tokio::time::advance(Duration::from_millis(999)).await;
    settle().await;
    assert!(!shell.article_read());

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert!(shell.article_read());

    // Back to unread: no delay
    publish_articles(&publishers, vec![article(1, false), article(2, false)]);
    settle().await;
    assert!(!shell.article_read());
}

#[tokio::test(start_paused = true)]
async fn test_switching_article_cancels_pending_read() {
    let publishers = seeded(false);
    let (shell, _events) = start(&publishers);
    publishers.navigate("/feed/1/article/1");
    settle().await;

    publish_articles(&publishers, vec![article(1, true), article(2, false)]);
    settle().await;
    tokio::time::advance(Duration::from_millis(500)).await;
    settle().await;

    publishers.navigate("/feed/1/article/2");
    settle().await;
    tokio::time::advance(Duration::from_millis(2000)).await;
    settle().await;

    assert_eq!(shell.article_id(), Some(2));
    assert!(!shell.article_read());
}

#[tokio::test]
async fn test_read_flag_waits_while_loading() {
    let publishers = seeded(false);
    publishers.articles.publish(ArticleSnapshot::Loading);
    let (shell, _events) = start(&publishers);
    publishers.navigate("/feed/1/article/1");
    settle().await;
    assert!(!shell.article_read());

    publish_articles(&publishers, vec![article(1, true)]);
    settle().await;
    assert!(shell.article_read());
}

#[tokio::test]
async fn test_share_targets_mirrored() {
    let publishers = seeded(false);
    let (shell, _events) = start(&publishers);
    settle().await;
    assert!(!shell.shares().enabled);

    publishers
        .share_targets
        .publish(Arc::new(vec![navshell::model::ShareTarget {
            id: 1,
            name: "Mail".to_string(),
        }]));
    settle().await;
    assert!(shell.shares().enabled);
    assert_eq!(shell.shares().targets.len(), 1);
}

// ============================================================================
// Errors and Lifecycle
// ============================================================================

#[tokio::test]
async fn test_transient_failures_keep_last_state() {
    let publishers = seeded(true);
    let (shell, mut events) = start(&publishers);
    publishers.navigate("/feed/1/article/2");
    settle().await;
    let before = shell.snapshot();

    publishers.fail_all(UpstreamError::failed("server", "502"));
    settle().await;

    assert_eq!(shell.snapshot(), before);
    let surfaced = drain(&mut events);
    assert!(!surfaced.is_empty());
    assert!(surfaced
        .iter()
        .all(|e| matches!(e, ShellEvent::Error(err) if err.is_transient())));
}

#[tokio::test]
async fn test_features_failure_reported_once() {
    let publishers = seeded(true);
    let (shell, mut events) = start(&publishers);
    publishers.navigate("/feed/1");
    settle().await;
    drain(&mut events);

    publishers.features.fail(UpstreamError::failed("features", "502"));
    settle().await;

    let failures: Vec<ShellEvent> = drain(&mut events)
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                ShellEvent::Error(ShellError::Transient {
                    upstream: "features",
                    ..
                })
            )
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(shell.controls().search_button);
}

#[tokio::test]
async fn test_dispose_is_idempotent_and_final() {
    let publishers = seeded(false);
    let (mut shell, _events) = start(&publishers);
    settle().await;
    assert_eq!(shell.active_subscriptions(), 5);

    assert_eq!(shell.dispose(), 5);
    assert_eq!(shell.dispose(), 0);
    assert!(shell.is_disposed());

    let before = shell.sidebar();
    publishers
        .feeds
        .publish(Arc::new(vec![feed(3, "Gamma")]));
    publishers.navigate("/feed/3/article/1");
    settle().await;

    assert_eq!(shell.sidebar(), before);
    assert_eq!(shell.article_id(), None);
}

#[tokio::test]
async fn test_snapshot_serializes_missing_article_as_minus_one() {
    let publishers = seeded(false);
    let (shell, _events) = start(&publishers);
    publishers.navigate("/feed/1");
    settle().await;

    let json = serde_json::to_value(shell.snapshot()).unwrap();
    assert_eq!(json["article_id"], -1);
    assert_eq!(json["route"]["kind"], "list");
    assert_eq!(json["route"]["context"], "default");
    assert_eq!(json["collapsed"]["5"], false);
}
