use crate::events::Reporter;
use crate::model::{ShareTarget, ShareTargetList};
use crate::reactive::{Input, Latest, Subscription, Upstream};
use serde::Serialize;
use std::sync::Arc;

/// Latest enabled share targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareState {
    /// True iff at least one target is enabled.
    pub enabled: bool,
    pub targets: ShareTargetList,
}

impl ShareState {
    pub fn new(targets: ShareTargetList) -> Self {
        Self {
            enabled: !targets.is_empty(),
            targets,
        }
    }

    pub fn find(&self, id: i64) -> Option<&ShareTarget> {
        self.targets.iter().find(|t| t.id == id)
    }
}

/// Mirror the enabled share targets.
pub fn spawn(
    targets: Upstream<ShareTargetList>,
    reporter: Reporter,
) -> (Arc<Latest<ShareState>>, Subscription) {
    let state = Arc::new(Latest::default());
    let out = Arc::clone(&state);
    let mut input = Input::new("share_targets", targets);

    let subscription = Subscription::spawn("share_targets", async move {
        loop {
            if input.absorb(&reporter) {
                if let Some(targets) = input.latest() {
                    tracing::debug!(count = targets.len(), "Share targets updated");
                    out.set_if_changed(ShareState::new(Arc::clone(targets)));
                }
            }
            if input.changed().await.is_err() {
                break;
            }
        }
        tracing::debug!("Share target upstream closed");
    });

    (state, subscription)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Emission;

    fn target(id: i64, name: &str) -> ShareTarget {
        ShareTarget {
            id,
            name: name.to_string(),
        }
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_enabled_iff_non_empty() {
        assert!(!ShareState::new(Arc::new(vec![])).enabled);
        assert!(ShareState::new(Arc::new(vec![target(1, "Mail")])).enabled);
    }

    #[tokio::test]
    async fn test_mirrors_live_updates() {
        let (reporter, _events) = Reporter::channel(4);
        let source: Latest<Emission<ShareTargetList>> = Latest::pending();
        let (state, _sub) = spawn(source.subscribe(), reporter);
        settle().await;
        assert!(!state.get().enabled);

        source.publish(Arc::new(vec![target(1, "Mail"), target(2, "Pocket")]));
        settle().await;
        let current = state.get();
        assert!(current.enabled);
        assert_eq!(current.find(2).map(|t| t.name.as_str()), Some("Pocket"));

        source.publish(Arc::new(vec![]));
        settle().await;
        assert!(!state.get().enabled);
    }
}
