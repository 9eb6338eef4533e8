use super::builder::{build, SidebarModel};
use super::collapse::{CollapseKey, CollapseState};
use crate::events::Reporter;
use crate::model::{FeatureFlags, FeedList, TagList};
use crate::reactive::{Input, Latest, Subscription, Upstream};
use std::sync::Arc;
use tokio::sync::mpsc;

/// User actions on the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarCommand {
    Toggle(CollapseKey),
}

/// View-side handle to the sidebar component.
///
/// The collapse map is owned by the component task; toggles are sent to it
/// as commands, so there is a single writer.
#[derive(Debug, Clone)]
pub struct SidebarHandle {
    model: Arc<Latest<Arc<SidebarModel>>>,
    collapse: Arc<Latest<CollapseState>>,
    commands: mpsc::UnboundedSender<SidebarCommand>,
}

impl SidebarHandle {
    pub fn model(&self) -> Arc<SidebarModel> {
        self.model.get()
    }

    pub fn watch_model(&self) -> tokio::sync::watch::Receiver<Arc<SidebarModel>> {
        self.model.subscribe()
    }

    pub fn collapse_state(&self) -> CollapseState {
        self.collapse.get()
    }

    /// Request a collapse toggle. Ignored once the component is released.
    pub fn toggle(&self, key: CollapseKey) {
        if self.commands.send(SidebarCommand::Toggle(key)).is_err() {
            tracing::debug!(key = %key, "Sidebar released, toggle ignored");
        }
    }
}

/// Start the sidebar component.
///
/// The model is rebuilt whenever features, feeds, or tags publish, once all
/// three have published at least once.
pub fn spawn(
    features: Upstream<FeatureFlags>,
    feeds: Upstream<FeedList>,
    tags: Upstream<TagList>,
    reporter: Reporter,
) -> (SidebarHandle, Subscription) {
    let (commands, command_rx) = mpsc::unbounded_channel();
    let handle = SidebarHandle {
        model: Arc::new(Latest::default()),
        collapse: Arc::new(Latest::default()),
        commands,
    };

    let task = SidebarTask {
        features: Input::new("features", features),
        feeds: Input::new("feeds", feeds),
        tags: Input::new("tags", tags),
        commands: command_rx,
        collapse: CollapseState::default(),
        out: handle.clone(),
        reporter,
    };
    let subscription = Subscription::spawn("sidebar", task.run());

    (handle, subscription)
}

struct SidebarTask {
    features: Input<FeatureFlags>,
    feeds: Input<FeedList>,
    tags: Input<TagList>,
    commands: mpsc::UnboundedReceiver<SidebarCommand>,
    collapse: CollapseState,
    out: SidebarHandle,
    reporter: Reporter,
}

impl SidebarTask {
    async fn run(mut self) {
        let changed = [
            self.features.absorb(&self.reporter),
            self.feeds.absorb(&self.reporter),
            self.tags.absorb(&self.reporter),
        ];
        if changed.contains(&true) {
            self.rebuild();
        }

        loop {
            let rebuild = tokio::select! {
                Ok(()) = self.features.changed() => self.features.absorb(&self.reporter),
                Ok(()) = self.feeds.changed() => self.feeds.absorb(&self.reporter),
                Ok(()) = self.tags.changed() => self.tags.absorb(&self.reporter),
                Some(command) = self.commands.recv() => {
                    self.apply(command);
                    false
                }
                else => break,
            };
            if rebuild {
                self.rebuild();
            }
        }

        tracing::debug!("Sidebar inputs closed");
    }

    fn rebuild(&mut self) {
        let (Some(features), Some(feeds), Some(tags)) = (
            self.features.latest(),
            self.feeds.latest(),
            self.tags.latest(),
        ) else {
            return;
        };

        let model = build(features, feeds, tags);
        for missing in &model.problems {
            self.reporter.report((*missing).into());
        }

        let added = self
            .collapse
            .discover(model.categories.iter().map(|c| c.id));
        if added > 0 {
            self.out.collapse.replace(self.collapse.clone());
        }

        tracing::debug!(
            feeds = model.all_items.len(),
            categories = model.categories.len(),
            problems = model.problems.len(),
            "Sidebar rebuilt"
        );
        self.out.model.replace(Arc::new(model));
    }

    fn apply(&mut self, command: SidebarCommand) {
        match command {
            SidebarCommand::Toggle(key) => {
                let collapsed = self.collapse.toggle(key);
                tracing::debug!(key = %key, collapsed, "Sidebar section toggled");
                self.out.collapse.replace(self.collapse.clone());
            }
        }
    }
}
