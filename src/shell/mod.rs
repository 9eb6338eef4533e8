//! Composition root for one view instance.
//!
//! [`Shell::start`] wires every sidebar and toolbar component to the
//! upstreams, registers their tasks in one [`Subscriptions`] scope, and hands
//! back the event receiver for the view. [`Shell::dispose`] tears it all down.

mod actions;
mod backend;
mod sources;

pub use backend::{Backend, BackendCall, RecordingBackend};
pub use sources::{Publishers, Sources};

use crate::config::Config;
use crate::events::{Reporter, ShellEvent};
use crate::model::RouteState;
use crate::reactive::{Latest, Subscriptions};
use crate::sidebar::{self, CollapseState, SidebarHandle, SidebarModel};
use crate::toolbar::{
    read_status, route_state, share, visibility, ControlVisibility, ReadStatus, RouteDerivation,
    ShareState,
};
use serde::Serialize;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;

/// Live view model of the sidebar and toolbar.
pub struct Shell<B: Backend> {
    backend: Arc<B>,
    reporter: Reporter,
    subscriptions: Subscriptions,

    route: RouteDerivation,
    read_status: ReadStatus,
    controls: Arc<Latest<ControlVisibility>>,
    shares: Arc<Latest<ShareState>>,
    sidebar: SidebarHandle,

    search_query: String,

    /// Share submissions: generation counter + handle for cancel-and-replace
    share_generation: Arc<AtomicU64>,
    share_handle: Option<AbortHandle>,
}

impl<B: Backend> Shell<B> {
    /// Start every component on the current tokio runtime.
    ///
    /// Returns the shell together with the receiver for errors and focus
    /// requests.
    pub fn start(
        sources: Sources,
        backend: Arc<B>,
        config: &Config,
    ) -> (Self, mpsc::Receiver<ShellEvent>) {
        let (reporter, events) = Reporter::channel(config.event_capacity);
        let mut subscriptions = Subscriptions::new();

        let (route, sub) = route_state::spawn(sources.navigation, reporter.clone());
        subscriptions.register(sub);

        let (read_status, sub) =
            read_status::spawn(route.watch_article_id(), sources.articles, reporter.clone());
        subscriptions.register(sub);

        let (controls, sub) = visibility::spawn(
            sources.features.clone(),
            route.watch_shows_article(),
            route.watch_list_context(),
            reporter.clone(),
            config.focus_delay(),
        );
        subscriptions.register(sub);

        let (shares, sub) = share::spawn(sources.share_targets, reporter.clone());
        subscriptions.register(sub);

        let (sidebar, sub) = sidebar::spawn(
            sources.features,
            sources.feeds,
            sources.tags,
            reporter.clone(),
        );
        subscriptions.register(sub);

        tracing::info!(components = subscriptions.len(), "Shell started");

        let shell = Self {
            backend,
            reporter,
            subscriptions,
            route,
            read_status,
            controls,
            shares,
            sidebar,
            search_query: String::new(),
            share_generation: Arc::new(AtomicU64::new(0)),
            share_handle: None,
        };
        (shell, events)
    }

    // ========================================================================
    // Derived State
    // ========================================================================

    pub fn route(&self) -> RouteState {
        self.route.route()
    }

    pub fn article_id(&self) -> Option<i64> {
        self.route.article_id()
    }

    pub fn shows_article(&self) -> bool {
        self.route.shows_article()
    }

    pub fn in_search(&self) -> bool {
        self.route.in_search()
    }

    /// Debounced read flag of the viewed article.
    pub fn article_read(&self) -> bool {
        self.read_status.read.get()
    }

    pub fn watch_article_read(&self) -> watch::Receiver<bool> {
        self.read_status.read.subscribe()
    }

    pub fn controls(&self) -> ControlVisibility {
        self.controls.get()
    }

    pub fn watch_controls(&self) -> watch::Receiver<ControlVisibility> {
        self.controls.subscribe()
    }

    pub fn shares(&self) -> ShareState {
        self.shares.get()
    }

    pub fn sidebar(&self) -> Arc<SidebarModel> {
        self.sidebar.model()
    }

    pub fn watch_sidebar(&self) -> watch::Receiver<Arc<SidebarModel>> {
        self.sidebar.watch_model()
    }

    pub fn collapse_state(&self) -> CollapseState {
        self.sidebar.collapse_state()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Point-in-time copy of everything the view renders.
    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            route: self.route(),
            article_id: self.article_id().unwrap_or(-1),
            shows_article: self.shows_article(),
            in_search: self.in_search(),
            article_read: self.article_read(),
            controls: self.controls(),
            share: self.shares(),
            search_query: self.search_query.clone(),
            sidebar: self.sidebar(),
            collapsed: self.collapse_state(),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Number of live subscriptions, components and in-flight actions.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.subscriptions.is_disposed()
    }

    /// Release every component and in-flight action.
    ///
    /// On a current-thread runtime nothing is published after this returns.
    /// On a multi-thread runtime a task being polled on another worker
    /// finishes its current step first, so one last publish may follow.
    /// Safe to call more than once; later calls release nothing and return 0.
    pub fn dispose(&mut self) -> usize {
        self.share_handle = None;
        let released = self.subscriptions.dispose();
        if released > 0 {
            tracing::info!(released, "Shell disposed");
        }
        released
    }
}

impl<B: Backend> Drop for Shell<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Serializable view of the shell at one instant.
///
/// `article_id` is `-1` when no article is viewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellSnapshot {
    pub route: RouteState,
    pub article_id: i64,
    pub shows_article: bool,
    pub in_search: bool,
    pub article_read: bool,
    pub controls: ControlVisibility,
    pub share: ShareState,
    pub search_query: String,
    pub sidebar: Arc<SidebarModel>,
    pub collapsed: CollapseState,
}
