//! Reactive building blocks shared by every component.
//!
//! - [`Latest`] - latest-value broadcast cell with replay for late subscribers
//! - [`Upstream`] / [`Emission`] - how external collaborators publish snapshots
//! - [`Subscriptions`] - per-view scope that releases every task at teardown

mod latest;
mod lifecycle;
mod upstream;

pub use latest::Latest;
pub use lifecycle::{Subscription, Subscriptions};
pub use upstream::{Emission, Upstream};

pub(crate) use lifecycle::catch_task_panic;
pub(crate) use upstream::Input;
