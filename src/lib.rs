//! Reactive state aggregation for a feed reader's sidebar and toolbar.
//!
//! External services publish snapshots (features, feeds, tags, articles,
//! navigation, share targets) into latest-value channels. A [`Shell`] turns
//! them into the view models the sidebar and toolbar render, and turns user
//! actions into requests to a [`Backend`].

pub mod config;
pub mod error;
pub mod events;
pub mod fixture;
pub mod model;
pub mod reactive;
pub mod shell;
pub mod sidebar;
pub mod toolbar;

pub use config::{Config, ConfigError};
pub use error::{InvariantViolation, MissingReferenceError, ShellError, UpstreamError};
pub use events::{Reporter, ShellEvent};
pub use shell::{Backend, BackendCall, Publishers, RecordingBackend, Shell, ShellSnapshot, Sources};
