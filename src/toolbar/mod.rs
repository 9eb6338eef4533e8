//! Toolbar view model: route-derived flags, the viewed article's read flag,
//! control visibility, and share targets.
//!
//! Each piece runs as its own task publishing into a [`Latest`] cell:
//! - [`route_state`] - article id, article/list flags from navigation
//! - [`read_status`] - debounced read flag of the viewed article
//! - [`visibility`] - search and mark-all-read controls, search focus
//! - [`share`] - enabled share targets
//!
//! [`Latest`]: crate::reactive::Latest

pub mod navigation;
pub mod read_status;
pub mod route_state;
pub mod share;
pub mod visibility;

pub use navigation::{search_path, up_path};
pub use read_status::{ReadDebounce, ReadStatus, READ_DEBOUNCE};
pub use route_state::RouteDerivation;
pub use share::ShareState;
pub use visibility::ControlVisibility;
