//! Sidebar view model: popular entries, all feeds, and tag categories.
//!
//! - [`build`] - pure, locale-sorted construction of the [`SidebarModel`]
//! - [`CollapseState`] - per-section collapse flags that survive refreshes
//! - [`spawn`] - component task combining features, feeds, and tags

mod builder;
mod collapse;
mod collate;
mod view;

pub use builder::{build, Category, Item, SidebarModel};
pub use collapse::{CollapseKey, CollapseState};
pub use collate::LocaleOrder;
pub use view::{spawn, SidebarCommand, SidebarHandle};
