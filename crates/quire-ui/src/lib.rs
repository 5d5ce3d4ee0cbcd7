//! Quire UI Components
//!
//! Leptos components for the Quire reader frontend.
//!
//! # Components
//!
//! ## Search
//! - [`SearchOverlay`] - Modal search dialog owning the overlay lifecycle
//! - [`SearchResultsPane`] - Grouped, incrementally paginated result list
//! - [`SearchShortcut`] - Global Cmd/Ctrl+K keyboard shortcut handler
//!
//! ## Table of contents
//! - [`TocSwitcher`] - Tabbed chapter list / page outline / full contents

pub mod overlay;
pub mod results;
pub mod toc;

pub use overlay::{ResultSelection, SearchOutcome, SearchOverlay, SearchShortcut};
pub use results::SearchResultsPane;
pub use toc::{NavItem, OutlineEntry, TocSwitcher, full_outline, page_outline, site_nav_items};
