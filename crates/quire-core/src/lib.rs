//! Quire Core Library
//!
//! Core types shared across the Quire reader runtime: the build-time page
//! manifest, the search session record persisted across navigations, reader
//! preference normalization, and error handling.

pub mod error;
pub mod manifest;
pub mod prefs;
pub mod session;

pub use error::{CoreError, Result};
pub use manifest::{Heading, ManifestPage, PageEntry, PageManifest};
pub use prefs::{FontSize, Theme, storage_keys};
pub use session::{ActiveMatch, SESSION_STORAGE_KEY, SearchSession, SessionResult};
