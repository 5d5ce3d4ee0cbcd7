//! Quire Search Browser Runtime
//!
//! The DOM-facing half of the search subsystem: fetching and parsing remote
//! pages, extracting searchable text, persisting the search session, and
//! highlighting matches on the live page.
//!
//! All scanning logic is delegated to the pure `quire-search` crate; this
//! crate owns the suspension points (page fetches) and the DOM mutations.

pub mod extract;
pub mod footnotes;
pub mod highlight;
pub mod pages;
pub mod prefs;
pub mod scan;
pub mod session;

pub use extract::{extract_live, extract_text, parse_document};
pub use footnotes::{apply_footnote_layout, install_footnote_relocation};
pub use highlight::{clear_highlights, navigate_to_result, scroll_to_match};
pub use pages::{PageStore, fetch_manifest};
pub use prefs::apply_stored_preferences;
pub use scan::search_across_pages;
pub use session::{
    clear_session, install_scroll_persistence, load_session, restore_scroll_position,
    restore_session, save_session,
};
use wasm_bindgen::prelude::*;

/// Error type for browser runtime operations.
#[derive(Debug)]
pub enum RuntimeError {
    /// Network error while fetching a page or the manifest.
    Network(String),
    /// Non-OK HTTP status.
    Http(u16),
    /// Manifest or document parse error.
    Parse(String),
    /// Missing or inaccessible DOM API.
    Dom(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Network(e) => write!(f, "Network error: {e}"),
            RuntimeError::Http(status) => write!(f, "HTTP {status}"),
            RuntimeError::Parse(e) => write!(f, "Parse error: {e}"),
            RuntimeError::Dom(e) => write!(f, "DOM error: {e}"),
        }
    }
}

impl From<RuntimeError> for JsValue {
    fn from(err: RuntimeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// The window object, or a `Dom` error when running outside a browser.
pub(crate) fn window() -> Result<web_sys::Window, RuntimeError> {
    web_sys::window().ok_or_else(|| RuntimeError::Dom("no window object".to_string()))
}

/// The live document.
pub(crate) fn document() -> Result<web_sys::Document, RuntimeError> {
    window()?
        .document()
        .ok_or_else(|| RuntimeError::Dom("no document object".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_error_display() {
        assert!(RuntimeError::Network("refused".to_string())
            .to_string()
            .contains("Network error"));
        assert_eq!(RuntimeError::Http(404).to_string(), "HTTP 404");
        assert!(RuntimeError::Dom("no window".to_string())
            .to_string()
            .contains("DOM error"));
    }
}
