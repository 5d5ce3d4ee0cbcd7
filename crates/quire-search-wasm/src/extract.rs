//! Searchable text extraction.
//!
//! Pages are indexed by their rendered text, not their markup: the content
//! region is deep-cloned, chrome elements are stripped from the clone, and
//! the remaining text is whitespace-normalized.

use quire_search::normalize_text;
use wasm_bindgen::JsCast;
use web_sys::{Document, DomParser, Element, SupportedType};

use crate::{RuntimeError, document};

/// Elements removed from a clone before its text is read: scripts, styles,
/// navigation, the site header chrome, any open overlay surfaces, and
/// relocated footnote copies (their text already exists in the footnote
/// section).
const STRIP_SELECTORS: &str = "script, style, nav, .header-ui, .settings-menu, .toc-overlay, \
     .quire-search-overlay, .footnote-inline, .quire-margin-sidebar";

/// Extract normalized text from the element matching `selector` in `doc`.
///
/// Returns an empty string when the selector matches nothing; the caller
/// treats that as a page with no searchable content.
pub fn extract_text(doc: &Document, selector: &str) -> String {
    let element = match doc.query_selector(selector) {
        Ok(Some(element)) => element,
        _ => return String::new(),
    };

    let clone = match element.clone_node_with_deep(true) {
        Ok(node) => node,
        Err(_) => return String::new(),
    };
    let clone: Element = match clone.dyn_into() {
        Ok(element) => element,
        Err(_) => return String::new(),
    };

    if let Ok(nodes) = clone.query_selector_all(STRIP_SELECTORS) {
        for i in 0..nodes.length() {
            if let Some(node) = nodes.item(i) {
                if let Ok(element) = node.dyn_into::<Element>() {
                    element.remove();
                }
            }
        }
    }

    normalize_text(&clone.text_content().unwrap_or_default())
}

/// Extract normalized text from the live document.
pub fn extract_live(selector: &str) -> String {
    match document() {
        Ok(doc) => extract_text(&doc, selector),
        Err(err) => {
            log::warn!("live extraction failed: {err}");
            String::new()
        }
    }
}

/// Parse a fetched HTML response body into a detached document.
pub fn parse_document(html: &str) -> Result<Document, RuntimeError> {
    let parser =
        DomParser::new().map_err(|_| RuntimeError::Dom("DOMParser unavailable".to_string()))?;
    parser
        .parse_from_string(html, SupportedType::TextHtml)
        .map_err(|_| RuntimeError::Parse("failed to parse HTML document".to_string()))
}
