//! On-page match highlighting and result navigation.
//!
//! Highlighting wraps the selected occurrence's text range in a `<mark>`
//! element. Marks are tracked so the next highlight pass (or a session
//! reset) can unwrap them, restoring the original text nodes.

use std::cell::RefCell;

use quire_core::SessionResult;
use quire_search::OccurrenceTracker;
use web_sys::{Element, Node, Url};

use crate::session::schedule_frame;
use crate::{document, window};

/// whatToShow bitmask selecting text nodes only.
const SHOW_TEXT: u32 = 0x4;

thread_local! {
    static ACTIVE_HIGHLIGHTS: RefCell<Vec<Element>> = const { RefCell::new(Vec::new()) };
}

/// Unwrap every tracked highlight element.
pub fn clear_highlights() {
    ACTIVE_HIGHLIGHTS.with(|highlights| {
        for mark in highlights.borrow_mut().drain(..) {
            unwrap_element(&mark);
        }
    });
}

fn unwrap_element(element: &Element) {
    let Some(parent) = element.parent_node() else {
        return;
    };
    let node: &Node = element.as_ref();
    while let Some(child) = element.first_child() {
        if parent.insert_before(&child, Some(node)).is_err() {
            return;
        }
    }
    let _ = parent.remove_child(node);
}

/// Find the `match_index`-th occurrence of `query` in the document body and
/// highlight it, scrolling it into view. Returns whether it was found.
///
/// Walks text nodes in document order, skipping anything inside the search
/// overlay, and counts occurrences globally across nodes — the same
/// counting the scanner applied to the page's extracted text.
pub fn scroll_to_match(query: &str, match_index: u32) -> bool {
    if query.is_empty() {
        return false;
    }
    clear_highlights();

    let Ok(doc) = document() else {
        return false;
    };
    let Some(body) = doc.body() else {
        return false;
    };
    let Ok(walker) = doc.create_tree_walker_with_what_to_show(&body, SHOW_TEXT) else {
        return false;
    };

    let mut tracker = OccurrenceTracker::new(query, match_index);
    while let Ok(Some(node)) = walker.next_node() {
        if inside_overlay(&node) {
            continue;
        }
        let text = node.text_content().unwrap_or_default();
        if let Some(range) = tracker.feed(&text) {
            highlight_text_range(&doc, &node, &text, range.start, range.end);
            return true;
        }
    }
    false
}

fn inside_overlay(node: &Node) -> bool {
    node.parent_element()
        .and_then(|parent| parent.closest(".quire-search-overlay").ok().flatten())
        .is_some()
}

/// Wrap `[start, end)` (byte offsets into `text`) of a text node in a mark
/// element and smooth-scroll it to the viewport center.
fn highlight_text_range(
    doc: &web_sys::Document,
    node: &Node,
    text: &str,
    start: usize,
    end: usize,
) {
    // DOM ranges address UTF-16 code units, not bytes.
    let start16 = text[..start].encode_utf16().count() as u32;
    let end16 = start16 + text[start..end].encode_utf16().count() as u32;

    let Ok(range) = doc.create_range() else {
        return;
    };
    if range.set_start(node, start16).is_err() || range.set_end(node, end16).is_err() {
        return;
    }

    let Ok(mark) = doc.create_element("mark") else {
        return;
    };
    mark.set_class_name("search-hit-highlight");

    if range.surround_contents(&mark).is_err() {
        log::warn!("failed to wrap highlight range");
        return;
    }

    ACTIVE_HIGHLIGHTS.with(|highlights| highlights.borrow_mut().push(mark.clone()));

    let options = web_sys::ScrollIntoViewOptions::new();
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    options.set_block(web_sys::ScrollLogicalPosition::Center);
    mark.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Navigate to a selected search result.
///
/// A result on the current document updates the hash if needed and scrolls
/// to the stored occurrence, falling back to the hash target element. A
/// result on another document triggers a full navigation; the session
/// saved beforehand lets the destination page restore the highlight.
pub fn navigate_to_result(result: &SessionResult, query: &str) {
    let Ok(window) = window() else {
        return;
    };
    let location = window.location();
    let Ok(href) = location.href() else {
        return;
    };

    let target = match Url::new_with_base(&result.url, &href) {
        Ok(url) => url,
        Err(_) => {
            log::warn!("unresolvable result URL: {}", result.url);
            return;
        }
    };

    let same_document = match Url::new(&href) {
        Ok(current) => {
            target.origin() == current.origin() && target.pathname() == current.pathname()
        }
        Err(_) => false,
    };

    if !same_document {
        if location.set_href(&target.href()).is_err() {
            log::warn!("navigation to {} failed", target.href());
        }
        return;
    }

    let hash = target.hash();
    if !hash.is_empty() && location.hash().as_deref() != Ok(hash.as_str()) {
        let _ = location.set_hash(&hash);
    }

    let query = query.to_string();
    let match_index = result.match_index;
    schedule_frame(move || {
        if !scroll_to_match(&query, match_index) {
            scroll_to_hash_target(&hash);
        }
    });
}

/// Fallback when the stored occurrence is gone: center the hash target.
fn scroll_to_hash_target(hash: &str) {
    let id = hash.trim_start_matches('#');
    if id.is_empty() {
        return;
    }
    let Ok(doc) = document() else {
        return;
    };
    if let Some(element) = doc.get_element_by_id(id) {
        let options = web_sys::ScrollIntoViewOptions::new();
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        options.set_block(web_sys::ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
