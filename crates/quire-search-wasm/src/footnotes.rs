//! Footnote relocation.
//!
//! Generated pages emit footnotes as a single `section.footnotes` at the
//! end of the document. Landscape viewports move that section into the
//! margin sidebar with numbered entries; portrait viewports copy each
//! footnote body inline below the paragraph that references it. The layout
//! is re-applied (debounced) on resize and orientation change, and tapping
//! a reference toggles its definition's expanded state.

use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::Element;

use crate::{document, window};

const MARGIN_SIDEBAR_SELECTOR: &str = ".quire-margin-sidebar";
const FOOTNOTE_SECTION_SELECTOR: &str = "section.footnotes";
const FOOTNOTE_REF_SELECTOR: &str = "a[role=\"doc-noteref\"], a.footnote-ref";
const BACKLINK_SELECTOR: &str = ".footnote-back, .footnote-backref, [role=\"doc-backlink\"]";
const RELAYOUT_DEBOUNCE_MS: u32 = 200;

thread_local! {
    static PENDING_RELAYOUT: RefCell<Option<Timeout>> = const { RefCell::new(None) };
}

/// Apply the layout once and keep it in sync with viewport changes.
pub fn install_footnote_relocation() {
    apply_footnote_layout();
    install_footnote_toggle();

    let Ok(window) = window() else {
        return;
    };
    let handler = Closure::<dyn Fn()>::new(|| {
        PENDING_RELAYOUT.with(|slot| {
            if let Some(pending) = slot.borrow_mut().take() {
                pending.cancel();
            }
            let timeout = Timeout::new(RELAYOUT_DEBOUNCE_MS, apply_footnote_layout);
            *slot.borrow_mut() = Some(timeout);
        });
    });
    for event in ["resize", "orientationchange"] {
        if window
            .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("failed to install footnote relayout listener for {event}");
        }
    }
    // Listener lives for the page's lifetime.
    handler.forget();
}

/// Place footnotes according to the current viewport orientation.
pub fn apply_footnote_layout() {
    if viewport_prefers_inline() {
        render_inline_footnotes();
    } else {
        render_margin_footnotes();
    }
}

/// Portrait viewports read better with footnotes inline under their
/// references; landscape keeps them in the margin.
fn prefers_inline(width: f64, height: f64) -> bool {
    height > width
}

fn viewport_prefers_inline() -> bool {
    let Ok(window) = window() else {
        return false;
    };
    if let Ok(Some(query)) = window.match_media("(orientation: portrait)") {
        if query.matches() {
            return true;
        }
    }
    let width = dimension(window.inner_width());
    let height = dimension(window.inner_height());
    prefers_inline(width, height)
}

fn dimension(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn render_margin_footnotes() {
    remove_all(".footnote-inline");

    let Ok(doc) = document() else {
        return;
    };
    let Ok(Some(sidebar)) = doc.query_selector(MARGIN_SIDEBAR_SELECTOR) else {
        return;
    };

    let Ok(Some(section)) = doc.query_selector(FOOTNOTE_SECTION_SELECTOR) else {
        sidebar.set_inner_html("<p class=\"footnotes-empty\">No footnotes on this page.</p>");
        return;
    };

    sidebar.set_inner_html("");
    if let Ok(header) = doc.create_element("h2") {
        header.set_class_name("footnotes-title");
        header.set_text_content(Some("Footnotes"));
        let _ = sidebar.append_child(&header);
    }
    let _ = sidebar.append_child(&section);
    let _ = section.class_list().add_1("margin-footnotes");

    number_footnote_items(&section);
}

/// Prefix each footnote list item with its 1-based number label.
fn number_footnote_items(section: &Element) {
    let Ok(doc) = document() else {
        return;
    };
    let Ok(items) = section.query_selector_all("ol > li") else {
        return;
    };
    for i in 0..items.length() {
        let Some(node) = items.item(i) else {
            continue;
        };
        let Ok(item) = node.dyn_into::<Element>() else {
            continue;
        };
        if item.query_selector(".footnote-num").ok().flatten().is_some() {
            continue;
        }
        let Ok(label) = doc.create_element("span") else {
            continue;
        };
        label.set_class_name("footnote-num");
        label.set_text_content(Some(&format!("{}. ", i + 1)));
        let _ = item.insert_before(&label, item.first_child().as_ref());
    }
}

fn render_inline_footnotes() {
    let Ok(doc) = document() else {
        return;
    };
    if let Ok(Some(sidebar)) = doc.query_selector(MARGIN_SIDEBAR_SELECTOR) {
        sidebar.set_inner_html("");
    }
    remove_all(".footnote-inline");

    if doc
        .query_selector(FOOTNOTE_SECTION_SELECTOR)
        .ok()
        .flatten()
        .is_none()
    {
        return;
    }

    let Ok(refs) = doc.query_selector_all(FOOTNOTE_REF_SELECTOR) else {
        return;
    };
    for i in 0..refs.length() {
        let Some(node) = refs.item(i) else {
            continue;
        };
        let Ok(anchor) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(href) = anchor
            .get_attribute("href")
            .or_else(|| anchor.get_attribute("data-footnote-href"))
        else {
            continue;
        };
        if !href.starts_with('#') {
            continue;
        }
        let Ok(Some(target)) = doc.query_selector(&href) else {
            continue;
        };
        let Some(host) = host_block(&anchor) else {
            continue;
        };

        let number = reference_number(&anchor.text_content().unwrap_or_default());

        let Ok(clone) = target.clone_node_with_deep(true) else {
            continue;
        };
        let Ok(clone) = clone.dyn_into::<Element>() else {
            continue;
        };
        remove_matching(&clone, BACKLINK_SELECTOR);

        let Ok(container) = doc.create_element("div") else {
            continue;
        };
        container.set_class_name("footnote-inline");
        if let Ok(label) = doc.create_element("span") {
            label.set_class_name("footnote-num");
            label.set_text_content(Some(&format!("{number}. ")));
            let _ = container.append_child(&label);
        }
        while let Some(child) = clone.first_child() {
            if container.append_child(&child).is_err() {
                break;
            }
        }
        let _ = host.insert_adjacent_element("afterend", &container);
    }
}

/// Tapping a footnote reference toggles the definition's expanded state.
fn install_footnote_toggle() {
    let Ok(doc) = document() else {
        return;
    };
    let Ok(refs) = doc.query_selector_all("a.footnote-ref") else {
        return;
    };
    for i in 0..refs.length() {
        let Some(node) = refs.item(i) else {
            continue;
        };
        let Ok(anchor) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(href) = anchor.get_attribute("href") else {
            continue;
        };
        let handler = Closure::<dyn Fn(web_sys::Event)>::new(move |ev: web_sys::Event| {
            ev.prevent_default();
            let Ok(doc) = crate::document() else {
                return;
            };
            if let Ok(Some(definition)) = doc.query_selector(&href) {
                let _ = definition.class_list().toggle("expanded");
            }
        });
        let _ = anchor.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        handler.forget();
    }
}

/// The decimal digits of a reference label ("[3]" yields "3").
fn reference_number(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Nearest enclosing paragraph or list item of a reference anchor.
fn host_block(element: &Element) -> Option<Element> {
    let mut current = Some(element.clone());
    while let Some(el) = current {
        let tag = el.tag_name();
        if tag.eq_ignore_ascii_case("p") || tag.eq_ignore_ascii_case("li") {
            return Some(el);
        }
        if tag.eq_ignore_ascii_case("body") {
            return None;
        }
        current = el.parent_element();
    }
    None
}

fn remove_all(selector: &str) {
    let Ok(doc) = document() else {
        return;
    };
    if let Some(root) = doc.document_element() {
        remove_matching(&root, selector);
    }
}

fn remove_matching(root: &Element, selector: &str) {
    if let Ok(nodes) = root.query_selector_all(selector) {
        for i in 0..nodes.length() {
            if let Some(node) = nodes.item(i) {
                if let Ok(element) = node.dyn_into::<Element>() {
                    element.remove();
                }
            }
        }
    }
}
