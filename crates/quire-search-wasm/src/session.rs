//! Search session persistence.
//!
//! The session record lives in sessionStorage under a fixed key. Every
//! operation here fails soft: a missing storage area, a quota error, or a
//! malformed stored record logs a warning and behaves as if no session
//! existed. Losing the record only loses highlight restoration.

use quire_core::{SESSION_STORAGE_KEY, SearchSession, prefs::storage_keys};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Storage, Url};

use crate::highlight::{clear_highlights, scroll_to_match};
use crate::window;

fn session_storage() -> Option<Storage> {
    match window().ok()?.session_storage() {
        Ok(storage) => storage,
        Err(_) => None,
    }
}

/// Persist the session. Failure is logged and swallowed.
pub fn save_session(session: &SearchSession) {
    let Some(storage) = session_storage() else {
        log::warn!("session storage unavailable; search session not saved");
        return;
    };
    let json = match session.to_json() {
        Ok(json) => json,
        Err(err) => {
            log::warn!("search session save failed: {err}");
            return;
        }
    };
    if storage.set_item(SESSION_STORAGE_KEY, &json).is_err() {
        log::warn!("search session save failed: storage write rejected");
    }
}

/// Load and validate the stored session, if any.
pub fn load_session() -> Option<SearchSession> {
    let storage = session_storage()?;
    let raw = match storage.get_item(SESSION_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(_) => {
            log::warn!("search session load failed: storage read rejected");
            return None;
        }
    };
    match SearchSession::from_json(&raw) {
        Ok(session) => Some(session),
        Err(err) => {
            log::warn!("discarding malformed search session: {err}");
            None
        }
    }
}

/// Remove the stored session and any active highlights.
pub fn clear_session() {
    clear_highlights();
    if let Some(storage) = session_storage() {
        if storage.remove_item(SESSION_STORAGE_KEY).is_err() {
            log::warn!("failed to clear search session");
        }
    }
}

/// Restore the pre-navigation highlight after a page load.
///
/// If a session is stored and its active result resolves to the current
/// document, schedule (next animation frame) a highlight-clear followed by
/// a scroll to the stored match index.
pub fn restore_session() {
    let Some(session) = load_session() else {
        return;
    };
    let Some(active) = session.active else {
        return;
    };

    if !resolves_to_current_document(&active.url) {
        return;
    }

    let query = session.query;
    let match_index = active.match_index;
    schedule_frame(move || {
        clear_highlights();
        if !scroll_to_match(&query, match_index) {
            log::debug!("stored match not found on restored page");
        }
    });
}

/// Whether `url` points at the document currently loaded.
fn resolves_to_current_document(url: &str) -> bool {
    let Ok(window) = window() else {
        return false;
    };
    let location = window.location();
    let (Ok(href), Ok(origin), Ok(pathname)) =
        (location.href(), location.origin(), location.pathname())
    else {
        return false;
    };
    match Url::new_with_base(url, &href) {
        Ok(target) => target.origin() == origin && target.pathname() == pathname,
        Err(_) => false,
    }
}

/// Run a closure on the next animation frame.
pub(crate) fn schedule_frame(f: impl FnOnce() + 'static) {
    let Ok(window) = window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if window
        .request_animation_frame(callback.unchecked_ref())
        .is_err()
    {
        log::warn!("requestAnimationFrame unavailable");
    }
}

/// Restore the scroll position saved by the previous unload, if any.
pub fn restore_scroll_position() {
    let Ok(window) = window() else {
        return;
    };
    let Some(storage) = session_storage() else {
        return;
    };
    if let Ok(Some(raw)) = storage.get_item(storage_keys::SCROLL_POSITION) {
        if let Ok(y) = raw.parse::<f64>() {
            window.scroll_to_with_x_and_y(0.0, y);
        }
    }
}

/// Save the scroll position on unload so the next load can restore it.
pub fn install_scroll_persistence() {
    let Ok(window) = window() else {
        return;
    };
    let handler = Closure::<dyn Fn()>::new(move || {
        let Ok(window) = crate::window() else {
            return;
        };
        let Ok(y) = window.scroll_y() else {
            return;
        };
        if let Some(storage) = session_storage() {
            let _ = storage.set_item(storage_keys::SCROLL_POSITION, &y.to_string());
        }
    });
    if window
        .add_event_listener_with_callback("beforeunload", handler.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("failed to install scroll persistence");
    }
    // Listener lives for the page's lifetime.
    handler.forget();
}
