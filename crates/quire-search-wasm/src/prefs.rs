//! Applying stored reader preferences to the document.
//!
//! Theme and font size live in localStorage and drive the stylesheet via
//! `data-` attributes on the root element. Stored values are normalized
//! first so records written by earlier site builds keep working.

use quire_core::{FontSize, Theme, prefs::storage_keys};
use web_sys::Storage;

use crate::{document, window};

fn local_storage() -> Option<Storage> {
    match window().ok()?.local_storage() {
        Ok(storage) => storage,
        Err(_) => None,
    }
}

fn stored_value(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Read the stored theme and font size and set the root element's
/// `data-theme` and `data-font-size` attributes. Missing or unrecognized
/// values apply the defaults.
pub fn apply_stored_preferences() {
    let Ok(doc) = document() else {
        return;
    };
    let Some(root) = doc.document_element() else {
        return;
    };

    let theme = stored_value(storage_keys::THEME)
        .map(|raw| Theme::parse(&raw))
        .unwrap_or_default();
    if root.set_attribute("data-theme", theme.label()).is_err() {
        log::warn!("failed to apply theme preference");
    }

    let size = stored_value(storage_keys::FONT_SIZE)
        .map(|raw| FontSize::normalize(&raw))
        .unwrap_or_default();
    if root.set_attribute("data-font-size", size.label()).is_err() {
        log::warn!("failed to apply font-size preference");
    }
}
