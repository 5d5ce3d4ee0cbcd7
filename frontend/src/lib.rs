//! Browser entry point.
//!
//! Loaded by every generated page. `start` runs automatically when the
//! module is instantiated; the host page then calls `init` (optionally with
//! a manifest URL) to load the page index, restore any pre-navigation
//! state, and mount the overlay components. The exported `openSearchOverlay`
//! and `openTocOverlay` functions hook up the page's static header buttons.

use std::cell::Cell;

use leptos::mount::mount_to_body;
use leptos::prelude::*;
use quire_core::{ActiveMatch, PageManifest, SearchSession};
use quire_search::to_session_results;
use quire_search_wasm::{
    PageStore, apply_stored_preferences, clear_session, fetch_manifest,
    install_footnote_relocation, install_scroll_persistence, navigate_to_result,
    restore_scroll_position, restore_session, save_session, search_across_pages,
};
use quire_ui::{
    ResultSelection, SearchOutcome, SearchOverlay, SearchShortcut, TocSwitcher, full_outline,
    page_outline, site_nav_items,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Manifest location relative to the page, used when `init` gets no URL.
const DEFAULT_MANIFEST_URL: &str = "quire-manifest.json";

thread_local! {
    /// Handles to the mounted overlays' control signals, set by `init`.
    static SEARCH_REQUEST: Cell<Option<RwSignal<Option<String>>>> = const { Cell::new(None) };
    static TOC_CONTROL: Cell<Option<RwSignal<bool>>> = const { Cell::new(None) };
}

/// Module instantiation hook: panic messages and logging to the console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Load the page index and mount the overlays.
///
/// Restores the saved scroll position and search highlight before the
/// manifest round trip so the page settles without waiting on the network.
#[wasm_bindgen]
pub async fn init(manifest_url: Option<String>) -> Result<(), JsValue> {
    apply_stored_preferences();
    install_footnote_relocation();
    restore_scroll_position();
    install_scroll_persistence();
    restore_session();

    let url = manifest_url.unwrap_or_else(|| DEFAULT_MANIFEST_URL.to_string());
    let manifest = fetch_manifest(&url).await?;
    let store = PageStore::for_current_document(&manifest)?;

    mount_overlays(store, manifest);
    Ok(())
}

/// Open the search overlay, optionally pre-filled with a query. A supplied
/// query searches immediately, also when the overlay is already open.
#[wasm_bindgen(js_name = openSearchOverlay)]
pub fn open_search_overlay(initial_query: Option<String>) {
    SEARCH_REQUEST.with(|request| match request.get() {
        Some(request) => request.set(Some(initial_query.unwrap_or_default())),
        None => log::warn!("search overlay not mounted; call init first"),
    });
}

/// Open the table-of-contents overlay.
#[wasm_bindgen(js_name = openTocOverlay)]
pub fn open_toc_overlay() {
    TOC_CONTROL.with(|control| match control.get() {
        Some(open) => open.set(true),
        None => log::warn!("toc overlay not mounted; call init first"),
    });
}

/// Drop the stored search session and remove any highlight on the page.
#[wasm_bindgen(js_name = clearSearchSession)]
pub fn clear_search_session() {
    clear_session();
}

fn mount_overlays(store: PageStore, manifest: PageManifest) {
    let search_open = RwSignal::new(false);
    let toc_open = RwSignal::new(false);
    let query = RwSignal::new(String::new());
    let request = RwSignal::new(None::<String>);
    let outcome = RwSignal::new(SearchOutcome::Idle);

    SEARCH_REQUEST.with(|slot| slot.set(Some(request)));
    TOC_CONTROL.with(|control| control.set(Some(toc_open)));

    let current = store.current_page_entry();
    let nav = site_nav_items(&manifest, Some(current.url.as_str()));
    let outline = manifest
        .page_by_url(&current.url)
        .map(page_outline)
        .unwrap_or_default();
    let contents = full_outline(&manifest);

    let on_search = Callback::new(move |q: String| {
        let store = store.clone();
        spawn_local(async move {
            let results = search_across_pages(&store, &q).await;
            outcome.set(SearchOutcome::Ready { query: q, results });
        });
    });

    let on_select = Callback::new(move |selection: ResultSelection| {
        let session_results = to_session_results(&selection.results, resolve_url);
        let Some(position) = selection.results.iter().position(|r| {
            r.page.url == selection.result.page.url && r.match_index == selection.result.match_index
        }) else {
            log::warn!("selected result missing from result set");
            return;
        };
        let chosen = session_results[position].clone();

        let session = SearchSession {
            query: selection.query.clone(),
            results: session_results,
            active: Some(ActiveMatch {
                url: chosen.url.clone(),
                match_index: chosen.match_index,
            }),
            timestamp_ms: js_sys::Date::now(),
        };
        save_session(&session);
        navigate_to_result(&chosen, &selection.query);
    });

    mount_to_body(move || {
        view! {
          <SearchShortcut open=search_open />
          <SearchOverlay
            open=search_open
            query=query
            request=request
            outcome=outcome
            on_search=on_search
            on_select=on_select
          />
          <TocSwitcher open=toc_open nav=nav outline=outline contents=contents />
        }
    });
}

/// Resolve a manifest-relative page URL against the current location.
fn resolve_url(url: &str) -> String {
    web_sys::window()
        .and_then(|window| window.location().href().ok())
        .and_then(|href| web_sys::Url::new_with_base(url, &href).ok())
        .map(|resolved| resolved.href())
        .unwrap_or_else(|| url.to_string())
}
