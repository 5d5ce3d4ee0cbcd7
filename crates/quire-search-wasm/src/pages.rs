//! The page store: the page index plus a lazily-filled content cache.
//!
//! Built once at startup from the generator's manifest. Text for pages
//! other than the current one is fetched on first scan and cached for the
//! lifetime of the store; the current page is always read from the live
//! DOM so edits from other page features are never stale.

use std::sync::Arc;

use gloo_net::http::Request;
use quire_core::{PageEntry, PageManifest};
use scc::HashMap;

use crate::extract::{extract_live, extract_text, parse_document};
use crate::{RuntimeError, window};

/// Selector for the searchable content region of every page.
pub const CONTENT_SELECTOR: &str = "main";

/// The page index and its content cache.
#[derive(Clone)]
pub struct PageStore {
    /// Search-facing page entries, in manifest order.
    entries: Arc<Vec<PageEntry>>,

    /// Path of the document the store was built on.
    current_path: String,

    /// Cache of fetched page text keyed by page URL.
    content_cache: Arc<HashMap<String, String>>,
}

/// Fetch and parse the page manifest.
pub async fn fetch_manifest(manifest_url: &str) -> Result<PageManifest, RuntimeError> {
    let response = Request::get(manifest_url)
        .send()
        .await
        .map_err(|e| RuntimeError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(RuntimeError::Http(response.status()));
    }

    let json = response
        .text()
        .await
        .map_err(|e| RuntimeError::Network(e.to_string()))?;

    PageManifest::from_json(&json).map_err(|e| RuntimeError::Parse(e.to_string()))
}

impl PageStore {
    /// Load the manifest from `manifest_url` and seed the page index.
    pub async fn load(manifest_url: &str) -> Result<Self, RuntimeError> {
        let manifest = fetch_manifest(manifest_url).await?;
        Self::for_current_document(&manifest)
    }

    /// Build a store from a parsed manifest, keyed to the loaded document.
    pub fn for_current_document(manifest: &PageManifest) -> Result<Self, RuntimeError> {
        Ok(Self::from_manifest(manifest, &current_pathname()?))
    }

    /// Build a store from an already-parsed manifest.
    pub fn from_manifest(manifest: &PageManifest, current_path: &str) -> Self {
        Self {
            entries: Arc::new(manifest.page_index()),
            current_path: current_path.to_string(),
            content_cache: Arc::new(HashMap::new()),
        }
    }

    /// The indexed pages, in manifest order.
    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    /// Whether `entry` is the page the store was built on.
    pub fn is_current(&self, entry: &PageEntry) -> bool {
        is_current_path(&self.current_path, &entry.url)
    }

    /// A synthetic entry describing the current document, used when
    /// cross-page fetching is unavailable.
    pub fn current_page_entry(&self) -> PageEntry {
        self.entries
            .iter()
            .find(|entry| self.is_current(entry))
            .cloned()
            .unwrap_or_else(|| PageEntry {
                url: self.current_path.clone(),
                title: document_title(),
                chapter: String::new(),
            })
    }

    /// Number of pages with cached content.
    pub fn cached_page_count(&self) -> usize {
        self.content_cache.len()
    }

    /// Obtain the searchable text of a page.
    ///
    /// Current page: live extraction. Other pages: cache hit, or fetch +
    /// parse + extract + cache.
    pub async fn content_for(&self, entry: &PageEntry) -> Result<String, RuntimeError> {
        if self.is_current(entry) {
            return Ok(extract_live(CONTENT_SELECTOR));
        }

        if let Some(cached) = self.content_cache.get_async(&entry.url).await {
            return Ok(cached.get().clone());
        }

        let response = Request::get(&entry.url)
            .send()
            .await
            .map_err(|e| RuntimeError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(RuntimeError::Http(response.status()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| RuntimeError::Network(e.to_string()))?;

        let doc = parse_document(&html)?;
        let text = extract_text(&doc, CONTENT_SELECTOR);

        let _ = self
            .content_cache
            .insert_async(entry.url.clone(), text.clone())
            .await;

        Ok(text)
    }
}

/// Whether `url` (a site-relative output path) denotes the document at
/// `current_path` (a location pathname).
fn is_current_path(current_path: &str, url: &str) -> bool {
    if current_path == url || current_path.ends_with(&format!("/{url}")) {
        return true;
    }
    // A directory path serves its index document.
    url == "index.html" && (current_path == "/" || current_path.ends_with('/'))
}

fn current_pathname() -> Result<String, RuntimeError> {
    window()?
        .location()
        .pathname()
        .map_err(|_| RuntimeError::Dom("location.pathname unavailable".to_string()))
}

fn document_title() -> String {
    crate::document()
        .map(|doc| doc.title())
        .unwrap_or_default()
}
