//! Build-time page manifest and the page index derived from it.
//!
//! The site generator emits a JSON manifest enumerating every page's source
//! path, output path, title, chapter label, and heading outline. The search
//! runtime consumes only the `{url, title, chapter}` triples; the heading
//! tree feeds the table-of-contents switcher.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// The manifest generated alongside the site output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageManifest {
    /// ISO timestamp of the generating build.
    #[serde(default)]
    pub generated_at: String,

    /// Every page of the site, in reading order.
    pub pages: Vec<ManifestPage>,
}

/// A single page as recorded by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPage {
    /// Source document path (e.g. `content/01_ch01.qmd`).
    #[serde(default)]
    pub source: String,

    /// Output path relative to the site root (e.g. `content/01_ch01.html`).
    pub output: String,

    /// Page title.
    pub title: String,

    /// Chapter grouping label; empty when the page sits outside a chapter.
    #[serde(default)]
    pub chapter: String,

    /// Nested heading outline of the page.
    #[serde(default)]
    pub headings: Vec<Heading>,
}

/// A heading within a page's outline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Heading {
    /// Heading text.
    pub title: String,

    /// Heading level (1-6).
    pub level: u8,

    /// Anchor ID, if the generator assigned one.
    #[serde(default)]
    pub anchor: Option<String>,

    /// Nested sub-headings.
    #[serde(default)]
    pub children: Vec<Heading>,
}

/// The search-facing view of a page: its location and grouping label.
///
/// Content is deliberately not stored here; the runtime keeps a separate
/// url-keyed text cache populated on first scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageEntry {
    /// Output URL relative to the site root. Unique key.
    pub url: String,

    /// Page title.
    pub title: String,

    /// Chapter grouping label.
    pub chapter: String,
}

impl PageManifest {
    /// Parse a manifest from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: PageManifest = serde_json::from_str(json)?;
        if manifest.pages.is_empty() {
            return Err(CoreError::manifest("manifest lists no pages"));
        }
        Ok(manifest)
    }

    /// Seed the page index from the manifest.
    pub fn page_index(&self) -> Vec<PageEntry> {
        self.pages
            .iter()
            .map(|page| PageEntry {
                url: page.output.clone(),
                title: page.title.clone(),
                chapter: page.chapter.clone(),
            })
            .collect()
    }

    /// Find a page by its output URL.
    pub fn page_by_url(&self, url: &str) -> Option<&ManifestPage> {
        self.pages.iter().find(|page| page.output == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "generated_at": "2025-11-09T10:18:42Z",
            "pages": [
                {
                    "source": "index.qmd",
                    "output": "index.html",
                    "title": "Overview",
                    "chapter": "Introduction",
                    "headings": [
                        {
                            "title": "Overview",
                            "level": 1,
                            "anchor": null,
                            "children": [
                                {"title": "Getting started", "level": 2, "anchor": "getting-started", "children": []}
                            ]
                        }
                    ]
                },
                {
                    "source": "content/01_ch01.qmd",
                    "output": "content/01_ch01.html",
                    "title": "Project Outline",
                    "chapter": "Chapter 1"
                }
            ]
        }"#
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest = PageManifest::from_json(sample_json()).unwrap();
        assert_eq!(manifest.pages.len(), 2);
        assert_eq!(manifest.pages[0].headings.len(), 1);
        assert_eq!(manifest.pages[0].headings[0].children.len(), 1);
        assert_eq!(manifest.pages[1].chapter, "Chapter 1");
    }

    #[test]
    fn test_manifest_rejects_empty_page_list() {
        let err = PageManifest::from_json(r#"{"pages": []}"#).unwrap_err();
        assert!(err.to_string().contains("no pages"));
    }

    #[test]
    fn test_manifest_rejects_malformed_json() {
        assert!(PageManifest::from_json("{not json").is_err());
    }

    #[test]
    fn test_page_index_seeds_triples() {
        let manifest = PageManifest::from_json(sample_json()).unwrap();
        let index = manifest.page_index();

        assert_eq!(index.len(), 2);
        assert_eq!(index[0].url, "index.html");
        assert_eq!(index[0].title, "Overview");
        assert_eq!(index[0].chapter, "Introduction");
        assert_eq!(index[1].url, "content/01_ch01.html");
    }

    #[test]
    fn test_page_by_url() {
        let manifest = PageManifest::from_json(sample_json()).unwrap();
        assert!(manifest.page_by_url("index.html").is_some());
        assert!(manifest.page_by_url("missing.html").is_none());
    }

    #[test]
    fn test_chapter_defaults_to_empty() {
        let json = r#"{"pages": [{"output": "a.html", "title": "A"}]}"#;
        let manifest = PageManifest::from_json(json).unwrap();
        assert_eq!(manifest.pages[0].chapter, "");
    }
}
