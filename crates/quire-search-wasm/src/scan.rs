//! The cross-page scanner.
//!
//! Iterates the page index, obtaining each page's text through the store
//! (live DOM, cache, or fetch) and delegating the per-page scan to
//! `quire_search`. Fetches run sequentially; a failed page is skipped and
//! never aborts the whole search.

use std::fmt::Display;

use quire_core::PageEntry;
use quire_search::{MatchResult, search_in_content, sort_by_score};

use crate::extract::extract_live;
use crate::pages::{CONTENT_SELECTOR, PageStore};

/// Search every indexed page for `query`, sorted by descending page score.
///
/// On a `file:` origin cross-page fetching is impossible, so the scan is
/// narrowed to the current page with a logged warning.
pub async fn search_across_pages(store: &PageStore, query: &str) -> Vec<MatchResult> {
    if is_file_protocol() {
        log::warn!("file: origin detected; cross-page search disabled, scanning current page only");
        let entry = store.current_page_entry();
        let content = extract_live(CONTENT_SELECTOR);
        let pages: [(PageEntry, Result<String, crate::RuntimeError>); 1] = [(entry, Ok(content))];
        return aggregate_results(pages, query);
    }

    let mut fetched = Vec::with_capacity(store.entries().len());
    for entry in store.entries() {
        fetched.push((entry.clone(), store.content_for(entry).await));
    }
    aggregate_results(fetched, query)
}

/// Fold per-page fetch outcomes into one sorted result list.
///
/// A page whose content could not be obtained is logged and skipped; the
/// remaining pages are scanned and the whole set sorted by score.
fn aggregate_results<E: Display>(
    pages: impl IntoIterator<Item = (PageEntry, Result<String, E>)>,
    query: &str,
) -> Vec<MatchResult> {
    let mut results = Vec::new();
    for (entry, content) in pages {
        match content {
            Ok(content) => {
                results.extend(search_in_content(&content, query, &entry));
            }
            Err(err) => {
                log::warn!("skipping {} during search: {err}", entry.url);
            }
        }
    }
    sort_by_score(&mut results);
    results
}

fn is_file_protocol() -> bool {
    web_sys::window()
        .and_then(|window| window.location().protocol().ok())
        .is_some_and(|protocol| protocol == "file:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeError;

    fn page(url: &str) -> PageEntry {
        PageEntry {
            url: url.to_string(),
            title: format!("Title of {url}"),
            chapter: "Ch 1".to_string(),
        }
    }

    #[test]
    fn test_failed_page_is_skipped_without_aborting() {
        let pages = vec![
            (page("1.html"), Ok("quiet morning".to_string())),
            (page("2.html"), Ok("a lasting peace".to_string())),
            (page("3.html"), Err(RuntimeError::Http(404))),
            (page("4.html"), Ok("peace and peace".to_string())),
        ];

        let results = aggregate_results(pages, "peace");
        assert!(results.iter().all(|r| r.page.url != "3.html"));
        // Two-match page outranks the one-match page.
        assert_eq!(results[0].page.url, "4.html");
        assert_eq!(results.last().unwrap().page.url, "2.html");
    }

    #[test]
    fn test_all_failures_yield_empty_result() {
        let pages: Vec<(PageEntry, Result<String, RuntimeError>)> = vec![
            (page("1.html"), Ok("no hits here".to_string())),
            (page("2.html"), Ok(String::new())),
            (page("3.html"), Err(RuntimeError::Http(404))),
            (page("4.html"), Err(RuntimeError::Network("refused".to_string()))),
        ];

        assert!(aggregate_results(pages, "peace").is_empty());
    }

    #[test]
    fn test_current_page_only_scope_misses_other_pages() {
        // Narrowed scope feeds only the current page's text, so a query
        // present elsewhere in the index finds nothing.
        let pages: Vec<(PageEntry, Result<String, RuntimeError>)> =
            vec![(page("current.html"), Ok("nothing relevant".to_string()))];

        assert!(aggregate_results(pages, "peace").is_empty());
    }

    #[test]
    fn test_results_sorted_by_descending_score() {
        let pages: Vec<(PageEntry, Result<String, RuntimeError>)> = vec![
            (page("one.html"), Ok("term".to_string())),
            (page("three.html"), Ok("term term term".to_string())),
            (page("two.html"), Ok("term term".to_string())),
        ];

        let results = aggregate_results(pages, "term");
        let scores: Vec<u32> = results.iter().map(|r| r.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
        assert_eq!(results[0].page.url, "three.html");
    }
}
