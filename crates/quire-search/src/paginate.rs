//! Incremental result pagination.
//!
//! `ResultsView` is the single in-flight search/pagination context. The
//! overlay owns one instance, hands it to the results pane, and resets it at
//! the lifecycle boundaries (open, close, new search) so no cursor state
//! leaks from one search into the next.

use crate::scanner::{MatchResult, total_match_count};
use crate::CHUNK_SIZE;

/// A chapter/page boundary header inserted between result groups.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupHeader {
    /// Chapter label shown as the group heading.
    pub chapter: String,
}

/// One renderable row: an optional group header followed by a result.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    /// Header to insert before this result, when the chapter or page
    /// changed relative to the previously rendered result.
    pub header: Option<GroupHeader>,

    /// The result itself.
    pub result: MatchResult,
}

/// Summary numbers for the results header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Total matches including those beyond the snippet cap.
    pub total_matches: usize,

    /// Snippets rendered so far.
    pub shown: usize,

    /// Matches counted but never snippeted.
    pub hidden: usize,
}

/// The pagination state for one executed search.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    results: Vec<MatchResult>,
    query: String,
    rendered: usize,
    last_chapter: String,
    last_page: String,
}

impl ResultsView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh result set, discarding any previous cursor state.
    pub fn begin(&mut self, results: Vec<MatchResult>, query: impl Into<String>) {
        self.reset();
        self.results = results;
        self.query = query.into();
    }

    /// Drop all state. Called when the overlay closes.
    pub fn reset(&mut self) {
        self.results.clear();
        self.query.clear();
        self.rendered = 0;
        self.last_chapter.clear();
        self.last_page.clear();
    }

    /// Render the next chunk of pending results.
    ///
    /// Emits up to [`CHUNK_SIZE`] rows, inserting a group header whenever a
    /// result's chapter differs from the last rendered chapter or its page
    /// differs from the last rendered page. Advances the cursor.
    pub fn next_chunk(&mut self) -> Vec<RenderItem> {
        let end = self.results.len().min(self.rendered + CHUNK_SIZE);
        let mut items = Vec::with_capacity(end.saturating_sub(self.rendered));

        for index in self.rendered..end {
            let result = self.results[index].clone();
            let chapter = result.page.chapter.clone();
            let page_url = result.page.url.clone();

            let header = if !chapter.is_empty()
                && (chapter != self.last_chapter || page_url != self.last_page)
            {
                Some(GroupHeader {
                    chapter: chapter.clone(),
                })
            } else {
                None
            };
            if header.is_some() {
                self.last_chapter = chapter;
                self.last_page = page_url;
            }

            items.push(RenderItem { header, result });
        }

        self.rendered = end;
        items
    }

    /// Whether every result has been rendered.
    pub fn is_exhausted(&self) -> bool {
        self.rendered >= self.results.len()
    }

    /// Snippets rendered so far.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Total snippet records held by the view.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// The query the current results belong to.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The full result set, in render order.
    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    /// Whether the view currently holds any results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Summary numbers reflecting hidden (capped) matches.
    pub fn summary(&self) -> Summary {
        let hidden = total_match_count(&self.results) - self.results.len();
        Summary {
            total_matches: total_match_count(&self.results),
            shown: self.rendered.min(self.results.len()),
            hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use quire_core::PageEntry;

    use super::*;
    use crate::scanner::search_in_content;

    fn page(url: &str, chapter: &str) -> PageEntry {
        PageEntry {
            url: url.to_string(),
            title: format!("Title of {url}"),
            chapter: chapter.to_string(),
        }
    }

    fn results_for(content: &str, query: &str, url: &str, chapter: &str) -> Vec<MatchResult> {
        search_in_content(content, query, &page(url, chapter))
    }

    #[test]
    fn test_chunking_respects_chunk_size() {
        let content = "word ".repeat(50); // 50 matches -> 20 snippets
        let mut all = results_for(&content, "word", "a.html", "Ch 1");
        all.extend(results_for(&content, "word", "b.html", "Ch 2"));
        assert_eq!(all.len(), 40);

        let mut view = ResultsView::new();
        view.begin(all, "word");

        let first = view.next_chunk();
        assert_eq!(first.len(), CHUNK_SIZE);
        assert!(!view.is_exhausted());

        let second = view.next_chunk();
        assert_eq!(second.len(), CHUNK_SIZE);
        assert!(view.is_exhausted());
        assert!(view.next_chunk().is_empty());
    }

    #[test]
    fn test_group_headers_on_chapter_and_page_boundaries() {
        let mut all = results_for("hit hit", "hit", "a.html", "Ch 1");
        all.extend(results_for("hit", "hit", "b.html", "Ch 1"));
        all.extend(results_for("hit", "hit", "c.html", "Ch 2"));

        let mut view = ResultsView::new();
        view.begin(all, "hit");
        let items = view.next_chunk();

        // Header on the first result, on the page change within Ch 1, and
        // on the chapter change; not between snippets of the same page.
        let headers: Vec<bool> = items.iter().map(|i| i.header.is_some()).collect();
        assert_eq!(headers, vec![true, false, true, true]);
        assert_eq!(items[3].header.as_ref().unwrap().chapter, "Ch 2");
    }

    #[test]
    fn test_no_header_for_empty_chapter() {
        let all = results_for("hit", "hit", "a.html", "");
        let mut view = ResultsView::new();
        view.begin(all, "hit");
        let items = view.next_chunk();
        assert!(items[0].header.is_none());
    }

    #[test]
    fn test_summary_counts_hidden_matches() {
        let content = "term ".repeat(450); // 400 counted, 20 snippeted
        let all = results_for(&content, "term", "a.html", "Ch 1");

        let mut view = ResultsView::new();
        view.begin(all, "term");
        view.next_chunk();

        let summary = view.summary();
        assert_eq!(summary.total_matches, 400);
        assert_eq!(summary.shown, 20);
        assert_eq!(summary.hidden, 380);
    }

    #[test]
    fn test_begin_resets_previous_cursor() {
        let mut view = ResultsView::new();
        view.begin(results_for("hit hit hit", "hit", "a.html", "Ch 1"), "hit");
        view.next_chunk();
        assert_eq!(view.rendered(), 3);

        view.begin(results_for("hit", "hit", "b.html", "Ch 2"), "hit");
        assert_eq!(view.rendered(), 0);
        let items = view.next_chunk();
        assert_eq!(items.len(), 1);
        // Grouping state was reset too: the first result gets a header.
        assert!(items[0].header.is_some());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut view = ResultsView::new();
        view.begin(results_for("hit", "hit", "a.html", "Ch 1"), "hit");
        view.next_chunk();
        view.reset();

        assert!(view.is_empty());
        assert_eq!(view.rendered(), 0);
        assert_eq!(view.query(), "");
        assert!(view.is_exhausted());
    }
}
