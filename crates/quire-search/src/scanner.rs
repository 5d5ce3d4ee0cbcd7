//! Per-page content scanning and result aggregation.
//!
//! The scan is a case-insensitive literal substring search: the query is
//! regex-escaped before compilation, so user-supplied metacharacters are
//! never honored and the pattern can never be invalid.

use quire_core::{PageEntry, SessionResult};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::escape::escape_html;
use crate::{MAX_MATCHES_SCAN, MAX_SNIPPETS_PER_PAGE, SNIPPET_RADIUS};

/// One snippeted match on a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    /// The page the match was found on.
    pub page: PageEntry,

    /// Page-level relevance: the page's total match count. Every snippet of
    /// a page carries the same score so the sort keeps pages contiguous.
    pub score: u32,

    /// HTML snippet with occurrences wrapped in `<mark>`.
    pub context: String,

    /// Total matches on the page (bounded by the scan cap).
    pub match_count: u32,

    /// 0-based position of this snippet within the page's emitted matches.
    pub match_index: u32,

    /// Same as `match_count`; kept distinct in the record shape because the
    /// stored session mirrors both fields.
    pub total_matches: u32,

    /// Matches beyond the snippet cap, attached to the last emitted snippet
    /// of a capped page and zero everywhere else.
    pub remaining_matches: u32,
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Compile the query as a case-insensitive literal pattern.
fn literal_pattern(query: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            // Unreachable for escaped literals; guard anyway.
            log::warn!("failed to compile search pattern: {err}");
            None
        }
    }
}

/// Scan one page's text for a query, emitting snippeted match records.
///
/// Occurrence offsets are collected up to [`MAX_MATCHES_SCAN`]; at most
/// [`MAX_SNIPPETS_PER_PAGE`] snippets are emitted, each an 80-character
/// window on either side of the occurrence with every in-window occurrence
/// highlighted. The last snippet of a capped page carries the count of
/// matches that were found but not snippeted.
pub fn search_in_content(content: &str, query: &str, page: &PageEntry) -> Vec<MatchResult> {
    let mut results = Vec::new();
    if content.is_empty() || query.is_empty() {
        return results;
    }

    let normalized = normalize_text(content);
    if normalized.is_empty() {
        return results;
    }

    let Some(pattern) = literal_pattern(query) else {
        return results;
    };

    let occurrences: Vec<std::ops::Range<usize>> = pattern
        .find_iter(&normalized)
        .take(MAX_MATCHES_SCAN)
        .map(|m| m.range())
        .collect();

    let total_matches = occurrences.len();
    if total_matches == 0 {
        return results;
    }

    let limit = total_matches.min(MAX_SNIPPETS_PER_PAGE);
    for (index, occurrence) in occurrences.iter().take(limit).enumerate() {
        let start = floor_char_boundary(&normalized, occurrence.start.saturating_sub(SNIPPET_RADIUS));
        let end = ceil_char_boundary(
            &normalized,
            (occurrence.end + SNIPPET_RADIUS).min(normalized.len()),
        );

        let mut snippet = highlight_window(&normalized[start..end], &pattern);
        if start > 0 {
            snippet.insert(0, '…');
        }
        if end < normalized.len() {
            snippet.push('…');
        }

        let remaining = if total_matches > limit && index == limit - 1 {
            total_matches - limit
        } else {
            0
        };
        if remaining > 0 {
            snippet.push_str(&format!(
                "<span class=\"search-result-more\">{remaining} more matches</span>"
            ));
        }

        results.push(MatchResult {
            page: page.clone(),
            score: total_matches as u32,
            context: snippet,
            match_count: total_matches as u32,
            match_index: index as u32,
            total_matches: total_matches as u32,
            remaining_matches: remaining as u32,
        });
    }

    results
}

/// Escape a snippet window and wrap every query occurrence in `<mark>`.
fn highlight_window(window: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(window.len() + 16);
    let mut cursor = 0;
    for m in pattern.find_iter(window) {
        out.push_str(&escape_html(&window[cursor..m.start()]));
        out.push_str("<mark>");
        out.push_str(&escape_html(m.as_str()));
        out.push_str("</mark>");
        cursor = m.end();
    }
    out.push_str(&escape_html(&window[cursor..]));
    out
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Sort aggregated results by descending page score.
///
/// The sort is stable: records of equally-scored pages, and the snippet
/// order within one page, are left untouched.
pub fn sort_by_score(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Total matches represented by a result set, including matches that were
/// counted but not snippeted.
pub fn total_match_count(results: &[MatchResult]) -> usize {
    results.len()
        + results
            .iter()
            .map(|r| r.remaining_matches as usize)
            .sum::<usize>()
}

/// Convert results to the serializable session shape.
///
/// `resolve` maps a page-relative URL to the absolute form stored in the
/// session; the browser runtime resolves against the current location.
pub fn to_session_results(
    results: &[MatchResult],
    resolve: impl Fn(&str) -> String,
) -> Vec<SessionResult> {
    results
        .iter()
        .map(|result| SessionResult {
            url: resolve(&result.page.url),
            title: result.page.title.clone(),
            chapter: result.page.chapter.clone(),
            context: result.context.clone(),
            match_count: result.match_count,
            total_matches: result.total_matches,
            remaining_matches: result.remaining_matches,
            match_index: result.match_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageEntry {
        PageEntry {
            url: "content/01_ch01.html".to_string(),
            title: "Project Outline".to_string(),
            chapter: "Chapter 1".to_string(),
        }
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("a\t b\n\n  c"), "a b c");
        assert_eq!(normalize_text("  leading and trailing  "), "leading and trailing");
        assert_eq!(normalize_text("\n\t "), "");
    }

    #[test]
    fn test_substring_matches_counted() {
        // "at" occurs inside "cat", "sat", and "mat".
        let results = search_in_content("the cat sat on the mat", "at", &page());
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.total_matches == 3));
        assert!(results.iter().all(|r| r.remaining_matches == 0));
        assert_eq!(
            results.iter().map(|r| r.match_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_case_insensitive_highlight() {
        let results = search_in_content("Peace talks. PEACE now.", "peace", &page());
        assert_eq!(results.len(), 2);
        assert!(results[0].context.contains("<mark>Peace</mark>"));
        assert!(results[0].context.contains("<mark>PEACE</mark>"));
    }

    #[test]
    fn test_scan_cap_and_snippet_cap() {
        let content = "term ".repeat(450);
        let results = search_in_content(&content, "term", &page());

        assert_eq!(results.len(), MAX_SNIPPETS_PER_PAGE);
        assert!(results.iter().all(|r| r.total_matches == 400));
        let last = results.last().unwrap();
        assert_eq!(last.remaining_matches, 380);
        assert!(last.context.contains("380 more matches"));
        assert!(results[..results.len() - 1]
            .iter()
            .all(|r| r.remaining_matches == 0));
    }

    #[test]
    fn test_totals_never_exceed_caps() {
        let content = "x".repeat(10).replace('x', "needle haystack ");
        let results = search_in_content(&content, "needle", &page());
        assert!(results.len() <= MAX_SNIPPETS_PER_PAGE);
        assert!(results.iter().all(|r| (r.total_matches as usize) <= MAX_MATCHES_SCAN));
    }

    #[test]
    fn test_idempotence() {
        let content = "alpha beta alpha gamma alpha";
        let first = search_in_content(content, "alpha", &page());
        let second = search_in_content(content, "alpha", &page());
        assert_eq!(first, second);
    }

    #[test]
    fn test_ellipses_mark_truncated_windows() {
        let long = format!("{}needle{}", "a".repeat(200), "b".repeat(200));
        let results = search_in_content(&long, "needle", &page());
        assert_eq!(results.len(), 1);
        assert!(results[0].context.starts_with('…'));
        assert!(results[0].context.ends_with('…'));

        let short = "needle in a short text";
        let results = search_in_content(short, "needle", &page());
        assert!(!results[0].context.starts_with('…'));
        assert!(!results[0].context.ends_with('…'));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let results = search_in_content("cost is $4.99 (sale)", "$4.99 (sale)", &page());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].total_matches, 1);
        assert!(search_in_content("aaaa", "a+", &page()).is_empty());
    }

    #[test]
    fn test_snippet_windows_are_char_safe() {
        // Multi-byte text around the window edges must not split a char.
        let content = format!("{}平和への課題{}", "あ".repeat(60), "い".repeat(60));
        let results = search_in_content(&content, "課題", &page());
        assert_eq!(results.len(), 1);
        assert!(results[0].context.contains("<mark>課題</mark>"));
    }

    #[test]
    fn test_snippet_escapes_html() {
        let results = search_in_content("x <b>needle</b> & y", "needle", &page());
        assert!(results[0].context.contains("&lt;b&gt;"));
        assert!(results[0].context.contains("&amp;"));
        assert!(results[0].context.contains("<mark>needle</mark>"));
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(search_in_content("some content", "absent", &page()).is_empty());
        assert!(search_in_content("", "query", &page()).is_empty());
        assert!(search_in_content("content", "", &page()).is_empty());
    }

    #[test]
    fn test_sort_by_score_is_stable_descending() {
        let mut results = Vec::new();
        let mut page_a = page();
        page_a.url = "a.html".to_string();
        let mut page_b = page();
        page_b.url = "b.html".to_string();

        results.extend(search_in_content("hit", "hit", &page_a));
        results.extend(search_in_content("hit hit hit", "hit", &page_b));
        sort_by_score(&mut results);

        assert_eq!(results[0].page.url, "b.html");
        assert_eq!(results.last().unwrap().page.url, "a.html");
        // Snippet order within the winning page is preserved.
        let b_indices: Vec<u32> = results
            .iter()
            .filter(|r| r.page.url == "b.html")
            .map(|r| r.match_index)
            .collect();
        assert_eq!(b_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_total_match_count_includes_hidden() {
        let content = "term ".repeat(450);
        let results = search_in_content(&content, "term", &page());
        assert_eq!(total_match_count(&results), 20 + 380);
    }

    #[test]
    fn test_to_session_results() {
        let results = search_in_content("peace and peace", "peace", &page());
        let session = to_session_results(&results, |url| format!("https://example.org/{url}"));

        assert_eq!(session.len(), 2);
        assert_eq!(session[0].url, "https://example.org/content/01_ch01.html");
        assert_eq!(session[0].title, "Project Outline");
        assert_eq!(session[1].match_index, 1);
        assert_eq!(session[0].total_matches, 2);
    }
}
