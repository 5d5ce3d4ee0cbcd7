//! The persisted search session.
//!
//! When the reader selects a search result the full result set, the query,
//! and the selected match are written to session storage. The destination
//! page reads the record back after the navigation and re-highlights the
//! selected occurrence.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Fixed session-storage key for the search session record.
pub const SESSION_STORAGE_KEY: &str = "quire-search-session";

/// A serializable search result, stripped of any DOM references.
///
/// `context` is the pre-rendered HTML snippet; it is persisted verbatim and
/// never re-derived on restore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionResult {
    /// Resolved (absolute) URL of the page holding the match.
    pub url: String,

    /// Page title.
    pub title: String,

    /// Chapter grouping label.
    #[serde(default)]
    pub chapter: String,

    /// Highlighted HTML snippet.
    #[serde(default)]
    pub context: String,

    /// Total matches on the page (same as `total_matches`, kept for the
    /// stored record's self-description).
    #[serde(default = "one")]
    pub match_count: u32,

    /// Total matches found on the page, bounded by the scan cap.
    #[serde(default = "one")]
    pub total_matches: u32,

    /// Matches beyond the per-page snippet cap; non-zero only on the last
    /// emitted snippet of a capped page.
    #[serde(default)]
    pub remaining_matches: u32,

    /// 0-based position of this snippet within the page's emitted matches.
    #[serde(default)]
    pub match_index: u32,
}

fn one() -> u32 {
    1
}

/// The reader's selected match within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveMatch {
    /// Resolved URL of the selected result.
    pub url: String,

    /// 0-based occurrence index to re-highlight on the target page.
    #[serde(default)]
    pub match_index: u32,
}

/// The last executed search, persisted across page navigations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSession {
    /// The query string the results belong to.
    pub query: String,

    /// Ordered result records.
    pub results: Vec<SessionResult>,

    /// The selected result, if the reader picked one.
    #[serde(default)]
    pub active: Option<ActiveMatch>,

    /// Milliseconds since the epoch at save time.
    #[serde(default)]
    pub timestamp_ms: f64,
}

impl SearchSession {
    /// Serialize the session to JSON for storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a stored session.
    ///
    /// Rejects malformed JSON and records with an empty query or an empty
    /// result list; a rejected record is treated as an absent session by
    /// callers.
    pub fn from_json(json: &str) -> Result<Self> {
        let session: SearchSession = serde_json::from_str(json)?;
        if session.query.trim().is_empty() {
            return Err(CoreError::session("stored session has an empty query"));
        }
        if session.results.is_empty() {
            return Err(CoreError::session("stored session has no results"));
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> SearchSession {
        SearchSession {
            query: "peace".to_string(),
            results: vec![SessionResult {
                url: "https://example.org/content/01_ch01.html".to_string(),
                title: "Project Outline".to_string(),
                chapter: "Chapter 1".to_string(),
                context: "…a lasting <mark>peace</mark>…".to_string(),
                match_count: 3,
                total_matches: 3,
                remaining_matches: 0,
                match_index: 1,
            }],
            active: Some(ActiveMatch {
                url: "https://example.org/content/01_ch01.html".to_string(),
                match_index: 1,
            }),
            timestamp_ms: 1_700_000_000_000.0,
        }
    }

    #[test]
    fn test_session_round_trip() {
        let session = sample_session();
        let json = session.to_json().unwrap();
        let restored = SearchSession::from_json(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_session_rejects_empty_query() {
        let mut session = sample_session();
        session.query = "  ".to_string();
        let json = session.to_json().unwrap();
        assert!(SearchSession::from_json(&json).is_err());
    }

    #[test]
    fn test_session_rejects_empty_results() {
        let mut session = sample_session();
        session.results.clear();
        let json = session.to_json().unwrap();
        assert!(SearchSession::from_json(&json).is_err());
    }

    #[test]
    fn test_session_rejects_malformed_json() {
        assert!(SearchSession::from_json("{\"query\":").is_err());
        assert!(SearchSession::from_json("[1,2,3]").is_err());
    }

    #[test]
    fn test_session_defaults_for_missing_fields() {
        let json = r#"{
            "query": "peace",
            "results": [{"url": "a.html", "title": "A"}]
        }"#;
        let session = SearchSession::from_json(json).unwrap();
        assert!(session.active.is_none());
        assert_eq!(session.results[0].match_count, 1);
        assert_eq!(session.results[0].total_matches, 1);
        assert_eq!(session.results[0].remaining_matches, 0);
        assert_eq!(session.results[0].match_index, 0);
    }

    #[test]
    fn test_active_match_survives_round_trip() {
        let session = sample_session();
        let restored = SearchSession::from_json(&session.to_json().unwrap()).unwrap();
        let active = restored.active.unwrap();
        assert_eq!(active.match_index, 1);
    }
}
