//! Quire Search Library
//!
//! The pure, DOM-free part of the cross-page search subsystem: literal
//! content scanning with snippet extraction, result aggregation, incremental
//! pagination, and the occurrence tracker used for on-page highlighting.
//!
//! Everything here is deterministic and runs identically on native targets
//! and WebAssembly; the browser runtime lives in `quire-search-wasm`.

pub mod escape;
pub mod paginate;
pub mod scanner;
pub mod tracker;

pub use escape::escape_html;
pub use paginate::{GroupHeader, RenderItem, ResultsView, Summary};
pub use scanner::{MatchResult, normalize_text, search_in_content, sort_by_score};
pub use scanner::{to_session_results, total_match_count};
pub use tracker::OccurrenceTracker;

/// Hard cap on occurrence offsets collected per page. Bounds worst-case
/// scan latency against very large documents.
pub const MAX_MATCHES_SCAN: usize = 400;

/// Maximum snippets emitted per page; matches beyond it are only counted.
pub const MAX_SNIPPETS_PER_PAGE: usize = 20;

/// Characters of context kept on each side of a match in a snippet.
pub const SNIPPET_RADIUS: usize = 80;

/// Minimum query length that triggers a search.
pub const MIN_QUERY_LEN: usize = 2;

/// Results rendered per "load more" step.
pub const CHUNK_SIZE: usize = 20;
