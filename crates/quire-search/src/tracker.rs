//! Global occurrence tracking for on-page highlighting.
//!
//! After navigating to a result, the runtime walks the document's text
//! nodes in order and feeds each node's text through a tracker until the
//! selected occurrence is located. The tracker applies the same
//! case-insensitive literal matching as the content scanner, counting
//! occurrences across node boundaries.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// Counts query occurrences across successive text fragments.
#[derive(Debug)]
pub struct OccurrenceTracker {
    pattern: Option<Regex>,
    target_index: u32,
    seen: u32,
}

impl OccurrenceTracker {
    /// Create a tracker looking for the `target_index`-th occurrence
    /// (0-based) of `query`.
    pub fn new(query: &str, target_index: u32) -> Self {
        let pattern = if query.is_empty() {
            None
        } else {
            RegexBuilder::new(&regex::escape(query))
                .case_insensitive(true)
                .build()
                .ok()
        };
        Self {
            pattern,
            target_index,
            seen: 0,
        }
    }

    /// Scan one fragment. Returns the byte range of the target occurrence
    /// within this fragment if it lives here; otherwise advances the
    /// global count and returns `None`.
    pub fn feed(&mut self, text: &str) -> Option<Range<usize>> {
        let pattern = self.pattern.as_ref()?;
        for m in pattern.find_iter(text) {
            if self.seen == self.target_index {
                return Some(m.range());
            }
            self.seen += 1;
        }
        None
    }

    /// Occurrences seen so far without finding the target.
    pub fn seen(&self) -> u32 {
        self.seen
    }
}
