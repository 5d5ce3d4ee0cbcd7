//! Result list rendering.
//!
//! The pane is a pure view over state owned by the overlay: the current
//! chunk of render items, the summary, and the exhaustion flag. Grouping
//! headers are decided upstream by the pagination context, so rendering
//! stays a straight pass over the items.

use leptos::prelude::*;
use quire_search::{MatchResult, RenderItem, Summary};

/// What the pane should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneMode {
    /// No query yet. Show the prompt.
    Prompt,
    /// A scan is running.
    Loading,
    /// The scan finished with no matches.
    Empty,
    /// Matches to show.
    Results,
}

/// "n/total" position of a snippet within its page's matches.
fn order_label(result: &MatchResult) -> String {
    format!("{}/{}", result.match_index + 1, result.match_count)
}

/// Page-level match count, shown on every row.
fn count_label(result: &MatchResult) -> String {
    let noun = if result.match_count == 1 {
        "match"
    } else {
        "matches"
    };
    format!("{} {noun}", result.match_count)
}

/// Grouped, incrementally paginated search result list.
#[component]
pub fn SearchResultsPane(
    /// Which state to render.
    mode: Signal<PaneMode>,
    /// Current query, for the empty-state message.
    query: RwSignal<String>,
    /// Items revealed so far, in render order.
    items: RwSignal<Vec<RenderItem>>,
    /// Totals for the summary line.
    summary: RwSignal<Option<Summary>>,
    /// Whether every result has been revealed.
    exhausted: RwSignal<bool>,
    /// Reveal the next chunk.
    on_load_more: Callback<()>,
    /// Invoked with the clicked result.
    on_select: Callback<MatchResult>,
) -> impl IntoView {
    let summary_line = move || {
        summary.get().map(|s| {
            let noun = if s.total_matches == 1 {
                "match"
            } else {
                "matches"
            };
            if s.hidden > 0 {
                format!(
                    "{} {noun} · showing {} results, {} more available",
                    s.total_matches, s.shown, s.hidden
                )
            } else {
                format!("{} {noun}", s.total_matches)
            }
        })
    };

    view! {
      <div class="search-results">
        {move || match mode.get() {
            PaneMode::Prompt => {
                view! {
                  <p class="search-results-prompt">
                    "Type at least two characters to search across all pages."
                  </p>
                }
                    .into_any()
            }
            PaneMode::Loading => {
                view! { <p class="search-results-loading">"Searching..."</p> }.into_any()
            }
            PaneMode::Empty => {
                view! {
                  <p class="search-results-empty">
                    "No matches for \"" {move || query.get()} "\"."
                  </p>
                }
                    .into_any()
            }
            PaneMode::Results => {
                view! {
                  <p class="search-results-summary">{summary_line}</p>
                  <ul class="search-results-list">
                    <For
                      each=move || items.get()
                      key=|item| (item.result.page.url.clone(), item.result.match_index)
                      children=move |item: RenderItem| {
                          let header = item.header.map(|header| {
                              view! {
                                <li class="search-results-group">
                                  <span class="search-results-chapter">{header.chapter}</span>
                                </li>
                              }
                          });
                          let result = item.result;
                          let title = result.page.title.clone();
                          let context = result.context.clone();
                          let order = order_label(&result);
                          let count = count_label(&result);
                          let select = move |_| on_select.run(result.clone());
                          view! {
                            {header}
                            <li class="search-result-item">
                              <button class="search-result-link" on:click=select>
                                <span class="search-result-title">{title}</span>
                                <span class="search-result-order">{order}</span>
                                <span class="search-result-count">{count}</span>
                                <span class="search-result-context" inner_html=context></span>
                              </button>
                            </li>
                          }
                      }
                    />
                  </ul>
                  <Show when=move || !exhausted.get()>
                    <button class="search-load-more" on:click=move |_| on_load_more.run(())>
                      "Show more results"
                    </button>
                  </Show>
                }
                    .into_any()
            }
        }}
      </div>
    }
}

#[cfg(test)]
mod tests {
    use quire_core::PageEntry;

    use super::*;

    fn result(match_index: u32, match_count: u32) -> MatchResult {
        MatchResult {
            page: PageEntry {
                url: "a.html".to_string(),
                title: "A".to_string(),
                chapter: "Ch 1".to_string(),
            },
            score: match_count,
            context: String::new(),
            match_count,
            match_index,
            total_matches: match_count,
            remaining_matches: 0,
        }
    }

    #[test]
    fn test_order_label_is_one_based() {
        assert_eq!(order_label(&result(0, 5)), "1/5");
        assert_eq!(order_label(&result(4, 5)), "5/5");
    }

    #[test]
    fn test_count_label_on_every_row() {
        // Every snippet of a page carries the page's count.
        assert_eq!(count_label(&result(0, 3)), "3 matches");
        assert_eq!(count_label(&result(1, 3)), "3 matches");
        assert_eq!(count_label(&result(2, 3)), "3 matches");
    }

    #[test]
    fn test_count_label_singular() {
        assert_eq!(count_label(&result(0, 1)), "1 match");
    }
}
