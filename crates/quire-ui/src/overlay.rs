//! The search overlay.
//!
//! A single modal instance owns the whole search lifecycle: debounced
//! input, the loading state, the pagination context, and teardown. All
//! result state lives in a [`ResultsView`] owned here and reset at the
//! lifecycle boundaries (open, close, new search), so nothing leaks from
//! one search into the next.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use quire_search::{MIN_QUERY_LEN, MatchResult, ResultsView};
use wasm_bindgen::{JsCast, prelude::*};

use crate::results::{PaneMode, SearchResultsPane};

/// Input debounce window in milliseconds.
const DEBOUNCE_MS: u32 = 300;

/// The trimmed query, when long enough to trigger a search.
fn searchable_query(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (trimmed.chars().count() >= MIN_QUERY_LEN).then(|| trimmed.to_string())
}

/// Progress of the currently displayed search.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchOutcome {
    /// No search executed for the current input.
    #[default]
    Idle,
    /// A scan is in flight.
    Loading,
    /// A scan finished (possibly with recovered partial failures).
    Ready {
        query: String,
        results: Vec<MatchResult>,
    },
}

/// A selected result together with the context needed to persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSelection {
    /// The chosen snippet.
    pub result: MatchResult,
    /// The full result set at selection time, in render order.
    pub results: Vec<MatchResult>,
    /// The query the results belong to.
    pub query: String,
}

/// Modal search overlay.
///
/// `open` controls visibility (single instance by construction), `query`
/// holds the input text, and `outcome` is written by the host when a scan
/// completes. `on_search` is invoked with the trimmed query whenever a
/// scan should start; `on_select` when the reader picks a result. Writing
/// `request` opens the overlay with the given query and searches it
/// immediately, whether or not the overlay was already open.
#[component]
pub fn SearchOverlay(
    /// Whether the overlay is open.
    open: RwSignal<bool>,
    /// The search input text.
    query: RwSignal<String>,
    /// Externally requested query; consumed on arrival.
    request: RwSignal<Option<String>>,
    /// Scan progress, written by the host.
    outcome: RwSignal<SearchOutcome>,
    /// Invoked when a scan should start.
    on_search: Callback<String>,
    /// Invoked when the reader selects a result.
    on_select: Callback<ResultSelection>,
) -> impl IntoView {
    let view_state = RwSignal::new(ResultsView::new());
    let items = RwSignal::new(Vec::new());
    let summary = RwSignal::new(None);
    let exhausted = RwSignal::new(true);
    let pending_debounce = StoredValue::new_local(None::<Timeout>);
    let input_ref = NodeRef::<leptos::html::Input>::new();

    let cancel_debounce = move || {
        pending_debounce.update_value(|slot| {
            if let Some(timeout) = slot.take() {
                timeout.cancel();
            }
        });
    };

    let begin_search = move |trimmed: String| {
        outcome.set(SearchOutcome::Loading);
        on_search.run(trimmed);
    };

    // Reset everything the overlay owns. Runs on close and before the
    // prompt state takes over after the input is cleared externally.
    let close = move || {
        cancel_debounce();
        open.set(false);
        query.set(String::new());
        outcome.set(SearchOutcome::Idle);
        view_state.update(|view| view.reset());
        items.set(Vec::new());
        summary.set(None);
        exhausted.set(true);
    };

    // Install finished scans into the pagination context.
    Effect::new(move |_| {
        if let SearchOutcome::Ready { query, results } = outcome.get() {
            view_state.update(|view| {
                view.begin(results, query);
                items.set(view.next_chunk());
                summary.set(Some(view.summary()));
                exhausted.set(view.is_exhausted());
            });
        }
    });

    // Focus the input on open.
    Effect::new(move |_| {
        if open.get() {
            if let Some(input) = input_ref.get() {
                let _ = input.focus();
            }
        }
    });

    // Host-page open requests, also honored while already open.
    Effect::new(move |_| {
        if let Some(initial) = request.get() {
            cancel_debounce();
            query.set(initial.clone());
            open.set(true);
            if let Some(q) = searchable_query(&initial) {
                begin_search(q);
            }
            request.set(None);
        }
    });

    // Escape closes from anywhere while the overlay is up. The listener is
    // document-level so it works even when focus has left the overlay.
    let escape_handler = StoredValue::new_local(None::<Closure<dyn Fn(web_sys::KeyboardEvent)>>);
    Effect::new(move |_| {
        let is_open = open.get();
        let Some(doc) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        escape_handler.update_value(|slot| {
            if is_open {
                if slot.is_some() {
                    return;
                }
                let handler = Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(
                    move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Escape" {
                            ev.prevent_default();
                            close();
                        }
                    },
                );
                let _ = doc
                    .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref());
                *slot = Some(handler);
            } else if let Some(handler) = slot.take() {
                let _ = doc.remove_event_listener_with_callback(
                    "keydown",
                    handler.as_ref().unchecked_ref(),
                );
            }
        });
    });

    // Lock body scrolling while the overlay is up.
    Effect::new(move |_| {
        let is_open = open.get();
        if let Some(body) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
        {
            let class_list = body.class_list();
            let _ = if is_open {
                class_list.add_1("search-overlay-active")
            } else {
                class_list.remove_1("search-overlay-active")
            };
        }
    });

    let on_input = move |ev| {
        let value = event_target_value(&ev);
        query.set(value.clone());
        cancel_debounce();

        if let Some(q) = searchable_query(&value) {
            let timeout = Timeout::new(DEBOUNCE_MS, move || begin_search(q));
            pending_debounce.set_value(Some(timeout));
        }
        // Clearing the input falls back to the prompt via the pane mode;
        // the underlying view state is intentionally left alone.
    };

    let submit = move || {
        cancel_debounce();
        if let Some(q) = searchable_query(&query.get_untracked()) {
            begin_search(q);
        }
    };

    let on_input_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            submit();
        }
    };

    let on_content_click = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
    };

    let pane_mode = Memo::new(move |_| {
        if query.with(|q| q.trim().is_empty()) {
            return PaneMode::Prompt;
        }
        outcome.with(|outcome| match outcome {
            SearchOutcome::Idle => PaneMode::Prompt,
            SearchOutcome::Loading => PaneMode::Loading,
            SearchOutcome::Ready { results, .. } => {
                if results.is_empty() {
                    PaneMode::Empty
                } else {
                    PaneMode::Results
                }
            }
        })
    });

    let on_load_more = Callback::new(move |()| {
        view_state.update(|view| {
            let mut chunk = view.next_chunk();
            items.update(|existing| existing.append(&mut chunk));
            summary.set(Some(view.summary()));
            exhausted.set(view.is_exhausted());
        });
    });

    let select = Callback::new(move |result: MatchResult| {
        let selection = view_state.with_untracked(|view| ResultSelection {
            result,
            results: view.results().to_vec(),
            query: view.query().to_string(),
        });
        close();
        on_select.run(selection);
    });

    view! {
      <Show when=move || open.get()>
        <div class="quire-search-overlay" on:click=move |_| close()>
          <div class="search-overlay-backdrop"></div>
          <div class="search-overlay-content" on:click=on_content_click>
            <div class="search-input-container">
              <input
                node_ref=input_ref
                type="search"
                class="search-input"
                placeholder="Search all chapters..."
                prop:value=move || query.get()
                on:input=on_input
                on:keydown=on_input_keydown
              />
              <button class="search-execute-btn" on:click=move |_| submit()>
                "Search"
              </button>
              <Show when=move || outcome.with(|o| matches!(o, SearchOutcome::Loading))>
                <span class="search-spinner" aria-label="Loading"></span>
              </Show>
            </div>
            <div class="search-results-container">
              <div class="search-results-header">
                <h2>"Search results"</h2>
                <button
                  class="search-close-btn"
                  on:click=move |_| close()
                  aria-label="Close search"
                >
                  "×"
                </button>
              </div>
              <SearchResultsPane
                mode=pane_mode.into()
                query=query
                items=items
                summary=summary
                exhausted=exhausted
                on_load_more=on_load_more
                on_select=select
              />
            </div>
          </div>
        </div>
      </Show>
    }
}

/// Global keyboard shortcut: the platform modifier plus K opens the
/// overlay.
#[component]
pub fn SearchShortcut(
    /// Signal to control overlay open state.
    open: RwSignal<bool>,
) -> impl IntoView {
    Effect::new(move |_| {
        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
                if ev.key() == "k" && (ev.meta_key() || ev.ctrl_key()) {
                    ev.prevent_default();
                    open.set(true);
                }
            });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref());
        }

        // Leak the closure to keep the listener alive for the page's life.
        handler.forget();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searchable_query_requires_two_chars() {
        assert_eq!(searchable_query("peace"), Some("peace".to_string()));
        assert_eq!(searchable_query("ab"), Some("ab".to_string()));
        assert_eq!(searchable_query("a"), None);
        assert_eq!(searchable_query(""), None);
    }

    #[test]
    fn test_searchable_query_trims_before_counting() {
        assert_eq!(searchable_query("  ok  "), Some("ok".to_string()));
        assert_eq!(searchable_query(" a "), None);
        assert_eq!(searchable_query("   "), None);
    }

    #[test]
    fn test_searchable_query_counts_chars_not_bytes() {
        // Two characters, six bytes.
        assert_eq!(searchable_query("平和"), Some("平和".to_string()));
    }
}
