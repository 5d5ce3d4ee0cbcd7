//! Table-of-contents overlay with three tabs.
//!
//! The tab contents are built from the page manifest by pure functions so
//! they can be tested off the browser: a flat chapter list, the heading
//! outline of the current page, and the full site outline (every page with
//! its headings).

use leptos::prelude::*;
use quire_core::{Heading, ManifestPage, PageManifest};

/// One entry in the site navigation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub url: String,
    pub title: String,
    pub chapter: String,
    /// Whether this is the page currently loaded.
    pub current: bool,
}

/// One flattened outline row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    /// Heading level, 1-based. Page titles in the full outline are level 1.
    pub level: u8,
    pub anchor: Option<String>,
    /// Target page, when the entry may live on another page.
    pub page_url: Option<String>,
}

impl OutlineEntry {
    /// Link target for this entry, if it has one.
    pub fn href(&self) -> Option<String> {
        match (&self.page_url, &self.anchor) {
            (Some(url), Some(anchor)) => Some(format!("{url}#{anchor}")),
            (Some(url), None) => Some(url.clone()),
            (None, Some(anchor)) => Some(format!("#{anchor}")),
            (None, None) => None,
        }
    }
}

/// Navigation list over every page, in manifest order. The entry whose URL
/// equals `current_url` is marked current.
pub fn site_nav_items(manifest: &PageManifest, current_url: Option<&str>) -> Vec<NavItem> {
    manifest
        .page_index()
        .into_iter()
        .map(|entry| {
            let current = current_url == Some(entry.url.as_str());
            NavItem {
                url: entry.url,
                title: entry.title,
                chapter: entry.chapter,
                current,
            }
        })
        .collect()
}

/// Heading outline of a single page, flattened in document order.
pub fn page_outline(page: &ManifestPage) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    flatten_headings(&page.headings, None, &mut entries);
    entries
}

/// Full site outline: each page title followed by its headings.
pub fn full_outline(manifest: &PageManifest) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    for page in &manifest.pages {
        entries.push(OutlineEntry {
            title: page.title.clone(),
            level: 1,
            anchor: None,
            page_url: Some(page.output.clone()),
        });
        flatten_headings(&page.headings, Some(&page.output), &mut entries);
    }
    entries
}

fn flatten_headings(headings: &[Heading], page_url: Option<&str>, out: &mut Vec<OutlineEntry>) {
    for heading in headings {
        out.push(OutlineEntry {
            title: heading.title.clone(),
            level: heading.level,
            anchor: heading.anchor.clone(),
            page_url: page_url.map(str::to_string),
        });
        flatten_headings(&heading.children, page_url, out);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TocTab {
    Chapters,
    ThisPage,
    Contents,
}

/// Tabbed table-of-contents overlay.
#[component]
pub fn TocSwitcher(
    /// Whether the overlay is open.
    open: RwSignal<bool>,
    /// Site navigation entries.
    nav: Vec<NavItem>,
    /// Outline of the current page.
    outline: Vec<OutlineEntry>,
    /// Full site outline.
    contents: Vec<OutlineEntry>,
) -> impl IntoView {
    let tab = RwSignal::new(TocTab::Chapters);
    let nav = StoredValue::new(nav);
    let outline = StoredValue::new(outline);
    let contents = StoredValue::new(contents);

    let close = move || open.set(false);
    let tab_class = move |which: TocTab| {
        move || {
            if tab.get() == which {
                "toc-tab toc-tab-active"
            } else {
                "toc-tab"
            }
        }
    };

    let outline_list = move |entries: Vec<OutlineEntry>| {
        if entries.is_empty() {
            return view! { <p class="toc-outline-empty">"No headings on this page."</p> }
                .into_any();
        }
        view! {
          <ul class="toc-outline">
            {entries
                .into_iter()
                .map(|entry| {
                    let class = format!("toc-outline-entry toc-level-{}", entry.level);
                    let href = entry.href();
                    let title = entry.title;
                    view! {
                      <li class=class>
                        {match href {
                            Some(href) => {
                                view! {
                                  <a href=href on:click=move |_| close()>
                                    {title.clone()}
                                  </a>
                                }
                                    .into_any()
                            }
                            None => view! { <span>{title.clone()}</span> }.into_any(),
                        }}
                      </li>
                    }
                })
                .collect_view()}
          </ul>
        }
        .into_any()
    };

    view! {
      <Show when=move || open.get()>
        <div class="toc-overlay" on:click=move |_| close()>
          <div class="toc-panel" on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()>
            <div class="toc-tabs">
              <button class=tab_class(TocTab::Chapters) on:click=move |_| tab.set(TocTab::Chapters)>
                "Chapters"
              </button>
              <button class=tab_class(TocTab::ThisPage) on:click=move |_| tab.set(TocTab::ThisPage)>
                "On this page"
              </button>
              <button class=tab_class(TocTab::Contents) on:click=move |_| tab.set(TocTab::Contents)>
                "Contents"
              </button>
            </div>
            {move || match tab.get() {
                TocTab::Chapters => {
                    view! {
                      <ul class="toc-nav">
                        {nav
                            .get_value()
                            .into_iter()
                            .map(|item| {
                                let class = if item.current {
                                    "toc-nav-entry toc-nav-current"
                                } else {
                                    "toc-nav-entry"
                                };
                                view! {
                                  <li class=class>
                                    <a href=item.url on:click=move |_| close()>
                                      {item.title}
                                    </a>
                                  </li>
                                }
                            })
                            .collect_view()}
                      </ul>
                    }
                        .into_any()
                }
                TocTab::ThisPage => outline_list(outline.get_value()),
                TocTab::Contents => outline_list(contents.get_value()),
            }}
          </div>
        </div>
      </Show>
    }
}
