//! HTML page assembly.
//!
//! Everything user-controlled that ends up in markup — titles, dates,
//! difficulties, tags, excerpts, TOC ids and texts, other articles' titles in
//! the sidebar — flows through [maud](https://maud.lambda.xyz/) interpolation
//! and is therefore entity-escaped at the insertion point. The single
//! exception is the rendered markdown body, which is inserted with
//! `PreEscaped`: the renderer owns that HTML and the escape decision is
//! visible right where the trust boundary sits.
//!
//! ## Article page layout
//!
//! ```text
//! header            ← back link to the home page
//! .article-layout
//! ├── .sidebar-left    every article in the catalog, current one marked active
//! ├── .article-main    title, difficulty/date/read-time meta row, tags, body
//! └── .sidebar-right   table of contents (h2/h3)
//! ```
//!
//! Output is a deterministic function of the inputs: no timestamps or
//! generated ids beyond what the metadata supplies, so rebuilding unchanged
//! sources produces byte-identical pages.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::build::CatalogEntry;
use crate::metadata::ResolvedMetadata;
use crate::toc::TocEntry;

/// Assemble one complete article page.
///
/// `catalog` is every discovered article in listing order; `current_id` marks
/// which sidebar entry gets the active indicator.
pub fn article_page(
    meta: &ResolvedMetadata,
    body_html: &str,
    toc: &[TocEntry],
    catalog: &[CatalogEntry],
    current_id: &str,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) " | mdpress" }
                link rel="stylesheet" href="../static/main.css";
            }
            body {
                header {
                    div.container {
                        a.back href="../index.html" { "← Back to home" }
                    }
                }
                div.article-layout {
                    aside.sidebar-left {
                        (sidebar_articles(catalog, current_id))
                    }
                    main.article-main {
                        div.article-header {
                            h1 { (meta.title) }
                            div.article-meta {
                                span class={ "difficulty " (meta.difficulty.to_lowercase()) } {
                                    (meta.difficulty)
                                }
                                span { (meta.date) }
                                span { (meta.read_time) " min read" }
                            }
                            div.article-tags {
                                @for tag in &meta.tags {
                                    span.article-tag { (tag) }
                                }
                            }
                        }
                        // The only raw insertion: rendered markdown from our
                        // own renderer, trusted per its contract.
                        div.article-content { (PreEscaped(body_html)) }
                    }
                    aside.sidebar-right {
                        (toc_outline(toc))
                    }
                }
                footer {
                    div.container {
                        p { "Built with mdpress." }
                    }
                }
            }
        }
    }
}

/// Article-list sidebar shown on every page.
fn sidebar_articles(catalog: &[CatalogEntry], current_id: &str) -> Markup {
    html! {
        h3 { "Write-ups" }
        div.sidebar-articles {
            @for entry in catalog {
                a.sidebar-article-item.active[entry.id == current_id]
                    href={ (entry.id) ".html" } {
                    div.sidebar-article-title { (entry.title) }
                    div.sidebar-article-meta {
                        span class={ "sidebar-difficulty " (entry.difficulty.to_lowercase()) } {
                            (entry.difficulty)
                        }
                        span { (entry.date) }
                    }
                }
            }
        }
    }
}

/// Right-hand table of contents. Empty outline renders nothing at all.
fn toc_outline(toc: &[TocEntry]) -> Markup {
    html! {
        @if !toc.is_empty() {
            h3 { "Contents" }
            ul.toc-list {
                @for entry in toc {
                    li class={ "toc-item toc-item-h" (entry.level) } {
                        a.toc-link href={ "#" (entry.id) } { (entry.text) }
                    }
                }
            }
        }
    }
}

/// Assemble one index-page card for an article.
///
/// `dir` is the output directory name the card links into, relative to the
/// index file (normally `articles`).
pub fn index_card(meta: &ResolvedMetadata, id: &str, dir: &str) -> Markup {
    html! {
        div.article-card {
            a href={ (dir) "/" (id) ".html" } {
                div.card-content {
                    h3.card-title { (meta.title) }
                    div.card-meta {
                        span.card-date { (meta.date) }
                        span class={ "card-difficulty " (meta.difficulty.to_lowercase()) } {
                            (meta.difficulty)
                        }
                        span.card-read-time { (meta.read_time) " min read" }
                    }
                    p.card-description { (meta.excerpt) }
                    div.card-tags {
                        @for tag in &meta.tags {
                            span.card-tag { (tag) }
                        }
                    }
                }
            }
        }
    }
}
