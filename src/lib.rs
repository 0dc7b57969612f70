//! # mdpress
//!
//! A minimal static blog generator for CTF write-ups and technical articles.
//! Your articles directory is the data source: each markdown file with an
//! optional YAML front matter block becomes one HTML page, and the home page's
//! article list is rewritten in place on every build.
//!
//! # Architecture: Two-Pass Build
//!
//! A build runs in two passes over the same set of documents:
//!
//! ```text
//! 1. Collect   articles/*.md  →  catalog            (front matter → resolved metadata)
//! 2. Render    catalog        →  articles/*.html    (markdown → full pages + index cards)
//! ```
//!
//! The catalog is complete before any page is rendered, so every page's
//! sidebar can link to every other page — including ones rendered later —
//! without any render depending on another document's rendered output. This
//! keeps the whole build single-threaded and sequential with no coordination.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Splits a document into metadata block + body, with size and shape guards |
//! | [`metadata`] | Fills defaults and computes derived fields: reading time, excerpt, type inference |
//! | [`markdown`] | Markdown → HTML fragment with slugified heading ids for TOC anchoring |
//! | [`toc`] | Scans rendered HTML for h2/h3 headings and produces a navigable outline |
//! | [`assemble`] | Maud templates for article pages and index cards — escaping by construction |
//! | [`build`] | Orchestration: discovery, the two passes, output writes, index region rewrite |
//! | [`naming`] | Untrusted title → filesystem-safe identifier, confined to the articles directory |
//! | [`scaffold`] | `init` and `new` — project skeleton and article creation from the template |
//! | [`serve`] | Loopback-only preview server with a sensitive-path denylist |
//!
//! # Design Decisions
//!
//! ## Maud Over String Templates
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. All interpolation is auto-escaped, so untrusted front matter
//! (titles, tags, excerpts) cannot inject markup anywhere; the rendered
//! markdown body is the single `PreEscaped` insertion point, and that trust
//! boundary is visible in the code rather than enforced by discipline.
//!
//! ## Hostile Front Matter Is Survivable
//!
//! Front matter comes from files the user edits by hand, so every failure mode
//! is recoverable: oversized blocks, YAML syntax errors, and non-mapping
//! shapes all degrade to "no metadata" with a diagnostic, and the document
//! still builds with defaults. Only an unreadable articles directory aborts a
//! build.
//!
//! ## Full Rebuilds Only
//!
//! Every build re-parses and re-renders every document. The corpus is dozens
//! of articles, a build finishes in well under a second, and byte-identical
//! idempotent output is worth more than incremental speed here.

pub mod assemble;
pub mod build;
pub mod frontmatter;
pub mod markdown;
pub mod metadata;
pub mod naming;
pub mod scaffold;
pub mod serve;
pub mod toc;
