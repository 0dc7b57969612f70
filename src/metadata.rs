//! Metadata resolution: defaults and derived fields.
//!
//! Raw front matter is sparse — most articles set a title and tags and
//! nothing else. [`resolve`] is a pure function from `(raw, stem, body)` to a
//! fully-populated [`ResolvedMetadata`], so the defaulting rules are testable
//! without touching the filesystem and no shared map gets mutated along the
//! way.
//!
//! ## Defaulting rules (applied only when the field is absent)
//!
//! - **title**: filename stem with `_`/`-` converted to spaces, title-cased
//!   (`htb_blue_machine` → "Htb Blue Machine")
//! - **date**: today, `YYYY-MM-DD`
//! - **difficulty**: `Easy`
//! - **excerpt**: body with markdown punctuation (`#`, `*`, backtick,
//!   brackets) stripped, first 150 characters, plus a trailing `...`
//! - **tags**: empty
//!
//! ## Reading time
//!
//! Write-ups are read slower than prose — they're mostly terminal output and
//! code the reader works through. So the estimate depends on content type:
//!
//! 1. An explicit `reading_speed` (chars/minute) in the front matter wins.
//! 2. Otherwise the type is the explicit `type` field, or inferred from tags:
//!    any of htb/thm/vulnhub/ctf/hackthebox (case-insensitive) → `writeup`.
//! 3. Speed: `writeup` 150 chars/min, `article` (and anything else) 200.
//! 4. Minutes = `max(1, round(chars / speed))`. Rounding is `f64::round`,
//!    half away from zero. Character count is of the raw markdown body,
//!    before rendering.

use crate::frontmatter::RawMetadata;

/// Tags that mark an article as a machine write-up when no explicit type is set.
const WRITEUP_TAGS: &[&str] = &["htb", "thm", "vulnhub", "ctf", "hackthebox"];

/// Characters per minute by content type.
const SPEED_WRITEUP: f64 = 150.0;
const SPEED_ARTICLE: f64 = 200.0;

/// Characters kept in a generated excerpt.
const EXCERPT_LEN: usize = 150;

/// Fully-resolved article metadata. Every field is populated; downstream code
/// never needs to re-apply defaults.
#[derive(Debug, Clone)]
pub struct ResolvedMetadata {
    pub title: String,
    pub date: String,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub featured: bool,
    /// Estimated reading time in whole minutes, always at least 1.
    pub read_time: u64,
}

/// Resolve raw front matter against a document.
///
/// `stem` is the source filename without extension (the article identifier);
/// `body` is the raw markdown text. Pure except for reading the clock when
/// the date defaults.
pub fn resolve(raw: &RawMetadata, stem: &str, body: &str) -> ResolvedMetadata {
    let title = match &raw.title {
        Some(t) => t.clone(),
        None => title_from_stem(stem),
    };
    let date = match &raw.date {
        Some(d) => d.clone(),
        None => chrono::Local::now().format("%Y-%m-%d").to_string(),
    };
    let difficulty = raw.difficulty.clone().unwrap_or_else(|| "Easy".to_string());
    let excerpt = match &raw.excerpt {
        Some(e) => e.clone(),
        None => default_excerpt(body),
    };

    ResolvedMetadata {
        title,
        date,
        difficulty,
        tags: raw.tags.clone(),
        excerpt,
        featured: raw.featured,
        read_time: reading_time(raw, body),
    }
}

/// Derive a display title from a filename stem: separators become spaces,
/// each word gets an initial capital.
fn title_from_stem(stem: &str) -> String {
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Build an excerpt from the body: strip markdown punctuation, keep the first
/// [`EXCERPT_LEN`] characters, append an ellipsis marker.
fn default_excerpt(body: &str) -> String {
    let stripped: String = body
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`' | '[' | ']'))
        .take(EXCERPT_LEN)
        .collect();
    format!("{stripped}...")
}

/// Estimated reading time in minutes for a markdown body.
pub fn reading_time(raw: &RawMetadata, body: &str) -> u64 {
    let chars = body.chars().count() as f64;

    // Explicit override wins. Non-positive speeds make no sense and are
    // treated as absent.
    if let Some(speed) = raw.reading_speed.filter(|s| *s > 0.0) {
        return minutes(chars, speed);
    }

    let kind = match &raw.kind {
        Some(k) => k.clone(),
        None => infer_kind(&raw.tags),
    };
    let speed = match kind.as_str() {
        "writeup" => SPEED_WRITEUP,
        _ => SPEED_ARTICLE,
    };
    minutes(chars, speed)
}

fn infer_kind(tags: &[String]) -> String {
    let is_writeup = tags
        .iter()
        .any(|t| WRITEUP_TAGS.contains(&t.to_lowercase().as_str()));
    if is_writeup { "writeup" } else { "article" }.to_string()
}

fn minutes(chars: f64, speed: f64) -> u64 {
    ((chars / speed).round() as u64).max(1)
}
