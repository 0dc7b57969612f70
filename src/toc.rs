//! Table-of-contents extraction from rendered HTML.
//!
//! Scans a rendered article body for `<h2>`/`<h3>` elements that carry an
//! `id` attribute and turns them into a flat outline in document order. The
//! renderer assigns those ids ([`crate::markdown`]), so in practice every
//! heading appears here; headings that somehow lack an id have no anchor
//! target and are skipped rather than treated as an error.
//!
//! The input is derived from untrusted markdown, so every capture is bounded:
//! ids at 200 characters, remaining tag attributes at 100, inner text cut to
//! 500 before tag stripping. The `regex` engine runs in linear time, so even
//! adversarial heading soup cannot blow up the scan.

use std::sync::OnceLock;

use regex::Regex;

/// One outline entry. `level` is 2 or 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Inner text is cut to this many characters before tags are stripped.
const MAX_TEXT_LEN: usize = 500;

static HEADING_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    // Bounded captures: id ≤ 200 chars, trailing attributes ≤ 100 chars.
    HEADING_RE.get_or_init(|| {
        Regex::new(r#"(?s)<h([23])\s+id="([^"]{0,200})"[^>]{0,100}>(.*?)</h[23]>"#).unwrap()
    })
}

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

/// Extract h2/h3 headings with ids from rendered HTML, in document order.
pub fn extract(html: &str) -> Vec<TocEntry> {
    heading_re()
        .captures_iter(html)
        .map(|caps| {
            let level = if &caps[1] == "2" { 2 } else { 3 };
            let raw_text: String = caps[3].chars().take(MAX_TEXT_LEN).collect();
            TocEntry {
                level,
                id: caps[2].to_string(),
                text: tag_re().replace_all(&raw_text, "").into_owned(),
            }
        })
        .collect()
}
