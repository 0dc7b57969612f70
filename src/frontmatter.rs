//! Front matter extraction with safety bounds.
//!
//! A document may start with a YAML block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: "HTB: Example"
//! tags: [HTB, Linux]
//! ---
//! ## Recon
//! ...
//! ```
//!
//! The block is untrusted input — the user edits these files by hand and may
//! paste in anything — so parsing is defensive on three axes:
//!
//! - **Size guard**: blocks over [`MAX_FRONT_MATTER_BYTES`] are not parsed at
//!   all (YAML-bomb protection). The whole file becomes the body.
//! - **Shape guard**: a block that parses to a scalar or sequence instead of a
//!   mapping is discarded rather than propagated downstream in a shape the
//!   rest of the pipeline doesn't expect.
//! - **Safe parsing**: `serde_yaml` only ever constructs plain scalars,
//!   sequences, and mappings. No tag resolution, no arbitrary types.
//!
//! Every failure mode degrades to "no metadata" with a stderr diagnostic;
//! none of them can fail a build.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// Upper bound on the delimited YAML block, in bytes.
pub const MAX_FRONT_MATTER_BYTES: usize = 10_240;

/// Metadata as written in the front matter block. Every recognized field is
/// optional; defaulting happens later in [`crate::metadata::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub date: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub excerpt: Option<String>,
    /// Explicit content type: `writeup` or `article`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Explicit reading speed override, in characters per minute.
    pub reading_speed: Option<f64>,
    /// Unrecognized keys are preserved but unused.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

static FRONT_MATTER_RE: OnceLock<Regex> = OnceLock::new();

fn front_matter_re() -> &'static Regex {
    FRONT_MATTER_RE.get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*\n(.*)$").unwrap())
}

/// Split a document into (metadata, body).
///
/// `name` is used only in diagnostics so the user can tell which file
/// triggered a guard. Documents without a leading `---` line are valid and
/// return the entire text as body with empty metadata.
pub fn parse<'a>(name: &str, content: &'a str) -> (RawMetadata, &'a str) {
    let Some(caps) = front_matter_re().captures(content) else {
        return (RawMetadata::default(), content);
    };
    let yaml = caps.get(1).unwrap().as_str();
    let body = caps.get(2).unwrap().as_str();

    if yaml.len() > MAX_FRONT_MATTER_BYTES {
        eprintln!("warning: {name}: front matter exceeds {MAX_FRONT_MATTER_BYTES} bytes, using defaults");
        return (RawMetadata::default(), content);
    }

    let value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("warning: {name}: invalid front matter YAML ({e}), using defaults");
            return (RawMetadata::default(), content);
        }
    };

    if !value.is_mapping() {
        eprintln!("warning: {name}: front matter is not a key-value mapping, using defaults");
        return (RawMetadata::default(), body);
    }

    match serde_yaml::from_value(value) {
        Ok(raw) => (raw, body),
        Err(e) => {
            eprintln!("warning: {name}: front matter field has wrong type ({e}), using defaults");
            (RawMetadata::default(), body)
        }
    }
}
