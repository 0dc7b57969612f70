//! Filename derivation from untrusted titles.
//!
//! `mdpress new` takes an arbitrary title string and needs a filename inside
//! the articles directory. Two layers of defense:
//!
//! 1. [`sanitize_title`] maps the title to a conservative identifier —
//!    alphanumerics and separators only, bounded length, no path separators
//!    can survive.
//! 2. [`confined_path`] verifies the final path still resolves inside the
//!    articles directory before anything is written. Sanitization should make
//!    this impossible to fail, but file writes are where a bug would hurt, so
//!    the containment check is enforced independently.
//!
//! A title that sanitizes to nothing (all punctuation, say) is refused rather
//! than silently writing `.md`.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamingError {
    #[error("title contains no usable characters")]
    EmptyIdentifier,
    #[error("refusing path outside the articles directory: {0}")]
    OutsideArticlesDir(PathBuf),
    #[error("cannot resolve articles directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Maximum identifier length, in characters.
const MAX_TITLE_LEN: usize = 100;

/// Map an arbitrary title to a filesystem-safe identifier.
///
/// Keeps alphanumerics, whitespace, and hyphens; drops everything else.
/// Truncates to [`MAX_TITLE_LEN`] characters, lowercases, collapses
/// whitespace runs to a single `_`, and trims separator edges.
///
/// `"HTB: Blue Machine!"` → `"htb_blue_machine"`, and traversal attempts
/// like `"../../etc/passwd"` lose their separators entirely (`"etcpasswd"`).
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .take(MAX_TITLE_LEN)
        .collect();

    kept.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches(|c| c == '_' || c == '-')
        .to_string()
}

/// Build the path for `file_name` inside `dir`, verifying containment.
///
/// `dir` must exist. The check resolves `dir` and rejects any file name that
/// carries path components of its own, so even a caller that bypassed
/// [`sanitize_title`] cannot escape the directory.
pub fn confined_path(dir: &Path, file_name: &str) -> Result<PathBuf, NamingError> {
    if file_name.is_empty() {
        return Err(NamingError::EmptyIdentifier);
    }
    let resolved_dir = dir.canonicalize()?;
    let candidate = resolved_dir.join(file_name);

    // A multi-component file name (separators, `..`) would land elsewhere.
    let escapes = candidate.parent() != Some(resolved_dir.as_path())
        || candidate
            .file_name()
            .map(|n| n.to_string_lossy() != file_name)
            .unwrap_or(true);
    if escapes {
        return Err(NamingError::OutsideArticlesDir(candidate));
    }
    Ok(candidate)
}
