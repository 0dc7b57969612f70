//! Project scaffolding: `init` and `new`.
//!
//! `init` lays down everything a fresh project needs: the articles directory,
//! the article template (excluded from builds and from the preview server),
//! an example article, the index page with its article-list markers, and the
//! stylesheet. All content is embedded at compile time, so the binary is
//! self-contained. Existing files are left untouched — `init` is safe to
//! re-run.
//!
//! `new` creates an article from the on-disk template, prompting for any
//! value not given on the command line. The title is the only untrusted
//! input that becomes a filename, so it goes through
//! [`crate::naming::sanitize_title`] and the containment check before
//! anything is written.

use std::fs;
use std::io::{self, BufRead, Write as _};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::build::TEMPLATE_FILE;
use crate::naming::{self, NamingError};

const TEMPLATE: &str = include_str!("../static/article-template.md");
const EXAMPLE: &str = include_str!("../static/example.md");
const INDEX: &str = include_str!("../static/index.html");
const CSS: &str = include_str!("../static/main.css");

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Naming(#[from] NamingError),
}

/// Scaffold a project under `root`.
pub fn init(root: &Path, articles_dir: &Path, index_file: &Path) -> Result<(), ScaffoldError> {
    println!("Initializing project...");
    fs::create_dir_all(articles_dir)?;
    fs::create_dir_all(root.join("static"))?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    write_if_absent(&root.join(TEMPLATE_FILE), &TEMPLATE.replace("{date}", &today))?;
    write_if_absent(&articles_dir.join("example.md"), EXAMPLE)?;
    write_if_absent(index_file, INDEX)?;
    write_if_absent(&root.join("static/main.css"), CSS)?;

    println!("Done. Run: mdpress new");
    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> io::Result<()> {
    if path.exists() {
        println!("  {} exists, keeping it", path.display());
        return Ok(());
    }
    fs::write(path, content)?;
    println!("  created {}", path.display());
    Ok(())
}

/// Create a new article from the template.
///
/// Prompts on stdin for any of title/difficulty/tags not supplied. Returns
/// the path of the created file, or `None` when the user declined an
/// overwrite. A title that sanitizes to nothing is an error.
pub fn new_article(
    root: &Path,
    articles_dir: &Path,
    title: Option<String>,
    difficulty: Option<String>,
    tags: Option<String>,
) -> Result<Option<PathBuf>, ScaffoldError> {
    println!("\nNew article");
    let title = match title {
        Some(t) => t,
        None => prompt("Machine name: ")?,
    };
    let difficulty = non_empty_or(difficulty, "Difficulty [Easy]: ", "Easy")?;
    let tags = non_empty_or(tags, "Tags [HTB,Linux]: ", "HTB,Linux")?;
    let featured = prompt("Featured? (y/n) [n]: ")?.eq_ignore_ascii_case("y");

    let safe_title = naming::sanitize_title(&title);
    let path = naming::confined_path(articles_dir, &format!("{safe_title}.md"))?;

    if path.exists() && !prompt("File exists, overwrite? (y/n): ")?.eq_ignore_ascii_case("y") {
        return Ok(None);
    }

    // Prefer the project's own template so users can customize it; fall back
    // to the embedded copy.
    let template = fs::read_to_string(root.join(TEMPLATE_FILE)).unwrap_or_else(|_| {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        TEMPLATE.replace("{date}", &today)
    });
    let content = fill_template(&template, &title, &difficulty, &tags, featured);
    fs::write(&path, content)?;
    println!("Created {}", path.display());

    if prompt("Edit now? (y/n): ")?.eq_ignore_ascii_case("y") {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
        // The article is already on disk; a broken editor setup is reported
        // but doesn't undo anything.
        if let Err(e) = Command::new(&editor).arg(&path).status() {
            eprintln!("error: failed to launch editor {editor}: {e}");
        }
    }
    println!("Run: mdpress build");
    Ok(Some(path))
}

/// Substitute the template's placeholder values.
pub fn fill_template(
    template: &str,
    title: &str,
    difficulty: &str,
    tags: &str,
    featured: bool,
) -> String {
    template
        .replace("Machine Name", title)
        .replace("difficulty: Easy", &format!("difficulty: {difficulty}"))
        .replace("tags: [HTB, Linux, Web]", &format!("tags: [{tags}]"))
        .replace("featured: false", &format!("featured: {featured}"))
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn non_empty_or(value: Option<String>, message: &str, default: &str) -> io::Result<String> {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        return Ok(v);
    }
    let answer = prompt(message)?;
    Ok(if answer.is_empty() { default.to_string() } else { answer })
}
