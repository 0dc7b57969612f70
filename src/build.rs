//! Build orchestration.
//!
//! A build moves through fixed stages with no retries:
//!
//! ```text
//! Discover → CollectMetadata → RenderPages → RewriteIndex → Done
//! ```
//!
//! - **Discover**: every `*.md` in the articles directory except the
//!   scaffold template, newest modification first. That ordering drives both
//!   the index card order and `list` numbering. Failure to enumerate the
//!   directory is the one fatal error in a build.
//! - **CollectMetadata**: parse and resolve front matter for every document
//!   before rendering anything, so each page's sidebar can list all articles,
//!   including ones not yet rendered. Per-document parse problems degrade to
//!   defaults and the build proceeds.
//! - **RenderPages**: markdown → TOC → full page, written to
//!   `<output>/<id>.html` as a whole-file replacement. Also produces each
//!   article's index card fragment.
//! - **RewriteIndex**: replace the region between the two marker comments in
//!   the index file with the concatenated cards, preserving everything
//!   outside the markers byte-for-byte. A missing index file is a diagnostic,
//!   not an error.

use std::cmp::Reverse;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::SystemTime;

use regex::Regex;
use thiserror::Error;
use walkdir::WalkDir;

use crate::metadata::{self, ResolvedMetadata};
use crate::{assemble, frontmatter, markdown, toc};

/// Scaffold file excluded from every build.
pub const TEMPLATE_FILE: &str = "article-template.md";

/// Markers delimiting the index page's generated article-list region.
pub const LIST_START: &str = "<!-- ARTICLE_LIST_START -->";
pub const LIST_END: &str = "<!-- ARTICLE_LIST_END -->";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot read articles directory {dir}: {source}")]
    Source {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-article summary used to render cross-article UI: the sidebar on every
/// page and the cards on the index. Built during the collect pass, read-only
/// afterward.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    /// Display-cased as written; lowercasing for CSS classes happens at
    /// render time.
    pub difficulty: String,
    pub date: String,
}

/// One discovered source document.
struct Document {
    id: String,
    content: String,
}

/// An article after the collect pass: resolved metadata plus its markdown body.
struct Article {
    id: String,
    meta: ResolvedMetadata,
    body: String,
}

/// What a build did, for CLI reporting and tests.
pub struct BuildSummary {
    pub pages: usize,
    pub index_updated: bool,
}

pub struct SiteBuilder {
    source: PathBuf,
    output: PathBuf,
    index_file: PathBuf,
}

impl SiteBuilder {
    pub fn new(source: PathBuf, output: PathBuf, index_file: PathBuf) -> Self {
        Self {
            source,
            output,
            index_file,
        }
    }

    /// Run the full pipeline.
    pub fn build(&self) -> Result<BuildSummary, BuildError> {
        let documents = self.discover()?;
        if documents.is_empty() {
            println!("No articles in {}", self.source.display());
            return Ok(BuildSummary {
                pages: 0,
                index_updated: false,
            });
        }

        let (articles, catalog) = collect_metadata(&documents);

        fs::create_dir_all(&self.output).map_err(|source| BuildError::Write {
            path: self.output.clone(),
            source,
        })?;

        let mut cards = Vec::with_capacity(articles.len());
        for article in &articles {
            let body_html = markdown::render(&article.body);
            let outline = toc::extract(&body_html);
            let page =
                assemble::article_page(&article.meta, &body_html, &outline, &catalog, &article.id);

            let out_path = self.output.join(format!("{}.html", article.id));
            fs::write(&out_path, page.into_string()).map_err(|source| BuildError::Write {
                path: out_path.clone(),
                source,
            })?;
            println!("  {}.md → {}.html", article.id, article.id);

            cards.push(assemble::index_card(&article.meta, &article.id, self.output_dir_name()).into_string());
        }

        let index_updated = self.rewrite_index(&cards)?;
        println!("Built {} articles", articles.len());
        Ok(BuildSummary {
            pages: articles.len(),
            index_updated,
        })
    }

    /// Print the catalog summary for the `list` subcommand.
    pub fn list(&self) -> Result<(), BuildError> {
        let documents = self.discover()?;
        let (articles, _) = collect_metadata(&documents);
        for (i, article) in articles.iter().enumerate() {
            let featured = if article.meta.featured { '*' } else { ' ' };
            println!(
                "{:2}. {} [{:<6}] {}",
                i + 1,
                featured,
                article.meta.difficulty,
                article.meta.title
            );
        }
        Ok(())
    }

    /// Enumerate source documents, newest-modified first.
    ///
    /// An unreadable directory aborts; an unreadable individual file is
    /// reported and skipped.
    fn discover(&self) -> Result<Vec<Document>, BuildError> {
        let mut found: Vec<(PathBuf, SystemTime)> = Vec::new();
        for entry in WalkDir::new(&self.source).max_depth(1) {
            let entry = entry.map_err(|e| BuildError::Source {
                dir: self.source.clone(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().map(|e| e != "md").unwrap_or(true)
                || entry.file_name() == TEMPLATE_FILE
            {
                continue;
            }
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            found.push((path.to_path_buf(), modified));
        }

        // Newest first; stem as tie-break keeps the order reproducible when
        // mtimes collide (common on fast test filesystems).
        found.sort_by_key(|(path, modified)| (Reverse(*modified), path.clone()));

        let mut documents = Vec::with_capacity(found.len());
        for (path, _) in found {
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match fs::read_to_string(&path) {
                Ok(content) => documents.push(Document { id, content }),
                Err(e) => eprintln!("warning: skipping unreadable {}: {e}", path.display()),
            }
        }
        Ok(documents)
    }

    /// Replace the marked article-list region of the index file.
    ///
    /// Returns whether the index was updated. Missing file or missing markers
    /// are diagnostics, never errors — the rest of the build stands.
    fn rewrite_index(&self, cards: &[String]) -> Result<bool, BuildError> {
        let Ok(content) = fs::read_to_string(&self.index_file) else {
            eprintln!(
                "warning: {} not found, skipping article list update",
                self.index_file.display()
            );
            return Ok(false);
        };

        let re = list_region_re();
        if !re.is_match(&content) {
            eprintln!(
                "warning: {} has no {LIST_START} markers, skipping article list update",
                self.index_file.display()
            );
            return Ok(false);
        }

        let cards_html = cards.join("\n");
        // Closure replacement: card HTML is inserted literally, no `$`
        // capture expansion.
        let new_content = re.replace_all(&content, |_: &regex::Captures| {
            format!("{LIST_START}\n{cards_html}\n{LIST_END}")
        });

        fs::write(&self.index_file, new_content.as_bytes()).map_err(|source| BuildError::Write {
            path: self.index_file.clone(),
            source,
        })?;
        println!("Updated {}", self.index_file.display());
        Ok(true)
    }

    /// Directory name the index cards link into, relative to the index file.
    fn output_dir_name(&self) -> &str {
        self.output
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("articles")
    }
}

/// Pass 1: resolve metadata for every document and build the full catalog.
fn collect_metadata(documents: &[Document]) -> (Vec<Article>, Vec<CatalogEntry>) {
    let mut articles = Vec::with_capacity(documents.len());
    let mut catalog = Vec::with_capacity(documents.len());

    for doc in documents {
        let (raw, body) = frontmatter::parse(&doc.id, &doc.content);
        let meta = metadata::resolve(&raw, &doc.id, body);
        catalog.push(CatalogEntry {
            id: doc.id.clone(),
            title: meta.title.clone(),
            difficulty: meta.difficulty.clone(),
            date: meta.date.clone(),
        });
        articles.push(Article {
            id: doc.id.clone(),
            meta,
            body: body.to_string(),
        });
    }

    (articles, catalog)
}

fn list_region_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            "(?s){}.*?{}",
            regex::escape(LIST_START),
            regex::escape(LIST_END)
        ))
        .unwrap()
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn builder(root: &Path) -> SiteBuilder {
        SiteBuilder::new(
            root.join("articles"),
            root.join("articles"),
            root.join("index.html"),
        )
    }

    fn setup(root: &Path) {
        fs::create_dir_all(root.join("articles")).unwrap();
        write(
            root,
            "index.html",
            &format!("<html><body>\n{LIST_START}\nold cards\n{LIST_END}\n</body></html>"),
        );
    }

    #[test]
    fn missing_source_dir_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let b = builder(tmp.path());
        assert!(matches!(b.build(), Err(BuildError::Source { .. })));
    }

    #[test]
    fn empty_source_dir_builds_nothing() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let summary = builder(tmp.path()).build().unwrap();
        assert_eq!(summary.pages, 0);
        assert!(!summary.index_updated);
    }

    #[test]
    fn template_file_is_excluded() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let articles = tmp.path().join("articles");
        write(&articles, TEMPLATE_FILE, "---\ntitle: T\n---\nbody\n");
        write(&articles, "real.md", "---\ntitle: Real\n---\nbody\n");

        let summary = builder(tmp.path()).build().unwrap();
        assert_eq!(summary.pages, 1);
        assert!(articles.join("real.html").exists());
        assert!(!articles.join("article-template.html").exists());
    }

    #[test]
    fn pages_are_written_per_document() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let articles = tmp.path().join("articles");
        write(&articles, "one.md", "---\ntitle: One\n---\n## Recon\nbody\n");
        write(&articles, "two.md", "no front matter at all\n");

        let summary = builder(tmp.path()).build().unwrap();
        assert_eq!(summary.pages, 2);

        let one = fs::read_to_string(articles.join("one.html")).unwrap();
        assert!(one.contains("<h1>One</h1>"));
        // Sidebar on page one lists page two (defaulted title from stem).
        assert!(one.contains("Two"));
        assert!(one.contains(r#"href="two.html""#));
    }

    #[test]
    fn index_region_is_replaced_and_surroundings_kept() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let articles = tmp.path().join("articles");
        write(&articles, "a.md", "---\ntitle: Alpha\nexcerpt: E\n---\nbody\n");

        let summary = builder(tmp.path()).build().unwrap();
        assert!(summary.index_updated);

        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.starts_with("<html><body>\n"));
        assert!(index.ends_with("\n</body></html>"));
        assert!(!index.contains("old cards"));
        assert!(index.contains("Alpha"));
        assert!(index.contains(r#"href="articles/a.html""#));
    }

    #[test]
    fn missing_index_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("articles")).unwrap();
        write(&tmp.path().join("articles"), "a.md", "body\n");

        let summary = builder(tmp.path()).build().unwrap();
        assert_eq!(summary.pages, 1);
        assert!(!summary.index_updated);
    }

    #[test]
    fn index_without_markers_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("articles")).unwrap();
        write(tmp.path(), "index.html", "<html>no markers</html>");
        write(&tmp.path().join("articles"), "a.md", "body\n");

        let summary = builder(tmp.path()).build().unwrap();
        assert!(!summary.index_updated);
        assert_eq!(
            fs::read_to_string(tmp.path().join("index.html")).unwrap(),
            "<html>no markers</html>"
        );
    }

    #[test]
    fn card_html_with_dollar_signs_survives_rewrite() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let articles = tmp.path().join("articles");
        write(&articles, "a.md", "---\ntitle: \"Costs $1 (or $2)\"\n---\nbody\n");

        builder(tmp.path()).build().unwrap();
        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.contains("Costs $1 (or $2)"));
    }

    #[test]
    fn oversized_front_matter_builds_with_defaults() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let articles = tmp.path().join("articles");
        let block = "k: v\n".repeat(3000); // well past 10 240 bytes
        write(&articles, "big.md", &format!("---\n{block}---\nbody\n"));

        let summary = builder(tmp.path()).build().unwrap();
        assert_eq!(summary.pages, 1);
        let page = fs::read_to_string(articles.join("big.html")).unwrap();
        // Defaulted title comes from the stem.
        assert!(page.contains("<h1>Big</h1>"));
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let articles = tmp.path().join("articles");
        write(
            &articles,
            "a.md",
            "---\ntitle: A\ndate: 2025-01-01\ntags: [HTB]\n---\n## Recon\nbody\n",
        );

        let b = builder(tmp.path());
        b.build().unwrap();
        let page1 = fs::read(articles.join("a.html")).unwrap();
        let index1 = fs::read(tmp.path().join("index.html")).unwrap();

        b.build().unwrap();
        assert_eq!(page1, fs::read(articles.join("a.html")).unwrap());
        assert_eq!(index1, fs::read(tmp.path().join("index.html")).unwrap());
    }

    #[test]
    fn list_orders_newest_first() {
        let tmp = TempDir::new().unwrap();
        setup(tmp.path());
        let articles = tmp.path().join("articles");
        write(&articles, "older.md", "---\ntitle: Older\n---\nbody\n");
        write(&articles, "newer.md", "---\ntitle: Newer\n---\nbody\n");

        // Force distinct mtimes regardless of filesystem timestamp granularity.
        let old = SystemTime::now() - std::time::Duration::from_secs(3600);
        let f = fs::File::options()
            .append(true)
            .open(articles.join("older.md"))
            .unwrap();
        f.set_modified(old).unwrap();
        drop(f);

        let b = builder(tmp.path());
        let docs = b.discover().unwrap();
        assert_eq!(docs[0].id, "newer");
        assert_eq!(docs[1].id, "older");
    }
}
