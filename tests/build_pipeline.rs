//! End-to-end pipeline tests: scaffold a project, build it, inspect output.

use std::fs;
use std::path::{Path, PathBuf};

use mdpress::build::{LIST_END, LIST_START, SiteBuilder};
use mdpress::scaffold;
use tempfile::TempDir;

struct Project {
    _tmp: TempDir,
    root: PathBuf,
}

impl Project {
    fn scaffolded() -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        scaffold::init(&root, &root.join("articles"), &root.join("index.html")).unwrap();
        Self { _tmp: tmp, root }
    }

    fn articles(&self) -> PathBuf {
        self.root.join("articles")
    }

    fn builder(&self) -> SiteBuilder {
        SiteBuilder::new(
            self.articles(),
            self.articles(),
            self.root.join("index.html"),
        )
    }

    fn add_article(&self, name: &str, content: &str) {
        fs::write(self.articles().join(name), content).unwrap();
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).unwrap()
    }
}

#[test]
fn scaffolded_project_builds_out_of_the_box() {
    let project = Project::scaffolded();
    let summary = project.builder().build().unwrap();

    assert_eq!(summary.pages, 1);
    assert!(summary.index_updated);

    let page = project.read("articles/example.html");
    assert!(page.contains("<h1>HTB: Example Machine</h1>"));
    assert!(page.contains("class=\"difficulty medium\""));
    // TOC picked up the example's h2 headings.
    assert!(page.contains("href=\"#recon\""));
    assert!(page.contains("href=\"#flags\""));

    let index = project.read("index.html");
    assert!(index.contains("href=\"articles/example.html\""));
    assert!(index.contains("HTB: Example Machine"));
}

#[test]
fn hostile_front_matter_is_escaped_in_every_location() {
    let project = Project::scaffolded();
    fs::remove_file(project.articles().join("example.md")).unwrap();
    project.add_article(
        "evil.md",
        concat!(
            "---\n",
            "title: \"<script>alert(1)</script>\"\n",
            "tags: [\"<b>tag</b>\", \"a&b\"]\n",
            "excerpt: \"quote \\\" and <angle>\"\n",
            "date: \"2025-01-01\"\n",
            "---\n",
            "## Heading <em>one</em>\n\nbody\n",
        ),
    );

    project.builder().build().unwrap();

    let page = project.read("articles/evil.html");
    assert!(!page.contains("<script>alert(1)</script>"));
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    // Tag pill and sidebar title are escaped too.
    assert!(!page.contains("<b>tag</b>"));
    assert!(page.contains("a&amp;b"));

    let index = project.read("index.html");
    assert!(!index.contains("<script>alert(1)</script>"));
    assert!(!index.contains("<angle>"));
}

#[test]
fn rebuilding_unchanged_sources_is_byte_identical() {
    let project = Project::scaffolded();
    project.add_article(
        "second.md",
        "---\ntitle: Second\ndate: 2025-02-02\ntags: [CTF]\n---\n## Setup\ntext\n",
    );

    let builder = project.builder();
    builder.build().unwrap();
    let first = snapshot(&project.root);
    builder.build().unwrap();
    assert_eq!(first, snapshot(&project.root));
}

#[test]
fn index_content_outside_markers_survives_rebuilds() {
    let project = Project::scaffolded();
    let custom = format!(
        "<html><head><title>custom</title></head><body>\n<p>hand-written intro</p>\n{LIST_START}\nstale\n{LIST_END}\n<p>hand-written footer</p>\n</body></html>"
    );
    fs::write(project.root.join("index.html"), &custom).unwrap();

    project.builder().build().unwrap();
    let index = project.read("index.html");
    assert!(index.contains("<p>hand-written intro</p>"));
    assert!(index.contains("<p>hand-written footer</p>"));
    assert!(!index.contains("stale"));
    assert!(index.contains("articles/example.html"));
}

#[test]
fn every_page_links_every_other_page() {
    let project = Project::scaffolded();
    project.add_article("alpha.md", "---\ntitle: Alpha\n---\nbody\n");
    project.add_article("beta.md", "---\ntitle: Beta\n---\nbody\n");

    project.builder().build().unwrap();

    for page in ["example", "alpha", "beta"] {
        let html = project.read(&format!("articles/{page}.html"));
        for other in ["example", "alpha", "beta"] {
            assert!(
                html.contains(&format!("href=\"{other}.html\"")),
                "{page}.html is missing a sidebar link to {other}.html"
            );
        }
    }
}

/// Map of relative path → file bytes for the whole project tree.
fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<(PathBuf, Vec<u8>)> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            (
                e.path().strip_prefix(root).unwrap().to_path_buf(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}
