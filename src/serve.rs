//! Local preview server.
//!
//! A deliberately small static file server for checking the built site
//! before deploying it. Built on `tiny_http`, blocking, single-threaded —
//! there is exactly one reader. Three hard rules:
//!
//! - **Loopback only.** The server binds `127.0.0.1`, never `0.0.0.0`. This
//!   is a preview tool, not a web server.
//! - **The served root is a ceiling.** Request paths may only carry plain
//!   name components; anything with `..` in it is refused, so no request
//!   can resolve outside the directory being served.
//! - **Sensitive paths are refused.** Requests whose path contains any
//!   [`FORBIDDEN_PATTERNS`] fragment get a 403 before any filesystem lookup.
//!   The project directory holds things the rendered site must not leak:
//!   version control, environment files, the article template, deploy
//!   scripts.
//!
//! Ctrl+C installs a handler that unblocks the accept loop, so shutdown
//! drops the socket cleanly on every exit path instead of tearing the
//! process down mid-request.

use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Default preview port.
pub const DEFAULT_PORT: u16 = 8009;

/// Path fragments that must never be served.
pub const FORBIDDEN_PATTERNS: &[&str] = &[
    ".git",
    ".env",
    "target",
    ".cache",
    "article-template.md",
    "deploy.sh",
    "SECURITY.md",
    ".gitignore",
];

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("cannot bind 127.0.0.1:{port}: {source} (is the port already in use? try another with `mdpress serve <port>`)")]
    Bind {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("cannot install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Serve `root` on the loopback interface until Ctrl+C.
pub fn serve(root: &Path, port: u16) -> Result<(), ServeError> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let server =
        Arc::new(Server::http(addr).map_err(|source| ServeError::Bind { port, source })?);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        println!("\nShutting down");
        server_for_signal.unblock();
    })?;

    println!("Preview server: http://127.0.0.1:{port}");
    println!("Local preview only — do not expose this to the network.");
    println!("Press Ctrl+C to stop");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(root, request) {
            eprintln!("warning: request failed: {e}");
        }
    }
    Ok(())
}

/// Resolve and answer one request.
///
/// The denylist and traversal checks run on the raw request path, before
/// any filesystem resolution. Resolution order after that: exact file,
/// directory `index.html`, 404.
fn handle_request(root: &Path, request: Request) -> std::io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("");

    let local = match local_path(root, path) {
        Some(local) if !is_forbidden(path) => local,
        _ => {
            let response =
                Response::from_string("403 Forbidden").with_status_code(StatusCode(403));
            return request.respond(response);
        }
    };
    if local.is_file() {
        return serve_file(request, &local);
    }
    if local.is_dir() {
        let index = local.join("index.html");
        if index.is_file() {
            return serve_file(request, &index);
        }
    }

    let response = Response::from_string("404 Not Found").with_status_code(StatusCode(404));
    request.respond(response)
}

fn is_forbidden(path: &str) -> bool {
    FORBIDDEN_PATTERNS.iter().any(|p| path.contains(p))
}

/// Map a request path to a location under `root`, or `None` when the path
/// carries anything but plain name components. `..` must never reach the
/// filesystem: a request like `/../secret.txt` would otherwise resolve
/// outside the served directory.
fn local_path(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

fn serve_file(request: Request, path: &Path) -> std::io::Result<()> {
    let content = fs::read(path)?;
    let response = Response::from_data(content).with_header(
        Header::from_bytes("Content-Type", content_type(path)).expect("static header"),
    );
    request.respond(response)
}

/// MIME type from extension; unknown extensions are served as binary.
fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
