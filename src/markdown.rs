//! Markdown rendering with TOC-ready heading ids.
//!
//! Wraps pulldown-cmark with the behavior article pages rely on:
//!
//! - **Tables** and **fenced code blocks** enabled. Fenced blocks keep their
//!   language as a `language-*` class on the `<code>` element, which is the
//!   hook client-side highlighters key off.
//! - **Heading ids**: every heading without an explicit id gets one slugified
//!   from its text, so the TOC extractor and in-page anchors have stable
//!   targets. Duplicate heading texts get `-1`, `-2`, ... suffixes.
//! - **Soft breaks become `<br>`**: write-ups are full of single-newline
//!   shell output where markdown's paragraph-joining rule reads wrong.
//!
//! Rendering is a pure function of the input string — no state survives
//! between calls, so repeated invocations over a document set cannot leak
//! headings or ids across documents.

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Convert a markdown body to an HTML fragment.
pub fn render(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let events: Vec<Event> = Parser::new_ext(markdown, options)
        .map(|event| match event {
            // nl2br: single newlines inside a paragraph become line breaks
            Event::SoftBreak => Event::HardBreak,
            other => other,
        })
        .collect();

    let events = attach_heading_ids(events);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Give every id-less heading a slug derived from its text.
///
/// Two passes over the event stream: collect heading texts in order, then
/// replace each empty id with the (deduplicated) slug of the matching text.
fn attach_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut texts: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    for event in &events {
        match event {
            Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
            Event::Text(t) | Event::Code(t) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(t);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(text) = current.take() {
                    texts.push(text);
                }
            }
            _ => {}
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut ids = texts.iter().map(|t| {
        let slug = slugify(t);
        let n = seen.entry(slug.clone()).or_insert(0);
        let id = if *n == 0 { slug.clone() } else { format!("{slug}-{n}") };
        *n += 1;
        id
    });

    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Heading { level, id, classes, attrs }) => {
                let id = match id {
                    Some(explicit) => {
                        ids.next();
                        Some(explicit)
                    }
                    None => ids
                        .next()
                        .filter(|s| !s.is_empty())
                        .map(|s| CowStr::Boxed(s.into_boxed_str())),
                };
                Event::Start(Tag::Heading { level, id, classes, attrs })
            }
            other => other,
        })
        .collect()
}

/// Convert heading text to a URL-safe anchor id.
///
/// Lowercase, whitespace to hyphens, everything non-alphanumeric dropped,
/// hyphen runs collapsed, edges trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true; // suppresses a leading hyphen
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
