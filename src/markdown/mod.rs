//! Markdown to HTML rendering for the documentation pages.
//!
//! Rendering runs in two passes: [`block::tokenize`] turns the source into
//! a list of [`Block`]s, then [`html::emit`] writes the fragment. Only the
//! subset used by the project docs is supported: headings up to level 4,
//! emphasis, inline and fenced code, links, rules, pipe tables, flat bullet
//! lists and single-line blockquotes. Numbered lists render as paragraphs.

mod block;
mod html;
mod inline;


pub use block::{Block, tokenize};
pub use inline::{escape, escape_attr};

/// A rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Text of the first level-1 heading, if any.
    pub title: Option<String>,
    /// HTML fragment (no `<html>`/`<body>` wrapper).
    pub html: String,
}

/// Render `source` and extract its title in one pass.
pub fn render_document(source: &str) -> Rendered {
    let blocks = tokenize(source);
    Rendered {
        title: first_h1(&blocks),
        html: html::emit(&blocks),
    }
}

/// Render `source` to an HTML fragment.
pub fn render(source: &str) -> String {
    html::emit(&tokenize(source))
}

/// Text of the first level-1 heading outside code fences.
pub fn extract_title(source: &str) -> Option<String> {
    first_h1(&tokenize(source))
}

fn first_h1(blocks: &[Block]) -> Option<String> {
    blocks.iter().find_map(|b| match b {
        Block::Heading { level: 1, text } => Some(text.clone()),
        _ => None,
    })
}
