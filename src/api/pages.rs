//! HTML page assembly: shell, breadcrumb and the generated docs index.

use std::collections::BTreeMap;

use super::docs::DocEntry;
use crate::markdown::{escape, escape_attr};

const PORTAL_CSS: &str = include_str!("assets/portal.css");

/// Shown when a document has no level-1 heading.
pub const FALLBACK_DOC_TITLE: &str = "Shebang! Documentation";

const NAV_HEADER: &str = r#"<div class="header">
    <a href="/" class="logo"><span>#!</span> Shebang!</a>
    <nav class="nav">
        <a href="/">Dashboard</a>
        <a href="/features">Features</a>
        <a href="/git-history">Git History</a>
        <a href="/docs" class="active">Docs</a>
        <a href="/docs/ROADMAP.md">Roadmap</a>
    </nav>
    <div class="header-right"></div>
</div>"#;

/// Wrap `content` in the full page chrome. `title` is plain text.
pub fn shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    {nav}
    <div class="content">
{content}
    </div>
</body>
</html>"#,
        title = escape(title),
        css = PORTAL_CSS,
        nav = NAV_HEADER,
        content = content,
    )
}

/// `Home / Docs / <dir> / ... / <file>` for a docs-relative path.
pub fn breadcrumb(doc_path: &str) -> String {
    let parts: Vec<&str> = doc_path.split('/').filter(|p| !p.is_empty()).collect();
    let mut trail = String::from(r#"<a href="/">Home</a> / <a href="/docs">Docs</a>"#);

    if let Some((file, dirs)) = parts.split_last() {
        for (i, dir) in dirs.iter().enumerate() {
            let href = format!("/docs/{}", parts[..=i].join("/"));
            trail.push_str(&format!(
                r#" / <a href="{}">{}</a>"#,
                escape_attr(&href),
                escape(dir)
            ));
        }
        trail.push_str(&format!(" / {}", escape(file)));
    }
    trail
}

/// A rendered Markdown document inside the shell.
pub fn document_page(title: Option<&str>, doc_path: &str, fragment: &str) -> String {
    let title = title.unwrap_or(FALLBACK_DOC_TITLE);
    let content = format!(
        "<div class=\"breadcrumb\">{}</div>\n{}",
        breadcrumb(doc_path),
        fragment
    );
    shell(&format!("{} - Shebang!", title), &content)
}

/// The generated `/docs` index.
pub fn docs_index_page(groups: &BTreeMap<String, Vec<DocEntry>>) -> String {
    let mut content = String::from(
        "<h1>Documentation</h1>\n\
         <p>Complete documentation for the Shebang! Automated Development Environment.</p>\n",
    );
    for (group, docs) in groups {
        content.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape(group)));
        for doc in docs {
            content.push_str(&format!(
                "<li><a href=\"/docs/{}\">{}</a></li>\n",
                escape_attr(&doc.path),
                escape(&doc.title)
            ));
        }
        content.push_str("</ul>\n");
    }
    shell("Shebang! Documentation", &content)
}

/// 404 page inside the shell.
pub fn not_found_page(what: &str) -> String {
    shell(
        "Not Found - Shebang!",
        &format!(
            "<h1>Not Found</h1>\n<p>{}</p>\n<p><a href=\"/docs\">Back to the documentation index</a></p>",
            escape(what)
        ),
    )
}
