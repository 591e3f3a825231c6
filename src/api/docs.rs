//! Documentation tree enumeration and path resolution.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

/// Group label for files directly under the document root.
pub const ROOT_GROUP: &str = "Core";

/// One Markdown file under the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    /// Path relative to the document root, `/`-separated.
    pub path: String,
    pub title: String,
    /// Display label of the parent directory.
    pub group: String,
}

/// Every `.md` file under `docs_dir`, hidden entries skipped.
pub fn list_docs(docs_dir: &Path) -> Vec<DocEntry> {
    if !docs_dir.is_dir() {
        return Vec::new();
    }

    let walker = WalkBuilder::new(docs_dir)
        .standard_filters(false)
        .hidden(true)
        .build();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable docs entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file())
            || path.extension().and_then(|e| e.to_str()) != Some("md")
        {
            continue;
        }
        let Ok(rel) = path.strip_prefix(docs_dir) else {
            continue;
        };
        entries.push(DocEntry {
            path: to_url_path(rel),
            title: doc_title(path),
            group: group_label(rel),
        });
    }
    entries
}

/// Entries grouped by label; groups and their entries sorted by name.
pub fn group_docs(entries: Vec<DocEntry>) -> BTreeMap<String, Vec<DocEntry>> {
    let mut grouped: BTreeMap<String, Vec<DocEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.group.clone()).or_default().push(entry);
    }
    for docs in grouped.values_mut() {
        docs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.path.cmp(&b.path)));
    }
    grouped
}

/// Map a request path onto an existing `.md` file under `docs_dir`.
pub fn resolve_doc(docs_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let full = resolve_relative(docs_dir, request_path)?;
    (full.extension().and_then(|e| e.to_str()) == Some("md")).then_some(full)
}

/// Join `request_path` onto `base` if it names an existing file.
///
/// Anything other than plain path segments (`..`, absolute paths, drive
/// prefixes) is refused.
pub fn resolve_relative(base: &Path, request_path: &str) -> Option<PathBuf> {
    let rel = Path::new(request_path.trim_start_matches('/'));
    if rel.as_os_str().is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    let full = base.join(rel);
    full.is_file().then_some(full)
}

/// Index title: the first line when it is a `# ` heading, else the
/// humanized file stem.
fn doc_title(path: &Path) -> String {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|source| {
            let first = source.lines().next()?;
            let title = first.strip_prefix("# ")?.trim();
            (!title.is_empty()).then(|| title.to_string())
        })
        .unwrap_or_else(|| {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            title_case(&stem.replace('_', " "))
        })
}

fn group_label(rel: &Path) -> String {
    match rel.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            title_case(&to_url_path(parent).replace('/', " / "))
        }
        _ => ROOT_GROUP.to_string(),
    }
}

fn to_url_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Upper-case the first letter of every word, lower-case the rest. Any
/// non-letter starts a new word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
