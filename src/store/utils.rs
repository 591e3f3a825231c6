//! Store utility functions.

use std::io::Write;
use std::path::Path;

use chrono::{Local, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use super::error::{StoreError, StoreResult};

/// Slug used when a project name contains no usable characters.
pub const PLACEHOLDER_SLUG: &str = "untitled";

/// Current time as an RFC 3339 string with microsecond precision.
///
/// Always UTC so that stamps compare correctly as plain strings.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Server-side task id derived from the local wall clock.
pub fn generate_task_id() -> String {
    format!("task-{}", Local::now().format("%Y%m%d%H%M%S"))
}

/// Derive a filesystem-safe project id from a display name.
///
/// Lower-cases, collapses every run of non-alphanumeric characters into a
/// single hyphen and trims hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        PLACEHOLDER_SLUG.to_string()
    } else {
        slug
    }
}

/// True when `id` can be used as a single path component under the
/// projects root.
pub fn is_valid_project_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> StoreResult<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let write = || -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    };
    write().map_err(|e| StoreError::io(path, e))
}

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Serialize `value` as pretty JSON and replace `path` with it.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');
    atomic_write(path, &body)
}
