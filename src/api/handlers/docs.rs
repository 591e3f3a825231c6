//! Documentation page handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use tracing::{debug, instrument, warn};

use crate::api::AppState;
use crate::api::{docs, pages};
use crate::markdown;

/// GET /docs
#[instrument(skip(state))]
pub async fn docs_index(State(state): State<AppState>) -> Html<String> {
    let entries = docs::list_docs(&state.config().docs_dir());
    debug!(count = entries.len(), "Indexed documentation");
    Html(pages::docs_index_page(&docs::group_docs(entries)))
}

/// GET /docs/{*path}
#[instrument(skip(state))]
pub async fn doc_page(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Html(pages::not_found_page(&format!("Document not found: {}", path))),
        )
    };

    let file = docs::resolve_doc(&state.config().docs_dir(), &path).ok_or_else(not_found)?;
    let source = std::fs::read_to_string(&file).map_err(|e| {
        warn!(path = %file.display(), error = %e, "Unreadable document");
        not_found()
    })?;

    let rendered = markdown::render_document(&source);
    Ok(Html(pages::document_page(
        rendered.title.as_deref(),
        &path,
        &rendered.html,
    )))
}
