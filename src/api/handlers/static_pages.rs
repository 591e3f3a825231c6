//! Fixed page shells and raw JSON data files.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::api::AppState;
use crate::api::docs::resolve_relative;

use super::serve_file;

fn serve_page(state: &AppState, file: &str) -> Response {
    serve_file(&state.config().web_dir().join(file))
}

/// GET /
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Response {
    serve_page(&state, "index.html")
}

/// GET /features
#[instrument(skip(state))]
pub async fn features(State(state): State<AppState>) -> Response {
    serve_page(&state, "features.html")
}

/// GET /git-history
#[instrument(skip(state))]
pub async fn git_history(State(state): State<AppState>) -> Response {
    serve_page(&state, "git-history.html")
}

/// GET /web/data/{*file}
#[instrument(skip(state))]
pub async fn data_file(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    match resolve_relative(&state.config().data_dir(), &file) {
        Some(path) => serve_file(&path),
        None => (StatusCode::NOT_FOUND, format!("File not found: web/data/{}", file)).into_response(),
    }
}
