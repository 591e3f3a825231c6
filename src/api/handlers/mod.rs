//! Request handlers.

mod docs;
mod kanban;
mod projects;
mod static_pages;

use std::path::Path;

use axum::{
    Json,
    body::Bytes,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::AppState;
use crate::store::{StoreError, StoreResult};

pub use docs::*;
pub use kanban::*;
pub use projects::*;
pub use static_pages::*;

// =============================================================================
// Shared DTOs
// =============================================================================

/// Error response DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Bare acknowledgment
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Optional `?project=<id>` override of the active project.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectScope {
    pub project: Option<String>,
}

pub type ApiFailure = (StatusCode, Json<ErrorResponse>);

// =============================================================================
// Helpers
// =============================================================================

fn failure(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a store error onto its HTTP status.
fn store_error(e: StoreError) -> ApiFailure {
    let status = match &e {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::InvalidInput { .. } | StoreError::InvalidColumn { .. } => {
            StatusCode::BAD_REQUEST
        }
        StoreError::AlreadyExists { .. } => StatusCode::CONFLICT,
        StoreError::Io { .. } | StoreError::Serialization { .. } => {
            error!(error = %e, "Store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    failure(status, e.to_string())
}

/// Run a store call on the blocking pool. Store calls do file I/O and may
/// wait on a project lock.
async fn run_store<T, F>(state: &AppState, f: F) -> Result<T, ApiFailure>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> StoreResult<T> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!(error = %e, "Store task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Store task failed")
        })?
        .map_err(store_error)
}

/// Decode a JSON request body. An empty body decodes as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiFailure> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(raw)
        .map_err(|e| failure(StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)))
}

/// Required string field: present and not blank.
fn required(value: Option<String>, message: &str) -> Result<String, ApiFailure> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, message))
}

/// Serve a file from disk with a guessed content type.
fn serve_file(path: &Path) -> Response {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref().to_string())], bytes).into_response()
        }
        Err(_) => (
            StatusCode::NOT_FOUND,
            format!("File not found: {}", path.display()),
        )
            .into_response(),
    }
}

/// Fallback for unknown `/api/*` paths.
pub async fn api_not_found() -> ApiFailure {
    failure(StatusCode::NOT_FOUND, "API endpoint not found")
}
