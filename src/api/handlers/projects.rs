//! Project management handlers.

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::AppState;
use crate::store::ProjectSummary;

use super::{ApiFailure, SuccessResponse, parse_body, required, run_store};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
    /// Id of the active project
    pub active: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub success: bool,
    pub project_id: String,
    pub project: ProjectSummary,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectProjectRequest {
    pub project_id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/projects
#[instrument(skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectListResponse>, ApiFailure> {
    let response = run_store(&state, |s| {
        Ok(ProjectListResponse {
            projects: s.projects().list_projects()?,
            active: s.projects().active_project(),
        })
    })
    .await?;
    Ok(Json(response))
}

/// POST /api/projects
#[instrument(skip(state, body))]
pub async fn create_project(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreateProjectResponse>, ApiFailure> {
    let req: CreateProjectRequest = parse_body(&body)?;
    let name = required(req.name, "Project name is required")?;
    let description = req.description.unwrap_or_default();

    let project = run_store(&state, move |s| {
        s.projects().create_project(&name, &description)
    })
    .await?;

    Ok(Json(CreateProjectResponse {
        success: true,
        project_id: project.id.clone(),
        project,
    }))
}

/// POST /api/projects/select
#[instrument(skip(state, body))]
pub async fn select_project(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiFailure> {
    let req: SelectProjectRequest = parse_body(&body)?;
    let project_id = required(req.project_id, "Project ID is required")?;

    run_store(&state, move |s| s.projects().set_active_project(&project_id)).await?;

    Ok(Json(SuccessResponse { success: true }))
}
