//! Task board handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::api::AppState;
use crate::store::utils::{current_timestamp, generate_task_id};
use crate::store::{Board, Task, TaskPatch};

use super::{ApiFailure, ProjectScope, SuccessResponse, parse_body, required, run_store};

const DEFAULT_COLUMN: &str = "backlog";
const DEFAULT_TITLE: &str = "New Task";
const DEFAULT_CATEGORY: &str = "feature";

// =============================================================================
// DTOs
// =============================================================================

/// Add task request DTO. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct AddTaskRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Target column, `backlog` when omitted
    pub column: Option<String>,
}

impl AddTaskRequest {
    fn into_task(self) -> Result<(String, Task), ApiFailure> {
        let title = match self.title {
            Some(title) => required(Some(title), "Task title cannot be empty")?,
            None => DEFAULT_TITLE.to_string(),
        };
        let task = Task {
            id: self
                .id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generate_task_id),
            title,
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            created: current_timestamp(),
            extra: Map::new(),
        };
        let column = self
            .column
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLUMN.to_string());
        Ok((column, task))
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub task_id: Option<String>,
    pub target_column: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub task_id: Option<String>,
    #[serde(default)]
    pub updates: TaskPatch,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/kanban
#[instrument(skip(state))]
pub async fn get_board(
    State(state): State<AppState>,
    Query(scope): Query<ProjectScope>,
) -> Result<Json<Board>, ApiFailure> {
    let board = run_store(&state, move |s| {
        let project = s.projects().resolve(scope.project.as_deref())?;
        s.boards().get_board(&project)
    })
    .await?;
    Ok(Json(board))
}

/// GET /api/metrics
#[instrument(skip(state))]
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(scope): Query<ProjectScope>,
) -> Result<Json<Value>, ApiFailure> {
    let metrics = run_store(&state, move |s| {
        let project = s.projects().resolve(scope.project.as_deref())?;
        s.projects().metrics(&project)
    })
    .await?;
    Ok(Json(metrics))
}

/// POST /api/kanban/task
#[instrument(skip(state, body))]
pub async fn add_task(
    State(state): State<AppState>,
    Query(scope): Query<ProjectScope>,
    body: Bytes,
) -> Result<Json<TaskResponse>, ApiFailure> {
    let req: AddTaskRequest = parse_body(&body)?;
    let (column, task) = req.into_task()?;

    let task = run_store(&state, move |s| {
        let project = s.projects().resolve(scope.project.as_deref())?;
        s.boards().add_task(&project, &column, task)
    })
    .await?;

    Ok(Json(TaskResponse {
        success: true,
        task,
    }))
}

/// POST /api/kanban/move
#[instrument(skip(state, body))]
pub async fn move_task(
    State(state): State<AppState>,
    Query(scope): Query<ProjectScope>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiFailure> {
    let req: MoveTaskRequest = parse_body(&body)?;
    let missing = "Missing taskId or targetColumn";
    let task_id = required(req.task_id, missing)?;
    let target = required(req.target_column, missing)?;

    run_store(&state, move |s| {
        let project = s.projects().resolve(scope.project.as_deref())?;
        s.boards().move_task(&project, &task_id, &target)
    })
    .await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/kanban/update
#[instrument(skip(state, body))]
pub async fn update_task(
    State(state): State<AppState>,
    Query(scope): Query<ProjectScope>,
    body: Bytes,
) -> Result<Json<TaskResponse>, ApiFailure> {
    let req: UpdateTaskRequest = parse_body(&body)?;
    let task_id = required(req.task_id, "Missing taskId")?;
    let patch = req.updates;

    let task = run_store(&state, move |s| {
        let project = s.projects().resolve(scope.project.as_deref())?;
        s.boards().update_task(&project, &task_id, patch)
    })
    .await?;

    Ok(Json(TaskResponse {
        success: true,
        task,
    }))
}
