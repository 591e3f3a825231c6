//! Domain models for the portal stores.
//!
//! The board types mirror the on-disk `kanban.json` document. Keys that the
//! server does not know about are kept in `extra` maps so that a
//! read-modify-write cycle never drops data written by other tools. Known
//! string fields accept `null` and scalars, which other writers produce.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{StoreError, StoreResult};
use crate::serde_utils::lenient_string;

// =============================================================================
// Task board
// =============================================================================

/// The full column/task structure of one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_updated: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named, ordered bucket of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created: String,
    /// Fields set through partial updates that have no typed counterpart.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Column ids, display names and colors of a freshly created board.
pub const CANONICAL_COLUMNS: [(&str, &str, &str); 4] = [
    ("backlog", "BACKLOG", "accent"),
    ("in_progress", "IN PROGRESS", "warning"),
    ("review", "REVIEW", "purple"),
    ("done", "DONE", "success"),
];

impl Column {
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            tasks: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Board {
    /// Empty board with the four canonical columns.
    pub fn canonical(last_updated: String) -> Self {
        Self {
            last_updated,
            columns: CANONICAL_COLUMNS
                .iter()
                .map(|(id, name, color)| Column::new(id, name, color))
                .collect(),
            extra: Map::new(),
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// Locate the first task with `task_id`, scanning columns in order.
    ///
    /// Returns `(column index, task index)`.
    fn position(&self, task_id: &str) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(ci, col)| {
            col.tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|ti| (ci, ti))
        })
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.position(task_id)
            .map(|(ci, ti)| &self.columns[ci].tasks[ti])
    }

    /// Id of the column currently holding `task_id`.
    pub fn column_of(&self, task_id: &str) -> Option<&str> {
        self.position(task_id)
            .map(|(ci, _)| self.columns[ci].id.as_str())
    }

    /// Append `task` to the end of `column_id`.
    pub fn add_task(&mut self, column_id: &str, task: Task) -> StoreResult<()> {
        let column = self
            .column_mut(column_id)
            .ok_or_else(|| StoreError::InvalidColumn {
                column: column_id.to_string(),
            })?;
        column.tasks.push(task);
        Ok(())
    }

    /// Remove `task_id` from its column and append it to `target_column`.
    ///
    /// The target is checked before anything is removed, so a failed move
    /// leaves the board untouched.
    pub fn move_task(&mut self, task_id: &str, target_column: &str) -> StoreResult<()> {
        let (ci, ti) = self
            .position(task_id)
            .ok_or_else(|| StoreError::not_found("Task", task_id))?;
        let target = self
            .columns
            .iter()
            .position(|c| c.id == target_column)
            .ok_or_else(|| StoreError::InvalidColumn {
                column: target_column.to_string(),
            })?;

        let task = self.columns[ci].tasks.remove(ti);
        self.columns[target].tasks.push(task);
        Ok(())
    }

    /// Shallow-merge `patch` into `task_id` in place.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> StoreResult<&Task> {
        patch.validate()?;
        let (ci, ti) = self
            .position(task_id)
            .ok_or_else(|| StoreError::not_found("Task", task_id))?;
        let task = &mut self.columns[ci].tasks[ti];
        patch.merge_into(task);
        Ok(task)
    }
}

// =============================================================================
// Partial task update
// =============================================================================

/// Keys a patch may never overwrite.
const RESERVED_TASK_FIELDS: [&str; 2] = ["id", "created"];

/// Typed partial update for a task.
///
/// Typed fields replace their counterpart when present. Any other key lands
/// in `extra` and is merged into the task's open field set.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskPatch {
    pub fn validate(&self) -> StoreResult<()> {
        if let Some(key) = RESERVED_TASK_FIELDS
            .iter()
            .find(|k| self.extra.contains_key(**k))
        {
            return Err(StoreError::invalid_input(format!(
                "field '{}' cannot be changed by an update",
                key
            )));
        }
        Ok(())
    }

    fn merge_into(self, target: &mut Task) {
        if let Some(title) = self.title {
            target.title = title;
        }
        if let Some(description) = self.description {
            target.description = description;
        }
        if let Some(category) = self.category {
            target.category = category;
        }
        target.extra.extend(self.extra);
    }
}

// =============================================================================
// Projects
// =============================================================================

/// Contents of a project's `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A project as reported by the project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created: String,
    pub tags: Vec<String>,
}

impl ProjectSummary {
    pub fn from_config(id: &str, config: ProjectConfig) -> Self {
        let name = if config.name.trim().is_empty() {
            id.to_string()
        } else {
            config.name
        };
        Self {
            id: id.to_string(),
            name,
            description: config.description,
            created: config.created,
            tags: config.tags,
        }
    }

    /// Entry used when a project's config exists but cannot be parsed.
    pub fn degraded(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            created: String::new(),
            tags: Vec::new(),
        }
    }
}
