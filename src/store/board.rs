//! Task board persistence.
//!
//! Each project owns one `kanban.json`. Nothing is cached between calls:
//! every operation re-reads the document, and every mutation is a full
//! read-modify-write performed under that project's lock.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tracing::{debug, info};

use super::error::{StoreError, StoreResult};
use super::models::{Board, Task, TaskPatch};
use super::utils::{current_timestamp, read_json, write_json};
use super::{BOARD_FILE, data_dir};

pub struct BoardStore {
    projects_dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl BoardStore {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            locks: DashMap::new(),
        }
    }

    fn board_path(&self, project: &str) -> PathBuf {
        data_dir(&self.projects_dir, project).join(BOARD_FILE)
    }

    /// Number of projects holding a lock entry.
    #[cfg(test)]
    pub(crate) fn tracked_projects(&self) -> usize {
        self.locks.len()
    }

    fn lock_for(&self, project: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            &self.locks
                .entry(project.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Load the board of `project`.
    ///
    /// A missing or unparseable document is reported as `NotFound`.
    pub fn get_board(&self, project: &str) -> StoreResult<Board> {
        let path = self.board_path(project);
        read_json(&path).map_err(|e| {
            debug!(project = %project, error = %e, "Board unavailable");
            StoreError::not_found("Board", project)
        })
    }

    /// Append `task` to `column_id` and return it.
    pub fn add_task(&self, project: &str, column_id: &str, task: Task) -> StoreResult<Task> {
        let added = self.mutate(project, |board| {
            board.add_task(column_id, task.clone())?;
            Ok(task)
        })?;
        info!(project = %project, task = %added.id, column = %column_id, "Task added");
        Ok(added)
    }

    /// Move `task_id` to the end of `target_column`.
    pub fn move_task(&self, project: &str, task_id: &str, target_column: &str) -> StoreResult<()> {
        self.mutate(project, |board| board.move_task(task_id, target_column))?;
        info!(project = %project, task = %task_id, column = %target_column, "Task moved");
        Ok(())
    }

    /// Merge `patch` into `task_id` and return the updated task.
    pub fn update_task(&self, project: &str, task_id: &str, patch: TaskPatch) -> StoreResult<Task> {
        let task = self.mutate(project, |board| board.update_task(task_id, patch).cloned())?;
        info!(project = %project, task = %task_id, "Task updated");
        Ok(task)
    }

    /// Locked read-modify-write. The board is only written back, with a
    /// fresh `lastUpdated`, when `f` succeeds.
    ///
    /// Projects without a board file get no lock entry.
    fn mutate<T>(
        &self,
        project: &str,
        f: impl FnOnce(&mut Board) -> StoreResult<T>,
    ) -> StoreResult<T> {
        if !self.board_path(project).is_file() {
            return Err(StoreError::not_found("Board", project));
        }
        let lock = self.lock_for(project);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut board = self.get_board(project)?;
        let out = f(&mut board)?;
        board.last_updated = current_timestamp();
        write_json(&self.board_path(project), &board)?;
        Ok(out)
    }
}
