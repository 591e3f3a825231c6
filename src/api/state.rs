//! Application state for the portal server.

use std::sync::Arc;

use super::Config;
use crate::store::{BoardStore, ProjectStore};

/// Shared application state.
///
/// Holds the configuration and the two stores. The active-project pointer
/// lives inside [`ProjectStore`], so handlers receive it through this state
/// instead of reading the pointer file on every request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    projects: Arc<ProjectStore>,
    boards: Arc<BoardStore>,
}

impl AppState {
    /// Open both stores at the locations derived from `config`.
    pub fn new(config: Config) -> Self {
        let projects = ProjectStore::open(
            config.projects_dir(),
            config.template_dir(),
            config.active_pointer(),
        );
        let boards = BoardStore::new(config.projects_dir());
        Self {
            config: Arc::new(config),
            projects: Arc::new(projects),
            boards: Arc::new(boards),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn boards(&self) -> &BoardStore {
        &self.boards
    }
}
