//! File-backed stores for projects and their task boards.
//!
//! # Layout
//!
//! ```text
//! projects/
//!   <id>/
//!     .shebang/
//!       config.yaml
//!       kanban.json
//!       metrics.json
//! ```

mod board;
mod error;
mod models;
mod project;
pub mod utils;


use std::path::{Path, PathBuf};

pub use board::BoardStore;
pub use error::{StoreError, StoreResult};
pub use models::*;
pub use project::ProjectStore;

/// Project used when no active pointer has been persisted.
pub const DEFAULT_PROJECT: &str = "shebang-dev";
/// Per-project directory holding the board, metrics and config.
pub const PROJECT_DATA_DIR: &str = ".shebang";
pub const CONFIG_FILE: &str = "config.yaml";
pub const BOARD_FILE: &str = "kanban.json";
pub const METRICS_FILE: &str = "metrics.json";

/// `<projects_dir>/<id>/.shebang`
pub fn data_dir(projects_dir: &Path, id: &str) -> PathBuf {
    projects_dir.join(id).join(PROJECT_DATA_DIR)
}
