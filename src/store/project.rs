//! Project discovery, creation and the active-project pointer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::{Value, json};
use tracing::{info, warn};

use super::error::{StoreError, StoreResult};
use super::models::{Board, ProjectConfig, ProjectSummary};
use super::utils::{atomic_write, current_timestamp, is_valid_project_id, read_json, slugify, write_json};
use super::{BOARD_FILE, CONFIG_FILE, DEFAULT_PROJECT, METRICS_FILE, data_dir};

/// Owns the projects root and the persisted active-project pointer.
///
/// The pointer is read once when the store is opened and cached; every
/// change is written back to the pointer file so it survives restarts.
pub struct ProjectStore {
    projects_dir: PathBuf,
    template_dir: PathBuf,
    pointer_file: PathBuf,
    active: RwLock<String>,
}

impl ProjectStore {
    /// Open the store, loading the active project from `pointer_file`.
    pub fn open(
        projects_dir: impl Into<PathBuf>,
        template_dir: impl Into<PathBuf>,
        pointer_file: impl Into<PathBuf>,
    ) -> Self {
        let pointer_file = pointer_file.into();
        let active = read_pointer(&pointer_file).unwrap_or_else(|| DEFAULT_PROJECT.to_string());
        Self {
            projects_dir: projects_dir.into(),
            template_dir: template_dir.into(),
            pointer_file,
            active: RwLock::new(active),
        }
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Identifier of the currently active project.
    pub fn active_project(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve the project a request targets: `explicit` when given,
    /// otherwise the active project.
    pub fn resolve(&self, explicit: Option<&str>) -> StoreResult<String> {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) if is_valid_project_id(id) => Ok(id.to_string()),
            Some(id) => Err(StoreError::invalid_input(format!(
                "'{}' is not a valid project id",
                id
            ))),
            None => Ok(self.active_project()),
        }
    }

    /// All projects under the projects root, sorted by directory name.
    ///
    /// Directories without a `.shebang/config.yaml` are skipped. A config
    /// that fails to parse still yields an entry named after its directory.
    pub fn list_projects(&self) -> StoreResult<Vec<ProjectSummary>> {
        if !self.projects_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&self.projects_dir).map_err(|e| StoreError::io(&self.projects_dir, e))?;

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        ids.sort();

        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            let config_path = data_dir(&self.projects_dir, &id).join(CONFIG_FILE);
            if !config_path.is_file() {
                continue;
            }
            match read_config(&config_path) {
                Ok(config) => projects.push(ProjectSummary::from_config(&id, config)),
                Err(e) => {
                    warn!(project = %id, error = %e, "Unreadable project config");
                    projects.push(ProjectSummary::degraded(&id));
                }
            }
        }
        Ok(projects)
    }

    /// Make `id` the active project and persist the pointer.
    pub fn set_active_project(&self, id: &str) -> StoreResult<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(StoreError::invalid_input("Project ID is required"));
        }
        if !is_valid_project_id(id) || !data_dir(&self.projects_dir, id).is_dir() {
            return Err(StoreError::not_found("Project", id));
        }

        if let Some(parent) = self.pointer_file.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        atomic_write(&self.pointer_file, id.as_bytes())?;

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = id.to_string();
        info!(project = %id, "Active project changed");
        Ok(())
    }

    /// Materialize a new project subtree from the template.
    pub fn create_project(&self, name: &str, description: &str) -> StoreResult<ProjectSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid_input("Project name is required"));
        }

        let id = slugify(name);
        let project_root = self.projects_dir.join(&id);
        if project_root.exists() {
            return Err(StoreError::AlreadyExists {
                entity_type: "Project".to_string(),
                id,
            });
        }

        let dir = data_dir(&self.projects_dir, &id);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let now = current_timestamp();
        write_json(&dir.join(BOARD_FILE), &Board::canonical(now.clone()))?;
        write_json(&dir.join(METRICS_FILE), &self.initial_metrics(&now))?;

        let config = ProjectConfig {
            name: name.to_string(),
            description: description.trim().to_string(),
            created: now,
            ..ProjectConfig::default()
        };
        let yaml = serde_yaml::to_string(&config)?;
        atomic_write(&dir.join(CONFIG_FILE), yaml.as_bytes())?;

        info!(project = %id, "Project created");
        Ok(ProjectSummary::from_config(&id, config))
    }

    /// The project's free-form metrics document.
    pub fn metrics(&self, id: &str) -> StoreResult<Value> {
        let path = data_dir(&self.projects_dir, id).join(METRICS_FILE);
        if !path.is_file() {
            return Err(StoreError::not_found("Metrics", id));
        }
        read_json(&path)
    }

    /// Template metrics stamped with a zeroed timeline.
    fn initial_metrics(&self, now: &str) -> Value {
        let template = self.template_dir.join(METRICS_FILE);
        let mut metrics = if template.is_file() {
            read_json::<Value>(&template).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring unreadable metrics template");
                json!({})
            })
        } else {
            json!({})
        };

        if let Some(obj) = metrics.as_object_mut() {
            obj.insert("lastUpdated".to_string(), json!(now));
            obj.insert(
                "timeline".to_string(),
                json!({
                    "startDate": now,
                    "activeHours": 0,
                    "calendarHours": 0,
                }),
            );
        }
        metrics
    }
}

fn read_pointer(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_config(path: &Path) -> StoreResult<ProjectConfig> {
    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    Ok(serde_yaml::from_str(&raw)?)
}
