//! Store error types.
//!
//! Uses miette for diagnostic output and thiserror for the derive macros.
//! Every variant maps onto one HTTP status in the API layer.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Project and task-board store errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("{entity_type} '{id}' not found")]
    #[diagnostic(code(shebang::store::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} '{id}' already exists")]
    #[diagnostic(code(shebang::store::already_exists))]
    AlreadyExists { entity_type: String, id: String },

    #[error("Invalid input: {message}")]
    #[diagnostic(code(shebang::store::invalid_input))]
    InvalidInput { message: String },

    #[error("Column '{column}' does not exist on this board")]
    #[diagnostic(
        code(shebang::store::invalid_column),
        help("Valid columns are listed in the board's `columns` array")
    )]
    InvalidColumn { column: String },

    #[error("I/O error on {}: {source}", path.display())]
    #[diagnostic(code(shebang::store::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {message}")]
    #[diagnostic(code(shebang::store::serialization))]
    Serialization { message: String },
}

impl StoreError {
    pub(crate) fn not_found(entity_type: &str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        StoreError::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: e.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(e: serde_yaml::Error) -> Self {
        StoreError::Serialization {
            message: e.to_string(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
