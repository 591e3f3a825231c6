//! Shebang! development portal.
//!
//! A single local server that renders the project documentation, exposes
//! the per-project Kanban board as JSON and switches between projects.

pub mod api;
pub mod markdown;
pub mod serde_utils;
pub mod store;
