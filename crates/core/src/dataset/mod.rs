//! Saved search configurations ("datasets").
//!
//! A dataset holds the proxy URL, the uploaders and the search terms of a
//! search so it can be re-run later. Each one lives in its own CSV file.

pub mod file;
mod store;
mod types;

pub use file::{SaveMode, CELL_DELIMITER};
pub use store::DatasetStore;
pub use types::*;

use thiserror::Error;

/// Errors that can occur while reading or writing datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    FileNotFound(String),

    #[error("Permission denied for dataset file: {0}")]
    PermissionDenied(String),

    #[error("Dataset already exists: {0}")]
    Conflict(String),

    #[error("Failed to parse dataset: {0}")]
    ParseError(String),

    #[error("Dataset I/O error: {0}")]
    Io(String),
}
