//! Error types for scene operations, export, sharing and the chat boundary.

use shared::ObjectId;
use thiserror::Error;

/// Result type for designer operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that abort a single operation. Scene and history are left untouched.
#[derive(Debug, Error)]
pub enum DesignError {
    /// Export requested on a scene with no objects.
    #[error("nothing to export: the scene is empty")]
    EmptyExport,

    /// Share token is not valid encoded scene text.
    #[error("invalid share code: {0}")]
    Decode(String),

    /// The text-generation service failed or returned an unusable payload.
    #[error("assistant request failed: {0}")]
    ExternalService(String),

    /// The scene already holds the maximum number of objects.
    #[error("scene is full (max {max} objects)")]
    SceneFull { max: usize },

    /// No object with this id.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for DesignError {
    fn from(err: reqwest::Error) -> Self {
        DesignError::ExternalService(err.to_string())
    }
}
