// Error types for the redmine workflow.
// Separates user-facing action failures from API, storage, and general errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Expected condition shown to the user as a result item (no match, no server, ...).
    #[error("{0}")]
    Action(String),

    #[error("Redmine API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid api-key")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl WorkflowError {
    /// Build a user-facing action error.
    pub fn action(message: impl Into<String>) -> Self {
        WorkflowError::Action(message.into())
    }

    /// Whether this error is an expected action outcome rather than a failure.
    pub fn is_action(&self) -> bool {
        matches!(self, WorkflowError::Action(_))
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
