//! Error types for the extension deployer

use http::StatusCode;
use thiserror::Error;

/// Main error type for the extension deployer
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Extension query failed: {status} - {body}")]
    RemoteQueryFailed { status: StatusCode, body: String },

    #[error("Task has not been created: {status} - {body}")]
    SubmissionFailed { status: StatusCode, body: String },

    #[error("Task with id {task_id} failed. Metadata: {metadata}")]
    TaskFailed { task_id: String, metadata: String },

    #[error("Task with id {task_id} did not finish within {waited_secs}s")]
    PollTimedOut { task_id: String, waited_secs: u64 },

    #[error("Extension {0} not found after processing")]
    ExtensionNotFound(String),

    #[error("Failed to trust the extension: {status} - {body}")]
    TrustFailed { status: StatusCode, body: String },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for DeployError {
    fn from(err: anyhow::Error) -> Self {
        DeployError::Internal(err.to_string())
    }
}
