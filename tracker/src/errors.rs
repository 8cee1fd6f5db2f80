use crate::types::ResourceKind;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tracker operations
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

/// Every variant is terminal for the current run.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("tracking service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("remediation failed (exit code {code:?}): {stderr}")]
    RemediationFailed { code: Option<i32>, stderr: String },

    #[error("{kind} lookup failed with status {status}: {body}")]
    LookupFailed {
        kind: ResourceKind,
        status: StatusCode,
        body: String,
    },

    #[error("{kind} creation failed with status {status}: {body}")]
    CreationFailed {
        kind: ResourceKind,
        status: StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("could not encode request payload: {0}")]
    InvalidPayload(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("upload rejected with status {status}: {body}")]
    UploadRejected { status: StatusCode, body: String },

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
