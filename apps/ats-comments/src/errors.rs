use thiserror::Error;
use uuid::Uuid;

/// Errors raised while talking to the ATS backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid record from backend: {0}")]
    InvalidRecord(String),
}

/// Client-side form validation failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Comment text cannot be empty")]
    EmptyText,

    #[error("A score must be selected")]
    MissingScore,

    #[error("Score {0} is not one of 0, 3, 6, 10")]
    InvalidScore(u8),
}

/// Errors surfaced by the section orchestrator to its form and callers.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Section is read-only")]
    ReadOnly,

    #[error("Record {0} is not in the current list")]
    UnknownRecord(Uuid),

    #[error("No delete is awaiting confirmation")]
    NoPendingDelete,
}
