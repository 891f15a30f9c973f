use std::fmt;
use taskboard_core::TaskId;

/// Error type for client operations. Cloneable so the manager can keep the
/// latest one around while also returning it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request was rejected as invalid (HTTP 400 or local validation).
    #[error("{0}")]
    Validation(String),
    /// The task does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),
    /// Any other non-success response.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),
    /// A success response whose body was not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Some calls of a bulk action failed.
    #[error("{0}")]
    PartialBulkFailure(BulkFailure),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Ids whose per-task call failed during a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub failed: Vec<TaskId>,
    pub total: usize,
}

impl fmt::Display for BulkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.failed.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{} of {} failed: ids {}",
            self.failed.len(),
            self.total,
            ids.join(", ")
        )
    }
}
