//! Error types for the view core.
//!
//! Failures are split by origin: `SessionError` for operations against the
//! storage collaborator, `StreamError` for asynchronous producers that
//! terminate abnormally. Neither is fatal to the view; both surface to the
//! renderer as an inline notice.

use thiserror::Error;

/// Errors returned by the storage session collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Creating a new entry failed on the backend.
    #[error("create failed: {reason}")]
    CreateFailed { reason: String },

    /// Updating an existing entry failed on the backend.
    #[error("update failed for entry '{id}': {reason}")]
    UpdateFailed { id: String, reason: String },

    /// Deleting an entry failed on the backend.
    #[error("delete failed for entry '{id}': {reason}")]
    DeleteFailed { id: String, reason: String },
}

impl SessionError {
    /// Short user-facing description for the inline error indicator.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::CreateFailed { .. } => "Could not create the entry",
            SessionError::UpdateFailed { .. } => "Could not save the entry",
            SessionError::DeleteFailed { .. } => "Could not delete the entry",
        }
    }
}

/// An asynchronous producer (directory listing or cache rebuild)
/// terminated abnormally.
///
/// Results accumulated before the failure are kept as best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stream failed: {reason}")]
pub struct StreamError {
    pub reason: String,
}

impl StreamError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
