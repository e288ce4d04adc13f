//! # Session Error Types
//!
//! Error types for edit-session and store-boundary operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (meridian-core)          StoreError (collaborator)          │
//! │       │                                  │                              │
//! │       └────────────┬─────────────────────┘                              │
//! │                    ▼                                                    │
//! │  SessionError (this module) ← Adds save/batch/parse categorization     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  Host application displays a user-facing message; in-memory state      │
//! │  is preserved for retry on persistence failures.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use meridian_core::CoreError;

/// A failure reported by the external store collaborator.
///
/// Carries the backend's message when one was provided; `message()` falls
/// back to a generic label so the operator always sees something.
#[derive(Debug, Clone, Error)]
#[error("{}", self.message())]
pub struct StoreError {
    pub backend_message: Option<String>,
}

impl StoreError {
    /// A store error with a backend-provided message.
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError {
            backend_message: Some(message.into()),
        }
    }

    /// A store error with no usable backend message.
    pub fn unavailable() -> Self {
        StoreError {
            backend_message: None,
        }
    }

    /// The message to surface: backend detail or the generic fallback.
    pub fn message(&self) -> &str {
        self.backend_message
            .as_deref()
            .unwrap_or("The backing store rejected the request")
    }
}

/// Session-level errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A business rule rejected the operation locally.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A save for this session is already in flight; the UI must wait for
    /// it to settle before retrying. There is no optimistic-concurrency
    /// check against the store, so overlapping saves are never issued.
    #[error("A save is already in progress for this document")]
    SaveInFlight,

    /// The store rejected a request. In-memory state is unchanged so the
    /// operator can retry without re-entering data.
    #[error("Save failed: {message}")]
    Persistence { message: String },

    /// A bulk return submission partially failed. Reported as counts plus
    /// the failed indices, never as a single pass/fail flag.
    #[error("{succeeded} return(s) recorded, {} failed", failed.len())]
    PartialBatch {
        succeeded: usize,
        /// (index into the submitted batch, failure message) per failure.
        failed: Vec<(usize, String)>,
    },

    /// A wire payload could not be validated into core types.
    #[error("Malformed {field}: {reason}")]
    Malformed { field: String, reason: String },
}

impl SessionError {
    /// Creates a Malformed error.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SessionError::Malformed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Persistence {
            message: err.message().to_string(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_message_fallback() {
        assert_eq!(StoreError::backend("duplicate id").message(), "duplicate id");
        assert_eq!(
            StoreError::unavailable().message(),
            "The backing store rejected the request"
        );
    }

    #[test]
    fn test_partial_batch_reports_counts() {
        let err = SessionError::PartialBatch {
            succeeded: 2,
            failed: vec![(1, "out of window".to_string())],
        };
        assert_eq!(err.to_string(), "2 return(s) recorded, 1 failed");
    }

    #[test]
    fn test_store_error_converts_with_message() {
        let err: SessionError = StoreError::backend("constraint violated").into();
        match err {
            SessionError::Persistence { message } => assert_eq!(message, "constraint violated"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
