//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  meridian-session errors (separate crate)                               │
//! │  └── SessionError     - Save/load/batch failures                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, status, quantities)
//! 3. Errors are enum variants, never String
//! 4. Every rejected operation produces a user-visible reason

use thiserror::Error;

use crate::status::DocumentStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors are resolved locally at the point of input and never reach
/// the store boundary; each maps to a message the operator sees.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the loaded catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested units (including free units) exceed available stock.
    ///
    /// Carries the available quantity so the operator sees the number that
    /// would fit. Blocks the one add/update operation; the rest of the
    /// document is unaffected.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The document is in a locked status and the caller is not on the
    /// privileged re-entry path. Raised before any store call is attempted.
    #[error("Document {document_id} is {status}, edits are locked")]
    EditLocked {
        document_id: String,
        status: DocumentStatus,
    },

    /// No line exists for the given product on this document.
    #[error("No line for product {0} on this document")]
    LineNotFound(String),

    /// A status change the transition table does not allow.
    #[error("Cannot move document from {from} to {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// Document has exceeded the maximum line count.
    #[error("Document cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-finite percentage, unknown status string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "SKU-330".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for SKU-330: available 3, requested 5"
        );

        let err = CoreError::EditLocked {
            document_id: "d-1".to_string(),
            status: DocumentStatus::InTransit,
        };
        assert_eq!(err.to_string(), "Document d-1 is In Transit, edits are locked");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product".to_string(),
        };
        assert_eq!(err.to_string(), "product is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
