//! # Validation Module
//!
//! Input validation utilities for document editing.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell (outside this repo)                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Caught at the point of input, before any store call               │
//! │  └── Clamps operator-typed percentages into [0, 100]                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backing store (external collaborator)                        │
//! │  └── Enforces its own constraints; this layer fails fast first         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::DiscountRate;
use crate::{MAX_DOCUMENT_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0); a zero-quantity line is a removal
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a free quantity.
///
/// ## Rules
/// - Must be non-negative (zero is the common case)
/// - Bounded like quantity, since free units consume stock too
pub fn validate_free_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "free quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "free quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (fully free lines happen via free_quantity, but a
///   zero-priced catalog item is legal)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Clamps an operator-typed discount percentage into [0, 100].
///
/// This is the input-boundary clamp the pricing calculator relies on:
/// downstream arithmetic never re-validates. Non-finite input is rejected
/// rather than clamped, since it signals a broken caller not a typo.
pub fn validate_discount_percent(pct: f64) -> ValidationResult<DiscountRate> {
    if !pct.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "discount percent".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    Ok(DiscountRate::from_percentage(pct))
}

// =============================================================================
// Header / Selection Validators
// =============================================================================

/// Validates that a product has been selected before a line operation.
pub fn validate_product_selected(product_id: &str) -> ValidationResult<()> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }
    Ok(())
}

/// Validates the document header before save.
///
/// ## Rules
/// - A customer/supplier must be selected
pub fn validate_header(party_id: &str) -> ValidationResult<()> {
    if party_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer/supplier".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates document size (number of lines).
pub fn validate_line_count(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_DOCUMENT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "document lines".to_string(),
            min: 0,
            max: MAX_DOCUMENT_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
