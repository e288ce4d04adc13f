//! # Stock Availability Checker
//!
//! Gates line add/update operations against known stock.
//!
//! ## Why Gate At The Line, Not At Submit?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Add / Update Line                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check_availability(requested, free, available) ← HERE                  │
//! │       │                                                                 │
//! │       ├── requested + free > available → InsufficientStock {available}  │
//! │       │       (block THIS operation only; document untouched)           │
//! │       │                                                                 │
//! │       └── OK → line enters the document, totals recompute               │
//! │                                                                         │
//! │  Catching the error here keeps bad quantities out of the totals        │
//! │  instead of discovering them at final submission.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! When the line being validated is an edit of an already-committed line for
//! the same product, available stock is first inflated by the old line's
//! committed units (`effective_available`), so keeping or reducing the
//! quantity never spuriously fails.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::types::LineItem;

/// Snapshot of available stock per product, read-only to this core.
///
/// The session layer builds one from the catalog collaborator on load.
pub type StockSnapshot = HashMap<String, i64>;

/// Checks a requested quantity against available stock.
///
/// Free units consume stock like paid units, so the gate is on
/// `requested + free`. The boundary is inclusive: equality passes.
pub fn check_availability(
    sku: &str,
    requested_qty: i64,
    free_qty: i64,
    available: i64,
) -> CoreResult<()> {
    let consumption = requested_qty + free_qty;
    if consumption > available {
        return Err(CoreError::InsufficientStock {
            sku: sku.to_string(),
            available,
            requested: consumption,
        });
    }
    Ok(())
}

/// Available stock for a line operation, inflated by the edited line.
///
/// An existing committed line still holds its units, so editing it must
/// treat those units as available again:
/// `effective = available + original.quantity + original.free_quantity`.
/// For a brand-new line there is no inflation.
pub fn effective_available(available: i64, editing: Option<&LineItem>) -> i64 {
    match editing {
        Some(original) => available + original.stock_consumption(),
        None => available,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::DiscountRate;
    use crate::types::Product;

    fn line(quantity: i64, free_quantity: i64) -> LineItem {
        let product = Product {
            id: "p-1".to_string(),
            sku: "SKU-1".to_string(),
            name: "Widget".to_string(),
            unit_price_cents: 1000,
            mrp_cents: None,
            available_quantity: 0,
            unit_of_measure: "pcs".to_string(),
            is_active: true,
        };
        LineItem::from_product(&product, quantity, free_quantity, DiscountRate::zero())
    }

    #[test]
    fn test_over_available_rejects() {
        let err = check_availability("SKU-1", 8, 3, 10).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => {
                assert_eq!(sku, "SKU-1");
                assert_eq!(available, 10);
                assert_eq!(requested, 11);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        // requested + free == available always accepts
        assert!(check_availability("SKU-1", 7, 3, 10).is_ok());
        assert!(check_availability("SKU-1", 10, 0, 10).is_ok());
        assert!(check_availability("SKU-1", 0, 10, 10).is_ok());
    }

    #[test]
    fn test_free_quantity_counts_against_stock() {
        assert!(check_availability("SKU-1", 5, 0, 5).is_ok());
        assert!(check_availability("SKU-1", 5, 1, 5).is_err());
    }

    #[test]
    fn test_effective_available_inflates_for_edit() {
        let original = line(4, 0);

        // Available 10, line already committed 4, edit to 12
        let effective = effective_available(10, Some(&original));
        assert_eq!(effective, 14);
        assert!(check_availability("SKU-1", 12, 0, effective).is_ok());
        assert!(check_availability("SKU-1", 15, 0, effective).is_err());
    }

    #[test]
    fn test_edit_down_to_original_never_fails() {
        // Available alone (0) would be insufficient for the original 4,
        // but reducing or keeping the quantity must still pass.
        let original = line(4, 2);
        let effective = effective_available(0, Some(&original));
        assert_eq!(effective, 6);
        assert!(check_availability("SKU-1", 4, 2, effective).is_ok());
        assert!(check_availability("SKU-1", 2, 1, effective).is_ok());
    }

    #[test]
    fn test_no_inflation_for_new_line() {
        assert_eq!(effective_available(10, None), 10);
    }
}
