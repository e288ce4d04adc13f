//! # Document Totals Aggregator
//!
//! Folds priced line items plus a document-level extra discount (and, for
//! edits, prior refunds) into the summary figures every document screen
//! displays.
//!
//! ## Calculation Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross_total           = Σ unit_price × quantity   (display reference)  │
//! │  subtotal              = Σ line totals             (after line disc.)   │
//! │  extra_discount_amount = subtotal × extra_discount                      │
//! │  grand_total           = subtotal − extra_discount_amount − refunds     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Always a full recomputation. Line counts are tens, not thousands, and a
//! stale cached figure on an invoice is a correctness bug; there is no
//! incremental arithmetic.
//!
//! A negative grand total (over-discount or over-refund) is allowed and
//! surfaced via [`DocumentTotals::is_negative`], never clamped silently.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money, MAX_BPS};
use crate::types::{LineItem, ReturnRecord};

/// Summary figures for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentTotals {
    /// Pre-discount reference figure, display only.
    pub gross_total: Money,
    /// Sum of already-discounted line totals.
    pub subtotal: Money,
    /// Extra discount taken off the subtotal.
    pub extra_discount_amount: Money,
    /// Value of goods returned against this document.
    pub refund_total: Money,
    /// subtotal − extra discount − refunds. May be negative.
    pub grand_total: Money,
}

impl DocumentTotals {
    /// All-zero totals for an empty document.
    pub fn empty() -> Self {
        DocumentTotals {
            gross_total: Money::zero(),
            subtotal: Money::zero(),
            extra_discount_amount: Money::zero(),
            refund_total: Money::zero(),
            grand_total: Money::zero(),
        }
    }

    /// True when over-discounting or over-refunding pushed the grand total
    /// below zero. Callers should warn, not clamp.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.grand_total.is_negative()
    }
}

/// Recomputes the full totals for a line list.
///
/// ## Example
/// ```rust
/// use meridian_core::money::{DiscountRate, Money};
/// use meridian_core::totals::aggregate;
///
/// let totals = aggregate(&[], DiscountRate::from_bps(500), Money::zero());
/// assert!(totals.grand_total.is_zero());
/// ```
pub fn aggregate(
    lines: &[LineItem],
    extra_discount: DiscountRate,
    refund_total: Money,
) -> DocumentTotals {
    let gross_total: Money = lines.iter().map(|l| l.priced().gross).sum();
    let subtotal: Money = lines.iter().map(|l| l.total()).sum();
    let extra_discount_amount = subtotal.percent_of(extra_discount);

    DocumentTotals {
        gross_total,
        subtotal,
        extra_discount_amount,
        refund_total,
        grand_total: subtotal - extra_discount_amount - refund_total,
    }
}

/// Folds return records into the refund total:
/// `Σ quantity × selling price at return time`.
pub fn refund_total(returns: &[ReturnRecord]) -> Money {
    returns.iter().map(|r| r.refund_value()).sum()
}

/// An extra-discount rate recovered by inverse arithmetic.
///
/// `derived` is always true: the figure is a best-effort reconstruction
/// from a stored grand total, not an authoritative value, and any UI that
/// surfaces it must label it as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InferredRate {
    pub rate: DiscountRate,
    pub derived: bool,
}

/// Recovers the extra-discount percentage for a document that persisted
/// only a grand total (no discount breakdown):
///
/// `rate = ((Σ line totals − refund_total) − stored_grand_total) / Σ line totals`
///
/// Clamped to `>= 0` (a stored total above the computed one would otherwise
/// produce a negative rate) and capped at 100%. Zero when the line totals
/// sum to zero.
pub fn infer_extra_discount(
    lines: &[LineItem],
    refund_total: Money,
    stored_grand_total: Money,
) -> InferredRate {
    let subtotal: Money = lines.iter().map(|l| l.total()).sum();

    let rate = if subtotal.cents() <= 0 {
        DiscountRate::zero()
    } else {
        let implied_discount =
            (subtotal.cents() - refund_total.cents()) - stored_grand_total.cents();
        if implied_discount <= 0 {
            DiscountRate::zero()
        } else {
            // Round to the nearest basis point; cap at 100%.
            let bps = (implied_discount as i128 * MAX_BPS as i128 + subtotal.cents() as i128 / 2)
                / subtotal.cents() as i128;
            DiscountRate::from_bps(bps.min(MAX_BPS as i128) as u32)
        }
    };

    InferredRate {
        rate,
        derived: true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(unit_price_cents: i64, quantity: i64, discount_bps: u32) -> LineItem {
        LineItem {
            product_id: format!("p-{unit_price_cents}"),
            sku: format!("SKU-{unit_price_cents}"),
            product_name: "Test".to_string(),
            quantity,
            free_quantity: 0,
            unit_price_cents,
            discount_bps,
        }
    }

    fn return_record(quantity: i64, selling_price_cents: i64) -> ReturnRecord {
        ReturnRecord {
            id: "r-1".to_string(),
            document_id: "d-1".to_string(),
            product_id: "p-1".to_string(),
            quantity,
            selling_price_cents,
            returned_at: Utc::now(),
        }
    }

    #[test]
    fn test_extra_discount_applies_after_line_discounts() {
        // Two lines totaling 2700 and 1500 (subtotal 4200), extra 5%
        // → extra discount 210, grand total 3990
        let lines = vec![line(1000, 3, 1000), line(1500, 1, 0)];
        let totals = aggregate(&lines, DiscountRate::from_bps(500), Money::zero());

        assert_eq!(totals.subtotal.cents(), 4200);
        assert_eq!(totals.extra_discount_amount.cents(), 210);
        assert_eq!(totals.grand_total.cents(), 3990);
    }

    #[test]
    fn test_refunds_subtract_from_grand_total() {
        // Same document later has a return of 1 unit at 500 → grand 3490
        let lines = vec![line(1000, 3, 1000), line(1500, 1, 0)];
        let refunds = refund_total(&[return_record(1, 500)]);
        assert_eq!(refunds.cents(), 500);

        let totals = aggregate(&lines, DiscountRate::from_bps(500), refunds);
        assert_eq!(totals.grand_total.cents(), 3490);
    }

    #[test]
    fn test_gross_total_ignores_discounts() {
        let lines = vec![line(1000, 3, 1000), line(1500, 1, 0)];
        let totals = aggregate(&lines, DiscountRate::from_bps(500), Money::zero());
        assert_eq!(totals.gross_total.cents(), 4500);
    }

    #[test]
    fn test_empty_document() {
        let totals = aggregate(&[], DiscountRate::from_bps(500), Money::zero());
        assert_eq!(totals, DocumentTotals::empty());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let lines = vec![line(1234, 7, 1250), line(999, 2, 0)];
        let a = aggregate(&lines, DiscountRate::from_bps(300), Money::from_cents(100));
        let b = aggregate(&lines, DiscountRate::from_bps(300), Money::from_cents(100));
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_grand_total_surfaced_not_clamped() {
        // Over-refund: subtotal 1000, refund 1500
        let lines = vec![line(1000, 1, 0)];
        let totals = aggregate(&lines, DiscountRate::zero(), Money::from_cents(1500));

        assert_eq!(totals.grand_total.cents(), -500);
        assert!(totals.is_negative());
    }

    #[test]
    fn test_refund_total_accumulates() {
        let refunds = refund_total(&[return_record(1, 500), return_record(3, 200)]);
        assert_eq!(refunds.cents(), 1100);
    }

    #[test]
    fn test_infer_extra_discount_round_trip() {
        // Document persisted grand total 3990 from subtotal 4200 → 5%
        let lines = vec![line(1000, 3, 1000), line(1500, 1, 0)];
        let inferred = infer_extra_discount(&lines, Money::zero(), Money::from_cents(3990));

        assert_eq!(inferred.rate.bps(), 500);
        assert!(inferred.derived);
    }

    #[test]
    fn test_infer_extra_discount_accounts_for_refunds() {
        // subtotal 4200, refund 500, stored 3490 → implied discount 210 → 5%
        let lines = vec![line(1000, 3, 1000), line(1500, 1, 0)];
        let inferred =
            infer_extra_discount(&lines, Money::from_cents(500), Money::from_cents(3490));
        assert_eq!(inferred.rate.bps(), 500);
    }

    #[test]
    fn test_infer_extra_discount_clamps_negative_to_zero() {
        // Stored total above the computed one implies a negative rate
        let lines = vec![line(1000, 1, 0)];
        let inferred = infer_extra_discount(&lines, Money::zero(), Money::from_cents(1200));
        assert_eq!(inferred.rate.bps(), 0);
        assert!(inferred.derived);
    }

    #[test]
    fn test_infer_extra_discount_zero_subtotal() {
        let inferred = infer_extra_discount(&[], Money::zero(), Money::from_cents(100));
        assert_eq!(inferred.rate.bps(), 0);
    }
}
