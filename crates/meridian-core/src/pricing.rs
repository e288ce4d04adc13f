//! # Line Pricing Calculator
//!
//! The single place line-level discount arithmetic lives. Every document
//! screen in the product (invoice, purchase, return) prices its lines here
//! instead of re-implementing the percentage math inline.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price_line(unit_price, quantity, discount)                             │
//! │                                                                         │
//! │  gross           = unit_price × quantity                                │
//! │  discount_amount = gross × discount                                     │
//! │  total           = gross − discount_amount                              │
//! │                                                                         │
//! │  Pure. No side effects. Idempotent. Called on every keystroke-level    │
//! │  edit to recompute the live preview before commit.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs are clamped at the boundary (`DiscountRate` caps at 100%, quantity
//! validation rejects negatives before a line exists), so the calculator
//! does not re-validate and `total >= 0` holds by construction.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money};

/// The priced figures for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinePrice {
    /// Pre-discount reference figure: unit price × quantity.
    pub gross: Money,
    /// Discount amount taken off the gross.
    pub discount_amount: Money,
    /// Line total after discount. Never negative for valid inputs.
    pub total: Money,
}

/// Prices one line item.
///
/// ## Example
/// ```rust
/// use meridian_core::money::{DiscountRate, Money};
/// use meridian_core::pricing::price_line;
///
/// // unit price 10.00, quantity 3, discount 10%
/// let priced = price_line(Money::from_cents(1000), 3, DiscountRate::from_bps(1000));
/// assert_eq!(priced.gross.cents(), 3000);
/// assert_eq!(priced.discount_amount.cents(), 300);
/// assert_eq!(priced.total.cents(), 2700);
/// ```
pub fn price_line(unit_price: Money, quantity: i64, discount: DiscountRate) -> LinePrice {
    let gross = unit_price.multiply_quantity(quantity);
    let discount_amount = gross.percent_of(discount);

    LinePrice {
        gross,
        discount_amount,
        total: gross - discount_amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
