//! # Domain Types
//!
//! Core domain types used throughout Meridian Back-Office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Document     │   │   LineItem      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  product_id     │       │
//! │  │  sku (business) │   │  kind           │   │  qty / free_qty │       │
//! │  │  name           │   │  status         │   │  unit_price     │       │
//! │  │  unit_price     │   │  items          │   │  discount_bps   │       │
//! │  │  available_qty  │   │  extra_discount │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  ReturnRecord   │   │  ActorContext   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  never mutated, │   │  injected, not  │                             │
//! │  │  only summed    │   │  ambient        │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for store relations
//! - Business ID: (sku, document number, etc.) - human-readable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money};
use crate::pricing::{price_line, LinePrice};
use crate::status::DocumentStatus;

// =============================================================================
// Product
// =============================================================================

/// A catalog product as the stock/catalog collaborator exposes it.
///
/// Read-only to this core: the pricing and stock components consume
/// `unit_price_cents` and `available_quantity` but never write them back.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown on documents.
    pub name: String,

    /// Selling price (or cost price on purchase documents) in cents.
    pub unit_price_cents: i64,

    /// Maximum retail price in cents, when the catalog carries one.
    pub mrp_cents: Option<i64>,

    /// Units currently available in stock.
    pub available_quantity: i64,

    /// Unit of measure label ("pcs", "box", "kg").
    pub unit_of_measure: String,

    /// Whether the product is active (soft delete).
    pub is_active: bool,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry on a document with its own quantity, price and discount.
///
/// Uses the snapshot pattern: sku, name and unit price are frozen at the
/// moment the line is added, so later catalog edits never rewrite history.
/// Monetary figures (`discount_amount`, `total`) are always derived from the
/// inputs, never stored independently of them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product ID (UUID).
    pub product_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub product_name: String,

    /// Units sold/purchased. Contributes to revenue and stock.
    pub quantity: i64,

    /// Units delivered at no charge. Consumes stock, not revenue.
    pub free_quantity: i64,

    /// Price per unit in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Line-level discount in basis points (0-10000).
    pub discount_bps: u32,
}

impl LineItem {
    /// Creates a line item from a catalog product, freezing its details.
    pub fn from_product(
        product: &Product,
        quantity: i64,
        free_quantity: i64,
        discount: DiscountRate,
    ) -> Self {
        LineItem {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            product_name: product.name.clone(),
            quantity,
            free_quantity,
            unit_price_cents: product.unit_price_cents,
            discount_bps: discount.bps(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line discount as a rate.
    #[inline]
    pub fn discount(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    /// Prices this line (gross, discount amount, total).
    pub fn priced(&self) -> LinePrice {
        price_line(self.unit_price(), self.quantity, self.discount())
    }

    /// The discount amount in money terms.
    #[inline]
    pub fn discount_amount(&self) -> Money {
        self.priced().discount_amount
    }

    /// Line total after the line-level discount.
    #[inline]
    pub fn total(&self) -> Money {
        self.priced().total
    }

    /// Units of stock this line consumes. Free units count.
    #[inline]
    pub fn stock_consumption(&self) -> i64 {
        self.quantity + self.free_quantity
    }
}

// =============================================================================
// Document
// =============================================================================

/// The kind of business document being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Outbound sale to a customer.
    SalesInvoice,
    /// Inbound purchase from a supplier.
    PurchaseOrder,
    /// Goods coming back against an earlier sale.
    StockReturn,
}

/// A sales invoice or purchase order (structurally identical core).
///
/// Line order is display-only; no total depends on sequence.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Document {
    pub id: String,
    pub kind: DocumentKind,
    /// Customer on sales documents, supplier on purchase documents.
    pub party_id: String,
    /// Sales rep / buyer responsible for the document.
    pub sales_rep_id: Option<String>,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: DocumentStatus,
    pub items: Vec<LineItem>,
    /// Document-level extra discount in basis points, applied after
    /// line-level discounts.
    pub extra_discount_bps: u32,
    /// Persisted grand total in cents. Derived on every mutation; stored so
    /// legacy consumers that never load the breakdown can display it.
    pub grand_total_cents: i64,
}

impl Document {
    /// Returns the extra discount as a rate.
    #[inline]
    pub fn extra_discount(&self) -> DiscountRate {
        DiscountRate::from_bps(self.extra_discount_bps)
    }

    /// Finds a line by product id.
    pub fn line(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|l| l.product_id == product_id)
    }
}

// =============================================================================
// Return Record
// =============================================================================

/// A return of goods against a previously issued document.
///
/// Created independently of document edits; never mutated; only accumulated
/// into a refund total and subtracted from the originating document's grand
/// total on redisplay.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnRecord {
    pub id: String,
    pub document_id: String,
    pub product_id: String,
    /// Units returned.
    pub quantity: i64,
    /// Selling price per unit in cents at return time (frozen).
    pub selling_price_cents: i64,
    #[ts(as = "String")]
    pub returned_at: DateTime<Utc>,
}

impl ReturnRecord {
    /// Refund value of this record: quantity × price at return time.
    #[inline]
    pub fn refund_value(&self) -> Money {
        Money::from_cents(self.selling_price_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Actor Context
// =============================================================================

/// Who is performing an operation, passed explicitly into every call.
///
/// Replaces ambient current-user lookup: the caller resolves its session
/// state and hands this context in, so the core stays pure and testable.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActorContext {
    /// Acting user id.
    pub actor_id: String,

    /// True when the caller arrived through an explicitly privileged path
    /// (reconciliation/adjustment workflow). This flag, not the document
    /// status alone, gates writes to locked documents.
    pub privileged_reentry: bool,
}

impl ActorContext {
    /// An ordinary, unprivileged actor.
    pub fn ordinary(actor_id: impl Into<String>) -> Self {
        ActorContext {
            actor_id: actor_id.into(),
            privileged_reentry: false,
        }
    }

    /// An actor arriving through the privileged re-entry path.
    pub fn privileged(actor_id: impl Into<String>) -> Self {
        ActorContext {
            actor_id: actor_id.into(),
            privileged_reentry: true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product() -> Product {
        Product {
            id: "p-1".to_string(),
            sku: "SKU-1".to_string(),
            name: "Widget".to_string(),
            unit_price_cents: 1000,
            mrp_cents: Some(1200),
            available_quantity: 50,
            unit_of_measure: "pcs".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_line_item_snapshots_product() {
        let product = test_product();
        let line = LineItem::from_product(&product, 3, 1, DiscountRate::from_bps(1000));

        assert_eq!(line.sku, "SKU-1");
        assert_eq!(line.unit_price_cents, 1000);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.free_quantity, 1);
    }

    #[test]
    fn test_line_item_derived_figures() {
        let product = test_product();
        let line = LineItem::from_product(&product, 3, 1, DiscountRate::from_bps(1000));

        // 1000 × 3 = 3000 gross, 10% = 300 discount, 2700 total
        assert_eq!(line.discount_amount().cents(), 300);
        assert_eq!(line.total().cents(), 2700);
        // Free quantity consumes stock but not revenue
        assert_eq!(line.stock_consumption(), 4);
    }

    #[test]
    fn test_return_record_refund_value() {
        let ret = ReturnRecord {
            id: "r-1".to_string(),
            document_id: "d-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 2,
            selling_price_cents: 500,
            returned_at: Utc::now(),
        };
        assert_eq!(ret.refund_value().cents(), 1000);
    }

    #[test]
    fn test_actor_context_constructors() {
        assert!(!ActorContext::ordinary("u-1").privileged_reentry);
        assert!(ActorContext::privileged("u-1").privileged_reentry);
    }
}
