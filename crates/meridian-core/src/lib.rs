//! # meridian-core: Pure Business Logic for Meridian Back-Office
//!
//! This crate is the **heart** of the back-office: the one place the
//! line-item pricing and document-total arithmetic lives, instead of being
//! re-implemented by every invoice, purchase and return screen.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Meridian Back-Office Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Product screens (outside this repository)            │   │
//! │  │   Invoice UI ── Purchase UI ── Returns UI ── History UI         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 meridian-session (sibling crate)                │   │
//! │  │     EditSession orchestration + DocumentStore contracts         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ meridian-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌────────┐ ┌────────┐ ┌─────────┐   │   │
//! │  │   │ pricing │ │ totals  │ │ stock  │ │ status │ │  audit  │   │   │
//! │  │   └─────────┘ └─────────┘ └────────┘ └────────┘ └─────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Document, LineItem, ReturnRecord)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Line Pricing Calculator
//! - [`totals`] - Document Totals Aggregator
//! - [`stock`] - Stock Availability Checker
//! - [`status`] - Document lifecycle state machine and edit lock
//! - [`audit`] - Audit trail recorder for finalized-document edits
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Store, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Context**: Actor identity is injected, never read from ambient state
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::money::{DiscountRate, Money};
//! use meridian_core::pricing::price_line;
//!
//! // unit price 10.00, quantity 3, line discount 10%
//! let priced = price_line(Money::from_cents(1000), 3, DiscountRate::from_bps(1000));
//!
//! assert_eq!(priced.discount_amount.cents(), 300);
//! assert_eq!(priced.total.cents(), 2700);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod error;
pub mod money;
pub mod pricing;
pub mod status;
pub mod stock;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::Money` instead of
// `use meridian_core::money::Money`

pub use audit::{AuditEntry, AuditTrail};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{DiscountRate, Money};
pub use pricing::{price_line, LinePrice};
pub use status::{DocumentStatus, EditPermission};
pub use stock::{check_availability, effective_available, StockSnapshot};
pub use totals::{aggregate, infer_extra_discount, refund_total, DocumentTotals, InferredRate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single document
///
/// ## Business Reason
/// Prevents runaway documents and keeps full-recompute totals cheap.
/// Can be made configurable per business unit in future versions.
pub const MAX_DOCUMENT_LINES: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 9999;

/// Reason recorded on a finalized-document edit when the operator
/// supplies none. The entry is written either way.
pub const DEFAULT_AUDIT_REASON: &str = "Updated";
