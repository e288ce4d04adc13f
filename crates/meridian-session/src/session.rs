//! # Edit Session
//!
//! One in-memory editing session per open document. Every user action runs
//! synchronously through the core components and recomputes the summary
//! figures; the backing store is touched only on load and on explicit save.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Edit Session Operations                              │
//! │                                                                         │
//! │  User Action              Session Call            Core Components       │
//! │  ───────────              ────────────            ───────────────       │
//! │                                                                         │
//! │  Pick product ──────────► add_line() ───────────► validate, stock gate, │
//! │                                                   snapshot, aggregate   │
//! │  Change qty/discount ───► update_line() ────────► stock gate (inflated  │
//! │                                                   by the old line),     │
//! │                                                   aggregate             │
//! │  Remove row ────────────► remove_line() ────────► aggregate             │
//! │  Extra discount ────────► set_extra_discount() ─► aggregate             │
//! │  Save button ───────────► save() ───────────────► lock gate, one atomic │
//! │                                                   store call, audit     │
//! │                                                                         │
//! │  Navigating away discards the in-memory copy; nothing is persisted.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-threaded and UI-event-driven by design: there is no shared state
//! across sessions, and saves for one session never overlap (the UI
//! disables the action while one is in flight; the `save_in_flight` flag
//! backs that affordance).

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use meridian_core::money::DiscountRate;
use meridian_core::stock::{check_availability, effective_available, StockSnapshot};
use meridian_core::totals::{aggregate, refund_total, DocumentTotals};
use meridian_core::validation::{
    validate_free_quantity, validate_header, validate_line_count, validate_product_selected,
    validate_quantity,
};
use meridian_core::{
    ActorContext, AuditEntry, AuditTrail, CoreError, Document, DocumentKind, DocumentStatus,
    EditPermission, LineItem, Money, Product, ReturnRecord, MAX_DOCUMENT_LINES,
};

use crate::dto::{CatalogScope, RecordReturnRequest, SaveDocumentRequest, SaveOutcome};
use crate::error::{SessionError, SessionResult};
use crate::parse::{kind_label, parse_document, parse_product, parse_return, status_label};
use crate::store::{BatchOutcome, DocumentStore};

/// An in-memory document editing session.
#[derive(Debug)]
pub struct EditSession {
    document: Document,
    stock: StockSnapshot,
    refunds: Money,
    ctx: ActorContext,
    /// The document's persisted status before the current edit, refreshed
    /// after each successful save; drives the audit obligation.
    entry_status: DocumentStatus,
    /// Grand total as last persisted, recorded as `previous_total` on audit.
    last_persisted_total: Money,
    save_in_flight: bool,
    trail: AuditTrail,
}

impl EditSession {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Opens a session on a brand-new document.
    pub fn open_new(kind: DocumentKind, party_id: impl Into<String>, ctx: ActorContext) -> Self {
        let document = Document {
            id: Uuid::new_v4().to_string(),
            kind,
            party_id: party_id.into(),
            sales_rep_id: None,
            date: Utc::now().date_naive(),
            status: DocumentStatus::Pending,
            items: Vec::new(),
            extra_discount_bps: 0,
            grand_total_cents: 0,
        };

        debug!(document_id = %document.id, ?kind, "Opening new document session");

        EditSession {
            document,
            stock: StockSnapshot::new(),
            refunds: Money::zero(),
            ctx,
            entry_status: DocumentStatus::Pending,
            last_persisted_total: Money::zero(),
            save_in_flight: false,
            trail: AuditTrail::new(),
        }
    }

    /// Opens a session on an already-persisted document.
    ///
    /// Fails fast with `EditLocked` when the document is in a locked status
    /// and the caller is not on the privileged re-entry path; no store call
    /// happens past this point for such callers.
    pub fn open_existing(
        document: Document,
        returns: &[ReturnRecord],
        ctx: ActorContext,
    ) -> SessionResult<Self> {
        if let EditPermission::Denied { status } = EditPermission::evaluate(document.status, &ctx) {
            debug!(document_id = %document.id, %status, "Edit denied at open");
            return Err(CoreError::EditLocked {
                document_id: document.id,
                status,
            }
            .into());
        }

        let refunds = refund_total(returns);
        debug!(
            document_id = %document.id,
            status = %document.status,
            refund_total = %refunds,
            "Opening existing document session"
        );

        let entry_status = document.status;
        let last_persisted_total = Money::from_cents(document.grand_total_cents);
        Ok(EditSession {
            document,
            stock: StockSnapshot::new(),
            refunds,
            ctx,
            entry_status,
            last_persisted_total,
            save_in_flight: false,
            trail: AuditTrail::new(),
        })
    }

    /// Loads a document, its returns and the catalog from the store and
    /// opens a session on it.
    pub async fn load<S: DocumentStore>(
        store: &S,
        document_id: &str,
        scope: &CatalogScope,
        ctx: ActorContext,
    ) -> SessionResult<Self> {
        let dto = store.load_document(document_id).await?;
        let returns: Vec<ReturnRecord> = store
            .load_returns(document_id)
            .await?
            .iter()
            .map(parse_return)
            .collect::<SessionResult<_>>()?;

        let parsed = parse_document(&dto, refund_total(&returns))?;
        if let Some(inferred) = parsed.inferred_extra_discount {
            debug!(
                document_id = %document_id,
                bps = inferred.rate.bps(),
                "Extra discount recovered from stored grand total (derived value)"
            );
        }

        let mut stock = StockSnapshot::new();
        for product_dto in store.load_catalog(scope).await? {
            let product = parse_product(&product_dto)?;
            stock.insert(product.id, product.available_quantity);
        }

        let mut session = Self::open_existing(parsed.document, &returns, ctx)?;
        session.stock = stock;
        Ok(session)
    }

    /// Replaces the stock snapshot (used when the catalog is loaded
    /// separately from the document).
    pub fn set_stock(&mut self, stock: StockSnapshot) {
        self.stock = stock;
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// The document as currently edited.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current summary figures, recomputed in full.
    pub fn totals(&self) -> DocumentTotals {
        aggregate(
            &self.document.items,
            self.document.extra_discount(),
            self.refunds,
        )
    }

    /// Refund total accumulated against this document.
    pub fn refund_total(&self) -> Money {
        self.refunds
    }

    /// Audit entries recorded by this session.
    pub fn audit_trail(&self) -> &AuditTrail {
        &self.trail
    }

    /// True while a save is on the wire; the UI disables the save action.
    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    // =========================================================================
    // Line Operations
    // =========================================================================

    /// Adds a product line, or merges into an existing line for the same
    /// product (quantities accumulate, the latest discount wins).
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: i64,
        free_quantity: i64,
        discount: DiscountRate,
    ) -> SessionResult<DocumentTotals> {
        self.ensure_editable()?;
        validate_product_selected(&product.id).map_err(CoreError::from)?;
        validate_quantity(quantity).map_err(CoreError::from)?;
        validate_free_quantity(free_quantity).map_err(CoreError::from)?;
        if !product.is_active {
            return Err(CoreError::ProductNotFound(product.sku.clone()).into());
        }

        let available = self
            .stock
            .get(&product.id)
            .copied()
            .unwrap_or(product.available_quantity);

        if let Some(pos) = self
            .document
            .items
            .iter()
            .position(|l| l.product_id == product.id)
        {
            let existing = &self.document.items[pos];
            let merged_qty = existing.quantity + quantity;
            let merged_free = existing.free_quantity + free_quantity;
            validate_quantity(merged_qty).map_err(CoreError::from)?;
            validate_free_quantity(merged_free).map_err(CoreError::from)?;

            // The existing line's committed units are still available to it.
            let effective = effective_available(available, Some(existing));
            check_availability(&product.sku, merged_qty, merged_free, effective)?;

            let line = &mut self.document.items[pos];
            line.quantity = merged_qty;
            line.free_quantity = merged_free;
            line.discount_bps = discount.bps();
        } else {
            validate_line_count(self.document.items.len()).map_err(|_| {
                CoreError::TooManyLines {
                    max: MAX_DOCUMENT_LINES,
                }
            })?;
            check_availability(&product.sku, quantity, free_quantity, available)?;
            self.document
                .items
                .push(LineItem::from_product(product, quantity, free_quantity, discount));
        }

        debug!(
            document_id = %self.document.id,
            sku = %product.sku,
            quantity,
            free_quantity,
            "Line added"
        );
        Ok(self.recompute())
    }

    /// Replaces an existing line's quantity, free quantity and discount.
    ///
    /// Available stock is inflated by the old line's committed units, so
    /// keeping or reducing the quantity never spuriously fails.
    pub fn update_line(
        &mut self,
        product_id: &str,
        quantity: i64,
        free_quantity: i64,
        discount: DiscountRate,
    ) -> SessionResult<DocumentTotals> {
        self.ensure_editable()?;
        validate_quantity(quantity).map_err(CoreError::from)?;
        validate_free_quantity(free_quantity).map_err(CoreError::from)?;

        let pos = self
            .document
            .items
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        let original = &self.document.items[pos];
        let available = self.stock.get(product_id).copied().unwrap_or(0);
        let effective = effective_available(available, Some(original));
        check_availability(&original.sku, quantity, free_quantity, effective)?;

        let line = &mut self.document.items[pos];
        line.quantity = quantity;
        line.free_quantity = free_quantity;
        line.discount_bps = discount.bps();

        debug!(
            document_id = %self.document.id,
            product_id,
            quantity,
            free_quantity,
            "Line updated"
        );
        Ok(self.recompute())
    }

    /// Removes a line by product id.
    pub fn remove_line(&mut self, product_id: &str) -> SessionResult<DocumentTotals> {
        self.ensure_editable()?;

        let before = self.document.items.len();
        self.document.items.retain(|l| l.product_id != product_id);
        if self.document.items.len() == before {
            return Err(CoreError::LineNotFound(product_id.to_string()).into());
        }

        debug!(document_id = %self.document.id, product_id, "Line removed");
        Ok(self.recompute())
    }

    // =========================================================================
    // Header Operations
    // =========================================================================

    /// Sets the document-level extra discount.
    pub fn set_extra_discount(&mut self, rate: DiscountRate) -> SessionResult<DocumentTotals> {
        self.ensure_editable()?;
        self.document.extra_discount_bps = rate.bps();
        Ok(self.recompute())
    }

    /// Updates header fields.
    pub fn set_header(
        &mut self,
        party_id: impl Into<String>,
        sales_rep_id: Option<String>,
        date: NaiveDate,
    ) -> SessionResult<()> {
        self.ensure_editable()?;
        let party_id = party_id.into();
        validate_header(&party_id).map_err(CoreError::from)?;

        self.document.party_id = party_id;
        self.document.sales_rep_id = sales_rep_id;
        self.document.date = date;
        Ok(())
    }

    /// Moves the document to a new lifecycle status.
    ///
    /// Only explicit status-change operations travel the transition table;
    /// generic field edits never change status.
    pub fn change_status(&mut self, to: DocumentStatus) -> SessionResult<()> {
        let from = self.document.status;
        if !from.can_transition(to) {
            return Err(CoreError::InvalidTransition { from, to }.into());
        }

        info!(document_id = %self.document.id, %from, %to, "Status changed");
        self.document.status = to;
        Ok(())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Saves the full document atomically through the store.
    ///
    /// On success, appends an audit entry when the document's persisted
    /// status before this edit was non-pending (it already had business
    /// consequences), then refreshes that baseline so later saves in the
    /// same session audit correctly. On failure, the in-memory document is
    /// unchanged and the operator can retry without re-entering data.
    pub async fn save<S: DocumentStore>(
        &mut self,
        store: &S,
        reason: Option<&str>,
    ) -> SessionResult<SaveOutcome> {
        if self.save_in_flight {
            return Err(SessionError::SaveInFlight);
        }
        // Fail fast on the lock before anything reaches the wire.
        self.ensure_editable()?;
        validate_header(&self.document.party_id).map_err(CoreError::from)?;

        let totals = self.recompute();
        let request = SaveDocumentRequest {
            document_id: self.document.id.clone(),
            kind: kind_label(self.document.kind).to_string(),
            customer_id: self.document.party_id.clone(),
            sales_rep_id: self.document.sales_rep_id.clone(),
            date: self.document.date.format("%Y-%m-%d").to_string(),
            status: status_label(self.document.status).to_string(),
            items: self.document.items.clone(),
            extra_discount_bps: self.document.extra_discount_bps,
            grand_total_cents: totals.grand_total.cents(),
            change_reason: reason.map(str::to_string),
            actor_id: self.ctx.actor_id.clone(),
        };

        self.save_in_flight = true;
        let result = store.save_document(&request).await;
        self.save_in_flight = false;

        let outcome = result?;

        if self.entry_status != DocumentStatus::Pending {
            let entry = AuditEntry::record(
                &self.document.id,
                &self.ctx,
                reason,
                self.last_persisted_total,
            );
            debug!(
                document_id = %self.document.id,
                reason = %entry.reason,
                previous_total = %entry.previous_total(),
                "Audit entry recorded"
            );
            self.trail.append(entry);
        }
        // The document is now persisted as-is; the next edit in this
        // session mutates what this save established.
        self.entry_status = self.document.status;
        self.last_persisted_total = totals.grand_total;

        info!(
            document_id = %self.document.id,
            grand_total = %totals.grand_total,
            lines = self.document.items.len(),
            "Document saved"
        );
        Ok(outcome)
    }

    /// Submits a batch of returns, one store call per record.
    ///
    /// Returns the complete [`BatchOutcome`] when everything succeeded, or
    /// `PartialBatch` carrying the success count and the failed indices
    /// with their messages. The batch is deliberately not atomic.
    pub async fn submit_returns<S: DocumentStore>(
        &self,
        store: &S,
        returns: &[RecordReturnRequest],
    ) -> SessionResult<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for (index, request) in returns.iter().enumerate() {
            match store.record_return(request).await {
                Ok(()) => outcome.succeeded += 1,
                Err(err) => {
                    warn!(
                        document_id = %request.document_id,
                        product_id = %request.product_id,
                        index,
                        message = err.message(),
                        "Return submission failed"
                    );
                    outcome.failed.push((index, err.message().to_string()));
                }
            }
        }

        if outcome.is_complete() {
            Ok(outcome)
        } else {
            Err(SessionError::PartialBatch {
                succeeded: outcome.succeeded,
                failed: outcome.failed,
            })
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_editable(&self) -> SessionResult<()> {
        match EditPermission::evaluate(self.document.status, &self.ctx) {
            EditPermission::Granted => Ok(()),
            EditPermission::Denied { status } => Err(CoreError::EditLocked {
                document_id: self.document.id.clone(),
                status,
            }
            .into()),
        }
    }

    /// Recomputes totals in full and mirrors the grand total onto the
    /// document. Negative grand totals are surfaced, never clamped.
    fn recompute(&mut self) -> DocumentTotals {
        let totals = self.totals();
        self.document.grand_total_cents = totals.grand_total.cents();
        if totals.is_negative() {
            warn!(
                document_id = %self.document.id,
                grand_total = %totals.grand_total,
                "Grand total is negative (over-discount or over-refund)"
            );
        }
        totals
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
