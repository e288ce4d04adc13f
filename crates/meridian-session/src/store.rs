//! # Document Store Contract
//!
//! The async boundary between this core and the backing store. The actual
//! transport (HTTP, IPC, whatever the host product uses) lives outside this
//! repository; consumers implement this trait and hand it to the session.
//!
//! ## Contract Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  • save_document carries the FULL payload - no partial writes, so a    │
//! │    failure mid-flight leaves the persisted document unchanged          │
//! │  • record_return is one call per return; the session reports batch     │
//! │    outcomes per item, never a single pass/fail flag                    │
//! │  • errors carry the backend's message when available so the operator   │
//! │    sees the real reason, with a generic fallback otherwise             │
//! │  • no retries, no backoff here - surfacing, not healing               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::dto::{
    AuditEntryDto, CatalogScope, DocumentDto, ProductDto, RecordReturnRequest, ReturnDto,
    SaveDocumentRequest, SaveOutcome,
};
use crate::error::StoreError;

/// Result type for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// The persistence/catalog collaborator the session talks to.
///
/// Static dispatch only: sessions are generic over the store, the way the
/// host wires one concrete transport per process.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Loads a document by id.
    async fn load_document(&self, document_id: &str) -> StoreResult<DocumentDto>;

    /// Loads the stock/catalog list, optionally scoped.
    async fn load_catalog(&self, scope: &CatalogScope) -> StoreResult<Vec<ProductDto>>;

    /// Loads all returns recorded against a document.
    async fn load_returns(&self, document_id: &str) -> StoreResult<Vec<ReturnDto>>;

    /// Loads the audit history for a document, ordered by creation time.
    async fn load_audit_history(&self, document_id: &str) -> StoreResult<Vec<AuditEntryDto>>;

    /// Persists a document (create or update) as one atomic payload.
    async fn save_document(&self, request: &SaveDocumentRequest) -> StoreResult<SaveOutcome>;

    /// Records one return against a document.
    async fn record_return(&self, request: &RecordReturnRequest) -> StoreResult<()>;
}

/// Outcome of a bulk return submission.
///
/// Carries per-item results so the caller can tell the operator how many
/// went through and which did not.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// How many submissions succeeded.
    pub succeeded: usize,
    /// (index into the submitted batch, failure message) per failure.
    pub failed: Vec<(usize, String)>,
}

impl BatchOutcome {
    /// True when every submission went through.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
