//! # In-Memory Store Double
//!
//! A [`DocumentStore`] backed by maps, for tests and host-app prototyping.
//! Supports scripted failures so persistence and partial-batch error paths
//! can be exercised without a real backend.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::dto::{
    AuditEntryDto, CatalogScope, DocumentDto, ProductDto, RecordReturnRequest, ReturnDto,
    SaveDocumentRequest, SaveOutcome,
};
use crate::error::StoreError;
use crate::store::{DocumentStore, StoreResult};

#[derive(Default)]
struct State {
    documents: HashMap<String, DocumentDto>,
    catalog: Vec<ProductDto>,
    returns: Vec<ReturnDto>,
    audit: Vec<AuditEntryDto>,
    saves: Vec<SaveDocumentRequest>,
    fail_next_save: Option<String>,
    failing_return_products: HashSet<String>,
}

/// In-memory [`DocumentStore`] implementation.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Seeds a document.
    pub async fn put_document(&self, dto: DocumentDto) {
        let mut state = self.state.lock().await;
        state.documents.insert(dto.id.clone(), dto);
    }

    /// Seeds the catalog.
    pub async fn put_catalog(&self, products: Vec<ProductDto>) {
        self.state.lock().await.catalog = products;
    }

    /// Seeds a return row.
    pub async fn put_return(&self, dto: ReturnDto) {
        self.state.lock().await.returns.push(dto);
    }

    /// Makes the next save fail with the given backend message.
    pub async fn fail_next_save(&self, message: impl Into<String>) {
        self.state.lock().await.fail_next_save = Some(message.into());
    }

    /// Makes all return submissions for a product fail.
    pub async fn fail_returns_for(&self, product_id: impl Into<String>) {
        self.state
            .lock()
            .await
            .failing_return_products
            .insert(product_id.into());
    }

    /// Every save payload received, in order.
    pub async fn saved_requests(&self) -> Vec<SaveDocumentRequest> {
        self.state.lock().await.saves.clone()
    }

    /// Every return recorded through the contract.
    pub async fn recorded_returns(&self) -> Vec<ReturnDto> {
        self.state.lock().await.returns.clone()
    }
}

impl DocumentStore for InMemoryStore {
    async fn load_document(&self, document_id: &str) -> StoreResult<DocumentDto> {
        self.state
            .lock()
            .await
            .documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| StoreError::backend(format!("document {document_id} not found")))
    }

    async fn load_catalog(&self, _scope: &CatalogScope) -> StoreResult<Vec<ProductDto>> {
        Ok(self.state.lock().await.catalog.clone())
    }

    async fn load_returns(&self, document_id: &str) -> StoreResult<Vec<ReturnDto>> {
        Ok(self
            .state
            .lock()
            .await
            .returns
            .iter()
            .filter(|r| r.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn load_audit_history(&self, document_id: &str) -> StoreResult<Vec<AuditEntryDto>> {
        Ok(self
            .state
            .lock()
            .await
            .audit
            .iter()
            .filter(|e| e.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn save_document(&self, request: &SaveDocumentRequest) -> StoreResult<SaveOutcome> {
        let mut state = self.state.lock().await;

        if let Some(message) = state.fail_next_save.take() {
            return Err(StoreError::backend(message));
        }

        state.saves.push(request.clone());
        state.documents.insert(
            request.document_id.clone(),
            DocumentDto {
                id: request.document_id.clone(),
                kind: Some(request.kind.clone()),
                customer_id: request.customer_id.clone(),
                sales_rep_id: request.sales_rep_id.clone(),
                date: request.date.clone(),
                status: request.status.clone(),
                items: request
                    .items
                    .iter()
                    .map(|l| crate::dto::LineItemDto {
                        product_id: l.product_id.clone(),
                        sku: Some(l.sku.clone()),
                        product_name: Some(l.product_name.clone()),
                        quantity: l.quantity,
                        free_quantity: Some(l.free_quantity),
                        unit_price_cents: l.unit_price_cents,
                        discount_percent: Some(f64::from(l.discount_bps) / 100.0),
                    })
                    .collect(),
                grand_total_cents: request.grand_total_cents,
                extra_discount_percent: Some(f64::from(request.extra_discount_bps) / 100.0),
            },
        );

        Ok(SaveOutcome {
            document_id: request.document_id.clone(),
        })
    }

    async fn record_return(&self, request: &RecordReturnRequest) -> StoreResult<()> {
        let mut state = self.state.lock().await;

        if state.failing_return_products.contains(&request.product_id) {
            return Err(StoreError::backend(format!(
                "return rejected for product {}",
                request.product_id
            )));
        }

        let selling_price_cents = state
            .catalog
            .iter()
            .find(|p| p.id == request.product_id)
            .map(|p| p.unit_price_cents)
            .unwrap_or(0);

        let row = ReturnDto {
            id: Some(uuid::Uuid::new_v4().to_string()),
            document_id: request.document_id.clone(),
            product_id: request.product_id.clone(),
            quantity: request.quantity,
            selling_price_cents,
            returned_at: None,
        };
        state.returns.push(row);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_document_not_found() {
        let store = InMemoryStore::new();
        let err = store.load_document("missing").await.unwrap_err();
        assert_eq!(err.message(), "document missing not found");
    }

    #[tokio::test]
    async fn test_audit_history_filters_by_document() {
        let store = InMemoryStore::new();
        {
            let mut state = store.state.lock().await;
            for doc in ["d-1", "d-2", "d-1"] {
                state.audit.push(AuditEntryDto {
                    id: uuid::Uuid::new_v4().to_string(),
                    document_id: doc.to_string(),
                    changed_at: "2026-08-01T10:00:00Z".to_string(),
                    changed_by: "u-1".to_string(),
                    reason: Some("Updated".to_string()),
                    previous_total_cents: 0,
                });
            }
        }

        let history = store.load_audit_history("d-1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.document_id == "d-1"));
    }
}
