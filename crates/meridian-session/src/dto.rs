//! # Wire DTOs
//!
//! The loose request/response shapes exchanged with the external
//! persistence/session collaborators. Transport-agnostic.
//!
//! These are deliberately permissive: optional fields, free-form status
//! strings, floating-point percentages, exactly as a backend tends to send
//! them. Nothing in the core ever touches these types directly; everything
//! passes through the parse-and-validate step in [`crate::parse`] first.

use serde::{Deserialize, Serialize};

use meridian_core::LineItem;

// =============================================================================
// Load Shapes (collaborator → core)
// =============================================================================

/// A document as the backing store returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub id: String,
    /// "sales_invoice" | "purchase_order" | "stock_return"; absent on some
    /// legacy endpoints, treated as a sales invoice.
    pub kind: Option<String>,
    pub customer_id: String,
    pub sales_rep_id: Option<String>,
    /// ISO date, "YYYY-MM-DD".
    pub date: String,
    /// Free-form status label; mapped case-insensitively onto the lifecycle.
    pub status: String,
    pub items: Vec<LineItemDto>,
    /// Persisted grand total in cents.
    pub grand_total_cents: i64,
    /// Discount breakdown, when this document type persists one. Absent for
    /// legacy documents that stored only the grand total.
    pub extra_discount_percent: Option<f64>,
}

/// A line item as the backing store returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDto {
    pub product_id: String,
    pub sku: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub free_quantity: Option<i64>,
    pub unit_price_cents: i64,
    pub discount_percent: Option<f64>,
}

/// A catalog product as the stock/catalog collaborator returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub mrp_cents: Option<i64>,
    pub available_quantity: Option<i64>,
    pub unit_of_measure: Option<String>,
    pub is_active: Option<bool>,
}

/// A return record as the returns collaborator returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDto {
    pub id: Option<String>,
    pub document_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub selling_price_cents: i64,
    /// RFC 3339 timestamp; absent on some legacy rows.
    pub returned_at: Option<String>,
}

/// An audit history row as the persistence collaborator returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryDto {
    pub id: String,
    pub document_id: String,
    pub changed_at: String,
    pub changed_by: String,
    pub reason: Option<String>,
    pub previous_total_cents: i64,
}

/// Optional scoping for catalog loads (business unit / user visibility is
/// decided by the collaborator, not by this core).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogScope {
    pub business_unit: Option<String>,
    pub user_id: Option<String>,
}

// =============================================================================
// Save Shapes (core → collaborator)
// =============================================================================

/// The full atomic save payload. The session never sends partial writes:
/// one request carries the whole document, so a failure mid-flight leaves
/// the previously persisted document unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocumentRequest {
    pub document_id: String,
    pub kind: String,
    pub customer_id: String,
    pub sales_rep_id: Option<String>,
    pub date: String,
    pub status: String,
    /// Well-formed, already-validated lines.
    pub items: Vec<LineItem>,
    /// The explicit discount breakdown is always persisted going forward;
    /// inference from the grand total only applies to legacy loads.
    pub extra_discount_bps: u32,
    pub grand_total_cents: i64,
    pub change_reason: Option<String>,
    pub actor_id: String,
}

/// Store acknowledgement of a save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub document_id: String,
}

/// One return submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReturnRequest {
    pub document_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub reason_code: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_dto_round_trips_camel_case() {
        let json = r#"{
            "id": "d-1",
            "customerId": "c-9",
            "salesRepId": null,
            "date": "2026-08-01",
            "status": "In Transit",
            "items": [
                {"productId": "p-1", "quantity": 3, "unitPriceCents": 1000, "discountPercent": 10.0}
            ],
            "grandTotalCents": 2700
        }"#;

        let dto: DocumentDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.customer_id, "c-9");
        assert_eq!(dto.items[0].product_id, "p-1");
        assert!(dto.items[0].free_quantity.is_none());
        assert!(dto.extra_discount_percent.is_none());
    }

    #[test]
    fn test_save_request_serializes_camel_case() {
        let req = SaveDocumentRequest {
            document_id: "d-1".to_string(),
            kind: "sales_invoice".to_string(),
            customer_id: "c-9".to_string(),
            sales_rep_id: None,
            date: "2026-08-01".to_string(),
            status: "pending".to_string(),
            items: vec![],
            extra_discount_bps: 500,
            grand_total_cents: 3990,
            change_reason: None,
            actor_id: "u-1".to_string(),
        };

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"documentId\""));
        assert!(json.contains("\"extraDiscountBps\":500"));
    }
}
