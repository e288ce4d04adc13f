//! # Parse-and-Validate Boundary
//!
//! Converts the loose wire DTOs into well-formed core types before anything
//! enters the pricing core. This is the only place duck-shaped backend data
//! is tolerated; past this point every quantity is bounded, every
//! percentage is a clamped [`DiscountRate`] and every status is a
//! [`DocumentStatus`] variant.
//!
//! Documents persisted without a discount breakdown get their extra
//! discount recovered by inverse arithmetic on load; the result is flagged
//! derived so any UI that surfaces it can label it as a best-effort
//! reconstruction, not an authoritative value.

use chrono::{DateTime, NaiveDate, Utc};

use meridian_core::money::DiscountRate;
use meridian_core::totals::{infer_extra_discount, InferredRate};
use meridian_core::validation::validate_discount_percent;
use meridian_core::{
    Document, DocumentKind, DocumentStatus, LineItem, Money, Product, ReturnRecord,
};

use crate::dto::{DocumentDto, LineItemDto, ProductDto, ReturnDto};
use crate::error::{SessionError, SessionResult};

// =============================================================================
// Status
// =============================================================================

/// Maps a free-form backend status label onto the lifecycle enum.
///
/// Case-insensitive; spaces, underscores and hyphens are ignored, so
/// "In Transit", "in_transit" and "IN-TRANSIT" all parse. "Draft" is an
/// older label for the initial state and maps to Pending.
pub fn parse_status(label: &str) -> SessionResult<DocumentStatus> {
    let normalized: String = label
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_lowercase();

    let status = match normalized.as_str() {
        "draft" | "pending" => DocumentStatus::Pending,
        "processing" => DocumentStatus::Processing,
        "checking" => DocumentStatus::Checking,
        "loading" => DocumentStatus::Loading,
        "intransit" => DocumentStatus::InTransit,
        "delivered" => DocumentStatus::Delivered,
        "complete" | "completed" => DocumentStatus::Completed,
        "canceled" | "cancelled" => DocumentStatus::Cancelled,
        _ => {
            return Err(SessionError::malformed(
                "status",
                format!("unknown status label '{label}'"),
            ))
        }
    };
    Ok(status)
}

/// The wire label for a status, as the save payload carries it.
pub fn status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Pending => "pending",
        DocumentStatus::Processing => "processing",
        DocumentStatus::Checking => "checking",
        DocumentStatus::Loading => "loading",
        DocumentStatus::InTransit => "in_transit",
        DocumentStatus::Delivered => "delivered",
        DocumentStatus::Completed => "completed",
        DocumentStatus::Cancelled => "cancelled",
    }
}

/// The wire label for a document kind.
pub fn kind_label(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::SalesInvoice => "sales_invoice",
        DocumentKind::PurchaseOrder => "purchase_order",
        DocumentKind::StockReturn => "stock_return",
    }
}

fn parse_kind(label: Option<&str>) -> SessionResult<DocumentKind> {
    match label {
        // Legacy endpoints omit the kind; they only ever served invoices.
        None => Ok(DocumentKind::SalesInvoice),
        Some("sales_invoice") | Some("invoice") => Ok(DocumentKind::SalesInvoice),
        Some("purchase_order") | Some("purchase") => Ok(DocumentKind::PurchaseOrder),
        Some("stock_return") | Some("return") => Ok(DocumentKind::StockReturn),
        Some(other) => Err(SessionError::malformed(
            "kind",
            format!("unknown document kind '{other}'"),
        )),
    }
}

// =============================================================================
// Line Items
// =============================================================================

fn parse_line(dto: &LineItemDto) -> SessionResult<LineItem> {
    if dto.product_id.trim().is_empty() {
        return Err(SessionError::malformed("line item", "missing productId"));
    }
    if dto.quantity < 0 {
        return Err(SessionError::malformed(
            "line item",
            format!("negative quantity {} for product {}", dto.quantity, dto.product_id),
        ));
    }
    if dto.free_quantity.unwrap_or(0) < 0 {
        return Err(SessionError::malformed(
            "line item",
            format!("negative free quantity for product {}", dto.product_id),
        ));
    }
    if dto.unit_price_cents < 0 {
        return Err(SessionError::malformed(
            "line item",
            format!("negative unit price for product {}", dto.product_id),
        ));
    }

    let discount = match dto.discount_percent {
        Some(pct) => validate_discount_percent(pct)
            .map_err(|e| SessionError::malformed("line item", e.to_string()))?,
        None => DiscountRate::zero(),
    };

    Ok(LineItem {
        product_id: dto.product_id.clone(),
        sku: dto.sku.clone().unwrap_or_default(),
        product_name: dto.product_name.clone().unwrap_or_default(),
        quantity: dto.quantity,
        free_quantity: dto.free_quantity.unwrap_or(0),
        unit_price_cents: dto.unit_price_cents,
        discount_bps: discount.bps(),
    })
}

// =============================================================================
// Document
// =============================================================================

/// A loaded document plus its provenance details.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: Document,
    /// Present when the extra discount was recovered by inverse arithmetic
    /// rather than loaded from a persisted breakdown.
    pub inferred_extra_discount: Option<InferredRate>,
}

/// Validates a document DTO into the core shape.
///
/// `refund_total` feeds the extra-discount inference for legacy documents
/// that persisted only a grand total.
pub fn parse_document(dto: &DocumentDto, refund_total: Money) -> SessionResult<ParsedDocument> {
    if dto.customer_id.trim().is_empty() {
        return Err(SessionError::malformed("document", "missing customerId"));
    }

    let date = NaiveDate::parse_from_str(&dto.date, "%Y-%m-%d").map_err(|e| {
        SessionError::malformed("date", format!("'{}' is not an ISO date: {e}", dto.date))
    })?;
    let status = parse_status(&dto.status)?;
    let kind = parse_kind(dto.kind.as_deref())?;

    let items: Vec<LineItem> = dto
        .items
        .iter()
        .map(parse_line)
        .collect::<SessionResult<_>>()?;

    let (extra_discount, inferred) = match dto.extra_discount_percent {
        Some(pct) => {
            let rate = validate_discount_percent(pct)
                .map_err(|e| SessionError::malformed("extra discount", e.to_string()))?;
            (rate, None)
        }
        None => {
            let inferred = infer_extra_discount(
                &items,
                refund_total,
                Money::from_cents(dto.grand_total_cents),
            );
            (inferred.rate, Some(inferred))
        }
    };

    Ok(ParsedDocument {
        document: Document {
            id: dto.id.clone(),
            kind,
            party_id: dto.customer_id.clone(),
            sales_rep_id: dto.sales_rep_id.clone(),
            date,
            status,
            items,
            extra_discount_bps: extra_discount.bps(),
            grand_total_cents: dto.grand_total_cents,
        },
        inferred_extra_discount: inferred,
    })
}

// =============================================================================
// Product / Return
// =============================================================================

/// Validates a catalog product DTO into the core shape.
pub fn parse_product(dto: &ProductDto) -> SessionResult<Product> {
    if dto.unit_price_cents < 0 {
        return Err(SessionError::malformed(
            "product",
            format!("negative unit price for {}", dto.sku),
        ));
    }

    Ok(Product {
        id: dto.id.clone(),
        sku: dto.sku.clone(),
        name: dto.name.clone(),
        unit_price_cents: dto.unit_price_cents,
        mrp_cents: dto.mrp_cents,
        available_quantity: dto.available_quantity.unwrap_or(0),
        unit_of_measure: dto
            .unit_of_measure
            .clone()
            .unwrap_or_else(|| "pcs".to_string()),
        is_active: dto.is_active.unwrap_or(true),
    })
}

/// Validates a return DTO into the core shape.
pub fn parse_return(dto: &ReturnDto) -> SessionResult<ReturnRecord> {
    if dto.quantity < 0 {
        return Err(SessionError::malformed("return", "negative quantity"));
    }
    if dto.selling_price_cents < 0 {
        return Err(SessionError::malformed("return", "negative selling price"));
    }

    let returned_at = match &dto.returned_at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| SessionError::malformed("return", format!("bad timestamp: {e}")))?
            .with_timezone(&Utc),
        // Legacy rows without a timestamp sort as just-loaded.
        None => Utc::now(),
    };

    Ok(ReturnRecord {
        id: dto.id.clone().unwrap_or_default(),
        document_id: dto.document_id.clone(),
        product_id: dto.product_id.clone(),
        quantity: dto.quantity,
        selling_price_cents: dto.selling_price_cents,
        returned_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::LineItemDto;

    fn line_dto(quantity: i64, unit_price_cents: i64, discount_percent: Option<f64>) -> LineItemDto {
        LineItemDto {
            product_id: "p-1".to_string(),
            sku: Some("SKU-1".to_string()),
            product_name: Some("Widget".to_string()),
            quantity,
            free_quantity: None,
            unit_price_cents,
            discount_percent,
        }
    }

    fn doc_dto(status: &str, extra: Option<f64>, grand: i64) -> DocumentDto {
        DocumentDto {
            id: "d-1".to_string(),
            kind: None,
            customer_id: "c-9".to_string(),
            sales_rep_id: None,
            date: "2026-08-01".to_string(),
            status: status.to_string(),
            items: vec![line_dto(3, 1000, Some(10.0)), line_dto(1, 1500, None)],
            grand_total_cents: grand,
            extra_discount_percent: extra,
        }
    }

    #[test]
    fn test_parse_status_variants() {
        assert_eq!(parse_status("Pending").unwrap(), DocumentStatus::Pending);
        assert_eq!(parse_status("draft").unwrap(), DocumentStatus::Pending);
        assert_eq!(parse_status("In Transit").unwrap(), DocumentStatus::InTransit);
        assert_eq!(parse_status("in_transit").unwrap(), DocumentStatus::InTransit);
        assert_eq!(parse_status("IN-TRANSIT").unwrap(), DocumentStatus::InTransit);
        assert_eq!(parse_status("Canceled").unwrap(), DocumentStatus::Cancelled);
        assert!(parse_status("shipped?").is_err());
    }

    #[test]
    fn test_status_label_round_trip() {
        for status in DocumentStatus::ALL {
            assert_eq!(parse_status(status_label(status)).unwrap(), status);
        }
    }

    #[test]
    fn test_parse_document_with_explicit_breakdown() {
        let parsed = parse_document(&doc_dto("pending", Some(5.0), 3990), Money::zero()).unwrap();

        assert_eq!(parsed.document.extra_discount_bps, 500);
        assert!(parsed.inferred_extra_discount.is_none());
        assert_eq!(parsed.document.items.len(), 2);
        assert_eq!(parsed.document.items[0].discount_bps, 1000);
    }

    #[test]
    fn test_parse_document_infers_missing_breakdown() {
        // subtotal 2700 + 1500 = 4200, stored grand 3990 → inferred 5%
        let parsed = parse_document(&doc_dto("pending", None, 3990), Money::zero()).unwrap();

        assert_eq!(parsed.document.extra_discount_bps, 500);
        let inferred = parsed.inferred_extra_discount.unwrap();
        assert!(inferred.derived);
        assert_eq!(inferred.rate.bps(), 500);
    }

    #[test]
    fn test_parse_document_inference_uses_refunds() {
        // stored grand 3490 with 500 refunded → still 5%
        let parsed =
            parse_document(&doc_dto("pending", None, 3490), Money::from_cents(500)).unwrap();
        assert_eq!(parsed.document.extra_discount_bps, 500);
    }

    #[test]
    fn test_parse_document_rejects_bad_shapes() {
        let mut dto = doc_dto("pending", Some(5.0), 3990);
        dto.date = "01/08/2026".to_string();
        assert!(parse_document(&dto, Money::zero()).is_err());

        let mut dto = doc_dto("pending", Some(5.0), 3990);
        dto.items[0].quantity = -1;
        assert!(parse_document(&dto, Money::zero()).is_err());

        let mut dto = doc_dto("pending", Some(5.0), 3990);
        dto.customer_id = " ".to_string();
        assert!(parse_document(&dto, Money::zero()).is_err());
    }

    #[test]
    fn test_parse_document_clamps_discounts() {
        let mut dto = doc_dto("pending", Some(250.0), 0);
        dto.items[0].discount_percent = Some(-10.0);
        let parsed = parse_document(&dto, Money::zero()).unwrap();

        assert_eq!(parsed.document.extra_discount_bps, 10_000);
        assert_eq!(parsed.document.items[0].discount_bps, 0);
    }

    #[test]
    fn test_parse_product_defaults() {
        let dto = ProductDto {
            id: "p-1".to_string(),
            sku: "SKU-1".to_string(),
            name: "Widget".to_string(),
            unit_price_cents: 1000,
            mrp_cents: None,
            available_quantity: None,
            unit_of_measure: None,
            is_active: None,
        };
        let product = parse_product(&dto).unwrap();
        assert_eq!(product.available_quantity, 0);
        assert_eq!(product.unit_of_measure, "pcs");
        assert!(product.is_active);
    }

    #[test]
    fn test_parse_return() {
        let dto = ReturnDto {
            id: Some("r-1".to_string()),
            document_id: "d-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 2,
            selling_price_cents: 500,
            returned_at: Some("2026-08-01T10:00:00Z".to_string()),
        };
        let record = parse_return(&dto).unwrap();
        assert_eq!(record.refund_value().cents(), 1000);
    }
}
