//! # Engine Request/Response Types
//!
//! Input and output DTOs for the engine's public API. The external HTTP
//! layer deserializes request bodies into these and serializes the
//! results straight back out.
//!
//! All money fields are integer paise and all percentage fields are
//! integer basis points, matching the core types - the frontend converts
//! for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quoteflow_core::status::QuotationStatus;
use quoteflow_core::types::{
    ColorPrice, Customer, Discount, ProductStructure, ProductVariant, Quotation, SetComponent,
    VariantChoice,
};
use quoteflow_db::{QuotationFilter, QuotationSortField, SortOrder};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Quotation Inputs
// =============================================================================

/// One line item as supplied by the caller.
///
/// Only `product_id` and `quantity` are mandatory; snapshot fields
/// (code, name, type) and the unit price are auto-filled from the
/// product when omitted. A caller-supplied `unit_price_paise` overrides
/// the catalog price (e.g. a negotiated or color-specific rate).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemInput {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_paise: Option<i64>,
    pub discount: Option<Discount>,
    pub variant: Option<VariantChoice>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// Input for creating a quotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateQuotationInput {
    pub customer: Customer,
    pub line_items: Vec<LineItemInput>,
    /// Defaults to 30 days after the quotation date.
    pub valid_until: Option<DateTime<Utc>>,
    pub reference_number: Option<String>,
    /// Defaults to 18% GST.
    pub tax_rate_bps: Option<u32>,
    pub overall_discount: Option<Discount>,
    pub currency: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub payment_terms: Option<String>,
    pub delivery_terms: Option<String>,
    pub special_instructions: Option<String>,
    pub internal_notes: Option<String>,
}

/// Partial update of a quotation (draft or sent).
///
/// `None` fields are left untouched. `line_items`, when present,
/// replaces the whole list; every entry is re-resolved against the
/// catalog and every total recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateQuotationInput {
    pub customer: Option<Customer>,
    pub line_items: Option<Vec<LineItemInput>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub reference_number: Option<String>,
    pub tax_rate_bps: Option<u32>,
    pub overall_discount: Option<Discount>,
    pub currency: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub payment_terms: Option<String>,
    pub delivery_terms: Option<String>,
    pub special_instructions: Option<String>,
    pub internal_notes: Option<String>,
}

/// Partial update of a single line item (draft only).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemPatch {
    pub quantity: Option<i64>,
    pub unit_price_paise: Option<i64>,
    pub discount: Option<Discount>,
    pub variant: Option<VariantChoice>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Listing
// =============================================================================

/// Listing parameters as they arrive from the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub status: Option<QuotationStatus>,
    /// Case-insensitive substring over customer name/email/company.
    pub customer: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Free-text search over number, customer name and reference.
    pub search: Option<String>,
    /// Sort field name; defaults to `quotationDate`.
    pub sort: Option<String>,
    /// `asc` or `desc`; defaults to `desc`.
    pub order: Option<String>,
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Page size; defaults to 50, capped at 200.
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Maximum page size the API will serve.
    pub const MAX_LIMIT: u32 = 200;

    /// Converts the raw query into repository filter parameters,
    /// rejecting unknown sort fields and orders.
    pub fn into_filter(self) -> EngineResult<QuotationFilter> {
        let sort = match self.sort.as_deref() {
            None | Some("quotationDate") | Some("quotation_date") => {
                QuotationSortField::QuotationDate
            }
            Some("createdAt") | Some("created_at") => QuotationSortField::CreatedAt,
            Some("validUntil") | Some("valid_until") => QuotationSortField::ValidUntil,
            Some("quotationNumber") | Some("quotation_number") => {
                QuotationSortField::QuotationNumber
            }
            Some("customerName") | Some("customer_name") | Some("customer") => {
                QuotationSortField::CustomerName
            }
            Some("grandTotal") | Some("grand_total") => QuotationSortField::GrandTotal,
            Some("status") => QuotationSortField::Status,
            Some(other) => {
                return Err(EngineError::validation(format!(
                    "Unknown sort field: {other}"
                )))
            }
        };

        let order = match self.order.as_deref() {
            None | Some("desc") => SortOrder::Desc,
            Some("asc") => SortOrder::Asc,
            Some(other) => {
                return Err(EngineError::validation(format!(
                    "Unknown sort order: {other} (expected asc or desc)"
                )))
            }
        };

        Ok(QuotationFilter {
            status: self.status,
            customer: self.customer.filter(|c| !c.trim().is_empty()),
            date_from: self.date_from,
            date_to: self.date_to,
            search: self.search.filter(|s| !s.trim().is_empty()),
            sort,
            order,
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(50).clamp(1, Self::MAX_LIMIT),
        })
    }
}

/// Pagination metadata echoed with every list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: i64,
    pub items_per_page: u32,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Assembles a page from items and the total match count.
    pub fn new(items: Vec<T>, total_items: i64, current_page: u32, items_per_page: u32) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            ((total_items + items_per_page as i64 - 1) / items_per_page as i64) as u32
        };
        Page {
            items,
            pagination: Pagination {
                current_page,
                total_pages,
                total_items,
                items_per_page,
            },
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Count and grand-total value for one status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusValue {
    pub status: QuotationStatus,
    pub count: i64,
    pub total_paise: i64,
}

/// Dashboard statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationStats {
    pub total_quotations: i64,
    pub draft_quotations: i64,
    pub sent_quotations: i64,
    pub approved_quotations: i64,
    pub value_by_status: Vec<StatusValue>,
    pub recent_quotations: Vec<Quotation>,
}

// =============================================================================
// Product Inputs
// =============================================================================

/// Input for creating a catalog product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProductInput {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub structure: Option<ProductStructure>,
    pub selling_price_paise: i64,
    pub purchase_price_paise: Option<i64>,
    pub mrp_paise: Option<i64>,
    pub price_by_color: Vec<ColorPrice>,
    pub variants: Vec<ProductVariant>,
    pub set_components: Vec<SetComponent>,
    pub set_price_paise: Option<i64>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub low_stock_threshold: Option<i64>,
}

/// Partial update of a catalog product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub structure: Option<ProductStructure>,
    pub selling_price_paise: Option<i64>,
    pub purchase_price_paise: Option<i64>,
    pub mrp_paise: Option<i64>,
    pub price_by_color: Option<Vec<ColorPrice>>,
    pub variants: Option<Vec<ProductVariant>>,
    pub set_components: Option<Vec<SetComponent>>,
    pub set_price_paise: Option<i64>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub low_stock_threshold: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let filter = ListQuery::default().into_filter().unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 50);
        assert_eq!(filter.sort, QuotationSortField::QuotationDate);
        assert_eq!(filter.order, SortOrder::Desc);
    }

    #[test]
    fn test_list_query_rejects_unknown_sort() {
        let query = ListQuery {
            sort: Some("grandTotal; DROP TABLE quotations".to_string()),
            ..ListQuery::default()
        };
        assert!(query.into_filter().is_err());
    }

    #[test]
    fn test_list_query_caps_limit() {
        let query = ListQuery {
            limit: Some(10_000),
            ..ListQuery::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.limit, ListQuery::MAX_LIMIT);
    }

    #[test]
    fn test_page_math() {
        let page = Page::new(vec![1, 2, 3], 7, 1, 3);
        assert_eq!(page.pagination.total_pages, 3);

        let empty: Page<i32> = Page::new(Vec::new(), 0, 1, 50);
        assert_eq!(empty.pagination.total_pages, 0);
    }

    #[test]
    fn test_line_item_input_accepts_minimal_json() {
        let input: LineItemInput =
            serde_json::from_str(r#"{"productId": "p-1", "quantity": 2}"#).unwrap();
        assert_eq!(input.product_id, "p-1");
        assert_eq!(input.quantity, 2);
        assert!(input.unit_price_paise.is_none());
        assert!(input.discount.is_none());
    }
}
