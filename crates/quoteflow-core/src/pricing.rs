//! # Pricing Module
//!
//! Line-item and document-level total computation.
//!
//! ## Computation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pricing Pipeline                                   │
//! │                                                                         │
//! │  Per line:                                                              │
//! │    line_subtotal = unit_price × quantity                               │
//! │    line_total    = line_subtotal − line discount                       │
//! │                                                                         │
//! │  Per document:                                                          │
//! │    subtotal              = Σ line_total                                │
//! │    amount_after_discount = subtotal − overall discount                 │
//! │    tax_amount            = amount_after_discount × tax rate            │
//! │    grand_total           = amount_after_discount + tax_amount          │
//! │                                                                         │
//! │  Every mutation recomputes the whole pipeline; nothing is cached.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Zero Floor
//! A discount larger than the amount it applies to produces a NEGATIVE
//! total. The formulas here are unconditional; whether a negative total
//! is acceptable is a document-validation question, not an arithmetic one.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Discount, TaxRate};

// =============================================================================
// Line-Level Computation
// =============================================================================

/// Line subtotal: unit price × quantity, before any discount.
#[inline]
pub fn line_subtotal(unit_price: Money, quantity: i64) -> Money {
    unit_price.multiply_quantity(quantity)
}

/// Line total: subtotal minus the line discount.
pub fn line_total(unit_price: Money, quantity: i64, discount: &Discount) -> Money {
    discount.apply(line_subtotal(unit_price, quantity))
}

// =============================================================================
// Document-Level Computation
// =============================================================================

/// The four derived document amounts, always produced together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: Money,
    pub amount_after_discount: Money,
    pub tax_amount: Money,
    pub grand_total: Money,
}

/// Computes document totals from line totals, the overall discount and
/// the tax rate.
///
/// Summation is order-independent, so callers may pass line totals in
/// any order.
pub fn document_totals(
    line_totals: impl Iterator<Item = Money>,
    overall_discount: &Discount,
    tax_rate: TaxRate,
) -> DocumentTotals {
    let subtotal = line_totals.fold(Money::zero(), |acc, t| acc + t);
    let amount_after_discount = overall_discount.apply(subtotal);
    let tax_amount = amount_after_discount.calculate_tax(tax_rate);
    let grand_total = amount_after_discount + tax_amount;

    DocumentTotals {
        subtotal,
        amount_after_discount,
        tax_amount,
        grand_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
