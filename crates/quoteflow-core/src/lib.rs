//! # quoteflow-core: Pure Business Logic for QuoteFlow
//!
//! This crate is the **heart** of QuoteFlow. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       QuoteFlow Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Browser UI (external, React)                    │   │
//! │  │    Catalog ──► Quotation Builder ──► Status Board ──► Print    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST (external HTTP layer)             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   quoteflow-engine                              │   │
//! │  │    create, list, update, change_status, line-item ops, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quoteflow-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  status   │  │   │
//! │  │   │ Quotation │  │   Money   │  │ line math │  │ lifecycle │  │   │
//! │  │   │  Product  │  │  TaxRate  │  │ doc math  │  │  guards   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  quoteflow-db (Database Layer)                  │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Quotation, LineItem, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Line and document total computation
//! - [`status`] - Quotation status state machine and guards
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every computation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use quoteflow_core::money::Money;
//! use quoteflow_core::types::{Discount, TaxRate};
//! use quoteflow_core::pricing;
//!
//! // ₹1,000.00 × 3 with a 10% line discount
//! let line = pricing::line_total(
//!     Money::from_paise(100000),
//!     3,
//!     &Discount::Percentage(1000),
//! );
//! assert_eq!(line.paise(), 270000); // ₹2,700.00
//!
//! // Document totals at 18% GST
//! let totals = pricing::document_totals(
//!     [line].into_iter(),
//!     &Discount::None,
//!     TaxRate::from_bps(1800),
//! );
//! assert_eq!(totals.grand_total.paise(), 318600); // ₹3,186.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use quoteflow_core::Money` instead of
// `use quoteflow_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use status::QuotationStatus;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate in basis points: 18% GST, the standard rate for
/// sanitaryware and bath fittings.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Default quotation validity window, in days from the quotation date.
pub const QUOTATION_VALIDITY_DAYS: i64 = 30;

/// Default ISO currency code for all amounts.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Default display unit for line items.
pub const DEFAULT_UNIT: &str = "pcs";

/// Maximum line items allowed on a single quotation.
///
/// ## Business Reason
/// Prevents runaway documents and keeps printed quotations reviewable.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 9999;

/// Default commercial terms, printed on every quotation unless overridden.
pub const DEFAULT_TERMS_AND_CONDITIONS: &str = "Standard terms and conditions apply.";

/// Default payment terms.
pub const DEFAULT_PAYMENT_TERMS: &str = "100% advance payment";

/// Default delivery terms.
pub const DEFAULT_DELIVERY_TERMS: &str = "Standard delivery within 7-10 business days";
