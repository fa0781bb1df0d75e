//! # Domain Types
//!
//! Core domain types used throughout QuoteFlow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Quotation     │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  quotation_no   │   │  product snap   │       │
//! │  │  structure      │   │  status         │   │  qty, discount  │       │
//! │  │  selling_price  │   │  totals (paise) │   │  line totals    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    Discount     │   │   StatusEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  None           │   │  status         │       │
//! │  │  1800 = 18% GST │   │  Percentage(bps)│   │  actor, note    │       │
//! │  └─────────────────┘   │  Fixed(paise)   │   │  timestamp      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, quotation_number) - human-readable, shown to users
//!
//! ## Snapshot Pattern
//! A `LineItem` freezes the product's code, name, structure tag and price
//! at the moment it is added. Editing the product later never changes
//! quotations that already reference it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::money::Money;
use crate::pricing;
use crate::status::QuotationStatus;
use crate::{CoreResult, DEFAULT_UNIT, MAX_LINE_ITEMS};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (the default GST rate for sanitaryware)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount, at line level or document level.
///
/// The two non-trivial variants carry values in different units:
/// percentage discounts in basis points, fixed discounts in paise.
/// The sum type makes a "percentage of ₹200" or "fixed 15%" confusion
/// unrepresentable.
///
/// ## Serialized Form
/// ```json
/// {"type": "percentage", "value": 1000}   // 10%
/// {"type": "fixed", "value": 20000}       // ₹200.00
/// {"type": "none", "value": 0}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Discount {
    /// No discount.
    None,
    /// Percentage of the amount, in basis points (1000 = 10%).
    /// Values above 10000 (100%) are permitted and produce negative totals.
    Percentage(u32),
    /// Absolute amount off, in paise.
    Fixed(i64),
}

impl Discount {
    /// Applies the discount to `amount` and returns what remains.
    ///
    /// No floor at zero: a discount larger than the amount yields a
    /// negative result, which callers may reject at the document level.
    pub fn apply(&self, amount: Money) -> Money {
        amount - self.amount_off(amount)
    }

    /// The discount portion itself.
    pub fn amount_off(&self, amount: Money) -> Money {
        match self {
            Discount::None => Money::zero(),
            Discount::Percentage(bps) => amount.apply_bps(*bps),
            Discount::Fixed(paise) => Money::from_paise(*paise),
        }
    }

    /// Stable lowercase tag, as stored in the database.
    pub const fn kind(&self) -> &'static str {
        match self {
            Discount::None => "none",
            Discount::Percentage(_) => "percentage",
            Discount::Fixed(_) => "fixed",
        }
    }

    /// Raw stored value: bps for percentage, paise for fixed, 0 for none.
    pub const fn raw_value(&self) -> i64 {
        match self {
            Discount::None => 0,
            Discount::Percentage(bps) => *bps as i64,
            Discount::Fixed(paise) => *paise,
        }
    }

    /// Rebuilds a discount from its stored (kind, value) pair.
    pub fn from_parts(kind: &str, value: i64) -> CoreResult<Discount> {
        match kind {
            "none" => Ok(Discount::None),
            "percentage" => Ok(Discount::Percentage(value as u32)),
            "fixed" => Ok(Discount::Fixed(value)),
            other => Err(CoreError::Validation(
                crate::error::ValidationError::InvalidFormat {
                    field: "discountType".to_string(),
                    reason: format!("unknown discount type '{other}'"),
                },
            )),
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Discount::None)
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::None
    }
}

// =============================================================================
// Product Structure
// =============================================================================

/// How a product is composed and priced.
///
/// Sanitaryware catalogs mix simple items with bundles and systems:
/// a basin sold alone, a basin+pedestal set, a wall-hung WC that needs a
/// separate concealed tank, a seat cover sold as a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStructure {
    /// Single self-contained item.
    Standalone,
    /// Sold in multiple configurations (trap type, seat option, ...).
    Variant,
    /// Bundle of components sold together (basin + pedestal).
    Set,
    /// Part of a set, also sellable on its own.
    Component,
    /// Needs a companion part to function (wall-hung WC + tank).
    TwoPart,
}

impl Default for ProductStructure {
    fn default() -> Self {
        ProductStructure::Standalone
    }
}

// =============================================================================
// Product
// =============================================================================

/// Per-color price override for multi-color products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ColorPrice {
    pub color: String,
    pub price_paise: i64,
}

/// An alternate configuration of a variant product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// SKU suffix or full SKU of this configuration.
    pub variant_sku: String,
    /// Human description, e.g. "P-trap with soft-close seat".
    pub configuration: String,
    /// Difference from the base selling price, in paise (may be negative).
    pub price_modifier_paise: i64,
    /// Colors this configuration is available in.
    pub colors: Vec<String>,
}

/// One component of a set product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SetComponent {
    pub component_sku: String,
    pub component_name: String,
    pub component_price_paise: i64,
    pub quantity: i64,
}

/// A product available for quoting.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier, stored uppercase.
    pub sku: String,

    /// Display name shown in the catalog and on quotations.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Catalog category (basins, closets, taps, ...).
    pub category: Option<String>,

    /// How this product is composed and priced.
    pub structure: ProductStructure,

    /// Base selling price in paise.
    pub selling_price_paise: i64,

    /// Purchase cost in paise (for margin reporting).
    pub purchase_price_paise: i64,

    /// Maximum retail price in paise, when printed on the carton.
    pub mrp_paise: Option<i64>,

    /// Per-color price overrides; empty for single-color products.
    pub price_by_color: Vec<ColorPrice>,

    /// Alternate configurations; empty unless structure is `Variant`.
    pub variants: Vec<ProductVariant>,

    /// Bundle contents; empty unless structure is `Set`.
    pub set_components: Vec<SetComponent>,

    /// Explicit set price in paise; falls back to the component sum.
    pub set_price_paise: Option<i64>,

    /// Current stock level.
    pub quantity: i64,

    /// Display unit (e.g. "pcs").
    pub unit: String,

    /// Stock level at which reordering is flagged.
    pub low_stock_threshold: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_paise(self.selling_price_paise)
    }

    /// Returns the price for a specific color, falling back to the base
    /// selling price when the color has no override.
    pub fn price_for_color(&self, color: &str) -> Money {
        self.price_by_color
            .iter()
            .find(|p| p.color.eq_ignore_ascii_case(color))
            .map(|p| Money::from_paise(p.price_paise))
            .unwrap_or_else(|| self.selling_price())
    }

    /// Returns the total price of a set: the explicit set price if one is
    /// configured, otherwise the sum of component prices.
    pub fn total_set_price(&self) -> Money {
        if self.structure != ProductStructure::Set || self.set_components.is_empty() {
            return self.selling_price();
        }
        match self.set_price_paise {
            Some(paise) => Money::from_paise(paise),
            None => Money::from_paise(
                self.set_components
                    .iter()
                    .map(|c| c.component_price_paise * c.quantity)
                    .sum(),
            ),
        }
    }

    /// Whether current stock is at or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A postal address on a quotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.pincode.is_none()
            && self.country.is_none()
    }
}

/// Customer details captured on a quotation.
///
/// Stored inline on the quotation (not a reference): the quotation is a
/// commercial document and must keep the customer data it was issued with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Required display name.
    pub name: String,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// GSTIN, stored uppercase.
    pub gst_number: Option<String>,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub customer_notes: Option<String>,
}

impl Customer {
    /// Normalizes user-entered fields in place: trims whitespace,
    /// lowercases the email, uppercases the GST number, and defaults the
    /// address country.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        normalize_opt(&mut self.company_name);
        normalize_opt(&mut self.contact_person);
        normalize_opt(&mut self.phone);
        if let Some(email) = &mut self.email {
            *email = email.trim().to_lowercase();
            if email.is_empty() {
                self.email = None;
            }
        }
        if let Some(gst) = &mut self.gst_number {
            *gst = gst.trim().to_uppercase();
            if gst.is_empty() {
                self.gst_number = None;
            }
        }
        for address in [&mut self.billing_address, &mut self.shipping_address] {
            if !address.is_empty() && address.country.is_none() {
                address.country = Some("India".to_string());
            }
        }
    }
}

fn normalize_opt(field: &mut Option<String>) {
    if let Some(value) = field {
        *value = value.trim().to_string();
        if value.is_empty() {
            *field = None;
        }
    }
}

// =============================================================================
// Actor
// =============================================================================

/// The user performing a mutation, as seen by the engine.
///
/// Authentication happens outside this repository; the engine only
/// receives an opaque identifier plus a display name for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Line Item
// =============================================================================

/// The variant configuration chosen for a quoted line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantChoice {
    pub color: Option<String>,
    pub finish: Option<String>,
    pub size: Option<String>,
}

impl VariantChoice {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.finish.is_none() && self.size.is_none()
    }
}

/// A component listed under a set or two-part line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub name: String,
    pub code: String,
}

/// A line item in a quotation.
/// Uses the snapshot pattern to freeze product data at time of add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,

    /// Product reference (for database lookup; never re-resolved).
    pub product_id: String,

    /// SKU at time of add (frozen).
    pub product_code: String,

    /// Product name at time of add (frozen).
    pub product_name: String,

    /// Product structure tag at time of add (frozen).
    pub product_type: ProductStructure,

    /// Selected variant configuration, if any.
    pub variant: Option<VariantChoice>,

    /// Components shown under set / two-part lines.
    pub components: Vec<ComponentRef>,

    /// Unit price in paise at time of add (frozen, or caller override).
    pub unit_price_paise: i64,

    /// Quantity quoted, always ≥ 1.
    pub quantity: i64,

    /// Display unit (e.g. "pcs").
    pub unit: String,

    /// Per-line discount.
    pub discount: Discount,

    /// Derived: unit_price × quantity. Never accepted from callers.
    pub line_subtotal_paise: i64,

    /// Derived: subtotal minus discount. Never accepted from callers.
    pub line_total_paise: i64,

    pub notes: Option<String>,
}

impl LineItem {
    /// Builds a line item from a product snapshot and commercial inputs.
    ///
    /// Derived totals are computed immediately; the struct is never in a
    /// state where they disagree with the source fields.
    pub fn new(
        product: &Product,
        unit_price: Money,
        quantity: i64,
        discount: Discount,
        variant: Option<VariantChoice>,
        notes: Option<String>,
    ) -> Self {
        let mut item = LineItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_code: product.sku.clone(),
            product_name: product.name.clone(),
            product_type: product.structure,
            variant,
            components: product
                .set_components
                .iter()
                .map(|c| ComponentRef {
                    name: c.component_name.clone(),
                    code: c.component_sku.clone(),
                })
                .collect(),
            unit_price_paise: unit_price.paise(),
            quantity,
            unit: if product.unit.is_empty() {
                DEFAULT_UNIT.to_string()
            } else {
                product.unit.clone()
            },
            discount,
            line_subtotal_paise: 0,
            line_total_paise: 0,
            notes,
        };
        item.recompute();
        item
    }

    /// Recomputes both derived totals from the current source fields.
    ///
    /// Must be called after any mutation of `unit_price_paise`,
    /// `quantity` or `discount`. `Quotation::recompute_totals` does this
    /// for every line, so engine code only needs the document-level call.
    pub fn recompute(&mut self) {
        let unit_price = Money::from_paise(self.unit_price_paise);
        self.line_subtotal_paise = pricing::line_subtotal(unit_price, self.quantity).paise();
        self.line_total_paise =
            pricing::line_total(unit_price, self.quantity, &self.discount).paise();
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }

    /// Returns the discount portion of this line in paise.
    #[inline]
    pub fn discount_amount_paise(&self) -> i64 {
        self.line_subtotal_paise - self.line_total_paise
    }
}

// =============================================================================
// Audit Entries
// =============================================================================

/// One entry in the append-only status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: QuotationStatus,
    #[ts(as = "String")]
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
    pub changed_by_name: String,
    pub notes: String,
}

/// One entry in the append-only email log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmailEntry {
    pub sent_to: String,
    #[ts(as = "String")]
    pub sent_at: DateTime<Utc>,
    pub sent_by: String,
    pub sent_by_name: String,
}

// =============================================================================
// Quotation
// =============================================================================

/// A sales quotation document.
///
/// ## Derived Fields
/// `subtotal_paise`, `amount_after_discount_paise`, `tax_amount_paise`
/// and `grand_total_paise` are persisted for querying but are never the
/// source of truth: `recompute_totals` rewrites all of them (and every
/// line's totals) from the source fields, and the repository persists
/// the document in one transaction so they can never drift.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business identifier, `QT-<year>-<seq>`, allocated atomically.
    pub quotation_number: String,

    #[ts(as = "String")]
    pub quotation_date: DateTime<Utc>,

    #[ts(as = "String")]
    pub valid_until: DateTime<Utc>,

    /// Customer's own reference (their enquiry/PO number).
    pub reference_number: Option<String>,

    pub status: QuotationStatus,

    pub customer: Customer,

    /// Ordered line items; insertion order is the print order.
    pub line_items: Vec<LineItem>,

    /// Derived: Σ line totals.
    pub subtotal_paise: i64,

    /// Discount applied to the subtotal as a whole.
    pub overall_discount: Discount,

    /// Derived: subtotal minus overall discount.
    pub amount_after_discount_paise: i64,

    /// Tax rate in basis points (1800 = 18% GST).
    pub tax_rate_bps: u32,

    /// Derived: tax on the amount after discount.
    pub tax_amount_paise: i64,

    /// Derived: amount after discount plus tax.
    pub grand_total_paise: i64,

    /// ISO currency code; "INR" unless configured otherwise.
    pub currency: String,

    pub terms_and_conditions: String,
    pub payment_terms: String,
    pub delivery_terms: String,
    pub special_instructions: Option<String>,

    /// Visible internally, never printed on the quotation.
    pub internal_notes: Option<String>,

    /// Actor snapshot of whoever created the document.
    pub created_by: String,
    pub created_by_name: String,

    /// Append-only log of lifecycle transitions.
    pub status_history: Vec<StatusEntry>,

    /// Append-only log of outbound emails.
    pub email_history: Vec<EmailEntry>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    /// Recomputes every derived field: all line totals, then the
    /// document totals. Order-independent over line items.
    pub fn recompute_totals(&mut self) {
        for item in &mut self.line_items {
            item.recompute();
        }
        let totals = pricing::document_totals(
            self.line_items.iter().map(|i| i.line_total()),
            &self.overall_discount,
            TaxRate::from_bps(self.tax_rate_bps),
        );
        self.subtotal_paise = totals.subtotal.paise();
        self.amount_after_discount_paise = totals.amount_after_discount.paise();
        self.tax_amount_paise = totals.tax_amount.paise();
        self.grand_total_paise = totals.grand_total.paise();
    }

    /// Appends a line item and recomputes totals.
    ///
    /// Status guards are the caller's responsibility; this method only
    /// enforces the structural cap on line count.
    pub fn add_line_item(&mut self, item: LineItem) -> CoreResult<()> {
        if self.line_items.len() >= MAX_LINE_ITEMS {
            return Err(CoreError::TooManyLineItems {
                max: MAX_LINE_ITEMS,
            });
        }
        self.line_items.push(item);
        self.recompute_totals();
        Ok(())
    }

    /// Looks up a line item by id.
    pub fn line_item(&self, line_item_id: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|i| i.id == line_item_id)
    }

    /// Looks up a line item by id for mutation. Callers must call
    /// `recompute_totals` after changing it.
    pub fn line_item_mut(&mut self, line_item_id: &str) -> Option<&mut LineItem> {
        self.line_items.iter_mut().find(|i| i.id == line_item_id)
    }

    /// Removes a line item by id and recomputes totals.
    pub fn remove_line_item(&mut self, line_item_id: &str) -> CoreResult<LineItem> {
        let index = self
            .line_items
            .iter()
            .position(|i| i.id == line_item_id)
            .ok_or_else(|| CoreError::LineItemNotFound(line_item_id.to_string()))?;
        let removed = self.line_items.remove(index);
        self.recompute_totals();
        Ok(removed)
    }

    /// Transitions the quotation to `to`, appending exactly one status
    /// history entry.
    ///
    /// Fails with `InvalidTransition` (document untouched) when the
    /// transition table forbids the move.
    pub fn change_status(
        &mut self,
        to: QuotationStatus,
        actor: &Actor,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.status_history.push(StatusEntry {
            status: to,
            changed_at: now,
            changed_by: actor.id.clone(),
            changed_by_name: actor.name.clone(),
            notes: notes.unwrap_or_else(|| format!("Status changed to {to}")),
        });
        self.updated_at = now;
        Ok(())
    }

    /// Whether the validity window has lapsed.
    /// Converted quotations never count as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until && self.status != QuotationStatus::Converted
    }

    /// Builds a duplicate of this quotation as a fresh draft.
    ///
    /// Copies customer, line items (by value, with fresh line ids),
    /// discounts, tax rate, currency and terms. The duplicate gets the
    /// supplied identity, `now` as its quotation date, a 30-day validity
    /// window and empty audit logs. `self` is not modified.
    pub fn duplicated(
        &self,
        id: String,
        quotation_number: String,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Quotation {
        let mut copy = Quotation {
            id,
            quotation_number,
            quotation_date: now,
            valid_until: now + chrono::Duration::days(crate::QUOTATION_VALIDITY_DAYS),
            reference_number: self.reference_number.clone(),
            status: QuotationStatus::Draft,
            customer: self.customer.clone(),
            line_items: self
                .line_items
                .iter()
                .map(|item| LineItem {
                    id: Uuid::new_v4().to_string(),
                    ..item.clone()
                })
                .collect(),
            subtotal_paise: 0,
            overall_discount: self.overall_discount,
            amount_after_discount_paise: 0,
            tax_rate_bps: self.tax_rate_bps,
            tax_amount_paise: 0,
            grand_total_paise: 0,
            currency: self.currency.clone(),
            terms_and_conditions: self.terms_and_conditions.clone(),
            payment_terms: self.payment_terms.clone(),
            delivery_terms: self.delivery_terms.clone(),
            special_instructions: self.special_instructions.clone(),
            internal_notes: self.internal_notes.clone(),
            created_by: actor.id.clone(),
            created_by_name: actor.name.clone(),
            status_history: Vec::new(),
            email_history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        copy.recompute_totals();
        copy
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
            id: "11111111-1111-4111-8111-111111111111".to_string(),
            sku: "BAS-201".to_string(),
            name: "Orion Counter Basin".to_string(),
            description: None,
            category: Some("basins".to_string()),
            structure: ProductStructure::Standalone,
            selling_price_paise: 100000,
            purchase_price_paise: 60000,
            mrp_paise: None,
            price_by_color: vec![ColorPrice {
                color: "Ivory".to_string(),
                price_paise: 110000,
            }],
            variants: Vec::new(),
            set_components: Vec::new(),
            set_price_paise: None,
            quantity: 25,
            unit: "pcs".to_string(),
            low_stock_threshold: 10,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_actor() -> Actor {
        Actor {
            id: "user-1".to_string(),
            name: "Asha Iyer".to_string(),
        }
    }

    fn draft_quotation() -> Quotation {
        let now = Utc::now();
        Quotation {
            id: "q-1".to_string(),
            quotation_number: "QT-2026-0001".to_string(),
            quotation_date: now,
            valid_until: now + chrono::Duration::days(30),
            reference_number: None,
            status: QuotationStatus::Draft,
            customer: Customer {
                name: "Sharma Constructions".to_string(),
                ..Customer::default()
            },
            line_items: Vec::new(),
            subtotal_paise: 0,
            overall_discount: Discount::None,
            amount_after_discount_paise: 0,
            tax_rate_bps: 1800,
            tax_amount_paise: 0,
            grand_total_paise: 0,
            currency: "INR".to_string(),
            terms_and_conditions: String::new(),
            payment_terms: String::new(),
            delivery_terms: String::new(),
            special_instructions: None,
            internal_notes: None,
            created_by: "user-1".to_string(),
            created_by_name: "Asha Iyer".to_string(),
            status_history: Vec::new(),
            email_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_price_for_color() {
        let product = test_product();
        assert_eq!(product.price_for_color("ivory").paise(), 110000);
        assert_eq!(product.price_for_color("Snow White").paise(), 100000);
    }

    #[test]
    fn test_total_set_price_falls_back_to_component_sum() {
        let mut product = test_product();
        product.structure = ProductStructure::Set;
        product.set_components = vec![
            SetComponent {
                component_sku: "BAS-201".to_string(),
                component_name: "Basin".to_string(),
                component_price_paise: 100000,
                quantity: 1,
            },
            SetComponent {
                component_sku: "PED-201".to_string(),
                component_name: "Pedestal".to_string(),
                component_price_paise: 40000,
                quantity: 1,
            },
        ];
        assert_eq!(product.total_set_price().paise(), 140000);

        product.set_price_paise = Some(130000);
        assert_eq!(product.total_set_price().paise(), 130000);
    }

    #[test]
    fn test_line_item_new_snapshots_and_computes() {
        let product = test_product();
        let item = LineItem::new(
            &product,
            Money::from_paise(100000),
            3,
            Discount::Percentage(1000),
            None,
            None,
        );
        assert_eq!(item.product_code, "BAS-201");
        assert_eq!(item.product_name, "Orion Counter Basin");
        assert_eq!(item.line_subtotal_paise, 300000);
        assert_eq!(item.line_total_paise, 270000);
        assert_eq!(item.discount_amount_paise(), 30000);
    }

    #[test]
    fn test_recompute_totals_document_level() {
        let product = test_product();
        let mut quotation = draft_quotation();
        quotation
            .add_line_item(LineItem::new(
                &product,
                Money::from_paise(100000),
                3,
                Discount::Percentage(1000),
                None,
                None,
            ))
            .unwrap();

        // 3000.00 - 10% = 2700.00; 18% tax = 486.00; total 3186.00
        assert_eq!(quotation.subtotal_paise, 270000);
        assert_eq!(quotation.amount_after_discount_paise, 270000);
        assert_eq!(quotation.tax_amount_paise, 48600);
        assert_eq!(quotation.grand_total_paise, 318600);

        // Add an overall fixed discount of ₹200.00
        quotation.overall_discount = Discount::Fixed(20000);
        quotation.recompute_totals();
        assert_eq!(quotation.amount_after_discount_paise, 250000);
        assert_eq!(quotation.tax_amount_paise, 45000);
        assert_eq!(quotation.grand_total_paise, 295000);
    }

    #[test]
    fn test_remove_only_line_item_zeroes_totals() {
        let product = test_product();
        let mut quotation = draft_quotation();
        let item = LineItem::new(
            &product,
            Money::from_paise(100000),
            1,
            Discount::None,
            None,
            None,
        );
        let item_id = item.id.clone();
        quotation.add_line_item(item).unwrap();
        assert!(quotation.grand_total_paise > 0);

        quotation.remove_line_item(&item_id).unwrap();
        assert_eq!(quotation.subtotal_paise, 0);
        assert_eq!(quotation.amount_after_discount_paise, 0);
        assert_eq!(quotation.tax_amount_paise, 0);
        assert_eq!(quotation.grand_total_paise, 0);
    }

    #[test]
    fn test_change_status_appends_history() {
        let mut quotation = draft_quotation();
        let actor = test_actor();
        let now = Utc::now();

        quotation
            .change_status(QuotationStatus::Sent, &actor, None, now)
            .unwrap();
        assert_eq!(quotation.status, QuotationStatus::Sent);
        assert_eq!(quotation.status_history.len(), 1);
        assert_eq!(quotation.status_history[0].status, QuotationStatus::Sent);
        assert_eq!(quotation.status_history[0].notes, "Status changed to sent");

        // sent → draft is the one allowed reversal
        quotation
            .change_status(QuotationStatus::Draft, &actor, Some("revising".to_string()), now)
            .unwrap();
        assert_eq!(quotation.status_history.len(), 2);
        assert_eq!(quotation.status_history[1].notes, "revising");
    }

    #[test]
    fn test_change_status_rejects_bad_transition() {
        let mut quotation = draft_quotation();
        let actor = test_actor();

        let err = quotation
            .change_status(QuotationStatus::Approved, &actor, None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(quotation.status, QuotationStatus::Draft);
        assert!(quotation.status_history.is_empty());
    }

    #[test]
    fn test_duplicated_resets_lifecycle() {
        let product = test_product();
        let mut source = draft_quotation();
        source
            .add_line_item(LineItem::new(
                &product,
                Money::from_paise(100000),
                2,
                Discount::None,
                None,
                None,
            ))
            .unwrap();
        let actor = test_actor();
        source
            .change_status(QuotationStatus::Sent, &actor, None, Utc::now())
            .unwrap();

        let copy = source.duplicated(
            "q-2".to_string(),
            "QT-2026-0002".to_string(),
            &actor,
            Utc::now(),
        );

        assert_eq!(copy.status, QuotationStatus::Draft);
        assert_ne!(copy.quotation_number, source.quotation_number);
        assert!(copy.status_history.is_empty());
        assert!(copy.email_history.is_empty());
        assert_eq!(copy.line_items.len(), 1);
        assert_ne!(copy.line_items[0].id, source.line_items[0].id);
        assert_eq!(copy.line_items[0].product_code, source.line_items[0].product_code);
        assert_eq!(copy.grand_total_paise, source.grand_total_paise);
        // source untouched
        assert_eq!(source.status, QuotationStatus::Sent);
    }

    #[test]
    fn test_is_expired() {
        let mut quotation = draft_quotation();
        let past = Utc::now() - chrono::Duration::days(1);
        quotation.valid_until = past;
        assert!(quotation.is_expired(Utc::now()));

        quotation.status = QuotationStatus::Converted;
        assert!(!quotation.is_expired(Utc::now()));
    }

    #[test]
    fn test_customer_normalize() {
        let mut customer = Customer {
            name: "  Sharma Constructions  ".to_string(),
            email: Some("Accounts@Sharma.IN ".to_string()),
            gst_number: Some("27aapfu0939f1zv".to_string()),
            billing_address: Address {
                city: Some("Pune".to_string()),
                ..Address::default()
            },
            ..Customer::default()
        };
        customer.normalize();
        assert_eq!(customer.name, "Sharma Constructions");
        assert_eq!(customer.email.as_deref(), Some("accounts@sharma.in"));
        assert_eq!(customer.gst_number.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(customer.billing_address.country.as_deref(), Some("India"));
        // untouched shipping address stays empty
        assert!(customer.shipping_address.is_empty());
    }

    #[test]
    fn test_discount_parts_round_trip() {
        for discount in [
            Discount::None,
            Discount::Percentage(1250),
            Discount::Fixed(20000),
        ] {
            let rebuilt = Discount::from_parts(discount.kind(), discount.raw_value()).unwrap();
            assert_eq!(rebuilt, discount);
        }
        assert!(Discount::from_parts("bogus", 0).is_err());
    }
}
