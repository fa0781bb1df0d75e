//! # Quotation Service
//!
//! The engine's quotation API: one method per operation the HTTP layer
//! exposes.
//!
//! ## Operation Shape
//! Every mutation follows the same sequence:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate input                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load document ───────────── missing? → NOT_FOUND, nothing written     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status guard ────────────── refused? → INVALID_STATE, nothing written │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  mutate in memory + recompute all derived totals                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  persist whole document in one transaction                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are detected before any write; a failed operation leaves the
//! stored document untouched.

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use quoteflow_core::money::Money;
use quoteflow_core::status::QuotationStatus;
use quoteflow_core::types::{Actor, EmailEntry, LineItem, Quotation};
use quoteflow_core::{
    validation, CoreError, DEFAULT_CURRENCY, DEFAULT_DELIVERY_TERMS, DEFAULT_PAYMENT_TERMS,
    DEFAULT_TAX_RATE_BPS, DEFAULT_TERMS_AND_CONDITIONS, QUOTATION_VALIDITY_DAYS,
};
use quoteflow_db::Database;

use crate::error::{EngineError, EngineResult};
use crate::types::{
    CreateQuotationInput, LineItemInput, LineItemPatch, ListQuery, Page, QuotationStats,
    StatusValue, UpdateQuotationInput,
};

/// Quotation operations exposed to the HTTP layer.
///
/// Cheap to clone; holds only the database handle.
#[derive(Debug, Clone)]
pub struct QuotationService {
    db: Database,
}

impl QuotationService {
    /// Creates a new QuotationService.
    pub fn new(db: Database) -> Self {
        QuotationService { db }
    }

    // -------------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------------

    /// Creates a quotation in `draft` status.
    ///
    /// Line items are resolved against the catalog (missing product →
    /// NOT_FOUND, nothing written), every derived total is computed, and
    /// a fresh `QT-<year>-NNNN` number is allocated. If the number
    /// collides anyway (counter reset by a restore, manual insert), one
    /// retry with a fresh number is attempted before giving up.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateQuotationInput,
    ) -> EngineResult<Quotation> {
        let mut customer = input.customer;
        customer.normalize();
        validation::validate_customer(&customer)?;

        let tax_rate_bps = input.tax_rate_bps.unwrap_or(DEFAULT_TAX_RATE_BPS);
        validation::validate_tax_rate_bps(tax_rate_bps)?;

        let overall_discount = input.overall_discount.unwrap_or_default();
        validation::validate_discount(&overall_discount)?;

        let mut line_items = Vec::with_capacity(input.line_items.len());
        for item_input in &input.line_items {
            line_items.push(self.resolve_line_item(item_input).await?);
        }

        let now = Utc::now();
        let mut quotation = Quotation {
            id: Uuid::new_v4().to_string(),
            quotation_number: String::new(), // allocated below
            quotation_date: now,
            valid_until: input
                .valid_until
                .unwrap_or(now + Duration::days(QUOTATION_VALIDITY_DAYS)),
            reference_number: input.reference_number,
            status: QuotationStatus::Draft,
            customer,
            line_items,
            subtotal_paise: 0,
            overall_discount,
            amount_after_discount_paise: 0,
            tax_rate_bps,
            tax_amount_paise: 0,
            grand_total_paise: 0,
            currency: input
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            terms_and_conditions: input
                .terms_and_conditions
                .unwrap_or_else(|| DEFAULT_TERMS_AND_CONDITIONS.to_string()),
            payment_terms: input
                .payment_terms
                .unwrap_or_else(|| DEFAULT_PAYMENT_TERMS.to_string()),
            delivery_terms: input
                .delivery_terms
                .unwrap_or_else(|| DEFAULT_DELIVERY_TERMS.to_string()),
            special_instructions: input.special_instructions,
            internal_notes: input.internal_notes,
            created_by: actor.id.clone(),
            created_by_name: actor.name.clone(),
            status_history: Vec::new(),
            email_history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        quotation.recompute_totals();

        let repo = self.db.quotations();
        quotation.quotation_number = repo.next_quotation_number(now).await?;

        match repo.insert(&quotation).await {
            Ok(()) => {}
            Err(e) if e.is_unique_violation() => {
                warn!(
                    number = %quotation.quotation_number,
                    "Quotation number collision, retrying with a fresh number"
                );
                quotation.quotation_number = repo.next_quotation_number(now).await?;
                repo.insert(&quotation).await?;
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            id = %quotation.id,
            number = %quotation.quotation_number,
            grand_total = %Money::from_paise(quotation.grand_total_paise),
            "Quotation created"
        );
        Ok(quotation)
    }

    // -------------------------------------------------------------------------
    // Read
    // -------------------------------------------------------------------------

    /// Loads a quotation by ID.
    pub async fn get(&self, id: &str) -> EngineResult<Quotation> {
        self.load(id).await
    }

    /// Lists quotations with filters, sorting and pagination.
    pub async fn list(&self, query: ListQuery) -> EngineResult<Page<Quotation>> {
        let filter = query.into_filter()?;
        let (items, total) = self.db.quotations().list(&filter).await?;
        Ok(Page::new(items, total, filter.page, filter.limit))
    }

    /// Dashboard statistics: totals per status plus recent documents.
    pub async fn stats(&self) -> EngineResult<QuotationStats> {
        let repo = self.db.quotations();
        let rollup = repo.status_rollup().await?;

        let count_for = |status: QuotationStatus| {
            rollup
                .iter()
                .find(|r| r.status == status)
                .map(|r| r.count)
                .unwrap_or(0)
        };

        Ok(QuotationStats {
            total_quotations: rollup.iter().map(|r| r.count).sum(),
            draft_quotations: count_for(QuotationStatus::Draft),
            sent_quotations: count_for(QuotationStatus::Sent),
            approved_quotations: count_for(QuotationStatus::Approved),
            value_by_status: rollup
                .into_iter()
                .map(|r| StatusValue {
                    status: r.status,
                    count: r.count,
                    total_paise: r.total_paise,
                })
                .collect(),
            recent_quotations: repo.recent(5).await?,
        })
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    /// Applies a partial update to a draft or sent quotation.
    ///
    /// Identity fields (quotation number, creator) are never touched.
    /// Totals are recomputed from scratch; client-supplied totals do not
    /// exist in the input type at all.
    pub async fn update(&self, id: &str, input: UpdateQuotationInput) -> EngineResult<Quotation> {
        let mut quotation = self.load(id).await?;

        if !quotation.status.allows_edit() {
            return Err(CoreError::InvalidStatus {
                status: quotation.status,
                operation: "be edited",
            }
            .into());
        }

        if let Some(mut customer) = input.customer {
            customer.normalize();
            validation::validate_customer(&customer)?;
            quotation.customer = customer;
        }

        if let Some(items) = input.line_items {
            let mut resolved = Vec::with_capacity(items.len());
            for item_input in &items {
                resolved.push(self.resolve_line_item(item_input).await?);
            }
            quotation.line_items = resolved;
        }

        if let Some(valid_until) = input.valid_until {
            quotation.valid_until = valid_until;
        }
        if let Some(reference) = input.reference_number {
            quotation.reference_number = Some(reference);
        }
        if let Some(tax_rate_bps) = input.tax_rate_bps {
            validation::validate_tax_rate_bps(tax_rate_bps)?;
            quotation.tax_rate_bps = tax_rate_bps;
        }
        if let Some(discount) = input.overall_discount {
            validation::validate_discount(&discount)?;
            quotation.overall_discount = discount;
        }
        if let Some(currency) = input.currency {
            quotation.currency = currency;
        }
        if let Some(terms) = input.terms_and_conditions {
            quotation.terms_and_conditions = terms;
        }
        if let Some(terms) = input.payment_terms {
            quotation.payment_terms = terms;
        }
        if let Some(terms) = input.delivery_terms {
            quotation.delivery_terms = terms;
        }
        if let Some(instructions) = input.special_instructions {
            quotation.special_instructions = Some(instructions);
        }
        if let Some(notes) = input.internal_notes {
            quotation.internal_notes = Some(notes);
        }

        quotation.recompute_totals();
        quotation.updated_at = Utc::now();
        self.db.quotations().save(&quotation).await?;

        debug!(id = %quotation.id, "Quotation updated");
        Ok(quotation)
    }

    // -------------------------------------------------------------------------
    // Status
    // -------------------------------------------------------------------------

    /// Transitions a quotation to `new_status`, appending one status
    /// history entry. Illegal transitions fail with INVALID_TRANSITION
    /// and leave the document unchanged.
    pub async fn change_status(
        &self,
        actor: &Actor,
        id: &str,
        new_status: QuotationStatus,
        note: Option<String>,
    ) -> EngineResult<Quotation> {
        let mut quotation = self.load(id).await?;
        let from = quotation.status;

        quotation.change_status(new_status, actor, note, Utc::now())?;
        self.db.quotations().save(&quotation).await?;

        info!(
            id = %quotation.id,
            number = %quotation.quotation_number,
            %from,
            to = %new_status,
            "Quotation status changed"
        );
        Ok(quotation)
    }

    // -------------------------------------------------------------------------
    // Duplicate
    // -------------------------------------------------------------------------

    /// Duplicates a quotation of any status into a fresh draft with a
    /// newly allocated number. The source is not modified.
    pub async fn duplicate(&self, actor: &Actor, id: &str) -> EngineResult<Quotation> {
        let source = self.load(id).await?;

        let now = Utc::now();
        let repo = self.db.quotations();
        let number = repo.next_quotation_number(now).await?;
        let mut copy = source.duplicated(Uuid::new_v4().to_string(), number, actor, now);

        match repo.insert(&copy).await {
            Ok(()) => {}
            Err(e) if e.is_unique_violation() => {
                warn!(
                    number = %copy.quotation_number,
                    "Quotation number collision, retrying with a fresh number"
                );
                copy.quotation_number = repo.next_quotation_number(now).await?;
                repo.insert(&copy).await?;
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            source = %source.quotation_number,
            copy = %copy.quotation_number,
            "Quotation duplicated"
        );
        Ok(copy)
    }

    // -------------------------------------------------------------------------
    // Line Items
    // -------------------------------------------------------------------------

    /// Adds a line item to a draft quotation and recomputes totals.
    pub async fn add_line_item(
        &self,
        id: &str,
        input: LineItemInput,
    ) -> EngineResult<Quotation> {
        let mut quotation = self.load(id).await?;

        if !quotation.status.allows_line_item_edit() {
            return Err(CoreError::InvalidStatus {
                status: quotation.status,
                operation: "add line items",
            }
            .into());
        }

        let item = self.resolve_line_item(&input).await?;
        quotation.add_line_item(item)?;
        quotation.updated_at = Utc::now();
        self.db.quotations().save(&quotation).await?;

        debug!(id = %quotation.id, items = quotation.line_items.len(), "Line item added");
        Ok(quotation)
    }

    /// Applies a partial update to one line item of a draft quotation.
    pub async fn update_line_item(
        &self,
        id: &str,
        line_item_id: &str,
        patch: LineItemPatch,
    ) -> EngineResult<Quotation> {
        let mut quotation = self.load(id).await?;

        if !quotation.status.allows_line_item_edit() {
            return Err(CoreError::InvalidStatus {
                status: quotation.status,
                operation: "update line items",
            }
            .into());
        }

        // Validate the whole patch before touching the document.
        if let Some(quantity) = patch.quantity {
            validation::validate_quantity(quantity)?;
        }
        if let Some(price) = patch.unit_price_paise {
            validation::validate_price_paise(price)?;
        }
        if let Some(discount) = &patch.discount {
            validation::validate_discount(discount)?;
        }

        let item = quotation
            .line_item_mut(line_item_id)
            .ok_or_else(|| EngineError::not_found("Line item", line_item_id))?;

        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = patch.unit_price_paise {
            item.unit_price_paise = price;
        }
        if let Some(discount) = patch.discount {
            item.discount = discount;
        }
        if let Some(variant) = patch.variant {
            item.variant = if variant.is_empty() { None } else { Some(variant) };
        }
        if let Some(unit) = patch.unit {
            item.unit = unit;
        }
        if let Some(notes) = patch.notes {
            item.notes = Some(notes);
        }

        quotation.recompute_totals();
        quotation.updated_at = Utc::now();
        self.db.quotations().save(&quotation).await?;

        debug!(id = %quotation.id, line_item = %line_item_id, "Line item updated");
        Ok(quotation)
    }

    /// Removes a line item from a draft quotation and recomputes totals.
    pub async fn remove_line_item(
        &self,
        id: &str,
        line_item_id: &str,
    ) -> EngineResult<Quotation> {
        let mut quotation = self.load(id).await?;

        if !quotation.status.allows_line_item_edit() {
            return Err(CoreError::InvalidStatus {
                status: quotation.status,
                operation: "remove line items",
            }
            .into());
        }

        quotation.remove_line_item(line_item_id)?;
        quotation.updated_at = Utc::now();
        self.db.quotations().save(&quotation).await?;

        debug!(id = %quotation.id, line_item = %line_item_id, "Line item removed");
        Ok(quotation)
    }

    // -------------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------------

    /// Deletes a draft quotation. Any other status is refused.
    pub async fn delete(&self, id: &str) -> EngineResult<()> {
        let quotation = self.load(id).await?;

        if !quotation.status.allows_delete() {
            return Err(CoreError::InvalidStatus {
                status: quotation.status,
                operation: "be deleted",
            }
            .into());
        }

        self.db.quotations().delete(&quotation.id).await?;

        info!(id = %quotation.id, number = %quotation.quotation_number, "Quotation deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Email Audit
    // -------------------------------------------------------------------------

    /// Records that the (external) mailer sent this quotation to an
    /// address. Allowed in any status; purely an audit append.
    pub async fn record_email_sent(
        &self,
        actor: &Actor,
        id: &str,
        sent_to: &str,
    ) -> EngineResult<Quotation> {
        let sent_to = sent_to.trim();
        if sent_to.is_empty() {
            return Err(EngineError::validation("sentTo is required"));
        }

        let mut quotation = self.load(id).await?;
        quotation.email_history.push(EmailEntry {
            sent_to: sent_to.to_lowercase(),
            sent_at: Utc::now(),
            sent_by: actor.id.clone(),
            sent_by_name: actor.name.clone(),
        });
        quotation.updated_at = Utc::now();
        self.db.quotations().save(&quotation).await?;

        debug!(id = %quotation.id, sent_to = %sent_to, "Email recorded");
        Ok(quotation)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    async fn load(&self, id: &str) -> EngineResult<Quotation> {
        self.db
            .quotations()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Quotation", id))
    }

    /// Resolves a line-item input against the catalog: validates the
    /// commercial fields, snapshots the product, and picks the unit
    /// price (caller override → color price → base price).
    async fn resolve_line_item(&self, input: &LineItemInput) -> EngineResult<LineItem> {
        validation::validate_quantity(input.quantity)?;

        let discount = input.discount.unwrap_or_default();
        validation::validate_discount(&discount)?;

        if let Some(price) = input.unit_price_paise {
            validation::validate_price_paise(price)?;
        }

        let product = self
            .db
            .products()
            .get_by_id(&input.product_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", &input.product_id))?;

        let unit_price = match input.unit_price_paise {
            Some(paise) => Money::from_paise(paise),
            None => match input.variant.as_ref().and_then(|v| v.color.as_deref()) {
                Some(color) => product.price_for_color(color),
                None => product.selling_price(),
            },
        };

        let mut item = LineItem::new(
            &product,
            unit_price,
            input.quantity,
            discount,
            input.variant.clone().filter(|v| !v.is_empty()),
            input.notes.clone(),
        );
        if let Some(unit) = &input.unit {
            item.unit = unit.clone();
        }

        Ok(item)
    }
}
