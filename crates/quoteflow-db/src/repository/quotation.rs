//! # Quotation Repository
//!
//! Database operations for quotation documents.
//!
//! ## Document Shape
//! A quotation spans four tables (header, line items, status history,
//! email history). The repository always reads and writes the document as
//! a whole:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Quotation Persistence                                 │
//! │                                                                         │
//! │  insert(q) ── BEGIN                                                    │
//! │               INSERT header (totals included)                          │
//! │               INSERT line items (position-ordered)                     │
//! │               INSERT status/email history                              │
//! │               COMMIT                                                   │
//! │                                                                         │
//! │  save(q) ──── BEGIN                                                    │
//! │               UPDATE header      ← 0 rows? → NotFound, ROLLBACK        │
//! │               DELETE children                                          │
//! │               INSERT children    (replace-on-save)                     │
//! │               COMMIT                                                   │
//! │                                                                         │
//! │  A reader can never observe line items inconsistent with totals:       │
//! │  both live in the same transaction.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Number Allocation
//! `QT-<year>-NNNN` sequences come from the `quotation_counters` table,
//! bumped with a single `INSERT .. ON CONFLICT DO UPDATE .. RETURNING`
//! statement. Two concurrent creations get distinct sequence values; the
//! UNIQUE index on `quotation_number` remains as a backstop.

use chrono::{DateTime, Datelike, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use quoteflow_core::status::QuotationStatus;
use quoteflow_core::types::{
    Address, ComponentRef, Customer, Discount, EmailEntry, LineItem, ProductStructure, Quotation,
    StatusEntry, VariantChoice,
};

// =============================================================================
// Listing Parameters
// =============================================================================

/// Whitelisted sort fields for quotation listings.
///
/// Only these columns are ever interpolated into ORDER BY; everything
/// user-supplied goes through bind parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationSortField {
    QuotationDate,
    CreatedAt,
    ValidUntil,
    QuotationNumber,
    CustomerName,
    GrandTotal,
    Status,
}

impl QuotationSortField {
    const fn column(&self) -> &'static str {
        match self {
            QuotationSortField::QuotationDate => "quotation_date",
            QuotationSortField::CreatedAt => "created_at",
            QuotationSortField::ValidUntil => "valid_until",
            QuotationSortField::QuotationNumber => "quotation_number",
            QuotationSortField::CustomerName => "customer_name",
            QuotationSortField::GrandTotal => "grand_total_paise",
            QuotationSortField::Status => "status",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    const fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filter, sort and pagination parameters for `list`.
#[derive(Debug, Clone)]
pub struct QuotationFilter {
    /// Exact status match.
    pub status: Option<QuotationStatus>,
    /// Case-insensitive substring over customer name/email/company.
    pub customer: Option<String>,
    /// Inclusive lower bound on quotation_date.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on quotation_date.
    pub date_to: Option<DateTime<Utc>>,
    /// Free-text search over number, customer name and reference.
    pub search: Option<String>,
    pub sort: QuotationSortField,
    pub order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl Default for QuotationFilter {
    fn default() -> Self {
        QuotationFilter {
            status: None,
            customer: None,
            date_from: None,
            date_to: None,
            search: None,
            sort: QuotationSortField::QuotationDate,
            order: SortOrder::Desc,
            page: 1,
            limit: 50,
        }
    }
}

/// One row of the per-status rollup used by the dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusRollup {
    pub status: QuotationStatus,
    pub count: i64,
    pub total_paise: i64,
}

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: String,
    quotation_number: String,
    quotation_date: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    reference_number: Option<String>,
    status: QuotationStatus,
    customer_name: String,
    customer_company: Option<String>,
    customer_contact: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    customer_gst: Option<String>,
    billing_address: String,
    shipping_address: String,
    customer_notes: Option<String>,
    subtotal_paise: i64,
    overall_discount_type: String,
    overall_discount_value: i64,
    amount_after_discount_paise: i64,
    tax_rate_bps: i64,
    tax_amount_paise: i64,
    grand_total_paise: i64,
    currency: String,
    terms_and_conditions: String,
    payment_terms: String,
    delivery_terms: String,
    special_instructions: Option<String>,
    internal_notes: Option<String>,
    created_by: String,
    created_by_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuotationRow {
    /// Converts the header row into a `Quotation` with empty child
    /// collections; the repository fills them in afterwards.
    fn into_quotation(self) -> DbResult<Quotation> {
        let billing_address: Address = serde_json::from_str(&self.billing_address)
            .map_err(|e| DbError::decode("Quotation", format!("billing_address: {e}")))?;
        let shipping_address: Address = serde_json::from_str(&self.shipping_address)
            .map_err(|e| DbError::decode("Quotation", format!("shipping_address: {e}")))?;
        let overall_discount =
            Discount::from_parts(&self.overall_discount_type, self.overall_discount_value)
                .map_err(|e| DbError::decode("Quotation", e.to_string()))?;

        Ok(Quotation {
            id: self.id,
            quotation_number: self.quotation_number,
            quotation_date: self.quotation_date,
            valid_until: self.valid_until,
            reference_number: self.reference_number,
            status: self.status,
            customer: Customer {
                name: self.customer_name,
                company_name: self.customer_company,
                contact_person: self.customer_contact,
                email: self.customer_email,
                phone: self.customer_phone,
                gst_number: self.customer_gst,
                billing_address,
                shipping_address,
                customer_notes: self.customer_notes,
            },
            line_items: Vec::new(),
            subtotal_paise: self.subtotal_paise,
            overall_discount,
            amount_after_discount_paise: self.amount_after_discount_paise,
            tax_rate_bps: self.tax_rate_bps as u32,
            tax_amount_paise: self.tax_amount_paise,
            grand_total_paise: self.grand_total_paise,
            currency: self.currency,
            terms_and_conditions: self.terms_and_conditions,
            payment_terms: self.payment_terms,
            delivery_terms: self.delivery_terms,
            special_instructions: self.special_instructions,
            internal_notes: self.internal_notes,
            created_by: self.created_by,
            created_by_name: self.created_by_name,
            status_history: Vec::new(),
            email_history: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: String,
    quotation_id: String,
    product_id: String,
    product_code: String,
    product_name: String,
    product_type: ProductStructure,
    variant: Option<String>,
    components: String,
    unit_price_paise: i64,
    quantity: i64,
    unit: String,
    discount_type: String,
    discount_value: i64,
    line_subtotal_paise: i64,
    line_total_paise: i64,
    notes: Option<String>,
}

impl LineItemRow {
    fn into_line_item(self) -> DbResult<LineItem> {
        let variant: Option<VariantChoice> = match &self.variant {
            Some(json) => Some(
                serde_json::from_str(json)
                    .map_err(|e| DbError::decode("LineItem", format!("variant: {e}")))?,
            ),
            None => None,
        };
        let components: Vec<ComponentRef> = serde_json::from_str(&self.components)
            .map_err(|e| DbError::decode("LineItem", format!("components: {e}")))?;
        let discount = Discount::from_parts(&self.discount_type, self.discount_value)
            .map_err(|e| DbError::decode("LineItem", e.to_string()))?;

        Ok(LineItem {
            id: self.id,
            product_id: self.product_id,
            product_code: self.product_code,
            product_name: self.product_name,
            product_type: self.product_type,
            variant,
            components,
            unit_price_paise: self.unit_price_paise,
            quantity: self.quantity,
            unit: self.unit,
            discount,
            line_subtotal_paise: self.line_subtotal_paise,
            line_total_paise: self.line_total_paise,
            notes: self.notes,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusEntryRow {
    quotation_id: String,
    status: QuotationStatus,
    changed_at: DateTime<Utc>,
    changed_by: String,
    changed_by_name: String,
    notes: String,
}

#[derive(Debug, sqlx::FromRow)]
struct EmailEntryRow {
    quotation_id: String,
    sent_to: String,
    sent_at: DateTime<Utc>,
    sent_by: String,
    sent_by_name: String,
}

const QUOTATION_COLUMNS: &str = "\
    id, quotation_number, quotation_date, valid_until, reference_number, status, \
    customer_name, customer_company, customer_contact, customer_email, \
    customer_phone, customer_gst, billing_address, shipping_address, customer_notes, \
    subtotal_paise, overall_discount_type, overall_discount_value, \
    amount_after_discount_paise, tax_rate_bps, tax_amount_paise, grand_total_paise, \
    currency, terms_and_conditions, payment_terms, delivery_terms, \
    special_instructions, internal_notes, created_by, created_by_name, \
    created_at, updated_at";

fn to_json<T: serde::Serialize>(value: &T) -> DbResult<String> {
    serde_json::to_string(value).map_err(|e| DbError::Internal(e.to_string()))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for quotation database operations.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
}

impl QuotationRepository {
    /// Creates a new QuotationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuotationRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Number Allocation
    // -------------------------------------------------------------------------

    /// Allocates the next quotation number for the given timestamp's
    /// calendar year, formatted `QT-<year>-NNNN`.
    ///
    /// One atomic statement: concurrent callers each get a distinct
    /// sequence value. Sequence values consumed by a failed insert leave
    /// a gap, which is acceptable for quotation numbering.
    pub async fn next_quotation_number(&self, now: DateTime<Utc>) -> DbResult<String> {
        let year = now.year();

        let seq: i64 = sqlx::query_scalar(
            "INSERT INTO quotation_counters (year, seq) VALUES (?1, 1)
             ON CONFLICT(year) DO UPDATE SET seq = seq + 1
             RETURNING seq",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(format!("QT-{year}-{seq:04}"))
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Inserts a complete quotation document in one transaction.
    ///
    /// A colliding quotation number surfaces as `DbError::UniqueViolation`.
    pub async fn insert(&self, quotation: &Quotation) -> DbResult<()> {
        debug!(id = %quotation.id, number = %quotation.quotation_number, "Inserting quotation");

        let mut tx = self.pool.begin().await?;
        insert_header(&mut tx, quotation).await?;
        insert_children(&mut tx, quotation).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Saves an existing quotation document in one transaction.
    ///
    /// Replace-on-save: the header row is updated and all child rows are
    /// rewritten, so the persisted document always matches the in-memory
    /// one that was recomputed by the engine.
    pub async fn save(&self, quotation: &Quotation) -> DbResult<()> {
        debug!(id = %quotation.id, status = %quotation.status, "Saving quotation");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE quotations SET
                quotation_date = ?2,
                valid_until = ?3,
                reference_number = ?4,
                status = ?5,
                customer_name = ?6,
                customer_company = ?7,
                customer_contact = ?8,
                customer_email = ?9,
                customer_phone = ?10,
                customer_gst = ?11,
                billing_address = ?12,
                shipping_address = ?13,
                customer_notes = ?14,
                subtotal_paise = ?15,
                overall_discount_type = ?16,
                overall_discount_value = ?17,
                amount_after_discount_paise = ?18,
                tax_rate_bps = ?19,
                tax_amount_paise = ?20,
                grand_total_paise = ?21,
                currency = ?22,
                terms_and_conditions = ?23,
                payment_terms = ?24,
                delivery_terms = ?25,
                special_instructions = ?26,
                internal_notes = ?27,
                updated_at = ?28
            WHERE id = ?1",
        )
        .bind(&quotation.id)
        .bind(quotation.quotation_date)
        .bind(quotation.valid_until)
        .bind(&quotation.reference_number)
        .bind(quotation.status)
        .bind(&quotation.customer.name)
        .bind(&quotation.customer.company_name)
        .bind(&quotation.customer.contact_person)
        .bind(&quotation.customer.email)
        .bind(&quotation.customer.phone)
        .bind(&quotation.customer.gst_number)
        .bind(to_json(&quotation.customer.billing_address)?)
        .bind(to_json(&quotation.customer.shipping_address)?)
        .bind(&quotation.customer.customer_notes)
        .bind(quotation.subtotal_paise)
        .bind(quotation.overall_discount.kind())
        .bind(quotation.overall_discount.raw_value())
        .bind(quotation.amount_after_discount_paise)
        .bind(quotation.tax_rate_bps as i64)
        .bind(quotation.tax_amount_paise)
        .bind(quotation.grand_total_paise)
        .bind(&quotation.currency)
        .bind(&quotation.terms_and_conditions)
        .bind(&quotation.payment_terms)
        .bind(&quotation.delivery_terms)
        .bind(&quotation.special_instructions)
        .bind(&quotation.internal_notes)
        .bind(quotation.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", &quotation.id));
        }

        for table in [
            "quotation_line_items",
            "quotation_status_history",
            "quotation_email_history",
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE quotation_id = ?1"))
                .bind(&quotation.id)
                .execute(&mut *tx)
                .await?;
        }

        insert_children(&mut tx, quotation).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Deletes a quotation document; child rows cascade.
    ///
    /// Status guards (draft-only) are enforced by the engine, which loads
    /// the document first.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting quotation");

        let result = sqlx::query("DELETE FROM quotations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Loads a complete quotation document by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quotation>> {
        let sql = format!("SELECT {QUOTATION_COLUMNS} FROM quotations WHERE id = ?1");

        let row: Option<QuotationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut quotation = row.into_quotation()?;
        self.attach_children(std::slice::from_mut(&mut quotation))
            .await?;

        Ok(Some(quotation))
    }

    /// Loads a complete quotation document by its business number.
    pub async fn get_by_number(&self, quotation_number: &str) -> DbResult<Option<Quotation>> {
        let sql =
            format!("SELECT {QUOTATION_COLUMNS} FROM quotations WHERE quotation_number = ?1");

        let row: Option<QuotationRow> = sqlx::query_as(&sql)
            .bind(quotation_number)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut quotation = row.into_quotation()?;
        self.attach_children(std::slice::from_mut(&mut quotation))
            .await?;

        Ok(Some(quotation))
    }

    /// Lists quotations with filters, sorting and pagination.
    ///
    /// ## Returns
    /// The requested page of fully-assembled documents plus the total
    /// match count (for page-count display).
    pub async fn list(&self, filter: &QuotationFilter) -> DbResult<(Vec<Quotation>, i64)> {
        debug!(?filter, "Listing quotations");

        // Total count with the same WHERE clause
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM quotations WHERE 1=1");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        // Page of header rows
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {QUOTATION_COLUMNS} FROM quotations WHERE 1=1"
        ));
        push_filters(&mut qb, filter);
        qb.push(format!(
            " ORDER BY {} {}",
            filter.sort.column(),
            filter.order.keyword()
        ));

        let limit = filter.limit.max(1);
        let offset = (filter.page.max(1) - 1) as i64 * limit as i64;
        qb.push(" LIMIT ").push_bind(limit as i64);
        qb.push(" OFFSET ").push_bind(offset);

        let rows: Vec<QuotationRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        let mut quotations = rows
            .into_iter()
            .map(QuotationRow::into_quotation)
            .collect::<DbResult<Vec<_>>>()?;
        self.attach_children(&mut quotations).await?;

        Ok((quotations, total))
    }

    /// The most recently created quotations (dashboard widget).
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<Quotation>> {
        let sql = format!(
            "SELECT {QUOTATION_COLUMNS} FROM quotations
             ORDER BY created_at DESC
             LIMIT ?1"
        );

        let rows: Vec<QuotationRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut quotations = rows
            .into_iter()
            .map(QuotationRow::into_quotation)
            .collect::<DbResult<Vec<_>>>()?;
        self.attach_children(&mut quotations).await?;

        Ok(quotations)
    }

    /// Per-status document count and grand-total value.
    pub async fn status_rollup(&self) -> DbResult<Vec<StatusRollup>> {
        let rows: Vec<StatusRollup> = sqlx::query_as(
            "SELECT status,
                    COUNT(*) AS count,
                    COALESCE(SUM(grand_total_paise), 0) AS total_paise
             FROM quotations
             GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts all quotations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Child Assembly
    // -------------------------------------------------------------------------

    /// Loads line items and audit logs for the given quotations in three
    /// batched queries and attaches them in position order.
    async fn attach_children(&self, quotations: &mut [Quotation]) -> DbResult<()> {
        if quotations.is_empty() {
            return Ok(());
        }

        let ids: Vec<&str> = quotations.iter().map(|q| q.id.as_str()).collect();

        let mut items: HashMap<String, Vec<LineItem>> = HashMap::new();
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, quotation_id, product_id, product_code, product_name, product_type,
                    variant, components, unit_price_paise, quantity, unit,
                    discount_type, discount_value, line_subtotal_paise, line_total_paise, notes
             FROM quotation_line_items WHERE quotation_id IN (",
        );
        push_id_list(&mut qb, &ids);
        qb.push(") ORDER BY quotation_id, position");
        let item_rows: Vec<LineItemRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        for row in item_rows {
            let key = row.quotation_id.clone();
            items.entry(key).or_default().push(row.into_line_item()?);
        }

        let mut history: HashMap<String, Vec<StatusEntry>> = HashMap::new();
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT quotation_id, status, changed_at, changed_by, changed_by_name, notes
             FROM quotation_status_history WHERE quotation_id IN (",
        );
        push_id_list(&mut qb, &ids);
        qb.push(") ORDER BY quotation_id, position");
        let history_rows: Vec<StatusEntryRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        for row in history_rows {
            history.entry(row.quotation_id).or_default().push(StatusEntry {
                status: row.status,
                changed_at: row.changed_at,
                changed_by: row.changed_by,
                changed_by_name: row.changed_by_name,
                notes: row.notes,
            });
        }

        let mut emails: HashMap<String, Vec<EmailEntry>> = HashMap::new();
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT quotation_id, sent_to, sent_at, sent_by, sent_by_name
             FROM quotation_email_history WHERE quotation_id IN (",
        );
        push_id_list(&mut qb, &ids);
        qb.push(") ORDER BY quotation_id, position");
        let email_rows: Vec<EmailEntryRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        for row in email_rows {
            emails.entry(row.quotation_id).or_default().push(EmailEntry {
                sent_to: row.sent_to,
                sent_at: row.sent_at,
                sent_by: row.sent_by,
                sent_by_name: row.sent_by_name,
            });
        }

        for quotation in quotations {
            quotation.line_items = items.remove(&quotation.id).unwrap_or_default();
            quotation.status_history = history.remove(&quotation.id).unwrap_or_default();
            quotation.email_history = emails.remove(&quotation.id).unwrap_or_default();
        }

        Ok(())
    }
}

// =============================================================================
// Query Helpers
// =============================================================================

/// Appends the shared WHERE conditions for `list` to a query builder.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &QuotationFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(customer) = &filter.customer {
        let pattern = format!("%{}%", customer.trim());
        qb.push(" AND (customer_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR customer_email LIKE ")
            .push_bind(pattern.clone())
            .push(" OR customer_company LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(from) = filter.date_from {
        qb.push(" AND quotation_date >= ").push_bind(from);
    }

    if let Some(to) = filter.date_to {
        qb.push(" AND quotation_date <= ").push_bind(to);
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (quotation_number LIKE ")
            .push_bind(pattern.clone())
            .push(" OR customer_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR reference_number LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Appends a comma-separated bind list of document IDs.
fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[&str]) {
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
}

async fn insert_header(
    tx: &mut Transaction<'_, Sqlite>,
    quotation: &Quotation,
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO quotations (
            id, quotation_number, quotation_date, valid_until, reference_number, status,
            customer_name, customer_company, customer_contact, customer_email,
            customer_phone, customer_gst, billing_address, shipping_address, customer_notes,
            subtotal_paise, overall_discount_type, overall_discount_value,
            amount_after_discount_paise, tax_rate_bps, tax_amount_paise, grand_total_paise,
            currency, terms_and_conditions, payment_terms, delivery_terms,
            special_instructions, internal_notes, created_by, created_by_name,
            created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15,
            ?16, ?17, ?18,
            ?19, ?20, ?21, ?22,
            ?23, ?24, ?25, ?26,
            ?27, ?28, ?29, ?30,
            ?31, ?32
        )",
    )
    .bind(&quotation.id)
    .bind(&quotation.quotation_number)
    .bind(quotation.quotation_date)
    .bind(quotation.valid_until)
    .bind(&quotation.reference_number)
    .bind(quotation.status)
    .bind(&quotation.customer.name)
    .bind(&quotation.customer.company_name)
    .bind(&quotation.customer.contact_person)
    .bind(&quotation.customer.email)
    .bind(&quotation.customer.phone)
    .bind(&quotation.customer.gst_number)
    .bind(to_json(&quotation.customer.billing_address)?)
    .bind(to_json(&quotation.customer.shipping_address)?)
    .bind(&quotation.customer.customer_notes)
    .bind(quotation.subtotal_paise)
    .bind(quotation.overall_discount.kind())
    .bind(quotation.overall_discount.raw_value())
    .bind(quotation.amount_after_discount_paise)
    .bind(quotation.tax_rate_bps as i64)
    .bind(quotation.tax_amount_paise)
    .bind(quotation.grand_total_paise)
    .bind(&quotation.currency)
    .bind(&quotation.terms_and_conditions)
    .bind(&quotation.payment_terms)
    .bind(&quotation.delivery_terms)
    .bind(&quotation.special_instructions)
    .bind(&quotation.internal_notes)
    .bind(&quotation.created_by)
    .bind(&quotation.created_by_name)
    .bind(quotation.created_at)
    .bind(quotation.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_children(
    tx: &mut Transaction<'_, Sqlite>,
    quotation: &Quotation,
) -> DbResult<()> {
    for (position, item) in quotation.line_items.iter().enumerate() {
        let variant_json = match &item.variant {
            Some(variant) => Some(to_json(variant)?),
            None => None,
        };

        sqlx::query(
            "INSERT INTO quotation_line_items (
                id, quotation_id, position, product_id, product_code, product_name,
                product_type, variant, components, unit_price_paise, quantity, unit,
                discount_type, discount_value, line_subtotal_paise, line_total_paise, notes
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17
            )",
        )
        .bind(&item.id)
        .bind(&quotation.id)
        .bind(position as i64)
        .bind(&item.product_id)
        .bind(&item.product_code)
        .bind(&item.product_name)
        .bind(item.product_type)
        .bind(variant_json)
        .bind(to_json(&item.components)?)
        .bind(item.unit_price_paise)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.discount.kind())
        .bind(item.discount.raw_value())
        .bind(item.line_subtotal_paise)
        .bind(item.line_total_paise)
        .bind(&item.notes)
        .execute(&mut **tx)
        .await?;
    }

    for (position, entry) in quotation.status_history.iter().enumerate() {
        sqlx::query(
            "INSERT INTO quotation_status_history (
                id, quotation_id, position, status, changed_at,
                changed_by, changed_by_name, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&quotation.id)
        .bind(position as i64)
        .bind(entry.status)
        .bind(entry.changed_at)
        .bind(&entry.changed_by)
        .bind(&entry.changed_by_name)
        .bind(&entry.notes)
        .execute(&mut **tx)
        .await?;
    }

    for (position, entry) in quotation.email_history.iter().enumerate() {
        sqlx::query(
            "INSERT INTO quotation_email_history (
                id, quotation_id, position, sent_to, sent_at, sent_by, sent_by_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&quotation.id)
        .bind(position as i64)
        .bind(&entry.sent_to)
        .bind(entry.sent_at)
        .bind(&entry.sent_by)
        .bind(&entry.sent_by_name)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
