//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Full-text search using FTS5
//! - CRUD operations
//! - Stock updates
//!
//! ## FTS5 Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How FTS5 Search Works                                │
//! │                                                                         │
//! │  User types: "basin"                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FTS5 searches across: sku, name, description                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ products_fts (virtual table)            │                           │
//! │  │                                         │                           │
//! │  │ BAS-201 | Orion Counter Basin   | ...  │ ← MATCH!                  │
//! │  │ BAS-305 | Vega Pedestal Basin   | ...  │ ← MATCH!                  │
//! │  │ WC-1042 | Alto Wall-Hung Closet | ...  │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [BAS-201, BAS-305]                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use quoteflow_core::types::{
    ColorPrice, Product, ProductStructure, ProductVariant, SetComponent,
};

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw product row. JSON columns stay as TEXT here and are decoded in
/// the `TryFrom` conversion so one corrupted row fails loudly instead of
/// silently losing data.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    sku: String,
    name: String,
    description: Option<String>,
    category: Option<String>,
    structure: ProductStructure,
    selling_price_paise: i64,
    purchase_price_paise: i64,
    mrp_paise: Option<i64>,
    price_by_color: String,
    variants: String,
    set_components: String,
    set_price_paise: Option<i64>,
    quantity: i64,
    unit: String,
    low_stock_threshold: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Product> {
        let price_by_color: Vec<ColorPrice> = serde_json::from_str(&row.price_by_color)
            .map_err(|e| DbError::decode("Product", format!("price_by_color: {e}")))?;
        let variants: Vec<ProductVariant> = serde_json::from_str(&row.variants)
            .map_err(|e| DbError::decode("Product", format!("variants: {e}")))?;
        let set_components: Vec<SetComponent> = serde_json::from_str(&row.set_components)
            .map_err(|e| DbError::decode("Product", format!("set_components: {e}")))?;

        Ok(Product {
            id: row.id,
            sku: row.sku,
            name: row.name,
            description: row.description,
            category: row.category,
            structure: row.structure,
            selling_price_paise: row.selling_price_paise,
            purchase_price_paise: row.purchase_price_paise,
            mrp_paise: row.mrp_paise,
            price_by_color,
            variants,
            set_components,
            set_price_paise: row.set_price_paise,
            quantity: row.quantity,
            unit: row.unit,
            low_stock_threshold: row.low_stock_threshold,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> DbResult<String> {
    serde_json::to_string(value).map_err(|e| DbError::Internal(e.to_string()))
}

const PRODUCT_COLUMNS: &str = "\
    id, sku, name, description, category, structure, \
    selling_price_paise, purchase_price_paise, mrp_paise, \
    price_by_color, variants, set_components, set_price_paise, \
    quantity, unit, low_stock_threshold, is_active, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Search products
/// let results = repo.search("basin", 20).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches active products using full-text search.
    ///
    /// ## How It Works
    /// 1. Uses the FTS5 virtual table for indexed search
    /// 2. Searches across: SKU, name, description
    /// 3. Appends `*` for prefix matching ("bas" matches "BAS-201")
    ///
    /// An empty query falls back to listing active products by name.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        let fts_query = format!("\"{}\"*", query.replace('"', ""));

        let sql = format!(
            "SELECT {cols}
             FROM products p
             INNER JOIN products_fts fts ON p.rowid = fts.rowid
             WHERE products_fts MATCH ?1
             AND p.is_active = 1
             ORDER BY rank
             LIMIT ?2",
            cols = PRODUCT_COLUMNS
                .split(", ")
                .map(|c| format!("p.{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(&fts_query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned products");
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Lists active products sorted by name (no search filter).
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE is_active = 1
             ORDER BY name
             LIMIT ?1"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product by its SKU (case-sensitive, stored uppercase).
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Inserts a new product.
    ///
    /// A duplicate SKU surfaces as `DbError::UniqueViolation`.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, sku, name, description, category, structure,
                selling_price_paise, purchase_price_paise, mrp_paise,
                price_by_color, variants, set_components, set_price_paise,
                quantity, unit, low_stock_threshold, is_active,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17,
                ?18, ?19
            )",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.structure)
        .bind(product.selling_price_paise)
        .bind(product.purchase_price_paise)
        .bind(product.mrp_paise)
        .bind(to_json(&product.price_by_color)?)
        .bind(to_json(&product.variants)?)
        .bind(to_json(&product.set_components)?)
        .bind(product.set_price_paise)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(product.low_stock_threshold)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product in full.
    ///
    /// The SKU is part of the update; renaming onto an existing SKU
    /// surfaces as `DbError::UniqueViolation`.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, sku = %product.sku, "Updating product");

        let result = sqlx::query(
            "UPDATE products SET
                sku = ?2,
                name = ?3,
                description = ?4,
                category = ?5,
                structure = ?6,
                selling_price_paise = ?7,
                purchase_price_paise = ?8,
                mrp_paise = ?9,
                price_by_color = ?10,
                variants = ?11,
                set_components = ?12,
                set_price_paise = ?13,
                quantity = ?14,
                unit = ?15,
                low_stock_threshold = ?16,
                is_active = ?17,
                updated_at = ?18
            WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.structure)
        .bind(product.selling_price_paise)
        .bind(product.purchase_price_paise)
        .bind(product.mrp_paise)
        .bind(to_json(&product.price_by_color)?)
        .bind(to_json(&product.variants)?)
        .bind(to_json(&product.set_components)?)
        .bind(product.set_price_paise)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(product.low_stock_threshold)
        .bind(product.is_active)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deactivates a product (soft delete).
    ///
    /// Quotation line items keep their snapshots, so deactivation never
    /// touches existing documents.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts all products (active and inactive).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use quoteflow_core::types::ProductStructure;

    fn sample_product(sku: &str, name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            name: name.to_string(),
            description: Some("Vitreous china".to_string()),
            category: Some("basins".to_string()),
            structure: ProductStructure::Standalone,
            selling_price_paise: 100000,
            purchase_price_paise: 62000,
            mrp_paise: Some(125000),
            price_by_color: vec![ColorPrice {
                color: "Ivory".to_string(),
                price_paise: 110000,
            }],
            variants: Vec::new(),
            set_components: Vec::new(),
            set_price_paise: None,
            quantity: 40,
            unit: "pcs".to_string(),
            low_stock_threshold: 10,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("BAS-201", "Orion Counter Basin");
        repo.insert(&product).await.unwrap();

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.sku, "BAS-201");
        assert_eq!(loaded.price_by_color.len(), 1);
        assert_eq!(loaded.price_by_color[0].price_paise, 110000);

        let by_sku = repo.get_by_sku("BAS-201").await.unwrap().unwrap();
        assert_eq!(by_sku.id, product.id);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("BAS-201", "Orion Counter Basin"))
            .await
            .unwrap();
        let err = repo
            .insert(&sample_product("BAS-201", "Different Basin"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_fts_search_finds_by_prefix() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("BAS-201", "Orion Counter Basin"))
            .await
            .unwrap();
        repo.insert(&sample_product("WC-1042", "Alto Wall-Hung Closet"))
            .await
            .unwrap();

        let results = repo.search("basin", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sku, "BAS-201");

        // prefix of the SKU
        let results = repo.search("BAS", 10).await.unwrap();
        assert_eq!(results.len(), 1);

        // empty query lists everything active
        let results = repo.search("", 10).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_search() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("BAS-201", "Orion Counter Basin");
        repo.insert(&product).await.unwrap();
        repo.deactivate(&product.id).await.unwrap();

        assert!(repo.search("basin", 10).await.unwrap().is_empty());
        // still loadable by id for snapshot resolution
        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert!(!loaded.is_active);
    }

    #[tokio::test]
    async fn test_update_rows_affected_guard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut product = sample_product("BAS-201", "Orion Counter Basin");
        let err = repo.update(&product).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        repo.insert(&product).await.unwrap();
        product.selling_price_paise = 120000;
        repo.update(&product).await.unwrap();

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.selling_price_paise, 120000);
    }
}
