//! # Product Service
//!
//! Catalog management plus the product lookup the quotation engine
//! consumes when it snapshots line items.
//!
//! Products are soft-deleted (`is_active = false`): quotations keep
//! their frozen snapshots, so removing a product from the catalog never
//! rewrites history.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use quoteflow_core::types::{Product, ProductStructure};
use quoteflow_core::{validation, DEFAULT_UNIT};
use quoteflow_db::Database;

use crate::error::{EngineError, EngineResult};
use crate::types::{CreateProductInput, UpdateProductInput};

/// Catalog operations exposed to the HTTP layer.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    /// Creates a new ProductService.
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Creates a catalog product. The SKU is stored uppercase and must
    /// be unique.
    pub async fn create(&self, input: CreateProductInput) -> EngineResult<Product> {
        let sku = input.sku.trim().to_uppercase();
        validation::validate_sku(&sku)?;
        validation::validate_product_name(&input.name)?;
        validation::validate_price_paise(input.selling_price_paise)?;
        if let Some(price) = input.purchase_price_paise {
            validation::validate_price_paise(price)?;
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku,
            name: input.name.trim().to_string(),
            description: input.description,
            category: input.category,
            structure: input.structure.unwrap_or(ProductStructure::Standalone),
            selling_price_paise: input.selling_price_paise,
            purchase_price_paise: input.purchase_price_paise.unwrap_or(0),
            mrp_paise: input.mrp_paise,
            price_by_color: input.price_by_color,
            variants: input.variants,
            set_components: input.set_components,
            set_price_paise: input.set_price_paise,
            quantity: input.quantity.unwrap_or(0),
            unit: input
                .unit
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            low_stock_threshold: input.low_stock_threshold.unwrap_or(10),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        match self.db.products().insert(&product).await {
            Ok(()) => {}
            Err(e) if e.is_unique_violation() => {
                return Err(EngineError::validation(format!(
                    "sku '{}' already exists",
                    product.sku
                )));
            }
            Err(e) => return Err(e.into()),
        }

        info!(id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Loads a product by ID.
    pub async fn get(&self, id: &str) -> EngineResult<Product> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", id))
    }

    /// Loads a product by SKU (case-insensitive: SKUs are stored
    /// uppercase).
    pub async fn get_by_sku(&self, sku: &str) -> EngineResult<Product> {
        let sku = sku.trim().to_uppercase();
        self.db
            .products()
            .get_by_sku(&sku)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", &sku))
    }

    /// Full-text search over the active catalog.
    pub async fn search(&self, query: &str, limit: u32) -> EngineResult<Vec<Product>> {
        let query = validation::validate_search_query(query)?;
        Ok(self.db.products().search(&query, limit.clamp(1, 100)).await?)
    }

    /// Applies a partial update to a product.
    ///
    /// The SKU is immutable: quotations print it, and existing snapshots
    /// should stay traceable to the catalog entry they came from.
    pub async fn update(&self, id: &str, input: UpdateProductInput) -> EngineResult<Product> {
        let mut product = self.get(id).await?;

        if let Some(name) = input.name {
            validation::validate_product_name(&name)?;
            product.name = name.trim().to_string();
        }
        if let Some(price) = input.selling_price_paise {
            validation::validate_price_paise(price)?;
            product.selling_price_paise = price;
        }
        if let Some(price) = input.purchase_price_paise {
            validation::validate_price_paise(price)?;
            product.purchase_price_paise = price;
        }
        if let Some(description) = input.description {
            product.description = Some(description);
        }
        if let Some(category) = input.category {
            product.category = Some(category);
        }
        if let Some(structure) = input.structure {
            product.structure = structure;
        }
        if let Some(mrp) = input.mrp_paise {
            product.mrp_paise = Some(mrp);
        }
        if let Some(price_by_color) = input.price_by_color {
            product.price_by_color = price_by_color;
        }
        if let Some(variants) = input.variants {
            product.variants = variants;
        }
        if let Some(set_components) = input.set_components {
            product.set_components = set_components;
        }
        if let Some(set_price) = input.set_price_paise {
            product.set_price_paise = Some(set_price);
        }
        if let Some(quantity) = input.quantity {
            product.quantity = quantity;
        }
        if let Some(unit) = input.unit {
            product.unit = unit;
        }
        if let Some(threshold) = input.low_stock_threshold {
            product.low_stock_threshold = threshold;
        }

        product.updated_at = Utc::now();
        self.db.products().update(&product).await?;

        debug!(id = %product.id, sku = %product.sku, "Product updated");
        Ok(product)
    }

    /// Deactivates a product (soft delete). Existing quotations are
    /// unaffected; the product stops appearing in search.
    pub async fn deactivate(&self, id: &str) -> EngineResult<()> {
        self.db.products().deactivate(id).await?;
        info!(id = %id, "Product deactivated");
        Ok(())
    }
}
