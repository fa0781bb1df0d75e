//! Shared helpers for engine integration tests.
//!
//! Every test runs against its own in-memory SQLite database with the
//! real migrations applied, driving the engine exactly the way the HTTP
//! layer does.

#![allow(dead_code)]

use quoteflow_core::types::{Actor, Customer, Product};
use quoteflow_db::{Database, DbConfig};
use quoteflow_engine::types::{CreateProductInput, CreateQuotationInput, LineItemInput};
use quoteflow_engine::Engine;

/// Builds an engine over a fresh in-memory database.
pub async fn test_engine() -> Engine {
    // Surface engine logs when running with RUST_LOG=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database");
    Engine::new(db)
}

pub fn actor() -> Actor {
    Actor {
        id: "user-1".to_string(),
        name: "Asha Iyer".to_string(),
    }
}

pub fn customer(name: &str) -> Customer {
    Customer {
        name: name.to_string(),
        ..Customer::default()
    }
}

/// Seeds one standalone product and returns it.
pub async fn seed_product(
    engine: &Engine,
    sku: &str,
    name: &str,
    selling_price_paise: i64,
) -> Product {
    engine
        .products()
        .create(CreateProductInput {
            sku: sku.to_string(),
            name: name.to_string(),
            category: Some("basins".to_string()),
            selling_price_paise,
            purchase_price_paise: Some(selling_price_paise * 62 / 100),
            quantity: Some(40),
            ..CreateProductInput::default()
        })
        .await
        .expect("seed product")
}

/// A minimal line-item input: product + quantity, everything else
/// auto-filled by the engine.
pub fn line(product_id: &str, quantity: i64) -> LineItemInput {
    LineItemInput {
        product_id: product_id.to_string(),
        quantity,
        ..LineItemInput::default()
    }
}

/// A create input with the given customer name and line items.
pub fn create_input(customer_name: &str, line_items: Vec<LineItemInput>) -> CreateQuotationInput {
    CreateQuotationInput {
        customer: customer(customer_name),
        line_items,
        ..CreateQuotationInput::default()
    }
}
