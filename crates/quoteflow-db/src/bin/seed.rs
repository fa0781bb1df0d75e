//! # Seed Data Generator
//!
//! Populates the database with test products for development.
//!
//! ## Usage
//! ```bash
//! # Generate the full demo catalog (default: 500 products)
//! cargo run -p quoteflow-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p quoteflow-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p quoteflow-db --bin seed -- --db ./data/quoteflow.db
//! ```
//!
//! ## Generated Products
//! Creates realistic sanitaryware catalog data across categories:
//! - Basins (counter, pedestal, wall-hung)
//! - Water closets (one-piece, wall-hung, EWC)
//! - Seat covers and cisterns
//! - Taps and mixers
//! - Accessories
//!
//! Each product has:
//! - Unique SKU: `{CATEGORY}-{INDEX}`
//! - Realistic name
//! - Deterministic pseudo-random price and stock
//! - A few per-color price overrides on ceramic lines

use chrono::Utc;
use std::env;
use uuid::Uuid;

use quoteflow_core::types::{ColorPrice, Product, ProductStructure};
use quoteflow_db::{Database, DbConfig};

/// Product categories for realistic test data.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BAS",
        &[
            "Orion Counter Basin",
            "Vega Pedestal Basin",
            "Lyra Wall-Hung Basin",
            "Astra Table-Top Basin",
            "Nova Corner Basin",
            "Siena Under-Counter Basin",
            "Rhea Designer Bowl",
            "Mira Semi-Recessed Basin",
        ],
    ),
    (
        "WC",
        &[
            "Alto One-Piece Closet",
            "Crest Wall-Hung Closet",
            "Summit Floor-Mounted EWC",
            "Ridge Rimless Closet",
            "Plateau Extended-Height EWC",
            "Mesa Compact Closet",
        ],
    ),
    (
        "SEAT",
        &[
            "Cintia Soft-Close Seat",
            "Slim Duroplast Seat",
            "Quick-Release Family Seat",
            "Standard Thermoset Seat",
        ],
    ),
    (
        "TAP",
        &[
            "Flume Basin Mixer",
            "Cascade Pillar Tap",
            "Brook Wall Mixer",
            "Creek Sensor Tap",
            "Delta Angle Valve",
            "Rapids Sink Mixer",
        ],
    ),
    (
        "ACC",
        &[
            "Towel Rail 600mm",
            "Robe Hook",
            "Soap Dispenser",
            "Paper Holder",
            "Corner Shelf",
            "Health Faucet",
        ],
    ),
];

/// Ceramic colors with a premium over the base (Snow White) price.
const COLORS: &[(&str, i64)] = &[("Ivory", 8000), ("Storm Grey", 12000)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./quoteflow_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("QuoteFlow Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./quoteflow_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 QuoteFlow Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category_code, names)) in CATEGORIES.iter().enumerate() {
        let mut series = 0;
        while generated < count {
            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let index = series * names.len() + name_idx;
                let product = generate_product(
                    category_code,
                    name,
                    category_idx * 1000 + index,
                    index,
                );

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.sku, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
            series += 1;
            if series * names.len() >= (count / CATEGORIES.len()) + names.len() {
                break;
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Verify FTS
    println!();
    println!("Verifying FTS index...");
    let search_results = db.products().search("basin", 10).await?;
    println!("  Search 'basin': {} results", search_results.len());

    let search_results = db.products().search("BAS", 10).await?;
    println!("  Search 'BAS': {} results", search_results.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
///
/// `seed` drives a cheap deterministic pseudo-random spread so repeated
/// runs produce the same catalog.
fn generate_product(category: &str, name: &str, seed: usize, index: usize) -> Product {
    let now = Utc::now();

    // Price between ₹450 and ~₹24,000 depending on category and seed
    let base = match category {
        "BAS" => 450000,
        "WC" => 900000,
        "SEAT" => 120000,
        "TAP" => 250000,
        _ => 45000,
    };
    let selling_price_paise = base + ((seed * 7919) % 150) as i64 * 10000;
    let purchase_price_paise = selling_price_paise * 62 / 100;

    // Ceramic categories get per-color price overrides
    let price_by_color = if matches!(category, "BAS" | "WC") {
        COLORS
            .iter()
            .map(|(color, premium)| ColorPrice {
                color: color.to_string(),
                price_paise: selling_price_paise + premium,
            })
            .collect()
    } else {
        Vec::new()
    };

    Product {
        id: Uuid::new_v4().to_string(),
        sku: format!("{}-{:03}", category, index + 1),
        name: format!("{} {}", name, 100 + (seed % 40)),
        description: Some(format!("{} ({} series)", name, category)),
        category: Some(category.to_lowercase()),
        structure: ProductStructure::Standalone,
        selling_price_paise,
        purchase_price_paise,
        mrp_paise: Some(selling_price_paise * 125 / 100),
        price_by_color,
        variants: Vec::new(),
        set_components: Vec::new(),
        set_price_paise: None,
        quantity: ((seed * 31) % 120) as i64,
        unit: "pcs".to_string(),
        low_stock_threshold: 10,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
