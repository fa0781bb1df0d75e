//! # quoteflow-engine: Service Layer for QuoteFlow
//!
//! The orchestration layer between the external HTTP surface and the
//! core/database crates. Each public method is one API operation:
//! validate → load → guard → mutate → recompute → persist, all inside a
//! single database transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       QuoteFlow Engine                                  │
//! │                                                                         │
//! │  External HTTP layer (out of this repository)                          │
//! │       │ deserialized DTOs (types.rs)                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  QuotationService            ProductService                     │   │
//! │  │  ────────────────            ──────────────                     │   │
//! │  │  create                      create                             │   │
//! │  │  list / get / stats          get / get_by_sku / search          │   │
//! │  │  update                      update                             │   │
//! │  │  change_status               deactivate                         │   │
//! │  │  duplicate                                                      │   │
//! │  │  add/update/remove_line_item                                    │   │
//! │  │  delete                                                         │   │
//! │  │  record_email_sent                                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │ quoteflow-core (pricing, guards)                               │
//! │       ▼                                                                 │
//! │  quoteflow-db (SQLite, one transaction per mutation)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quoteflow_db::{Database, DbConfig};
//! use quoteflow_engine::{Engine, types::CreateQuotationInput};
//!
//! let db = Database::new(DbConfig::new("./quoteflow.db")).await?;
//! let engine = Engine::new(db);
//!
//! let quotation = engine.quotations().create(&actor, input).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod products;
pub mod service;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult, ErrorCode};
pub use products::ProductService;
pub use service::QuotationService;

use quoteflow_db::Database;

/// Bundles the services over one database handle.
///
/// The HTTP layer constructs this once at startup and shares it across
/// requests (it is `Clone` and cheap to clone).
#[derive(Debug, Clone)]
pub struct Engine {
    db: Database,
}

impl Engine {
    /// Creates the engine over an initialized database.
    pub fn new(db: Database) -> Self {
        Engine { db }
    }

    /// Quotation operations.
    pub fn quotations(&self) -> QuotationService {
        QuotationService::new(self.db.clone())
    }

    /// Catalog operations.
    pub fn products(&self) -> ProductService {
        ProductService::new(self.db.clone())
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }
}
