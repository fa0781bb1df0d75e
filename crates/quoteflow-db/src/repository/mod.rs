//! # Repository Module
//!
//! Repository implementations for database access.
//!
//! ## Repository Pattern
//! Each repository owns the SQL for one aggregate:
//! - `ProductRepository` - catalog CRUD + FTS5 search
//! - `QuotationRepository` - whole-document reads/writes, listing,
//!   number allocation, status rollups
//!
//! Repositories are cheap to clone (they share the pool) and hold no
//! other state.

pub mod product;
pub mod quotation;

pub use product::ProductRepository;
pub use quotation::{
    QuotationFilter, QuotationRepository, QuotationSortField, SortOrder, StatusRollup,
};
