//! # Error Types
//!
//! Domain-specific error types for quoteflow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quoteflow-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quoteflow-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  quoteflow-engine errors (separate crate)                              │
//! │  └── EngineError      - What API callers see (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → EngineError → Caller    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (quotation number, status, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::status::QuotationStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Line item references a product ID that doesn't exist
    /// - Product was deactivated (soft delete)
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    QuotationNotFound(String),

    /// Line item not found within a quotation.
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// A status change was requested that the transition table forbids.
    ///
    /// ## When This Occurs
    /// - draft → approved (must go through sent)
    /// - any transition out of rejected/expired/converted
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: QuotationStatus,
        to: QuotationStatus,
    },

    /// The quotation is not in a status that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding line items to a sent quotation
    /// - Deleting a non-draft quotation
    /// - Updating an approved quotation
    #[error("Quotation is {status}, cannot {operation}")]
    InvalidStatus {
        status: QuotationStatus,
        operation: &'static str,
    },

    /// Unrecognized status name (bad API input or corrupted row).
    #[error("Unknown quotation status: {0}")]
    UnknownStatus(String),

    /// Quotation has exceeded the maximum number of line items.
    #[error("Quotation cannot have more than {max} line items")]
    TooManyLineItems { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidTransition {
            from: QuotationStatus::Draft,
            to: QuotationStatus::Approved,
        };
        assert_eq!(err.to_string(), "Cannot change status from draft to approved");

        let err = CoreError::InvalidStatus {
            status: QuotationStatus::Sent,
            operation: "add line items",
        };
        assert_eq!(err.to_string(), "Quotation is sent, cannot add line items");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer.name".to_string(),
        };
        assert_eq!(err.to_string(), "customer.name is required");

        let err = ValidationError::Negative {
            field: "unitPrice".to_string(),
        };
        assert_eq!(err.to_string(), "unitPrice cannot be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer.name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
