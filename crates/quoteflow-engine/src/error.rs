//! # Engine Error Type
//!
//! Unified error type for engine operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in QuoteFlow                              │
//! │                                                                         │
//! │  HTTP layer (external)          Engine (this crate)                     │
//! │  ─────────────────────          ───────────────────                     │
//! │                                                                         │
//! │  POST /quotations/:id/items                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  QuotationService::add_line_item                                 │  │
//! │  │  Result<Quotation, EngineError>                                  │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  ValidationError? ── CoreError::Validation ─────┐                │  │
//! │  │  Wrong status?    ── CoreError::InvalidStatus ──┤                │  │
//! │  │  Missing product? ── DbError::NotFound ─────────┼──► EngineError │  │
//! │  │  Duplicate number?── DbError::UniqueViolation ──┘                │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "code": "INVALID_STATE",                                             │
//! │    "message": "Quotation is sent, cannot add line items" }              │
//! │                                                                         │
//! │  NOT_FOUND → 404, VALIDATION_ERROR → 400, INVALID_STATE → 409,          │
//! │  INVALID_TRANSITION → 409, CONFLICT → 409, DATABASE_ERROR → 500         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use quoteflow_core::CoreError;
use quoteflow_db::DbError;

/// Engine error returned to API callers.
///
/// ## Serialization
/// This is what the HTTP layer forwards when an operation fails:
/// ```json
/// {
///   "code": "INVALID_TRANSITION",
///   "message": "Cannot change status from draft to approved"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct EngineError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await api.addLineItem(id, item);
/// } catch (e) {
///   switch (e.code) {
///     case 'NOT_FOUND':
///       showNotification('Quotation not found');
///       break;
///     case 'INVALID_STATE':
///       showNotification('Move the quotation back to draft first');
///       break;
///     default:
///       showError(e.message);
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Operation not allowed in the document's current status (409)
    InvalidState,

    /// Status change not in the transition table (409)
    InvalidTransition,

    /// Duplicate unique key (409); safe for the caller to retry
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal error (500)
    Internal,
}

impl EngineError {
    /// Creates a new engine error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EngineError {
            code,
            message: message.into(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        EngineError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        EngineError::new(ErrorCode::InvalidState, message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::new(ErrorCode::Conflict, message)
    }
}

/// Maps core business errors onto engine error codes.
impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_)
            | CoreError::QuotationNotFound(_)
            | CoreError::LineItemNotFound(_) => ErrorCode::NotFound,
            CoreError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            CoreError::InvalidStatus { .. } => ErrorCode::InvalidState,
            CoreError::UnknownStatus(_)
            | CoreError::TooManyLineItems { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        EngineError::new(code, err.to_string())
    }
}

/// Maps database errors onto engine error codes.
impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        let code = match &err {
            DbError::NotFound { .. } => ErrorCode::NotFound,
            DbError::UniqueViolation { .. } => ErrorCode::Conflict,
            _ => ErrorCode::DatabaseError,
        };
        EngineError::new(code, err.to_string())
    }
}

impl From<quoteflow_core::ValidationError> for EngineError {
    fn from(err: quoteflow_core::ValidationError) -> Self {
        EngineError::new(ErrorCode::ValidationError, err.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quoteflow_core::QuotationStatus;

    #[test]
    fn test_core_error_mapping() {
        let err: EngineError = CoreError::QuotationNotFound("q-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: EngineError = CoreError::InvalidTransition {
            from: QuotationStatus::Draft,
            to: QuotationStatus::Approved,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        assert_eq!(err.message, "Cannot change status from draft to approved");

        let err: EngineError = CoreError::InvalidStatus {
            status: QuotationStatus::Sent,
            operation: "add line items",
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[test]
    fn test_db_error_mapping() {
        let err: EngineError = DbError::not_found("Quotation", "q-1").into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: EngineError =
            DbError::duplicate("quotations.quotation_number", "QT-2026-0001").into();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err: EngineError = DbError::PoolExhausted.into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = EngineError::not_found("Quotation", "q-1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Quotation not found: q-1");
    }
}
