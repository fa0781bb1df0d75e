//! # Quotation Status State Machine
//!
//! The lifecycle of a quotation and the single source of truth for which
//! operations are legal at each stage.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Quotation Lifecycle                                 │
//! │                                                                         │
//! │    ┌───────┐  send   ┌──────┐  approve  ┌──────────┐ convert ┌────────┐│
//! │    │ draft │────────►│ sent │──────────►│ approved │────────►│converted││
//! │    └───────┘         └──────┘           └──────────┘         └────────┘│
//! │        ▲                │ │                                             │
//! │        │     revert     │ │ reject      ┌──────────┐                   │
//! │        └────────────────┘ └────────────►│ rejected │                   │
//! │                                         └──────────┘                   │
//! │                                                                         │
//! │    expired: reached by an external validity sweep, never through        │
//! │    change_status. Terminal states: rejected, expired, converted.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guard Table
//! Which mutations each status permits. Every service operation checks
//! these guards instead of hand-rolling status comparisons.
//!
//! | status    | document update | line-item ops | delete |
//! |-----------|-----------------|---------------|--------|
//! | draft     | yes             | yes           | yes    |
//! | sent      | yes             | no            | no     |
//! | approved  | no              | no            | no     |
//! | rejected  | no              | no            | no     |
//! | expired   | no              | no            | no     |
//! | converted | no              | no            | no     |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Status Enum
// =============================================================================

/// The lifecycle status of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    /// Being prepared; fully mutable.
    Draft,
    /// Delivered to the customer; awaiting their decision.
    Sent,
    /// Accepted by the customer; awaiting conversion to an order.
    Approved,
    /// Declined by the customer.
    Rejected,
    /// Validity window lapsed before a decision.
    Expired,
    /// Turned into a sales order.
    Converted,
}

impl QuotationStatus {
    /// Statuses this one may transition to via `change_status`.
    ///
    /// This table is the whole state machine; everything else derives from it.
    pub const fn allowed_transitions(&self) -> &'static [QuotationStatus] {
        match self {
            QuotationStatus::Draft => &[QuotationStatus::Sent],
            QuotationStatus::Sent => &[
                QuotationStatus::Approved,
                QuotationStatus::Rejected,
                QuotationStatus::Draft,
            ],
            QuotationStatus::Approved => &[QuotationStatus::Converted],
            QuotationStatus::Rejected
            | QuotationStatus::Expired
            | QuotationStatus::Converted => &[],
        }
    }

    /// Checks whether a transition to `to` is allowed.
    pub fn can_transition_to(&self, to: QuotationStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// A terminal status has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Whether document-level updates (customer, discounts, tax, terms)
    /// are permitted.
    pub const fn allows_edit(&self) -> bool {
        matches!(self, QuotationStatus::Draft | QuotationStatus::Sent)
    }

    /// Whether line-item sub-resource operations (add/update/remove) are
    /// permitted. Stricter than `allows_edit`: a sent quotation must be
    /// reverted to draft before its line items change.
    pub const fn allows_line_item_edit(&self) -> bool {
        matches!(self, QuotationStatus::Draft)
    }

    /// Whether the quotation document may be deleted.
    pub const fn allows_delete(&self) -> bool {
        matches!(self, QuotationStatus::Draft)
    }

    /// Stable lowercase name, as stored in the database and the API.
    pub const fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "draft",
            QuotationStatus::Sent => "sent",
            QuotationStatus::Approved => "approved",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::Expired => "expired",
            QuotationStatus::Converted => "converted",
        }
    }
}

impl Default for QuotationStatus {
    fn default() -> Self {
        QuotationStatus::Draft
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(QuotationStatus::Draft),
            "sent" => Ok(QuotationStatus::Sent),
            "approved" => Ok(QuotationStatus::Approved),
            "rejected" => Ok(QuotationStatus::Rejected),
            "expired" => Ok(QuotationStatus::Expired),
            "converted" => Ok(QuotationStatus::Converted),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
