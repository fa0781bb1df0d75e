//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a quotation system that is a pricing error on a legal document.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹1,000.00 = 100000 paise                                             │
//! │    All arithmetic is exact; rounding happens in exactly one place       │
//! │    (percentage application) and is explicit.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quoteflow_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(100000); // ₹1,000.00
//!
//! // Arithmetic operations
//! let tripled = price * 3;                          // ₹3,000.00
//! let total = price + Money::from_paise(50000);     // ₹1,500.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(1000.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values. A discount larger than a
///   subtotal produces a negative total, which is preserved rather than
///   clamped; document-level validation decides whether to accept it.
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use quoteflow_core::money::Money;
    ///
    /// let price = Money::from_paise(109900); // Represents ₹1,099.00
    /// assert_eq!(price.paise(), 109900);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use quoteflow_core::money::Money;
    ///
    /// let price = Money::from_rupees(1000); // ₹1,000.00
    /// assert_eq!(price.paise(), 100000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a basis-point rate and returns the resulting portion,
    /// rounded half-up.
    ///
    /// This is the single place percentage rounding happens. Both tax and
    /// percentage discounts go through it so a given (amount, rate) pair
    /// always produces the same paise.
    ///
    /// ## Implementation
    /// Integer math on i128 to prevent overflow on large amounts:
    /// `(amount * bps ± 5000) / 10000`, with the rounding offset signed
    /// to match the amount. Oversized discounts push amounts negative,
    /// and an exact negative multiple must stay exact
    /// (−150.00 at 18% is −27.00, not −26.99).
    ///
    /// ## Example
    /// ```rust
    /// use quoteflow_core::money::Money;
    ///
    /// let subtotal = Money::from_paise(300000); // ₹3,000.00
    /// let tenth = subtotal.apply_bps(1000);     // 10%
    /// assert_eq!(tenth.paise(), 30000);         // ₹300.00
    /// ```
    pub fn apply_bps(&self, bps: u32) -> Money {
        let numerator = self.0 as i128 * bps as i128;
        let portion = if numerator >= 0 {
            (numerator + 5000) / 10000
        } else {
            (numerator - 5000) / 10000
        };
        Money::from_paise(portion as i64)
    }

    /// Calculates tax on this amount.
    ///
    /// ## Example
    /// ```rust
    /// use quoteflow_core::money::Money;
    /// use quoteflow_core::types::TaxRate;
    ///
    /// let amount = Money::from_paise(270000);  // ₹2,700.00
    /// let rate = TaxRate::from_bps(1800);      // 18% GST
    ///
    /// let tax = amount.calculate_tax(rate);
    /// assert_eq!(tax.paise(), 48600);          // ₹486.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.apply_bps(rate.bps())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use quoteflow_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(100000); // ₹1,000.00
    /// let line_subtotal = unit_price.multiply_quantity(3);
    /// assert_eq!(line_subtotal.paise(), 300000);  // ₹3,000.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (1000 = 10%)
    ///
    /// ## Example
    /// ```rust
    /// use quoteflow_core::money::Money;
    ///
    /// let subtotal = Money::from_paise(300000); // ₹3,000.00
    /// let discounted = subtotal.apply_percentage_discount(1000); // 10% off
    /// assert_eq!(discounted.paise(), 270000);   // ₹2,700.00
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        *self - self.apply_bps(discount_bps)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The frontend formats amounts with
/// en-IN grouping for actual display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
