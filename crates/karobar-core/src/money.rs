//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Spreadsheet cells arrive as text ("1,500.50") and the old dashboard    │
//! │  summed them as floats:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paisas                                           │
//! │    Rs 1,500.50 = 150050 paisas (i64)                                    │
//! │    Sums, balances, and stock values never drift                         │
//! │                                                                         │
//! │  Ratios (utilization %, margin %) are the ONLY place f64 appears,       │
//! │  and every division is guarded so 0 comes out instead of NaN/∞.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use karobar_core::money::Money;
//!
//! let balance = Money::from_paisas(90_000); // Rs 900.00
//! let limit = Money::from_rupees(1_000);    // Rs 1,000.00
//!
//! // Guarded ratio: 0.0 whenever the denominator is zero or negative
//! assert_eq!(balance.pct_of(limit), 90.0);
//! assert_eq!(balance.pct_of(Money::zero()), 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A rupee amount in paisas (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative balances are advances, negative profit is loss
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support so records serialize straight to JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisas.
    #[inline]
    pub const fn from_paisas(paisas: i64) -> Self {
        Money(paisas)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paisas.
    #[inline]
    pub const fn paisas(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paisa portion (always 0-99).
    #[inline]
    pub const fn paisa_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
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

    /// Multiplies money by a quantity (stock value = price × qty).
    #[inline]
    pub const fn times(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// This amount as a percentage of `whole`, guarded.
    ///
    /// Returns `0.0` whenever `whole` is zero or negative, so a shop with no
    /// credit limit reports 0% utilization instead of NaN/infinity.
    ///
    /// ## Example
    /// ```rust
    /// use karobar_core::money::Money;
    ///
    /// let balance = Money::from_rupees(900);
    /// let limit = Money::from_rupees(1000);
    /// assert_eq!(balance.pct_of(limit), 90.0);
    /// assert_eq!(balance.pct_of(Money::zero()), 0.0);
    /// ```
    pub fn pct_of(&self, whole: Money) -> f64 {
        if whole.0 <= 0 {
            return 0.0;
        }
        self.0 as f64 / whole.0 as f64 * 100.0
    }

    /// Divides a total evenly over `count`, guarded.
    ///
    /// Returns zero when `count` is zero so empty data sets average to 0
    /// rather than dividing by zero. Truncates toward zero like the rest of
    /// the integer math in this crate.
    pub fn avg_over(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money(self.0 / count as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The dashboard formats amounts itself
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let rupees = self.rupees().abs();

        // Group the rupee digits in threes: 1234567 -> "1,234,567"
        let digits = rupees.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        write!(f, "{}Rs {}.{:02}", sign, grouped, self.paisa_part())
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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing an iterator of Money values (dashboard totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
