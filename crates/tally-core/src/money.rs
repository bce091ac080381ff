//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floating point prices:                                           │
//! │    19.99 × 3 = 59.97000000000001  ❌ WRONG!                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1999 cents × 3 = 5997 cents                                         │
//! │    Decimal text ("19.99") is parsed straight into cents               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let doubled = price * 2;
//! assert_eq!(doubled.to_decimal_string(), "21.98");
//!
//! let parsed = Money::parse_decimal("25.99").unwrap();
//! assert_eq!(parsed.cents(), 2599);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences and deltas may go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as integer cents**: the wire never carries floats
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┬──► CartItem.final_price ──► Cart.total               │
/// │                  │                                                      │
/// │                  └──► SaleItemRecord.unit_price ──► SubmittedSale.total │
/// │                                                                         │
/// │  Analytics revenue, averages and daily totals are sums of these        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses decimal text such as `"25.99"`, `"4.5"` or `"35"` into cents.
    ///
    /// Surrounding whitespace is ignored. More than two fractional digits
    /// are rounded half up on the third digit, which absorbs float noise
    /// like `"25.990000000000002"` coming out of spreadsheets.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("4.5").unwrap().cents(), 450);
    /// assert_eq!(Money::parse_decimal(" 35 ").unwrap().cents(), 3500);
    /// assert_eq!(Money::parse_decimal("-1.25").unwrap().cents(), -125);
    /// assert!(Money::parse_decimal("abc").is_err());
    /// assert!(Money::parse_decimal("").is_err());
    /// ```
    pub fn parse_decimal(text: &str) -> Result<Money, ValidationError> {
        let trimmed = text.trim();
        let invalid = |reason: &str| ValidationError::invalid_format("price", format!("'{trimmed}' {reason}"));

        if trimmed.is_empty() {
            return Err(ValidationError::required("price"));
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("is not a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("is not a number"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("is too large"))?
        };

        // First two digits are cents, the third decides rounding.
        let digits: Vec<i64> = fraction
            .chars()
            .take(3)
            .filter_map(|c| c.to_digit(10).map(i64::from))
            .collect();
        let tens = digits.first().copied().unwrap_or(0);
        let ones = digits.get(1).copied().unwrap_or(0);
        let round_up = digits.get(2).map_or(false, |d| *d >= 5);

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(tens * 10 + ones + i64::from(round_up)))
            .ok_or_else(|| invalid("is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Multiplies money by a quantity, saturating on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1999);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 5997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Plain decimal rendering without a currency symbol: `"19.99"`, `"-5.50"`.
    ///
    /// Used by product rows and anywhere a spreadsheet-friendly number is needed.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }

    /// Share of `self` in `total`, as a percentage with one decimal (`"33.3%"`).
    ///
    /// Returns `"0.0%"` when the total is zero.
    pub fn percentage_of(&self, total: Money) -> String {
        format_percentage(self.0, total.0)
    }
}

/// One-decimal percentage of `part` in `whole`, rounded half up: `"66.7%"`.
pub fn format_percentage(part: i64, whole: i64) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    // Tenths of a percent, rounded half up in integer math.
    let tenths = (part as i128 * 1000 * 2 + whole as i128) / (whole as i128 * 2);
    format!("{}.{}%", tenths / 10, (tenths % 10).abs())
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the plain decimal amount.
///
/// ## Note
/// Currency symbols are a presentation concern; see
/// `StoreConfig::format_currency` in tally-store.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
