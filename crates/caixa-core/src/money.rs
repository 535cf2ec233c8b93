//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floating point:                                            │
//! │    19.90 * 3 = 59.699999999999996  ❌ WRONG!                            │
//! │                                                                         │
//! │  Installments:                                                          │
//! │    R$10.00 / 3 = R$3.33 (×3 = R$9.99)  → Lost R$0.01!                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    1990 centavos × 3 = 5970 centavos, exactly                          │
//! │    1000 centavos / 3 = 333 centavos, and we KNOW one was dropped       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caixa_core::money::Money;
//!
//! let price = Money::from_cents(1990); // R$19.90
//! let total = price * 3;                // R$59.70
//! assert_eq!(total.to_string(), "R$59.70");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::ops::Mul;

/// Basis points in 100%.
pub const BPS_SCALE: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest unit of the Real).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts and differences can go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Two fraction digits**: matches the DECIMAL(10,2) columns of the ledger
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.unit_price ──► SaleIntent.total() ──► vendas.total            │
/// │                               │                                         │
/// │                               └──► compute_due() ──► shown to operator │
/// │                                                                         │
/// │  SaleLineItem.unit_price ── snapshot of Product.unit_price at sale     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use caixa_core::money::Money;
    ///
    /// let price = Money::from_cents(1990); // R$19.90
    /// assert_eq!(price.cents(), 1990);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    ///
    /// ```rust
    /// use caixa_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(5970).reais(), 59);
    /// assert_eq!(Money::from_cents(-550).reais(), -5);
    /// ```
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Scales the amount by a factor given in basis points.
    ///
    /// `10_000` keeps the amount, `8_000` is 80% of it, `14_000` is 140%.
    ///
    /// ## Rounding
    /// The exact product is rounded to the centavo with round-half-to-even,
    /// so repeated adjustments carry no systematic bias:
    /// ```text
    /// 0.5 → 0    1.5 → 2    2.5 → 2    3.5 → 4
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use caixa_core::money::Money;
    ///
    /// let total = Money::from_cents(5970);
    /// assert_eq!(total.scale_bps(12_000).cents(), 7164); // R$71.64
    /// ```
    pub fn scale_bps(&self, bps: u32) -> Money {
        // i128: cents * bps can exceed i64 for large amounts
        let scaled = div_round_half_even(self.0 as i128 * bps as i128, BPS_SCALE as i128);
        Money(scaled as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (2000 = 20%)
    ///
    /// ## Example
    /// ```rust
    /// use caixa_core::money::Money;
    ///
    /// let total = Money::from_cents(5970); // R$59.70
    /// assert_eq!(total.apply_percentage_discount(2000).cents(), 4776); // R$47.76
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        self.scale_bps(BPS_SCALE.saturating_sub(discount_bps))
    }

    /// Applies a percentage surcharge (interest) and returns the new amount.
    ///
    /// ## Example
    /// ```rust
    /// use caixa_core::money::Money;
    ///
    /// let total = Money::from_cents(5970);
    /// assert_eq!(total.apply_percentage_surcharge(4000).cents(), 8358); // R$83.58
    /// ```
    pub fn apply_percentage_surcharge(&self, surcharge_bps: u32) -> Money {
        self.scale_bps(BPS_SCALE + surcharge_bps)
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use caixa_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1990);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 5970);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Splits the amount into `parts` equal installments.
    ///
    /// Returns the value of ONE installment, rounded half-to-even. The
    /// installments may not add back to the original amount; the difference
    /// is at most half a centavo per installment.
    ///
    /// ## Example
    /// ```rust
    /// use std::num::NonZeroU32;
    /// use caixa_core::money::Money;
    ///
    /// let due = Money::from_cents(7164); // R$71.64
    /// let three = NonZeroU32::new(3).unwrap();
    /// assert_eq!(due.per_installment(three).cents(), 2388); // 3x R$23.88
    /// ```
    pub fn per_installment(&self, parts: NonZeroU32) -> Money {
        Money(div_round_half_even(self.0 as i128, parts.get() as i128) as i64)
    }
}

/// Integer division rounded to the nearest integer, ties to even.
///
/// `den` must be positive.
fn div_round_half_even(num: i128, den: i128) -> i128 {
    let quotient = num.div_euclid(den);
    let twice_remainder = 2 * num.rem_euclid(den);

    if twice_remainder > den || (twice_remainder == den && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way the operator reads it: `R$59.70`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R${}.{:02}",
            sign,
            self.reais().abs(),
            self.centavos_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1990);
        assert_eq!(money.cents(), 1990);
        assert_eq!(money.reais(), 19);
        assert_eq!(money.centavos_part(), 90);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(5970).to_string(), "R$59.70");
        assert_eq!(Money::from_cents(500).to_string(), "R$5.00");
        assert_eq!(Money::from_cents(7).to_string(), "R$0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$5.50");
        assert_eq!(Money::zero().to_string(), "R$0.00");
    }

    #[test]
    fn test_multiply_by_quantity() {
        assert_eq!((Money::from_cents(1000) * 3).cents(), 3000);
    }

    #[test]
    fn test_quantity_total_is_exact() {
        let unit_price = Money::from_cents(1990);
        assert_eq!(unit_price.multiply_quantity(3), Money::from_cents(5970));
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    }

    #[test]
    fn test_discount_and_surcharge() {
        let total = Money::from_cents(5970);
        assert_eq!(total.apply_percentage_discount(2000).cents(), 4776);
        assert_eq!(total.apply_percentage_surcharge(2000).cents(), 7164);
        assert_eq!(total.apply_percentage_surcharge(4000).cents(), 8358);
        assert_eq!(total.scale_bps(BPS_SCALE), total);
    }

    #[test]
    fn test_scale_rounds_half_to_even() {
        // 1.25 centavos * 2 = 2.5 → 2 (even); 3 * 0.5 = 1.5 → 2
        assert_eq!(Money::from_cents(25).scale_bps(1_000).cents(), 2);
        assert_eq!(Money::from_cents(3).scale_bps(5_000).cents(), 2);
        // 0.012 → 0.01
        assert_eq!(Money::from_cents(1).scale_bps(12_000).cents(), 1);
        // 0.7 → 1
        assert_eq!(Money::from_cents(1).scale_bps(7_000).cents(), 1);
    }

    #[test]
    fn test_per_installment() {
        assert_eq!(Money::from_cents(7164).per_installment(parts(3)).cents(), 2388);
        assert_eq!(Money::from_cents(8358).per_installment(parts(7)).cents(), 1194);
        assert_eq!(Money::from_cents(5).per_installment(parts(2)).cents(), 2);
        assert_eq!(Money::from_cents(15).per_installment(parts(2)).cents(), 8);
        assert_eq!(Money::from_cents(100).per_installment(parts(1)).cents(), 100);
    }

    #[test]
    fn test_negative_rounding_is_symmetric() {
        assert_eq!(Money::from_cents(-15).per_installment(parts(2)).cents(), -8);
        assert_eq!(Money::from_cents(-5).per_installment(parts(2)).cents(), -2);
    }

    /// R$10.00 in three installments drops one centavo, and that is expected.
    #[test]
    fn test_installment_precision_loss_documented() {
        let ten = Money::from_cents(1000);
        let one_third = ten.per_installment(parts(3));
        assert_eq!(one_third.cents(), 333);

        let reconstructed = one_third * 3;
        assert_eq!(ten.cents() - reconstructed.cents(), 1);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Money::default(), Money::zero());
        assert_eq!(Money::default().cents(), 0);
    }
}
