//! Monetary amounts backed by exact decimal arithmetic.
//!
//! Prices flow through the client repeatedly (snapshot on add-to-cart,
//! multiply by quantity, sum over lines, apply tax), so every monetary value
//! is a [`rust_decimal::Decimal`] rather than a binary float. Rounding only
//! happens at the 2-decimal-place presentation boundary.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Tax rate applied on top of the cart subtotal (5%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// A monetary amount in the restaurant's (single) currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a new amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from whole currency units (e.g., `250` -> `250.00`).
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create an amount from minor units (e.g., `1050` cents -> `10.50`).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Round to 2 decimal places (midpoint away from zero).
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Derived totals for a pending order.
///
/// This is the one shared implementation of the checkout total policy:
/// `tax = subtotal * 5%`, `grand_total = subtotal + tax`, each held to
/// 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of `price * quantity` over all lines.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Subtotal plus tax.
    pub grand_total: Money,
}

impl Totals {
    /// Derive tax and grand total from a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Money) -> Self {
        let subtotal = subtotal.rounded();
        let tax = Money::new(subtotal.amount() * tax_rate()).rounded();
        Self {
            subtotal,
            tax,
            grand_total: (subtotal + tax).rounded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(Money::from_major(100).to_string(), "100.00");
        assert_eq!(Money::from_minor(1005).to_string(), "10.05");
    }

    #[test]
    fn test_times_is_exact() {
        // 0.10 * 3 must be exactly 0.30, not 0.30000000000000004
        let price = Money::from_minor(10);
        assert_eq!(price.times(3), Money::from_minor(30));
    }

    #[test]
    fn test_sum_over_lines() {
        let total: Money = [Money::from_major(100), Money::from_major(250).times(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_major(600));
    }

    #[test]
    fn test_totals_single_line() {
        // 100 x 5 -> subtotal 500.00, tax 25.00, grand total 525.00
        let totals = Totals::from_subtotal(Money::from_major(100).times(5));
        assert_eq!(totals.subtotal.to_string(), "500.00");
        assert_eq!(totals.tax.to_string(), "25.00");
        assert_eq!(totals.grand_total.to_string(), "525.00");
    }

    #[test]
    fn test_totals_mixed_lines() {
        // [100 x 1, 250 x 2] -> subtotal 600.00, tax 30.00, grand total 630.00
        let subtotal = Money::from_major(100) + Money::from_major(250).times(2);
        let totals = Totals::from_subtotal(subtotal);
        assert_eq!(totals.subtotal.to_string(), "600.00");
        assert_eq!(totals.tax.to_string(), "30.00");
        assert_eq!(totals.grand_total.to_string(), "630.00");
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        // 10.10 * 0.05 = 0.505 -> rounds to 0.51
        let totals = Totals::from_subtotal(Money::from_minor(1010));
        assert_eq!(totals.tax.to_string(), "0.51");
        assert_eq!(totals.grand_total.to_string(), "10.61");
    }
}
