use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of money in whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars * 100)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Adds, clamping at the largest representable amount.
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Price of `quantity` units at this unit price.
    pub fn checked_times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(quantity)).map(Money)
    }

    /// Applies a rate given in basis points, rounding half-up to the cent.
    pub fn checked_rate_bps(self, bps: u32) -> Option<Money> {
        let scaled = self.0.checked_mul(u64::from(bps))?;
        Some(Money(scaled.checked_add(5_000)? / 10_000))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_dollars_and_cents() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_dollars(20).to_string(), "$20.00");
    }

    #[test]
    fn rate_rounds_half_up() {
        // 8.75% of $10.00 = 87.5 cents
        assert_eq!(Money::from_dollars(10).checked_rate_bps(875), Some(Money::from_cents(88)));
        assert_eq!(Money::from_cents(999).checked_rate_bps(0), Some(Money::ZERO));
    }

    #[test]
    fn saturating_add_clamps() {
        let big = Money::from_cents(u64::MAX / 2 + 10);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(big.saturating_add(big), Money::from_cents(u64::MAX));
        assert_eq!(Money::from_cents(1).saturating_add(Money::from_cents(2)), Money::from_cents(3));
    }

    #[test]
    fn multiplication_overflow_is_reported() {
        assert_eq!(Money::from_cents(u64::MAX).checked_times(2), None);
        assert_eq!(Money::from_cents(250).checked_times(4), Some(Money::from_dollars(10)));
    }
}
