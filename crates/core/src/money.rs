//! Monetary amounts in the smallest currency unit.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Amount of money in cents.
///
/// Serialized as a bare integer number of cents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Price of `quantity` units, `None` on overflow.
    pub fn checked_times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(quantity)).map(Money)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn displays_dollars_and_cents() {
        assert_eq!(Money::from_cents(18999).to_string(), "189.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn total_overflow_is_reported() {
        assert_eq!(Money::from_cents(u64::MAX).checked_times(2), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: extended price equals unit cents times quantity.
        #[test]
        fn checked_times_multiplies_cents(cents in 0u64..1_000_000, qty in 0u32..10_000) {
            let total = Money::from_cents(cents).checked_times(qty).unwrap();
            prop_assert_eq!(total.cents(), cents * u64::from(qty));
        }
    }
}
