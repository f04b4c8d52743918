use crate::error::PaymentError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a monetary value in exact base-10 arithmetic.
///
/// This is a wrapper around `rust_decimal::Decimal` so that balances, totals and
/// dial selections never pass through binary floating point when they are stored
/// or compared. Arithmetic is checked: there are no operator impls, and every
/// sum or difference reports overflow instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

/// Represents a strictly positive monetary amount.
///
/// Bill amounts and payment amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounds to whole cents, midpoints away from zero.
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Exact total of `values`, `None` once it leaves the representable range.
    pub fn checked_sum(values: impl IntoIterator<Item = Self>) -> Option<Self> {
        values
            .into_iter()
            .try_fold(Self::ZERO, |total, value| total.checked_add(value))
    }
}

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value <= Decimal::ZERO {
            return Err(PaymentError::ValidationError(format!(
                "Amount must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn as_money(&self) -> Money {
        Money(self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<Money> for Amount {
    type Error = PaymentError;

    fn try_from(value: Money) -> Result<Self, Self::Error> {
        Self::new(value.0)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Money {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let m1 = Money::new(dec!(10.0));
        let m2 = Money::new(dec!(5.0));
        assert_eq!(m1.checked_add(m2), Some(Money::new(dec!(15.0))));
        assert_eq!(m1.checked_sub(m2), Some(Money::new(dec!(5.0))));
        assert_eq!(m2.checked_sub(m1), Some(Money::new(dec!(-5.0))));
    }

    #[test]
    fn test_money_has_no_float_drift() {
        let total = Money::checked_sum([dec!(0.1), dec!(0.2)].map(Money::new));
        assert_eq!(total, Some(Money::new(dec!(0.3))));
    }

    #[test]
    fn test_overflow_is_reported_not_raised() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(Money::new(dec!(1))), None);
        assert_eq!(Money::new(Decimal::MIN).checked_sub(Money::new(dec!(1))), None);
        assert_eq!(Money::checked_sum([max, max]), None);
        assert_eq!(Money::checked_sum([]), Some(Money::ZERO));
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(
            Money::new(dec!(17.8125)).round_to_cents(),
            Money::new(dec!(17.81))
        );
        assert_eq!(
            Money::new(dec!(0.005)).round_to_cents(),
            Money::new(dec!(0.01))
        );
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Money::new(dec!(57.5)).to_string(), "57.50");
        assert_eq!(Amount::new(dec!(142.5)).unwrap().to_string(), "142.50");
    }
}
