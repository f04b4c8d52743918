use crate::domain::money::{Amount, Money};
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Share of the bill amount used as the minimum due when none is supplied.
pub const DEFAULT_MINIMUM_DUE_RATIO: Decimal = dec!(0.125);

/// Opaque identifier of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(Uuid);

impl BillId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for BillId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillCategory {
    Utilities,
    Internet,
    Phone,
    Rent,
    Insurance,
    Subscription,
    Credit,
    Other,
}

impl BillCategory {
    pub const ALL: [BillCategory; 8] = [
        BillCategory::Utilities,
        BillCategory::Internet,
        BillCategory::Phone,
        BillCategory::Rent,
        BillCategory::Insurance,
        BillCategory::Subscription,
        BillCategory::Credit,
        BillCategory::Other,
    ];

    /// Display label, also the key categories are ordered by.
    pub fn label(&self) -> &'static str {
        match self {
            BillCategory::Utilities => "Utilities",
            BillCategory::Internet => "Internet",
            BillCategory::Phone => "Phone",
            BillCategory::Rent => "Rent",
            BillCategory::Insurance => "Insurance",
            BillCategory::Subscription => "Subscription",
            BillCategory::Credit => "Credit Card",
            BillCategory::Other => "Other",
        }
    }
}

impl fmt::Display for BillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A bill that can be paid from an account.
///
/// Every field is fixed at creation except `paid`, which only the session flips,
/// and only from `false` to `true`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Bill {
    pub id: BillId,
    pub payee: String,
    pub amount: Amount,
    pub minimum_due: Money,
    pub due_date: NaiveDate,
    pub category: BillCategory,
    pub paid: bool,
}

impl Bill {
    /// Creates an unpaid bill whose minimum due is the default share of `amount`.
    pub fn new(
        payee: impl Into<String>,
        amount: Amount,
        due_date: NaiveDate,
        category: BillCategory,
    ) -> Self {
        Self {
            id: BillId::new(),
            payee: payee.into(),
            amount,
            minimum_due: default_minimum_due(amount, DEFAULT_MINIMUM_DUE_RATIO),
            due_date,
            category,
            paid: false,
        }
    }

    /// Overrides the minimum due. It must lie within `[0, amount]`.
    pub fn with_minimum_due(mut self, minimum_due: Money) -> Result<Self> {
        if minimum_due < Money::ZERO || minimum_due > self.amount.as_money() {
            return Err(PaymentError::ValidationError(format!(
                "Minimum due {} must be between 0 and the bill amount {}",
                minimum_due, self.amount
            )));
        }
        self.minimum_due = minimum_due;
        Ok(self)
    }

    pub fn with_id(mut self, id: BillId) -> Self {
        self.id = id;
        self
    }

    /// Marks the bill as already paid when it is loaded.
    pub fn settled(mut self) -> Self {
        self.paid = true;
        self
    }
}

/// `amount * ratio`, rounded to cents.
pub fn default_minimum_due(amount: Amount, ratio: Decimal) -> Money {
    Money::new(amount.value() * ratio).round_to_cents()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
    }

    #[test]
    fn test_default_minimum_due_is_eighth_of_amount() {
        let bill = Bill::new(
            "Electric Company",
            Amount::new(dec!(142.50)).unwrap(),
            date(),
            BillCategory::Utilities,
        );
        assert_eq!(bill.minimum_due, Money::new(dec!(17.81)));
        assert!(!bill.paid);
    }

    #[test]
    fn test_minimum_due_bounds() {
        let bill = Bill::new(
            "Phone Company",
            Amount::new(dec!(65.00)).unwrap(),
            date(),
            BillCategory::Phone,
        );
        assert!(bill.clone().with_minimum_due(Money::ZERO).is_ok());
        assert!(bill.clone().with_minimum_due(Money::new(dec!(65.00))).is_ok());
        assert!(matches!(
            bill.clone().with_minimum_due(Money::new(dec!(65.01))),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            bill.with_minimum_due(Money::new(dec!(-1))),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(BillCategory::Credit.label(), "Credit Card");
        assert_eq!(BillCategory::ALL.len(), 8);
    }
}
