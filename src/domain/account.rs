use crate::domain::money::{Amount, Money};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
        }
    }
}

/// A funding account that bills are paid from.
///
/// Only the balance changes after creation, and only when a payment is applied
/// by the session.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Money,
}

impl Account {
    pub fn new(name: impl Into<String>, account_type: AccountType, balance: Money) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            account_type,
            balance,
        }
    }

    /// True when the balance cannot cover `amount`.
    pub fn has_insufficient_funds(&self, amount: Money) -> bool {
        self.balance < amount
    }

    /// Debits the balance and returns the new one. Funds are gated before a
    /// payment is confirmed, not here, so the balance may go negative. On
    /// overflow the balance is left as it was.
    pub(crate) fn debit(&mut self, amount: Amount) -> Result<Money> {
        let balance = self.balance.checked_sub(amount.as_money()).ok_or_else(|| {
            PaymentError::Overflow(format!(
                "debiting {} from account {} overflows its balance",
                amount, self.id
            ))
        })?;
        self.balance = balance;
        Ok(balance)
    }
}
