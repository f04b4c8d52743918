use crate::domain::account::AccountId;
use crate::domain::bill::BillId;
use crate::domain::money::{Amount, Money};
use chrono::NaiveDate;
use serde::Serialize;

/// A confirmed payment waiting for settlement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentOrder {
    pub bill_id: BillId,
    pub account_id: AccountId,
    pub amount: Amount,
    pub payment_date: NaiveDate,
}

/// The outcome of a settled payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub bill_id: BillId,
    pub payee: String,
    pub account_id: AccountId,
    pub amount: Amount,
    pub payment_date: NaiveDate,
    pub remaining_balance: Money,
}
