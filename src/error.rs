use crate::domain::account::AccountId;
use crate::domain::bill::BillId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    DateError(#[from] chrono::ParseError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Amount overflow: {0}")]
    Overflow(String),
    #[error("Invalid selection range: {0}")]
    InvalidRange(String),
    #[error("Bill {0} not found")]
    BillNotFound(BillId),
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),
    #[error("Bill {0} is already paid")]
    BillAlreadyPaid(BillId),
    #[error("Payment cannot be confirmed: {0}")]
    ConfirmationUnavailable(&'static str),
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, PaymentError>;
