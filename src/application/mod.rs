//! Application layer containing the bill-payment orchestration.
//!
//! `BillSession` owns the bills and accounts and applies payments atomically,
//! `listing` filters and orders bills for display, and `PaymentFlow` walks a
//! single payment through confirmation and settlement.

pub mod confirmation;
pub mod listing;
pub mod session;
