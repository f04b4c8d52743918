//! Domain model: money, accounts, bills, the amount dial and the ports the
//! application layer depends on.

pub mod account;
pub mod bill;
pub mod money;
pub mod payment;
pub mod ports;
pub mod selector;
