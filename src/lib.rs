//! Bill-payment core: exact-decimal money, bill listings, a circular amount
//! dial and a confirm → process → success payment flow over an in-memory
//! session.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod logging;
