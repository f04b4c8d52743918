//! Adapters behind the domain ports.

pub mod simulated;
