use crate::domain::bill::DEFAULT_MINIMUM_DUE_RATIO;
use rust_decimal::Decimal;
use std::time::Duration;

/// Simulated settlement latency used when nothing else is configured.
pub const DEFAULT_SETTLEMENT_DELAY: Duration = Duration::from_millis(1500);

/// Runtime knobs for a bill-payment session.
#[derive(Debug, Clone, PartialEq)]
pub struct BillPayConfig {
    /// How long the simulated network takes to settle a confirmed payment.
    pub settlement_delay: Duration,
    /// Share of a bill's amount used as its minimum due when the source
    /// doesn't supply one.
    pub minimum_due_ratio: Decimal,
}

impl Default for BillPayConfig {
    fn default() -> Self {
        Self {
            settlement_delay: DEFAULT_SETTLEMENT_DELAY,
            minimum_due_ratio: DEFAULT_MINIMUM_DUE_RATIO,
        }
    }
}

impl BillPayConfig {
    pub fn with_settlement_millis(mut self, millis: u64) -> Self {
        self.settlement_delay = Duration::from_millis(millis);
        self
    }
}
