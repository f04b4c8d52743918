use crate::domain::payment::PaymentOrder;
use crate::domain::ports::Settlement;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Settles every payment after a fixed delay.
///
/// Stands in for a payment network: the delay always elapses and settlement
/// always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSettlement {
    delay: Duration,
}

impl SimulatedSettlement {
    /// Creates a settlement that waits `delay` before succeeding.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Settlement for SimulatedSettlement {
    async fn settle(&self, order: &PaymentOrder) -> Result<()> {
        debug!(bill = %order.bill_id, delay_ms = self.delay.as_millis() as u64, "settling payment");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Settles without waiting.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateSettlement;

#[async_trait]
impl Settlement for ImmediateSettlement {
    async fn settle(&self, _order: &PaymentOrder) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::bill::BillId;
    use crate::domain::money::Amount;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tokio::time::Instant;

    fn order() -> PaymentOrder {
        PaymentOrder {
            bill_id: BillId::new(),
            account_id: AccountId::new(),
            amount: Amount::new(dec!(10.0)).unwrap(),
            payment_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_settlement_waits_for_delay() {
        let settlement = SimulatedSettlement::new(Duration::from_millis(1500));
        let started = Instant::now();
        settlement.settle(&order()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_settlement_does_not_wait() {
        let started = Instant::now();
        ImmediateSettlement.settle(&order()).await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
