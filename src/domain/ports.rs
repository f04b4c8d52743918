use super::payment::PaymentOrder;
use crate::error::Result;
use async_trait::async_trait;

/// Finalizes a confirmed payment with whatever network backs it.
///
/// Settling never touches balances; the session applies the payment once
/// `settle` returns.
#[async_trait]
pub trait Settlement: Send + Sync {
    async fn settle(&self, order: &PaymentOrder) -> Result<()>;
}

pub type SettlementBox = Box<dyn Settlement>;
