use crate::application::listing::{BillListing, BillQuery, build_listing, fold_case};
use crate::domain::account::{Account, AccountId};
use crate::domain::bill::{Bill, BillId};
use crate::domain::money::{Amount, Money};
use crate::domain::payment::{PaymentOrder, PaymentReceipt};
use crate::error::{PaymentError, Result};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::info;

const EVENT_CAPACITY: usize = 64;

/// A session shared between the listing, the dial and a payment in flight.
pub type SharedSession = Arc<RwLock<BillSession>>;

/// Change notifications for whoever renders the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    BillPaid {
        bill_id: BillId,
        account_id: AccountId,
        amount: Amount,
        balance: Money,
    },
}

/// Owns the bills and the accounts for one session.
///
/// Every mutation goes through [`BillSession::pay_bill`], which either marks
/// the bill paid and debits the account, or changes nothing.
pub struct BillSession {
    bills: Vec<Bill>,
    accounts: Vec<Account>,
    events: broadcast::Sender<SessionEvent>,
}

impl BillSession {
    pub fn new(bills: Vec<Bill>, accounts: Vec<Account>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            bills,
            accounts,
            events,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn bill(&self, id: BillId) -> Option<&Bill> {
        self.bills.iter().find(|bill| bill.id == id)
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// First bill whose payee matches `payee`, ignoring case the same way
    /// the payee sort does.
    pub fn find_bill_by_payee(&self, payee: &str) -> Option<&Bill> {
        let wanted = fold_case(payee);
        self.bills.iter().find(|bill| fold_case(&bill.payee) == wanted)
    }

    pub fn listing(&self, query: &BillQuery) -> Result<BillListing> {
        build_listing(&self.bills, query)
    }

    /// Marks the bill paid and debits `amount` from the account, returning the
    /// new balance.
    ///
    /// Both lookups happen before anything is written, so a missing bill, a
    /// missing account or an already paid bill leaves the session untouched.
    /// The bill is only marked paid once the debit has gone through. Available
    /// funds are not checked here.
    pub fn pay_bill(
        &mut self,
        bill_id: BillId,
        account_id: AccountId,
        amount: Amount,
    ) -> Result<Money> {
        let bill_index = self
            .bills
            .iter()
            .position(|bill| bill.id == bill_id)
            .ok_or(PaymentError::BillNotFound(bill_id))?;
        let account_index = self
            .accounts
            .iter()
            .position(|account| account.id == account_id)
            .ok_or(PaymentError::AccountNotFound(account_id))?;

        if self.bills[bill_index].paid {
            return Err(PaymentError::BillAlreadyPaid(bill_id));
        }

        let balance = self.accounts[account_index].debit(amount)?;
        self.bills[bill_index].paid = true;

        info!(
            bill = %bill_id,
            account = %account_id,
            %amount,
            %balance,
            "bill paid"
        );
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::BillPaid {
            bill_id,
            account_id,
            amount,
            balance,
        });

        Ok(balance)
    }

    /// Applies a settled order and describes the result.
    pub fn apply(&mut self, order: &PaymentOrder) -> Result<PaymentReceipt> {
        let remaining_balance = self.pay_bill(order.bill_id, order.account_id, order.amount)?;
        let payee = self
            .bill(order.bill_id)
            .map(|bill| bill.payee.clone())
            .unwrap_or_default();
        Ok(PaymentReceipt {
            bill_id: order.bill_id,
            payee,
            account_id: order.account_id,
            amount: order.amount,
            payment_date: order.payment_date,
            remaining_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountType;
    use crate::domain::bill::BillCategory;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn session() -> (BillSession, BillId, AccountId) {
        let bill = Bill::new(
            "Electric Company",
            Amount::new(dec!(142.50)).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            BillCategory::Utilities,
        );
        let account = Account::new(
            "Checking Account",
            AccountType::Checking,
            Money::new(dec!(200.00)),
        );
        let (bill_id, account_id) = (bill.id, account.id);
        (BillSession::new(vec![bill], vec![account]), bill_id, account_id)
    }

    #[test]
    fn test_pay_bill_marks_paid_and_debits() {
        let (mut session, bill_id, account_id) = session();
        let balance = session
            .pay_bill(bill_id, account_id, Amount::new(dec!(142.50)).unwrap())
            .unwrap();

        assert_eq!(balance, Money::new(dec!(57.50)));
        assert!(session.bill(bill_id).unwrap().paid);
        assert_eq!(
            session.account(account_id).unwrap().balance,
            Money::new(dec!(57.50))
        );
    }

    #[test]
    fn test_second_payment_changes_nothing() {
        let (mut session, bill_id, account_id) = session();
        let amount = Amount::new(dec!(17.81)).unwrap();
        session.pay_bill(bill_id, account_id, amount).unwrap();

        let result = session.pay_bill(bill_id, account_id, amount);
        assert!(matches!(result, Err(PaymentError::BillAlreadyPaid(id)) if id == bill_id));
        assert_eq!(
            session.account(account_id).unwrap().balance,
            Money::new(dec!(182.19))
        );
    }

    #[test]
    fn test_unknown_bill_is_surfaced() {
        let (mut session, _, account_id) = session();
        let missing = BillId::new();
        let result = session.pay_bill(missing, account_id, Amount::new(dec!(1)).unwrap());
        assert!(matches!(result, Err(PaymentError::BillNotFound(id)) if id == missing));
        assert_eq!(
            session.account(account_id).unwrap().balance,
            Money::new(dec!(200.00))
        );
    }

    #[test]
    fn test_unknown_account_leaves_bill_unpaid() {
        let (mut session, bill_id, _) = session();
        let result = session.pay_bill(bill_id, AccountId::new(), Amount::new(dec!(1)).unwrap());
        assert!(matches!(result, Err(PaymentError::AccountNotFound(_))));
        assert!(!session.bill(bill_id).unwrap().paid);
    }

    #[test]
    fn test_paid_bill_drops_out_of_default_listing() {
        let (mut session, bill_id, account_id) = session();
        session
            .pay_bill(bill_id, account_id, Amount::new(dec!(20)).unwrap())
            .unwrap();
        let listing = session.listing(&BillQuery::default()).unwrap();
        assert!(listing.bills.is_empty());
        assert_eq!(listing.unpaid_total, Money::ZERO);
    }

    #[test]
    fn test_find_bill_by_payee_ignores_case() {
        let (session, bill_id, _) = session();
        assert_eq!(
            session.find_bill_by_payee("electric company").map(|b| b.id),
            Some(bill_id)
        );
        assert!(session.find_bill_by_payee("Water").is_none());
    }

    #[test]
    fn test_find_bill_by_payee_folds_non_ascii_case() {
        let bill = Bill::new(
            "Énergie Québec",
            Amount::new(dec!(88.00)).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
            BillCategory::Utilities,
        );
        let bill_id = bill.id;
        let session = BillSession::new(vec![bill], Vec::new());
        assert_eq!(
            session.find_bill_by_payee("ÉNERGIE QUÉBEC").map(|b| b.id),
            Some(bill_id)
        );
        assert_eq!(
            session.find_bill_by_payee("énergie québec").map(|b| b.id),
            Some(bill_id)
        );
    }

    #[test]
    fn test_debit_overflow_leaves_bill_unpaid() {
        let bill = Bill::new(
            "Electric Company",
            Amount::new(dec!(142.50)).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            BillCategory::Utilities,
        );
        let account = Account::new(
            "Overdrawn",
            AccountType::Checking,
            Money::new(rust_decimal::Decimal::MIN),
        );
        let (bill_id, account_id) = (bill.id, account.id);
        let mut session = BillSession::new(vec![bill], vec![account]);
        let mut events = session.subscribe();

        let result = session.pay_bill(bill_id, account_id, Amount::new(dec!(1)).unwrap());
        assert!(matches!(result, Err(PaymentError::Overflow(_))));
        assert!(!session.bill(bill_id).unwrap().paid);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscribers_see_payments() {
        let (mut session, bill_id, account_id) = session();
        let mut events = session.subscribe();
        session
            .pay_bill(bill_id, account_id, Amount::new(dec!(142.50)).unwrap())
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::BillPaid {
                bill_id,
                account_id,
                amount: Amount::new(dec!(142.50)).unwrap(),
                balance: Money::new(dec!(57.50)),
            }
        );
    }
}
