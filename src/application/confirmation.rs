use crate::application::session::{BillSession, SharedSession};
use crate::domain::account::{Account, AccountId};
use crate::domain::bill::{Bill, BillId};
use crate::domain::money::{Amount, Money};
use crate::domain::payment::{PaymentOrder, PaymentReceipt};
use crate::domain::ports::Settlement;
use crate::domain::selector::{AmountSelector, SelectionRange};
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Where a payment stands in the confirmation flow.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentState {
    /// Reviewing the bill and choosing account, amount and date.
    Idle,
    /// Confirmed and waiting for settlement. Cannot be cancelled.
    Processing,
    /// Settled and applied, waiting to be dismissed.
    Success(PaymentReceipt),
    /// Abandoned before confirmation. Nothing was changed.
    Cancelled,
}

impl PaymentState {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentState::Idle => "idle",
            PaymentState::Processing => "processing",
            PaymentState::Success(_) => "succeeded",
            PaymentState::Cancelled => "cancelled",
        }
    }
}

/// Drives one bill through review, confirmation, settlement and success.
///
/// The flow works on a snapshot of the bill and of the funding account and
/// hands the actual mutation to [`BillSession::apply`]. Its state is published
/// on a `watch` channel for whoever renders it.
#[derive(Debug)]
pub struct PaymentFlow {
    bill: Bill,
    account: Account,
    selector: AmountSelector,
    earliest_date: NaiveDate,
    payment_date: NaiveDate,
    state: watch::Sender<PaymentState>,
}

impl PaymentFlow {
    /// Opens the flow for an unpaid bill, funded from `account_id`.
    ///
    /// The dial runs from zero to the bill amount, starts at the minimum due
    /// and is capped at the account balance. The payment date defaults to
    /// `today`, which is also the earliest date accepted.
    pub fn open(
        session: &BillSession,
        bill_id: BillId,
        account_id: AccountId,
        today: NaiveDate,
    ) -> Result<Self> {
        let bill = session
            .bill(bill_id)
            .ok_or(PaymentError::BillNotFound(bill_id))?
            .clone();
        if bill.paid {
            return Err(PaymentError::BillAlreadyPaid(bill_id));
        }
        let account = session
            .account(account_id)
            .ok_or(PaymentError::AccountNotFound(account_id))?
            .clone();

        let selector = AmountSelector::new(SelectionRange::for_bill(&bill)?)
            .with_drag_limit(account.balance);
        let (state, _) = watch::channel(PaymentState::Idle);

        debug!(bill = %bill.id, account = %account.id, "payment flow opened");
        Ok(Self {
            bill,
            account,
            selector,
            earliest_date: today,
            payment_date: today,
            state,
        })
    }

    pub fn state(&self) -> PaymentState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PaymentState> {
        self.state.subscribe()
    }

    pub fn is_idle(&self) -> bool {
        matches!(*self.state.borrow(), PaymentState::Idle)
    }

    pub fn is_processing(&self) -> bool {
        matches!(*self.state.borrow(), PaymentState::Processing)
    }

    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn selector(&self) -> &AmountSelector {
        &self.selector
    }

    pub fn selected_amount(&self) -> Money {
        self.selector.selected()
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    fn transition(&self, next: PaymentState) {
        debug!(
            bill = %self.bill.id,
            from = self.state.borrow().label(),
            to = next.label(),
            "payment state changed"
        );
        self.state.send_replace(next);
    }

    fn require_idle(&self, action: &'static str) -> Result<()> {
        let state = self.state.borrow();
        match *state {
            PaymentState::Idle => Ok(()),
            ref other => Err(PaymentError::InvalidTransition {
                action,
                state: other.label(),
            }),
        }
    }

    fn use_account(&mut self, account: Account) {
        self.selector.set_drag_limit(Some(account.balance));
        self.account = account;
    }

    /// Switches the funding account and re-caps the dial at its balance.
    pub fn select_account(&mut self, session: &BillSession, account_id: AccountId) -> Result<()> {
        self.require_idle("change account")?;
        let account = session
            .account(account_id)
            .ok_or(PaymentError::AccountNotFound(account_id))?
            .clone();
        self.use_account(account);
        Ok(())
    }

    /// Reloads the funding account from the session, picking up balance
    /// changes made by other payments.
    pub fn refresh(&mut self, session: &BillSession) -> Result<()> {
        self.select_account(session, self.account.id)
    }

    /// Sets the amount directly. Ignored unless the flow is idle.
    pub fn set_amount(&mut self, amount: Money) -> Money {
        if self.is_idle() {
            self.selector.set_amount(amount)
        } else {
            self.selector.selected()
        }
    }

    /// Feeds a dial drag event. Ignored unless the flow is idle.
    pub fn drag_to(&mut self, dx: f64, dy: f64) -> Money {
        if self.is_idle() {
            self.selector.drag_to(dx, dy)
        } else {
            self.selector.selected()
        }
    }

    /// Moves the dial to `angle` degrees. Ignored unless the flow is idle.
    pub fn select_angle(&mut self, angle: f64) -> Money {
        if self.is_idle() {
            self.selector.select_angle(angle)
        } else {
            self.selector.selected()
        }
    }

    pub fn set_payment_date(&mut self, date: NaiveDate) -> Result<()> {
        self.require_idle("change payment date")?;
        if date < self.earliest_date {
            return Err(PaymentError::ValidationError(format!(
                "Payment date {} is before {}",
                date, self.earliest_date
            )));
        }
        self.payment_date = date;
        Ok(())
    }

    /// The account cannot cover the selected amount.
    pub fn insufficient_funds(&self) -> bool {
        self.account.has_insufficient_funds(self.selector.selected())
    }

    /// The account cannot even cover the minimum due; the dial is unusable.
    pub fn insufficient_funds_for_minimum(&self) -> bool {
        self.account.has_insufficient_funds(self.bill.minimum_due)
    }

    /// Whether the confirm action is enabled right now.
    pub fn can_confirm(&self) -> bool {
        self.is_idle()
            && !self.insufficient_funds_for_minimum()
            && !self.insufficient_funds()
            && self.selector.selected().is_positive()
    }

    /// Idle → Processing. Returns the order to settle.
    pub fn begin(&mut self) -> Result<PaymentOrder> {
        match self.state() {
            PaymentState::Idle => {}
            PaymentState::Processing => {
                return Err(PaymentError::ConfirmationUnavailable(
                    "a payment is already processing",
                ));
            }
            other => {
                return Err(PaymentError::InvalidTransition {
                    action: "confirm",
                    state: other.label(),
                });
            }
        }
        if self.insufficient_funds_for_minimum() {
            return Err(PaymentError::ConfirmationUnavailable(
                "insufficient funds for the minimum due",
            ));
        }
        if self.insufficient_funds() {
            return Err(PaymentError::ConfirmationUnavailable("insufficient funds"));
        }
        let amount = Amount::try_from(self.selector.selected())
            .map_err(|_| PaymentError::ConfirmationUnavailable("no amount selected"))?;

        let order = PaymentOrder {
            bill_id: self.bill.id,
            account_id: self.account.id,
            amount,
            payment_date: self.payment_date,
        };
        self.transition(PaymentState::Processing);
        Ok(order)
    }

    /// Processing → Success, applying `order` to the session.
    ///
    /// If the session rejects the payment the flow goes back to idle and the
    /// error is returned.
    pub fn complete(
        &mut self,
        session: &mut BillSession,
        order: &PaymentOrder,
    ) -> Result<PaymentReceipt> {
        if !self.is_processing() {
            return Err(PaymentError::InvalidTransition {
                action: "complete",
                state: self.state().label(),
            });
        }
        match session.apply(order) {
            Ok(receipt) => {
                self.account.balance = receipt.remaining_balance;
                self.bill.paid = true;
                self.transition(PaymentState::Success(receipt.clone()));
                Ok(receipt)
            }
            Err(e) => {
                warn!(bill = %order.bill_id, error = %e, "payment rejected by session");
                self.transition(PaymentState::Idle);
                Err(e)
            }
        }
    }

    /// Confirms the selected payment, waits for settlement and applies it.
    ///
    /// The account is reloaded first. If its balance no longer covers the
    /// selected amount the confirmation is refused and the flow stays idle;
    /// the amount is never lowered to fit. The session lock is only taken to
    /// refresh the account and to apply the payment, never across the
    /// settlement wait.
    pub async fn confirm(
        &mut self,
        session: &SharedSession,
        settlement: &dyn Settlement,
    ) -> Result<PaymentReceipt> {
        if self.is_idle() {
            let selected = self.selected_amount();
            self.refresh(&*session.read().await)?;
            if self.selected_amount() != selected || self.insufficient_funds() {
                warn!(
                    bill = %self.bill.id,
                    %selected,
                    balance = %self.account.balance,
                    "balance no longer covers the selected amount"
                );
                return Err(PaymentError::ConfirmationUnavailable("insufficient funds"));
            }
        }
        let order = self.begin()?;
        if let Err(e) = settlement.settle(&order).await {
            warn!(bill = %order.bill_id, error = %e, "settlement failed");
            self.transition(PaymentState::Idle);
            return Err(e);
        }
        let mut session = session.write().await;
        self.complete(&mut session, &order)
    }

    /// Idle → Cancelled. Refused once the payment is processing or done.
    pub fn cancel(&mut self) -> Result<()> {
        self.require_idle("cancel")?;
        self.transition(PaymentState::Cancelled);
        Ok(())
    }

    /// Closes a successful flow and hands back its receipt.
    pub fn dismiss(self) -> Result<PaymentReceipt> {
        match self.state() {
            PaymentState::Success(receipt) => Ok(receipt),
            other => Err(PaymentError::InvalidTransition {
                action: "dismiss",
                state: other.label(),
            }),
        }
    }
}
