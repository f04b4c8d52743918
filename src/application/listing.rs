use crate::domain::bill::Bill;
use crate::domain::money::Money;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Field a bill listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    DueDate,
    Payee,
    Amount,
    Category,
    PaidStatus,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::DueDate,
        SortOption::Payee,
        SortOption::Amount,
        SortOption::Category,
        SortOption::PaidStatus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::DueDate => "Due Date",
            SortOption::Payee => "Name",
            SortOption::Amount => "Amount",
            SortOption::Category => "Type",
            SortOption::PaidStatus => "Paid Status",
        }
    }

    /// Ascending comparison of two bills on this field.
    pub fn compare(&self, a: &Bill, b: &Bill) -> Ordering {
        match self {
            SortOption::DueDate => a.due_date.cmp(&b.due_date),
            SortOption::Payee => compare_text(&a.payee, &b.payee),
            SortOption::Amount => a.amount.cmp(&b.amount),
            SortOption::Category => compare_text(a.category.label(), b.category.label()),
            SortOption::PaidStatus => a.paid.cmp(&b.paid),
        }
    }
}

/// Case folding shared by the text sorts and payee lookup.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

fn compare_text(a: &str, b: &str) -> Ordering {
    fold_case(a).cmp(&fold_case(b))
}

/// A sort option paired with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSort {
    pub option: SortOption,
    pub ascending: bool,
}

impl Default for BillSort {
    fn default() -> Self {
        Self::ascending(SortOption::DueDate)
    }
}

impl BillSort {
    pub fn ascending(option: SortOption) -> Self {
        Self {
            option,
            ascending: true,
        }
    }

    pub fn descending(option: SortOption) -> Self {
        Self {
            option,
            ascending: false,
        }
    }

    /// Picks `option` the way the sort menu does: choosing the active option
    /// flips the direction, choosing another one restarts ascending.
    pub fn select(&mut self, option: SortOption) {
        if self.option == option {
            self.ascending = !self.ascending;
        } else {
            *self = Self::ascending(option);
        }
    }

    pub fn toggle_direction(&mut self) {
        self.ascending = !self.ascending;
    }

    pub fn compare(&self, a: &Bill, b: &Bill) -> Ordering {
        let ordering = self.option.compare(a, b);
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

/// What to show from a bill collection, and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillQuery {
    pub show_paid: bool,
    pub sort: BillSort,
}

impl BillQuery {
    pub fn includes(&self, bill: &Bill) -> bool {
        self.show_paid || !bill.paid
    }
}

/// A filtered, ordered view over a bill collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillListing {
    pub bills: Vec<Bill>,
    pub unpaid_total: Money,
}

/// Filters and orders `bills` without touching the source. Ties keep their
/// input order.
pub fn listing(bills: &[Bill], query: &BillQuery) -> Vec<Bill> {
    let mut listed: Vec<Bill> = bills
        .iter()
        .filter(|bill| query.includes(bill))
        .cloned()
        .collect();
    listed.sort_by(|a, b| query.sort.compare(a, b));
    debug!(
        listed = listed.len(),
        total = bills.len(),
        sort = query.sort.option.label(),
        ascending = query.sort.ascending,
        "bill listing built"
    );
    listed
}

/// Sum of the amounts of every unpaid bill.
///
/// Fails with [`PaymentError::Overflow`] when the total cannot be represented.
pub fn unpaid_total(bills: &[Bill]) -> Result<Money> {
    let unpaid = bills.iter().filter(|bill| !bill.paid);
    Money::checked_sum(unpaid.clone().map(|bill| bill.amount.as_money())).ok_or_else(|| {
        PaymentError::Overflow(format!(
            "total of {} unpaid bills is out of range",
            unpaid.count()
        ))
    })
}

/// Listing and unpaid total together.
pub fn build_listing(bills: &[Bill], query: &BillQuery) -> Result<BillListing> {
    Ok(BillListing {
        bills: listing(bills, query),
        unpaid_total: unpaid_total(bills)?,
    })
}
