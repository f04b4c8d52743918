use crate::domain::bill::{Bill, BillCategory, BillId, default_minimum_due};
use crate::domain::money::{Amount, Money};
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use uuid::Uuid;

/// One CSV row as it appears on disk.
///
/// `id`, `minimum_due` and `paid` may be left empty or omitted.
#[derive(Debug, Deserialize)]
struct BillRecord {
    #[serde(default)]
    id: Option<Uuid>,
    payee: String,
    amount: Decimal,
    #[serde(default)]
    minimum_due: Option<Decimal>,
    due_date: NaiveDate,
    category: BillCategory,
    #[serde(default)]
    paid: Option<bool>,
}

impl BillRecord {
    fn into_bill(self, minimum_due_ratio: Decimal) -> Result<Bill> {
        let amount = Amount::new(self.amount)?;
        let minimum_due = self
            .minimum_due
            .map(Money::new)
            .unwrap_or_else(|| default_minimum_due(amount, minimum_due_ratio));

        let mut bill = Bill::new(self.payee, amount, self.due_date, self.category)
            .with_minimum_due(minimum_due)?;
        if let Some(id) = self.id {
            bill = bill.with_id(BillId::from_uuid(id));
        }
        if self.paid.unwrap_or(false) {
            bill = bill.settled();
        }
        Ok(bill)
    }
}

/// Reads bills from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and accepting short records, and
/// validates every row into a [`Bill`].
pub struct BillReader<R: Read> {
    reader: csv::Reader<R>,
    minimum_due_ratio: Decimal,
}

impl<R: Read> BillReader<R> {
    /// Creates a new `BillReader` from any `Read` source (e.g., File, Stdin).
    ///
    /// Rows without a minimum due get `amount * minimum_due_ratio`.
    pub fn new(source: R, minimum_due_ratio: Decimal) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self {
            reader,
            minimum_due_ratio,
        }
    }

    /// Lazily reads, deserializes and validates bills.
    pub fn bills(self) -> impl Iterator<Item = Result<Bill>> {
        let ratio = self.minimum_due_ratio;
        self.reader
            .into_deserialize::<BillRecord>()
            .map(move |result| {
                result
                    .map_err(PaymentError::from)
                    .and_then(|record| record.into_bill(ratio))
            })
    }
}
