use crate::domain::bill::Bill;
use crate::domain::payment::PaymentReceipt;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BillRow<'a> {
    id: String,
    payee: &'a str,
    amount: String,
    minimum_due: String,
    due_date: String,
    category: &'a str,
    paid: bool,
}

impl<'a> From<&'a Bill> for BillRow<'a> {
    fn from(bill: &'a Bill) -> Self {
        Self {
            id: bill.id.to_string(),
            payee: &bill.payee,
            amount: bill.amount.to_string(),
            minimum_due: bill.minimum_due.to_string(),
            due_date: bill.due_date.to_string(),
            category: bill.category.label(),
            paid: bill.paid,
        }
    }
}

#[derive(Serialize)]
struct ReceiptRow<'a> {
    bill: String,
    payee: &'a str,
    amount: String,
    payment_date: String,
    balance: String,
}

/// Writes bill listings and payment receipts as CSV.
///
/// Amounts are written with two decimal places.
pub struct BillWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BillWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_bills<'a>(&mut self, bills: impl IntoIterator<Item = &'a Bill>) -> Result<()> {
        for bill in bills {
            self.writer.serialize(BillRow::from(bill))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_receipt(&mut self, receipt: &PaymentReceipt) -> Result<()> {
        self.writer.serialize(ReceiptRow {
            bill: receipt.bill_id.to_string(),
            payee: &receipt.payee,
            amount: receipt.amount.to_string(),
            payment_date: receipt.payment_date.to_string(),
            balance: receipt.remaining_balance.to_string(),
        })?;
        self.writer.flush()?;
        Ok(())
    }
}
