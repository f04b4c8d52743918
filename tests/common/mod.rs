#![allow(dead_code)]

use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

const CATEGORIES: [&str; 8] = [
    "utilities",
    "internet",
    "phone",
    "rent",
    "insurance",
    "subscription",
    "credit",
    "other",
];

/// Writes `rows` unpaid bills of 10.00 each, due on consecutive days.
pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["id", "payee", "amount", "minimum_due", "due_date", "category", "paid"])?;

    for i in 1..=rows {
        wtr.write_record([
            "",
            &format!("Payee {i}"),
            "10.00",
            "",
            &format!("2026-03-{:02}", (i - 1) % 28 + 1),
            "other",
            "false",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `rows` bills with random amounts, categories, due dates and paid
/// flags.
pub fn generate_random_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let mut rng = rand::thread_rng();
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["id", "payee", "amount", "minimum_due", "due_date", "category", "paid"])?;

    for i in 1..=rows {
        let cents: u32 = rng.gen_range(1..=500_000);
        let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
        let day: u32 = rng.gen_range(1..=28);
        let paid: bool = rng.gen_bool(0.3);
        wtr.write_record([
            "",
            &format!("Payee {i}"),
            &format!("{}.{:02}", cents / 100, cents % 100),
            "",
            &format!("2026-04-{day:02}"),
            category,
            &paid.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
