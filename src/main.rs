use billpay::application::confirmation::PaymentFlow;
use billpay::application::listing::{BillQuery, BillSort, SortOption};
use billpay::application::session::BillSession;
use billpay::config::BillPayConfig;
use billpay::domain::account::{Account, AccountType};
use billpay::domain::bill::Bill;
use billpay::domain::money::Money;
use billpay::infrastructure::simulated::SimulatedSettlement;
use billpay::interfaces::csv::bill_reader::BillReader;
use billpay::interfaces::csv::bill_writer::BillWriter;
use billpay::logging::init_tracing;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List bills, filtered and sorted
    List(ListArgs),
    /// Pay one bill through the amount dial and the confirmation flow
    Pay(PayArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Input bills CSV file
    input: PathBuf,

    /// Include bills that are already paid
    #[arg(long)]
    show_paid: bool,

    /// Field to sort by
    #[arg(long, value_enum, default_value_t = SortArg::DueDate)]
    sort: SortArg,

    /// Sort in descending order
    #[arg(long)]
    descending: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
}

#[derive(Args)]
struct PayArgs {
    /// Input bills CSV file
    input: PathBuf,

    /// Payee of the bill to pay
    #[arg(long)]
    payee: String,

    /// Balance of the checking account the bill is paid from
    #[arg(long)]
    balance: Decimal,

    /// Amount to pay, set directly
    #[arg(long, conflicts_with = "angles")]
    amount: Option<Decimal>,

    /// Dial angle in degrees (0 at the top, clockwise). Repeat to trace a drag.
    #[arg(long = "angle", allow_negative_numbers = true)]
    angles: Vec<f64>,

    /// Payment date (YYYY-MM-DD), today or later
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Simulated settlement delay in milliseconds
    #[arg(long, default_value_t = 1500)]
    settlement_ms: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    DueDate,
    Payee,
    Amount,
    Category,
    PaidStatus,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::DueDate => SortOption::DueDate,
            SortArg::Payee => SortOption::Payee,
            SortArg::Amount => SortOption::Amount,
            SortArg::Category => SortOption::Category,
            SortArg::PaidStatus => SortOption::PaidStatus,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::List(args) => list(args),
        Command::Pay(args) => pay(args).await,
    }
}

/// Loads every valid bill, reporting and skipping the rows that aren't.
fn load_bills(path: &Path, config: &BillPayConfig) -> Result<Vec<Bill>> {
    let file = File::open(path).into_diagnostic()?;
    let reader = BillReader::new(file, config.minimum_due_ratio);
    let mut bills = Vec::new();
    for bill_result in reader.bills() {
        match bill_result {
            Ok(bill) => bills.push(bill),
            Err(e) => {
                warn!(error = %e, "skipping bill row");
            }
        }
    }
    Ok(bills)
}

fn list(args: ListArgs) -> Result<()> {
    let config = BillPayConfig::default();
    let bills = load_bills(&args.input, &config)?;
    let session = BillSession::new(bills, Vec::new());

    let option = SortOption::from(args.sort);
    let query = BillQuery {
        show_paid: args.show_paid,
        sort: if args.descending {
            BillSort::descending(option)
        } else {
            BillSort::ascending(option)
        },
    };
    let listing = session.listing(&query).into_diagnostic()?;

    let stdout = io::stdout();
    match args.format {
        Format::Csv => {
            let mut writer = BillWriter::new(stdout.lock());
            writer.write_bills(&listing.bills).into_diagnostic()?;
        }
        Format::Json => {
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &listing).into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
    }
    eprintln!("Unpaid total: {}", listing.unpaid_total);

    Ok(())
}

async fn pay(args: PayArgs) -> Result<()> {
    let config = BillPayConfig::default().with_settlement_millis(args.settlement_ms);
    let bills = load_bills(&args.input, &config)?;

    let account = Account::new(
        "Checking Account",
        AccountType::Checking,
        Money::new(args.balance),
    );
    let account_id = account.id;
    let session = BillSession::new(bills, vec![account]);

    let bill_id = session
        .find_bill_by_payee(&args.payee)
        .map(|bill| bill.id)
        .ok_or_else(|| miette!("No bill found for payee '{}'", args.payee))?;

    let today = Local::now().date_naive();
    let mut flow = PaymentFlow::open(&session, bill_id, account_id, today).into_diagnostic()?;
    if let Some(date) = args.date {
        flow.set_payment_date(date).into_diagnostic()?;
    }
    if let Some(amount) = args.amount {
        flow.set_amount(Money::new(amount));
    }
    for angle in args.angles {
        flow.select_angle(angle);
    }

    let shared = session.into_shared();
    let settlement = SimulatedSettlement::new(config.settlement_delay);
    flow.confirm(&shared, &settlement).await.into_diagnostic()?;
    let receipt = flow.dismiss().into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BillWriter::new(stdout.lock());
    writer.write_receipt(&receipt).into_diagnostic()?;

    Ok(())
}
