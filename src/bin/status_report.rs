//! Per-month supporter status counts
//!
//! Emits one CSV row per report month counting supporters in each lifecycle
//! state. The "New" column matches "Total New" in the returning report for
//! the same month.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use supporter_lifecycle::calendar::MonthDate;
use supporter_lifecycle::payment::PaymentStore;
use supporter_lifecycle::report;

#[derive(Debug, Parser)]
#[command(
    name = "status_report",
    about = "Print a CSV report of supporter status counts per month"
)]
struct Args {
    /// Path to the payments CSV file (date,entity,payee,program,amount)
    #[arg(long, default_value = "payments.csv")]
    payments: PathBuf,

    /// First month in report (default: month of the earliest payment)
    #[arg(long, value_name = "YYYY-MM")]
    start_month: Option<String>,

    /// Last month in report (default: today)
    #[arg(long, value_name = "YYYY-MM")]
    end_month: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = PaymentStore::from_csv(&args.payments)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("failed to load payments from {}", args.payments.display()))?;
    log::info!(
        "loaded {} payments from {}",
        store.len(),
        args.payments.display()
    );

    let start_month = match &args.start_month {
        Some(s) => MonthDate::parse_month(s)?,
        None => store
            .earliest_date()
            .context("no payments on record; cannot determine default start month")?,
    };
    let end_month = match &args.end_month {
        Some(s) => MonthDate::parse_month(s)?,
        None => MonthDate::today(),
    };
    if end_month < start_month {
        bail!("End month predates start month");
    }

    let rows: Vec<_> = report::month_range(start_month, end_month)
        .into_iter()
        .map(|month| report::status_counts(&store, month))
        .collect();

    report::write_csv(&rows, std::io::stdout().lock())?;
    Ok(())
}
