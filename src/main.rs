//! Returning-supporter report CLI
//!
//! Prints a CSV report showing, per month, how many supporters were brand
//! new and how many returned after letting their support expire, bucketed by
//! how long they had been expired.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use supporter_lifecycle::calendar::MonthDate;
use supporter_lifecycle::payment::PaymentStore;
use supporter_lifecycle::report;

#[derive(Debug, Parser)]
#[command(
    name = "returning_report",
    about = "Print a CSV report showing supporters who returned"
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

    /// Emit JSON lines instead of CSV
    #[arg(long)]
    json: bool,
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

    log::info!(
        "reporting from {} through {}",
        start_month.format_month(),
        end_month.format_month()
    );
    let rows = report::report_range(&store, start_month, end_month)?;

    let stdout = std::io::stdout();
    if args.json {
        use std::io::Write;
        let mut out = stdout.lock();
        for row in &rows {
            serde_json::to_writer(&mut out, row)?;
            writeln!(out)?;
        }
    } else {
        report::write_csv(&rows, stdout.lock())?;
    }

    Ok(())
}
