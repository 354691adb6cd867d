//! # Financial Reports Printer
//!
//! Loads a ledger snapshot exported by the web app and prints the income
//! statement, balance sheet, cash-flow statement and trial balance for a
//! period.
//!
//! ## Usage
//! ```bash
//! cargo run -p makhzonak-cli --bin makhzonak-reports -- \
//!     --data ./snapshot.json --from 2024-01-01 --to 2024-03-31
//!
//! # JSON output, explicit settings file
//! cargo run -p makhzonak-cli --bin makhzonak-reports -- \
//!     --data ./snapshot.json --from 2024-01-01 --to 2024-03-31 \
//!     --config ./settings.toml --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use makhzonak_cli::logging::init_tracing;
use makhzonak_cli::render::render_reports;
use makhzonak_cli::{AppResult, AppState, CompanySettings, Snapshot};
use makhzonak_ledger::DateRange;
use tracing::error;

#[derive(Parser)]
#[command(name = "makhzonak-reports", version, about = "Print financial reports for a ledger snapshot")]
struct Cli {
    /// Snapshot JSON with `accounts` and `journal_entries`.
    #[arg(long, value_name = "FILE")]
    data: PathBuf,

    /// First day of the period (YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the period, inclusive (YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,

    /// Settings file; defaults to the platform config directory.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> AppResult<String> {
    let range = DateRange::new(cli.from, cli.to)?;
    let settings = CompanySettings::load(cli.config.as_deref())?;
    let snapshot = Snapshot::from_file(&cli.data)?;
    let state = AppState::new(settings, snapshot)?;

    let reports = state.reports(range);
    if cli.json {
        Ok(serde_json::to_string_pretty(&reports)?)
    } else {
        Ok(render_reports(&reports, state.settings()))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
