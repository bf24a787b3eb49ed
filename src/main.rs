mod bank_file;
mod engine;
mod models;
mod storage;
mod types;

use std::fs::File;
use std::io::{stderr, stdout, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::bank_file::DatePolicy;
use crate::engine::{ReassignmentDialog, ReassignmentEngine};
use crate::models::CardAdjustmentRecord;
use crate::storage::{FileCounterStore, LedgerStorage};
use crate::types::dates::parse_date;

#[derive(Parser, Debug)]
#[command(name = "card-reassignment-engine", version, about = "Disburses approved expenses and generates the bank card reassignment file")]
struct Cli {
    /// Batch of approved expenses (CSV)
    input: PathBuf,

    /// Bank client number (up to 10 digits)
    #[arg(long = "client-number")]
    client_number: String,

    /// Bank card group number (up to 9 digits)
    #[arg(long = "group-number")]
    group_number: String,

    /// Directory the reassignment file is written to
    #[arg(long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Where the daily consecutive is kept between runs
    #[arg(long = "state-file", default_value = ".reassignment_consecutive.json")]
    state_file: PathBuf,

    /// Send date (YYYY-MM-DD) stamped on the file, defaults to today
    #[arg(long = "send-date", value_parser = parse_date)]
    send_date: Option<NaiveDate>,

    /// Abort on unreadable dates instead of leaving the field empty
    #[arg(long = "strict-dates")]
    strict_dates: bool,

    /// error, warn, info, debug or trace
    #[arg(long = "log-level", default_value = "error")]
    log_level: String
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let batch = read_batch(&cli.input)?;
    let ledger = Arc::new(LedgerStorage::seed(&batch));
    let counter = Arc::new(FileCounterStore::new(&cli.state_file));
    let date_policy = if cli.strict_dates { DatePolicy::Reject } else { DatePolicy::Degrade };

    let mut engine = ReassignmentEngine::new(ledger.clone(), counter, &cli.output_dir)
        .with_date_policy(date_policy);

    if let Some(send_date) = cli.send_date {
        engine = engine.with_date(send_date);
    }

    let mut dialog = ReassignmentDialog::new();
    dialog.open(&batch)?;
    dialog.enter(&cli.group_number, &cli.client_number)?;

    let file = dialog.submit(&engine, &batch).await?;

    info!("Wrote {} to {} with consecutive [{}] ({} records, total {})", file.file_name, cli.output_dir.display(), file.consecutive, file.control.record_count, file.control.total_amount);
    debug!("{}:\n{}", file.path.display(), file.contents);

    write_results_to_stdout(&ledger, &batch)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the result table, logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn read_batch(path: &Path) -> Result<Vec<CardAdjustmentRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Error opening batch CSV at path: {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    reader.deserialize::<CardAdjustmentRecord>()
        .enumerate()
        .map(|(index, result)| result.with_context(|| format!("Malformed record #{} in batch", index + 1)))
        .collect()
}

fn write_results_to_stdout(ledger: &LedgerStorage, batch: &[CardAdjustmentRecord]) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "expense,user,card_limit,status")?;

    for record in batch {
        writeln!(
            output,
            "{},{},{},{}",
            record.expense_id,
            record.user_id,
            ledger.card_limit(record.user_id).unwrap_or(record.current_limit),
            ledger.expense_status(record.expense_id).map(|status| status.to_string()).unwrap_or_default()
        )?;
    }

    output.flush()?;

    Ok(())
}
