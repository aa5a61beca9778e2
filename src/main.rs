use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ledger_reconcile::ingest::{self, DateRange, LoadedFile};
use ledger_reconcile::report::{self, ReportContext};
use ledger_reconcile::{MatcherConfig, ReconciliationEngine, Transaction};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "reconcile", version, about = "Reconcile system transactions against bank statements")]
struct Cli {
    /// Comma-separated paths to system transaction CSV files
    #[arg(long = "system", value_delimiter = ',', required = true)]
    system: Vec<String>,

    /// Comma-separated paths to bank statement CSV files ({bank}_statement_{date}.csv)
    #[arg(long = "banks", value_delimiter = ',', required = true)]
    banks: Vec<String>,

    /// First day of the reconciliation period (YYYY-MM-DD)
    #[arg(long = "start")]
    start: NaiveDate,

    /// Last day of the reconciliation period (YYYY-MM-DD)
    #[arg(long = "end")]
    end: NaiveDate,

    /// JSON file with matcher configuration
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Amount tolerance in percent, overrides the config file
    #[arg(long = "tolerance")]
    tolerance: Option<f64>,

    /// Report format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let period = DateRange::new(cli.start, cli.end)?;
    let config = load_config(&cli)?;
    let job_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(job_id = %job_id, start = %period.start, end = %period.end, "starting reconciliation");

    let system_files = load_side("system", &cli.system, |path| {
        ingest::load_system_file(path, Some(&period), &job_id)
    })?;
    let bank_files = load_side("bank statement", &cli.banks, |path| {
        ingest::load_bank_file(path, Some(&period), &job_id)
    })?;

    let mut bank_counts = BTreeMap::new();
    for file in &bank_files {
        *bank_counts.entry(file.source.clone()).or_insert(0) += file.transactions.len();
    }

    let system_txns: Vec<Transaction> = system_files
        .into_iter()
        .flat_map(|f| f.transactions)
        .collect();
    let bank_txns: Vec<Transaction> = bank_files
        .into_iter()
        .flat_map(|f| f.transactions)
        .collect();

    let engine = ReconciliationEngine::with_config(config);
    let result = engine
        .reconcile(&system_txns, &bank_txns)
        .context("reconciliation failed")?;

    let rendered = match cli.format {
        OutputFormat::Text => report::render_text(
            &result,
            &ReportContext {
                period: Some(period),
                bank_counts,
            },
        ),
        OutputFormat::Json => report::render_json(&result)?,
    };
    println!("{rendered}");

    Ok(())
}

fn load_config(cli: &Cli) -> Result<MatcherConfig> {
    let mut config = match &cli.config {
        Some(path) => MatcherConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MatcherConfig::default(),
    };

    if let Some(tolerance) = cli.tolerance {
        config.amount_tolerance_percent = tolerance;
    }
    config.validate()?;

    Ok(config)
}

/// Load every usable file on one side; fail only if none is usable
fn load_side<F>(kind: &str, raw_paths: &[String], mut load: F) -> Result<Vec<LoadedFile>>
where
    F: FnMut(&std::path::Path) -> ledger_reconcile::ReconcileResult<LoadedFile>,
{
    let (valid, invalid) = ingest::partition_paths(raw_paths.iter().map(|p| p.trim()));
    for path in &invalid {
        tracing::warn!(kind, path = %path.display(), "invalid file path");
    }
    if valid.is_empty() {
        bail!("no valid {kind} files provided");
    }

    let mut loaded = Vec::new();
    for path in &valid {
        match load(path) {
            Ok(file) => loaded.push(file),
            Err(e) => tracing::error!(kind, path = %path.display(), error = %e, "failed to read file"),
        }
    }

    if loaded.is_empty() {
        bail!("none of the {kind} files could be read");
    }

    Ok(loaded)
}
