//! Loading system exports and bank statements from disk
//!
//! Files are decoded row by row. A bad row is skipped and counted; a bad
//! header fails the whole file. Matching never sees a malformed record.

pub mod reader;

pub use reader::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::types::*;
use crate::utils::validation::bank_source_from_filename;

/// Inclusive calendar window used to select transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting a start after the end
    pub fn new(start: NaiveDate, end: NaiveDate) -> ReconcileResult<Self> {
        if start > end {
            return Err(ReconcileError::InvalidConfig(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Outcome of loading one file
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    /// `SYSTEM` for system exports, the bank name for statements
    pub source: String,
    pub transactions: Vec<Transaction>,
    pub skipped: usize,
    /// Valid rows dropped because they fall outside the date range
    pub filtered_out: usize,
}

/// Split candidate paths into existing regular files and everything else
pub fn partition_paths<I, P>(paths: I) -> (Vec<PathBuf>, Vec<PathBuf>)
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    paths
        .into_iter()
        .map(Into::into)
        .partition(|path: &PathBuf| path.is_file())
}

/// Load a system ledger export
pub fn load_system_file(
    path: &Path,
    range: Option<&DateRange>,
    job_id: &str,
) -> ReconcileResult<LoadedFile> {
    let file = File::open(path)?;
    let label = path.display().to_string();
    let ctx = RowContext {
        job_id,
        file: &label,
    };
    let decoded = read_system_transactions(BufReader::new(file), &ctx)?;
    Ok(finish(path, SourceType::System.to_string(), decoded, range))
}

/// Load a bank statement; the bank name comes from the file name
pub fn load_bank_file(
    path: &Path,
    range: Option<&DateRange>,
    job_id: &str,
) -> ReconcileResult<LoadedFile> {
    let bank_source = bank_source_from_filename(path)?;
    let file = File::open(path)?;
    let label = path.display().to_string();
    let ctx = RowContext {
        job_id,
        file: &label,
    };
    let decoded = read_bank_statements(BufReader::new(file), &bank_source, &ctx)?;
    Ok(finish(path, bank_source, decoded, range))
}

fn finish(
    path: &Path,
    source: String,
    decoded: DecodedRows,
    range: Option<&DateRange>,
) -> LoadedFile {
    let total = decoded.transactions.len();
    let transactions: Vec<Transaction> = match range {
        Some(range) => decoded
            .transactions
            .into_iter()
            .filter(|txn| range.contains(txn.calendar_date()))
            .collect(),
        None => decoded.transactions,
    };
    let filtered_out = total - transactions.len();

    if decoded.skipped > 0 {
        tracing::warn!(
            file = %path.display(),
            skipped = decoded.skipped,
            "skipped invalid rows"
        );
    }
    tracing::info!(
        file = %path.display(),
        source = %source,
        loaded = transactions.len(),
        filtered_out,
        "loaded transactions"
    );

    LoadedFile {
        path: path.to_path_buf(),
        source,
        transactions,
        skipped: decoded.skipped,
        filtered_out,
    }
}
