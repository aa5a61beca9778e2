//! Streaming CSV readers for system exports and bank statements

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

use crate::types::*;
use crate::utils::validation::*;

/// Header of a system ledger export
pub const SYSTEM_HEADERS: [&str; 5] = ["trxID", "amount", "source", "type", "transactionTime"];

/// Header of a bank statement
pub const BANK_HEADERS: [&str; 3] = ["unique_identifier", "amount", "date"];

/// Transactions decoded from one CSV stream
#[derive(Debug, Clone, Default)]
pub struct DecodedRows {
    pub transactions: Vec<Transaction>,
    /// Rows rejected for decoding or field errors
    pub skipped: usize,
}

/// Provenance stamped into every transaction's raw data
#[derive(Debug, Clone)]
pub struct RowContext<'a> {
    pub job_id: &'a str,
    pub file: &'a str,
}

/// Decode a system ledger export. Amounts are sign-normalized from the type column.
pub fn read_system_transactions<R: Read>(
    reader: R,
    ctx: &RowContext<'_>,
) -> ReconcileResult<DecodedRows> {
    decode(reader, "system transaction", &SYSTEM_HEADERS, |record, row| {
        parse_system_row(record, row, ctx)
    })
}

/// Decode a bank statement. The type is taken from the amount sign.
pub fn read_bank_statements<R: Read>(
    reader: R,
    bank_source: &str,
    ctx: &RowContext<'_>,
) -> ReconcileResult<DecodedRows> {
    decode(reader, "bank statement", &BANK_HEADERS, |record, row| {
        parse_bank_row(record, row, bank_source, ctx)
    })
}

fn decode<R, F>(
    reader: R,
    kind: &'static str,
    expected: &[&str],
    mut parse: F,
) -> ReconcileResult<DecodedRows>
where
    R: Read,
    F: FnMut(&StringRecord, u64) -> ReconcileResult<Transaction>,
{
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if !headers_match(&headers, expected) {
        return Err(ReconcileError::InvalidHeaders {
            kind,
            expected: expected.iter().map(|h| h.to_string()).collect(),
            found: headers.iter().map(|h| h.to_string()).collect(),
        });
    }

    let mut decoded = DecodedRows::default();
    let mut row: u64 = 0;

    for record in rdr.records() {
        row += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(kind, row, error = %e, "skipping unreadable row");
                decoded.skipped += 1;
                continue;
            }
        };

        if record.len() != expected.len() {
            tracing::warn!(
                kind,
                row,
                expected = expected.len(),
                found = record.len(),
                "skipping row with wrong column count"
            );
            decoded.skipped += 1;
            continue;
        }

        match parse(&record, row) {
            Ok(txn) => decoded.transactions.push(txn),
            Err(e) => {
                tracing::warn!(kind, row, error = %e, "skipping invalid row");
                decoded.skipped += 1;
            }
        }
    }

    Ok(decoded)
}

fn headers_match(headers: &StringRecord, expected: &[&str]) -> bool {
    headers.len() == expected.len()
        && headers
            .iter()
            .zip(expected)
            .all(|(found, want)| found.eq_ignore_ascii_case(want))
}

fn parse_system_row(
    record: &StringRecord,
    row: u64,
    ctx: &RowContext<'_>,
) -> ReconcileResult<Transaction> {
    let (id, amount, source, txn_type, time) =
        (&record[0], &record[1], &record[2], &record[3], &record[4]);

    validate_transaction_id(id)?;
    let parsed_amount = parse_amount(amount)?;
    let parsed_type = parse_transaction_type(txn_type)?;
    let parsed_time = parse_timestamp(time)?;

    Ok(Transaction::new(
        id.to_string(),
        SourceType::System,
        source.to_uppercase(),
        parsed_time,
        parsed_amount,
        parsed_type,
    )
    .with_raw("trxID", id)
    .with_raw("amount", amount)
    .with_raw("source", source)
    .with_raw("type", txn_type)
    .with_raw("transactionTime", time)
    .with_raw("rowNumber", row.to_string())
    .with_raw("file", ctx.file)
    .with_raw("jobId", ctx.job_id))
}

fn parse_bank_row(
    record: &StringRecord,
    row: u64,
    bank_source: &str,
    ctx: &RowContext<'_>,
) -> ReconcileResult<Transaction> {
    let (id, amount, date) = (&record[0], &record[1], &record[2]);

    validate_transaction_id(id)?;
    let parsed_amount = parse_amount(amount)?;
    let parsed_date = parse_bank_date(date)?;
    let txn_type = if parsed_amount < bigdecimal::BigDecimal::from(0) {
        TransactionType::Debit
    } else {
        TransactionType::Credit
    };

    Ok(Transaction::new(
        id.to_string(),
        SourceType::Bank,
        bank_source.to_uppercase(),
        parsed_date,
        parsed_amount,
        txn_type,
    )
    .with_raw("unique_identifier", id)
    .with_raw("amount", amount)
    .with_raw("date", date)
    .with_raw("bankSource", bank_source)
    .with_raw("rowNumber", row.to_string())
    .with_raw("file", ctx.file)
    .with_raw("jobId", ctx.job_id))
}
