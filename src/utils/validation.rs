//! Field parsing and validation for ingested rows

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;
use std::str::FromStr;

use crate::types::*;

/// Date layouts accepted in bank statements, tried in order
const BANK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Parse a signed decimal amount
pub fn parse_amount(value: &str) -> ReconcileResult<BigDecimal> {
    BigDecimal::from_str(value.trim()).map_err(|e| ReconcileError::InvalidField {
        field: "amount",
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a DEBIT/CREDIT marker, case-insensitive
pub fn parse_transaction_type(value: &str) -> ReconcileResult<TransactionType> {
    value.parse()
}

/// Parse an RFC 3339 timestamp, keeping the wall-clock time of its own offset
pub fn parse_timestamp(value: &str) -> ReconcileResult<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.naive_local())
        .map_err(|e| ReconcileError::InvalidField {
            field: "transactionTime",
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a bank statement date in any of the supported layouts
pub fn parse_bank_date(value: &str) -> ReconcileResult<NaiveDateTime> {
    let trimmed = value.trim();

    for format in BANK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%SZ") {
        return Ok(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }

    Err(ReconcileError::InvalidField {
        field: "date",
        value: value.to_string(),
        reason: "unrecognized date format".to_string(),
    })
}

/// Bank name from a statement file name such as `mandiri_statement_2024-03-15.csv`
pub fn bank_source_from_filename(path: &Path) -> ReconcileResult<String> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ReconcileError::InvalidFilename(path.display().to_string()))?;

    match filename.split_once('_') {
        Some((bank, _)) if !bank.trim().is_empty() => Ok(bank.trim().to_uppercase()),
        _ => Err(ReconcileError::InvalidFilename(filename.to_string())),
    }
}

/// Validate that a transaction id is usable
pub fn validate_transaction_id(id: &str) -> ReconcileResult<()> {
    if id.trim().is_empty() {
        return Err(ReconcileError::InvalidField {
            field: "id",
            value: id.to_string(),
            reason: "transaction id cannot be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" -150.50 ").unwrap(), "-150.5".parse::<BigDecimal>().unwrap());
        assert!(parse_amount("12,00").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_timestamp_keeps_local_day() {
        let dt = parse_timestamp("2024-03-15T23:30:00+07:00").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(parse_timestamp("2024-03-15").is_err());
    }

    #[test]
    fn test_parse_bank_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        for input in [
            "2024-03-15",
            "2024/03/15",
            "15-03-2024",
            "15/03/2024",
            "2024-03-15T10:00:00Z",
            "2024-03-15T10:00:00+07:00",
        ] {
            assert_eq!(parse_bank_date(input).unwrap().date(), expected, "{input}");
        }
        assert!(parse_bank_date("March 15").is_err());
    }

    #[test]
    fn test_bank_source_from_filename() {
        let path = PathBuf::from("/data/mandiri_statement_2024-03-15.csv");
        assert_eq!(bank_source_from_filename(&path).unwrap(), "MANDIRI");

        let path = PathBuf::from("bca_2024.csv");
        assert_eq!(bank_source_from_filename(&path).unwrap(), "BCA");

        assert!(bank_source_from_filename(&PathBuf::from("statement.csv")).is_err());
        assert!(bank_source_from_filename(&PathBuf::from("_statement.csv")).is_err());
    }

    #[test]
    fn test_validate_transaction_id() {
        assert!(validate_transaction_id("TRX-1").is_ok());
        assert!(validate_transaction_id("  ").is_err());
    }
}
