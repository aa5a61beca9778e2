//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Direction of a money movement, independent of the numeric sign used by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money leaving the account
    Debit,
    /// Money entering the account
    Credit,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Debit => f.write_str("DEBIT"),
            TransactionType::Credit => f.write_str("CREDIT"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Ok(TransactionType::Debit),
            "CREDIT" => Ok(TransactionType::Credit),
            _ => Err(ReconcileError::InvalidField {
                field: "type",
                value: s.to_string(),
                reason: "expected DEBIT or CREDIT".to_string(),
            }),
        }
    }
}

/// Which ledger class a transaction was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceType {
    /// Internal books
    System,
    /// External bank statement
    Bank,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::System => f.write_str("SYSTEM"),
            SourceType::Bank => f.write_str("BANK"),
        }
    }
}

/// A single financial movement from either the system ledger or a bank statement.
///
/// The amount is sign-normalized on construction: debits are negative and
/// credits are non-negative, whatever convention the source used. Deserialized
/// records are normalized the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransaction")]
pub struct Transaction {
    /// Identifier supplied by the source, unique only within its own file
    pub id: String,
    /// Ledger class the record came from
    pub source_type: SourceType,
    /// Originator label such as a bank name
    pub source: String,
    /// When the movement happened; only the calendar day takes part in matching
    pub transaction_date: NaiveDateTime,
    /// Signed amount, negative for debits
    pub amount: BigDecimal,
    /// Debit or credit
    pub transaction_type: TransactionType,
    /// Original field values kept for audit
    pub raw_data: HashMap<String, String>,
    /// Left for the caller to set; the matcher never touches it
    pub matched: bool,
    /// When the record was constructed
    pub created_at: NaiveDateTime,
}

/// Wire shape of a transaction before sign normalization
#[derive(Deserialize)]
struct RawTransaction {
    id: String,
    source_type: SourceType,
    source: String,
    transaction_date: NaiveDateTime,
    amount: BigDecimal,
    transaction_type: TransactionType,
    #[serde(default)]
    raw_data: HashMap<String, String>,
    #[serde(default)]
    matched: bool,
    created_at: NaiveDateTime,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        let mut transaction = Self {
            id: raw.id,
            source_type: raw.source_type,
            source: raw.source,
            transaction_date: raw.transaction_date,
            amount: raw.amount,
            transaction_type: raw.transaction_type,
            raw_data: raw.raw_data,
            matched: raw.matched,
            created_at: raw.created_at,
        };
        transaction.normalize();
        transaction
    }
}

impl Transaction {
    /// Create a new transaction with its amount sign already normalized
    pub fn new(
        id: String,
        source_type: SourceType,
        source: String,
        transaction_date: NaiveDateTime,
        amount: BigDecimal,
        transaction_type: TransactionType,
    ) -> Self {
        let mut transaction = Self {
            id,
            source_type,
            source,
            transaction_date,
            amount,
            transaction_type,
            raw_data: HashMap::new(),
            matched: false,
            created_at: chrono::Utc::now().naive_utc(),
        };
        transaction.normalize();
        transaction
    }

    /// Attach an original field value for traceability
    pub fn with_raw(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_data.insert(key.into(), value.into());
        self
    }

    /// Flip the sign of `amount` when it disagrees with `transaction_type`.
    ///
    /// Idempotent: an already-normalized amount is left untouched.
    pub fn normalize(&mut self) {
        let zero = BigDecimal::from(0);
        match self.transaction_type {
            TransactionType::Debit if self.amount > zero => {
                self.amount = -self.amount.clone();
            }
            TransactionType::Credit if self.amount < zero => {
                self.amount = self.amount.abs();
            }
            _ => {}
        }
    }

    /// True for debits, and for any negative amount regardless of the type field
    pub fn is_debit(&self) -> bool {
        self.transaction_type == TransactionType::Debit || self.amount < BigDecimal::from(0)
    }

    /// Magnitude of the amount
    pub fn absolute_amount(&self) -> BigDecimal {
        self.amount.abs()
    }

    /// Calendar day of the transaction, time of day dropped
    pub fn calendar_date(&self) -> NaiveDate {
        self.transaction_date.date()
    }
}

/// Errors that can occur while loading, matching or reporting
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid headers in {kind} file: expected {expected:?}, got {found:?}")]
    InvalidHeaders {
        kind: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Invalid {field} {value:?}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("Invalid bank statement filename: {0}")]
    InvalidFilename(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
