//! # Ledger Reconcile
//!
//! Reconciliation of an internal system ledger against one or more bank
//! statements: decide which records describe the same real-world transaction,
//! and surface everything that does not line up.
//!
//! ## Features
//!
//! - **Sign normalization**: debits are negative and credits non-negative,
//!   whatever convention the source used
//! - **Exact matching**: same calendar day, same polarity, same absolute amount
//! - **Conservative ambiguity handling**: a record with several equally good
//!   candidates is left for manual review instead of guessed
//! - **Pluggable strategies**: any [`TransactionMatcher`] can drive the engine
//! - **CSV ingestion** of system exports and bank statements, with text and
//!   JSON reports
//!
//! ## Quick Start
//!
//! ```rust
//! use ledger_reconcile::{ReconciliationEngine, SourceType, Transaction, TransactionType};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let system = vec![Transaction::new(
//!     "SYS001".to_string(),
//!     SourceType::System,
//!     "BCA".to_string(),
//!     day,
//!     BigDecimal::from(150),
//!     TransactionType::Debit,
//! )];
//! let bank = vec![Transaction::new(
//!     "BANK001".to_string(),
//!     SourceType::Bank,
//!     "BCA".to_string(),
//!     day,
//!     BigDecimal::from(-150),
//!     TransactionType::Debit,
//! )];
//!
//! let result = ReconciliationEngine::new().reconcile(&system, &bank).unwrap();
//! assert_eq!(result.total_matched, 1);
//! assert_eq!(result.match_rate, 100.0);
//! ```

pub mod config;
pub mod ingest;
pub mod reconciliation;
pub mod report;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
