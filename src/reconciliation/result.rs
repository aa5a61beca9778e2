//! Match output types and run statistics

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Confidence assigned to an exact correspondence
pub const EXACT_CONFIDENCE: f64 = 100.0;

/// An accepted correspondence between one system and one bank transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub system_transaction: Transaction,
    pub bank_transaction: Transaction,
    /// 0 to 100, where 100 is an exact match
    pub confidence_score: f64,
    /// Absolute difference of the two absolute amounts
    pub amount_discrepancy: BigDecimal,
}

impl MatchPair {
    /// Pair two transactions, deriving the discrepancy from their amounts
    pub fn new(
        system_transaction: Transaction,
        bank_transaction: Transaction,
        confidence_score: f64,
    ) -> Self {
        let amount_discrepancy =
            (system_transaction.absolute_amount() - bank_transaction.absolute_amount()).abs();
        Self {
            system_transaction,
            bank_transaction,
            confidence_score,
            amount_discrepancy,
        }
    }
}

/// Outcome of one matching run
///
/// The statistics fields are only meaningful after [`MatchResult::finalize`],
/// which strategies call once partitioning is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<MatchPair>,
    pub unmatched_system: Vec<Transaction>,
    pub unmatched_bank: Vec<Transaction>,
    /// Name of the strategy that produced this result
    pub algorithm_used: String,
    pub match_rate: f64,
    pub total_system_txns: usize,
    pub total_bank_txns: usize,
    pub total_matched: usize,
    pub total_discrepancy: BigDecimal,
}

impl MatchResult {
    /// Create an empty result for the named strategy
    pub fn new(algorithm_used: impl Into<String>) -> Self {
        Self {
            matched: Vec::new(),
            unmatched_system: Vec::new(),
            unmatched_bank: Vec::new(),
            algorithm_used: algorithm_used.into(),
            match_rate: 0.0,
            total_system_txns: 0,
            total_bank_txns: 0,
            total_matched: 0,
            total_discrepancy: BigDecimal::from(0),
        }
    }

    /// Compute counts, match rate and total discrepancy from the partitions
    pub fn finalize(&mut self) {
        self.total_matched = self.matched.len();
        self.total_system_txns = self.matched.len() + self.unmatched_system.len();
        self.total_bank_txns = self.matched.len() + self.unmatched_bank.len();
        self.match_rate = calculate_match_rate(
            self.total_matched,
            self.total_system_txns,
            self.total_bank_txns,
        );

        let paired: BigDecimal = self.matched.iter().map(|p| &p.amount_discrepancy).sum();
        let unmatched: BigDecimal = self
            .unmatched_system
            .iter()
            .chain(self.unmatched_bank.iter())
            .map(|t| t.absolute_amount())
            .sum();
        self.total_discrepancy = paired + unmatched;
    }

    /// Number of records left for manual review on both sides
    pub fn total_unmatched(&self) -> usize {
        self.unmatched_system.len() + self.unmatched_bank.len()
    }

    /// Matched pairs whose amounts differ by more than rounding noise
    pub fn pairs_with_discrepancy(&self) -> impl Iterator<Item = &MatchPair> {
        let threshold = amount_epsilon();
        self.matched
            .iter()
            .filter(move |p| p.amount_discrepancy > threshold)
    }

    /// True when every record on both sides was paired
    pub fn is_fully_reconciled(&self) -> bool {
        self.unmatched_system.is_empty() && self.unmatched_bank.is_empty()
    }
}

/// Match rate as a percentage of all records on both sides.
///
/// Each pair counts once per side. Two empty ledgers are fully reconciled.
pub fn calculate_match_rate(total_matched: usize, total_system: usize, total_bank: usize) -> f64 {
    if total_system == 0 && total_bank == 0 {
        return 100.0;
    }
    let total = (total_system + total_bank) as f64;
    (total_matched * 2) as f64 / total * 100.0
}

/// Amounts closer than this are treated as equal (0.001)
pub fn amount_epsilon() -> BigDecimal {
    BigDecimal::new(1.into(), 3)
}

/// Compare two amounts within [`amount_epsilon`]
pub fn amounts_equal(a: &BigDecimal, b: &BigDecimal) -> bool {
    (a - b).abs() < amount_epsilon()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(id: &str, source_type: SourceType, amount: &str, txn_type: TransactionType) -> Transaction {
        Transaction::new(
            id.to_string(),
            source_type,
            "BCA".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            amount.parse().unwrap(),
            txn_type,
        )
    }

    #[test]
    fn test_match_rate() {
        assert_eq!(calculate_match_rate(0, 0, 0), 100.0);
        assert_eq!(calculate_match_rate(1, 1, 1), 100.0);
        assert_eq!(calculate_match_rate(0, 3, 0), 0.0);
        // 2 pairs out of 3 system + 5 bank records
        assert_eq!(calculate_match_rate(2, 3, 5), 50.0);
    }

    #[test]
    fn test_finalize_empty() {
        let mut result = MatchResult::new("exact");
        result.finalize();

        assert_eq!(result.match_rate, 100.0);
        assert_eq!(result.total_system_txns, 0);
        assert_eq!(result.total_bank_txns, 0);
        assert_eq!(result.total_discrepancy, BigDecimal::from(0));
        assert!(result.is_fully_reconciled());
    }

    #[test]
    fn test_finalize_discrepancy_includes_unmatched() {
        let mut result = MatchResult::new("exact");
        result.matched.push(MatchPair::new(
            txn("S1", SourceType::System, "100.00", TransactionType::Debit),
            txn("B1", SourceType::Bank, "-99.50", TransactionType::Debit),
            90.0,
        ));
        result
            .unmatched_system
            .push(txn("S2", SourceType::System, "40", TransactionType::Debit));
        result
            .unmatched_bank
            .push(txn("B2", SourceType::Bank, "10.25", TransactionType::Credit));
        result.finalize();

        assert_eq!(result.total_matched, 1);
        assert_eq!(result.total_system_txns, 2);
        assert_eq!(result.total_bank_txns, 2);
        assert_eq!(result.match_rate, 50.0);
        // 0.50 pair delta + 40 + 10.25
        assert_eq!(result.total_discrepancy, "50.75".parse::<BigDecimal>().unwrap());
        assert_eq!(result.pairs_with_discrepancy().count(), 1);
        assert_eq!(result.total_unmatched(), 2);
    }

    #[test]
    fn test_amounts_equal_within_epsilon() {
        let a: BigDecimal = "150.5000".parse().unwrap();
        let b: BigDecimal = "150.5009".parse().unwrap();
        let c: BigDecimal = "150.501".parse().unwrap();
        assert!(amounts_equal(&a, &b));
        assert!(!amounts_equal(&a, &c));
    }
}
