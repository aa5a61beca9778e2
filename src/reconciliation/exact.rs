//! Exact matching strategy: same calendar day, same polarity, same amount

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::config::MatcherConfig;
use crate::reconciliation::result::{amounts_equal, MatchPair, MatchResult, EXACT_CONFIDENCE};
use crate::traits::TransactionMatcher;
use crate::types::*;

/// Grouping key shared by system and bank transactions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub date: NaiveDate,
    pub is_debit: bool,
    /// Normalized so that 150.5 and 150.50 hash alike
    pub absolute_amount: BigDecimal,
}

impl MatchKey {
    pub fn for_transaction(txn: &Transaction) -> Self {
        Self {
            date: txn.calendar_date(),
            is_debit: txn.is_debit(),
            absolute_amount: txn.absolute_amount().normalized(),
        }
    }
}

/// Matches a system transaction only when exactly one unclaimed bank
/// transaction shares its key.
///
/// Buckets with two or more unclaimed candidates are ambiguous: the system
/// transaction stays unmatched and the candidates stay available. The run is a
/// single pass and ambiguous buckets are never revisited.
#[derive(Debug, Clone, Default)]
pub struct ExactMatcher {
    config: MatcherConfig,
}

impl ExactMatcher {
    /// Create a new exact matcher. A nonzero tolerance is accepted and ignored.
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Whether two transactions agree on day, polarity and amount
    pub fn is_exact_match(system_txn: &Transaction, bank_txn: &Transaction) -> bool {
        system_txn.calendar_date() == bank_txn.calendar_date()
            && system_txn.is_debit() == bank_txn.is_debit()
            && amounts_equal(
                &system_txn.absolute_amount(),
                &bank_txn.absolute_amount(),
            )
    }

    /// Bank transaction positions grouped by key, in input order
    fn index_bank(bank_txns: &[Transaction]) -> HashMap<MatchKey, Vec<usize>> {
        let mut buckets: HashMap<MatchKey, Vec<usize>> = HashMap::new();
        for (idx, txn) in bank_txns.iter().enumerate() {
            buckets
                .entry(MatchKey::for_transaction(txn))
                .or_default()
                .push(idx);
        }
        buckets
    }
}

impl TransactionMatcher for ExactMatcher {
    fn match_transactions(
        &self,
        system_txns: &[Transaction],
        bank_txns: &[Transaction],
    ) -> ReconcileResult<MatchResult> {
        let mut result = MatchResult::new(self.name());
        let buckets = Self::index_bank(bank_txns);

        // Bank records are identified by position, ids are only unique per file
        let mut consumed: HashSet<usize> = HashSet::new();

        for system_txn in system_txns {
            let key = MatchKey::for_transaction(system_txn);
            let available: Vec<usize> = buckets
                .get(&key)
                .map(|candidates| {
                    candidates
                        .iter()
                        .copied()
                        .filter(|idx| !consumed.contains(idx))
                        .collect()
                })
                .unwrap_or_default();

            match available.as_slice() {
                [] => result.unmatched_system.push(system_txn.clone()),
                [idx] if Self::is_exact_match(system_txn, &bank_txns[*idx]) => {
                    consumed.insert(*idx);
                    result.matched.push(MatchPair::new(
                        system_txn.clone(),
                        bank_txns[*idx].clone(),
                        EXACT_CONFIDENCE,
                    ));
                }
                [_] => result.unmatched_system.push(system_txn.clone()),
                candidates => {
                    tracing::debug!(
                        system_id = %system_txn.id,
                        date = %key.date,
                        amount = %key.absolute_amount,
                        candidates = candidates.len(),
                        "ambiguous bucket, leaving for manual review"
                    );
                    result.unmatched_system.push(system_txn.clone());
                }
            }
        }

        result.unmatched_bank = bank_txns
            .iter()
            .enumerate()
            .filter(|(idx, _)| !consumed.contains(idx))
            .map(|(_, txn)| txn.clone())
            .collect();

        result.finalize();
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "exact"
    }

    fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn set_config(&mut self, config: MatcherConfig) {
        self.config = config;
    }
}
