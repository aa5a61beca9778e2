//! Property-based tests for matching invariants
//!
//! - Partition completeness: every input lands in exactly one partition
//! - No duplicate consumption: a bank record backs at most one pair
//! - Normalization idempotence
//! - Ambiguity conservatism: shared keys are never auto-paired

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use ledger_reconcile::{
    MatchKey, ReconciliationEngine, SourceType, Transaction, TransactionType,
};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

/// Small cent values so that keys collide often
fn amount_strategy() -> impl Strategy<Value = BigDecimal> {
    (-500i64..500i64).prop_map(|cents| {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
            .parse()
            .unwrap()
    })
}

fn type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Debit), Just(TransactionType::Credit)]
}

/// Transactions spread over three days in March 2024
fn txn_strategy() -> impl Strategy<Value = (u32, BigDecimal, TransactionType)> {
    (1u32..4, amount_strategy(), type_strategy())
}

fn build(
    prefix: &str,
    source_type: SourceType,
    raw: Vec<(u32, BigDecimal, TransactionType)>,
) -> Vec<Transaction> {
    raw.into_iter()
        .enumerate()
        .map(|(i, (day, amount, txn_type))| {
            Transaction::new(
                format!("{prefix}{i}"),
                source_type,
                "BCA".to_string(),
                NaiveDate::from_ymd_opt(2024, 3, day)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
                amount,
                txn_type,
            )
        })
        .collect()
}

fn ledgers() -> impl Strategy<Value = (Vec<Transaction>, Vec<Transaction>)> {
    (
        prop::collection::vec(txn_strategy(), 0..30),
        prop::collection::vec(txn_strategy(), 0..30),
    )
        .prop_map(|(system, bank)| {
            (
                build("S", SourceType::System, system),
                build("B", SourceType::Bank, bank),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_partition_completeness((system, bank) in ledgers()) {
        let result = ReconciliationEngine::new().reconcile(&system, &bank).unwrap();

        prop_assert_eq!(result.matched.len() + result.unmatched_system.len(), system.len());
        prop_assert_eq!(result.matched.len() + result.unmatched_bank.len(), bank.len());
        prop_assert!(result.match_rate >= 0.0 && result.match_rate <= 100.0);

        let mut system_ids: Vec<&str> = result
            .matched
            .iter()
            .map(|p| p.system_transaction.id.as_str())
            .chain(result.unmatched_system.iter().map(|t| t.id.as_str()))
            .collect();
        system_ids.sort_unstable();
        let mut expected: Vec<&str> = system.iter().map(|t| t.id.as_str()).collect();
        expected.sort_unstable();
        prop_assert_eq!(system_ids, expected);
    }

    #[test]
    fn prop_no_duplicate_consumption((system, bank) in ledgers()) {
        let result = ReconciliationEngine::new().reconcile(&system, &bank).unwrap();

        let mut claimed = HashSet::new();
        for pair in &result.matched {
            prop_assert!(claimed.insert(pair.bank_transaction.id.clone()));
        }
        for txn in &result.unmatched_bank {
            prop_assert!(!claimed.contains(&txn.id));
        }
    }

    #[test]
    fn prop_ambiguous_keys_never_paired((system, bank) in ledgers()) {
        let result = ReconciliationEngine::new().reconcile(&system, &bank).unwrap();

        let mut bucket_sizes: HashMap<MatchKey, usize> = HashMap::new();
        for txn in &bank {
            *bucket_sizes.entry(MatchKey::for_transaction(txn)).or_default() += 1;
        }

        for pair in &result.matched {
            let key = MatchKey::for_transaction(&pair.system_transaction);
            prop_assert_eq!(bucket_sizes.get(&key).copied(), Some(1));
            prop_assert_eq!(pair.amount_discrepancy.clone(), BigDecimal::from(0));
        }
    }

    #[test]
    fn prop_exact_discrepancy_is_unmatched_value((system, bank) in ledgers()) {
        let result = ReconciliationEngine::new().reconcile(&system, &bank).unwrap();

        let expected: BigDecimal = result
            .unmatched_system
            .iter()
            .chain(result.unmatched_bank.iter())
            .map(|t| t.absolute_amount())
            .sum();
        prop_assert_eq!(result.total_discrepancy, expected);
    }

    #[test]
    fn prop_normalize_idempotent(amount in amount_strategy(), txn_type in type_strategy()) {
        let mut txn = Transaction::new(
            "T".to_string(),
            SourceType::Bank,
            "BCA".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            amount,
            txn_type,
        );
        let normalized = txn.amount.clone();
        txn.normalize();
        prop_assert_eq!(&txn.amount, &normalized);

        let zero = BigDecimal::from(0);
        match txn_type {
            TransactionType::Debit => prop_assert!(txn.amount <= zero),
            TransactionType::Credit => prop_assert!(txn.amount >= zero),
        }
    }
}
