//! Reconciliation of system ledgers against bank statements
//!
//! The [`ReconciliationEngine`] owns a [`TransactionMatcher`] strategy and runs
//! it over fully loaded, sign-normalized transaction sets. Matching is pure and
//! synchronous: no I/O, no state shared between runs.

pub mod exact;
pub mod result;

pub use exact::*;
pub use result::*;

use crate::config::MatcherConfig;
use crate::traits::TransactionMatcher;
use crate::types::*;

/// Runs a matching strategy and logs the outcome
pub struct ReconciliationEngine {
    matcher: Box<dyn TransactionMatcher>,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    /// Create an engine using the exact matcher with default configuration
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    /// Create an engine using the exact matcher with the given configuration
    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            matcher: Box::new(ExactMatcher::new(config)),
        }
    }

    /// Create an engine with a custom matching strategy
    pub fn with_matcher(matcher: Box<dyn TransactionMatcher>) -> Self {
        Self { matcher }
    }

    /// Name of the active strategy
    pub fn algorithm(&self) -> &'static str {
        self.matcher.name()
    }

    /// Configuration of the active strategy
    pub fn config(&self) -> &MatcherConfig {
        self.matcher.config()
    }

    /// Swap the configuration of the active strategy
    pub fn set_config(&mut self, config: MatcherConfig) {
        self.matcher.set_config(config);
    }

    /// Match system transactions against bank transactions
    pub fn reconcile(
        &self,
        system_txns: &[Transaction],
        bank_txns: &[Transaction],
    ) -> ReconcileResult<MatchResult> {
        let span = tracing::info_span!(
            "reconcile",
            algorithm = self.matcher.name(),
            system = system_txns.len(),
            bank = bank_txns.len()
        );
        let _guard = span.enter();

        let result = self.matcher.match_transactions(system_txns, bank_txns)?;

        tracing::info!(
            matched = result.total_matched,
            unmatched_system = result.unmatched_system.len(),
            unmatched_bank = result.unmatched_bank.len(),
            match_rate = result.match_rate,
            total_discrepancy = %result.total_discrepancy,
            "reconciliation complete"
        );

        Ok(result)
    }
}
