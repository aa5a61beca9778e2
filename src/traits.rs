//! Traits for pluggable matching strategies

use crate::config::MatcherConfig;
use crate::reconciliation::MatchResult;
use crate::types::*;

/// A matching strategy
///
/// Implementations pair system transactions with bank transactions and must
/// place every input record in exactly one partition of the returned
/// [`MatchResult`]. The error channel is reserved for engine-level misuse such
/// as an invalid configuration, never for a problem with a single record.
pub trait TransactionMatcher: Send + Sync {
    /// Match system transactions against bank transactions
    fn match_transactions(
        &self,
        system_txns: &[Transaction],
        bank_txns: &[Transaction],
    ) -> ReconcileResult<MatchResult>;

    /// Identifier of the strategy, recorded on every result
    fn name(&self) -> &'static str;

    /// Current configuration
    fn config(&self) -> &MatcherConfig;

    /// Replace the configuration
    fn set_config(&mut self, config: MatcherConfig);
}
