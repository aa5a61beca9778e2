//! Matcher configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::*;

/// Configuration accepted by every matching strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Percentage tolerance on amounts for strategies that allow it; 0 means exact
    #[serde(default)]
    pub amount_tolerance_percent: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::exact()
    }
}

impl MatcherConfig {
    /// Configuration for exact amount equality
    pub fn exact() -> Self {
        Self {
            amount_tolerance_percent: 0.0,
        }
    }

    /// Configuration with an amount tolerance, expressed in percent
    pub fn with_tolerance(amount_tolerance_percent: f64) -> Self {
        Self {
            amount_tolerance_percent,
        }
    }

    /// Reject tolerances that no strategy could honor
    pub fn validate(&self) -> ReconcileResult<()> {
        if !self.amount_tolerance_percent.is_finite() {
            return Err(ReconcileError::InvalidConfig(
                "amount_tolerance_percent must be a finite number".to_string(),
            ));
        }

        if self.amount_tolerance_percent < 0.0 {
            return Err(ReconcileError::InvalidConfig(format!(
                "amount_tolerance_percent cannot be negative, got {}",
                self.amount_tolerance_percent
            )));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> ReconcileResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: MatcherConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}
