//! Reconciliation thresholds.
//!
//! Defaults match the inventory front end. Deployments may override them via
//! environment variables; invalid values fall back to the default.

use serde::{Deserialize, Serialize};

pub const OVERSTOCK_RATIO_ENV: &str = "STOCKLEDGER_OVERSTOCK_RATIO";
pub const MIN_DISPOSAL_QTY_ENV: &str = "STOCKLEDGER_MIN_DISPOSAL_QTY";

/// Tunable thresholds shared by the classifier and the disposal validator.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSettings {
    /// Fraction of `max_stock` at or above which a product counts as overstocked.
    pub overstock_ratio: f64,
    /// Smallest quantity a disposal line may carry.
    pub min_disposal_quantity: f64,
}

impl ReconciliationSettings {
    pub const DEFAULT_OVERSTOCK_RATIO: f64 = 0.9;
    pub const DEFAULT_MIN_DISPOSAL_QUANTITY: f64 = 0.001;

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (tests inject a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            overstock_ratio: read_positive(&lookup, OVERSTOCK_RATIO_ENV)
                .unwrap_or(defaults.overstock_ratio),
            min_disposal_quantity: read_positive(&lookup, MIN_DISPOSAL_QTY_ENV)
                .unwrap_or(defaults.min_disposal_quantity),
        }
    }
}

impl Default for ReconciliationSettings {
    fn default() -> Self {
        Self {
            overstock_ratio: Self::DEFAULT_OVERSTOCK_RATIO,
            min_disposal_quantity: Self::DEFAULT_MIN_DISPOSAL_QUANTITY,
        }
    }
}

fn read_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<f64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => {
            tracing::warn!(
                key,
                value = %raw,
                "ignoring invalid reconciliation setting; using default"
            );
            None
        }
    }
}
