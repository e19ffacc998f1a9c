//! Batch stock checks: counted vs. expected quantities.

use serde::{Deserialize, Serialize};

use stockledger_core::{ProductId, ValidationErrors, ValueObject};

/// A product selected for counting, before its quantities are validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCheckDraft {
    pub product_id: ProductId,
    #[serde(default)]
    pub expected_quantity: Option<f64>,
    #[serde(default)]
    pub actual_quantity: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One counted product, ready for evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCheckEntry {
    pub product_id: ProductId,
    pub expected_quantity: f64,
    pub actual_quantity: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Match,
    Surplus,
    Shortage,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Success,
    Warning,
    Danger,
}

impl CheckStatus {
    pub fn from_variance(variance: f64) -> Self {
        if variance > 0.0 {
            CheckStatus::Surplus
        } else if variance < 0.0 {
            CheckStatus::Shortage
        } else {
            CheckStatus::Match
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Match => "MATCH",
            CheckStatus::Surplus => "SURPLUS",
            CheckStatus::Shortage => "SHORTAGE",
        }
    }

    pub fn color(self) -> StatusColor {
        match self {
            CheckStatus::Match => StatusColor::Success,
            CheckStatus::Surplus => StatusColor::Warning,
            CheckStatus::Shortage => StatusColor::Danger,
        }
    }
}

/// Evaluated stock check line. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub product_id: ProductId,
    pub expected_quantity: f64,
    pub actual_quantity: f64,
    /// `actual - expected`.
    pub variance: f64,
    pub has_variance: bool,
    pub status: CheckStatus,
    pub status_label: String,
    pub status_color: StatusColor,
    pub notes: Option<String>,
}

impl ValueObject for CheckResult {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchCheckSummary {
    pub total_items: usize,
    pub items_with_variance: usize,
    pub matches: usize,
    /// `matches / total_items` in `0.0..=1.0`; `0.0` for an empty batch.
    pub accuracy_rate: f64,
}

impl BatchCheckSummary {
    /// Accuracy as a percentage, `0.0..=100.0`.
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy_rate * 100.0
    }
}

impl ValueObject for BatchCheckSummary {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCheckOutcome {
    pub results: Vec<CheckResult>,
    pub summary: BatchCheckSummary,
}

/// Gate between product selection and evaluation.
///
/// Every draft needs a non-negative expected and counted quantity. All
/// problems are reported; nothing is partially accepted.
pub fn validate_selection(
    drafts: &[StockCheckDraft],
) -> Result<Vec<StockCheckEntry>, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if drafts.is_empty() {
        errors.structural("entries", "select at least one product to check");
    }

    let mut entries = Vec::with_capacity(drafts.len());
    for (idx, draft) in drafts.iter().enumerate() {
        let expected = required_quantity(
            &mut errors,
            idx,
            "expected_quantity",
            draft.expected_quantity,
        );
        let actual = required_quantity(&mut errors, idx, "actual_quantity", draft.actual_quantity);

        if let (Some(expected_quantity), Some(actual_quantity)) = (expected, actual) {
            entries.push(StockCheckEntry {
                product_id: draft.product_id,
                expected_quantity,
                actual_quantity,
                notes: draft.notes.clone(),
            });
        }
    }

    errors.into_result(entries)
}

fn required_quantity(
    errors: &mut ValidationErrors,
    idx: usize,
    field: &str,
    value: Option<f64>,
) -> Option<f64> {
    let path = format!("entries[{idx}].{field}");
    match value {
        None => {
            errors.structural(path, format!("{} is required", field.replace('_', " ")));
            None
        }
        Some(v) if !v.is_finite() || v < 0.0 => {
            let label = field.replace('_', " ");
            errors.structural(path, format!("{label} must be a non-negative number"));
            None
        }
        Some(v) => Some(v),
    }
}

/// Compare counted against expected quantity for every entry.
///
/// Results keep input order. Assumes entries passed [`validate_selection`].
pub fn evaluate(entries: &[StockCheckEntry]) -> BatchCheckOutcome {
    let results: Vec<CheckResult> = entries.iter().map(evaluate_entry).collect();

    let total_items = results.len();
    let items_with_variance = results.iter().filter(|r| r.has_variance).count();
    let matches = total_items - items_with_variance;
    let accuracy_rate = if total_items == 0 {
        0.0
    } else {
        matches as f64 / total_items as f64
    };

    tracing::debug!(total_items, items_with_variance, "evaluated stock check batch");

    BatchCheckOutcome {
        results,
        summary: BatchCheckSummary {
            total_items,
            items_with_variance,
            matches,
            accuracy_rate,
        },
    }
}

fn evaluate_entry(entry: &StockCheckEntry) -> CheckResult {
    let variance = entry.actual_quantity - entry.expected_quantity;
    let status = CheckStatus::from_variance(variance);
    CheckResult {
        product_id: entry.product_id,
        expected_quantity: entry.expected_quantity,
        actual_quantity: entry.actual_quantity,
        variance,
        has_variance: variance != 0.0,
        status,
        status_label: status.label().to_string(),
        status_color: status.color(),
        notes: entry.notes.clone(),
    }
}
