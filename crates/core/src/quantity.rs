//! Quantity input normalization.
//!
//! Quantities arrive from form fields, so a value may be a number, a numeric
//! string, or garbage. Reconciliation treats anything that is not a finite
//! number as zero and never lets a quantity go negative.

use serde::{Deserialize, Serialize};

/// Absolute tolerance used when comparing summed quantities against a limit.
///
/// Fractional units (kg, litres) accumulate float noise; sums within this
/// distance of the limit count as equal.
pub const QUANTITY_TOLERANCE: f64 = 1e-9;

/// Raw quantity as entered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    /// Numeric value, or `0.0` for blank/non-numeric/non-finite input.
    pub fn numeric(&self) -> f64 {
        let value = match self {
            QuantityInput::Number(n) => *n,
            QuantityInput::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// `max(0, numeric(input))`.
    pub fn non_negative(&self) -> f64 {
        clamp_non_negative(self.numeric())
    }
}

impl From<f64> for QuantityInput {
    fn from(value: f64) -> Self {
        QuantityInput::Number(value)
    }
}

impl From<i64> for QuantityInput {
    fn from(value: i64) -> Self {
        QuantityInput::Number(value as f64)
    }
}

impl From<&str> for QuantityInput {
    fn from(value: &str) -> Self {
        QuantityInput::Text(value.to_string())
    }
}

impl From<String> for QuantityInput {
    fn from(value: String) -> Self {
        QuantityInput::Text(value)
    }
}

/// Clamp to `>= 0`, mapping NaN to zero.
pub fn clamp_non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 { 0.0 } else { value }
}

/// `a > b` beyond [`QUANTITY_TOLERANCE`].
pub fn exceeds(a: f64, b: f64) -> bool {
    a - b > QUANTITY_TOLERANCE
}
