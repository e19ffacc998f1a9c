use serde::{Deserialize, Serialize};

use stockledger_core::{ReconciliationSettings, ValueObject};

/// Stock level classification for a single product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    Overstocked,
    Normal,
}

impl StockStatus {
    /// Sort rank, 1 = most urgent.
    pub fn priority(self) -> u8 {
        match self {
            StockStatus::OutOfStock => 1,
            StockStatus::LowStock => 2,
            StockStatus::Overstocked => 3,
            StockStatus::Normal => 4,
        }
    }

    /// Position on the stock-level axis (empty → full).
    ///
    /// Unlike [`priority`](Self::priority), this grows with the quantity on hand:
    /// out of stock < low < normal < overstocked.
    pub fn level(self) -> u8 {
        match self {
            StockStatus::OutOfStock => 0,
            StockStatus::LowStock => 1,
            StockStatus::Normal => 2,
            StockStatus::Overstocked => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::Overstocked => "overstocked",
            StockStatus::Normal => "normal",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValueObject for StockStatus {}

/// Classify a stock level using the default overstock ratio.
pub fn classify(
    current_stock: f64,
    reorder_level: Option<f64>,
    max_stock: Option<f64>,
) -> StockStatus {
    classify_with(
        &ReconciliationSettings::default(),
        current_stock,
        reorder_level,
        max_stock,
    )
}

/// Classify a stock level. Rules are evaluated in order; the first match wins.
pub fn classify_with(
    settings: &ReconciliationSettings,
    current_stock: f64,
    reorder_level: Option<f64>,
    max_stock: Option<f64>,
) -> StockStatus {
    if current_stock <= 0.0 {
        return StockStatus::OutOfStock;
    }
    if let Some(reorder) = reorder_level {
        if current_stock <= reorder {
            return StockStatus::LowStock;
        }
    }
    if let Some(max) = max_stock {
        if current_stock >= settings.overstock_ratio * max {
            return StockStatus::Overstocked;
        }
    }
    StockStatus::Normal
}
