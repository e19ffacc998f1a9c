//! Product stock snapshots: catalog data joined with live ledger stock.
//!
//! A snapshot is a point-in-time view. If either upstream source refreshes,
//! callers rebuild the snapshots rather than patching them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, ProductId, ReconciliationSettings};

use crate::status::{StockStatus, classify_with};

/// Catalog record as supplied by the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub product_id: ProductId,
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub reorder_level: Option<f64>,
    #[serde(default)]
    pub max_stock: Option<f64>,
    #[serde(default)]
    pub selling_price: Option<f64>,
}

/// Current stock for one product as supplied by the ledger source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_id: ProductId,
    pub current_stock: f64,
    pub unit_of_measure: String,
    pub last_updated: DateTime<Utc>,
}

/// Read-only view of one product's stock position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStockSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    pub reorder_level: Option<f64>,
    pub max_stock: Option<f64>,
    pub status: StockStatus,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Entity for ProductStockSnapshot {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

/// Per-status product counts for dashboard tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatusCounts {
    pub out_of_stock: usize,
    pub low_stock: usize,
    pub overstocked: usize,
    pub normal: usize,
}

impl StockStatusCounts {
    pub fn total(&self) -> usize {
        self.out_of_stock + self.low_stock + self.overstocked + self.normal
    }
}

/// Join catalog products with ledger stock and classify each product.
///
/// - A catalog product without a stock record has zero stock.
/// - Stock records for products missing from the catalog are skipped.
/// - When several stock records exist for one product, the most recently
///   updated one wins.
///
/// Output is ordered by status priority (most urgent first), then by name.
pub fn combine(
    settings: &ReconciliationSettings,
    catalog: &[CatalogProduct],
    stock: &[StockRecord],
) -> Vec<ProductStockSnapshot> {
    let mut latest: HashMap<ProductId, &StockRecord> = HashMap::with_capacity(stock.len());
    for record in stock {
        match latest.get(&record.product_id) {
            Some(existing) if existing.last_updated >= record.last_updated => {}
            _ => {
                latest.insert(record.product_id, record);
            }
        }
    }

    let mut snapshots: Vec<ProductStockSnapshot> = catalog
        .iter()
        .map(|product| {
            let record = latest.remove(&product.product_id);
            let current_stock = record.map(|r| r.current_stock).unwrap_or(0.0);
            ProductStockSnapshot {
                product_id: product.product_id,
                name: product.name.clone(),
                unit: product.unit.clone(),
                current_stock,
                reorder_level: product.reorder_level,
                max_stock: product.max_stock,
                status: classify_with(
                    settings,
                    current_stock,
                    product.reorder_level,
                    product.max_stock,
                ),
                last_updated: record.map(|r| r.last_updated),
            }
        })
        .collect();

    if !latest.is_empty() {
        tracing::debug!(
            skipped = latest.len(),
            "stock records without a catalog product were skipped"
        );
    }

    snapshots.sort_by(|a, b| {
        a.status
            .priority()
            .cmp(&b.status.priority())
            .then_with(|| a.name.cmp(&b.name))
    });
    snapshots
}

/// Count snapshots per status.
pub fn summarize(snapshots: &[ProductStockSnapshot]) -> StockStatusCounts {
    let mut counts = StockStatusCounts::default();
    for s in snapshots {
        match s.status {
            StockStatus::OutOfStock => counts.out_of_stock += 1,
            StockStatus::LowStock => counts.low_stock += 1,
            StockStatus::Overstocked => counts.overstocked += 1,
            StockStatus::Normal => counts.normal += 1,
        }
    }
    counts
}
