use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockledger_core::{
    BillLineId, Entity, ProductId, QuantityInput, ValidationErrors, quantity::exceeds,
};

/// Which quantity of a receipt line the user edited.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityField {
    Accepted,
    Rejected,
}

/// Goods receipt line: how much of a billed quantity was accepted or rejected.
///
/// Always part of a [`GoodsReceipt`]; never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsReceiptLine {
    pub bill_line_id: BillLineId,
    pub product_id: ProductId,
    pub ordered_quantity: f64,
    pub quantity_accepted: f64,
    pub quantity_rejected: f64,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl GoodsReceiptLine {
    /// New line pre-filled as fully accepted.
    pub fn new(bill_line_id: BillLineId, product_id: ProductId, ordered_quantity: f64) -> Self {
        let ordered_quantity = ordered_quantity.max(0.0);
        Self {
            bill_line_id,
            product_id,
            ordered_quantity,
            quantity_accepted: ordered_quantity,
            quantity_rejected: 0.0,
            rejection_reason: None,
        }
    }

    pub fn total(&self) -> f64 {
        self.quantity_accepted + self.quantity_rejected
    }

    /// Ordered quantity not yet accounted for by accepted or rejected stock.
    pub fn outstanding(&self) -> f64 {
        (self.ordered_quantity - self.total()).max(0.0)
    }
}

impl Entity for GoodsReceiptLine {
    type Id = BillLineId;

    fn id(&self) -> &Self::Id {
        &self.bill_line_id
    }
}

/// Goods receipt document recorded against a purchase bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    pub bill_reference: String,
    #[serde(default)]
    pub received_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub lines: Vec<GoodsReceiptLine>,
}

/// Apply a user edit to one quantity of a receipt line.
///
/// The edited field becomes `max(0, numeric(new_value))`, capped at the ordered
/// quantity. If accepted + rejected then exceeds the ordered quantity, the
/// *other* field absorbs the overflow: the field the user just edited always
/// wins. Never fails; `accepted + rejected <= ordered` holds afterwards.
pub fn apply_quantity_change(
    line: &GoodsReceiptLine,
    field: QuantityField,
    new_value: impl Into<QuantityInput>,
) -> GoodsReceiptLine {
    let ordered = line.ordered_quantity.max(0.0);
    let value = new_value.into().non_negative().min(ordered);

    let mut updated = line.clone();
    match field {
        QuantityField::Accepted => updated.quantity_accepted = value,
        QuantityField::Rejected => updated.quantity_rejected = value,
    }

    if updated.total() > ordered {
        match field {
            QuantityField::Accepted => {
                updated.quantity_rejected = remainder(ordered, updated.quantity_accepted);
            }
            QuantityField::Rejected => {
                updated.quantity_accepted = remainder(ordered, updated.quantity_rejected);
            }
        }
        tracing::trace!(
            bill_line_id = %line.bill_line_id,
            ?field,
            accepted = updated.quantity_accepted,
            rejected = updated.quantity_rejected,
            "clamped receipt line to ordered quantity"
        );
    }

    updated
}

/// Largest `rest >= 0` with `fixed + rest <= ordered`, given `fixed <= ordered`.
///
/// `ordered - fixed` can round up by one ulp so that the sum lands just above
/// `ordered`; step down until it fits.
fn remainder(ordered: f64, fixed: f64) -> f64 {
    let mut rest = (ordered - fixed).max(0.0);
    while rest > 0.0 && fixed + rest > ordered {
        rest = next_below(rest);
    }
    rest
}

/// Next representable value below a positive finite `value`.
fn next_below(value: f64) -> f64 {
    f64::from_bits(value.to_bits() - 1)
}

/// Advisory checks for a single line. Problems are collected, never thrown.
pub fn validate_line(line: &GoodsReceiptLine) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if line.quantity_accepted < 0.0 || line.quantity_rejected < 0.0 {
        errors.structural("quantity", "quantities cannot be negative");
    }

    let total = line.total();
    if !(total > 0.0) {
        errors.structural(
            "quantity",
            "accepted or rejected quantity must be greater than zero",
        );
    }
    if exceeds(total, line.ordered_quantity) {
        errors.business_rule(
            "quantity",
            format!(
                "accepted and rejected quantities ({total}) exceed ordered quantity ({})",
                line.ordered_quantity
            ),
        );
    }

    let has_reason = line
        .rejection_reason
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if line.quantity_rejected > 0.0 && !has_reason {
        errors.structural(
            "rejection_reason",
            "rejection reason is required when quantity is rejected",
        );
    }

    errors
}

/// Validate the whole receipt: header fields plus every line.
///
/// Line problems are reported under `lines[<index>]`.
pub fn validate_receipt(receipt: &GoodsReceipt) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if receipt.bill_reference.trim().is_empty() {
        errors.structural("bill_reference", "bill reference is required");
    }
    if receipt.received_date.is_none() {
        errors.structural("received_date", "received date is required");
    }
    if receipt.lines.is_empty() {
        errors.structural("lines", "at least one line is required");
    }

    let mut seen = HashSet::with_capacity(receipt.lines.len());
    for (idx, line) in receipt.lines.iter().enumerate() {
        let prefix = format!("lines[{idx}]");
        if !seen.insert(*line.id()) {
            errors.structural(prefix.clone(), "bill line appears more than once");
        }
        errors.extend_prefixed(&prefix, validate_line(line));
    }

    errors
}

/// Accepted quantity per line that should reach the stock ledger.
///
/// Lines with nothing accepted are omitted. Order follows the receipt.
pub fn accepted_quantities(receipt: &GoodsReceipt) -> Vec<(ProductId, f64)> {
    receipt
        .lines
        .iter()
        .filter(|l| l.quantity_accepted > 0.0)
        .map(|l| (l.product_id, l.quantity_accepted))
        .collect()
}
