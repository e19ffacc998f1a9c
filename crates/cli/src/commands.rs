//! Command handlers: JSON in, JSON out.
//!
//! Each handler deserializes its input, calls the matching reconciliation
//! function and serializes the result. Validation failures are part of the
//! output (`ok = false`), not errors.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use stockledger_core::{ProductId, ReconciliationSettings, ValidationError, ValidationOutcome};
use stockledger_inventory::{
    BatchCheckOutcome, CatalogProduct, DisposalRequest, ProductStockSnapshot, StockCheckDraft,
    StockRecord, StockStatusCounts, check_against_stock, combine, evaluate, summarize,
    validate_selection, validate_with,
};
use stockledger_ledger::{
    AggregatedDocument, LedgerMovement, MovementFilter, aggregate_by_document,
};
use stockledger_purchasing::{GoodsReceipt, accepted_quantities, validate_receipt};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Classify,
    Receipt,
    StockCheck,
    Dispose,
    Aggregate,
}

/// Serialized command output and whether the input passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub ok: bool,
    pub body: String,
}

impl Report {
    fn new(ok: bool, value: &impl Serialize) -> anyhow::Result<Self> {
        let body = serde_json::to_string_pretty(value).context("failed to serialize output")?;
        Ok(Self { ok, body })
    }
}

impl Command {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "classify" => Some(Command::Classify),
            "receipt" => Some(Command::Receipt),
            "stock-check" => Some(Command::StockCheck),
            "dispose" => Some(Command::Dispose),
            "aggregate" => Some(Command::Aggregate),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Classify => "classify",
            Command::Receipt => "receipt",
            Command::StockCheck => "stock-check",
            Command::Dispose => "dispose",
            Command::Aggregate => "aggregate",
        }
    }

    pub fn execute(self, settings: &ReconciliationSettings, raw: &str) -> anyhow::Result<Report> {
        match self {
            Command::Classify => classify(settings, parse(raw, self)?),
            Command::Receipt => receipt(parse(raw, self)?),
            Command::StockCheck => stock_check(parse(raw, self)?),
            Command::Dispose => dispose(settings, parse(raw, self)?),
            Command::Aggregate => aggregate(parse(raw, self)?),
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(raw: &str, command: Command) -> anyhow::Result<T> {
    serde_json::from_str(raw).with_context(|| format!("invalid input for `{}`", command.name()))
}

#[derive(Debug, Deserialize)]
struct ClassifyInput {
    catalog: Vec<CatalogProduct>,
    #[serde(default)]
    stock: Vec<StockRecord>,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    snapshots: Vec<ProductStockSnapshot>,
    counts: StockStatusCounts,
}

fn classify(settings: &ReconciliationSettings, input: ClassifyInput) -> anyhow::Result<Report> {
    let snapshots = combine(settings, &input.catalog, &input.stock);
    let counts = summarize(&snapshots);
    Report::new(true, &ClassifyOutput { snapshots, counts })
}

#[derive(Debug, Serialize)]
struct ReceiptOutput {
    is_valid: bool,
    errors: Vec<ValidationError>,
    accepted: Vec<AcceptedLine>,
}

#[derive(Debug, Serialize)]
struct AcceptedLine {
    product_id: ProductId,
    quantity: f64,
}

fn receipt(input: GoodsReceipt) -> anyhow::Result<Report> {
    let outcome = ValidationOutcome::from(validate_receipt(&input));
    let accepted = if outcome.is_valid {
        accepted_quantities(&input)
            .into_iter()
            .map(|(product_id, quantity)| AcceptedLine { product_id, quantity })
            .collect()
    } else {
        Vec::new()
    };
    Report::new(
        outcome.is_valid,
        &ReceiptOutput {
            is_valid: outcome.is_valid,
            errors: outcome.errors,
            accepted,
        },
    )
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StockCheckOutput {
    Evaluated(BatchCheckOutcome),
    Rejected(ValidationOutcome),
}

fn stock_check(drafts: Vec<StockCheckDraft>) -> anyhow::Result<Report> {
    match validate_selection(&drafts) {
        Ok(entries) => Report::new(true, &StockCheckOutput::Evaluated(evaluate(&entries))),
        Err(errors) => Report::new(false, &StockCheckOutput::Rejected(errors.into())),
    }
}

#[derive(Debug, Deserialize)]
struct DisposeInput {
    request: DisposalRequest,
    #[serde(default)]
    snapshots: Vec<ProductStockSnapshot>,
}

fn dispose(settings: &ReconciliationSettings, input: DisposeInput) -> anyhow::Result<Report> {
    let mut outcome = validate_with(settings, &input.request);
    let stock_errors = check_against_stock(&input.request, &input.snapshots);
    if !stock_errors.is_empty() {
        outcome.is_valid = false;
        outcome.errors.extend(stock_errors);
    }
    Report::new(outcome.is_valid, &outcome)
}

#[derive(Debug, Deserialize)]
struct AggregateInput {
    movements: Vec<LedgerMovement>,
    #[serde(default)]
    filter: MovementFilter,
}

fn aggregate(input: AggregateInput) -> anyhow::Result<Report> {
    let selected: Vec<LedgerMovement> = input
        .filter
        .apply(&input.movements)
        .into_iter()
        .cloned()
        .collect();
    let documents: Vec<AggregatedDocument> = aggregate_by_document(&selected);
    Report::new(true, &documents)
}
