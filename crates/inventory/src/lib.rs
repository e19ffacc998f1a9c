//! Inventory reconciliation rules.
//!
//! This crate contains business rules for stock levels, stock checks and
//! disposals, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod disposal;
pub mod snapshot;
pub mod status;
pub mod stock_check;

pub use disposal::{
    DisposalLine, DisposalMethod, DisposalReason, DisposalRequest, check_against_stock, validate,
    validate_with,
};
pub use snapshot::{
    CatalogProduct, ProductStockSnapshot, StockRecord, StockStatusCounts, combine, summarize,
};
pub use status::{StockStatus, classify, classify_with};
pub use stock_check::{
    BatchCheckOutcome, BatchCheckSummary, CheckResult, CheckStatus, StatusColor, StockCheckDraft,
    StockCheckEntry, evaluate, validate_selection,
};
