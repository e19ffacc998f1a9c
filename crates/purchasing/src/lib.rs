//! Purchasing module: goods receipt reconciliation.
//!
//! Receipt lines split a billed quantity into accepted and rejected stock.
//! Everything here is deterministic domain logic (no IO, no HTTP, no storage).

pub mod receipt;

pub use receipt::{
    GoodsReceipt, GoodsReceiptLine, QuantityField, accepted_quantities, apply_quantity_change,
    validate_line, validate_receipt,
};
