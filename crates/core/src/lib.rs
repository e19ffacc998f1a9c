//! `stockledger-core` — shared building blocks for stock reconciliation.
//!
//! This crate contains **pure domain** primitives (no IO, no async, no storage).

pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod quantity;
pub mod value_object;

pub use config::ReconciliationSettings;
pub use entity::Entity;
pub use error::{
    DomainError, ValidationError, ValidationErrorKind, ValidationErrors, ValidationOutcome,
};
pub use id::{BillLineId, MovementId, ProductId, UserId};
pub use quantity::{QUANTITY_TOLERANCE, QuantityInput};
pub use value_object::ValueObject;
