//! Ledger read side: movement streams regrouped into documents.
//!
//! The stock ledger stores one signed movement per product per event. Screens
//! that list receipts or disposals need them back as documents, so this crate
//! filters movement streams, groups them by document reference and tracks
//! which documents a caller has already handled.

pub mod aggregate;
pub mod movement;
pub mod notes;
pub mod processed;

pub use aggregate::{AggregatedDocument, aggregate, aggregate_by_document, document_key};
pub use movement::{LedgerMovement, MovementFilter, MovementType};
pub use notes::{ExtractedFields, extract_fields};
pub use processed::{InMemoryProcessedStore, ProcessedDocuments, ProcessedStore};
