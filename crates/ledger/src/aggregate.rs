//! Regroup flat ledger movements into logical documents.
//!
//! A goods receipt with three products lands in the ledger as three
//! movements sharing one document reference. Aggregation folds them back into
//! one document for display. Documents are rebuilt from the stream on every
//! call and never cached here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, UserId};

use crate::movement::{LedgerMovement, MovementType};
use crate::notes::{ExtractedFields, extract_fields};

/// One logical document rebuilt from its ledger movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedDocument {
    /// Grouping key produced by the key function.
    pub key: String,
    pub document_reference: Option<String>,
    pub movement_type: MovementType,
    /// Header fields come from the first movement seen for this key.
    pub event_timestamp: DateTime<Utc>,
    pub warehouse_name: Option<String>,
    pub user_id: Option<UserId>,
    pub items: Vec<LedgerMovement>,
    /// Sum of `|quantity|` over all items.
    pub total_quantity: f64,
    pub extracted_fields: ExtractedFields,
}

impl AggregatedDocument {
    fn open(key: String, first: &LedgerMovement) -> Self {
        Self {
            key,
            document_reference: reference_of(first).map(str::to_string),
            movement_type: first.movement_type.clone(),
            event_timestamp: first.event_timestamp,
            warehouse_name: first.warehouse_name.clone(),
            user_id: first.user_id,
            items: Vec::new(),
            total_quantity: 0.0,
            extracted_fields: ExtractedFields::default(),
        }
    }

    fn push(&mut self, movement: &LedgerMovement) {
        self.total_quantity += movement.quantity.abs();
        if let Some(notes) = movement.notes.as_deref() {
            self.extracted_fields.fill_missing(extract_fields(notes));
        }
        self.items.push(movement.clone());
    }

    /// Signed sum of item quantities (stock in minus stock out).
    pub fn net_quantity(&self) -> f64 {
        self.items.iter().map(|m| m.quantity).sum()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn reference_of(movement: &LedgerMovement) -> Option<&str> {
    non_blank(movement.document_reference.as_deref())
        .or_else(|| non_blank(movement.reference_id.as_deref()))
}

/// Default grouping key: `document_reference`, else `reference_id`, else
/// `single-<movement id>` so every movement lands in exactly one group.
pub fn document_key(movement: &LedgerMovement) -> String {
    match reference_of(movement) {
        Some(reference) => reference.to_string(),
        None => format!("single-{}", movement.id()),
    }
}

/// Group by [`document_key`].
pub fn aggregate_by_document(movements: &[LedgerMovement]) -> Vec<AggregatedDocument> {
    aggregate(movements, document_key)
}

/// Group movements by `key_fn` in a single pass.
///
/// - Header fields come from the first movement seen for a key; later
///   movements only append to `items` and add `|quantity|` to the total.
/// - Note fields are merged across items, first value per field wins.
/// - Output is sorted by `event_timestamp` descending, ties by key ascending,
///   so repeated calls on the same input give identical output.
pub fn aggregate<F>(movements: &[LedgerMovement], key_fn: F) -> Vec<AggregatedDocument>
where
    F: Fn(&LedgerMovement) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut documents: Vec<AggregatedDocument> = Vec::new();

    for movement in movements {
        let key = key_fn(movement);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                documents.push(AggregatedDocument::open(key.clone(), movement));
                index.insert(key, documents.len() - 1);
                documents.len() - 1
            }
        };
        documents[slot].push(movement);
    }

    documents.sort_by(|a, b| {
        b.event_timestamp
            .cmp(&a.event_timestamp)
            .then_with(|| a.key.cmp(&b.key))
    });

    tracing::debug!(
        movements = movements.len(),
        documents = documents.len(),
        "aggregated ledger movements"
    );

    documents
}
