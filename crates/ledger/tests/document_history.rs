//! End-to-end read side: a ledger export is filtered, regrouped into
//! documents and checked against the processed-document record.

use chrono::{TimeZone, Utc};
use stockledger_ledger::{
    InMemoryProcessedStore, LedgerMovement, MovementFilter, MovementType, ProcessedDocuments,
    aggregate_by_document,
};

const LEDGER_EXPORT: &str = r#"[
  {
    "id": "0190f5a0-0000-7000-8000-000000000001",
    "product_id": "0190f5a0-0000-7000-8000-0000000000a1",
    "product_name": "Arabica beans 1kg",
    "quantity": 24,
    "movement_type": "RECEIPT",
    "document_reference": "GR-1001",
    "event_timestamp": "2026-09-01T08:15:00Z",
    "warehouse_name": "Main",
    "notes": "Batch Number: AR-332, Expiry: 2027-03-01"
  },
  {
    "id": "0190f5a0-0000-7000-8000-000000000002",
    "product_id": "0190f5a0-0000-7000-8000-0000000000a2",
    "product_name": "Paper cups 12oz",
    "quantity": 500,
    "movement_type": "RECEIPT",
    "document_reference": "GR-1001",
    "event_timestamp": "2026-09-01T08:15:00Z",
    "warehouse_name": "Main"
  },
  {
    "id": "0190f5a0-0000-7000-8000-000000000003",
    "product_id": "0190f5a0-0000-7000-8000-0000000000a1",
    "product_name": "Arabica beans 1kg",
    "quantity": -3,
    "movement_type": "DISPOSAL",
    "reference_id": "DSP-77",
    "event_timestamp": "2026-09-04T17:40:00Z",
    "warehouse_name": "Main",
    "notes": "Reason: DAMAGED, Method: COMPOST, Approved By: R. Mendes"
  },
  {
    "id": "0190f5a0-0000-7000-8000-000000000004",
    "product_id": "0190f5a0-0000-7000-8000-0000000000a3",
    "product_name": "Oat milk 1L",
    "quantity": -2.5,
    "movement_type": "DISPOSAL",
    "reference_id": "DSP-77",
    "event_timestamp": "2026-09-04T17:41:00Z",
    "warehouse_name": "Cold room"
  },
  {
    "id": "0190f5a0-0000-7000-8000-000000000005",
    "product_id": "0190f5a0-0000-7000-8000-0000000000a3",
    "product_name": "Oat milk 1L",
    "quantity": 6,
    "movement_type": "RETURN",
    "event_timestamp": "2026-09-05T10:00:00Z"
  }
]"#;

fn movements() -> Vec<LedgerMovement> {
    serde_json::from_str(LEDGER_EXPORT).expect("fixture parses")
}

#[test]
fn disposal_history_is_rebuilt_from_ledger_export() {
    let movements = movements();
    let disposals: Vec<LedgerMovement> = MovementFilter::of_type(MovementType::Disposal)
        .apply(&movements)
        .into_iter()
        .cloned()
        .collect();

    let docs = aggregate_by_document(&disposals);
    assert_eq!(docs.len(), 1);

    let doc = &docs[0];
    assert_eq!(doc.key, "DSP-77");
    assert_eq!(doc.items.len(), 2);
    assert_eq!(doc.total_quantity, 5.5);
    assert_eq!(doc.net_quantity(), -5.5);
    assert_eq!(doc.warehouse_name.as_deref(), Some("Main"));
    assert_eq!(doc.extracted_fields.reason.as_deref(), Some("DAMAGED"));
    assert_eq!(doc.extracted_fields.method.as_deref(), Some("COMPOST"));
    assert_eq!(doc.extracted_fields.approved_by.as_deref(), Some("R. Mendes"));
}

#[test]
fn full_stream_groups_every_movement_exactly_once() {
    let movements = movements();
    let docs = aggregate_by_document(&movements);

    let keys: Vec<_> = docs.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "single-0190f5a0-0000-7000-8000-000000000005",
            "DSP-77",
            "GR-1001",
        ]
    );

    let receipt = &docs[2];
    assert_eq!(receipt.total_quantity, 524.0);
    assert_eq!(receipt.extracted_fields.batch_number.as_deref(), Some("AR-332"));
    assert_eq!(receipt.extracted_fields.expiry.as_deref(), Some("2027-03-01"));

    let grouped: usize = docs.iter().map(|d| d.items.len()).sum();
    assert_eq!(grouped, movements.len());
}

#[test]
fn processed_documents_drop_out_of_the_work_list() {
    let docs = aggregate_by_document(&movements());
    let processed = ProcessedDocuments::new(InMemoryProcessedStore::new());
    processed.mark_processed("GR-1001", Utc.with_ymd_and_hms(2026, 9, 2, 9, 0, 0).unwrap());

    let pending = processed.filter_unprocessed(docs);
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|d| d.key != "GR-1001"));
}
