//! Structured fields embedded in free-text movement notes.
//!
//! Disposal and receipt screens write metadata into the notes column as
//! `Key: value` fragments, e.g. `"Reason: EXPIRED, Method: DESTRUCTION"`.
//! Parsing is best effort: anything unrecognised is ignored.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use stockledger_core::ValueObject;

/// Fields recovered from a notes string. Absent fragments stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub reason: Option<String>,
    pub method: Option<String>,
    pub approved_by: Option<String>,
    pub batch_number: Option<String>,
    pub expiry: Option<String>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.reason.is_none()
            && self.method.is_none()
            && self.approved_by.is_none()
            && self.batch_number.is_none()
            && self.expiry.is_none()
    }

    /// Fill fields that are still missing from `other`.
    pub fn fill_missing(&mut self, other: ExtractedFields) {
        self.reason = self.reason.take().or(other.reason);
        self.method = self.method.take().or(other.method);
        self.approved_by = self.approved_by.take().or(other.approved_by);
        self.batch_number = self.batch_number.take().or(other.batch_number);
        self.expiry = self.expiry.take().or(other.expiry);
    }
}

impl ValueObject for ExtractedFields {}

fn note_field_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // Key, optional spacing, colon, then a value up to the next separator.
        Regex::new(concat!(
            r"(?i)\b(reason|method|approved\s*by|batch(?:\s*(?:number|no))?|expiry(?:\s*date)?)",
            r"\s*:\s*([^,;\n]*)",
        ))
        .expect("note field regex is valid")
    })
}

/// Pull `reason`, `method`, `approvedBy`, `batchNumber` and `expiry` out of
/// free text. The first occurrence of each key wins.
pub fn extract_fields(notes: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::default();

    for caps in note_field_regex().captures_iter(notes) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let value = value.as_str().trim();
        if value.is_empty() {
            continue;
        }

        let key: String = key
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        let slot = if key.starts_with("reason") {
            &mut fields.reason
        } else if key.starts_with("method") {
            &mut fields.method
        } else if key.starts_with("approved") {
            &mut fields.approved_by
        } else if key.starts_with("batch") {
            &mut fields.batch_number
        } else {
            &mut fields.expiry
        };

        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    fields
}
