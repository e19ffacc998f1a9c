//! Disposal request validation.
//!
//! [`validate`] checks the request shape and business enumerations only. The
//! check against live stock needs a stock snapshot and lives in
//! [`check_against_stock`], which callers run separately.

use core::str::FromStr;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockledger_core::{
    DomainError, Entity, ProductId, QuantityInput, ReconciliationSettings, ValidationErrors,
    ValidationOutcome, quantity::exceeds,
};

use crate::snapshot::ProductStockSnapshot;

/// Why stock is being disposed of.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisposalReason {
    Expired,
    Damaged,
    Contaminated,
    Recalled,
    Obsolete,
    QualityIssue,
    Other,
}

/// How disposed stock leaves the warehouse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisposalMethod {
    Destruction,
    Recycling,
    Donation,
    ReturnToVendor,
    Compost,
    Other,
}

impl DisposalReason {
    pub const ALL: [DisposalReason; 7] = [
        DisposalReason::Expired,
        DisposalReason::Damaged,
        DisposalReason::Contaminated,
        DisposalReason::Recalled,
        DisposalReason::Obsolete,
        DisposalReason::QualityIssue,
        DisposalReason::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DisposalReason::Expired => "EXPIRED",
            DisposalReason::Damaged => "DAMAGED",
            DisposalReason::Contaminated => "CONTAMINATED",
            DisposalReason::Recalled => "RECALLED",
            DisposalReason::Obsolete => "OBSOLETE",
            DisposalReason::QualityIssue => "QUALITY_ISSUE",
            DisposalReason::Other => "OTHER",
        }
    }
}

impl DisposalMethod {
    pub const ALL: [DisposalMethod; 6] = [
        DisposalMethod::Destruction,
        DisposalMethod::Recycling,
        DisposalMethod::Donation,
        DisposalMethod::ReturnToVendor,
        DisposalMethod::Compost,
        DisposalMethod::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DisposalMethod::Destruction => "DESTRUCTION",
            DisposalMethod::Recycling => "RECYCLING",
            DisposalMethod::Donation => "DONATION",
            DisposalMethod::ReturnToVendor => "RETURN_TO_VENDOR",
            DisposalMethod::Compost => "COMPOST",
            DisposalMethod::Other => "OTHER",
        }
    }
}

impl FromStr for DisposalReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisposalReason::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| DomainError::unknown_variant("disposal reason", s))
    }
}

impl FromStr for DisposalMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisposalMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| DomainError::unknown_variant("disposal method", s))
    }
}

impl core::fmt::Display for DisposalReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for DisposalMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One product line of a disposal request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalLine {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub quantity_to_dispose: Option<QuantityInput>,
    /// Stock on hand when the line was filled in, if the form captured it.
    #[serde(default)]
    pub current_stock: Option<f64>,
    #[serde(default)]
    pub batch_number: Option<String>,
    /// `YYYY-MM-DD`, kept raw like the request date.
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DisposalLine {
    /// Quantity as a number; missing or non-numeric input reads as `0.0`.
    pub fn quantity(&self) -> f64 {
        self.quantity_to_dispose
            .as_ref()
            .map_or(0.0, QuantityInput::numeric)
    }

    pub fn expiration(&self) -> Option<NaiveDate> {
        parse_date(&self.expiration_date)
    }
}

/// Disposal submission as it arrives from the form.
///
/// Dates, reason and method stay raw strings and quantities stay raw input,
/// so that bad values are reported as validation errors instead of failing
/// deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisposalRequest {
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub disposal_date: Option<String>,
    #[serde(default)]
    pub disposal_reason: Option<String>,
    #[serde(default)]
    pub disposal_method: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<DisposalLine>,
}

impl DisposalRequest {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.disposal_date)
    }

    pub fn reason(&self) -> Option<DisposalReason> {
        self.disposal_reason.as_deref()?.parse().ok()
    }

    pub fn method(&self) -> Option<DisposalMethod> {
        self.disposal_method.as_deref()?.parse().ok()
    }
}

/// Validate a disposal request with default settings.
pub fn validate(request: &DisposalRequest) -> ValidationOutcome {
    validate_with(&ReconciliationSettings::default(), request)
}

/// Validate the request shape and business enumerations.
///
/// Every check runs; the outcome lists all problems at once.
pub fn validate_with(
    settings: &ReconciliationSettings,
    request: &DisposalRequest,
) -> ValidationOutcome {
    let mut errors = ValidationErrors::new();

    match non_blank(&request.disposal_date) {
        None => errors.structural("disposal_date", "disposal date is required"),
        Some(_) if request.date().is_none() => {
            errors.structural("disposal_date", "disposal date is invalid");
        }
        Some(_) => {}
    }

    match non_blank(&request.disposal_reason) {
        None => errors.structural("disposal_reason", "disposal reason is required"),
        Some(raw) => {
            if raw.parse::<DisposalReason>().is_err() {
                let allowed = list(DisposalReason::ALL.map(DisposalReason::as_str));
                errors.business_rule(
                    "disposal_reason",
                    format!("disposal reason must be one of {allowed}"),
                );
            }
        }
    }

    match non_blank(&request.disposal_method) {
        None => errors.structural("disposal_method", "disposal method is required"),
        Some(raw) => {
            if raw.parse::<DisposalMethod>().is_err() {
                let allowed = list(DisposalMethod::ALL.map(DisposalMethod::as_str));
                errors.business_rule(
                    "disposal_method",
                    format!("disposal method must be one of {allowed}"),
                );
            }
        }
    }

    if request.items.is_empty() {
        errors.structural("items", "at least one item is required");
    }

    for (idx, item) in request.items.iter().enumerate() {
        if item.product_id.is_none() {
            errors.structural(format!("items[{idx}].product_id"), "product is required");
        }

        let qty = item.quantity();
        let field = format!("items[{idx}].quantity_to_dispose");
        if !(qty > 0.0) {
            errors.structural(field, "quantity to dispose must be greater than zero");
        } else if qty < settings.min_disposal_quantity {
            errors.structural(
                field,
                format!("minimum disposal quantity is {}", settings.min_disposal_quantity),
            );
        }

        if non_blank(&item.expiration_date).is_some() && item.expiration().is_none() {
            errors.structural(
                format!("items[{idx}].expiration_date"),
                "expiration date is invalid",
            );
        }
    }

    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "disposal request failed validation");
    }

    errors.into()
}

/// Compare each line against the stock available for its product.
///
/// Available stock comes from the line's own `current_stock` when present,
/// otherwise from the matching snapshot. Lines with no known stock are not
/// checked. Quantities are never adjusted; excess is reported as a
/// business-rule error and the submission stays blocked until fixed.
pub fn check_against_stock(
    request: &DisposalRequest,
    snapshots: &[ProductStockSnapshot],
) -> ValidationErrors {
    let by_product: HashMap<&ProductId, &ProductStockSnapshot> =
        snapshots.iter().map(|s| (s.id(), s)).collect();

    let mut errors = ValidationErrors::new();
    for (idx, item) in request.items.iter().enumerate() {
        let Some(product_id) = item.product_id.as_ref() else {
            continue;
        };
        let snapshot = by_product.get(product_id);
        let available = item
            .current_stock
            .or_else(|| snapshot.map(|s| s.current_stock));
        let Some(available) = available else {
            continue;
        };

        let qty = item.quantity();
        if exceeds(qty, available) {
            let unit = snapshot.map(|s| format!(" {}", s.unit)).unwrap_or_default();
            errors.business_rule(
                format!("items[{idx}].quantity_to_dispose"),
                format!(
                    "quantity to dispose ({qty}{unit}) exceeds available stock ({available}{unit})"
                ),
            );
        }
    }
    errors
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(non_blank(value)?, DATE_FORMAT).ok()
}

fn list<const N: usize>(values: [&str; N]) -> String {
    values.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StockStatus;
    use stockledger_core::ValidationErrorKind;
    use uuid::Uuid;

    fn pid(n: u128) -> ProductId {
        ProductId::from_uuid(Uuid::from_u128(n))
    }

    fn line(n: u128, qty: f64) -> DisposalLine {
        DisposalLine {
            product_id: Some(pid(n)),
            quantity_to_dispose: Some(QuantityInput::from(qty)),
            current_stock: None,
            batch_number: None,
            expiration_date: None,
            notes: None,
        }
    }

    fn request(items: Vec<DisposalLine>) -> DisposalRequest {
        DisposalRequest {
            disposal_date: Some("2026-04-02".to_string()),
            disposal_reason: Some("EXPIRED".to_string()),
            disposal_method: Some("DESTRUCTION".to_string()),
            reference_number: Some("DSP-0001".to_string()),
            notes: None,
            items,
        }
    }

    fn snapshot(n: u128, stock: f64) -> ProductStockSnapshot {
        ProductStockSnapshot {
            product_id: pid(n),
            name: format!("product {n}"),
            unit: "kg".to_string(),
            current_stock: stock,
            reorder_level: None,
            max_stock: None,
            status: StockStatus::Normal,
            last_updated: None,
        }
    }

    #[test]
    fn well_formed_request_is_valid() {
        let outcome = validate(&request(vec![line(1, 2.5)]));
        assert!(outcome.is_valid, "unexpected errors: {:?}", outcome.errors);
    }

    #[test]
    fn quantity_below_minimum_granularity_is_rejected() {
        let outcome = validate(&request(vec![line(1, 0.0005)]));
        assert!(!outcome.is_valid);
        assert_eq!(outcome.messages(), vec!["minimum disposal quantity is 0.001"]);
        assert_eq!(outcome.errors[0].field, "items[0].quantity_to_dispose");
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        let outcome = validate(&request(vec![line(1, 0.0), line(2, -1.0), line(3, f64::NAN)]));
        assert_eq!(outcome.errors.len(), 3);
        assert!(
            outcome
                .messages()
                .iter()
                .all(|m| *m == "quantity to dispose must be greater than zero")
        );
    }

    #[test]
    fn quantity_at_minimum_granularity_is_accepted() {
        let outcome = validate(&request(vec![line(1, 0.001)]));
        assert!(outcome.is_valid, "unexpected errors: {:?}", outcome.errors);
    }

    #[test]
    fn custom_minimum_disposal_quantity_is_enforced() {
        let settings = ReconciliationSettings {
            min_disposal_quantity: 0.5,
            ..ReconciliationSettings::default()
        };

        let outcome = validate_with(&settings, &request(vec![line(1, 0.25), line(2, 0.5)]));
        assert_eq!(outcome.messages(), vec!["minimum disposal quantity is 0.5"]);
        assert_eq!(outcome.errors[0].field, "items[0].quantity_to_dispose");

        assert!(!validate_with(&settings, &request(vec![line(1, 0.001)])).is_valid);
        assert!(validate(&request(vec![line(1, 0.25)])).is_valid);
    }

    #[test]
    fn missing_or_garbled_fields_are_collected_not_fatal() {
        let json = r#"{
            "disposal_date": "",
            "disposal_reason": "EXPIRED",
            "disposal_method": "DESTRUCTION",
            "items": [
                { "product_id": "00000000-0000-0000-0000-000000000001" },
                { "product_id": "00000000-0000-0000-0000-000000000002", "quantity_to_dispose": "abc" },
                {
                    "product_id": "00000000-0000-0000-0000-000000000003",
                    "quantity_to_dispose": "1.5",
                    "expiration_date": "next week"
                }
            ]
        }"#;
        let req: DisposalRequest = serde_json::from_str(json).unwrap();

        let outcome = validate(&req);
        assert_eq!(
            outcome.messages(),
            vec![
                "disposal date is required",
                "quantity to dispose must be greater than zero",
                "quantity to dispose must be greater than zero",
                "expiration date is invalid",
            ]
        );
        assert_eq!(req.items[2].quantity(), 1.5);
    }

    #[test]
    fn unparseable_disposal_date_is_invalid() {
        let mut req = request(vec![line(1, 1.0)]);
        req.disposal_date = Some("02/04/2026".to_string());
        let outcome = validate(&req);
        assert_eq!(outcome.messages(), vec!["disposal date is invalid"]);
        assert_eq!(outcome.errors[0].field, "disposal_date");

        req.disposal_date = Some(" 2026-04-02 ".to_string());
        assert_eq!(req.date(), NaiveDate::from_ymd_opt(2026, 4, 2));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let req = DisposalRequest {
            disposal_date: None,
            disposal_reason: Some("STOLEN".to_string()),
            disposal_method: Some("   ".to_string()),
            reference_number: None,
            notes: None,
            items: vec![DisposalLine {
                product_id: None,
                ..line(1, 0.0005)
            }],
        };

        let outcome = validate(&req);
        let fields: Vec<_> = outcome.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "disposal_date",
                "disposal_reason",
                "disposal_method",
                "items[0].product_id",
                "items[0].quantity_to_dispose",
            ]
        );
        assert_eq!(outcome.errors[1].kind, ValidationErrorKind::BusinessRule);
        assert!(outcome.errors[1].message.contains("QUALITY_ISSUE"));
        assert_eq!(outcome.errors[2].message, "disposal method is required");
    }

    #[test]
    fn empty_items_are_rejected() {
        let outcome = validate(&request(vec![]));
        assert_eq!(outcome.messages(), vec!["at least one item is required"]);
    }

    #[test]
    fn reason_and_method_parse_into_enums() {
        let mut req = request(vec![line(1, 1.0)]);
        req.disposal_reason = Some("QUALITY_ISSUE".to_string());
        req.disposal_method = Some("RETURN_TO_VENDOR".to_string());
        assert_eq!(req.reason(), Some(DisposalReason::QualityIssue));
        assert_eq!(req.method(), Some(DisposalMethod::ReturnToVendor));

        let err = "SOLD".parse::<DisposalMethod>().unwrap_err();
        assert_eq!(err, DomainError::unknown_variant("disposal method", "SOLD"));
    }

    #[test]
    fn validation_does_not_look_at_stock() {
        let mut item = line(1, 50.0);
        item.current_stock = Some(1.0);
        assert!(validate(&request(vec![item])).is_valid);
    }

    #[test]
    fn stock_check_flags_excess_without_clamping() {
        let req = request(vec![line(1, 5.0), line(2, 3.0), line(3, 1.0)]);
        let snapshots = vec![snapshot(1, 4.0), snapshot(2, 3.0)];

        let errors = check_against_stock(&req, &snapshots);
        assert_eq!(errors.len(), 1);
        let err = errors.iter().next().unwrap();
        assert_eq!(err.kind, ValidationErrorKind::BusinessRule);
        assert_eq!(err.field, "items[0].quantity_to_dispose");
        assert_eq!(
            err.message,
            "quantity to dispose (5 kg) exceeds available stock (4 kg)"
        );
        assert_eq!(req.items[0].quantity(), 5.0);
    }

    #[test]
    fn line_stock_takes_precedence_over_snapshot() {
        let mut item = line(1, 5.0);
        item.current_stock = Some(10.0);
        let errors = check_against_stock(&request(vec![item]), &[snapshot(1, 1.0)]);
        assert!(errors.is_empty());
    }

    #[test]
    fn request_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "disposal_date": "2026-04-02",
            "disposal_reason": "DAMAGED",
            "disposal_method": "RECYCLING",
            "items": [{ "product_id": "00000000-0000-0000-0000-000000000001", "quantity_to_dispose": 2 }]
        }"#;
        let req: DisposalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.items[0].product_id, Some(pid(1)));
        assert!(validate(&req).is_valid);
    }
}
