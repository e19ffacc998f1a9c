use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, MovementId, ProductId, UserId};

/// Kind of stock movement recorded in the ledger.
///
/// Unknown kinds are preserved verbatim so newer ledger sources do not break
/// older readers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MovementType {
    Receipt,
    Disposal,
    Return,
    Adjustment,
    Sale,
    Other(String),
}

impl MovementType {
    pub fn as_str(&self) -> &str {
        match self {
            MovementType::Receipt => "RECEIPT",
            MovementType::Disposal => "DISPOSAL",
            MovementType::Return => "RETURN",
            MovementType::Adjustment => "ADJUSTMENT",
            MovementType::Sale => "SALE",
            MovementType::Other(s) => s,
        }
    }
}

impl From<String> for MovementType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "RECEIPT" => MovementType::Receipt,
            "DISPOSAL" => MovementType::Disposal,
            "RETURN" => MovementType::Return,
            "ADJUSTMENT" => MovementType::Adjustment,
            "SALE" => MovementType::Sale,
            _ => MovementType::Other(value),
        }
    }
}

impl From<MovementType> for String {
    fn from(value: MovementType) -> Self {
        value.as_str().to_string()
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signed quantity change in the stock ledger (external, read-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    /// Positive for stock in, negative for stock out.
    pub quantity: f64,
    pub movement_type: MovementType,
    #[serde(default)]
    pub document_reference: Option<String>,
    #[serde(default)]
    pub reference_id: Option<String>,
    pub event_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub warehouse_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entity for LedgerMovement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Selection applied to a movement stream before aggregation.
///
/// Empty `movement_types` means "any type". Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementFilter {
    #[serde(default)]
    pub movement_types: Vec<MovementType>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
}

impl MovementFilter {
    pub fn of_type(movement_type: MovementType) -> Self {
        Self {
            movement_types: vec![movement_type],
            ..Self::default()
        }
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn for_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn matches(&self, movement: &LedgerMovement) -> bool {
        if !self.movement_types.is_empty()
            && !self.movement_types.contains(&movement.movement_type)
        {
            return false;
        }
        if self.from.is_some_and(|from| movement.event_timestamp < from) {
            return false;
        }
        if self.to.is_some_and(|to| movement.event_timestamp > to) {
            return false;
        }
        if self.product_id.is_some_and(|p| movement.product_id != p) {
            return false;
        }
        true
    }

    /// Matching movements, in input order.
    pub fn apply<'a>(&self, movements: &'a [LedgerMovement]) -> Vec<&'a LedgerMovement> {
        movements.iter().filter(|m| self.matches(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn movement(n: u128, kind: MovementType, hour: u32) -> LedgerMovement {
        LedgerMovement {
            id: MovementId::from_uuid(Uuid::from_u128(n)),
            product_id: ProductId::from_uuid(Uuid::from_u128(n % 2)),
            product_name: format!("product {}", n % 2),
            quantity: 1.0,
            movement_type: kind,
            document_reference: None,
            reference_id: None,
            event_timestamp: Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap(),
            user_id: None,
            warehouse_name: None,
            notes: None,
        }
    }

    #[test]
    fn movement_type_parses_case_insensitively_and_keeps_unknowns() {
        assert_eq!(MovementType::from("receipt".to_string()), MovementType::Receipt);
        assert_eq!(
            MovementType::from("TRANSFER".to_string()),
            MovementType::Other("TRANSFER".to_string())
        );
        let json = serde_json::to_string(&MovementType::Disposal).unwrap();
        assert_eq!(json, "\"DISPOSAL\"");
    }

    #[test]
    fn filter_by_type_and_inclusive_range() {
        let movements = vec![
            movement(1, MovementType::Receipt, 8),
            movement(2, MovementType::Disposal, 9),
            movement(3, MovementType::Receipt, 10),
            movement(4, MovementType::Receipt, 12),
        ];
        let filter = MovementFilter::of_type(MovementType::Receipt).between(
            Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap(),
        );

        let ids: Vec<_> = filter.apply(&movements).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![movements[0].id, movements[2].id]);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let movements = vec![
            movement(1, MovementType::Return, 1),
            movement(2, MovementType::Other("TRANSFER".to_string()), 2),
        ];
        assert_eq!(MovementFilter::default().apply(&movements).len(), 2);
    }

    #[test]
    fn product_filter_narrows_stream() {
        let movements = vec![
            movement(1, MovementType::Receipt, 1),
            movement(2, MovementType::Receipt, 2),
        ];
        let filter = MovementFilter::default().for_product(movements[1].product_id);
        assert_eq!(filter.apply(&movements).len(), 1);
    }
}
