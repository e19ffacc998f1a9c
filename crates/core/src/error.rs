//! Domain error model.
//!
//! Reconciliation never fails fatally: validators collect every problem into a
//! [`ValidationErrors`] list so callers can show them all at once. A list can
//! be folded into a single [`DomainError`] when a caller wants `?` propagation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Transport and
/// storage concerns belong to the callers of this workspace.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Input was well-formed but breaks a business rule (e.g. disposing more
    /// than is in stock).
    #[error("business rule violated: {0}")]
    BusinessRule(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A string did not name a member of a fixed enumeration.
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

/// Category of a collected validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Missing or malformed required field.
    Structural,
    /// Well-formed value that a business rule rejects (invalid enum member,
    /// quantity above available stock, ...).
    BusinessRule,
}

/// One human-readable validation problem, tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn structural(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ValidationErrorKind::Structural,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn business_rule(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ValidationErrorKind::BusinessRule,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered collection of validation problems.
///
/// Order follows the order in which checks ran, so a form can list problems
/// top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(transparent)]
#[error("{} validation error(s): {}", .0.len(), join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn structural(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(ValidationError::structural(field, message));
    }

    pub fn business_rule(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(ValidationError::business_rule(field, message));
    }

    /// Append `other`, prefixing each field path with `prefix` (e.g. `lines[2]`).
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for mut e in other.0 {
            e.field = if e.field.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}.{}", e.field)
            };
            self.0.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    pub fn has_business_rule_errors(&self) -> bool {
        self.0
            .iter()
            .any(|e| e.kind == ValidationErrorKind::BusinessRule)
    }

    /// `Ok(value)` when no problems were collected, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(value: Vec<ValidationError>) -> Self {
        Self(value)
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let msg = join_messages(&errors.0);
        if errors.has_business_rule_errors() {
            DomainError::BusinessRule(msg)
        } else {
            DomainError::Validation(msg)
        }
    }
}

/// Validator output handed to callers: a flag plus every problem found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}

impl From<ValidationErrors> for ValidationOutcome {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors: errors.into_vec(),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
