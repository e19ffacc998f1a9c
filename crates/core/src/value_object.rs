//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Derived reconciliation results (stock statuses, check results, batch
/// summaries, extracted note fields) carry no identity of their own. They are
/// recomputed from their inputs on every call, so two results with the same
/// values are interchangeable.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct BatchCheckSummary {
///     total_items: usize,
///     matches: usize,
/// }
///
/// impl ValueObject for BatchCheckSummary {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
