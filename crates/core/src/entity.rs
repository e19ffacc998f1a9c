//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Ledger movements and receipt lines are entities: two records with the same
/// id describe the same thing even when their quantities differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
