//! Entity trait: identity + continuity across edits.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Linear lookup of a record by id in a cached collection.
pub fn find_by_id<E: Entity>(records: &[E], id: E::Id) -> Option<&E> {
    records.iter().find(|r| r.id() == id)
}
