//! Entity trait: identity + continuity across state changes.

/// Records persisted by a repository are keyed by their identity.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;

    /// Soft-deleted records stay in storage but are hidden from listings.
    fn is_deleted(&self) -> bool {
        false
    }
}
