//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u32` handle with no inherent data. It is a
//! free-standing key: the same entity may appear in any number of component
//! stores, and no store owns it.

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers — they carry no data of their own.
/// Components are attached to entities through a
/// [`ComponentStore`](crate::store::ComponentStore) to give them meaning.
///
/// The value `0` is reserved as the null handle ([`Entity::INVALID`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u32);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u32` identifier.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` identifier.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity IDs.
///
/// One allocator per scene is the single source of entity identity for that
/// scene. When two scenes are merged, the receiving allocator hands out fresh
/// IDs for every incoming entity (see [`reseed_after`](Self::reseed_after)),
/// so ID spaces never collide.
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    next_id: u32,
}

impl EntityAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh entity ID.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Returns the number of entities allocated so far.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.next_id - 1
    }

    /// Bumps the allocator so every future ID is strictly greater than
    /// `entity`. No-op if the allocator is already past it.
    pub fn reseed_after(&mut self, entity: Entity) {
        self.next_id = self.next_id.max(entity.id() + 1);
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let e = Entity::from_raw(42);
        assert_eq!(e.id(), 42);
        assert!(e.is_valid());
    }

    #[test]
    fn test_entity_invalid() {
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::INVALID.id(), 0);
    }

    #[test]
    fn test_entity_ordering_is_by_id() {
        assert!(Entity::from_raw(1) < Entity::from_raw(2));
        assert!(Entity::INVALID < Entity::from_raw(1));
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        let e3 = alloc.allocate();
        assert_eq!(e1.id(), 1);
        assert_eq!(e2.id(), 2);
        assert_eq!(e3.id(), 3);
        assert_eq!(alloc.count(), 3);
    }

    #[test]
    fn test_reseed_after_skips_taken_range() {
        let mut alloc = EntityAllocator::new();
        alloc.reseed_after(Entity::from_raw(100));
        assert_eq!(alloc.allocate().id(), 101);

        // Reseeding backwards must not reuse IDs.
        alloc.reseed_after(Entity::from_raw(5));
        assert_eq!(alloc.allocate().id(), 102);
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let entity = Entity::from_raw(999);
        let bytes = rmp_serde::to_vec(&entity).unwrap();
        let restored: Entity = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(entity, restored);
    }
}
