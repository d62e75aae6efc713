//! Storage-layer error types.
//!
//! Only *recoverable* conditions live here. Precondition violations — creating
//! a component twice, remapping with an incomplete mapping, registering a name
//! twice — are programmer errors and panic at the call site instead.

use crate::entity::Entity;

/// Errors that can occur during store or library operations.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// A merge found the same entity present in both the source and the
    /// destination store. Merging is rejected before anything is appended;
    /// callers must remap one side's entity space first.
    #[error("merge collision: {0} is present in both stores")]
    MergeCollision(Entity),
}
