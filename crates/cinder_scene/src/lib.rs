//! # cinder_scene
//!
//! Scene instances on top of [`cinder_ecs`]: entity allocation, whole-scene
//! duplicate and merge, and MessagePack snapshots of component stores.
//!
//! A [`Scene`] pairs a [`cinder_ecs::ComponentLibrary`] with an entity
//! allocator. Duplicating a scene is a per-type store copy; merging re-seeds
//! the incoming entity ID space through the receiving allocator and remaps
//! before the per-type merge, so entity collisions cannot occur.

pub mod scene;
pub mod snapshot;

pub use scene::Scene;
pub use snapshot::{SceneSnapshot, SnapshotError, StoreSnapshot, restore_store, snapshot_store};
