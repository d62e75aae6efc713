//! # cinder_ecs
//!
//! Dense, per-type component storage with lazy multi-store views.
//!
//! This crate provides:
//!
//! - [`Entity`] — lightweight `u32` entity identifiers, `0` reserved as null.
//! - [`Component`] trait — the mechanical contract all stored data satisfies.
//! - [`ComponentStore`] — three index-aligned containers per component type:
//!   dense values, dense owners, and a reverse lookup. O(1) create,
//!   swap-erase remove, O(1) membership probes.
//! - [`ComponentLibrary`] — name-keyed registry owning one store per
//!   registered type for a scene instance; the unit of whole-scene
//!   copy/merge/remap.
//! - [`View`] / [`ConstView`] — lazy iterators over the intersection of up
//!   to four stores, driven by the smallest store's dense entity array.
//!
//! Stores have no internal locking: callers partition access so each store
//! has at most one writer at a time, and the borrow checker enforces that no
//! structural mutation races a live view.

pub mod component;
pub mod entity;
pub mod error;
pub mod library;
pub mod store;
pub mod view;

pub use component::{Component, ComponentRecord};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use library::{ComponentLibrary, LibraryEntry};
pub use store::{AnyComponentStore, ComponentStore};
pub use view::{ConstView, View};
