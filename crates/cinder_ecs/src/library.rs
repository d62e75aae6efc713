//! Name-keyed registry of component stores for one scene instance.
//!
//! A [`ComponentLibrary`] owns exactly one [`ComponentStore`] per registered
//! component type. The registered set is fixed when the scene *type* is
//! defined — all scenes built from the same registration sequence share the
//! same set, which is what makes whole-scene copy and merge well-defined:
//! both are "for every registered type, perform the per-type store operation
//! between matching entries", in registration order.

use std::collections::HashMap;

use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::store::{AnyComponentStore, ComponentStore};

/// One registered component type: its name, a format version for snapshots,
/// and the owned store behind a type-erased handle.
pub struct LibraryEntry {
    name: &'static str,
    version: u64,
    store: Box<dyn AnyComponentStore>,
}

impl LibraryEntry {
    /// The registration name (the component's `type_name`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The snapshot format version registered for this type.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The type-erased store handle.
    #[must_use]
    pub fn store(&self) -> &dyn AnyComponentStore {
        self.store.as_ref()
    }
}

/// Registry owning one component store per registered type.
#[derive(Default)]
pub struct ComponentLibrary {
    /// Entries in registration order — this order is the iteration order for
    /// whole-scene copy/merge and for snapshotting.
    entries: Vec<LibraryEntry>,
    /// Name → index into `entries`.
    index: HashMap<&'static str, usize>,
}

impl ComponentLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register component type `T` under `T::type_name()` and return its
    /// store. Called once per type at scene-type definition time.
    ///
    /// # Panics
    ///
    /// Panics if the name is already registered — a duplicate registration is
    /// a fatal configuration error.
    pub fn register<T: Component>(&mut self, version: u64) -> &mut ComponentStore<T> {
        let name = T::type_name();
        assert!(
            !self.index.contains_key(name),
            "component '{name}' registered twice"
        );

        let slot = self.entries.len();
        self.index.insert(name, slot);
        self.entries.push(LibraryEntry {
            name,
            version,
            store: Box::new(ComponentStore::<T>::new()),
        });
        self.store_at_mut(slot)
    }

    /// Typed access to `T`'s store, or `None` if `T` was never registered.
    ///
    /// # Panics
    ///
    /// Panics if `T::type_name()` is registered but bound to a different
    /// concrete type.
    #[must_use]
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let &slot = self.index.get(T::type_name())?;
        let store = self.entries[slot]
            .store
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .unwrap_or_else(|| panic!("'{}' is registered as a different type", T::type_name()));
        Some(store)
    }

    /// Typed mutable access to `T`'s store, or `None` if `T` was never
    /// registered.
    ///
    /// # Panics
    ///
    /// Panics if `T::type_name()` is registered but bound to a different
    /// concrete type.
    #[must_use]
    pub fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        let &slot = self.index.get(T::type_name())?;
        Some(self.store_at_mut(slot))
    }

    /// Mutable access to two different stores at once, as a system pass
    /// needs when it builds a [`View`](crate::view::View) over both.
    ///
    /// Returns `None` if either type was never registered.
    ///
    /// # Panics
    ///
    /// Panics if `A` and `B` resolve to the same entry, or if an entry is
    /// bound to a different concrete type.
    #[must_use]
    pub fn store_pair_mut<A: Component, B: Component>(
        &mut self,
    ) -> Option<(&mut ComponentStore<A>, &mut ComponentStore<B>)> {
        let &slot_a = self.index.get(A::type_name())?;
        let &slot_b = self.index.get(B::type_name())?;
        assert_ne!(
            slot_a,
            slot_b,
            "'{}' and '{}' are the same store",
            A::type_name(),
            B::type_name()
        );

        let [entry_a, entry_b] = self
            .entries
            .get_disjoint_mut([slot_a, slot_b])
            .expect("slots are distinct and in range");
        let store_a = entry_a
            .store
            .as_any_mut()
            .downcast_mut::<ComponentStore<A>>()
            .unwrap_or_else(|| panic!("'{}' is registered as a different type", A::type_name()));
        let store_b = entry_b
            .store
            .as_any_mut()
            .downcast_mut::<ComponentStore<B>>()
            .unwrap_or_else(|| panic!("'{}' is registered as a different type", B::type_name()));
        Some((store_a, store_b))
    }

    fn store_at_mut<T: Component>(&mut self, slot: usize) -> &mut ComponentStore<T> {
        self.entries[slot]
            .store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .unwrap_or_else(|| panic!("'{}' is registered as a different type", T::type_name()))
    }

    /// Returns `true` if a type is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.iter()
    }

    /// Remove every component from every store. Registrations are kept.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.store.clear();
        }
    }

    /// Replace every store's contents with a value copy of the matching
    /// store in `other`.
    ///
    /// # Panics
    ///
    /// Panics if `other` was built from a different registered set — both
    /// libraries must describe the same scene type.
    pub fn copy_from(&mut self, other: &ComponentLibrary) {
        for entry in &mut self.entries {
            let source = other
                .entry(entry.name)
                .unwrap_or_else(|| panic!("copy: '{}' missing from source library", entry.name));
            entry.store.copy_any(source.store());
        }
    }

    /// Append every store's contents from the matching store in `other`,
    /// in registration order.
    ///
    /// Entity collisions surface as [`EcsError::MergeCollision`]; callers
    /// merging whole scenes remap the incoming entity space first.
    ///
    /// # Panics
    ///
    /// Panics if `other` was built from a different registered set.
    pub fn merge_from(&mut self, other: &ComponentLibrary) -> Result<(), EcsError> {
        for entry in &mut self.entries {
            let source = other
                .entry(entry.name)
                .unwrap_or_else(|| panic!("merge: '{}' missing from source library", entry.name));
            entry.store.merge_any(source.store())?;
        }
        Ok(())
    }

    /// Rewrite entity keys in every store under `mapping`.
    ///
    /// The mapping must cover every entity stored anywhere in this library;
    /// see [`ComponentStore::remap`] for the totality contract.
    pub fn remap(&mut self, mapping: &HashMap<Entity, Entity>) {
        for entry in &mut self.entries {
            entry.store.remap(mapping);
        }
    }

    /// Collect the union of all entities stored across every registered
    /// store. Used to build remap tables before a scene merge.
    #[must_use]
    pub fn all_entities(&self) -> Vec<Entity> {
        let mut seen = std::collections::HashSet::new();
        let mut all = Vec::new();
        for entry in &self.entries {
            for &entity in entry.store.entities() {
                if seen.insert(entity) {
                    all.push(entity);
                }
            }
        }
        all
    }

    fn entry(&self, name: &str) -> Option<&LibraryEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }
}
