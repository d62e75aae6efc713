//! Dense per-type component storage.
//!
//! A [`ComponentStore<T>`] holds every `(entity, component)` association for
//! one component type as three index-aligned containers:
//!
//! - `components[i]` — the component values, densely packed.
//! - `entities[i]` — the owner of `components[i]`.
//! - `lookup[e]` — reverse index: `lookup[e] == i` iff `entities[i] == e`.
//!
//! Insertion appends to all three; removal swap-erases, trading iteration
//! order stability for O(1) mutation. The dense arrays are what make view
//! iteration cache-friendly.
//!
//! [`AnyComponentStore`] is the type-erased handle a
//! [`ComponentLibrary`](crate::library::ComponentLibrary) uses for whole-scene
//! operations. The typed hot path (`create`, `remove`, indexed access, views)
//! never goes through it.

use std::any::Any;
use std::collections::HashMap;

use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;

/// Dense storage for all components of type `T` within one scene.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore<T: Component> {
    components: Vec<T>,
    entities: Vec<Entity>,
    lookup: HashMap<Entity, usize>,
}

impl<T: Component> ComponentStore<T> {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            entities: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Create a store with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut store = Self::new();
        store.reserve(capacity);
        store
    }

    /// Reserve capacity for at least `additional` more components.
    pub fn reserve(&mut self, additional: usize) {
        self.components.reserve(additional);
        self.entities.reserve(additional);
        self.lookup.reserve(additional);
    }

    /// Attach a default-constructed `T` to `entity` and return a mutable
    /// reference to the new slot.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is the null entity or already has a `T` component —
    /// both indicate a caller bug, not a runtime condition.
    pub fn create(&mut self, entity: Entity) -> &mut T {
        assert!(
            entity.is_valid(),
            "cannot attach {} to the null entity",
            T::type_name()
        );
        assert!(
            !self.lookup.contains_key(&entity),
            "{entity} already has a {} component",
            T::type_name()
        );

        let index = self.components.len();
        self.lookup.insert(entity, index);
        self.entities.push(entity);
        self.components.push(T::default());
        &mut self.components[index]
    }

    /// Detach `entity`'s component, if present, by swapping the last element
    /// into its slot. No-op when the entity has no component here.
    ///
    /// Iteration order is not preserved.
    pub fn remove(&mut self, entity: Entity) {
        let Some(index) = self.lookup.remove(&entity) else {
            return;
        };
        self.components.swap_remove(index);
        self.entities.swap_remove(index);
        // The previous last element now lives at `index`.
        if index < self.entities.len() {
            self.lookup.insert(self.entities[index], index);
        }
    }

    /// Returns `true` if `entity` has a component in this store.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.lookup.contains_key(&entity)
    }

    /// Returns the dense index of `entity`'s component, if present.
    #[must_use]
    pub fn find_index(&self, entity: Entity) -> Option<usize> {
        self.lookup.get(&entity).copied()
    }

    /// Direct dense access by index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn component_at(&self, index: usize) -> &T {
        &self.components[index]
    }

    /// Direct dense mutable access by index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn component_at_mut(&mut self, index: usize) -> &mut T {
        &mut self.components[index]
    }

    /// Returns `entity`'s component, if present.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.find_index(entity).map(|i| &self.components[i])
    }

    /// Returns `entity`'s component mutably, if present.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.find_index(entity)?;
        Some(&mut self.components[index])
    }

    /// Returns the number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the store holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The dense owner array: `entities()[i]` owns `component_at(i)`.
    ///
    /// This is the slice a view's baseline scan walks, and the surface the
    /// snapshot layer iterates.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
        self.lookup.clear();
    }

    /// Replace this store's contents with a value copy of `source`.
    pub fn copy_from(&mut self, source: &Self) {
        self.components = source.components.clone();
        self.entities = source.entities.clone();
        self.lookup = source.lookup.clone();
    }

    /// Append every `(entity, component)` of `source` into this store.
    ///
    /// Fails with [`EcsError::MergeCollision`] — before anything is appended —
    /// if any source entity is already present here. Scene-level merging
    /// avoids this by remapping the incoming entity space first.
    pub fn merge_from(&mut self, source: &Self) -> Result<(), EcsError> {
        for &entity in &source.entities {
            if self.lookup.contains_key(&entity) {
                return Err(EcsError::MergeCollision(entity));
            }
        }

        self.reserve(source.len());
        for (entity, component) in source.entities.iter().zip(&source.components) {
            self.lookup.insert(*entity, self.components.len());
            self.entities.push(*entity);
            self.components.push(component.clone());
        }
        Ok(())
    }

    /// Rewrite every stored entity key under `mapping` and rebuild the
    /// reverse lookup.
    ///
    /// # Panics
    ///
    /// Panics if any stored entity has no mapping entry, or if the mapping is
    /// not injective over the stored set. A partial remap is never accepted —
    /// it would leave stale, ambiguous lookup state behind.
    pub fn remap(&mut self, mapping: &HashMap<Entity, Entity>) {
        let mut new_lookup = HashMap::with_capacity(self.entities.len());
        for (index, entity) in self.entities.iter_mut().enumerate() {
            let Some(&mapped) = mapping.get(entity) else {
                panic!("remap: no mapping for {entity}");
            };
            *entity = mapped;
            let previous = new_lookup.insert(mapped, index);
            assert!(
                previous.is_none(),
                "remap: mapping is not injective, {mapped} assigned twice"
            );
        }
        self.lookup = new_lookup;
    }

    /// Split the store into the parts a mutable view iterator needs: the
    /// dense owner slice, the reverse lookup, and a raw pointer to the
    /// component buffer.
    ///
    /// The returned shared borrows keep the store structurally frozen for
    /// their lifetime; the raw pointer lets the iterator hand out disjoint
    /// `&mut T` per entity.
    pub(crate) fn view_parts_mut(&mut self) -> (&[Entity], &HashMap<Entity, usize>, *mut T) {
        let components = self.components.as_mut_ptr();
        (&self.entities, &self.lookup, components)
    }
}

/// Type-erased handle over a [`ComponentStore<T>`], used by the
/// [`ComponentLibrary`](crate::library::ComponentLibrary) for whole-scene
/// clear/copy/merge/remap without knowing the component types involved.
pub trait AnyComponentStore: Send + Sync {
    /// Remove every component.
    fn clear(&mut self);

    /// Replace contents with a value copy of `source`.
    ///
    /// Panics if `source` is a store of a different component type; the
    /// library only pairs stores registered under the same name.
    fn copy_any(&mut self, source: &dyn AnyComponentStore);

    /// Append `source`'s contents; same collision semantics as
    /// [`ComponentStore::merge_from`].
    fn merge_any(&mut self, source: &dyn AnyComponentStore) -> Result<(), EcsError>;

    /// Detach `entity`'s component, if present.
    fn remove(&mut self, entity: Entity);

    /// Returns `true` if `entity` has a component in this store.
    fn contains(&self, entity: Entity) -> bool;

    /// Returns the number of stored components.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The dense owner array.
    fn entities(&self) -> &[Entity];

    /// Rewrite entity keys; same totality contract as
    /// [`ComponentStore::remap`].
    fn remap(&mut self, mapping: &HashMap<Entity, Entity>);

    /// Downcast support for the typed access path.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support for the typed access path.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyComponentStore for ComponentStore<T> {
    fn clear(&mut self) {
        ComponentStore::clear(self);
    }

    fn copy_any(&mut self, source: &dyn AnyComponentStore) {
        let source = source
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .unwrap_or_else(|| panic!("copy: source store is not a {} store", T::type_name()));
        self.copy_from(source);
    }

    fn merge_any(&mut self, source: &dyn AnyComponentStore) -> Result<(), EcsError> {
        let source = source
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .unwrap_or_else(|| panic!("merge: source store is not a {} store", T::type_name()));
        self.merge_from(source)
    }

    fn remove(&mut self, entity: Entity) {
        ComponentStore::remove(self, entity);
    }

    fn contains(&self, entity: Entity) -> bool {
        ComponentStore::contains(self, entity)
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn entities(&self) -> &[Entity] {
        ComponentStore::entities(self)
    }

    fn remap(&mut self, mapping: &HashMap<Entity, Entity>) {
        ComponentStore::remap(self, mapping);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
