//! Scene instances — a component library plus an entity allocator.
//!
//! A [`Scene`] is one world instance. It owns the per-type component stores
//! through a [`ComponentLibrary`] and is the single source of entity identity
//! for everything stored in them. Scene-level duplicate ([`Scene::copy_from`])
//! and merge ([`Scene::merge_from`]) compose out of the per-type store
//! operations; merge re-seeds the incoming entity space first so store-level
//! entity collisions cannot occur.

use std::collections::HashMap;

use tracing::debug;

use cinder_ecs::{Component, ComponentLibrary, ComponentStore, EcsError, Entity, EntityAllocator};

/// One world instance: registered component stores plus entity allocation.
///
/// All scenes meant to be copied or merged into each other must be built by
/// the same registration sequence (the same scene *type*).
#[derive(Default)]
pub struct Scene {
    library: ComponentLibrary,
    allocator: EntityAllocator,
}

impl Scene {
    /// Create an empty scene with no registered component types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            library: ComponentLibrary::new(),
            allocator: EntityAllocator::new(),
        }
    }

    /// Register component type `T`. Part of scene-type definition; see
    /// [`ComponentLibrary::register`].
    pub fn register<T: Component>(&mut self, version: u64) -> &mut ComponentStore<T> {
        self.library.register::<T>(version)
    }

    /// Allocate a fresh entity ID.
    pub fn create_entity(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// The scene's component library.
    #[must_use]
    pub fn library(&self) -> &ComponentLibrary {
        &self.library
    }

    /// The scene's component library, mutably.
    pub fn library_mut(&mut self) -> &mut ComponentLibrary {
        &mut self.library
    }

    /// Attach a default-constructed `T` to `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered, or on the preconditions of
    /// [`ComponentStore::create`].
    pub fn create<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.store_mut::<T>().create(entity)
    }

    /// Returns `entity`'s `T` component, if present.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.store::<T>().get(entity)
    }

    /// Returns `entity`'s `T` component mutably, if present.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store_mut::<T>().get_mut(entity)
    }

    /// Returns `true` if `entity` has a `T` component.
    #[must_use]
    pub fn contains<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().contains(entity)
    }

    /// Detach `entity`'s `T` component, if present.
    pub fn remove<T: Component>(&mut self, entity: Entity) {
        self.store_mut::<T>().remove(entity);
    }

    /// Typed access to `T`'s store.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered in this scene.
    #[must_use]
    pub fn store<T: Component>(&self) -> &ComponentStore<T> {
        self.library
            .store::<T>()
            .unwrap_or_else(|| panic!("'{}' is not registered in this scene", T::type_name()))
    }

    /// Typed mutable access to `T`'s store.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered in this scene.
    pub fn store_mut<T: Component>(&mut self) -> &mut ComponentStore<T> {
        self.library
            .store_mut::<T>()
            .unwrap_or_else(|| panic!("'{}' is not registered in this scene", T::type_name()))
    }

    /// Mutable access to two stores at once, for passes that view both.
    ///
    /// # Panics
    ///
    /// Panics if either type is not registered in this scene.
    pub fn store_pair_mut<A: Component, B: Component>(
        &mut self,
    ) -> (&mut ComponentStore<A>, &mut ComponentStore<B>) {
        self.library.store_pair_mut::<A, B>().unwrap_or_else(|| {
            panic!(
                "'{}' or '{}' is not registered in this scene",
                A::type_name(),
                B::type_name()
            )
        })
    }

    /// Replace this scene's contents with a value copy of `other` — the
    /// "editable snapshot of a canonical scene" operation.
    ///
    /// Allocator state is copied too, so entities created afterwards in
    /// either scene never collide with copied ones.
    ///
    /// # Panics
    ///
    /// Panics if the two scenes were built from different registered sets.
    pub fn copy_from(&mut self, other: &Scene) {
        self.library.copy_from(&other.library);
        self.allocator = other.allocator.clone();
        debug!(entities = self.library.all_entities().len(), "scene copied");
    }

    /// Move `other`'s contents into this scene.
    ///
    /// Every entity in `other` is re-seeded through this scene's allocator
    /// and `other`'s stores are remapped accordingly before the per-type
    /// merge, so the two ID spaces cannot collide. `other` is left remapped
    /// and should be discarded.
    ///
    /// # Panics
    ///
    /// Panics if the two scenes were built from different registered sets.
    pub fn merge_from(&mut self, other: &mut Scene) -> Result<(), EcsError> {
        let incoming = other.library.all_entities();
        let mut mapping: HashMap<Entity, Entity> = HashMap::with_capacity(incoming.len());
        for entity in incoming {
            mapping.insert(entity, self.allocator.allocate());
        }

        other.library.remap(&mapping);
        self.library.merge_from(&other.library)?;
        debug!(entities = mapping.len(), "scene merged");
        Ok(())
    }
}
