//! Core [`Component`] trait and snapshot record type.
//!
//! Every piece of data stored in a [`ComponentStore`](crate::store::ComponentStore)
//! must implement [`Component`]. The trait deliberately says nothing about what
//! a component *means* — it only pins down the mechanical contract the storage
//! layer needs: default construction for `create`, cloning for whole-store
//! copies, serde for snapshots, and `Send + Sync` so stores can be handed to
//! worker threads between scheduler join points.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::entity::Entity;

/// The core component trait.
///
/// # Examples
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use cinder_ecs::Component;
///
/// #[derive(Debug, Default, Clone, Serialize, Deserialize)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Send + Sync + 'static + Default + Clone + Serialize + DeserializeOwned {
    /// A human-readable name for this component type.
    ///
    /// This is the key under which the type is registered in a
    /// [`ComponentLibrary`](crate::library::ComponentLibrary); it must be
    /// unique within a scene's registered set.
    fn type_name() -> &'static str;
}

/// A record pairing an [`Entity`] with serialised component data.
///
/// Used by the snapshot layer when persisting a store's contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// The entity this component belongs to.
    pub entity: Entity,
    /// MessagePack-encoded component bytes.
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[test]
    fn test_type_name_is_registration_key() {
        assert_eq!(Health::type_name(), "Health");
    }

    #[test]
    fn test_component_record_roundtrip() {
        let health = Health {
            current: 80.0,
            max: 100.0,
        };
        let record = ComponentRecord {
            entity: Entity::from_raw(7),
            data: rmp_serde::to_vec(&health).unwrap(),
        };
        let bytes = rmp_serde::to_vec(&record).unwrap();
        let restored: ComponentRecord = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(restored.entity, Entity::from_raw(7));
        let value: Health = rmp_serde::from_slice(&restored.data).unwrap();
        assert_eq!(value, health);
    }
}
