//! Store snapshots — persisting component data as MessagePack records.
//!
//! This layer works only against a store's public surface: the dense owner
//! slice ([`ComponentStore::entities`]) and indexed access. It never sees the
//! reverse lookup, so the persisted form is independent of the store's
//! internal layout.
//!
//! Restore is all-or-nothing: every record is decoded before the target store
//! is touched, so a corrupt snapshot cannot leave a half-restored store.

use serde::{Deserialize, Serialize};

use cinder_ecs::{Component, ComponentRecord, ComponentStore};

/// Errors that can occur while writing or reading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Failed to encode a component to MessagePack.
    #[error("failed to encode component: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a component from MessagePack.
    #[error("failed to decode component: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The snapshot was taken from a store of a different component type.
    #[error("snapshot is for component '{expected}', got '{actual}'")]
    NameMismatch {
        /// The component name the caller tried to restore into.
        expected: &'static str,
        /// The component name recorded in the snapshot.
        actual: String,
    },
}

/// The persisted contents of one component store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// The component type name the records belong to.
    pub name: String,
    /// Snapshot format version, from the library registration.
    pub version: u64,
    /// One record per stored component, in dense order.
    pub records: Vec<ComponentRecord>,
}

/// The persisted contents of a whole scene: one store snapshot per
/// registered component type, in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Per-store snapshots, in the scene's registration order.
    pub stores: Vec<StoreSnapshot>,
}

impl SceneSnapshot {
    /// Serialise the whole snapshot to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(rmp_serde::to_vec(self)?)
    }

    /// Deserialise a snapshot from MessagePack bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    /// Find a store snapshot by component name.
    #[must_use]
    pub fn store(&self, name: &str) -> Option<&StoreSnapshot> {
        self.stores.iter().find(|store| store.name == name)
    }
}

/// Snapshot every `(entity, component)` pair of `store`.
pub fn snapshot_store<T: Component>(
    store: &ComponentStore<T>,
    version: u64,
) -> Result<StoreSnapshot, SnapshotError> {
    let mut records = Vec::with_capacity(store.len());
    for (index, &entity) in store.entities().iter().enumerate() {
        records.push(ComponentRecord {
            entity,
            data: rmp_serde::to_vec(store.component_at(index))?,
        });
    }
    Ok(StoreSnapshot {
        name: T::type_name().to_string(),
        version,
        records,
    })
}

/// Replace `store`'s contents with the snapshot's records.
///
/// Fails without touching the store if the snapshot belongs to a different
/// component type or any record fails to decode.
pub fn restore_store<T: Component>(
    store: &mut ComponentStore<T>,
    snapshot: &StoreSnapshot,
) -> Result<(), SnapshotError> {
    if snapshot.name != T::type_name() {
        return Err(SnapshotError::NameMismatch {
            expected: T::type_name(),
            actual: snapshot.name.clone(),
        });
    }

    let mut decoded = Vec::with_capacity(snapshot.records.len());
    for record in &snapshot.records {
        let value: T = rmp_serde::from_slice(&record.data)?;
        decoded.push((record.entity, value));
    }

    store.clear();
    store.reserve(decoded.len());
    for (entity, value) in decoded {
        *store.create(entity) = value;
    }
    Ok(())
}
