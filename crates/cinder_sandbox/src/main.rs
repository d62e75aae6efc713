//! # cinder_sandbox
//!
//! A small end-to-end demo of the storage engine: registers a scene type,
//! spawns entities, runs a movement pass over a two-store view, duplicates
//! the scene, merges a second scene with a colliding entity ID space, and
//! snapshots the result.
//!
//! Run with `RUST_LOG=cinder_sandbox=info,cinder_scene=debug` to watch the
//! scene operations.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinder_ecs::{Component, ComponentStore, ConstView, View};
use cinder_scene::{Scene, snapshot_store};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Transform {
    x: f32,
    y: f32,
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Velocity {
    dx: f32,
    dy: f32,
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// The scene type of this sandbox: every scene instance registers the same
/// component set, in the same order.
fn make_scene() -> Scene {
    let mut scene = Scene::new();
    scene.register::<Transform>(1);
    scene.register::<Velocity>(1);
    scene
}

/// One movement pass: transform += velocity for every entity that has both.
fn run_movement_pass(scene: &mut Scene, timestep: f32) {
    let (transforms, velocities) = scene.store_pair_mut::<Transform, Velocity>();
    for (_, transform, velocity) in
        View::<(&mut ComponentStore<Transform>, &mut ComponentStore<Velocity>)>::new((
            transforms, velocities,
        ))
    {
        transform.x += velocity.dx * timestep;
        transform.y += velocity.dy * timestep;
    }
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cinder_sandbox=info".parse()?),
        )
        .init();

    info!("sandbox starting");

    let mut scene = make_scene();
    for i in 0..8 {
        let entity = scene.create_entity();
        let transform = scene.create::<Transform>(entity);
        transform.x = i as f32;

        // Half the entities move.
        if i % 2 == 0 {
            scene.create::<Velocity>(entity).dx = 1.0;
        }
    }
    info!(
        transforms = scene.store::<Transform>().len(),
        velocities = scene.store::<Velocity>().len(),
        "scene populated"
    );

    for _ in 0..60 {
        run_movement_pass(&mut scene, 1.0 / 60.0);
    }

    let moved = ConstView::<(&ComponentStore<Transform>, &ComponentStore<Velocity>)>::new((
        scene.store::<Transform>(),
        scene.store::<Velocity>(),
    ))
        .into_iter()
        .map(|(entity, transform, _)| (entity, transform.x))
        .collect::<Vec<_>>();
    info!(?moved, "after one simulated second");

    // Duplicate into an editable sandbox copy.
    let mut editable = make_scene();
    editable.copy_from(&scene);

    // Merge a second scene whose entity IDs collide with the first.
    let mut other = make_scene();
    let entity = other.create_entity();
    other.create::<Transform>(entity).y = 100.0;
    editable.merge_from(&mut other)?;
    info!(
        transforms = editable.store::<Transform>().len(),
        "after merge"
    );

    // Snapshot the merged result.
    let snapshot = snapshot_store(editable.store::<Transform>(), 1)?;
    info!(
        records = snapshot.records.len(),
        bytes = snapshot.records.iter().map(|r| r.data.len()).sum::<usize>(),
        "transform store snapshotted"
    );

    info!("sandbox done");
    Ok(())
}
