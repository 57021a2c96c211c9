//! CLI harness
//!
//! Presentation layer only: drives `generate()`/`clear()` and the teleport
//! network directly, standing in for the editor buttons and trigger volumes
//! a host engine would provide.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use glam::Vec3;

use crate::grid::config::load_config;
use crate::grid::GridGenerator;
use crate::host::{HostCallbacks, HostContext, RecordingAnimationDriver, VolumeKind};
use crate::rng;
use crate::scene::{NodeId, SceneGraph};
use crate::teleport::{ChestConfig, TeleportNetwork, ACTOR_TAG, TARGET_NAME};

/// Load a generator config, run it once, and print the placement report
pub fn run_generate(path: &Path, seed_override: Option<u64>) -> Result<()> {
    let config =
        load_config(path).with_context(|| format!("failed to load config {}", path.display()))?;
    let seed = seed_override.unwrap_or_else(|| config.seed.resolve());

    let mut scene = SceneGraph::new();
    config.register_templates(&mut scene);

    let mut generator = GridGenerator::from_config(&config);
    let mut rng = rng::seeded(seed);
    let report = generator.generate(&mut scene, &mut rng)?;

    println!("# {} (seed {seed})", config.name);
    for p in &report.placements {
        println!(
            "{:24} cell ({}, {}, {})  pos ({:+.3}, {:+.3}, {:+.3})  scale ({:.2}, {:.2}, {:.2})  yaw {:+.1}",
            p.type_name,
            p.cell.x,
            p.cell.y,
            p.cell.z,
            p.position.x,
            p.position.y,
            p.position.z,
            p.scale.x,
            p.scale.y,
            p.scale.z,
            p.rotation_deg.y,
        );
    }
    println!(
        "{} instances placed, {} cells skipped",
        report.placements.len(),
        report.skipped_cells
    );
    Ok(())
}

/// Build an N-chest network and run a scripted actor walk through it
///
/// The actor repeatedly approaches whichever chest it last arrived at and
/// steps into its teleport volume, exercising open/close, transfer, lockout
/// and cooldown paths. Transitions are logged by the library; the summary
/// printed here is the per-chest end state.
pub fn run_simulate(chest_count: usize, duration: f32, seed: u64) -> Result<()> {
    ensure!(chest_count >= 2, "a teleport network needs at least 2 chests");

    let mut scene = SceneGraph::new();
    let mut network = TeleportNetwork::new(ChestConfig::default());
    let mut chests = Vec::new();
    for i in 0..chest_count {
        let node = scene.spawn(format!("chest_{i}"));
        if let Some(n) = scene.node_mut(node) {
            n.translation = Vec3::new(i as f32 * 12.0, 0.0, 0.0);
        }
        if let Some(target) = scene.spawn_child(node, TARGET_NAME) {
            if let Some(n) = scene.node_mut(target) {
                n.translation = Vec3::new(0.0, 0.0, 1.5);
            }
        }
        network.register_chest(&mut scene, node)?;
        chests.push(node);
    }

    let actor = scene.spawn("player");
    if let Some(n) = scene.node_mut(actor) {
        n.tag = Some(ACTOR_TAG.to_string());
    }
    let mut anim = RecordingAnimationDriver::new();
    let mut rng = rng::seeded(seed);

    const DT: f32 = 0.1;
    const ATTEMPT_INTERVAL: f32 = 3.0;

    let mut elapsed = 0.0f32;
    let mut next_attempt = 0.0f32;
    while elapsed < duration {
        if elapsed >= next_attempt {
            if let Some(here) = nearest_chest(&scene, &chests, actor) {
                let mut ctx = HostContext {
                    scene: &mut scene,
                    anim: &mut anim,
                    rng: &mut rng,
                };
                // The walk left every other chest's proximity
                for other in chests.iter().filter(|c| **c != here) {
                    network.on_volume_exit(&mut ctx, *other, VolumeKind::PlayerDetect, actor);
                }
                network.on_volume_enter(&mut ctx, here, VolumeKind::PlayerDetect, actor);
                network.on_volume_enter(&mut ctx, here, VolumeKind::Teleport, actor);
            }
            next_attempt = elapsed + ATTEMPT_INTERVAL;
        }

        let mut ctx = HostContext {
            scene: &mut scene,
            anim: &mut anim,
            rng: &mut rng,
        };
        network.on_tick(&mut ctx, DT);
        elapsed += DT;
    }

    println!("# simulated {elapsed:.1}s with {chest_count} chests (seed {seed})");
    for node in &chests {
        if let Some(chest) = network.chest(*node) {
            println!(
                "{:10} state {:?}  lockout {:?}  lid intents {}",
                scene.node(*node).map(|n| n.name.as_str()).unwrap_or("?"),
                chest.state,
                network.lockout().remaining(*node),
                anim.intents_for(*node).len(),
            );
        }
    }
    if let Some(pos) = scene.world_position(actor) {
        println!("player ends at ({:+.2}, {:+.2}, {:+.2})", pos.x, pos.y, pos.z);
    }
    Ok(())
}

/// Chest whose root sits closest to the actor
fn nearest_chest(scene: &SceneGraph, chests: &[NodeId], actor: NodeId) -> Option<NodeId> {
    let actor_pos = scene.world_position(actor)?;
    chests
        .iter()
        .filter_map(|c| scene.world_position(*c).map(|p| (*c, p.distance(actor_pos))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}
