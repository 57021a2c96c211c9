//! The teleport network - transitions, destination selection, relocation
//!
//! Each chest runs the same state machine independently; the network owns
//! them all plus the shared lockout table, and implements the host callback
//! contract. A failed transfer (no eligible destination, actor gone) is
//! recoverable: flags reset, the chest stays consistent for a later attempt.

use ahash::HashMap;
use serde::{Deserialize, Serialize};

use super::chest::{Chest, ChestState, PendingTeleport};
use super::lockout::LockoutTable;
use crate::host::{AnimationIntent, HostCallbacks, HostContext, VolumeKind};
use crate::scene::{NodeId, SceneGraph};

/// Tag carried by every chest root node in a network
pub const NETWORK_TAG: &str = "teleport";

/// Tag an actor must carry for volume events to be acted on
pub const ACTOR_TAG: &str = "player";

/// Name of the child node marking a chest's arrival point
pub const TARGET_NAME: &str = "TeleportTarget";

/// Timing parameters shared by every chest in a network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChestConfig {
    /// Seconds between arming a teleport and the transfer firing
    pub teleport_delay: f32,
    /// Seconds a closed lid stays shut before it may reopen
    pub chest_reopen_cooldown: f32,
    /// Seconds after a transfer before the source may teleport again
    pub post_teleport_cooldown: f32,
    /// Seconds a destination refuses to start new teleports
    pub destination_lockout: f32,
}

impl Default for ChestConfig {
    fn default() -> Self {
        ChestConfig {
            teleport_delay: 1.0,
            chest_reopen_cooldown: 1.5,
            post_teleport_cooldown: 2.0,
            destination_lockout: 5.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("chest node {0} does not exist in the scene")]
    UnknownNode(NodeId),
    #[error("chest node {0} is already registered")]
    AlreadyRegistered(NodeId),
}

/// All chests of one network plus their shared lockout table
pub struct TeleportNetwork {
    config: ChestConfig,
    chests: Vec<Chest>,
    index: HashMap<NodeId, usize>,
    lockout: LockoutTable,
}

impl TeleportNetwork {
    pub fn new(config: ChestConfig) -> Self {
        TeleportNetwork {
            config,
            chests: Vec::new(),
            index: HashMap::default(),
            lockout: LockoutTable::new(),
        }
    }

    pub fn config(&self) -> &ChestConfig {
        &self.config
    }

    pub fn lockout(&self) -> &LockoutTable {
        &self.lockout
    }

    pub fn chest(&self, node: NodeId) -> Option<&Chest> {
        self.index.get(&node).map(|i| &self.chests[*i])
    }

    pub fn chest_count(&self) -> usize {
        self.chests.len()
    }

    /// Register a chest root node with the network
    ///
    /// Tags the node and resolves its arrival point; a chest without a
    /// `TeleportTarget` child gets one synthesized at its own origin.
    pub fn register_chest(
        &mut self,
        scene: &mut SceneGraph,
        node: NodeId,
    ) -> Result<(), RegisterError> {
        if !scene.contains(node) {
            return Err(RegisterError::UnknownNode(node));
        }
        if self.index.contains_key(&node) {
            return Err(RegisterError::AlreadyRegistered(node));
        }

        if let Some(n) = scene.node_mut(node) {
            n.tag = Some(NETWORK_TAG.to_string());
        }

        let existing = scene
            .node(node)
            .map(|n| n.children().to_vec())
            .unwrap_or_default()
            .into_iter()
            .find(|c| scene.node(*c).map(|n| n.name == TARGET_NAME).unwrap_or(false));
        let target = match existing {
            Some(t) => t,
            None => {
                log::warn!("chest {} has no {} child, synthesizing one", node, TARGET_NAME);
                scene
                    .spawn_child(node, TARGET_NAME)
                    .ok_or(RegisterError::UnknownNode(node))?
            }
        };

        self.index.insert(node, self.chests.len());
        self.chests.push(Chest::new(node, target));
        log::info!("registered chest {} ({} in network)", node, self.chests.len());
        Ok(())
    }

    /// Chest indices eligible as a destination for a transfer from `source`
    ///
    /// Excludes the source itself, anything sharing its scene-graph line
    /// (ancestor or descendant), untagged or destroyed nodes, and chests
    /// whose arrival point no longer resolves.
    fn eligible_destinations(&self, scene: &SceneGraph, source: NodeId) -> Vec<usize> {
        self.chests
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.node != source
                    && scene
                        .node(c.node)
                        .map(|n| n.tag.as_deref() == Some(NETWORK_TAG))
                        .unwrap_or(false)
                    && !scene.in_same_subtree(source, c.node)
                    && scene.contains(c.target)
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn attempt_teleport(&mut self, ctx: &mut HostContext<'_>, chest_idx: usize, actor: NodeId) {
        let delay = self.config.teleport_delay;
        let chest = &mut self.chests[chest_idx];

        if self.lockout.is_locked(chest.node) {
            log::debug!("chest {} refused teleport: destination lockout active", chest.node);
            return;
        }
        if chest.pending.is_some() {
            log::debug!("chest {} refused teleport: transfer already pending", chest.node);
            return;
        }
        if !chest.teleport_ready {
            log::debug!("chest {} refused teleport: capability cooldown", chest.node);
            return;
        }

        // Arming forces the lid shut regardless of detection state
        if chest.state == ChestState::Open {
            ctx.anim.set_intent(chest.node, AnimationIntent::Close);
        }
        chest.state = ChestState::Teleporting;
        chest.reopen_remaining = None;
        chest.pending = Some(PendingTeleport {
            actor,
            remaining: delay,
        });
        log::info!(
            "chest {} armed: teleporting {} in {:.2}s",
            chest.node,
            actor,
            delay
        );
    }

    fn complete_teleport(&mut self, ctx: &mut HostContext<'_>, chest_idx: usize, actor: NodeId) {
        let source = self.chests[chest_idx].node;

        let eligible = self.eligible_destinations(ctx.scene, source);
        if eligible.is_empty() {
            log::warn!("chest {} teleport aborted: no eligible destination", source);
            self.reset_after_transfer(chest_idx, false);
            return;
        }

        let dest_idx = eligible[ctx.rng.range_usize(eligible.len())];
        let (dest_node, dest_target) = {
            let dest = &self.chests[dest_idx];
            (dest.node, dest.target)
        };

        let (Some(position), Some(rotation)) = (
            ctx.scene.world_position(dest_target),
            ctx.scene.world_rotation(dest_target),
        ) else {
            log::warn!("chest {} teleport aborted: target of {} unresolvable", source, dest_node);
            self.reset_after_transfer(chest_idx, false);
            return;
        };

        if !ctx.scene.set_world_pose(actor, position, rotation) {
            log::warn!("chest {} teleport aborted: actor {} is gone", source, actor);
            self.reset_after_transfer(chest_idx, false);
            return;
        }

        self.lockout.insert(dest_node, self.config.destination_lockout);
        log::info!("teleported {} from chest {} to chest {}", actor, source, dest_node);
        self.reset_after_transfer(chest_idx, true);
    }

    /// Return the source chest to the closed/cooldown path after a transfer
    /// fired or aborted; only a completed transfer costs the capability
    /// cooldown.
    fn reset_after_transfer(&mut self, chest_idx: usize, transferred: bool) {
        let reopen = self.config.chest_reopen_cooldown;
        let restore = self.config.post_teleport_cooldown;
        let chest = &mut self.chests[chest_idx];

        chest.state = ChestState::CooldownClosed;
        chest.start_reopen_cooldown(reopen);
        if transferred {
            chest.start_capability_cooldown(restore);
        }
    }
}

impl HostCallbacks for TeleportNetwork {
    fn on_tick(&mut self, ctx: &mut HostContext<'_>, dt: f32) {
        self.lockout.tick(dt, ctx.scene);

        // Timers started on earlier ticks first; transfers may start new
        // ones below, and those must not lose part of this tick.
        for chest in &mut self.chests {
            if let Some(t) = &mut chest.reopen_remaining {
                *t -= dt;
                if *t <= 0.0 {
                    chest.reopen_remaining = None;
                    if chest.state == ChestState::CooldownClosed {
                        if chest.actor_in_detect() {
                            chest.state = ChestState::Open;
                            ctx.anim.set_intent(chest.node, AnimationIntent::Open);
                        } else {
                            chest.state = ChestState::Closed;
                        }
                    }
                }
            }

            if let Some(t) = &mut chest.restore_remaining {
                *t -= dt;
                if *t <= 0.0 {
                    chest.restore_remaining = None;
                    chest.teleport_ready = true;
                    log::debug!("chest {} teleport capability restored", chest.node);
                }
            }
        }

        let mut fired: Vec<(usize, NodeId)> = Vec::new();
        for (i, chest) in self.chests.iter_mut().enumerate() {
            if let Some(pending) = &mut chest.pending {
                pending.remaining -= dt;
                if pending.remaining <= 0.0 {
                    let actor = pending.actor;
                    chest.pending = None;
                    fired.push((i, actor));
                }
            }
        }
        for (i, actor) in fired {
            self.complete_teleport(ctx, i, actor);
        }
    }

    fn on_volume_enter(
        &mut self,
        ctx: &mut HostContext<'_>,
        chest: NodeId,
        kind: VolumeKind,
        actor: NodeId,
    ) {
        let Some(&i) = self.index.get(&chest) else {
            log::debug!("volume enter for unregistered chest {}", chest);
            return;
        };
        if !is_player(ctx.scene, actor) {
            log::debug!("ignoring non-player actor {} at chest {}", actor, chest);
            return;
        }
        match kind {
            VolumeKind::PlayerDetect => {
                let c = &mut self.chests[i];
                c.note_detect_enter(actor);
                if c.state == ChestState::Closed {
                    c.state = ChestState::Open;
                    ctx.anim.set_intent(c.node, AnimationIntent::Open);
                }
            }
            VolumeKind::Teleport => self.attempt_teleport(ctx, i, actor),
        }
    }

    fn on_volume_exit(
        &mut self,
        ctx: &mut HostContext<'_>,
        chest: NodeId,
        kind: VolumeKind,
        actor: NodeId,
    ) {
        let Some(&i) = self.index.get(&chest) else {
            return;
        };
        if kind != VolumeKind::PlayerDetect || !is_player(ctx.scene, actor) {
            return;
        }

        let reopen = self.config.chest_reopen_cooldown;
        let c = &mut self.chests[i];
        c.note_detect_exit(actor);
        if c.state == ChestState::Open {
            c.state = ChestState::CooldownClosed;
            c.start_reopen_cooldown(reopen);
            ctx.anim.set_intent(c.node, AnimationIntent::Close);
        }
    }
}

/// The actor-class filter for detection callbacks
fn is_player(scene: &SceneGraph, actor: NodeId) -> bool {
    scene
        .node(actor)
        .map(|n| n.tag.as_deref() == Some(ACTOR_TAG))
        .unwrap_or(false)
}
