//! Per-chest state
//!
//! A chest tracks its lid state machine, which actors stand in its detect
//! volume, and its private timers. Cross-chest concerns (destination
//! selection, the lockout table) live in the network.

use crate::scene::NodeId;

/// Lid state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChestState {
    Closed,
    Open,
    /// Closed and not yet eligible to reopen
    CooldownClosed,
    /// Mid-transfer as the teleport source
    Teleporting,
}

/// A scheduled transfer waiting out the teleport delay
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingTeleport {
    pub actor: NodeId,
    pub remaining: f32,
}

/// One registered chest
#[derive(Debug)]
pub struct Chest {
    /// Root scene node carrying the network tag
    pub node: NodeId,
    /// Destination point for incoming teleports
    pub target: NodeId,
    pub state: ChestState,
    actors_in_detect: Vec<NodeId>,
    pub(crate) pending: Option<PendingTeleport>,
    pub(crate) reopen_remaining: Option<f32>,
    pub(crate) restore_remaining: Option<f32>,
    /// False while the post-teleport cooldown is running
    pub(crate) teleport_ready: bool,
}

impl Chest {
    pub(crate) fn new(node: NodeId, target: NodeId) -> Self {
        Chest {
            node,
            target,
            state: ChestState::Closed,
            actors_in_detect: Vec::new(),
            pending: None,
            reopen_remaining: None,
            restore_remaining: None,
            teleport_ready: true,
        }
    }

    pub fn teleport_ready(&self) -> bool {
        self.teleport_ready
    }

    /// Whether any actor currently stands in the detect volume
    pub fn actor_in_detect(&self) -> bool {
        !self.actors_in_detect.is_empty()
    }

    pub(crate) fn note_detect_enter(&mut self, actor: NodeId) {
        if !self.actors_in_detect.contains(&actor) {
            self.actors_in_detect.push(actor);
        }
    }

    pub(crate) fn note_detect_exit(&mut self, actor: NodeId) {
        self.actors_in_detect.retain(|a| *a != actor);
    }

    /// Start the reopen countdown, cancelling any countdown still pending
    pub(crate) fn start_reopen_cooldown(&mut self, duration: f32) {
        self.reopen_remaining = Some(duration);
    }

    /// Start the post-teleport capability cooldown, cancelling any pending
    pub(crate) fn start_capability_cooldown(&mut self, duration: f32) {
        self.teleport_ready = false;
        self.restore_remaining = Some(duration);
    }
}
