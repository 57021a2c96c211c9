//! Host-engine callback contracts
//!
//! The core never polls the outside world. A host (game engine, test, or
//! the CLI harness) owns the loop and pushes events in: one tick per
//! simulation frame carrying elapsed time, and enter/exit notifications for
//! detection volumes. Collision detection itself stays on the host side.

use crate::rng::SimRng;
use crate::scene::{NodeId, SceneGraph};

/// Which volume of a chest an actor crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    /// Proximity region that opens/closes the lid
    PlayerDetect,
    /// Inner region that arms a teleport
    Teleport,
}

/// Everything a callback may touch, borrowed from the host for the call
pub struct HostContext<'a> {
    pub scene: &'a mut SceneGraph,
    pub anim: &'a mut dyn AnimationDriver,
    pub rng: &'a mut dyn SimRng,
}

/// The callback contract a host drives the simulation through
pub trait HostCallbacks {
    /// One simulation tick with elapsed seconds since the previous tick
    fn on_tick(&mut self, ctx: &mut HostContext<'_>, dt: f32);

    /// An actor entered one of a chest's volumes
    fn on_volume_enter(
        &mut self,
        ctx: &mut HostContext<'_>,
        chest: NodeId,
        kind: VolumeKind,
        actor: NodeId,
    );

    /// An actor left one of a chest's volumes
    fn on_volume_exit(
        &mut self,
        ctx: &mut HostContext<'_>,
        chest: NodeId,
        kind: VolumeKind,
        actor: NodeId,
    );
}

/// Closed set of animation requests the core can make
///
/// The core only ever sets intents; blending and playback belong to the
/// host's animation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationIntent {
    Open,
    Close,
}

/// External animation-state driver
pub trait AnimationDriver {
    fn set_intent(&mut self, chest: NodeId, intent: AnimationIntent);
}

/// Driver that discards all intents (headless runs)
#[derive(Debug, Default)]
pub struct NullAnimationDriver;

impl AnimationDriver for NullAnimationDriver {
    fn set_intent(&mut self, _chest: NodeId, _intent: AnimationIntent) {}
}

/// Driver that records intents in order, for tests and the CLI harness
#[derive(Debug, Default)]
pub struct RecordingAnimationDriver {
    pub events: Vec<(NodeId, AnimationIntent)>,
}

impl RecordingAnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents recorded for one particular chest
    pub fn intents_for(&self, chest: NodeId) -> Vec<AnimationIntent> {
        self.events
            .iter()
            .filter(|(id, _)| *id == chest)
            .map(|(_, intent)| *intent)
            .collect()
    }
}

impl AnimationDriver for RecordingAnimationDriver {
    fn set_intent(&mut self, chest: NodeId, intent: AnimationIntent) {
        self.events.push((chest, intent));
    }
}
