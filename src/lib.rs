//! # MCVillage - Voxel Village Mod Core
//!
//! Engine-independent core of a voxel village mod: weighted grid population
//! of a bounded 3D lattice, per-instance visual randomization, and a
//! teleport-chest network with cooldowns and destination lockouts. A host
//! (engine, CLI harness, or test) owns the loop and drives everything
//! through tick and volume callbacks.

pub mod app;
pub mod grid;
pub mod host;
pub mod rng;
pub mod scene;
pub mod teleport;
pub mod visual;

/// Common imports for internal use
pub mod prelude {
    pub use crate::grid::{GeneratorConfig, GridGenerator, GridSpec, ObjectTypeEntry, SpawnGating};
    pub use crate::host::{AnimationDriver, AnimationIntent, HostCallbacks, HostContext, VolumeKind};
    pub use crate::rng::SimRng;
    pub use crate::scene::{NodeId, SceneGraph, TemplateId};
    pub use crate::teleport::{ChestConfig, ChestState, TeleportNetwork};
    pub use glam::{Quat, UVec3, Vec3};
}
