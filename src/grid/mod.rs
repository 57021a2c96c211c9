//! Weighted grid generation
//!
//! Populates a bounded 3D lattice with one instance per cell, chosen from
//! weighted object types with optional per-cell probability gating, then
//! randomizes each instance's transform and materials.

pub mod config;
pub mod generator;
pub mod select;

pub use config::{
    GeneratorConfig, GridSpec, MaterialDef, ObjectTypeEntry, SeedPolicy, SpawnGating, TemplateDef,
    TransformRandomization,
};
pub use generator::{GenerateError, GridGenerator, Placement, PlacementReport};
pub use select::pick_weighted;
