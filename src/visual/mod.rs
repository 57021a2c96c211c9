//! Per-instance visual randomization - shader parameters and sprite sheets

pub mod shader;
pub mod sprite;

pub use shader::{apply_shader_parameters, ShaderFloatParameter};
pub use sprite::{apply_sprite_sheets, PrefabFilter, PrefabKind, SpriteSheet};
