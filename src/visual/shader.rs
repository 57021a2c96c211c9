//! Randomized shader float parameters
//!
//! Each enabled parameter gets exactly one uniform draw per instance,
//! whether or not any material ends up accepting it - the draw stream must
//! not depend on what the instance's materials happen to declare.

use serde::{Deserialize, Serialize};

use crate::rng::SimRng;
use crate::scene::{NodeId, SceneGraph};

/// A named float range to randomize on an instance's materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderFloatParameter {
    /// Shader property name, e.g. "growth" or "sway_amplitude"
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub min_value: f32,
    pub max_value: f32,
}

fn default_enabled() -> bool {
    true
}

impl ShaderFloatParameter {
    pub fn new(name: impl Into<String>, min_value: f32, max_value: f32) -> Self {
        ShaderFloatParameter {
            name: name.into(),
            enabled: true,
            min_value,
            max_value,
        }
    }
}

/// Draw one value per enabled parameter and write it to every material in
/// the instance subtree that declares the property
///
/// Materials lacking a property are left untouched; a parameter that lands
/// on no material at all is a debug-level no-op, never an error.
pub fn apply_shader_parameters(
    scene: &mut SceneGraph,
    instance: NodeId,
    parameters: &[ShaderFloatParameter],
    rng: &mut dyn SimRng,
) {
    if parameters.is_empty() {
        return;
    }
    let nodes = scene.subtree(instance);

    for param in parameters.iter().filter(|p| p.enabled) {
        let value = rng.range_f32(param.min_value, param.max_value);

        let mut applied = 0usize;
        for id in &nodes {
            if let Some(node) = scene.node_mut(*id) {
                for material in &mut node.materials {
                    if material.set_if_declared(&param.name, value) {
                        applied += 1;
                    }
                }
            }
        }
        if applied == 0 {
            log::debug!(
                "shader parameter '{}' not declared by any material on {}",
                param.name,
                instance
            );
        }
    }
}
