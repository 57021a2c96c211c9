//! Grid generation configuration - serializable parameters for generators
//!
//! All parameters needed to populate a lattice, serializable to RON so
//! setups can be kept as presets and loaded by the CLI harness. The seed
//! policy is part of the config, but a fixed seed can be overridden at the
//! call site for reproducibility experiments.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::{Material, SceneGraph};
use crate::visual::{PrefabKind, ShaderFloatParameter, SpriteSheet};

/// The bounded 3D integer lattice to fill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Cells per axis
    pub size: UVec3,
    /// Distance between neighboring cells
    pub spacing: f32,
    /// Center the lattice around the container origin
    pub align_to_center: bool,
}

impl GridSpec {
    pub fn cell_count(&self) -> u64 {
        self.size.x as u64 * self.size.y as u64 * self.size.z as u64
    }

    /// Local position of a cell within the container
    ///
    /// index * spacing, minus the centering offset ((size - 1) * spacing / 2
    /// per axis) when centering is on.
    pub fn cell_position(&self, cell: UVec3) -> Vec3 {
        let offset = if self.align_to_center {
            (self.size.as_vec3() - Vec3::ONE) * self.spacing * 0.5
        } else {
            Vec3::ZERO
        };
        cell.as_vec3() * self.spacing - offset
    }
}

/// Where the generation seed comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Fresh random seed every run
    Random,
    /// Fixed seed for bit-reproducible output
    Fixed(u64),
}

impl SeedPolicy {
    pub fn resolve(&self) -> u64 {
        match self {
            SeedPolicy::Fixed(seed) => *seed,
            SeedPolicy::Random => rand::random(),
        }
    }
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Random
    }
}

/// How the candidate set is gated per cell
///
/// The two generator variants differ only here: probability gating runs an
/// independent Bernoulli trial per enabled entry before the weighted pick,
/// weight-only gating goes straight to the weighted pick. The two are never
/// composed within one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnGating {
    WeightOnly,
    ProbabilityThenWeight,
}

/// Independent per-axis scale and rotation randomization
///
/// Each enabled feature draws one uniform value per axis (X, Y, Z order);
/// disabled features keep the template's transform untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRandomization {
    #[serde(default)]
    pub randomize_scale: bool,
    #[serde(default = "vec3_one")]
    pub scale_min: Vec3,
    #[serde(default = "vec3_one")]
    pub scale_max: Vec3,
    #[serde(default)]
    pub randomize_rotation: bool,
    /// Euler degrees per axis
    #[serde(default)]
    pub rotation_min: Vec3,
    #[serde(default)]
    pub rotation_max: Vec3,
}

fn vec3_one() -> Vec3 {
    Vec3::ONE
}

impl Default for TransformRandomization {
    fn default() -> Self {
        TransformRandomization {
            randomize_scale: false,
            scale_min: Vec3::ONE,
            scale_max: Vec3::ONE,
            randomize_rotation: false,
            rotation_min: Vec3::ZERO,
            rotation_max: Vec3::ZERO,
        }
    }
}

/// One spawnable object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeEntry {
    /// Non-empty display name; also used for instance naming
    pub name: String,
    /// Name of the registered template to instantiate
    pub template: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Relative likelihood mass among surviving candidates
    #[serde(default = "default_weight")]
    pub spawn_weight: f32,
    /// Per-cell Bernoulli gate, used only by probability-gated generators
    #[serde(default = "default_probability")]
    pub spawn_probability: f32,
    #[serde(default)]
    pub prefab_kind: PrefabKind,
    #[serde(default)]
    pub transform: TransformRandomization,
    #[serde(default)]
    pub shader_params: Vec<ShaderFloatParameter>,
    #[serde(default)]
    pub sprite_sheets: Vec<SpriteSheet>,
}

fn default_enabled() -> bool {
    true
}

fn default_weight() -> f32 {
    1.0
}

fn default_probability() -> f32 {
    1.0
}

impl ObjectTypeEntry {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        ObjectTypeEntry {
            name: name.into(),
            template: template.into(),
            enabled: true,
            spawn_weight: 1.0,
            spawn_probability: 1.0,
            prefab_kind: PrefabKind::default(),
            transform: TransformRandomization::default(),
            shader_params: Vec::new(),
            sprite_sheets: Vec::new(),
        }
    }
}

/// Template described in a config file: a named node with materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
}

/// Material described in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    pub name: String,
    /// Declared float properties with their defaults
    #[serde(default)]
    pub floats: Vec<(String, f32)>,
}

/// Complete generator setup, loadable from RON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub name: String,
    #[serde(default)]
    pub seed: SeedPolicy,
    pub gating: SpawnGating,
    pub grid: GridSpec,
    #[serde(default)]
    pub templates: Vec<TemplateDef>,
    pub entries: Vec<ObjectTypeEntry>,
}

impl GeneratorConfig {
    /// Spawn and register every template this config describes
    pub fn register_templates(&self, scene: &mut SceneGraph) {
        for def in &self.templates {
            let node = scene.spawn(def.name.clone());
            if let Some(n) = scene.node_mut(node) {
                for mat in &def.materials {
                    let mut material = Material::new(mat.name.clone());
                    for (property, value) in &mat.floats {
                        material.declare_float(property.clone(), *value);
                    }
                    n.materials.push(material);
                }
            }
            scene.register_template(node);
        }
    }
}

/// Errors from loading a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Load a [`GeneratorConfig`] from a RON file
pub fn load_config(path: &std::path::Path) -> Result<GeneratorConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&text)?)
}
