//! Per-instance material data
//!
//! Materials carry string-keyed float properties the way engine shaders
//! expose named uniforms. A material only accepts randomized values for
//! properties it already declares; everything else is a no-op for the
//! caller to log at debug level.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named material with shader-style float properties
///
/// Instances always own their materials: [`SceneGraph::instantiate`]
/// deep-clones them, so writes here never leak back into a template or a
/// sibling instance.
///
/// [`SceneGraph::instantiate`]: super::SceneGraph::instantiate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,

    /// Declared float properties and their current values
    floats: HashMap<String, f32>,

    /// RGBA color tint, if the material supports tinting
    #[serde(default)]
    pub tint: Option<[f32; 4]>,

    /// Selected sprite-sheet cell (column, row), if any
    #[serde(default)]
    pub frame_cell: Option<(u32, u32)>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Material {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper to declare a float property with a default value
    pub fn with_float(mut self, property: impl Into<String>, value: f32) -> Self {
        self.floats.insert(property.into(), value);
        self
    }

    /// Whether this material declares the named float property
    pub fn has_float(&self, property: &str) -> bool {
        self.floats.contains_key(property)
    }

    /// Declare (or overwrite) a float property
    pub fn declare_float(&mut self, property: impl Into<String>, value: f32) {
        self.floats.insert(property.into(), value);
    }

    /// Set a float property only if the material already declares it
    ///
    /// Returns false when the property is absent, which callers treat as a
    /// silent no-op.
    pub fn set_if_declared(&mut self, property: &str, value: f32) -> bool {
        match self.floats.get_mut(property) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get_float(&self, property: &str) -> Option<f32> {
        self.floats.get(property).copied()
    }
}
