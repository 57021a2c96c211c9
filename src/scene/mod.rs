//! Scene substrate - nodes, transforms, materials, templates
//!
//! A minimal in-memory stand-in for the host engine's scene graph. The grid
//! generator and the teleport network only ever touch the scene through this
//! module, so the same code runs under tests, the CLI harness, or a real
//! host integration.

pub mod graph;
pub mod material;

pub use graph::{Node, SceneGraph};
pub use material::Material;

use serde::{Deserialize, Serialize};

/// Unique identifier for nodes in a scene graph
///
/// Ids are allocated by the owning [`SceneGraph`] in creation order and are
/// never reused within a graph's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw u64 value (useful for debugging/serialization)
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn from_raw(id: u64) -> Self {
        NodeId(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Opaque handle to an instantiable template subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub(crate) NodeId);

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template({})", self.0.raw())
    }
}
