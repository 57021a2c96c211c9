//! Scene graph - hierarchy, transforms, tags, templates

use ahash::HashMap;
use glam::{Quat, Vec3};

use super::{Material, NodeId, TemplateId};

/// A single scene node with a local transform and optional materials
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Category tag used for lookups (e.g. the teleport network tag)
    pub tag: Option<String>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub materials: Vec<Material>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Node {
            name,
            tag: None,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            materials: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The scene graph, owning all nodes and registered templates
///
/// Ids are handed out by a per-graph counter so that identically constructed
/// scenes get identical ids, which keeps seeded runs reproducible.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
    templates: HashMap<String, TemplateId>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId::from_raw(self.next_id)
    }

    /// Spawn a new root node
    pub fn spawn(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.alloc_id();
        self.nodes.insert(id, Node::new(name.into(), None));
        id
    }

    /// Spawn a new node parented under `parent`
    ///
    /// Returns None if the parent no longer exists.
    pub fn spawn_child(&mut self, parent: NodeId, name: impl Into<String>) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.alloc_id();
        self.nodes.insert(id, Node::new(name.into(), Some(parent)));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Destroy a node and its whole subtree
    ///
    /// Returns the number of nodes removed (0 if the id was already gone).
    pub fn destroy(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.get(&id) else {
            return 0;
        };

        // Detach from parent first so the subtree walk stays self-contained
        if let Some(parent) = node.parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|c| *c != id);
            }
        }

        let subtree = self.subtree(id);
        for n in &subtree {
            self.nodes.remove(n);
        }
        log::debug!("destroyed {} ({} nodes)", id, subtree.len());
        subtree.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Reparent a node (None detaches it to a root)
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        if !self.nodes.contains_key(&child) {
            return false;
        }
        if let Some(p) = parent {
            // Refuse cycles
            if p == child || self.is_ancestor_of(child, p) || !self.nodes.contains_key(&p) {
                return false;
            }
        }

        let old_parent = self.nodes[&child].parent;
        if let Some(op) = old_parent {
            if let Some(n) = self.nodes.get_mut(&op) {
                n.children.retain(|c| *c != child);
            }
        }
        if let Some(np) = parent {
            if let Some(n) = self.nodes.get_mut(&np) {
                n.children.push(child);
            }
        }
        if let Some(n) = self.nodes.get_mut(&child) {
            n.parent = parent;
        }
        true
    }

    /// The node's id plus all descendants, preorder
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.get(&n) {
                out.push(n);
                // Reverse keeps preorder left-to-right under a stack
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Whether `a` is a strict ancestor of `b`
    pub fn is_ancestor_of(&self, a: NodeId, b: NodeId) -> bool {
        let mut cursor = self.nodes.get(&b).and_then(|n| n.parent);
        while let Some(p) = cursor {
            if p == a {
                return true;
            }
            cursor = self.nodes.get(&p).and_then(|n| n.parent);
        }
        false
    }

    /// Whether the two nodes share a vertical scene-graph line
    /// (same node, ancestor, or descendant)
    pub fn in_same_subtree(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.is_ancestor_of(a, b) || self.is_ancestor_of(b, a)
    }

    /// All live nodes carrying the given tag, in creation order
    pub fn nodes_with_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.tag.as_deref() == Some(tag))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// World-space position, composed through rigid parent transforms
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(p) => {
                let parent_pos = self.world_position(p)?;
                let parent_rot = self.world_rotation(p)?;
                Some(parent_pos + parent_rot * node.translation)
            }
            None => Some(node.translation),
        }
    }

    /// World-space rotation
    pub fn world_rotation(&self, id: NodeId) -> Option<Quat> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(p) => Some(self.world_rotation(p)? * node.rotation),
            None => Some(node.rotation),
        }
    }

    /// Place a node at a world-space pose, accounting for its parent chain
    pub fn set_world_pose(&mut self, id: NodeId, position: Vec3, rotation: Quat) -> bool {
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            return false;
        };
        let (local_pos, local_rot) = match parent {
            Some(p) => {
                let (Some(parent_pos), Some(parent_rot)) =
                    (self.world_position(p), self.world_rotation(p))
                else {
                    return false;
                };
                let inv = parent_rot.inverse();
                (inv * (position - parent_pos), inv * rotation)
            }
            None => (position, rotation),
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.translation = local_pos;
            node.rotation = local_rot;
            true
        } else {
            false
        }
    }

    /// Register a node subtree as an instantiable template, keyed by the
    /// root node's name
    pub fn register_template(&mut self, root: NodeId) -> Option<TemplateId> {
        let name = self.nodes.get(&root)?.name.clone();
        let template = TemplateId(root);
        self.templates.insert(name, template);
        Some(template)
    }

    pub fn template_by_name(&self, name: &str) -> Option<TemplateId> {
        self.templates.get(name).copied()
    }

    /// Clone a template subtree into the scene with fresh ids
    ///
    /// Materials are deep-cloned, so mutating an instance can never affect
    /// the template or any sibling instance.
    pub fn instantiate(&mut self, template: TemplateId, parent: Option<NodeId>) -> Option<NodeId> {
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                return None;
            }
        }
        self.clone_subtree(template.0, parent)
    }

    fn clone_subtree(&mut self, src: NodeId, parent: Option<NodeId>) -> Option<NodeId> {
        let (copy, child_ids) = {
            let src_node = self.nodes.get(&src)?;
            let mut copy = src_node.clone();
            copy.parent = parent;
            copy.children = Vec::new();
            (copy, src_node.children.clone())
        };

        let id = self.alloc_id();
        self.nodes.insert(id, copy);
        if let Some(p) = parent {
            if let Some(n) = self.nodes.get_mut(&p) {
                n.children.push(id);
            }
        }
        for child in child_ids {
            self.clone_subtree(child, Some(id));
        }
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
