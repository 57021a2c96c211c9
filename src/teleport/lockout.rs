//! Destination lockout table
//!
//! Shared mapping from chest identity to remaining lockout seconds. A chest
//! with a live entry refuses to initiate teleports regardless of its lid
//! state. The table is only ever touched from the single simulation thread:
//! one decrement-or-remove pass per tick, one insert per completed teleport.

use ahash::HashMap;

use crate::scene::{NodeId, SceneGraph};

#[derive(Debug, Default)]
pub struct LockoutTable {
    remaining: HashMap<NodeId, f32>,
}

impl LockoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a chest for `seconds`, overwriting any existing entry
    pub fn insert(&mut self, chest: NodeId, seconds: f32) {
        self.remaining.insert(chest, seconds);
        log::debug!("lockout: {} for {:.2}s", chest, seconds);
    }

    pub fn is_locked(&self, chest: NodeId) -> bool {
        self.remaining.contains_key(&chest)
    }

    pub fn remaining(&self, chest: NodeId) -> Option<f32> {
        self.remaining.get(&chest).copied()
    }

    /// Advance every entry by elapsed time, dropping expired entries and
    /// entries whose chest no longer exists
    pub fn tick(&mut self, dt: f32, scene: &SceneGraph) {
        // Snapshot the keys first; never mutate while iterating the map
        let keys: Vec<NodeId> = self.remaining.keys().copied().collect();
        for key in keys {
            if !scene.contains(key) {
                self.remaining.remove(&key);
                continue;
            }
            if let Some(t) = self.remaining.get_mut(&key) {
                *t -= dt;
                if *t <= 0.0 {
                    self.remaining.remove(&key);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
