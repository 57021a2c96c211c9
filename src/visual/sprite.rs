//! Sprite-sheet randomization
//!
//! Grid-sliced sheets with a usable frame count and an optional tint. An
//! instance picks one compatible sheet, then one frame on it; the frame's
//! (column, row) cell and the tint are written to every material in the
//! instance subtree.

use serde::{Deserialize, Serialize};

use crate::rng::SimRng;
use crate::scene::{NodeId, SceneGraph};

/// What kind of prefab an object type instantiates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefabKind {
    #[default]
    Single,
    /// Two-quad crossed billboard
    Double,
    Crop,
}

/// Which prefab kinds a sheet may be applied to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefabFilter {
    #[default]
    Any,
    Single,
    Double,
    Crop,
}

impl PrefabFilter {
    pub fn matches(&self, kind: PrefabKind) -> bool {
        match self {
            PrefabFilter::Any => true,
            PrefabFilter::Single => kind == PrefabKind::Single,
            PrefabFilter::Double => kind == PrefabKind::Double,
            PrefabFilter::Crop => kind == PrefabKind::Crop,
        }
    }
}

/// A grid-sliced sprite sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub name: String,
    /// (columns, rows)
    pub grid_size: (u32, u32),
    /// Frames actually present on the sheet; clamped to columns * rows
    pub frame_count: u32,
    #[serde(default)]
    pub filter: PrefabFilter,
    #[serde(default)]
    pub color_tint: Option<[f32; 4]>,
}

impl SpriteSheet {
    pub fn capacity(&self) -> u32 {
        self.grid_size.0 * self.grid_size.1
    }

    /// Frame count bounded by the grid capacity
    pub fn usable_frames(&self) -> u32 {
        if self.frame_count > self.capacity() {
            log::warn!(
                "sprite sheet '{}' declares {} frames but only holds {}",
                self.name,
                self.frame_count,
                self.capacity()
            );
        }
        self.frame_count.min(self.capacity())
    }

    /// (column, row) cell of a frame index, row-major
    pub fn frame_cell(&self, index: u32) -> (u32, u32) {
        let columns = self.grid_size.0.max(1);
        (index % columns, index / columns)
    }
}

/// Pick a compatible sheet and frame for the instance and stamp them onto
/// every material in its subtree
///
/// Two draws are consumed whenever at least one compatible sheet exists
/// (sheet pick, then frame pick); no compatible sheet is a debug-level
/// no-op with no draws.
pub fn apply_sprite_sheets(
    scene: &mut SceneGraph,
    instance: NodeId,
    sheets: &[SpriteSheet],
    kind: PrefabKind,
    rng: &mut dyn SimRng,
) {
    let compatible: Vec<&SpriteSheet> = sheets
        .iter()
        .filter(|s| s.filter.matches(kind) && s.usable_frames() > 0)
        .collect();
    if compatible.is_empty() {
        log::debug!("no sprite sheet compatible with {:?} on {}", kind, instance);
        return;
    }

    let sheet = compatible[rng.range_usize(compatible.len())];
    let frame = rng.range_usize(sheet.usable_frames() as usize) as u32;
    let cell = sheet.frame_cell(frame);

    for id in scene.subtree(instance) {
        if let Some(node) = scene.node_mut(id) {
            for material in &mut node.materials {
                material.frame_cell = Some(cell);
                if let Some(tint) = sheet.color_tint {
                    material.tint = Some(tint);
                }
            }
        }
    }
}
