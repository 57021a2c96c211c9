//! The grid generator - one placed instance per lattice cell
//!
//! Traversal is X-outer, Y-middle, Z-inner; that order only shows up in
//! instance naming, never in the per-cell distribution. The RNG stream is
//! consumed in a strict fixed order per cell (gating trials in entry order,
//! weighted pick, scale axes, rotation axes, shader parameters, sprite
//! sheets), so a fixed seed reproduces placements bit for bit.

use glam::{EulerRot, Quat, UVec3, Vec3};
use serde::{Deserialize, Serialize};

use super::config::{GeneratorConfig, GridSpec, ObjectTypeEntry, SpawnGating};
use super::select::pick_weighted;
use crate::rng::SimRng;
use crate::scene::{NodeId, SceneGraph, TemplateId};
use crate::visual::{apply_shader_parameters, apply_sprite_sheets};

/// Fatal configuration errors for a generation call
///
/// Both abort before anything is placed; per-cell gating misses are benign
/// skips, not errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("no enabled object types with a valid template")]
    NoEnabledTypes,
    #[error("object type '{entry}' references unregistered template '{template}'")]
    MissingTemplate { entry: String, template: String },
}

/// One placed instance, as recorded for reports and tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub cell: UVec3,
    /// Local position within the container
    pub position: Vec3,
    pub type_name: String,
    pub node: NodeId,
    pub scale: Vec3,
    /// Euler degrees, XYZ order
    pub rotation_deg: Vec3,
}

/// Everything one generation call produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub placements: Vec<Placement>,
    /// Cells where every candidate failed its spawn gate
    pub skipped_cells: u64,
}

/// Populates a lattice with weighted-random instances
///
/// `custom` gates candidates per cell with independent Bernoulli trials
/// before the weighted pick; `plant` skips gating and always places.
pub struct GridGenerator {
    pub name: String,
    pub spec: GridSpec,
    pub gating: SpawnGating,
    pub entries: Vec<ObjectTypeEntry>,
    container: Option<NodeId>,
}

impl GridGenerator {
    /// Probability-then-weight variant
    pub fn custom(name: impl Into<String>, spec: GridSpec, entries: Vec<ObjectTypeEntry>) -> Self {
        GridGenerator {
            name: name.into(),
            spec,
            gating: SpawnGating::ProbabilityThenWeight,
            entries,
            container: None,
        }
    }

    /// Weight-only variant
    pub fn plant(name: impl Into<String>, spec: GridSpec, entries: Vec<ObjectTypeEntry>) -> Self {
        GridGenerator {
            name: name.into(),
            spec,
            gating: SpawnGating::WeightOnly,
            entries,
            container: None,
        }
    }

    /// Build a generator from a loaded config
    pub fn from_config(config: &GeneratorConfig) -> Self {
        GridGenerator {
            name: config.name.clone(),
            spec: config.grid,
            gating: config.gating,
            entries: config.entries.clone(),
            container: None,
        }
    }

    /// Container node holding the current generation, if any
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Fill every cell of the lattice
    ///
    /// Any previous generation from this generator is cleared first. The
    /// enabled entry set and its templates are validated before anything is
    /// placed, so a configuration error leaves the scene untouched apart
    /// from that clear.
    pub fn generate(
        &mut self,
        scene: &mut SceneGraph,
        rng: &mut dyn SimRng,
    ) -> Result<PlacementReport, GenerateError> {
        let enabled: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.enabled)
            .map(|(i, _)| i)
            .collect();
        if enabled.is_empty() {
            return Err(GenerateError::NoEnabledTypes);
        }

        let mut templates: Vec<Option<TemplateId>> = vec![None; self.entries.len()];
        for &i in &enabled {
            let entry = &self.entries[i];
            match scene.template_by_name(&entry.template) {
                Some(t) => templates[i] = Some(t),
                None => {
                    return Err(GenerateError::MissingTemplate {
                        entry: entry.name.clone(),
                        template: entry.template.clone(),
                    })
                }
            }
        }

        self.clear(scene);
        let container = scene.spawn(format!("{}_generated", self.name));

        let mut report = PlacementReport::default();
        for x in 0..self.spec.size.x {
            for y in 0..self.spec.size.y {
                for z in 0..self.spec.size.z {
                    let cell = UVec3::new(x, y, z);
                    match self.populate_cell(scene, rng, container, cell, &enabled, &templates) {
                        Some(placement) => report.placements.push(placement),
                        None => report.skipped_cells += 1,
                    }
                }
            }
        }

        self.container = Some(container);
        log::info!(
            "generator '{}' placed {} instances ({} cells skipped)",
            self.name,
            report.placements.len(),
            report.skipped_cells
        );
        Ok(report)
    }

    fn populate_cell(
        &self,
        scene: &mut SceneGraph,
        rng: &mut dyn SimRng,
        container: NodeId,
        cell: UVec3,
        enabled: &[usize],
        templates: &[Option<TemplateId>],
    ) -> Option<Placement> {
        // Per-entry Bernoulli gate, drawn in entry-list order
        let survivors: Vec<usize> = match self.gating {
            SpawnGating::WeightOnly => enabled.to_vec(),
            SpawnGating::ProbabilityThenWeight => enabled
                .iter()
                .copied()
                .filter(|&i| rng.check_probability(self.entries[i].spawn_probability))
                .collect(),
        };

        let chosen = match survivors.len() {
            0 => {
                log::debug!("cell {cell} skipped: all candidates failed their spawn gate");
                return None;
            }
            1 => survivors[0],
            _ => {
                let weights: Vec<f32> =
                    survivors.iter().map(|&i| self.entries[i].spawn_weight).collect();
                survivors[pick_weighted(&weights, rng.next_f32())]
            }
        };

        let entry = &self.entries[chosen];
        let template = templates[chosen]?;
        let node = scene.instantiate(template, Some(container))?;
        let position = self.spec.cell_position(cell);

        let mut scale = Vec3::ONE;
        let mut rotation_deg = Vec3::ZERO;
        if let Some(n) = scene.node(node) {
            scale = n.scale;
            rotation_deg = euler_degrees(n.rotation);
        }

        let t = &entry.transform;
        if t.randomize_scale {
            scale = Vec3::new(
                rng.range_f32(t.scale_min.x, t.scale_max.x),
                rng.range_f32(t.scale_min.y, t.scale_max.y),
                rng.range_f32(t.scale_min.z, t.scale_max.z),
            );
        }
        if t.randomize_rotation {
            rotation_deg = Vec3::new(
                rng.range_f32(t.rotation_min.x, t.rotation_max.x),
                rng.range_f32(t.rotation_min.y, t.rotation_max.y),
                rng.range_f32(t.rotation_min.z, t.rotation_max.z),
            );
        }

        if let Some(n) = scene.node_mut(node) {
            n.name = format!("{} ({}, {}, {})", entry.name, cell.x, cell.y, cell.z);
            n.translation = position;
            n.scale = scale;
            n.rotation = Quat::from_euler(
                EulerRot::XYZ,
                rotation_deg.x.to_radians(),
                rotation_deg.y.to_radians(),
                rotation_deg.z.to_radians(),
            );
        }

        apply_shader_parameters(scene, node, &entry.shader_params, rng);
        if !entry.sprite_sheets.is_empty() {
            apply_sprite_sheets(scene, node, &entry.sprite_sheets, entry.prefab_kind, rng);
        }

        Some(Placement {
            cell,
            position,
            type_name: entry.name.clone(),
            node,
            scale,
            rotation_deg,
        })
    }

    /// Destroy the current generation's container subtree, if any
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        if let Some(container) = self.container.take() {
            let removed = scene.destroy(container);
            log::info!("generator '{}' cleared {} nodes", self.name, removed);
        }
    }
}

fn euler_degrees(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}
