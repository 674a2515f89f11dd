use std::collections::BTreeMap;

use glam::Vec3;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::{ModelCatalog, TargetModelDef};
use crate::host::{ObjectInitRequest, PhysicalProfile, SimHost, SurfaceMaterial};
use crate::occupancy::ScenePlans;

/// Tunable constants for scene population.
#[derive(Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    #[serde(default = "default_min_targets")]
    pub min_targets: u32,
    #[serde(default = "default_max_targets")]
    pub max_targets: u32,
    /// Mass shared by every target object.
    #[serde(default = "default_target_mass")]
    pub target_mass: f32,
    /// Roll applied to every target object.
    #[serde(default)]
    pub target_roll_deg: f32,
    /// Mass shared by every container.
    #[serde(default = "default_container_mass")]
    pub container_mass: f32,
    /// Scale-down factor applied to every container model.
    #[serde(default = "default_container_scale")]
    pub container_scale: Vec3,
    /// Chance of leaving a room without a container.
    #[serde(default = "default_container_skip_chance")]
    pub container_skip_chance: f32,
    /// Yaw is sampled uniformly from (-limit, limit) degrees.
    #[serde(default = "default_yaw_limit")]
    pub yaw_limit_deg: f32,
}

fn default_min_targets() -> u32 {
    8
}

fn default_max_targets() -> u32 {
    12
}

fn default_target_mass() -> f32 {
    0.25
}

fn default_container_mass() -> f32 {
    1.0
}

fn default_container_scale() -> Vec3 {
    Vec3::new(0.6, 0.4, 0.6)
}

fn default_container_skip_chance() -> f32 {
    0.25
}

fn default_yaw_limit() -> f32 {
    179.0
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            min_targets: default_min_targets(),
            max_targets: default_max_targets(),
            target_mass: default_target_mass(),
            target_roll_deg: 0.0,
            container_mass: default_container_mass(),
            container_scale: default_container_scale(),
            container_skip_chance: default_container_skip_chance(),
            yaw_limit_deg: default_yaw_limit(),
        }
    }
}

impl PopulationConfig {
    /// Fixed profile shared by every target object.
    fn target_profile(&self) -> PhysicalProfile {
        PhysicalProfile {
            mass: self.target_mass,
            material: SurfaceMaterial::Ceramic,
            bounciness: 0.5,
            resonance: 0.6,
            amp: 0.01,
        }
    }

    /// Light-mass profile shared by every container.
    fn container_profile(&self) -> PhysicalProfile {
        PhysicalProfile {
            mass: self.container_mass,
            material: SurfaceMaterial::Cardboard,
            bounciness: 0.2,
            resonance: 0.45,
            amp: 0.02,
        }
    }
}

struct Rng(SmallRng);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    fn float(&mut self) -> f32 {
        self.0.gen()
    }

    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.0.gen_range(min..=max)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.gen_range(0..len)
    }

    fn degrees(&mut self, limit: f32) -> f32 {
        if limit <= 0.0 {
            return 0.0;
        }
        self.0.gen_range(-limit..limit)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        Some(&items[i])
    }
}

/// Scene Population Engine: partitions a floor plan into rooms and samples
/// placements for target objects and containers.
///
/// All target objects of a scene cluster in one randomly chosen room, while
/// containers are distributed over the rooms independently; the asymmetry is
/// deliberate and shapes the transport task.
pub struct SceneEngine {
    catalog: ModelCatalog,
    config: PopulationConfig,
    rng: Rng,
    target_objects: Vec<u64>,
    containers: Vec<u64>,
}

impl SceneEngine {
    pub fn new(catalog: ModelCatalog, config: PopulationConfig, seed: u64) -> Result<Self, String> {
        catalog.validate()?;
        Ok(Self {
            catalog,
            config,
            rng: Rng::new(seed),
            target_objects: Vec::new(),
            containers: Vec::new(),
        })
    }

    /// Populate the scene identified by `scene` and `layout`: a clustered
    /// batch of target objects, then at most one container per room, then a
    /// random visual material for every target object. Call once per scene
    /// before issuing any arm action.
    ///
    /// Placement only avoids cells the occupancy grid marks occupied; placed
    /// entities are not checked against each other.
    pub fn populate(
        &mut self,
        host: &mut dyn SimHost,
        plans: &dyn ScenePlans,
        scene: &str,
        layout: u32,
    ) -> Result<(), String> {
        self.target_objects.clear();
        self.containers.clear();

        let plan = plans.floor_plan(scene, layout)?;
        plan.validate()?;

        // Sort all free cells by room. A room with no free cells keeps an
        // (empty) entry so container placement still visits it.
        let mut rooms: BTreeMap<i32, Vec<(i32, i32)>> = BTreeMap::new();
        for iy in 0..plan.height as i32 {
            for ix in 0..plan.width as i32 {
                let Some(room) = plan.room_at(ix, iy) else {
                    continue;
                };
                let cells = rooms.entry(room).or_default();
                if plan.is_free(ix, iy) {
                    cells.push((ix, iy));
                }
            }
        }
        if rooms.is_empty() {
            return Err(format!("floor plan for {scene}_{layout} has no rooms"));
        }

        // One room gets the whole target batch.
        let room_ids: Vec<i32> = rooms.keys().copied().collect();
        let batch_room = room_ids[self.rng.index(room_ids.len())];
        let batch_cells = &rooms[&batch_room];
        if batch_cells.is_empty() {
            warn!("[Porter scene] Room {batch_room} has no free cells; placing no target objects");
        }

        let count = self
            .rng
            .range_inclusive(self.config.min_targets, self.config.max_targets);
        let mut placed: Vec<(u64, TargetModelDef)> = Vec::new();
        for _ in 0..count {
            let Some(&(ix, iy)) = self.rng.pick(batch_cells) else {
                break;
            };
            let Some(model) = self.rng.pick(&self.catalog.target_objects) else {
                break;
            };
            let model = model.clone();
            let (x, z) = plan.cell_to_world(ix, iy);
            let yaw = self.rng.degrees(self.config.yaw_limit_deg);
            let request = ObjectInitRequest {
                model: model.name.clone(),
                position: Vec3::new(x, 0.0, z),
                rotation: Vec3::new(0.0, yaw, self.config.target_roll_deg),
                scale: Vec3::splat(model.scale),
                profile: self.config.target_profile(),
            };
            let id = host.create_object(&request);
            self.target_objects.push(id);
            placed.push((id, model));
        }

        // Add containers throughout the scene.
        for cells in rooms.values() {
            // Maybe leave this room without a container.
            if self.rng.float() < self.config.container_skip_chance {
                continue;
            }
            let Some(&(ix, iy)) = self.rng.pick(cells) else {
                continue;
            };
            let Some(model) = self.rng.pick(&self.catalog.containers) else {
                continue;
            };
            let model = model.clone();
            let (x, z) = plan.cell_to_world(ix, iy);
            let yaw = self.rng.degrees(self.config.yaw_limit_deg);
            let request = ObjectInitRequest {
                model,
                position: Vec3::new(x, 0.0, z),
                rotation: Vec3::new(0.0, yaw, 0.0),
                scale: self.config.container_scale,
                profile: self.config.container_profile(),
            };
            let id = host.create_object(&request);
            self.containers.push(id);
        }

        // Give every target object a random visual material, independent of
        // its model.
        for (id, model) in &placed {
            let Some(material) = self.rng.pick(&self.catalog.visual_materials) else {
                break;
            };
            host.set_visual_material(*id, material, &model.parts);
        }

        info!(
            "[Porter scene] Populated {scene}_{layout}: {} target objects, {} containers across {} rooms",
            self.target_objects.len(),
            self.containers.len(),
            rooms.len()
        );
        Ok(())
    }

    /// Place one target object at an explicit pose. Scripted scenes use this
    /// instead of [`populate`](Self::populate).
    pub fn add_target_object(
        &mut self,
        host: &mut dyn SimHost,
        model: &str,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<u64, String> {
        let def = self
            .catalog
            .target(model)
            .ok_or_else(|| format!("unknown target object model '{model}'"))?
            .clone();
        let request = ObjectInitRequest {
            model: def.name.clone(),
            position,
            rotation,
            scale: Vec3::splat(def.scale),
            profile: self.config.target_profile(),
        };
        let id = host.create_object(&request);
        self.target_objects.push(id);
        if let Some(material) = self.rng.pick(&self.catalog.visual_materials) {
            host.set_visual_material(id, material, &def.parts);
        }
        Ok(id)
    }

    /// Place one container at an explicit pose.
    pub fn add_container(
        &mut self,
        host: &mut dyn SimHost,
        model: &str,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<u64, String> {
        if !self.catalog.has_container(model) {
            return Err(format!("unknown container model '{model}'"));
        }
        let request = ObjectInitRequest {
            model: model.to_string(),
            position,
            rotation,
            scale: self.config.container_scale,
            profile: self.config.container_profile(),
        };
        let id = host.create_object(&request);
        self.containers.push(id);
        Ok(id)
    }

    /// Ids of every target object in the scene, in creation order.
    pub fn target_objects(&self) -> &[u64] {
        &self.target_objects
    }

    /// Ids of every container in the scene, in creation order.
    pub fn containers(&self) -> &[u64] {
        &self.containers
    }

    pub fn is_target_object(&self, id: u64) -> bool {
        self.target_objects.contains(&id)
    }

    pub fn is_container(&self, id: u64) -> bool {
        self.containers.contains(&id)
    }
}
