use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Occupancy grid value marking a free cell.
const FREE: u8 = 0;

/// World-space metadata for a scene's occupancy grid.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SceneBounds {
    pub x_min: f32,
    pub z_min: f32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}

fn default_cell_size() -> f32 {
    0.49
}

impl SceneBounds {
    /// World (x, z) of a grid cell's center.
    pub fn cell_to_world(&self, ix: i32, iy: i32) -> (f32, f32) {
        (
            self.x_min + ix as f32 * self.cell_size,
            self.z_min + iy as f32 * self.cell_size,
        )
    }
}

/// Discretized floor plan of one scene layout: a free/occupied mask and a
/// parallel grid mapping each cell to the enclosing room. Owned by the host
/// side and read-only here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorPlan {
    pub width: usize,
    pub height: usize,
    /// Row-major occupancy mask; 0 = free.
    pub occupancy: Vec<u8>,
    /// Row-major room ids, same shape as `occupancy`.
    pub rooms: Vec<i32>,
    pub bounds: SceneBounds,
}

impl FloorPlan {
    pub fn from_json(text: &str) -> Result<Self, String> {
        let plan: FloorPlan =
            serde_json::from_str(text).map_err(|e| format!("invalid floor plan: {e}"))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Check that both grids have the declared shape.
    pub fn validate(&self) -> Result<(), String> {
        let cells = self.width * self.height;
        if self.occupancy.len() != cells {
            return Err(format!(
                "occupancy grid has {} cells, expected {}x{} = {}",
                self.occupancy.len(),
                self.width,
                self.height,
                cells
            ));
        }
        if self.rooms.len() != cells {
            return Err(format!(
                "room grid has {} cells, expected {}x{} = {}",
                self.rooms.len(),
                self.width,
                self.height,
                cells
            ));
        }
        if self.bounds.cell_size <= 0.0 {
            return Err("cell_size must be positive".to_string());
        }
        Ok(())
    }

    pub fn is_free(&self, ix: i32, iy: i32) -> bool {
        match self.index(ix, iy) {
            Some(i) => self.occupancy[i] == FREE,
            None => false,
        }
    }

    pub fn room_at(&self, ix: i32, iy: i32) -> Option<i32> {
        self.index(ix, iy).map(|i| self.rooms[i])
    }

    pub fn cell_to_world(&self, ix: i32, iy: i32) -> (f32, f32) {
        self.bounds.cell_to_world(ix, iy)
    }

    fn index(&self, ix: i32, iy: i32) -> Option<usize> {
        if ix < 0 || iy < 0 || ix >= self.width as i32 || iy >= self.height as i32 {
            return None;
        }
        Some(iy as usize * self.width + ix as usize)
    }
}

/// External collaborator resolving a scene + layout identifier pair to its
/// floor plan.
pub trait ScenePlans {
    fn floor_plan(&self, scene: &str, layout: u32) -> Result<FloorPlan, String>;
}

/// In-memory floor-plan collection keyed by scene and layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanLibrary {
    plans: HashMap<String, FloorPlan>,
}

impl PlanLibrary {
    pub fn from_json(text: &str) -> Result<Self, String> {
        let library: PlanLibrary =
            serde_json::from_str(text).map_err(|e| format!("invalid plan library: {e}"))?;
        for (key, plan) in &library.plans {
            plan.validate().map_err(|e| format!("plan '{key}': {e}"))?;
        }
        Ok(library)
    }

    pub fn insert(&mut self, scene: &str, layout: u32, plan: FloorPlan) {
        self.plans.insert(Self::key(scene, layout), plan);
    }

    fn key(scene: &str, layout: u32) -> String {
        format!("{scene}_{layout}")
    }
}

impl ScenePlans for PlanLibrary {
    fn floor_plan(&self, scene: &str, layout: u32) -> Result<FloorPlan, String> {
        self.plans
            .get(&Self::key(scene, layout))
            .cloned()
            .ok_or_else(|| format!("no floor plan for scene '{scene}' layout {layout}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_plan() -> FloorPlan {
        FloorPlan {
            width: 4,
            height: 3,
            occupancy: vec![
                1, 1, 1, 1, //
                1, 0, 0, 1, //
                1, 1, 1, 1, //
            ],
            rooms: vec![0; 12],
            bounds: SceneBounds {
                x_min: -1.0,
                z_min: -0.5,
                cell_size: 0.5,
            },
        }
    }

    #[test]
    fn converts_cells_to_world_positions() {
        let plan = small_plan();
        assert_eq!(plan.cell_to_world(0, 0), (-1.0, -0.5));
        assert_eq!(plan.cell_to_world(3, 2), (0.5, 0.5));
    }

    #[test]
    fn out_of_bounds_cells_are_not_free() {
        let plan = small_plan();
        assert!(plan.is_free(1, 1));
        assert!(!plan.is_free(0, 0));
        assert!(!plan.is_free(-1, 1));
        assert!(!plan.is_free(4, 1));
        assert_eq!(plan.room_at(2, 1), Some(0));
        assert_eq!(plan.room_at(9, 9), None);
    }

    #[test]
    fn rejects_grids_with_the_wrong_shape() {
        let mut plan = small_plan();
        plan.occupancy.pop();
        assert!(plan.validate().is_err());

        let mut plan = small_plan();
        plan.rooms = vec![0; 3];
        assert!(plan.validate().is_err());

        let mut plan = small_plan();
        plan.bounds.cell_size = 0.0;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn library_resolves_by_scene_and_layout() {
        let mut library = PlanLibrary::default();
        library.insert("flat", 2, small_plan());
        assert!(library.floor_plan("flat", 2).is_ok());
        assert!(library.floor_plan("flat", 0).is_err());
        assert!(library.floor_plan("loft", 2).is_err());
    }

    #[test]
    fn plans_round_trip_through_json() {
        let text = serde_json::to_string(&small_plan()).unwrap();
        let plan = FloorPlan::from_json(&text).unwrap();
        assert_eq!(plan.width, 4);
        assert!(plan.is_free(2, 1));
    }

    #[test]
    fn library_loads_and_validates_from_json() {
        let mut library = PlanLibrary::default();
        library.insert("flat", 0, small_plan());
        let text = serde_json::to_string(&library).unwrap();
        assert!(PlanLibrary::from_json(&text)
            .unwrap()
            .floor_plan("flat", 0)
            .is_ok());

        let mut broken = small_plan();
        broken.occupancy.pop();
        let mut library = PlanLibrary::default();
        library.insert("flat", 0, broken);
        let text = serde_json::to_string(&library).unwrap();
        assert!(PlanLibrary::from_json(&text).unwrap_err().contains("flat_0"));
    }
}
