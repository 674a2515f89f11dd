//! Transport-task controller for a simulated mobile manipulator: populate a
//! scene with target objects and containers, pick targets up, put them into
//! a held container, and pour them out elsewhere. All motion, physics, and
//! rendering stay on the host side of the [`SimHost`] trait.

pub mod catalog;
pub mod controller;
pub mod held;
pub mod host;
pub mod occupancy;
pub mod population;
pub mod types;

pub use catalog::{ModelCatalog, TargetModelDef};
pub use controller::{ArmController, ControllerConfig};
pub use held::{HeldObject, HeldRegistry};
pub use host::{ObjectInitRequest, PhysicalProfile, SimHost, SurfaceMaterial};
pub use occupancy::{FloorPlan, PlanLibrary, SceneBounds, ScenePlans};
pub use population::{PopulationConfig, SceneEngine};
pub use types::{ActionStatus, Arm, EntityKind};
