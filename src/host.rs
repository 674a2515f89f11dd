use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::{ActionStatus, Arm};

/// Coarse surface classes the host's audio/physics layer understands.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMaterial {
    Ceramic,
    Cardboard,
    Wood,
    Metal,
    Glass,
}

/// Physical and acoustic parameters attached to a created object.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PhysicalProfile {
    pub mass: f32,
    pub material: SurfaceMaterial,
    pub bounciness: f32,
    pub resonance: f32,
    pub amp: f32,
}

/// Creation request for one placeable entity. Rotation is Euler degrees
/// (pitch, yaw, roll).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectInitRequest {
    pub model: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub profile: PhysicalProfile,
}

/// The motion/creation primitive collaborator. Every call is synchronous
/// request/response against the simulation host; `request_*` methods queue a
/// motion whose completion is observed through [`execute_pending_motion`].
///
/// [`execute_pending_motion`]: SimHost::execute_pending_motion
pub trait SimHost {
    /// Create an object and return its id. Ids are never reused within a
    /// scene.
    fn create_object(&mut self, request: &ObjectInitRequest) -> u64;

    /// Apply a visual material to the named geometry parts of an object.
    fn set_visual_material(&mut self, id: u64, material: &str, parts: &[String]);

    /// Try to close a magnet on an object.
    fn grasp(&mut self, id: u64, arm: Arm) -> ActionStatus;

    /// Queue the default arm-reset motion.
    fn request_arm_reset(&mut self, arm: Arm, reset_torso: bool);

    /// Queue a verbatim joint-angle replay for an arm.
    fn request_joint_angles(&mut self, arm: Arm, angles: &[f32]);

    /// Queue a motion aligning the held object with `orientation`, raising
    /// the torso to `torso_height` for clearance.
    fn request_orientation_alignment(
        &mut self,
        arm: Arm,
        orientation: Vec3,
        held_object: u64,
        torso_height: f32,
    );

    /// Queue an IK reach toward a world position.
    fn request_reach_for(&mut self, arm: Arm, position: Vec3);

    /// Run all queued motion to completion and report how it ended.
    fn execute_pending_motion(&mut self) -> ActionStatus;

    /// Settle the host at the end of an action.
    fn finalize_action(&mut self);

    fn magnet_orientation(&self, arm: Arm) -> Quat;

    fn object_position(&self, id: u64) -> Vec3;

    /// Current joint-angle configuration of an arm, in radians.
    fn compute_joint_angles(&self, arm: Arm) -> Vec<f32>;

    /// Open the magnet holding an object.
    fn release(&mut self, id: u64, arm: Arm) -> ActionStatus;

    /// Open both magnets.
    fn release_all(&mut self) -> ActionStatus;
}
