use std::collections::HashMap;

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::held::{HeldObject, HeldRegistry};
use crate::host::SimHost;
use crate::population::SceneEngine;
use crate::types::{ActionStatus, Arm, EntityKind};

/// Tunables for the arm action sequences.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Torso height used while aligning a held container with the floor.
    #[serde(default = "default_raised_torso_height")]
    pub raised_torso_height: f32,
    /// Clearance above a container when releasing a target object into it.
    #[serde(default = "default_put_in_clearance")]
    pub put_in_clearance: f32,
}

fn default_raised_torso_height() -> f32 {
    1.2
}

fn default_put_in_clearance() -> f32 {
    0.4
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            raised_torso_height: default_raised_torso_height(),
            put_in_clearance: default_put_in_clearance(),
        }
    }
}

/// Arm Action Controller: sequences grasp, lift, reorient, and release
/// primitives into pick/reset/drop/put/pour actions, one action at a time.
///
/// Tracks what each arm holds and caches the joint-angle solution for
/// holding a container level with the floor, per arm, so repeated container
/// resets replay instantly. The cache is invalidated whenever that arm
/// releases anything.
#[derive(Default)]
pub struct ArmController {
    config: ControllerConfig,
    held: HeldRegistry,
    container_arm_angles: HashMap<Arm, Vec<f32>>,
    contents: HashMap<u64, Vec<u64>>,
}

impl ArmController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Grasp an object and lift it up: `grasp` followed by `reset_arm`.
    ///
    /// Picking up an object the arm already holds is a no-op success. The
    /// held record commits only when the whole sequence succeeds.
    pub fn pick_up(
        &mut self,
        host: &mut dyn SimHost,
        scene: &SceneEngine,
        target: u64,
        arm: Arm,
    ) -> ActionStatus {
        if self.held.is_holding(target, arm) {
            debug!("[Porter arms] Already holding {target} in {arm:?}");
            return ActionStatus::Success;
        }

        let status = host.grasp(target, arm);
        if !status.is_success() {
            host.finalize_action();
            return status;
        }

        let kind = if scene.is_container(target) {
            EntityKind::Container
        } else {
            EntityKind::TargetObject
        };
        self.held.set(arm, HeldObject { id: target, kind });

        let status = self.reset_arm(host, scene, arm, true);
        if !status.is_success() {
            // The sequence did not complete; the grasp does not commit.
            self.held.clear(arm);
        }
        status
    }

    /// Reset an arm to its neutral position.
    ///
    /// If the arm is holding a container, additionally align the container's
    /// bottom face level with the floor, with the torso raised to make room
    /// for the maneuver, and cache the resulting joint angles. The next
    /// container reset on that arm replays the cached solution instead of
    /// recomputing it.
    pub fn reset_arm(
        &mut self,
        host: &mut dyn SimHost,
        scene: &SceneEngine,
        arm: Arm,
        reset_torso: bool,
    ) -> ActionStatus {
        // Use cached angles to reset an arm holding a container.
        if let Some(angles) = self.container_arm_angles.get(&arm) {
            host.request_joint_angles(arm, angles);
            let status = host.execute_pending_motion();
            host.finalize_action();
            return status;
        }

        host.request_arm_reset(arm, reset_torso);
        let status = host.execute_pending_motion();
        host.finalize_action();

        let Some(held) = self.held.held(arm) else {
            return status;
        };
        if !scene.is_container(held.id) {
            return status;
        }

        // Orient the container to be level with the floor.
        let magnet_down = host.magnet_orientation(arm) * Vec3::Y;
        host.request_orientation_alignment(
            arm,
            magnet_down,
            held.id,
            self.config.raised_torso_height,
        );
        let status = host.execute_pending_motion();
        host.finalize_action();
        if status.is_success() {
            // Cache the arm angles so the next container reset on this arm
            // can replay this position immediately.
            let angles: Vec<f32> = host
                .compute_joint_angles(arm)
                .iter()
                .map(|a| a.to_degrees())
                .collect();
            self.container_arm_angles.insert(arm, angles);
        }
        status
    }

    /// Let go of a held object.
    pub fn drop(&mut self, host: &mut dyn SimHost, target: u64, arm: Arm) -> ActionStatus {
        let status = host.release(target, arm);
        if status.is_success() {
            // Cached angles are only valid while the container hold lasts.
            self.container_arm_angles.remove(&arm);
            if self.held.is_holding(target, arm) {
                self.held.clear(arm);
            }
        }
        host.finalize_action();
        status
    }

    /// Release everything from both magnets.
    pub fn drop_all(&mut self, host: &mut dyn SimHost) -> ActionStatus {
        self.container_arm_angles.clear();
        let status = host.release_all();
        if status.is_success() {
            self.held.clear_all();
        }
        host.finalize_action();
        status
    }

    /// Put the held target object into the held container: reach above the
    /// container, release the target into it, and fold the emptied arm back.
    ///
    /// Requires a container on one arm and a target object on the other.
    pub fn put_in(&mut self, host: &mut dyn SimHost, scene: &SceneEngine) -> ActionStatus {
        let Some((container_arm, container)) = self.held.arm_holding_kind(EntityKind::Container)
        else {
            return ActionStatus::NotHolding;
        };
        let target_arm = container_arm.opposite();
        let Some(target) = self
            .held
            .held(target_arm)
            .filter(|h| h.kind == EntityKind::TargetObject)
        else {
            return ActionStatus::NotHolding;
        };

        let above =
            host.object_position(container.id) + Vec3::new(0.0, self.config.put_in_clearance, 0.0);
        host.request_reach_for(target_arm, above);
        let status = host.execute_pending_motion();
        if !status.is_success() {
            host.finalize_action();
            return status;
        }

        let status = host.release(target.id, target_arm);
        if !status.is_success() {
            host.finalize_action();
            return status;
        }
        self.held.clear(target_arm);
        self.container_arm_angles.remove(&target_arm);
        self.contents.entry(container.id).or_default().push(target.id);
        host.finalize_action();

        // Fold the emptied arm back out of the way.
        self.reset_arm(host, scene, target_arm, true)
    }

    /// Tip the held container over, spilling everything inside, then return
    /// it to the level hold.
    pub fn pour_out(&mut self, host: &mut dyn SimHost, scene: &SceneEngine) -> ActionStatus {
        let Some((arm, container)) = self.held.arm_holding_kind(EntityKind::Container) else {
            return ActionStatus::NotHolding;
        };

        let magnet_up = host.magnet_orientation(arm) * Vec3::Y;
        host.request_orientation_alignment(
            arm,
            -magnet_up,
            container.id,
            self.config.raised_torso_height,
        );
        let status = host.execute_pending_motion();
        host.finalize_action();
        if !status.is_success() {
            return status;
        }
        self.contents.remove(&container.id);

        // Level the container again; with cached angles this is a replay.
        self.reset_arm(host, scene, arm, true)
    }

    /// Forget all held-object, cached-angle, and contents state. Call when a
    /// scene is re-initialized.
    pub fn reset(&mut self) {
        self.held.clear_all();
        self.container_arm_angles.clear();
        self.contents.clear();
    }

    pub fn held(&self, arm: Arm) -> Option<HeldObject> {
        self.held.held(arm)
    }

    pub fn is_holding(&self, id: u64, arm: Arm) -> bool {
        self.held.is_holding(id, arm)
    }

    /// Arms with a cached container-hold solution.
    pub fn cached_arms(&self) -> Vec<Arm> {
        Arm::BOTH
            .iter()
            .copied()
            .filter(|arm| self.container_arm_angles.contains_key(arm))
            .collect()
    }

    /// Target objects recorded as put into a container, in insertion order.
    pub fn contents_of(&self, container: u64) -> &[u64] {
        self.contents
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
