use serde::{Deserialize, Serialize};

use crate::types::{Arm, EntityKind};

/// A grasped entity and what kind of thing it is.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HeldObject {
    pub id: u64,
    pub kind: EntityKind,
}

/// Per-arm record of what is currently grasped. At most one entity per arm;
/// a slot is written only when a full grasp sequence succeeds and cleared on
/// release.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct HeldRegistry {
    left: Option<HeldObject>,
    right: Option<HeldObject>,
}

impl HeldRegistry {
    pub fn held(&self, arm: Arm) -> Option<HeldObject> {
        match arm {
            Arm::Left => self.left,
            Arm::Right => self.right,
        }
    }

    pub fn is_holding(&self, id: u64, arm: Arm) -> bool {
        self.held(arm).map(|h| h.id == id).unwrap_or(false)
    }

    pub fn set(&mut self, arm: Arm, object: HeldObject) {
        *self.slot(arm) = Some(object);
    }

    pub fn clear(&mut self, arm: Arm) {
        *self.slot(arm) = None;
    }

    pub fn clear_all(&mut self) {
        self.left = None;
        self.right = None;
    }

    /// The arm holding an entity of `kind`, if any. Left is checked first.
    pub fn arm_holding_kind(&self, kind: EntityKind) -> Option<(Arm, HeldObject)> {
        Arm::BOTH
            .iter()
            .find_map(|&arm| self.held(arm).filter(|h| h.kind == kind).map(|h| (arm, h)))
    }

    fn slot(&mut self, arm: Arm) -> &mut Option<HeldObject> {
        match arm {
            Arm::Left => &mut self.left,
            Arm::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_one_object_per_arm() {
        let mut held = HeldRegistry::default();
        assert!(held.held(Arm::Left).is_none());

        held.set(
            Arm::Left,
            HeldObject {
                id: 4,
                kind: EntityKind::TargetObject,
            },
        );
        assert!(held.is_holding(4, Arm::Left));
        assert!(!held.is_holding(4, Arm::Right));

        held.set(
            Arm::Left,
            HeldObject {
                id: 9,
                kind: EntityKind::Container,
            },
        );
        assert_eq!(held.held(Arm::Left).map(|h| h.id), Some(9));

        held.clear(Arm::Left);
        assert!(held.held(Arm::Left).is_none());
    }

    #[test]
    fn finds_the_arm_holding_a_kind() {
        let mut held = HeldRegistry::default();
        assert!(held.arm_holding_kind(EntityKind::Container).is_none());

        held.set(
            Arm::Right,
            HeldObject {
                id: 2,
                kind: EntityKind::Container,
            },
        );
        held.set(
            Arm::Left,
            HeldObject {
                id: 7,
                kind: EntityKind::TargetObject,
            },
        );
        let (arm, object) = held.arm_holding_kind(EntityKind::Container).unwrap();
        assert_eq!(arm, Arm::Right);
        assert_eq!(object.id, 2);

        held.clear_all();
        assert!(held.arm_holding_kind(EntityKind::TargetObject).is_none());
    }
}
