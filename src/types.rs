use serde::{Deserialize, Serialize};

/// One of the agent's two manipulator limbs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    pub const BOTH: [Arm; 2] = [Arm::Left, Arm::Right];

    pub fn opposite(self) -> Arm {
        match self {
            Arm::Left => Arm::Right,
            Arm::Right => Arm::Left,
        }
    }
}

/// What kind of placeable entity an object id refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    TargetObject,
    Container,
}

/// Result of every arm action. Expected failures travel through this set;
/// no action raises a fault for a motion that merely did not work out.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// The action fully completed.
    Success,
    /// The target pose is unreachable from the agent's current position.
    CannotReach,
    /// The magnet reached the target but did not close on it.
    FailedToGrasp,
    /// An arm motion (reset or reorientation) could not complete.
    FailedToBend,
    /// The action requires a held object the arm does not have.
    NotHolding,
}

impl ActionStatus {
    pub fn is_success(self) -> bool {
        self == ActionStatus::Success
    }
}
