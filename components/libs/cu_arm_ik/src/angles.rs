//! Servo angle vectors.

use core::fmt;
use core::ops::Index;
use serde::{Deserialize, Serialize};

/// Number of servos on the arm.
pub const NUM_JOINTS: usize = 6;

/// Upper bound of a hobby servo's travel, in degrees.
pub const MAX_SERVO_DEG: u8 = 180;

/// Servo slots, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Base,
    Shoulder,
    Elbow,
    WristPitch,
    WristRoll,
    Gripper,
}

impl Joint {
    pub const ALL: [Joint; NUM_JOINTS] = [
        Joint::Base,
        Joint::Shoulder,
        Joint::Elbow,
        Joint::WristPitch,
        Joint::WristRoll,
        Joint::Gripper,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Joint::Base => "base",
            Joint::Shoulder => "shoulder",
            Joint::Elbow => "elbow",
            Joint::WristPitch => "wrist_pitch",
            Joint::WristRoll => "wrist_roll",
            Joint::Gripper => "gripper",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Six servo angles in whole degrees, each within `0..=180`.
///
/// Every constructor saturates out-of-range values instead of rejecting them,
/// so a `JointAngles` can always be sent to the servos as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; NUM_JOINTS]", into = "[u8; NUM_JOINTS]")]
pub struct JointAngles([u8; NUM_JOINTS]);

impl JointAngles {
    /// Every joint centered, gripper open.
    pub const SAFE_HOME: JointAngles = JointAngles([90, 90, 90, 90, 90, 0]);

    /// Builds a vector from integer degrees, clamping each into `0..=180`.
    pub fn new(degrees: [i64; NUM_JOINTS]) -> Self {
        Self(degrees.map(|d| d.clamp(0, MAX_SERVO_DEG as i64) as u8))
    }

    /// Builds a vector from fractional degrees.
    ///
    /// Fractions are truncated toward zero before clamping, so `179.9`
    /// becomes `179` and `-0.5` becomes `0`. Non-finite values saturate
    /// (`NaN` lands on `0`); callers that care check finiteness first.
    pub fn from_degrees(degrees: [f64; NUM_JOINTS]) -> Self {
        Self(degrees.map(|d| d.trunc().clamp(0.0, MAX_SERVO_DEG as f64) as u8))
    }

    pub fn get(&self, joint: Joint) -> u8 {
        self.0[joint.index()]
    }

    pub fn as_array(&self) -> &[u8; NUM_JOINTS] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, u8)> + '_ {
        Joint::ALL.iter().map(|&j| (j, self.get(j)))
    }
}

impl Default for JointAngles {
    fn default() -> Self {
        Self::SAFE_HOME
    }
}

impl From<[i64; NUM_JOINTS]> for JointAngles {
    fn from(degrees: [i64; NUM_JOINTS]) -> Self {
        Self::new(degrees)
    }
}

impl From<JointAngles> for [u8; NUM_JOINTS] {
    fn from(angles: JointAngles) -> Self {
        angles.0
    }
}

impl Index<Joint> for JointAngles {
    type Output = u8;

    fn index(&self, joint: Joint) -> &u8 {
        &self.0[joint.index()]
    }
}

impl fmt::Display for JointAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}, {e}, {g}]")
    }
}
