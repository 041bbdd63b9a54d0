//! Arm link lengths and workspace coordinates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected link length.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("link `{link}` must be a positive finite length in mm, got {value}")]
    InvalidLinkLength { link: &'static str, value: f64 },
}

/// Link lengths of the arm, in millimeters.
///
/// Fixed once built: there are no setters, a different arm is a different
/// `ArmGeometry`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry", into = "RawGeometry")]
pub struct ArmGeometry {
    shoulder_to_elbow: f64,
    elbow_to_wrist: f64,
    wrist_to_tip: f64,
}

impl ArmGeometry {
    /// Links of the stock arm: 105 / 105 / 100 mm.
    pub const DEFAULT_LINKS_MM: [f64; 3] = [105.0, 105.0, 100.0];

    pub fn new(
        shoulder_to_elbow: f64,
        elbow_to_wrist: f64,
        wrist_to_tip: f64,
    ) -> Result<Self, GeometryError> {
        check_link("shoulder_to_elbow", shoulder_to_elbow)?;
        check_link("elbow_to_wrist", elbow_to_wrist)?;
        check_link("wrist_to_tip", wrist_to_tip)?;
        Ok(Self {
            shoulder_to_elbow,
            elbow_to_wrist,
            wrist_to_tip,
        })
    }

    /// Shoulder to elbow (L1).
    pub fn shoulder_to_elbow(&self) -> f64 {
        self.shoulder_to_elbow
    }

    /// Elbow to wrist (L2).
    pub fn elbow_to_wrist(&self) -> f64 {
        self.elbow_to_wrist
    }

    /// Wrist to gripper tip (L3).
    pub fn wrist_to_tip(&self) -> f64 {
        self.wrist_to_tip
    }

    /// Furthest distance from the shoulder the wrist joint can be placed at.
    pub fn reach(&self) -> f64 {
        self.shoulder_to_elbow + self.elbow_to_wrist
    }
}

impl Default for ArmGeometry {
    fn default() -> Self {
        let [l1, l2, l3] = Self::DEFAULT_LINKS_MM;
        Self {
            shoulder_to_elbow: l1,
            elbow_to_wrist: l2,
            wrist_to_tip: l3,
        }
    }
}

fn check_link(link: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidLinkLength { link, value })
    }
}

// Serialized form, validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawGeometry {
    shoulder_to_elbow_mm: f64,
    elbow_to_wrist_mm: f64,
    wrist_to_tip_mm: f64,
}

impl TryFrom<RawGeometry> for ArmGeometry {
    type Error = GeometryError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Self::new(
            raw.shoulder_to_elbow_mm,
            raw.elbow_to_wrist_mm,
            raw.wrist_to_tip_mm,
        )
    }
}

impl From<ArmGeometry> for RawGeometry {
    fn from(g: ArmGeometry) -> Self {
        Self {
            shoulder_to_elbow_mm: g.shoulder_to_elbow,
            elbow_to_wrist_mm: g.elbow_to_wrist,
            wrist_to_tip_mm: g.wrist_to_tip,
        }
    }
}

/// A point in the arm's workspace, in millimeters.
///
/// Origin at the base servo axis, `z = 0` at table height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspacePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorkspacePoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the base axis, projected on the table.
    pub fn ground_radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}
