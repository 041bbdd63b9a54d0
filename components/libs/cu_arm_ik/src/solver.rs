//! Geometric IK solver.
//!
//! The solve is split in two:
//!
//! 1. Base yaw from `atan2(y, x)`, so the arm faces the target.
//! 2. A 2-link planar solve (law of cosines) in the vertical plane through the
//!    target, aimed at the wrist joint. The wrist sits one `wrist_to_tip`
//!    above the target so the last link can hang down to it.
//!
//! The wrist pitch then comes from a leveling rule of thumb and the roll and
//! gripper are fixed. Gripping is driven separately, not by this solver.
//!
//! Outcomes are explicit: a target out of reach is reported as
//! [`SolveOutcome::Unreachable`]; a numerical fault near the edge of the
//! workspace degrades to [`JointAngles::SAFE_HOME`] as
//! [`SolveOutcome::SafeFallback`] and is logged.

use crate::angles::{Joint, JointAngles};
use crate::config::{ConfigError, load_json, save_json};
use crate::geometry::{ArmGeometry, WorkspacePoint};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Solver tuning. Everything except the geometry is a servo mounting offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub geometry: ArmGeometry,
    /// Servo reading when the base faces +x.
    pub base_offset_deg: f64,
    /// Leveling constant: the wrist pitch is `reference - (shoulder + elbow)`.
    ///
    /// Empirically tuned on the stock arm, not a kinematic identity. Adjust
    /// it if the gripper does not point down on a different build.
    pub wrist_level_reference_deg: f64,
    /// Servo reading for a wrist pitch of zero.
    pub wrist_pitch_offset_deg: f64,
    pub wrist_roll_deg: f64,
    pub gripper_deg: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            geometry: ArmGeometry::default(),
            base_offset_deg: 90.0,
            wrist_level_reference_deg: 180.0,
            wrist_pitch_offset_deg: 90.0,
            wrist_roll_deg: 90.0,
            gripper_deg: 0.0,
        }
    }
}

impl SolverConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_json(self, path)
    }
}

/// Numerical problem hit while solving.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NumericFault {
    #[error("inverse cosine argument {ratio} out of [-1, 1] at the {joint}")]
    AcosDomain { joint: Joint, ratio: f64 },
    #[error("wrist target coincides with the shoulder")]
    DegenerateTarget,
    #[error("non-finite {joint} angle")]
    NonFinite { joint: Joint },
}

/// Result of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveOutcome {
    /// Target reached.
    Solved(JointAngles),
    /// The wrist would have to be further than the arm's reach. The caller
    /// decides what to do (skip the object, move it, ...).
    Unreachable { distance_mm: f64, reach_mm: f64 },
    /// The solve hit a numerical fault; `angles` is always
    /// [`JointAngles::SAFE_HOME`].
    SafeFallback {
        angles: JointAngles,
        reason: NumericFault,
    },
}

impl SolveOutcome {
    /// Angles to send to the servos, if any.
    pub fn angles(&self) -> Option<JointAngles> {
        match self {
            SolveOutcome::Solved(angles) | SolveOutcome::SafeFallback { angles, .. } => {
                Some(*angles)
            }
            SolveOutcome::Unreachable { .. } => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, SolveOutcome::Unreachable { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SolveOutcome::SafeFallback { .. })
    }
}

/// Stateless IK solver for one arm.
#[derive(Debug, Clone, Default)]
pub struct KinematicsSolver {
    config: SolverConfig,
}

enum Planar {
    Reached(JointAngles),
    OutOfReach { distance_mm: f64 },
}

impl KinematicsSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn with_geometry(geometry: ArmGeometry) -> Self {
        Self::new(SolverConfig {
            geometry,
            ..SolverConfig::default()
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn geometry(&self) -> &ArmGeometry {
        &self.config.geometry
    }

    /// Solves for the gripper tip at `(x, y, z)` mm.
    pub fn solve(&self, x: f64, y: f64, z: f64) -> SolveOutcome {
        self.solve_point(WorkspacePoint::new(x, y, z))
    }

    pub fn solve_point(&self, target: WorkspacePoint) -> SolveOutcome {
        let reach_mm = self.config.geometry.reach();
        match self.try_solve(target) {
            Ok(Planar::Reached(angles)) => {
                debug!("IK ({}, {}, {}) -> {angles}", target.x, target.y, target.z);
                SolveOutcome::Solved(angles)
            }
            Ok(Planar::OutOfReach { distance_mm }) => {
                warn!(
                    "Target ({}, {}, {}) out of reach: {distance_mm:.1} mm > {reach_mm:.1} mm",
                    target.x, target.y, target.z
                );
                SolveOutcome::Unreachable {
                    distance_mm,
                    reach_mm,
                }
            }
            Err(reason) => {
                error!(
                    "IK for ({}, {}, {}) failed, falling back to safe home: {reason}",
                    target.x, target.y, target.z
                );
                SolveOutcome::SafeFallback {
                    angles: JointAngles::SAFE_HOME,
                    reason,
                }
            }
        }
    }

    fn try_solve(&self, target: WorkspacePoint) -> Result<Planar, NumericFault> {
        let g = &self.config.geometry;
        let l1 = g.shoulder_to_elbow();
        let l2 = g.elbow_to_wrist();

        let ground_radius = target.ground_radius();
        // atan2(0, 0) is pinned to 0 so a target on the base axis (either sign
        // of zero) always yields the neutral base angle.
        let yaw = if ground_radius == 0.0 {
            0.0
        } else {
            target.y.atan2(target.x)
        };

        let wrist_r = ground_radius;
        let wrist_z = target.z + g.wrist_to_tip();
        let d = (wrist_r * wrist_r + wrist_z * wrist_z).sqrt();

        // Inclusive: a fully stretched arm still counts as reachable.
        if d > g.reach() {
            return Ok(Planar::OutOfReach { distance_mm: d });
        }
        if d == 0.0 {
            return Err(NumericFault::DegenerateTarget);
        }

        let alpha = acos_checked(Joint::Shoulder, (l1 * l1 + d * d - l2 * l2) / (2.0 * l1 * d))?;
        let beta = wrist_z.atan2(wrist_r);
        let shoulder = (beta + alpha).to_degrees();

        let gamma = acos_checked(Joint::Elbow, (l1 * l1 + l2 * l2 - d * d) / (2.0 * l1 * l2))?;
        let elbow = 180.0 - gamma.to_degrees();

        let cfg = &self.config;
        let pitch = cfg.wrist_level_reference_deg - (shoulder + elbow);

        let degrees = [
            cfg.base_offset_deg + yaw.to_degrees(),
            shoulder,
            elbow,
            pitch + cfg.wrist_pitch_offset_deg,
            cfg.wrist_roll_deg,
            cfg.gripper_deg,
        ];
        if let Some(joint) = Joint::ALL.into_iter().find(|j| !degrees[j.index()].is_finite()) {
            return Err(NumericFault::NonFinite { joint });
        }
        Ok(Planar::Reached(JointAngles::from_degrees(degrees)))
    }
}

fn acos_checked(joint: Joint, ratio: f64) -> Result<f64, NumericFault> {
    if (-1.0..=1.0).contains(&ratio) {
        Ok(ratio.acos())
    } else {
        Err(NumericFault::AcosDomain { joint, ratio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(outcome: SolveOutcome) -> [u8; 6] {
        match outcome {
            SolveOutcome::Solved(a) => *a.as_array(),
            other => panic!("expected a solve, got {other:?}"),
        }
    }

    #[test]
    fn origin_faces_forward() {
        let solver = KinematicsSolver::default();
        assert_eq!(angles(solver.solve(0.0, 0.0, 0.0)), [90, 151, 123, 0, 90, 0]);
    }

    #[test]
    fn negative_zero_on_the_base_axis_is_still_neutral() {
        let solver = KinematicsSolver::default();
        let a = angles(solver.solve(-0.0, 0.0, 0.0));
        assert_eq!(a[0], 90);
    }

    #[test]
    fn known_poses() {
        let solver = KinematicsSolver::default();
        assert_eq!(angles(solver.solve(100.0, 50.0, 0.0)), [116, 86, 88, 94, 90, 0]);
        assert_eq!(angles(solver.solve(-120.0, 80.0, -30.0)), [180, 66, 80, 123, 90, 0]);
    }

    #[test]
    fn full_stretch_is_reachable() {
        let solver = KinematicsSolver::default();
        // Wrist target at (210, 0): exactly L1 + L2 away.
        assert_eq!(angles(solver.solve(210.0, 0.0, -100.0)), [90, 0, 0, 180, 90, 0]);
    }

    #[test]
    fn one_mm_past_reach_is_unreachable() {
        let solver = KinematicsSolver::default();
        let outcome = solver.solve(211.0, 0.0, -100.0);
        assert_eq!(
            outcome,
            SolveOutcome::Unreachable {
                distance_mm: 211.0,
                reach_mm: 210.0
            }
        );
        assert_eq!(outcome.angles(), None);
    }

    #[test]
    fn infinite_target_is_unreachable() {
        let solver = KinematicsSolver::default();
        assert!(solver.solve(f64::INFINITY, 0.0, 0.0).is_unreachable());
    }

    #[test]
    fn wrist_on_the_shoulder_falls_back() {
        let solver = KinematicsSolver::default();
        let outcome = solver.solve(0.0, 0.0, -100.0);
        assert_eq!(
            outcome,
            SolveOutcome::SafeFallback {
                angles: JointAngles::SAFE_HOME,
                reason: NumericFault::DegenerateTarget,
            }
        );
        assert_eq!(outcome.angles(), Some(JointAngles::SAFE_HOME));
    }

    #[test]
    fn nan_target_falls_back() {
        let solver = KinematicsSolver::default();
        let outcome = solver.solve(f64::NAN, 10.0, 0.0);
        assert!(outcome.is_fallback());
        assert!(matches!(
            outcome,
            SolveOutcome::SafeFallback {
                reason: NumericFault::AcosDomain { .. },
                ..
            }
        ));
    }

    #[test]
    fn too_close_for_unequal_links_falls_back() {
        // With L1 = 150 and L2 = 50 the wrist cannot come closer than 100 mm.
        let geometry = ArmGeometry::new(150.0, 50.0, 100.0).unwrap();
        let solver = KinematicsSolver::with_geometry(geometry);
        let outcome = solver.solve(20.0, 0.0, -100.0);
        match outcome {
            SolveOutcome::SafeFallback { angles, reason } => {
                assert_eq!(angles, JointAngles::SAFE_HOME);
                assert!(matches!(reason, NumericFault::AcosDomain { joint: Joint::Shoulder, .. }));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn leveling_constant_is_tunable() {
        let tuned = KinematicsSolver::new(SolverConfig {
            wrist_level_reference_deg: 200.0,
            ..SolverConfig::default()
        });
        let stock = angles(KinematicsSolver::default().solve(100.0, 50.0, 0.0));
        let shifted = angles(tuned.solve(100.0, 50.0, 0.0));
        assert_eq!(shifted[3], stock[3] + 20);
        assert_eq!(shifted[..3], stock[..3]);
    }

    #[test]
    fn config_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solver.json");
        let config = SolverConfig {
            geometry: ArmGeometry::new(120.0, 110.0, 90.0).unwrap(),
            gripper_deg: 30.0,
            ..SolverConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(SolverConfig::load(&path).unwrap(), config);
    }
}
