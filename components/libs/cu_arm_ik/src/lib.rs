//! Inverse kinematics for a 6-servo sorting arm.
//!
//! The arm is modelled as a base yaw joint followed by a planar 3-link chain
//! (shoulder, elbow, wrist). The solver targets the wrist joint and hangs the
//! last link straight down, which reduces the problem to a 2-link planar solve.
//!
//! ```
//! use cu_arm_ik::{KinematicsSolver, SolveOutcome};
//!
//! let solver = KinematicsSolver::default();
//! match solver.solve(100.0, 50.0, 0.0) {
//!     SolveOutcome::Solved(angles) => println!("goal: {angles}"),
//!     SolveOutcome::Unreachable { .. } => println!("re-plan"),
//!     SolveOutcome::SafeFallback { reason, .. } => println!("fallback: {reason}"),
//! }
//! ```
//!
//! All angles handed out of this crate are servo degrees, integers clamped to
//! `0..=180`, in the order base, shoulder, elbow, wrist pitch, wrist roll, gripper.

pub mod angles;
pub mod camera;
pub mod config;
pub mod geometry;
pub mod solver;

pub use angles::{Joint, JointAngles};
pub use camera::{CoordinateMapper, ImageFrame, pixel_to_workspace};
pub use config::ConfigError;
pub use geometry::{ArmGeometry, GeometryError, WorkspacePoint};
pub use solver::{KinematicsSolver, NumericFault, SolveOutcome, SolverConfig};
