//! Feetech STS/SCS bus servo driver for the sorting arm.
//!
//! Consumes the [`MotionStep`](cu_bin_sorter::MotionStep)s built by the
//! sorter and turns each one into a single sync-write packet of goal
//! positions, one step at a time.

pub mod arm;
pub mod calibration;
pub mod messages;

pub use arm::FeetechArm;
pub use calibration::{CalibrationData, CalibrationError, RangeTracker, ServoCalibration};
