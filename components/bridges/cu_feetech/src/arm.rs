//! A 6-servo Feetech arm as a [`ServoDriver`].

use crate::calibration::CalibrationData;
use crate::messages::sync_write_goals;
use cu_arm_ik::JointAngles;
use cu_arm_ik::angles::NUM_JOINTS;
use cu_bin_sorter::{DriverError, MotionStep, ServoDriver};
use log::debug;
use std::io::Write;
use std::time::Duration;

/// Bus IDs of the SO-100 / SO-101 joints, base first.
pub const DEFAULT_SERVO_IDS: [u8; NUM_JOINTS] = [1, 2, 3, 4, 5, 6];

/// Time given to the servos to reach a goal before the next one is sent.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1500);

pub struct FeetechArm<W: Write> {
    port: W,
    ids: [u8; NUM_JOINTS],
    calibration: CalibrationData,
    settle: Duration,
}

impl<W: Write> FeetechArm<W> {
    pub fn new(port: W, calibration: CalibrationData) -> Self {
        Self {
            port,
            ids: DEFAULT_SERVO_IDS,
            calibration,
            settle: DEFAULT_SETTLE,
        }
    }

    pub fn with_ids(mut self, ids: [u8; NUM_JOINTS]) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn into_port(self) -> W {
        self.port
    }

    /// `(id, goal tick)` for every joint.
    pub fn goal_ticks(&self, angles: &JointAngles) -> Result<[(u8, u16); NUM_JOINTS], DriverError> {
        let mut goals = [(0u8, 0u16); NUM_JOINTS];
        for (slot, (&id, &deg)) in goals.iter_mut().zip(self.ids.iter().zip(angles.as_array())) {
            let cal = self
                .calibration
                .servo(id)
                .filter(|cal| cal.min < cal.max)
                .ok_or(DriverError::Calibration(id))?;
            *slot = (id, cal.ticks_for_servo_deg(deg));
        }
        Ok(goals)
    }
}

impl<W: Write> ServoDriver for FeetechArm<W> {
    /// Sends all six goals in one sync write, then waits for the arm to settle.
    fn execute(&mut self, step: &MotionStep) -> Result<(), DriverError> {
        let goals = self.goal_ticks(&step.angles)?;
        debug!("Goal ticks {:?} for {}", goals, step.angles);
        self.port.write_all(&sync_write_goals(&goals))?;
        self.port.flush()?;
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        Ok(())
    }
}
