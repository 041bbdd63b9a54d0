//! Handoff to the servo hardware.
//!
//! A [`ServoDriver`] executes one step at a time and only returns once the
//! move is done. [`run_sequence`] relies on that to keep the arm strictly in
//! order: step `i + 1` is never issued before step `i` has completed.

use crate::sequence::MotionStep;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("servo bus I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("no calibration for servo {0}")]
    Calibration(u8),
    #[error("driver rejected step: {0}")]
    Rejected(String),
}

/// Something that can move the arm to a pose.
pub trait ServoDriver {
    /// Moves to `step.angles`, blocking until the move completes.
    fn execute(&mut self, step: &MotionStep) -> Result<(), DriverError>;
}

/// Executes `steps` in order, stopping at the first failure.
///
/// Returns the number of steps completed.
pub fn run_sequence<D: ServoDriver + ?Sized>(
    driver: &mut D,
    steps: &[MotionStep],
) -> Result<usize, DriverError> {
    for (i, step) in steps.iter().enumerate() {
        debug!("Step {}/{}: {:?} {}", i + 1, steps.len(), step.action, step.angles);
        driver.execute(step)?;
    }
    info!("Motion sequence of {} steps complete", steps.len());
    Ok(steps.len())
}

/// Driver that only remembers what it was asked to do.
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub executed: Vec<MotionStep>,
    /// Fail on the step with this index.
    pub fail_at: Option<usize>,
}

impl ServoDriver for RecordingDriver {
    fn execute(&mut self, step: &MotionStep) -> Result<(), DriverError> {
        if self.fail_at == Some(self.executed.len()) {
            return Err(DriverError::Rejected(format!("step {}", self.executed.len())));
        }
        self.executed.push(step.clone());
        Ok(())
    }
}
