//! Calibration data and angle conversions for Feetech servos.
//!
//! Each servo has a recorded min and max raw position. The center is
//! `(min + max) / 2` and is where a hobby-servo reading of 90° lands, so the
//! 0–180° vectors coming out of the solver map onto ±90° around it.
//!
//! Run the `feetech-calibrate` binary to generate a `calibration.json`.

use cu_arm_ik::angles::NUM_JOINTS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use uom::si::angle::{degree, revolution};
use uom::si::f32::Angle;

/// Full-circle scale: 4096 ticks = 360° for STS3215.
const TICKS_PER_REV: f32 = 4096.0;

/// Highest tick the position registers accept.
const MAX_TICK: f32 = 4095.0;

/// Servo degrees at the calibration center.
const SERVO_CENTER_DEG: f32 = 90.0;

/// Calibration that cannot drive the arm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalibrationError {
    #[error("no calibration for servo {0}")]
    Missing(u8),
    #[error("servo {id} never moved (min {min} >= max {max})")]
    NoTravel { id: u8, min: u16, max: u16 },
    #[error("servo {0} is listed more than once")]
    Duplicate(u8),
}

/// Calibration for a single servo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServoCalibration {
    pub id: u8,
    pub min: u16,
    pub max: u16,
}

impl ServoCalibration {
    /// Midpoint between min and max — the "zero" position.
    pub fn center(&self) -> f32 {
        (self.min as f32 + self.max as f32) / 2.0
    }

    /// Total usable range in raw ticks.
    pub fn range(&self) -> u16 {
        self.max.saturating_sub(self.min)
    }

    /// Goal tick for a hobby-servo angle (`0..=180`, 90 = center).
    ///
    /// Clamped to the recorded `min..=max` so a goal never drives the joint
    /// past where it was seen moving during calibration. An entry without
    /// travel pins every goal to `min`; [`CalibrationData::check_joints`]
    /// rejects such entries before they reach the bus.
    pub fn ticks_for_servo_deg(&self, servo_deg: u8) -> u16 {
        let offset = Angle::new::<degree>(servo_deg as f32 - SERVO_CENTER_DEG);
        let raw = offset.get::<revolution>() * TICKS_PER_REV + self.center();
        let lo = self.min as f32;
        let hi = (self.max as f32).max(lo);
        raw.round().clamp(lo, hi).clamp(0.0, MAX_TICK) as u16
    }

    /// Inverse of [`Self::ticks_for_servo_deg`], unclamped.
    pub fn servo_deg_for_ticks(&self, raw: u16) -> f32 {
        let turns = (raw as f32 - self.center()) / TICKS_PER_REV;
        Angle::new::<revolution>(turns).get::<degree>() + SERVO_CENTER_DEG
    }
}

/// Calibration data for all servos on a bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CalibrationData {
    pub servos: Vec<ServoCalibration>,
}

impl CalibrationData {
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| std::io::Error::other(format!("bad calibration JSON: {e}")))
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Look up the calibration for a servo by bus ID.
    pub fn servo(&self, id: u8) -> Option<&ServoCalibration> {
        self.servos.iter().find(|s| s.id == id)
    }

    /// Checks that every joint of the arm has exactly one entry with some
    /// travel (`min < max`).
    pub fn check_joints(&self, ids: &[u8; NUM_JOINTS]) -> Result<(), CalibrationError> {
        for &id in ids {
            let mut entries = self.servos.iter().filter(|s| s.id == id);
            let cal = entries.next().ok_or(CalibrationError::Missing(id))?;
            if entries.next().is_some() {
                return Err(CalibrationError::Duplicate(id));
            }
            if cal.min >= cal.max {
                return Err(CalibrationError::NoTravel {
                    id,
                    min: cal.min,
                    max: cal.max,
                });
            }
        }
        Ok(())
    }
}

/// Running min/max of every joint while the arm is moved by hand.
#[derive(Debug, Clone)]
pub struct RangeTracker {
    ids: [u8; NUM_JOINTS],
    ranges: [Option<(u16, u16)>; NUM_JOINTS],
}

impl RangeTracker {
    pub fn new(ids: [u8; NUM_JOINTS]) -> Self {
        Self {
            ids,
            ranges: [None; NUM_JOINTS],
        }
    }

    pub fn ids(&self) -> &[u8; NUM_JOINTS] {
        &self.ids
    }

    /// Widens the range of joint `joint` to include `pos`.
    pub fn record(&mut self, joint: usize, pos: u16) {
        let range = &mut self.ranges[joint];
        *range = Some(match *range {
            Some((lo, hi)) => (lo.min(pos), hi.max(pos)),
            None => (pos, pos),
        });
    }

    /// Calibration for the arm, checked against its joint layout.
    pub fn finish(&self) -> Result<CalibrationData, CalibrationError> {
        let servos = self
            .ids
            .iter()
            .zip(&self.ranges)
            .map(|(&id, range)| {
                let (min, max) = range.ok_or(CalibrationError::Missing(id))?;
                Ok(ServoCalibration { id, min, max })
            })
            .collect::<Result<Vec<_>, CalibrationError>>()?;
        let data = CalibrationData { servos };
        data.check_joints(&self.ids)?;
        Ok(data)
    }
}

impl fmt::Display for RangeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, range) in self.ids.iter().zip(&self.ranges) {
            match range {
                Some((lo, hi)) => write!(f, "  s{id}:[{lo:>4}-{hi:>4}]")?,
                None => write!(f, "  s{id}:[ ---- ]")?,
            }
        }
        Ok(())
    }
}
