//! Sorting task for the recycling arm.
//!
//! Detections come in from an external object detector (label, score, box).
//! Each label is mapped to a bin, each bin to a preset pose, and the result
//! is an ordered list of [`MotionStep`]s for a [`ServoDriver`] to execute:
//!
//! ```
//! use cu_bin_sorter::{BoundingBox, Detection, MotionSequencer, StepAction};
//!
//! let sequencer = MotionSequencer::default();
//! let steps = sequencer.build_sequence(&[
//!     Detection::new("plastic bottle", 0.98, BoundingBox::new(150.0, 200.0, 250.0, 400.0)),
//!     Detection::new("banana", 0.91, BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
//! ]);
//! assert_eq!(steps.len(), 2);
//! assert_eq!(steps[0].action, StepAction::Home);
//! assert_eq!(steps[1].action, StepAction::MoveToBin);
//! ```

pub mod bins;
pub mod detection;
pub mod driver;
pub mod locate;
pub mod sequence;

pub use bins::{BinCategory, BinPresets, classify};
pub use detection::{BoundingBox, DEFAULT_REVIEW_THRESHOLD, Detection, ReviewStatus, review_status};
pub use driver::{DriverError, RecordingDriver, ServoDriver, run_sequence};
pub use locate::locate;
pub use sequence::{MotionSequencer, MotionStep, StepAction};
