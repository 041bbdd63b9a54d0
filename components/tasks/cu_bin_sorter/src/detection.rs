//! Detector output.

use crate::bins::{BinCategory, classify};
use serde::{Deserialize, Serialize};

/// Scores strictly above this are trusted without a human review.
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.85;

/// Axis-aligned box in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Center pixel `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }
}

/// One object reported by the detector. Read-only input to the sorter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub score: f64,
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, score: f64, bounding_box: BoundingBox) -> Self {
        Self {
            label: label.into(),
            score,
            bounding_box,
        }
    }

    pub fn bin(&self) -> BinCategory {
        classify(&self.label)
    }
}

/// Whether a detection can be filed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    AutoSorted,
    PendingReview,
}

/// Auto-sorted only for a known bin with a score strictly above `threshold`.
pub fn review_status(detection: &Detection, threshold: f64) -> ReviewStatus {
    if detection.bin() != BinCategory::Unknown && detection.score > threshold {
        ReviewStatus::AutoSorted
    } else {
        ReviewStatus::PendingReview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(label: &str, score: f64) -> Detection {
        Detection::new(label, score, BoundingBox::default())
    }

    #[test]
    fn parses_detector_json() {
        let json = r#"{"label": "plastic bottle", "score": 0.98,
                       "box": {"xmin": 150, "ymin": 200, "xmax": 250, "ymax": 400}}"#;
        let d: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(d.label, "plastic bottle");
        assert_eq!(d.bounding_box.center(), (200.0, 300.0));
        assert_eq!(d.bin(), BinCategory::Plastic);
    }

    #[test]
    fn confident_known_objects_are_auto_sorted() {
        assert_eq!(
            review_status(&det("plastic bottle", 0.98), DEFAULT_REVIEW_THRESHOLD),
            ReviewStatus::AutoSorted
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(
            review_status(&det("tin can", 0.85), DEFAULT_REVIEW_THRESHOLD),
            ReviewStatus::PendingReview
        );
    }

    #[test]
    fn score_just_above_the_threshold_is_trusted() {
        let json = r#"{"label": "plastic bottle", "score": 0.85000001,
                       "box": {"xmin": 0, "ymin": 0, "xmax": 1, "ymax": 1}}"#;
        let d: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(review_status(&d, DEFAULT_REVIEW_THRESHOLD), ReviewStatus::AutoSorted);
    }

    #[test]
    fn unknown_objects_always_need_review() {
        assert_eq!(
            review_status(&det("banana", 0.99), DEFAULT_REVIEW_THRESHOLD),
            ReviewStatus::PendingReview
        );
    }
}
