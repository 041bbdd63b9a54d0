//! Image plane to workspace mapping.
//!
//! This is a flat approximation: a constant millimeter-per-pixel scale and a
//! camera looking straight down with the arm base at the bottom-center of the
//! frame. It is lossy by construction. A calibrated setup replaces the scale
//! and origin with real intrinsics/extrinsics but keeps the same contract:
//! a pixel in, a table-height workspace point out.

use crate::geometry::WorkspacePoint;
use serde::{Deserialize, Serialize};

/// Dimensions of the camera frame the pixel coordinates refer to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageFrame {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Pixel to millimeter converter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateMapper {
    pub scale_x_mm_per_px: f64,
    pub scale_y_mm_per_px: f64,
}

impl Default for CoordinateMapper {
    /// 640 px across a 640 mm wide field of view.
    fn default() -> Self {
        Self {
            scale_x_mm_per_px: 1.0,
            scale_y_mm_per_px: 1.0,
        }
    }
}

impl CoordinateMapper {
    /// Maps a pixel to the table plane (`z = 0`).
    ///
    /// x is measured from the frame's horizontal center, y from its bottom
    /// edge, so moving down the image moves toward the base. Pixels outside
    /// the frame still map; whether the result is useful is up to the caller.
    pub fn pixel_to_workspace(&self, px: f64, py: f64, frame: ImageFrame) -> WorkspacePoint {
        let center_x = frame.width as f64 / 2.0;
        let base_y = frame.height as f64;
        WorkspacePoint::new(
            (px - center_x) * self.scale_x_mm_per_px,
            (base_y - py) * self.scale_y_mm_per_px,
            0.0,
        )
    }
}

/// [`CoordinateMapper::pixel_to_workspace`] with the default 1 mm/px scale.
pub fn pixel_to_workspace(px: f64, py: f64, frame: ImageFrame) -> WorkspacePoint {
    CoordinateMapper::default().pixel_to_workspace(px, py, frame)
}
