//! Live IK for a detected object.

use crate::detection::Detection;
use cu_arm_ik::{CoordinateMapper, ImageFrame, KinematicsSolver, SolveOutcome};

/// Solves for the center of a detection's bounding box on the table.
pub fn locate(
    detection: &Detection,
    frame: ImageFrame,
    mapper: &CoordinateMapper,
    solver: &KinematicsSolver,
) -> SolveOutcome {
    let (px, py) = detection.bounding_box.center();
    solver.solve_point(mapper.pixel_to_workspace(px, py, frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;
    use cu_arm_ik::JointAngles;

    #[test]
    fn object_in_front_of_the_base() {
        // Center at (320, 380): 100 mm straight ahead.
        let d = Detection::new("can", 0.9, BoundingBox::new(300.0, 360.0, 340.0, 400.0));
        let outcome = locate(
            &d,
            ImageFrame::default(),
            &CoordinateMapper::default(),
            &KinematicsSolver::default(),
        );
        assert_eq!(outcome, SolveOutcome::Solved(JointAngles::new([180, 92, 95, 81, 90, 0])));
    }

    #[test]
    fn object_at_the_far_edge_is_unreachable() {
        let d = Detection::new("plastic bottle", 0.98, BoundingBox::new(150.0, 200.0, 250.0, 400.0));
        // Center (200, 300) maps to (-120, 180, 0): wrist ~238 mm away.
        let outcome = locate(
            &d,
            ImageFrame::default(),
            &CoordinateMapper::default(),
            &KinematicsSolver::default(),
        );
        assert!(outcome.is_unreachable());
    }
}
