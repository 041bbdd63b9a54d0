use approx::assert_relative_eq;
use cu_arm_ik::{
    ArmGeometry, CoordinateMapper, ImageFrame, JointAngles, KinematicsSolver, SolveOutcome,
    WorkspacePoint,
};

fn wrist_distance(g: &ArmGeometry, p: WorkspacePoint) -> f64 {
    let r = p.ground_radius();
    let z = p.z + g.wrist_to_tip();
    (r * r + z * z).sqrt()
}

fn grid() -> impl Iterator<Item = WorkspacePoint> {
    (-6..=6).flat_map(|i| {
        (-6..=6).flat_map(move |j| {
            (-4..=4).map(move |k| {
                WorkspacePoint::new(i as f64 * 40.0, j as f64 * 40.0, k as f64 * 30.0)
            })
        })
    })
}

#[test]
fn every_point_either_solves_in_range_or_is_rejected_by_reach() {
    let solver = KinematicsSolver::default();
    let g = *solver.geometry();
    let mut solved = 0;
    let mut rejected = 0;
    for p in grid() {
        let d = wrist_distance(&g, p);
        match solver.solve_point(p) {
            SolveOutcome::Solved(a) => {
                assert!(d <= g.reach(), "{p:?} solved at {d} mm");
                assert!(a.as_array().iter().all(|&v| v <= 180));
                solved += 1;
            }
            SolveOutcome::Unreachable {
                distance_mm,
                reach_mm,
            } => {
                assert!(d > g.reach());
                assert_relative_eq!(distance_mm, d);
                assert_relative_eq!(reach_mm, 210.0);
                rejected += 1;
            }
            SolveOutcome::SafeFallback { angles, .. } => {
                assert_eq!(angles, JointAngles::SAFE_HOME);
            }
        }
    }
    assert!(solved > 0 && rejected > 0);
}

#[test]
fn solving_is_repeatable() {
    let solver = KinematicsSolver::default();
    for p in grid() {
        assert_eq!(solver.solve_point(p), solver.solve_point(p));
    }
}

#[test]
fn beyond_reach_is_always_unreachable() {
    let solver = KinematicsSolver::default();
    let g = *solver.geometry();
    for step in 0..36 {
        let yaw = (step as f64 * 10.0).to_radians();
        let r = g.reach() + 1.0;
        // Keep the wrist in the table plane so the wrist distance is exactly r.
        let p = WorkspacePoint::new(r * yaw.cos(), r * yaw.sin(), -g.wrist_to_tip());
        assert!(solver.solve_point(p).is_unreachable(), "{p:?}");
    }
}

#[test]
fn gripper_stays_open_and_roll_neutral() {
    let solver = KinematicsSolver::default();
    for p in grid() {
        if let SolveOutcome::Solved(a) = solver.solve_point(p) {
            assert_eq!(a.as_array()[4], 90);
            assert_eq!(a.as_array()[5], 0);
        }
    }
}

#[test]
fn pixel_in_front_of_the_base_solves() {
    let mapper = CoordinateMapper::default();
    let solver = KinematicsSolver::default();
    // 100 px above the bottom edge, dead center.
    let p = mapper.pixel_to_workspace(320.0, 380.0, ImageFrame::default());
    assert_eq!(p, WorkspacePoint::new(0.0, 100.0, 0.0));
    assert_eq!(
        solver.solve_point(p),
        SolveOutcome::Solved(JointAngles::new([180, 92, 95, 81, 90, 0]))
    );
}
