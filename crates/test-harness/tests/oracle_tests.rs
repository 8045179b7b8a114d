//! Tests for verification oracles.

use geom_kernel::prelude::*;
use geom_kernel::{
    Box3d, ConvexPolytope, EulerConvention, FrameRef, Line3d, Plane, Point3d, Rotation, Segment,
    Sphere, Triangle, Vec3, frame,
};
use proptest::prelude::*;
use test_harness::assertions::*;
use test_harness::oracle::*;

fn tilted_box() -> Box3d {
    let r = Rotation::from_euler(0.3, -0.7, 1.1, EulerConvention::IntrinsicZYX);
    Box3d::with_rotation(Point3d::new(1.0, 2.0, 0.5), [2.0, 1.0, 3.0], &r).unwrap()
}

// ── Distance Oracle Tests ───────────────────────────────────────────────

#[test]
fn distance_symmetry_passes_for_mixed_pairs() {
    let b = tilted_box();
    let s = Sphere::new(Point3d::new(6.0, 0.0, 0.0), 1.0).unwrap();
    let seg = Segment::new(Point3d::new(-3.0, 5.0, 1.0), Point3d::new(4.0, 6.0, -2.0)).unwrap();
    let oct = ConvexPolytope::octahedron();
    let results = vec![
        check_distance_symmetry(&b, &s),
        check_distance_symmetry(&seg, &b),
        check_distance_symmetry(&oct, &s),
        check_distance_symmetry(&oct, &seg),
    ];
    assert_all_pass(&results).unwrap();
}

#[test]
fn witnesses_lie_on_their_shapes() {
    let t = Triangle::new(
        Point3d::new(0.0, 0.0, 0.0),
        Point3d::new(2.0, 0.0, 0.0),
        Point3d::new(0.0, 2.0, 0.0),
    )
    .unwrap();
    let s = Sphere::new(Point3d::new(3.0, 3.0, 2.0), 0.5).unwrap();
    let result = check_witnesses(&t, &s);
    assert!(result.passed, "witnesses should be valid: {}", result.detail);
    assert!(result.value.unwrap() > 0.0);
}

#[test]
fn intersects_consistency_for_overlap() {
    let a = ConvexPolytope::icosahedron();
    let b = ConvexPolytope::dodecahedron().translate(&Vec3::new(0.5, 0.0, 0.0));
    let result = check_intersects_consistency(&a, &b);
    assert!(result.passed, "{}", result.detail);
    assert_eq!(result.value, Some(0.0));
}

// ── Rotation Oracle Tests ───────────────────────────────────────────────

#[test]
fn euler_round_trip_all_conventions() {
    let r = Rotation::from_axis_angle(&Vec3::new(1.0, -2.0, 0.5), 2.1).unwrap();
    let results = check_all_euler_conventions(&r);
    assert_eq!(results.len(), 24);
    assert_all_pass(&results).unwrap();
}

#[test]
fn euler_round_trip_at_gimbal_lock() {
    let half_pi = std::f64::consts::FRAC_PI_2;
    for conv in EulerConvention::ALL {
        let middle = if conv.is_proper() { 0.0 } else { half_pi };
        let r = Rotation::from_euler(0.4, middle, -0.9, conv);
        let result = check_euler_round_trip(&r, conv);
        assert!(result.passed, "{}", result.detail);
    }
}

#[test]
fn quaternion_round_trip_near_half_turn() {
    let r = Rotation::from_axis_angle(&Vec3::new(0.0, 1.0, 1.0), std::f64::consts::PI).unwrap();
    let result = check_quaternion_round_trip(&r);
    assert!(result.passed, "{}", result.detail);
}

// ── Frame and Motion Oracle Tests ───────────────────────────────────────

#[test]
fn frame_round_trip_through_nested_frames() {
    let outer = frame::create(
        &Point3d::new(10.0, -4.0, 2.0),
        &Rotation::about_z(0.8),
        FrameRef::Global,
    )
    .unwrap();
    let inner = frame::create_from_axes(
        &Point3d::new(1.0, 1.0, 1.0),
        &Vec3::new(0.0, 1.0, 0.0),
        &Vec3::new(0.0, 0.0, 1.0),
        outer.into(),
    )
    .unwrap();
    let p = Point3d::new(3.0, 7.0, -1.0);
    let result = check_frame_round_trip(&p, inner.into());
    assert!(result.passed, "{}", result.detail);
}

#[test]
fn reflection_oracle_covers_all_mirrors() {
    let p = Point3d::new(1.0, 2.0, 3.0);
    let line = Line3d::new(Point3d::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)).unwrap();
    let plane = Plane::new(Point3d::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 1.0)).unwrap();
    assert_all_pass(&[
        check_reflection_idempotent(&p, &Point3d::new(-1.0, 0.0, 4.0)),
        check_reflection_idempotent(&p, &line),
        check_reflection_idempotent(&p, &plane),
    ])
    .unwrap();
}

// ── Containment and Polytope Oracle Tests ───────────────────────────────

#[test]
fn location_oracle_reports_mismatch() {
    let s = Sphere::new(Point3d::new(0.0, 0.0, 0.0), 1.0).unwrap();
    let result = check_location(&s, &Point3d::new(2.0, 0.0, 0.0), Location::Inside);
    assert!(!result.passed);
    assert!(result.detail.contains("Outside"), "{}", result.detail);
}

#[test]
fn regular_solids_are_convex_and_closed() {
    for p in [
        ConvexPolytope::octahedron(),
        ConvexPolytope::icosahedron(),
        ConvexPolytope::dodecahedron(),
        ConvexPolytope::from_box(&tilted_box()),
    ] {
        assert_all_pass(&[check_polytope_convexity(&p), check_euler_formula(&p)]).unwrap();
    }
}

#[test]
fn extruded_face_is_a_valid_polytope() {
    let oct = ConvexPolytope::octahedron();
    let face = oct.face(0).unwrap();
    let prism = face.extrude(&face.normal(), 0.5, false).unwrap();
    assert_eq!(prism.faces().len(), 5);
    assert_all_pass(&[check_polytope_convexity(&prism), check_euler_formula(&prism)]).unwrap();
}

// ── Property Tests ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sphere_polytope_oracles_hold(
        (x, y, z) in (-5.0f64..5.0, -5.0f64..5.0, -5.0f64..5.0),
        r in 0.1f64..2.0,
    ) {
        let s = Sphere::new(Point3d::new(x, y, z), r).unwrap();
        let oct = ConvexPolytope::octahedron();
        let symmetry = check_distance_symmetry(&s, &oct);
        prop_assert!(symmetry.passed, "{}", symmetry.detail);
        let witnesses = check_witnesses(&s, &oct);
        prop_assert!(witnesses.passed, "{}", witnesses.detail);
    }
}
