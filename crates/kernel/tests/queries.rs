//! Cross-shape queries through the public traits.

use std::f64::consts::{FRAC_PI_4, PI};

use geom_kernel::prelude::*;
use geom_kernel::{
    Circle3d, ConvexPolytope, Intersection, Line3d, Plane, Point3d, Ray, Segment, Sphere,
    Tetrahedron, Triangle, Vec3,
};

fn pt(x: f64, y: f64, z: f64) -> Point3d {
    Point3d::new(x, y, z)
}

// ── Orientation ─────────────────────────────────────────────────────────

#[test]
fn angles_between_lines_planes_and_vectors() {
    let line = Line3d::new(Point3d::ORIGIN, Vec3::new(1.0, 0.0, 1.0)).unwrap();
    assert!((line.angle_to(&Plane::xy()) - FRAC_PI_4).abs() < 1e-12);
    assert!((Vec3::X.angle_to(&-Vec3::X) - PI).abs() < 1e-12);
    let flipped = Line3d::new(Point3d::ORIGIN, -Vec3::X).unwrap();
    assert!(flipped.angle_to(&Vec3::X).abs() < 1e-12);
}

#[test]
fn parallel_orthogonal_and_coplanar() {
    let along_x = Line3d::new(pt(0.0, 0.0, 3.0), Vec3::X).unwrap();
    assert!(along_x.is_parallel_to(&Plane::xy()));
    assert!(along_x.is_orthogonal_to(&Plane::yz()));
    assert!(Plane::xy().is_orthogonal_to(&Plane::xz()));

    let t = Triangle::new(pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0)).unwrap();
    let inside = Segment::new(pt(5.0, 5.0, 0.0), pt(-2.0, 3.0, 0.0)).unwrap();
    let lifted = Segment::new(pt(5.0, 5.0, 1.0), pt(-2.0, 3.0, 1.0)).unwrap();
    assert!(t.is_coplanar_to(&inside));
    assert!(!t.is_coplanar_to(&lifted));
}

// ── Intersection ────────────────────────────────────────────────────────

#[test]
fn line_meets_plane_in_point_or_lies_in_it() {
    let down = Line3d::new(pt(1.0, 2.0, 5.0), -Vec3::Z).unwrap();
    let hit = down.intersection_with(&Plane::xy());
    assert!(hit.as_point().unwrap().equals(&pt(1.0, 2.0, 0.0)));

    let flat = Line3d::new(pt(1.0, 2.0, 0.0), Vec3::Y).unwrap();
    assert_eq!(flat.intersection_with(&Plane::xy()).kind(), "line");
    let above = Line3d::new(pt(1.0, 2.0, 1.0), Vec3::Y).unwrap();
    assert!(above.intersection_with(&Plane::xy()).is_none());
}

#[test]
fn planes_meet_in_a_line() {
    let result = Plane::xy().intersection_with(&Plane::yz());
    let Intersection::Line(line) = result else {
        panic!("expected a line, got {:?}", result);
    };
    assert!(line.is_parallel_to(&Vec3::Y));
    assert!(line.contains_point(&Point3d::ORIGIN));
}

#[test]
fn segment_chord_through_sphere() {
    let s = Segment::new(pt(-5.0, 0.0, 0.0), pt(5.0, 0.0, 0.0)).unwrap();
    let ball = Sphere::new(Point3d::ORIGIN, 2.0).unwrap();
    let chord = s.intersection_with(&ball);
    let piece = chord.as_segment().unwrap();
    assert!((piece.length() - 4.0).abs() < 1e-12);

    let tangent = Segment::new(pt(-5.0, 2.0, 0.0), pt(5.0, 2.0, 0.0)).unwrap();
    assert!(tangent.intersection_with(&ball).as_point().unwrap().equals(&pt(0.0, 2.0, 0.0)));
}

#[test]
fn ray_through_tetrahedron() {
    let t = Tetrahedron::new(
        pt(0.0, 0.0, 0.0),
        pt(2.0, 0.0, 0.0),
        pt(0.0, 2.0, 0.0),
        pt(0.0, 0.0, 2.0),
    )
    .unwrap();
    let ray = Ray::new(pt(0.25, 0.25, -3.0), Vec3::Z).unwrap();
    let piece = ray.intersection_with(&t);
    let seg = piece.as_segment().unwrap();
    assert!((seg.length() - 1.5).abs() < 1e-12);

    let away = Ray::new(pt(0.25, 0.25, -3.0), -Vec3::Z).unwrap();
    assert!(away.intersection_with(&t).is_none());
}

#[test]
fn line_pierces_circle_disc() {
    let c = Circle3d::new(Point3d::ORIGIN, Vec3::Z, 1.0).unwrap();
    let through = Line3d::new(pt(0.5, 0.0, 3.0), Vec3::Z).unwrap();
    assert!(through.intersection_with(&c).as_point().unwrap().equals(&pt(0.5, 0.0, 0.0)));
    let outside = Line3d::new(pt(1.5, 0.0, 3.0), Vec3::Z).unwrap();
    assert!(outside.intersection_with(&c).is_none());
}

// ── Distance and containment ────────────────────────────────────────────

#[test]
fn distances_between_mixed_shapes() {
    let c = Circle3d::new(Point3d::ORIGIN, Vec3::Z, 1.0).unwrap();
    assert!((c.distance_to(&pt(0.0, 0.0, 2.0)) - 2.0).abs() < 1e-12);
    assert!((c.distance_to(&pt(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-12);

    let oct = ConvexPolytope::octahedron();
    let plane = Plane::new(pt(0.0, 0.0, 3.0), Vec3::Z).unwrap();
    assert!((oct.distance_to(&plane) - 2.0).abs() < 1e-12);
    assert!((plane.distance_to(&oct) - 2.0).abs() < 1e-12);

    let skew = Line3d::new(pt(0.0, 0.0, 4.0), Vec3::Y).unwrap();
    assert!((Line3d::new(Point3d::ORIGIN, Vec3::X).unwrap().distance_to(&skew) - 4.0).abs() < 1e-12);
}

#[test]
fn containment_of_lower_dimensional_shapes() {
    let c = Circle3d::new(pt(1.0, 1.0, 1.0), Vec3::X, 2.0).unwrap();
    assert_eq!(c.locate(&pt(1.0, 1.0, 3.0)), Location::Boundary);
    assert_eq!(c.locate(&pt(1.0, 2.0, 2.0)), Location::Inside);
    assert_eq!(c.locate(&pt(1.5, 2.0, 2.0)), Location::Outside);
    assert!(pt(1.0, 2.0, 2.0).belongs_to(&c));

    let ray = Ray::new(pt(1.0, 0.0, 0.0), Vec3::X).unwrap();
    assert!(pt(9.0, 0.0, 0.0).belongs_to(&ray));
    assert!(!pt(0.0, 0.0, 0.0).belongs_to(&ray));
}
