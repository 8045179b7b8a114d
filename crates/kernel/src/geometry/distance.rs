//! `DistanceTo` for every pair of shapes.
//!
//! Both operands are lowered to the global frame and handed to
//! [`closest`](super::closest::closest), so each pair is symmetric by
//! construction and `intersects` follows from the blanket impl.

use super::circle::Circle3d;
use super::closest::{AsGeom, closest};
use super::cuboid::Box3d;
use super::linear::{Line3d, Ray, Segment};
use super::plane::Plane;
use super::point::Point3d;
use super::sphere::Sphere;
use super::tetrahedron::Tetrahedron;
use super::triangle::Triangle;
use crate::polytope::ConvexPolytope;
use crate::traits::DistanceTo;

macro_rules! distance_row {
    ($a:ty; $($b:ty),*) => {
        $(
            impl DistanceTo<$b> for $a {
                fn closest_points(&self, other: &$b) -> (Point3d, Point3d) {
                    closest(&self.geom(), &other.geom())
                }
            }
        )*
    };
}

macro_rules! distance_matrix {
    ($($a:ty),*) => {
        $(
            distance_row!($a; Point3d, Line3d, Ray, Segment, Plane, Circle3d, Sphere, Box3d,
                Triangle, Tetrahedron, ConvexPolytope);
        )*
    };
}

distance_matrix!(
    Point3d,
    Line3d,
    Ray,
    Segment,
    Plane,
    Circle3d,
    Sphere,
    Box3d,
    Triangle,
    Tetrahedron,
    ConvexPolytope
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector::Vec3;
    use crate::traits::Intersects;
    use approx::assert_abs_diff_eq;

    fn unit_box_at(x: f64) -> Box3d {
        Box3d::new(Point3d::new(x, 0.0, 0.0), 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_point_to_primitives() {
        let p = Point3d::new(0.0, 3.0, 4.0);
        assert!((p.distance_to(&Point3d::ORIGIN) - 5.0).abs() < 1e-12);
        let line = Line3d::new(Point3d::ORIGIN, Vec3::X).unwrap();
        assert!((p.distance_to(&line) - 5.0).abs() < 1e-12);
        let ray = Ray::new(Point3d::new(1.0, 0.0, 0.0), Vec3::X).unwrap();
        assert!((p.distance_to(&ray) - 26f64.sqrt()).abs() < 1e-12);
        assert!((p.distance_to(&Plane::xy()) - 4.0).abs() < 1e-12);
        let s = Sphere::new(Point3d::ORIGIN, 2.0).unwrap();
        assert!((p.distance_to(&s) - 3.0).abs() < 1e-12);
        assert!(Point3d::new(0.5, 0.0, 0.0).distance_to(&s) == 0.0);
    }

    #[test]
    fn test_point_to_circle_and_box() {
        let c = Circle3d::new(Point3d::ORIGIN, Vec3::Z, 1.0).unwrap();
        let (on_p, on_c) = Point3d::new(3.0, 0.0, 4.0).closest_points(&c);
        assert_abs_diff_eq!(on_p, Point3d::new(3.0, 0.0, 4.0), epsilon = 1e-12);
        assert_abs_diff_eq!(on_c, Point3d::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        let b = unit_box_at(0.0);
        assert!((Point3d::new(2.5, 0.0, 0.0).distance_to(&b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_skew_lines() {
        let a = Line3d::new(Point3d::ORIGIN, Vec3::X).unwrap();
        let b = Line3d::new(Point3d::new(0.0, 0.0, 2.0), Vec3::Y).unwrap();
        assert!((a.distance_to(&b) - 2.0).abs() < 1e-12);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_segment_plane_and_sphere() {
        let s = Segment::new(Point3d::new(0.0, 0.0, 1.0), Point3d::new(0.0, 0.0, 3.0)).unwrap();
        assert!((s.distance_to(&Plane::xy()) - 1.0).abs() < 1e-12);
        assert!((Plane::xy().distance_to(&s) - 1.0).abs() < 1e-12);
        let ball = Sphere::new(Point3d::new(3.0, 0.0, 2.0), 1.0).unwrap();
        assert!((s.distance_to(&ball) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_plane_plane() {
        let a = Plane::xy();
        let b = Plane::new(Point3d::new(0.0, 0.0, 2.5), -Vec3::Z).unwrap();
        assert!((a.distance_to(&b) - 2.5).abs() < 1e-12);
        assert!(a.distance_to(&Plane::xz()) == 0.0);
    }

    #[test]
    fn test_sphere_sphere() {
        let a = Sphere::new(Point3d::ORIGIN, 1.0).unwrap();
        let b = Sphere::new(Point3d::new(5.0, 0.0, 0.0), 2.0).unwrap();
        let (p, q) = a.closest_points(&b);
        assert_abs_diff_eq!(p, Point3d::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(q, Point3d::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        let (p, q) = b.closest_points(&a);
        assert_abs_diff_eq!(p, Point3d::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(q, Point3d::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_unit_cubes_touch_then_separate() {
        let a = unit_box_at(0.0);
        let touching = unit_box_at(1.0);
        assert!(a.distance_to(&touching) == 0.0);
        assert!(a.intersects(&touching));
        let apart = unit_box_at(2.0);
        assert!((a.distance_to(&apart) - 1.0).abs() < 1e-12);
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_segment_through_box_and_beside() {
        let b = unit_box_at(0.0);
        let through = Segment::new(Point3d::new(-2.0, 0.0, 0.0), Point3d::new(2.0, 0.0, 0.0)).unwrap();
        assert!(through.distance_to(&b) == 0.0);
        let beside = Segment::new(Point3d::new(-2.0, 2.0, 0.0), Point3d::new(2.0, 2.0, 0.0)).unwrap();
        assert!((beside.distance_to(&b) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_circle_to_box() {
        let c = Circle3d::new(Point3d::new(0.0, 0.0, 3.0), Vec3::Z, 0.25).unwrap();
        assert!((c.distance_to(&unit_box_at(0.0)) - 2.5).abs() < 1e-9);
        let edge_on = Circle3d::new(Point3d::new(2.0, 0.0, 0.0), Vec3::Y, 1.0).unwrap();
        assert!((edge_on.distance_to(&unit_box_at(0.0)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_to_sphere() {
        let t = Triangle::new(
            Point3d::new(-1.0, -1.0, 0.0),
            Point3d::new(1.0, -1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let s = Sphere::new(Point3d::new(0.0, 0.0, 3.0), 1.0).unwrap();
        assert!((t.distance_to(&s) - 2.0).abs() < 1e-12);
        assert!((s.distance_to(&t) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_symmetric_for_polytopes() {
        let oct = ConvexPolytope::octahedron();
        let tet = Tetrahedron::new(
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(3.0, 0.0, 0.0),
            Point3d::new(2.5, 1.0, 0.0),
            Point3d::new(2.5, 0.5, 1.0),
        )
        .unwrap();
        let d1 = oct.distance_to(&tet);
        let d2 = tet.distance_to(&oct);
        assert!((d1 - 1.0).abs() < 1e-12);
        assert!((d1 - d2).abs() < 1e-12);
    }
}
