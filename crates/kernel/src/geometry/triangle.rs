use serde::{Deserialize, Serialize};

use super::linear::Segment;
use super::motion::RigidMotion;
use super::plane::Plane;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::polytope::features::AsFeatures;
use crate::tolerance;
use crate::traits::{Attitude, Extent, Flat, Locate, Location, Oriented, Rigid};

/// A closed planar triangular region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    vertices: [Point3d; 3],
}

impl Triangle {
    /// Rejects triangles whose smallest height vanishes against the longest edge.
    pub fn new(a: Point3d, b: Point3d, c: Point3d) -> Result<Self> {
        let t = Self { vertices: [a, b, c] };
        let area = t.area();
        let longest = t
            .edge_vectors()
            .iter()
            .map(Vec3::length)
            .fold(0.0, f64::max);
        if longest == 0.0 || tolerance::current().is_zero(2.0 * area / longest, longest) {
            return Err(GeometryError::DegenerateTriangle { area });
        }
        Ok(t)
    }

    pub(crate) fn from_vertices(vertices: [Point3d; 3]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> [Point3d; 3] {
        self.vertices
    }

    pub(crate) fn global_vertices(&self) -> [Point3d; 3] {
        self.vertices.map(|v| v.to_global())
    }

    fn edge_vectors(&self) -> [Vec3; 3] {
        let [a, b, c] = self.global_vertices();
        [b - a, c - b, a - c]
    }

    /// Edges `ab`, `bc`, `ca`.
    pub fn edges(&self) -> [Segment; 3] {
        let [a, b, c] = self.vertices;
        [
            Segment::from_points(a, b),
            Segment::from_points(b, c),
            Segment::from_points(c, a),
        ]
    }

    fn raw_normal(&self) -> Vec3 {
        let [a, b, c] = self.global_vertices();
        (b - a).cross(&(c - a))
    }

    /// Unit normal following the vertex order (right-hand rule), global frame.
    pub fn normal(&self) -> Vec3 {
        let n = self.raw_normal();
        n.normalized().unwrap_or(n)
    }

    pub fn area(&self) -> f64 {
        0.5 * self.raw_normal().length()
    }

    pub fn perimeter(&self) -> f64 {
        self.edge_vectors().iter().map(Vec3::length).sum()
    }

    pub fn centroid(&self) -> Point3d {
        let [a, b, c] = self.global_vertices();
        Point3d::from_coords((a.coords() + b.coords() + c.coords()) / 3.0, FrameRef::Global)
    }

    /// Center of the circumscribed circle.
    pub fn circumcenter(&self) -> Point3d {
        let [a, b, c] = self.global_vertices();
        let (ab, ac) = (b - a, c - a);
        let n = ab.cross(&ac);
        let offset = (n.cross(&ab) * ac.length_squared() + ac.cross(&n) * ab.length_squared())
            / (2.0 * n.length_squared());
        a + offset
    }

    /// Center of the inscribed circle.
    pub fn incenter(&self) -> Point3d {
        let [a, b, c] = self.global_vertices();
        let (la, lb, lc) = ((c - b).length(), (a - c).length(), (b - a).length());
        let sum = la + lb + lc;
        Point3d::from_coords(
            (a.coords() * la + b.coords() * lb + c.coords() * lc) / sum,
            FrameRef::Global,
        )
    }

    /// Interior angles in radians at `a`, `b` and `c`.
    pub fn angles(&self) -> [f64; 3] {
        let [a, b, c] = self.global_vertices();
        [
            (b - a).angle_between(&(c - a)),
            (c - b).angle_between(&(a - b)),
            (a - c).angle_between(&(b - c)),
        ]
    }

    pub fn plane(&self) -> Plane {
        Plane::from_unit(self.centroid(), self.normal())
    }

    fn bounding_radius(&self) -> f64 {
        let c = self.centroid();
        self.global_vertices()
            .iter()
            .map(|v| (*v - c).length())
            .fold(0.0, f64::max)
    }

    /// Same vertex set in any order; the reference magnitude is the larger
    /// bounding radius.
    pub fn equals(&self, other: &Triangle) -> bool {
        same_vertex_set(
            &self.global_vertices(),
            &other.global_vertices(),
            self.bounding_radius().max(other.bounding_radius()),
        )
    }
}

pub(crate) fn same_vertex_set(a: &[Point3d], b: &[Point3d], scale: f64) -> bool {
    let tol = tolerance::current();
    let matched = |p: &Point3d, set: &[Point3d]| set.iter().any(|q| tol.is_zero((*p - *q).length(), scale));
    a.len() == b.len() && a.iter().all(|p| matched(p, b)) && b.iter().all(|q| matched(q, a))
}

impl Rigid for Triangle {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self::from_vertices(self.vertices.map(|v| m.apply_point(&v)))
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self::from_vertices(self.vertices.map(|v| v.convert_to(frame)))
    }
}

impl Extent for Triangle {
    fn size(&self) -> f64 {
        self.bounding_radius()
    }
}

impl Locate for Triangle {
    /// Planar region classification: the three edges are the boundary and
    /// points off the plane are outside.
    fn locate(&self, p: &Point3d) -> Location {
        self.features().locate(p)
    }
}

impl Oriented for Triangle {
    fn attitude(&self) -> Attitude {
        Attitude::Planar(self.normal())
    }
}

impl Flat for Triangle {
    fn anchor(&self) -> Point3d {
        self.vertices[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn right() -> Triangle {
        Triangle::new(
            Point3d::ORIGIN,
            Point3d::new(4.0, 0.0, 0.0),
            Point3d::new(0.0, 3.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_measures() {
        let t = right();
        assert!((t.area() - 6.0).abs() < 1e-12);
        assert!((t.perimeter() - 12.0).abs() < 1e-12);
        assert_abs_diff_eq!(t.normal(), Vec3::Z, epsilon = 1e-12);
        assert_abs_diff_eq!(t.centroid(), Point3d::new(4.0 / 3.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_circumcenter_is_hypotenuse_midpoint() {
        let t = right();
        assert_abs_diff_eq!(t.circumcenter(), Point3d::new(2.0, 1.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_incenter_of_3_4_5() {
        // Inradius (a + b - c) / 2 = 1 for a right triangle.
        assert_abs_diff_eq!(right().incenter(), Point3d::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_angles_sum_to_pi() {
        let [a, b, c] = right().angles();
        assert!((a - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((a + b + c - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_rejected() {
        let r = Triangle::new(
            Point3d::ORIGIN,
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(2.0, 2.0, 2.0),
        );
        assert!(matches!(r, Err(GeometryError::DegenerateTriangle { .. })));
    }

    #[test]
    fn test_locate_region() {
        let t = right();
        assert_eq!(t.locate(&Point3d::new(1.0, 1.0, 0.0)), Location::Inside);
        assert_eq!(t.locate(&Point3d::new(2.0, 0.0, 0.0)), Location::Boundary);
        assert_eq!(t.locate(&Point3d::new(4.0, 3.0, 0.0)), Location::Outside);
        assert_eq!(t.locate(&Point3d::new(1.0, 1.0, 0.5)), Location::Outside);
    }

    #[test]
    fn test_equality_ignores_vertex_order() {
        let t = right();
        let [a, b, c] = t.vertices();
        assert!(t.equals(&Triangle::new(c, a, b).unwrap()));
        assert!(!t.equals(&Triangle::new(a, b, Point3d::new(0.0, 3.5, 0.0)).unwrap()));
    }
}
