use serde::{Deserialize, Serialize};

use super::linear::Segment;
use super::motion::RigidMotion;
use super::point::Point3d;
use super::triangle::{Triangle, same_vertex_set};
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::polytope::features::AsFeatures;
use crate::tolerance;
use crate::traits::{Extent, Locate, Location, Rigid};

/// Vertex indices of the four faces, each opposite the missing vertex.
pub(crate) const TETRA_FACES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

pub(crate) const TETRA_EDGES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// A closed solid tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tetrahedron {
    vertices: [Point3d; 4],
}

impl Tetrahedron {
    /// Rejects tetrahedra whose smallest height vanishes against the longest edge.
    pub fn new(a: Point3d, b: Point3d, c: Point3d, d: Point3d) -> Result<Self> {
        let t = Self { vertices: [a, b, c, d] };
        let volume = t.volume();
        let g = t.global_vertices();
        let longest = TETRA_EDGES
            .iter()
            .map(|[i, j]| (g[*i] - g[*j]).length())
            .fold(0.0, f64::max);
        let widest = t.faces().iter().map(Triangle::area).fold(0.0, f64::max);
        if widest == 0.0 || tolerance::current().is_zero(3.0 * volume / widest, longest) {
            return Err(GeometryError::DegenerateTetrahedron { volume });
        }
        Ok(t)
    }

    pub fn vertices(&self) -> [Point3d; 4] {
        self.vertices
    }

    pub(crate) fn global_vertices(&self) -> [Point3d; 4] {
        self.vertices.map(|v| v.to_global())
    }

    pub fn volume(&self) -> f64 {
        let [a, b, c, d] = self.global_vertices();
        (b - a).triple(&(c - a), &(d - a)).abs() / 6.0
    }

    pub fn area(&self) -> f64 {
        self.faces().iter().map(Triangle::area).sum()
    }

    pub fn centroid(&self) -> Point3d {
        let g = self.global_vertices();
        let sum = g.iter().fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.coords());
        Point3d::from_coords(sum / 4.0, FrameRef::Global)
    }

    /// Face `i` is the triangle opposite vertex `i`.
    pub fn faces(&self) -> [Triangle; 4] {
        TETRA_FACES.map(|[i, j, k]| {
            Triangle::from_vertices([self.vertices[i], self.vertices[j], self.vertices[k]])
        })
    }

    pub fn edges(&self) -> [Segment; 6] {
        TETRA_EDGES.map(|[i, j]| Segment::from_points(self.vertices[i], self.vertices[j]))
    }

    fn bounding_radius(&self) -> f64 {
        let c = self.centroid();
        self.global_vertices()
            .iter()
            .map(|v| (*v - c).length())
            .fold(0.0, f64::max)
    }

    /// Same vertex set in any order.
    pub fn equals(&self, other: &Tetrahedron) -> bool {
        same_vertex_set(
            &self.global_vertices(),
            &other.global_vertices(),
            self.bounding_radius().max(other.bounding_radius()),
        )
    }
}

impl Rigid for Tetrahedron {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self {
            vertices: self.vertices.map(|v| m.apply_point(&v)),
        }
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self {
            vertices: self.vertices.map(|v| v.convert_to(frame)),
        }
    }
}

impl Extent for Tetrahedron {
    fn size(&self) -> f64 {
        self.bounding_radius()
    }
}

impl Locate for Tetrahedron {
    fn locate(&self, p: &Point3d) -> Location {
        self.features().locate(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector::Vec3;
    use approx::assert_abs_diff_eq;

    fn corner() -> Tetrahedron {
        Tetrahedron::new(
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
            Point3d::new(0.0, 0.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_volume_area_centroid() {
        let t = corner();
        assert!((t.volume() - 1.0 / 6.0).abs() < 1e-12);
        let expected = 1.5 + 3f64.sqrt() / 2.0;
        assert!((t.area() - expected).abs() < 1e-12);
        assert_abs_diff_eq!(t.centroid(), Point3d::new(0.25, 0.25, 0.25), epsilon = 1e-12);
    }

    #[test]
    fn test_faces_and_edges() {
        let t = corner();
        assert_eq!(t.faces().len(), 4);
        let total: f64 = t.edges().iter().map(Segment::length).sum();
        assert!((total - (3.0 + 3.0 * 2f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_flat_rejected() {
        let r = Tetrahedron::new(
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
        );
        assert!(matches!(r, Err(GeometryError::DegenerateTetrahedron { .. })));
    }

    #[test]
    fn test_locate() {
        let t = corner();
        assert_eq!(t.locate(&Point3d::new(0.1, 0.1, 0.1)), Location::Inside);
        assert_eq!(t.locate(&Point3d::new(0.2, 0.2, 0.0)), Location::Boundary);
        assert_eq!(t.locate(&Point3d::new(0.5, 0.5, 0.5)), Location::Outside);
    }

    #[test]
    fn test_rigid_motion_preserves_volume() {
        let t = corner().translate(&Vec3::new(3.0, -1.0, 2.0));
        assert!((t.volume() - 1.0 / 6.0).abs() < 1e-12);
        assert!(t.equals(&corner().translate(&Vec3::new(3.0, -1.0, 2.0))));
        assert!(!t.equals(&corner()));
    }
}
