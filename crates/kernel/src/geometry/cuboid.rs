use serde::{Deserialize, Serialize};

use super::motion::RigidMotion;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::rotation::Rotation;
use crate::tolerance;
use crate::traits::{Extent, Locate, Location, Rigid};

/// A rectangular box: a center and three mutually orthogonal full-length
/// edge vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3d {
    center: Point3d,
    edges: [Vec3; 3],
}

impl Box3d {
    /// Axis-aligned box in the frame of `center`.
    pub fn new(center: Point3d, lx: f64, ly: f64, lz: f64) -> Result<Self> {
        let f = center.frame;
        Self::from_edges(
            center,
            Vec3::in_frame(lx, 0.0, 0.0, f),
            Vec3::in_frame(0.0, ly, 0.0, f),
            Vec3::in_frame(0.0, 0.0, lz, f),
        )
    }

    /// Box with extents `[lx, ly, lz]` along the rotated global axes.
    pub fn with_rotation(center: Point3d, extents: [f64; 3], rotation: &Rotation) -> Result<Self> {
        let [lx, ly, lz] = extents;
        Self::from_edges(
            center,
            rotation.apply_vector(&(Vec3::X * lx)),
            rotation.apply_vector(&(Vec3::Y * ly)),
            rotation.apply_vector(&(Vec3::Z * lz)),
        )
    }

    pub fn from_edges(center: Point3d, a: Vec3, b: Vec3, c: Vec3) -> Result<Self> {
        let edges = [a, b, c];
        for e in &edges {
            let len = e.length();
            if !(len.is_finite() && len > 0.0) {
                return Err(GeometryError::NonPositive {
                    what: "box edge length",
                    value: len,
                });
            }
        }
        let tol = tolerance::current();
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            let cos = edges[i].dot(&edges[j]) / (edges[i].length() * edges[j].length());
            if !tol.is_angle_zero(cos) {
                return Err(GeometryError::NonOrthogonalEdges);
            }
        }
        Ok(Self { center, edges })
    }

    pub fn center(&self) -> Point3d {
        self.center
    }

    /// The three full-length edge vectors.
    pub fn edges(&self) -> [Vec3; 3] {
        self.edges
    }

    /// Edge lengths along the box's own axes.
    pub fn extents(&self) -> [f64; 3] {
        self.edges.map(|e| e.length())
    }

    /// Unit axes in the global frame.
    pub fn axes(&self) -> [Vec3; 3] {
        self.edges.map(|e| e.to_global().normalized().unwrap_or(e))
    }

    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.extents();
        a * b * c
    }

    pub fn area(&self) -> f64 {
        let [a, b, c] = self.extents();
        2.0 * (a * b + b * c + a * c)
    }

    /// Corners in the global frame; bit `i` of the index selects the
    /// positive end of axis `i`.
    pub fn corners(&self) -> [Point3d; 8] {
        let c = self.center.to_global();
        let e = self.edges.map(|e| e.to_global() * 0.5);
        std::array::from_fn(|i| {
            let sign = |bit: usize| if i & (1 << bit) != 0 { 1.0 } else { -1.0 };
            c + e[0] * sign(0) + e[1] * sign(1) + e[2] * sign(2)
        })
    }

    pub fn half_diagonal(&self) -> f64 {
        let [a, b, c] = self.extents();
        0.5 * (a * a + b * b + c * c).sqrt()
    }

    /// Same center and the same edge set up to sign and order; the reference
    /// magnitude is the larger half diagonal.
    pub fn equals(&self, other: &Box3d) -> bool {
        let scale = self.half_diagonal().max(other.half_diagonal());
        let tol = tolerance::current();
        let same = |a: &Vec3, b: &Vec3| {
            tol.is_zero((*a - *b).length(), scale) || tol.is_zero((*a + *b).length(), scale)
        };
        tol.is_zero((self.center - other.center).length(), scale)
            && self
                .edges
                .iter()
                .all(|e| other.edges.iter().any(|o| same(e, o)))
            && other
                .edges
                .iter()
                .all(|o| self.edges.iter().any(|e| same(e, o)))
    }
}

impl Rigid for Box3d {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self {
            center: m.apply_point(&self.center),
            edges: self.edges.map(|e| m.apply_vector(&e)),
        }
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self {
            center: self.center.convert_to(frame),
            edges: self.edges.map(|e| e.convert_to(frame)),
        }
    }
}

impl Extent for Box3d {
    fn size(&self) -> f64 {
        self.half_diagonal()
    }
}

impl Locate for Box3d {
    /// Largest excess of the box-local coordinates over the half extents.
    fn locate(&self, p: &Point3d) -> Location {
        let d = p.to_global() - self.center.to_global();
        let excess = self
            .edges
            .iter()
            .map(|e| {
                let e = e.to_global();
                let half = 0.5 * e.length();
                d.dot(&e).abs() / (2.0 * half) - half
            })
            .fold(f64::NEG_INFINITY, f64::max);
        let thr = tolerance::threshold(self.half_diagonal());
        if excess > thr {
            Location::Outside
        } else if excess >= -thr {
            Location::Boundary
        } else {
            Location::Inside
        }
    }
}
