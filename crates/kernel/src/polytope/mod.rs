//! Convex polytopes: validated construction, regular solids, measures and
//! face extrusion. Pair queries (SAT, closest features) live in
//! [`sat`] and [`search`] and are reached through the shared traits.

pub(crate) mod features;
pub mod platonic;
pub(crate) mod sat;
pub(crate) mod search;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::geometry::cuboid::Box3d;
use crate::geometry::motion::RigidMotion;
use crate::geometry::point::Point3d;
use crate::geometry::tetrahedron::Tetrahedron;
use crate::geometry::triangle::same_vertex_set;
use crate::geometry::vector::Vec3;
use crate::tolerance;
use crate::traits::{Extent, Locate, Location, Rigid};
use features::{AsFeatures, FeatureSet, newell, order_loop};

/// A closed convex solid bounded by planar faces.
///
/// Faces are vertex-index loops ordered counter-clockwise seen from outside.
/// All vertices share the frame of the first vertex given at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolytope {
    vertices: Vec<Point3d>,
    faces: Vec<Vec<usize>>,
}

/// One planar face as a standalone polygon in the global frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3d>,
    normal: Vec3,
}

fn vertex_mean(points: &[Point3d]) -> Point3d {
    let sum = points
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.to_global().coords());
    Point3d::from_coords(sum / points.len().max(1) as f64, FrameRef::Global)
}

impl ConvexPolytope {
    /// Validating constructor.
    ///
    /// Face loops may be given in either orientation; they are re-ordered so
    /// every normal points outward. Rejects non-planar faces, open
    /// surfaces, non-convex vertex sets and flat solids.
    #[instrument(skip(vertices, faces), fields(vertices = vertices.len(), faces = faces.len()))]
    pub fn new(vertices: Vec<Point3d>, faces: Vec<Vec<usize>>) -> Result<Self> {
        if vertices.len() < 4 {
            return Err(GeometryError::TooFew {
                what: "vertices",
                min: 4,
                got: vertices.len(),
            });
        }
        if faces.len() < 4 {
            return Err(GeometryError::TooFew {
                what: "faces",
                min: 4,
                got: faces.len(),
            });
        }
        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(GeometryError::DegenerateFace { face: fi });
            }
            if let Some(&index) = face.iter().find(|&&i| i >= vertices.len()) {
                return Err(GeometryError::FaceIndexOutOfRange {
                    face: fi,
                    index,
                    count: vertices.len(),
                });
            }
        }

        let frame = vertices[0].frame;
        let vertices: Vec<Point3d> = vertices.iter().map(|v| v.convert_to(frame)).collect();
        let global: Vec<Point3d> = vertices.iter().map(Point3d::to_global).collect();
        let center = vertex_mean(&global);
        let scale = global
            .iter()
            .map(|v| (*v - center).length())
            .fold(0.0, f64::max);
        let thr = tolerance::threshold(scale);

        let mut loops = Vec::with_capacity(faces.len());
        let mut normals = Vec::with_capacity(faces.len());
        for (fi, face) in faces.iter().enumerate() {
            let fc = vertex_mean(&face.iter().map(|&i| global[i]).collect::<Vec<_>>());
            let outward = fc - center;
            let mut ring = order_loop(&global, face, &outward);
            let raw = newell(&global, &ring);
            let Some(mut n) = raw.normalized().filter(|_| raw.length() > thr * thr) else {
                return Err(GeometryError::DegenerateFace { face: fi });
            };
            if n.dot(&outward) < 0.0 {
                ring.reverse();
                n = -n;
            }
            let deviation = ring
                .iter()
                .map(|&i| (global[i] - fc).dot(&n).abs())
                .fold(0.0, f64::max);
            if deviation > thr {
                return Err(GeometryError::NonPlanarFace { face: fi, deviation });
            }
            loops.push(ring);
            normals.push((fc, n));
        }

        let mut uses: HashMap<(usize, usize), usize> = HashMap::new();
        for ring in &loops {
            for (&a, &b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
                *uses.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        let mut open: Vec<_> = uses.iter().filter(|(_, n)| **n != 2).collect();
        open.sort();
        if let Some(&(&(a, b), &n)) = open.first() {
            return Err(GeometryError::OpenPolytope { a, b, uses: n });
        }

        let mut depth = 0.0_f64;
        for (fi, (fc, n)) in normals.iter().enumerate() {
            for (vi, v) in global.iter().enumerate() {
                let gap = (*v - *fc).dot(n);
                if gap > thr {
                    return Err(GeometryError::NonConvex {
                        vertex: vi,
                        face: fi,
                        gap,
                    });
                }
                depth = depth.max(-gap);
            }
        }
        if depth <= thr {
            return Err(GeometryError::ZeroVolume);
        }

        info!(vertices = vertices.len(), faces = loops.len(), "convex polytope built");
        Ok(Self {
            vertices,
            faces: loops,
        })
    }

    /// Trusted construction from an already oriented feature set. The
    /// global vertices are re-expressed in `frame`.
    pub(crate) fn from_features(set: FeatureSet, frame: FrameRef) -> Self {
        Self {
            vertices: set.vertices.iter().map(|v| v.convert_to(frame)).collect(),
            faces: set.faces.into_iter().map(|f| f.vertices).collect(),
        }
    }

    /// Polytope over the box corners, expressed in the frame of its center.
    pub fn from_box(b: &Box3d) -> Self {
        Self::from_features(b.features(), b.center().frame)
    }

    /// Polytope over the tetrahedron, expressed in the frame of its first vertex.
    pub fn from_tetrahedron(t: &Tetrahedron) -> Self {
        Self::from_features(t.features(), t.vertices()[0].frame)
    }

    pub fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    /// Outward-oriented vertex loops.
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Undirected edges as sorted index pairs.
    pub fn edges(&self) -> Vec<[usize; 2]> {
        self.features().edges
    }

    pub fn face(&self, index: usize) -> Option<Polygon> {
        let ring = self.faces.get(index)?;
        let global = self.global_vertices();
        let normal = newell(&global, ring);
        Some(Polygon {
            vertices: ring.iter().map(|&i| global[i]).collect(),
            normal: normal.normalized().unwrap_or(normal),
        })
    }

    /// Vertices resolved into the global frame.
    pub fn global_vertices(&self) -> Vec<Point3d> {
        self.vertices.iter().map(Point3d::to_global).collect()
    }

    /// Vertex mean.
    pub fn center(&self) -> Point3d {
        vertex_mean(&self.vertices)
    }

    /// Volume centroid.
    pub fn centroid(&self) -> Point3d {
        let global = self.global_vertices();
        let c = vertex_mean(&global).coords();
        let mut weighted = nalgebra::Vector3::zeros();
        let mut volume = 0.0;
        for ring in &self.faces {
            let a = global[ring[0]].coords();
            for w in ring[1..].windows(2) {
                let (b, d) = (global[w[0]].coords(), global[w[1]].coords());
                let v = (a - c).dot(&(b - c).cross(&(d - c))) / 6.0;
                weighted += (a + b + d + c) * (v / 4.0);
                volume += v;
            }
        }
        if volume == 0.0 {
            return Point3d::from_coords(c, FrameRef::Global);
        }
        Point3d::from_coords(weighted / volume, FrameRef::Global)
    }

    pub fn volume(&self) -> f64 {
        let global = self.global_vertices();
        let c = vertex_mean(&global);
        self.faces
            .iter()
            .map(|ring| {
                let n = newell(&global, ring);
                n.dot(&(global[ring[0]] - c)) / 6.0
            })
            .sum()
    }

    pub fn area(&self) -> f64 {
        let global = self.global_vertices();
        self.faces
            .iter()
            .map(|ring| 0.5 * newell(&global, ring).length())
            .sum()
    }

    /// Scaled copy about the vertex mean.
    pub fn scale(&self, factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(GeometryError::NonPositive {
                what: "scale factor",
                value: factor,
            });
        }
        let c = self.center();
        Ok(Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| {
                    let frame = v.frame;
                    (c + (v.to_global() - c) * factor).convert_to(frame)
                })
                .collect(),
            faces: self.faces.clone(),
        })
    }

    fn bounding_radius(&self) -> f64 {
        let global = self.global_vertices();
        let c = vertex_mean(&global);
        global
            .iter()
            .map(|v| (*v - c).length())
            .fold(0.0, f64::max)
    }

    /// Same vertex set; faces follow from convexity.
    pub fn equals(&self, other: &ConvexPolytope) -> bool {
        same_vertex_set(
            &self.global_vertices(),
            &other.global_vertices(),
            self.bounding_radius().max(other.bounding_radius()),
        )
    }
}

impl AsFeatures for ConvexPolytope {
    fn features(&self) -> FeatureSet {
        FeatureSet::solid(self.global_vertices(), &self.faces)
    }
}

impl Rigid for ConvexPolytope {
    fn transformed(&self, m: &RigidMotion) -> Self {
        let mut faces = self.faces.clone();
        if m.is_reflection() {
            faces.iter_mut().for_each(|ring| ring.reverse());
        }
        Self {
            vertices: self.vertices.iter().map(|v| m.apply_point(v)).collect(),
            faces,
        }
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v.convert_to(frame)).collect(),
            faces: self.faces.clone(),
        }
    }
}

impl Extent for ConvexPolytope {
    fn size(&self) -> f64 {
        self.bounding_radius()
    }
}

impl Locate for ConvexPolytope {
    fn locate(&self, p: &Point3d) -> Location {
        self.features().locate(p)
    }
}

// ─── Faces ─────────────────────────────────────────────────────────────────

impl Polygon {
    pub fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    /// Outward unit normal of the face it came from.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f64 {
        let ring: Vec<usize> = (0..self.vertices.len()).collect();
        0.5 * newell(&self.vertices, &ring).length()
    }

    /// Prism swept from this face along `direction` by `height`.
    ///
    /// `symmetric` centres the prism on the face; otherwise the face is the
    /// base and the prism grows towards `direction`.
    #[instrument(skip(self), fields(vertices = self.vertices.len()))]
    pub fn extrude(&self, direction: &Vec3, height: f64, symmetric: bool) -> Result<ConvexPolytope> {
        if !(height.is_finite() && height > 0.0) {
            return Err(GeometryError::NonPositive {
                what: "extrusion height",
                value: height,
            });
        }
        let dir = direction
            .to_global()
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "extrusion direction" })?;
        if tolerance::current().is_angle_zero(dir.dot(&self.normal)) {
            return Err(GeometryError::ZeroVolume);
        }
        let (start, end) = if symmetric {
            (-0.5 * height, 0.5 * height)
        } else {
            (0.0, height)
        };
        let n = self.vertices.len();
        let mut vertices: Vec<Point3d> = self.vertices.iter().map(|v| *v + dir * start).collect();
        vertices.extend(self.vertices.iter().map(|v| *v + dir * end));

        let mut faces = vec![(0..n).collect::<Vec<_>>(), (n..2 * n).collect()];
        faces.extend((0..n).map(|i| {
            let j = (i + 1) % n;
            vec![i, j, n + j, n + i]
        }));
        ConvexPolytope::new(vertices, faces)
    }
}
