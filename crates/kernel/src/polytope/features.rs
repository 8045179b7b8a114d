//! Vertex/edge/face view of convex shapes in the global frame.
//!
//! Boxes, tetrahedra, triangles and polytopes all reduce to a [`FeatureSet`]
//! for separating-axis tests, closest-feature search and span clipping.

use crate::geometry::cuboid::Box3d;
use crate::geometry::linear::Span;
use crate::geometry::point::Point3d;
use crate::geometry::tetrahedron::{TETRA_FACES, Tetrahedron};
use crate::geometry::triangle::Triangle;
use crate::geometry::vector::Vec3;
use crate::tolerance;
use crate::traits::Location;

/// Below this `|n · dir|` a span is handled as parallel to a plane.
const PARALLEL_COS: f64 = 1e-12;

#[derive(Debug, Clone)]
pub(crate) struct FeatureFace {
    /// Vertex indices, counter-clockwise seen from outside.
    pub vertices: Vec<usize>,
    /// Outward unit normal.
    pub normal: Vec3,
    pub offset: f64,
}

impl FeatureFace {
    /// Signed height of a global point above the face plane.
    pub fn height(&self, p: &Point3d) -> f64 {
        p.to_vec3().dot(&self.normal) - self.offset
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FeatureSet {
    pub vertices: Vec<Point3d>,
    pub edges: Vec<[usize; 2]>,
    pub faces: Vec<FeatureFace>,
    /// Solid sets bound a volume; flat sets are a single planar polygon.
    pub solid: bool,
}

pub(crate) trait AsFeatures {
    fn features(&self) -> FeatureSet;
}

fn mean(points: impl Iterator<Item = Point3d>) -> Point3d {
    let (sum, n) = points.fold((nalgebra::Vector3::zeros(), 0usize), |(s, n), p| (s + p.coords(), n + 1));
    Point3d::from_coords(sum / n.max(1) as f64, crate::frame::FrameRef::Global)
}

/// Newell normal of a loop, scaled by twice the enclosed area.
pub(crate) fn newell(vertices: &[Point3d], face: &[usize]) -> Vec3 {
    let origin = vertices[face[0]];
    face.iter()
        .zip(face.iter().cycle().skip(1))
        .map(|(&i, &j)| (vertices[i] - origin).cross(&(vertices[j] - origin)))
        .fold(Vec3::ZERO, |acc, c| acc + c)
}

/// Sorts a convex face's vertices counter-clockwise around `axis`.
pub(crate) fn order_loop(vertices: &[Point3d], face: &[usize], axis: &Vec3) -> Vec<usize> {
    let w = axis.normalized().unwrap_or(Vec3::Z);
    let u = w.orthogonal_unit();
    let v = w.cross(&u);
    let c = mean(face.iter().map(|&i| vertices[i]));
    let mut keyed: Vec<(f64, usize)> = face
        .iter()
        .map(|&i| {
            let d = vertices[i] - c;
            (d.dot(&v).atan2(d.dot(&u)), i)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, i)| i).collect()
}

fn edges_of(faces: &[FeatureFace]) -> Vec<[usize; 2]> {
    let mut edges: Vec<[usize; 2]> = faces
        .iter()
        .flat_map(|f| {
            f.vertices
                .iter()
                .zip(f.vertices.iter().cycle().skip(1))
                .map(|(&a, &b)| [a.min(b), a.max(b)])
        })
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

impl FeatureSet {
    /// Solid from global vertices and convex faces given in any vertex order.
    /// Loops are sorted and oriented so normals point away from the vertex mean.
    pub fn solid(vertices: Vec<Point3d>, faces: &[Vec<usize>]) -> Self {
        let center = mean(vertices.iter().copied());
        let faces: Vec<FeatureFace> = faces
            .iter()
            .map(|face| {
                let fc = mean(face.iter().map(|&i| vertices[i]));
                let outward = fc - center;
                let mut ring = order_loop(&vertices, face, &outward);
                let mut n = newell(&vertices, &ring);
                if n.dot(&outward) < 0.0 {
                    ring.reverse();
                    n = -n;
                }
                let normal = n.normalized().unwrap_or(outward);
                FeatureFace {
                    vertices: ring,
                    normal,
                    offset: fc.to_vec3().dot(&normal),
                }
            })
            .collect();
        Self {
            edges: edges_of(&faces),
            vertices,
            faces,
            solid: true,
        }
    }

    /// Planar convex polygon from global vertices in boundary order.
    pub fn flat(vertices: Vec<Point3d>) -> Self {
        let ring: Vec<usize> = (0..vertices.len()).collect();
        let n = newell(&vertices, &ring);
        let normal = n.normalized().unwrap_or(Vec3::Z);
        let offset = mean(vertices.iter().copied()).to_vec3().dot(&normal);
        let faces = vec![FeatureFace {
            vertices: ring,
            normal,
            offset,
        }];
        Self {
            edges: edges_of(&faces),
            vertices,
            faces,
            solid: false,
        }
    }

    pub fn center(&self) -> Point3d {
        mean(self.vertices.iter().copied())
    }

    /// Bounding radius about the vertex mean.
    pub fn scale(&self) -> f64 {
        let c = self.center();
        self.vertices
            .iter()
            .map(|v| (*v - c).length())
            .fold(0.0, f64::max)
    }

    pub fn edge_span(&self, edge: &[usize; 2]) -> Span {
        Span::between(self.vertices[edge[0]], self.vertices[edge[1]])
    }

    /// Extent of the vertices along `axis`.
    pub fn project(&self, axis: &Vec3) -> (f64, f64) {
        self.vertices
            .iter()
            .map(|v| v.to_vec3().dot(axis))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)))
    }

    /// Outward unit normal and boundary point of each half-space whose
    /// intersection is the set: face planes for solids, in-plane edge
    /// half-planes for flat sets.
    fn half_spaces(&self) -> Vec<(Vec3, Point3d)> {
        if self.solid {
            self.faces
                .iter()
                .map(|f| (f.normal, self.vertices[f.vertices[0]]))
                .collect()
        } else {
            face_edge_planes(&self.vertices, &self.faces[0])
        }
    }

    fn excess(&self, p: &Point3d) -> f64 {
        self.half_spaces()
            .iter()
            .map(|(n, a)| (*p - *a).dot(n))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn locate(&self, p: &Point3d) -> Location {
        let p = p.to_global();
        let thr = tolerance::threshold(self.scale());
        if !self.solid && self.faces[0].height(&p).abs() > thr {
            return Location::Outside;
        }
        let excess = self.excess(&p);
        if excess > thr {
            Location::Outside
        } else if excess >= -thr {
            Location::Boundary
        } else {
            Location::Inside
        }
    }

    /// Projection of `p` onto face `face` when it falls inside the polygon.
    pub fn face_projection(&self, face: usize, p: &Point3d) -> Option<Point3d> {
        let f = &self.faces[face];
        let q = *p - f.normal * f.height(p);
        face_edge_planes(&self.vertices, f)
            .iter()
            .all(|(n, a)| (q - *a).dot(n) <= 0.0)
            .then_some(q)
    }

    /// Closest point of the set to a global point.
    pub fn closest_point(&self, p: &Point3d) -> Point3d {
        let p = p.to_global();
        if self.solid && self.excess(&p) <= 0.0 {
            return p;
        }
        let on_faces = (0..self.faces.len()).filter_map(|i| self.face_projection(i, &p));
        let on_edges = self.edges.iter().map(|e| self.edge_span(e).closest_to(&p));
        on_faces
            .chain(on_edges)
            .min_by(|a, b| a.distance_squared_to(&p).total_cmp(&b.distance_squared_to(&p)))
            .unwrap_or(p)
    }

    /// Parameter interval of `span` inside the set, or `None` when they are
    /// disjoint. A span that only touches within tolerance collapses to a
    /// single parameter.
    pub fn clip(&self, span: &Span) -> Option<(f64, f64)> {
        let thr = tolerance::threshold(self.scale());
        if !self.solid {
            let f = &self.faces[0];
            let denom = f.normal.dot(&span.dir);
            let h0 = f.height(&span.origin);
            if denom.abs() > PARALLEL_COS {
                let t = span.clamp(-h0 / denom);
                return (self.locate(&span.at(t)) != Location::Outside).then_some((t, t));
            }
            if h0.abs() > thr {
                return None;
            }
        }
        let planes = self.half_spaces();
        clip_half_spaces(span, &planes, 0.0).or_else(|| {
            clip_half_spaces(span, &planes, thr).map(|(lo, hi)| {
                let m = 0.5 * (lo + hi);
                (m, m)
            })
        })
    }
}

/// In-plane outward edge normals of a face.
fn face_edge_planes(vertices: &[Point3d], face: &FeatureFace) -> Vec<(Vec3, Point3d)> {
    let ring = &face.vertices;
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .filter_map(|(&i, &j)| {
            let (a, b) = (vertices[i], vertices[j]);
            (b - a).cross(&face.normal).normalized().map(|m| (m, a))
        })
        .collect()
}

/// Cyrus-Beck clipping of a span against half-spaces widened by `slack`.
fn clip_half_spaces(span: &Span, planes: &[(Vec3, Point3d)], slack: f64) -> Option<(f64, f64)> {
    let (mut lo, mut hi) = (span.lo, span.hi);
    for (n, a) in planes {
        let h0 = (span.origin - *a).dot(n);
        let denom = n.dot(&span.dir);
        if denom.abs() <= PARALLEL_COS {
            if h0 > slack {
                return None;
            }
            continue;
        }
        let t = (slack - h0) / denom;
        if denom > 0.0 {
            hi = hi.min(t);
        } else {
            lo = lo.max(t);
        }
        if lo > hi {
            return None;
        }
    }
    Some((lo, hi))
}

// ─── Shape adapters ────────────────────────────────────────────────────────

impl AsFeatures for Box3d {
    fn features(&self) -> FeatureSet {
        let faces: Vec<Vec<usize>> = (0..3)
            .flat_map(|axis| {
                [0, 1].map(|side| (0usize..8).filter(|&k| (k >> axis) & 1 == side).collect())
            })
            .collect();
        FeatureSet::solid(self.corners().to_vec(), &faces)
    }
}

impl AsFeatures for Tetrahedron {
    fn features(&self) -> FeatureSet {
        let faces: Vec<Vec<usize>> = TETRA_FACES.iter().map(|f| f.to_vec()).collect();
        FeatureSet::solid(self.global_vertices().to_vec(), &faces)
    }
}

impl AsFeatures for Triangle {
    fn features(&self) -> FeatureSet {
        FeatureSet::flat(self.global_vertices().to_vec())
    }
}
