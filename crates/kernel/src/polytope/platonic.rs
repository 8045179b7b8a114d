//! Regular solids centred at the origin with unit circumradius.

use tracing::{debug, instrument};

use super::ConvexPolytope;
use super::features::FeatureSet;
use crate::frame::FrameRef;
use crate::geometry::point::Point3d;

/// Vertices closer than this to a supporting plane belong to its face.
const COPLANAR: f64 = 1e-9;

const PHI: f64 = 1.618_033_988_749_895;

fn unit_points(coords: impl IntoIterator<Item = [f64; 3]>) -> Vec<Point3d> {
    coords
        .into_iter()
        .map(|[x, y, z]| {
            let r = (x * x + y * y + z * z).sqrt();
            Point3d::new(x / r, y / r, z / r)
        })
        .collect()
}

/// `(0, ±a, ±b)` and its two cyclic permutations.
fn cyclic_signed(a: f64, b: f64) -> Vec<[f64; 3]> {
    let mut out = Vec::with_capacity(12);
    for sa in [1.0, -1.0] {
        for sb in [1.0, -1.0] {
            let (p, q) = (sa * a, sb * b);
            out.push([0.0, p, q]);
            out.push([q, 0.0, p]);
            out.push([p, q, 0.0]);
        }
    }
    out
}

/// Faces of the convex hull of points in convex position: every plane through
/// three points that has all points on one side, with the points lying on it.
fn supporting_faces(vertices: &[Point3d]) -> Vec<Vec<usize>> {
    let n = vertices.len();
    let mut faces: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let (a, b, c) = (vertices[i], vertices[j], vertices[k]);
                let Some(normal) = (b - a).cross(&(c - a)).normalized() else {
                    continue;
                };
                let heights: Vec<f64> = vertices.iter().map(|v| (*v - a).dot(&normal)).collect();
                let above = heights.iter().any(|h| *h > COPLANAR);
                let below = heights.iter().any(|h| *h < -COPLANAR);
                if above && below {
                    continue;
                }
                let face: Vec<usize> = (0..n).filter(|&m| heights[m].abs() <= COPLANAR).collect();
                if !faces.contains(&face) {
                    faces.push(face);
                }
            }
        }
    }
    faces
}

fn regular(name: &str, vertices: Vec<Point3d>) -> ConvexPolytope {
    let faces = supporting_faces(&vertices);
    debug!(name, vertices = vertices.len(), faces = faces.len(), "regular solid");
    ConvexPolytope::from_features(FeatureSet::solid(vertices, &faces), FrameRef::Global)
}

impl ConvexPolytope {
    #[instrument]
    pub fn octahedron() -> Self {
        regular(
            "octahedron",
            unit_points([
                [1.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
            ]),
        )
    }

    #[instrument]
    pub fn icosahedron() -> Self {
        regular("icosahedron", unit_points(cyclic_signed(1.0, PHI)))
    }

    #[instrument]
    pub fn dodecahedron() -> Self {
        let mut coords = Vec::with_capacity(20);
        for x in [1.0, -1.0] {
            for y in [1.0, -1.0] {
                for z in [1.0, -1.0] {
                    coords.push([x, y, z]);
                }
            }
        }
        coords.extend(cyclic_signed(1.0 / PHI, PHI));
        regular("dodecahedron", unit_points(coords))
    }
}
