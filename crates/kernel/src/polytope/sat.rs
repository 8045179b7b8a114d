//! Separating-axis test between convex feature sets.

use tracing::trace;

use super::features::FeatureSet;
use crate::geometry::vector::Vec3;
use crate::tolerance;

/// Relative size below which a cross product is treated as degenerate.
const DEGENERATE_CROSS: f64 = 1e-12;

fn unit_cross(a: &Vec3, b: &Vec3) -> Option<Vec3> {
    let c = a.cross(b);
    if c.length() <= DEGENERATE_CROSS * a.length() * b.length() {
        None
    } else {
        c.normalized()
    }
}

/// Candidate axes: face normals of both sets, pairwise edge cross products
/// and, for flat sets, the in-plane normals of every edge of either set.
fn candidate_axes(a: &FeatureSet, b: &FeatureSet) -> Vec<Vec3> {
    let mut axes: Vec<Vec3> = a.faces.iter().chain(&b.faces).map(|f| f.normal).collect();

    for ea in &a.edges {
        let (a0, a1) = (a.vertices[ea[0]], a.vertices[ea[1]]);
        let da = a1 - a0;
        for eb in &b.edges {
            let (b0, b1) = (b.vertices[eb[0]], b.vertices[eb[1]]);
            let db = b1 - b0;
            // Parallel edges fall back to the normal of the plane through both.
            if let Some(axis) = unit_cross(&da, &db).or_else(|| unit_cross(&da, &(b0 - a0))) {
                axes.push(axis);
            }
        }
    }

    for flat in [a, b].into_iter().filter(|s| !s.solid) {
        let n = flat.faces[0].normal;
        for set in [a, b] {
            for e in &set.edges {
                let d = set.vertices[e[1]] - set.vertices[e[0]];
                if let Some(axis) = unit_cross(&n, &d) {
                    axes.push(axis);
                }
            }
        }
    }
    axes
}

/// Whether some axis separates the sets by more than the active tolerance,
/// scaled by the larger bounding radius. Touching sets are not separated.
pub(crate) fn separated(a: &FeatureSet, b: &FeatureSet) -> bool {
    let thr = tolerance::threshold(a.scale().max(b.scale()));
    candidate_axes(a, b).iter().any(|axis| {
        let (a_lo, a_hi) = a.project(axis);
        let (b_lo, b_hi) = b.project(axis);
        let gap = (b_lo - a_hi).max(a_lo - b_hi);
        if gap > thr {
            trace!(axis = ?axis.to_array(), gap, "separating axis");
            true
        } else {
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cuboid::Box3d;
    use crate::geometry::point::Point3d;
    use crate::geometry::triangle::Triangle;
    use crate::polytope::features::AsFeatures;
    use crate::rotation::Rotation;

    fn cube_at(x: f64, y: f64, z: f64) -> FeatureSet {
        Box3d::new(Point3d::new(x, y, z), 1.0, 1.0, 1.0)
            .unwrap()
            .features()
    }

    #[test]
    fn test_face_contact_is_not_separated() {
        assert!(!separated(&cube_at(0.0, 0.0, 0.0), &cube_at(1.0, 0.0, 0.0)));
        assert!(separated(&cube_at(0.0, 0.0, 0.0), &cube_at(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_edge_edge_separation() {
        // Two cubes rotated so their closest features are crossing edges.
        let r = Rotation::from_axis_angle(&Vec3::new(1.0, 1.0, 0.0), 0.7).unwrap();
        let a = Box3d::with_rotation(Point3d::ORIGIN, [1.0, 1.0, 1.0], &r).unwrap();
        let s = Rotation::from_axis_angle(&Vec3::new(0.0, 1.0, 1.0), -0.4).unwrap();
        let far = Box3d::with_rotation(Point3d::new(3.0, 0.2, 0.1), [1.0, 1.0, 1.0], &s).unwrap();
        assert!(separated(&a.features(), &far.features()));
        let near = Box3d::with_rotation(Point3d::new(0.9, 0.2, 0.1), [1.0, 1.0, 1.0], &s).unwrap();
        assert!(!separated(&a.features(), &near.features()));
    }

    #[test]
    fn test_coplanar_triangles() {
        let t1 = Triangle::new(
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let t2 = Triangle::new(
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(2.0, 1.0, 0.0),
            Point3d::new(1.0, 2.0, 0.0),
        )
        .unwrap();
        assert!(separated(&t1.features(), &t2.features()));
        let t3 = Triangle::new(
            Point3d::new(0.2, 0.2, 0.0),
            Point3d::new(2.0, 0.2, 0.0),
            Point3d::new(0.2, 2.0, 0.0),
        )
        .unwrap();
        assert!(!separated(&t1.features(), &t3.features()));
    }
}
