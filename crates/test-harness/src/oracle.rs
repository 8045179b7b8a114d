//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use geom_kernel::prelude::*;
use geom_kernel::{ConvexPolytope, EulerConvention, FrameRef, Point3d, Rotation, tolerance};

use crate::helpers::fmt_point;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }

    fn from_check(name: &str, passed: bool, detail: String, value: f64) -> Self {
        if passed {
            Self::pass_val(name, detail, value)
        } else {
            Self::fail_val(name, detail, value)
        }
    }
}

// ── Distance Oracles ────────────────────────────────────────────────────────

/// Check `distance(a, b) == distance(b, a)` within the active tolerance.
pub fn check_distance_symmetry<A, B>(a: &A, b: &B) -> OracleVerdict
where
    A: DistanceTo<B> + Extent,
    B: DistanceTo<A> + Extent,
{
    let ab = a.distance_to(b);
    let ba = b.distance_to(a);
    let scale = a.size().max(b.size());
    let passed = tolerance::current().almost_equal(ab, ba, scale);
    OracleVerdict::from_check(
        "distance_symmetry",
        passed,
        format!("d(a,b) = {:.12}, d(b,a) = {:.12}", ab, ba),
        (ab - ba).abs(),
    )
}

/// Check that the witnesses lie on their shapes and realise the distance.
pub fn check_witnesses<A, B>(a: &A, b: &B) -> OracleVerdict
where
    A: DistanceTo<B> + Contains,
    B: Contains,
{
    let (p, q) = a.closest_points(b);
    let d = a.distance_to(b);
    let mut problems = Vec::new();
    if !a.contains_point(&p) {
        problems.push(format!("first witness {} is not on the first shape", fmt_point(&p)));
    }
    if !b.contains_point(&q) {
        problems.push(format!("second witness {} is not on the second shape", fmt_point(&q)));
    }
    let gap = p.distance_to(&q);
    if !tolerance::current().almost_equal(gap, d, d) {
        problems.push(format!("witness gap {:.12} differs from distance {:.12}", gap, d));
    }
    if problems.is_empty() {
        OracleVerdict::pass_val("witnesses", format!("{} -> {}", fmt_point(&p), fmt_point(&q)), d)
    } else {
        OracleVerdict::fail_val("witnesses", problems.join("; "), d)
    }
}

/// Check `intersects(a, b) == (distance(a, b) == 0)`.
pub fn check_intersects_consistency<A, B>(a: &A, b: &B) -> OracleVerdict
where
    A: DistanceTo<B> + Intersects<B>,
{
    let d = a.distance_to(b);
    let hit = a.intersects(b);
    OracleVerdict::from_check(
        "intersects_consistency",
        hit == (d == 0.0),
        format!("intersects = {}, distance = {:.12}", hit, d),
        d,
    )
}

// ── Rotation Oracles ────────────────────────────────────────────────────────

/// Check that a rotation survives the trip through a unit quaternion.
pub fn check_quaternion_round_trip(rotation: &Rotation) -> OracleVerdict {
    let q = rotation.to_quaternion();
    let back = Rotation::from_quaternion(&q);
    let deviation = (rotation.matrix() - back.matrix()).amax();
    OracleVerdict::from_check(
        "quaternion_round_trip",
        rotation.equals(&back),
        format!("q = {:?}, max matrix deviation {:.3e}", q.to_array(), deviation),
        deviation,
    )
}

/// Check that a rotation survives extraction into `convention` and back.
pub fn check_euler_round_trip(rotation: &Rotation, convention: EulerConvention) -> OracleVerdict {
    let angles = rotation.to_euler(convention);
    let back = Rotation::from_euler(angles[0], angles[1], angles[2], convention);
    let deviation = (rotation.matrix() - back.matrix()).amax();
    OracleVerdict::from_check(
        "euler_round_trip",
        rotation.equals(&back),
        format!("{:?}: angles {:?}, max matrix deviation {:.3e}", convention, angles, deviation),
        deviation,
    )
}

/// Euler round trip over all 24 conventions.
pub fn check_all_euler_conventions(rotation: &Rotation) -> Vec<OracleVerdict> {
    EulerConvention::ALL
        .iter()
        .map(|c| check_euler_round_trip(rotation, *c))
        .collect()
}

// ── Frame and Motion Oracles ────────────────────────────────────────────────

/// Check that converting `point` into `frame` and back is the identity.
pub fn check_frame_round_trip(point: &Point3d, frame: FrameRef) -> OracleVerdict {
    let local = point.convert_to(frame);
    let back = local.to_global();
    let passed = back.equals(&point.to_global());
    let drift = back.distance_to(point);
    let detail = format!("{} -> {}", fmt_point(point), fmt_point(&back));
    OracleVerdict::from_check("frame_round_trip", passed, detail, drift)
}

/// Check that reflecting `point` twice in `mirror` returns it.
pub fn check_reflection_idempotent<M: Mirror>(point: &Point3d, mirror: &M) -> OracleVerdict {
    let once = point.reflect_in(mirror);
    let twice = once.reflect_in(mirror);
    let drift = twice.distance_to(point);
    OracleVerdict::from_check(
        "reflection_idempotent",
        twice.equals(point),
        format!("{} -> {} -> {}", fmt_point(point), fmt_point(&once), fmt_point(&twice)),
        drift,
    )
}

// ── Containment Oracles ─────────────────────────────────────────────────────

/// Check that `shape` classifies `point` as `expected`.
pub fn check_location<S: Locate>(shape: &S, point: &Point3d, expected: Location) -> OracleVerdict {
    let actual = shape.locate(point);
    if actual == expected {
        OracleVerdict::pass("location", format!("{} is {:?}", fmt_point(point), actual))
    } else {
        OracleVerdict::fail(
            "location",
            format!("{} is {:?}, expected {:?}", fmt_point(point), actual, expected),
        )
    }
}

// ── Polytope Oracles ────────────────────────────────────────────────────────

/// Check that every vertex lies on the non-positive side of every face plane.
pub fn check_polytope_convexity(polytope: &ConvexPolytope) -> OracleVerdict {
    let vertices = polytope.global_vertices();
    let scale = polytope.size();
    let tol = tolerance::current();
    let mut worst = f64::NEG_INFINITY;
    let mut offender = None;
    for f in 0..polytope.faces().len() {
        let Some(face) = polytope.face(f) else {
            continue;
        };
        let anchor = face.vertices()[0];
        let normal = face.normal();
        for (v, p) in vertices.iter().enumerate() {
            let height = (*p - anchor).dot(&normal);
            if height > worst {
                worst = height;
                if height > tol.threshold(scale) {
                    offender = Some((v, f));
                }
            }
        }
    }
    match offender {
        None => OracleVerdict::pass_val(
            "polytope_convexity",
            format!("{} faces, largest height {:.3e}", polytope.faces().len(), worst),
            worst,
        ),
        Some((v, f)) => OracleVerdict::fail_val(
            "polytope_convexity",
            format!("vertex {} lies {:.3e} outside face {}", v, worst, f),
            worst,
        ),
    }
}

/// Check Euler's formula V - E + F = 2 for a polytope.
pub fn check_euler_formula(polytope: &ConvexPolytope) -> OracleVerdict {
    let v = polytope.vertices().len() as i64;
    let e = polytope.edges().len() as i64;
    let f = polytope.faces().len() as i64;
    let euler = v - e + f;
    if euler == 2 {
        OracleVerdict::pass_val(
            "euler_formula",
            format!("V({}) - E({}) + F({}) = 2", v, e, f),
            euler as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "euler_formula",
            format!("V({}) - E({}) + F({}) = {} (expected 2)", v, e, f, euler),
            euler as f64,
        )
    }
}
