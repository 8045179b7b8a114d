//! Helper functions: error type, shape fixtures, tolerance scoping.

use geom_kernel::tolerance::{self, Tolerance};
use geom_kernel::{Box3d, GeometryError, Point3d, Sphere, Tetrahedron};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("construction failed: {0}")]
    Construction(#[from] GeometryError),

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

// ── Fixtures ────────────────────────────────────────────────────────────────

/// Axis-aligned unit cube centred at `(x, 0, 0)`.
pub fn unit_cube_at(x: f64) -> Result<Box3d, HarnessError> {
    Ok(Box3d::new(Point3d::new(x, 0.0, 0.0), 1.0, 1.0, 1.0)?)
}

/// Box centred at `(1, 1, 1)` with edges 8 × 6 × 10.
pub fn reference_box() -> Result<Box3d, HarnessError> {
    Ok(Box3d::new(Point3d::new(1.0, 1.0, 1.0), 8.0, 6.0, 10.0)?)
}

/// Two radius-5 spheres whose surfaces cross in a circle of radius 3.5.
pub fn crossing_spheres() -> Result<(Sphere, Sphere), HarnessError> {
    Ok((
        Sphere::new(Point3d::new(-2.0, 2.0, 4.0), 5.0)?,
        Sphere::new(Point3d::new(3.0, 7.0, 3.0), 5.0)?,
    ))
}

/// Two tetrahedra whose nearest vertices are `(0, 0, 0)` and `(0.5, 0, 0)`.
pub fn facing_tetrahedra() -> Result<(Tetrahedron, Tetrahedron), HarnessError> {
    let left = Tetrahedron::new(
        Point3d::new(0.0, 0.0, 0.0),
        Point3d::new(-1.0, 1.0, 0.0),
        Point3d::new(-1.0, -1.0, 1.0),
        Point3d::new(-1.0, -1.0, -1.0),
    )?;
    let right = Tetrahedron::new(
        Point3d::new(0.5, 0.0, 0.0),
        Point3d::new(1.5, 1.0, 0.0),
        Point3d::new(1.5, -1.0, 1.0),
        Point3d::new(1.5, -1.0, -1.0),
    )?;
    Ok((left, right))
}

/// Run `f` under `policy`, restoring the previous policy afterwards.
pub fn with_tolerance<R>(policy: Tolerance, f: impl FnOnce() -> R) -> R {
    let previous = tolerance::set(policy);
    let out = f();
    tolerance::set(previous);
    out
}

/// Format a point for diagnostics.
pub fn fmt_point(p: &Point3d) -> String {
    let [x, y, z] = p.to_global().to_array();
    format!("({:.6}, {:.6}, {:.6})", x, y, z)
}
