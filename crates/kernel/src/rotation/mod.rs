//! Rotation representations: matrix, unit quaternion, axis-angle and the 24
//! Euler-angle conventions, with interpolation.
//!
//! [`Rotation`] is the canonical value. It is stored as a matrix in the
//! global frame, and equality is matrix equality so that the sign ambiguity
//! of quaternions and the undefined axis of the identity never produce a
//! false negative.

pub mod euler;
pub mod quaternion;

use std::ops::Mul;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::tolerance;

pub use euler::EulerConvention;
pub use quaternion::Quaternion;

/// Rounding floor for orthonormality checks, so a zero tolerance still
/// accepts matrices built with floating-point arithmetic.
const ORTHONORMAL_FLOOR: f64 = 1e-12;

/// Largest deviation of `m` from a proper rotation: entries of `mᵀm - I`
/// and `det(m) - 1`.
pub fn orthonormal_deviation(m: &Matrix3<f64>) -> f64 {
    let gram = m.transpose() * m - Matrix3::identity();
    let det = (m.determinant() - 1.0).abs();
    gram.amax().max(det)
}

pub(crate) fn validate_matrix(m: &Matrix3<f64>) -> Result<()> {
    let deviation = orthonormal_deviation(m);
    let limit = tolerance::current().epsilon.max(ORTHONORMAL_FLOOR);
    if deviation.is_finite() && deviation <= limit {
        Ok(())
    } else {
        Err(GeometryError::NotOrthonormal { deviation })
    }
}

/// Rotation by `angle` about one coordinate axis (0 = X, 1 = Y, 2 = Z).
pub(crate) fn elementary(axis: usize, angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    match axis {
        0 => Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c),
        1 => Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c),
        _ => Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0),
    }
}

/// An axis and an angle in radians. The axis is a unit vector in the global frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    pub axis: Vec3,
    pub angle: f64,
}

/// A proper rotation of 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    matrix: Matrix3<f64>,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Wrap a matrix, checking that it is orthonormal with determinant +1.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Result<Self> {
        validate_matrix(&matrix)?;
        Ok(Self { matrix })
    }

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self> {
        Self::from_matrix(Matrix3::from_fn(|r, c| rows[r][c]))
    }

    pub(crate) fn from_matrix_unchecked(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    /// Rodrigues' formula. The axis may be in any frame and need not be unit.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Result<Self> {
        let k = axis
            .to_global()
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "rotation axis" })?
            .coords();
        let (s, c) = angle.sin_cos();
        let cross = k.cross_matrix();
        let matrix = Matrix3::identity() * c + cross * s + (k * k.transpose()) * (1.0 - c);
        Ok(Self { matrix })
    }

    pub fn from_quaternion(q: &Quaternion) -> Self {
        Self {
            matrix: q.to_matrix(),
        }
    }

    pub fn from_euler(a1: f64, a2: f64, a3: f64, convention: EulerConvention) -> Self {
        Self {
            matrix: euler::compose(a1, a2, a3, convention),
        }
    }

    /// Rotation about the global X axis.
    pub fn about_x(angle: f64) -> Self {
        Self::from_matrix_unchecked(elementary(0, angle))
    }

    pub fn about_y(angle: f64) -> Self {
        Self::from_matrix_unchecked(elementary(1, angle))
    }

    pub fn about_z(angle: f64) -> Self {
        Self::from_matrix_unchecked(elementary(2, angle))
    }

    /// The minimal rotation taking direction `from` onto direction `to`.
    ///
    /// Opposite directions rotate by π about an arbitrary perpendicular axis.
    pub fn between(from: &Vec3, to: &Vec3) -> Result<Self> {
        let a = from
            .to_global()
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "direction" })?;
        let b = to
            .to_global()
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "direction" })?;
        let axis = a.cross(&b);
        let sin = axis.length();
        let cos = a.dot(&b);
        if tolerance::current().is_angle_zero(sin) {
            if cos > 0.0 {
                return Ok(Self::identity());
            }
            return Self::from_axis_angle(&a.orthogonal_unit(), std::f64::consts::PI);
        }
        Self::from_axis_angle(&axis, sin.atan2(cos))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_matrix(&self.matrix)
    }

    pub fn to_axis_angle(&self) -> AxisAngle {
        self.to_quaternion().to_axis_angle()
    }

    /// Angles `(a1, a2, a3)` such that `from_euler(a1, a2, a3, convention)`
    /// reproduces this rotation. At gimbal lock the last intrinsic angle is 0.
    pub fn to_euler(&self, convention: EulerConvention) -> [f64; 3] {
        euler::decompose(&self.matrix, convention)
    }

    /// Rotation angle in `[0, π]`.
    pub fn angle(&self) -> f64 {
        ((self.matrix.trace() - 1.0) * 0.5).clamp(-1.0, 1.0).acos()
    }

    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Rotation) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Spherical interpolation along the shorter arc.
    pub fn slerp(&self, other: &Rotation, t: f64) -> Self {
        let q = self.to_quaternion().slerp(&other.to_quaternion(), t);
        Self::from_quaternion(&q)
    }

    /// Rotate a vector. The result is expressed in the global frame.
    pub fn apply_vector(&self, v: &Vec3) -> Vec3 {
        Vec3::from_coords(self.matrix * v.to_global().coords(), FrameRef::Global)
    }

    /// Rotate a point about `center`. The result is expressed in the global frame.
    pub fn apply_point(&self, p: &Point3d, center: &Point3d) -> Point3d {
        let c = center.to_global().coords();
        let q = self.matrix * (p.to_global().coords() - c) + c;
        Point3d::from_coords(q, FrameRef::Global)
    }

    /// Matrix equality under the active tolerance (entries are dimensionless).
    pub fn equals(&self, other: &Rotation) -> bool {
        let diff = (self.matrix - other.matrix).amax();
        tolerance::current().is_angle_zero(diff)
    }
}

impl Mul for Rotation {
    type Output = Rotation;

    /// Matrix product: `a * b` applies `b` first.
    fn mul(self, rhs: Rotation) -> Rotation {
        Rotation {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
