use std::ops::Mul;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use super::{AxisAngle, Rotation};
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::geometry::vector::Vec3;

/// Below this sine the two quaternions of a SLERP are treated as identical
/// and interpolated linearly.
const SLERP_LINEAR_BELOW: f64 = 1e-6;

/// A unit quaternion `w + xi + yj + zk`.
///
/// `q` and `-q` denote the same rotation; compare rotations with
/// [`Quaternion::equals`] rather than component by component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    pub const fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Build a quaternion, normalising the components.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Result<Self> {
        Self::normalize_raw(w, x, y, z).ok_or(GeometryError::ZeroQuaternion)
    }

    fn normalize_raw(w: f64, x: f64, y: f64, z: f64) -> Option<Self> {
        let n = (w * w + x * x + y * y + z * z).sqrt();
        if n.is_finite() && n > 0.0 {
            Some(Self {
                w: w / n,
                x: x / n,
                y: y / n,
                z: z / n,
            })
        } else {
            None
        }
    }

    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Result<Self> {
        let k = axis
            .to_global()
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "rotation axis" })?;
        let (s, c) = (angle * 0.5).sin_cos();
        Ok(Self {
            w: c,
            x: k.x * s,
            y: k.y * s,
            z: k.z * s,
        })
    }

    /// Convert a rotation matrix, branching on the largest of the trace and
    /// the diagonal so the divisor is never small.
    pub fn from_matrix(m: &Matrix3<f64>) -> Self {
        let (m00, m11, m22) = (m[(0, 0)], m[(1, 1)], m[(2, 2)]);
        let trace = m00 + m11 + m22;
        let (w, x, y, z) = if trace >= m00 && trace >= m11 && trace >= m22 {
            let s = (1.0 + trace).sqrt() * 2.0;
            (
                0.25 * s,
                (m[(2, 1)] - m[(1, 2)]) / s,
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(1, 0)] - m[(0, 1)]) / s,
            )
        } else if m00 >= m11 && m00 >= m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            (
                (m[(2, 1)] - m[(1, 2)]) / s,
                0.25 * s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
            )
        } else if m11 >= m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            (
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                0.25 * s,
                (m[(1, 2)] + m[(2, 1)]) / s,
            )
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            (
                (m[(1, 0)] - m[(0, 1)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                0.25 * s,
            )
        };
        Self::normalize_raw(w, x, y, z).unwrap_or_default()
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    pub fn to_matrix(&self) -> Matrix3<f64> {
        let Self { w, x, y, z } = *self;
        Matrix3::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        )
    }

    pub fn to_rotation(&self) -> Rotation {
        Rotation::from_quaternion(self)
    }

    /// Axis and angle with the angle in `[0, π]`. The identity reports the X axis.
    pub fn to_axis_angle(&self) -> AxisAngle {
        let q = if self.w < 0.0 { self.negated() } else { *self };
        let n = (q.x * q.x + q.y * q.y + q.z * q.z).sqrt();
        if n <= f64::MIN_POSITIVE {
            return AxisAngle {
                axis: Vec3::X,
                angle: 0.0,
            };
        }
        AxisAngle {
            axis: Vec3::in_frame(q.x / n, q.y / n, q.z / n, FrameRef::Global),
            angle: 2.0 * n.atan2(q.w),
        }
    }

    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    pub fn negated(&self) -> Self {
        Self {
            w: -self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Rotate a vector; the result is in the global frame.
    pub fn rotate_vector(&self, v: &Vec3) -> Vec3 {
        Rotation::from_quaternion(self).apply_vector(v)
    }

    /// Spherical linear interpolation along the shorter arc.
    ///
    /// Returns exactly `self` at `t = 0` and exactly `other` at `t = 1`.
    pub fn slerp(&self, other: &Quaternion, t: f64) -> Quaternion {
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *other;
        }
        let mut cos = self.dot(other);
        let mut end = *other;
        if cos < 0.0 {
            cos = -cos;
            end = other.negated();
        }
        let theta = cos.min(1.0).acos();
        let sin = theta.sin();
        let (ka, kb) = if sin <= SLERP_LINEAR_BELOW {
            (1.0 - t, t)
        } else {
            (((1.0 - t) * theta).sin() / sin, (t * theta).sin() / sin)
        };
        Self::normalize_raw(
            ka * self.w + kb * end.w,
            ka * self.x + kb * end.x,
            ka * self.y + kb * end.y,
            ka * self.z + kb * end.z,
        )
        .unwrap_or(*self)
    }

    /// Rotation-level equality: `q` and `-q` compare equal.
    pub fn equals(&self, other: &Quaternion) -> bool {
        self.to_rotation().equals(&other.to_rotation())
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    /// Hamilton product: `a * b` applies `b` first.
    fn mul(self, b: Quaternion) -> Quaternion {
        let a = self;
        Self::normalize_raw(
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        )
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_new_normalizes() {
        let q = Quaternion::new(2.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(q, Quaternion::identity());
        assert!(matches!(
            Quaternion::new(0.0, 0.0, 0.0, 0.0),
            Err(GeometryError::ZeroQuaternion)
        ));
    }

    #[test]
    fn test_matrix_round_trip_all_branches() {
        // Each rotation exercises a different largest-diagonal branch.
        for r in [
            Rotation::about_x(0.2),
            Rotation::about_x(3.0),
            Rotation::about_y(3.0),
            Rotation::about_z(3.0),
        ] {
            let q = r.to_quaternion();
            assert!(Rotation::from_quaternion(&q).equals(&r));
        }
    }

    #[test]
    fn test_axis_angle_identity_reports_x() {
        let aa = Quaternion::identity().to_axis_angle();
        assert_eq!(aa.angle, 0.0);
        assert_eq!(aa.axis, Vec3::X);
    }

    #[test]
    fn test_axis_angle_canonical_sign() {
        let q = Quaternion::from_axis_angle(&Vec3::Y, 1.2).unwrap().negated();
        let aa = q.to_axis_angle();
        assert!((aa.angle - 1.2).abs() < 1e-12);
        assert!((aa.axis.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_half_turn_either_sign() {
        let q = Quaternion::from_axis_angle(&Vec3::Z, PI).unwrap();
        assert!(q.equals(&q.negated()));
        let aa = q.to_axis_angle();
        assert!((aa.angle - PI).abs() < 1e-12);
    }

    #[test]
    fn test_product_composes() {
        let a = Quaternion::from_axis_angle(&Vec3::X, 0.4).unwrap();
        let b = Quaternion::from_axis_angle(&Vec3::Z, -0.9).unwrap();
        let r = (a * b).to_rotation();
        let expected = a.to_rotation() * b.to_rotation();
        assert!(r.equals(&expected));
        assert!((a * a.conjugate()).equals(&Quaternion::identity()));
    }

    #[test]
    fn test_slerp_exact_endpoints() {
        let a = Quaternion::from_axis_angle(&Vec3::X, 0.3).unwrap();
        let b = Quaternion::from_axis_angle(&Vec3::Y, 2.5).unwrap().negated();
        assert_eq!(a.slerp(&b, 0.0), a);
        assert_eq!(a.slerp(&b, 1.0), b);
    }

    #[test]
    fn test_slerp_shorter_arc() {
        let a = Quaternion::identity();
        let b = Quaternion::from_axis_angle(&Vec3::Z, FRAC_PI_2).unwrap().negated();
        let mid = a.slerp(&b, 0.5).to_rotation();
        assert!(mid.equals(&Rotation::about_z(FRAC_PI_2 / 2.0)));
    }

    #[test]
    fn test_slerp_nearly_identical_is_finite() {
        let a = Quaternion::from_axis_angle(&Vec3::X, 1.0).unwrap();
        let b = Quaternion::from_axis_angle(&Vec3::X, 1.0 + 1e-12).unwrap();
        let m = a.slerp(&b, 0.5);
        assert!(m.to_array().iter().all(|c| c.is_finite()));
        assert!(m.equals(&a));
    }
}
