//! The 24 Euler-angle conventions: 12 axis sequences, each intrinsic
//! (rotating axes) or extrinsic (fixed axes).
//!
//! Intrinsic `(i, j, k)` with angles `(a, b, c)` is `R_i(a) R_j(b) R_k(c)`.
//! Extrinsic `(i, j, k)` with `(a, b, c)` is `R_k(c) R_j(b) R_i(a)`, which is
//! intrinsic `(k, j, i)` with `(c, b, a)`.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::elementary;
use crate::tolerance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EulerConvention {
    IntrinsicXYZ,
    IntrinsicXZY,
    IntrinsicYXZ,
    IntrinsicYZX,
    IntrinsicZXY,
    IntrinsicZYX,
    IntrinsicXYX,
    IntrinsicXZX,
    IntrinsicYXY,
    IntrinsicYZY,
    IntrinsicZXZ,
    IntrinsicZYZ,
    ExtrinsicXYZ,
    ExtrinsicXZY,
    ExtrinsicYXZ,
    ExtrinsicYZX,
    ExtrinsicZXY,
    ExtrinsicZYX,
    ExtrinsicXYX,
    ExtrinsicXZX,
    ExtrinsicYXY,
    ExtrinsicYZY,
    ExtrinsicZXZ,
    ExtrinsicZYZ,
}

impl EulerConvention {
    pub const ALL: [EulerConvention; 24] = [
        Self::IntrinsicXYZ,
        Self::IntrinsicXZY,
        Self::IntrinsicYXZ,
        Self::IntrinsicYZX,
        Self::IntrinsicZXY,
        Self::IntrinsicZYX,
        Self::IntrinsicXYX,
        Self::IntrinsicXZX,
        Self::IntrinsicYXY,
        Self::IntrinsicYZY,
        Self::IntrinsicZXZ,
        Self::IntrinsicZYZ,
        Self::ExtrinsicXYZ,
        Self::ExtrinsicXZY,
        Self::ExtrinsicYXZ,
        Self::ExtrinsicYZX,
        Self::ExtrinsicZXY,
        Self::ExtrinsicZYX,
        Self::ExtrinsicXYX,
        Self::ExtrinsicXZX,
        Self::ExtrinsicYXY,
        Self::ExtrinsicYZY,
        Self::ExtrinsicZXZ,
        Self::ExtrinsicZYZ,
    ];

    /// Axis sequence in the order the angles are supplied (0 = X, 1 = Y, 2 = Z).
    pub fn axes(&self) -> [usize; 3] {
        use EulerConvention::*;
        match self {
            IntrinsicXYZ | ExtrinsicXYZ => [0, 1, 2],
            IntrinsicXZY | ExtrinsicXZY => [0, 2, 1],
            IntrinsicYXZ | ExtrinsicYXZ => [1, 0, 2],
            IntrinsicYZX | ExtrinsicYZX => [1, 2, 0],
            IntrinsicZXY | ExtrinsicZXY => [2, 0, 1],
            IntrinsicZYX | ExtrinsicZYX => [2, 1, 0],
            IntrinsicXYX | ExtrinsicXYX => [0, 1, 0],
            IntrinsicXZX | ExtrinsicXZX => [0, 2, 0],
            IntrinsicYXY | ExtrinsicYXY => [1, 0, 1],
            IntrinsicYZY | ExtrinsicYZY => [1, 2, 1],
            IntrinsicZXZ | ExtrinsicZXZ => [2, 0, 2],
            IntrinsicZYZ | ExtrinsicZYZ => [2, 1, 2],
        }
    }

    pub fn is_intrinsic(&self) -> bool {
        Self::ALL[..12].contains(self)
    }

    /// Proper Euler (first and last axis equal) rather than Tait-Bryan.
    pub fn is_proper(&self) -> bool {
        let [a, _, c] = self.axes();
        a == c
    }
}

pub(crate) fn compose(a1: f64, a2: f64, a3: f64, convention: EulerConvention) -> Matrix3<f64> {
    let [i, j, k] = convention.axes();
    if convention.is_intrinsic() {
        elementary(i, a1) * elementary(j, a2) * elementary(k, a3)
    } else {
        elementary(k, a3) * elementary(j, a2) * elementary(i, a1)
    }
}

pub(crate) fn decompose(m: &Matrix3<f64>, convention: EulerConvention) -> [f64; 3] {
    let [i, j, k] = convention.axes();
    if convention.is_intrinsic() {
        intrinsic_angles(m, [i, j, k])
    } else {
        let [c, b, a] = intrinsic_angles(m, [k, j, i]);
        [a, b, c]
    }
}

/// Two-stage extraction: the last angle from the row of the first axis,
/// then the first two from the matrix with the last rotation removed.
fn intrinsic_angles(m: &Matrix3<f64>, [i, j, last]: [usize; 3]) -> [f64; 3] {
    let k = 3 - i - j;
    let s = if j == (i + 1) % 3 { 1.0 } else { -1.0 };
    let tol = tolerance::current();

    let (h, y, x) = if last == i {
        let (rij, rik) = (m[(i, j)], m[(i, k)]);
        (rij.hypot(rik), rij, s * rik)
    } else {
        let (rii, rij) = (m[(i, i)], m[(i, j)]);
        (rii.hypot(rij), -s * rij, rii)
    };
    let c = if tol.is_angle_zero(h) {
        debug!(axes = ?[i, j, last], "gimbal lock, last angle fixed to zero");
        0.0
    } else {
        y.atan2(x)
    };

    let r = m * elementary(last, c).transpose();
    let a = (s * r[(k, j)]).atan2(r[(j, j)]);
    let b = (s * r[(i, k)]).atan2(r[(i, i)]);
    [a, b, c]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Rotation;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_extrinsic_is_reversed_intrinsic() {
        let e = compose(0.1, 0.2, 0.3, EulerConvention::ExtrinsicXYZ);
        let i = compose(0.3, 0.2, 0.1, EulerConvention::IntrinsicZYX);
        assert!((e - i).amax() < 1e-15);
    }

    #[test]
    fn test_known_angles_recovered() {
        for conv in EulerConvention::ALL {
            let angles = if conv.is_proper() { [0.4, 1.1, -0.7] } else { [0.4, -0.6, 1.3] };
            let r = Rotation::from_euler(angles[0], angles[1], angles[2], conv);
            let got = r.to_euler(conv);
            for (g, a) in got.iter().zip(angles) {
                assert!((g - a).abs() < 1e-12, "{conv:?}: {got:?} vs {angles:?}");
            }
        }
    }

    #[test]
    fn test_gimbal_lock_round_trip() {
        for conv in EulerConvention::ALL {
            let middle = if conv.is_proper() { 0.0 } else { FRAC_PI_2 };
            let r = Rotation::from_euler(0.5, middle, 0.25, conv);
            let [a, b, c] = r.to_euler(conv);
            let back = Rotation::from_euler(a, b, c, conv);
            assert!(back.equals(&r), "{conv:?} failed at gimbal lock");
            let canonical = if conv.is_intrinsic() { c } else { a };
            assert_eq!(canonical, 0.0, "{conv:?}");
        }
    }

    #[test]
    fn test_classification() {
        assert!(EulerConvention::IntrinsicZYZ.is_proper());
        assert!(!EulerConvention::ExtrinsicZYX.is_proper());
        assert!(EulerConvention::IntrinsicZYZ.is_intrinsic());
        assert!(!EulerConvention::ExtrinsicXYX.is_intrinsic());
        assert_eq!(EulerConvention::ALL.len(), 24);
    }
}
