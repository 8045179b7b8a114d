use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::motion::RigidMotion;
use crate::frame::{self, FrameRef};
use crate::tolerance;
use crate::traits::{Attitude, Oriented, Rigid};

/// A free vector whose components are expressed in `frame`.
///
/// Binary operations convert the right-hand operand into the left-hand
/// operand's frame, so mixing frames is safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub frame: FrameRef,
}

impl Vec3 {
    pub const ZERO: Self = Self::global(0.0, 0.0, 0.0);
    pub const X: Self = Self::global(1.0, 0.0, 0.0);
    pub const Y: Self = Self::global(0.0, 1.0, 0.0);
    pub const Z: Self = Self::global(0.0, 0.0, 1.0);

    const fn global(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            frame: FrameRef::Global,
        }
    }

    /// A vector in the global frame.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::global(x, y, z)
    }

    pub fn in_frame(x: f64, y: f64, z: f64, frame: FrameRef) -> Self {
        Self { x, y, z, frame }
    }

    pub fn from_coords(v: Vector3<f64>, frame: FrameRef) -> Self {
        Self::in_frame(v.x, v.y, v.z, frame)
    }

    /// Components in this vector's own frame.
    pub fn coords(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_global(&self) -> Vec3 {
        self.convert_to(FrameRef::Global)
    }

    /// Same vector with components expressed in `target`.
    pub fn convert_to(&self, target: FrameRef) -> Vec3 {
        if self.frame == target {
            return *self;
        }
        let global = frame::placement(self.frame).apply_vector(&self.coords());
        let local = frame::placement(target).inverse_vector(&global);
        Vec3::from_coords(local, target)
    }

    /// `other` expressed in this vector's frame.
    fn aligned(&self, other: &Vec3) -> Vec3 {
        other.convert_to(self.frame)
    }

    pub fn dot(&self, other: &Self) -> f64 {
        let o = self.aligned(other);
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        let o = self.aligned(other);
        Self {
            x: self.y * o.z - self.z * o.y,
            y: self.z * o.x - self.x * o.z,
            z: self.x * o.y - self.y * o.x,
            frame: self.frame,
        }
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if len < 1e-15 || !len.is_finite() {
            None
        } else {
            Some(*self / len)
        }
    }

    /// Angle in `[0, π]`; zero when either vector is zero.
    pub fn angle_between(&self, other: &Self) -> f64 {
        let c = self.cross(other).length();
        let d = self.dot(other);
        if c == 0.0 && d == 0.0 {
            return 0.0;
        }
        c.atan2(d)
    }

    pub fn project_onto(&self, other: &Self) -> Self {
        let denom = other.length_squared();
        if denom < 1e-30 {
            return Self::in_frame(0.0, 0.0, 0.0, self.frame);
        }
        self.aligned(other) * (self.dot(other) / denom)
    }

    /// Mirror about the plane with the given unit normal.
    pub fn reflect(&self, normal: &Self) -> Self {
        let n = self.aligned(normal);
        *self - n * (2.0 * self.dot(&n))
    }

    /// Scalar triple product `self · (b × c)`.
    pub fn triple(&self, b: &Self, c: &Self) -> f64 {
        self.dot(&b.cross(c))
    }

    /// Some unit vector perpendicular to this one, in the same frame.
    pub fn orthogonal_unit(&self) -> Self {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        let helper = if ax <= ay && ax <= az {
            Self::in_frame(1.0, 0.0, 0.0, self.frame)
        } else if ay <= az {
            Self::in_frame(0.0, 1.0, 0.0, self.frame)
        } else {
            Self::in_frame(0.0, 0.0, 1.0, self.frame)
        };
        self.cross(&helper)
            .normalized()
            .unwrap_or(Self::in_frame(1.0, 0.0, 0.0, self.frame))
    }

    /// Equality under the active tolerance; the reference magnitude is the
    /// larger of the two lengths.
    pub fn equals(&self, other: &Self) -> bool {
        let scale = self.length().max(other.length());
        let diff = (*self - *other).length();
        tolerance::current().is_zero(diff, scale)
    }
}

impl Rigid for Vec3 {
    /// Free vectors ignore the translational part of a motion.
    fn transformed(&self, motion: &RigidMotion) -> Self {
        motion.apply_vector(self)
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Vec3::convert_to(self, frame)
    }
}

impl Oriented for Vec3 {
    fn attitude(&self) -> Attitude {
        Attitude::Vector(*self)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Self) -> Self::Output {
        let o = self.aligned(&rhs);
        Vec3::in_frame(self.x + o.x, self.y + o.y, self.z + o.z, self.frame)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        let o = self.aligned(&rhs);
        Vec3::in_frame(self.x - o.x, self.y - o.y, self.z - o.z, self.frame)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Self::Output {
        Vec3::in_frame(self.x * rhs, self.y * rhs, self.z * rhs, self.frame)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f64) -> Self::Output {
        Vec3::in_frame(self.x / rhs, self.y / rhs, self.z / rhs, self.frame)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Self::Output {
        Vec3::in_frame(-self.x, -self.y, -self.z, self.frame)
    }
}

impl approx::AbsDiffEq for Vec3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    /// Compares global components.
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        let (a, b) = (self.to_global(), other.to_global());
        (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon && (a.z - b.z).abs() <= epsilon
    }
}
