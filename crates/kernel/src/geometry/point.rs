use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::motion::RigidMotion;
use super::vector::Vec3;
use crate::frame::{self, FrameRef};
use crate::tolerance;
use crate::traits::{Contains, Extent, Locate, Location, Mirror, Rigid};

/// A point in 3D Euclidean space, with coordinates expressed in `frame`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub frame: FrameRef,
}

impl Point3d {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        frame: FrameRef::Global,
    };

    /// A point in the global frame.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::in_frame(x, y, z, FrameRef::Global)
    }

    pub fn in_frame(x: f64, y: f64, z: f64, frame: FrameRef) -> Self {
        Self { x, y, z, frame }
    }

    pub fn from_coords(v: Vector3<f64>, frame: FrameRef) -> Self {
        Self::in_frame(v.x, v.y, v.z, frame)
    }

    /// Coordinates in this point's own frame.
    pub fn coords(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Position vector from the origin of this point's frame.
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::in_frame(self.x, self.y, self.z, self.frame)
    }

    pub fn to_global(&self) -> Point3d {
        self.convert_to(FrameRef::Global)
    }

    /// Same point with coordinates expressed in `target`.
    pub fn convert_to(&self, target: FrameRef) -> Point3d {
        if self.frame == target {
            return *self;
        }
        let global = frame::placement(self.frame).apply_point(&self.coords());
        let local = frame::placement(target).inverse_point(&global);
        Point3d::from_coords(local, target)
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        (*self - *other).length_squared()
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        self.lerp(other, 0.5)
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }

    /// Equality under the active tolerance; the reference magnitude is the
    /// larger distance of the two points from the global origin.
    pub fn equals(&self, other: &Self) -> bool {
        let (a, b) = (self.to_global(), other.to_global());
        let scale = a.coords().norm().max(b.coords().norm());
        tolerance::current().is_zero((a - b).length(), scale)
    }

    /// True when the point lies in `shape` or on its boundary.
    pub fn belongs_to<S: Contains>(&self, shape: &S) -> bool {
        shape.contains_point(self)
    }

    pub fn is_inside<S: Locate>(&self, shape: &S) -> bool {
        shape.locate(self) == Location::Inside
    }

    pub fn is_outside<S: Locate>(&self, shape: &S) -> bool {
        shape.locate(self) == Location::Outside
    }

    pub fn is_on_boundary<S: Locate>(&self, shape: &S) -> bool {
        shape.locate(self) == Location::Boundary
    }
}

impl Rigid for Point3d {
    fn transformed(&self, motion: &RigidMotion) -> Self {
        motion.apply_point(self)
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Point3d::convert_to(self, frame)
    }
}

impl Mirror for Point3d {
    fn reflection(&self) -> RigidMotion {
        RigidMotion::point_reflection(self)
    }
}

impl Extent for Point3d {
    fn size(&self) -> f64 {
        0.0
    }
}

impl Contains for Point3d {
    fn contains_point(&self, point: &Point3d) -> bool {
        self.equals(point)
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, rhs: Vec3) -> Self::Output {
        let v = rhs.convert_to(self.frame);
        Point3d::in_frame(self.x + v.x, self.y + v.y, self.z + v.z, self.frame)
    }
}

impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        let p = rhs.convert_to(self.frame);
        Vec3::in_frame(self.x - p.x, self.y - p.y, self.z - p.z, self.frame)
    }
}

impl Sub<Vec3> for Point3d {
    type Output = Point3d;
    fn sub(self, rhs: Vec3) -> Self::Output {
        self + (-rhs)
    }
}

impl approx::AbsDiffEq for Point3d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    /// Compares global coordinates.
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        let (a, b) = (self.to_global(), other.to_global());
        (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon && (a.z - b.z).abs() <= epsilon
    }
}
