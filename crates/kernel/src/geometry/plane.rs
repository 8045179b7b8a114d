use serde::{Deserialize, Serialize};

use super::motion::RigidMotion;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::tolerance;
use crate::traits::{Attitude, Contains, Extent, Flat, Mirror, Oriented, Rigid};

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    point: Point3d,
    normal: Vec3,
}

impl Plane {
    pub fn new(point: Point3d, normal: Vec3) -> Result<Self> {
        let normal = normal
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "plane normal" })?;
        Ok(Self { point, normal })
    }

    pub(crate) fn from_unit(point: Point3d, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// The XY plane through the global origin.
    pub fn xy() -> Self {
        Self::from_unit(Point3d::ORIGIN, Vec3::Z)
    }

    pub fn xz() -> Self {
        Self::from_unit(Point3d::ORIGIN, Vec3::Y)
    }

    pub fn yz() -> Self {
        Self::from_unit(Point3d::ORIGIN, Vec3::X)
    }

    pub fn point(&self) -> Point3d {
        self.point
    }

    /// Unit normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance of `p`, positive on the side the normal points to.
    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        (*p - self.point).dot(&self.normal)
    }

    /// Orthogonal projection of `p`, in the global frame.
    pub fn project_point(&self, p: &Point3d) -> Point3d {
        let p = p.to_global();
        p - self.normal.to_global() * self.signed_distance(&p)
    }

    /// Same plane, with either normal orientation.
    pub fn equals(&self, other: &Plane) -> bool {
        self.is_parallel_to(other) && self.contains_point(&other.point)
    }
}

impl Rigid for Plane {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self::from_unit(m.apply_point(&self.point), m.apply_vector(&self.normal))
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self::from_unit(self.point.convert_to(frame), self.normal.convert_to(frame))
    }
}

impl Mirror for Plane {
    fn reflection(&self) -> RigidMotion {
        RigidMotion::plane_reflection(&self.point, &self.normal)
    }
}

impl Extent for Plane {
    fn size(&self) -> f64 {
        f64::INFINITY
    }
}

impl Contains for Plane {
    /// The offset from the plane's anchor is the reference magnitude.
    fn contains_point(&self, p: &Point3d) -> bool {
        let reach = (*p - self.point).length();
        tolerance::current().is_zero(self.signed_distance(p), reach)
    }
}

impl Oriented for Plane {
    fn attitude(&self) -> Attitude {
        Attitude::Planar(self.normal)
    }
}

impl Flat for Plane {
    fn anchor(&self) -> Point3d {
        self.point
    }
}
