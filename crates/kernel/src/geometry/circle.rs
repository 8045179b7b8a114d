use serde::{Deserialize, Serialize};

use super::motion::RigidMotion;
use super::plane::Plane;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::tolerance;
use crate::traits::{Attitude, Extent, Flat, Locate, Location, Oriented, Rigid};

/// A circle in 3D: center, unit normal and radius.
///
/// As a region it is the closed disc it bounds; distance, containment and
/// most intersections treat it that way.
/// `intersects` always uses the disc, while `intersection_with` between two
/// coplanar circles compares their rims, so the two can disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle3d {
    center: Point3d,
    normal: Vec3,
    radius: f64,
}

impl Circle3d {
    pub fn new(center: Point3d, normal: Vec3, radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::NonPositive {
                what: "radius",
                value: radius,
            });
        }
        let normal = normal
            .normalized()
            .ok_or(GeometryError::ZeroLength { what: "circle normal" })?;
        Ok(Self {
            center,
            normal,
            radius,
        })
    }

    pub(crate) fn from_parts(center: Point3d, normal: Vec3, radius: f64) -> Self {
        Self {
            center,
            normal,
            radius,
        }
    }

    pub fn center(&self) -> Point3d {
        self.center
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius
    }

    pub fn plane(&self) -> Plane {
        Plane::from_unit(self.center, self.normal)
    }

    /// Orthonormal in-plane basis `(u, v)` with `u × v = normal`, global frame.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let n = self.normal.to_global();
        let u = n.orthogonal_unit();
        (u, n.cross(&u))
    }

    /// Point on the rim at `angle` measured from the first basis vector.
    pub fn point_at(&self, angle: f64) -> Point3d {
        let (u, v) = self.basis();
        let (s, c) = angle.sin_cos();
        self.center.to_global() + (u * c + v * s) * self.radius
    }

    /// Same center, radius and plane; the reference magnitude is the larger radius.
    pub fn equals(&self, other: &Circle3d) -> bool {
        let scale = self.radius.max(other.radius);
        let tol = tolerance::current();
        tol.is_zero((self.center - other.center).length(), scale)
            && tol.almost_equal(self.radius, other.radius, scale)
            && self.is_parallel_to(other)
    }
}

impl Rigid for Circle3d {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self::from_parts(m.apply_point(&self.center), m.apply_vector(&self.normal), self.radius)
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self::from_parts(
            self.center.convert_to(frame),
            self.normal.convert_to(frame),
            self.radius,
        )
    }
}

impl Extent for Circle3d {
    fn size(&self) -> f64 {
        self.radius
    }
}

impl Locate for Circle3d {
    /// Disc classification: the rim is the boundary.
    fn locate(&self, p: &Point3d) -> Location {
        let tol = tolerance::current();
        let d = *p - self.center;
        let h = d.dot(&self.normal);
        if !tol.is_zero(h, self.radius) {
            return Location::Outside;
        }
        let radial = (d - self.normal * h).length();
        if tol.almost_equal(radial, self.radius, self.radius) {
            Location::Boundary
        } else if radial < self.radius {
            Location::Inside
        } else {
            Location::Outside
        }
    }
}

impl Oriented for Circle3d {
    fn attitude(&self) -> Attitude {
        Attitude::Planar(self.normal)
    }
}

impl Flat for Circle3d {
    fn anchor(&self) -> Point3d {
        self.center
    }
}
