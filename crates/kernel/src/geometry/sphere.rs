use serde::{Deserialize, Serialize};

use super::motion::RigidMotion;
use super::point::Point3d;
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::tolerance;
use crate::traits::{Extent, Locate, Location, Rigid};

/// A sphere by center and radius.
///
/// Distance, containment and `intersects` treat it as the closed ball.
/// Sphere-sphere `intersection_with` returns where the two surfaces meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    center: Point3d,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Point3d, radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::NonPositive {
                what: "radius",
                value: radius,
            });
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point3d {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * std::f64::consts::PI * self.radius.powi(3)
    }

    pub fn area(&self) -> f64 {
        4.0 * std::f64::consts::PI * self.radius * self.radius
    }

    /// Same center and radius; the reference magnitude is the larger radius.
    pub fn equals(&self, other: &Sphere) -> bool {
        let scale = self.radius.max(other.radius);
        let tol = tolerance::current();
        tol.is_zero((self.center - other.center).length(), scale)
            && tol.almost_equal(self.radius, other.radius, scale)
    }
}

impl Rigid for Sphere {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self {
            center: m.apply_point(&self.center),
            radius: self.radius,
        }
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self {
            center: self.center.convert_to(frame),
            radius: self.radius,
        }
    }
}

impl Extent for Sphere {
    fn size(&self) -> f64 {
        self.radius
    }
}

impl Locate for Sphere {
    fn locate(&self, p: &Point3d) -> Location {
        let d = (*p - self.center).length();
        if tolerance::current().almost_equal(d, self.radius, self.radius) {
            Location::Boundary
        } else if d < self.radius {
            Location::Inside
        } else {
            Location::Outside
        }
    }
}
