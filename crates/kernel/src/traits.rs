//! Cross-shape traits: rigid motion, distance, intersection, containment and
//! orientation queries.
//!
//! Every binary query resolves both operands into the global frame before
//! computing anything, so operands may live in different frames.

use crate::frame::FrameRef;
use crate::geometry::intersection::Intersection;
use crate::geometry::motion::RigidMotion;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::rotation::Rotation;
use crate::tolerance;

// ─── Rigid motion ──────────────────────────────────────────────────────────

/// Shapes that can be moved rigidly and re-expressed in another frame.
///
/// Motions return new values. Each component keeps the frame it was
/// expressed in; only its coordinates change.
pub trait Rigid: Sized {
    fn transformed(&self, motion: &RigidMotion) -> Self;

    fn convert_to(&self, frame: FrameRef) -> Self;

    fn to_global(&self) -> Self {
        self.convert_to(FrameRef::Global)
    }

    fn translate(&self, by: &Vec3) -> Self {
        self.transformed(&RigidMotion::translation(by))
    }

    fn rotate(&self, rotation: &Rotation, about: &Point3d) -> Self {
        self.transformed(&RigidMotion::rotation(rotation, about))
    }

    fn rotate_about_origin(&self, rotation: &Rotation) -> Self {
        self.rotate(rotation, &Point3d::ORIGIN)
    }

    fn reflect_in<M: Mirror>(&self, mirror: &M) -> Self {
        self.transformed(&mirror.reflection())
    }
}

/// Objects that define a reflection: a point, a line or a plane.
pub trait Mirror {
    fn reflection(&self) -> RigidMotion;
}

// ─── Distance and intersection ─────────────────────────────────────────────

pub trait DistanceTo<T: ?Sized> {
    /// Closest pair in the global frame, one point on each operand. When the
    /// operands overlap both points are the same common point.
    fn closest_points(&self, other: &T) -> (Point3d, Point3d);

    fn distance_to(&self, other: &T) -> f64 {
        let (a, b) = self.closest_points(other);
        (a - b).length()
    }
}

pub trait IntersectionWith<T: ?Sized> {
    fn intersection_with(&self, other: &T) -> Intersection;
}

pub trait Intersects<T: ?Sized> {
    /// True when the operands share a point or touch within tolerance.
    fn intersects(&self, other: &T) -> bool;
}

/// Characteristic size used as the reference magnitude of touching checks
/// in relative mode. Unbounded shapes report infinity.
pub trait Extent {
    fn size(&self) -> f64;
}

/// Reference magnitude for a touching check: the larger finite size.
pub fn touching_scale(a: f64, b: f64) -> f64 {
    [a, b]
        .into_iter()
        .filter(|s| s.is_finite())
        .fold(0.0, f64::max)
}

impl<A, B> Intersects<B> for A
where
    A: DistanceTo<B> + Extent,
    B: Extent,
{
    fn intersects(&self, other: &B) -> bool {
        let scale = touching_scale(self.size(), other.size());
        tolerance::current().is_zero(self.distance_to(other), scale)
    }
}

// ─── Containment ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

/// Point classification for closed regions and solids. Points within the
/// active tolerance of the boundary classify as [`Location::Boundary`].
pub trait Locate {
    fn locate(&self, point: &Point3d) -> Location;
}

/// Point membership for every shape, including unbounded and lower-dimensional ones.
pub trait Contains {
    fn contains_point(&self, point: &Point3d) -> bool;
}

// ─── Orientation ───────────────────────────────────────────────────────────

/// The direction that carries a shape's orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attitude {
    /// A directed vector.
    Vector(Vec3),
    /// An undirected line direction.
    Linear(Vec3),
    /// A plane, by its normal.
    Planar(Vec3),
}

impl Attitude {
    fn direction(&self) -> Vec3 {
        match self {
            Attitude::Vector(v) | Attitude::Linear(v) | Attitude::Planar(v) => v.to_global(),
        }
    }

    fn is_planar(&self) -> bool {
        matches!(self, Attitude::Planar(_))
    }
}

pub trait Oriented {
    fn attitude(&self) -> Attitude;

    /// Angle in radians. Two vectors give `[0, π]`; any pair involving a
    /// line or plane is folded to `[0, π/2]`. Line-plane angles are measured
    /// against the plane itself, not its normal.
    fn angle_to<T: Oriented>(&self, other: &T) -> f64 {
        let (a, b) = (self.attitude(), other.attitude());
        let raw = a.direction().angle_between(&b.direction());
        if let (Attitude::Vector(_), Attitude::Vector(_)) = (a, b) {
            return raw;
        }
        let acute = raw.min(std::f64::consts::PI - raw);
        if a.is_planar() != b.is_planar() {
            std::f64::consts::FRAC_PI_2 - acute
        } else {
            acute
        }
    }

    fn angle_to_deg<T: Oriented>(&self, other: &T) -> f64 {
        self.angle_to(other).to_degrees()
    }

    /// Parallel within the active tolerance (sine of the angle, scale 1).
    /// Opposite vectors count as parallel.
    fn is_parallel_to<T: Oriented>(&self, other: &T) -> bool {
        let (a, b) = (self.attitude(), other.attitude());
        let (da, db) = (unit(&a.direction()), unit(&b.direction()));
        let tol = tolerance::current();
        if a.is_planar() != b.is_planar() {
            tol.is_angle_zero(da.dot(&db))
        } else {
            tol.is_angle_zero(da.cross(&db).length())
        }
    }

    fn is_orthogonal_to<T: Oriented>(&self, other: &T) -> bool {
        let (a, b) = (self.attitude(), other.attitude());
        let (da, db) = (unit(&a.direction()), unit(&b.direction()));
        let tol = tolerance::current();
        if a.is_planar() != b.is_planar() {
            tol.is_angle_zero(da.cross(&db).length())
        } else {
            tol.is_angle_zero(da.dot(&db))
        }
    }
}

fn unit(v: &Vec3) -> Vec3 {
    v.normalized().unwrap_or(*v)
}

/// Oriented shapes anchored at a point: lines, rays, segments, planes,
/// circles and triangles.
pub trait Flat: Oriented {
    fn anchor(&self) -> Point3d;

    /// Whether both shapes lie in one common plane.
    ///
    /// The offset between the anchors is the reference magnitude in
    /// relative mode, which makes the test an angular one.
    fn is_coplanar_to<T: Flat>(&self, other: &T) -> bool {
        let (a, b) = (self.attitude(), other.attitude());
        let (da, db) = (unit(&a.direction()), unit(&b.direction()));
        let offset = other.anchor().to_global() - self.anchor().to_global();
        let reach = offset.length();
        let tol = tolerance::current();
        match (a.is_planar(), b.is_planar()) {
            (true, true) => {
                tol.is_angle_zero(da.cross(&db).length()) && tol.is_zero(offset.dot(&da), reach)
            }
            (true, false) => tol.is_angle_zero(da.dot(&db)) && tol.is_zero(offset.dot(&da), reach),
            (false, true) => tol.is_angle_zero(da.dot(&db)) && tol.is_zero(offset.dot(&db), reach),
            (false, false) => {
                // Parallel lines always share a plane.
                let n = da.cross(&db);
                tol.is_angle_zero(n.length()) || tol.is_zero(offset.dot(&unit(&n)), reach)
            }
        }
    }
}
