//! Lines, rays and segments.

use serde::{Deserialize, Serialize};

use super::intersection::Intersection;
use super::motion::RigidMotion;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::{GeometryError, Result};
use crate::frame::FrameRef;
use crate::tolerance;
use crate::traits::{Attitude, Contains, Extent, Flat, Mirror, Oriented, Rigid};

/// Below this value of `1 - (da·db)²` two directions are handled as parallel
/// when computing closest points.
const PARALLEL_DENOM: f64 = 1e-14;

/// An infinite line through `point` with unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3d {
    point: Point3d,
    direction: Vec3,
}

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    origin: Point3d,
    direction: Vec3,
}

/// A closed segment between two distinct points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    start: Point3d,
    end: Point3d,
}

fn unit_direction(direction: &Vec3) -> Result<Vec3> {
    direction
        .normalized()
        .ok_or(GeometryError::ZeroLength { what: "direction" })
}

impl Line3d {
    pub fn new(point: Point3d, direction: Vec3) -> Result<Self> {
        Ok(Self {
            point,
            direction: unit_direction(&direction)?,
        })
    }

    pub(crate) fn from_unit(point: Point3d, direction: Vec3) -> Self {
        Self { point, direction }
    }

    pub fn point(&self) -> Point3d {
        self.point
    }

    /// Unit direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn point_at(&self, t: f64) -> Point3d {
        self.point + self.direction * t
    }

    /// Orthogonal projection of `p` onto the line, in the global frame.
    pub fn project_point(&self, p: &Point3d) -> Point3d {
        let s = self.span();
        s.at(s.project(p))
    }

    /// Same line: parallel, and each anchor lies on the other line.
    pub fn equals(&self, other: &Line3d) -> bool {
        self.is_parallel_to(other) && self.contains_point(&other.point)
    }
}

impl Ray {
    pub fn new(origin: Point3d, direction: Vec3) -> Result<Self> {
        Ok(Self {
            origin,
            direction: unit_direction(&direction)?,
        })
    }

    pub(crate) fn from_unit(origin: Point3d, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> Point3d {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn point_at(&self, t: f64) -> Point3d {
        self.origin + self.direction * t
    }

    pub fn to_line(&self) -> Line3d {
        Line3d::from_unit(self.origin, self.direction)
    }

    /// Same origin and same direction sense.
    pub fn equals(&self, other: &Ray) -> bool {
        self.origin.equals(&other.origin)
            && self.is_parallel_to(other)
            && self.direction.dot(&other.direction) > 0.0
    }
}

impl Segment {
    pub fn new(start: Point3d, end: Point3d) -> Result<Self> {
        if start.equals(&end) {
            return Err(GeometryError::CoincidentPoints { what: "segment" });
        }
        Ok(Self { start, end })
    }

    pub(crate) fn from_points(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Point3d {
        self.start
    }

    pub fn end(&self) -> Point3d {
        self.end
    }

    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Unit direction from start to end.
    pub fn direction(&self) -> Vec3 {
        self.vector().normalized().unwrap_or(Vec3::X)
    }

    pub fn midpoint(&self) -> Point3d {
        self.start.midpoint(&self.end)
    }

    /// Point at normalised parameter `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: f64) -> Point3d {
        self.start.lerp(&self.end, t)
    }

    pub fn to_line(&self) -> Line3d {
        Line3d::from_unit(self.start, self.direction())
    }

    /// Same endpoints in either order; the reference magnitude is the
    /// longer segment's length.
    pub fn equals(&self, other: &Segment) -> bool {
        let scale = self.length().max(other.length());
        let tol = tolerance::current();
        let same = |a: &Point3d, b: &Point3d| tol.is_zero((*a - *b).length(), scale);
        (same(&self.start, &other.start) && same(&self.end, &other.end))
            || (same(&self.start, &other.end) && same(&self.end, &other.start))
    }
}

// ─── Parametric spans ──────────────────────────────────────────────────────

/// Global-frame parametrisation `origin + t * dir` over `[lo, hi]`, with a
/// unit `dir` so parameters are arc lengths. Unbounded ends are infinite.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Span {
    pub origin: Point3d,
    pub dir: Vec3,
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    /// Span from `a` to `b`; both must already be global.
    pub fn between(a: Point3d, b: Point3d) -> Span {
        let v = b - a;
        Span {
            origin: a,
            dir: v.normalized().unwrap_or(Vec3::X),
            lo: 0.0,
            hi: v.length(),
        }
    }

    pub fn at(&self, t: f64) -> Point3d {
        self.origin + self.dir * t
    }

    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.lo, self.hi)
    }

    /// Parameter of the closest point of the span to `p`.
    pub fn project(&self, p: &Point3d) -> f64 {
        self.clamp((*p - self.origin).dot(&self.dir))
    }

    pub fn closest_to(&self, p: &Point3d) -> Point3d {
        self.at(self.project(p))
    }

    /// Finite end points (none for a line, one for a ray, two for a segment).
    pub fn ends(&self) -> Vec<Point3d> {
        [self.lo, self.hi]
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| self.at(t))
            .collect()
    }

    /// The part of the span between parameters `lo` and `hi`, which must
    /// already lie inside the span.
    pub fn piece(&self, lo: f64, hi: f64, scale: f64) -> Intersection {
        if lo > hi {
            return Intersection::None;
        }
        match (lo.is_finite(), hi.is_finite()) {
            (false, false) => Intersection::Line(Line3d::from_unit(self.origin, self.dir)),
            (true, false) => Intersection::Ray(Ray::from_unit(self.at(lo), self.dir)),
            (false, true) => Intersection::Ray(Ray::from_unit(self.at(hi), -self.dir)),
            (true, true) => {
                let (a, b) = (self.at(lo), self.at(hi));
                if tolerance::current().is_zero(hi - lo, scale) {
                    Intersection::Point(a.midpoint(&b))
                } else {
                    Intersection::Segment(Segment::from_points(a, b))
                }
            }
        }
    }
}

/// Closest parameters `(s, t)` between two spans.
pub(crate) fn closest_params(a: &Span, b: &Span) -> (f64, f64) {
    let r = a.origin - b.origin;
    let cos = a.dir.dot(&b.dir);
    let c = a.dir.dot(&r);
    let f = b.dir.dot(&r);
    let denom = 1.0 - cos * cos;
    let mut s = if denom > PARALLEL_DENOM {
        a.clamp((cos * f - c) / denom)
    } else {
        a.clamp(0.0)
    };
    let t_free = cos * s + f;
    let t = b.clamp(t_free);
    if t != t_free {
        s = a.clamp(t * cos - c);
    }
    (s, t)
}

pub(crate) fn closest_points(a: &Span, b: &Span) -> (Point3d, Point3d) {
    let (s, t) = closest_params(a, b);
    (a.at(s), b.at(t))
}

/// Shapes with a one-dimensional parametrisation.
pub(crate) trait Linear {
    fn span(&self) -> Span;
}

impl Linear for Line3d {
    fn span(&self) -> Span {
        Span {
            origin: self.point.to_global(),
            dir: self.direction.to_global(),
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }
}

impl Linear for Ray {
    fn span(&self) -> Span {
        Span {
            origin: self.origin.to_global(),
            dir: self.direction.to_global(),
            lo: 0.0,
            hi: f64::INFINITY,
        }
    }
}

impl Linear for Segment {
    fn span(&self) -> Span {
        Span::between(self.start.to_global(), self.end.to_global())
    }
}

// ─── Trait impls ───────────────────────────────────────────────────────────

impl Rigid for Line3d {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self::from_unit(m.apply_point(&self.point), m.apply_vector(&self.direction))
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self::from_unit(self.point.convert_to(frame), self.direction.convert_to(frame))
    }
}

impl Rigid for Ray {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self::from_unit(m.apply_point(&self.origin), m.apply_vector(&self.direction))
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self::from_unit(self.origin.convert_to(frame), self.direction.convert_to(frame))
    }
}

impl Rigid for Segment {
    fn transformed(&self, m: &RigidMotion) -> Self {
        Self::from_points(m.apply_point(&self.start), m.apply_point(&self.end))
    }

    fn convert_to(&self, frame: FrameRef) -> Self {
        Self::from_points(self.start.convert_to(frame), self.end.convert_to(frame))
    }
}

impl Mirror for Line3d {
    fn reflection(&self) -> RigidMotion {
        RigidMotion::line_reflection(&self.point, &self.direction)
    }
}

impl Extent for Line3d {
    fn size(&self) -> f64 {
        f64::INFINITY
    }
}

impl Extent for Ray {
    fn size(&self) -> f64 {
        f64::INFINITY
    }
}

impl Extent for Segment {
    fn size(&self) -> f64 {
        self.length()
    }
}

/// Distance from `p` to the span under the active tolerance. Unbounded
/// spans use the offset from their origin as reference magnitude.
fn span_contains(span: &Span, p: &Point3d, bounded_scale: Option<f64>) -> bool {
    let p = p.to_global();
    let gap = (p - span.closest_to(&p)).length();
    let scale = bounded_scale.unwrap_or_else(|| (p - span.origin).length());
    tolerance::current().is_zero(gap, scale)
}

impl Contains for Line3d {
    fn contains_point(&self, point: &Point3d) -> bool {
        span_contains(&self.span(), point, None)
    }
}

impl Contains for Ray {
    fn contains_point(&self, point: &Point3d) -> bool {
        span_contains(&self.span(), point, None)
    }
}

impl Contains for Segment {
    fn contains_point(&self, point: &Point3d) -> bool {
        span_contains(&self.span(), point, Some(self.length()))
    }
}

impl Oriented for Line3d {
    fn attitude(&self) -> Attitude {
        Attitude::Linear(self.direction)
    }
}

impl Oriented for Ray {
    fn attitude(&self) -> Attitude {
        Attitude::Linear(self.direction)
    }
}

impl Oriented for Segment {
    fn attitude(&self) -> Attitude {
        Attitude::Linear(self.vector())
    }
}

impl Flat for Line3d {
    fn anchor(&self) -> Point3d {
        self.point
    }
}

impl Flat for Ray {
    fn anchor(&self) -> Point3d {
        self.origin
    }
}

impl Flat for Segment {
    fn anchor(&self) -> Point3d {
        self.start
    }
}
