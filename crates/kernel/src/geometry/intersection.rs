use super::circle::Circle3d;
use super::linear::{Line3d, Ray, Segment};
use super::plane::Plane;
use super::point::Point3d;
use super::sphere::Sphere;
use super::triangle::Triangle;

/// Result of an intersection query, in the global frame.
///
/// Degenerate configurations (parallel lines, disjoint shapes) are
/// [`Intersection::None`], never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Intersection {
    None,
    Point(Point3d),
    /// Two isolated points, e.g. two coplanar circles crossing.
    PointPair(Point3d, Point3d),
    Segment(Segment),
    Ray(Ray),
    Line(Line3d),
    Plane(Plane),
    Circle(Circle3d),
    Sphere(Sphere),
    Triangle(Triangle),
    /// Convex planar polygon with vertices in boundary order.
    Polygon(Vec<Point3d>),
}

impl Intersection {
    pub fn is_none(&self) -> bool {
        matches!(self, Intersection::None)
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    pub fn as_point(&self) -> Option<&Point3d> {
        match self {
            Intersection::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Intersection::Segment(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle3d> {
        match self {
            Intersection::Circle(c) => Some(c),
            _ => None,
        }
    }

    /// Short tag for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Intersection::None => "none",
            Intersection::Point(_) => "point",
            Intersection::PointPair(..) => "point pair",
            Intersection::Segment(_) => "segment",
            Intersection::Ray(_) => "ray",
            Intersection::Line(_) => "line",
            Intersection::Plane(_) => "plane",
            Intersection::Circle(_) => "circle",
            Intersection::Sphere(_) => "sphere",
            Intersection::Triangle(_) => "triangle",
            Intersection::Polygon(_) => "polygon",
        }
    }
}
