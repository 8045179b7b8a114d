//! Closest-point kernels behind every distance query.
//!
//! Each shape is lowered to a global-frame [`Geom`]; [`closest`] then
//! dispatches on the pair of kinds.

use std::f64::consts::TAU;

use super::circle::Circle3d;
use super::cuboid::Box3d;
use super::linear::{Line3d, Linear, Ray, Segment, Span, closest_points};
use super::plane::Plane;
use super::point::Point3d;
use super::sphere::Sphere;
use super::tetrahedron::Tetrahedron;
use super::triangle::Triangle;
use super::vector::Vec3;
use crate::polytope::ConvexPolytope;
use crate::polytope::features::{AsFeatures, FeatureSet};
use crate::polytope::search;
use crate::tolerance;

/// Below this `|n · dir|` a span is handled as parallel to a plane.
const PARALLEL_COS: f64 = 1e-12;

const RIM_SAMPLES: usize = 64;
const GOLDEN_STEPS: usize = 80;

/// A closed disc in the global frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Disc {
    pub center: Point3d,
    pub normal: Vec3,
    pub radius: f64,
}

impl Disc {
    pub fn rim(&self, angle: f64) -> Point3d {
        let u = self.normal.orthogonal_unit();
        let v = self.normal.cross(&u);
        let (s, c) = angle.sin_cos();
        self.center + (u * c + v * s) * self.radius
    }

    pub fn closest_to(&self, p: &Point3d) -> Point3d {
        let d = *p - self.center;
        let radial = d - self.normal * d.dot(&self.normal);
        let len = radial.length();
        if len <= self.radius {
            self.center + radial
        } else {
            self.center + radial * (self.radius / len)
        }
    }
}

/// Global-frame view of a shape for closest-point queries.
pub(crate) enum Geom {
    Point(Point3d),
    Span(Span),
    Plane { point: Point3d, normal: Vec3 },
    Disc(Disc),
    Ball { center: Point3d, radius: f64 },
    Set(FeatureSet),
}

pub(crate) trait AsGeom {
    fn geom(&self) -> Geom;
}

/// Closest pair `(on a, on b)` in the global frame.
pub(crate) fn closest(a: &Geom, b: &Geom) -> (Point3d, Point3d) {
    match (a, b) {
        (Geom::Point(p), _) => (*p, closest_to_point(b, p)),
        (_, Geom::Point(q)) => (closest_to_point(a, q), *q),
        (Geom::Ball { center, radius }, _) => ball_against(center, *radius, &closest_to_point(b, center)),
        (_, Geom::Ball { .. }) => swap(closest(b, a)),
        (Geom::Span(s), Geom::Span(t)) => closest_points(s, t),
        (Geom::Span(s), Geom::Plane { point, normal }) => span_plane(s, point, normal),
        (Geom::Span(s), Geom::Disc(d)) => span_disc(s, d),
        (Geom::Span(s), Geom::Set(f)) => span_set(s, f),
        (Geom::Plane { point: p1, normal: n1 }, Geom::Plane { point: p2, normal: n2 }) => {
            plane_plane(p1, n1, p2, n2)
        }
        (Geom::Plane { point, normal }, Geom::Disc(d)) => plane_disc(point, normal, d),
        (Geom::Plane { point, normal }, Geom::Set(f)) => plane_set(point, normal, f),
        (Geom::Disc(d1), Geom::Disc(d2)) => disc_disc(d1, d2),
        (Geom::Disc(d), Geom::Set(f)) => disc_set(d, f),
        (Geom::Set(f), Geom::Set(g)) => search::closest(f, g),
        _ => swap(closest(b, a)),
    }
}

fn swap((p, q): (Point3d, Point3d)) -> (Point3d, Point3d) {
    (q, p)
}

pub(crate) fn closest_to_point(g: &Geom, p: &Point3d) -> Point3d {
    match g {
        Geom::Point(q) => *q,
        Geom::Span(s) => s.closest_to(p),
        Geom::Plane { point, normal } => *p - *normal * (*p - *point).dot(normal),
        Geom::Disc(d) => d.closest_to(p),
        Geom::Ball { center, radius } => {
            let d = *p - *center;
            let len = d.length();
            if len <= *radius {
                *p
            } else {
                *center + d * (*radius / len)
            }
        }
        Geom::Set(f) => f.closest_point(p),
    }
}

/// Ball against the closest point `q` of another shape to its center.
fn ball_against(center: &Point3d, radius: f64, q: &Point3d) -> (Point3d, Point3d) {
    let d = *q - *center;
    let len = d.length();
    if len <= radius {
        (*q, *q)
    } else {
        (*center + d * (radius / len), *q)
    }
}

fn span_plane(s: &Span, point: &Point3d, normal: &Vec3) -> (Point3d, Point3d) {
    let denom = normal.dot(&s.dir);
    let t = if denom.abs() > PARALLEL_COS {
        s.clamp(-(s.origin - *point).dot(normal) / denom)
    } else {
        s.clamp(0.0)
    };
    let x = s.at(t);
    (x, x - *normal * (x - *point).dot(normal))
}

/// Point of the span where it crosses the disc, if it does.
fn span_pierces_disc(s: &Span, d: &Disc) -> Option<Point3d> {
    let denom = d.normal.dot(&s.dir);
    if denom.abs() <= PARALLEL_COS {
        return None;
    }
    let t = -(s.origin - d.center).dot(&d.normal) / denom;
    if t < s.lo || t > s.hi {
        return None;
    }
    let x = s.at(t);
    ((x - d.center).length() <= d.radius).then_some(x)
}

fn span_disc(s: &Span, d: &Disc) -> (Point3d, Point3d) {
    if let Some(x) = span_pierces_disc(s, d) {
        return (x, x);
    }
    let theta = minimize_on_circle(|a| {
        let q = d.rim(a);
        (s.closest_to(&q) - q).length()
    });
    let q = d.rim(theta);
    let rim = (s.closest_to(&q), q);
    s.ends()
        .into_iter()
        .map(|e| (e, d.closest_to(&e)))
        .chain(std::iter::once(rim))
        .min_by(|a, b| gap(a).total_cmp(&gap(b)))
        .unwrap_or(rim)
}

fn gap((p, q): &(Point3d, Point3d)) -> f64 {
    (*p - *q).length()
}

fn span_set(s: &Span, f: &FeatureSet) -> (Point3d, Point3d) {
    if let Some((lo, hi)) = f.clip(s) {
        let x = s.at(0.5 * (lo + hi));
        return (x, x);
    }
    let on_edges = f.edges.iter().map(|e| closest_points(s, &f.edge_span(e)));
    let from_ends = s.ends().into_iter().map(|e| (e, f.closest_point(&e)));
    on_edges
        .chain(from_ends)
        .min_by(|a, b| gap(a).total_cmp(&gap(b)))
        .unwrap_or((s.origin, f.center()))
}

/// A point on both planes when they are not parallel.
pub(crate) fn plane_meet(p1: &Point3d, n1: &Vec3, p2: &Point3d, n2: &Vec3) -> Option<(Point3d, Vec3)> {
    let dir = n1.cross(n2);
    if tolerance::current().is_angle_zero(dir.length()) {
        return None;
    }
    let (d1, d2) = (p1.to_vec3().dot(n1), p2.to_vec3().dot(n2));
    let c = n1.dot(n2);
    let det = 1.0 - c * c;
    let x = (*n1 * (d1 - d2 * c) + *n2 * (d2 - d1 * c)) / det;
    Some((Point3d::ORIGIN + x, dir.normalized().unwrap_or(dir)))
}

fn plane_plane(p1: &Point3d, n1: &Vec3, p2: &Point3d, n2: &Vec3) -> (Point3d, Point3d) {
    match plane_meet(p1, n1, p2, n2) {
        Some((x, _)) => (x, x),
        None => (*p1, *p1 - *n2 * (*p1 - *p2).dot(n2)),
    }
}

fn plane_disc(point: &Point3d, normal: &Vec3, d: &Disc) -> (Point3d, Point3d) {
    let height = |x: &Point3d| (*x - *point).dot(normal);
    let h = height(&d.center);
    let w = *normal - d.normal * normal.dot(&d.normal);
    let wl = w.length();
    let x = if wl <= PARALLEL_COS {
        d.center
    } else {
        let u = w / wl;
        if h.abs() <= d.radius * wl {
            let x = d.center - u * (h / wl);
            return (x, x);
        }
        d.center - u * (d.radius * h.signum())
    };
    (x - *normal * height(&x), x)
}

fn plane_set(point: &Point3d, normal: &Vec3, f: &FeatureSet) -> (Point3d, Point3d) {
    let h: Vec<f64> = f.vertices.iter().map(|v| (*v - *point).dot(normal)).collect();
    let crossing = f.edges.iter().find_map(|&[i, j]| {
        let (a, b) = (h[i], h[j]);
        if a.min(b) <= 0.0 && a.max(b) >= 0.0 {
            let t = if a == b { 0.0 } else { a / (a - b) };
            Some(f.vertices[i].lerp(&f.vertices[j], t))
        } else {
            None
        }
    });
    if let Some(x) = crossing {
        return (x, x);
    }
    let (k, hk) = h
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .unwrap_or((0, 0.0));
    let v = f.vertices[k];
    (v - *normal * hk, v)
}

/// Chord parameters of `s` (ignoring its bounds) through a ball.
pub(crate) fn chord(s: &Span, center: &Point3d, radius: f64) -> Option<(f64, f64)> {
    let oc = s.origin - *center;
    let b = oc.dot(&s.dir);
    let dist2 = (oc.length_squared() - b * b).max(0.0);
    let half2 = radius * radius - dist2;
    if half2 < 0.0 {
        return None;
    }
    let half = half2.sqrt();
    Some((-b - half, -b + half))
}

fn disc_disc(d1: &Disc, d2: &Disc) -> (Point3d, Point3d) {
    match plane_meet(&d1.center, &d1.normal, &d2.center, &d2.normal) {
        Some((x, dir)) => {
            let line = Span {
                origin: x,
                dir,
                lo: f64::NEG_INFINITY,
                hi: f64::INFINITY,
            };
            if let (Some((a0, a1)), Some((b0, b1))) =
                (chord(&line, &d1.center, d1.radius), chord(&line, &d2.center, d2.radius))
            {
                let (lo, hi) = (a0.max(b0), a1.min(b1));
                if lo <= hi {
                    let w = line.at(0.5 * (lo + hi));
                    return (w, w);
                }
            }
        }
        None => {
            let offset = d2.center - d1.center;
            let coplanar = tolerance::current().is_zero(offset.dot(&d1.normal), offset.length());
            if coplanar && offset.length() <= d1.radius + d2.radius {
                let w = d1.center + offset * (d1.radius / (d1.radius + d2.radius));
                return (w, w);
            }
        }
    }
    let t1 = minimize_on_circle(|a| {
        let q = d1.rim(a);
        (d2.closest_to(&q) - q).length()
    });
    let t2 = minimize_on_circle(|a| {
        let q = d2.rim(a);
        (d1.closest_to(&q) - q).length()
    });
    let (q1, q2) = (d1.rim(t1), d2.rim(t2));
    let from_first = (q1, d2.closest_to(&q1));
    let from_second = (d1.closest_to(&q2), q2);
    if gap(&from_first) <= gap(&from_second) {
        from_first
    } else {
        from_second
    }
}

fn disc_set(d: &Disc, f: &FeatureSet) -> (Point3d, Point3d) {
    let from_vertices = f.vertices.iter().map(|v| (d.closest_to(v), *v));
    let from_edges = f.edges.iter().map(|e| swap(span_disc(&f.edge_span(e), d)));
    let theta = minimize_on_circle(|a| {
        let q = d.rim(a);
        (f.closest_point(&q) - q).length()
    });
    let q = d.rim(theta);
    let rim = (q, f.closest_point(&q));
    from_vertices
        .chain(from_edges)
        .chain(std::iter::once(rim))
        .min_by(|a, b| gap(a).total_cmp(&gap(b)))
        .unwrap_or(rim)
}

/// Angle minimising `f` over a full turn: uniform sampling, then a
/// golden-section refinement around the best sample.
pub(crate) fn minimize_on_circle(f: impl Fn(f64) -> f64) -> f64 {
    let step = TAU / RIM_SAMPLES as f64;
    let (best, best_value) = (0..RIM_SAMPLES)
        .map(|i| {
            let a = i as f64 * step;
            (a, f(a))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or((0.0, f(0.0)));

    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let (mut lo, mut hi) = (best - step, best + step);
    let mut c = hi - ratio * (hi - lo);
    let mut d = lo + ratio * (hi - lo);
    let (mut fc, mut fd) = (f(c), f(d));
    for _ in 0..GOLDEN_STEPS {
        if fc < fd {
            hi = d;
            d = c;
            fd = fc;
            c = hi - ratio * (hi - lo);
            fc = f(c);
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = lo + ratio * (hi - lo);
            fd = f(d);
        }
    }
    let refined = 0.5 * (lo + hi);
    if f(refined) <= best_value { refined } else { best }
}

// ─── Shape lowering ────────────────────────────────────────────────────────

impl AsGeom for Point3d {
    fn geom(&self) -> Geom {
        Geom::Point(self.to_global())
    }
}

impl AsGeom for Line3d {
    fn geom(&self) -> Geom {
        Geom::Span(self.span())
    }
}

impl AsGeom for Ray {
    fn geom(&self) -> Geom {
        Geom::Span(self.span())
    }
}

impl AsGeom for Segment {
    fn geom(&self) -> Geom {
        Geom::Span(self.span())
    }
}

impl AsGeom for Plane {
    fn geom(&self) -> Geom {
        Geom::Plane {
            point: self.point().to_global(),
            normal: self.normal().to_global(),
        }
    }
}

impl From<&Circle3d> for Disc {
    fn from(c: &Circle3d) -> Self {
        Disc {
            center: c.center().to_global(),
            normal: c.normal().to_global(),
            radius: c.radius(),
        }
    }
}

impl AsGeom for Circle3d {
    fn geom(&self) -> Geom {
        Geom::Disc(Disc::from(self))
    }
}

impl AsGeom for Sphere {
    fn geom(&self) -> Geom {
        Geom::Ball {
            center: self.center().to_global(),
            radius: self.radius(),
        }
    }
}

impl AsGeom for Box3d {
    fn geom(&self) -> Geom {
        Geom::Set(self.features())
    }
}

impl AsGeom for Triangle {
    fn geom(&self) -> Geom {
        Geom::Set(self.features())
    }
}

impl AsGeom for Tetrahedron {
    fn geom(&self) -> Geom {
        Geom::Set(self.features())
    }
}

impl AsGeom for ConvexPolytope {
    fn geom(&self) -> Geom {
        Geom::Set(self.features())
    }
}
