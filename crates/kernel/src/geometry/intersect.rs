//! `IntersectionWith` for the supported shape pairs.
//!
//! Every result is expressed in the global frame. Parallel and coincident
//! configurations are resolved before the generic formula; touching within
//! the active tolerance yields a point.

use super::circle::Circle3d;
use super::closest::{Disc, chord, plane_meet};
use super::cuboid::Box3d;
use super::intersection::Intersection;
use super::linear::{Line3d, Linear, Ray, Segment, Span, closest_points};
use super::plane::Plane;
use super::point::Point3d;
use super::sphere::Sphere;
use super::tetrahedron::Tetrahedron;
use super::triangle::Triangle;
use super::vector::Vec3;
use crate::polytope::ConvexPolytope;
use crate::polytope::features::AsFeatures;
use crate::tolerance;
use crate::traits::{Contains, Extent, Flat, IntersectionWith, Locate, Location, Oriented, Rigid, touching_scale};

fn pair_scale<A: Extent, B: Extent>(a: &A, b: &B) -> f64 {
    touching_scale(a.size(), b.size())
}

fn unbounded(origin: Point3d, dir: Vec3) -> Span {
    Span {
        origin,
        dir,
        lo: f64::NEG_INFINITY,
        hi: f64::INFINITY,
    }
}

/// Point or segment between two points, collapsing when they coincide.
fn points_piece(a: Point3d, b: Point3d, scale: f64) -> Intersection {
    if tolerance::current().is_zero((b - a).length(), scale) {
        Intersection::Point(a.midpoint(&b))
    } else {
        Intersection::Segment(Segment::from_points(a, b))
    }
}

// ─── Linear objects ────────────────────────────────────────────────────────

fn linear_linear<A: Linear + Extent, B: Linear + Extent>(a: &A, b: &B) -> Intersection {
    let (sa, sb) = (a.span(), b.span());
    let scale = pair_scale(a, b);
    let tol = tolerance::current();
    if tol.is_angle_zero(sa.dir.cross(&sb.dir).length()) {
        let offset = sb.origin - sa.origin;
        let along = offset.dot(&sa.dir);
        if !tol.is_zero((offset - sa.dir * along).length(), scale) {
            return Intersection::None;
        }
        // Collinear: map b's parameter range onto a's.
        let sign = sa.dir.dot(&sb.dir).signum();
        let (e0, e1) = (along + sign * sb.lo, along + sign * sb.hi);
        let (lo, hi) = (sa.lo.max(e0.min(e1)), sa.hi.min(e0.max(e1)));
        if lo > hi {
            return if tol.is_zero(lo - hi, scale) {
                Intersection::Point(sa.at(0.5 * (lo + hi)))
            } else {
                Intersection::None
            };
        }
        return sa.piece(lo, hi, scale);
    }
    let (p, q) = closest_points(&sa, &sb);
    if tol.is_zero((p - q).length(), scale) {
        Intersection::Point(p.midpoint(&q))
    } else {
        Intersection::None
    }
}

fn linear_plane<A: Linear + Extent>(a: &A, plane: &Plane) -> Intersection {
    let s = a.span();
    let scale = touching_scale(a.size(), 0.0);
    let (point, normal) = (plane.point().to_global(), plane.normal().to_global());
    let tol = tolerance::current();
    let denom = normal.dot(&s.dir);
    let h0 = (s.origin - point).dot(&normal);
    if tol.is_angle_zero(denom) {
        return if tol.is_zero(h0, scale) {
            s.piece(s.lo, s.hi, scale)
        } else {
            Intersection::None
        };
    }
    let x = s.at(s.clamp(-h0 / denom));
    if tol.is_zero((x - point).dot(&normal), scale) {
        Intersection::Point(x)
    } else {
        Intersection::None
    }
}

/// Chord of a closed ball cut by a span.
fn span_ball(s: &Span, center: &Point3d, radius: f64) -> Intersection {
    if let Some((t0, t1)) = chord(s, center, radius) {
        let (lo, hi) = (t0.max(s.lo), t1.min(s.hi));
        if lo <= hi {
            return s.piece(lo, hi, radius);
        }
    }
    let q = s.closest_to(center);
    if tolerance::current().almost_equal((q - *center).length(), radius, radius) {
        Intersection::Point(q)
    } else {
        Intersection::None
    }
}

fn linear_sphere<A: Linear>(a: &A, sphere: &Sphere) -> Intersection {
    span_ball(&a.span(), &sphere.center().to_global(), sphere.radius())
}

fn linear_circle<A: Linear>(a: &A, circle: &Circle3d) -> Intersection {
    let s = a.span();
    let d = Disc::from(circle);
    let tol = tolerance::current();
    let denom = d.normal.dot(&s.dir);
    let h0 = (s.origin - d.center).dot(&d.normal);
    if tol.is_angle_zero(denom) {
        // In the disc's plane the disc chord is the ball chord.
        return if tol.is_zero(h0, d.radius) {
            span_ball(&s, &d.center, d.radius)
        } else {
            Intersection::None
        };
    }
    let x = s.at(s.clamp(-h0 / denom));
    if circle.locate(&x) == Location::Outside {
        Intersection::None
    } else {
        Intersection::Point(x)
    }
}

fn linear_solid<A: Linear + Extent, S: AsFeatures + Extent>(a: &A, solid: &S) -> Intersection {
    let s = a.span();
    match solid.features().clip(&s) {
        Some((lo, hi)) => s.piece(lo, hi, pair_scale(a, solid)),
        None => Intersection::None,
    }
}

// ─── Planes, spheres and circles ───────────────────────────────────────────

fn plane_plane(a: &Plane, b: &Plane) -> Intersection {
    let (p1, n1) = (a.point().to_global(), a.normal().to_global());
    let (p2, n2) = (b.point().to_global(), b.normal().to_global());
    match plane_meet(&p1, &n1, &p2, &n2) {
        Some((x, dir)) => Intersection::Line(Line3d::from_unit(x, dir)),
        None if a.contains_point(&b.point()) => Intersection::Plane(a.to_global()),
        None => Intersection::None,
    }
}

fn plane_sphere(plane: &Plane, sphere: &Sphere) -> Intersection {
    let c = sphere.center().to_global();
    let r = sphere.radius();
    let h = plane.signed_distance(&c);
    let foot = plane.project_point(&c);
    if tolerance::current().almost_equal(h.abs(), r, r) {
        Intersection::Point(foot)
    } else if h.abs() > r {
        Intersection::None
    } else {
        let radius = (r * r - h * h).sqrt();
        Intersection::Circle(Circle3d::from_parts(foot, plane.normal().to_global(), radius))
    }
}

fn plane_circle(plane: &Plane, circle: &Circle3d) -> Intersection {
    let d = Disc::from(circle);
    let (p, n) = (plane.point().to_global(), plane.normal().to_global());
    match plane_meet(&p, &n, &d.center, &d.normal) {
        Some((x, dir)) => span_ball(&unbounded(x, dir), &d.center, d.radius),
        None if plane.contains_point(&d.center) => Intersection::Circle(circle.to_global()),
        None => Intersection::None,
    }
}

/// How two sphere surfaces meet.
enum SphereMeet {
    Coincident,
    Apart,
    Touch(Point3d),
    /// Circle of intersection: center, unit axis towards the second center, radius.
    Ring(Point3d, Vec3, f64),
}

fn sphere_meet(c1: Point3d, r1: f64, c2: Point3d, r2: f64) -> SphereMeet {
    let tol = tolerance::current();
    let scale = r1.max(r2);
    let axis = c2 - c1;
    let d = axis.length();
    if tol.is_zero(d, scale) {
        return if tol.almost_equal(r1, r2, scale) {
            SphereMeet::Coincident
        } else {
            SphereMeet::Apart
        };
    }
    let u = axis / d;
    if tol.almost_equal(d, r1 + r2, scale) {
        return SphereMeet::Touch(c1 + u * r1);
    }
    if tol.almost_equal(d, (r1 - r2).abs(), scale) {
        let side = if r1 >= r2 { r1 } else { -r1 };
        return SphereMeet::Touch(c1 + u * side);
    }
    if d > r1 + r2 || d < (r1 - r2).abs() {
        return SphereMeet::Apart;
    }
    // Law of cosines along the center line.
    let a = (d * d + r1 * r1 - r2 * r2) / (2.0 * d);
    SphereMeet::Ring(c1 + u * a, u, (r1 * r1 - a * a).max(0.0).sqrt())
}

fn sphere_sphere(a: &Sphere, b: &Sphere) -> Intersection {
    match sphere_meet(a.center().to_global(), a.radius(), b.center().to_global(), b.radius()) {
        SphereMeet::Coincident => Intersection::Sphere(a.to_global()),
        SphereMeet::Apart => Intersection::None,
        SphereMeet::Touch(p) => Intersection::Point(p),
        SphereMeet::Ring(center, axis, radius) => {
            Intersection::Circle(Circle3d::from_parts(center, axis, radius))
        }
    }
}

fn circle_circle(a: &Circle3d, b: &Circle3d) -> Intersection {
    let (d1, d2) = (Disc::from(a), Disc::from(b));
    let scale = d1.radius.max(d2.radius);
    match plane_meet(&d1.center, &d1.normal, &d2.center, &d2.normal) {
        Some((x, dir)) => {
            let line = unbounded(x, dir);
            let (Some((a0, a1)), Some((b0, b1))) =
                (chord(&line, &d1.center, d1.radius), chord(&line, &d2.center, d2.radius))
            else {
                return Intersection::None;
            };
            let (lo, hi) = (a0.max(b0), a1.min(b1));
            if lo > hi {
                return if tolerance::current().is_zero(lo - hi, scale) {
                    Intersection::Point(line.at(0.5 * (lo + hi)))
                } else {
                    Intersection::None
                };
            }
            line.piece(lo, hi, scale)
        }
        None if !a.is_coplanar_to(b) => Intersection::None,
        None => match sphere_meet(d1.center, d1.radius, d2.center, d2.radius) {
            SphereMeet::Coincident => Intersection::Circle(a.to_global()),
            SphereMeet::Apart => Intersection::None,
            SphereMeet::Touch(p) => Intersection::Point(p),
            SphereMeet::Ring(m, axis, h) => {
                let w = d1.normal.cross(&axis);
                Intersection::PointPair(m + w * h, m - w * h)
            }
        },
    }
}

// ─── Triangles ─────────────────────────────────────────────────────────────

/// Points where a plane cuts a triangle: vertices on the plane plus strict
/// edge crossings.
fn plane_cut(v: &[Point3d; 3], point: &Point3d, normal: &Vec3, thr: f64) -> Vec<Point3d> {
    let h = v.map(|p| (p - *point).dot(normal));
    let mut out: Vec<Point3d> = (0..3).filter(|&i| h[i].abs() <= thr).map(|i| v[i]).collect();
    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        if (h[i] < -thr && h[j] > thr) || (h[i] > thr && h[j] < -thr) {
            out.push(v[i].lerp(&v[j], h[i] / (h[i] - h[j])));
        }
    }
    out
}

fn plane_triangle(plane: &Plane, tri: &Triangle) -> Intersection {
    let v = tri.global_vertices();
    let scale = tri.size();
    let thr = tolerance::threshold(scale);
    let cut = plane_cut(&v, &plane.point().to_global(), &plane.normal().to_global(), thr);
    match cut.as_slice() {
        [] => Intersection::None,
        [p] => Intersection::Point(*p),
        [a, b] => points_piece(*a, *b, scale),
        _ => Intersection::Triangle(Triangle::from_vertices(v)),
    }
}

fn triangle_triangle(a: &Triangle, b: &Triangle) -> Intersection {
    let (va, vb) = (a.global_vertices(), b.global_vertices());
    let (na, nb) = (a.normal(), b.normal());
    let scale = pair_scale(a, b);
    let thr = tolerance::threshold(scale);
    if a.is_parallel_to(b) {
        if !a.is_coplanar_to(b) {
            return Intersection::None;
        }
        return coplanar_overlap(&va, &vb, &nb, scale);
    }
    let cut_a = plane_cut(&va, &vb[0], &nb, thr);
    let cut_b = plane_cut(&vb, &va[0], &na, thr);
    let (Some(&origin), false) = (cut_a.first(), cut_b.is_empty()) else {
        return Intersection::None;
    };
    let dir = na.cross(&nb).normalized().unwrap_or(Vec3::X);
    let range = |pts: &[Point3d]| {
        pts.iter()
            .map(|p| (*p - origin).dot(&dir))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t)))
    };
    let ((a0, a1), (b0, b1)) = (range(&cut_a), range(&cut_b));
    let (lo, hi) = (a0.max(b0), a1.min(b1));
    if lo > hi + thr {
        return Intersection::None;
    }
    unbounded(origin, dir).piece(lo.min(hi), hi.max(lo), scale)
}

/// Overlap of two coplanar triangles by Sutherland-Hodgman clipping of `a`
/// against the edges of `b`.
fn coplanar_overlap(a: &[Point3d; 3], b: &[Point3d; 3], nb: &Vec3, scale: f64) -> Intersection {
    let thr = tolerance::threshold(scale);
    let mut poly = a.to_vec();
    for (p, q) in [(b[0], b[1]), (b[1], b[2]), (b[2], b[0])] {
        let Some(m) = (q - p).cross(nb).normalized() else {
            continue;
        };
        let side = |x: &Point3d| (*x - p).dot(&m);
        let input = std::mem::take(&mut poly);
        for (i, cur) in input.iter().enumerate() {
            let prev = input[(i + input.len() - 1) % input.len()];
            let (sc, sp) = (side(cur), side(&prev));
            let crossing = || prev.lerp(cur, sp / (sp - sc));
            match (sp <= thr, sc <= thr) {
                (true, true) => poly.push(*cur),
                (false, true) => {
                    poly.push(crossing());
                    poly.push(*cur);
                }
                (true, false) => poly.push(crossing()),
                (false, false) => {}
            }
        }
        if poly.is_empty() {
            return Intersection::None;
        }
    }

    let tol = tolerance::current();
    let mut ring: Vec<Point3d> = Vec::with_capacity(poly.len());
    for p in poly {
        if ring.last().is_none_or(|l| !tol.is_zero((p - *l).length(), scale)) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && tol.is_zero((ring[0] - ring[ring.len() - 1]).length(), scale) {
        ring.pop();
    }

    match ring.len() {
        0 => Intersection::None,
        1 => Intersection::Point(ring[0]),
        2 => points_piece(ring[0], ring[1], scale),
        n => {
            let doubled_area = ring
                .iter()
                .zip(ring.iter().cycle().skip(1))
                .map(|(p, q)| (*p - ring[0]).cross(&(*q - ring[0])))
                .fold(Vec3::ZERO, |acc, c| acc + c)
                .length();
            if doubled_area <= thr * scale {
                let (p, q) = farthest_pair(&ring);
                return points_piece(p, q, scale);
            }
            if n == 3 {
                Intersection::Triangle(Triangle::from_vertices([ring[0], ring[1], ring[2]]))
            } else {
                Intersection::Polygon(ring)
            }
        }
    }
}

fn farthest_pair(points: &[Point3d]) -> (Point3d, Point3d) {
    let mut best = (points[0], points[0]);
    let mut dist = 0.0;
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            let d = p.distance_squared_to(q);
            if d > dist {
                dist = d;
                best = (*p, *q);
            }
        }
    }
    best
}

// ─── Trait impls ───────────────────────────────────────────────────────────

macro_rules! same {
    ($t:ty, $f:expr) => {
        impl IntersectionWith<$t> for $t {
            fn intersection_with(&self, other: &$t) -> Intersection {
                $f(self, other)
            }
        }
    };
}

macro_rules! symmetric {
    ($a:ty, $b:ty, $f:expr) => {
        impl IntersectionWith<$b> for $a {
            fn intersection_with(&self, other: &$b) -> Intersection {
                $f(self, other)
            }
        }

        impl IntersectionWith<$a> for $b {
            fn intersection_with(&self, other: &$a) -> Intersection {
                $f(other, self)
            }
        }
    };
}

macro_rules! linear_rows {
    ($($l:ty),*) => {
        $(
            symmetric!($l, Plane, linear_plane);
            symmetric!($l, Sphere, linear_sphere);
            symmetric!($l, Circle3d, linear_circle);
            symmetric!($l, Box3d, linear_solid);
            symmetric!($l, Tetrahedron, linear_solid);
            symmetric!($l, ConvexPolytope, linear_solid);
            symmetric!($l, Triangle, linear_solid);
        )*
    };
}

same!(Line3d, linear_linear);
same!(Ray, linear_linear);
same!(Segment, linear_linear);
symmetric!(Line3d, Ray, linear_linear);
symmetric!(Line3d, Segment, linear_linear);
symmetric!(Ray, Segment, linear_linear);
linear_rows!(Line3d, Ray, Segment);

same!(Plane, plane_plane);
symmetric!(Plane, Sphere, plane_sphere);
symmetric!(Plane, Circle3d, plane_circle);
symmetric!(Plane, Triangle, plane_triangle);
same!(Sphere, sphere_sphere);
same!(Circle3d, circle_circle);
same!(Triangle, triangle_triangle);
