//! Closest-feature search between convex feature sets.

use tracing::trace;

use super::features::FeatureSet;
use super::sat;
use crate::geometry::linear::closest_points;
use crate::geometry::point::Point3d;
use crate::traits::Location;

/// Keeps the first pair found at the minimum distance; later candidates
/// must improve on it by more than rounding noise.
struct Nearest {
    distance: f64,
    pair: Option<(Point3d, Point3d)>,
}

impl Nearest {
    fn new() -> Self {
        Self {
            distance: f64::INFINITY,
            pair: None,
        }
    }

    fn offer(&mut self, p: Point3d, q: Point3d) {
        let d = (p - q).length();
        if self.pair.is_none() || d < self.distance * (1.0 - 1e-12) {
            self.distance = d;
            self.pair = Some((p, q));
        }
    }
}

/// Closest pair between two convex sets, in the global frame.
///
/// Overlapping sets yield a repeated witness inside both; disjoint sets go
/// through vertex-vertex, vertex-edge, vertex-face and edge-edge candidates.
pub(crate) fn closest(a: &FeatureSet, b: &FeatureSet) -> (Point3d, Point3d) {
    if !sat::separated(a, b) {
        let w = overlap_witness(a, b);
        return (w, w);
    }
    nearest_features(a, b)
}

fn overlap_witness(a: &FeatureSet, b: &FeatureSet) -> Point3d {
    let contained = |from: &FeatureSet, into: &FeatureSet| {
        from.vertices
            .iter()
            .find(|v| into.locate(v) != Location::Outside)
            .copied()
    };
    let clipped = |from: &FeatureSet, into: &FeatureSet| {
        from.edges.iter().find_map(|e| {
            let span = from.edge_span(e);
            into.clip(&span).map(|(lo, hi)| span.at(0.5 * (lo + hi)))
        })
    };
    if let Some(w) = contained(a, b)
        .or_else(|| contained(b, a))
        .or_else(|| clipped(a, b))
        .or_else(|| clipped(b, a))
    {
        return w;
    }
    trace!("overlap without contained feature, using nearest pair midpoint");
    let (p, q) = nearest_features(a, b);
    p.midpoint(&q)
}

fn nearest_features(a: &FeatureSet, b: &FeatureSet) -> (Point3d, Point3d) {
    let mut best = Nearest::new();

    for p in &a.vertices {
        for q in &b.vertices {
            best.offer(*p, *q);
        }
    }

    for p in &a.vertices {
        for e in &b.edges {
            best.offer(*p, b.edge_span(e).closest_to(p));
        }
    }
    for e in &a.edges {
        for q in &b.vertices {
            best.offer(a.edge_span(e).closest_to(q), *q);
        }
    }

    for p in &a.vertices {
        for f in 0..b.faces.len() {
            if let Some(q) = b.face_projection(f, p) {
                best.offer(*p, q);
            }
        }
    }
    for f in 0..a.faces.len() {
        for q in &b.vertices {
            if let Some(p) = a.face_projection(f, q) {
                best.offer(p, *q);
            }
        }
    }

    for ea in &a.edges {
        let sa = a.edge_span(ea);
        for eb in &b.edges {
            let (p, q) = closest_points(&sa, &b.edge_span(eb));
            best.offer(p, q);
        }
    }

    best.pair.unwrap_or((a.center(), b.center()))
}
