pub mod circle;
pub(crate) mod closest;
pub mod cuboid;
mod distance;
mod intersect;
pub mod intersection;
pub mod linear;
pub mod motion;
pub mod plane;
pub mod point;
pub mod sphere;
pub mod tetrahedron;
pub mod triangle;
pub mod vector;

use crate::polytope::ConvexPolytope;
use crate::traits::{Contains, Locate, Location};

/// Closed regions contain their boundary.
macro_rules! contains_by_locate {
    ($($t:ty),*) => {
        $(
            impl Contains for $t {
                fn contains_point(&self, point: &point::Point3d) -> bool {
                    self.locate(point) != Location::Outside
                }
            }
        )*
    };
}

contains_by_locate!(
    circle::Circle3d,
    sphere::Sphere,
    cuboid::Box3d,
    triangle::Triangle,
    tetrahedron::Tetrahedron,
    ConvexPolytope
);
