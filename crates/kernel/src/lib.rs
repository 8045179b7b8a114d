//! Analytic 3D geometry: tolerance-gated equality, containment, intersection
//! and distance between primitives and convex polytopes, expressed in
//! arbitrary coordinate frames.

pub mod error;
pub mod frame;
pub mod geometry;
pub mod polytope;
pub mod rotation;
pub mod tolerance;
pub mod traits;

pub use error::{GeometryError, Result};
pub use frame::{FrameId, FrameRef};
pub use geometry::circle::Circle3d;
pub use geometry::cuboid::Box3d;
pub use geometry::intersection::Intersection;
pub use geometry::linear::{Line3d, Ray, Segment};
pub use geometry::motion::RigidMotion;
pub use geometry::plane::Plane;
pub use geometry::point::Point3d;
pub use geometry::sphere::Sphere;
pub use geometry::tetrahedron::Tetrahedron;
pub use geometry::triangle::Triangle;
pub use geometry::vector::Vec3;
pub use polytope::{ConvexPolytope, Polygon};
pub use rotation::{AxisAngle, EulerConvention, Quaternion, Rotation};
pub use tolerance::{Tolerance, ToleranceMode};

/// The query traits, for glob import.
pub mod prelude {
    pub use crate::traits::{
        Contains, DistanceTo, Extent, Flat, IntersectionWith, Intersects, Locate, Location,
        Mirror, Oriented, Rigid,
    };
}
