use thiserror::Error;

/// Errors raised when constructing geometry from invalid input.
///
/// Queries never fail: a degenerate configuration (parallel lines, disjoint
/// shapes) is reported through the query result instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("zero-length {what}")]
    ZeroLength { what: &'static str },

    #[error("coincident points cannot define a {what}")]
    CoincidentPoints { what: &'static str },

    #[error("non-positive {what}: {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("degenerate triangle (area {area})")]
    DegenerateTriangle { area: f64 },

    #[error("degenerate tetrahedron (volume {volume})")]
    DegenerateTetrahedron { volume: f64 },

    #[error("rotation matrix is not orthonormal with determinant +1 (deviation {deviation})")]
    NotOrthonormal { deviation: f64 },

    #[error("box edges are not mutually orthogonal")]
    NonOrthogonalEdges,

    #[error("zero quaternion cannot represent a rotation")]
    ZeroQuaternion,

    #[error("polytope needs at least {min} {what}, got {got}")]
    TooFew {
        what: &'static str,
        min: usize,
        got: usize,
    },

    #[error("face {face} references vertex {index} but only {count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },

    #[error("face {face} is degenerate")]
    DegenerateFace { face: usize },

    #[error("face {face} is not planar (deviation {deviation})")]
    NonPlanarFace { face: usize, deviation: f64 },

    #[error("polytope is not closed: edge ({a}, {b}) is used {uses} time(s)")]
    OpenPolytope { a: usize, b: usize, uses: usize },

    #[error("polytope is not convex: vertex {vertex} lies {gap} outside face {face}")]
    NonConvex { vertex: usize, face: usize, gap: f64 },

    #[error("polytope has zero volume")]
    ZeroVolume,
}

pub type Result<T> = std::result::Result<T, GeometryError>;
