use nalgebra::{Matrix3, Vector3};

use super::point::Point3d;
use super::vector::Vec3;
use crate::frame::FrameRef;
use crate::rotation::Rotation;

/// An isometry of global space: `p' = linear * p + translation`.
///
/// `linear` is orthogonal; its determinant is -1 for reflections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidMotion {
    pub linear: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl Default for RigidMotion {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidMotion {
    pub fn identity() -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn translation(by: &Vec3) -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: by.to_global().coords(),
        }
    }

    /// Rotation about a pivot point.
    pub fn rotation(rotation: &Rotation, about: &Point3d) -> Self {
        let c = about.to_global().coords();
        let r = *rotation.matrix();
        Self {
            linear: r,
            translation: c - r * c,
        }
    }

    /// Point reflection through `center`.
    pub fn point_reflection(center: &Point3d) -> Self {
        let c = center.to_global().coords();
        Self {
            linear: -Matrix3::identity(),
            translation: c * 2.0,
        }
    }

    /// Half-turn about the line through `point` with unit `direction`.
    pub fn line_reflection(point: &Point3d, direction: &Vec3) -> Self {
        let a = point.to_global().coords();
        let d = direction.to_global().coords();
        Self::about_fixed(a, d * d.transpose() * 2.0 - Matrix3::identity())
    }

    /// Mirror in the plane through `point` with unit `normal`.
    pub fn plane_reflection(point: &Point3d, normal: &Vec3) -> Self {
        let a = point.to_global().coords();
        let n = normal.to_global().coords();
        Self::about_fixed(a, Matrix3::identity() - n * n.transpose() * 2.0)
    }

    /// Linear map that leaves `fixed` in place.
    fn about_fixed(fixed: Vector3<f64>, linear: Matrix3<f64>) -> Self {
        Self {
            linear,
            translation: fixed - linear * fixed,
        }
    }

    pub fn is_reflection(&self) -> bool {
        self.linear.determinant() < 0.0
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &RigidMotion) -> Self {
        Self {
            linear: next.linear * self.linear,
            translation: next.linear * self.translation + next.translation,
        }
    }

    /// Move a point; the result stays in the point's own frame.
    pub fn apply_point(&self, p: &Point3d) -> Point3d {
        let g = self.linear * p.to_global().coords() + self.translation;
        Point3d::from_coords(g, FrameRef::Global).convert_to(p.frame)
    }

    /// Move a vector; the result stays in the vector's own frame.
    pub fn apply_vector(&self, v: &Vec3) -> Vec3 {
        let g = self.linear * v.to_global().coords();
        Vec3::from_coords(g, FrameRef::Global).convert_to(v.frame)
    }
}
