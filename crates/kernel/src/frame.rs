//! Oriented coordinate frames and conversion to and from the global frame.
//!
//! Frames live in a per-thread arena and are addressed by [`FrameId`].
//! Points, vectors and shapes store a [`FrameRef`], never a copy of the
//! frame, so moving a frame moves everything expressed in it. Frame handles
//! are only meaningful on the thread that created them.

use std::cell::RefCell;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use tracing::{debug, info, instrument};

use crate::error::{GeometryError, Result};
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::rotation::{self, Rotation};

new_key_type! {
    pub struct FrameId;
}

/// The frame a set of coordinates is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameRef {
    #[default]
    Global,
    Local(FrameId),
}

impl From<FrameId> for FrameRef {
    fn from(id: FrameId) -> Self {
        FrameRef::Local(id)
    }
}

/// A frame relative to its parent: `parent = origin + rotation * local`.
///
/// The columns of `rotation` are the frame's axes expressed in the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: Vector3<f64>,
    pub rotation: Matrix3<f64>,
    pub parent: FrameRef,
}

/// Absolute rigid placement of a frame: `global = rotation * local + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn apply_point(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local + self.translation
    }

    pub fn apply_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    pub fn inverse_point(&self, global: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.transpose() * (global - self.translation)
    }

    pub fn inverse_vector(&self, global: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.transpose() * global
    }

    /// `self` applied after `inner`: maps `inner`'s local coordinates through
    /// both placements.
    pub fn then(&self, inner: &Placement) -> Placement {
        Placement {
            rotation: self.rotation * inner.rotation,
            translation: self.rotation * inner.translation + self.translation,
        }
    }
}

/// Arena of frames.
#[derive(Debug, Default)]
pub struct FrameGraph {
    frames: SlotMap<FrameId, Frame>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id)
    }

    /// Insert a frame. `origin` and `rotation` are relative to `parent`.
    pub fn insert(
        &mut self,
        origin: Vector3<f64>,
        rotation: Matrix3<f64>,
        parent: FrameRef,
    ) -> Result<FrameId> {
        rotation::validate_matrix(&rotation)?;
        let id = self.frames.insert(Frame {
            origin,
            rotation,
            parent,
        });
        info!(frame = ?id, parent = ?parent, "created frame");
        Ok(id)
    }

    /// Absolute placement, chain-multiplied through the parents.
    pub fn placement(&self, frame: FrameRef) -> Placement {
        let mut placement = Placement::identity();
        let mut current = frame;
        while let FrameRef::Local(id) = current {
            let f = &self.frames[id];
            let local = Placement {
                rotation: f.rotation,
                translation: f.origin,
            };
            placement = local.then(&placement);
            current = f.parent;
        }
        placement
    }

    /// Rotate a frame in place by a global-frame rotation about a global pivot.
    pub fn rotate(&mut self, id: FrameId, rotation: &Matrix3<f64>, pivot: &Vector3<f64>) {
        let absolute = self.placement(FrameRef::Local(id));
        let new_rotation = rotation * absolute.rotation;
        let new_translation = pivot + rotation * (absolute.translation - pivot);
        self.set_absolute(id, new_rotation, new_translation);
    }

    /// Translate a frame in place by a global-frame offset.
    pub fn translate(&mut self, id: FrameId, offset: &Vector3<f64>) {
        let absolute = self.placement(FrameRef::Local(id));
        self.set_absolute(id, absolute.rotation, absolute.translation + offset);
    }

    fn set_absolute(&mut self, id: FrameId, rotation: Matrix3<f64>, translation: Vector3<f64>) {
        let parent = self.placement(self.frames[id].parent);
        let frame = &mut self.frames[id];
        frame.rotation = parent.rotation.transpose() * rotation;
        frame.origin = parent.inverse_point(&translation);
        debug!(frame = ?id, origin = ?frame.origin, "frame moved");
    }
}

thread_local! {
    static GRAPH: RefCell<FrameGraph> = RefCell::new(FrameGraph::new());
}

/// Run `f` with read access to this thread's frame arena.
pub fn with_graph<R>(f: impl FnOnce(&FrameGraph) -> R) -> R {
    GRAPH.with(|g| f(&g.borrow()))
}

fn with_graph_mut<R>(f: impl FnOnce(&mut FrameGraph) -> R) -> R {
    GRAPH.with(|g| f(&mut g.borrow_mut()))
}

/// Absolute placement of `frame` on this thread.
pub fn placement(frame: FrameRef) -> Placement {
    match frame {
        FrameRef::Global => Placement::identity(),
        local => with_graph(|g| g.placement(local)),
    }
}

/// Create a frame whose origin is `origin` and whose orientation relative to
/// `parent` is `rotation`.
#[instrument(skip(rotation))]
pub fn create(origin: &Point3d, rotation: &Rotation, parent: FrameRef) -> Result<FrameId> {
    let origin = origin.convert_to(parent).coords();
    let matrix = *rotation.matrix();
    with_graph_mut(|g| g.insert(origin, matrix, parent))
}

/// Create a frame from its X and Y axes; Z completes a right-handed basis.
///
/// The axes are normalised but must be orthogonal within the active tolerance.
#[instrument]
pub fn create_from_axes(
    origin: &Point3d,
    x_axis: &Vec3,
    y_axis: &Vec3,
    parent: FrameRef,
) -> Result<FrameId> {
    let x = x_axis
        .convert_to(parent)
        .normalized()
        .ok_or(GeometryError::ZeroLength { what: "frame axis" })?;
    let y = y_axis
        .convert_to(parent)
        .normalized()
        .ok_or(GeometryError::ZeroLength { what: "frame axis" })?;
    let z = x.cross(&y);
    let matrix = Matrix3::from_columns(&[x.coords(), y.coords(), z.coords()]);
    let origin = origin.convert_to(parent).coords();
    with_graph_mut(|g| g.insert(origin, matrix, parent))
}

/// Rotate a frame in place. `rotation` is expressed in the global frame and
/// the pivot defaults to the frame's own origin.
pub fn rotate(frame: FrameId, rotation: &Rotation, around: Option<&Point3d>) {
    let pivot = match around {
        Some(p) => p.to_global().coords(),
        None => placement(FrameRef::Local(frame)).translation,
    };
    let matrix = *rotation.matrix();
    with_graph_mut(|g| g.rotate(frame, &matrix, &pivot));
}

/// Translate a frame in place.
pub fn translate(frame: FrameId, by: &Vec3) {
    let offset = by.to_global().coords();
    with_graph_mut(|g| g.translate(frame, &offset));
}

/// Global position of a frame's origin.
pub fn origin(frame: FrameRef) -> Point3d {
    Point3d::from_coords(placement(frame).translation, FrameRef::Global)
}

/// Global directions of a frame's X, Y and Z axes.
pub fn axes(frame: FrameRef) -> [Vec3; 3] {
    let r = placement(frame).rotation;
    [0, 1, 2].map(|i| Vec3::from_coords(r.column(i).into_owned(), FrameRef::Global))
}

pub fn parent(frame: FrameId) -> Option<FrameRef> {
    with_graph(|g| g.get(frame).map(|f| f.parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn quarter_turn_z() -> Rotation {
        Rotation::from_axis_angle(&Vec3::Z, FRAC_PI_2).unwrap()
    }

    #[test]
    fn test_global_placement_is_identity() {
        let p = placement(FrameRef::Global);
        assert_eq!(p, Placement::identity());
    }

    #[test]
    fn test_point_in_rotated_frame() {
        let f = create(&Point3d::new(1.0, 0.0, 0.0), &quarter_turn_z(), FrameRef::Global).unwrap();
        let p = Point3d::in_frame(1.0, 0.0, 0.0, f.into());
        let g = p.to_global();
        assert!((g.x - 1.0).abs() < 1e-12);
        assert!((g.y - 1.0).abs() < 1e-12);
        assert!(g.z.abs() < 1e-12);
    }

    #[test]
    fn test_nested_frames_compose() {
        let a = create(&Point3d::new(0.0, 0.0, 5.0), &Rotation::identity(), FrameRef::Global).unwrap();
        let b = create(&Point3d::in_frame(1.0, 0.0, 0.0, a.into()), &quarter_turn_z(), a.into()).unwrap();
        let p = Point3d::in_frame(0.0, 2.0, 0.0, b.into()).to_global();
        assert!((p.x - -1.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!((p.z - 5.0).abs() < 1e-12);
        assert_eq!(parent(b), Some(FrameRef::Local(a)));
    }

    #[test]
    fn test_convert_round_trip() {
        let a = create(&Point3d::new(3.0, -2.0, 1.0), &quarter_turn_z(), FrameRef::Global).unwrap();
        let b = create_from_axes(
            &Point3d::new(-1.0, 4.0, 2.0),
            &Vec3::new(0.0, 0.0, 1.0),
            &Vec3::new(1.0, 0.0, 0.0),
            a.into(),
        )
        .unwrap();
        let p = Point3d::new(0.3, 0.7, -1.9);
        let back = p.convert_to(a.into()).convert_to(b.into()).to_global();
        assert!((back.x - p.x).abs() < 1e-12);
        assert!((back.y - p.y).abs() < 1e-12);
        assert!((back.z - p.z).abs() < 1e-12);
    }

    #[test]
    fn test_mutation_moves_dependents() {
        let f = create(&Point3d::ORIGIN, &Rotation::identity(), FrameRef::Global).unwrap();
        let p = Point3d::in_frame(1.0, 0.0, 0.0, f.into());
        translate(f, &Vec3::new(0.0, 0.0, 2.0));
        rotate(f, &quarter_turn_z(), None);
        let g = p.to_global();
        assert!(g.x.abs() < 1e-12);
        assert!((g.y - 1.0).abs() < 1e-12);
        assert!((g.z - 2.0).abs() < 1e-12);
        // The local coordinates themselves are untouched.
        assert_eq!(p.coords(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotate_about_pivot() {
        let f = create(&Point3d::new(2.0, 0.0, 0.0), &Rotation::identity(), FrameRef::Global).unwrap();
        rotate(f, &quarter_turn_z(), Some(&Point3d::ORIGIN));
        let o = origin(f.into());
        assert!(o.x.abs() < 1e-12);
        assert!((o.y - 2.0).abs() < 1e-12);
        let [x, _, _] = axes(f.into());
        assert!((x.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_child_follows_parent_rotation() {
        let a = create(&Point3d::ORIGIN, &Rotation::identity(), FrameRef::Global).unwrap();
        let b = create(&Point3d::in_frame(1.0, 0.0, 0.0, a.into()), &Rotation::identity(), a.into()).unwrap();
        rotate(a, &quarter_turn_z(), None);
        let o = origin(b.into());
        assert!(o.x.abs() < 1e-12);
        assert!((o.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_orthonormal() {
        let skew = Vec3::new(1.0, 1.0, 0.0);
        let err = create_from_axes(&Point3d::ORIGIN, &Vec3::X, &skew, FrameRef::Global);
        assert!(matches!(err, Err(GeometryError::NotOrthonormal { .. })));
        let zero = create_from_axes(&Point3d::ORIGIN, &Vec3::ZERO, &Vec3::Y, FrameRef::Global);
        assert!(matches!(zero, Err(GeometryError::ZeroLength { .. })));
    }
}
