//! Frame graph behaviour seen through shapes expressed in local frames.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use approx::assert_abs_diff_eq;
use geom_kernel::prelude::*;
use geom_kernel::{Box3d, FrameRef, GeometryError, Point3d, Rotation, Segment, Sphere, Vec3, frame};

// ── Conversion ──────────────────────────────────────────────────────────

#[test]
fn local_point_resolves_through_rotation() -> Result<(), GeometryError> {
    let f = frame::create(&Point3d::new(1.0, 0.0, 0.0), &Rotation::about_z(FRAC_PI_2), FrameRef::Global)?;
    let p = Point3d::in_frame(1.0, 0.0, 0.0, f.into());
    assert_abs_diff_eq!(p.to_global(), Point3d::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    Ok(())
}

#[test]
fn convert_to_keeps_the_shape_in_place() -> Result<(), GeometryError> {
    let f = frame::create(&Point3d::new(-3.0, 2.0, 7.0), &Rotation::about_x(0.6), FrameRef::Global)?;
    let s = Segment::new(Point3d::new(1.0, 2.0, 3.0), Point3d::new(4.0, -1.0, 0.5))?;
    let local = s.convert_to(f.into());
    assert_eq!(local.start().frame, FrameRef::Local(f));
    assert!((local.start().x - 1.0).abs() > 1e-3);
    assert!(local.equals(&s));
    Ok(())
}

#[test]
fn axes_frame_completes_right_handed_basis() -> Result<(), GeometryError> {
    let f = frame::create_from_axes(&Point3d::ORIGIN, &Vec3::Y, &Vec3::Z, FrameRef::Global)?;
    let [x, y, z] = frame::axes(f.into());
    assert_abs_diff_eq!(x, Vec3::Y, epsilon = 1e-12);
    assert_abs_diff_eq!(y, Vec3::Z, epsilon = 1e-12);
    assert_abs_diff_eq!(z, Vec3::X, epsilon = 1e-12);
    let skew = frame::create_from_axes(
        &Point3d::ORIGIN,
        &Vec3::X,
        &Vec3::new(1.0, 1.0, 0.0),
        FrameRef::Global,
    );
    assert!(skew.is_err());
    Ok(())
}

// ── Retroactive movement ────────────────────────────────────────────────

#[test]
fn translating_a_frame_moves_its_shapes() -> Result<(), GeometryError> {
    let f = frame::create(&Point3d::new(1.0, 0.0, 0.0), &Rotation::identity(), FrameRef::Global)?;
    let s = Sphere::new(Point3d::in_frame(0.0, 0.0, 0.0, f.into()), 1.0)?;
    let probe = Point3d::new(1.0, 4.0, 0.0);
    assert!((s.distance_to(&probe) - 3.0).abs() < 1e-12);

    frame::translate(f, &Vec3::new(0.0, 2.0, 0.0));
    assert!((s.distance_to(&probe) - 1.0).abs() < 1e-12);
    assert_abs_diff_eq!(s.center().to_global(), Point3d::new(1.0, 2.0, 0.0), epsilon = 1e-12);
    Ok(())
}

#[test]
fn rotating_a_frame_about_origin_and_pivot() -> Result<(), GeometryError> {
    let f = frame::create(&Point3d::new(2.0, 0.0, 0.0), &Rotation::identity(), FrameRef::Global)?;
    let p = Point3d::in_frame(1.0, 0.0, 0.0, f.into());

    frame::rotate(f, &Rotation::about_z(FRAC_PI_2), None);
    assert_abs_diff_eq!(p.to_global(), Point3d::new(2.0, 1.0, 0.0), epsilon = 1e-12);

    frame::rotate(f, &Rotation::about_z(FRAC_PI_2), Some(&Point3d::ORIGIN));
    assert_abs_diff_eq!(p.to_global(), Point3d::new(-1.0, 2.0, 0.0), epsilon = 1e-12);
    Ok(())
}

#[test]
fn child_frames_follow_their_parent() -> Result<(), GeometryError> {
    let parent = frame::create(&Point3d::new(10.0, 0.0, 0.0), &Rotation::identity(), FrameRef::Global)?;
    let child = frame::create(&Point3d::new(10.0, 5.0, 0.0), &Rotation::about_y(0.3), parent.into())?;
    assert_eq!(frame::parent(child), Some(FrameRef::Local(parent)));
    assert_abs_diff_eq!(frame::origin(child.into()), Point3d::new(10.0, 5.0, 0.0), epsilon = 1e-12);

    frame::translate(parent, &Vec3::new(0.0, 0.0, 3.0));
    assert_abs_diff_eq!(frame::origin(child.into()), Point3d::new(10.0, 5.0, 3.0), epsilon = 1e-12);
    Ok(())
}

// ── Queries across frames ───────────────────────────────────────────────

#[test]
fn box_in_rotated_frame_against_global_sphere() -> Result<(), GeometryError> {
    let f = frame::create(&Point3d::new(5.0, 0.0, 0.0), &Rotation::about_z(FRAC_PI_4), FrameRef::Global)?;
    let b = Box3d::new(Point3d::in_frame(0.0, 0.0, 0.0, f.into()), 2.0, 2.0, 2.0)?;
    let s = Sphere::new(Point3d::new(5.0, 0.0, 5.0), 1.0)?;

    assert!((b.distance_to(&s) - 3.0).abs() < 1e-9);
    assert!(!b.intersects(&s));

    frame::translate(f, &Vec3::new(0.0, 0.0, 3.0));
    assert!(b.distance_to(&s) < 1e-9);
    assert!(b.intersects(&s));
    assert_eq!(b.locate(&Point3d::new(5.0, 0.0, 4.0)), Location::Boundary);
    Ok(())
}
