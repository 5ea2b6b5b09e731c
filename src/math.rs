//! Small math helpers shared by frames, shapes and the wall builder.

use nalgebra as na;

/// Scalar used for every length and angle.
pub type Unit = f64;

/// A point or vector in 3D space.
pub type Point3D = na::Vector3<Unit>;

/// A point or vector in the plane.
pub type Point2D = na::Vector2<Unit>;

/// The origin of a local coordinate system.
pub const ORIGIN: Point3D = Point3D::new(0., 0., 0.);

/// Values closer to zero than this are written as `0` in comments.
const PRINT_EPS: Unit = 5e-9;

/// Converts a 3D rotation matrix into Euler angles (XYZ) in radians.
///
/// The angles are extrinsic and ordered X, Y, Z, which is what
/// `rotate(a = [x, y, z])` expects.
#[inline]
pub fn to_openscad_rotate_angles(r: &na::Rotation3<Unit>) -> (Unit, Unit, Unit) {
    static ORDER: [na::Unit<na::Vector3<Unit>>; 3] = [
        na::Unit::new_unchecked(na::Vector3::new(1.0, 0.0, 0.0)),
        na::Unit::new_unchecked(na::Vector3::new(0.0, 1.0, 0.0)),
        na::Unit::new_unchecked(na::Vector3::new(0.0, 0.0, 1.0)),
    ];
    let (angles, _) = r.euler_angles_ordered(ORDER, true);
    (angles[0], angles[1], angles[2])
}

/// Renders a number for a comment in the emitted script.
///
/// Eight decimals, trailing zeros trimmed, and `-0` folded into `0`, so the
/// same geometry always prints the same bytes.
pub fn format_number(v: Unit) -> String {
    if v.abs() < PRINT_EPS {
        return "0".to_string();
    }
    let s = format!("{v:.8}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Checks if a vector is approximately the zero vector.
#[inline]
pub fn is_approx_zero(v: Point3D) -> bool {
    v.norm() < 1e-10
}

/// Checks that every component is finite.
#[inline]
pub fn is_finite3(v: &Point3D) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Drops the vertical component of a vector.
#[inline]
pub fn horizontal(v: Point3D) -> Point3D {
    Point3D::new(v.x, v.y, 0.)
}
