#![allow(dead_code)]

use approx::abs_diff_eq;

use crate::math::{Point3D, Unit};

pub fn assert_approx_eq_float(a: Unit, b: Unit, tol: Unit) {
    assert!(
        abs_diff_eq!(a, b, epsilon = tol),
        "Floats {a} and {b} are not approximately equal within tolerance {tol}"
    );
}

pub fn assert_approx_eq_vec(a: Point3D, b: Point3D, tol: Unit) {
    assert!(
        (a - b).norm() < tol,
        "Vectors [{}, {}, {}] and [{}, {}, {}] are not approximately equal within tolerance {tol}",
        a.x,
        a.y,
        a.z,
        b.x,
        b.y,
        b.z
    );
}
