//! Placing keys along the curved columns of the bowl.
//!
//! A column key sits one step along a circular arc of a given radius from
//! its home-row parent. The step is the rotation at which the straight-line
//! distance between the two switch tops first exceeds
//! [`BOWL_KEY_SPACING`]. The calibrated values below are what the physical
//! layout was built with and are used as-is for those radii.

use float_cmp::approx_eq;
use tracing::debug;

use crate::math::Unit;
use crate::transform::Frame;

/// The direct distance between switch tops in the bowl.
pub const BOWL_KEY_SPACING: Unit = 18.;

/// Search increment in degrees.
const SEARCH_STEP: Unit = 0.01;

/// `(radius, degrees)` pairs measured for the layout.
const CALIBRATED: [(Unit, Unit); 5] = [
    (50., 20.740),
    (55., 18.840),
    (60., 17.26),
    (65., 15.920),
    (70., 14.780),
];

/// One arc step about the X axis: drop to the arc center, rotate, come back
/// up.
pub fn arc_frame(radius: Unit, degrees: Unit) -> Frame {
    Frame::new()
        .translate_z(-radius)
        .rotate_x(degrees)
        .translate_z(radius)
}

/// The arc step for a key above (`up`) or below its parent.
pub fn arc_step(radius: Unit, up: bool) -> Frame {
    let degrees = arc_degrees(radius);
    arc_frame(radius, if up { degrees } else { -degrees })
}

/// The step angle for `radius`, from the calibrated table when available.
pub fn arc_degrees(radius: Unit) -> Unit {
    CALIBRATED
        .iter()
        .find(|(r, _)| approx_eq!(Unit, *r, radius))
        .map_or_else(|| search_arc_degrees(radius, BOWL_KEY_SPACING), |&(_, d)| d)
}

/// Walks the angle up from 1° in 0.01° steps until the switch top has moved
/// more than `spacing` in a straight line.
///
/// # Panics
///
/// Panics if the arc is too small to ever reach `spacing`.
pub fn search_arc_degrees(radius: Unit, spacing: Unit) -> Unit {
    assert!(
        radius.is_finite() && spacing.is_finite() && 2. * radius > spacing,
        "an arc of radius {radius} never reaches {spacing}"
    );
    let mut degrees = 1.;
    while arc_frame(radius, degrees).origin().norm() <= spacing {
        degrees += SEARCH_STEP;
    }
    debug!(radius, degrees, "computed arc step");
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3D;
    use crate::test_utils::{assert_approx_eq_float, assert_approx_eq_vec};

    #[test]
    fn test_calibrated_table_is_reproduced() {
        for (radius, degrees) in CALIBRATED {
            assert_approx_eq_float(search_arc_degrees(radius, BOWL_KEY_SPACING), degrees, 0.015);
        }
    }

    #[test]
    fn test_calibrated_values_cross_the_spacing() {
        for (radius, degrees) in CALIBRATED {
            let at = arc_frame(radius, degrees).origin().norm();
            let before = arc_frame(radius, degrees - SEARCH_STEP).origin().norm();
            assert!(at > BOWL_KEY_SPACING, "radius {radius}: {at}");
            assert!(before <= BOWL_KEY_SPACING, "radius {radius}: {before}");
        }
    }

    #[test]
    fn test_uncalibrated_radius_is_searched() {
        let d = arc_degrees(80.);
        let chord = arc_frame(80., d).origin().norm();
        assert!(chord > BOWL_KEY_SPACING);
        assert!(chord < BOWL_KEY_SPACING + 0.05);
    }

    #[test]
    fn test_arc_step_direction() {
        let up = arc_step(55., true).origin();
        let down = arc_step(55., false).origin();
        assert!(up.y > 0. && up.z > 0.);
        assert!(down.y < 0. && down.z > 0.);
        assert_approx_eq_vec(up, Point3D::new(0., -down.y, down.z), 1e-9);
    }

    #[test]
    #[should_panic]
    fn test_tiny_radius_fails() {
        search_arc_degrees(5., BOWL_KEY_SPACING);
    }
}
