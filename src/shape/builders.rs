//! Geometry builders.
//!
//! Helpers for the small accessory parts: boxes and rectangles given by two
//! corners, and the planar rings and frames that get extruded into bezels
//! and adapters.

use crate::error::Result;
use crate::math::{format_number, Point2D, Point3D, Unit};

use super::Shape;

/// Creates a cuboid defined by two opposite corner points.
///
/// # Panics
///
/// Panics if the two points share a coordinate (zero-sized box).
pub fn cuboid_from_to(p0: Point3D, p1: Point3D) -> Shape {
    let from = p0.inf(&p1);
    let to = p0.sup(&p1);

    Shape::cube(to - from).translate(from).commented(&format!(
        "cuboid_from_to([{}, {}, {}], [{}, {}, {}])",
        format_number(p0.x),
        format_number(p0.y),
        format_number(p0.z),
        format_number(p1.x),
        format_number(p1.y),
        format_number(p1.z)
    ))
}

/// Creates a square defined by two opposite corner points.
///
/// The square is placed with a planar `translate`.
///
/// # Panics
///
/// Panics if the two points share a coordinate (zero-sized rectangle).
pub fn square_from_to(p0: Point2D, p1: Point2D) -> Shape {
    let from = p0.inf(&p1);
    let to = p0.sup(&p1);

    Shape::square(to - from)
        .translate(Point3D::new(from.x, from.y, 0.))
        .commented(&format!(
            "square_from_to([{}, {}], [{}, {}])",
            format_number(p0.x),
            format_number(p0.y),
            format_number(p1.x),
            format_number(p1.y)
        ))
}

/// A flat ring: a circle of radius `inner + width` minus a circle of
/// radius `inner`.
pub fn ring_2d(inner: Unit, width: Unit, segments: u32) -> Result<Shape> {
    Shape::circle(inner + width, Some(segments))
        .subtract(vec![Shape::circle(inner, Some(segments))])
}

/// A flat rectangular frame of the given inner size and wall thickness,
/// centered on the origin.
pub fn frame_2d(inner: Point2D, thickness: Unit) -> Result<Shape> {
    let outer = inner + Point2D::new(thickness * 2., thickness * 2.);
    Shape::square_centered(outer).subtract(vec![Shape::square_centered(inner)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_from_to() {
        let p0 = Point3D::new(1., 4., 3.);
        let p1 = Point3D::new(5., -2., 7.);
        let c = cuboid_from_to(p0, p1);

        assert_eq!(
            c.to_code(),
            r"/* cuboid_from_to([1, 4, 3], [5, -2, 7]) */
translate([1, -2, 3])
  cube(size = [4, 6, 4]);
"
        );
    }

    #[test]
    fn test_cuboid_from_origin_has_no_translate() {
        let c = cuboid_from_to(Point3D::new(2., 2., 2.), Point3D::zeros());
        assert_eq!(
            c.to_code(),
            r"/* cuboid_from_to([2, 2, 2], [0, 0, 0]) */
cube(size = [2, 2, 2]);
"
        );
    }

    #[test]
    fn test_square_from_to() {
        let p0 = Point2D::new(1., 4.);
        let p1 = Point2D::new(5., -2.);
        let s = square_from_to(p0, p1);

        assert_eq!(
            s.to_code(),
            r"/* square_from_to([1, 4], [5, -2]) */
translate([1, -2])
  square(size = [4, 6]);
"
        );
    }

    #[test]
    fn test_ring_2d() {
        assert_eq!(
            ring_2d(4.9, 3., 20).unwrap().to_code(),
            r"difference() {
  circle(r = 7.9, $fn = 20);
  circle(r = 4.9, $fn = 20);
}
"
        );
    }

    #[test]
    fn test_frame_2d() {
        assert_eq!(
            frame_2d(Point2D::new(11.8, 7.4), 4.).unwrap().to_code(),
            r"difference() {
  square(size = [19.8, 15.4], center = true);
  square(size = [11.8, 7.4], center = true);
}
"
        );
    }
}
