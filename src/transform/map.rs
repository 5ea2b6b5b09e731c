//! Provides mapping functions for placing copies of a shape.

use crate::math::Point3D;
use crate::shape::Shape;

/// Places one copy of `object` at each point.
///
/// # Returns
///
/// A `Vec<Shape>` where each element is `object` translated by one of the
/// vectors from `points`, in order.
#[inline]
pub fn map_translate_3d(object: &Shape, points: &[Point3D]) -> Vec<Shape> {
    points
        .iter()
        .map(|&p| object.clone().translate(p))
        .collect::<Vec<_>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_translate_3d() {
        let c = Shape::cylinder(5., 1., false, Some(30));
        let copies = map_translate_3d(&c, &[Point3D::new(1., 2., 0.), Point3D::zeros()]);
        assert_eq!(copies.len(), 2);
        assert_eq!(
            copies[0].to_code(),
            "translate([1, 2, 0])\n  cylinder(h = 5, d = 2, center = false, $fn = 30);\n"
        );
        assert_eq!(copies[1], c);
    }
}
