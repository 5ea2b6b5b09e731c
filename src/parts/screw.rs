//! Heat-set screw inserts holding the bottom plate to the case.

use crate::math::{Point3D, Unit};
use crate::shape::Shape;
use crate::transform::map::map_translate_3d;

/// A cylindrical boss with a hole for a threaded insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrewInsert {
    /// Height of the boss above the ground.
    pub height: Unit,
    /// Radius of the hole.
    pub radius: Unit,
    /// Wall thickness of the boss around the hole.
    pub wall: Unit,
    /// Facets per cylinder.
    pub segments: u32,
}

impl Default for ScrewInsert {
    fn default() -> Self {
        Self::new(5., 2.2, 1.65)
    }
}

impl ScrewInsert {
    /// Creates a new [`ScrewInsert`] with 30 facets per cylinder.
    ///
    /// # Arguments
    ///
    /// * `height` - The height of the boss.
    /// * `radius` - The radius of the insert hole.
    /// * `wall` - The wall thickness around the hole.
    pub const fn new(height: Unit, radius: Unit, wall: Unit) -> Self {
        Self {
            height,
            radius,
            wall,
            segments: 30,
        }
    }

    /// The solid boss, standing on `z = 0`.
    ///
    /// # Panics
    ///
    /// Panics if the height or the outer radius is not positive.
    pub fn boss(&self) -> Shape {
        assert!(self.height > 0., "height must be positive");
        Shape::cylinder(
            self.height,
            self.radius + self.wall,
            false,
            Some(self.segments),
        )
    }

    /// The hole, reaching through the ground and past the top of the boss.
    ///
    /// # Panics
    ///
    /// Panics if the height or the radius is not positive.
    pub fn hole(&self) -> Shape {
        assert!(self.height > 0., "height must be positive");
        assert!(self.radius > 0., "radius must be positive");
        Shape::cylinder(self.height + 2., self.radius, true, Some(self.segments))
    }

    /// One boss at each point.
    pub fn bosses(&self, points: &[Point3D]) -> Vec<Shape> {
        map_translate_3d(&self.boss(), points)
    }

    /// One hole at each point.
    pub fn holes(&self, points: &[Point3D]) -> Vec<Shape> {
        map_translate_3d(&self.hole(), points)
    }
}
