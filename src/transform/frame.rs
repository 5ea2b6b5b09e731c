//! Composable coordinate frames.
//!
//! A [`Frame`] is an ordered list of [`Transform`] steps. The first step is
//! applied first, i.e. closest to the geometry being placed; every later
//! step works in the coordinate system the earlier ones produced. Putting a
//! step at the front therefore moves things along the frame's own, already
//! rotated axes, while pushing a step at the back moves them along the
//! parent's axes.
//!
//! A key's world frame is its local steps followed by the resolved steps of
//! its parent, captured once when the key is configured.

use nalgebra as na;

use crate::math::{is_finite3, to_openscad_rotate_angles, Point3D, Unit, ORIGIN};
use crate::shape::Shape;

/// Rotations smaller than this are treated as none.
const ANGLE_EPS: Unit = 1e-12;

/// One rigid step: rotate about X, then Y, then Z (degrees), then translate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// Translation along X.
    pub x: Unit,
    /// Translation along Y.
    pub y: Unit,
    /// Translation along Z.
    pub z: Unit,
    /// Rotation about X in degrees.
    pub rx: Unit,
    /// Rotation about Y in degrees.
    pub ry: Unit,
    /// Rotation about Z in degrees.
    pub rz: Unit,
}

impl Transform {
    /// A pure translation.
    pub const fn translation(x: Unit, y: Unit, z: Unit) -> Self {
        Self {
            x,
            y,
            z,
            rx: 0.,
            ry: 0.,
            rz: 0.,
        }
    }

    /// A pure rotation in degrees.
    pub const fn rotation(rx: Unit, ry: Unit, rz: Unit) -> Self {
        Self {
            x: 0.,
            y: 0.,
            z: 0.,
            rx,
            ry,
            rz,
        }
    }

    /// A rotation followed by a translation.
    pub const fn new(position: [Unit; 3], rotation: [Unit; 3]) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            rx: rotation[0],
            ry: rotation[1],
            rz: rotation[2],
        }
    }

    fn is_finite(&self) -> bool {
        [self.x, self.y, self.z, self.rx, self.ry, self.rz]
            .iter()
            .all(|v| v.is_finite())
    }

    /// The rigid motion of this step.
    pub fn isometry(&self) -> na::Isometry3<Unit> {
        na::Isometry3::from_parts(
            na::Translation3::new(self.x, self.y, self.z),
            na::UnitQuaternion::from_euler_angles(
                self.rx.to_radians(),
                self.ry.to_radians(),
                self.rz.to_radians(),
            ),
        )
    }
}

/// An ordered, immutable list of transform steps.
///
/// Every operation consumes the frame and returns a new one; clones taken
/// earlier are never affected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    ops: Vec<Transform>,
}

impl Frame {
    /// The identity frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// The steps of this frame, first applied first.
    pub fn ops(&self) -> &[Transform] {
        &self.ops
    }

    /// Adds `t` as the last step.
    ///
    /// # Panics
    ///
    /// Panics if any component of `t` is not finite.
    pub fn push(mut self, t: Transform) -> Self {
        assert!(t.is_finite(), "transform components must be finite");
        self.ops.push(t);
        self
    }

    /// Translates along the outer (parent) axes.
    pub fn translate(self, x: Unit, y: Unit, z: Unit) -> Self {
        self.push(Transform::translation(x, y, z))
    }

    /// Translates along the outer Z axis.
    pub fn translate_z(self, z: Unit) -> Self {
        self.translate(0., 0., z)
    }

    /// Rotates about the outer X axis.
    pub fn rotate_x(self, degrees: Unit) -> Self {
        self.push(Transform::rotation(degrees, 0., 0.))
    }

    /// Rotates about the outer Y axis.
    pub fn rotate_y(self, degrees: Unit) -> Self {
        self.push(Transform::rotation(0., degrees, 0.))
    }

    /// Rotates about the outer Z axis.
    pub fn rotate_z(self, degrees: Unit) -> Self {
        self.push(Transform::rotation(0., 0., degrees))
    }

    /// Translates along the frame's own axes.
    ///
    /// # Panics
    ///
    /// Panics if any component is not finite.
    pub fn translate_local(mut self, x: Unit, y: Unit, z: Unit) -> Self {
        let t = Transform::translation(x, y, z);
        assert!(t.is_finite(), "transform components must be finite");
        self.ops.insert(0, t);
        self
    }

    /// Rotates about the frame's own axes, around its own origin.
    ///
    /// # Panics
    ///
    /// Panics if any angle is not finite.
    pub fn rotate_local(mut self, rx: Unit, ry: Unit, rz: Unit) -> Self {
        let t = Transform::rotation(rx, ry, rz);
        assert!(t.is_finite(), "transform components must be finite");
        self.ops.insert(0, t);
        self
    }

    /// Splices `other`'s steps in front of this frame's own, so they act in
    /// this frame's local coordinates.
    pub fn append_front(mut self, other: &Frame) -> Self {
        self.ops.splice(0..0, other.ops.iter().copied());
        self
    }

    /// Adds `other`'s steps after this frame's own, so this frame is placed
    /// inside `other`.
    pub fn then(mut self, other: &Frame) -> Self {
        self.ops.extend_from_slice(&other.ops);
        self
    }

    /// The rigid motion of the whole list.
    pub fn isometry(&self) -> na::Isometry3<Unit> {
        self.ops
            .iter()
            .fold(na::Isometry3::identity(), |acc, t| t.isometry() * acc)
    }

    /// Maps a point given in local coordinates into the outer space.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not finite.
    pub fn apply(&self, p: Point3D) -> Point3D {
        assert!(is_finite3(&p), "point must be finite");
        self.isometry().transform_point(&na::Point3::from(p)).coords
    }

    /// Where the local origin ends up.
    pub fn origin(&self) -> Point3D {
        self.apply(ORIGIN)
    }

    /// Places `shape` with this frame: one rotation and one translation.
    pub fn apply_to(&self, shape: Shape) -> Shape {
        let iso = self.isometry();
        let shape = if iso.rotation.angle() < ANGLE_EPS {
            shape
        } else {
            let (rx, ry, rz) = to_openscad_rotate_angles(&iso.rotation.to_rotation_matrix());
            let degrees = Point3D::new(rx, ry, rz)
                .map(|a| a.to_degrees())
                .map(|a| if a.abs() < ANGLE_EPS { 0. } else { a });
            shape.rotate(degrees)
        };
        shape.translate(iso.translation.vector)
    }
}
