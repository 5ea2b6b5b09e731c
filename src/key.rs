//! A single keyswitch site.
//!
//! A [`Key`] is built once from a [`KeyConfig`] and is read-only afterwards.
//! Its world frame is the key's own steps followed by a snapshot of its
//! parent's world frame; moving the parent later never moves the child.

use crate::error::Result;
use crate::math::{format_number, Point3D, Unit};
use crate::shape::Shape;
use crate::transform::{Frame, Transform};

pub mod arc;
pub mod grid;

/// Distance between the centers of two neighboring keys on a flat row.
pub const KEY_PITCH: Unit = 19.;
/// Width of the square switch cutout.
pub const SWITCH_HOLE_WIDTH: Unit = 14.;
/// Thickness of the plate the switch clips into.
pub const PLATE_THICKNESS: Unit = 4.;
/// Distance from the top of a key cap down to the top of its switch.
pub const SWITCH_Z_OFFSET: Unit = 10.;

/// Side length of the post used to anchor connectors and walls.
const POST_SIZE: Unit = 0.1;
const NUB_RADIUS: Unit = 1.;
const NUB_LENGTH: Unit = 2.75;
const SMALL_OVERLAP: Unit = 0.05;

const CAP_BOTTOM_WIDTH: Unit = 18.;
const CAP_TOP_WIDTH: Unit = 12.5;
const CAP_BOTTOM_Z: Unit = 3.;
const CAP_SLAB: Unit = 0.1;

/// Extra plate width added on each edge of a key, outward from the center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeExtras {
    /// Extra width above the top edge.
    pub top: Unit,
    /// Extra width below the bottom edge.
    pub bottom: Unit,
    /// Extra width left of the left edge.
    pub left: Unit,
    /// Extra width right of the right edge.
    pub right: Unit,
}

impl EdgeExtras {
    /// No extra width anywhere.
    pub const NONE: Self = Self {
        top: 0.,
        bottom: 0.,
        left: 0.,
        right: 0.,
    };
}

/// One corner of a key's plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Towards -x, +y.
    TopLeft,
    /// Towards +x, +y.
    TopRight,
    /// Towards -x, -y.
    BottomLeft,
    /// Towards +x, -y.
    BottomRight,
}

/// Everything needed to place a key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyConfig {
    /// Name used in comments and lookups.
    pub name: String,
    /// World frame of the parent, captured at configuration time.
    pub parent: Frame,
    /// Steps applied before the position and rotation, e.g. an arc step.
    pub local: Frame,
    /// Offset from the parent.
    pub position: Point3D,
    /// Rotation about X, Y, Z in degrees, applied before `position`.
    pub rotation: Point3D,
    /// Extra plate width per edge.
    pub extra: EdgeExtras,
    /// Whether the switch cutout gets its locating nubs.
    pub add_side_nub: bool,
    /// Lifts the switch geometry along the key's own Z axis.
    pub extra_z: Unit,
}

impl KeyConfig {
    /// A key at the identity frame.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: Frame::new(),
            local: Frame::new(),
            position: Point3D::zeros(),
            rotation: Point3D::zeros(),
            extra: EdgeExtras::NONE,
            add_side_nub: true,
            extra_z: 0.,
        }
    }

    /// Places the key relative to `frame`.
    pub fn parent(mut self, frame: &Frame) -> Self {
        self.parent = frame.clone();
        self
    }

    /// Places the key relative to another key's current world frame.
    pub fn parent_key(self, key: &Key) -> Self {
        self.parent(&key.frame())
    }

    /// Sets the leading local steps.
    pub fn local(mut self, frame: Frame) -> Self {
        self.local = frame;
        self
    }

    /// Sets the offset from the parent.
    pub fn position(mut self, x: Unit, y: Unit, z: Unit) -> Self {
        self.position = Point3D::new(x, y, z);
        self
    }

    /// Sets the rotation in degrees.
    pub fn rotation(mut self, rx: Unit, ry: Unit, rz: Unit) -> Self {
        self.rotation = Point3D::new(rx, ry, rz);
        self
    }

    /// Places the key one bowl step along a column arc of `radius`.
    pub fn on_arc(self, radius: Unit, up: bool) -> Self {
        self.local(arc::arc_step(radius, up))
    }

    /// Sets the extra plate width per edge.
    pub fn extra(mut self, extra: EdgeExtras) -> Self {
        self.extra = extra;
        self
    }

    /// Enables or disables the locating nubs.
    pub fn side_nub(mut self, add: bool) -> Self {
        self.add_side_nub = add;
        self
    }

    /// Lifts the switch geometry.
    pub fn extra_z(mut self, z: Unit) -> Self {
        self.extra_z = z;
        self
    }
}

/// The placement and derived geometry of one keyswitch.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    name: String,
    local: Frame,
    parent: Frame,
    extra: EdgeExtras,
    add_side_nub: bool,
    /// Whether the switch sits [`SWITCH_Z_OFFSET`] below the frame origin.
    switch_z_offset: bool,
    extra_z: Unit,
}

/// The small post shape anchored at a frame's origin, reaching down through
/// the plate.
pub fn post() -> Shape {
    Shape::cube_centered(Point3D::new(POST_SIZE, POST_SIZE, PLATE_THICKNESS))
        .translate_z(-PLATE_THICKNESS / 2.)
}

impl Key {
    /// Builds a key from its configuration.
    pub fn new(config: KeyConfig) -> Self {
        let KeyConfig {
            name,
            parent,
            local,
            position,
            rotation,
            extra,
            add_side_nub,
            extra_z,
        } = config;
        let local = if position == Point3D::zeros() && rotation == Point3D::zeros() {
            local
        } else {
            local.push(Transform::new(position.into(), rotation.into()))
        };
        Self {
            name,
            local,
            parent,
            extra,
            add_side_nub,
            switch_z_offset: true,
            extra_z,
        }
    }

    /// Moves the key's origin along its parent's Z axis and drops the
    /// default switch offset.
    ///
    /// Applied once to every key after the whole layout is built, so keys
    /// configured from this one are not affected.
    pub fn with_origin_correction(mut self, dz: Unit) -> Self {
        self.local = self.local.translate_z(dz);
        self.switch_z_offset = false;
        self
    }

    /// Enables or disables the locating nubs of a built key.
    pub fn with_side_nub(mut self, add: bool) -> Self {
        self.add_side_nub = add;
        self
    }

    /// Replaces the extra plate width of a built key.
    pub fn with_extra(mut self, extra: EdgeExtras) -> Self {
        self.extra = extra;
        self
    }

    /// Lifts the switch geometry of a built key.
    pub fn with_extra_z(mut self, z: Unit) -> Self {
        self.extra_z = z;
        self
    }

    /// The key's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extra plate width per edge.
    pub fn extra(&self) -> EdgeExtras {
        self.extra
    }

    /// The key's world frame.
    pub fn frame(&self) -> Frame {
        self.local.clone().then(&self.parent)
    }

    /// The frame whose origin is the center of the switch top.
    pub fn switch_frame(&self) -> Frame {
        let offset = if self.switch_z_offset {
            -SWITCH_Z_OFFSET
        } else {
            0.
        };
        let dz = offset + self.extra_z;
        if dz == 0. {
            self.frame()
        } else {
            self.frame().translate_local(0., 0., dz)
        }
    }

    /// The frame at one corner of the plate top.
    ///
    /// # Arguments
    ///
    /// * `corner` - Which corner.
    ///
    /// # Returns
    ///
    /// The switch frame moved half a pitch along its local X and Y axes,
    /// plus the extra width of the two edges meeting at `corner`.
    pub fn corner(&self, corner: Corner) -> Frame {
        let half = KEY_PITCH / 2.;
        let (x, y) = match corner {
            Corner::TopLeft => (-(half + self.extra.left), half + self.extra.top),
            Corner::TopRight => (half + self.extra.right, half + self.extra.top),
            Corner::BottomLeft => (-(half + self.extra.left), -(half + self.extra.bottom)),
            Corner::BottomRight => (half + self.extra.right, -(half + self.extra.bottom)),
        };
        self.switch_frame().translate_local(x, y, 0.)
    }

    /// The top-left corner frame.
    pub fn top_left(&self) -> Frame {
        self.corner(Corner::TopLeft)
    }

    /// The top-right corner frame.
    pub fn top_right(&self) -> Frame {
        self.corner(Corner::TopRight)
    }

    /// The bottom-left corner frame.
    pub fn bottom_left(&self) -> Frame {
        self.corner(Corner::BottomLeft)
    }

    /// The bottom-right corner frame.
    pub fn bottom_right(&self) -> Frame {
        self.corner(Corner::BottomRight)
    }

    /// The plate block without its cutout, in local coordinates.
    fn local_block(&self) -> Shape {
        let half = KEY_PITCH / 2.;
        let size = Point3D::new(
            KEY_PITCH + self.extra.left + self.extra.right,
            KEY_PITCH + self.extra.top + self.extra.bottom,
            PLATE_THICKNESS,
        );
        Shape::cube(size).translate(Point3D::new(
            -(half + self.extra.left),
            -(half + self.extra.bottom),
            -PLATE_THICKNESS,
        ))
    }

    /// The solid plate footprint, used to fill the bottom plate under the
    /// switch.
    pub fn plate_block(&self) -> Shape {
        self.switch_frame().apply_to(self.local_block())
    }

    /// The plate with the switch cutout, placed in the world.
    pub fn switch(&self) -> Result<Shape> {
        let hole = Shape::cube_centered(Point3D::new(
            SWITCH_HOLE_WIDTH,
            SWITCH_HOLE_WIDTH,
            PLATE_THICKNESS + 2. * SMALL_OVERLAP,
        ))
        .translate_z(-PLATE_THICKNESS / 2.);
        let plate = self.local_block().subtract(vec![hole])?;

        let plate = if self.add_side_nub {
            let nub = Shape::cylinder(NUB_LENGTH, NUB_RADIUS, true, Some(30))
                .rotate(Point3D::new(90., 0., 0.));
            let x = SWITCH_HOLE_WIDTH / 2.;
            let z = -PLATE_THICKNESS / 2.;
            Shape::union(vec![
                plate,
                nub.clone().translate(Point3D::new(-x, 0., z)),
                nub.translate(Point3D::new(x, 0., z)),
            ])?
        } else {
            plate
        };

        Ok(self
            .switch_frame()
            .apply_to(plate)
            .commented(&format!("switch {}", self.name)))
    }

    /// A simple key cap sitting on the switch, for previews.
    pub fn cap(&self) -> Result<Shape> {
        let bottom = Shape::cube_centered(Point3D::new(CAP_BOTTOM_WIDTH, CAP_BOTTOM_WIDTH, CAP_SLAB))
            .translate_z(CAP_BOTTOM_Z);
        let top = Shape::cube_centered(Point3D::new(CAP_TOP_WIDTH, CAP_TOP_WIDTH, CAP_SLAB))
            .translate_z(SWITCH_Z_OFFSET - CAP_SLAB / 2.);
        Ok(self
            .switch_frame()
            .apply_to(Shape::hull_pair(bottom, top)?)
            .commented(&format!(
                "cap {} (+{})",
                self.name,
                format_number(SWITCH_Z_OFFSET)
            )))
    }
}
