//! The enclosure skirt around the key cluster.
//!
//! A wall is described by a clockwise, cyclic list of [`WallPoint`]s along
//! the outer edge of the plate. Each point becomes a [`WallSlice`]: a slanted
//! face from the plate edge down to a thickened segment, and a vertical
//! skirt from that segment to the ground. Consecutive slices are hulled
//! together, component by component, and the last slice is joined back to
//! the first.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::key::post;
use crate::math::{horizontal, is_approx_zero, Point3D, Unit};
use crate::shape::Shape;
use crate::transform::Frame;

/// The side of the key a wall point faces, in the key's own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the key's +y.
    Up,
    /// Towards the key's -y.
    Down,
    /// Towards the key's -x.
    Left,
    /// Towards the key's +x.
    Right,
}

impl Direction {
    /// Whether `self` and `other` face away from each other.
    pub fn is_opposite(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Up, Self::Down)
                | (Self::Down, Self::Up)
                | (Self::Left, Self::Right)
                | (Self::Right, Self::Left)
        )
    }

    /// Moves `distance` outward, then tilts the wall face back towards
    /// vertical by `tilt` degrees.
    fn outward(self, distance: Unit, tilt: Unit) -> Frame {
        match self {
            Self::Up => Frame::new().translate(0., distance, 0.).rotate_x(-tilt),
            Self::Down => Frame::new().translate(0., -distance, 0.).rotate_x(tilt),
            Self::Left => Frame::new().translate(-distance, 0., 0.).rotate_y(-tilt),
            Self::Right => Frame::new().translate(distance, 0., 0.).rotate_y(tilt),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// One sample of the perimeter traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPoint {
    /// Where the wall leaves the plate, usually a key corner.
    pub frame: Frame,
    /// Which way the wall goes out from `frame`.
    pub direction: Direction,
    /// Added to the base outward offset.
    pub extra_distance: Unit,
    /// Added to the base wall thickness.
    pub extra_width: Unit,
}

impl WallPoint {
    /// A wall point with no extra distance or width.
    pub fn new(frame: Frame, direction: Direction) -> Self {
        Self {
            frame,
            direction,
            extra_distance: 0.,
            extra_width: 0.,
        }
    }

    /// Pushes the wall further out and makes it thicker.
    pub fn with_extra(mut self, distance: Unit, width: Unit) -> Self {
        self.extra_distance = distance;
        self.extra_width = width;
        self
    }
}

/// Wall dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallConfig {
    /// How far out the wall is placed from its wall point.
    pub base_offset: Unit,
    /// Tilt in degrees compensating the key's own slope.
    pub tilt: Unit,
    /// Minimum horizontal wall thickness.
    pub base_width: Unit,
    /// Depth below the frame origin used to measure the outward direction.
    pub reference_depth: Unit,
    /// Side of the cubes marking the ends of a ground segment.
    pub ground_cube: Unit,
    /// Height of the flattened copy of a ground segment at `z = 0`.
    pub skirt_height: Unit,
    /// Largest allowed distance between consecutive wall point origins.
    pub max_step: Unit,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            base_offset: 4.8,
            tilt: 20.,
            base_width: 3.3,
            reference_depth: 4.,
            ground_cube: 0.1,
            skirt_height: 0.1,
            max_step: 60.,
        }
    }
}

/// The thickened segment a slice stands on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSegment {
    /// Outer end, below the outward-moved frame.
    pub outer: Point3D,
    /// Inner end, `width` towards the keys.
    pub inner: Point3D,
}

impl GroundSegment {
    /// The wall thickness at this slice.
    pub fn width(&self) -> Unit {
        (self.inner - self.outer).norm()
    }
}

/// The wall cross-section at one wall point.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSlice {
    /// Where the slice stands.
    pub ground: GroundSegment,
    /// Hull of the plate edge post and the ground segment.
    pub outer_face: Shape,
    /// Hull of the ground segment and its flattened copy at `z = 0`.
    pub skirt: Shape,
}

impl WallSlice {
    fn components(&self) -> [&Shape; 2] {
        [&self.outer_face, &self.skirt]
    }
}

/// The hulls joining slice `from` to slice `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct WallConnection {
    /// Index of the first slice.
    pub from: usize,
    /// Index of the second slice.
    pub to: usize,
    /// The two outer faces hulled together.
    pub outer_face: Shape,
    /// The two skirts hulled together.
    pub skirt: Shape,
}

/// A finished wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    slices: Vec<WallSlice>,
    connections: Vec<WallConnection>,
}

impl Wall {
    /// One slice per wall point, in order.
    pub fn slices(&self) -> &[WallSlice] {
        &self.slices
    }

    /// One connection per pair of consecutive slices, last to first
    /// included.
    pub fn connections(&self) -> &[WallConnection] {
        &self.connections
    }

    /// The union of every connection.
    pub fn to_shape(&self) -> Result<Shape> {
        Shape::union(
            self.connections
                .iter()
                .flat_map(|c| [c.outer_face.clone(), c.skirt.clone()])
                .collect(),
        )
    }
}

/// Builds the slice for the `index`-th wall point.
///
/// # Arguments
///
/// * `index` - Position of `point` in the perimeter, reported on error.
/// * `point` - The wall point.
/// * `config` - Wall dimensions.
///
/// # Returns
///
/// The slice, or [`Error::DegenerateWallPoint`] if moving outward does not
/// move the point horizontally.
pub fn build_slice(index: usize, point: &WallPoint, config: &WallConfig) -> Result<WallSlice> {
    let inner_anchor = point.frame.apply_to(post());
    let moved = point.frame.clone().append_front(
        &point
            .direction
            .outward(config.base_offset + point.extra_distance, config.tilt),
    );

    let reference = Point3D::new(0., 0., -config.reference_depth);
    let outer = moved.apply(reference);
    let outward = horizontal(outer - point.frame.apply(reference));
    if is_approx_zero(outward) {
        return Err(Error::DegenerateWallPoint(index));
    }
    let inward = -outward.normalize();
    let ground = GroundSegment {
        outer,
        inner: outer + (config.base_width + point.extra_width) * inward,
    };

    let cube = Shape::cube_centered(Point3D::repeat(config.ground_cube));
    let segment = Shape::hull_pair(
        cube.clone().translate(ground.outer),
        cube.translate(ground.inner),
    )?;
    let flattened = segment
        .clone()
        .projection()?
        .linear_extrude(config.skirt_height)?;

    Ok(WallSlice {
        ground,
        outer_face: Shape::hull_pair(inner_anchor, segment.clone())?,
        skirt: Shape::hull_pair(segment, flattened)?,
    })
}

/// Checks that consecutive wall points, last to first included, can be
/// joined without folding the wall over itself.
pub fn validate_wall_points(points: &[WallPoint], config: &WallConfig) -> Result<()> {
    if points.len() < 3 {
        return Err(Error::TooFewWallPoints(points.len()));
    }
    for (index, (a, b)) in points.iter().circular_tuple_windows().enumerate() {
        let next = (index + 1) % points.len();
        if a.direction.is_opposite(b.direction) {
            return Err(Error::OpposedWallPoints {
                index,
                next,
                from: a.direction,
                to: b.direction,
            });
        }
        let distance = (b.frame.origin() - a.frame.origin()).norm();
        if distance > config.max_step {
            return Err(Error::WallGap {
                index,
                next,
                distance,
                max: config.max_step,
            });
        }
    }
    Ok(())
}

/// Validates `points` and builds the closed wall through them.
///
/// # Arguments
///
/// * `points` - The clockwise perimeter. The last point is joined back to
///   the first.
/// * `config` - Wall dimensions.
///
/// # Returns
///
/// One slice per point and one connection per consecutive pair, or the
/// first validation error.
#[instrument(skip_all, fields(points = points.len()))]
pub fn build_wall(points: &[WallPoint], config: &WallConfig) -> Result<Wall> {
    validate_wall_points(points, config)?;

    let slices = points
        .iter()
        .enumerate()
        .map(|(i, p)| build_slice(i, p, config))
        .collect::<Result<Vec<_>>>()?;

    let n = slices.len();
    let connections = slices
        .iter()
        .circular_tuple_windows()
        .enumerate()
        .map(|(from, (a, b))| {
            let [a_face, a_skirt] = a.components();
            let [b_face, b_skirt] = b.components();
            Ok(WallConnection {
                from,
                to: (from + 1) % n,
                outer_face: Shape::hull_pair(a_face.clone(), b_face.clone())?,
                skirt: Shape::hull_pair(a_skirt.clone(), b_skirt.clone())?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        slices = slices.len(),
        connections = connections.len(),
        "built wall"
    );
    Ok(Wall {
        slices,
        connections,
    })
}
