//! Sparse key grids and the connector mesh between neighboring keys.
//!
//! The connectors fill the gaps between the plates of adjacent keys so the
//! grid becomes one continuous top surface. Each connector is a [`Patch`],
//! a fan of triangles whose corners are key corner frames. Keys may be
//! tilted differently, so patches are never assumed to be planar.
//!
//! Every patch and key top lists its corners clockwise seen from above, so
//! a shared edge is walked in opposite directions by its two neighbors.

use itertools::iproduct;
use tracing::debug;

use crate::error::{Error, Result};
use crate::math::Point3D;
use crate::shape::Shape;
use crate::transform::Frame;

use super::{Key, PLATE_THICKNESS};

/// A rectangular (row, column) arrangement of optional keys.
///
/// A missing key is a hole, not an error. Lookups outside the grid return
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Option<Key>>,
}

impl KeyGrid {
    /// Builds a grid from rows of equal width.
    pub fn new(rows: Vec<Vec<Option<Key>>>) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != columns)
        {
            return Err(Error::RaggedGrid {
                row,
                expected: columns,
                found,
            });
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns
    }

    /// The key at `(row, column)`, if there is one.
    pub fn get(&self, row: usize, column: usize) -> Option<&Key> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells[row * self.columns + column].as_ref()
    }

    /// The key `dr` rows up and `dc` columns left of `(row, column)`.
    fn back(&self, row: usize, column: usize, dr: usize, dc: usize) -> Option<&Key> {
        self.get(row.checked_sub(dr)?, column.checked_sub(dc)?)
    }

    /// The cells of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<&Key>> + '_ {
        (0..self.columns).map(move |c| self.get(row, c))
    }

    /// The cells of one column, top to bottom.
    pub fn column(&self, column: usize) -> impl Iterator<Item = Option<&Key>> + '_ {
        (0..self.rows).map(move |r| self.get(r, column))
    }

    /// Every key, row by row.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.cells.iter().flatten()
    }

    /// Finds a key by name.
    pub fn find(&self, name: &str) -> Option<&Key> {
        self.keys().find(|k| k.name() == name)
    }

    /// Applies `f` to every key, keeping the holes.
    pub fn map_keys(self, mut f: impl FnMut(Key) -> Key) -> Self {
        Self {
            cells: self.cells.into_iter().map(|c| c.map(&mut f)).collect(),
            ..self
        }
    }
}

/// A fan of triangles `center -> ring[i] -> ring[i + 1]` between corner
/// frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    center: Frame,
    ring: Vec<Frame>,
}

impl Patch {
    /// A fan around `center`. The ring needs at least two frames.
    pub fn fan(center: Frame, ring: Vec<Frame>) -> Result<Self> {
        if ring.len() < 2 {
            return Err(Error::TooFewChildren {
                op: "fan",
                min: 2,
                found: ring.len(),
            });
        }
        Ok(Self { center, ring })
    }

    /// A single triangle.
    pub fn triangle(a: Frame, b: Frame, c: Frame) -> Self {
        Self {
            center: a,
            ring: vec![b, c],
        }
    }

    /// A quad split along its `a -> c` diagonal.
    pub fn quad(a: Frame, b: Frame, c: Frame, d: Frame) -> Self {
        Self {
            center: a,
            ring: vec![b, c, d],
        }
    }

    fn points(&self, depth: f64) -> (Point3D, Vec<Point3D>) {
        let local = Point3D::new(0., 0., -depth);
        (
            self.center.apply(local),
            self.ring.iter().map(|f| f.apply(local)).collect(),
        )
    }

    /// The corner points on the top surface, center first.
    pub fn top_points(&self) -> Vec<Point3D> {
        let (center, ring) = self.points(0.);
        std::iter::once(center).chain(ring).collect()
    }

    /// The top-surface triangles.
    pub fn triangles(&self) -> Vec<[Point3D; 3]> {
        let (center, ring) = self.points(0.);
        ring.windows(2).map(|w| [center, w[0], w[1]]).collect()
    }

    /// The solid patch: every triangle hulled with its copy at the bottom of
    /// the plate.
    pub fn to_shape(&self) -> Result<Shape> {
        let top = self.triangles();
        let (center, ring) = self.points(PLATE_THICKNESS);
        let prisms = top
            .into_iter()
            .zip(ring.windows(2))
            .map(|([a, b, c], w)| {
                Shape::hull_pair(Shape::tri(a, b, c), Shape::tri(center, w[0], w[1]))
            })
            .collect::<Result<Vec<_>>>()?;
        Shape::union(prisms)
    }

    /// The top surface alone, as a single-sided fan of facets.
    pub fn facet(&self) -> Result<Shape> {
        let (center, ring) = self.points(0.);
        Shape::tri_fan(center, &ring)
    }
}

impl Key {
    /// The key's own plate top as a patch.
    pub fn top_patch(&self) -> Patch {
        Patch::quad(
            self.top_left(),
            self.top_right(),
            self.bottom_right(),
            self.bottom_left(),
        )
    }
}

/// Bridges `left`'s right edge to `right`'s left edge.
///
/// # Arguments
///
/// * `left` - The key on the left.
/// * `right` - Its neighbour on the right.
///
/// # Returns
///
/// A quad patch from `left`'s top right corner to `right`'s top left corner.
pub fn connect_horizontal(left: &Key, right: &Key) -> Patch {
    Patch::quad(
        left.top_right(),
        right.top_left(),
        right.bottom_left(),
        left.bottom_right(),
    )
}

/// Bridges `top`'s bottom edge to `bottom`'s top edge.
///
/// # Arguments
///
/// * `top` - The upper key.
/// * `bottom` - The key below it.
///
/// # Returns
///
/// A quad patch between the two facing edges.
pub fn connect_vertical(top: &Key, bottom: &Key) -> Patch {
    Patch::quad(
        top.bottom_left(),
        top.bottom_right(),
        bottom.top_right(),
        bottom.top_left(),
    )
}

/// Closes the gap where four keys meet.
///
/// # Arguments
///
/// * `top_left`, `top`, `current`, `left` - The four keys around the gap.
///
/// # Returns
///
/// A quad patch joining the inner corner of each key.
pub fn connect_diagonal(top_left: &Key, top: &Key, current: &Key, left: &Key) -> Patch {
    Patch::quad(
        top_left.bottom_right(),
        top.bottom_left(),
        current.top_left(),
        left.top_right(),
    )
}

/// Connects every pair of literally adjacent keys, row by row.
///
/// Holes are never bridged.
///
/// # Returns
///
/// For each key, in row-major order: the patch to its left neighbour, the
/// patch to its upper neighbour, then the diagonal patch when all three
/// neighbours exist.
pub fn connect_grid(grid: &KeyGrid) -> Vec<Patch> {
    let mut patches = Vec::new();
    for (r, c) in iproduct!(0..grid.num_rows(), 0..grid.num_columns()) {
        let Some(key) = grid.get(r, c) else {
            continue;
        };
        let left = grid.back(r, c, 0, 1);
        let top = grid.back(r, c, 1, 0);
        let top_left = grid.back(r, c, 1, 1);

        if let Some(left) = left {
            patches.push(connect_horizontal(left, key));
        }
        if let Some(top) = top {
            patches.push(connect_vertical(top, key));
            if let (Some(left), Some(top_left)) = (left, top_left) {
                patches.push(connect_diagonal(top_left, top, key, left));
            }
        }
    }
    debug!(connectors = patches.len(), "connected key grid");
    patches
}

/// The union of the solids of `patches`.
///
/// # Returns
///
/// The union, or [`Shape::empty`] when there are no patches.
pub fn patch_union<'a>(patches: impl IntoIterator<Item = &'a Patch>) -> Result<Shape> {
    let shapes = patches
        .into_iter()
        .map(Patch::to_shape)
        .collect::<Result<Vec<_>>>()?;
    Shape::union_all(shapes)
}
