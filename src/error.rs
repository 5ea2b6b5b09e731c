//! Construction-time errors.
//!
//! Every structural contract of the shape algebra, the key grid and the
//! wall builder is checked when a value is built. Serialization never
//! fails and never validates.

use crate::shape::Dim;

/// Errors raised while building geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A combinator was given fewer children than it needs.
    #[error("{op} needs at least {min} children, got {found}")]
    TooFewChildren {
        /// Name of the combinator.
        op: &'static str,
        /// Minimum number of children.
        min: usize,
        /// Number of children given.
        found: usize,
    },

    /// Children of one combinator have different dimensions.
    #[error("{op} cannot mix {expected} and {found} children")]
    MixedDimensions {
        /// Name of the combinator.
        op: &'static str,
        /// Dimension of the first child.
        expected: Dim,
        /// Dimension of the offending child.
        found: Dim,
    },

    /// A combinator only accepts children of one dimension.
    #[error("{op} expects a {expected} child, got {found}")]
    WrongDimension {
        /// Name of the combinator.
        op: &'static str,
        /// Accepted dimension.
        expected: Dim,
        /// Dimension of the child.
        found: Dim,
    },

    /// A polyhedron face has fewer than three vertices.
    #[error("polyhedron face {face} has {found} vertices, needs at least 3")]
    DegenerateFace {
        /// Index of the face.
        face: usize,
        /// Number of vertices in the face.
        found: usize,
    },

    /// A polyhedron face references a point that does not exist.
    #[error("polyhedron face {face} references point {index}, but only {count} points exist")]
    FaceIndexOutOfRange {
        /// Index of the face.
        face: usize,
        /// Offending point index.
        index: usize,
        /// Number of points.
        count: usize,
    },

    /// A key grid row has a different width than the first row.
    #[error("grid row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        /// Index of the row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// A closed wall needs at least three points.
    #[error("a wall needs at least 3 points, got {0}")]
    TooFewWallPoints(usize),

    /// Two consecutive wall points push the wall in opposite directions.
    #[error("wall points {index} and {next} face opposite directions ({from} then {to})")]
    OpposedWallPoints {
        /// Index of the first point.
        index: usize,
        /// Index of the following point.
        next: usize,
        /// Direction of the first point.
        from: crate::wall::Direction,
        /// Direction of the following point.
        to: crate::wall::Direction,
    },

    /// Two consecutive wall points are too far apart to be hulled together.
    #[error("wall points {index} and {next} are {distance:.3} apart, the limit is {max}")]
    WallGap {
        /// Index of the first point.
        index: usize,
        /// Index of the following point.
        next: usize,
        /// Distance between the two anchors.
        distance: f64,
        /// Configured limit.
        max: f64,
    },

    /// A wall point whose outward move has no horizontal component.
    #[error("wall point {0} has no horizontal outward direction")]
    DegenerateWallPoint(usize),

    /// A key name that is not part of the layout.
    #[error("no key named `{0}` in the layout")]
    UnknownKey(String),

    /// A color that is neither a plain color name nor a hex color.
    #[error("invalid color `{0}`, expected a name like `red` or a hex color like `#ff0000`")]
    InvalidColorName(String),
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
