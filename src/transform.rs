//! Coordinate frames and helpers that place shapes in space.

pub mod frame;
pub mod map;

pub use frame::{Frame, Transform};
