//! Generates OpenSCAD scripts for a split, bowl-shaped keyboard case.
//!
//! Keys are placed with chains of [`transform::Frame`]s, joined into one top
//! surface by the connector patches in [`key::grid`], and closed off with the
//! hull-chained skirt built in [`wall`]. Every piece of geometry is an
//! immutable [`shape::Shape`] tree that serializes to OpenSCAD source.
//!
//! ```no_run
//! use dactyl_scad::parts::{generate, GenerationMode};
//!
//! let parts = generate(GenerationMode::Case)?;
//! for part in &parts {
//!     println!("{}: {} bytes", part.name, part.shape.to_code().len());
//! }
//! # Ok::<(), dactyl_scad::Error>(())
//! ```

pub mod error;
pub mod key;
pub mod layout;
pub mod math;
pub mod output;
pub mod parts;
pub mod shape;
pub mod transform;
pub mod wall;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result};
