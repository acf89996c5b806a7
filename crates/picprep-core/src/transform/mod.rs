//! Image transformation operations: right-angle rotation and square cropping.
//!
//! Both operations consume their input and return a new image, except for
//! the documented identity fast paths, which hand the input back unchanged.
//!
//! # Coordinate System
//!
//! - Rotation angles are clockwise right angles
//! - Origin is the top-left corner, rows are stored top to bottom

mod crop;
mod rotate;

pub use crop::{crop_to_square, CropGeometry};
pub use rotate::rotate;
