//! Memory-bounded image decoding.
//!
//! This module provides functionality for:
//! - Probing a source's dimensions without decoding pixels
//! - Choosing a decode sample size (fit-inside or bounded-max policy)
//! - Reading EXIF orientation and resolving it to a rotation
//! - Decoding files or in-memory buffers into ARGB rasters
//!
//! # Architecture
//!
//! A decode never allocates the full-resolution raster for longer than it
//! takes to area-average it down. The orchestration functions in `load` run
//! probe, sizing, decode and rotation in that order.

mod load;
mod orientation;
mod sample_size;
pub(crate) mod source;
mod subsample;
mod types;

pub use load::{
    load_oriented, load_oriented_default, load_profile_picture, load_sampled, MAX_HEIGHT,
    MAX_WIDTH,
};
pub use orientation::{orientation_or_normal, read_orientation, rotation_for, rotation_for_code};
pub use sample_size::{bounded_max, fit_inside, next_lower_power_of_two, SampleSize};
pub use source::{FileSource, ImageSource, MemorySource};
pub use subsample::subsample;
pub use types::{
    pack_argb, unpack_argb, DecodeBounds, DecodeError, Orientation, RasterImage, RotationAngle,
};
