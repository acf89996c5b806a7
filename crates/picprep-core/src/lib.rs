//! Picprep Core - image preparation for avatars and profile pictures
//!
//! This crate provides memory-bounded decoding with EXIF orientation
//! correction, square cropping, an integer stack blur, and a background
//! pipeline that binds results only to destinations still showing the
//! content they were computed for.
//!
//! Pixels are 32-bit ARGB, row-major, one `u32` per pixel.

pub mod config;
pub mod decode;
pub mod filter;
#[cfg(feature = "pipeline")]
pub mod pipeline;
pub mod transform;

pub use config::{ConfigError, PrepConfig};
pub use decode::{
    load_oriented, load_oriented_default, load_profile_picture, load_sampled, DecodeError,
    FileSource, ImageSource, MemorySource, Orientation, RasterImage, RotationAngle,
};
pub use filter::{stack_blur, StackBlur, MAX_BLUR_RADIUS};
pub use transform::{crop_to_square, rotate};
