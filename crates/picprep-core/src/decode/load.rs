//! Bounded decode followed by orientation correction.
//!
//! Every entry point probes the source first, so the full-resolution image
//! is never materialized beyond what the chosen sample size requires.

use log::debug;

use super::orientation::{orientation_or_normal, rotation_for};
use super::sample_size::{bounded_max, fit_inside};
use super::{DecodeError, ImageSource, RasterImage, RotationAngle};
use crate::transform::{crop_to_square, rotate};

/// Default maximum decoded width for [`load_oriented_default`].
pub const MAX_WIDTH: u32 = 1280;

/// Default maximum decoded height for [`load_oriented_default`].
pub const MAX_HEIGHT: u32 = 1280;

/// Decode a source at a size that fits `req_width x req_height`, optionally
/// rotating it upright according to its EXIF orientation.
///
/// The requested size describes the final, upright frame: when the source
/// needs a quarter turn the request is swapped before sizing the decode.
///
/// # Arguments
///
/// * `source` - Where the encoded bytes come from
/// * `req_width`, `req_height` - Requested size of the upright image
/// * `apply_rotation` - Whether to read and apply the EXIF orientation
///
/// # Errors
///
/// Returns `DecodeError::NotFound` if the source is absent,
/// `DecodeError::DecodeFailure` if it cannot be decoded, and
/// `DecodeError::InvalidArgument` if a requested dimension is zero.
pub fn load_oriented<S: ImageSource + ?Sized>(
    source: &S,
    req_width: u32,
    req_height: u32,
    apply_rotation: bool,
) -> Result<RasterImage, DecodeError> {
    let bounds = source.probe()?;

    let rotation = if apply_rotation {
        rotation_for(orientation_or_normal(source))
    } else {
        RotationAngle::Deg0
    };

    let (fit_width, fit_height) = if rotation.swaps_dimensions() {
        (req_height, req_width)
    } else {
        (req_width, req_height)
    };
    let sample_size = fit_inside(bounds, fit_width, fit_height)?;

    debug!(
        "{}: {}x{} -> sample size {}, rotation {}°",
        source.describe(),
        bounds.width,
        bounds.height,
        sample_size.get(),
        rotation.degrees()
    );

    let decoded = source.decode(sample_size)?;
    Ok(rotate(decoded, rotation))
}

/// [`load_oriented`] with the default `MAX_WIDTH x MAX_HEIGHT` request and
/// rotation applied.
pub fn load_oriented_default<S: ImageSource + ?Sized>(
    source: &S,
) -> Result<RasterImage, DecodeError> {
    load_oriented(source, MAX_WIDTH, MAX_HEIGHT, true)
}

/// Decode a source at a size that fits the request, ignoring orientation.
pub fn load_sampled<S: ImageSource + ?Sized>(
    source: &S,
    req_width: u32,
    req_height: u32,
) -> Result<RasterImage, DecodeError> {
    load_oriented(source, req_width, req_height, false)
}

/// Decode a source into an upright square profile picture.
///
/// Neither decoded side exceeds `max_side` before cropping, so the result is
/// at most `max_side x max_side`.
///
/// # Errors
///
/// Returns `DecodeError::InvalidArgument` if `max_side` is zero, plus the
/// source errors of [`load_oriented`].
pub fn load_profile_picture<S: ImageSource + ?Sized>(
    source: &S,
    max_side: u32,
) -> Result<RasterImage, DecodeError> {
    if max_side == 0 {
        return Err(DecodeError::InvalidArgument(
            "maxSide must be positive".to_string(),
        ));
    }

    let bounds = source.probe()?;
    let rotation = rotation_for(orientation_or_normal(source));
    let sample_size = bounded_max(bounds, max_side)?;

    debug!(
        "{}: profile picture from {}x{}, sample size {}, rotation {}°",
        source.describe(),
        bounds.width,
        bounds.height,
        sample_size.get(),
        rotation.degrees()
    );

    let decoded = source.decode(sample_size)?;
    Ok(crop_to_square(decoded, rotation))
}
