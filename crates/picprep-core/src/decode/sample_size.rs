//! Decode-time downsampling factors.
//!
//! Two policies are provided:
//!
//! - [`fit_inside`] picks the factor that keeps the decoded image at least as
//!   large as the requested size along its short side, snapping factors above
//!   3 down to a power of two so decoders can take their fast path.
//! - [`bounded_max`] guarantees that neither side exceeds a hard limit. It
//!   never snaps, and may produce an image noticeably smaller than the limit.

use std::num::NonZeroU32;

use super::{DecodeBounds, DecodeError};

/// Largest factor left exact by [`fit_inside`].
const EXACT_SAMPLE_LIMIT: u32 = 3;

/// Integer downscaling divisor applied during decode. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleSize(NonZeroU32);

impl SampleSize {
    /// Decode at full resolution.
    pub const ONE: SampleSize = SampleSize(NonZeroU32::MIN);

    /// Create a sample size, returning `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(SampleSize)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Dimensions produced by decoding `bounds` at this sample size.
    pub fn scaled(self, bounds: DecodeBounds) -> (u32, u32) {
        let s = self.get();
        ((bounds.width / s).max(1), (bounds.height / s).max(1))
    }

    fn at_least_one(value: u32) -> Self {
        NonZeroU32::new(value).map_or(Self::ONE, SampleSize)
    }
}

impl Default for SampleSize {
    fn default() -> Self {
        Self::ONE
    }
}

/// Compute a sample size that keeps the decoded image big enough to fit the
/// requested size.
///
/// The short side of the source is divided by the matching requested side
/// and rounded half-up. Results above 3 that are not powers of two snap down
/// to the next lower power of two.
///
/// # Errors
///
/// Returns `DecodeError::InvalidArgument` if a requested dimension is zero.
pub fn fit_inside(
    bounds: DecodeBounds,
    req_width: u32,
    req_height: u32,
) -> Result<SampleSize, DecodeError> {
    if req_width == 0 || req_height == 0 {
        return Err(DecodeError::InvalidArgument(format!(
            "requested size must be non-zero, got {req_width}x{req_height}"
        )));
    }

    let DecodeBounds { width, height } = bounds;
    let mut raw = 1;
    if height > req_height || width > req_width {
        raw = if width > height {
            round_half_up(height, req_height)
        } else {
            round_half_up(width, req_width)
        };
    }

    if raw > EXACT_SAMPLE_LIMIT && !raw.is_power_of_two() {
        raw = floor_power_of_two(raw);
    }

    Ok(SampleSize::at_least_one(raw))
}

/// Compute a sample size so that neither decoded side exceeds `max_side`.
///
/// # Errors
///
/// Returns `DecodeError::InvalidArgument` if `max_side` is zero.
pub fn bounded_max(bounds: DecodeBounds, max_side: u32) -> Result<SampleSize, DecodeError> {
    if max_side == 0 {
        return Err(DecodeError::InvalidArgument(
            "maxSide must be positive".to_string(),
        ));
    }

    let DecodeBounds { width, height } = bounds;
    let mut raw = 1;
    if height > max_side || width > max_side {
        raw = if width > height {
            width.div_ceil(max_side)
        } else {
            height.div_ceil(max_side)
        };
    }

    Ok(SampleSize::at_least_one(raw))
}

/// Largest power of two that is less than or equal to `number`.
///
/// Zero maps to 1.
///
/// # Errors
///
/// Returns `DecodeError::InvalidArgument` for negative input.
pub fn next_lower_power_of_two(number: i64) -> Result<u64, DecodeError> {
    if number < 0 {
        return Err(DecodeError::InvalidArgument(format!(
            "cannot take the power of two below a negative number ({number})"
        )));
    }
    if number == 0 {
        return Ok(1);
    }
    Ok(1u64 << number.ilog2())
}

#[inline]
fn floor_power_of_two(value: u32) -> u32 {
    debug_assert!(value > 0);
    1 << value.ilog2()
}

/// `floor(numerator / denominator + 0.5)` in exact integer arithmetic.
#[inline]
fn round_half_up(numerator: u32, denominator: u32) -> u32 {
    let n = numerator as u64;
    let d = denominator as u64;
    ((2 * n + d) / (2 * d)) as u32
}


// ============================================================================
// Property-Based Tests
// ============================================================================
