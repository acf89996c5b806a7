//! Square cropping for profile pictures.
//!
//! Portrait images keep their top and lose the bottom excess; landscape
//! images are cropped to their horizontal center. The square window is then
//! rotated around its own center, so the output is always square.

use image::imageops;

use crate::decode::{RasterImage, RotationAngle};

use super::rotate::rotate;

/// Placement of the square window inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropGeometry {
    /// Side of the square window.
    pub squared_size: u32,
    /// First source column of the window.
    pub horizontal_offset: u32,
    /// First source row of the window.
    pub vertical_offset: u32,
}

impl CropGeometry {
    /// Row where portrait windows start.
    ///
    /// Empirical constant: cropping from row 0 produced a visible artifact
    /// with some decoders. Kept at 1 pending a documented reason.
    pub const PORTRAIT_VERTICAL_INSET: u32 = 1;

    /// Compute the window for a `width x height` source.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        if height > width {
            Self {
                squared_size: width,
                horizontal_offset: 0,
                vertical_offset: Self::PORTRAIT_VERTICAL_INSET,
            }
        } else {
            Self {
                squared_size: height,
                horizontal_offset: (width - height) / 2,
                vertical_offset: 0,
            }
        }
    }
}

/// Crop an image to a square and rotate it clockwise by `rotation`.
///
/// An already-square image with no rotation is returned as is, without
/// copying. Otherwise a new `squared_size x squared_size` image is produced
/// from the window described by [`CropGeometry::for_dimensions`].
pub fn crop_to_square(image: RasterImage, rotation: RotationAngle) -> RasterImage {
    if image.is_square() && rotation == RotationAngle::Deg0 {
        return image;
    }

    let geometry = CropGeometry::for_dimensions(image.width(), image.height());
    let window = copy_window(&image, geometry);
    drop(image);
    rotate(window, rotation)
}

fn copy_window(image: &RasterImage, geometry: CropGeometry) -> RasterImage {
    let CropGeometry {
        squared_size,
        horizontal_offset,
        vertical_offset,
    } = geometry;
    let window = imageops::crop_imm(
        image.buffer(),
        horizontal_offset,
        vertical_offset,
        squared_size,
        squared_size,
    );
    RasterImage::from_buffer(window.to_image())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=80, 1u32..=80)
    }

    fn rotation_strategy() -> impl Strategy<Value = RotationAngle> {
        prop_oneof![
            Just(RotationAngle::Deg0),
            Just(RotationAngle::Deg90),
            Just(RotationAngle::Deg180),
            Just(RotationAngle::Deg270),
        ]
    }

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        RasterImage::new(width, height, (0..width * height).collect()).unwrap()
    }

    proptest! {
        /// Property: Output is always square with side min(width, height).
        #[test]
        fn prop_output_is_square(
            (width, height) in dimensions_strategy(),
            rotation in rotation_strategy(),
        ) {
            let out = crop_to_square(create_test_image(width, height), rotation);
            prop_assert_eq!(out.width(), out.height());
            prop_assert_eq!(out.width(), width.min(height));
            prop_assert_eq!(out.pixels().len(), (out.width() * out.height()) as usize);
        }

        /// Property: The window always fits inside the source.
        #[test]
        fn prop_window_within_bounds((width, height) in dimensions_strategy()) {
            let g = CropGeometry::for_dimensions(width, height);
            prop_assert!(g.horizontal_offset + g.squared_size <= width);
            prop_assert!(g.vertical_offset + g.squared_size <= height);
        }

        /// Property: Rotation does not change which pixels are kept.
        #[test]
        fn prop_rotation_preserves_pixel_set(
            (width, height) in dimensions_strategy(),
            rotation in rotation_strategy(),
        ) {
            let plain = crop_to_square(create_test_image(width, height), RotationAngle::Deg0);
            let rotated = crop_to_square(create_test_image(width, height), rotation);

            let mut a = plain.into_pixels();
            let mut b = rotated.into_pixels();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }
    }
}
