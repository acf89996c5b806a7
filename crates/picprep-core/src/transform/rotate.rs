//! Right-angle rotation of raster images.
//!
//! Angles are clockwise. For a `w x h` source:
//!
//! ```text
//!  90°: dst(x, y) = src(y, h - 1 - x)      output h x w
//! 180°: dst(x, y) = src(w - 1 - x, h - 1 - y)
//! 270°: dst(x, y) = src(w - 1 - y, x)      output h x w
//! ```

use image::imageops;

use crate::decode::{RasterImage, RotationAngle};

/// Rotate an image clockwise by a right angle.
///
/// 0° returns the input untouched. 180° turns the owned buffer in place.
/// 90° and 270° allocate a new buffer with swapped dimensions and release
/// the input.
pub fn rotate(image: RasterImage, angle: RotationAngle) -> RasterImage {
    match angle {
        RotationAngle::Deg0 => image,
        RotationAngle::Deg180 => {
            let mut buffer = image.into_buffer();
            imageops::rotate180_in_place(&mut buffer);
            RasterImage::from_buffer(buffer)
        }
        RotationAngle::Deg90 => RasterImage::from_buffer(imageops::rotate90(image.buffer())),
        RotationAngle::Deg270 => RasterImage::from_buffer(imageops::rotate270(image.buffer())),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = RasterImage> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u32>(), (w * h) as usize)
                .prop_map(move |pixels| RasterImage::new(w, h, pixels).unwrap())
        })
    }

    proptest! {
        /// Property: four quarter turns return the input image.
        #[test]
        fn prop_four_quarter_turns_identity(img in image_strategy()) {
            let mut out = img.clone();
            for _ in 0..4 {
                out = rotate(out, RotationAngle::Deg90);
            }
            prop_assert_eq!(out, img);
        }

        /// Property: 90° followed by 270° is the identity.
        #[test]
        fn prop_90_then_270_identity(img in image_strategy()) {
            let out = rotate(rotate(img.clone(), RotationAngle::Deg90), RotationAngle::Deg270);
            prop_assert_eq!(out, img);
        }

        /// Property: two quarter turns equal a half turn.
        #[test]
        fn prop_two_quarters_equal_half(img in image_strategy()) {
            let quarters = rotate(rotate(img.clone(), RotationAngle::Deg90), RotationAngle::Deg90);
            let half = rotate(img, RotationAngle::Deg180);
            prop_assert_eq!(quarters, half);
        }
    }
}
