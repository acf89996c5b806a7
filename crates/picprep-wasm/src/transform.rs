//! WASM bindings for rotation, square crop and stack blur.
//!
//! Angles are clockwise degrees and must be 0, 90, 180 or 270; any other
//! angle returns `undefined`.

use crate::types::JsRasterImage;
use picprep_core::decode::RotationAngle;
use picprep_core::{filter, transform};
use wasm_bindgen::prelude::*;

/// Rotate an image clockwise by a right angle.
#[wasm_bindgen]
pub fn rotate(image: &JsRasterImage, degrees: u32) -> Option<JsRasterImage> {
    let angle = RotationAngle::from_degrees(degrees)?;
    Some(JsRasterImage::from_raster(transform::rotate(
        image.raster().clone(),
        angle,
    )))
}

/// Crop an image to a square, then rotate it clockwise by `rotation_degrees`.
///
/// Portrait images keep their top, landscape images their horizontal center.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const avatar = crop_to_square(image, 90);
/// ```
#[wasm_bindgen]
pub fn crop_to_square(image: &JsRasterImage, rotation_degrees: u32) -> Option<JsRasterImage> {
    let rotation = RotationAngle::from_degrees(rotation_degrees)?;
    Some(JsRasterImage::from_raster(transform::crop_to_square(
        image.raster().clone(),
        rotation,
    )))
}

/// Blur an image. Alpha is kept as is.
///
/// Returns `undefined` when `radius` is 0 or above `filter::MAX_BLUR_RADIUS`.
#[wasm_bindgen]
pub fn stack_blur(image: &JsRasterImage, radius: u32) -> Option<JsRasterImage> {
    filter::stack_blur(image.raster(), radius).map(JsRasterImage::from_raster)
}
