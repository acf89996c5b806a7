//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_oriented`] - Bounded decode, optionally rotated upright
//! - [`load_profile_picture`] - Upright square picture no larger than `max_side`
//! - [`probe_dimensions`] - Source dimensions without decoding pixels
//! - [`read_orientation`] - EXIF orientation code
//! - [`sample_size_fit_inside`], [`sample_size_bounded_max`] - Sample sizing
//! - [`rotation_for_orientation`] - Rotation for an EXIF orientation code

use crate::types::JsRasterImage;
use picprep_core::decode::{self, DecodeBounds, ImageSource, MemorySource};
use wasm_bindgen::prelude::*;

fn to_js(e: decode::DecodeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn source(bytes: &[u8]) -> MemorySource {
    MemorySource::new(bytes).with_label("js")
}

/// Decode image bytes at a size that fits `req_width x req_height`.
///
/// # Arguments
///
/// * `bytes` - Encoded JPEG or PNG bytes as a `Uint8Array`
/// * `req_width`, `req_height` - Requested size of the upright image
/// * `apply_rotation` - Rotate according to the EXIF orientation
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or a requested dimension
/// is zero.
#[wasm_bindgen]
pub fn decode_oriented(
    bytes: &[u8],
    req_width: u32,
    req_height: u32,
    apply_rotation: bool,
) -> Result<JsRasterImage, JsValue> {
    decode::load_oriented(&source(bytes), req_width, req_height, apply_rotation)
        .map(JsRasterImage::from_raster)
        .map_err(to_js)
}

/// Decode image bytes into an upright square profile picture.
///
/// # Errors
///
/// Returns an error if `max_side` is zero or the bytes cannot be decoded.
#[wasm_bindgen]
pub fn load_profile_picture(bytes: &[u8], max_side: u32) -> Result<JsRasterImage, JsValue> {
    decode::load_profile_picture(&source(bytes), max_side)
        .map(JsRasterImage::from_raster)
        .map_err(to_js)
}

/// Read `[width, height]` without decoding pixels.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
#[wasm_bindgen]
pub fn probe_dimensions(bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
    let bounds = source(bytes).probe().map_err(to_js)?;
    Ok(vec![bounds.width, bounds.height])
}

/// EXIF orientation code (1-8) of the image. 1 when absent or unreadable.
#[wasm_bindgen]
pub fn read_orientation(bytes: &[u8]) -> u32 {
    decode::orientation_or_normal(&source(bytes)).code()
}

/// Fit-inside sample size, or `undefined` for a zero requested dimension.
#[wasm_bindgen]
pub fn sample_size_fit_inside(
    width: u32,
    height: u32,
    req_width: u32,
    req_height: u32,
) -> Option<u32> {
    decode::fit_inside(DecodeBounds::new(width, height), req_width, req_height)
        .ok()
        .map(|s| s.get())
}

/// Bounded-max sample size, or `undefined` when `max_side` is zero.
#[wasm_bindgen]
pub fn sample_size_bounded_max(width: u32, height: u32, max_side: u32) -> Option<u32> {
    decode::bounded_max(DecodeBounds::new(width, height), max_side)
        .ok()
        .map(|s| s.get())
}

/// Clockwise rotation in degrees for an EXIF orientation code.
#[wasm_bindgen]
pub fn rotation_for_orientation(code: u32) -> u32 {
    decode::rotation_for_code(code).degrees()
}
