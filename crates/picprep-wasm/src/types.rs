//! WASM-compatible wrapper for raster images.
//!
//! JavaScript sees RGBA bytes (the `ImageData` layout); the core works on
//! packed ARGB values. Conversion happens at this boundary only.

use picprep_core::decode::{pack_argb, unpack_argb, DecodeError, RasterImage};
use wasm_bindgen::prelude::*;

/// A raster image held in WASM memory.
///
/// # Memory Management
///
/// `rgba()` and `argb()` copy the pixels into JavaScript memory. Keep the
/// image in WASM memory while chaining crop and blur, and extract pixels once.
#[wasm_bindgen]
pub struct JsRasterImage {
    inner: RasterImage,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create an image from RGBA bytes (4 bytes per pixel, row-major order).
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or the buffer length is not
    /// `width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, rgba: &[u8]) -> Result<JsRasterImage, JsValue> {
        Self::try_from_rgba(width, height, rgba).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Expected memory occupation in bytes (`width * height * 4`)
    #[wasm_bindgen(getter)]
    pub fn byte_size(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn rgba(&self) -> Vec<u8> {
        self.inner
            .pixels()
            .iter()
            .flat_map(|&p| {
                let [a, r, g, b] = unpack_argb(p);
                [r, g, b, a]
            })
            .collect()
    }

    /// Returns packed ARGB pixels as Uint32Array (a copy).
    pub fn argb(&self) -> Vec<u32> {
        self.inner.pixels().to_vec()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsRasterImage {
    pub(crate) fn try_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(DecodeError::InvalidArgument(format!(
                "RGBA buffer holds {} bytes, expected {expected} for {width}x{height}",
                rgba.len()
            )));
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| pack_argb(p[3], p[0], p[1], p[2]))
            .collect();
        RasterImage::new(width, height, pixels).map(Self::from_raster)
    }

    pub(crate) fn from_raster(inner: RasterImage) -> Self {
        Self { inner }
    }

    pub(crate) fn raster(&self) -> &RasterImage {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_round_trip() {
        let rgba = vec![255u8, 128, 64, 32, 1, 2, 3, 4];
        let img = JsRasterImage::try_from_rgba(2, 1, &rgba).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 1);
        assert_eq!(img.rgba(), rgba);
    }

    #[test]
    fn test_argb_packing() {
        let img = JsRasterImage::try_from_rgba(1, 1, &[0x11, 0x22, 0x33, 0x44]).unwrap();
        assert_eq!(img.argb(), vec![0x4411_2233]);
    }

    #[test]
    fn test_byte_size() {
        let img = JsRasterImage::try_from_rgba(10, 5, &vec![0u8; 200]).unwrap();
        assert_eq!(img.byte_size(), 200);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            JsRasterImage::try_from_rgba(2, 2, &[0u8; 15]),
            Err(DecodeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(JsRasterImage::try_from_rgba(0, 4, &[]).is_err());
    }
}
