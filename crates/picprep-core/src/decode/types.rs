//! Core types shared by the decode, transform and filter stages.

use image::{ImageBuffer, Luma};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for decoding and image construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A caller passed an argument outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The image source does not exist.
    #[error("Image source not found: {0}")]
    NotFound(String),

    /// The source exists but could not be decoded.
    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    /// I/O error while reading the source.
    #[error("I/O error: {0}")]
    Io(String),

    /// EXIF metadata could not be parsed.
    #[error("EXIF error: {0}")]
    Exif(String),
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90 = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270 = 8,
}

impl Orientation {
    /// The raw EXIF code for this orientation.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }
}

/// Clockwise rotation applied to make a decoded raster upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum RotationAngle {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    /// Angle in degrees (0, 90, 180 or 270).
    #[inline]
    pub fn degrees(self) -> u32 {
        match self {
            RotationAngle::Deg0 => 0,
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }

    /// Parse an angle in degrees. Only exact right angles are accepted.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(RotationAngle::Deg0),
            90 => Some(RotationAngle::Deg90),
            180 => Some(RotationAngle::Deg180),
            270 => Some(RotationAngle::Deg270),
            _ => None,
        }
    }

    /// Returns true if rotating by this angle swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, RotationAngle::Deg90 | RotationAngle::Deg270)
    }
}

/// Dimensions of a source before any downsampling. Never holds pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeBounds {
    pub width: u32,
    pub height: u32,
}

impl DecodeBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pack four 8-bit channels into a 32-bit ARGB value.
#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Split a 32-bit ARGB value into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(pixel: u32) -> [u8; 4] {
    [
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    ]
}

/// Row-major buffer of packed ARGB values, one `u32` channel per pixel.
pub(crate) type ArgbBuffer = ImageBuffer<Luma<u32>, Vec<u32>>;

/// A raster image with one 32-bit ARGB value per pixel.
///
/// Pixels are stored row-major with a stride equal to `width`. The buffer
/// length always equals `width * height`, and both dimensions are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    buffer: ArgbBuffer,
}

impl RasterImage {
    /// Create a new image from dimensions and ARGB pixel data.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidArgument` if either dimension is zero or
    /// the buffer length does not match `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, DecodeError> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(DecodeError::InvalidArgument(format!(
                "pixel buffer holds {} values, expected {expected} for {width}x{height}",
                pixels.len()
            )));
        }
        ImageBuffer::from_raw(width, height, pixels)
            .map(Self::from_buffer)
            .ok_or_else(|| {
                DecodeError::InvalidArgument(format!("cannot wrap a {width}x{height} buffer"))
            })
    }

    /// Create an image where every pixel has the same ARGB value.
    pub fn filled(width: u32, height: u32, argb: u32) -> Result<Self, DecodeError> {
        check_dimensions(width, height)?;
        Ok(Self::from_buffer(ImageBuffer::from_pixel(
            width,
            height,
            Luma([argb]),
        )))
    }

    /// Wrap a buffer produced by an `imageops` stage.
    pub(crate) fn from_buffer(buffer: ArgbBuffer) -> Self {
        debug_assert!(buffer.width() > 0 && buffer.height() > 0, "Zero-sized raster");
        Self { buffer }
    }

    pub(crate) fn buffer(&self) -> &ArgbBuffer {
        &self.buffer
    }

    pub(crate) fn into_buffer(self) -> ArgbBuffer {
        self.buffer
    }

    /// Mutable view of the row-major ARGB values. The length is fixed.
    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.buffer
    }

    /// Create a RasterImage from an `image::RgbaImage`.
    pub fn from_rgba8(img: image::RgbaImage) -> Result<Self, DecodeError> {
        let (width, height) = img.dimensions();
        check_dimensions(width, height)?;
        Ok(Self::from_buffer(ImageBuffer::from_fn(width, height, |x, y| {
            let p = img.get_pixel(x, y);
            Luma([pack_argb(p[3], p[0], p[1], p[2])])
        })))
    }

    /// Convert to an `image::RgbaImage` for encoding or display.
    pub fn to_rgba8(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let [a, r, g, b] = unpack_argb(self.buffer.get_pixel(x, y)[0]);
            image::Rgba([r, g, b, a])
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// Borrow the row-major ARGB buffer.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        self.buffer.as_raw()
    }

    /// Consume the image and return its ARGB buffer.
    pub fn into_pixels(self) -> Vec<u32> {
        self.buffer.into_raw()
    }

    /// ARGB value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.buffer.get_pixel_checked(x, y).map(|p| p[0])
    }

    /// Expected memory occupation in bytes (`width * height * 4`).
    pub fn byte_size(&self) -> usize {
        self.pixels().len() * 4
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidArgument(format!(
            "image dimensions must be non-zero, got {width}x{height}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90);
        assert_eq!(Orientation::from(8), Orientation::Rotate270);
        assert_eq!(Orientation::from(0), Orientation::Normal);
        assert_eq!(Orientation::from(99), Orientation::Normal); // Invalid defaults to Normal
    }

    #[test]
    fn test_orientation_code_round_trip() {
        for code in 1..=8 {
            assert_eq!(Orientation::from(code).code(), code);
        }
    }

    #[test]
    fn test_rotation_angle_degrees() {
        assert_eq!(RotationAngle::Deg0.degrees(), 0);
        assert_eq!(RotationAngle::Deg270.degrees(), 270);
        assert_eq!(RotationAngle::from_degrees(180), Some(RotationAngle::Deg180));
        assert_eq!(RotationAngle::from_degrees(45), None);
        assert_eq!(RotationAngle::from_degrees(360), None);
    }

    #[test]
    fn test_rotation_angle_swaps_dimensions() {
        assert!(!RotationAngle::Deg0.swaps_dimensions());
        assert!(RotationAngle::Deg90.swaps_dimensions());
        assert!(!RotationAngle::Deg180.swaps_dimensions());
        assert!(RotationAngle::Deg270.swaps_dimensions());
    }

    #[test]
    fn test_argb_packing() {
        let p = pack_argb(0x80, 0x11, 0x22, 0x33);
        assert_eq!(p, 0x8011_2233);
        assert_eq!(unpack_argb(p), [0x80, 0x11, 0x22, 0x33]);
    }

    #[test]
    fn test_raster_image_creation() {
        let img = RasterImage::new(100, 50, vec![0; 100 * 50]).unwrap();

        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.pixels().len(), 5000);
        assert_eq!(img.byte_size(), 20000);
        assert!(!img.is_square());
    }

    #[test]
    fn test_raster_image_rejects_zero_dimensions() {
        assert!(matches!(
            RasterImage::new(0, 10, vec![]),
            Err(DecodeError::InvalidArgument(_))
        ));
        assert!(matches!(
            RasterImage::new(10, 0, vec![]),
            Err(DecodeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_raster_image_rejects_wrong_buffer_length() {
        let result = RasterImage::new(4, 4, vec![0; 15]);
        assert!(matches!(result, Err(DecodeError::InvalidArgument(_))));
    }

    #[test]
    fn test_pixel_lookup() {
        let img = RasterImage::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(img.pixel(0, 0), Some(1));
        assert_eq!(img.pixel(1, 0), Some(2));
        assert_eq!(img.pixel(0, 1), Some(3));
        assert_eq!(img.pixel(1, 1), Some(4));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_rgba_conversion_preserves_channels() {
        let mut rgba = image::RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, image::Rgba([10, 20, 30, 40]));
        rgba.put_pixel(1, 0, image::Rgba([200, 100, 50, 255]));

        let img = RasterImage::from_rgba8(rgba.clone()).unwrap();
        assert_eq!(img.pixel(0, 0), Some(pack_argb(40, 10, 20, 30)));
        assert_eq!(img.pixel(1, 0), Some(pack_argb(255, 200, 100, 50)));

        assert_eq!(img.to_rgba8(), rgba);
    }

    #[test]
    fn test_filled_rejects_zero_dimensions() {
        assert!(RasterImage::filled(0, 3, 0).is_err());
        assert!(RasterImage::from_rgba8(image::RgbaImage::new(0, 0)).is_err());
    }

    #[test]
    fn test_pixels_mut_writes_through() {
        let mut img = RasterImage::filled(2, 1, 0).unwrap();
        img.pixels_mut()[1] = 7;
        assert_eq!(img.pixel(1, 0), Some(7));
        assert_eq!(img.into_pixels(), vec![0, 7]);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::NotFound("/tmp/missing.jpg".to_string());
        assert_eq!(err.to_string(), "Image source not found: /tmp/missing.jpg");

        let err = DecodeError::InvalidArgument("maxSide must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid argument: maxSide must be positive");
    }
}
