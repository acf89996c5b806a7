//! Decode-time downsampling.
//!
//! The decoded RGBA raster is area-averaged with `imageops::thumbnail` to
//! `max(1, floor(w / s)) x max(1, floor(h / s))`, all four channels
//! included.

use image::{imageops, RgbaImage};

use super::{DecodeBounds, SampleSize};

/// Downsample a decoded image by an integer factor.
///
/// The input is consumed so its full-resolution buffer is released as soon
/// as the smaller image exists. A sample size of 1 returns the input as is.
pub fn subsample(image: RgbaImage, sample_size: SampleSize) -> RgbaImage {
    if sample_size == SampleSize::ONE {
        return image;
    }
    let (width, height) = sample_size.scaled(DecodeBounds::new(image.width(), image.height()));
    imageops::thumbnail(&image, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample(s: u32) -> SampleSize {
        SampleSize::new(s).unwrap()
    }

    #[test]
    fn test_subsample_identity() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let ptr = img.as_raw().as_ptr();
        let out = subsample(img, SampleSize::ONE);
        assert_eq!(out.as_raw().as_ptr(), ptr);
    }

    #[test]
    fn test_subsample_dimensions_floor() {
        let img = RgbaImage::from_pixel(101, 50, Rgba([0, 0, 0, 255]));
        let out = subsample(img, sample(4));
        assert_eq!(out.dimensions(), (25, 12));
    }

    #[test]
    fn test_subsample_tiny_source_keeps_one_pixel() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([0x10, 0x20, 0x30, 0xFF]));
        let out = subsample(img, sample(8));
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0x10, 0x20, 0x30, 0xFF]));
    }

    #[test]
    fn test_subsample_averages_blocks() {
        // 2x2 block: red 0, 100, 200, 100 -> 100; green 0, 10, 20, 30 -> 15
        let img = RgbaImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => Rgba([0, 0, 0, 255]),
            (1, 0) => Rgba([100, 10, 0, 255]),
            (0, 1) => Rgba([200, 20, 0, 255]),
            _ => Rgba([100, 30, 0, 255]),
        });
        let out = subsample(img, sample(2));

        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(out.get_pixel(0, 0), &Rgba([100, 15, 0, 255]));
    }

    #[test]
    fn test_subsample_uniform_stays_uniform() {
        let img = RgbaImage::from_pixel(63, 48, Rgba([0x33, 0x66, 0x99, 0xCC]));
        let out = subsample(img, sample(3));
        assert_eq!(out.dimensions(), (21, 16));
        assert!(out.pixels().all(|p| *p == Rgba([0x33, 0x66, 0x99, 0xCC])));
    }
}
