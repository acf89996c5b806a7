//! Stack blur: an integer, linear-time approximation of a Gaussian blur.
//!
//! Stack Blur Algorithm by Mario Klingemann <mario@quasimondo.com>
//!
//! # Algorithm
//!
//! Each output channel is a triangular-weighted average of the `2r + 1`
//! samples centered on the pixel, sample `i` weighted `r + 1 - |i|`. A ring
//! buffer (the "stack") holds the window; three running sums are updated
//! per step:
//!
//! ```text
//! sum     weighted sum of the whole window
//! in_sum  plain sum of the samples right of center (weights rising next step)
//! out_sum plain sum of the samples left of and at center (weights falling)
//! ```
//!
//! Sliding one pixel costs O(1), so a pass is O(width * height) regardless
//! of the radius. A horizontal pass writes separate R/G/B planes; the
//! vertical pass reads them and writes the final pixels. Samples outside the
//! image clamp to the nearest edge. Weighted sums are mapped back to 0..=255
//! through a division table of `256 * (r + 1)^2` entries. Alpha is copied
//! from the input untouched.

use crate::decode::RasterImage;

/// Radius used when no radius is configured.
pub const DEFAULT_BLUR_RADIUS: u32 = 110;

/// Largest accepted radius. Keeps the division table at 16 MiB and the
/// weighted sums inside `u32`.
pub const MAX_BLUR_RADIUS: u32 = 255;

type Channels = [u32; 3];

#[inline]
fn channels(pixel: u32) -> Channels {
    [(pixel >> 16) & 0xff, (pixel >> 8) & 0xff, pixel & 0xff]
}

#[inline]
fn add(acc: &mut Channels, v: Channels) {
    for (a, v) in acc.iter_mut().zip(v) {
        *a += v;
    }
}

#[inline]
fn sub(acc: &mut Channels, v: Channels) {
    for (a, v) in acc.iter_mut().zip(v) {
        *a -= v;
    }
}

#[inline]
fn add_weighted(acc: &mut Channels, v: Channels, weight: u32) {
    for (a, v) in acc.iter_mut().zip(v) {
        *a += v * weight;
    }
}

/// Running sums for one scanline.
#[derive(Default)]
struct Window {
    sum: Channels,
    in_sum: Channels,
    out_sum: Channels,
}

impl Window {
    /// Seed sample at offset `i` from the center.
    #[inline]
    fn seed(&mut self, v: Channels, i: isize, r1: u32) {
        add_weighted(&mut self.sum, v, r1 - i.unsigned_abs() as u32);
        if i > 0 {
            add(&mut self.in_sum, v);
        } else {
            add(&mut self.out_sum, v);
        }
    }

    /// Advance by one sample: drop `oldest`, take `incoming`, and move
    /// `new_center` from the rising to the falling half.
    #[inline]
    fn slide(&mut self, oldest: Channels, incoming: Channels, new_center: Channels) {
        sub(&mut self.sum, self.out_sum);
        sub(&mut self.out_sum, oldest);
        add(&mut self.in_sum, incoming);
        add(&mut self.sum, self.in_sum);
        add(&mut self.out_sum, new_center);
        sub(&mut self.in_sum, new_center);
    }
}

/// A stack blur of fixed radius.
///
/// Building one precomputes the division table, which can then be shared by
/// any number of [`StackBlur::apply`] calls.
#[derive(Debug, Clone)]
pub struct StackBlur {
    radius: usize,
    divisor_table: Vec<u8>,
}

impl StackBlur {
    /// Create a blur with the given radius. Returns `None` unless
    /// `1 <= radius <= MAX_BLUR_RADIUS`.
    pub fn new(radius: u32) -> Option<Self> {
        if !(1..=MAX_BLUR_RADIUS).contains(&radius) {
            return None;
        }
        let radius = radius as usize;
        let div = 2 * radius + 1;
        let divisor = ((div + 1) >> 1).pow(2);
        let divisor_table = (0..256 * divisor).map(|i| (i / divisor) as u8).collect();
        Some(Self {
            radius,
            divisor_table,
        })
    }

    pub fn radius(&self) -> u32 {
        self.radius as u32
    }

    #[inline]
    fn normalize(&self, sum: Channels) -> Channels {
        sum.map(|s| self.divisor_table[s as usize] as u32)
    }

    /// Blur an image. The input is left untouched; the result is a new image.
    pub fn apply(&self, image: &RasterImage) -> RasterImage {
        let (width, height) = image.dimensions();
        let w = width as usize;
        let h = height as usize;
        let wm = w - 1;
        let hm = h - 1;
        let radius = self.radius;
        let r = radius as isize;
        let r1 = (radius + 1) as u32;
        let div = 2 * radius + 1;

        let mut output = image.clone();
        let pix = output.pixels_mut();
        let mut planes: Vec<Channels> = vec![[0; 3]; w * h];
        let mut vmin = vec![0usize; w.max(h)];
        let mut stack: Vec<Channels> = vec![[0; 3]; div];

        // Horizontal pass: pix -> planes
        let mut yi = 0;
        let mut yw = 0;
        for y in 0..h {
            let mut window = Window::default();
            for i in -r..=r {
                let v = channels(pix[yi + (i.max(0) as usize).min(wm)]);
                stack[(i + r) as usize] = v;
                window.seed(v, i, r1);
            }

            let mut sp = radius;
            for x in 0..w {
                planes[yi] = self.normalize(window.sum);

                let start = (sp + div - radius) % div;
                let oldest = stack[start];
                if y == 0 {
                    vmin[x] = (x + radius + 1).min(wm);
                }
                let incoming = channels(pix[yw + vmin[x]]);
                stack[start] = incoming;
                sp = (sp + 1) % div;
                window.slide(oldest, incoming, stack[sp]);

                yi += 1;
            }
            yw += w;
        }

        // Vertical pass: planes -> pix, keeping alpha
        for x in 0..w {
            let mut window = Window::default();
            let mut yp = -r * w as isize;
            for i in -r..=r {
                let v = planes[yp.max(0) as usize + x];
                stack[(i + r) as usize] = v;
                window.seed(v, i, r1);
                if i < hm as isize {
                    yp += w as isize;
                }
            }

            let mut yi = x;
            let mut sp = radius;
            for y in 0..h {
                let [red, green, blue] = self.normalize(window.sum);
                pix[yi] = (pix[yi] & 0xff00_0000) | red << 16 | green << 8 | blue;

                let start = (sp + div - radius) % div;
                let oldest = stack[start];
                if x == 0 {
                    vmin[y] = (y + radius + 1).min(hm) * w;
                }
                let incoming = planes[x + vmin[y]];
                stack[start] = incoming;
                sp = (sp + 1) % div;
                window.slide(oldest, incoming, stack[sp]);

                yi += w;
            }
        }

        output
    }
}

/// Blur an image with the given radius.
///
/// Returns `None` when `radius` is 0 or above [`MAX_BLUR_RADIUS`]. Otherwise the result is a new image
/// whose alpha channel is identical to the input's.
pub fn stack_blur(image: &RasterImage, radius: u32) -> Option<RasterImage> {
    StackBlur::new(radius).map(|blur| blur.apply(image))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
