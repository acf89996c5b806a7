//! Pixel filters.

mod stack_blur;

pub use stack_blur::{stack_blur, StackBlur, DEFAULT_BLUR_RADIUS, MAX_BLUR_RADIUS};
