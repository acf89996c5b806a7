//! Picprep WASM - WebAssembly bindings for picprep
//!
//! This crate exposes the picprep-core stages to JavaScript/TypeScript. The
//! background pipeline is not available here: a browser host runs these
//! functions inside its own Web Worker and binds results itself.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for raster images
//! - `decode` - Bounded decode, orientation and sample-size bindings
//! - `transform` - Rotation, square crop and stack blur bindings
//! - `settings` - `PrepConfig` exchange with JS objects
//! - `logging` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { load_profile_picture, stack_blur } from '@picprep/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const avatar = load_profile_picture(bytes, 1280);
//! const backdrop = stack_blur(avatar, 110);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod logging;
mod settings;
mod transform;
mod types;

pub use decode::{
    decode_oriented, load_profile_picture, probe_dimensions, read_orientation,
    rotation_for_orientation, sample_size_bounded_max, sample_size_fit_inside,
};
pub use logging::set_log_level;
pub use settings::JsPrepSettings;
pub use transform::{crop_to_square, rotate, stack_blur};
pub use types::JsRasterImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
