//! Tunables for decoding, blurring and the background pipeline.

use thiserror::Error;

use crate::decode::{MAX_HEIGHT, MAX_WIDTH};
use crate::filter::{DEFAULT_BLUR_RADIUS, MAX_BLUR_RADIUS};

/// Default worker thread name prefix.
pub const DEFAULT_THREAD_NAME: &str = "picprep-worker";

/// A `PrepConfig` value outside its accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration: {0}")]
pub struct ConfigError(pub String);

/// Image preparation settings.
///
/// Every field has a default, so a partial serialized form is accepted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Background worker threads. `0` means one per available CPU.
    pub workers: usize,
    /// Prefix for worker thread names.
    pub thread_name: String,
    /// Stack blur radius used when a request does not name one.
    pub blur_radius: u32,
    /// Default requested decode width.
    pub max_width: u32,
    /// Default requested decode height.
    pub max_height: u32,
    /// Default `max_side` for profile-picture loads.
    pub profile_side: u32,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            blur_radius: DEFAULT_BLUR_RADIUS,
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            profile_side: MAX_WIDTH,
        }
    }
}

impl PrepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every size and radius is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blur_radius == 0 {
            return Err(ConfigError("blur_radius must be at least 1".to_string()));
        }
        if self.blur_radius > MAX_BLUR_RADIUS {
            return Err(ConfigError(format!(
                "blur_radius must be at most {MAX_BLUR_RADIUS}, got {}",
                self.blur_radius
            )));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError(format!(
                "max size must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if self.profile_side == 0 {
            return Err(ConfigError("profile_side must be positive".to_string()));
        }
        Ok(())
    }
}
