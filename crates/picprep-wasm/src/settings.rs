//! `PrepConfig` exchange with JavaScript objects.

use picprep_core::config::PrepConfig;
use wasm_bindgen::prelude::*;

/// Image preparation settings.
///
/// # Example (TypeScript)
/// ```typescript
/// const settings = JsPrepSettings.from_object({ blur_radius: 40 });
/// const blurred = stack_blur(avatar, settings.blur_radius);
/// ```
#[wasm_bindgen]
pub struct JsPrepSettings {
    inner: PrepConfig,
}

#[wasm_bindgen]
impl JsPrepSettings {
    /// Default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsPrepSettings {
        JsPrepSettings {
            inner: PrepConfig::default(),
        }
    }

    /// Build settings from a plain object. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns an error if the object cannot be deserialized or a value is
    /// out of range.
    pub fn from_object(value: JsValue) -> Result<JsPrepSettings, JsValue> {
        let inner: PrepConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?;
        Self::checked(inner).map_err(|e| JsValue::from_str(&e))
    }

    /// Serialize to a plain object.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_object(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn blur_radius(&self) -> u32 {
        self.inner.blur_radius
    }

    #[wasm_bindgen(getter)]
    pub fn max_width(&self) -> u32 {
        self.inner.max_width
    }

    #[wasm_bindgen(getter)]
    pub fn max_height(&self) -> u32 {
        self.inner.max_height
    }

    #[wasm_bindgen(getter)]
    pub fn profile_side(&self) -> u32 {
        self.inner.profile_side
    }
}

impl Default for JsPrepSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl JsPrepSettings {
    fn checked(inner: PrepConfig) -> Result<Self, String> {
        inner.validate().map_err(|e| e.to_string())?;
        Ok(Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = JsPrepSettings::new();
        assert_eq!(settings.blur_radius(), 110);
        assert_eq!(settings.max_width(), 1280);
        assert_eq!(settings.max_height(), 1280);
        assert_eq!(settings.profile_side(), 1280);
    }

    #[test]
    fn test_checked_rejects_zero_radius() {
        let mut config = PrepConfig::default();
        config.blur_radius = 0;
        let err = JsPrepSettings::checked(config).err().unwrap();
        assert!(err.contains("blur_radius"));
    }

    #[test]
    fn test_checked_accepts_custom() {
        let mut config = PrepConfig::default();
        config.profile_side = 256;
        assert_eq!(JsPrepSettings::checked(config).unwrap().profile_side(), 256);
    }
}
