//! Adjustment set WASM bindings.
//!
//! Wraps the core `AdjustmentSet` so slider values can be read and written
//! from TypeScript and handed to the preview and export functions.

use crate::types::js_error;
use retouch_core::adjustments::{AdjustmentSet, FilterPreset, Slider};
use wasm_bindgen::prelude::*;

/// Cosmetic adjustments wrapper for JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsAdjustmentSet {
    inner: AdjustmentSet,
}

#[wasm_bindgen]
impl JsAdjustmentSet {
    /// Create a neutral adjustment set
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// The auto-enhance values
    pub fn auto_enhanced() -> Self {
        Self {
            inner: AdjustmentSet::auto_enhanced(),
        }
    }

    /// Name of the active filter preset, e.g. "Vintage"
    #[wasm_bindgen(getter)]
    pub fn filter(&self) -> String {
        self.inner.active_filter.name().to_string()
    }

    /// Select a filter preset by name
    pub fn set_filter(&mut self, name: &str) -> Result<(), JsValue> {
        self.inner.active_filter = name.parse::<FilterPreset>().map_err(js_error)?;
        Ok(())
    }

    /// Read a slider by name ("brightness", "vignette", ...)
    pub fn get(&self, slider: &str) -> Result<u32, JsValue> {
        let slider = slider.parse::<Slider>().map_err(js_error)?;
        Ok(self.inner.get(slider))
    }

    /// Write a slider by name, clamped to its range
    pub fn set(&mut self, slider: &str, value: u32) -> Result<(), JsValue> {
        let slider = slider.parse::<Slider>().map_err(js_error)?;
        self.inner.set(slider, value);
        Ok(())
    }

    /// Check if all adjustments are at default values
    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    /// Serialize to a plain object for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(js_error)
    }

    /// Deserialize from a plain object; missing fields take defaults
    pub fn from_json(value: JsValue) -> Result<JsAdjustmentSet, JsValue> {
        let inner: AdjustmentSet = serde_wasm_bindgen::from_value(value).map_err(js_error)?;
        Ok(Self {
            inner: inner.clamped(),
        })
    }
}

impl JsAdjustmentSet {
    pub(crate) fn from_inner(inner: AdjustmentSet) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &AdjustmentSet {
        &self.inner
    }
}
