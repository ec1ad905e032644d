//! Compositing WASM bindings.
//!
//! The preview side returns CSS values for the image element and its two
//! overlay layers. The export side bakes the same adjustments into pixels.

use crate::adjustments::JsAdjustmentSet;
use crate::types::{js_error, JsDecodedImage};
use chrono::{DateTime, Utc};
use retouch_core::composite::{
    self, compute_composite, preview_layers as core_preview, RenderTarget,
};
use retouch_core::encode;
use wasm_bindgen::prelude::*;

/// Preview layers as a plain object:
/// `{ filter, temperature: { backgroundColor, mixBlendMode }, vignette }`.
/// Absent layers are `undefined`.
#[wasm_bindgen]
pub fn preview_layers(adjustments: &JsAdjustmentSet) -> Result<JsValue, JsValue> {
    let plan = compute_composite(adjustments.inner(), RenderTarget::Preview);
    serde_wasm_bindgen::to_value(&core_preview(&plan)).map_err(js_error)
}

/// The base image's CSS `filter` value ("none" when nothing applies).
#[wasm_bindgen]
pub fn preview_filter_css(adjustments: &JsAdjustmentSet) -> String {
    let plan = compute_composite(adjustments.inner(), RenderTarget::Preview);
    core_preview(&plan).filter_css().to_string()
}

/// Bake adjustments into a decoded image at native resolution.
#[wasm_bindgen]
pub fn render_composite(
    image: &JsDecodedImage,
    adjustments: &JsAdjustmentSet,
) -> Result<JsDecodedImage, JsValue> {
    let plan = compute_composite(adjustments.inner(), RenderTarget::Export);
    composite::render_composite(&image.to_decoded(), &plan)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// Decode an image file, bake adjustments in and encode as PNG.
#[wasm_bindgen]
pub fn export_png(bytes: &[u8], adjustments: &JsAdjustmentSet) -> Result<Vec<u8>, JsValue> {
    composite::export_png(bytes, adjustments.inner()).map_err(js_error)
}

/// Download name for an export made now, e.g.
/// `edited-2024-05-01T12:30:00.123Z.png`.
#[wasm_bindgen]
pub fn export_file_name() -> String {
    export_file_name_at(js_sys::Date::now())
}

pub(crate) fn export_file_name_at(millis: f64) -> String {
    encode::export_file_name(utc_from_millis(millis))
}

/// `Date.now()` style milliseconds to a UTC timestamp. Out-of-range values
/// fall back to the epoch.
pub(crate) fn utc_from_millis(millis: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis as i64).unwrap_or_default()
}
