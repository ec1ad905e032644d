//! Image encoding WASM bindings.

use crate::types::{js_error, JsDecodedImage};
use retouch_core::encode;
use wasm_bindgen::prelude::*;

/// Encode an RGBA image to PNG bytes.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const png = encode_png(image);
/// const blob = new Blob([png], { type: 'image/png' });
/// ```
#[wasm_bindgen]
pub fn encode_png(image: &JsDecodedImage) -> Result<Vec<u8>, JsValue> {
    let pixels = image.pixels();
    encode::encode_png(&pixels, image.width(), image.height()).map_err(js_error)
}
