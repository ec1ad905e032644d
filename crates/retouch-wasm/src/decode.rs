//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, is_image_mime } from '@retouch/wasm';
//!
//! if (is_image_mime(file.type)) {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   const image = decode_image(bytes, file.type);
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::types::{js_error, JsDecodedImage};
use retouch_core::decode;
use wasm_bindgen::prelude::*;

/// Decode image bytes to RGBA, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if `mime_type` is not an `image/*` type, or the bytes
/// are not a supported, intact image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8], mime_type: &str) -> Result<JsDecodedImage, JsValue> {
    decode::validate_mime(mime_type).map_err(js_error)?;
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// True for `image/*` MIME types.
#[wasm_bindgen]
pub fn is_image_mime(mime_type: &str) -> bool {
    decode::validate_mime(mime_type).is_ok()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_rejects_non_image_mime() {
        assert!(decode_image(&[0, 1, 2], "text/plain").is_err());
    }

    #[wasm_bindgen_test]
    fn test_rejects_garbage() {
        assert!(decode_image(&[0, 1, 2], "image/png").is_err());
    }
}
