//! WASM binding for native-resolution cropping.

use crate::types::JsDecodedImage;
use retouch_core::transform::apply_pixel_crop as core_crop;
use retouch_core::viewport::PixelCrop;
use wasm_bindgen::prelude::*;

/// Crop an image by a rectangle in native pixels.
///
/// The rectangle is clipped to the image. Returns `undefined` when nothing
/// is left.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const crop = viewport.pixel_crop();
/// const cropped = apply_pixel_crop(image, crop.x, crop.y, crop.width, crop.height);
/// ```
#[wasm_bindgen]
pub fn apply_pixel_crop(
    image: &JsDecodedImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Option<JsDecodedImage> {
    let src = image.to_decoded();
    core_crop(&src, PixelCrop::new(x, y, width, height)).map(JsDecodedImage::from_decoded)
}
