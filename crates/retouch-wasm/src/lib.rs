//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate exposes the retouch-core crop viewport, compositing pipeline
//! and editing session to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `viewport` - Pan/zoom crop tool (`JsCropViewport`)
//! - `session` - Upload, remote edit round trip, history and export
//! - `adjustments` - Filter preset and slider values
//! - `composite` - Preview CSS layers and the export raster pass
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` / `encode` / `transform` - Pixel-level helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, JsCropViewport } from '@retouch/wasm';
//!
//! await init();
//!
//! const session = new JsEditSession();
//! session.upload(new Uint8Array(await file.arrayBuffer()), file.type);
//!
//! const viewport = new JsCropViewport();
//! viewport.container_resized(rect.width, rect.height);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod composite;
mod decode;
mod encode;
mod session;
mod transform;
mod types;
mod viewport;

// Re-export public types
pub use adjustments::JsAdjustmentSet;
pub use composite::{
    export_file_name, export_png, preview_filter_css, preview_layers, render_composite,
};
pub use decode::{decode_image, is_image_mime};
pub use encode::encode_png;
pub use session::{JsEditRequest, JsEditSession, JsExportedImage};
pub use transform::apply_pixel_crop;
pub use types::JsDecodedImage;
pub use viewport::{JsCropFrame, JsCropViewport, JsPixelCrop};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "retouch wasm loaded");
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
