//! Crop viewport WASM bindings.
//!
//! The UI forwards layout notifications and pointer/wheel events to a
//! `JsCropViewport` and reads back the CSS transform for the image element
//! and the crop rectangle in native pixels.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const viewport = new JsCropViewport();
//! viewport.container_resized(rect.width, rect.height);
//! viewport.image_loaded(img.naturalWidth, img.naturalHeight, img.width, img.height);
//! container.onwheel = (e) => {
//!   viewport.wheel(e.offsetX, e.offsetY, e.deltaY);
//!   img.style.transform = viewport.css_transform();
//! };
//! ```

use crate::types::js_error;
use retouch_core::viewport::{
    AspectRatio, CropFrame, CropViewport, ImageMetrics, PixelCrop, Size, ViewportConfig,
    ViewportPoint,
};
use wasm_bindgen::prelude::*;

/// Crop rectangle in native pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsPixelCrop {
    inner: PixelCrop,
}

#[wasm_bindgen]
impl JsPixelCrop {
    #[wasm_bindgen(constructor)]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            inner: PixelCrop::new(x, y, width, height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u32 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u32 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// True when the rectangle selects at least one pixel
    pub fn is_selectable(&self) -> bool {
        self.inner.is_selectable()
    }
}

impl JsPixelCrop {
    pub(crate) fn inner(&self) -> PixelCrop {
        self.inner
    }
}

/// The on-screen crop frame in container pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JsCropFrame {
    inner: CropFrame,
}

#[wasm_bindgen]
impl JsCropFrame {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.height
    }
}

/// Pan/zoom engine for the crop tool.
#[wasm_bindgen]
pub struct JsCropViewport {
    inner: CropViewport,
}

impl Default for JsCropViewport {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsCropViewport {
    /// Create a viewport with the default limits (zoom 1 to 3)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_config(ViewportConfig::default())
    }

    /// Create a viewport from a config object, e.g. `{ max_zoom: 4 }`.
    /// Missing fields take their defaults.
    pub fn with_config(config: JsValue) -> Result<JsCropViewport, JsValue> {
        let config: ViewportConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
        Ok(Self::from_config(config))
    }

    pub fn container_resized(&mut self, width: f64, height: f64) {
        self.inner.container_resized(Size::new(width, height));
    }

    /// Select an aspect ratio by label: "Original", "1:1", "16:9" or "4:3"
    pub fn set_aspect_ratio(&mut self, label: &str) -> Result<(), JsValue> {
        let ratio = label.parse::<AspectRatio>().map_err(js_error)?;
        self.inner.set_aspect_ratio(ratio);
        Ok(())
    }

    /// A new source was selected; resets pan and zoom
    pub fn image_loading(&mut self) {
        self.inner.image_loading();
    }

    /// The source finished decoding and was laid out at `displayed_*`
    pub fn image_loaded(
        &mut self,
        natural_width: u32,
        natural_height: u32,
        displayed_width: f64,
        displayed_height: f64,
    ) {
        self.inner.image_loaded(ImageMetrics::new(
            natural_width,
            natural_height,
            Size::new(displayed_width, displayed_height),
        ));
    }

    pub fn image_laid_out(&mut self, displayed_width: f64, displayed_height: f64) {
        self.inner
            .image_laid_out(Size::new(displayed_width, displayed_height));
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(ViewportPoint::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.inner.pointer_move(ViewportPoint::new(x, y));
    }

    /// Pointer released or left the container
    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    /// Wheel zoom anchored at the cursor (container coordinates)
    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
        self.inner.wheel(ViewportPoint::new(x, y), delta_y);
    }

    /// Zoom slider, anchored at the container centre
    pub fn set_zoom(&mut self, zoom: f64) {
        self.inner.set_zoom(zoom);
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.pan().x
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.pan().y
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// Label of the selected aspect ratio
    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> String {
        self.inner.aspect_ratio().label().to_string()
    }

    pub fn frame(&self) -> JsCropFrame {
        JsCropFrame {
            inner: self.inner.frame(),
        }
    }

    /// The current crop in native pixels; all zero until an image is laid out
    pub fn pixel_crop(&self) -> JsPixelCrop {
        JsPixelCrop {
            inner: self.inner.pixel_crop(),
        }
    }

    /// Value for the image element's `style.transform`
    pub fn css_transform(&self) -> String {
        self.inner.css_transform()
    }
}

impl JsCropViewport {
    pub(crate) fn from_config(config: ViewportConfig) -> Self {
        Self {
            inner: CropViewport::new(config),
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_unknown_ratio_rejected() {
        let mut vp = JsCropViewport::new();
        assert!(vp.set_aspect_ratio("2:1").is_err());
        assert_eq!(vp.aspect_ratio(), "Original");
    }
}
