//! Editing session WASM bindings.
//!
//! `JsEditSession` holds the uploaded image, edit history and adjustments.
//! The host page performs the remote call itself: it asks the session for
//! a request, sends it, and hands the answer back with `complete_edit` or
//! reports the failure with `fail_edit`.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsEditSession();
//! session.upload(bytes, file.type);
//! const request = session.prepare_edit("make the sky purple");
//! try {
//!   const answer = await callModel(request.image_base64, request.mime_type, request.prompt);
//!   session.complete_edit(answer.image, answer.text);
//! } catch (e) {
//!   showError(session.fail_edit(String(e)));
//! }
//! ```

use crate::adjustments::JsAdjustmentSet;
use crate::composite::utc_from_millis;
use crate::types::js_error;
use crate::viewport::JsPixelCrop;
use retouch_core::adjustments::{FilterPreset, Slider};
use retouch_core::edit::{data_url, EditRequest, EditResponse};
use retouch_core::session::{EditSession, ExportedImage, SessionError};
use retouch_core::viewport::AspectRatio;
use wasm_bindgen::prelude::*;

fn session_error(e: SessionError) -> JsValue {
    js_error(e.user_message())
}

/// Payload for the remote image editor.
#[wasm_bindgen]
pub struct JsEditRequest {
    inner: EditRequest,
}

#[wasm_bindgen]
impl JsEditRequest {
    /// Base64 image data, without a data-URL prefix
    #[wasm_bindgen(getter)]
    pub fn image_base64(&self) -> String {
        self.inner.image_base64.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn prompt(&self) -> String {
        self.inner.prompt.clone()
    }
}

/// A rendered PNG ready to be downloaded.
#[wasm_bindgen]
pub struct JsExportedImage {
    inner: ExportedImage,
}

#[wasm_bindgen]
impl JsExportedImage {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.inner.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.to_string()
    }

    /// Encoded file bytes as Uint8Array (a copy)
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }
}

/// The editor's state between user actions.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsEditSession {
    inner: EditSession,
}

#[wasm_bindgen]
impl JsEditSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with a newly selected file
    pub fn upload(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<(), JsValue> {
        self.inner.upload(bytes, mime_type).map_err(session_error)
    }

    /// Forget the image, history and adjustments
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.source().is_some()
    }

    /// Select an aspect ratio by label: "Original", "1:1", "16:9" or "4:3"
    pub fn set_aspect_ratio(&mut self, label: &str) -> Result<(), JsValue> {
        let ratio = label.parse::<AspectRatio>().map_err(js_error)?;
        self.inner.set_aspect_ratio(ratio);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> String {
        self.inner.aspect_ratio().label().to_string()
    }

    /// Accept the crop published by a `JsCropViewport`
    pub fn confirm_crop(&mut self, crop: &JsPixelCrop) -> Result<(), JsValue> {
        self.inner.confirm_crop(crop.inner()).map_err(session_error)
    }

    pub fn clear_crop(&mut self) {
        self.inner.clear_crop();
    }

    #[wasm_bindgen(getter)]
    pub fn has_crop(&self) -> bool {
        self.inner.crop().is_some()
    }

    /// Build the request for a free-form prompt and mark the edit in flight
    pub fn prepare_edit(&mut self, prompt: &str) -> Result<JsEditRequest, JsValue> {
        self.inner
            .prepare_edit(prompt)
            .map(|inner| JsEditRequest { inner })
            .map_err(session_error)
    }

    /// Build the request for a background replacement
    pub fn prepare_background_change(
        &mut self,
        description: &str,
    ) -> Result<JsEditRequest, JsValue> {
        self.inner
            .prepare_background_change(description)
            .map(|inner| JsEditRequest { inner })
            .map_err(session_error)
    }

    /// Hand back the remote editor's answer. Returns true when a new image
    /// was added to history. Fails when no edit is outstanding.
    pub fn complete_edit(
        &mut self,
        image: Option<String>,
        text: Option<String>,
    ) -> Result<bool, JsValue> {
        self.inner
            .complete_edit(EditResponse { image, text })
            .map(|outcome| outcome.image_added)
            .map_err(session_error)
    }

    /// Report a failed remote call. Returns the message to show the user.
    /// A failure arriving with no edit outstanding leaves the session as is.
    pub fn fail_edit(&mut self, detail: &str) -> String {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::error_1(&JsValue::from_str(detail));
        self.inner.fail_edit(detail).user_message()
    }

    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Message for the most recent failure, if any
    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(str::to_string)
    }

    pub fn clear_error(&mut self) {
        self.inner.clear_error();
    }

    #[wasm_bindgen(getter)]
    pub fn edited_text(&self) -> Option<String> {
        self.inner.edited_text().map(str::to_string)
    }

    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    /// Data URL of the current edited image, for an `<img>` element
    pub fn current_image_data_url(&self) -> Option<String> {
        self.inner
            .current_image()
            .map(|image| data_url(&image.mime_type, &image.bytes))
    }

    /// Bytes of the current edited image (a copy)
    pub fn current_image_bytes(&self) -> Option<Vec<u8>> {
        self.inner.current_image().map(|image| image.bytes.clone())
    }

    /// A copy of the current adjustments
    pub fn adjustments(&self) -> JsAdjustmentSet {
        JsAdjustmentSet::from_inner(self.inner.adjustments())
    }

    pub fn set_filter(&mut self, name: &str) -> Result<(), JsValue> {
        let filter = name.parse::<FilterPreset>().map_err(js_error)?;
        self.inner.set_filter(filter);
        Ok(())
    }

    pub fn set_slider(&mut self, name: &str, value: u32) -> Result<(), JsValue> {
        let slider = name.parse::<Slider>().map_err(js_error)?;
        self.inner.set_slider(slider, value);
        Ok(())
    }

    pub fn reset_adjustments(&mut self) {
        self.inner.reset_adjustments();
    }

    /// Returns the new auto-enhance state
    pub fn toggle_auto_enhance(&mut self) -> bool {
        self.inner.toggle_auto_enhance()
    }

    #[wasm_bindgen(getter)]
    pub fn is_auto_enhanced(&self) -> bool {
        self.inner.is_auto_enhanced()
    }

    /// Preview layers for the current adjustments, as a plain object
    pub fn preview_layers(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.preview_layers()).map_err(js_error)
    }

    /// Render the current edited image with the adjustments baked in
    pub fn export(&mut self) -> Result<JsExportedImage, JsValue> {
        self.export_at(js_sys::Date::now()).map_err(session_error)
    }
}

impl JsEditSession {
    pub(crate) fn export_at(&mut self, millis: f64) -> Result<JsExportedImage, SessionError> {
        self.inner.export(utc_from_millis(millis)).map(|inner| JsExportedImage { inner })
    }
}
