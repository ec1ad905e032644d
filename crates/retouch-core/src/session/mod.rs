//! The editing session: one owned aggregate for everything the editor
//! tracks between user actions.
//!
//! Transitions are named operations: upload, crop confirm, edit request and
//! completion, undo/redo, adjustment changes and export. Every failing
//! operation leaves the existing state untouched apart from recording the
//! user-facing error.

mod error;
mod history;

pub use error::SessionError;
pub use history::{EditedImage, History};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adjustments::{AdjustmentSet, FilterPreset, Slider};
use crate::composite::{compute_composite, export_png, preview_layers, PreviewLayers, RenderTarget};
use crate::decode::{decode_image, validate_mime};
use crate::edit::{
    background_prompt, decode_payload, with_aspect_ratio_hint, EditRequest, EditResponse,
    EDITED_IMAGE_MIME,
};
use crate::encode::{encode_png, export_file_name, EXPORT_MIME_TYPE};
use crate::transform::apply_pixel_crop;
use crate::viewport::{AspectRatio, PixelCrop};

/// The uploaded image, kept as the bytes the user supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Result of a completed remote edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub image_added: bool,
    pub text: Option<String>,
}

/// A rendered file ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    source: Option<SourceImage>,
    history: History,
    edited_text: Option<String>,
    aspect_ratio: AspectRatio,
    crop: Option<PixelCrop>,
    adjustments: AdjustmentSet,
    auto_enhanced: bool,
    in_flight: bool,
    last_error: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn current_image(&self) -> Option<&EditedImage> {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn edited_text(&self) -> Option<&str> {
        self.edited_text.as_deref()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn crop(&self) -> Option<PixelCrop> {
        self.crop
    }

    pub fn adjustments(&self) -> AdjustmentSet {
        self.adjustments
    }

    pub fn is_auto_enhanced(&self) -> bool {
        self.auto_enhanced
    }

    /// True while a remote edit is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Forget everything, as if the editor had just been opened.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn record(&mut self, err: SessionError) -> SessionError {
        warn!(error = %err, "session operation failed");
        self.last_error = Some(err.user_message());
        err
    }

    /// Start over with a newly selected image. Refused while an edit is in
    /// flight so a late answer cannot land on the new image.
    pub fn upload(
        &mut self,
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.in_flight {
            return Err(self.record(SessionError::EditInFlight));
        }
        let mime_type = mime_type.into();
        if let Err(e) = validate_mime(&mime_type) {
            return Err(self.record(e.into()));
        }
        info!(mime_type = %mime_type, bytes = bytes.len(), "image uploaded");

        // Aspect ratio is a tool preference and survives the new image
        let aspect_ratio = self.aspect_ratio;
        self.reset();
        self.aspect_ratio = aspect_ratio;
        self.source = Some(SourceImage { bytes, mime_type });
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.aspect_ratio = ratio;
    }

    /// Accept the crop published by the viewport.
    pub fn confirm_crop(&mut self, crop: PixelCrop) -> Result<(), SessionError> {
        if self.source.is_none() {
            return Err(self.record(SessionError::NoImage));
        }
        if !crop.is_selectable() {
            return Err(self.record(SessionError::EmptySelection));
        }
        info!(x = crop.x, y = crop.y, width = crop.width, height = crop.height, "crop confirmed");
        self.crop = Some(crop);
        Ok(())
    }

    pub fn clear_crop(&mut self) {
        self.crop = None;
    }

    /// Build the request for `prompt` and mark an edit as in flight.
    ///
    /// With a confirmed crop the source is cropped at native resolution and
    /// sent as PNG. Without one, the original bytes are sent and a
    /// non-`Original` aspect ratio is added to the prompt.
    pub fn prepare_edit(&mut self, prompt: &str) -> Result<EditRequest, SessionError> {
        let request = self.build_request(prompt).map_err(|e| self.record(e))?;

        self.in_flight = true;
        self.last_error = None;
        self.edited_text = None;
        self.reset_adjustments();
        info!(
            mime_type = %request.mime_type,
            cropped = self.crop.is_some(),
            "edit requested"
        );
        Ok(request)
    }

    /// [`prepare_edit`](Self::prepare_edit) with the background template.
    pub fn prepare_background_change(
        &mut self,
        description: &str,
    ) -> Result<EditRequest, SessionError> {
        if description.trim().is_empty() {
            return Err(self.record(SessionError::EmptyPrompt));
        }
        self.prepare_edit(&background_prompt(description))
    }

    fn build_request(&self, prompt: &str) -> Result<EditRequest, SessionError> {
        let source = self.source.as_ref().ok_or(SessionError::NoImage)?;
        if prompt.trim().is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        if self.in_flight {
            return Err(SessionError::EditInFlight);
        }

        match self.crop {
            Some(crop) => {
                let image = decode_image(&source.bytes)?;
                let cropped = apply_pixel_crop(&image, crop).ok_or(SessionError::EmptySelection)?;
                let png = encode_png(&cropped.pixels, cropped.width, cropped.height)?;
                Ok(EditRequest::new(&png, EXPORT_MIME_TYPE, prompt))
            }
            None => Ok(EditRequest::new(
                &source.bytes,
                source.mime_type.clone(),
                with_aspect_ratio_hint(prompt, self.aspect_ratio),
            )),
        }
    }

    /// Apply the remote editor's answer.
    ///
    /// An image is appended to history (dropping any redo tail) and text
    /// replaces the edited text. A response with neither is a soft failure.
    pub fn complete_edit(&mut self, response: EditResponse) -> Result<EditOutcome, SessionError> {
        if !self.in_flight {
            return Err(self.record(SessionError::NoEditInFlight));
        }
        self.in_flight = false;

        let response = response.normalized();
        if response.is_empty() {
            return Err(self.record(SessionError::NoResult));
        }
        let image = match response.image.as_deref().map(decode_payload).transpose() {
            Ok(image) => image,
            Err(e) => return Err(self.record(SessionError::InvalidPayload(e.to_string()))),
        };

        let image_added = image.is_some();
        if let Some(bytes) = image {
            self.history.push(EditedImage {
                bytes,
                mime_type: EDITED_IMAGE_MIME.to_string(),
            });
        }
        if let Some(text) = &response.text {
            self.edited_text = Some(text.clone());
        }
        info!(
            image_added,
            has_text = response.text.is_some(),
            history = self.history.len(),
            "edit completed"
        );
        Ok(EditOutcome {
            image_added,
            text: response.text,
        })
    }

    /// Record a failed remote call. `detail` goes to the log only.
    ///
    /// Without an outstanding request this is [`SessionError::NoEditInFlight`].
    pub fn fail_edit(&mut self, detail: impl Into<String>) -> SessionError {
        if !self.in_flight {
            return self.record(SessionError::NoEditInFlight);
        }
        self.in_flight = false;
        self.record(SessionError::RemoteCall(detail.into()))
    }

    pub fn can_undo(&self) -> bool {
        !self.in_flight && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.in_flight && self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.can_undo() && self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.can_redo() && self.history.redo()
    }

    /// Put every adjustment back to neutral and clear auto-enhance.
    pub fn reset_adjustments(&mut self) {
        self.adjustments = AdjustmentSet::default();
        self.auto_enhanced = false;
    }

    /// Turn auto-enhance on or off. Returns the new state.
    ///
    /// On writes the auto-enhance values; off resets everything.
    pub fn toggle_auto_enhance(&mut self) -> bool {
        let enable = !self.auto_enhanced;
        self.adjustments = if enable {
            AdjustmentSet::auto_enhanced()
        } else {
            AdjustmentSet::default()
        };
        self.auto_enhanced = enable;
        enable
    }

    pub fn set_filter(&mut self, filter: FilterPreset) {
        self.adjustments.active_filter = filter;
        self.auto_enhanced = false;
    }

    /// Move one slider, clamped to its range. Other values are untouched.
    pub fn set_slider(&mut self, slider: Slider, value: u32) {
        self.adjustments.set(slider, value);
        self.auto_enhanced = false;
    }

    pub fn preview_layers(&self) -> PreviewLayers {
        preview_layers(&compute_composite(&self.adjustments, RenderTarget::Preview))
    }

    /// Render the current edited image with the adjustments baked in.
    pub fn export(&mut self, now: DateTime<Utc>) -> Result<ExportedImage, SessionError> {
        let Some(current) = self.history.current() else {
            return Err(self.record(SessionError::NothingToExport));
        };
        let bytes = match export_png(&current.bytes, &self.adjustments) {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.record(e.into())),
        };
        let file_name = export_file_name(now);
        info!(file_name = %file_name, bytes = bytes.len(), "image exported");
        Ok(ExportedImage {
            file_name,
            mime_type: EXPORT_MIME_TYPE,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::encode_payload;
    use chrono::TimeZone;

    fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        encode_png(&rgba.repeat((width * height) as usize), width, height).unwrap()
    }

    fn loaded() -> EditSession {
        let mut s = EditSession::new();
        s.upload(png(4, 4, [100, 100, 100, 255]), "image/png").unwrap();
        s
    }

    fn image_response(bytes: &[u8]) -> EditResponse {
        EditResponse {
            image: Some(encode_payload(bytes)),
            text: None,
        }
    }

    #[test]
    fn test_upload_rejects_non_image() {
        let mut s = EditSession::new();
        let err = s.upload(b"hello".to_vec(), "text/plain").unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
        assert_eq!(s.last_error(), Some("Please select an image file."));
        assert!(s.source().is_none());
    }

    #[test]
    fn test_upload_resets_session() {
        let mut s = loaded();
        s.set_aspect_ratio(AspectRatio::Square);
        s.confirm_crop(PixelCrop::new(0, 0, 2, 2)).unwrap();
        s.set_slider(Slider::Brightness, 150);
        s.prepare_edit("x").unwrap();
        s.complete_edit(image_response(b"edited")).unwrap();

        s.upload(png(2, 2, [0, 0, 0, 255]), "image/png").unwrap();
        assert!(s.current_image().is_none());
        assert!(s.history().is_empty());
        assert!(s.crop().is_none());
        assert!(s.adjustments().is_default());
        assert_eq!(s.aspect_ratio(), AspectRatio::Square);
    }

    #[test]
    fn test_edit_requires_image_and_prompt() {
        let mut s = EditSession::new();
        assert!(matches!(s.prepare_edit("hi"), Err(SessionError::NoImage)));
        assert_eq!(s.last_error(), Some("Please upload an image."));

        let mut s = loaded();
        assert!(matches!(s.prepare_edit("  "), Err(SessionError::EmptyPrompt)));
        assert!(!s.is_busy());
    }

    #[test]
    fn test_single_edit_in_flight() {
        let mut s = loaded();
        s.prepare_edit("first").unwrap();
        assert!(s.is_busy());
        assert!(matches!(
            s.prepare_edit("second"),
            Err(SessionError::EditInFlight)
        ));
        s.complete_edit(image_response(b"a")).unwrap();
        assert!(!s.is_busy());
        assert!(s.prepare_edit("third").is_ok());
    }

    #[test]
    fn test_uncropped_request_adds_ratio_hint() {
        let mut s = loaded();
        s.set_aspect_ratio(AspectRatio::Standard);
        let req = s.prepare_edit("add a cat").unwrap();
        assert_eq!(req.mime_type, "image/png");
        assert!(req.prompt.starts_with("add a cat\n\nImportant:"));
        assert!(req.prompt.contains("4:3 aspect ratio"));
        assert_eq!(
            decode_payload(&req.image_base64).unwrap(),
            s.source().unwrap().bytes
        );
    }

    #[test]
    fn test_cropped_request_sends_png_without_hint() {
        let mut s = loaded();
        s.set_aspect_ratio(AspectRatio::Widescreen);
        s.confirm_crop(PixelCrop::new(1, 1, 2, 3)).unwrap();
        let req = s.prepare_edit("add a cat").unwrap();

        assert_eq!(req.prompt, "add a cat");
        assert_eq!(req.mime_type, "image/png");
        let sent = decode_image(&decode_payload(&req.image_base64).unwrap()).unwrap();
        assert_eq!((sent.width, sent.height), (2, 3));
    }

    #[test]
    fn test_crop_outside_source_is_rejected() {
        let mut s = loaded();
        s.confirm_crop(PixelCrop::new(10, 10, 5, 5)).unwrap();
        assert!(matches!(
            s.prepare_edit("x"),
            Err(SessionError::EmptySelection)
        ));
        assert!(!s.is_busy());
    }

    #[test]
    fn test_empty_crop_cannot_be_confirmed() {
        let mut s = loaded();
        assert!(matches!(
            s.confirm_crop(PixelCrop::EMPTY),
            Err(SessionError::EmptySelection)
        ));
        assert_eq!(s.last_error(), Some("Please select an area to crop."));
        assert!(s.crop().is_none());
    }

    #[test]
    fn test_background_change() {
        let mut s = loaded();
        assert!(matches!(
            s.prepare_background_change(""),
            Err(SessionError::EmptyPrompt)
        ));
        let req = s.prepare_background_change("a forest").unwrap();
        assert!(req.prompt.starts_with("Change the background to: a forest."));
    }

    #[test]
    fn test_starting_an_edit_resets_adjustments_and_text() {
        let mut s = loaded();
        s.prepare_edit("x").unwrap();
        s.complete_edit(EditResponse {
            image: None,
            text: Some("note".to_string()),
        })
        .unwrap();
        assert_eq!(s.edited_text(), Some("note"));
        s.toggle_auto_enhance();

        s.prepare_edit("y").unwrap();
        assert!(s.edited_text().is_none());
        assert!(s.adjustments().is_default());
        assert!(!s.is_auto_enhanced());
    }

    #[test]
    fn test_empty_response_is_soft_failure() {
        let mut s = loaded();
        s.prepare_edit("x").unwrap();
        let err = s.complete_edit(EditResponse::default()).unwrap_err();
        assert!(err.is_soft());
        assert_eq!(
            s.last_error(),
            Some("The model didn't return an image or text. Please try a different prompt.")
        );
        assert!(!s.is_busy());
    }

    #[test]
    fn test_remote_failure_keeps_state() {
        let mut s = loaded();
        s.prepare_edit("x").unwrap();
        s.complete_edit(image_response(b"one")).unwrap();
        s.prepare_edit("y").unwrap();

        let err = s.fail_edit("network down");
        assert!(matches!(err, SessionError::RemoteCall(_)));
        assert!(!s.is_busy());
        assert_eq!(s.current_image().map(|i| i.bytes.as_slice()), Some(&b"one"[..]));
        assert_eq!(
            s.last_error(),
            Some("Failed to edit image with AI. Please check the console for more details.")
        );
    }

    #[test]
    fn test_invalid_payload() {
        let mut s = loaded();
        s.prepare_edit("x").unwrap();
        let err = s
            .complete_edit(EditResponse {
                image: Some("***".to_string()),
                text: None,
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidPayload(_)));
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_upload_refused_while_edit_in_flight() {
        let mut s = loaded();
        let before = s.source().map(|src| src.bytes.clone());
        s.prepare_edit("x").unwrap();

        let err = s.upload(png(2, 2, [0, 0, 0, 255]), "image/png").unwrap_err();
        assert!(matches!(err, SessionError::EditInFlight));
        assert!(s.is_busy());
        assert_eq!(s.source().map(|src| src.bytes.clone()), before);

        // The outstanding answer still lands on the image it was made from
        s.complete_edit(image_response(b"edited")).unwrap();
        assert_eq!(s.history().len(), 1);
        assert!(s.upload(png(2, 2, [0, 0, 0, 255]), "image/png").is_ok());
    }

    #[test]
    fn test_unsolicited_answer_is_ignored() {
        let mut s = loaded();
        let err = s.complete_edit(image_response(b"stray")).unwrap_err();
        assert!(matches!(err, SessionError::NoEditInFlight));
        assert!(s.history().is_empty());
        assert!(s.edited_text().is_none());

        // A second answer to an already settled edit is ignored too
        s.prepare_edit("x").unwrap();
        s.complete_edit(image_response(b"one")).unwrap();
        assert!(matches!(
            s.complete_edit(image_response(b"two")),
            Err(SessionError::NoEditInFlight)
        ));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.current_image().map(|i| i.bytes.as_slice()), Some(&b"one"[..]));
    }

    #[test]
    fn test_fail_without_edit_in_flight() {
        let mut s = loaded();
        let err = s.fail_edit("late timeout");
        assert!(matches!(err, SessionError::NoEditInFlight));
        assert!(!s.is_busy());
        assert!(s.prepare_edit("x").is_ok());
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let mut s = loaded();
        s.prepare_edit("x").unwrap();
        let err = s
            .complete_edit(EditResponse {
                image: Some(String::new()),
                text: Some(String::new()),
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::NoResult));
        assert!(s.history().is_empty());
        assert!(s.edited_text().is_none());

        s.prepare_edit("y").unwrap();
        let outcome = s
            .complete_edit(EditResponse {
                image: Some(String::new()),
                text: Some("no changes needed".to_string()),
            })
            .unwrap();
        assert!(!outcome.image_added);
        assert!(s.history().is_empty());
        assert_eq!(s.edited_text(), Some("no changes needed"));
    }

    #[test]
    fn test_undo_redo_through_session() {
        let mut s = loaded();
        for tag in [b"1", b"2"] {
            s.prepare_edit("x").unwrap();
            s.complete_edit(image_response(tag)).unwrap();
        }
        assert!(s.undo());
        assert!(s.undo());
        assert!(s.current_image().is_none());
        assert!(!s.undo());
        assert!(s.redo());

        // New edit from the first image drops the redo tail
        s.prepare_edit("x").unwrap();
        assert!(!s.undo(), "history is locked while an edit is in flight");
        s.complete_edit(image_response(b"3")).unwrap();
        assert_eq!(s.history().len(), 2);
        assert!(!s.can_redo());
    }

    #[test]
    fn test_auto_enhance_toggle() {
        let mut s = loaded();
        assert!(s.toggle_auto_enhance());
        assert_eq!(s.adjustments(), AdjustmentSet::auto_enhanced());

        s.set_slider(Slider::Vignette, 30);
        assert!(!s.is_auto_enhanced());
        let adj = s.adjustments();
        assert_eq!((adj.brightness, adj.contrast, adj.saturation), (105, 110, 115));
        assert_eq!(adj.vignette, 30);

        // Toggling from off turns it back on
        assert!(s.toggle_auto_enhance());
        assert!(!s.toggle_auto_enhance());
        assert!(s.adjustments().is_default());
    }

    #[test]
    fn test_filter_clears_auto_enhance() {
        let mut s = loaded();
        s.toggle_auto_enhance();
        s.set_filter(FilterPreset::Sepia);
        assert!(!s.is_auto_enhanced());
        assert_eq!(s.adjustments().active_filter, FilterPreset::Sepia);
        assert_eq!(s.adjustments().brightness, 105);
    }

    #[test]
    fn test_slider_clamped() {
        let mut s = loaded();
        s.set_slider(Slider::Temperature, 999);
        s.set_slider(Slider::Vignette, 999);
        assert_eq!(s.adjustments().temperature, 200);
        assert_eq!(s.adjustments().vignette, 100);
    }

    #[test]
    fn test_export() {
        let mut s = loaded();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert!(matches!(s.export(now), Err(SessionError::NothingToExport)));

        s.prepare_edit("x").unwrap();
        s.complete_edit(image_response(&png(3, 3, [50, 50, 50, 255])))
            .unwrap();
        s.set_slider(Slider::Brightness, 200);

        let exported = s.export(now).unwrap();
        assert_eq!(exported.file_name, "edited-2024-01-02T03:04:05.000Z.png");
        assert_eq!(exported.mime_type, "image/png");
        let img = decode_image(&exported.bytes).unwrap();
        assert_eq!(img.pixel(1, 1), Some([100, 100, 100, 255]));
    }

    #[test]
    fn test_preview_layers_follow_adjustments() {
        let mut s = loaded();
        assert!(s.preview_layers().is_identity());
        s.set_slider(Slider::Contrast, 120);
        assert_eq!(s.preview_layers().filter.as_deref(), Some("contrast(1.2)"));
    }
}
