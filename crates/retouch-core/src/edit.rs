//! Request and response shapes for the remote image editor.
//!
//! The remote call itself lives outside this crate. The session builds an
//! [`EditRequest`] and later receives an [`EditResponse`]; both carry image
//! bytes as standard base64 without a data URL prefix.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::viewport::AspectRatio;

/// MIME type of images returned by the remote editor.
pub const EDITED_IMAGE_MIME: &str = "image/png";

/// One edit instruction sent to the remote editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub image_base64: String,
    pub mime_type: String,
    pub prompt: String,
}

impl EditRequest {
    pub fn new(image: &[u8], mime_type: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            image_base64: encode_payload(image),
            mime_type: mime_type.into(),
            prompt: prompt.into(),
        }
    }
}

/// What the remote editor sent back. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditResponse {
    /// Base64 image bytes.
    pub image: Option<String>,
    pub text: Option<String>,
}

impl EditResponse {
    /// Treat empty strings (and a blank image payload) as absent fields.
    pub fn normalized(self) -> Self {
        Self {
            image: self.image.filter(|image| !image.trim().is_empty()),
            text: self.text.filter(|text| !text.is_empty()),
        }
    }

    /// Neither a non-empty image nor non-empty text came back.
    pub fn is_empty(&self) -> bool {
        self.image.as_deref().map_or(true, |image| image.trim().is_empty())
            && self.text.as_deref().map_or(true, str::is_empty)
    }
}

/// Append the output-shape hint used when no crop fixes the aspect ratio.
///
/// `Original` leaves the prompt untouched.
pub fn with_aspect_ratio_hint(prompt: &str, ratio: AspectRatio) -> String {
    if ratio == AspectRatio::Original {
        return prompt.to_string();
    }
    format!(
        "{prompt}\n\nImportant: The final output image must have a {ratio} aspect ratio. \
         Creatively fill any new areas if necessary."
    )
}

/// Prompt for replacing the background while keeping the subject.
pub fn background_prompt(description: &str) -> String {
    format!(
        "Change the background to: {description}. \
         Keep the foreground subject unchanged and realistic."
    )
}

pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_payload(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(data.trim())
}

/// `data:` URL for showing bytes in an `<img>` element.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", encode_payload(bytes))
}
