use thiserror::Error;

use crate::composite::CompositeError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

const REMOTE_FAILURE_MESSAGE: &str =
    "Failed to edit image with AI. Please check the console for more details.";
const NO_RESULT_MESSAGE: &str =
    "The model didn't return an image or text. Please try a different prompt.";

/// Why an editing session operation was refused or failed.
///
/// None of these leave the session in a broken state; the failed operation
/// is simply abandoned.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No image uploaded")]
    NoImage,

    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("An edit is already in flight")]
    EditInFlight,

    /// An edit result or failure arrived with no request outstanding.
    #[error("No edit is in flight")]
    NoEditInFlight,

    /// The crop selects no pixels.
    #[error("Crop selection is empty")]
    EmptySelection,

    #[error("No edited image to export")]
    NothingToExport,

    /// The remote editor call failed. Carries the underlying detail for logs.
    #[error("Remote edit failed: {0}")]
    RemoteCall(String),

    /// The remote editor answered with neither an image nor text.
    #[error("Remote edit returned no result")]
    NoResult,

    /// The returned image payload could not be read.
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Composite(#[from] CompositeError),
}

impl SessionError {
    /// Message suitable for showing in the UI.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::NoImage => "Please upload an image.".to_string(),
            SessionError::EmptyPrompt => "Please enter a prompt.".to_string(),
            SessionError::EditInFlight => "Please wait for the current edit to finish.".to_string(),
            SessionError::NoEditInFlight => {
                "That edit is no longer pending and was ignored.".to_string()
            }
            SessionError::EmptySelection => "Please select an area to crop.".to_string(),
            SessionError::NothingToExport => "There is no edited image to download.".to_string(),
            SessionError::RemoteCall(_) => REMOTE_FAILURE_MESSAGE.to_string(),
            SessionError::NoResult => NO_RESULT_MESSAGE.to_string(),
            SessionError::InvalidPayload(_) => {
                "The model returned an image that could not be read.".to_string()
            }
            SessionError::Decode(DecodeError::NotAnImage(_)) => {
                "Please select an image file.".to_string()
            }
            SessionError::Composite(CompositeError::SurfaceUnavailable { .. }) => {
                "Could not get canvas context".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Soft failures are outcomes the user can act on, not faults.
    pub fn is_soft(&self) -> bool {
        matches!(self, SessionError::NoResult)
    }
}
