//! Retouch Core - crop viewport and compositing library
//!
//! This crate provides the core of the Retouch photo editor: the pan/zoom
//! crop viewport, the adjustment compositing pipeline shared by preview and
//! export, image decode/encode, and the editing session that ties them to
//! the remote image editor.

pub mod adjustments;
pub mod composite;
pub mod decode;
pub mod edit;
pub mod encode;
pub mod session;
pub mod transform;
pub mod viewport;

pub use adjustments::{AdjustmentSet, FilterPreset, Slider};
pub use composite::{
    compute_composite, export_png, preview_layers, render_composite, CompositeError,
    CompositePlan, PreviewLayers, RenderTarget,
};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use edit::{EditRequest, EditResponse};
pub use encode::{encode_png, export_file_name, EncodeError};
pub use session::{EditSession, SessionError};
pub use transform::apply_pixel_crop;
pub use viewport::{AspectRatio, CropViewport, PixelCrop, ViewportConfig};
