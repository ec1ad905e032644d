//! Crop viewport: pan/zoom math behind the interactive crop tool.
//!
//! The user drags and wheel-zooms an image behind a fixed crop frame. This
//! module turns those gestures into pan/zoom state and maps the frame back
//! onto the original bitmap as a [`PixelCrop`].
//!
//! # Coordinate Spaces
//!
//! - `ViewportPoint`: container pixels, origin top-left
//! - `ImageLocalPoint`: unzoomed image pixels, origin at the image centre
//! - `NativePoint`: original bitmap pixels, origin top-left
//!
//! # Layout
//!
//! The image is centred in the container, scaled by `zoom` about its centre,
//! then translated by `pan`. Pan is always clamped so the frame stays covered
//! by the image whenever the image is large enough to cover it.
//!
//! # Example
//!
//! ```ignore
//! use retouch_core::viewport::{CropViewport, ImageMetrics, Size, ViewportPoint};
//!
//! let mut viewport = CropViewport::default();
//! let container = Size::new(800.0, 600.0);
//! viewport.container_resized(container);
//! viewport.image_loaded(ImageMetrics::contained(4000, 3000, container));
//! viewport.wheel(ViewportPoint::new(400.0, 300.0), -100.0);
//! let crop = viewport.pixel_crop();
//! ```

mod crop;
mod engine;
mod frame;
mod space;

pub use crop::{derive_pixel_crop, CropInputs, CropMemo, PixelCrop};
pub use engine::{CropViewport, PanBounds, ViewportConfig};
pub use frame::{AspectRatio, CropFrame, UnknownAspectRatio, DEFAULT_FRAME_FILL};
pub use space::{
    ImageLocalPoint, ImageMetrics, NativePoint, Projection, Size, ViewportPoint, ViewportState,
};
