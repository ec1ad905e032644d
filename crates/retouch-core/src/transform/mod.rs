//! Pixel-space transforms applied to the source image.
//!
//! A confirmed [`PixelCrop`](crate::viewport::PixelCrop) slices the native
//! bitmap before it is sent for editing. Coordinates are whole native
//! pixels with the origin at the top-left corner.

mod crop;

pub use crop::apply_pixel_crop;
