//! Native-resolution cropping.
//!
//! # Example
//!
//! ```ignore
//! let crop = viewport.pixel_crop();
//! let cropped = apply_pixel_crop(&image, crop).ok_or(SessionError::EmptySelection)?;
//! ```

use crate::decode::DecodedImage;
use crate::viewport::PixelCrop;

/// Copy the region selected by `crop` out of `image`.
///
/// The rectangle is intersected with the image bounds first. Returns `None`
/// when nothing is left, which covers the degenerate all-zero crop.
pub fn apply_pixel_crop(image: &DecodedImage, crop: PixelCrop) -> Option<DecodedImage> {
    let left = crop.x.min(image.width);
    let top = crop.y.min(image.height);
    let right = crop.x.saturating_add(crop.width).min(image.width);
    let bottom = crop.y.saturating_add(crop.height).min(image.height);

    let out_width = right.saturating_sub(left);
    let out_height = bottom.saturating_sub(top);
    if out_width == 0 || out_height == 0 {
        return None;
    }

    // Fast path: full crop returns a clone
    if out_width == image.width && out_height == image.height {
        return Some(image.clone());
    }

    const C: usize = DecodedImage::CHANNELS;
    let src_stride = image.width as usize * C;
    let row_len = out_width as usize * C;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    // Rows are contiguous, copy them whole
    for y in top..bottom {
        let start = y as usize * src_stride + left as usize * C;
        output.extend_from_slice(image.pixels.get(start..start + row_len)?);
    }

    Some(DecodedImage::new(out_width, out_height, output))
}
