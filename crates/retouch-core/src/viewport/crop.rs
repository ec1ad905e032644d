//! Derivation of the native-resolution crop rectangle.
//!
//! The crop is a pure function of viewport state, crop frame, container size
//! and image metrics. [`CropMemo`] caches the last result keyed on exactly
//! those inputs.

use serde::{Deserialize, Serialize};

use super::frame::CropFrame;
use super::space::{ImageMetrics, Projection, Size, ViewportState};

/// Crop rectangle in native pixel space.
///
/// The all-zero value means "no valid crop yet" (image not decoded, or no
/// frame laid out).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelCrop {
    pub const EMPTY: PixelCrop = PixelCrop {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A crop can be confirmed only when it selects at least one pixel.
    pub fn is_selectable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Everything [`derive_pixel_crop`] depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropInputs {
    pub state: ViewportState,
    pub frame: CropFrame,
    pub container: Size,
    pub metrics: Option<ImageMetrics>,
}

/// Map the on-screen crop frame onto the native bitmap.
///
/// The result is rounded to whole pixels and clipped to the bitmap so that
/// `x + width <= natural_width` and `y + height <= natural_height` always
/// hold. Returns [`PixelCrop::EMPTY`] until the image is laid out and the
/// frame has a size.
pub fn derive_pixel_crop(inputs: &CropInputs) -> PixelCrop {
    let Some(metrics) = inputs.metrics else {
        return PixelCrop::EMPTY;
    };
    if inputs.frame.is_empty() || inputs.container.is_empty() {
        return PixelCrop::EMPTY;
    }
    let Some(scale_to_natural) = metrics.scale_to_natural() else {
        return PixelCrop::EMPTY;
    };

    let projection = Projection::new(inputs.container, metrics.displayed, inputs.state);
    let origin = projection.to_native(inputs.frame.top_left(), scale_to_natural);
    let width = projection
        .length_to_native(inputs.frame.width, scale_to_natural)
        .round();
    let height = projection
        .length_to_native(inputs.frame.height, scale_to_natural)
        .round();

    let (x, width) = clip_span(origin.x.round(), width, metrics.natural_width);
    let (y, height) = clip_span(origin.y.round(), height, metrics.natural_height);

    PixelCrop {
        x,
        y,
        width,
        height,
    }
}

/// Intersect `[start, start + len)` with `[0, limit)`.
fn clip_span(start: f64, len: f64, limit: u32) -> (u32, u32) {
    if !start.is_finite() || !len.is_finite() {
        return (0, 0);
    }
    let limit = limit as f64;
    let lo = start.clamp(0.0, limit);
    let hi = (start + len).clamp(lo, limit);
    (lo as u32, (hi - lo) as u32)
}

/// Single-entry cache for [`derive_pixel_crop`].
#[derive(Debug, Clone, Default)]
pub struct CropMemo {
    last: Option<(CropInputs, PixelCrop)>,
}

impl CropMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached crop when `inputs` match the previous call,
    /// otherwise derive and cache a new one.
    pub fn get(&mut self, inputs: CropInputs) -> PixelCrop {
        if let Some((cached_inputs, crop)) = &self.last {
            if *cached_inputs == inputs {
                return *crop;
            }
        }
        let crop = derive_pixel_crop(&inputs);
        self.last = Some((inputs, crop));
        crop
    }

    /// True when the next [`CropMemo::get`] with `inputs` is served from cache.
    pub fn is_cached(&self, inputs: &CropInputs) -> bool {
        matches!(&self.last, Some((cached, _)) if cached == inputs)
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
