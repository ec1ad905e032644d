//! Offscreen raster pass that bakes a [`CompositePlan`] into pixels.
//!
//! Channels are processed as straight sRGB values in 0.0 to 1.0 and
//! quantized back to 8 bits once, after the last layer.

use thiserror::Error;
use tracing::debug;

use super::blend::composite_over;
use super::filters::{apply_chain, Rgb};
use super::plan::{compute_composite, BlendMode, CompositePlan, RenderTarget};
use crate::adjustments::AdjustmentSet;
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode_png, EncodeError};

/// Errors from the export raster pass.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// The offscreen surface could not be allocated.
    #[error("Could not allocate a {width}x{height} drawing surface")]
    SurfaceUnavailable { width: u32, height: u32 },

    /// The pixel buffer does not hold `width * height` RGBA pixels.
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    PixelDataMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Byte length of a `width` x `height` RGBA surface, `None` on overflow.
fn surface_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(DecodedImage::CHANNELS))
}

/// Reserve a pixel buffer for a `width` x `height` RGBA surface.
fn allocate_surface(width: u32, height: u32) -> Result<Vec<u8>, CompositeError> {
    let unavailable = CompositeError::SurfaceUnavailable { width, height };
    if width == 0 || height == 0 {
        return Err(unavailable);
    }
    let Some(len) = surface_len(width, height) else {
        return Err(unavailable);
    };
    let mut surface = Vec::new();
    surface.try_reserve_exact(len).map_err(|_| unavailable)?;
    Ok(surface)
}

#[inline]
fn to_unit(v: u8) -> f64 {
    v as f64 / 255.0
}

#[inline]
fn to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn unit_rgb(rgb: [u8; 3]) -> Rgb {
    rgb.map(to_unit)
}

/// Draw `plan` over `image` at the image's native resolution.
///
/// An identity plan returns an exact copy of the input.
pub fn render_composite(
    image: &DecodedImage,
    plan: &CompositePlan,
) -> Result<DecodedImage, CompositeError> {
    let mut surface = allocate_surface(image.width, image.height)?;
    let expected = surface_len(image.width, image.height).unwrap_or(usize::MAX);
    if image.pixels.len() != expected {
        return Err(CompositeError::PixelDataMismatch {
            expected,
            actual: image.pixels.len(),
        });
    }
    if plan.is_identity() {
        surface.extend_from_slice(&image.pixels);
        return Ok(DecodedImage::new(image.width, image.height, surface));
    }

    debug!(
        width = image.width,
        height = image.height,
        filters = plan.filters.len(),
        temperature = plan.temperature.is_some(),
        vignette = plan.vignette.is_some(),
        "rendering composite"
    );

    let temperature = plan
        .temperature
        .map(|overlay| (overlay.blend, unit_rgb(overlay.rgb), overlay.alpha));
    let (cx, cy) = (image.width as f64 / 2.0, image.height as f64 / 2.0);
    let vignette = plan.vignette.map(|v| {
        let (inner, outer) = v.radii(image.width as f64, image.height as f64);
        (v, inner, outer)
    });

    let width = image.width as usize;
    for (i, px) in image
        .pixels
        .chunks_exact(DecodedImage::CHANNELS)
        .enumerate()
    {
        let base = [to_unit(px[0]), to_unit(px[1]), to_unit(px[2])];
        let mut rgb = apply_chain(base, &plan.filters);
        let mut alpha = to_unit(px[3]);

        if let Some((blend, color, overlay_alpha)) = temperature {
            (rgb, alpha) = composite_over(blend, rgb, alpha, color, overlay_alpha);
        }

        if let Some((v, inner, outer)) = &vignette {
            // Sample the gradient at the pixel centre
            let x = (i % width) as f64 + 0.5;
            let y = (i / width) as f64 + 0.5;
            let d = (x - cx).hypot(y - cy);
            let shade = v.alpha_at(d, *inner, *outer);
            if shade > 0.0 {
                (rgb, alpha) = composite_over(BlendMode::SourceOver, rgb, alpha, [0.0; 3], shade);
            }
        }

        surface.extend_from_slice(&[
            to_byte(rgb[0]),
            to_byte(rgb[1]),
            to_byte(rgb[2]),
            to_byte(alpha),
        ]);
    }

    Ok(DecodedImage::new(image.width, image.height, surface))
}

/// Decode `bytes`, bake `adjustments` in with the export formulas and
/// encode the result as PNG.
pub fn export_png(bytes: &[u8], adjustments: &AdjustmentSet) -> Result<Vec<u8>, CompositeError> {
    let image = decode_image(bytes)?;
    let plan = compute_composite(adjustments, RenderTarget::Export);
    let rendered = render_composite(&image, &plan)?;
    Ok(encode_png(&rendered.pixels, rendered.width, rendered.height)?)
}
