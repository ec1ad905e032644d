//! PNG encoding using the `image` crate's PNG encoder.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode straight RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(EncodeError::InvalidDimensions { width, height })?;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: valid input always decodes back to the same pixels.
        #[test]
        fn prop_png_is_lossless(
            (width, height, pixels) in (1u32..=16, 1u32..=16).prop_flat_map(|(w, h)| {
                let size = (w * h * 4) as usize;
                (Just(w), Just(h), prop::collection::vec(any::<u8>(), size..=size))
            }),
        ) {
            let png = encode_png(&pixels, width, height).unwrap();
            let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
            prop_assert_eq!(decoded.dimensions(), (width, height));
            prop_assert_eq!(decoded.into_raw(), pixels);
        }

        /// Property: same input always produces same output.
        #[test]
        fn prop_deterministic_output((width, height) in (1u32..=20, 1u32..=20)) {
            let pixels = vec![100u8; (width * height * 4) as usize];
            let a = encode_png(&pixels, width, height).unwrap();
            let b = encode_png(&pixels, width, height).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
