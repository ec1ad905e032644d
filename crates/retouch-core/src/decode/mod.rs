//! Image decoding for uploads and edit results.
//!
//! Uploaded files and images returned by the remote editor arrive as encoded
//! bytes plus a MIME type. This module validates the type, decodes the
//! bytes to an RGBA bitmap and applies the EXIF orientation so that natural
//! dimensions match what the browser shows.
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::decode::{decode_image, validate_mime};
//!
//! validate_mime("image/png")?;
//! let image = decode_image(&bytes)?;
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod bitmap;
mod types;

pub use bitmap::{decode_image, validate_mime};
pub use types::{DecodeError, DecodedImage, Orientation};
