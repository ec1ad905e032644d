//! Image encoding for crop payloads and exports.
//!
//! Everything leaving the editor is PNG: the cropped image sent with an edit
//! request and the composited export.
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::encode::{encode_png, export_file_name};
//!
//! let pixels = vec![128u8; 100 * 100 * 4];
//! let png = encode_png(&pixels, 100, 100)?;
//! let name = export_file_name(chrono::Utc::now());
//! ```

mod file_name;
mod png;

pub use file_name::{export_file_name, EXPORT_MIME_TYPE};
pub use png::{encode_png, EncodeError};
