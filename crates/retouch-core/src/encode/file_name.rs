//! Download naming for exported images.

use chrono::{DateTime, SecondsFormat, Utc};

pub const EXPORT_MIME_TYPE: &str = "image/png";

/// `edited-<timestamp>.png` with an ISO 8601 UTC timestamp at millisecond
/// precision, e.g. `edited-2024-05-01T12:30:00.123Z.png`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "edited-{}.png",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
