//! The fixed on-screen crop frame.
//!
//! The frame is derived from the container size and the selected aspect
//! ratio only. Recomputing it with the same inputs always yields the same
//! frame, so resize notifications and ratio changes can arrive in any order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::space::{Size, ViewportPoint};

/// Fraction of the container the frame may occupy on each axis.
pub const DEFAULT_FRAME_FILL: f64 = 0.9;

/// Aspect ratio choices offered by the crop tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Unconstrained: the frame takes the container's proportions.
    #[default]
    Original,
    Square,
    Widescreen,
    Standard,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Original,
        AspectRatio::Square,
        AspectRatio::Widescreen,
        AspectRatio::Standard,
    ];

    /// Width / height, or `None` for `Original`.
    pub fn value(self) -> Option<f64> {
        match self {
            AspectRatio::Original => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::Widescreen => Some(16.0 / 9.0),
            AspectRatio::Standard => Some(4.0 / 3.0),
        }
    }

    /// Label as shown to the user and embedded in prompts.
    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Original => "Original",
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Standard => "4:3",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown aspect ratio label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown aspect ratio: {0}")]
pub struct UnknownAspectRatio(pub String);

impl FromStr for AspectRatio {
    type Err = UnknownAspectRatio;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.label() == s)
            .ok_or_else(|| UnknownAspectRatio(s.to_string()))
    }
}

/// The crop frame in viewport space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropFrame {
    /// Compute the frame for a container: centred, fitting within `fill` of
    /// each container side, locked to `ratio` when one is given.
    pub fn fit(container: Size, ratio: AspectRatio, fill: f64) -> Self {
        if container.is_empty() {
            return Self::default();
        }

        let target_width = container.width * fill;
        let target_height = container.height * fill;

        let (width, height) = match ratio.value() {
            Some(r) if target_width / target_height > r => (target_height * r, target_height),
            Some(r) => (target_width, target_width / r),
            None => (target_width, target_height),
        };

        Self {
            x: (container.width - width) / 2.0,
            y: (container.height - height) / 2.0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn top_left(&self) -> ViewportPoint {
        ViewportPoint::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ratio_strategy() -> impl Strategy<Value = AspectRatio> {
        prop_oneof![
            Just(AspectRatio::Square),
            Just(AspectRatio::Widescreen),
            Just(AspectRatio::Standard),
        ]
    }

    proptest! {
        /// Property: a fixed-ratio frame keeps its ratio, stays centred and
        /// fits inside the padded container.
        #[test]
        fn prop_fixed_ratio_frame_fits(
            width in 50.0f64..3000.0,
            height in 50.0f64..3000.0,
            ratio in ratio_strategy(),
        ) {
            let container = Size::new(width, height);
            let frame = CropFrame::fit(container, ratio, DEFAULT_FRAME_FILL);
            let r = ratio.value().unwrap_or(1.0);

            prop_assert!((frame.width / frame.height - r).abs() < 1e-9);
            prop_assert!(frame.width <= width * DEFAULT_FRAME_FILL + 1e-9);
            prop_assert!(frame.height <= height * DEFAULT_FRAME_FILL + 1e-9);
            prop_assert!((frame.x + frame.width / 2.0 - width / 2.0).abs() < 1e-9);
            prop_assert!((frame.y + frame.height / 2.0 - height / 2.0).abs() < 1e-9);
        }
    }
}
