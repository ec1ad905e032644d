//! Cosmetic adjustments applied on top of an edited image.
//!
//! ## Value Ranges
//! - brightness, contrast, saturation, exposure, temperature: 0 to 200, neutral 100
//! - vignette: 0 to 100, neutral 0
//!
//! All values are whole slider positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NEUTRAL: u32 = 100;
pub const MAX_LEVEL: u32 = 200;
pub const MAX_VIGNETTE: u32 = 100;

/// One-click filter presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum FilterPreset {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Vintage,
    Sharpen,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 6] = [
        FilterPreset::None,
        FilterPreset::Grayscale,
        FilterPreset::Sepia,
        FilterPreset::Invert,
        FilterPreset::Vintage,
        FilterPreset::Sharpen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterPreset::None => "None",
            FilterPreset::Grayscale => "Grayscale",
            FilterPreset::Sepia => "Sepia",
            FilterPreset::Invert => "Invert",
            FilterPreset::Vintage => "Vintage",
            FilterPreset::Sharpen => "Sharpen",
        }
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterPreset {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterPreset::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// A single adjustable slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slider {
    Brightness,
    Contrast,
    Saturation,
    Exposure,
    Vignette,
    Temperature,
}

impl Slider {
    pub const ALL: [Slider; 6] = [
        Slider::Brightness,
        Slider::Contrast,
        Slider::Saturation,
        Slider::Exposure,
        Slider::Vignette,
        Slider::Temperature,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Slider::Brightness => "brightness",
            Slider::Contrast => "contrast",
            Slider::Saturation => "saturation",
            Slider::Exposure => "exposure",
            Slider::Vignette => "vignette",
            Slider::Temperature => "temperature",
        }
    }

    pub fn max(self) -> u32 {
        match self {
            Slider::Vignette => MAX_VIGNETTE,
            _ => MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown slider: {0}")]
pub struct UnknownSlider(pub String);

impl FromStr for Slider {
    type Err = UnknownSlider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slider::ALL
            .into_iter()
            .find(|slider| slider.name() == s)
            .ok_or_else(|| UnknownSlider(s.to_string()))
    }
}

/// The full set of cosmetic adjustments for the edited image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdjustmentSet {
    pub active_filter: FilterPreset,
    pub brightness: u32,
    pub contrast: u32,
    pub saturation: u32,
    pub exposure: u32,
    pub vignette: u32,
    pub temperature: u32,
}

impl Default for AdjustmentSet {
    fn default() -> Self {
        Self {
            active_filter: FilterPreset::None,
            brightness: NEUTRAL,
            contrast: NEUTRAL,
            saturation: NEUTRAL,
            exposure: NEUTRAL,
            vignette: 0,
            temperature: NEUTRAL,
        }
    }
}

impl AdjustmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The values written by the auto-enhance toggle.
    pub fn auto_enhanced() -> Self {
        Self {
            active_filter: FilterPreset::None,
            brightness: 105,
            contrast: 110,
            saturation: 115,
            exposure: NEUTRAL,
            vignette: 0,
            temperature: NEUTRAL,
        }
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn get(&self, slider: Slider) -> u32 {
        match slider {
            Slider::Brightness => self.brightness,
            Slider::Contrast => self.contrast,
            Slider::Saturation => self.saturation,
            Slider::Exposure => self.exposure,
            Slider::Vignette => self.vignette,
            Slider::Temperature => self.temperature,
        }
    }

    /// Set one slider, clamped to its range.
    pub fn set(&mut self, slider: Slider, value: u32) {
        let value = value.min(slider.max());
        let field = match slider {
            Slider::Brightness => &mut self.brightness,
            Slider::Contrast => &mut self.contrast,
            Slider::Saturation => &mut self.saturation,
            Slider::Exposure => &mut self.exposure,
            Slider::Vignette => &mut self.vignette,
            Slider::Temperature => &mut self.temperature,
        };
        *field = value;
    }

    /// Copy with every value forced into its slider range.
    pub fn clamped(self) -> Self {
        Self {
            active_filter: self.active_filter,
            brightness: self.brightness.min(MAX_LEVEL),
            contrast: self.contrast.min(MAX_LEVEL),
            saturation: self.saturation.min(MAX_LEVEL),
            exposure: self.exposure.min(MAX_LEVEL),
            vignette: self.vignette.min(MAX_VIGNETTE),
            temperature: self.temperature.min(MAX_LEVEL),
        }
    }
}
