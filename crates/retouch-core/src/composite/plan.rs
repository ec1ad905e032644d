//! The layered draw plan shared by preview and export.
//!
//! Every formula that turns an [`AdjustmentSet`] into visual effects lives
//! here. The live preview ([`super::preview`]) and the raster export
//! ([`super::render`]) both consume the [`CompositePlan`] and never look at
//! the adjustment values directly.

use serde::{Deserialize, Serialize};

use crate::adjustments::{AdjustmentSet, FilterPreset, NEUTRAL};

/// Where the composite is going to be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderTarget {
    /// On-screen layered preview.
    Preview,
    /// Final raster written to the downloaded file.
    Export,
}

impl RenderTarget {
    /// Temperature overlay opacity at full slider deflection.
    ///
    /// The preview overlay is stronger than the exported one. Both values
    /// are kept until product decides which one is intended.
    pub fn temperature_coefficient(self) -> f64 {
        match self {
            RenderTarget::Preview => 0.25,
            RenderTarget::Export => 0.2,
        }
    }
}

/// A single filter primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterFunction {
    Grayscale,
    Sepia,
    Invert,
    Brightness,
    Contrast,
    Saturate,
}

impl FilterFunction {
    pub fn css_name(self) -> &'static str {
        match self {
            FilterFunction::Grayscale => "grayscale",
            FilterFunction::Sepia => "sepia",
            FilterFunction::Invert => "invert",
            FilterFunction::Brightness => "brightness",
            FilterFunction::Contrast => "contrast",
            FilterFunction::Saturate => "saturate",
        }
    }
}

/// How an amount is written in a CSS filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notation {
    /// `sepia(60%)`
    Percent,
    /// `brightness(1.05)`
    Number,
}

/// One step of the filter chain. `amount` is a factor where 1.0 is 100%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterStep {
    pub function: FilterFunction,
    pub amount: f64,
    pub notation: Notation,
}

impl FilterStep {
    fn percent(function: FilterFunction, percent: u32) -> Self {
        Self {
            function,
            amount: percent as f64 / 100.0,
            notation: Notation::Percent,
        }
    }

    fn number(function: FilterFunction, amount: f64) -> Self {
        Self {
            function,
            amount,
            notation: Notation::Number,
        }
    }

    pub fn to_css(&self) -> String {
        match self.notation {
            Notation::Percent => format!(
                "{}({}%)",
                self.function.css_name(),
                (self.amount * 100.0).round()
            ),
            Notation::Number => format!("{}({})", self.function.css_name(), self.amount),
        }
    }
}

/// Fixed filter terms for a preset, in order.
pub fn preset_steps(preset: FilterPreset) -> Vec<FilterStep> {
    use FilterFunction::*;
    match preset {
        FilterPreset::None => Vec::new(),
        FilterPreset::Grayscale => vec![FilterStep::percent(Grayscale, 100)],
        FilterPreset::Sepia => vec![FilterStep::percent(Sepia, 100)],
        FilterPreset::Invert => vec![FilterStep::percent(Invert, 100)],
        FilterPreset::Vintage => vec![
            FilterStep::percent(Sepia, 60),
            FilterStep::percent(Brightness, 110),
            FilterStep::percent(Contrast, 90),
        ],
        FilterPreset::Sharpen => vec![FilterStep::percent(Contrast, 120)],
    }
}

/// How an overlay layer is combined with what is below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    /// Plain alpha compositing.
    SourceOver,
    /// Hue and saturation from the overlay, luminosity from the backdrop.
    Color,
}

impl BlendMode {
    pub fn css_name(self) -> &'static str {
        match self {
            BlendMode::SourceOver => "normal",
            BlendMode::Color => "color",
        }
    }
}

/// A flat colour layer covering the whole image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorOverlay {
    pub rgb: [u8; 3],
    pub alpha: f64,
    pub blend: BlendMode,
}

impl ColorOverlay {
    pub fn to_css_rgba(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb[0], self.rgb[1], self.rgb[2], self.alpha
        )
    }
}

pub const WARM_RGB: [u8; 3] = [255, 165, 0];
pub const COOL_RGB: [u8; 3] = [0, 100, 255];

/// Radial darkening from an inner radius to the image corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vignette {
    /// Slider position divided by 100.
    pub strength: f64,
    /// Inner radius as a fraction of the centre-to-corner distance.
    pub inner_ratio: f64,
    /// Opacity of the black stop at the outer radius.
    pub max_alpha: f64,
}

impl Vignette {
    pub fn from_strength(strength: f64) -> Self {
        Self {
            strength,
            inner_ratio: 1.0 - strength * 0.7,
            max_alpha: (strength * 1.2).min(1.0),
        }
    }

    /// Inner and outer radius in pixels for an image of the given size.
    pub fn radii(&self, width: f64, height: f64) -> (f64, f64) {
        let outer = ((width / 2.0).powi(2) + (height / 2.0).powi(2)).sqrt();
        (outer * self.inner_ratio, outer)
    }

    /// Opacity of the black layer at distance `d` from the centre.
    pub fn alpha_at(&self, d: f64, inner: f64, outer: f64) -> f64 {
        let span = outer - inner;
        let t = if span <= 0.0 {
            if d >= outer {
                1.0
            } else {
                0.0
            }
        } else {
            ((d - inner) / span).clamp(0.0, 1.0)
        };
        self.max_alpha * t
    }
}

/// Ordered description of everything drawn on top of the base pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositePlan {
    pub target: RenderTarget,
    /// Applied to the base pixels first, in order.
    pub filters: Vec<FilterStep>,
    /// Drawn over the filtered image.
    pub temperature: Option<ColorOverlay>,
    /// Drawn last.
    pub vignette: Option<Vignette>,
}

impl CompositePlan {
    /// True when drawing the plan leaves the base image untouched.
    pub fn is_identity(&self) -> bool {
        self.filters.is_empty() && self.temperature.is_none() && self.vignette.is_none()
    }
}

/// Build the draw plan for a set of adjustments.
///
/// Order: preset terms, combined brightness (brightness x exposure),
/// contrast, saturation; then the temperature overlay; then the vignette.
pub fn compute_composite(adjustments: &AdjustmentSet, target: RenderTarget) -> CompositePlan {
    let adj = adjustments.clamped();
    let mut filters = preset_steps(adj.active_filter);

    let combined_brightness = (adj.brightness as f64 / 100.0) * (adj.exposure as f64 / 100.0);
    if combined_brightness != 1.0 {
        filters.push(FilterStep::number(
            FilterFunction::Brightness,
            combined_brightness,
        ));
    }
    if adj.contrast != NEUTRAL {
        filters.push(FilterStep::number(
            FilterFunction::Contrast,
            adj.contrast as f64 / 100.0,
        ));
    }
    if adj.saturation != NEUTRAL {
        filters.push(FilterStep::number(
            FilterFunction::Saturate,
            adj.saturation as f64 / 100.0,
        ));
    }

    CompositePlan {
        target,
        filters,
        temperature: temperature_overlay(adj.temperature, target),
        vignette: (adj.vignette > 0).then(|| Vignette::from_strength(adj.vignette as f64 / 100.0)),
    }
}

fn temperature_overlay(temperature: u32, target: RenderTarget) -> Option<ColorOverlay> {
    let delta = temperature as i64 - NEUTRAL as i64;
    if delta == 0 {
        return None;
    }
    let alpha = (delta.unsigned_abs() as f64 / 100.0 * target.temperature_coefficient()).min(1.0);
    let rgb = if delta > 0 { WARM_RGB } else { COOL_RGB };
    Some(ColorOverlay {
        rgb,
        alpha,
        blend: BlendMode::Color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn css(steps: &[FilterStep]) -> Vec<String> {
        steps.iter().map(FilterStep::to_css).collect()
    }

    #[test]
    fn test_default_plan_is_identity() {
        for target in [RenderTarget::Preview, RenderTarget::Export] {
            let plan = compute_composite(&AdjustmentSet::default(), target);
            assert!(plan.is_identity());
        }
    }

    #[test]
    fn test_preset_formulas() {
        assert_eq!(
            css(&preset_steps(FilterPreset::Grayscale)),
            vec!["grayscale(100%)"]
        );
        assert_eq!(css(&preset_steps(FilterPreset::Sepia)), vec!["sepia(100%)"]);
        assert_eq!(css(&preset_steps(FilterPreset::Invert)), vec!["invert(100%)"]);
        assert_eq!(
            css(&preset_steps(FilterPreset::Vintage)),
            vec!["sepia(60%)", "brightness(110%)", "contrast(90%)"]
        );
        assert_eq!(
            css(&preset_steps(FilterPreset::Sharpen)),
            vec!["contrast(120%)"]
        );
        assert!(preset_steps(FilterPreset::None).is_empty());
    }

    #[test]
    fn test_brightness_and_exposure_multiply() {
        let adj = AdjustmentSet {
            brightness: 150,
            exposure: 80,
            ..AdjustmentSet::default()
        };
        let plan = compute_composite(&adj, RenderTarget::Export);
        assert_eq!(plan.filters.len(), 1);
        assert_eq!(plan.filters[0].function, FilterFunction::Brightness);
        assert!((plan.filters[0].amount - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_cancelling_brightness_and_exposure_is_skipped() {
        let adj = AdjustmentSet {
            brightness: 200,
            exposure: 50,
            ..AdjustmentSet::default()
        };
        let plan = compute_composite(&adj, RenderTarget::Preview);
        assert!(plan.filters.is_empty());
    }

    #[test]
    fn test_chain_order() {
        let adj = AdjustmentSet {
            active_filter: FilterPreset::Sepia,
            brightness: 105,
            contrast: 110,
            saturation: 115,
            ..AdjustmentSet::default()
        };
        let plan = compute_composite(&adj, RenderTarget::Preview);
        assert_eq!(
            css(&plan.filters),
            vec![
                "sepia(100%)",
                "brightness(1.05)",
                "contrast(1.1)",
                "saturate(1.15)"
            ]
        );
    }

    #[test]
    fn test_temperature_coefficients_differ() {
        let warm = AdjustmentSet {
            temperature: 200,
            ..AdjustmentSet::default()
        };
        let preview = compute_composite(&warm, RenderTarget::Preview)
            .temperature
            .unwrap();
        let export = compute_composite(&warm, RenderTarget::Export)
            .temperature
            .unwrap();

        assert_eq!(preview.rgb, WARM_RGB);
        assert_eq!(preview.blend, BlendMode::Color);
        assert!((preview.alpha - 0.25).abs() < 1e-12);
        assert!((export.alpha - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_cool_temperature() {
        let cool = AdjustmentSet {
            temperature: 50,
            ..AdjustmentSet::default()
        };
        let overlay = compute_composite(&cool, RenderTarget::Export)
            .temperature
            .unwrap();
        assert_eq!(overlay.rgb, COOL_RGB);
        assert!((overlay.alpha - 0.1).abs() < 1e-12);
        assert!(overlay.to_css_rgba().starts_with("rgba(0, 100, 255, 0.1"));
    }

    #[test]
    fn test_vignette_parameters() {
        let v = Vignette::from_strength(1.0);
        assert!((v.inner_ratio - 0.3).abs() < 1e-12);
        assert_eq!(v.max_alpha, 1.0);

        let v = Vignette::from_strength(0.5);
        assert!((v.inner_ratio - 0.65).abs() < 1e-12);
        assert!((v.max_alpha - 0.6).abs() < 1e-12);

        let (inner, outer) = v.radii(6.0, 8.0);
        assert!((outer - 5.0).abs() < 1e-12);
        assert!((inner - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_vignette_alpha_ramp() {
        let v = Vignette::from_strength(0.5);
        assert_eq!(v.alpha_at(1.0, 2.0, 4.0), 0.0);
        assert!((v.alpha_at(3.0, 2.0, 4.0) - 0.3).abs() < 1e-12);
        assert!((v.alpha_at(9.0, 2.0, 4.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vignette_omitted() {
        let plan = compute_composite(&AdjustmentSet::default(), RenderTarget::Export);
        assert!(plan.vignette.is_none());
    }
}
