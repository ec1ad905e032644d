//! Layered description of the live preview.
//!
//! The UI renders the base image with a CSS `filter`, then stacks a flat
//! colour layer (temperature) and a radial gradient layer (vignette) on top.

use serde::{Deserialize, Serialize};

use super::plan::{CompositePlan, FilterStep, Vignette};

/// Flat colour layer drawn with a blend mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayer {
    pub background_color: String,
    pub mix_blend_mode: String,
}

/// Everything the preview needs to draw, as CSS values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLayers {
    /// Filter list for the base image, `None` when no filter applies.
    pub filter: Option<String>,
    pub temperature: Option<OverlayLayer>,
    /// `background` value of the vignette layer.
    pub vignette: Option<String>,
}

impl PreviewLayers {
    /// `filter` value with the CSS keyword for the empty list.
    pub fn filter_css(&self) -> &str {
        self.filter.as_deref().unwrap_or("none")
    }

    pub fn is_identity(&self) -> bool {
        self.filter.is_none() && self.temperature.is_none() && self.vignette.is_none()
    }
}

/// Space-separated CSS filter list, `None` for an empty chain.
pub fn filter_chain_css(steps: &[FilterStep]) -> Option<String> {
    if steps.is_empty() {
        return None;
    }
    Some(
        steps
            .iter()
            .map(FilterStep::to_css)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Gradient matching the raster vignette: a circle reaching the corners,
/// transparent at the inner radius and black at `max_alpha` at 100%.
pub fn vignette_css(vignette: &Vignette) -> String {
    format!(
        "radial-gradient(circle farthest-corner at center, transparent {}%, rgba(0,0,0,{}) 100%)",
        tidy(vignette.inner_ratio * 100.0),
        tidy(vignette.max_alpha)
    )
}

/// Drop float noise such as `64.99999999999999` before formatting.
fn tidy(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// Translate a draw plan into preview layers.
pub fn preview_layers(plan: &CompositePlan) -> PreviewLayers {
    PreviewLayers {
        filter: filter_chain_css(&plan.filters),
        temperature: plan.temperature.map(|overlay| OverlayLayer {
            background_color: overlay.to_css_rgba(),
            mix_blend_mode: overlay.blend.css_name().to_string(),
        }),
        vignette: plan.vignette.as_ref().map(vignette_css),
    }
}
