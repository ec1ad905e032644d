//! Compositing pipeline for preview and export.
//!
//! [`compute_composite`] turns an [`AdjustmentSet`](crate::adjustments::AdjustmentSet)
//! into a [`CompositePlan`]: an ordered filter chain, an optional temperature
//! overlay and an optional vignette. Both consumers read only the plan:
//!
//! - [`preview_layers`] describes it as CSS layers for the live view
//! - [`render_composite`] bakes it into pixels for the exported file

mod blend;
mod filters;
mod plan;
mod preview;
mod render;

pub use blend::{blend, composite_over};
pub use filters::{apply_chain, apply_step, Rgb};
pub use plan::{
    compute_composite, preset_steps, BlendMode, ColorOverlay, CompositePlan, FilterFunction,
    FilterStep, Notation, RenderTarget, Vignette, COOL_RGB, WARM_RGB,
};
pub use preview::{filter_chain_css, preview_layers, vignette_css, OverlayLayer, PreviewLayers};
pub use render::{export_png, render_composite, CompositeError};
