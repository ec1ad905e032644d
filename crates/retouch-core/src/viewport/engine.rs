//! Pan/zoom state machine behind the crop tool.
//!
//! [`CropViewport`] owns the viewport state and the crop frame, turns pointer
//! and wheel gestures into new pan/zoom values, and republishes the
//! [`PixelCrop`] after every change. All handlers run to completion; nothing
//! here blocks or suspends.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::crop::{CropInputs, CropMemo, PixelCrop};
use super::frame::{AspectRatio, CropFrame, DEFAULT_FRAME_FILL};
use super::space::{ImageMetrics, Projection, Size, ViewportPoint, ViewportState};

/// Tunables for the crop viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per unit of wheel delta.
    pub wheel_sensitivity: f64,
    /// Fraction of the container the crop frame may occupy.
    pub frame_fill: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 1.0,
            max_zoom: 3.0,
            wheel_sensitivity: 0.005,
            frame_fill: DEFAULT_FRAME_FILL,
        }
    }
}

impl ViewportConfig {
    /// Limits the engine can honour: zoom never drops below 1, so the
    /// image always covers the frame, and `max_zoom >= min_zoom`.
    /// Unusable values fall back to the defaults.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let min_zoom = if self.min_zoom.is_finite() {
            self.min_zoom.max(1.0)
        } else {
            defaults.min_zoom
        };
        let max_zoom = if self.max_zoom.is_finite() {
            self.max_zoom
        } else {
            defaults.max_zoom
        }
        .max(min_zoom);
        let wheel_sensitivity = if self.wheel_sensitivity.is_finite() {
            self.wheel_sensitivity
        } else {
            defaults.wheel_sensitivity
        };
        let frame_fill = if self.frame_fill.is_finite() && self.frame_fill > 0.0 {
            self.frame_fill.min(1.0)
        } else {
            defaults.frame_fill
        };
        Self {
            min_zoom,
            max_zoom,
            wheel_sensitivity,
            frame_fill,
        }
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

/// Allowed pan range on both axes for a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanBounds {
    pub min: ViewportPoint,
    pub max: ViewportPoint,
}

impl PanBounds {
    /// Clamp a requested pan into the bounds.
    ///
    /// When the scaled image is smaller than the frame on an axis the range
    /// is inverted and the pan settles on `max` for that axis.
    pub fn clamp(&self, pan: ViewportPoint) -> ViewportPoint {
        ViewportPoint::new(
            pan.x.max(self.min.x).min(self.max.x),
            pan.y.max(self.min.y).min(self.max.y),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    pointer: ViewportPoint,
    pan: ViewportPoint,
}

/// The crop tool's viewport transform engine.
#[derive(Debug, Clone)]
pub struct CropViewport {
    config: ViewportConfig,
    container: Size,
    aspect_ratio: AspectRatio,
    frame: CropFrame,
    metrics: Option<ImageMetrics>,
    state: ViewportState,
    drag: Option<Drag>,
    memo: CropMemo,
    published: PixelCrop,
}

impl Default for CropViewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl CropViewport {
    pub fn new(config: ViewportConfig) -> Self {
        let config = config.normalized();
        Self {
            config,
            container: Size::default(),
            aspect_ratio: AspectRatio::default(),
            frame: CropFrame::default(),
            metrics: None,
            state: ViewportState {
                pan: ViewportPoint::default(),
                zoom: config.min_zoom,
            },
            drag: None,
            memo: CropMemo::new(),
            published: PixelCrop::EMPTY,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn pan(&self) -> ViewportPoint {
        self.state.pan
    }

    pub fn frame(&self) -> CropFrame {
        self.frame
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn metrics(&self) -> Option<ImageMetrics> {
        self.metrics
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The most recently published crop in native pixels.
    pub fn pixel_crop(&self) -> PixelCrop {
        self.published
    }

    /// CSS transform that renders the image where the engine places it.
    ///
    /// Translation comes first so pan stays in unscaled viewport pixels.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.state.pan.x, self.state.pan.y, self.state.zoom
        )
    }

    // ----- Layout inputs -----

    /// The container was resized; recompute the frame.
    pub fn container_resized(&mut self, container: Size) {
        debug!(
            width = container.width,
            height = container.height,
            "crop container resized"
        );
        self.container = container;
        self.relayout();
    }

    /// A different aspect ratio was selected; recompute the frame.
    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        debug!(ratio = %ratio, "crop aspect ratio changed");
        self.aspect_ratio = ratio;
        self.relayout();
    }

    /// A new source was selected and is being decoded.
    ///
    /// Pan and zoom reset, and the published crop is degenerate until
    /// [`CropViewport::image_loaded`] is called.
    pub fn image_loading(&mut self) {
        debug!("crop source changed, awaiting decode");
        self.metrics = None;
        self.drag = None;
        self.state = ViewportState {
            pan: ViewportPoint::default(),
            zoom: self.config.min_zoom,
        };
        self.memo.clear();
        self.publish();
    }

    /// The source finished decoding and has been laid out.
    pub fn image_loaded(&mut self, metrics: ImageMetrics) {
        debug!(
            natural_width = metrics.natural_width,
            natural_height = metrics.natural_height,
            displayed_width = metrics.displayed.width,
            displayed_height = metrics.displayed.height,
            "crop source decoded"
        );
        self.metrics = Some(metrics);
        self.relayout();
    }

    /// The image's unzoomed on-screen size changed (e.g. after a container
    /// resize changed its contained layout).
    pub fn image_laid_out(&mut self, displayed: Size) {
        if let Some(metrics) = self.metrics.as_mut() {
            metrics.displayed = displayed;
            self.reclamp();
        }
    }

    // ----- Gestures -----

    pub fn pointer_down(&mut self, pointer: ViewportPoint) {
        trace!(x = pointer.x, y = pointer.y, "drag start");
        self.drag = Some(Drag {
            pointer,
            pan: self.state.pan,
        });
    }

    pub fn pointer_move(&mut self, pointer: ViewportPoint) {
        let Some(drag) = self.drag else {
            return;
        };
        let requested = ViewportPoint::new(
            drag.pan.x + pointer.x - drag.pointer.x,
            drag.pan.y + pointer.y - drag.pointer.y,
        );
        self.state.pan = self.clamp_pan(requested, self.state.zoom);
        self.publish();
    }

    /// Pointer released or left the container. Panning stops immediately.
    pub fn pointer_up(&mut self) {
        if self.drag.take().is_some() {
            trace!("drag end");
        }
    }

    /// Wheel zoom anchored at the cursor.
    pub fn wheel(&mut self, cursor: ViewportPoint, delta_y: f64) {
        let zoom = self.state.zoom - delta_y * self.config.wheel_sensitivity;
        self.zoom_about(cursor, zoom);
    }

    /// Explicit zoom (slider), anchored at the container centre.
    pub fn set_zoom(&mut self, zoom: f64) {
        let centre = ViewportPoint::new(self.container.width / 2.0, self.container.height / 2.0);
        self.zoom_about(centre, zoom);
    }

    /// Change zoom while keeping the image point under `anchor` fixed, then
    /// clamp pan.
    pub fn zoom_about(&mut self, anchor: ViewportPoint, zoom: f64) {
        let new_zoom = self.config.clamp_zoom(zoom);
        let old_zoom = self.state.zoom;
        let local = self.projection().to_image_local(anchor);

        let requested = ViewportPoint::new(
            self.state.pan.x - local.x * (new_zoom - old_zoom),
            self.state.pan.y - local.y * (new_zoom - old_zoom),
        );

        self.state.zoom = new_zoom;
        self.state.pan = self.clamp_pan(requested, new_zoom);
        trace!(zoom = new_zoom, "zoom changed");
        self.publish();
    }

    // ----- Derived geometry -----

    /// Pan range that keeps the frame covered by the image at `zoom`.
    ///
    /// Returns `None` when there is no laid-out image or no frame.
    pub fn pan_bounds(&self, zoom: f64) -> Option<PanBounds> {
        let metrics = self.metrics?;
        if self.frame.is_empty() || metrics.displayed.is_empty() {
            return None;
        }

        let projection = Projection::new(
            self.container,
            metrics.displayed,
            ViewportState {
                pan: ViewportPoint::default(),
                zoom,
            },
        );
        let scaled = projection.scaled_size();
        let centered = projection.centered_origin();

        // image left edge = centered.x + pan.x must satisfy
        //   left <= frame.x  and  left + scaled.width >= frame.right()
        Some(PanBounds {
            min: ViewportPoint::new(
                self.frame.right() - scaled.width - centered.x,
                self.frame.bottom() - scaled.height - centered.y,
            ),
            max: ViewportPoint::new(self.frame.x - centered.x, self.frame.y - centered.y),
        })
    }

    /// Clamp a requested pan for `zoom`. Without a laid-out image the pan
    /// collapses to the origin.
    pub fn clamp_pan(&self, requested: ViewportPoint, zoom: f64) -> ViewportPoint {
        match self.pan_bounds(zoom) {
            Some(bounds) => bounds.clamp(requested),
            None => ViewportPoint::default(),
        }
    }

    /// Projection for the current state. Before an image is laid out the
    /// image is treated as zero-sized.
    pub fn projection(&self) -> Projection {
        let displayed = self.metrics.map(|m| m.displayed).unwrap_or_default();
        Projection::new(self.container, displayed, self.state)
    }

    fn relayout(&mut self) {
        self.frame = CropFrame::fit(self.container, self.aspect_ratio, self.config.frame_fill);
        self.reclamp();
    }

    fn reclamp(&mut self) {
        self.state.pan = self.clamp_pan(self.state.pan, self.state.zoom);
        self.publish();
    }

    /// Recompute the crop for the current inputs. Returns true when the
    /// published value changed.
    fn publish(&mut self) -> bool {
        let crop = self.memo.get(CropInputs {
            state: self.state,
            frame: self.frame,
            container: self.container,
            metrics: self.metrics,
        });
        let changed = crop != self.published;
        if changed {
            trace!(
                x = crop.x,
                y = crop.y,
                width = crop.width,
                height = crop.height,
                "pixel crop published"
            );
        }
        self.published = crop;
        changed
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Gesture {
        Wheel { x: f64, y: f64, delta: f64 },
        Drag { dx: f64, dy: f64 },
        Slider(f64),
    }

    fn gesture_strategy() -> impl Strategy<Value = Gesture> {
        prop_oneof![
            (0.0f64..1.0, 0.0f64..1.0, -400.0f64..400.0)
                .prop_map(|(x, y, delta)| Gesture::Wheel { x, y, delta }),
            (-600.0f64..600.0, -600.0f64..600.0).prop_map(|(dx, dy)| Gesture::Drag { dx, dy }),
            (0.5f64..3.5).prop_map(Gesture::Slider),
        ]
    }

    fn ratio_strategy() -> impl Strategy<Value = AspectRatio> {
        prop_oneof![
            Just(AspectRatio::Original),
            Just(AspectRatio::Square),
            Just(AspectRatio::Widescreen),
            Just(AspectRatio::Standard),
        ]
    }

    /// A viewport whose image fills the container exactly, so the frame is
    /// coverable at every zoom.
    fn filled_viewport(width: f64, height: f64, ratio: AspectRatio) -> CropViewport {
        let container = Size::new(width, height);
        let mut vp = CropViewport::default();
        vp.container_resized(container);
        vp.set_aspect_ratio(ratio);
        vp.image_loaded(ImageMetrics::new(
            (width * 2.0) as u32,
            (height * 2.0) as u32,
            container,
        ));
        vp
    }

    fn apply(vp: &mut CropViewport, gesture: &Gesture) {
        let c = vp.container();
        match *gesture {
            Gesture::Wheel { x, y, delta } => {
                vp.wheel(ViewportPoint::new(x * c.width, y * c.height), delta)
            }
            Gesture::Drag { dx, dy } => {
                let start = ViewportPoint::new(c.width / 2.0, c.height / 2.0);
                vp.pointer_down(start);
                vp.pointer_move(ViewportPoint::new(start.x + dx, start.y + dy));
                vp.pointer_up();
            }
            Gesture::Slider(z) => vp.set_zoom(z),
        }
    }

    proptest! {
        /// Property: after any gesture sequence the frame lies inside the
        /// scaled image and zoom stays within its limits.
        #[test]
        fn prop_pan_keeps_frame_covered(
            width in 200.0f64..1600.0,
            height in 200.0f64..1200.0,
            ratio in ratio_strategy(),
            gestures in prop::collection::vec(gesture_strategy(), 1..20),
        ) {
            let mut vp = filled_viewport(width, height, ratio);
            for g in &gestures {
                apply(&mut vp, g);

                let proj = vp.projection();
                let origin = proj.image_origin();
                let scaled = proj.scaled_size();
                let frame = vp.frame();
                let eps = 1e-6;

                prop_assert!(vp.zoom() >= 1.0 && vp.zoom() <= 3.0);
                prop_assert!(frame.x >= origin.x - eps);
                prop_assert!(frame.right() <= origin.x + scaled.width + eps);
                prop_assert!(frame.y >= origin.y - eps);
                prop_assert!(frame.bottom() <= origin.y + scaled.height + eps);
            }
        }

        /// Property: wheel zoom leaves the image point under the cursor in
        /// place whenever the pan was not clamped.
        #[test]
        fn prop_zoom_to_cursor(
            start_zoom in 1.0f64..3.0,
            drag in (-300.0f64..300.0, -300.0f64..300.0),
            cursor in (0.0f64..800.0, 0.0f64..600.0),
            delta in -300.0f64..300.0,
        ) {
            let mut vp = filled_viewport(800.0, 600.0, AspectRatio::Original);
            vp.set_zoom(start_zoom);
            apply(&mut vp, &Gesture::Drag { dx: drag.0, dy: drag.1 });

            let cursor = ViewportPoint::new(cursor.0, cursor.1);
            let before = vp.projection().to_image_local(cursor);
            let old = vp.state();
            let new_zoom = vp.config().clamp_zoom(old.zoom - delta * 0.005);
            let unclamped = ViewportPoint::new(
                old.pan.x - before.x * (new_zoom - old.zoom),
                old.pan.y - before.y * (new_zoom - old.zoom),
            );

            vp.wheel(cursor, delta);
            prop_assume!(
                (vp.pan().x - unclamped.x).abs() < 1e-9
                    && (vp.pan().y - unclamped.y).abs() < 1e-9
            );

            let after = vp.projection().to_image_local(cursor);
            prop_assert!((before.x - after.x).abs() < 1e-6);
            prop_assert!((before.y - after.y).abs() < 1e-6);
        }

        /// Property: the published crop always lies inside the bitmap.
        #[test]
        fn prop_crop_within_bitmap(
            natural in (50u32..5000, 50u32..5000),
            ratio in ratio_strategy(),
            gestures in prop::collection::vec(gesture_strategy(), 0..10),
        ) {
            let container = Size::new(800.0, 600.0);
            let mut vp = CropViewport::default();
            vp.container_resized(container);
            vp.set_aspect_ratio(ratio);
            vp.image_loaded(ImageMetrics::contained(natural.0, natural.1, container));
            for g in &gestures {
                apply(&mut vp, g);
                prop_assert!(vp.pixel_crop().fits_within(natural.0, natural.1));
            }
        }
    }
}
