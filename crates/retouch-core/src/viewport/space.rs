//! Coordinate spaces used by the crop viewport.
//!
//! Three spaces are involved when a pointer position turns into a crop:
//!
//! - **Viewport space**: container-relative pixels, origin at the container's
//!   top-left corner. Pointer events, the crop frame and pan live here.
//! - **Image-local space**: unzoomed on-screen pixels relative to the image
//!   centre. A point in this space stays attached to the same image feature
//!   regardless of pan and zoom.
//! - **Native pixel space**: pixels of the original decoded bitmap, origin at
//!   its top-left corner.
//!
//! Values never move between spaces without going through [`Projection`].

use serde::{Deserialize, Serialize};

/// A point in viewport (container) space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewportPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in unzoomed image-local space (relative to the image centre).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageLocalPoint {
    pub x: f64,
    pub y: f64,
}

/// A point in native pixel space of the decoded bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NativePoint {
    pub x: f64,
    pub y: f64,
}

/// Width and height in on-screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not finite.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Pan offset and zoom factor of the image inside the viewport.
///
/// Pan is expressed in viewport pixels and applied after the image has been
/// centred in the container and scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub pan: ViewportPoint,
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan: ViewportPoint::default(),
            zoom: 1.0,
        }
    }
}

/// Dimensions of a loaded image, both native and as laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageMetrics {
    /// Width of the decoded bitmap in pixels.
    pub natural_width: u32,
    /// Height of the decoded bitmap in pixels.
    pub natural_height: u32,
    /// Unzoomed on-screen size of the image.
    pub displayed: Size,
}

impl ImageMetrics {
    pub fn new(natural_width: u32, natural_height: u32, displayed: Size) -> Self {
        Self {
            natural_width,
            natural_height,
            displayed,
        }
    }

    /// Lay the image out "contained" in a container: natural size, scaled
    /// down uniformly (never up) until both sides fit.
    pub fn contained(natural_width: u32, natural_height: u32, container: Size) -> Self {
        let nw = natural_width as f64;
        let nh = natural_height as f64;
        let displayed = if nw <= 0.0 || nh <= 0.0 || container.is_empty() {
            Size::default()
        } else {
            let scale = (container.width / nw).min(container.height / nh).min(1.0);
            Size::new(nw * scale, nh * scale)
        };
        Self::new(natural_width, natural_height, displayed)
    }

    /// Ratio between native bitmap width and unzoomed on-screen width.
    ///
    /// Returns `None` when the image has no usable layout yet.
    pub fn scale_to_natural(&self) -> Option<f64> {
        if self.natural_width == 0 || self.natural_height == 0 || self.displayed.is_empty() {
            return None;
        }
        Some(self.natural_width as f64 / self.displayed.width)
    }
}

/// A snapshot of container, image layout and viewport state that converts
/// between the three coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub container: Size,
    pub displayed: Size,
    pub state: ViewportState,
}

impl Projection {
    pub fn new(container: Size, displayed: Size, state: ViewportState) -> Self {
        Self {
            container,
            displayed,
            state,
        }
    }

    /// Size of the image after zoom, in viewport pixels.
    pub fn scaled_size(&self) -> Size {
        Size::new(
            self.displayed.width * self.state.zoom,
            self.displayed.height * self.state.zoom,
        )
    }

    /// Top-left corner of the zoomed image before pan is applied.
    pub fn centered_origin(&self) -> ViewportPoint {
        let scaled = self.scaled_size();
        ViewportPoint::new(
            (self.container.width - scaled.width) / 2.0,
            (self.container.height - scaled.height) / 2.0,
        )
    }

    /// Top-left corner of the zoomed, panned image.
    pub fn image_origin(&self) -> ViewportPoint {
        let centered = self.centered_origin();
        ViewportPoint::new(centered.x + self.state.pan.x, centered.y + self.state.pan.y)
    }

    pub fn to_image_local(&self, p: ViewportPoint) -> ImageLocalPoint {
        let zoom = self.state.zoom;
        ImageLocalPoint {
            x: (p.x - self.container.width / 2.0 - self.state.pan.x) / zoom,
            y: (p.y - self.container.height / 2.0 - self.state.pan.y) / zoom,
        }
    }

    pub fn to_viewport(&self, p: ImageLocalPoint) -> ViewportPoint {
        let zoom = self.state.zoom;
        ViewportPoint::new(
            p.x * zoom + self.container.width / 2.0 + self.state.pan.x,
            p.y * zoom + self.container.height / 2.0 + self.state.pan.y,
        )
    }

    /// Map a viewport point onto the native bitmap, given the width ratio
    /// between native and displayed pixels.
    pub fn to_native(&self, p: ViewportPoint, scale_to_natural: f64) -> NativePoint {
        let origin = self.image_origin();
        let zoom = self.state.zoom;
        NativePoint {
            x: (p.x - origin.x) / zoom * scale_to_natural,
            y: (p.y - origin.y) / zoom * scale_to_natural,
        }
    }

    /// Convert a viewport-space length to a native-space length.
    pub fn length_to_native(&self, length: f64, scale_to_natural: f64) -> f64 {
        length / self.state.zoom * scale_to_natural
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(pan: (f64, f64), zoom: f64) -> Projection {
        Projection::new(
            Size::new(800.0, 600.0),
            Size::new(800.0, 600.0),
            ViewportState {
                pan: ViewportPoint::new(pan.0, pan.1),
                zoom,
            },
        )
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::default().is_empty());
        assert!(Size::new(10.0, 0.0).is_empty());
        assert!(Size::new(f64::NAN, 10.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_contained_never_upscales() {
        let m = ImageMetrics::contained(400, 300, Size::new(800.0, 600.0));
        assert_eq!(m.displayed, Size::new(400.0, 300.0));
    }

    #[test]
    fn test_contained_fits_limiting_side() {
        // Wide image in a square container is limited by width
        let m = ImageMetrics::contained(1600, 900, Size::new(500.0, 500.0));
        assert!((m.displayed.width - 500.0).abs() < 1e-9);
        assert!((m.displayed.height - 281.25).abs() < 1e-9);
    }

    #[test]
    fn test_scale_to_natural() {
        let m = ImageMetrics::contained(2000, 1500, Size::new(800.0, 600.0));
        assert_eq!(m.scale_to_natural(), Some(2.5));

        let unloaded = ImageMetrics::new(0, 0, Size::default());
        assert_eq!(unloaded.scale_to_natural(), None);
    }

    #[test]
    fn test_image_local_round_trip() {
        let proj = projection((12.0, -7.0), 2.0);
        let p = ViewportPoint::new(123.0, 456.0);
        let back = proj.to_viewport(proj.to_image_local(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_image_centre_is_local_origin() {
        let proj = projection((30.0, 40.0), 1.5);
        let local = proj.to_image_local(ViewportPoint::new(430.0, 340.0));
        assert!(local.x.abs() < 1e-9);
        assert!(local.y.abs() < 1e-9);
    }

    #[test]
    fn test_to_native_at_identity() {
        let proj = projection((0.0, 0.0), 1.0);
        let native = proj.to_native(ViewportPoint::new(100.0, 50.0), 2.0);
        assert_eq!(native, NativePoint { x: 200.0, y: 100.0 });
    }
}
