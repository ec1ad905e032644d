//! Separable and non-separable blending used by the overlay layers.

use super::filters::Rgb;
use super::plan::BlendMode;

#[inline]
fn lum(c: Rgb) -> f64 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: Rgb) -> Rgb {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 {
        let d = l - n;
        out = if d > 0.0 {
            out.map(|v| l + (v - l) * l / d)
        } else {
            [l; 3]
        };
    }
    if x > 1.0 {
        let d = x - l;
        out = if d > 0.0 {
            out.map(|v| l + (v - l) * (1.0 - l) / d)
        } else {
            [l; 3]
        };
    }
    out
}

fn set_lum(c: Rgb, l: f64) -> Rgb {
    let d = l - lum(c);
    clip_color(c.map(|v| v + d))
}

/// Blend function `B(Cb, Cs)` for an opaque backdrop.
#[inline]
pub fn blend(mode: BlendMode, backdrop: Rgb, source: Rgb) -> Rgb {
    match mode {
        BlendMode::SourceOver => source,
        BlendMode::Color => set_lum(source, lum(backdrop)),
    }
}

/// Composite a `source` colour with opacity `alpha` over a backdrop pixel
/// with opacity `backdrop_alpha`.
///
/// Colours are straight (non-premultiplied) on both sides. Returns the
/// straight result colour and its opacity.
#[inline]
pub fn composite_over(
    mode: BlendMode,
    backdrop: Rgb,
    backdrop_alpha: f64,
    source: Rgb,
    alpha: f64,
) -> (Rgb, f64) {
    let ab = backdrop_alpha.clamp(0.0, 1.0);
    let a_s = alpha.clamp(0.0, 1.0);
    let mixed = blend(mode, backdrop, source);
    let out_alpha = a_s + ab * (1.0 - a_s);
    if out_alpha <= 0.0 {
        return ([0.0; 3], 0.0);
    }
    let channel = |i: usize| {
        let cs = (1.0 - ab) * source[i] + ab * mixed[i];
        let premultiplied = a_s * cs + ab * backdrop[i] * (1.0 - a_s);
        (premultiplied / out_alpha).clamp(0.0, 1.0)
    };
    ([channel(0), channel(1), channel(2)], out_alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_source_over_full_alpha_replaces() {
        let (out, a) = composite_over(BlendMode::SourceOver, [0.2, 0.4, 0.6], 1.0, [0.0; 3], 1.0);
        assert!(close(out, [0.0; 3]));
        assert_eq!(a, 1.0);
    }

    #[test]
    fn test_source_over_zero_alpha_keeps_backdrop() {
        let (out, a) = composite_over(BlendMode::SourceOver, [0.2, 0.4, 0.6], 1.0, [0.0; 3], 0.0);
        assert!(close(out, [0.2, 0.4, 0.6]));
        assert_eq!(a, 1.0);
    }

    #[test]
    fn test_over_transparent_backdrop_is_plain_source() {
        // Blend modes only apply where the backdrop is opaque
        let (out, a) =
            composite_over(BlendMode::Color, [0.9, 0.9, 0.9], 0.0, [1.0, 0.5, 0.0], 0.25);
        assert!(close(out, [1.0, 0.5, 0.0]));
        assert!((a - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_half_transparent_backdrop_gains_alpha() {
        let (out, a) = composite_over(BlendMode::SourceOver, [1.0; 3], 0.5, [0.0; 3], 0.5);
        assert!((a - 0.75).abs() < 1e-12);
        // premultiplied white 0.25 over 0.75 coverage
        assert!(close(out, [1.0 / 3.0; 3]));
    }

    #[test]
    fn test_color_blend_keeps_backdrop_luminosity() {
        let backdrop = [0.5, 0.5, 0.5];
        let orange = [1.0, 165.0 / 255.0, 0.0];
        let out = blend(BlendMode::Color, backdrop, orange);
        assert!((lum(out) - lum(backdrop)).abs() < 1e-9);
        // Hue follows the source: red channel dominates
        assert!(out[0] > out[1] && out[1] > out[2]);
    }

    #[test]
    fn test_color_blend_on_black_and_white() {
        let blue = [0.0, 100.0 / 255.0, 1.0];
        assert!(close(blend(BlendMode::Color, [0.0; 3], blue), [0.0; 3]));
        assert!(close(blend(BlendMode::Color, [1.0; 3], blue), [1.0; 3]));
    }

    #[test]
    fn test_grey_source_is_luminosity_only() {
        let backdrop = [0.9, 0.1, 0.3];
        let out = blend(BlendMode::Color, backdrop, [0.7, 0.7, 0.7]);
        let l = lum(backdrop);
        assert!(close(out, [l, l, l]));
    }
}
