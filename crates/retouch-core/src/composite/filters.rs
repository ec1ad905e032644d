//! Per-pixel filter primitives.
//!
//! Each primitive matches the CSS Filter Effects shorthand of the same name,
//! evaluated on non-premultiplied sRGB values in 0.0 to 1.0. The output of
//! every primitive is clamped before the next one runs. Alpha is never
//! touched.

use super::plan::{FilterFunction, FilterStep};

/// An RGB colour with channels in 0.0 to 1.0.
pub type Rgb = [f64; 3];

/// Apply one filter step to a colour.
#[inline]
pub fn apply_step(rgb: Rgb, step: &FilterStep) -> Rgb {
    let out = match step.function {
        FilterFunction::Grayscale => grayscale(rgb, step.amount),
        FilterFunction::Sepia => sepia(rgb, step.amount),
        FilterFunction::Invert => invert(rgb, step.amount),
        FilterFunction::Brightness => brightness(rgb, step.amount),
        FilterFunction::Contrast => contrast(rgb, step.amount),
        FilterFunction::Saturate => saturate(rgb, step.amount),
    };
    [
        out[0].clamp(0.0, 1.0),
        out[1].clamp(0.0, 1.0),
        out[2].clamp(0.0, 1.0),
    ]
}

/// Apply a whole filter chain, in order.
#[inline]
pub fn apply_chain(rgb: Rgb, steps: &[FilterStep]) -> Rgb {
    steps.iter().fold(rgb, apply_step)
}

#[inline]
fn mul(m: &[[f64; 3]; 3], c: Rgb) -> Rgb {
    [
        m[0][0] * c[0] + m[0][1] * c[1] + m[0][2] * c[2],
        m[1][0] * c[0] + m[1][1] * c[1] + m[1][2] * c[2],
        m[2][0] * c[0] + m[2][1] * c[1] + m[2][2] * c[2],
    ]
}

/// `grayscale(amount)`; amount is clamped to 0..=1.
fn grayscale(c: Rgb, amount: f64) -> Rgb {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    let m = [
        [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
        [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
        [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
    ];
    mul(&m, c)
}

/// `sepia(amount)`; amount is clamped to 0..=1.
fn sepia(c: Rgb, amount: f64) -> Rgb {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    let m = [
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ];
    mul(&m, c)
}

/// `saturate(amount)`; amounts above 1 oversaturate.
fn saturate(c: Rgb, s: f64) -> Rgb {
    let s = s.max(0.0);
    let m = [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ];
    mul(&m, c)
}

fn invert(c: Rgb, amount: f64) -> Rgb {
    let a = amount.clamp(0.0, 1.0);
    c.map(|v| a * (1.0 - v) + (1.0 - a) * v)
}

fn brightness(c: Rgb, amount: f64) -> Rgb {
    let a = amount.max(0.0);
    c.map(|v| v * a)
}

fn contrast(c: Rgb, amount: f64) -> Rgb {
    let a = amount.max(0.0);
    c.map(|v| (v - 0.5) * a + 0.5)
}
