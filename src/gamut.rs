use crate::color::{Oklch, oklab_to_linear_rgb, oklch_to_oklab};

/// Slack allowed on each linear channel at the [0, 1] boundary.
pub const GAMUT_EPSILON: f64 = 0.0001;

/// Width at which the chroma search stops.
pub const CHROMA_TOLERANCE: f64 = 0.0001;

pub fn is_in_gamut(lch: Oklch) -> bool {
    let rgb = oklab_to_linear_rgb(oklch_to_oklab(lch));
    [rgb.r, rgb.g, rgb.b]
        .iter()
        .all(|&v| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(&v))
}

/// Largest chroma in `[0, c]` that keeps `(l, _, h)` displayable in sRGB.
///
/// Binary search: `low` is always in gamut, `high` is the request or a
/// rejected midpoint. Lightness and hue are never touched.
pub fn clamp_chroma_to_gamut(l: f64, c: f64, h: f64) -> f64 {
    if !c.is_finite() || c <= 0.0 {
        return 0.0;
    }
    let mut low = 0.0;
    let mut high = c;
    while high - low > CHROMA_TOLERANCE {
        let mid = (low + high) / 2.0;
        if is_in_gamut(Oklch::new(l, mid, h)) {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}
