//! Perceptually uniform 11-step color scales (shades 50–950) from a single
//! seed color, built in OKLCH and clamped to the sRGB gamut.

pub mod api;
pub mod color;
pub mod config;
pub mod gamut;
pub mod scale;
pub mod templates;

pub use color::{
    LinearRgb, Oklab, Oklch, Rgb, format_oklch, hex_to_oklab, hex_to_oklch, hex_to_rgb, linear_to_srgb,
    normalize_hex, normalize_hue, oklab_to_linear_rgb, oklab_to_oklch, oklch_to_hex, oklch_to_oklab, rgb_to_hex, srgb_to_linear,
};
pub use gamut::{clamp_chroma_to_gamut, is_in_gamut};
pub use scale::{
    CHROMA_JITTER, DEFAULT_COLOR, LIGHTNESS_SCALE, SHADE_NUMBERS, Scale, ScaleOptions, Shade, generate_scale,
    generate_scale_with,
};
