//! sRGB, linear RGB, OKLab and OKLCH conversions.
//!
//! OKLab coefficients are Björn Ottosson's published matrices
//! (<https://bottosson.github.io/posts/oklab/>).

use anyhow::{Result, anyhow};
use serde::Serialize;

/// Gamma-encoded 8-bit sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Linear-light RGB. Channels leave [0, 1] for out-of-gamut colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Polar OKLab. `h` is in degrees and is meaningless when `c` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Oklch {
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }
}

/// Decode an 8-bit sRGB channel to linear light (0..=1).
pub fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode linear light to an 8-bit sRGB channel, clamping out-of-range input.
pub fn linear_to_srgb(value: f64) -> u8 {
    let v = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
    let srgb = if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (srgb * 255.0).round() as u8
}

pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let cleaned = hex.strip_prefix('#').unwrap_or(hex);
    let expanded: String = if cleaned.len() == 3 {
        cleaned.chars().flat_map(|c| [c, c]).collect()
    } else {
        cleaned.to_string()
    };
    if expanded.len() != 6 || !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow!("Invalid hex color '{}': expected 3 or 6 hex digits", hex));
    }
    let num = u32::from_str_radix(&expanded, 16)
        .map_err(|e| anyhow!("Invalid hex color '{}': {}", hex, e))?;
    Ok(Rgb {
        r: ((num >> 16) & 0xff) as u8,
        g: ((num >> 8) & 0xff) as u8,
        b: (num & 0xff) as u8,
    })
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Validate user input and return it as canonical lowercase `#rrggbb`.
///
/// Accepts 3 or 6 hex digits with an optional leading `#` and surrounding
/// whitespace. Returns `None` for anything else.
pub fn normalize_hex(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let cleaned = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match cleaned.len() {
        3 => cleaned.chars().flat_map(|c| [c, c]).collect(),
        6 => cleaned.to_string(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}

pub fn linear_rgb_to_oklab(rgb: LinearRgb) -> Oklab {
    let LinearRgb { r, g, b } = rgb;

    let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
    let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
    let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

    // cbrt keeps the sign for negative LMS
    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    Oklab {
        l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
        a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
        b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
    }
}

pub fn oklab_to_linear_rgb(lab: Oklab) -> LinearRgb {
    let Oklab { l, a, b } = lab;

    let l_ = l + 0.3963377774 * a + 0.2158037573 * b;
    let m_ = l - 0.1055613458 * a - 0.0638541728 * b;
    let s_ = l - 0.0894841775 * a - 1.2914855480 * b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

pub fn hex_to_oklab(hex: &str) -> Result<Oklab> {
    let rgb = hex_to_rgb(hex)?;
    Ok(linear_rgb_to_oklab(LinearRgb {
        r: srgb_to_linear(rgb.r),
        g: srgb_to_linear(rgb.g),
        b: srgb_to_linear(rgb.b),
    }))
}

pub fn oklab_to_oklch(lab: Oklab) -> Oklch {
    let c = (lab.a * lab.a + lab.b * lab.b).sqrt();
    let mut h = lab.b.atan2(lab.a).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    Oklch { l: lab.l, c, h }
}

pub fn oklch_to_oklab(lch: Oklch) -> Oklab {
    let h = lch.h.to_radians();
    Oklab {
        l: if lch.l.is_finite() { lch.l } else { 0.0 },
        a: lch.c * h.cos(),
        b: lch.c * h.sin(),
    }
}

/// Wrap a hue into [0, 360). `-0.0` and rounding up to 360 both become 0.
pub fn normalize_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    if wrapped >= 360.0 || wrapped == 0.0 { 0.0 } else { wrapped }
}

pub fn hex_to_oklch(hex: &str) -> Result<Oklch> {
    Ok(oklab_to_oklch(hex_to_oklab(hex)?))
}

pub fn oklch_to_hex(lch: Oklch) -> String {
    let linear = oklab_to_linear_rgb(oklch_to_oklab(lch));
    rgb_to_hex(Rgb {
        r: linear_to_srgb(linear.r),
        g: linear_to_srgb(linear.g),
        b: linear_to_srgb(linear.b),
    })
}

/// CSS `oklch()` string with L as a percentage. A non-finite L prints as 0%.
pub fn format_oklch(lch: Oklch) -> String {
    let l = if lch.l.is_finite() { lch.l * 100.0 } else { 0.0 };
    format!("oklch({:.2}% {:.4} {:.2})", l, lch.c, lch.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn transfer_endpoints() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert_eq!(srgb_to_linear(255), 1.0);
        assert_eq!(linear_to_srgb(0.0), 0);
        assert_eq!(linear_to_srgb(1.0), 255);
    }

    #[test]
    fn transfer_clamps_out_of_range() {
        assert_eq!(linear_to_srgb(-0.5), 0);
        assert_eq!(linear_to_srgb(1.7), 255);
        assert_eq!(linear_to_srgb(f64::NAN), 0);
    }

    #[test]
    fn transfer_round_trips_every_byte() {
        for v in 0..=255u8 {
            assert_eq!(linear_to_srgb(srgb_to_linear(v)), v, "byte {v}");
        }
    }

    #[test]
    fn transfer_mid_gray() {
        // 128/255 sits on the gamma segment
        assert_close(srgb_to_linear(128), 0.21586, 1e-5);
    }

    #[test]
    fn hex_to_rgb_parses_both_lengths() {
        assert_eq!(hex_to_rgb("#ffffff").unwrap(), Rgb { r: 255, g: 255, b: 255 });
        assert_eq!(hex_to_rgb("ef4444").unwrap(), Rgb { r: 0xef, g: 0x44, b: 0x44 });
        assert_eq!(hex_to_rgb("#abc").unwrap(), Rgb { r: 0xaa, g: 0xbb, b: 0xcc });
    }

    #[test]
    fn hex_to_rgb_rejects_garbage() {
        assert!(hex_to_rgb("#ggg").is_err());
        assert!(hex_to_rgb("#12345").is_err());
        assert!(hex_to_rgb("").is_err());
        assert!(hex_to_rgb("+12345").is_err());
    }

    #[test]
    fn hex_round_trip() {
        for hex in ["#000000", "#ffffff", "#ef4444", "#3b82f6", "#0a0b0c"] {
            assert_eq!(rgb_to_hex(hex_to_rgb(hex).unwrap()), hex);
        }
        assert_eq!(rgb_to_hex(hex_to_rgb("#ABCDEF").unwrap()), "#abcdef");
    }

    #[test]
    fn normalize_hex_cases() {
        assert_eq!(normalize_hex("f00").as_deref(), Some("#ff0000"));
        assert_eq!(normalize_hex("  #3B82F6 ").as_deref(), Some("#3b82f6"));
        assert_eq!(normalize_hex("ABCDEF").as_deref(), Some("#abcdef"));
        assert_eq!(normalize_hex("xyz"), None);
        assert_eq!(normalize_hex("#ffff"), None);
        assert_eq!(normalize_hex("##fff"), None);
        assert_eq!(normalize_hex(""), None);
        assert_eq!(normalize_hex("+ff"), None);
    }

    #[test]
    fn normalize_hex_is_a_fixed_point() {
        for input in ["f00", "#ABC", " 123456", "deadbe"] {
            let once = normalize_hex(input).unwrap();
            assert_eq!(normalize_hex(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn oklab_of_white_and_black() {
        let white = hex_to_oklab("#ffffff").unwrap();
        assert_close(white.l, 1.0, 1e-4);
        assert_close(white.a, 0.0, 1e-4);
        assert_close(white.b, 0.0, 1e-4);

        let black = hex_to_oklab("#000000").unwrap();
        assert_close(black.l, 0.0, 1e-9);
    }

    #[test]
    fn oklab_of_red_matches_reference() {
        // Ottosson's reference: sRGB red → (0.6279554, 0.2248631, 0.1258463)
        let red = hex_to_oklab("#ff0000").unwrap();
        assert_close(red.l, 0.6279554, 1e-5);
        assert_close(red.a, 0.2248631, 1e-5);
        assert_close(red.b, 0.1258463, 1e-5);
    }

    #[test]
    fn negative_linear_rgb_keeps_sign_through_cbrt() {
        let lab = linear_rgb_to_oklab(LinearRgb { r: -0.1, g: -0.1, b: -0.1 });
        assert!(lab.l < 0.0);
        let back = oklab_to_linear_rgb(lab);
        assert_close(back.r, -0.1, 1e-6);
    }

    #[test]
    fn oklch_round_trip() {
        for lch in [
            Oklch::new(0.6, 0.1, 25.0),
            Oklch::new(0.9, 0.05, 180.0),
            Oklch::new(0.3, 0.08, 359.5),
            Oklch::new(0.5, 0.12, 0.0),
        ] {
            let back = oklab_to_oklch(oklch_to_oklab(lch));
            assert_close(back.l, lch.l, 1e-6);
            assert_close(back.c, lch.c, 1e-6);
            let dh = (back.h - lch.h).rem_euclid(360.0);
            assert!(dh < 1e-6 || 360.0 - dh < 1e-6, "hue {} vs {}", back.h, lch.h);
        }
    }

    #[test]
    fn hue_is_non_negative() {
        let lch = oklab_to_oklch(Oklab { l: 0.5, a: 0.1, b: -0.1 });
        assert_close(lch.h, 315.0, 1e-9);
    }

    #[test]
    fn hue_wraps_into_range() {
        assert_eq!(normalize_hue(720.0), 0.0);
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(400.5), 40.5);
        let zero = normalize_hue(-0.0);
        assert!(zero == 0.0 && zero.is_sign_positive());
        // rem_euclid rounds this up to exactly 360
        assert_eq!(normalize_hue(-1e-15), 0.0);
        assert_eq!(format!("{:.2}", normalize_hue(-0.0)), "0.00");
    }

    #[test]
    fn zero_chroma_is_finite() {
        let lch = hex_to_oklch("#808080").unwrap();
        assert!(lch.c < 1e-4);
        assert!(lch.h.is_finite());
        let lab = oklch_to_oklab(Oklch::new(0.5, 0.0, 123.0));
        assert_eq!(lab.a, 0.0);
        assert_eq!(lab.b, 0.0);
    }

    #[test]
    fn oklch_to_hex_round_trips_seed() {
        for hex in ["#ef4444", "#3b82f6", "#22c55e", "#000000", "#ffffff"] {
            assert_eq!(oklch_to_hex(hex_to_oklch(hex).unwrap()), hex);
        }
    }

    #[test]
    fn format_oklch_precision() {
        assert_eq!(
            format_oklch(Oklch::new(0.9778, 0.00123456, 25.3333)),
            "oklch(97.78% 0.0012 25.33)"
        );
        assert_eq!(format_oklch(Oklch::new(f64::NAN, 0.0, 0.0)), "oklch(0.00% 0.0000 0.00)");
    }
}
