use anyhow::{Context, Result, bail};
use log::debug;
use serde::Serialize;

use crate::color::{Oklch, format_oklch, hex_to_oklch, normalize_hue, oklch_to_hex};
use crate::gamut::{CHROMA_TOLERANCE, clamp_chroma_to_gamut};

pub const SHADE_COUNT: usize = 11;

/// Tailwind shade numbers.
pub const SHADE_NUMBERS: [u16; SHADE_COUNT] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 950];

/// Target lightness per shade, as a percentage. Shade 500 keeps the seed's own lightness.
pub const LIGHTNESS_SCALE: [Option<f64>; SHADE_COUNT] = [
    Some(97.78),
    Some(93.56),
    Some(88.11),
    Some(82.67),
    Some(74.22),
    None,
    Some(57.33),
    Some(46.89),
    Some(39.44),
    Some(32.0),
    Some(23.78),
];

/// Per-shade multiplier applied to the base chroma.
pub const CHROMA_JITTER: [f64; SHADE_COUNT] = [
    0.0108, 0.0321, 0.0609, 0.0908, 0.1398, 0.1472, 0.1299, 0.1067, 0.0898, 0.0726, 0.054,
];

pub const DEFAULT_COLOR: &str = "#ef4444";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shade {
    pub shade: u16,
    pub oklch: Oklch,
    pub css: String,
    pub hex: String,
}

/// The 11 shades of a palette, ascending by shade number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scale([Shade; SHADE_COUNT]);

impl Scale {
    pub fn shades(&self) -> &[Shade] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shade> {
        self.0.iter()
    }

    pub fn get(&self, shade: u16) -> Option<&Shade> {
        SHADE_NUMBERS
            .iter()
            .position(|&n| n == shade)
            .map(|i| &self.0[i])
    }
}

impl<'a> IntoIterator for &'a Scale {
    type Item = &'a Shade;
    type IntoIter = std::slice::Iter<'a, Shade>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Chroma and hue overrides. `None` keeps the seed's value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScaleOptions {
    pub chroma: Option<f64>,
    pub hue: Option<f64>,
}

pub fn generate_scale(hex: &str, chroma_override: Option<f64>, hue_override: Option<f64>) -> Result<Scale> {
    if let Some(c) = chroma_override.filter(|c| !c.is_finite()) {
        bail!("Invalid chroma override {}: expected a finite number", c);
    }
    if let Some(h) = hue_override.filter(|h| !h.is_finite()) {
        bail!("Invalid hue override {}: expected a finite number", h);
    }
    let base = hex_to_oklch(hex).with_context(|| format!("Cannot build a scale from seed '{}'", hex))?;
    let base_c = chroma_override.unwrap_or(base.c);
    let base_h = hue_override.map_or(base.h, normalize_hue);
    debug!("Seed {} decoded to {:?}, using C={} H={}", hex, base, base_c, base_h);

    let shades = std::array::from_fn(|index| {
        let l = LIGHTNESS_SCALE[index].map_or(base.l, |percent| percent / 100.0);
        let requested = base_c * CHROMA_JITTER[index];
        let c = clamp_chroma_to_gamut(l, requested, base_h);
        if c + CHROMA_TOLERANCE < requested {
            debug!("Shade {} chroma clamped {:.4} -> {:.4}", SHADE_NUMBERS[index], requested, c);
        }
        let oklch = Oklch::new(l, c, base_h);
        Shade {
            shade: SHADE_NUMBERS[index],
            oklch,
            css: format_oklch(oklch),
            hex: oklch_to_hex(oklch),
        }
    });
    Ok(Scale(shades))
}

pub fn generate_scale_with(hex: &str, options: ScaleOptions) -> Result<Scale> {
    generate_scale(hex, options.chroma, options.hue)
}

/// Reduce a palette name to `[a-z0-9-]`, or `None` if nothing usable is left.
pub fn sanitize_palette_name(name: &str) -> Option<String> {
    let mut out = String::new();
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if (c == '-' || c == '_' || c.is_whitespace()) && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Tailwind v4 `@theme` block declaring one custom property per shade.
pub fn format_theme_css(name: &str, scale: &Scale) -> String {
    let mut css = String::from("@theme {\n");
    for shade in scale {
        css.push_str(&format!("  --color-{}-{}: {};\n", name, shade.shade, shade.css));
    }
    css.push_str("}\n");
    css
}
