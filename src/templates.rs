use askama::Template;

use crate::scale::Scale;

pub struct SwatchCell {
    pub shade: u16,
    pub x: u32,
    pub label_x: u32,
    pub hex: String,
    pub css: String,
    pub label_color: &'static str,
}

#[derive(Template)]
#[template(path = "swatches.svg")]
pub struct SwatchStripTemplate {
    pub name: String,
    pub seed: String,
    pub cells: Vec<SwatchCell>,
    pub swatch_size: u32,
    pub width: u32,
    pub height: u32,
    pub label_y: u32,
    pub font_size: u32,
}

impl SwatchStripTemplate {
    pub fn new(name: &str, seed: &str, scale: &Scale, swatch_size: u32) -> Self {
        let cells: Vec<SwatchCell> = scale
            .iter()
            .enumerate()
            .map(|(i, shade)| {
                let x = i as u32 * swatch_size;
                SwatchCell {
                    shade: shade.shade,
                    x,
                    label_x: x + swatch_size / 2,
                    hex: shade.hex.clone(),
                    css: shade.css.clone(),
                    // dark text on the light half of the ramp
                    label_color: if shade.oklch.l > 0.6 { "#111827" } else { "#ffffff" },
                }
            })
            .collect();
        Self {
            name: name.to_string(),
            seed: seed.to_string(),
            width: swatch_size * cells.len() as u32,
            height: swatch_size,
            label_y: swatch_size - swatch_size / 6,
            font_size: (swatch_size / 5).max(8),
            swatch_size,
            cells,
        }
    }
}
