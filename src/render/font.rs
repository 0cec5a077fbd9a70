//! TrueType text for raster output.
//!
//! Labels are laid out and drawn with rusttype through imageproc using the
//! embedded DejaVu Sans face. Sizes are in points at 96 dpi.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const PX_PER_PT: f64 = 96.0 / 72.0;

fn load() -> Option<Font<'static>> {
    let font = Font::try_from_bytes(FONT_DATA);
    if font.is_none() {
        tracing::warn!("Failed to load label font");
    }
    font
}

fn scale(size: f64) -> Scale {
    Scale::uniform((size * PX_PER_PT).max(1.0) as f32)
}

/// Rendered width in pixels.
pub fn text_width(text: &str, size: f64) -> u32 {
    if text.is_empty() {
        return 0;
    }
    match load() {
        Some(font) => text_size(scale(size), &font, text).0.max(0) as u32,
        None => (text.chars().count() as f64 * size * PX_PER_PT * 0.6).ceil() as u32,
    }
}

/// Line height in pixels, ascent to descent.
pub fn text_height(size: f64) -> u32 {
    match load() {
        Some(font) => {
            let v = font.v_metrics(scale(size));
            (v.ascent - v.descent).ceil() as u32
        }
        None => (size * PX_PER_PT).ceil() as u32,
    }
}

/// Draw `text` with the top of its line box at (x, y). Glyphs outside the
/// image are dropped.
pub fn draw_text(image: &mut RgbaImage, x: i32, y: i32, text: &str, size: f64, color: Rgba<u8>) {
    if let Some(font) = load() {
        draw_text_mut(image, color, x, y, scale(size), &font, text);
    }
}
