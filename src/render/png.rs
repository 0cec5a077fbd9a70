//! Raster output: overlays drawn with imageproc, encoded with image.

use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use super::{font, Anchor, Figure, Primitive};
use crate::error::{Result, TwodviewError};

/// Raster plus overlays as one image.
pub fn rasterize(figure: &Figure) -> RgbaImage {
    let mut img = figure.raster().clone();
    for primitive in figure.primitives() {
        draw_primitive(&mut img, primitive);
    }
    img
}

/// Encode the flattened figure as PNG bytes.
pub fn encode(figure: &Figure) -> Result<Vec<u8>> {
    let img = rasterize(figure);
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| TwodviewError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;
    Ok(buffer.into_inner())
}

pub fn write(figure: &Figure, path: &Path) -> Result<()> {
    let img = rasterize(figure);
    let mut out = BufWriter::new(File::create(path)?);
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| TwodviewError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })
}

fn draw_primitive(img: &mut RgbaImage, primitive: &Primitive) {
    match primitive {
        Primitive::Polyline {
            points,
            color,
            width,
        } => {
            for pair in points.windows(2) {
                draw_thick_line(img, pair[0], pair[1], *color, *width);
            }
        }
        Primitive::Rect {
            x,
            y,
            width,
            height,
            color,
            ..
        } => {
            let w = width.round().max(1.0) as u32;
            let h = height.round().max(1.0) as u32;
            draw_hollow_rect_mut(
                img,
                Rect::at(x.round() as i32, y.round() as i32).of_size(w + 1, h + 1),
                *color,
            );
        }
        Primitive::Text {
            x,
            y,
            text,
            size,
            color,
            anchor,
        } => {
            let w = font::text_width(text, *size) as f64;
            let h = font::text_height(*size) as f64;
            let left = match anchor {
                Anchor::Start => *x,
                Anchor::Middle => *x - w / 2.0,
                Anchor::End => *x - w,
            };
            font::draw_text(
                img,
                left.round() as i32,
                (*y - h / 2.0).round() as i32,
                text,
                *size,
                *color,
            );
        }
    }
}

/// Lines thinner than 1.5 px are drawn one pixel wide; thicker ones as
/// parallel strokes.
fn draw_thick_line(img: &mut RgbaImage, a: (f64, f64), b: (f64, f64), color: Rgba<u8>, width: f64) {
    let strokes = width.round().max(1.0) as i32;
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len > 0.0 {
        (-dy / len, dx / len)
    } else {
        (0.0, 0.0)
    };

    for k in 0..strokes {
        let offset = k as f64 - (strokes - 1) as f64 / 2.0;
        draw_line_segment_mut(
            img,
            ((a.0 + nx * offset) as f32, (a.1 + ny * offset) as f32),
            ((b.0 + nx * offset) as f32, (b.1 + ny * offset) as f32),
            color,
        );
    }
}
