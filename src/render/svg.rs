//! SVG output: the raster layers as an embedded PNG, overlays as elements.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgba};
use std::io::Cursor;
use std::path::Path;

use super::{Anchor, Figure, Primitive};
use crate::error::{Result, TwodviewError};

/// Escape text for use in XML content and attributes.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn rgb(color: &Rgba<u8>) -> String {
    format!("rgb({},{},{})", color.0[0], color.0[1], color.0[2])
}

/// Render the figure as an SVG document.
pub fn render(figure: &Figure) -> Result<String> {
    let (width, height) = (figure.width(), figure.height());

    let mut png = Cursor::new(Vec::new());
    figure
        .raster()
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| TwodviewError::ImageGeneration {
            message: format!("Failed to encode raster layer: {}", e),
        })?;

    let mut content = vec![format!(
        "<image x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" href=\"data:image/png;base64,{}\"/>",
        width,
        height,
        STANDARD.encode(png.into_inner())
    )];

    for primitive in figure.primitives() {
        content.push(element(primitive));
    }

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  {body}
</svg>
"#,
        w = width,
        h = height,
        body = content.join("\n  ")
    ))
}

fn element(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Polyline {
            points,
            color,
            width,
        } => {
            let points_str = points
                .iter()
                .map(|(x, y)| format!("{:.2},{:.2}", x, y))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                points_str,
                rgb(color),
                width
            )
        }
        Primitive::Rect {
            x,
            y,
            width,
            height,
            color,
            line_width,
        } => format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            x,
            y,
            width,
            height,
            rgb(color),
            line_width
        ),
        Primitive::Text {
            x,
            y,
            text,
            size,
            color,
            anchor,
        } => {
            let anchor = match anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"Helvetica, Arial, sans-serif\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\" dominant-baseline=\"central\">{}</text>",
                x,
                y,
                size,
                rgb(color),
                anchor,
                escape_xml(text)
            )
        }
    }
}

pub fn write(figure: &Figure, path: &Path) -> Result<()> {
    std::fs::write(path, render(figure)?)?;
    Ok(())
}
