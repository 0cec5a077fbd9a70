//! Encapsulated PostScript output.
//!
//! The raster layers go in as a `colorimage` with hex data; overlays become
//! PostScript paths and Helvetica text re-encoded to ISO Latin-1 so that the
//! degree sign prints.

use std::fmt::Write as _;
use std::path::Path;

use image::Rgba;

use super::{Anchor, Figure, Primitive};
use crate::error::{Result, TwodviewError};

const HEX_LINE: usize = 72;
/// Baseline offset below the vertical text center, as a fraction of size.
const BASELINE_DROP: f64 = 0.35;

/// Escape a string for a PostScript literal. Latin-1 characters become octal
/// escapes; anything beyond Latin-1 is replaced by `?`.
pub fn escape_ps(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

fn set_color(out: &mut String, color: &Rgba<u8>) -> std::fmt::Result {
    let [r, g, b, _] = color.0;
    writeln!(
        out,
        "{:.3} {:.3} {:.3} setrgbcolor",
        r as f64 / 255.0,
        g as f64 / 255.0,
        b as f64 / 255.0
    )
}

/// Render the figure as an EPS document.
pub fn render(figure: &Figure) -> Result<String> {
    let mut out = String::new();
    write_document(figure, &mut out).map_err(|e| TwodviewError::ImageGeneration {
        message: format!("Failed to format EPS: {}", e),
    })?;
    Ok(out)
}

fn write_document(figure: &Figure, out: &mut String) -> std::fmt::Result {
    let (width, height) = (figure.width(), figure.height());
    let h = height as f64;

    writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0")?;
    writeln!(out, "%%BoundingBox: 0 0 {} {}", width, height)?;
    writeln!(out, "%%Creator: twodview")?;
    writeln!(
        out,
        "%%CreationDate: {}",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    )?;
    writeln!(out, "%%EndComments")?;
    writeln!(
        out,
        "/Helvetica findfont dup length dict begin {{1 index /FID ne {{def}} {{pop pop}} ifelse}} forall"
    )?;
    writeln!(
        out,
        "/Encoding ISOLatin1Encoding def currentdict end /Helvetica-Latin1 exch definefont pop"
    )?;

    // Raster layers, top row first
    writeln!(out, "gsave")?;
    writeln!(out, "{} {} scale", width, height)?;
    writeln!(out, "/picstr {} string def", width * 3)?;
    writeln!(
        out,
        "{w} {h} 8 [{w} 0 0 -{h} 0 {h}] {{currentfile picstr readhexstring pop}} false 3 colorimage",
        w = width,
        h = height
    )?;

    let mut line_len = 0;
    for pixel in figure.raster().pixels() {
        for channel in &pixel.0[..3] {
            write!(out, "{:02x}", channel)?;
            line_len += 2;
            if line_len >= HEX_LINE {
                out.push('\n');
                line_len = 0;
            }
        }
    }
    if line_len > 0 {
        out.push('\n');
    }
    writeln!(out, "grestore")?;

    writeln!(out, "1 setlinejoin 1 setlinecap")?;
    for primitive in figure.primitives() {
        match primitive {
            Primitive::Polyline {
                points,
                color,
                width,
            } => {
                set_color(out, color)?;
                writeln!(out, "{} setlinewidth newpath", width)?;
                for (i, (x, y)) in points.iter().enumerate() {
                    let op = if i == 0 { "moveto" } else { "lineto" };
                    writeln!(out, "{:.2} {:.2} {}", x, h - y, op)?;
                }
                writeln!(out, "stroke")?;
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            } => {
                set_color(out, color)?;
                writeln!(
                    out,
                    "{} setlinewidth {:.2} {:.2} {:.2} {:.2} rectstroke",
                    line_width,
                    x,
                    h - y - height,
                    width,
                    height
                )?;
            }
            Primitive::Text {
                x,
                y,
                text,
                size,
                color,
                anchor,
            } => {
                set_color(out, color)?;
                writeln!(out, "/Helvetica-Latin1 findfont {} scalefont setfont", size)?;
                writeln!(out, "{:.2} {:.2} moveto", x, h - y - size * BASELINE_DROP)?;
                let shift = match anchor {
                    Anchor::Start => "",
                    Anchor::Middle => "dup stringwidth pop 2 div neg 0 rmoveto ",
                    Anchor::End => "dup stringwidth pop neg 0 rmoveto ",
                };
                writeln!(out, "({}) {}show", escape_ps(text), shift)?;
            }
        }
    }

    writeln!(out, "showpage")?;
    writeln!(out, "%%EOF")
}

pub fn write(figure: &Figure, path: &Path) -> Result<()> {
    std::fs::write(path, render(figure)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BLACK;

    #[test]
    fn test_escape_ps() {
        assert_eq!(escape_ps("a(b)\\"), "a\\(b\\)\\\\");
        assert_eq!(escape_ps("30.0\u{b0}N"), "30.0\\260N");
        assert_eq!(escape_ps("\u{3c3}"), "?");
    }

    #[test]
    fn test_render_document() {
        let mut figure = Figure::new(4, 3).unwrap();
        figure.polyline(vec![(0.0, 0.0), (4.0, 3.0)], BLACK, 0.5);
        figure.text(2.0, 1.0, "12.0\u{b0}E", 12.0, Anchor::End);

        let eps = render(&figure).unwrap();
        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
        assert!(eps.contains("%%BoundingBox: 0 0 4 3"));
        assert!(eps.contains("false 3 colorimage"));
        // 12 white pixels of hex data on one line
        assert!(eps.contains(&format!("{}\n", "ff".repeat(36))));
        assert!(eps.contains("0.00 3.00 moveto"));
        assert!(eps.contains("(12.0\\260E) dup stringwidth pop neg 0 rmoveto show"));
        assert!(eps.trim_end().ends_with("%%EOF"));
    }
}
