//! Figure model and drawing.
//!
//! A [`Figure`] is a white RGBA raster holding the filled layers (land
//! underlay, data, colorbar swatches) plus a list of vector [`Primitive`]s
//! drawn on top (coastline, contours, graticule, frame, labels). Keeping the
//! overlays as vectors lets the SVG and EPS writers emit real line and text
//! elements; the PNG writer rasterises them.

pub mod contour;
pub mod decor;
pub mod eps;
pub mod font;
pub mod png;
pub mod raster;
pub mod svg;

use image::{Rgba, RgbaImage};
use std::fmt;
use std::path::Path;

use crate::error::{Result, TwodviewError};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Fill for land cells when continents are filled.
pub const LAND_GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Default figure size in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Vector element drawn over the raster, in figure pixel coordinates
/// (origin top-left, y down). Text is positioned by its vertical center.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Polyline {
        points: Vec<(f64, f64)>,
        color: Rgba<u8>,
        width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba<u8>,
        line_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        color: Rgba<u8>,
        anchor: Anchor,
    },
}

/// Rectangle in figure pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Space left for the plot once margins for labels, title and colorbar
    /// are taken off the figure. Margins shrink for large fonts so the plot
    /// keeps at least half of each figure dimension.
    pub fn layout(figure: &Figure, colorbar: bool, title: bool, fts: f64) -> Self {
        let text = font::text_height(fts) as f64;
        let mut left = font::text_width("000.0\u{b0}W", fts) as f64 + 16.0;
        let mut bottom = text * 2.0 + 12.0;
        let mut top = if title {
            font::text_height(fts + 4.0) as f64 * 2.0 + 8.0
        } else {
            text + 8.0
        };
        let mut right = if colorbar {
            decor::COLORBAR_GAP + decor::COLORBAR_WIDTH + font::text_width("-0000.00", fts) as f64 + 16.0
        } else {
            text + 8.0
        };

        let (fig_w, fig_h) = (figure.width() as f64, figure.height() as f64);
        let shrink = |a: &mut f64, b: &mut f64, size: f64| {
            let limit = size / 2.0;
            if *a + *b > limit {
                let k = limit / (*a + *b);
                *a *= k;
                *b *= k;
            }
        };
        shrink(&mut left, &mut right, fig_w);
        shrink(&mut top, &mut bottom, fig_h);

        Self {
            x: left,
            y: top,
            width: fig_w - left - right,
            height: fig_h - top - bottom,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Maps data coordinates onto a plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    area: PlotArea,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Fit `(x_min, x_max, y_min, y_max)` into `available`. With
    /// `equal_aspect` the area shrinks so one data unit has the same length
    /// on both axes, centered in the available space.
    pub fn new(
        available: PlotArea,
        bounds: (f64, f64, f64, f64),
        equal_aspect: bool,
    ) -> Result<Self> {
        let (x_min, x_max, y_min, y_max) = bounds;
        let (dx, dy) = (x_max - x_min, y_max - y_min);
        if !(dx > 0.0 && dy > 0.0) || !dx.is_finite() || !dy.is_finite() {
            return Err(TwodviewError::ImageGeneration {
                message: format!("empty axis limits {:?}", bounds),
            });
        }

        let mut area = available;
        if equal_aspect {
            let scale = (available.width / dx).min(available.height / dy);
            area.width = dx * scale;
            area.height = dy * scale;
            area.x = available.x + (available.width - area.width) / 2.0;
            area.y = available.y + (available.height - area.height) / 2.0;
        }

        Ok(Self {
            area,
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn area(&self) -> PlotArea {
        self.area
    }

    /// Data to figure pixel coordinates.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let px = self.area.x + (x - self.x_min) / (self.x_max - self.x_min) * self.area.width;
        let py = self.area.bottom() - (y - self.y_min) / (self.y_max - self.y_min) * self.area.height;
        (px, py)
    }
}

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Eps,
}

impl OutputFormat {
    /// Format from the file extension, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            "eps" => Some(OutputFormat::Eps),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Eps => "eps",
        };
        f.write_str(name)
    }
}

/// A drawn figure.
#[derive(Debug, Clone)]
pub struct Figure {
    raster: RgbaImage,
    primitives: Vec<Primitive>,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TwodviewError::invalid(
                "size",
                format!("figure size must be non-zero, got {}x{}", width, height),
            ));
        }
        Ok(Self {
            raster: RgbaImage::from_pixel(width, height, WHITE),
            primitives: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// The filled layers, without vector overlays.
    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut RgbaImage {
        &mut self.raster
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn polyline(&mut self, points: Vec<(f64, f64)>, color: Rgba<u8>, width: f64) {
        if points.len() >= 2 {
            self.primitives.push(Primitive::Polyline {
                points,
                color,
                width,
            });
        }
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, size: f64, anchor: Anchor) {
        self.primitives.push(Primitive::Text {
            x,
            y,
            text: text.into(),
            size,
            color: BLACK,
            anchor,
        });
    }

    /// Flatten raster and overlays into a single image.
    pub fn to_image(&self) -> RgbaImage {
        png::rasterize(self)
    }

    /// Write the figure in `format`.
    pub fn save(&self, path: &Path, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Png => png::write(self, path),
            OutputFormat::Svg => svg::write(self, path),
            OutputFormat::Eps => eps::write(self, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("dir/A.SVG")), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_path(Path::new("map.eps")), Some(OutputFormat::Eps));
        assert_eq!(OutputFormat::from_path(Path::new("map.jpg")), None);
        assert_eq!(OutputFormat::from_path(Path::new("png")), None);
        assert_eq!(OutputFormat::from_path(Path::new("map.png.txt")), None);
    }

    #[test]
    fn test_figure_size() {
        assert!(Figure::new(0, 10).is_err());
        let fig = Figure::new(80, 60).unwrap();
        assert_eq!((fig.width(), fig.height()), (80, 60));
        assert_eq!(*fig.raster().get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_to_image_flattens_overlays() {
        let mut fig = Figure::new(40, 40).unwrap();
        fig.push(Primitive::Rect {
            x: 5.0,
            y: 5.0,
            width: 20.0,
            height: 20.0,
            color: BLACK,
            line_width: 1.0,
        });
        let img = fig.to_image();
        assert_eq!(*img.get_pixel(5, 15), BLACK);
        assert_eq!(*img.get_pixel(15, 15), WHITE);
        assert_eq!(*fig.raster().get_pixel(5, 15), WHITE);
    }

    #[test]
    fn test_viewport_maps_corners() {
        let area = PlotArea {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        let vp = Viewport::new(area, (0.0, 2.0, 0.0, 1.0), false).unwrap();
        assert_eq!(vp.to_pixel(0.0, 0.0), (10.0, 70.0));
        assert_eq!(vp.to_pixel(2.0, 1.0), (110.0, 20.0));
    }

    #[test]
    fn test_viewport_equal_aspect() {
        let area = PlotArea {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 100.0,
        };
        let vp = Viewport::new(area, (0.0, 1.0, 0.0, 1.0), true).unwrap();
        let a = vp.area();
        assert_eq!((a.width, a.height), (100.0, 100.0));
        assert_eq!(a.x, 50.0);

        assert!(Viewport::new(area, (1.0, 1.0, 0.0, 1.0), false).is_err());
    }

    #[test]
    fn test_layout_leaves_room() {
        let fig = Figure::new(800, 600).unwrap();
        let area = PlotArea::layout(&fig, true, true, 12.0);
        assert!(area.width > 400.0 && area.height > 400.0);
        assert!(area.right() < 800.0 && area.bottom() < 600.0);
    }

    #[test]
    fn test_layout_shrinks_margins_for_large_text() {
        let fig = Figure::new(800, 600).unwrap();
        let area = PlotArea::layout(&fig, true, true, 120.0);
        assert!(area.width >= 400.0 - 1e-9 && area.height >= 300.0 - 1e-9);
        assert!(area.x > 0.0 && area.right() < 800.0);

        let tiny = Figure::new(40, 30).unwrap();
        let area = PlotArea::layout(&tiny, true, true, 12.0);
        assert!((area.width - 20.0).abs() < 1e-9);
        assert!((area.height - 15.0).abs() < 1e-9);
    }
}
