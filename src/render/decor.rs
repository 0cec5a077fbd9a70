//! Colorbar, axes, graticule and title.

use image::Rgba;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::{font, Anchor, Figure, PlotArea, Primitive, Viewport, BLACK};
use crate::colormaps::Colormap;
use crate::projection::geoutil::{format_latitude, format_longitude};
use crate::projection::MapContext;
use crate::scale::{Bin, ColorScale};

/// Horizontal gap between the plot and the colorbar, in pixels.
pub const COLORBAR_GAP: f64 = 20.0;
pub const COLORBAR_WIDTH: f64 = 20.0;
/// Most colorbar labels drawn before boundaries are skipped.
const MAX_COLORBAR_LABELS: usize = 11;
const TICK_LENGTH: f64 = 4.0;
/// Points along each graticule line.
const GRATICULE_SAMPLES: usize = 64;

/// Colorbar to the right of `area`: one swatch per bin, boundaries
/// labelled `%.2f`.
pub fn colorbar(
    figure: &mut Figure,
    area: &PlotArea,
    scale: &ColorScale,
    palette: &dyn Colormap,
    fts: f64,
) {
    let x = area.right() + COLORBAR_GAP;
    let (top, height) = (area.y, area.height);
    let n_bins = scale.clev as usize;
    let y_at = |i: usize| top + height * (1.0 - i as f64 / n_bins as f64);

    for bin in 0..n_bins {
        let color = palette.map_normalized(
            scale.color_index(Bin::In(bin)) as f32 / (crate::scale::PALETTE_COLORS - 1) as f32,
        );
        let (y0, y1) = (y_at(bin + 1).round(), y_at(bin).round());
        let h = (y1 - y0).max(1.0) as u32;
        draw_filled_rect_mut(
            figure.raster_mut(),
            Rect::at(x.round() as i32, y0 as i32).of_size(COLORBAR_WIDTH as u32, h),
            Rgba(color),
        );
    }

    figure.push(Primitive::Rect {
        x,
        y: top,
        width: COLORBAR_WIDTH,
        height,
        color: BLACK,
        line_width: 1.0,
    });

    let stride = n_bins.div_ceil(MAX_COLORBAR_LABELS - 1).max(1);
    for (i, value) in scale.boundaries().iter().enumerate() {
        if i % stride != 0 && i != n_bins {
            continue;
        }
        // Keep the last label from crowding the one before it
        if i == n_bins && i % stride != 0 && (i % stride) * 2 < stride {
            continue;
        }
        let y = y_at(i);
        let x_end = x + COLORBAR_WIDTH;
        figure.polyline(vec![(x_end, y), (x_end + TICK_LENGTH, y)], BLACK, 1.0);
        figure.text(
            x_end + TICK_LENGTH + 3.0,
            y,
            format!("{:.2}", value),
            fts,
            Anchor::Start,
        );
    }
}

/// Black frame around the plot area.
pub fn frame(figure: &mut Figure, area: &PlotArea) {
    figure.push(Primitive::Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height,
        color: BLACK,
        line_width: 1.0,
    });
}

/// Title centered above the plot area at `fts + 4`.
pub fn title(figure: &mut Figure, area: &PlotArea, text: &str, fts: f64) {
    let size = fts + 4.0;
    let y = area.y - font::text_height(size) as f64;
    figure.text(area.x + area.width / 2.0, y, text, size, Anchor::Middle);
}

/// Meridians and parallels of the map extent, labelled on the bottom and
/// left edges.
pub fn graticule(figure: &mut Figure, viewport: &Viewport, map: &MapContext, fts: f64) {
    let area = viewport.area();
    let extent = map.extent;
    let label_gap = font::text_height(fts) as f64;

    for lon in extent.meridians() {
        let line = sample(GRATICULE_SAMPLES, extent.lat_min, extent.lat_max)
            .filter_map(|lat| map.project(lon, lat).ok())
            .map(|(x, y)| viewport.to_pixel(x, y));
        draw_clipped(figure, line.collect(), &area, BLACK, 0.5);

        if let Ok((x, y)) = map.project(lon, extent.lat_min) {
            let (px, _) = viewport.to_pixel(x, y);
            if inside_x(px, &area) {
                figure.polyline(
                    vec![(px, area.bottom()), (px, area.bottom() + TICK_LENGTH)],
                    BLACK,
                    1.0,
                );
                figure.text(
                    px,
                    area.bottom() + TICK_LENGTH + label_gap,
                    format_longitude(lon),
                    fts,
                    Anchor::Middle,
                );
            }
        }
    }

    for lat in extent.parallels() {
        let line = sample(GRATICULE_SAMPLES, extent.lon_min, extent.lon_max)
            .filter_map(|lon| map.project(lon, lat).ok())
            .map(|(x, y)| viewport.to_pixel(x, y));
        draw_clipped(figure, line.collect(), &area, BLACK, 0.5);

        if let Ok((x, y)) = map.project(extent.lon_min, lat) {
            let (_, py) = viewport.to_pixel(x, y);
            if inside_y(py, &area) {
                figure.polyline(
                    vec![(area.x - TICK_LENGTH, py), (area.x, py)],
                    BLACK,
                    1.0,
                );
                figure.text(
                    area.x - TICK_LENGTH - 3.0,
                    py,
                    format_latitude(lat),
                    fts,
                    Anchor::End,
                );
            }
        }
    }
}

/// Tick marks and labels for plain (unprojected) axes.
pub fn plain_axes(figure: &mut Figure, viewport: &Viewport, fts: f64) {
    let area = viewport.area();
    let label_gap = font::text_height(fts) as f64;

    let (x_ticks, x_step) = nice_ticks(viewport.x_min, viewport.x_max, 5);
    for x in x_ticks {
        let (px, _) = viewport.to_pixel(x, viewport.y_min);
        figure.polyline(
            vec![(px, area.bottom()), (px, area.bottom() + TICK_LENGTH)],
            BLACK,
            1.0,
        );
        figure.text(
            px,
            area.bottom() + TICK_LENGTH + label_gap,
            format_tick(x, x_step),
            fts,
            Anchor::Middle,
        );
    }

    let (y_ticks, y_step) = nice_ticks(viewport.y_min, viewport.y_max, 5);
    for y in y_ticks {
        let (_, py) = viewport.to_pixel(viewport.x_min, y);
        figure.polyline(vec![(area.x - TICK_LENGTH, py), (area.x, py)], BLACK, 1.0);
        figure.text(
            area.x - TICK_LENGTH - 3.0,
            py,
            format_tick(y, y_step),
            fts,
            Anchor::End,
        );
    }
}

/// Round-number ticks covering [min, max], about `target` of them, and
/// their spacing.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> (Vec<f64>, f64) {
    let span = max - min;
    if !(span > 0.0) || !span.is_finite() || target == 0 {
        return (vec![], 0.0);
    }

    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        n if n < 1.5 => 1.0,
        n if n < 3.0 => 2.0,
        n if n < 7.0 => 5.0,
        _ => 10.0,
    } * magnitude;

    let first = (min / step).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    let ticks = (first..=last).map(|k| k as f64 * step).collect();
    (ticks, step)
}

/// Label with as many decimals as the tick spacing needs.
fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    // Avoid "-0"
    let value = if value.abs() < step * 1e-9 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}

fn sample(n: usize, from: f64, to: f64) -> impl Iterator<Item = f64> {
    (0..=n).map(move |k| from + (to - from) * k as f64 / n as f64)
}

fn inside_x(px: f64, area: &PlotArea) -> bool {
    px >= area.x - 0.5 && px <= area.right() + 0.5
}

fn inside_y(py: f64, area: &PlotArea) -> bool {
    py >= area.y - 0.5 && py <= area.bottom() + 0.5
}

/// Draw the parts of a line that stay inside the plot area. Non-finite
/// points break the line as well.
pub fn draw_clipped(
    figure: &mut Figure,
    points: Vec<(f64, f64)>,
    area: &PlotArea,
    color: Rgba<u8>,
    width: f64,
) {
    let mut run = Vec::new();
    for p in points {
        if inside_x(p.0, area) && inside_y(p.1, area) {
            run.push(p);
        } else if !run.is_empty() {
            figure.polyline(std::mem::take(&mut run), color, width);
        }
    }
    figure.polyline(run, color, width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::get_lut;
    use crate::projection::{Extent, ProjectionKind};

    fn texts(figure: &Figure) -> Vec<String> {
        figure
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn area() -> PlotArea {
        PlotArea {
            x: 100.0,
            y: 50.0,
            width: 500.0,
            height: 400.0,
        }
    }

    #[test]
    fn test_nice_ticks() {
        let (ticks, step) = nice_ticks(0.0, 10.0, 5);
        assert_eq!(step, 2.0);
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let (ticks, step) = nice_ticks(-0.33, 0.61, 5);
        assert!((step - 0.2).abs() < 1e-12);
        assert_eq!(ticks.len(), 5);

        assert!(nice_ticks(1.0, 1.0, 5).0.is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(4.0, 2.0), "4");
        assert_eq!(format_tick(0.4, 0.2), "0.4");
        assert_eq!(format_tick(-1e-17, 0.2), "0.0");
    }

    #[test]
    fn test_colorbar_labels() {
        let mut figure = Figure::new(800, 600).unwrap();
        let scale = ColorScale::new(0.0, 1.0, 100).unwrap();
        let palette = get_lut("jet").unwrap();
        colorbar(&mut figure, &area(), &scale, &palette, 12.0);

        let labels = texts(&figure);
        assert_eq!(labels.first().map(String::as_str), Some("0.00"));
        assert_eq!(labels.last().map(String::as_str), Some("1.00"));
        assert!(labels.len() <= MAX_COLORBAR_LABELS);

        // Swatches go bottom (low) to top (high)
        let x = (area().right() + COLORBAR_GAP + 5.0) as u32;
        let low = figure.raster().get_pixel(x, 445).0;
        let high = figure.raster().get_pixel(x, 55).0;
        assert!(low[2] > low[0]);
        assert!(high[0] > high[2]);
    }

    #[test]
    fn test_graticule_labels() {
        let mut figure = Figure::new(800, 600).unwrap();
        let extent = Extent::from_range([-80.0, -60.0, 30.0, 45.0]).unwrap();
        let map = MapContext::new(ProjectionKind::Cyl, extent).unwrap();
        let viewport = Viewport::new(area(), map.bounds(), true).unwrap();
        graticule(&mut figure, &viewport, &map, 12.0);

        let labels = texts(&figure);
        assert!(labels.contains(&"80.0\u{b0}W".to_string()));
        assert!(labels.contains(&"64.0\u{b0}W".to_string()));
        assert!(labels.contains(&"30.0\u{b0}N".to_string()));
        assert!(labels.contains(&"42.0\u{b0}N".to_string()));
        assert_eq!(labels.len(), 10);
    }

    #[test]
    fn test_title_size() {
        let mut figure = Figure::new(800, 600).unwrap();
        title(&mut figure, &area(), "SST", 12.0);
        match &figure.primitives()[0] {
            Primitive::Text { size, anchor, .. } => {
                assert_eq!(*size, 16.0);
                assert_eq!(*anchor, Anchor::Middle);
            }
            other => panic!("unexpected primitive {:?}", other),
        }
    }
}
