//! Filled layers: shaded cells and filled contours.
//!
//! Both are drawn by splitting each grid quad into two triangles and
//! scanning the pixels whose centers fall inside them.

use image::{Rgba, RgbaImage};
use ndarray::Array2;

use super::Viewport;
use crate::colormaps::Colormap;
use crate::error::{Result, TwodviewError};
use crate::scale::ColorScale;

type Px = (f64, f64);

/// Call `f(x, y, weights)` for every pixel whose center lies in the
/// triangle, with the barycentric weights of the three vertices.
fn scan_triangle<F>(width: u32, height: u32, tri: [Px; 3], mut f: F)
where
    F: FnMut(u32, u32, [f64; 3]),
{
    let [a, b, c] = tri;
    let area = edge(a, b, c);
    if area.abs() < 1e-12 || !area.is_finite() {
        return;
    }

    let x_lo = a.0.min(b.0).min(c.0).floor().max(0.0);
    let x_hi = a.0.max(b.0).max(c.0).ceil().min(width as f64);
    let y_lo = a.1.min(b.1).min(c.1).floor().max(0.0);
    let y_hi = a.1.max(b.1).max(c.1).ceil().min(height as f64);
    if x_lo >= x_hi || y_lo >= y_hi {
        return;
    }

    for py in y_lo as u32..y_hi as u32 {
        for px in x_lo as u32..x_hi as u32 {
            let p = (px as f64 + 0.5, py as f64 + 0.5);
            let w0 = edge(b, c, p) / area;
            let w1 = edge(c, a, p) / area;
            let w2 = edge(a, b, p) / area;
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                f(px, py, [w0, w1, w2]);
            }
        }
    }
}

fn edge(a: Px, b: Px, p: Px) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Pixel positions of the coordinate arrays.
fn to_pixels(viewport: &Viewport, x: &Array2<f64>, y: &Array2<f64>) -> Array2<Px> {
    let mut out = Array2::from_elem(x.dim(), (f64::NAN, f64::NAN));
    for ((idx, &xv), &yv) in x.indexed_iter().zip(y.iter()) {
        if xv.is_finite() && yv.is_finite() {
            out[idx] = viewport.to_pixel(xv, yv);
        }
    }
    out
}

fn finite(p: Px) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

/// Flat-shade the quads of a corner grid. Cell (i, j) spans corners
/// (i, j) to (i + 1, j + 1) and is colored by `color(values[[i, j]])`;
/// cells for which `color` returns `None` are left untouched. When
/// `values` has the same shape as the corners, the last row and column are
/// not drawn.
pub fn shade_cells<F>(
    image: &mut RgbaImage,
    viewport: &Viewport,
    x: &Array2<f64>,
    y: &Array2<f64>,
    values: &Array2<f64>,
    color: F,
) -> Result<()>
where
    F: Fn(f64) -> Option<Rgba<u8>>,
{
    let (rows, cols) = x.dim();
    if y.dim() != x.dim() || rows < 2 || cols < 2 {
        return Err(TwodviewError::ImageGeneration {
            message: format!("bad corner arrays {:?} / {:?}", x.dim(), y.dim()),
        });
    }
    let (vr, vc) = values.dim();
    if vr < rows - 1 || vc < cols - 1 {
        return Err(TwodviewError::ImageGeneration {
            message: format!(
                "{}x{} values do not cover {}x{} cells",
                vr,
                vc,
                rows - 1,
                cols - 1
            ),
        });
    }

    let pixels = to_pixels(viewport, x, y);
    let (width, height) = image.dimensions();

    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let Some(rgba) = color(values[[i, j]]) else {
                continue;
            };
            let quad = [
                pixels[[i, j]],
                pixels[[i, j + 1]],
                pixels[[i + 1, j + 1]],
                pixels[[i + 1, j]],
            ];
            if !quad.iter().all(|&p| finite(p)) {
                continue;
            }
            for tri in [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]] {
                scan_triangle(width, height, tri, |px, py, _| {
                    image.put_pixel(px, py, rgba);
                });
            }
        }
    }

    Ok(())
}

/// Color for a value on the data scale, `None` for masked values.
pub fn scale_color<'a>(
    scale: &'a ColorScale,
    palette: &'a dyn Colormap,
) -> impl Fn(f64) -> Option<Rgba<u8>> + 'a {
    move |v| scale.normalize(v).map(|t| Rgba(palette.map_normalized(t)))
}

/// Filled contours of a field given at grid nodes. Inside each quad the
/// field is interpolated linearly over two triangles and each pixel takes
/// the color of the band its value falls in. Quads touching a masked node
/// and values outside the scale are left untouched.
pub fn contourf(
    image: &mut RgbaImage,
    viewport: &Viewport,
    x: &Array2<f64>,
    y: &Array2<f64>,
    field: &Array2<f64>,
    scale: &ColorScale,
    palette: &dyn Colormap,
) -> Result<()> {
    let (rows, cols) = field.dim();
    if x.dim() != field.dim() || y.dim() != field.dim() {
        return Err(TwodviewError::ImageGeneration {
            message: format!(
                "coordinates {:?} do not match field {:?}",
                x.dim(),
                field.dim()
            ),
        });
    }
    if rows < 2 || cols < 2 {
        return Ok(());
    }

    let pixels = to_pixels(viewport, x, y);
    let (width, height) = image.dimensions();

    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let corners = [[i, j], [i, j + 1], [i + 1, j + 1], [i + 1, j]];
            let values = corners.map(|c| field[c]);
            let quad = corners.map(|c| pixels[c]);
            if values.iter().any(|v| v.is_nan()) || !quad.iter().all(|&p| finite(p)) {
                continue;
            }

            for (tri, vals) in [
                ([quad[0], quad[1], quad[2]], [values[0], values[1], values[2]]),
                ([quad[0], quad[2], quad[3]], [values[0], values[2], values[3]]),
            ] {
                scan_triangle(width, height, tri, |px, py, w| {
                    let v = w[0] * vals[0] + w[1] * vals[1] + w[2] * vals[2];
                    if let Some(t) = scale.normalize_within(v) {
                        image.put_pixel(px, py, Rgba(palette.map_normalized(t)));
                    }
                });
            }
        }
    }

    Ok(())
}
