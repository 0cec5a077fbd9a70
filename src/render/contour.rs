//! Contour line (isoline) extraction with marching squares, and the
//! land/water boundary of a grid.
//!
//! Contours are traced in grid index space, where a point is a fractional
//! (row, column) position, and only then mapped through the coordinate
//! arrays. That keeps the algorithm independent of the projection.

use ndarray::Array2;
use std::collections::HashMap;

/// A point in grid index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub row: f64,
    pub col: f64,
}

impl Point {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Marching squares for one level. Cells touching a NaN are skipped, so
/// lines stop at masked cells.
pub fn march_squares(field: &Array2<f64>, level: f64) -> Vec<Segment> {
    let (rows, cols) = field.dim();
    if rows < 2 || cols < 2 {
        return vec![];
    }

    let mut segments = Vec::new();

    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let tl = field[[r, c]];
            let tr = field[[r, c + 1]];
            let bl = field[[r + 1, c]];
            let br = field[[r + 1, c + 1]];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0u8;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            segments.extend(cell_segments(
                cell_index,
                r as f64,
                c as f64,
                [tl, tr, br, bl],
                level,
            ));
        }
    }

    segments
}

/// Segments for one cell from the marching squares lookup. Saddles are
/// resolved with the cell-center average.
fn cell_segments(
    cell_index: u8,
    r: f64,
    c: f64,
    [tl, tr, br, bl]: [f64; 4],
    level: f64,
) -> Vec<Segment> {
    let top = interpolate_edge(Point::new(r, c), Point::new(r, c + 1.0), tl, tr, level);
    let right = interpolate_edge(
        Point::new(r, c + 1.0),
        Point::new(r + 1.0, c + 1.0),
        tr,
        br,
        level,
    );
    let bottom = interpolate_edge(
        Point::new(r + 1.0, c),
        Point::new(r + 1.0, c + 1.0),
        bl,
        br,
        level,
    );
    let left = interpolate_edge(Point::new(r, c), Point::new(r + 1.0, c), tl, bl, level);

    let seg = |start, end| Segment { start, end };
    let center_above = (tl + tr + br + bl) / 4.0 >= level;

    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![seg(left, top)],
        2 | 13 => vec![seg(top, right)],
        3 | 12 => vec![seg(left, right)],
        4 | 11 => vec![seg(right, bottom)],
        6 | 9 => vec![seg(top, bottom)],
        7 | 8 => vec![seg(left, bottom)],
        // tl and br above
        5 if center_above => vec![seg(left, bottom), seg(top, right)],
        5 => vec![seg(left, top), seg(right, bottom)],
        // tr and bl above
        10 if center_above => vec![seg(left, top), seg(right, bottom)],
        10 => vec![seg(top, right), seg(left, bottom)],
        _ => vec![],
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(p1: Point, p2: Point, val1: f64, val2: f64, level: f64) -> Point {
    if (val2 - val1).abs() < f64::EPSILON {
        return Point::new((p1.row + p2.row) / 2.0, (p1.col + p2.col) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);
    Point::new(
        p1.row + t * (p2.row - p1.row),
        p1.col + t * (p2.col - p1.col),
    )
}

/// Endpoint key; marching squares produces bit-identical shared endpoints
/// so a coarse quantisation is enough.
fn key(p: Point) -> (i64, i64) {
    ((p.row * 1e6).round() as i64, (p.col * 1e6).round() as i64)
}

/// Connect line segments into continuous polylines
pub fn connect_segments(segments: &[Segment], level: f64) -> Vec<Contour> {
    let mut by_endpoint: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        by_endpoint.entry(key(s.start)).or_default().push(i);
        by_endpoint.entry(key(s.end)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    // Follow unused segments from `tip`, appending points to `points`
    let extend = |points: &mut Vec<Point>, used: &mut Vec<bool>, mut tip: Point| loop {
        let next = by_endpoint
            .get(&key(tip))
            .and_then(|ids| ids.iter().copied().find(|&i| !used[i]));
        let Some(i) = next else { break };
        used[i] = true;
        let s = segments[i];
        tip = if key(s.start) == key(tip) { s.end } else { s.start };
        points.push(tip);
    };

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let seed = segments[start];

        let mut forward = vec![seed.start, seed.end];
        extend(&mut forward, &mut used, seed.end);

        let mut backward = Vec::new();
        extend(&mut backward, &mut used, seed.start);

        backward.reverse();
        backward.extend(forward);
        let points = backward;

        let closed = points.len() > 2
            && key(points[0]) == key(points[points.len() - 1]);
        contours.push(Contour {
            level,
            points,
            closed,
        });
    }

    contours
}

/// Contours of `field` at each level.
pub fn contour_lines(field: &Array2<f64>, levels: &[f64]) -> Vec<Contour> {
    levels
        .iter()
        .flat_map(|&level| connect_segments(&march_squares(field, level), level))
        .collect()
}

/// Position of a grid-space point in the coordinate arrays, by bilinear
/// interpolation between the surrounding nodes.
pub fn locate(x: &Array2<f64>, y: &Array2<f64>, p: Point) -> (f64, f64) {
    let (rows, cols) = x.dim();
    let r0 = (p.row.floor() as usize).min(rows.saturating_sub(2));
    let c0 = (p.col.floor() as usize).min(cols.saturating_sub(2));
    let (fr, fc) = (p.row - r0 as f64, p.col - c0 as f64);

    let bilinear = |a: &Array2<f64>| {
        let top = a[[r0, c0]] * (1.0 - fc) + a[[r0, c0 + 1]] * fc;
        let bottom = a[[r0 + 1, c0]] * (1.0 - fc) + a[[r0 + 1, c0 + 1]] * fc;
        top * (1.0 - fr) + bottom * fr
    };

    (bilinear(x), bilinear(y))
}

/// Cell edges separating water from land, as pairs of vertex indices
/// `((row, col), (row, col))`. `mask` has one entry per cell; its vertices
/// form a grid one larger in each direction. Edges along the grid border
/// are not included.
pub fn coastline_edges(mask: &Array2<f64>) -> Vec<((usize, usize), (usize, usize))> {
    let (rows, cols) = mask.dim();
    let water = |r: usize, c: usize| mask[[r, c]] != 0.0;
    let mut edges = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            // Shared edge with the cell to the right
            if c + 1 < cols && water(r, c) != water(r, c + 1) {
                edges.push(((r, c + 1), (r + 1, c + 1)));
            }
            // Shared edge with the cell below
            if r + 1 < rows && water(r, c) != water(r + 1, c) {
                edges.push(((r + 1, c), (r + 1, c + 1)));
            }
        }
    }

    edges
}
