//! Draw a 2-D slice of a C-grid variable.
//!
//! [`twodview`] resolves the grid and the variable, works out which
//! staggered position the variable lives on, masks land and draws the
//! figure, optionally on a map projection. The figure and the projection
//! context are handed back so callers can keep drawing on them.

use image::{Rgba, RgbaImage};
use ndarray::Array2;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::colormaps::{get_lut, Colormap};
use crate::config::PlotOptions;
use crate::error::{Result, TwodviewError};
use crate::grid::{CPosition, GridRef, GridRegistry};
use crate::logging::{
    log_error, log_operation_end, log_operation_start, log_plot_stats, log_timed_operation,
};
use crate::projection::{Extent, MapContext};
use crate::render::contour::{coastline_edges, contour_lines, locate};
use crate::render::raster::{contourf, scale_color, shade_cells};
use crate::render::{decor, Figure, OutputFormat, PlotArea, Viewport, BLACK, LAND_GRAY};
use crate::scale::ColorScale;
use crate::variable::{
    apply_mask, extract_slice, finite_range, resolve_variable, spatial_shape, TimeIndex, VarInput,
};

/// Underlay palette floor: land (0) maps to 2/3 gray, water (1) to white.
const UNDERLAY_VMIN: f32 = -2.0;
const COASTLINE_WIDTH: f64 = 1.0;
const CONTOUR_WIDTH: f64 = 0.5;

/// Result of a plot.
#[derive(Debug, Clone)]
pub struct Plot {
    pub figure: Figure,
    /// Projection the figure was drawn in; `None` for plain lon/lat axes
    pub map: Option<MapContext>,
    /// Staggered position the variable was drawn at
    pub position: CPosition,
    pub scale: ColorScale,
    /// Axis limits forced by `range` in plain-axis mode
    pub axis_limits: Option<[f64; 4]>,
    /// Output path skipped because its extension is not png, svg or eps
    pub ignored_outfile: Option<PathBuf>,
}

/// Plot a 2-D slice of `var` on `grid`.
///
/// `time` selects the slice of a (time, row, column) variable, or
/// [`TimeIndex::Static`] for a variable that is 2-D already. Grid
/// identifiers are looked up in `registry`.
pub fn twodview(
    var: VarInput,
    time: TimeIndex,
    grid: GridRef<'_>,
    registry: Option<&GridRegistry>,
    options: &PlotOptions,
) -> Result<Plot> {
    if options.contour && !options.fill {
        return Err(TwodviewError::ContourRequiresFill);
    }

    let start = Instant::now();
    let details = match &var {
        VarInput::Name(name) => format!("variable={} time={:?}", name, time),
        VarInput::Array(array) => format!("array{:?} time={:?}", array.shape(), time),
    };
    log_operation_start("twodview", Some(&details));

    let result = run(var, time, grid, registry, options);
    if let Err(e) = &result {
        log_error(e, "twodview");
    }
    log_operation_end("twodview", start, result.is_ok());
    result
}

fn run(
    var: VarInput,
    time: TimeIndex,
    grid: GridRef<'_>,
    registry: Option<&GridRegistry>,
    options: &PlotOptions,
) -> Result<Plot> {
    options.validate()?;

    let grid = grid.resolve(registry)?;
    let var_name = match &var {
        VarInput::Name(name) => name.clone(),
        VarInput::Array(_) => "<array>".to_string(),
    };
    let var = resolve_variable(var, options.filename.as_deref())?;

    let position = CPosition::resolve(spatial_shape(&var, time)?, grid.rho_shape())?;
    debug!(grid = %grid.name, position = %position, "Resolved grid position");

    let coords = grid.hgrid.coordinates(position, options.fill);
    let field = apply_mask(&extract_slice(&var, time)?, &coords.mask)?;

    let scale = ColorScale::from_data(&field, options.cmin, options.cmax, options.clev)?;
    let palette = get_lut(&options.pal)?;
    log_plot_stats(
        &var_name,
        position.name(),
        field.dim(),
        finite_range(&field),
        (scale.cmin, scale.cmax),
        scale.clev,
    );

    let extent = match options.range {
        Some(range) => Extent::from_range(range)?,
        None => Extent::from_coords(&coords.lon, &coords.lat)?,
    };
    let map = options
        .proj
        .map(|kind| MapContext::new(kind, extent))
        .transpose()?;

    let mut figure = Figure::new(options.width, options.height)?;
    let available = PlotArea::layout(&figure, options.clb, options.title.is_some(), options.fts);
    let (x, y) = to_plot_coords(map.as_ref(), &coords.lon, &coords.lat)?;
    let viewport = match &map {
        Some(map) => Viewport::new(available, map.bounds(), true)?,
        None => Viewport::new(
            available,
            (extent.lon_min, extent.lon_max, extent.lat_min, extent.lat_max),
            false,
        )?,
    };
    let area = viewport.area();

    // Underlay and data share one layer, clipped to the plot area
    let mut layer = RgbaImage::from_pixel(figure.width(), figure.height(), Rgba([0, 0, 0, 0]));
    let (x_vert, y_vert) = to_plot_coords(map.as_ref(), &grid.hgrid.lon_vert, &grid.hgrid.lat_vert)?;
    // Shaded cells sit on the underlay's own cells; filled contours on rho cells
    let (ux, uy, umask) = if coords.corners {
        (&x, &y, &coords.mask)
    } else {
        (&x_vert, &y_vert, &grid.hgrid.mask_rho)
    };
    draw_underlay(
        &mut layer,
        &viewport,
        (ux, uy),
        umask,
        options.fill_land && map.is_some(),
    )?;

    if options.fill {
        contourf(&mut layer, &viewport, &x, &y, &field, &scale, &palette)?;
    } else {
        shade_cells(&mut layer, &viewport, &x, &y, &field, scale_color(&scale, &palette))?;
    }
    composite(figure.raster_mut(), &layer, &area);

    draw_coastline(&mut figure, &viewport, &grid.hgrid.mask_rho, &x_vert, &y_vert);

    if options.clb {
        decor::colorbar(&mut figure, &area, &scale, &palette, options.fts);
    }

    if options.contour {
        let levels = scale.contour_levels(options.d)?;
        draw_contours(&mut figure, &viewport, &field, &x, &y, &levels);
    }

    if let Some(title) = &options.title {
        decor::title(&mut figure, &area, title, options.fts);
    }

    let axis_limits = match &map {
        Some(map) => {
            decor::graticule(&mut figure, &viewport, map, options.fts);
            None
        }
        None => {
            decor::plain_axes(&mut figure, &viewport, options.fts);
            options.range
        }
    };
    decor::frame(&mut figure, &area);

    let mut ignored_outfile = None;
    if let Some(path) = &options.outfile {
        match OutputFormat::from_path(path) {
            Some(format) => {
                info!(path = %path.display(), format = %format, "Write figure to file");
                log_timed_operation("write_figure", || figure.save(path, format))?;
            }
            None => {
                warn!(
                    path = %path.display(),
                    "Unrecognized file extension. Please use .png, .svg or .eps"
                );
                ignored_outfile = Some(path.clone());
            }
        }
    }

    Ok(Plot {
        figure,
        map,
        position,
        scale,
        axis_limits,
        ignored_outfile,
    })
}

/// Coordinates in the plot's data space: projected meters on a map, plain
/// lon/lat otherwise.
fn to_plot_coords(
    map: Option<&MapContext>,
    lon: &Array2<f64>,
    lat: &Array2<f64>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    match map {
        Some(map) => map.project_array(lon, lat),
        None => Ok((lon.clone(), lat.clone())),
    }
}

/// Land cells in solid gray, or the whole mask through the gray palette.
fn draw_underlay(
    layer: &mut RgbaImage,
    viewport: &Viewport,
    (x, y): (&Array2<f64>, &Array2<f64>),
    mask: &Array2<f64>,
    fill_land: bool,
) -> Result<()> {
    if fill_land {
        return shade_cells(layer, viewport, x, y, mask, |m| (m == 0.0).then_some(LAND_GRAY));
    }

    let gray = get_lut("gray")?;
    shade_cells(layer, viewport, x, y, mask, |m| {
        Some(Rgba(gray.map(m as f32, UNDERLAY_VMIN, 1.0)))
    })
}

/// Copy the opaque pixels of `layer` that fall inside `area`.
fn composite(target: &mut RgbaImage, layer: &RgbaImage, area: &PlotArea) {
    let x0 = area.x.floor().max(0.0) as u32;
    let y0 = area.y.floor().max(0.0) as u32;
    let x1 = (area.right().ceil() as u32).min(target.width());
    let y1 = (area.bottom().ceil() as u32).min(target.height());

    for py in y0..y1 {
        for px in x0..x1 {
            let pixel = layer.get_pixel(px, py);
            if pixel.0[3] > 0 {
                target.put_pixel(px, py, *pixel);
            }
        }
    }
}

fn draw_coastline(
    figure: &mut Figure,
    viewport: &Viewport,
    mask: &Array2<f64>,
    x_vert: &Array2<f64>,
    y_vert: &Array2<f64>,
) {
    let area = viewport.area();
    for (a, b) in coastline_edges(mask) {
        let points = vec![
            viewport.to_pixel(x_vert[a], y_vert[a]),
            viewport.to_pixel(x_vert[b], y_vert[b]),
        ];
        decor::draw_clipped(figure, points, &area, BLACK, COASTLINE_WIDTH);
    }
}

fn draw_contours(
    figure: &mut Figure,
    viewport: &Viewport,
    field: &Array2<f64>,
    x: &Array2<f64>,
    y: &Array2<f64>,
    levels: &[f64],
) {
    let area = viewport.area();
    let contours = contour_lines(field, levels);
    debug!(levels = levels.len(), lines = contours.len(), "Traced contours");

    for contour in contours {
        let points = contour
            .points
            .iter()
            .map(|&p| {
                let (px, py) = locate(x, y, p);
                viewport.to_pixel(px, py)
            })
            .collect();
        decor::draw_clipped(figure, points, &area, BLACK, CONTOUR_WIDTH);
    }
}
