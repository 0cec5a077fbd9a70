//! # twodview
//!
//! Plot 2-D slices of ocean-model variables defined on a curvilinear
//! Arakawa C-grid.
//!
//! A variable given on any of the four staggered positions (rho, u, v, psi)
//! is matched to its coordinates by shape, land is masked, and the field is
//! drawn as shaded cells or filled contours on a map projection or on plain
//! lon/lat axes. Figures can be written as PNG, SVG or EPS.
//!
//! ## Architecture
//!
//! - **Grid layer**: C-grid coordinates and masks, loaded from NetCDF grid
//!   files directly or through a grid registry
//! - **Data layer**: variable slices, land masking and color scales
//! - **Rendering**: projections, rasterised layers, vector overlays and the
//!   PNG/SVG/EPS writers

pub mod colormaps;
pub mod config;
#[cfg(feature = "netcdf")]
pub mod data_loader;
pub mod error;
pub mod grid;
pub mod logging;
pub mod projection;
pub mod render;
pub mod scale;
pub mod twodview;
pub mod variable;

pub use config::{Config, PlotOptions};
pub use error::{Result, TwodviewError};
pub use grid::{CPosition, Grid, GridRef, GridRegistry, HGrid, VGrid};
pub use logging::{
    generate_render_id, init_tracing, log_error, log_operation_end, log_operation_start,
    log_plot_stats, log_timed_operation,
};
pub use projection::{Extent, MapContext, ProjectionKind};
pub use render::{Figure, OutputFormat};
pub use scale::ColorScale;
pub use twodview::{twodview, Plot};
pub use variable::{TimeIndex, VarInput};
