//! Test data generation utilities.
//!
//! Synthetic C-grids with a known land corner, fields with a known value
//! pattern, and the same data written as ROMS-style NetCDF files.

use ndarray::{Array2, Array3, ArrayD};
use std::path::{Path, PathBuf};

use twodview::{Grid, HGrid};

/// Lon/lat box of the synthetic grids.
pub const LON_RANGE: (f64, f64) = (-80.0, -60.0);
pub const LAT_RANGE: (f64, f64) = (30.0, 45.0);
/// Rows and columns of the land block in the lower-left corner.
pub const LAND_CELLS: usize = 3;

pub fn rho_lon(mp: usize, lp: usize) -> Array2<f64> {
    Array2::from_shape_fn((mp, lp), |(_, j)| {
        LON_RANGE.0 + (LON_RANGE.1 - LON_RANGE.0) * j as f64 / (lp - 1) as f64
    })
}

pub fn rho_lat(mp: usize, lp: usize) -> Array2<f64> {
    Array2::from_shape_fn((mp, lp), |(i, _)| {
        LAT_RANGE.0 + (LAT_RANGE.1 - LAT_RANGE.0) * i as f64 / (mp - 1) as f64
    })
}

pub fn rho_mask(mp: usize, lp: usize) -> Array2<f64> {
    Array2::from_shape_fn((mp, lp), |(i, j)| {
        if i < LAND_CELLS && j < LAND_CELLS {
            0.0
        } else {
            1.0
        }
    })
}

/// Regular lon/lat grid of `mp` x `lp` rho points with a land corner.
pub fn synthetic_grid(mp: usize, lp: usize) -> Grid {
    let hgrid = HGrid::from_rho(rho_lon(mp, lp), rho_lat(mp, lp), Some(rho_mask(mp, lp)))
        .expect("valid synthetic grid");
    Grid::new("synthetic", hgrid, None)
}

/// (time, row, column) field where `var[k, i, j] = 100 k + i + j`.
pub fn tracer_series(steps: usize, m: usize, l: usize) -> ArrayD<f32> {
    Array3::from_shape_fn((steps, m, l), |(k, i, j)| (100 * k + i + j) as f32).into_dyn()
}

/// 2-D field `var[i, j] = i - j`.
pub fn tracer_static(m: usize, l: usize) -> ArrayD<f32> {
    Array2::from_shape_fn((m, l), |(i, j)| i as f32 - j as f32).into_dyn()
}

/// Write a registry file with one grid and return its path.
pub fn write_registry(dir: &Path, id: &str, grid_file: &str) -> PathBuf {
    let path = dir.join("grids.json");
    let mut grids = serde_json::Map::new();
    grids.insert(
        id.to_string(),
        serde_json::json!({ "file": grid_file, "name": format!("{} grid", id) }),
    );
    let content = serde_json::json!({ "grids": grids });
    std::fs::write(&path, content.to_string()).expect("write registry");
    path
}

#[cfg(feature = "netcdf")]
pub use self::nc::*;

#[cfg(feature = "netcdf")]
mod nc {
    use super::*;
    use netcdf::Error;

    type Result<T> = std::result::Result<T, Error>;

    /// Fill value used in history files.
    pub const FILL_VALUE: f32 = 1.0e37;

    fn flat(a: &Array2<f64>) -> Vec<f64> {
        a.iter().copied().collect()
    }

    /// Write a grid file holding only rho coordinates and mask.
    pub fn create_grid_nc(path: &Path, mp: usize, lp: usize) -> Result<()> {
        let mut file = netcdf::create(path)?;
        file.add_dimension("eta_rho", mp)?;
        file.add_dimension("xi_rho", lp)?;
        file.add_dimension("s_rho", 4)?;
        file.add_attribute("title", "twodview test grid")?;

        for (name, values, units) in [
            ("lon_rho", flat(&rho_lon(mp, lp)), "degree_east"),
            ("lat_rho", flat(&rho_lat(mp, lp)), "degree_north"),
            ("mask_rho", flat(&rho_mask(mp, lp)), "nondimensional"),
        ] {
            let mut var = file.add_variable::<f64>(name, &["eta_rho", "xi_rho"])?;
            var.put_attribute("units", units)?;
            var.put_values(&values, ..)?;
        }
        Ok(())
    }

    /// Write a history file with `temp` (time, eta_rho, xi_rho) following
    /// [`tracer_series`], with land set to the fill value.
    pub fn create_history_nc(path: &Path, steps: usize, mp: usize, lp: usize) -> Result<()> {
        let mut file = netcdf::create(path)?;
        file.add_dimension("ocean_time", steps)?;
        file.add_dimension("eta_rho", mp)?;
        file.add_dimension("xi_rho", lp)?;

        let series = tracer_series(steps, mp, lp);
        let mask = rho_mask(mp, lp);
        let values: Vec<f32> = series
            .indexed_iter()
            .map(|(idx, &v)| {
                if mask[[idx[1], idx[2]]] == 0.0 {
                    FILL_VALUE
                } else {
                    v
                }
            })
            .collect();

        let mut var = file.add_variable::<f32>("temp", &["ocean_time", "eta_rho", "xi_rho"])?;
        var.put_attribute("_FillValue", FILL_VALUE)?;
        var.put_attribute("units", "Celsius")?;
        var.put_values(&values, ..)?;
        Ok(())
    }
}
