//! NetCDF data loading functionality.
//!
//! Reads ROMS-style grid files into a [`Grid`] and single variables into
//! in-memory arrays. Packed variables are unpacked (`scale_factor`,
//! `add_offset`) and fill values become NaN.

use ndarray::{Array2, ArrayD, IxDyn};
use netcdf::{AttributeValue as NcAttributeValue, Variable as NetCDFVariable};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Result, TwodviewError};
use crate::grid::{Grid, HGrid, HGridParts, VGrid};

/// Load a grid file.
///
/// `lon_rho`/`lat_rho` are required. Staggered coordinates, vertices and
/// masks are read when present and derived otherwise.
pub fn load_grid(path: &Path, name: Option<&str>) -> Result<Grid> {
    let file = open(path)?;

    let lon_rho = read_array2(&file, "lon_rho")?;
    let lat_rho = read_array2(&file, "lat_rho")?;

    let parts = HGridParts {
        lon_rho,
        lat_rho,
        mask_rho: read_optional_array2(&file, "mask_rho")?,
        lon_u: read_optional_array2(&file, "lon_u")?,
        lat_u: read_optional_array2(&file, "lat_u")?,
        lon_v: read_optional_array2(&file, "lon_v")?,
        lat_v: read_optional_array2(&file, "lat_v")?,
        lon_psi: read_optional_array2(&file, "lon_psi")?,
        lat_psi: read_optional_array2(&file, "lat_psi")?,
        lon_vert: read_optional_array2(&file, "lon_vert")?,
        lat_vert: read_optional_array2(&file, "lat_vert")?,
        mask_u: read_optional_array2(&file, "mask_u")?,
        mask_v: read_optional_array2(&file, "mask_v")?,
        mask_psi: read_optional_array2(&file, "mask_psi")?,
    };
    let hgrid = HGrid::from_parts(parts)?;

    let vgrid = file
        .dimension("s_rho")
        .map(|dim| VGrid { n_levels: dim.len() });

    let grid_name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "grid".to_string()),
    };

    let (mp, lp) = hgrid.rho_shape();
    info!(
        grid = %grid_name,
        path = %path.display(),
        mp = mp,
        lp = lp,
        n_levels = vgrid.map(|v| v.n_levels).unwrap_or(0),
        "Loaded grid"
    );

    Ok(Grid::new(grid_name, hgrid, vgrid))
}

/// Load one variable from a NetCDF file as `f32`, NaN where missing.
pub fn load_variable(path: &Path, name: &str) -> Result<ArrayD<f32>> {
    let file = open(path)?;
    let var = file
        .variable(name)
        .ok_or_else(|| TwodviewError::DataNotFound {
            message: format!("Variable {} not found in {}", name, path.display()),
        })?;

    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let raw: Vec<f64> = var.get_values::<f64, _>(..)?;
    let packing = Packing::from_variable(&var);

    debug!(
        var = name,
        shape = ?shape,
        scale_factor = packing.scale_factor,
        add_offset = packing.add_offset,
        fill_value = ?packing.fill_value,
        "Read variable"
    );

    let values: Vec<f32> = raw.into_iter().map(|v| packing.unpack(v) as f32).collect();
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), values)?)
}

fn open(path: &Path) -> Result<netcdf::File> {
    if !path.exists() {
        return Err(TwodviewError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }
    let file = netcdf::open(path)?;
    debug!("Opened NetCDF file: {}", path.display());
    Ok(file)
}

fn read_optional_array2(file: &netcdf::File, name: &str) -> Result<Option<Array2<f64>>> {
    if file.variable(name).is_none() {
        return Ok(None);
    }
    read_array2(file, name).map(Some)
}

fn read_array2(file: &netcdf::File, name: &str) -> Result<Array2<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| TwodviewError::DataNotFound {
            message: format!("Grid variable {} not found", name),
        })?;

    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    if dims.len() != 2 {
        return Err(TwodviewError::DataNotFound {
            message: format!("Grid variable {} must be 2D, has shape {:?}", name, dims),
        });
    }

    let values: Vec<f64> = var.get_values::<f64, _>(..)?;
    Ok(Array2::from_shape_vec((dims[0], dims[1]), values)?)
}

/// Packing and missing-value attributes of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Packing {
    scale_factor: f64,
    add_offset: f64,
    fill_value: Option<f64>,
}

impl Packing {
    fn from_variable(var: &NetCDFVariable) -> Self {
        let scalar = |attr: &str| -> Option<f64> {
            let value = var.attribute(attr)?.value().ok()?;
            let number = attribute_number(&value);
            if number.is_none() {
                warn!(attribute = attr, "Ignoring non-numeric attribute");
            }
            number
        };

        Self {
            scale_factor: scalar("scale_factor").unwrap_or(1.0),
            add_offset: scalar("add_offset").unwrap_or(0.0),
            fill_value: scalar("_FillValue").or_else(|| scalar("missing_value")),
        }
    }

    fn unpack(&self, raw: f64) -> f64 {
        if !raw.is_finite() {
            return f64::NAN;
        }
        if let Some(fill) = self.fill_value {
            if raw == fill || (fill.abs() > 1e30 && (raw - fill).abs() <= fill.abs() * 1e-6) {
                return f64::NAN;
            }
        }
        raw * self.scale_factor + self.add_offset
    }
}

fn attribute_number(value: &NcAttributeValue) -> Option<f64> {
    match value {
        NcAttributeValue::Uchar(v) => Some(*v as f64),
        NcAttributeValue::Schar(v) => Some(*v as f64),
        NcAttributeValue::Short(v) => Some(*v as f64),
        NcAttributeValue::Ushort(v) => Some(*v as f64),
        NcAttributeValue::Int(v) => Some(*v as f64),
        NcAttributeValue::Uint(v) => Some(*v as f64),
        NcAttributeValue::Float(v) => Some(*v as f64),
        NcAttributeValue::Double(v) => Some(*v),
        NcAttributeValue::Floats(v) => v.first().map(|x| *x as f64),
        NcAttributeValue::Doubles(v) => v.first().copied(),
        _ => None,
    }
}
