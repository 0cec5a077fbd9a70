//! Variable resolution and 2-D slice extraction.

use ndarray::{Array2, ArrayD, Axis, Ix2};
use std::path::Path;

use crate::error::{Result, TwodviewError};

/// The field to draw: an in-memory array or the name of a variable in a
/// data file.
#[derive(Debug, Clone)]
pub enum VarInput {
    Array(ArrayD<f32>),
    Name(String),
}

impl From<ArrayD<f32>> for VarInput {
    fn from(array: ArrayD<f32>) -> Self {
        VarInput::Array(array)
    }
}

impl From<Array2<f32>> for VarInput {
    fn from(array: Array2<f32>) -> Self {
        VarInput::Array(array.into_dyn())
    }
}

impl From<&str> for VarInput {
    fn from(name: &str) -> Self {
        VarInput::Name(name.to_string())
    }
}

/// Which 2-D slice to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeIndex {
    /// The variable has no time axis and is 2-D already
    Static,
    /// The variable is (time, row, column); draw this step. Negative steps
    /// count back from the last one.
    Step(i64),
}

impl TimeIndex {
    /// Convert the conventional integer form, where -1 means "no time axis"
    /// and any other value is a step.
    pub fn from_raw(index: i64) -> Self {
        match index {
            -1 => TimeIndex::Static,
            i => TimeIndex::Step(i),
        }
    }

    /// Rank the variable must have for this index.
    pub fn expected_rank(&self) -> usize {
        match self {
            TimeIndex::Static => 2,
            TimeIndex::Step(_) => 3,
        }
    }
}

/// Resolve a variable input into an array, reading from `filename` for
/// named variables.
pub fn resolve_variable(input: VarInput, filename: Option<&Path>) -> Result<ArrayD<f32>> {
    match (input, filename) {
        (VarInput::Array(array), None) => Ok(array),
        (VarInput::Array(_), Some(path)) => Err(TwodviewError::invalid(
            "filename",
            format!(
                "a variable name is required when loading from {}",
                path.display()
            ),
        )),
        (VarInput::Name(name), Some(path)) => load_named(path, &name),
        (VarInput::Name(name), None) => Err(TwodviewError::invalid(
            "filename",
            format!("variable {} given by name but no data file provided", name),
        )),
    }
}

#[cfg(feature = "netcdf")]
fn load_named(path: &Path, name: &str) -> Result<ArrayD<f32>> {
    crate::data_loader::load_variable(path, name)
}

#[cfg(not(feature = "netcdf"))]
fn load_named(path: &Path, name: &str) -> Result<ArrayD<f32>> {
    Err(TwodviewError::Config {
        message: format!(
            "cannot read {} from {}: built without the `netcdf` feature",
            name,
            path.display()
        ),
    })
}

/// Spatial shape (M, L) of the variable, after checking its rank.
pub fn spatial_shape(var: &ArrayD<f32>, time: TimeIndex) -> Result<(usize, usize)> {
    let expected = time.expected_rank();
    if var.ndim() != expected {
        return Err(TwodviewError::RankMismatch {
            expected,
            actual: var.ndim(),
        });
    }
    let shape = var.shape();
    Ok((shape[expected - 2], shape[expected - 1]))
}

/// Extract the 2-D field to draw.
pub fn extract_slice(var: &ArrayD<f32>, time: TimeIndex) -> Result<Array2<f64>> {
    spatial_shape(var, time)?;
    let slice = match time {
        TimeIndex::Static => var.view(),
        TimeIndex::Step(k) => {
            let steps = var.shape()[0];
            let resolved = if k < 0 { steps as i64 + k } else { k };
            if resolved < 0 || resolved >= steps as i64 {
                return Err(TwodviewError::IndexOutOfBounds {
                    param: "tindex".to_string(),
                    value: k,
                    max: steps.saturating_sub(1),
                });
            }
            let k = resolved as usize;
            var.index_axis(Axis(0), k)
        }
    };
    let field = slice.into_dimensionality::<Ix2>()?;
    Ok(field.mapv(|v| v as f64))
}

/// Mask land cells: NaN wherever `mask` is 0 or the value is not finite.
pub fn apply_mask(field: &Array2<f64>, mask: &Array2<f64>) -> Result<Array2<f64>> {
    if field.dim() != mask.dim() {
        return Err(TwodviewError::invalid(
            "mask",
            format!(
                "mask shape {:?} does not match field shape {:?}",
                mask.dim(),
                field.dim()
            ),
        ));
    }
    let mut masked = field.clone();
    masked.zip_mut_with(mask, |v, &m| {
        if m == 0.0 || !v.is_finite() {
            *v = f64::NAN;
        }
    });
    Ok(masked)
}

/// Min and max over the unmasked values.
pub fn finite_range(field: &Array2<f64>) -> Option<(f64, f64)> {
    field
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
