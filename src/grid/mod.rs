//! Curvilinear C-grid description.
//!
//! A grid carries longitude/latitude at the four staggered positions (rho
//! cell centers, u and v faces, psi corners) plus the cell vertices, and the
//! land masks that go with them. Mask value 1 is water, 0 is land.

pub mod position;
pub mod registry;

use ndarray::{s, Array2, ArrayView2};
use std::borrow::Cow;

use crate::error::{Result, TwodviewError};

pub use position::{CPosition, Coordinates};
pub use registry::{GridEntry, GridRegistry};

/// Horizontal grid arrays.
#[derive(Debug, Clone)]
pub struct HGrid {
    pub lon_rho: Array2<f64>,
    pub lat_rho: Array2<f64>,
    pub lon_u: Array2<f64>,
    pub lat_u: Array2<f64>,
    pub lon_v: Array2<f64>,
    pub lat_v: Array2<f64>,
    pub lon_psi: Array2<f64>,
    pub lat_psi: Array2<f64>,
    /// Cell vertices, shape (Mp+1, Lp+1)
    pub lon_vert: Array2<f64>,
    pub lat_vert: Array2<f64>,
    pub mask_rho: Array2<f64>,
    pub mask_u: Array2<f64>,
    pub mask_v: Array2<f64>,
    pub mask_psi: Array2<f64>,
}

/// The pieces a grid file may provide. Only the rho coordinates are
/// mandatory; everything else is derived when missing.
#[derive(Debug, Clone, Default)]
pub struct HGridParts {
    pub lon_rho: Array2<f64>,
    pub lat_rho: Array2<f64>,
    pub mask_rho: Option<Array2<f64>>,
    pub lon_u: Option<Array2<f64>>,
    pub lat_u: Option<Array2<f64>>,
    pub lon_v: Option<Array2<f64>>,
    pub lat_v: Option<Array2<f64>>,
    pub lon_psi: Option<Array2<f64>>,
    pub lat_psi: Option<Array2<f64>>,
    pub lon_vert: Option<Array2<f64>>,
    pub lat_vert: Option<Array2<f64>>,
    pub mask_u: Option<Array2<f64>>,
    pub mask_v: Option<Array2<f64>>,
    pub mask_psi: Option<Array2<f64>>,
}

impl HGrid {
    /// Build a grid from rho points only, deriving the staggered positions.
    pub fn from_rho(
        lon_rho: Array2<f64>,
        lat_rho: Array2<f64>,
        mask_rho: Option<Array2<f64>>,
    ) -> Result<Self> {
        Self::from_parts(HGridParts {
            lon_rho,
            lat_rho,
            mask_rho,
            ..Default::default()
        })
    }

    /// Build a grid from whatever a grid file provided.
    pub fn from_parts(parts: HGridParts) -> Result<Self> {
        let (mp, lp) = parts.lon_rho.dim();
        if mp < 2 || lp < 2 {
            return Err(TwodviewError::invalid(
                "grid",
                format!("rho grid must be at least 2x2, got {}x{}", mp, lp),
            ));
        }
        check_shape("lat_rho", &parts.lat_rho, (mp, lp))?;

        let mask_rho = parts
            .mask_rho
            .unwrap_or_else(|| Array2::from_elem((mp, lp), 1.0));
        check_shape("mask_rho", &mask_rho, (mp, lp))?;

        let lon_u = take_or("lon_u", parts.lon_u, (mp, lp - 1), || {
            average_columns(parts.lon_rho.view())
        })?;
        let lat_u = take_or("lat_u", parts.lat_u, (mp, lp - 1), || {
            average_columns(parts.lat_rho.view())
        })?;
        let lon_v = take_or("lon_v", parts.lon_v, (mp - 1, lp), || {
            average_rows(parts.lon_rho.view())
        })?;
        let lat_v = take_or("lat_v", parts.lat_v, (mp - 1, lp), || {
            average_rows(parts.lat_rho.view())
        })?;
        let lon_psi = take_or("lon_psi", parts.lon_psi, (mp - 1, lp - 1), || {
            average_rows(average_columns(parts.lon_rho.view()).view())
        })?;
        let lat_psi = take_or("lat_psi", parts.lat_psi, (mp - 1, lp - 1), || {
            average_rows(average_columns(parts.lat_rho.view()).view())
        })?;
        let lon_vert = take_or("lon_vert", parts.lon_vert, (mp + 1, lp + 1), || {
            vertices_from_centers(parts.lon_rho.view())
        })?;
        let lat_vert = take_or("lat_vert", parts.lat_vert, (mp + 1, lp + 1), || {
            vertices_from_centers(parts.lat_rho.view())
        })?;

        let mask_u = take_or("mask_u", parts.mask_u, (mp, lp - 1), || {
            &mask_rho.slice(s![.., ..-1]) * &mask_rho.slice(s![.., 1..])
        })?;
        let mask_v = take_or("mask_v", parts.mask_v, (mp - 1, lp), || {
            &mask_rho.slice(s![..-1, ..]) * &mask_rho.slice(s![1.., ..])
        })?;
        let mask_psi = take_or("mask_psi", parts.mask_psi, (mp - 1, lp - 1), || {
            &mask_u.slice(s![..-1, ..]) * &mask_u.slice(s![1.., ..])
        })?;

        Ok(Self {
            lon_rho: parts.lon_rho,
            lat_rho: parts.lat_rho,
            lon_u,
            lat_u,
            lon_v,
            lat_v,
            lon_psi,
            lat_psi,
            lon_vert,
            lat_vert,
            mask_rho,
            mask_u,
            mask_v,
            mask_psi,
        })
    }

    /// Shape (Mp, Lp) of the rho arrays.
    pub fn rho_shape(&self) -> (usize, usize) {
        self.lon_rho.dim()
    }
}

/// Vertical grid metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VGrid {
    /// Number of s-levels at rho points (Np)
    pub n_levels: usize,
}

/// A complete grid.
#[derive(Debug, Clone)]
pub struct Grid {
    pub name: String,
    pub hgrid: HGrid,
    pub vgrid: Option<VGrid>,
}

impl Grid {
    pub fn new(name: impl Into<String>, hgrid: HGrid, vgrid: Option<VGrid>) -> Self {
        Self {
            name: name.into(),
            hgrid,
            vgrid,
        }
    }

    /// Shape (Mp, Lp) of the center arrays.
    pub fn rho_shape(&self) -> (usize, usize) {
        self.hgrid.rho_shape()
    }
}

/// Either a grid object or an identifier to look up in a registry.
#[derive(Debug, Clone)]
pub enum GridRef<'a> {
    Grid(&'a Grid),
    Id(String),
}

impl<'a> GridRef<'a> {
    /// Resolve into a grid, loading it through the registry for identifiers.
    pub fn resolve(self, registry: Option<&GridRegistry>) -> Result<Cow<'a, Grid>> {
        match self {
            GridRef::Grid(grid) => Ok(Cow::Borrowed(grid)),
            GridRef::Id(id) => {
                let registry = registry.ok_or_else(|| TwodviewError::GridNotFound {
                    id: format!("{} (no grid registry configured)", id),
                })?;
                registry.load_grid(&id).map(Cow::Owned)
            }
        }
    }
}

impl<'a> From<&'a Grid> for GridRef<'a> {
    fn from(grid: &'a Grid) -> Self {
        GridRef::Grid(grid)
    }
}

impl From<&str> for GridRef<'_> {
    fn from(id: &str) -> Self {
        GridRef::Id(id.to_string())
    }
}

fn check_shape(name: &str, array: &Array2<f64>, expected: (usize, usize)) -> Result<()> {
    if array.dim() != expected {
        return Err(TwodviewError::invalid(
            name,
            format!("expected shape {:?}, got {:?}", expected, array.dim()),
        ));
    }
    Ok(())
}

fn take_or<F>(
    name: &str,
    given: Option<Array2<f64>>,
    expected: (usize, usize),
    derive: F,
) -> Result<Array2<f64>>
where
    F: FnOnce() -> Array2<f64>,
{
    match given {
        Some(array) => {
            check_shape(name, &array, expected)?;
            Ok(array)
        }
        None => Ok(derive()),
    }
}

/// Midpoints of horizontally adjacent points: (M, L) -> (M, L-1).
pub fn average_columns(a: ArrayView2<f64>) -> Array2<f64> {
    (&a.slice(s![.., ..-1]) + &a.slice(s![.., 1..])) * 0.5
}

/// Midpoints of vertically adjacent points: (M, L) -> (M-1, L).
pub fn average_rows(a: ArrayView2<f64>) -> Array2<f64> {
    (&a.slice(s![..-1, ..]) + &a.slice(s![1.., ..])) * 0.5
}

/// Cell vertices around center points: (M, L) -> (M+1, L+1).
///
/// The centers are padded by one linearly extrapolated row/column on every
/// side, and each vertex is the mean of the four padded centers around it.
pub fn vertices_from_centers(c: ArrayView2<f64>) -> Array2<f64> {
    let (m, l) = c.dim();
    let mut padded = Array2::<f64>::zeros((m + 2, l + 2));
    padded.slice_mut(s![1..=m, 1..=l]).assign(&c);

    for j in 1..=m {
        padded[[j, 0]] = 2.0 * padded[[j, 1]] - padded[[j, 2]];
        padded[[j, l + 1]] = 2.0 * padded[[j, l]] - padded[[j, l - 1]];
    }
    for i in 0..l + 2 {
        padded[[0, i]] = 2.0 * padded[[1, i]] - padded[[2, i]];
        padded[[m + 1, i]] = 2.0 * padded[[m, i]] - padded[[m - 1, i]];
    }

    average_rows(average_columns(padded.view()).view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn regular(m: usize, l: usize) -> (Array2<f64>, Array2<f64>) {
        let lon = Array2::from_shape_fn((m, l), |(_, i)| 10.0 + i as f64);
        let lat = Array2::from_shape_fn((m, l), |(j, _)| 40.0 + 0.5 * j as f64);
        (lon, lat)
    }

    #[test]
    fn test_derived_shapes() {
        let (lon, lat) = regular(4, 5);
        let grid = HGrid::from_rho(lon, lat, None).unwrap();
        assert_eq!(grid.lon_u.dim(), (4, 4));
        assert_eq!(grid.lat_v.dim(), (3, 5));
        assert_eq!(grid.lon_psi.dim(), (3, 4));
        assert_eq!(grid.lon_vert.dim(), (5, 6));
        assert_eq!(grid.mask_psi.dim(), (3, 4));
    }

    #[test]
    fn test_vertices_of_regular_grid() {
        let (lon, lat) = regular(3, 3);
        let grid = HGrid::from_rho(lon, lat, None).unwrap();
        // Vertices sit half a cell outside the outermost centers
        assert!((grid.lon_vert[[0, 0]] - 9.5).abs() < 1e-12);
        assert!((grid.lon_vert[[0, 3]] - 12.5).abs() < 1e-12);
        assert!((grid.lat_vert[[0, 0]] - 39.75).abs() < 1e-12);
        assert!((grid.lat_vert[[3, 0]] - 41.25).abs() < 1e-12);
        assert!((grid.lon_u[[1, 0]] - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_derived_masks() {
        let (lon, lat) = regular(3, 3);
        let mut mask = Array2::from_elem((3, 3), 1.0);
        mask[[1, 1]] = 0.0;
        let grid = HGrid::from_rho(lon, lat, Some(mask)).unwrap();
        assert_eq!(grid.mask_u[[1, 0]], 0.0);
        assert_eq!(grid.mask_u[[1, 1]], 0.0);
        assert_eq!(grid.mask_u[[0, 0]], 1.0);
        assert_eq!(grid.mask_v[[0, 1]], 0.0);
        assert_eq!(grid.mask_psi[[0, 0]], 0.0);
        assert!(grid.mask_psi.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_rejects_inconsistent_parts() {
        let (lon, lat) = regular(3, 4);
        let result = HGrid::from_parts(HGridParts {
            lon_rho: lon,
            lat_rho: lat,
            lon_u: Some(Array2::zeros((3, 4))),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(TwodviewError::InvalidParameter { ref param, .. }) if param == "lon_u"
        ));
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        let (lon, lat) = regular(1, 4);
        assert!(HGrid::from_rho(lon, lat, None).is_err());
    }

    #[test]
    fn test_grid_ref_without_registry() {
        let result = GridRef::from("NWA").resolve(None);
        assert!(matches!(result, Err(TwodviewError::GridNotFound { .. })));
    }
}
