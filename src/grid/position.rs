//! Staggered position inference.
//!
//! A 2-D field lives on exactly one of the four C-grid positions; which one
//! follows from comparing its shape with the rho shape (Mp, Lp).

use ndarray::Array2;
use std::fmt;

use super::{average_columns, average_rows, HGrid};
use crate::error::{Result, TwodviewError};

/// Position of a variable on the C-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CPosition {
    /// Cell centers, shape (Mp, Lp)
    Rho,
    /// x-faces, shape (Mp, Lp-1)
    U,
    /// y-faces, shape (Mp-1, Lp)
    V,
    /// Cell corners, shape (Mp-1, Lp-1)
    Psi,
}

impl CPosition {
    /// Infer the position from the variable's spatial shape (M, L).
    pub fn resolve(var_shape: (usize, usize), grid_shape: (usize, usize)) -> Result<Self> {
        let (m, l) = var_shape;
        let (mp, lp) = grid_shape;

        if m == mp && l == lp {
            Ok(CPosition::Rho)
        } else if m == mp && l + 1 == lp {
            Ok(CPosition::U)
        } else if m + 1 == mp && l == lp {
            Ok(CPosition::V)
        } else if m + 1 == mp && l + 1 == lp {
            Ok(CPosition::Psi)
        } else {
            Err(TwodviewError::GridPositionMismatch {
                var_shape,
                grid_shape,
            })
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CPosition::Rho => "rho",
            CPosition::U => "u",
            CPosition::V => "v",
            CPosition::Psi => "psi",
        }
    }
}

impl fmt::Display for CPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coordinates and mask selected for one position.
#[derive(Debug, Clone)]
pub struct Coordinates {
    pub lon: Array2<f64>,
    pub lat: Array2<f64>,
    pub mask: Array2<f64>,
    /// True when `lon`/`lat` are cell corners, one larger than the field in
    /// each direction; false when they sit on the field's own points.
    pub corners: bool,
}

impl HGrid {
    /// Select the coordinates used to draw a field at `position`.
    ///
    /// Filled contours need the field's own points; shaded cells need the
    /// corners around each value.
    pub fn coordinates(&self, position: CPosition, fill: bool) -> Coordinates {
        let (lon, lat, mask) = match (position, fill) {
            (CPosition::Rho, true) => (
                self.lon_rho.clone(),
                self.lat_rho.clone(),
                &self.mask_rho,
            ),
            (CPosition::Rho, false) => (
                self.lon_vert.clone(),
                self.lat_vert.clone(),
                &self.mask_rho,
            ),
            (CPosition::U, true) => (self.lon_u.clone(), self.lat_u.clone(), &self.mask_u),
            (CPosition::U, false) => (
                average_columns(self.lon_vert.view()),
                average_columns(self.lat_vert.view()),
                &self.mask_u,
            ),
            (CPosition::V, true) => (self.lon_v.clone(), self.lat_v.clone(), &self.mask_v),
            (CPosition::V, false) => (
                average_rows(self.lon_vert.view()),
                average_rows(self.lat_vert.view()),
                &self.mask_v,
            ),
            (CPosition::Psi, true) => (
                self.lon_psi.clone(),
                self.lat_psi.clone(),
                &self.mask_psi,
            ),
            (CPosition::Psi, false) => (
                self.lon_rho.clone(),
                self.lat_rho.clone(),
                &self.mask_psi,
            ),
        };

        Coordinates {
            lon,
            lat,
            mask: mask.clone(),
            corners: !fill,
        }
    }

    /// Expected field shape at `position`.
    pub fn shape_at(&self, position: CPosition) -> (usize, usize) {
        let (mp, lp) = self.rho_shape();
        match position {
            CPosition::Rho => (mp, lp),
            CPosition::U => (mp, lp - 1),
            CPosition::V => (mp - 1, lp),
            CPosition::Psi => (mp - 1, lp - 1),
        }
    }
}
