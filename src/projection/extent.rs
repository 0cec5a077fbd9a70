//! Geographic extent of a plot and its graticule.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TwodviewError};

/// Number of graticule intervals across the extent.
pub const GRATICULE_DIVISIONS: usize = 5;

/// Longitude/latitude box covered by a plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Extent {
    /// Bounding box of the finite values in the coordinate arrays.
    pub fn from_coords(lon: &Array2<f64>, lat: &Array2<f64>) -> Result<Self> {
        let (lon_min, lon_max) = min_max(lon).ok_or_else(|| TwodviewError::DataNotFound {
            message: "no finite longitudes in grid".to_string(),
        })?;
        let (lat_min, lat_max) = min_max(lat).ok_or_else(|| TwodviewError::DataNotFound {
            message: "no finite latitudes in grid".to_string(),
        })?;

        Ok(Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    /// Extent from `[lon_min, lon_max, lat_min, lat_max]`.
    pub fn from_range(range: [f64; 4]) -> Result<Self> {
        let [lon_min, lon_max, lat_min, lat_max] = range;

        if range.iter().any(|v| !v.is_finite()) {
            return Err(TwodviewError::invalid("range", "values must be finite"));
        }
        if lon_min >= lon_max {
            return Err(TwodviewError::invalid(
                "range",
                format!("lon_min ({}) must be < lon_max ({})", lon_min, lon_max),
            ));
        }
        if lat_min >= lat_max {
            return Err(TwodviewError::invalid(
                "range",
                format!("lat_min ({}) must be < lat_max ({})", lat_min, lat_max),
            ));
        }
        if !(-90.0..=90.0).contains(&lat_min) || !(-90.0..=90.0).contains(&lat_max) {
            return Err(TwodviewError::invalid(
                "range",
                "Latitude must be in the range -90 to 90",
            ));
        }

        Ok(Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    /// Midpoint (lon_0, lat_0).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lon_min + self.lon_max) / 2.0,
            (self.lat_min + self.lat_max) / 2.0,
        )
    }

    pub fn as_range(&self) -> [f64; 4] {
        [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
    }

    /// Meridians drawn across the map.
    pub fn meridians(&self) -> Vec<f64> {
        ticks(self.lon_min, self.lon_max)
    }

    /// Parallels drawn across the map.
    pub fn parallels(&self) -> Vec<f64> {
        ticks(self.lat_min, self.lat_max)
    }
}

/// `min + k * (max - min) / 5` for k = 0..5; the upper end is excluded.
fn ticks(min: f64, max: f64) -> Vec<f64> {
    let step = (max - min) / GRATICULE_DIVISIONS as f64;
    (0..GRATICULE_DIVISIONS)
        .map(|k| min + k as f64 * step)
        .collect()
}

fn min_max(a: &Array2<f64>) -> Option<(f64, f64)> {
    a.iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
