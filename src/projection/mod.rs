//! Map projections over a spherical earth.
//!
//! A [`MapContext`] fixes a projection to an [`Extent`]: the projection is
//! centered on the extent midpoint and projected coordinates are shifted so
//! that the lower-left corner of the extent lands on (0, 0). The upper-right
//! corner then gives the map width and height in meters.

pub mod extent;
pub mod geoutil;

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TwodviewError};

pub use extent::Extent;
pub use geoutil::normalize_longitude;

/// Sphere radius in meters.
pub const EARTH_RADIUS: f64 = 6_370_997.0;

/// Supported projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// Mercator
    Merc,
    /// Equidistant cylindrical
    Cyl,
    /// Miller cylindrical
    Mill,
    /// Lambert conformal conic
    Lcc,
    /// Oblique stereographic
    Stere,
}

impl ProjectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectionKind::Merc => "merc",
            ProjectionKind::Cyl => "cyl",
            ProjectionKind::Mill => "mill",
            ProjectionKind::Lcc => "lcc",
            ProjectionKind::Stere => "stere",
        }
    }

    /// Parse a projection name; `none` (any case) means plain axes.
    pub fn parse_optional(s: &str) -> Result<Option<Self>> {
        if s.eq_ignore_ascii_case("none") {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = TwodviewError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merc" | "mercator" => Ok(ProjectionKind::Merc),
            "cyl" => Ok(ProjectionKind::Cyl),
            "mill" | "miller" => Ok(ProjectionKind::Mill),
            "lcc" | "lambert" => Ok(ProjectionKind::Lcc),
            "stere" | "stereographic" => Ok(ProjectionKind::Stere),
            _ => Err(TwodviewError::invalid(
                "proj",
                format!("Unknown map projection: {}", s),
            )),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cone parameters of a Lambert conformal projection.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cone {
    n: f64,
    f: f64,
    rho0: f64,
}

impl Cone {
    /// Secant cone through `lat_1` and `lat_2`, with origin latitude `lat_0`
    /// (all in radians).
    fn new(lat_1: f64, lat_2: f64, lat_0: f64) -> Result<Self> {
        let t = |phi: f64| (FRAC_PI_4 + phi / 2.0).tan();

        let n = if (lat_1 - lat_2).abs() < 1e-10 {
            lat_1.sin()
        } else {
            (lat_1.cos() / lat_2.cos()).ln() / (t(lat_2) / t(lat_1)).ln()
        };
        if !n.is_finite() || n.abs() < 1e-10 {
            return Err(TwodviewError::invalid(
                "proj",
                "lcc needs an extent that is not symmetric about the equator",
            ));
        }

        let f = lat_1.cos() * t(lat_1).powf(n) / n;
        let rho0 = EARTH_RADIUS * f / t(lat_0).powf(n);
        Ok(Self { n, f, rho0 })
    }

    fn rho(&self, phi: f64) -> f64 {
        EARTH_RADIUS * self.f / (FRAC_PI_4 + phi / 2.0).tan().powf(self.n)
    }
}

/// A projection fitted to a plot extent.
#[derive(Debug, Clone, PartialEq)]
pub struct MapContext {
    pub kind: ProjectionKind,
    pub extent: Extent,
    pub lon_0: f64,
    pub lat_0: f64,
    cone: Option<Cone>,
    x_offset: f64,
    y_offset: f64,
    width: f64,
    height: f64,
}

impl MapContext {
    /// Fit `kind` to `extent`, centered on the extent midpoint.
    pub fn new(kind: ProjectionKind, extent: Extent) -> Result<Self> {
        let (lon_0, lat_0) = extent.center();

        let cone = match kind {
            ProjectionKind::Lcc => {
                let span = extent.lat_max - extent.lat_min;
                let lat_1 = extent.lat_min + span / 4.0;
                let lat_2 = extent.lat_min + 3.0 * span / 4.0;
                Some(Cone::new(
                    lat_1.to_radians(),
                    lat_2.to_radians(),
                    lat_0.to_radians(),
                )?)
            }
            _ => None,
        };

        let mut map = Self {
            kind,
            extent,
            lon_0,
            lat_0,
            cone,
            x_offset: 0.0,
            y_offset: 0.0,
            width: 0.0,
            height: 0.0,
        };

        let (x0, y0) = map.forward(extent.lon_min, extent.lat_min)?;
        let (x1, y1) = map.forward(extent.lon_max, extent.lat_max)?;
        map.x_offset = x0;
        map.y_offset = y0;
        map.width = x1 - x0;
        map.height = y1 - y0;

        if !(map.width > 0.0 && map.height > 0.0) {
            return Err(TwodviewError::invalid(
                "range",
                format!(
                    "extent {:?} has no area in the {} projection",
                    extent.as_range(),
                    kind
                ),
            ));
        }

        Ok(map)
    }

    /// Projected (x, y) in meters from the lower-left corner.
    pub fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let (x, y) = self.forward(lon, lat)?;
        Ok((x - self.x_offset, y - self.y_offset))
    }

    /// Project coordinate arrays. Non-finite inputs stay NaN; points the
    /// projection cannot represent become NaN as well.
    pub fn project_array(
        &self,
        lon: &Array2<f64>,
        lat: &Array2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        if lon.dim() != lat.dim() {
            return Err(TwodviewError::invalid(
                "coordinates",
                format!("lon {:?} and lat {:?} differ in shape", lon.dim(), lat.dim()),
            ));
        }

        let mut x = Array2::from_elem(lon.dim(), f64::NAN);
        let mut y = Array2::from_elem(lon.dim(), f64::NAN);
        Zip::from(&mut x)
            .and(&mut y)
            .and(lon)
            .and(lat)
            .for_each(|x, y, &lon, &lat| {
                if let Ok((px, py)) = self.project(lon, lat) {
                    *x = px;
                    *y = py;
                }
            });

        Ok((x, y))
    }

    /// Map bounds `(x_min, x_max, y_min, y_max)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (0.0, self.width, 0.0, self.height)
    }

    /// Unshifted projection of a point.
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return Err(self.unprojectable(lon, lat));
        }

        let lambda = normalize_longitude(lon - self.lon_0).to_radians();
        let phi = lat.to_radians();

        let (x, y) = match self.kind {
            ProjectionKind::Merc => {
                if lat.abs() >= 90.0 {
                    return Err(self.unprojectable(lon, lat));
                }
                (
                    EARTH_RADIUS * lambda,
                    EARTH_RADIUS * (FRAC_PI_4 + phi / 2.0).tan().ln(),
                )
            }
            ProjectionKind::Cyl => (EARTH_RADIUS * lambda, EARTH_RADIUS * phi),
            ProjectionKind::Mill => (
                EARTH_RADIUS * lambda,
                EARTH_RADIUS * 1.25 * (FRAC_PI_4 + 0.4 * phi).tan().ln(),
            ),
            ProjectionKind::Lcc => {
                let cone = self.cone.ok_or_else(|| self.unprojectable(lon, lat))?;
                let rho = cone.rho(phi);
                let theta = cone.n * lambda;
                (rho * theta.sin(), cone.rho0 - rho * theta.cos())
            }
            ProjectionKind::Stere => {
                let phi_0 = self.lat_0.to_radians();
                let denom = 1.0 + phi_0.sin() * phi.sin() + phi_0.cos() * phi.cos() * lambda.cos();
                if denom.abs() < 1e-12 {
                    return Err(self.unprojectable(lon, lat));
                }
                let k = 2.0 / denom;
                (
                    EARTH_RADIUS * k * phi.cos() * lambda.sin(),
                    EARTH_RADIUS * k * (phi_0.cos() * phi.sin() - phi_0.sin() * phi.cos() * lambda.cos()),
                )
            }
        };

        if x.is_finite() && y.is_finite() {
            Ok((x, y))
        } else {
            Err(self.unprojectable(lon, lat))
        }
    }

    fn unprojectable(&self, lon: f64, lat: f64) -> TwodviewError {
        TwodviewError::invalid(
            "proj",
            format!("({}, {}) cannot be projected with {}", lon, lat, self.kind),
        )
    }
}
