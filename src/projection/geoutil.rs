//! Geographic utility functions for coordinates and graticule labels.

use crate::error::{Result, TwodviewError};

/// Normalize a longitude value to the range [-180, 180)
pub fn normalize_longitude(lon: f64) -> f64 {
    let mut normalized = ((lon + 180.0) % 360.0 + 360.0) % 360.0 - 180.0;

    // Exactly 180.0 belongs to the lower end of the range
    if normalized == 180.0 {
        normalized = -180.0;
    }

    normalized
}

/// Parse a range string "lon_min,lon_max,lat_min,lat_max".
pub fn parse_range(range: &str) -> Result<[f64; 4]> {
    let parts: Vec<&str> = range.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(TwodviewError::invalid(
            "range",
            "Range must be in format 'lon_min,lon_max,lat_min,lat_max'",
        ));
    }

    let names = ["lon_min", "lon_max", "lat_min", "lat_max"];
    let mut values = [0.0; 4];
    for (i, part) in parts.iter().enumerate() {
        values[i] = part
            .parse::<f64>()
            .map_err(|_| TwodviewError::invalid("range", format!("Invalid {}: {}", names[i], part)))?;
    }

    Ok(values)
}

/// Label for a meridian, e.g. `12.5°E`.
pub fn format_longitude(lon: f64) -> String {
    let lon = normalize_longitude(lon);
    let hemisphere = if lon == 0.0 || lon == -180.0 {
        ""
    } else if lon < 0.0 {
        "W"
    } else {
        "E"
    };
    format!("{:.1}\u{b0}{}", lon.abs(), hemisphere)
}

/// Label for a parallel, e.g. `30.0°S`.
pub fn format_latitude(lat: f64) -> String {
    let hemisphere = if lat > 0.0 {
        "N"
    } else if lat < 0.0 {
        "S"
    } else {
        ""
    };
    format!("{:.1}\u{b0}{}", lat.abs(), hemisphere)
}
