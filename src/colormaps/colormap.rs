//! Colormap trait and utilities.
//!
//! Palettes are sampled into 256-entry lookup tables, the same resolution
//! the color scale bins into.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{Result, TwodviewError};
use crate::scale::PALETTE_COLORS;

/// Default palette for data layers.
pub const DEFAULT_COLORMAP: &str = "jet";

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// A palette stored as a lookup table.
#[derive(Debug, Clone)]
pub struct Lut {
    name: String,
    colors: Vec<[u8; 4]>,
}

impl Lut {
    /// Sample `f` at `PALETTE_COLORS` evenly spaced positions.
    pub fn sample<F>(name: &str, f: F) -> Self
    where
        F: Fn(f64) -> [u8; 4],
    {
        let n = PALETTE_COLORS;
        let colors = (0..n).map(|i| f(i as f64 / (n - 1) as f64)).collect();
        Self {
            name: name.to_string(),
            colors,
        }
    }

    /// Build from RGB anchor colors spaced evenly over [0, 1].
    pub fn from_table(name: &str, table: &[[u8; 3]]) -> Self {
        Self::sample(name, |t| {
            let position = t * (table.len() - 1) as f64;
            let index = (position.floor() as usize).min(table.len() - 2);
            let rgb = lerp_color(table[index], table[index + 1], (position - index as f64) as f32);
            [rgb[0], rgb[1], rgb[2], 255]
        })
    }

    /// Sample a colorgrad gradient.
    pub fn from_gradient(name: &str, gradient: &colorgrad::Gradient) -> Self {
        let (start, end) = gradient.domain();
        Self::sample(name, |t| gradient.at(start + t * (end - start)).to_rgba8())
    }

    /// The same palette run backwards.
    pub fn reversed(mut self) -> Self {
        self.colors.reverse();
        self.name.push_str("_r");
        self
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }
}

impl Colormap for Lut {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
        let index = (value * (self.colors.len() - 1) as f32).round() as usize;
        self.colors[index.min(self.colors.len() - 1)]
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Get a colormap by name. A `_r` suffix reverses the palette.
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    get_lut(name).map(|lut| Box::new(lut) as Box<dyn Colormap>)
}

/// Built-in palettes, sampled once on first use.
static BUILTIN: Lazy<HashMap<&'static str, Lut>> = Lazy::new(|| {
    use super::{diverging, sequential};

    let palettes: [(&'static str, fn() -> Lut); 13] = [
        ("jet", sequential::jet),
        ("gray", sequential::gray),
        ("viridis", sequential::viridis),
        ("plasma", sequential::plasma),
        ("inferno", sequential::inferno),
        ("magma", sequential::magma),
        ("cividis", sequential::cividis),
        ("turbo", sequential::turbo),
        ("rainbow", sequential::rainbow),
        ("coolwarm", diverging::coolwarm),
        ("rdbu", diverging::rdbu),
        ("seismic", diverging::seismic),
        ("spectral", diverging::spectral),
    ];
    palettes.iter().map(|(name, build)| (*name, build())).collect()
});

/// Names of the built-in palettes, sorted.
pub fn colormap_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTIN.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Get a palette lookup table by name.
pub fn get_lut(name: &str) -> Result<Lut> {
    let lower = name.to_lowercase();
    if let Some(base) = lower.strip_suffix("_r") {
        return get_lut(base).map(Lut::reversed);
    }

    let key = if lower == "grey" { "gray" } else { lower.as_str() };
    BUILTIN
        .get(key)
        .cloned()
        .ok_or_else(|| TwodviewError::InvalidParameter {
            param: "pal".to_string(),
            message: format!(
                "Unknown colormap: {}. Available: {}",
                name,
                colormap_names().join(", ")
            ),
        })
}

/// Linear interpolation between two colors
pub fn lerp_color(c1: [u8; 3], c2: [u8; 3], t: f32) -> [u8; 3] {
    [
        (c1[0] as f32 * (1.0 - t) + c2[0] as f32 * t).round() as u8,
        (c1[1] as f32 * (1.0 - t) + c2[1] as f32 * t).round() as u8,
        (c1[2] as f32 * (1.0 - t) + c2[2] as f32 * t).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_color() {
        let black = [0, 0, 0];
        let white = [255, 255, 255];

        let mid = lerp_color(black, white, 0.5);
        assert_eq!(mid, [128, 128, 128]);
    }

    #[test]
    fn test_lut_has_palette_resolution() {
        let lut = get_lut("jet").unwrap();
        assert_eq!(lut.colors().len(), PALETTE_COLORS);
        assert_eq!(lut.name(), "jet");
    }

    #[test]
    fn test_reversed_names() {
        let jet = get_lut("jet").unwrap();
        let jet_r = get_lut("jet_r").unwrap();
        assert_eq!(jet_r.name(), "jet_r");
        assert_eq!(jet.map_normalized(0.0), jet_r.map_normalized(1.0));
    }

    #[test]
    fn test_unknown_colormap() {
        assert!(matches!(
            get_colormap("nope"),
            Err(TwodviewError::InvalidParameter { ref param, .. }) if param == "pal"
        ));
    }

    #[test]
    fn test_colormap_names() {
        let names = colormap_names();
        assert!(names.contains(&"jet"));
        assert!(names.contains(&"coolwarm"));
        assert!(get_lut("Grey").is_ok());
    }

    #[test]
    fn test_map_with_range() {
        let gray = get_colormap("gray").unwrap();
        assert_eq!(gray.map(-2.0, -2.0, 1.0), [0, 0, 0, 255]);
        assert_eq!(gray.map(1.0, -2.0, 1.0), [255, 255, 255, 255]);
    }
}
