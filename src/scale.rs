//! Color scale construction and boundary normalisation.
//!
//! A scale is an arithmetic sequence of boundaries from `cmin` to `cmax`.
//! Values are binned against the boundaries and each bin is spread over the
//! 256 palette colors, so a 100-step scale shows 100 distinct colors.

use ndarray::Array2;

use crate::error::{Result, TwodviewError};
use crate::variable::finite_range;

/// Default number of color steps.
pub const DEFAULT_CLEV: u32 = 100;

/// Number of colors sampled from a palette.
pub const PALETTE_COLORS: usize = 256;

/// Where a value falls relative to the boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bin {
    Under,
    In(usize),
    Over,
}

/// Discrete color scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub cmin: f64,
    pub cmax: f64,
    pub clev: u32,
    boundaries: Vec<f64>,
}

impl ColorScale {
    /// Build a scale with `clev` steps between `cmin` and `cmax`.
    pub fn new(cmin: f64, cmax: f64, clev: u32) -> Result<Self> {
        if clev == 0 {
            return Err(TwodviewError::invalid("clev", "must be at least 1"));
        }
        if !cmin.is_finite() || !cmax.is_finite() || cmax <= cmin {
            return Err(TwodviewError::invalid(
                "cmin/cmax",
                format!("empty color range [{}, {}]", cmin, cmax),
            ));
        }

        let step = (cmax - cmin) / clev as f64;
        let mut boundaries: Vec<f64> = (0..=clev).map(|i| cmin + i as f64 * step).collect();
        // Pin the last boundary to cmax against accumulated rounding
        if let Some(last) = boundaries.last_mut() {
            *last = cmax;
        }

        Ok(Self {
            cmin,
            cmax,
            clev,
            boundaries,
        })
    }

    /// Build a scale, taking unset limits from the field's unmasked values.
    pub fn from_data(
        field: &Array2<f64>,
        cmin: Option<f64>,
        cmax: Option<f64>,
        clev: Option<u32>,
    ) -> Result<Self> {
        let range = finite_range(field);
        let cmin = match cmin.or(range.map(|r| r.0)) {
            Some(v) => v,
            None => {
                return Err(TwodviewError::DataNotFound {
                    message: "field has no unmasked values".to_string(),
                })
            }
        };
        let cmax = match cmax.or(range.map(|r| r.1)) {
            Some(v) => v,
            None => {
                return Err(TwodviewError::DataNotFound {
                    message: "field has no unmasked values".to_string(),
                })
            }
        };
        Self::new(cmin, cmax, clev.unwrap_or(DEFAULT_CLEV))
    }

    /// Spacing between boundaries.
    pub fn step(&self) -> f64 {
        (self.cmax - self.cmin) / self.clev as f64
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Every `d`-th boundary, used as contour line levels.
    pub fn contour_levels(&self, d: usize) -> Result<Vec<f64>> {
        if d == 0 {
            return Err(TwodviewError::invalid("d", "contour density must be at least 1"));
        }
        Ok(self.boundaries.iter().step_by(d).copied().collect())
    }

    /// Bin a value. NaN has no bin.
    pub fn bin(&self, value: f64) -> Option<Bin> {
        if value.is_nan() {
            return None;
        }
        let first = self.boundaries[0];
        let last = self.boundaries[self.boundaries.len() - 1];
        if value < first {
            return Some(Bin::Under);
        }
        if value >= last {
            return Some(Bin::Over);
        }
        // Index of the first boundary strictly above the value
        let upper = self.boundaries.partition_point(|&b| b <= value);
        Some(Bin::In(upper.saturating_sub(1).min(self.clev as usize - 1)))
    }

    /// Palette color index (0..256) for a bin.
    pub fn color_index(&self, bin: Bin) -> usize {
        let n_bins = self.clev as usize;
        match bin {
            Bin::Under => 0,
            Bin::Over => PALETTE_COLORS - 1,
            Bin::In(_) if n_bins == 1 => (PALETTE_COLORS - 1) / 2,
            Bin::In(i) => i * (PALETTE_COLORS - 1) / (n_bins - 1),
        }
    }

    /// Normalised palette position (0.0..=1.0) for a value, clamping values
    /// outside the scale to its ends.
    pub fn normalize(&self, value: f64) -> Option<f32> {
        self.bin(value)
            .map(|bin| self.color_index(bin) as f32 / (PALETTE_COLORS - 1) as f32)
    }

    /// Like [`normalize`](Self::normalize) but `None` outside the scale.
    pub fn normalize_within(&self, value: f64) -> Option<f32> {
        match self.bin(value)? {
            Bin::In(i) => {
                Some(self.color_index(Bin::In(i)) as f32 / (PALETTE_COLORS - 1) as f32)
            }
            _ if value == self.cmax => Some(1.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_boundaries_length_and_spacing() {
        for &(cmin, cmax, clev) in &[(0.0, 1.0, 100), (-2.5, 7.5, 4), (10.0, 30.0, 3)] {
            let scale = ColorScale::new(cmin, cmax, clev).unwrap();
            let b = scale.boundaries();
            assert_eq!(b.len(), clev as usize + 1);
            assert_eq!(b[0], cmin);
            assert_eq!(*b.last().unwrap(), cmax);
            let step = (cmax - cmin) / clev as f64;
            for w in b.windows(2) {
                assert!((w[1] - w[0] - step).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_from_data_defaults() {
        let field = array![[2.0, f64::NAN], [6.0, 4.0]];
        let scale = ColorScale::from_data(&field, None, None, None).unwrap();
        assert_eq!(scale.cmin, 2.0);
        assert_eq!(scale.cmax, 6.0);
        assert_eq!(scale.clev, DEFAULT_CLEV);
        assert!((scale.step() - 0.04).abs() < 1e-12);

        let scale = ColorScale::from_data(&field, Some(0.0), None, Some(3)).unwrap();
        assert_eq!(scale.boundaries(), &[0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_degenerate_scale() {
        assert!(ColorScale::new(1.0, 1.0, 10).is_err());
        assert!(ColorScale::new(0.0, 1.0, 0).is_err());
        let empty = Array2::from_elem((2, 2), f64::NAN);
        assert!(ColorScale::from_data(&empty, None, None, None).is_err());
    }

    #[test]
    fn test_contour_levels() {
        let scale = ColorScale::new(0.0, 10.0, 10).unwrap();
        assert_eq!(
            scale.contour_levels(4).unwrap(),
            vec![0.0, 4.0, 8.0]
        );
        assert_eq!(scale.contour_levels(1).unwrap().len(), 11);
        assert!(scale.contour_levels(0).is_err());
    }

    #[test]
    fn test_binning() {
        let scale = ColorScale::new(0.0, 4.0, 4).unwrap();
        assert_eq!(scale.bin(-0.1), Some(Bin::Under));
        assert_eq!(scale.bin(0.0), Some(Bin::In(0)));
        assert_eq!(scale.bin(1.0), Some(Bin::In(1)));
        assert_eq!(scale.bin(3.99), Some(Bin::In(3)));
        assert_eq!(scale.bin(4.0), Some(Bin::Over));
        assert_eq!(scale.bin(f64::NAN), None);
    }

    #[test]
    fn test_color_index_spreads_bins() {
        let scale = ColorScale::new(0.0, 4.0, 4).unwrap();
        assert_eq!(scale.color_index(Bin::In(0)), 0);
        assert_eq!(scale.color_index(Bin::In(1)), 85);
        assert_eq!(scale.color_index(Bin::In(3)), 255);
        assert_eq!(scale.color_index(Bin::Under), 0);
        assert_eq!(scale.color_index(Bin::Over), 255);

        let single = ColorScale::new(0.0, 1.0, 1).unwrap();
        assert_eq!(single.color_index(Bin::In(0)), 127);
    }

    #[test]
    fn test_normalize_within() {
        let scale = ColorScale::new(0.0, 4.0, 4).unwrap();
        assert_eq!(scale.normalize_within(-1.0), None);
        assert_eq!(scale.normalize_within(5.0), None);
        assert_eq!(scale.normalize_within(4.0), Some(1.0));
        assert_eq!(scale.normalize(5.0), Some(1.0));
        assert_eq!(scale.normalize(-5.0), Some(0.0));
    }
}
