//! Configuration management for twodview.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colormaps::{get_lut, DEFAULT_COLORMAP};
use crate::error::{Result, TwodviewError};
use crate::projection::geoutil::parse_range;
use crate::projection::{Extent, ProjectionKind};
use crate::render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Command-line arguments for twodview
#[derive(Parser, Debug)]
#[command(name = "twodview")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Grid file, or a grid identifier known to the grid registry
    pub grid: String,

    /// Name of the variable to plot
    pub var: String,

    /// File to read the variable from (defaults to the grid file)
    #[arg(short, long, env = "TWODVIEW_FILE")]
    pub file: Option<PathBuf>,

    /// Time step to plot; -1 for a variable without a time axis
    #[arg(short = 't', long, default_value_t = -1, allow_negative_numbers = true)]
    pub time_index: i64,

    /// Lower color limit
    #[arg(long, allow_negative_numbers = true)]
    pub cmin: Option<f64>,

    /// Upper color limit
    #[arg(long, allow_negative_numbers = true)]
    pub cmax: Option<f64>,

    /// Number of color steps
    #[arg(long)]
    pub clev: Option<u32>,

    /// Filled contours instead of shaded cells
    #[arg(long)]
    pub fill: bool,

    /// Overlay contour lines (requires --fill)
    #[arg(long)]
    pub contour: bool,

    /// Contour density: draw every d-th color boundary
    #[arg(short = 'd', long = "density")]
    pub d: Option<usize>,

    /// Axis/map limits as "lon_min,lon_max,lat_min,lat_max"
    #[arg(long, allow_hyphen_values = true)]
    pub range: Option<String>,

    /// Font size
    #[arg(long)]
    pub fts: Option<f64>,

    /// Plot title
    #[arg(long)]
    pub title: Option<String>,

    /// Do not draw the colorbar
    #[arg(long)]
    pub no_colorbar: bool,

    /// Color palette
    #[arg(long, env = "TWODVIEW_PALETTE")]
    pub pal: Option<String>,

    /// Map projection (merc, cyl, mill, lcc, stere) or "none" for plain axes
    #[arg(long, env = "TWODVIEW_PROJ")]
    pub proj: Option<String>,

    /// Fill land cells in gray
    #[arg(long)]
    pub fill_land: bool,

    /// Write the figure to this file (.png, .svg or .eps)
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Figure width in pixels
    #[arg(long, env = "TWODVIEW_WIDTH")]
    pub width: Option<u32>,

    /// Figure height in pixels
    #[arg(long, env = "TWODVIEW_HEIGHT")]
    pub height: Option<u32>,

    /// JSON grid registry mapping grid identifiers to grid files
    #[arg(long, env = "TWODVIEW_GRID_REGISTRY")]
    pub grid_registry: Option<PathBuf>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "TWODVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TWODVIEW_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Plot switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Data file to read a named variable from
    #[serde(default)]
    pub filename: Option<PathBuf>,

    /// Color limits; unset limits come from the data
    #[serde(default)]
    pub cmin: Option<f64>,
    #[serde(default)]
    pub cmax: Option<f64>,

    /// Number of color steps (100 when unset)
    #[serde(default)]
    pub clev: Option<u32>,

    /// Filled contours instead of shaded cells
    #[serde(default)]
    pub fill: bool,

    /// Overlay contour lines; requires `fill`
    #[serde(default)]
    pub contour: bool,

    /// Contour density
    #[serde(default = "default_density")]
    pub d: usize,

    /// `[lon_min, lon_max, lat_min, lat_max]`
    #[serde(default)]
    pub range: Option<[f64; 4]>,

    /// Font size
    #[serde(default = "default_fts")]
    pub fts: f64,

    #[serde(default)]
    pub title: Option<String>,

    /// Draw the colorbar
    #[serde(default = "default_true")]
    pub clb: bool,

    /// Palette name
    #[serde(default = "default_pal")]
    pub pal: String,

    /// Map projection; `None` draws plain lon/lat axes
    #[serde(default = "default_proj")]
    pub proj: Option<ProjectionKind>,

    /// Fill land in gray (projection mode only)
    #[serde(default)]
    pub fill_land: bool,

    #[serde(default)]
    pub outfile: Option<PathBuf>,

    /// Figure size in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            filename: None,
            cmin: None,
            cmax: None,
            clev: None,
            fill: false,
            contour: false,
            d: default_density(),
            range: None,
            fts: default_fts(),
            title: None,
            clb: true,
            pal: default_pal(),
            proj: default_proj(),
            fill_land: false,
            outfile: None,
            width: default_width(),
            height: default_height(),
        }
    }
}

impl PlotOptions {
    /// Check the switches that can be checked without data.
    pub fn validate(&self) -> Result<()> {
        if self.clev == Some(0) {
            return Err(TwodviewError::invalid("clev", "must be at least 1"));
        }
        if self.d == 0 {
            return Err(TwodviewError::invalid("d", "contour density must be at least 1"));
        }
        if !(self.fts > 0.0) || !self.fts.is_finite() {
            return Err(TwodviewError::invalid(
                "fts",
                format!("font size must be positive, got {}", self.fts),
            ));
        }
        if let (Some(cmin), Some(cmax)) = (self.cmin, self.cmax) {
            if cmax <= cmin {
                return Err(TwodviewError::invalid(
                    "cmin/cmax",
                    format!("cmax ({}) must be greater than cmin ({})", cmax, cmin),
                ));
            }
        }
        if let Some(range) = self.range {
            Extent::from_range(range)?;
        }
        if self.width == 0 || self.height == 0 {
            return Err(TwodviewError::invalid(
                "size",
                format!("figure size must be non-zero, got {}x{}", self.width, self.height),
            ));
        }
        get_lut(&self.pal)?;
        Ok(())
    }
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Grid registry file
    #[serde(default)]
    pub grid_registry: Option<PathBuf>,

    /// Plot switches
    #[serde(default)]
    pub plot: PlotOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            grid_registry: None,
            plot: PlotOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Args)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args))
    }

    /// Build the configuration for already-parsed arguments. Environment
    /// variables reach this point through clap.
    pub fn from_args(args: &Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        config.apply_args(args)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.log_level = other.log_level;
        if other.grid_registry.is_some() {
            self.grid_registry = other.grid_registry;
        }
        self.plot = other.plot;
    }

    fn apply_args(&mut self, args: &Args) -> Result<()> {
        let plot = &mut self.plot;

        if let Some(file) = &args.file {
            plot.filename = Some(file.clone());
        }
        if args.cmin.is_some() {
            plot.cmin = args.cmin;
        }
        if args.cmax.is_some() {
            plot.cmax = args.cmax;
        }
        if args.clev.is_some() {
            plot.clev = args.clev;
        }
        plot.fill |= args.fill;
        plot.contour |= args.contour;
        if let Some(d) = args.d {
            plot.d = d;
        }
        if let Some(range) = &args.range {
            plot.range = Some(parse_range(range)?);
        }
        if let Some(fts) = args.fts {
            plot.fts = fts;
        }
        if args.title.is_some() {
            plot.title = args.title.clone();
        }
        if args.no_colorbar {
            plot.clb = false;
        }
        if let Some(pal) = &args.pal {
            plot.pal = pal.clone();
        }
        if let Some(proj) = &args.proj {
            plot.proj = ProjectionKind::parse_optional(proj)?;
        }
        plot.fill_land |= args.fill_land;
        if args.outfile.is_some() {
            plot.outfile = args.outfile.clone();
        }
        if let Some(width) = args.width {
            plot.width = width;
        }
        if let Some(height) = args.height {
            plot.height = height;
        }

        if args.grid_registry.is_some() {
            self.grid_registry = args.grid_registry.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(TwodviewError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        self.plot.validate().map_err(|e| TwodviewError::Config {
            message: e.to_string(),
        })
    }
}

// Default value functions for serde
fn default_density() -> usize {
    4
}

fn default_fts() -> f64 {
    12.0
}

fn default_true() -> bool {
    true
}

fn default_pal() -> String {
    DEFAULT_COLORMAP.to_string()
}

fn default_proj() -> Option<ProjectionKind> {
    Some(ProjectionKind::Merc)
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["twodview", "grid.nc", "temp"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        let plot = &config.plot;
        assert_eq!(config.log_level, "info");
        assert_eq!(plot.d, 4);
        assert_eq!(plot.fts, 12.0);
        assert!(plot.clb);
        assert!(!plot.fill);
        assert_eq!(plot.pal, "jet");
        assert_eq!(plot.proj, Some(ProjectionKind::Merc));
        assert_eq!((plot.width, plot.height), (800, 600));
    }

    #[test]
    fn test_json_defaults_fill_missing_fields() {
        let config: Config =
            serde_json::from_str(r#"{"plot": {"fill": true, "proj": null, "clev": 20}}"#).unwrap();
        assert!(config.plot.fill);
        assert_eq!(config.plot.proj, None);
        assert_eq!(config.plot.clev, Some(20));
        assert_eq!(config.plot.d, 4);
        assert!(config.plot.clb);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_cli_overrides_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"log_level": "debug", "plot": {{"pal": "gray", "fts": 10.0, "title": "from json"}}}}"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = args(&["--config", path.as_str(), "--fts", "14", "--proj", "none", "--no-colorbar"]);
        let config = Config::from_args(&args).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.plot.pal, "gray");
        assert_eq!(config.plot.title.as_deref(), Some("from json"));
        assert_eq!(config.plot.fts, 14.0);
        assert_eq!(config.plot.proj, None);
        assert!(!config.plot.clb);
    }

    #[test]
    fn test_args_parse_ranges_and_negatives() {
        let args = args(&[
            "-t",
            "5",
            "--cmin",
            "-2.5",
            "--range",
            "-80,-60,30,45",
            "--fill",
            "--contour",
            "-d",
            "2",
        ]);
        assert_eq!(args.time_index, 5);
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.plot.cmin, Some(-2.5));
        assert_eq!(config.plot.range, Some([-80.0, -60.0, 30.0, 45.0]));
        assert!(config.plot.fill && config.plot.contour);
        assert_eq!(config.plot.d, 2);
    }

    #[test]
    fn test_bad_projection_name() {
        let args = args(&["--proj", "ortho"]);
        assert!(Config::from_args(&args).is_err());
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        assert!(Config::default().validate().is_ok());

        // Test invalid log level
        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.clev = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.d = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.fts = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.range = Some([10.0, 0.0, 0.0, 10.0]);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.pal = "nope".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.cmin = Some(1.0);
        config.plot.cmax = Some(1.0);
        assert!(config.validate().is_err());
    }
}
