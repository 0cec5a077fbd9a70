//! Error types for twodview.
//!
//! A single error enum covers grid resolution, variable extraction,
//! configuration and figure output.

use thiserror::Error;

/// The main error type for twodview operations.
#[derive(Error, Debug)]
pub enum TwodviewError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// A grid identifier that the registry does not know
    #[error("Grid not found: {id}")]
    GridNotFound { id: String },

    /// The variable does not have the rank the time index asks for
    #[error("Rank mismatch: var must be {expected}D, got {actual}D")]
    RankMismatch { expected: usize, actual: usize },

    /// The variable shape matches none of the four C-grid positions
    #[error(
        "Variable shape {var_shape:?} does not match any C-grid position of grid with rho shape {grid_shape:?}"
    )]
    GridPositionMismatch {
        var_shape: (usize, usize),
        grid_shape: (usize, usize),
    },

    /// Index out of bounds errors
    #[error("Index out of bounds: {param}={value} (max: {max})")]
    IndexOutOfBounds {
        param: String,
        value: i64,
        max: usize,
    },

    /// Contour overlay was requested on a shaded (non-filled) plot
    #[error("Please run again with fill=True to overlay contour.")]
    ContourRequiresFill,

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// Array shape errors
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with TwodviewError
pub type Result<T> = std::result::Result<T, TwodviewError>;

impl TwodviewError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid(param: &str, message: impl Into<String>) -> Self {
        TwodviewError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}
