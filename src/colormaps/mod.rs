//! Colormap implementations for the data, land and colorbar layers.
//!
//! Matplotlib-style palettes; `jet` is the default for data layers.

pub mod colormap;
pub mod diverging;
pub mod sequential;

pub use colormap::{colormap_names, get_colormap, get_lut, Colormap, Lut, DEFAULT_COLORMAP};
