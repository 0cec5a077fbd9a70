//! Grid identifier registry.
//!
//! Maps short grid identifiers to grid files so that callers can refer to a
//! grid by name. The registry is a JSON document:
//!
//! ```json
//! { "grids": { "NWA": { "file": "grids/nwa_grd.nc", "name": "Northwest Atlantic" } } }
//! ```
//!
//! Relative file paths are resolved against the registry file's directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::Grid;
use crate::error::{Result, TwodviewError};

/// One registered grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridEntry {
    /// Path to the grid NetCDF file
    pub file: PathBuf,
    /// Human readable grid name (defaults to the identifier)
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    grids: HashMap<String, GridEntry>,
}

/// Registry of known grids.
#[derive(Debug, Clone, Default)]
pub struct GridRegistry {
    base_dir: PathBuf,
    entries: HashMap<String, GridEntry>,
}

impl GridRegistry {
    /// Create an empty registry resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            entries: HashMap::new(),
        }
    }

    /// Load a registry from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: RegistryFile = serde_json::from_str(&content)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        info!(
            registry = %path.display(),
            grids = file.grids.len(),
            "Loaded grid registry"
        );

        Ok(Self {
            base_dir,
            entries: file.grids,
        })
    }

    /// Register (or replace) a grid.
    pub fn insert(&mut self, id: impl Into<String>, entry: GridEntry) {
        self.entries.insert(id.into(), entry);
    }

    /// Look up a grid entry.
    pub fn entry(&self, id: &str) -> Result<&GridEntry> {
        self.entries.get(id).ok_or_else(|| TwodviewError::GridNotFound {
            id: id.to_string(),
        })
    }

    /// Absolute path of a registered grid file.
    pub fn grid_path(&self, id: &str) -> Result<PathBuf> {
        let entry = self.entry(id)?;
        if entry.file.is_absolute() {
            Ok(entry.file.clone())
        } else {
            Ok(self.base_dir.join(&entry.file))
        }
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Load a registered grid.
    #[cfg(feature = "netcdf")]
    pub fn load_grid(&self, id: &str) -> Result<Grid> {
        let path = self.grid_path(id)?;
        let name = self
            .entry(id)?
            .name
            .clone()
            .unwrap_or_else(|| id.to_string());
        debug!(grid_id = id, path = %path.display(), "Resolving grid identifier");
        crate::data_loader::load_grid(&path, Some(&name))
    }

    /// Load a registered grid.
    #[cfg(not(feature = "netcdf"))]
    pub fn load_grid(&self, id: &str) -> Result<Grid> {
        let path = self.grid_path(id)?;
        debug!(grid_id = id, path = %path.display(), "Resolving grid identifier");
        Err(TwodviewError::Config {
            message: "grid files require the `netcdf` feature".to_string(),
        })
    }
}
