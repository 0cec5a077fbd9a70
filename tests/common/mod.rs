//! Common test utilities for twodview.
//!
//! Synthetic grids and fields, NetCDF fixtures and output-file checks shared
//! by the integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;
