//! NetCDF-backed tests: grid files, named variables and the grid registry.

#![cfg(feature = "netcdf")]

mod common;

use common::test_data::{create_grid_nc, create_history_nc, write_registry};
use pretty_assertions::assert_eq;

use twodview::data_loader::{load_grid, load_variable};
use twodview::{
    twodview as plot, CPosition, GridRef, GridRegistry, PlotOptions, TimeIndex, TwodviewError,
    VarInput,
};

const MP: usize = 12;
const LP: usize = 16;

#[test]
fn test_named_variable_with_time_index() {
    let dir = tempfile::tempdir().unwrap();
    let grid_path = dir.path().join("grd.nc");
    let his_path = dir.path().join("his.nc");
    create_grid_nc(&grid_path, MP, LP).unwrap();
    create_history_nc(&his_path, 6, MP, LP).unwrap();

    let grid = load_grid(&grid_path, None).unwrap();
    let options = PlotOptions {
        filename: Some(his_path),
        ..Default::default()
    };
    let result = plot(
        VarInput::Name("temp".to_string()),
        TimeIndex::Step(5),
        GridRef::Grid(&grid),
        None,
        &options,
    )
    .unwrap();

    assert_eq!(result.position, CPosition::Rho);
    assert_eq!(result.scale.cmin, 503.0);
    assert_eq!(result.scale.cmax, (500 + MP - 1 + LP - 1) as f64);
}

#[test]
fn test_fill_values_are_masked() {
    let dir = tempfile::tempdir().unwrap();
    let his_path = dir.path().join("his.nc");
    create_history_nc(&his_path, 2, MP, LP).unwrap();

    let temp = load_variable(&his_path, "temp").unwrap();
    assert_eq!(temp.shape(), &[2, MP, LP]);
    assert!(temp[[0, 0, 0]].is_nan());
    assert_eq!(temp[[1, 5, 5]], 110.0);
}

#[test]
fn test_missing_variable() {
    let dir = tempfile::tempdir().unwrap();
    let grid_path = dir.path().join("grd.nc");
    create_grid_nc(&grid_path, MP, LP).unwrap();

    let grid = load_grid(&grid_path, None).unwrap();
    let options = PlotOptions {
        filename: Some(grid_path),
        ..Default::default()
    };
    let result = plot(
        VarInput::Name("salt".to_string()),
        TimeIndex::Static,
        GridRef::Grid(&grid),
        None,
        &options,
    );
    assert!(matches!(result, Err(TwodviewError::DataNotFound { .. })));
}

#[test]
fn test_grid_from_registry() {
    let dir = tempfile::tempdir().unwrap();
    create_grid_nc(&dir.path().join("nwa_grd.nc"), MP, LP).unwrap();
    create_history_nc(&dir.path().join("his.nc"), 1, MP, LP).unwrap();
    let registry_path = write_registry(dir.path(), "NWA", "nwa_grd.nc");

    let registry = GridRegistry::load(&registry_path).unwrap();
    assert_eq!(registry.ids(), vec!["NWA"]);

    let grid = registry.load_grid("NWA").unwrap();
    assert_eq!(grid.name, "NWA grid");
    assert_eq!(grid.rho_shape(), (MP, LP));

    let out = dir.path().join("nwa.png");
    let options = PlotOptions {
        filename: Some(dir.path().join("his.nc")),
        outfile: Some(out.clone()),
        width: 640,
        height: 480,
        ..Default::default()
    };
    plot(
        VarInput::Name("temp".to_string()),
        TimeIndex::Step(0),
        GridRef::Id("NWA".to_string()),
        Some(&registry),
        &options,
    )
    .unwrap();

    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (640, 480));

    let unknown = plot(
        VarInput::Name("temp".to_string()),
        TimeIndex::Step(0),
        GridRef::Id("SCS".to_string()),
        Some(&registry),
        &options,
    );
    assert!(matches!(unknown, Err(TwodviewError::GridNotFound { .. })));
}
