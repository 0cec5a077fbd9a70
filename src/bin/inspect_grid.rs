use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use twodview::data_loader::load_grid;
use twodview::variable::finite_range;
use twodview::CPosition;

/// Print the contents of a grid file and the C-grid derived from it.
#[derive(Parser, Debug)]
#[command(name = "inspect_grid")]
struct Cli {
    /// Grid NetCDF file
    path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = &cli.path;

    println!("Inspecting grid file: {}", path.display());

    let file = netcdf::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    println!("\n=== FILE INFORMATION ===");

    println!("\nDimensions:");
    for dim in file.dimensions() {
        println!(
            "  {} = {} {}",
            dim.name(),
            dim.len(),
            if dim.is_unlimited() { "(unlimited)" } else { "" }
        );
    }

    println!("\nVariables:");
    for var in file.variables() {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| format!("{} = {}", d.name(), d.len()))
            .collect();
        println!("  {} ({:?}) [{}]", var.name(), var.vartype(), dims.join(", "));
    }

    println!("\nGlobal Attributes:");
    for attr in file.attributes() {
        match attr.value() {
            Ok(val) => println!("  {}: {:?}", attr.name(), val),
            Err(e) => println!("  {}: error reading value: {}", attr.name(), e),
        }
    }

    let grid = load_grid(path, None).context("Not a usable C-grid file")?;
    let hgrid = &grid.hgrid;

    println!("\n=== C-GRID ===");
    println!("  name: {}", grid.name);
    match grid.vgrid {
        Some(vgrid) => println!("  s-levels: {}", vgrid.n_levels),
        None => println!("  s-levels: none"),
    }
    for position in [CPosition::Rho, CPosition::U, CPosition::V, CPosition::Psi] {
        let (m, l) = hgrid.shape_at(position);
        println!("  {:>3}: {} x {}", position.name(), m, l);
    }

    if let (Some((lon_min, lon_max)), Some((lat_min, lat_max))) =
        (finite_range(&hgrid.lon_rho), finite_range(&hgrid.lat_rho))
    {
        println!("  lon: {:.3} .. {:.3}", lon_min, lon_max);
        println!("  lat: {:.3} .. {:.3}", lat_min, lat_max);
    }

    let cells = hgrid.mask_rho.len();
    let water = hgrid.mask_rho.iter().filter(|&&m| m != 0.0).count();
    println!(
        "  water cells: {} of {} ({:.1}%)",
        water,
        cells,
        100.0 * water as f64 / cells as f64
    );

    Ok(())
}
