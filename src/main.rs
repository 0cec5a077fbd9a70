//! twodview - plot a 2-D slice of a C-grid variable
//!
//! This is the command-line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{error, info};

use twodview::config::Args;
use twodview::data_loader::load_grid;
use twodview::{init_tracing, Config, GridRef, GridRegistry, TimeIndex, VarInput};

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_args(&args).context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    info!("Starting twodview v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let registry = match &config.grid_registry {
        Some(path) => Some(
            GridRegistry::load(path)
                .with_context(|| format!("Failed to load grid registry {}", path.display()))?,
        ),
        None => None,
    };

    let time = TimeIndex::from_raw(args.time_index);
    let mut options = config.plot.clone();

    // GRID is a file when one exists at that path, a registry id otherwise
    let grid_path = Path::new(&args.grid);
    let (loaded, data_file) = if grid_path.exists() {
        let grid = load_grid(grid_path, None)
            .with_context(|| format!("Failed to load grid {}", grid_path.display()))?;
        (Some(grid), grid_path.to_path_buf())
    } else {
        let registry = registry
            .as_ref()
            .with_context(|| format!("{} is not a file and no grid registry is set", args.grid))?;
        (None, registry.grid_path(&args.grid)?)
    };
    let grid = match &loaded {
        Some(grid) => GridRef::Grid(grid),
        None => GridRef::Id(args.grid.clone()),
    };

    if options.filename.is_none() {
        options.filename = Some(data_file);
    }

    let plot = twodview::twodview(
        VarInput::Name(args.var.clone()),
        time,
        grid,
        registry.as_ref(),
        &options,
    )
    .with_context(|| format!("Failed to plot {}", args.var))?;

    info!(
        variable = %args.var,
        position = %plot.position,
        projection = plot.map.as_ref().map(|m| m.kind.name()).unwrap_or("none"),
        cmin = plot.scale.cmin,
        cmax = plot.scale.cmax,
        "Plot complete"
    );
    if options.outfile.is_none() {
        info!("No --outfile given, figure not saved");
    }

    Ok(())
}
