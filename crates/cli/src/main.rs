//! gridscore CLI - regional z-scores over aligned ASCII grids

mod config;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gridscore_core::io::read_ascii_grid;
use gridscore_core::{Raster, RasterElement};

use crate::config::RunConfig;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "gridscore")]
#[command(author, version, about = "Regional z-scores over aligned ASCII grids", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the region, standardize and write every output
    Run {
        /// Run configuration (TOML)
        config: PathBuf,
    },
    /// Read every layer and check alignment without writing anything
    Validate {
        /// Run configuration (TOML)
        config: PathBuf,
    },
    /// Show information about an ASCII grid file
    Info {
        /// Input grid file
        input: PathBuf,
        /// Read cells as integers
        #[arg(short, long)]
        integer: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")
}

pub(crate) fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: &Path) -> Result<RunConfig> {
    let config = RunConfig::load(path)?;
    info!(
        "Config: {} layers, selector {} = {}",
        config.layers.len(),
        config.selector.layer,
        config.selector.value
    );
    Ok(config)
}

fn print_info<T: RasterElement>(input: &Path, raster: &Raster<T>) {
    let (rows, cols) = raster.shape();
    let bounds = raster.bounds();
    let stats = raster.statistics();

    println!("File: {}", input.display());
    println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
    println!("Cell size: {}", raster.cell_size());
    println!(
        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.0, bounds.1, bounds.2, bounds.3
    );
    let (x, y) = raster.pixel_to_geo(0, 0);
    println!("First cell centre: ({:.6}, {:.6})", x, y);
    if let Some(nodata) = raster.nodata() {
        println!("NoData: {}", nodata);
    }
    println!("\nStatistics:");
    if let Some(min) = stats.min {
        println!("  Min: {:.4}", min);
    }
    if let Some(max) = stats.max {
        println!("  Max: {:.4}", max);
    }
    if let Some(mean) = stats.mean {
        println!("  Mean: {:.4}", mean);
    }
    if !raster.is_empty() {
        println!(
            "  Valid cells: {} ({:.1}%)",
            stats.valid_count,
            100.0 * stats.valid_count as f64 / raster.len() as f64
        );
    }
}

fn read_info<T: RasterElement>(input: &Path) -> Result<()> {
    let pb = spinner("Reading grid...");
    let raster: Raster<T> = read_ascii_grid(input).context("Failed to read grid")?;
    pb.finish_and_clear();
    print_info(input, &raster);
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Run { config } => {
            let config = load_config(&config)?;
            let start = Instant::now();
            let summary = pipeline::run(&config)?;
            let elapsed = start.elapsed();

            // stdout may carry the report, so the summary goes to the log
            if summary.diagnostics > 0 {
                info!("{} cells reported with missing data", summary.diagnostics);
            }
            info!(
                "Region: {} of {} selected cells used",
                summary.region.emitted, summary.region.selected
            );
            for path in &summary.outputs {
                info!("Saved: {}", path.display());
            }
            info!("Processing time: {:.2?}", elapsed);
        }

        Commands::Validate { config } => {
            let config = load_config(&config)?;
            let grids = pipeline::load_layers(&config)?;
            println!("{} layers aligned", grids.len());
            for layer in &grids {
                let (rows, cols) = layer.shape();
                println!("  {}: {:?}, {} x {}", layer.name(), layer.kind(), cols, rows);
            }
        }

        Commands::Info { input, integer } => {
            if integer {
                read_info::<i64>(&input)?;
            } else {
                read_info::<f64>(&input)?;
            }
        }
    }

    Ok(())
}
