//! The `run` and `validate` stages

use anyhow::{Context, Result};
use gridscore_algorithms::prelude::*;
use gridscore_core::io::{write_ascii_grid, AsciiGridOptions};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{ReportVariant, RunConfig};
use crate::report;
use crate::spinner;

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub region: RegionSummary,
    pub diagnostics: usize,
    /// Grids written, in layer order, z-score before normalized
    pub outputs: Vec<PathBuf>,
}

/// Read every configured layer into an aligned grid set
pub fn load_layers(config: &RunConfig) -> Result<GridSet> {
    let pb = spinner("Reading layers...");
    let mut grids = GridSet::new();
    for layer in &config.layers {
        pb.set_message(format!("Reading {}...", layer.name));
        let loaded = Layer::read(&layer.name, &layer.path, layer.kind)
            .with_context(|| format!("Failed to read layer '{}'", layer.name))?;
        grids.push(loaded)?;
    }
    pb.finish_and_clear();

    grids.validate().context("Layers are not aligned")?;
    if let Some((rows, cols)) = grids.shape() {
        info!("Loaded {} layers of {} x {}", grids.len(), cols, rows);
    }
    Ok(grids)
}

/// Run the whole pipeline described by `config`.
///
/// Diagnostics are flushed before any transform runs, so they survive a
/// later failure. No grid is written unless every column transformed.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let grids = load_layers(config)?;

    let extraction = extract_region(&grids, &config.extract_params())?;
    let region = extraction.summary.clone();
    info!(
        "Region: {} cells selected, {} emitted, {} incomplete",
        region.selected, region.emitted, region.incomplete
    );
    if let (Some(rows), Some(cols)) = (region.row_bounds, region.col_bounds) {
        info!("Region extent: rows {}..={}, columns {}..={}", rows.0, rows.1, cols.0, cols.1);
    }

    report::emit_diagnostics(&extraction.diagnostics, config.diagnostics.as_deref())?;
    if !extraction.diagnostics.is_empty() {
        warn!("{} cells have missing data", extraction.diagnostics.len());
    }

    let out = ColumnTransform.execute(extraction.table.clone(), config.column_specs())?;
    for column in &out.columns {
        match column.shift {
            Some(shift) => info!(
                "{}: mean {:.4}, std {:.4}, shift {}",
                column.name, column.raw.mean, column.raw.std_dev, shift
            ),
            None => info!(
                "{}: mean {:.4}, std {:.4}",
                column.name, column.raw.mean, column.raw.std_dev
            ),
        }
    }

    // Build every output in memory before touching the filesystem
    let mut rasters = Vec::new();
    for layer in config.transformed() {
        let source = grids
            .get(&layer.name)
            .with_context(|| format!("Layer '{}' was not loaded", layer.name))?;
        let mut zscore = source.to_real()?;
        let mut normalized = source.to_real()?;
        scatter(&out.zscores, [(layer.name.as_str(), &mut zscore)])?;
        scatter(&out.normalized, [(layer.name.as_str(), &mut normalized)])?;

        let (z_path, n_path) = layer.output_paths(&config.output_dir);
        rasters.push((z_path, zscore));
        rasters.push((n_path, normalized));
    }

    let table = match config.report_variant {
        ReportVariant::Raw => &extraction.table,
        ReportVariant::Zscore => &out.zscores,
        ReportVariant::Normalized => &out.normalized,
    };
    report::write_report(table, config.report.as_deref())?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;

    let options = AsciiGridOptions {
        precision: config.precision,
    };
    let pb = spinner("Writing outputs...");
    let mut outputs = Vec::with_capacity(rasters.len());
    for (path, raster) in rasters {
        pb.set_message(format!("Writing {}...", path.display()));
        write_ascii_grid(&raster, &path, Some(options.clone()))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        outputs.push(path);
    }
    pb.finish_and_clear();

    Ok(RunSummary {
        region,
        diagnostics: extraction.diagnostics.len(),
        outputs,
    })
}
