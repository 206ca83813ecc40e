//! Region extraction
//!
//! Walks an aligned [`GridSet`] in row-major order and collects every cell
//! inside the region of interest into a [`Table`]. A cell is in the region
//! when the selector layer holds exactly the selector value there.
//!
//! Cells where a non-ignorable layer is missing are reported as
//! [`MissingnessDiagnostic`]s whether or not they are in the region. These
//! never stop the pass. With [`ExtractParams::skip_uniform_missing`] a cell
//! where every non-ignorable layer is missing counts as lying outside the
//! data extent and is not reported.

use super::table::{TabularRow, Table};
use gridscore_core::{GridSet, Result};
use tracing::{debug, info};

/// Parameters for region extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractParams {
    /// Layer whose value defines the region
    pub selector_layer: String,
    /// Selector value, compared exactly
    pub selector_value: f64,
    /// Layers whose missing cells do not produce diagnostics
    pub ignore_missing: Vec<String>,
    /// Do not report cells where every non-ignorable layer is missing
    pub skip_uniform_missing: bool,
}

impl ExtractParams {
    pub fn new(selector_layer: impl Into<String>, selector_value: f64) -> Self {
        Self {
            selector_layer: selector_layer.into(),
            selector_value,
            ignore_missing: Vec::new(),
            skip_uniform_missing: false,
        }
    }

    pub fn ignoring(mut self, layer: impl Into<String>) -> Self {
        self.ignore_missing.push(layer.into());
        self
    }

    pub fn skipping_uniform_missing(mut self) -> Self {
        self.skip_uniform_missing = true;
        self
    }
}

/// A cell where at least one non-ignorable layer has no data
#[derive(Debug, Clone, PartialEq)]
pub struct MissingnessDiagnostic {
    pub row: usize,
    pub col: usize,
    /// Raw value of every layer in set order, sentinels included
    pub values: Vec<f64>,
}

/// Counts and extent of the selected region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSummary {
    /// Cells whose selector matched
    pub selected: usize,
    /// Cells emitted into the table
    pub emitted: usize,
    /// Selected cells dropped because some layer was missing
    pub incomplete: usize,
    /// Inclusive (min, max) row of the selected cells
    pub row_bounds: Option<(usize, usize)>,
    /// Inclusive (min, max) column of the selected cells
    pub col_bounds: Option<(usize, usize)>,
}

impl RegionSummary {
    fn include(&mut self, row: usize, col: usize) {
        self.selected += 1;
        self.row_bounds = Some(widen(self.row_bounds, row));
        self.col_bounds = Some(widen(self.col_bounds, col));
    }
}

fn widen(bounds: Option<(usize, usize)>, v: usize) -> (usize, usize) {
    match bounds {
        Some((lo, hi)) => (lo.min(v), hi.max(v)),
        None => (v, v),
    }
}

/// Result of one extraction pass
#[derive(Debug, Clone)]
pub struct Extraction {
    pub table: Table,
    pub diagnostics: Vec<MissingnessDiagnostic>,
    pub summary: RegionSummary,
}

/// Extract the region of interest from a set of aligned layers.
///
/// Table columns are the non-selector layers in set order. A selected cell
/// is emitted only when no layer at all is missing there.
///
/// # Errors
/// Fails before reading any cell if the layers are not aligned or a layer
/// named in `params` is not in the set.
pub fn extract_region(grids: &GridSet, params: &ExtractParams) -> Result<Extraction> {
    grids.validate()?;

    let selector = grids.index_of(&params.selector_layer)?;
    let mut ignorable = vec![false; grids.len()];
    for name in &params.ignore_missing {
        ignorable[grids.index_of(name)?] = true;
    }

    let columns = grids
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != selector)
        .map(|(_, l)| l.name().to_string())
        .collect();
    let mut table = Table::new(columns);
    let mut diagnostics = Vec::new();
    let mut summary = RegionSummary::default();

    let (rows, cols) = grids.shape().unwrap_or((0, 0));
    let mut cell: Vec<Option<f64>> = Vec::with_capacity(grids.len());

    for row in 0..rows {
        for col in 0..cols {
            cell.clear();
            for layer in grids {
                cell.push(layer.value(row, col)?);
            }

            if cell[selector] == Some(params.selector_value) {
                summary.include(row, col);

                if cell.iter().all(Option::is_some) {
                    let values = cell
                        .iter()
                        .enumerate()
                        .filter(|&(i, _)| i != selector)
                        .filter_map(|(_, v)| *v)
                        .collect();
                    table.push(TabularRow { row, col, values })?;
                    summary.emitted += 1;
                } else {
                    summary.incomplete += 1;
                }
            }

            let mut checked = cell.iter().zip(&ignorable).filter(|&(_, &ignored)| !ignored);
            let diagnosed = if params.skip_uniform_missing {
                let (missing, total) = checked
                    .fold((0usize, 0usize), |(m, t), (v, _)| (m + usize::from(v.is_none()), t + 1));
                missing > 0 && missing < total
            } else {
                checked.any(|(v, _)| v.is_none())
            };
            if diagnosed {
                let values = grids
                    .iter()
                    .map(|l| l.raw(row, col))
                    .collect::<Result<Vec<_>>>()?;
                diagnostics.push(MissingnessDiagnostic { row, col, values });
            }
        }
    }

    info!(
        selected = summary.selected,
        emitted = summary.emitted,
        incomplete = summary.incomplete,
        "region extracted"
    );
    debug!(
        rows = ?summary.row_bounds,
        cols = ?summary.col_bounds,
        diagnostics = diagnostics.len(),
        "region extent"
    );

    Ok(Extraction {
        table,
        diagnostics,
        summary,
    })
}
