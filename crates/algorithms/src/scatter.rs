//! Scatter-back
//!
//! Writes table columns back into rasters at the cell each row came from.
//! Cells without a table row keep whatever the target already holds.

use crate::region::Table;
use gridscore_core::{Raster, Result};

/// Write one table column into `target`.
///
/// Returns the number of cells written.
pub fn scatter_column(table: &Table, column: usize, target: &mut Raster<f64>) -> Result<usize> {
    table.check_column(column)?;
    for row in table.rows() {
        target.set(row.row, row.col, row.values[column])?;
    }
    Ok(table.len())
}

/// Write each named column into its target raster.
///
/// # Errors
/// Fails on an unknown column name or a row position outside a target.
pub fn scatter<'a, I>(table: &Table, targets: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a mut Raster<f64>)>,
{
    for (name, target) in targets {
        let column = table.column_index(name)?;
        scatter_column(table, column, target)?;
    }
    Ok(())
}
