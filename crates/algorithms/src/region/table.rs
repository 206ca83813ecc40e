//! In-memory table of extracted cells

use gridscore_core::{Error, Result};

/// One extracted cell: its grid position and one value per table column
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRow {
    pub row: usize,
    pub col: usize,
    pub values: Vec<f64>,
}

/// Fixed-width table of extracted cells.
///
/// Every row carries exactly one value per named column. Row and column
/// indices are positions in the grids the table was extracted from and
/// are never transformed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<TabularRow>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Column names, in value order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TabularRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, checking its width
    pub fn push(&mut self, row: TabularRow) -> Result<()> {
        if row.values.len() != self.columns.len() {
            return Err(Error::InvalidParameter {
                name: "row",
                value: format!("({}, {})", row.row, row.col),
                reason: format!(
                    "has {} values for {} columns",
                    row.values.len(),
                    self.columns.len()
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Index of a named column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::InvalidParameter {
                name: "column",
                value: name.to_string(),
                reason: "not a table column".into(),
            })
    }

    /// Fails unless `index` names a column of this table
    pub fn check_column(&self, index: usize) -> Result<()> {
        if index < self.columns.len() {
            Ok(())
        } else {
            Err(Error::InvalidParameter {
                name: "column",
                value: index.to_string(),
                reason: format!("table has {} columns", self.columns.len()),
            })
        }
    }

    /// Copy of one column's values, in row order
    pub fn column(&self, index: usize) -> Result<Vec<f64>> {
        self.check_column(index)?;
        Ok(self.rows.iter().map(|r| r.values[index]).collect())
    }

    /// Overwrite one column with `values` (one per row, in row order)
    pub(crate) fn set_column(&mut self, index: usize, values: &[f64]) {
        debug_assert_eq!(values.len(), self.rows.len());
        for (row, &v) in self.rows.iter_mut().zip(values) {
            row.values[index] = v;
        }
    }
}
