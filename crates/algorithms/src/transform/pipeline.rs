//! Two-variant column transform
//!
//! Takes a completed [`Table`] and produces two transformed copies:
//!
//! - **zscores**: every included column standardized as is
//! - **normalized**: every included column reshaped (when it has a
//!   reshape) and then standardized
//!
//! Columns not included pass through both copies unchanged.

use super::reshape::Reshape;
use super::standardize::{standardize, ColumnStats};
use crate::region::Table;
use gridscore_core::{Algorithm, Error, Result};
use tracing::debug;

/// Per-column transform configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Table column this spec applies to
    pub name: String,
    /// Reshape applied before standardizing in the normalized variant
    pub reshape: Option<Reshape>,
    /// Whether the column is standardized at all
    pub transform: bool,
}

impl ColumnSpec {
    /// A column copied through untouched
    pub fn passthrough(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reshape: None,
            transform: false,
        }
    }

    /// A column standardized without reshaping
    pub fn standardized(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reshape: None,
            transform: true,
        }
    }

    pub fn with_reshape(mut self, reshape: Reshape) -> Self {
        self.reshape = Some(reshape);
        self
    }
}

/// Statistics recorded for one transformed column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReport {
    pub name: String,
    /// Statistics of the raw column
    pub raw: ColumnStats,
    /// Shift used by the reshape, if any
    pub shift: Option<f64>,
    /// Statistics of the reshaped column before standardizing
    pub reshaped: Option<ColumnStats>,
}

/// Both transformed variants of a table
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Standardized without reshaping
    pub zscores: Table,
    /// Reshaped, then standardized
    pub normalized: Table,
    /// One entry per transformed column, in table order
    pub columns: Vec<ColumnReport>,
}

/// Column transform algorithm
#[derive(Debug, Clone, Default)]
pub struct ColumnTransform;

impl Algorithm for ColumnTransform {
    type Input = Table;
    type Output = TransformOutput;
    type Params = Vec<ColumnSpec>;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ColumnTransform"
    }

    fn description(&self) -> &'static str {
        "Reshape and z-score table columns into raw and normalized variants"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        transform_columns(&input, &params)
    }
}

/// Transform the columns of a completed table.
///
/// Every statistic is taken over exactly the rows in `table`. Reshape
/// domains are checked over the whole column before any value changes.
///
/// # Errors
/// - `InvalidParameter` if a spec names a column twice or names a column
///   the table does not have
/// - `EmptyRegion` if a column is to be transformed but the table is empty
/// - `Domain` if a shifted value falls outside its reshape's domain
/// - `DegenerateColumn` if a column to be standardized has no spread
pub fn transform_columns(table: &Table, specs: &[ColumnSpec]) -> Result<TransformOutput> {
    let mut plan: Vec<Option<&ColumnSpec>> = vec![None; table.columns().len()];
    for spec in specs {
        let idx = table.column_index(&spec.name)?;
        if plan[idx].is_some() {
            return Err(Error::InvalidParameter {
                name: "column",
                value: spec.name.clone(),
                reason: "configured more than once".into(),
            });
        }
        plan[idx] = Some(spec);
    }

    let included = plan.iter().flatten().any(|s| s.transform);
    if included && table.is_empty() {
        return Err(Error::EmptyRegion);
    }

    let mut zscores = table.clone();
    let mut normalized = table.clone();
    let mut columns = Vec::new();

    for (idx, spec) in plan.into_iter().enumerate() {
        let Some(spec) = spec.filter(|s| s.transform) else {
            continue;
        };

        let raw = table.column(idx)?;
        let raw_stats = ColumnStats::of(&raw).ok_or(Error::EmptyRegion)?;

        let mut z = raw.clone();
        standardize(&mut z).ok_or_else(|| Error::DegenerateColumn(spec.name.clone()))?;
        zscores.set_column(idx, &z);

        let (shift, reshaped) = match spec.reshape {
            Some(reshape) => {
                let shift = reshape.resolve_shift(&raw);
                let mut values = reshape_column(table, idx, &spec.name, reshape, shift)?;
                let reshaped = ColumnStats::of(&values);
                standardize(&mut values)
                    .ok_or_else(|| Error::DegenerateColumn(spec.name.clone()))?;
                normalized.set_column(idx, &values);
                (Some(shift), reshaped)
            }
            None => {
                normalized.set_column(idx, &z);
                (None, None)
            }
        };

        debug!(
            column = %spec.name,
            mean = raw_stats.mean,
            std_dev = raw_stats.std_dev,
            min = raw_stats.min,
            max = raw_stats.max,
            shift = ?shift,
            "column transformed"
        );

        columns.push(ColumnReport {
            name: spec.name.clone(),
            raw: raw_stats,
            shift,
            reshaped,
        });
    }

    Ok(TransformOutput {
        zscores,
        normalized,
        columns,
    })
}

/// Reshaped copy of one column, checking the domain of every value first
fn reshape_column(
    table: &Table,
    idx: usize,
    name: &str,
    reshape: Reshape,
    shift: f64,
) -> Result<Vec<f64>> {
    if let Some(bad) = table
        .rows()
        .iter()
        .find(|r| !reshape.in_domain(r.values[idx], shift))
    {
        return Err(Error::Domain {
            column: name.to_string(),
            function: reshape.name(),
            row: bad.row,
            col: bad.col,
            value: bad.values[idx],
            shift,
        });
    }

    Ok(table
        .rows()
        .iter()
        .map(|r| reshape.apply(r.values[idx], shift))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::TabularRow;
    use crate::transform::ReshapeShift;
    use approx::assert_relative_eq;

    fn table(columns: &[&str], rows: Vec<Vec<f64>>) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for (i, values) in rows.into_iter().enumerate() {
            t.push(TabularRow { row: i, col: 2 * i, values }).unwrap();
        }
        t
    }

    fn sample() -> Table {
        table(
            &["pop", "dem", "port"],
            vec![
                vec![5.0, -42.0, 0.0],
                vec![10.0, 100.0, 3.0],
                vec![0.0, 1000.0, 8.0],
                vec![7.0, 5000.0, 24.0],
            ],
        )
    }

    fn specs() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::passthrough("pop"),
            ColumnSpec::standardized("dem").with_reshape(Reshape::log(43.0)),
            ColumnSpec::standardized("port").with_reshape(Reshape::sqrt(1.0)),
        ]
    }

    fn assert_standard(values: &[f64]) {
        let stats = ColumnStats::of(values).unwrap();
        assert_relative_eq!(stats.mean, 0.0, epsilon = 1e-10);
        assert_relative_eq!(stats.std_dev, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_both_variants_standardized() {
        let t = sample();
        let out = transform_columns(&t, &specs()).unwrap();

        for idx in [1, 2] {
            assert_standard(&out.zscores.column(idx).unwrap());
            assert_standard(&out.normalized.column(idx).unwrap());
        }
        assert_ne!(out.zscores.column(1).unwrap(), out.normalized.column(1).unwrap());
    }

    #[test]
    fn test_passthrough_and_positions_untouched() {
        let t = sample();
        let out = transform_columns(&t, &specs()).unwrap();

        assert_eq!(out.zscores.column(0).unwrap(), t.column(0).unwrap());
        assert_eq!(out.normalized.column(0).unwrap(), t.column(0).unwrap());
        for (a, b) in out.normalized.rows().iter().zip(t.rows()) {
            assert_eq!((a.row, a.col), (b.row, b.col));
        }
    }

    #[test]
    fn test_normalized_matches_manual_reshape() {
        let t = sample();
        let out = transform_columns(&t, &specs()).unwrap();

        let mut expected: Vec<f64> = t.column(2).unwrap().iter().map(|v| (v + 1.0).sqrt()).collect();
        standardize(&mut expected).unwrap();
        for (a, b) in out.normalized.column(2).unwrap().iter().zip(&expected) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_eq!(out.columns.len(), 2);
        assert_eq!(out.columns[1].shift, Some(1.0));
    }

    #[test]
    fn test_without_reshape_variants_agree() {
        let t = sample();
        let out = transform_columns(&t, &[ColumnSpec::standardized("dem")]).unwrap();
        assert_eq!(out.zscores.column(1).unwrap(), out.normalized.column(1).unwrap());
        // Columns without a spec are copied
        assert_eq!(out.zscores.column(2).unwrap(), t.column(2).unwrap());
    }

    #[test]
    fn test_domain_violation_rejected() {
        let t = sample();
        let specs = vec![ColumnSpec::standardized("dem").with_reshape(Reshape::log(42.0))];

        match transform_columns(&t, &specs) {
            Err(Error::Domain {
                column, row, col, value, ..
            }) => {
                assert_eq!(column, "dem");
                assert_eq!((row, col), (0, 0));
                assert_eq!(value, -42.0);
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_shift_from_minimum() {
        let t = sample();
        let specs = vec![ColumnSpec::standardized("dem").with_reshape(Reshape::Log {
            shift: ReshapeShift::FromMinimum,
        })];
        let out = transform_columns(&t, &specs).unwrap();
        assert_eq!(out.columns[0].shift, Some(43.0));
        assert_standard(&out.normalized.column(1).unwrap());
    }

    #[test]
    fn test_degenerate_and_empty() {
        let constant = table(&["a"], vec![vec![3.0], vec![3.0]]);
        assert!(matches!(
            transform_columns(&constant, &[ColumnSpec::standardized("a")]),
            Err(Error::DegenerateColumn(name)) if name == "a"
        ));

        let empty = table(&["a"], vec![]);
        assert!(matches!(
            transform_columns(&empty, &[ColumnSpec::standardized("a")]),
            Err(Error::EmptyRegion)
        ));
        assert!(transform_columns(&empty, &[ColumnSpec::passthrough("a")]).is_ok());
    }

    #[test]
    fn test_bad_specs() {
        let t = sample();
        assert!(transform_columns(&t, &[ColumnSpec::standardized("nope")]).is_err());
        assert!(transform_columns(
            &t,
            &[ColumnSpec::standardized("dem"), ColumnSpec::passthrough("dem")]
        )
        .is_err());
    }

    #[test]
    fn test_algorithm_trait() {
        let algo = ColumnTransform;
        assert_eq!(algo.name(), "ColumnTransform");
        let out = algo.execute(sample(), specs()).unwrap();
        assert_eq!(out.zscores.len(), 4);

        let untouched = algo.execute_default(sample()).unwrap();
        assert_eq!(untouched.zscores, sample());
    }
}
