//! Z-score standardization
//!
//! Population statistics over a fully collected column. The mean is found
//! in one pass and the variance in a second pass over the same values;
//! there is no running estimate.

/// Summary statistics of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Statistics of `values`, `None` when empty
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        Some(Self {
            count,
            mean,
            std_dev: var.sqrt(),
            min,
            max,
        })
    }

    /// Whether the spread is too small to divide by
    pub fn is_degenerate(&self) -> bool {
        !(self.std_dev.is_finite() && self.std_dev > self.mean.abs() * 1e-12)
    }
}

/// Replace every value by its z-score, `(x - mean) / std_dev`.
///
/// Returns the statistics used, or `None` (leaving `values` untouched)
/// when the column is empty or has no spread.
pub fn standardize(values: &mut [f64]) -> Option<ColumnStats> {
    let stats = ColumnStats::of(values)?;
    if stats.is_degenerate() {
        return None;
    }
    for v in values.iter_mut() {
        *v = (*v - stats.mean) / stats.std_dev;
    }
    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stats() {
        let stats = ColumnStats::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.std_dev, 2.0);
        assert_eq!((stats.min, stats.max), (2.0, 9.0));
    }

    #[test]
    fn test_standardize_two_values() {
        let mut values = [10.0, 20.0];
        let stats = standardize(&mut values).unwrap();
        assert_relative_eq!(stats.mean, 15.0);
        assert_relative_eq!(stats.std_dev, 5.0);
        assert_relative_eq!(values[0], -1.0);
        assert_relative_eq!(values[1], 1.0);
    }

    #[test]
    fn test_standardized_moments() {
        let mut values: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 * 1.7 + 3.0).collect();
        standardize(&mut values).unwrap();

        let after = ColumnStats::of(&values).unwrap();
        assert_relative_eq!(after.mean, 0.0, epsilon = 1e-10);
        assert_relative_eq!(after.std_dev, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_degenerate_columns() {
        assert!(standardize(&mut []).is_none());

        let mut constant = [0.1, 0.1, 0.1];
        assert!(standardize(&mut constant).is_none());
        assert_eq!(constant, [0.1, 0.1, 0.1]);
    }
}
