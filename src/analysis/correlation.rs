use crate::data::Dataset;
use ndarray::{Array1, Array2};
use ndarray_stats::CorrelationExt;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Pairwise Pearson correlation over the numeric columns. Returns `None`
    /// when fewer than two columns take part.
    pub fn compute(dataset: &Dataset, include_derived: bool) -> Option<Self> {
        let columns = dataset.numeric_columns(include_derived);
        if columns.len() < 2 {
            return None;
        }

        let labels: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let series: Vec<Array1<f64>> = columns.iter().filter_map(|c| c.to_array()).collect();

        let k = series.len();
        let mut values = Array2::from_elem((k, k), f64::NAN);
        for i in 0..k {
            for j in 0..=i {
                let r = pairwise_pearson(&series[i], &series[j]);
                values[[i, j]] = r;
                values[[j, i]] = r; // Symmetric
            }
        }

        Some(Self { labels, values })
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[[i, j]])
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }
}

/// Helper function to correlate two columns over the rows where both are present
fn pairwise_pearson(x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len();
    let observations = Array2::from_shape_fn((2, n), |(var, obs)| {
        if var == 0 {
            pairs[obs].0
        } else {
            pairs[obs].1
        }
    });

    observations
        .pearson_correlation()
        .map(|corr| corr[[0, 1]])
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DataLoader;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_correlation() {
        let data =
            DataLoader::from_bytes(b"Open,Close,Volume\n1,2,30\n2,4,20\n3,6,10\n").unwrap();
        let corr = CorrelationMatrix::compute(&data, false).unwrap();

        assert_eq!(corr.labels, vec!["Open", "Close", "Volume"]);
        assert_relative_eq!(corr.get("Open", "Close").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(corr.get("Close", "Volume").unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(corr.get("Volume", "Volume").unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(corr.rows().len(), 3);
    }

    #[test]
    fn test_missing_values_are_pairwise() {
        let data = DataLoader::from_bytes(b"Open,Close\n1,2\n2,\n3,6\n4,8\n").unwrap();
        let corr = CorrelationMatrix::compute(&data, false).unwrap();
        assert_relative_eq!(corr.get("Open", "Close").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_not_enough_columns() {
        let data = DataLoader::from_bytes(b"Close,Ticker\n1,A\n2,B\n").unwrap();
        assert!(CorrelationMatrix::compute(&data, false).is_none());
    }

    #[test]
    fn test_single_row_is_nan() {
        let data = DataLoader::from_bytes(b"Open,Close\n1,2\n").unwrap();
        let corr = CorrelationMatrix::compute(&data, false).unwrap();
        assert!(corr.get("Open", "Close").unwrap().is_nan());
    }
}
