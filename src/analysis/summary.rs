use crate::data::Dataset;
use ndarray::{Array1, ArrayView1, Axis};
use ndarray_stats::interpolate::Linear;
use ndarray_stats::QuantileExt;
use noisy_float::types::n64;
use serde::Serialize;

pub const STATISTIC_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Values in the order of `STATISTIC_NAMES`
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryStatistics {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryStatistics {
    /// Describes every uploaded numeric column; derived columns are left out
    pub fn describe(dataset: &Dataset) -> Self {
        let columns = dataset
            .numeric_columns(false)
            .into_iter()
            .filter_map(|column| {
                let values = column.to_array()?;
                Some(summarize(&column.name, values.view()))
            })
            .collect();
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Helper function to summarize one column, skipping NaN cells
pub fn summarize(name: &str, values: ArrayView1<f64>) -> ColumnSummary {
    let mut present: Array1<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    let count = present.len();

    let mean = present.mean().unwrap_or(f64::NAN);
    let std = if count > 1 { present.std(1.0) } else { f64::NAN };

    ColumnSummary {
        name: name.to_string(),
        count,
        mean,
        std,
        min: *present.min_skipnan(),
        q25: quantile(&mut present, 0.25),
        q50: quantile(&mut present, 0.5),
        q75: quantile(&mut present, 0.75),
        max: *present.max_skipnan(),
    }
}

/// Linear-interpolated quantile, NaN for an empty input
pub fn quantile(values: &mut Array1<f64>, q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values
        .quantile_axis_skipnan_mut(Axis(0), n64(q), &Linear)
        .map(|result| result.into_scalar())
        .unwrap_or(f64::NAN)
}
