use super::summary::quantile;
use ndarray::{Array1, ArrayView1};
use ndarray_stats::QuantileExt;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the non-missing values. The last bin is
/// closed on the right so the maximum is counted.
pub fn histogram(values: ArrayView1<f64>, n_bins: usize) -> Vec<HistogramBin> {
    let present: Array1<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if present.is_empty() || n_bins == 0 {
        return Vec::new();
    }

    let min = *present.min_skipnan();
    let max = *present.max_skipnan();
    if min == max {
        return vec![HistogramBin {
            start: min - 0.5,
            end: max + 0.5,
            count: present.len(),
        }];
    }

    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == n_bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &x in present.iter() {
        let idx = (((x - min) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Five-number summary of one box with 1.5 IQR whiskers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub label: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn compute(label: impl Into<String>, values: &[f64]) -> Option<Self> {
        let mut present: Array1<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
        if present.is_empty() {
            return None;
        }

        let mean = present.mean().unwrap_or(f64::NAN);
        let q1 = quantile(&mut present, 0.25);
        let median = quantile(&mut present, 0.5);
        let q3 = quantile(&mut present, 0.75);
        let iqr = q3 - q1;
        let low_limit = q1 - 1.5 * iqr;
        let high_limit = q3 + 1.5 * iqr;

        let inside = present.iter().copied().filter(|&x| x >= low_limit && x <= high_limit);
        let lower_fence = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_fence = inside.fold(f64::NEG_INFINITY, f64::max);

        let mut outliers: Vec<f64> = present
            .iter()
            .copied()
            .filter(|&x| x < low_limit || x > high_limit)
            .collect();
        outliers.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            label: label.into(),
            q1,
            median,
            q3,
            lower_fence,
            upper_fence,
            mean,
            outliers,
        })
    }
}
