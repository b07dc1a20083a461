use crate::data::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reduction {
    Mean,
    Sum,
}

/// Grouped reduction of one numeric column by an integer key column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateView {
    pub key: String,
    pub value: String,
    pub reduction: Reduction,
    pub rows: Vec<(i32, f64)>,
}

impl AggregateView {
    /// Groups `value` by `key`. Rows with a missing key are dropped, missing
    /// values are skipped. Keys come out in ascending order.
    pub fn compute(
        dataset: &Dataset,
        key: &str,
        value: &str,
        reduction: Reduction,
    ) -> Option<Self> {
        let keys = dataset.integers(key)?;
        let values = dataset.numeric(value)?;

        let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for (k, &v) in keys.iter().zip(values.iter()) {
            let Some(k) = k else { continue };
            let entry = groups.entry(*k).or_insert((0.0, 0));
            if !v.is_nan() {
                entry.0 += v;
                entry.1 += 1;
            }
        }

        let rows = groups
            .into_iter()
            .map(|(k, (sum, n))| {
                let reduced = match reduction {
                    Reduction::Sum => sum,
                    Reduction::Mean if n == 0 => f64::NAN,
                    Reduction::Mean => sum / n as f64,
                };
                (k, reduced)
            })
            .collect();

        Some(Self {
            key: key.to_string(),
            value: value.to_string(),
            reduction,
            rows,
        })
    }

    pub fn keys(&self) -> Vec<i32> {
        self.rows.iter().map(|(k, _)| *k).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|(_, v)| *v).collect()
    }
}

/// Values of `value` partitioned by `key`, keys ascending, NaN cells dropped
pub fn group_values(
    dataset: &Dataset,
    key: &str,
    value: &str,
) -> Option<BTreeMap<i32, Vec<f64>>> {
    let keys = dataset.integers(key)?;
    let values = dataset.numeric(value)?;

    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (k, &v) in keys.iter().zip(values.iter()) {
        if let Some(k) = k {
            let group = groups.entry(*k).or_default();
            if !v.is_nan() {
                group.push(v);
            }
        }
    }
    Some(groups)
}
