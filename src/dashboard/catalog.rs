//! The fixed chart catalog. Each section names the columns it needs and a
//! builder that only runs once those columns are present.

use super::chart::{Chart, ChartData, Series};
use super::Section;
use crate::analysis::aggregate::group_values;
use crate::analysis::distribution::histogram;
use crate::analysis::{AggregateView, BoxStats, CorrelationMatrix, Reduction};
use crate::config::DashboardConfig;
use crate::data::{Dataset, ADJ_CLOSE, CLOSE, DATE, HIGH, LOW, MONTH, VOLUME, YEAR};

pub const NOT_ENOUGH_NUMERIC: &str = "Not enough numerical columns for Correlation Matrix.";

type Builder = fn(&Dataset, &DashboardConfig) -> Option<Section>;

pub struct ChartSection {
    pub subheader: &'static str,
    pub requires: &'static [&'static str],
    build: Builder,
}

impl ChartSection {
    /// True when every required column exists with a usable type
    pub fn is_satisfied(&self, dataset: &Dataset) -> bool {
        self.requires.iter().all(|&name| match name {
            DATE => dataset.dates(DATE).is_some(),
            YEAR | MONTH => dataset.integers(name).is_some(),
            _ => dataset.has_numeric(name),
        })
    }

    pub fn build(&self, dataset: &Dataset, config: &DashboardConfig) -> Option<Section> {
        (self.build)(dataset, config)
    }
}

pub fn catalog() -> [ChartSection; 10] {
    [
        ChartSection {
            subheader: "Close Price Over Time",
            requires: &[DATE, CLOSE],
            build: close_over_time,
        },
        ChartSection {
            subheader: "Volume vs. Close Price",
            requires: &[CLOSE, VOLUME],
            build: volume_vs_close,
        },
        ChartSection {
            subheader: "Close Price Distribution",
            requires: &[CLOSE],
            build: close_histogram,
        },
        ChartSection {
            subheader: "Average Close Price by Year",
            requires: &[YEAR, CLOSE],
            build: average_close_by_year,
        },
        ChartSection {
            subheader: "Volume Distribution by Year",
            requires: &[YEAR, VOLUME],
            build: volume_by_year,
        },
        ChartSection {
            subheader: "Close Price Distribution by Year",
            requires: &[YEAR, CLOSE],
            build: close_box_by_year,
        },
        ChartSection {
            subheader: "High vs. Low Prices Over Time",
            requires: &[DATE, HIGH, LOW],
            build: high_vs_low,
        },
        ChartSection {
            subheader: "Correlation Matrix",
            requires: &[],
            build: correlation_heatmap,
        },
        ChartSection {
            subheader: "Total Volume by Month",
            requires: &[MONTH, VOLUME],
            build: volume_by_month,
        },
        ChartSection {
            subheader: "Adjusted Close Price Over Time",
            requires: &[DATE, ADJ_CLOSE],
            build: adj_close_area,
        },
    ]
}

/// Helper function to line up numeric columns against the date axis,
/// skipping rows without a date
fn dated_series(dataset: &Dataset, columns: &[&str]) -> Option<(Vec<String>, Vec<Series>)> {
    let dates = dataset.dates(DATE)?;
    let rows: Vec<usize> = (0..dates.len()).filter(|&i| dates[i].is_some()).collect();
    let x = rows
        .iter()
        .filter_map(|&i| dates[i].map(|d| d.to_string()))
        .collect();

    let mut series = Vec::with_capacity(columns.len());
    for &name in columns {
        let values = dataset.numeric(name)?;
        series.push(Series {
            name: name.to_string(),
            values: rows.iter().map(|&i| values[i]).collect(),
        });
    }
    Some((x, series))
}

fn close_over_time(dataset: &Dataset, config: &DashboardConfig) -> Option<Section> {
    let (x, series) = dated_series(dataset, &[CLOSE])?;
    Some(Section::Chart(Chart::new(
        format!("{} Close Price Over Time", config.company),
        ChartData::Line {
            x_label: DATE.to_string(),
            x,
            series,
        },
    )))
}

fn volume_vs_close(dataset: &Dataset, _config: &DashboardConfig) -> Option<Section> {
    let close = dataset.numeric(CLOSE)?;
    let volume = dataset.numeric(VOLUME)?;
    let (x, y): (Vec<f64>, Vec<f64>) = close
        .iter()
        .zip(volume.iter())
        .filter(|(c, v)| !c.is_nan() && !v.is_nan())
        .map(|(&c, &v)| (c, v))
        .unzip();

    Some(Section::Chart(Chart::new(
        "Volume vs. Close Price",
        ChartData::Scatter {
            x_label: CLOSE.to_string(),
            y_label: VOLUME.to_string(),
            color: y.clone(),
            x,
            y,
        },
    )))
}

fn close_histogram(dataset: &Dataset, config: &DashboardConfig) -> Option<Section> {
    let close = dataset.numeric(CLOSE)?;
    Some(Section::Chart(Chart::new(
        "Distribution of Close Prices",
        ChartData::Histogram {
            x_label: CLOSE.to_string(),
            bins: histogram(close.view(), config.histogram_bins),
        },
    )))
}

fn average_close_by_year(dataset: &Dataset, _config: &DashboardConfig) -> Option<Section> {
    let view = AggregateView::compute(dataset, YEAR, CLOSE, Reduction::Mean)?;
    Some(Section::Chart(Chart::new(
        "Average Close Price by Year",
        bar_from_view(&view),
    )))
}

fn volume_by_year(dataset: &Dataset, _config: &DashboardConfig) -> Option<Section> {
    let view = AggregateView::compute(dataset, YEAR, VOLUME, Reduction::Sum)?;
    Some(Section::Chart(Chart::new(
        "Volume Distribution by Year",
        ChartData::Pie {
            labels: view.keys().iter().map(|k| k.to_string()).collect(),
            values: view.values(),
        },
    )))
}

fn close_box_by_year(dataset: &Dataset, _config: &DashboardConfig) -> Option<Section> {
    let groups = group_values(dataset, YEAR, CLOSE)?;
    let boxes = groups
        .iter()
        .filter_map(|(year, values)| BoxStats::compute(year.to_string(), values))
        .collect();

    Some(Section::Chart(Chart::new(
        "Close Price Distribution by Year",
        ChartData::Box {
            x_label: YEAR.to_string(),
            y_label: CLOSE.to_string(),
            boxes,
        },
    )))
}

fn high_vs_low(dataset: &Dataset, _config: &DashboardConfig) -> Option<Section> {
    let (x, series) = dated_series(dataset, &[HIGH, LOW])?;
    Some(Section::Chart(Chart::new(
        "High vs. Low Prices Over Time",
        ChartData::Line {
            x_label: DATE.to_string(),
            x,
            series,
        },
    )))
}

fn correlation_heatmap(dataset: &Dataset, config: &DashboardConfig) -> Option<Section> {
    let section = match CorrelationMatrix::compute(dataset, config.correlate_derived_columns) {
        Some(matrix) => Section::Chart(Chart::new(
            "Correlation Matrix",
            ChartData::Heatmap {
                z: matrix.rows(),
                labels: matrix.labels,
            },
        )),
        None => Section::Notice(NOT_ENOUGH_NUMERIC.to_string()),
    };
    Some(section)
}

fn volume_by_month(dataset: &Dataset, _config: &DashboardConfig) -> Option<Section> {
    let view = AggregateView::compute(dataset, MONTH, VOLUME, Reduction::Sum)?;
    Some(Section::Chart(Chart::new(
        "Total Volume by Month",
        bar_from_view(&view),
    )))
}

fn adj_close_area(dataset: &Dataset, _config: &DashboardConfig) -> Option<Section> {
    let (x, mut series) = dated_series(dataset, &[ADJ_CLOSE])?;
    Some(Section::Chart(Chart::new(
        "Adjusted Close Price Over Time",
        ChartData::Area {
            x_label: DATE.to_string(),
            x,
            series: series.pop()?,
        },
    )))
}

fn bar_from_view(view: &AggregateView) -> ChartData {
    ChartData::Bar {
        x_label: view.key.clone(),
        y_label: view.value.clone(),
        categories: view.keys().iter().map(|k| k.to_string()).collect(),
        values: view.values(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DataLoader;

    fn prepared(csv: &str) -> Dataset {
        let mut dataset = DataLoader::from_bytes(csv.as_bytes()).unwrap();
        DataLoader::convert_dates(&mut dataset, &DashboardConfig::default().date_formats).unwrap();
        dataset.derive_calendar_columns();
        dataset
    }

    fn satisfied(dataset: &Dataset) -> Vec<&'static str> {
        catalog()
            .iter()
            .filter(|s| s.is_satisfied(dataset))
            .map(|s| s.subheader)
            .collect()
    }

    #[test]
    fn test_catalog_order() {
        let subheaders: Vec<_> = catalog().iter().map(|s| s.subheader).collect();
        assert_eq!(subheaders.len(), 10);
        assert_eq!(subheaders[0], "Close Price Over Time");
        assert_eq!(subheaders[7], "Correlation Matrix");
        assert_eq!(subheaders[9], "Adjusted Close Price Over Time");
    }

    #[test]
    fn test_close_only() {
        let dataset = prepared("Close\n1\n2\n");
        assert_eq!(
            satisfied(&dataset),
            vec!["Close Price Distribution", "Correlation Matrix"]
        );
    }

    #[test]
    fn test_non_numeric_close_is_skipped() {
        let dataset = prepared("Date,Close\n2020-01-01,closed\n");
        assert_eq!(satisfied(&dataset), vec!["Correlation Matrix"]);
    }

    #[test]
    fn test_missing_close_cells_keep_charts() {
        let dataset = prepared("Date,Close\n2020-01-01,n/a\n2020-01-02,null\n2020-01-03,5\n");
        assert_eq!(
            satisfied(&dataset),
            vec![
                "Close Price Over Time",
                "Close Price Distribution",
                "Average Close Price by Year",
                "Close Price Distribution by Year",
                "Correlation Matrix",
            ]
        );
    }

    #[test]
    fn test_date_and_volume_without_close() {
        let dataset = prepared("Date,Volume\n2020-01-01,10\n2020-02-01,20\n");
        assert_eq!(
            satisfied(&dataset),
            vec![
                "Volume Distribution by Year",
                "Correlation Matrix",
                "Total Volume by Month"
            ]
        );
    }

    #[test]
    fn test_heatmap_counts_derived_columns() {
        let dataset = prepared("Date,Close\n2019-01-01,1\n2020-01-01,2\n2021-01-01,3\n");
        let sections = catalog();
        let heatmap = &sections[7];
        match heatmap.build(&dataset, &DashboardConfig::default()) {
            Some(Section::Chart(chart)) => match chart.data {
                ChartData::Heatmap { labels, .. } => {
                    assert_eq!(labels, vec!["Close", "Year", "Month"])
                }
                other => panic!("unexpected chart: {:?}", other),
            },
            other => panic!("unexpected section: {:?}", other),
        }

        let config = DashboardConfig {
            correlate_derived_columns: false,
            ..DashboardConfig::default()
        };
        assert_eq!(
            heatmap.build(&dataset, &config),
            Some(Section::Notice(NOT_ENOUGH_NUMERIC.to_string()))
        );
    }

    #[test]
    fn test_dated_series_skips_missing_dates() {
        let dataset = prepared("Date,High,Low\n2020-01-01,2,1\n,5,4\n2020-01-03,3,2\n");
        let (x, series) = dated_series(&dataset, &[HIGH, LOW]).unwrap();
        assert_eq!(x, vec!["2020-01-01", "2020-01-03"]);
        assert_eq!(series[0].values, vec![2.0, 3.0]);
        assert_eq!(series[1].values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_scatter_drops_incomplete_rows() {
        let dataset = prepared("Close,Volume\n1,10\n2,\n3,30\n");
        match volume_vs_close(&dataset, &DashboardConfig::default()) {
            Some(Section::Chart(chart)) => match chart.data {
                ChartData::Scatter { x, y, color, .. } => {
                    assert_eq!(x, vec![1.0, 3.0]);
                    assert_eq!(y, vec![10.0, 30.0]);
                    assert_eq!(color, y);
                }
                other => panic!("unexpected chart: {:?}", other),
            },
            other => panic!("unexpected section: {:?}", other),
        }
    }
}
