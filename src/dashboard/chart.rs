use crate::analysis::{BoxStats, HistogramBin};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Chart input, already reduced to what the figure needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Line {
        x_label: String,
        x: Vec<String>,
        series: Vec<Series>,
    },
    Area {
        x_label: String,
        x: Vec<String>,
        series: Series,
    },
    Scatter {
        x_label: String,
        y_label: String,
        x: Vec<f64>,
        y: Vec<f64>,
        color: Vec<f64>,
    },
    Histogram {
        x_label: String,
        bins: Vec<HistogramBin>,
    },
    Bar {
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        values: Vec<f64>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Box {
        x_label: String,
        y_label: String,
        boxes: Vec<BoxStats>,
    },
    Heatmap {
        labels: Vec<String>,
        z: Vec<Vec<f64>>,
    },
}

impl ChartData {
    pub fn kind(&self) -> &'static str {
        match self {
            ChartData::Line { .. } => "line",
            ChartData::Area { .. } => "area",
            ChartData::Scatter { .. } => "scatter",
            ChartData::Histogram { .. } => "histogram",
            ChartData::Bar { .. } => "bar",
            ChartData::Pie { .. } => "pie",
            ChartData::Box { .. } => "box",
            ChartData::Heatmap { .. } => "heatmap",
        }
    }

    /// Number of marks drawn: points, bins, bars, slices, boxes or cells
    pub fn len(&self) -> usize {
        match self {
            ChartData::Line { x, .. } | ChartData::Area { x, .. } => x.len(),
            ChartData::Scatter { x, .. } => x.len(),
            ChartData::Histogram { bins, .. } => bins.len(),
            ChartData::Bar { categories, .. } => categories.len(),
            ChartData::Pie { labels, .. } => labels.len(),
            ChartData::Box { boxes, .. } => boxes.len(),
            ChartData::Heatmap { labels, .. } => labels.len() * labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub data: ChartData,
}

impl Chart {
    pub fn new(title: impl Into<String>, data: ChartData) -> Self {
        Self {
            title: title.into(),
            data,
        }
    }
}
