//! plotly.js figure descriptions for dashboard charts

use crate::dashboard::{Chart, ChartData};
use serde_json::{json, Value};

pub fn figure(chart: &Chart) -> Value {
    let (data, mut layout) = match &chart.data {
        ChartData::Line { x_label, x, series } => {
            let traces: Vec<Value> = series
                .iter()
                .map(|s| {
                    json!({
                        "type": "scatter",
                        "mode": "lines",
                        "name": s.name,
                        "x": x,
                        "y": s.values,
                    })
                })
                .collect();
            let y_title = match series.as_slice() {
                [only] => only.name.clone(),
                _ => "value".to_string(),
            };
            (traces, axes(x_label, &y_title))
        }
        ChartData::Area { x_label, x, series } => (
            vec![json!({
                "type": "scatter",
                "mode": "lines",
                "fill": "tozeroy",
                "name": series.name,
                "x": x,
                "y": series.values,
            })],
            axes(x_label, &series.name),
        ),
        ChartData::Scatter {
            x_label,
            y_label,
            x,
            y,
            color,
        } => (
            vec![json!({
                "type": "scatter",
                "mode": "markers",
                "x": x,
                "y": y,
                "marker": {
                    "color": color,
                    "colorscale": "Plasma",
                    "showscale": true,
                    "colorbar": { "title": { "text": y_label } },
                },
            })],
            axes(x_label, y_label),
        ),
        ChartData::Histogram { x_label, bins } => {
            let centers: Vec<f64> = bins.iter().map(|b| (b.start + b.end) / 2.0).collect();
            let widths: Vec<f64> = bins.iter().map(|b| b.end - b.start).collect();
            let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
            let mut layout = axes(x_label, "count");
            layout["bargap"] = json!(0);
            (
                vec![json!({
                    "type": "bar",
                    "x": centers,
                    "y": counts,
                    "width": widths,
                    "name": x_label,
                })],
                layout,
            )
        }
        ChartData::Bar {
            x_label,
            y_label,
            categories,
            values,
        } => {
            let mut layout = axes(x_label, y_label);
            layout["xaxis"]["type"] = json!("category");
            (
                vec![json!({
                    "type": "bar",
                    "x": categories,
                    "y": values,
                })],
                layout,
            )
        }
        ChartData::Pie { labels, values } => (
            vec![json!({
                "type": "pie",
                "labels": labels,
                "values": values,
            })],
            json!({}),
        ),
        ChartData::Box {
            x_label,
            y_label,
            boxes,
        } => {
            let mut traces: Vec<Value> = boxes
                .iter()
                .map(|b| {
                    json!({
                        "type": "box",
                        "name": b.label,
                        "x": [b.label],
                        "q1": [b.q1],
                        "median": [b.median],
                        "q3": [b.q3],
                        "lowerfence": [b.lower_fence],
                        "upperfence": [b.upper_fence],
                        "mean": [b.mean],
                        "showlegend": false,
                    })
                })
                .collect();
            let (outlier_x, outlier_y): (Vec<&str>, Vec<f64>) = boxes
                .iter()
                .flat_map(|b| b.outliers.iter().map(move |&y| (b.label.as_str(), y)))
                .unzip();
            if !outlier_y.is_empty() {
                traces.push(json!({
                    "type": "scatter",
                    "mode": "markers",
                    "name": "outliers",
                    "x": outlier_x,
                    "y": outlier_y,
                    "showlegend": false,
                }));
            }
            let mut layout = axes(x_label, y_label);
            layout["xaxis"]["type"] = json!("category");
            (traces, layout)
        }
        ChartData::Heatmap { labels, z } => (
            vec![json!({
                "type": "heatmap",
                "x": labels,
                "y": labels,
                "z": z,
                "zmin": -1,
                "zmax": 1,
                "colorscale": "RdBu",
                "texttemplate": "%{z:.2f}",
            })],
            json!({ "yaxis": { "autorange": "reversed" } }),
        ),
    };

    layout["title"] = json!({ "text": chart.title });
    json!({ "data": data, "layout": layout })
}

fn axes(x_title: &str, y_title: &str) -> Value {
    json!({
        "xaxis": { "title": { "text": x_title } },
        "yaxis": { "title": { "text": y_title } },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{BoxStats, HistogramBin};
    use crate::dashboard::Series;

    #[test]
    fn test_dual_line_figure() {
        let chart = Chart::new(
            "High vs. Low Prices Over Time",
            ChartData::Line {
                x_label: "Date".to_string(),
                x: vec!["2020-01-01".to_string(), "2020-01-02".to_string()],
                series: vec![
                    Series {
                        name: "High".to_string(),
                        values: vec![2.0, 3.0],
                    },
                    Series {
                        name: "Low".to_string(),
                        values: vec![1.0, f64::NAN],
                    },
                ],
            },
        );
        let fig = figure(&chart);

        assert_eq!(fig["data"].as_array().unwrap().len(), 2);
        assert_eq!(fig["data"][1]["name"], "Low");
        assert!(fig["data"][1]["y"][1].is_null());
        assert_eq!(fig["layout"]["title"]["text"], "High vs. Low Prices Over Time");
        assert_eq!(fig["layout"]["yaxis"]["title"]["text"], "value");
    }

    #[test]
    fn test_histogram_figure() {
        let chart = Chart::new(
            "Distribution of Close Prices",
            ChartData::Histogram {
                x_label: "Close".to_string(),
                bins: vec![
                    HistogramBin {
                        start: 0.0,
                        end: 2.0,
                        count: 3,
                    },
                    HistogramBin {
                        start: 2.0,
                        end: 4.0,
                        count: 1,
                    },
                ],
            },
        );
        let fig = figure(&chart);
        assert_eq!(fig["data"][0]["x"], json!([1.0, 3.0]));
        assert_eq!(fig["data"][0]["y"], json!([3, 1]));
        assert_eq!(fig["layout"]["bargap"], 0);
    }

    #[test]
    fn test_box_outliers_trace() {
        let boxes = vec![BoxStats::compute("2020", &[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap()];
        let chart = Chart::new(
            "Close Price Distribution by Year",
            ChartData::Box {
                x_label: "Year".to_string(),
                y_label: "Close".to_string(),
                boxes,
            },
        );
        let fig = figure(&chart);
        let data = fig["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["median"], json!([3.0]));
        assert_eq!(data[1]["y"], json!([100.0]));
    }
}
