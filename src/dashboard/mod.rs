pub mod catalog;
pub mod chart;
pub mod pipeline;

pub use chart::{Chart, ChartData, Series};
pub use pipeline::Pipeline;

use crate::analysis::summary::STATISTIC_NAMES;
use crate::analysis::SummaryStatistics;
use crate::config::DashboardConfig;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl From<&SummaryStatistics> for Table {
    /// One row per statistic, one column per summarized dataset column
    fn from(summary: &SummaryStatistics) -> Self {
        if summary.is_empty() {
            return Table::default();
        }

        let mut headers = vec![String::new()];
        headers.extend(summary.columns.iter().map(|c| c.name.clone()));

        let rows = STATISTIC_NAMES
            .iter()
            .enumerate()
            .map(|(i, stat)| {
                let mut row = vec![stat.to_string()];
                row.extend(
                    summary
                        .columns
                        .iter()
                        .map(|c| format_statistic(c.values()[i])),
                );
                row
            })
            .collect();

        Table { headers, rows }
    }
}

fn format_statistic(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Section {
    Heading(String),
    Table(Table),
    Chart(Chart),
    Notice(String),
    List(Vec<String>),
    Error(String),
}

/// Everything one pipeline run produced, top to bottom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub intro: String,
    pub sections: Vec<Section>,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            intro: config.intro.clone(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn error(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match s {
            Section::Error(message) => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn headings(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn charts(&self) -> Vec<&Chart> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Chart(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn chart(&self, title: &str) -> Option<&Chart> {
        self.charts().into_iter().find(|c| c.title == title)
    }

    pub fn notices(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Notice(n) => Some(n.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summary::summarize;
    use ndarray::array;

    #[test]
    fn test_summary_table_layout() {
        let summary = SummaryStatistics {
            columns: vec![
                summarize("Open", array![1.0, 3.0].view()),
                summarize("Close", array![f64::NAN].view()),
            ],
        };
        let table = Table::from(&summary);

        assert_eq!(table.headers, vec!["", "Open", "Close"]);
        assert_eq!(table.rows.len(), 8);
        assert_eq!(table.rows[0], vec!["count", "2.000000", "0.000000"]);
        assert_eq!(table.rows[1], vec!["mean", "2.000000", "NaN"]);
        assert_eq!(table.rows[7][0], "max");
    }

    #[test]
    fn test_empty_summary_table() {
        let table = Table::from(&SummaryStatistics::default());
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
