pub mod html;
pub mod plotly;
pub mod text;

use crate::dashboard::Dashboard;
use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Text,
    Json,
}

pub trait Renderer {
    fn render(&self, dashboard: &Dashboard, out: &mut dyn Write) -> io::Result<()>;

    fn render_to_string(&self, dashboard: &Dashboard) -> io::Result<String> {
        let mut buf = Vec::new();
        self.render(dashboard, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, dashboard: &Dashboard, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, dashboard)?;
        writeln!(out)
    }
}

pub fn renderer(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Html => Box::new(html::HtmlRenderer),
        OutputFormat::Text => Box::new(text::TextRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// Splits `**bold**` markup into (text, is_bold) runs
pub(crate) fn emphasis_runs(text: &str) -> Vec<(&str, bool)> {
    text.split("**")
        .enumerate()
        .filter(|(_, run)| !run.is_empty())
        .map(|(i, run)| (run, i % 2 == 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::Pipeline;

    #[test]
    fn test_emphasis_runs() {
        assert_eq!(
            emphasis_runs("**Trends**: look"),
            vec![("Trends", true), (": look", false)]
        );
        assert_eq!(emphasis_runs("plain"), vec![("plain", false)]);
    }

    #[test]
    fn test_json_export() {
        let config = DashboardConfig::default();
        let dashboard = Pipeline::new(&config).run(b"Open,Close\n1,\n2,4\n3,6\n");
        let json = JsonRenderer.render_to_string(&dashboard).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Tesla Data Analysis Dashboard");
        let sections = value["sections"].as_array().unwrap();
        assert_eq!(sections[0]["type"], "heading");
        assert_eq!(sections[0]["content"], "Dataset Preview");
        assert!(sections
            .iter()
            .any(|s| s["type"] == "chart" && s["content"]["data"]["kind"] == "heatmap"));
    }
}
