use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub max_upload_bytes: Option<usize>, // None disables the body limit
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            max_upload_bytes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub company: String,
    pub intro: String,
    pub preview_rows: usize,
    pub histogram_bins: usize,
    pub date_formats: Vec<String>,
    pub correlate_derived_columns: bool,
    pub insights: Vec<String>,
    pub server: ServerSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Tesla Data Analysis Dashboard".to_string(),
            company: "Tesla".to_string(),
            intro: "Analyze Tesla's stock data with comprehensive visualizations and insights."
                .to_string(),
            preview_rows: 5,
            histogram_bins: 30,
            date_formats: default_date_formats(),
            correlate_derived_columns: true,
            insights: default_insights(),
            server: ServerSettings::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise falls back to the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%b-%Y",
        "%Y%m%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ]
    .map(String::from)
    .to_vec()
}

fn default_insights() -> Vec<String> {
    [
        "**Close Price Trends**: Observe the overall performance of Tesla's stock over the selected timeframe.",
        "**Volume Trends**: High trading volumes often correspond to significant price changes or events.",
        "**Yearly Patterns**: Use average close prices by year to identify trends and growth.",
        "**Volatility Analysis**: Box plots show how much the stock price fluctuates yearly.",
        "**Correlation Analysis**: Understand relationships between features like Volume, Close Price, and others.",
    ]
    .map(String::from)
    .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.insights.len(), 5);
        assert_eq!(config.date_formats[0], "%Y-%m-%d");
        assert!(config.correlate_derived_columns);
        assert!(config.server.max_upload_bytes.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "company: Acme").unwrap();
        writeln!(file, "histogram_bins: 12").unwrap();
        writeln!(file, "server:").unwrap();
        writeln!(file, "  bind: 0.0.0.0:9000").unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.company, "Acme");
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.title, "Tesla Data Analysis Dashboard");
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preview_rows: [not, a, number]").unwrap();
        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
