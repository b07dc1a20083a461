use super::catalog::catalog;
use super::{Dashboard, Section, Table};
use crate::analysis::SummaryStatistics;
use crate::config::DashboardConfig;
use crate::data::loader::DataLoader;
use crate::data::{Dataset, Result};
use tracing::{debug, info, warn};

pub struct Pipeline<'a> {
    config: &'a DashboardConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline over one uploaded CSV. Parse and date errors
    /// stop the run and end the dashboard with an error section.
    pub fn run(&self, bytes: &[u8]) -> Dashboard {
        let mut dashboard = Dashboard::new(self.config);
        if let Err(err) = self.fill(&mut dashboard, bytes) {
            warn!(error = %err, "dashboard aborted");
            dashboard.push(Section::Error(err.to_string()));
        }
        dashboard
    }

    /// Loads the CSV and applies date conversion and derived columns
    pub fn prepare(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut dataset = DataLoader::from_bytes(bytes)?;
        DataLoader::convert_dates(&mut dataset, &self.config.date_formats)?;
        dataset.derive_calendar_columns();
        Ok(dataset)
    }

    fn fill(&self, dashboard: &mut Dashboard, bytes: &[u8]) -> Result<()> {
        let mut dataset = DataLoader::from_bytes(bytes)?;
        info!(
            rows = dataset.n_rows(),
            columns = dataset.n_cols(),
            "dataset loaded"
        );

        dashboard.push(Section::Heading("Dataset Preview".to_string()));
        dashboard.push(Section::Table(Table {
            headers: dataset
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
            rows: dataset.head(self.config.preview_rows),
        }));

        DataLoader::convert_dates(&mut dataset, &self.config.date_formats)?;
        dataset.derive_calendar_columns();

        let summary = SummaryStatistics::describe(&dataset);
        dashboard.push(Section::Heading("Summary Statistics".to_string()));
        dashboard.push(Section::Table(Table::from(&summary)));

        for section in catalog() {
            if !section.is_satisfied(&dataset) {
                debug!(section = section.subheader, requires = ?section.requires, "skipped");
                continue;
            }
            if let Some(body) = section.build(&dataset, self.config) {
                dashboard.push(Section::Heading(section.subheader.to_string()));
                dashboard.push(body);
            }
        }

        dashboard.push(Section::Heading("Key Insights".to_string()));
        dashboard.push(Section::List(self.config.insights.clone()));

        info!(charts = dashboard.charts().len(), "dashboard built");
        Ok(())
    }
}
