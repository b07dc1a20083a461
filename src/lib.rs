//! Stock price dashboard: load a CSV of daily prices, derive calendar
//! columns, summarize the numeric columns and build a fixed catalog of
//! charts, each drawn only when the columns it needs are present.

pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod render;
pub mod server;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Pipeline, Section};
pub use data::loader::DataLoader;
pub use data::{DataError, Dataset};
