pub mod aggregate;
pub mod correlation;
pub mod distribution;
pub mod summary;

pub use aggregate::{AggregateView, Reduction};
pub use correlation::CorrelationMatrix;
pub use distribution::{BoxStats, HistogramBin};
pub use summary::{ColumnSummary, SummaryStatistics};
