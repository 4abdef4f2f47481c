//! Run-attached logs and their time-filtered statistics.
//!
//! A [`Run`] owns named log properties (scalars, strings and time series),
//! the active [`TimeRoi`](crate::time::TimeRoi), and a statistics cache that
//! guarantees at most one recomputation per `(log, statistic)` key between
//! invalidations.

pub mod aggregate;
pub mod cache;
pub mod run;
pub mod series;
pub mod statistics;

pub use aggregate::sum_events_by_log_value;
pub use cache::{CacheStats, StatisticsCache};
pub use run::{Run, INTEGRATED_CHARGE_PROPERTY};
pub use series::TimeSeries;
pub use statistics::Statistic;

use serde::{Deserialize, Serialize};

/// A named log's value: a plain number, a text value, or a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogValue {
    Scalar(f64),
    Text(String),
    Series(TimeSeries),
}

/// Errors for the log layer. Lookup failures are distinct from type
/// mismatches so callers can offer name suggestions at a higher level.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LogError {
    #[error("no property named '{0}'")]
    NotFound(String),

    #[error("property '{name}' has the wrong type: {reason}")]
    TypeMismatch { name: String, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation interrupted")]
    Interrupted,
}
