//! NXlog-shaped records for saving and restoring a run's logs and TimeROI.
//!
//! The core only defines the record types and the conversion to and from a
//! [`Run`]; the on-disk layout belongs to the persistence collaborator,
//! which typically serializes these with serde.

use serde::{Deserialize, Serialize};

use crate::logs::{LogValue, Run, TimeSeries};
use crate::time::{IntervalError, TimeRoi};

/// A single log entry: numeric scalar, text, or timestamped series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordValue {
    Scalar(f64),
    Text(String),
    Series {
        units: String,
        times: Vec<i64>,
        values: Vec<f64>,
    },
}

/// A named log entry as stored in an NXlog-style group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub name: String,
    pub value: RecordValue,
}

/// Everything needed to restore a run: its logs plus the flat TimeROI
/// boundary list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub logs: Vec<LogRecord>,
    pub roi: Vec<i64>,
}

impl From<&LogValue> for RecordValue {
    fn from(value: &LogValue) -> Self {
        match value {
            LogValue::Scalar(v) => RecordValue::Scalar(*v),
            LogValue::Text(s) => RecordValue::Text(s.clone()),
            LogValue::Series(series) => RecordValue::Series {
                units: series.units().to_string(),
                times: series.times().to_vec(),
                values: series.values().to_vec(),
            },
        }
    }
}

impl From<RecordValue> for LogValue {
    fn from(value: RecordValue) -> Self {
        match value {
            RecordValue::Scalar(v) => LogValue::Scalar(v),
            RecordValue::Text(s) => LogValue::Text(s),
            RecordValue::Series { units, times, values } => {
                let mut series = TimeSeries::new(units);
                for (time, value) in times.into_iter().zip(values) {
                    series.add(time, value);
                }
                LogValue::Series(series)
            }
        }
    }
}

impl Run {
    /// Export the run's properties and TimeROI for the persistence
    /// collaborator. Logs are emitted in name order so the record is
    /// deterministic.
    pub fn to_record(&self) -> RunRecord {
        let logs = self
            .property_names()
            .into_iter()
            .filter_map(|name| {
                self.property(&name).ok().map(|value| LogRecord {
                    name,
                    value: RecordValue::from(&value),
                })
            })
            .collect();
        RunRecord {
            logs,
            roi: self.time_roi().to_boundaries(),
        }
    }

    /// Restore a run from a record: properties first, then the TimeROI.
    pub fn from_record(record: RunRecord) -> Result<Run, IntervalError> {
        let run = Run::new();
        for log in record.logs {
            run.add_property(log.name, LogValue::from(log.value));
        }
        run.set_time_roi(TimeRoi::from_boundaries(&record.roi)?);
        Ok(run)
    }
}
