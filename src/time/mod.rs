//! Time-interval machinery: region-of-interest filters and destination maps.
//!
//! Timestamps throughout the crate are `i64` nanoseconds since the Unix
//! epoch, matching the resolution of accelerator pulse times. `chrono` is
//! used at the edges for human-facing construction and display.

pub mod roi;
pub mod splitter;

pub use roi::TimeRoi;
pub use splitter::{TimeSplitter, NO_TARGET};

use chrono::{DateTime, Utc};

/// Nanoseconds per second, as the integer used for timestamp arithmetic.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Convert a UTC datetime to epoch nanoseconds.
///
/// Returns `None` for datetimes outside the representable range
/// (roughly 1677..=2262).
pub fn nanos_from_datetime(dt: DateTime<Utc>) -> Option<i64> {
    dt.timestamp_nanos_opt()
}

/// Convert epoch nanoseconds back to a UTC datetime.
pub fn datetime_from_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

/// Elapsed seconds between two epoch-nanosecond timestamps.
pub fn seconds_between(start: i64, stop: i64) -> f64 {
    (stop - start) as f64 / NANOS_PER_SEC as f64
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("invalid interval: start {start} must be before stop {stop}")]
    InvalidInterval { start: i64, stop: i64 },

    #[error("invalid boundary list: {0}")]
    InvalidBoundaries(String),

    #[error("invalid destination index {0}")]
    InvalidDestination(i32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let nanos = nanos_from_datetime(dt).unwrap();
        assert_eq!(datetime_from_nanos(nanos), dt);
    }

    #[test]
    fn test_seconds_between() {
        let start = nanos_from_datetime(Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap()).unwrap();
        let stop = nanos_from_datetime(Utc.with_ymd_and_hms(2023, 1, 2, 0, 1, 0).unwrap()).unwrap();
        assert_eq!(seconds_between(start, stop), 60.0);
    }
}
