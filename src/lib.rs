//! Chopper: In-Memory Neutron Event Storage and Aggregation
//!
//! The core of a time-of-flight data-reduction stack: detector events are
//! stored compactly per spectrum, filtered and split by arbitrary time
//! windows, histogrammed, algebraically combined with error propagation, and
//! compressed within a tolerance, while run logs (temperature, proton
//! charge) are reduced to single values over the same time windows.
//!
//! # Features
//!
//! - **TimeROI**: sorted included/excluded time intervals with union,
//!   intersection, masking and duration queries
//! - **TimeSplitter**: time -> destination map that routes events across
//!   output workspaces
//! - **EventList**: three promotable event representations with sorting,
//!   histogramming, scaling and tolerance-based compression
//! - **Run logs**: time-weighted statistics over time-series logs behind an
//!   invalidation-aware cache
//!
//! # Example
//!
//! ```
//! use chopper::events::{EventList, TofEvent};
//! use chopper::time::TimeRoi;
//!
//! let mut events = EventList::from_tof_events(
//!     (0..100).map(|i| TofEvent::new(i as f64, i * 1_000_000)).collect(),
//! );
//!
//! // keep only the first half of the run
//! let roi = TimeRoi::from_interval(0, 50_000_000).unwrap();
//! events.filter_in_place(&roi).unwrap();
//!
//! // histogram the surviving time-of-flight values
//! let x: Vec<f64> = (0..=10).map(|i| i as f64 * 10.0).collect();
//! let (y, _e) = events.generate_histogram(&x).unwrap();
//! assert_eq!(y.iter().sum::<f64>(), 50.0);
//! ```

pub mod events;
pub mod logs;
pub mod persist;
pub mod progress;
pub mod time;

// Re-export commonly used types
pub use events::{EventError, EventList, EventType, SortOrder, TofEvent};
pub use logs::{LogError, LogValue, Run, Statistic, TimeSeries};
pub use progress::InterruptToken;
pub use time::{IntervalError, TimeRoi, TimeSplitter, NO_TARGET};

/// Top-level error type combining every layer's failures.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("interval error: {0}")]
    Interval(#[from] IntervalError),

    #[error("event error: {0}")]
    Event(#[from] EventError),

    #[error("log error: {0}")]
    Log(#[from] LogError),
}
