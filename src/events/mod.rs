//! Per-detector event containers.
//!
//! An [`EventList`] holds detector events in exactly one of three
//! representations (raw time-of-flight, weighted, weighted without pulse
//! time) and carries the arithmetic, sorting, histogramming and compression
//! machinery that operates on them. Representation changes only ever promote
//! (never demote) along `Tof < Weighted < WeightedNoTime`.

pub mod event;
pub mod list;

mod arithmetic;
mod compress;
mod histogram;
mod sorting;
mod split;

pub use event::{EventType, TofEvent, WeightedEvent, WeightedEventNoTime};
pub use list::{EventList, SortOrder};

/// Errors for event-list operations. The variants form a small closed set so
/// callers can branch on kind rather than message text.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EventError {
    #[error("{op} is not supported for {found:?} events")]
    TypeMismatch {
        op: &'static str,
        found: EventType,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("domain error: {0}")]
    Domain(String),

    #[error("operation interrupted")]
    Interrupted,
}
