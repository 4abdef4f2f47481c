//! Sort modes and order-tag bookkeeping.

use std::cmp::Ordering;

use rayon::prelude::*;

use super::event::EventType;
use super::list::{EventList, EventStorage};
use super::EventError;

/// Lists at or above this size are sorted with the rayon parallel sort;
/// smaller lists use the sequential one.
pub(crate) const PARALLEL_SORT_MIN_EVENTS: usize = 100_000;

use super::list::SortOrder;

fn sort_with<T, F>(events: &mut [T], compare: F)
where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    if events.len() >= PARALLEL_SORT_MIN_EVENTS {
        events.par_sort_unstable_by(compare);
    } else {
        events.sort_unstable_by(compare);
    }
}

/// Arrival time at the sample, in nanoseconds: the pulse time corrected by
/// the flight-path factor applied to TOF plus a fixed shift.
pub(crate) fn corrected_time(pulse_time: i64, tof: f64, tof_factor: f64, tof_shift: f64) -> i64 {
    pulse_time + (tof_factor * (tof * 1000.0) + tof_shift * 1e9) as i64
}

impl EventList {
    /// Sort into the requested order; `Unsorted` is a no-op. Time-at-sample
    /// ordering needs the correction factors and must go through
    /// [`EventList::sort_time_at_sample`].
    pub fn sort(&mut self, order: SortOrder) -> Result<(), EventError> {
        match order {
            SortOrder::Unsorted => Ok(()),
            SortOrder::TofSort => {
                self.sort_tof();
                Ok(())
            }
            SortOrder::PulseTimeSort => self.sort_pulse_time(),
            SortOrder::PulseTimeTofSort => self.sort_pulse_time_tof(),
            SortOrder::TimeAtSampleSort => Err(EventError::InvalidArgument(
                "time-at-sample sorting requires correction factors".to_string(),
            )),
        }
    }

    /// Sort by time-of-flight. A no-op when the list is already tagged.
    pub fn sort_tof(&mut self) {
        if self.order == SortOrder::TofSort {
            return;
        }
        match &mut self.storage {
            EventStorage::Tof(v) => sort_with(v, |a, b| a.tof.total_cmp(&b.tof)),
            EventStorage::Weighted(v) => sort_with(v, |a, b| a.tof.total_cmp(&b.tof)),
            EventStorage::WeightedNoTime(v) => sort_with(v, |a, b| a.tof.total_cmp(&b.tof)),
        }
        self.order = SortOrder::TofSort;
    }

    /// Sort by pulse time. Lists already in pulse-time-then-TOF order are
    /// left alone (they are pulse-ordered by construction).
    pub fn sort_pulse_time(&mut self) -> Result<(), EventError> {
        if self.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op: "sort_pulse_time",
                found: EventType::WeightedNoTime,
            });
        }
        if matches!(self.order, SortOrder::PulseTimeSort | SortOrder::PulseTimeTofSort) {
            return Ok(());
        }
        match &mut self.storage {
            EventStorage::Tof(v) => sort_with(v, |a, b| a.pulse_time.cmp(&b.pulse_time)),
            EventStorage::Weighted(v) => sort_with(v, |a, b| a.pulse_time.cmp(&b.pulse_time)),
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }
        self.order = SortOrder::PulseTimeSort;
        Ok(())
    }

    /// Sort by pulse time, breaking ties by TOF.
    pub fn sort_pulse_time_tof(&mut self) -> Result<(), EventError> {
        if self.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op: "sort_pulse_time_tof",
                found: EventType::WeightedNoTime,
            });
        }
        if self.order == SortOrder::PulseTimeTofSort {
            return Ok(());
        }
        match &mut self.storage {
            EventStorage::Tof(v) => sort_with(v, |a, b| {
                a.pulse_time
                    .cmp(&b.pulse_time)
                    .then_with(|| a.tof.total_cmp(&b.tof))
            }),
            EventStorage::Weighted(v) => sort_with(v, |a, b| {
                a.pulse_time
                    .cmp(&b.pulse_time)
                    .then_with(|| a.tof.total_cmp(&b.tof))
            }),
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }
        self.order = SortOrder::PulseTimeTofSort;
        Ok(())
    }

    /// Sort by corrected arrival time at the sample:
    /// `pulse_time + tof_factor * tof * 1000 ns + tof_shift * 1e9 ns`.
    pub fn sort_time_at_sample(&mut self, tof_factor: f64, tof_shift: f64) -> Result<(), EventError> {
        if self.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op: "sort_time_at_sample",
                found: EventType::WeightedNoTime,
            });
        }
        if self.order == SortOrder::TimeAtSampleSort {
            return Ok(());
        }
        match &mut self.storage {
            EventStorage::Tof(v) => sort_with(v, |a, b| {
                corrected_time(a.pulse_time, a.tof, tof_factor, tof_shift)
                    .cmp(&corrected_time(b.pulse_time, b.tof, tof_factor, tof_shift))
            }),
            EventStorage::Weighted(v) => sort_with(v, |a, b| {
                corrected_time(a.pulse_time, a.tof, tof_factor, tof_shift)
                    .cmp(&corrected_time(b.pulse_time, b.tof, tof_factor, tof_shift))
            }),
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }
        self.order = SortOrder::TimeAtSampleSort;
        Ok(())
    }
}
