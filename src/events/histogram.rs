//! Binning events into histogram spectra.
//!
//! The primary path sorts the list and walks events and bin boundaries
//! together in O(n). The step variant computes each event's bin directly
//! from a known linear or logarithmic bin width, needing no sort, and agrees
//! with the sorted path bin-for-bin.

use super::event::EventType;
use super::list::{EventList, EventStorage};
use super::sorting::corrected_time;
use super::{arithmetic::validate_bin_edges, EventError};

/// Accumulate `(value, weight, error_squared)` triples, pre-sorted by value,
/// into the boundary vector `x`.
fn histogram_sorted(
    samples: impl Iterator<Item = (f64, f64, f64)>,
    x: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    let n_bins = x.len() - 1;
    let mut y = vec![0.0; n_bins];
    let mut e2 = vec![0.0; n_bins];
    let mut bin = 0usize;
    'events: for (value, weight, error_squared) in samples {
        if value < x[0] {
            continue;
        }
        while value >= x[bin + 1] {
            bin += 1;
            if bin == n_bins {
                // sorted input: every remaining event is past the last edge
                break 'events;
            }
        }
        y[bin] += weight;
        e2[bin] += error_squared;
    }
    let e = e2.into_iter().map(f64::sqrt).collect();
    (y, e)
}

/// Bin index from a linear or logarithmic step, verified (and nudged) against
/// the actual boundaries so float rounding cannot move an event off by one.
fn find_bin_from_step(x: &[f64], step: f64, value: f64) -> Option<usize> {
    let n_bins = x.len() - 1;
    if value < x[0] || value >= x[n_bins] {
        return None;
    }
    let raw = if step > 0.0 {
        (value - x[0]) / step
    } else {
        (value / x[0]).ln() / (-step).ln_1p()
    };
    let mut bin = (raw.max(0.0).floor() as usize).min(n_bins - 1);
    while value < x[bin] {
        bin -= 1;
    }
    while value >= x[bin + 1] {
        bin += 1;
    }
    Some(bin)
}

impl EventList {
    /// Histogram event TOF into the boundary vector `x`, returning the
    /// weight sums and their errors per bin. Sorts the list by TOF.
    pub fn generate_histogram(&mut self, x: &[f64]) -> Result<(Vec<f64>, Vec<f64>), EventError> {
        validate_bin_edges(x)?;
        self.sort_tof();
        let histogram = match &self.storage {
            EventStorage::Tof(v) => {
                histogram_sorted(v.iter().map(|e| (e.tof, 1.0, 1.0)), x)
            }
            EventStorage::Weighted(v) => {
                histogram_sorted(v.iter().map(|e| (e.tof, e.weight, e.error_squared)), x)
            }
            EventStorage::WeightedNoTime(v) => {
                histogram_sorted(v.iter().map(|e| (e.tof, e.weight, e.error_squared)), x)
            }
        };
        Ok(histogram)
    }

    /// Histogram event TOF without sorting: each event's bin is computed
    /// directly from the known bin width. `step > 0` for linear boundaries,
    /// `step < 0` for logarithmic boundaries of relative width `|step|`.
    /// Produces the same bins as [`EventList::generate_histogram`].
    pub fn generate_histogram_with_step(
        &self,
        step: f64,
        x: &[f64],
    ) -> Result<(Vec<f64>, Vec<f64>), EventError> {
        validate_bin_edges(x)?;
        if step == 0.0 {
            return Err(EventError::InvalidArgument(
                "histogram step must be non-zero".to_string(),
            ));
        }
        if step < 0.0 && x[0] <= 0.0 {
            return Err(EventError::InvalidArgument(
                "logarithmic binning requires a positive first boundary".to_string(),
            ));
        }
        let n_bins = x.len() - 1;
        let mut y = vec![0.0; n_bins];
        let mut e2 = vec![0.0; n_bins];
        let mut accumulate = |tof: f64, weight: f64, error_squared: f64| {
            if let Some(bin) = find_bin_from_step(x, step, tof) {
                y[bin] += weight;
                e2[bin] += error_squared;
            }
        };
        match &self.storage {
            EventStorage::Tof(v) => {
                for event in v {
                    accumulate(event.tof, 1.0, 1.0);
                }
            }
            EventStorage::Weighted(v) => {
                for event in v {
                    accumulate(event.tof, event.weight, event.error_squared);
                }
            }
            EventStorage::WeightedNoTime(v) => {
                for event in v {
                    accumulate(event.tof, event.weight, event.error_squared);
                }
            }
        }
        let e = e2.into_iter().map(f64::sqrt).collect();
        Ok((y, e))
    }

    /// Histogram pulse times (epoch nanoseconds as `f64`) into `x`. Sorts the
    /// list by pulse time; fails for time-stripped lists.
    pub fn generate_histogram_pulse_time(
        &mut self,
        x: &[f64],
    ) -> Result<(Vec<f64>, Vec<f64>), EventError> {
        validate_bin_edges(x)?;
        if self.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op: "generate_histogram_pulse_time",
                found: EventType::WeightedNoTime,
            });
        }
        self.sort_pulse_time()?;
        let histogram = match &self.storage {
            EventStorage::Tof(v) => {
                histogram_sorted(v.iter().map(|e| (e.pulse_time as f64, 1.0, 1.0)), x)
            }
            EventStorage::Weighted(v) => histogram_sorted(
                v.iter()
                    .map(|e| (e.pulse_time as f64, e.weight, e.error_squared)),
                x,
            ),
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        };
        Ok(histogram)
    }

    /// Histogram corrected time-at-sample (epoch nanoseconds as `f64`) into
    /// `x`. Sorts the list by time at sample; fails for time-stripped lists.
    pub fn generate_histogram_time_at_sample(
        &mut self,
        x: &[f64],
        tof_factor: f64,
        tof_shift: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), EventError> {
        validate_bin_edges(x)?;
        if self.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op: "generate_histogram_time_at_sample",
                found: EventType::WeightedNoTime,
            });
        }
        self.sort_time_at_sample(tof_factor, tof_shift)?;
        let histogram = match &self.storage {
            EventStorage::Tof(v) => histogram_sorted(
                v.iter().map(|e| {
                    (
                        corrected_time(e.pulse_time, e.tof, tof_factor, tof_shift) as f64,
                        1.0,
                        1.0,
                    )
                }),
                x,
            ),
            EventStorage::Weighted(v) => histogram_sorted(
                v.iter().map(|e| {
                    (
                        corrected_time(e.pulse_time, e.tof, tof_factor, tof_shift) as f64,
                        e.weight,
                        e.error_squared,
                    )
                }),
                x,
            ),
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        };
        Ok(histogram)
    }
}
