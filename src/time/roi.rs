//! Time region-of-interest: a sorted set of half-open included/excluded
//! intervals used as a reusable time filter.
//!
//! The structure is a list of `(timestamp, included)` boundaries, strictly
//! increasing in time. The half-open interval `[b_i, b_{i+1})` carries the
//! value of `b_i`; before the first boundary, and beyond the last, time is
//! excluded. After every mutation the list is renormalized (leading excluded
//! boundaries and consecutive duplicates pruned), so two ROIs with the same
//! semantic content are structurally equal.

use serde::{Deserialize, Serialize};

use super::{IntervalError, NANOS_PER_SEC};

/// Duration reported by [`TimeRoi::duration_in_seconds`] for the
/// "use none" sentinel.
pub const DURATION_USE_NONE: f64 = -1.0;

/// A set of half-open time intervals tagged included/excluded.
///
/// Two sentinel states exist beyond explicit interval lists:
/// - *use all* — the default, an empty boundary list: every time is accepted.
/// - *use none* — an explicit marker that no time is ever accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRoi {
    /// Sorted, normalized `(timestamp_ns, included)` boundaries.
    boundaries: Vec<(i64, bool)>,
    /// The "use none" sentinel. Implies an empty boundary list.
    none: bool,
}

impl TimeRoi {
    /// An ROI that accepts everything ("use all").
    pub fn new() -> Self {
        Self::default()
    }

    /// The sentinel ROI that accepts nothing.
    pub fn use_none() -> Self {
        Self {
            boundaries: Vec::new(),
            none: true,
        }
    }

    /// An ROI accepting the single interval `[start, stop)`.
    pub fn from_interval(start: i64, stop: i64) -> Result<Self, IntervalError> {
        let mut roi = Self::new();
        roi.add_roi(start, stop)?;
        Ok(roi)
    }

    /// Restore from a flat, strictly increasing boundary list
    /// `[start_0, stop_0, start_1, stop_1, ...]` as handed over by the
    /// persistence collaborator. An odd count leaves the final region
    /// open-ended (accepted until +inf).
    pub fn from_boundaries(times: &[i64]) -> Result<Self, IntervalError> {
        if times.windows(2).any(|w| w[0] >= w[1]) {
            return Err(IntervalError::InvalidBoundaries(
                "boundary times must be strictly increasing".to_string(),
            ));
        }
        let boundaries = times
            .iter()
            .enumerate()
            .map(|(i, &t)| (t, i % 2 == 0))
            .collect();
        Ok(Self {
            boundaries,
            none: false,
        })
    }

    /// Export the flat boundary list for the persistence collaborator.
    pub fn to_boundaries(&self) -> Vec<i64> {
        self.boundaries.iter().map(|&(t, _)| t).collect()
    }

    pub fn is_use_all(&self) -> bool {
        !self.none && self.boundaries.is_empty()
    }

    pub fn is_use_none(&self) -> bool {
        self.none
    }

    pub fn num_boundaries(&self) -> usize {
        self.boundaries.len()
    }

    /// The included `[start, stop)` intervals. An open-ended final region is
    /// reported with `i64::MAX` as its stop.
    pub fn to_intervals(&self) -> Vec<(i64, i64)> {
        let mut intervals = Vec::with_capacity(self.boundaries.len() / 2 + 1);
        let mut open: Option<i64> = None;
        for &(t, included) in &self.boundaries {
            match (included, open) {
                (true, None) => open = Some(t),
                (false, Some(start)) => {
                    intervals.push((start, t));
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            intervals.push((start, i64::MAX));
        }
        intervals
    }

    /// The boundary value in force at `t`, ignoring sentinels: the value of
    /// the greatest boundary at or before `t`, or excluded if there is none.
    fn raw_value_at(&self, t: i64) -> bool {
        let idx = self.boundaries.partition_point(|&(bt, _)| bt <= t);
        if idx == 0 {
            false
        } else {
            self.boundaries[idx - 1].1
        }
    }

    /// Whether time `t` is accepted.
    pub fn value_at_time(&self, t: i64) -> bool {
        if self.none {
            false
        } else if self.boundaries.is_empty() {
            true
        } else {
            self.raw_value_at(t)
        }
    }

    /// Drop leading excluded boundaries and consecutive duplicates. The
    /// canonical form starts with an included boundary and alternates.
    fn normalized(raw: Vec<(i64, bool)>) -> Vec<(i64, bool)> {
        let mut out = Vec::with_capacity(raw.len());
        let mut prev = false;
        for (t, v) in raw {
            if v != prev {
                out.push((t, v));
                prev = v;
            }
        }
        out
    }

    /// Set `[start, stop)` to `value` with a single generalized splice:
    /// capture the value in force at `stop`, drop every boundary inside the
    /// new interval, insert the two new boundaries, renormalize.
    fn splice(&mut self, start: i64, stop: i64, value: bool) {
        let after = self.raw_value_at(stop);
        let mut merged = Vec::with_capacity(self.boundaries.len() + 2);
        merged.extend(self.boundaries.iter().copied().take_while(|&(t, _)| t < start));
        merged.push((start, value));
        merged.push((stop, after));
        merged.extend(self.boundaries.iter().copied().skip_while(|&(t, _)| t <= stop));
        self.boundaries = Self::normalized(merged);
        self.none = false;
    }

    /// Union the ROI with the included interval `[start, stop)`.
    pub fn add_roi(&mut self, start: i64, stop: i64) -> Result<(), IntervalError> {
        if start >= stop {
            return Err(IntervalError::InvalidInterval { start, stop });
        }
        // adding an interval to the "use none" sentinel replaces it
        self.none = false;
        self.splice(start, stop, true);
        Ok(())
    }

    /// Mark `[start, stop)` excluded.
    pub fn add_mask(&mut self, start: i64, stop: i64) -> Result<(), IntervalError> {
        if start >= stop {
            return Err(IntervalError::InvalidInterval { start, stop });
        }
        if self.is_use_all() {
            // the complement of a mask over "everything" is not representable
            tracing::debug!("ignoring add_mask on an all-inclusive TimeROI");
            return Ok(());
        }
        if self.none {
            return Ok(());
        }
        self.splice(start, stop, false);
        Ok(())
    }

    /// Total accepted time in seconds. Returns -1 for the "use none"
    /// sentinel, 0 for "use all", and +inf when the final region is
    /// open-ended.
    pub fn duration_in_seconds(&self) -> f64 {
        if self.none {
            return DURATION_USE_NONE;
        }
        if self.boundaries.is_empty() {
            return 0.0;
        }
        let mut total_ns: i64 = 0;
        for (start, stop) in self.to_intervals() {
            if stop == i64::MAX {
                return f64::INFINITY;
            }
            total_ns += stop - start;
        }
        total_ns as f64 / NANOS_PER_SEC as f64
    }

    /// Accepted time in seconds clipped to the window `[start, stop)`.
    pub fn duration_in_seconds_between(&self, start: i64, stop: i64) -> Result<f64, IntervalError> {
        if start > stop {
            return Err(IntervalError::InvalidInterval { start, stop });
        }
        if self.none {
            return Ok(DURATION_USE_NONE);
        }
        let mut total_ns: i64 = 0;
        for (lo, hi) in self.to_intervals() {
            let clipped_lo = lo.max(start);
            let clipped_hi = hi.min(stop);
            if clipped_lo < clipped_hi {
                total_ns += clipped_hi - clipped_lo;
            }
        }
        Ok(total_ns as f64 / NANOS_PER_SEC as f64)
    }

    /// Merge two normalized boundary lists in one sweep, combining the state
    /// of each operand at every boundary time.
    fn merge_sweep(
        a: &[(i64, bool)],
        b: &[(i64, bool)],
        combine: fn(bool, bool) -> bool,
    ) -> Vec<(i64, bool)> {
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0usize, 0usize);
        let (mut state_a, mut state_b) = (false, false);
        while i < a.len() || j < b.len() {
            let t = match (a.get(i), b.get(j)) {
                (Some(&(ta, _)), Some(&(tb, _))) => ta.min(tb),
                (Some(&(ta, _)), None) => ta,
                (None, Some(&(tb, _))) => tb,
                (None, None) => break,
            };
            while i < a.len() && a[i].0 == t {
                state_a = a[i].1;
                i += 1;
            }
            while j < b.len() && b[j].0 == t {
                state_b = b[j].1;
                j += 1;
            }
            out.push((t, combine(state_a, state_b)));
        }
        Self::normalized(out)
    }

    /// Set union with another ROI. Sentinel operands carry no intervals and
    /// act as the identity.
    pub fn update_union(&mut self, other: &TimeRoi) {
        if self == other || other.boundaries.is_empty() {
            return;
        }
        if self.boundaries.is_empty() {
            self.boundaries = other.boundaries.clone();
            self.none = false;
            return;
        }
        self.boundaries = Self::merge_sweep(&self.boundaries, &other.boundaries, |a, b| a || b);
    }

    /// Set intersection with another ROI. Intersecting with "use all" is the
    /// identity; a "use none" operand, or a disjoint result, yields the
    /// "use none" sentinel.
    pub fn update_intersection(&mut self, other: &TimeRoi) {
        if self.none || other.none {
            *self = TimeRoi::use_none();
            return;
        }
        if other.is_use_all() {
            return;
        }
        if self.is_use_all() {
            *self = other.clone();
            return;
        }
        let merged = Self::merge_sweep(&self.boundaries, &other.boundaries, |a, b| a && b);
        if merged.is_empty() {
            *self = TimeRoi::use_none();
        } else {
            self.boundaries = merged;
        }
    }

    /// Intersect, except that an empty ("use all") receiver is replaced by
    /// `other` wholesale.
    pub fn update_or_replace_intersection(&mut self, other: &TimeRoi) {
        if self.is_use_all() {
            *self = other.clone();
        } else {
            self.update_intersection(other);
        }
    }

    /// For each included interval, the `[first, last)` index range of the
    /// sorted timestamp slice `times` falling inside it. Lets callers slice
    /// parallel arrays without per-element membership tests.
    pub fn calculate_indices(&self, times: &[i64]) -> Vec<(usize, usize)> {
        if self.none || times.is_empty() {
            return Vec::new();
        }
        if self.boundaries.is_empty() {
            return vec![(0, times.len())];
        }
        let mut ranges = Vec::new();
        for (start, stop) in self.to_intervals() {
            let lo = times.partition_point(|&t| t < start);
            let hi = times.partition_point(|&t| t < stop);
            if lo < hi {
                ranges.push((lo, hi));
            }
        }
        ranges
    }
}
