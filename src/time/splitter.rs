//! Time-to-destination map for splitting a run across output workspaces.
//!
//! Built on the same boundary-splice technique as [`TimeRoi`], but each
//! boundary carries an integer destination instead of a boolean. The
//! half-open interval between consecutive boundaries maps to the first
//! boundary's destination; outside all boundaries the destination is
//! [`NO_TARGET`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{IntervalError, TimeRoi};

/// Destination meaning "discard": events routed here belong to no output.
pub const NO_TARGET: i32 = -1;

/// Sorted map from epoch-nanosecond boundaries to destination indices.
///
/// `add_roi(start, stop, dest)` splices the assignment into the map with
/// last-write-wins semantics inside `[start, stop)`; assignments outside the
/// new interval are preserved. After normalization the final boundary is
/// always `NO_TARGET`, so the map is conceptually terminated by "discard".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSplitter {
    boundaries: BTreeMap<i64, i32>,
}

impl TimeSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a splitter sending the single interval `[start, stop)` to
    /// `destination`.
    pub fn from_interval(start: i64, stop: i64, destination: i32) -> Result<Self, IntervalError> {
        let mut splitter = Self::new();
        splitter.add_roi(start, stop, destination)?;
        Ok(splitter)
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn num_boundaries(&self) -> usize {
        self.boundaries.len()
    }

    /// Assign `[start, stop)` to `destination`, splicing over any prior
    /// assignments in that window.
    pub fn add_roi(&mut self, start: i64, stop: i64, destination: i32) -> Result<(), IntervalError> {
        if start >= stop {
            return Err(IntervalError::InvalidInterval { start, stop });
        }
        if destination < NO_TARGET {
            return Err(IntervalError::InvalidDestination(destination));
        }

        // destination in force just past the new interval, before mutation
        let after = self.value_at_time(stop);

        let interior: Vec<i64> = self.boundaries.range(start..stop).map(|(&t, _)| t).collect();
        for t in interior {
            self.boundaries.remove(&t);
        }
        self.boundaries.insert(start, destination);
        self.boundaries.insert(stop, after);

        self.normalize();
        Ok(())
    }

    /// Drop boundaries that repeat the destination already in force. The
    /// state before the first boundary is `NO_TARGET`.
    fn normalize(&mut self) {
        let mut redundant = Vec::new();
        let mut prev = NO_TARGET;
        for (&t, &dest) in &self.boundaries {
            if dest == prev {
                redundant.push(t);
            } else {
                prev = dest;
            }
        }
        for t in redundant {
            self.boundaries.remove(&t);
        }
    }

    /// Destination in force at `t`, or `NO_TARGET` before the first boundary
    /// (the map is self-terminating past the last one).
    pub fn value_at_time(&self, t: i64) -> i32 {
        self.boundaries
            .range(..=t)
            .next_back()
            .map(|(_, &dest)| dest)
            .unwrap_or(NO_TARGET)
    }

    /// Sorted, deduplicated list of every real destination ever assigned.
    pub fn output_workspace_indices(&self) -> Vec<i32> {
        let unique: BTreeSet<i32> = self
            .boundaries
            .values()
            .copied()
            .filter(|&dest| dest != NO_TARGET)
            .collect();
        unique.into_iter().collect()
    }

    /// The TimeROI covering exactly the sub-intervals assigned to
    /// `destination`, everything else excluded. A destination that never
    /// appears yields the "use none" sentinel. Asking for [`NO_TARGET`]
    /// covers the explicit gaps between assignments.
    pub fn get_time_roi(&self, destination: i32) -> TimeRoi {
        let entries: Vec<(i64, i32)> = self.boundaries.iter().map(|(&t, &d)| (t, d)).collect();
        let mut roi = TimeRoi::new();
        let mut assigned = false;
        for pair in entries.windows(2) {
            let (start, dest) = pair[0];
            let (stop, _) = pair[1];
            if dest == destination {
                // consecutive boundaries are strictly increasing, so the
                // interval is always valid
                let _ = roi.add_roi(start, stop);
                assigned = true;
            }
        }
        if assigned {
            roi
        } else {
            TimeRoi::use_none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_splitter() {
        let splitter = TimeSplitter::new();
        assert!(splitter.is_empty());
        assert_eq!(splitter.value_at_time(0), NO_TARGET);
        assert!(splitter.output_workspace_indices().is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        let mut splitter = TimeSplitter::new();
        assert!(splitter.add_roi(20, 10, 0).is_err());
        assert!(splitter.add_roi(10, 10, 0).is_err());
        assert!(splitter.add_roi(0, 10, -2).is_err());
        assert!(splitter.is_empty()); // unchanged
    }

    #[test]
    fn test_single_interval() {
        let splitter = TimeSplitter::from_interval(10, 20, 3).unwrap();
        assert_eq!(splitter.value_at_time(9), NO_TARGET);
        assert_eq!(splitter.value_at_time(10), 3);
        assert_eq!(splitter.value_at_time(19), 3);
        assert_eq!(splitter.value_at_time(20), NO_TARGET);
        assert_eq!(splitter.output_workspace_indices(), vec![3]);
    }

    #[test]
    fn test_later_assignment_wins() {
        // overlapping assignment replaces the overlapped region
        let mut splitter = TimeSplitter::from_interval(20, 30, 1).unwrap();
        splitter.add_roi(20, 40, 3).unwrap();

        assert_eq!(splitter.value_at_time(20), 3);
        assert_eq!(splitter.value_at_time(30), 3);
        assert_eq!(splitter.value_at_time(39), 3);
        assert_eq!(splitter.value_at_time(40), NO_TARGET);
        assert_eq!(splitter.output_workspace_indices(), vec![3]);
    }

    #[test]
    fn test_partial_overlap_preserves_outside() {
        let mut splitter = TimeSplitter::from_interval(0, 100, 0).unwrap();
        splitter.add_roi(40, 60, 1).unwrap();

        assert_eq!(splitter.value_at_time(0), 0);
        assert_eq!(splitter.value_at_time(39), 0);
        assert_eq!(splitter.value_at_time(40), 1);
        assert_eq!(splitter.value_at_time(59), 1);
        assert_eq!(splitter.value_at_time(60), 0); // tail of the original
        assert_eq!(splitter.value_at_time(99), 0);
        assert_eq!(splitter.value_at_time(100), NO_TARGET);
        assert_eq!(splitter.output_workspace_indices(), vec![0, 1]);
    }

    #[test]
    fn test_contained_assignment_fully_replaced() {
        let mut splitter = TimeSplitter::from_interval(40, 60, 7).unwrap();
        splitter.add_roi(0, 100, 2).unwrap();

        assert_eq!(splitter.value_at_time(50), 2);
        assert_eq!(splitter.output_workspace_indices(), vec![2]);
    }

    #[test]
    fn test_disjoint_assignments() {
        let mut splitter = TimeSplitter::from_interval(0, 10, 0).unwrap();
        splitter.add_roi(20, 30, 1).unwrap();

        assert_eq!(splitter.value_at_time(5), 0);
        assert_eq!(splitter.value_at_time(15), NO_TARGET); // gap
        assert_eq!(splitter.value_at_time(25), 1);
        assert_eq!(splitter.output_workspace_indices(), vec![0, 1]);
    }

    #[test]
    fn test_no_target_interval_discards() {
        let mut splitter = TimeSplitter::from_interval(0, 100, 0).unwrap();
        splitter.add_roi(40, 60, NO_TARGET).unwrap();

        assert_eq!(splitter.value_at_time(50), NO_TARGET);
        assert_eq!(splitter.value_at_time(70), 0);
        assert_eq!(splitter.output_workspace_indices(), vec![0]);
    }

    #[test]
    fn test_adjacent_same_destination_coalesces() {
        let mut splitter = TimeSplitter::from_interval(0, 10, 1).unwrap();
        splitter.add_roi(10, 20, 1).unwrap();
        assert_eq!(splitter.num_boundaries(), 2); // one merged interval
        assert_eq!(splitter.value_at_time(10), 1);
    }

    #[test]
    fn test_get_time_roi() {
        let mut splitter = TimeSplitter::from_interval(0, 10, 0).unwrap();
        splitter.add_roi(20, 30, 0).unwrap();
        splitter.add_roi(10, 20, 1).unwrap();

        let roi0 = splitter.get_time_roi(0);
        assert_eq!(roi0.to_intervals(), vec![(0, 10), (20, 30)]);

        let roi1 = splitter.get_time_roi(1);
        assert_eq!(roi1.to_intervals(), vec![(10, 20)]);

        assert!(splitter.get_time_roi(5).is_use_none());
    }

    #[test]
    fn test_get_time_roi_for_gaps() {
        let mut splitter = TimeSplitter::from_interval(0, 10, 0).unwrap();
        splitter.add_roi(20, 30, 1).unwrap();

        let gaps = splitter.get_time_roi(NO_TARGET);
        assert_eq!(gaps.to_intervals(), vec![(10, 20)]);
    }
}
