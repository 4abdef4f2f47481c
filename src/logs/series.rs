//! A time series log: sorted `(time, value)` points with a units string.
//!
//! Between points the series is a step function: each value stays in force
//! from its own timestamp until the next one. Statistics are computed over
//! that step function clipped to a [`TimeRoi`].

use serde::{Deserialize, Serialize};

use super::statistics::{compute, Statistic};
use crate::time::TimeRoi;

/// One piece of the step function: `value` in force on `[start, stop)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub start: i64,
    pub stop: i64,
    pub value: f64,
}

impl Segment {
    pub fn duration_ns(&self) -> f64 {
        (self.stop - self.start) as f64
    }
}

/// A named run log: temperature, proton charge, chopper phase and the like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    units: String,
    times: Vec<i64>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from unordered points; they are sorted by time.
    pub fn from_points(units: impl Into<String>, points: Vec<(i64, f64)>) -> Self {
        let mut series = Self::new(units);
        for (time, value) in points {
            series.add(time, value);
        }
        series
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    /// Append a point, keeping the series sorted by time. In-order appends
    /// (the common case for instrument logs) are O(1).
    pub fn add(&mut self, time: i64, value: f64) {
        if self.times.last().map_or(true, |&last| last <= time) {
            self.times.push(time);
            self.values.push(value);
        } else {
            let idx = self.times.partition_point(|&t| t <= time);
            self.times.insert(idx, time);
            self.values.insert(idx, value);
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[i64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_value(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Value in force at `t`: the value of the last point at or before `t`.
    /// A time before the first point reports the first value.
    pub fn value_at(&self, t: i64) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let idx = self.times.partition_point(|&time| time <= t);
        if idx == 0 {
            self.first_value()
        } else {
            Some(self.values[idx - 1])
        }
    }

    /// End of the natural span: the last point extended by the preceding
    /// gap, the convention for giving the final value a sensible duration.
    fn natural_end(&self) -> i64 {
        let n = self.times.len();
        if n >= 2 {
            self.times[n - 1] + (self.times[n - 1] - self.times[n - 2])
        } else {
            self.times[n - 1]
        }
    }

    /// The step function clipped to the ROI's included regions.
    pub(crate) fn segments(&self, roi: &TimeRoi) -> Vec<Segment> {
        if self.is_empty() || roi.is_use_none() {
            return Vec::new();
        }
        let windows: Vec<(i64, i64)> = if roi.is_use_all() {
            vec![(self.times[0], self.natural_end())]
        } else {
            roi.to_intervals()
                .into_iter()
                .map(|(start, stop)| (start, if stop == i64::MAX { self.natural_end() } else { stop }))
                .collect()
        };

        let mut segments = Vec::new();
        for (start, stop) in windows {
            if stop < start {
                continue;
            }
            // cut at the window start and at every interior point
            let mut cuts = vec![start];
            let lo = self.times.partition_point(|&t| t <= start);
            let hi = self.times.partition_point(|&t| t < stop);
            if lo < hi {
                cuts.extend_from_slice(&self.times[lo..hi]);
            }
            cuts.push(stop);
            for pair in cuts.windows(2) {
                if let Some(value) = self.value_at(pair[0]) {
                    segments.push(Segment {
                        start: pair[0],
                        stop: pair[1],
                        value,
                    });
                }
            }
        }
        segments
    }

    /// The requested statistic over the series restricted to the ROI.
    /// Returns NaN when nothing falls inside.
    pub fn statistic(&self, statistic: Statistic, roi: &TimeRoi) -> f64 {
        compute(statistic, &self.segments(roi))
    }

    /// Plain sum of the point values whose timestamps the ROI accepts.
    pub fn sum_restricted(&self, roi: &TimeRoi) -> f64 {
        roi.calculate_indices(&self.times)
            .into_iter()
            .map(|(lo, hi)| self.values[lo..hi].iter().sum::<f64>())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_point_series() -> TimeSeries {
        let values = [2.0, 3.0, 4.0, 5.0, 6.0, 20.0, 21.0, 22.0, 23.0, 24.0];
        TimeSeries::from_points(
            "K",
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as i64 * 10, v))
                .collect(),
        )
    }

    #[test]
    fn test_add_keeps_sorted() {
        let mut series = TimeSeries::new("K");
        series.add(30, 3.0);
        series.add(10, 1.0);
        series.add(20, 2.0);
        assert_eq!(series.times(), &[10, 20, 30]);
        assert_eq!(series.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_value_at_is_step_function() {
        let series = TimeSeries::from_points("K", vec![(10, 1.0), (20, 2.0)]);
        assert_eq!(series.value_at(5), Some(1.0)); // first value extends back
        assert_eq!(series.value_at(10), Some(1.0));
        assert_eq!(series.value_at(19), Some(1.0));
        assert_eq!(series.value_at(20), Some(2.0));
        assert_eq!(series.value_at(1000), Some(2.0));
        assert_eq!(TimeSeries::new("K").value_at(0), None);
    }

    #[test]
    fn test_unrestricted_mean() {
        let series = ten_point_series();
        assert_eq!(series.statistic(Statistic::Mean, &TimeRoi::new()), 13.0);
    }

    #[test]
    fn test_statistics_respect_roi() {
        let series = ten_point_series();
        // only the first five points (times 0..40) are accepted
        let roi = TimeRoi::from_interval(0, 50).unwrap();
        assert_eq!(series.statistic(Statistic::Mean, &roi), 4.0);
        assert_eq!(series.statistic(Statistic::Maximum, &roi), 6.0);
        assert_eq!(series.statistic(Statistic::LastValue, &roi), 6.0);
    }

    #[test]
    fn test_roi_window_samples_value_in_force() {
        let series = TimeSeries::from_points("K", vec![(0, 1.0), (100, 9.0)]);
        // the window sits strictly between two points; value 1 is in force
        let roi = TimeRoi::from_interval(40, 60).unwrap();
        assert_eq!(series.statistic(Statistic::Mean, &roi), 1.0);
        assert_eq!(series.statistic(Statistic::TimeAveragedMean, &roi), 1.0);
    }

    #[test]
    fn test_time_averaged_mean_over_roi() {
        let series = TimeSeries::from_points("K", vec![(0, 1.0), (30, 5.0)]);
        let roi = TimeRoi::from_interval(0, 40).unwrap();
        // value 1 for 30 ns, value 5 for 10 ns
        assert_eq!(series.statistic(Statistic::TimeAveragedMean, &roi), 2.0);
    }

    #[test]
    fn test_use_none_roi_yields_nan() {
        let series = ten_point_series();
        assert!(series.statistic(Statistic::Mean, &TimeRoi::use_none()).is_nan());
    }

    #[test]
    fn test_single_point_series() {
        let series = TimeSeries::from_points("K", vec![(100, 42.0)]);
        assert_eq!(series.statistic(Statistic::Mean, &TimeRoi::new()), 42.0);
        assert_eq!(
            series.statistic(Statistic::TimeAveragedMean, &TimeRoi::new()),
            42.0
        );
    }

    #[test]
    fn test_sum_restricted() {
        let series = ten_point_series();
        assert_eq!(series.sum_restricted(&TimeRoi::new()), 130.0);

        let roi = TimeRoi::from_interval(0, 50).unwrap(); // times 0..40
        assert_eq!(series.sum_restricted(&roi), 20.0);

        assert_eq!(series.sum_restricted(&TimeRoi::use_none()), 0.0);
    }
}
