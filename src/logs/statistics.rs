//! Statistic kinds and their computation kernels.

use serde::{Deserialize, Serialize};

use super::series::Segment;

/// The statistic requested when reducing a time series to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Mean,
    Minimum,
    Maximum,
    Median,
    StdDev,
    FirstValue,
    LastValue,
    TimeAveragedMean,
    TimeAveragedStdDev,
}

impl Statistic {
    /// Every statistic kind. The fixed size bounds per-log cache sweeps.
    pub const ALL: [Statistic; 9] = [
        Statistic::Mean,
        Statistic::Minimum,
        Statistic::Maximum,
        Statistic::Median,
        Statistic::StdDev,
        Statistic::FirstValue,
        Statistic::LastValue,
        Statistic::TimeAveragedMean,
        Statistic::TimeAveragedStdDev,
    ];
}

/// Compute `statistic` over the clipped step segments of a series.
/// An empty clip yields NaN.
pub(crate) fn compute(statistic: Statistic, segments: &[Segment]) -> f64 {
    if segments.is_empty() {
        return f64::NAN;
    }
    match statistic {
        Statistic::FirstValue => segments[0].value,
        Statistic::LastValue => segments[segments.len() - 1].value,
        Statistic::Minimum => segments.iter().map(|s| s.value).fold(f64::INFINITY, f64::min),
        Statistic::Maximum => segments
            .iter()
            .map(|s| s.value)
            .fold(f64::NEG_INFINITY, f64::max),
        Statistic::Mean => mean(segments),
        Statistic::Median => median(segments),
        Statistic::StdDev => std_dev(segments),
        Statistic::TimeAveragedMean => time_averaged_mean(segments),
        Statistic::TimeAveragedStdDev => time_averaged_std_dev(segments),
    }
}

fn mean(segments: &[Segment]) -> f64 {
    segments.iter().map(|s| s.value).sum::<f64>() / segments.len() as f64
}

fn median(segments: &[Segment]) -> f64 {
    let mut values: Vec<f64> = segments.iter().map(|s| s.value).collect();
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Population standard deviation of the segment values.
fn std_dev(segments: &[Segment]) -> f64 {
    let mean = mean(segments);
    let variance = segments
        .iter()
        .map(|s| (s.value - mean) * (s.value - mean))
        .sum::<f64>()
        / segments.len() as f64;
    variance.max(0.0).sqrt()
}

/// Duration-weighted mean. Falls back to the plain mean when every segment
/// has zero duration (a single-point series).
fn time_averaged_mean(segments: &[Segment]) -> f64 {
    let total: f64 = segments.iter().map(Segment::duration_ns).sum();
    if total == 0.0 {
        return mean(segments);
    }
    segments
        .iter()
        .map(|s| s.value * s.duration_ns())
        .sum::<f64>()
        / total
}

fn time_averaged_std_dev(segments: &[Segment]) -> f64 {
    let total: f64 = segments.iter().map(Segment::duration_ns).sum();
    if total == 0.0 {
        return std_dev(segments);
    }
    let weighted_mean = time_averaged_mean(segments);
    let variance = segments
        .iter()
        .map(|s| (s.value - weighted_mean) * (s.value - weighted_mean) * s.duration_ns())
        .sum::<f64>()
        / total;
    variance.max(0.0).sqrt()
}
