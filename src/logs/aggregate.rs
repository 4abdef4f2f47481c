//! Fork-join aggregation of many event lists against a log.
//!
//! The per-spectrum loop is embarrassingly parallel, but several spectra may
//! land in the same output bin, so the shared bin array is guarded by one
//! lock per bin.

use parking_lot::Mutex;
use rayon::prelude::*;

use super::series::TimeSeries;
use super::LogError;
use crate::events::list::EventStorage;
use crate::events::{EventList, EventType};
use crate::progress::InterruptToken;

/// Events processed between interruption checks.
const INTERRUPT_CHECK_STRIDE: usize = 8192;

/// Sum event weights into `bins` of the log value in force at each event's
/// pulse time. Lists are processed in parallel; bin accumulation is locked
/// per bin. Returns the per-bin weight sums.
///
/// Fails for time-stripped lists (no pulse time to look the log up at) and
/// aborts promptly, with no partial result, when `token` is raised.
pub fn sum_events_by_log_value(
    lists: &[EventList],
    series: &TimeSeries,
    bins: &[f64],
    token: &InterruptToken,
) -> Result<Vec<f64>, LogError> {
    if bins.len() < 2 || bins.windows(2).any(|w| w[0] >= w[1]) {
        return Err(LogError::InvalidArgument(
            "bin boundaries must be strictly increasing and at least two".to_string(),
        ));
    }
    if lists
        .iter()
        .any(|list| list.event_type() == EventType::WeightedNoTime)
    {
        return Err(LogError::InvalidArgument(
            "time-stripped event lists have no pulse time to aggregate by".to_string(),
        ));
    }

    let n_bins = bins.len() - 1;
    let cells: Vec<Mutex<f64>> = (0..n_bins).map(|_| Mutex::new(0.0)).collect();

    lists.par_iter().try_for_each(|list| {
        let mut since_check = 0usize;
        let mut accumulate = |pulse_time: i64, weight: f64| -> Result<(), LogError> {
            since_check += 1;
            if since_check >= INTERRUPT_CHECK_STRIDE {
                since_check = 0;
                if token.is_interrupted() {
                    return Err(LogError::Interrupted);
                }
            }
            let Some(value) = series.value_at(pulse_time) else {
                return Ok(());
            };
            if value < bins[0] || value >= bins[n_bins] {
                return Ok(());
            }
            let bin = bins.partition_point(|&edge| edge <= value) - 1;
            *cells[bin].lock() += weight;
            Ok(())
        };

        if token.is_interrupted() {
            return Err(LogError::Interrupted);
        }
        match &list.storage {
            EventStorage::Tof(v) => {
                for event in v {
                    accumulate(event.pulse_time, 1.0)?;
                }
            }
            EventStorage::Weighted(v) => {
                for event in v {
                    accumulate(event.pulse_time, event.weight)?;
                }
            }
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }
        Ok(())
    })?;

    Ok(cells.into_iter().map(|cell| cell.into_inner()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TofEvent;

    fn temperature_series() -> TimeSeries {
        // 10 K until t=100, then 20 K
        TimeSeries::from_points("K", vec![(0, 10.0), (100, 20.0)])
    }

    #[test]
    fn test_counts_binned_by_log_value() {
        let lists = vec![
            EventList::from_tof_events(vec![TofEvent::new(1.0, 10), TofEvent::new(2.0, 50)]),
            EventList::from_tof_events(vec![TofEvent::new(3.0, 150), TofEvent::new(4.0, 20)]),
        ];
        let bins = vec![5.0, 15.0, 25.0];
        let token = InterruptToken::new();

        let sums = sum_events_by_log_value(&lists, &temperature_series(), &bins, &token).unwrap();
        assert_eq!(sums, vec![3.0, 1.0]); // three events at 10 K, one at 20 K
    }

    #[test]
    fn test_values_outside_bins_are_dropped() {
        let lists = vec![EventList::from_tof_events(vec![TofEvent::new(1.0, 10)])];
        let bins = vec![15.0, 25.0]; // the 10 K event is below the range
        let token = InterruptToken::new();

        let sums = sum_events_by_log_value(&lists, &temperature_series(), &bins, &token).unwrap();
        assert_eq!(sums, vec![0.0]);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let token = InterruptToken::new();
        assert!(sum_events_by_log_value(&[], &temperature_series(), &[1.0], &token).is_err());

        let mut no_time = EventList::from_tof_events(vec![TofEvent::new(1.0, 0)]);
        no_time.switch_to(EventType::WeightedNoTime).unwrap();
        assert!(sum_events_by_log_value(
            &[no_time],
            &temperature_series(),
            &[0.0, 1.0],
            &token
        )
        .is_err());
    }

    #[test]
    fn test_interruption_aborts() {
        let lists = vec![EventList::from_tof_events(vec![TofEvent::new(1.0, 10)])];
        let token = InterruptToken::new();
        token.interrupt();

        assert_eq!(
            sum_events_by_log_value(&lists, &temperature_series(), &[5.0, 25.0], &token),
            Err(LogError::Interrupted)
        );
    }

    #[test]
    fn test_many_lists_accumulate_into_shared_bins() {
        let lists: Vec<EventList> = (0..32)
            .map(|_| EventList::from_tof_events(vec![TofEvent::new(1.0, 10)]))
            .collect();
        let bins = vec![5.0, 15.0];
        let token = InterruptToken::new();

        let sums = sum_events_by_log_value(&lists, &temperature_series(), &bins, &token).unwrap();
        assert_eq!(sums, vec![32.0]);
    }
}
