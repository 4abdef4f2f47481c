//! The event container: storage, promotion, appending, masking and
//! time filtering.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::event::{EventType, TofEvent, WeightedEvent, WeightedEventNoTime};
use super::EventError;
use crate::time::TimeRoi;

/// Sort state of an [`EventList`]. The tag must reflect reality: every
/// mutation that can invalidate order resets it to `Unsorted` unless the
/// operation provably preserves order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Unsorted,
    TofSort,
    PulseTimeSort,
    PulseTimeTofSort,
    TimeAtSampleSort,
}

/// The active event vector; exactly one representation at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) enum EventStorage {
    Tof(Vec<TofEvent>),
    Weighted(Vec<WeightedEvent>),
    WeightedNoTime(Vec<WeightedEventNoTime>),
}

/// A per-detector list of events in one of three representations, plus the
/// sort-order tag and an optional histogram X axis shared with the owning
/// workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventList {
    pub(crate) storage: EventStorage,
    pub(crate) order: SortOrder,
    #[serde(skip)]
    histogram_x: Option<Arc<Vec<f64>>>,
}

impl Default for EventList {
    fn default() -> Self {
        Self::new()
    }
}

impl EventList {
    /// An empty list of raw [`TofEvent`]s.
    pub fn new() -> Self {
        Self {
            storage: EventStorage::Tof(Vec::new()),
            order: SortOrder::Unsorted,
            histogram_x: None,
        }
    }

    pub fn from_tof_events(events: Vec<TofEvent>) -> Self {
        Self {
            storage: EventStorage::Tof(events),
            order: SortOrder::Unsorted,
            histogram_x: None,
        }
    }

    pub fn event_type(&self) -> EventType {
        match &self.storage {
            EventStorage::Tof(_) => EventType::Tof,
            EventStorage::Weighted(_) => EventType::Weighted,
            EventStorage::WeightedNoTime(_) => EventType::WeightedNoTime,
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            EventStorage::Tof(v) => v.len(),
            EventStorage::Weighted(v) => v.len(),
            EventStorage::WeightedNoTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full reconstruction: drops every event and resets the representation
    /// to raw `Tof`. The only way the type ever goes back down.
    pub fn clear(&mut self) {
        self.storage = EventStorage::Tof(Vec::new());
        self.order = SortOrder::Unsorted;
    }

    /// Attach the bin boundaries shared with the owning workspace.
    pub fn set_histogram_x(&mut self, x: Arc<Vec<f64>>) {
        self.histogram_x = Some(x);
    }

    pub fn histogram_x(&self) -> Option<Arc<Vec<f64>>> {
        self.histogram_x.clone()
    }

    /// Convert the storage upward to `target`. Demotion requests are ignored;
    /// callers that must reject them go through [`EventList::switch_to`].
    pub(crate) fn promote(&mut self, target: EventType) {
        if target <= self.event_type() {
            return;
        }
        let pulse_ordered = matches!(
            self.order,
            SortOrder::PulseTimeSort | SortOrder::PulseTimeTofSort | SortOrder::TimeAtSampleSort
        );
        self.storage = match (std::mem::replace(&mut self.storage, EventStorage::Tof(Vec::new())), target)
        {
            (EventStorage::Tof(v), EventType::Weighted) => {
                EventStorage::Weighted(v.into_iter().map(WeightedEvent::from).collect())
            }
            (EventStorage::Tof(v), EventType::WeightedNoTime) => {
                EventStorage::WeightedNoTime(v.into_iter().map(WeightedEventNoTime::from).collect())
            }
            (EventStorage::Weighted(v), EventType::WeightedNoTime) => {
                EventStorage::WeightedNoTime(v.into_iter().map(WeightedEventNoTime::from).collect())
            }
            (storage, _) => storage,
        };
        // pulse-based orderings are meaningless once pulse times are dropped
        if self.event_type() == EventType::WeightedNoTime && pulse_ordered {
            self.order = SortOrder::Unsorted;
        }
    }

    /// Promote the representation to `target`, converting every stored event
    /// in place. Demotion is a type mismatch; the same type is a no-op.
    pub fn switch_to(&mut self, target: EventType) -> Result<(), EventError> {
        if target < self.event_type() {
            return Err(EventError::TypeMismatch {
                op: "switch_to a lower representation",
                found: self.event_type(),
            });
        }
        self.promote(target);
        Ok(())
    }

    /// Append a raw event, converting it to the current representation.
    pub fn push_tof(&mut self, event: TofEvent) {
        match &mut self.storage {
            EventStorage::Tof(v) => v.push(event),
            EventStorage::Weighted(v) => v.push(WeightedEvent::from(event)),
            EventStorage::WeightedNoTime(v) => v.push(WeightedEventNoTime::from(event)),
        }
        self.order = SortOrder::Unsorted;
    }

    /// Append a weighted event, promoting the list if it still holds raw
    /// events.
    pub fn push_weighted(&mut self, event: WeightedEvent) {
        self.promote(EventType::Weighted);
        match &mut self.storage {
            EventStorage::Weighted(v) => v.push(event),
            EventStorage::WeightedNoTime(v) => v.push(WeightedEventNoTime::from(event)),
            EventStorage::Tof(_) => unreachable!("list was just promoted"),
        }
        self.order = SortOrder::Unsorted;
    }

    /// Append a time-stripped event, promoting the list all the way.
    pub fn push_weighted_no_time(&mut self, event: WeightedEventNoTime) {
        self.promote(EventType::WeightedNoTime);
        match &mut self.storage {
            EventStorage::WeightedNoTime(v) => v.push(event),
            _ => unreachable!("list was just promoted"),
        }
        self.order = SortOrder::Unsorted;
    }

    /// Append all of `other` (`+=`). The resulting representation is the
    /// higher of the two operands.
    pub fn append_list(&mut self, other: &EventList) {
        let target = self.event_type().max(other.event_type());
        self.promote(target);
        match (&mut self.storage, &other.storage) {
            (EventStorage::Tof(v), EventStorage::Tof(o)) => v.extend_from_slice(o),
            (EventStorage::Weighted(v), EventStorage::Tof(o)) => {
                v.extend(o.iter().copied().map(WeightedEvent::from));
            }
            (EventStorage::Weighted(v), EventStorage::Weighted(o)) => v.extend_from_slice(o),
            (EventStorage::WeightedNoTime(v), EventStorage::Tof(o)) => {
                v.extend(o.iter().copied().map(WeightedEventNoTime::from));
            }
            (EventStorage::WeightedNoTime(v), EventStorage::Weighted(o)) => {
                v.extend(o.iter().copied().map(WeightedEventNoTime::from));
            }
            (EventStorage::WeightedNoTime(v), EventStorage::WeightedNoTime(o)) => {
                v.extend_from_slice(o);
            }
            _ => unreachable!("lhs was promoted to the larger representation"),
        }
        self.order = SortOrder::Unsorted;
    }

    /// Subtract `other` (`-=`) by appending its events with negated weights.
    /// Events are never removed; cancellation happens in later aggregation.
    pub fn subtract_list(&mut self, other: &EventList) {
        let target = self
            .event_type()
            .max(other.event_type())
            .max(EventType::Weighted);
        self.promote(target);
        let negate = |mut event: WeightedEvent| {
            event.weight = -event.weight;
            event
        };
        let negate_no_time = |mut event: WeightedEventNoTime| {
            event.weight = -event.weight;
            event
        };
        match (&mut self.storage, &other.storage) {
            (EventStorage::Weighted(v), EventStorage::Tof(o)) => {
                v.extend(o.iter().copied().map(WeightedEvent::from).map(negate));
            }
            (EventStorage::Weighted(v), EventStorage::Weighted(o)) => {
                v.extend(o.iter().copied().map(negate));
            }
            (EventStorage::WeightedNoTime(v), EventStorage::Tof(o)) => {
                v.extend(o.iter().copied().map(WeightedEventNoTime::from).map(negate_no_time));
            }
            (EventStorage::WeightedNoTime(v), EventStorage::Weighted(o)) => {
                v.extend(o.iter().copied().map(WeightedEventNoTime::from).map(negate_no_time));
            }
            (EventStorage::WeightedNoTime(v), EventStorage::WeightedNoTime(o)) => {
                v.extend(o.iter().copied().map(negate_no_time));
            }
            _ => unreachable!("lhs was promoted to at least Weighted"),
        }
        self.order = SortOrder::Unsorted;
    }

    /// Sum of event weights with TOF in `[min, max)`; raw events count one
    /// each. `entire_range` ignores the limits; `max < min` yields zero.
    pub fn integrate(&self, min: f64, max: f64, entire_range: bool) -> f64 {
        self.integrate_with_error(min, max, entire_range).0
    }

    /// As [`EventList::integrate`], also returning the propagated error.
    pub fn integrate_with_error(&self, min: f64, max: f64, entire_range: bool) -> (f64, f64) {
        if !entire_range && max < min {
            return (0.0, 0.0);
        }
        let in_range = |tof: f64| entire_range || (tof >= min && tof < max);
        let (mut sum, mut error_squared) = (0.0, 0.0);
        match &self.storage {
            EventStorage::Tof(v) => {
                let count = v.iter().filter(|e| in_range(e.tof)).count();
                sum += count as f64;
                error_squared += count as f64;
            }
            EventStorage::Weighted(v) => {
                for event in v.iter().filter(|e| in_range(e.tof)) {
                    sum += event.weight;
                    error_squared += event.error_squared;
                }
            }
            EventStorage::WeightedNoTime(v) => {
                for event in v.iter().filter(|e| in_range(e.tof)) {
                    sum += event.weight;
                    error_squared += event.error_squared;
                }
            }
        }
        (sum, error_squared.sqrt())
    }

    /// Remove events with TOF in `[min, max]`, returning how many were
    /// dropped. Survivors keep their relative order.
    pub fn mask_tof(&mut self, min: f64, max: f64) -> Result<usize, EventError> {
        if min > max {
            return Err(EventError::InvalidArgument(format!(
                "mask range is inverted: {min} > {max}"
            )));
        }
        let before = self.len();
        let keep = |tof: f64| tof < min || tof > max;
        match &mut self.storage {
            EventStorage::Tof(v) => v.retain(|e| keep(e.tof)),
            EventStorage::Weighted(v) => v.retain(|e| keep(e.tof)),
            EventStorage::WeightedNoTime(v) => v.retain(|e| keep(e.tof)),
        }
        Ok(before - self.len())
    }

    /// Remove the events whose flag is `true`, returning how many were
    /// dropped. Survivors keep their relative order.
    pub fn mask_condition(&mut self, mask: &[bool]) -> Result<usize, EventError> {
        if mask.len() != self.len() {
            return Err(EventError::InvalidArgument(format!(
                "mask has {} entries for {} events",
                mask.len(),
                self.len()
            )));
        }
        let before = self.len();
        fn retain_unmasked<T>(events: &mut Vec<T>, mask: &[bool]) {
            let mut index = 0;
            events.retain(|_| {
                let drop = mask[index];
                index += 1;
                !drop
            });
        }
        match &mut self.storage {
            EventStorage::Tof(v) => retain_unmasked(v, mask),
            EventStorage::Weighted(v) => retain_unmasked(v, mask),
            EventStorage::WeightedNoTime(v) => retain_unmasked(v, mask),
        }
        Ok(before - self.len())
    }

    /// All TOF values in storage order.
    pub fn get_tofs(&self) -> Vec<f64> {
        match &self.storage {
            EventStorage::Tof(v) => v.iter().map(|e| e.tof).collect(),
            EventStorage::Weighted(v) => v.iter().map(|e| e.tof).collect(),
            EventStorage::WeightedNoTime(v) => v.iter().map(|e| e.tof).collect(),
        }
    }

    pub fn get_weights(&self) -> Vec<f64> {
        match &self.storage {
            EventStorage::Tof(v) => vec![1.0; v.len()],
            EventStorage::Weighted(v) => v.iter().map(|e| e.weight).collect(),
            EventStorage::WeightedNoTime(v) => v.iter().map(|e| e.weight).collect(),
        }
    }

    pub fn get_error_squareds(&self) -> Vec<f64> {
        match &self.storage {
            EventStorage::Tof(v) => vec![1.0; v.len()],
            EventStorage::Weighted(v) => v.iter().map(|e| e.error_squared).collect(),
            EventStorage::WeightedNoTime(v) => v.iter().map(|e| e.error_squared).collect(),
        }
    }

    /// All pulse times in storage order; a type mismatch for time-stripped
    /// lists.
    pub fn get_pulse_times(&self) -> Result<Vec<i64>, EventError> {
        match &self.storage {
            EventStorage::Tof(v) => Ok(v.iter().map(|e| e.pulse_time).collect()),
            EventStorage::Weighted(v) => Ok(v.iter().map(|e| e.pulse_time).collect()),
            EventStorage::WeightedNoTime(_) => Err(EventError::TypeMismatch {
                op: "get_pulse_times",
                found: EventType::WeightedNoTime,
            }),
        }
    }

    pub fn as_tof_slice(&self) -> Result<&[TofEvent], EventError> {
        match &self.storage {
            EventStorage::Tof(v) => Ok(v),
            _ => Err(EventError::TypeMismatch {
                op: "as_tof_slice",
                found: self.event_type(),
            }),
        }
    }

    pub fn as_weighted_slice(&self) -> Result<&[WeightedEvent], EventError> {
        match &self.storage {
            EventStorage::Weighted(v) => Ok(v),
            _ => Err(EventError::TypeMismatch {
                op: "as_weighted_slice",
                found: self.event_type(),
            }),
        }
    }

    pub fn as_weighted_no_time_slice(&self) -> Result<&[WeightedEventNoTime], EventError> {
        match &self.storage {
            EventStorage::WeightedNoTime(v) => Ok(v),
            _ => Err(EventError::TypeMismatch {
                op: "as_weighted_no_time_slice",
                found: self.event_type(),
            }),
        }
    }

    fn check_time_filterable(&self, op: &'static str) -> Result<(), EventError> {
        if self.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op,
                found: EventType::WeightedNoTime,
            });
        }
        Ok(())
    }

    /// Copy the events with pulse time in `[start, stop)` into a new list of
    /// the same representation, sorted by pulse time. Sorts the receiver by
    /// pulse time as a side effect.
    pub fn filter_by_pulse_time(&mut self, start: i64, stop: i64) -> Result<EventList, EventError> {
        self.check_time_filterable("filter_by_pulse_time")?;
        if start >= stop {
            return Err(EventError::InvalidArgument(format!(
                "filter window is empty or inverted: [{start}, {stop})"
            )));
        }
        self.sort_pulse_time()?;

        let mut out = EventList::new();
        match &self.storage {
            EventStorage::Tof(v) => {
                let lo = v.partition_point(|e| e.pulse_time < start);
                let hi = v.partition_point(|e| e.pulse_time < stop);
                out.storage = EventStorage::Tof(v[lo..hi].to_vec());
            }
            EventStorage::Weighted(v) => {
                let lo = v.partition_point(|e| e.pulse_time < start);
                let hi = v.partition_point(|e| e.pulse_time < stop);
                out.storage = EventStorage::Weighted(v[lo..hi].to_vec());
            }
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }
        out.order = SortOrder::PulseTimeSort;
        Ok(out)
    }

    /// Copy the events inside the ROI's included regions into a new list,
    /// sorted by pulse time. An all-inclusive ROI is rejected as ambiguous;
    /// the explicit "use none" sentinel yields an empty list.
    pub fn filter_by_roi(&mut self, roi: &TimeRoi) -> Result<EventList, EventError> {
        self.check_time_filterable("filter_by_roi")?;
        if roi.is_use_all() {
            return Err(EventError::InvalidArgument(
                "cannot filter with an all-inclusive TimeROI".to_string(),
            ));
        }

        let mut out = EventList::new();
        out.order = SortOrder::PulseTimeSort;
        if roi.is_use_none() {
            out.promote(self.event_type());
            return Ok(out);
        }

        self.sort_pulse_time()?;
        let times = self.get_pulse_times()?;
        let ranges = roi.calculate_indices(&times);
        match &self.storage {
            EventStorage::Tof(v) => {
                let mut copied = Vec::new();
                for (lo, hi) in ranges {
                    copied.extend_from_slice(&v[lo..hi]);
                }
                out.storage = EventStorage::Tof(copied);
            }
            EventStorage::Weighted(v) => {
                let mut copied = Vec::new();
                for (lo, hi) in ranges {
                    copied.extend_from_slice(&v[lo..hi]);
                }
                out.storage = EventStorage::Weighted(copied);
            }
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }
        Ok(out)
    }

    /// Remove the events outside the ROI's included regions, in place,
    /// returning how many were dropped. Survivor order (and the sort tag)
    /// is preserved.
    pub fn filter_in_place(&mut self, roi: &TimeRoi) -> Result<usize, EventError> {
        self.check_time_filterable("filter_in_place")?;
        if roi.is_use_all() {
            return Err(EventError::InvalidArgument(
                "cannot filter with an all-inclusive TimeROI".to_string(),
            ));
        }
        let before = self.len();
        match &mut self.storage {
            EventStorage::Tof(v) => v.retain(|e| roi.value_at_time(e.pulse_time)),
            EventStorage::Weighted(v) => v.retain(|e| roi.value_at_time(e.pulse_time)),
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }
        Ok(before - self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_tof_events() -> EventList {
        EventList::from_tof_events((0..10).map(|i| TofEvent::new(i as f64 * 10.0, i)).collect())
    }

    #[test]
    fn test_new_list_is_tof() {
        let list = EventList::new();
        assert_eq!(list.event_type(), EventType::Tof);
        assert_eq!(list.sort_order(), SortOrder::Unsorted);
        assert!(list.is_empty());
    }

    #[test]
    fn test_switch_to_promotes_in_place() {
        let mut list = ten_tof_events();
        list.switch_to(EventType::Weighted).unwrap();
        assert_eq!(list.event_type(), EventType::Weighted);
        assert_eq!(list.len(), 10);

        let weighted = list.as_weighted_slice().unwrap();
        assert_eq!(weighted[3].tof, 30.0);
        assert_eq!(weighted[3].weight, 1.0);
        assert_eq!(weighted[3].error_squared, 1.0);
    }

    #[test]
    fn test_switch_to_rejects_demotion() {
        let mut list = ten_tof_events();
        list.switch_to(EventType::WeightedNoTime).unwrap();
        let err = list.switch_to(EventType::Weighted).unwrap_err();
        assert!(matches!(err, EventError::TypeMismatch { .. }));
        assert_eq!(list.event_type(), EventType::WeightedNoTime);
    }

    #[test]
    fn test_switch_to_same_type_is_noop() {
        let mut list = ten_tof_events();
        list.switch_to(EventType::Tof).unwrap();
        assert_eq!(list.event_type(), EventType::Tof);
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn test_append_promotes_to_max_type() {
        let mut tof = ten_tof_events();
        let mut weighted = EventList::new();
        weighted.push_weighted(WeightedEvent::new(5.0, 0, 2.0, 4.0));

        tof.append_list(&weighted);
        assert_eq!(tof.event_type(), EventType::Weighted);
        assert_eq!(tof.len(), 11);
        assert_eq!(tof.sort_order(), SortOrder::Unsorted);

        // appending a lower type onto a higher one keeps the higher
        let mut no_time = EventList::new();
        no_time.push_weighted_no_time(WeightedEventNoTime::new(1.0, 1.0, 1.0));
        no_time.append_list(&ten_tof_events());
        assert_eq!(no_time.event_type(), EventType::WeightedNoTime);
        assert_eq!(no_time.len(), 11);
    }

    #[test]
    fn test_subtract_negates_weights() {
        let mut lhs = ten_tof_events();
        let rhs = ten_tof_events();
        lhs.subtract_list(&rhs);

        assert_eq!(lhs.event_type(), EventType::Weighted);
        assert_eq!(lhs.len(), 20);
        // total signal cancels but the error accumulates
        let (sum, error) = lhs.integrate_with_error(0.0, 0.0, true);
        assert_eq!(sum, 0.0);
        assert!((error - (20.0f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_half_open_window() {
        let list = ten_tof_events(); // tofs 0, 10, ..., 90
        assert_eq!(list.integrate(0.0, 100.0, false), 10.0);
        assert_eq!(list.integrate(10.0, 30.0, false), 2.0); // 10 and 20
        assert_eq!(list.integrate(5.0, 2.0, false), 0.0); // inverted
        assert_eq!(list.integrate(1e9, -1e9, true), 10.0); // entire range
    }

    #[test]
    fn test_mask_tof() {
        let mut list = ten_tof_events();
        let removed = list.mask_tof(20.0, 40.0).unwrap();
        assert_eq!(removed, 3); // 20, 30, 40 inclusive
        assert_eq!(list.len(), 7);
        assert!(list.mask_tof(10.0, 0.0).is_err());
    }

    #[test]
    fn test_mask_condition() {
        let mut list = ten_tof_events();
        let mut mask = vec![false; 10];
        mask[0] = true;
        mask[9] = true;
        let removed = list.mask_condition(&mask).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(list.len(), 8);
        assert_eq!(list.get_tofs()[0], 10.0);

        assert!(list.mask_condition(&[true; 3]).is_err());
    }

    #[test]
    fn test_filter_by_pulse_time() {
        let mut list = ten_tof_events(); // pulse times 0..=9
        let out = list.filter_by_pulse_time(2, 5).unwrap();
        assert_eq!(out.len(), 3); // pulses 2, 3, 4
        assert_eq!(out.event_type(), EventType::Tof);
        assert_eq!(out.sort_order(), SortOrder::PulseTimeSort);
        assert_eq!(list.len(), 10); // receiver keeps its events

        assert!(list.filter_by_pulse_time(5, 5).is_err());
    }

    #[test]
    fn test_filter_by_pulse_time_rejects_no_time() {
        let mut list = ten_tof_events();
        list.switch_to(EventType::WeightedNoTime).unwrap();
        assert!(matches!(
            list.filter_by_pulse_time(0, 10),
            Err(EventError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_filter_by_roi() {
        let mut list = ten_tof_events();
        let mut roi = TimeRoi::from_interval(2, 5).unwrap();
        roi.add_roi(8, 100).unwrap();

        let out = list.filter_by_roi(&roi).unwrap();
        assert_eq!(out.len(), 5); // pulses 2,3,4,8,9
        assert_eq!(out.sort_order(), SortOrder::PulseTimeSort);

        assert!(list.filter_by_roi(&TimeRoi::new()).is_err()); // ambiguous

        let none = list.filter_by_roi(&TimeRoi::use_none()).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_filter_in_place() {
        let mut list = ten_tof_events();
        let roi = TimeRoi::from_interval(3, 7).unwrap();
        let removed = list.filter_in_place(&roi).unwrap();
        assert_eq!(removed, 6);
        assert_eq!(list.get_pulse_times().unwrap(), vec![3, 4, 5, 6]);

        let mut untouched = ten_tof_events();
        assert!(untouched.filter_in_place(&TimeRoi::new()).is_err());
        assert_eq!(untouched.len(), 10);
    }

    #[test]
    fn test_shared_histogram_axis() {
        let mut list = ten_tof_events();
        assert!(list.histogram_x().is_none());

        let x = Arc::new(vec![0.0, 50.0, 100.0]);
        list.set_histogram_x(Arc::clone(&x));
        let shared = list.histogram_x().unwrap();
        assert!(Arc::ptr_eq(&shared, &x));
    }

    #[test]
    fn test_clear_resets_type() {
        let mut list = ten_tof_events();
        list.switch_to(EventType::WeightedNoTime).unwrap();
        list.clear();
        assert_eq!(list.event_type(), EventType::Tof);
        assert!(list.is_empty());
    }
}
