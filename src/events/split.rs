//! Routing an event list across destination lists by pulse time.

use std::collections::BTreeMap;

use super::event::EventType;
use super::list::{EventList, EventStorage};
use super::EventError;
use crate::time::{TimeSplitter, NO_TARGET};

impl TimeSplitter {
    /// Route each event of `events` into the destination list owning its
    /// pulse time. Destinations map to pre-allocated lists in `outputs`;
    /// events owned by [`NO_TARGET`] are discarded.
    ///
    /// Every destination this splitter can route to must be present in
    /// `outputs` before any event is moved. Outputs that start empty inherit
    /// the source's sort-order tag (routing preserves relative order, so a
    /// subsequence of a sorted list stays sorted).
    pub fn split_event_list(
        &self,
        events: &EventList,
        outputs: &mut BTreeMap<i32, EventList>,
    ) -> Result<(), EventError> {
        if events.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op: "split_event_list",
                found: EventType::WeightedNoTime,
            });
        }
        let destinations = self.output_workspace_indices();
        for destination in &destinations {
            if !outputs.contains_key(destination) {
                return Err(EventError::InvalidArgument(format!(
                    "destination map has no list for workspace index {destination}"
                )));
            }
        }
        let started_empty: Vec<i32> = destinations
            .iter()
            .copied()
            .filter(|d| outputs[d].is_empty())
            .collect();

        match &events.storage {
            EventStorage::Tof(v) => {
                for event in v {
                    let destination = self.value_at_time(event.pulse_time);
                    if destination == NO_TARGET {
                        continue;
                    }
                    if let Some(out) = outputs.get_mut(&destination) {
                        out.push_tof(*event);
                    }
                }
            }
            EventStorage::Weighted(v) => {
                for event in v {
                    let destination = self.value_at_time(event.pulse_time);
                    if destination == NO_TARGET {
                        continue;
                    }
                    if let Some(out) = outputs.get_mut(&destination) {
                        out.push_weighted(*event);
                    }
                }
            }
            EventStorage::WeightedNoTime(_) => unreachable!("checked above"),
        }

        for destination in started_empty {
            if let Some(out) = outputs.get_mut(&destination) {
                out.order = events.order;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event::{TofEvent, WeightedEvent};
    use crate::events::list::SortOrder;

    fn outputs_for(splitter: &TimeSplitter) -> BTreeMap<i32, EventList> {
        splitter
            .output_workspace_indices()
            .into_iter()
            .map(|i| (i, EventList::new()))
            .collect()
    }

    #[test]
    fn test_split_routes_by_pulse_time() {
        let mut splitter = TimeSplitter::from_interval(0, 100, 0).unwrap();
        splitter.add_roi(100, 200, 1).unwrap();

        let events = EventList::from_tof_events(vec![
            TofEvent::new(1.0, 50),
            TofEvent::new(2.0, 150),
            TofEvent::new(3.0, 199),
            TofEvent::new(4.0, 250), // past the last boundary: discarded
        ]);

        let mut outputs = outputs_for(&splitter);
        splitter.split_event_list(&events, &mut outputs).unwrap();

        assert_eq!(outputs[&0].len(), 1);
        assert_eq!(outputs[&1].len(), 2);
        assert_eq!(outputs[&1].get_tofs(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_split_preserves_type_and_order() {
        let splitter = TimeSplitter::from_interval(0, 100, 0).unwrap();

        let mut events = EventList::new();
        events.push_weighted(WeightedEvent::new(2.0, 10, 2.0, 4.0));
        events.push_weighted(WeightedEvent::new(1.0, 20, 1.0, 1.0));
        events.sort_pulse_time().unwrap();

        let mut outputs = outputs_for(&splitter);
        splitter.split_event_list(&events, &mut outputs).unwrap();

        let out = &outputs[&0];
        assert_eq!(out.event_type(), EventType::Weighted);
        assert_eq!(out.sort_order(), SortOrder::PulseTimeSort);
        assert_eq!(out.as_weighted_slice().unwrap()[0].weight, 2.0);
    }

    #[test]
    fn test_split_rejects_no_time() {
        let splitter = TimeSplitter::from_interval(0, 100, 0).unwrap();
        let mut events = EventList::from_tof_events(vec![TofEvent::new(1.0, 50)]);
        events.switch_to(EventType::WeightedNoTime).unwrap();

        let mut outputs = outputs_for(&splitter);
        assert!(matches!(
            splitter.split_event_list(&events, &mut outputs),
            Err(EventError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_split_requires_preallocated_outputs() {
        let mut splitter = TimeSplitter::from_interval(0, 100, 0).unwrap();
        splitter.add_roi(100, 200, 1).unwrap();

        let events = EventList::from_tof_events(vec![TofEvent::new(1.0, 50)]);
        let mut outputs = BTreeMap::from([(0, EventList::new())]); // missing 1

        let err = splitter.split_event_list(&events, &mut outputs).unwrap_err();
        assert!(matches!(err, EventError::InvalidArgument(_)));
        assert!(outputs[&0].is_empty()); // nothing moved
    }

    #[test]
    fn test_split_discards_no_target_regions() {
        let mut splitter = TimeSplitter::from_interval(0, 300, 2).unwrap();
        splitter.add_roi(100, 200, NO_TARGET).unwrap();

        let events = EventList::from_tof_events(vec![
            TofEvent::new(1.0, 50),
            TofEvent::new(2.0, 150),
            TofEvent::new(3.0, 250),
        ]);

        let mut outputs = outputs_for(&splitter);
        splitter.split_event_list(&events, &mut outputs).unwrap();
        assert_eq!(outputs[&2].get_tofs(), vec![1.0, 3.0]);
    }
}
