//! The three event representations and their promotion order.

use serde::{Deserialize, Serialize};

/// Representation of the events held by a list, ordered by promotion:
/// converting rightward is lossless for the new representation, converting
/// leftward is never allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Raw time-of-flight plus pulse time; implicit weight of one.
    Tof,
    /// Time-of-flight, pulse time, weight and squared error.
    Weighted,
    /// Weighted event with the pulse time dropped.
    WeightedNoTime,
}

/// A raw detector event: microsecond time-of-flight within its pulse plus
/// the absolute pulse time in epoch nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TofEvent {
    pub tof: f64,
    pub pulse_time: i64,
}

impl TofEvent {
    pub fn new(tof: f64, pulse_time: i64) -> Self {
        Self { tof, pulse_time }
    }
}

/// An event carrying a weight and its squared error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedEvent {
    pub tof: f64,
    pub pulse_time: i64,
    pub weight: f64,
    pub error_squared: f64,
}

impl WeightedEvent {
    pub fn new(tof: f64, pulse_time: i64, weight: f64, error_squared: f64) -> Self {
        Self {
            tof,
            pulse_time,
            weight,
            error_squared,
        }
    }

    pub fn error(&self) -> f64 {
        self.error_squared.sqrt()
    }
}

/// A weighted event whose pulse time has been dropped, the most compact
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedEventNoTime {
    pub tof: f64,
    pub weight: f64,
    pub error_squared: f64,
}

impl WeightedEventNoTime {
    pub fn new(tof: f64, weight: f64, error_squared: f64) -> Self {
        Self {
            tof,
            weight,
            error_squared,
        }
    }

    pub fn error(&self) -> f64 {
        self.error_squared.sqrt()
    }
}

impl From<TofEvent> for WeightedEvent {
    /// An unweighted event carries weight one and squared error one.
    fn from(event: TofEvent) -> Self {
        Self {
            tof: event.tof,
            pulse_time: event.pulse_time,
            weight: 1.0,
            error_squared: 1.0,
        }
    }
}

impl From<TofEvent> for WeightedEventNoTime {
    fn from(event: TofEvent) -> Self {
        Self {
            tof: event.tof,
            weight: 1.0,
            error_squared: 1.0,
        }
    }
}

impl From<WeightedEvent> for WeightedEventNoTime {
    fn from(event: WeightedEvent) -> Self {
        Self {
            tof: event.tof,
            weight: event.weight,
            error_squared: event.error_squared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_order() {
        assert!(EventType::Tof < EventType::Weighted);
        assert!(EventType::Weighted < EventType::WeightedNoTime);
        assert_eq!(EventType::Tof.max(EventType::WeightedNoTime), EventType::WeightedNoTime);
    }

    #[test]
    fn test_tof_to_weighted_is_unit_weight() {
        let weighted = WeightedEvent::from(TofEvent::new(100.0, 42));
        assert_eq!(weighted.tof, 100.0);
        assert_eq!(weighted.pulse_time, 42);
        assert_eq!(weighted.weight, 1.0);
        assert_eq!(weighted.error_squared, 1.0);
    }

    #[test]
    fn test_dropping_time_keeps_weight() {
        let no_time = WeightedEventNoTime::from(WeightedEvent::new(50.0, 7, 2.5, 0.25));
        assert_eq!(no_time.tof, 50.0);
        assert_eq!(no_time.weight, 2.5);
        assert_eq!(no_time.error_squared, 0.25);
        assert_eq!(no_time.error(), 0.5);
    }
}
