//! Lossless-within-tolerance event compression.
//!
//! Events whose TOF falls in the same tolerance bin collapse into a single
//! weighted event: weights and squared errors are summed, the TOF is the
//! weighted mean. A positive tolerance bins with fixed width; a negative
//! tolerance bins logarithmically, each bin `|tolerance|` times as wide as
//! its start, with the boundary grid pinned to the smallest positive TOF.

use fxhash::FxHashMap;

use super::event::{EventType, WeightedEvent, WeightedEventNoTime};
use super::list::{EventList, EventStorage, SortOrder};
use super::EventError;

#[derive(Debug, Clone, Copy, Default)]
struct CompressedBin {
    weight: f64,
    error_squared: f64,
    tof_weighted_sum: f64,
    tof_plain_sum: f64,
    pulse_weighted_sum: f64,
    count: usize,
}

impl CompressedBin {
    fn add(&mut self, tof: f64, weight: f64, error_squared: f64, pulse_offset: f64) {
        self.weight += weight;
        self.error_squared += error_squared;
        self.tof_weighted_sum += tof * weight;
        self.tof_plain_sum += tof;
        self.pulse_weighted_sum += pulse_offset * weight;
        self.count += 1;
    }

    /// Weighted-mean TOF, falling back to the arithmetic mean when the
    /// weights cancel to zero.
    fn mean_tof(&self) -> f64 {
        if self.weight != 0.0 {
            self.tof_weighted_sum / self.weight
        } else {
            self.tof_plain_sum / self.count as f64
        }
    }

    fn mean_pulse_offset(&self) -> f64 {
        if self.weight != 0.0 {
            self.pulse_weighted_sum / self.weight
        } else {
            0.0
        }
    }
}

/// TOF-to-bin mapping shared by both compression entry points.
enum TofBinner {
    Linear { width: f64 },
    Logarithmic { first_edge: f64, ratio_log: f64 },
}

impl TofBinner {
    /// Build from the signed tolerance, validating TOFs as required:
    /// logarithmic binning rejects any negative TOF outright.
    fn new(tolerance: f64, tofs: impl Iterator<Item = f64>) -> Result<Self, EventError> {
        if tolerance == 0.0 {
            return Err(EventError::InvalidArgument(
                "compression tolerance must be non-zero".to_string(),
            ));
        }
        if tolerance > 0.0 {
            return Ok(Self::Linear { width: tolerance });
        }
        let mut first_edge = f64::INFINITY;
        for tof in tofs {
            if tof < 0.0 {
                return Err(EventError::Domain(format!(
                    "negative TOF {tof} cannot be binned logarithmically"
                )));
            }
            if tof > 0.0 && tof < first_edge {
                first_edge = tof;
            }
        }
        if !first_edge.is_finite() {
            // all TOFs are exactly zero; everything lands in one bin
            first_edge = 1.0;
        }
        Ok(Self::Logarithmic {
            first_edge,
            ratio_log: (-tolerance).ln_1p(),
        })
    }

    fn bin(&self, tof: f64) -> i64 {
        match self {
            Self::Linear { width } => (tof / width).floor() as i64,
            Self::Logarithmic { first_edge, ratio_log } => {
                if tof <= *first_edge {
                    // zero TOF (and the pinned first edge) belong to bin 0
                    0
                } else {
                    ((tof / first_edge).ln() / ratio_log).floor() as i64
                }
            }
        }
    }
}

impl EventList {
    fn for_each_compressible(&self, mut f: impl FnMut(f64, f64, f64, i64)) {
        match &self.storage {
            EventStorage::Tof(v) => {
                for event in v {
                    f(event.tof, 1.0, 1.0, event.pulse_time);
                }
            }
            EventStorage::Weighted(v) => {
                for event in v {
                    f(event.tof, event.weight, event.error_squared, event.pulse_time);
                }
            }
            EventStorage::WeightedNoTime(v) => {
                for event in v {
                    f(event.tof, event.weight, event.error_squared, 0);
                }
            }
        }
    }

    /// Compress TOF neighbors into weighted, time-stripped events. Total
    /// weight and total squared error are conserved; the output is sorted by
    /// TOF. `tolerance > 0` uses fixed-width bins, `tolerance < 0`
    /// logarithmic bins of relative width `|tolerance|`.
    pub fn compress_events(&self, tolerance: f64) -> Result<EventList, EventError> {
        let binner = TofBinner::new(tolerance, self.get_tofs().into_iter())?;

        let mut bins: FxHashMap<i64, CompressedBin> = FxHashMap::default();
        self.for_each_compressible(|tof, weight, error_squared, _| {
            bins.entry(binner.bin(tof))
                .or_default()
                .add(tof, weight, error_squared, 0.0);
        });

        let mut compressed: Vec<WeightedEventNoTime> = bins
            .into_values()
            .map(|bin| WeightedEventNoTime::new(bin.mean_tof(), bin.weight, bin.error_squared))
            .collect();
        compressed.sort_unstable_by(|a, b| a.tof.total_cmp(&b.tof));

        let mut out = EventList::new();
        out.storage = EventStorage::WeightedNoTime(compressed);
        out.order = SortOrder::TofSort;
        Ok(out)
    }

    /// Compress as [`EventList::compress_events`], additionally grouping by
    /// pulse-time buckets of `pulse_tolerance_s` seconds counted from
    /// `start_time`. Each output event carries its bucket's weighted-mean
    /// pulse time; the output is sorted by pulse time then TOF.
    pub fn compress_fat_events(
        &self,
        tolerance: f64,
        start_time: i64,
        pulse_tolerance_s: f64,
    ) -> Result<EventList, EventError> {
        if self.event_type() == EventType::WeightedNoTime {
            return Err(EventError::TypeMismatch {
                op: "compress_fat_events",
                found: EventType::WeightedNoTime,
            });
        }
        if pulse_tolerance_s <= 0.0 {
            return Err(EventError::InvalidArgument(
                "pulse tolerance must be positive".to_string(),
            ));
        }
        let binner = TofBinner::new(tolerance, self.get_tofs().into_iter())?;
        let bucket_ns = pulse_tolerance_s * 1e9;

        let mut bins: FxHashMap<(i64, i64), CompressedBin> = FxHashMap::default();
        self.for_each_compressible(|tof, weight, error_squared, pulse_time| {
            let offset = (pulse_time - start_time) as f64;
            let bucket = (offset / bucket_ns).floor() as i64;
            bins.entry((bucket, binner.bin(tof)))
                .or_default()
                .add(tof, weight, error_squared, offset);
        });

        let mut compressed: Vec<WeightedEvent> = bins
            .into_values()
            .map(|bin| {
                let pulse_time = start_time + bin.mean_pulse_offset() as i64;
                WeightedEvent::new(bin.mean_tof(), pulse_time, bin.weight, bin.error_squared)
            })
            .collect();
        compressed.sort_unstable_by(|a, b| {
            a.pulse_time
                .cmp(&b.pulse_time)
                .then_with(|| a.tof.total_cmp(&b.tof))
        });

        let mut out = EventList::new();
        out.storage = EventStorage::Weighted(compressed);
        out.order = SortOrder::PulseTimeTofSort;
        Ok(out)
    }
}
