//! The run-level log store: named properties, the active TimeROI, and
//! cached single-value statistics.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;

use super::cache::{CacheStats, StatisticsCache};
use super::statistics::Statistic;
use super::{LogError, LogValue};
use crate::progress::InterruptToken;
use crate::time::TimeRoi;

/// Name of the scalar property holding the integrated good proton charge.
pub const INTEGRATED_CHARGE_PROPERTY: &str = "gd_prtn_chrg";

/// Units string marking a charge log as picoCoulombs.
const PICO_COULOMB_UNITS: &str = "picoCoulomb";

/// Conversion from picoCoulombs to microampere-hours.
const PICO_COULOMB_TO_MICRO_AMP_HOUR: f64 = 1.0e-6 / 3600.0;

/// A run's log manager: a concurrent name -> value store, the TimeROI the
/// run is restricted to, and the statistics cache.
///
/// Every mutation that can change a statistic invalidates the matching cache
/// entries deterministically, so the cache has no observable effect beyond
/// "at most one recomputation per key between invalidations".
pub struct Run {
    properties: DashMap<String, LogValue>,
    roi: RwLock<TimeRoi>,
    cache: StatisticsCache,
    interrupt: InterruptToken,
    charge_is_raw: AtomicBool,
}

impl Run {
    pub fn new() -> Self {
        Self {
            properties: DashMap::new(),
            roi: RwLock::new(TimeRoi::new()),
            cache: StatisticsCache::new(),
            interrupt: InterruptToken::new(),
            charge_is_raw: AtomicBool::new(true),
        }
    }

    /// Install the cancellation token polled by statistic computation.
    pub fn set_interrupt_token(&mut self, token: InterruptToken) {
        self.interrupt = token;
    }

    /// Insert or replace a property, invalidating its cached statistics.
    pub fn add_property(&self, name: impl Into<String>, value: LogValue) {
        let name = name.into();
        self.cache.invalidate_log(&name);
        self.properties.insert(name, value);
    }

    /// Remove a property, purging every cached statistic for it. Returns
    /// whether the property existed.
    pub fn remove_property(&self, name: &str) -> bool {
        self.cache.invalidate_log(name);
        self.properties.remove(name).is_some()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.properties.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn property(&self, name: &str) -> Result<LogValue, LogError> {
        self.properties
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LogError::NotFound(name.to_string()))
    }

    /// The TimeROI the run's statistics are restricted to.
    pub fn time_roi(&self) -> TimeRoi {
        self.roi.read().clone()
    }

    /// Replace the active TimeROI. Every cached statistic becomes stale and
    /// is dropped.
    pub fn set_time_roi(&self, roi: TimeRoi) {
        *self.roi.write() = roi;
        self.cache.invalidate_all();
    }

    /// Reduce a property to a single number.
    ///
    /// Scalars are returned directly (the statistic is ignored); strings are
    /// parsed; time series yield the requested statistic restricted to the
    /// active TimeROI, cached per `(name, statistic)`.
    pub fn property_as_single_value(
        &self,
        name: &str,
        statistic: Statistic,
    ) -> Result<f64, LogError> {
        let entry = self
            .properties
            .get(name)
            .ok_or_else(|| LogError::NotFound(name.to_string()))?;
        match entry.value() {
            LogValue::Scalar(value) => Ok(*value),
            LogValue::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| LogError::TypeMismatch {
                        name: name.to_string(),
                        reason: format!("string value '{text}' is not numeric"),
                    })
            }
            LogValue::Series(series) => {
                if let Some(cached) = self.cache.get(name, statistic) {
                    return Ok(cached);
                }
                if self.interrupt.is_interrupted() {
                    return Err(LogError::Interrupted);
                }
                let computed = series.statistic(statistic, &self.roi.read());
                // an aborted computation must not populate the cache
                if self.interrupt.is_interrupted() {
                    return Err(LogError::Interrupted);
                }
                self.cache.put(name, statistic, computed);
                Ok(computed)
            }
        }
    }

    pub fn get_time_averaged_value(&self, name: &str) -> Result<f64, LogError> {
        self.property_as_single_value(name, Statistic::TimeAveragedMean)
    }

    pub fn get_time_averaged_std(&self, name: &str) -> Result<f64, LogError> {
        self.property_as_single_value(name, Statistic::TimeAveragedStdDev)
    }

    /// Sum the named charge log restricted to the TimeROI, convert
    /// picoCoulombs to microampere-hours, and store the result as the
    /// [`INTEGRATED_CHARGE_PROPERTY`] scalar. Clears the "charge is raw"
    /// flag.
    pub fn integrate_proton_charge(&self, log_name: &str) -> Result<f64, LogError> {
        let charge = {
            let entry = self
                .properties
                .get(log_name)
                .ok_or_else(|| LogError::NotFound(log_name.to_string()))?;
            let LogValue::Series(series) = entry.value() else {
                return Err(LogError::TypeMismatch {
                    name: log_name.to_string(),
                    reason: "proton charge must be a time series".to_string(),
                });
            };
            let total = series.sum_restricted(&self.roi.read());
            if series.units() == PICO_COULOMB_UNITS {
                total * PICO_COULOMB_TO_MICRO_AMP_HOUR
            } else {
                tracing::warn!(
                    "proton charge log '{}' has units '{}'; using the raw sum",
                    log_name,
                    series.units()
                );
                total
            }
        };
        // the map entry guard is dropped before writing the result back
        self.add_property(INTEGRATED_CHARGE_PROPERTY, LogValue::Scalar(charge));
        self.charge_is_raw.store(false, Ordering::SeqCst);
        Ok(charge)
    }

    /// Whether the stored integrated charge still reflects the raw,
    /// unfiltered log.
    pub fn charge_is_raw(&self) -> bool {
        self.charge_is_raw.load(Ordering::SeqCst)
    }

    /// Mark the stored charge as raw again, e.g. after reloading logs.
    pub fn mark_charge_raw(&self) {
        self.charge_is_raw.store(true, Ordering::SeqCst);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}
