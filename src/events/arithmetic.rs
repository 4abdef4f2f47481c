//! Scalar and bin-wise multiplication/division with error propagation.

use super::event::EventType;
use super::list::{EventList, EventStorage};
use super::EventError;

/// Bin index owning `value` in the boundary vector `x`, or `None` outside
/// the binned range.
pub(crate) fn find_histogram_bin(x: &[f64], value: f64) -> Option<usize> {
    if value < x[0] || value >= x[x.len() - 1] {
        return None;
    }
    Some(x.partition_point(|&edge| edge <= value) - 1)
}

pub(crate) fn validate_bin_edges(x: &[f64]) -> Result<(), EventError> {
    if x.len() < 2 {
        return Err(EventError::InvalidArgument(
            "histogram needs at least two bin boundaries".to_string(),
        ));
    }
    if x.windows(2).any(|w| w[0] >= w[1]) {
        return Err(EventError::InvalidArgument(
            "histogram bin boundaries must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

impl EventList {
    /// Scale every weight by `factor` with standard product error
    /// propagation: `e'^2 = e^2 * f^2 + w^2 * fe^2`.
    fn apply_scale(&mut self, factor: f64, factor_error: f64) {
        self.promote(EventType::Weighted);
        let factor_sq = factor * factor;
        let error_sq = factor_error * factor_error;
        match &mut self.storage {
            EventStorage::Weighted(v) => {
                for event in v {
                    event.error_squared =
                        event.error_squared * factor_sq + event.weight * event.weight * error_sq;
                    event.weight *= factor;
                }
            }
            EventStorage::WeightedNoTime(v) => {
                for event in v {
                    event.error_squared =
                        event.error_squared * factor_sq + event.weight * event.weight * error_sq;
                    event.weight *= factor;
                }
            }
            EventStorage::Tof(_) => unreachable!("list was just promoted"),
        }
    }

    /// Multiply every event weight by the scalar `(factor, factor_error)`.
    ///
    /// Multiplying by exactly `(1.0, 0.0)` is a no-op and does not promote a
    /// raw list out of `Tof`.
    pub fn multiply(&mut self, factor: f64, factor_error: f64) -> Result<(), EventError> {
        if factor == 1.0 && factor_error == 0.0 {
            return Ok(());
        }
        self.apply_scale(factor, factor_error);
        Ok(())
    }

    /// Divide every event weight by the scalar `(factor, factor_error)`.
    /// A zero factor is a domain error; `(1.0, 0.0)` is a no-op.
    pub fn divide(&mut self, factor: f64, factor_error: f64) -> Result<(), EventError> {
        if factor == 0.0 {
            return Err(EventError::Domain("divide by zero factor".to_string()));
        }
        if factor == 1.0 && factor_error == 0.0 {
            return Ok(());
        }
        // dividing by (f, fe) is multiplying by (1/f, fe/f^2)
        self.apply_scale(1.0 / factor, factor_error / (factor * factor));
        Ok(())
    }

    /// Multiply each event by the `(y, e)` of the histogram bin owning its
    /// TOF. Events outside the binned range are left unscaled.
    pub fn multiply_histogram(
        &mut self,
        x: &[f64],
        y: &[f64],
        e: &[f64],
    ) -> Result<(), EventError> {
        Self::validate_histogram_operand(x, y, e)?;
        self.promote(EventType::Weighted);
        match &mut self.storage {
            EventStorage::Weighted(v) => {
                for event in v {
                    if let Some(bin) = find_histogram_bin(x, event.tof) {
                        let (factor, factor_error) = (y[bin], e[bin]);
                        event.error_squared = event.error_squared * factor * factor
                            + event.weight * event.weight * factor_error * factor_error;
                        event.weight *= factor;
                    }
                }
            }
            EventStorage::WeightedNoTime(v) => {
                for event in v {
                    if let Some(bin) = find_histogram_bin(x, event.tof) {
                        let (factor, factor_error) = (y[bin], e[bin]);
                        event.error_squared = event.error_squared * factor * factor
                            + event.weight * event.weight * factor_error * factor_error;
                        event.weight *= factor;
                    }
                }
            }
            EventStorage::Tof(_) => unreachable!("list was just promoted"),
        }
        Ok(())
    }

    /// Divide each event by the `(y, e)` of the histogram bin owning its
    /// TOF. Events outside the binned range, or in a zero bin, become
    /// NaN-weighted.
    pub fn divide_histogram(&mut self, x: &[f64], y: &[f64], e: &[f64]) -> Result<(), EventError> {
        Self::validate_histogram_operand(x, y, e)?;
        self.promote(EventType::Weighted);
        let scale = |weight: &mut f64, error_squared: &mut f64, bin: Option<usize>| match bin {
            Some(bin) if y[bin] != 0.0 => {
                let factor = 1.0 / y[bin];
                let factor_error = e[bin] / (y[bin] * y[bin]);
                *error_squared = *error_squared * factor * factor
                    + *weight * *weight * factor_error * factor_error;
                *weight *= factor;
            }
            _ => {
                *weight = f64::NAN;
                *error_squared = f64::NAN;
            }
        };
        match &mut self.storage {
            EventStorage::Weighted(v) => {
                for event in v {
                    let bin = find_histogram_bin(x, event.tof);
                    scale(&mut event.weight, &mut event.error_squared, bin);
                }
            }
            EventStorage::WeightedNoTime(v) => {
                for event in v {
                    let bin = find_histogram_bin(x, event.tof);
                    scale(&mut event.weight, &mut event.error_squared, bin);
                }
            }
            EventStorage::Tof(_) => unreachable!("list was just promoted"),
        }
        Ok(())
    }

    fn validate_histogram_operand(x: &[f64], y: &[f64], e: &[f64]) -> Result<(), EventError> {
        validate_bin_edges(x)?;
        if y.len() != x.len() - 1 || e.len() != y.len() {
            return Err(EventError::InvalidArgument(format!(
                "histogram operand shape mismatch: {} boundaries, {} values, {} errors",
                x.len(),
                y.len(),
                e.len()
            )));
        }
        Ok(())
    }
}
