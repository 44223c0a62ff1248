//! Regularly sampled time and frequency axes.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TwodError};

fn axis_error(code: &str, message: impl Into<String>) -> TwodError {
    TwodError::Axis(ErrorInfo::new(code, message))
}

/// Sampling convention of an axis.
///
/// `Upper` axes start at their origin and extend in one direction, `Complete`
/// axes are signed and centred on zero in the conjugate (frequency) domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AxisType {
    /// One-sided sampling.
    #[default]
    Upper,
    /// Signed, zero-centred sampling.
    Complete,
}

fn validate(start: f64, length: usize, step: f64) -> Result<(), TwodError> {
    if length == 0 {
        return Err(axis_error("empty-axis", "axis requires at least one sample"));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(TwodError::Axis(
            ErrorInfo::new("invalid-step", "axis step must be positive and finite")
                .with_context("step", step.to_string()),
        ));
    }
    if !start.is_finite() {
        return Err(axis_error("invalid-start", "axis start must be finite"));
    }
    Ok(())
}

fn samples(start: f64, length: usize, step: f64) -> Vec<f64> {
    (0..length).map(|idx| start + idx as f64 * step).collect()
}

fn locate_on(start: f64, length: usize, step: f64, value: f64) -> Result<(usize, f64), TwodError> {
    let position = ((value - start) / step).round();
    if !position.is_finite() || position < 0.0 || position >= length as f64 {
        return Err(TwodError::Axis(
            ErrorInfo::new("out-of-range", "value lies outside the sampled axis")
                .with_context("value", value.to_string())
                .with_context("start", start.to_string())
                .with_context("end", (start + (length - 1) as f64 * step).to_string()),
        ));
    }
    let index = position as usize;
    Ok((index, value - (start + index as f64 * step)))
}

/// Axis of time samples (fs in internal units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    /// First sample.
    pub start: f64,
    /// Number of samples.
    pub length: usize,
    /// Sample spacing.
    pub step: f64,
    /// Sampling convention.
    #[serde(default)]
    pub atype: AxisType,
}

impl TimeAxis {
    /// Creates a one-sided time axis.
    pub fn new(start: f64, length: usize, step: f64) -> Result<Self, TwodError> {
        validate(start, length, step)?;
        Ok(Self {
            start,
            length,
            step,
            atype: AxisType::Upper,
        })
    }

    /// Returns a copy with a different sampling convention.
    pub fn with_type(mut self, atype: AxisType) -> Self {
        self.atype = atype;
        self
    }

    /// Sample values `start + i * step`.
    pub fn data(&self) -> Vec<f64> {
        samples(self.start, self.length, self.step)
    }

    /// Value of the sample at `index`.
    pub fn value(&self, index: usize) -> Option<f64> {
        (index < self.length).then(|| self.start + index as f64 * self.step)
    }

    /// Nearest sample index and the residual `value - data[index]`.
    pub fn locate(&self, value: f64) -> Result<(usize, f64), TwodError> {
        locate_on(self.start, self.length, self.step, value)
    }

    /// Frequency axis conjugate to this time axis under the complete
    /// (signed, zero-centred) convention.
    pub fn frequency_axis(&self) -> FrequencyAxis {
        let step = 2.0 * PI / (self.length as f64 * self.step);
        let start = -((self.length / 2) as f64) * step;
        FrequencyAxis {
            start,
            length: self.length,
            step,
            atype: AxisType::Complete,
            time_start: self.start,
        }
    }
}

/// Axis of angular frequency samples (rad/fs in internal units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyAxis {
    /// First sample.
    pub start: f64,
    /// Number of samples.
    pub length: usize,
    /// Sample spacing.
    pub step: f64,
    /// Sampling convention.
    #[serde(default)]
    pub atype: AxisType,
    /// Start of the conjugate time axis.
    #[serde(default)]
    pub time_start: f64,
}

impl FrequencyAxis {
    /// Creates a frequency axis with the default (one-sided) convention.
    pub fn new(start: f64, length: usize, step: f64) -> Result<Self, TwodError> {
        validate(start, length, step)?;
        Ok(Self {
            start,
            length,
            step,
            atype: AxisType::Upper,
            time_start: 0.0,
        })
    }

    /// Sample values `start + i * step`.
    pub fn data(&self) -> Vec<f64> {
        samples(self.start, self.length, self.step)
    }

    /// Value of the sample at `index`.
    pub fn value(&self, index: usize) -> Option<f64> {
        (index < self.length).then(|| self.start + index as f64 * self.step)
    }

    /// Last sample value.
    pub fn end(&self) -> f64 {
        self.start + (self.length - 1) as f64 * self.step
    }

    /// Nearest sample index and the residual `value - data[index]`.
    pub fn locate(&self, value: f64) -> Result<(usize, f64), TwodError> {
        locate_on(self.start, self.length, self.step, value)
    }

    /// Returns the axis offset by `shift` (e.g. the rotating-wave frequency).
    pub fn shifted(&self, shift: f64) -> Self {
        Self {
            start: self.start + shift,
            ..self.clone()
        }
    }

    /// Rebuilds the axis over the inclusive index range `lo..=hi`, keeping
    /// step, convention and conjugate time origin.
    pub fn sub_range(&self, lo: usize, hi: usize) -> Result<Self, TwodError> {
        if lo > hi || hi >= self.length {
            return Err(TwodError::Axis(
                ErrorInfo::new("invalid-range", "index range does not fit the axis")
                    .with_context("lo", lo.to_string())
                    .with_context("hi", hi.to_string())
                    .with_context("length", self.length.to_string()),
            ));
        }
        Ok(Self {
            start: self.start + lo as f64 * self.step,
            length: hi - lo + 1,
            step: self.step,
            atype: self.atype,
            time_start: self.time_start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_rounds_to_nearest_sample() {
        let axis = TimeAxis::new(0.0, 10, 2.0).unwrap();
        let (idx, resid) = axis.locate(4.9).unwrap();
        assert_eq!(idx, 2);
        assert!((resid - 0.9).abs() < 1e-12);
        let (idx, _) = axis.locate(5.1).unwrap();
        assert_eq!(idx, 3);
    }

    #[test]
    fn frequency_axis_is_zero_centred() {
        let axis = TimeAxis::new(0.0, 8, 1.0).unwrap();
        let freq = axis.frequency_axis();
        let data = freq.data();
        assert_eq!(freq.atype, AxisType::Complete);
        assert!((data[4]).abs() < 1e-12);
        assert!((freq.step - 2.0 * PI / 8.0).abs() < 1e-12);
    }
}
