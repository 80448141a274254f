//! Piecewise-linear interpolation over a sampled time series.
//!
//! Telemetry arrives at an irregular cadence; the driver needs offsets at
//! uniform frame times inside the sampled span. Queries outside the span
//! are an error, never an extrapolation.

use std::fmt;

/// Error types for time-series interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Query time is outside the sampled span
    OutOfBounds { value: f64, min: f64, max: f64 },
    /// Fewer than two samples were provided
    TooFewPoints(usize),
    /// Sample times are not strictly increasing at the given index
    UnsortedTimes { index: usize },
    /// Time and value vectors differ in length
    LengthMismatch { times: usize, values: usize },
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::OutOfBounds { value, min, max } => {
                write!(f, "Time {value} is outside sampled span [{min}, {max}]")
            }
            InterpolationError::TooFewPoints(n) => {
                write!(f, "Need at least 2 samples for interpolation, got {n}")
            }
            InterpolationError::UnsortedTimes { index } => {
                write!(f, "Sample times must be strictly increasing (violated at index {index})")
            }
            InterpolationError::LengthMismatch { times, values } => {
                write!(f, "Time ({times}) and value ({values}) vectors differ in length")
            }
        }
    }
}

impl std::error::Error for InterpolationError {}

/// Piecewise-linear sampler over `(time, value)` pairs.
#[derive(Debug, Clone)]
pub struct LinearSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl LinearSeries {
    /// Build a sampler from sample times (strictly increasing) and values.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, InterpolationError> {
        if times.len() != values.len() {
            return Err(InterpolationError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.len() < 2 {
            return Err(InterpolationError::TooFewPoints(times.len()));
        }
        for i in 1..times.len() {
            if times[i] <= times[i - 1] {
                return Err(InterpolationError::UnsortedTimes { index: i });
            }
        }
        Ok(Self { times, values })
    }

    /// First and last sample time.
    pub fn span(&self) -> (f64, f64) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Interpolated value at time `t` within the sampled span.
    pub fn sample(&self, t: f64) -> Result<f64, InterpolationError> {
        let (min, max) = self.span();
        if !(min..=max).contains(&t) {
            return Err(InterpolationError::OutOfBounds { value: t, min, max });
        }

        // partition_point gives the first sample time > t; the segment
        // starts one before it
        let upper = self.times.partition_point(|&ts| ts <= t);
        if upper == self.times.len() {
            return Ok(self.values[self.values.len() - 1]);
        }
        let lower = upper - 1;

        let t0 = self.times[lower];
        let t1 = self.times[upper];
        let v0 = self.values[lower];
        let v1 = self.values[upper];
        let frac = (t - t0) / (t1 - t0);
        Ok(v0 + frac * (v1 - v0))
    }
}
