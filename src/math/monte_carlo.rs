//! Monte Carlo integration of one-dimensional functions.
//!
//! This module provides:
//! - A uniform variate source backed by an explicitly owned ChaCha20 generator
//! - The [`Integrand`] and [`SamplingDistribution`] capability traits
//! - Uniform and inverse-CDF importance sampling strategies
//! - An online estimator for the running mean and squared error
//! - A convergence driver with fixed-count and error-threshold modes
//! - Trial aggregation into min/max/average statistics
//!
//! # Examples
//!
//! ```
//! use importance::math::monte_carlo::{
//!     ConvergenceDriver, IntegrationRange, SinShape, SinSquared, InverseCdf,
//!     UniformVariateSource,
//! };
//!
//! let range = IntegrationRange::new(0.0, std::f64::consts::PI).unwrap();
//! let integrand = SinSquared;
//! let distribution = InverseCdf::new(SinShape);
//! let mut source = UniformVariateSource::with_seed(7);
//!
//! let mut driver = ConvergenceDriver::new(&integrand, &distribution, range).with_ground_truth();
//! let run = driver.run_fixed(&mut source, 100_000).unwrap();
//! assert!(run.abs_error().unwrap() < 0.01);
//! ```

use crate::error::{Error, Result};

pub mod catalog;
pub mod distribution;
pub mod driver;
pub mod estimator;
pub mod integrand;
pub mod monte_carlo_integration;
pub mod trials;
pub mod variate;

#[cfg(test)]
mod tests;

pub use catalog::{distribution_by_name, integrand_by_name, DISTRIBUTION_NAMES, INTEGRAND_NAMES};
pub use distribution::{
    CdfShape, CosHalfShape, InverseCdf, PowerShape, SamplingDistribution, SinShape,
    SinSquaredShape, Uniform,
};
pub use driver::{
    Checkpoints, ConvergenceDriver, FixedRun, Progress, Termination, ThresholdConfig, ThresholdRun,
};
pub use estimator::{ErrorTrace, IncrementalEstimator, RunningEstimate};
pub use integrand::{FnIntegrand, Integrand, Sine, SinSquared};
pub use monte_carlo_integration::monte_carlo_integration;
pub use trials::{
    fixed_count_trials, fixed_count_trials_parallel, threshold_trials, threshold_trials_parallel,
    ThresholdTrialReport, TrialConfig, TrialStatistics,
};
pub use variate::UniformVariateSource;

/// A validated, finite integration interval `[min, max]` with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationRange {
    min: f64,
    max: f64,
}

impl IntegrationRange {
    /// Creates a range, rejecting non-finite or degenerate bounds.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::NonFiniteRange { min, max });
        }
        if min >= max {
            return Err(Error::DegenerateRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The interval `[0, π]` the bundled densities were derived on.
    pub fn zero_to_pi() -> Self {
        Self {
            min: 0.0,
            max: std::f64::consts::PI,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the interval, `max - min`.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}
