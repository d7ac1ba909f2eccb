//! Repeated runs reduced to best, worst and average outcomes.
//!
//! The sequential runners share one [`UniformVariateSource`] across trials,
//! so trial `k + 1` continues the stream trial `k` stopped at. The parallel
//! runners give trial `k` its own ChaCha20 stream `k` of a single seed, which
//! keeps results independent of how rayon schedules the work.

use log::debug;
use rayon::prelude::*;

use super::distribution::SamplingDistribution;
use super::driver::{ConvergenceDriver, ThresholdConfig, ThresholdRun};
use super::estimator::RunningEstimate;
use super::integrand::Integrand;
use super::variate::UniformVariateSource;
use super::IntegrationRange;
use crate::error::{Error, Result};

/// Configuration for trial aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
    /// Number of independent runs
    pub trials: usize,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self { trials: 1000 }
    }
}

impl TrialConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::ZeroTrials);
        }
        Ok(())
    }
}

/// Min, max and running average of run outcomes, in constant memory.
///
/// A NaN outcome poisons all three statistics rather than being skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialStatistics {
    min: f64,
    max: f64,
    average: RunningEstimate<f64>,
}

impl Default for TrialStatistics {
    fn default() -> Self {
        Self::new()
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

impl TrialStatistics {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            average: RunningEstimate::new(),
        }
    }

    pub fn record(&mut self, outcome: f64) {
        self.min = nan_min(self.min, outcome);
        self.max = nan_max(self.max, outcome);
        self.average.fold(outcome);
    }

    /// Combines statistics gathered over disjoint sets of trials.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: nan_min(self.min, other.min),
            max: nan_max(self.max, other.max),
            average: self.average.merge(&other.average),
        }
    }

    /// Smallest outcome, `+∞` when nothing was recorded.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest outcome, `-∞` when nothing was recorded.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Mean outcome, `0` when nothing was recorded.
    pub fn average(&self) -> f64 {
        self.average.value()
    }

    pub fn count(&self) -> usize {
        self.average.count()
    }
}

/// Sample-count statistics of threshold-mode trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTrialReport {
    /// Samples needed, over the runs that converged
    pub samples: TrialStatistics,
    /// Runs stopped by the iteration cap, excluded from `samples`
    pub capped: usize,
}

impl Default for ThresholdTrialReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdTrialReport {
    pub fn new() -> Self {
        Self {
            samples: TrialStatistics::new(),
            capped: 0,
        }
    }

    pub fn record(&mut self, run: &ThresholdRun) {
        if run.converged() {
            self.samples.record(run.samples as f64);
        } else {
            self.capped += 1;
        }
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            samples: self.samples.merge(&other.samples),
            capped: self.capped + other.capped,
        }
    }

    pub fn converged(&self) -> usize {
        self.samples.count()
    }
}

/// Runs `config.trials` fixed-count runs and reduces their absolute error.
pub fn fixed_count_trials(
    integrand: &dyn Integrand,
    distribution: &dyn SamplingDistribution,
    range: IntegrationRange,
    samples: usize,
    config: &TrialConfig,
    source: &mut UniformVariateSource,
) -> Result<TrialStatistics> {
    config.validate()?;
    if samples == 0 {
        return Err(Error::ZeroSampleBudget);
    }

    let mut driver = ConvergenceDriver::new(integrand, distribution, range).with_ground_truth();
    let mut stats = TrialStatistics::new();
    for _ in 0..config.trials {
        let run = driver.run_fixed(source, samples)?;
        stats.record(run.abs_error().unwrap_or(f64::NAN));
    }
    debug!(
        "{} trials of {} samples of {}: error min {} max {} avg {}",
        config.trials,
        samples,
        distribution.name(),
        stats.min(),
        stats.max(),
        stats.average()
    );
    Ok(stats)
}

/// Runs `config.trials` threshold-mode runs and reduces their sample counts.
pub fn threshold_trials(
    integrand: &dyn Integrand,
    distribution: &dyn SamplingDistribution,
    range: IntegrationRange,
    threshold: &ThresholdConfig,
    config: &TrialConfig,
    source: &mut UniformVariateSource,
) -> Result<ThresholdTrialReport> {
    config.validate()?;
    threshold.validate()?;

    let mut driver = ConvergenceDriver::new(integrand, distribution, range).with_ground_truth();
    let mut report = ThresholdTrialReport::new();
    for _ in 0..config.trials {
        report.record(&driver.run_until(source, threshold)?);
    }
    debug!(
        "{} threshold trials of {}: {} converged, {} capped, samples avg {}",
        config.trials,
        distribution.name(),
        report.converged(),
        report.capped,
        report.samples.average()
    );
    Ok(report)
}

/// Parallel [`fixed_count_trials`]; trial `k` draws from stream `k` of `seed`.
pub fn fixed_count_trials_parallel(
    integrand: &(dyn Integrand + Sync),
    distribution: &(dyn SamplingDistribution + Sync),
    range: IntegrationRange,
    samples: usize,
    config: &TrialConfig,
    seed: u64,
) -> Result<TrialStatistics> {
    config.validate()?;
    if samples == 0 {
        return Err(Error::ZeroSampleBudget);
    }

    (0..config.trials as u64)
        .into_par_iter()
        .map(|trial| {
            let mut source = UniformVariateSource::for_stream(seed, trial);
            ConvergenceDriver::new(integrand, distribution, range)
                .with_ground_truth()
                .run_fixed(&mut source, samples)
        })
        .try_fold(TrialStatistics::new, |mut stats, run| {
            stats.record(run?.abs_error().unwrap_or(f64::NAN));
            Ok(stats)
        })
        .try_reduce(TrialStatistics::new, |a, b| Ok(a.merge(&b)))
}

/// Parallel [`threshold_trials`]; trial `k` draws from stream `k` of `seed`.
pub fn threshold_trials_parallel(
    integrand: &(dyn Integrand + Sync),
    distribution: &(dyn SamplingDistribution + Sync),
    range: IntegrationRange,
    threshold: &ThresholdConfig,
    config: &TrialConfig,
    seed: u64,
) -> Result<ThresholdTrialReport> {
    config.validate()?;
    threshold.validate()?;

    (0..config.trials as u64)
        .into_par_iter()
        .map(|trial| {
            let mut source = UniformVariateSource::for_stream(seed, trial);
            ConvergenceDriver::new(integrand, distribution, range)
                .with_ground_truth()
                .run_until(&mut source, threshold)
        })
        .try_fold(ThresholdTrialReport::new, |mut report, run| {
            report.record(&run?);
            Ok(report)
        })
        .try_reduce(ThresholdTrialReport::new, |a, b| Ok(a.merge(&b)))
}
