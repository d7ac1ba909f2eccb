//! Single integration runs.
//!
//! A [`ConvergenceDriver`] owns nothing but borrowed references to an
//! integrand and a sampling distribution. Each call to [`run_fixed`] or
//! [`run_until`] is one run: it creates a fresh estimator, draws from the
//! caller's [`UniformVariateSource`], and ends in one [`Termination`].
//!
//! Threshold mode stops when the estimate is within a target error of the
//! true answer. That needs the true answer, so it is a diagnostic and
//! benchmarking mode only: blind integration has no way to know when to stop.
//!
//! [`run_fixed`]: ConvergenceDriver::run_fixed
//! [`run_until`]: ConvergenceDriver::run_until

use log::{debug, trace, warn};

use super::distribution::SamplingDistribution;
use super::estimator::IncrementalEstimator;
use super::integrand::Integrand;
use super::variate::UniformVariateSource;
use super::IntegrationRange;
use crate::error::{Error, Result};

/// Configuration for threshold mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    /// Stop once `|value - truth| <= target_error`
    pub target_error: f64,
    /// Give up after this many samples; `None` runs until convergence
    pub max_iterations: Option<usize>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            target_error: 1e-4,
            max_iterations: None,
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.target_error.is_finite() && self.target_error > 0.0) {
            return Err(Error::InvalidTargetError(self.target_error));
        }
        if self.max_iterations == Some(0) {
            return Err(Error::ZeroIterationCap);
        }
        Ok(())
    }
}

/// Sample indices at which the progress observer is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoints {
    indices: Vec<usize>,
}

impl Checkpoints {
    /// Checkpoints at explicit sample indices. Zero is ignored.
    pub fn at(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().filter(|&i| i > 0).collect();
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// The first sample, then 1/4096, 1/1024, 1/256, 1/64, 1/16, 1/4 and all
    /// of `budget`.
    pub fn fractions_of(budget: usize) -> Self {
        Self::at([
            1,
            budget / 4096,
            budget / 1024,
            budget / 256,
            budget / 64,
            budget / 16,
            budget / 4,
            budget,
        ])
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// A snapshot of a run, passed to the progress observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub sample_index: usize,
    pub estimate: f64,
    /// Signed error, `None` in blind runs
    pub error: Option<f64>,
    /// Root mean squared error so far, `None` in blind runs
    pub std_dev: Option<f64>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The fixed sample budget was spent.
    FixedCount,
    /// The estimate came within the target error.
    ThresholdMet,
    /// The iteration cap was reached before the target error.
    IterationCapExceeded,
}

/// Outcome of a fixed-count run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRun {
    /// Always [`Termination::FixedCount`]
    pub termination: Termination,
    pub value: f64,
    pub samples: usize,
    /// Signed error `value - truth`, `None` in blind runs
    pub error: Option<f64>,
    pub std_dev: Option<f64>,
}

impl FixedRun {
    pub fn abs_error(&self) -> Option<f64> {
        self.error.map(f64::abs)
    }
}

/// Outcome of a threshold-mode run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRun {
    pub termination: Termination,
    /// Samples folded before stopping
    pub samples: usize,
    pub value: f64,
    pub error: f64,
}

impl ThresholdRun {
    pub fn converged(&self) -> bool {
        self.termination == Termination::ThresholdMet
    }
}

struct Observer<'a> {
    checkpoints: Checkpoints,
    callback: Box<dyn FnMut(&Progress) + 'a>,
}

impl Observer<'_> {
    fn notify(&mut self, cursor: &mut usize, estimator: &IncrementalEstimator) {
        let index = estimator.count();
        let indices = self.checkpoints.indices();
        while *cursor < indices.len() && indices[*cursor] < index {
            *cursor += 1;
        }
        if *cursor < indices.len() && indices[*cursor] == index {
            let progress = Progress {
                sample_index: index,
                estimate: estimator.value(),
                error: estimator.error(),
                std_dev: estimator.std_dev(),
            };
            trace!("checkpoint {:?}", progress);
            (self.callback)(&progress);
            *cursor += 1;
        }
    }
}

/// Runs one integrand under one sampling distribution.
pub struct ConvergenceDriver<'a> {
    integrand: &'a dyn Integrand,
    distribution: &'a dyn SamplingDistribution,
    range: IntegrationRange,
    truth: Option<f64>,
    observer: Option<Observer<'a>>,
}

impl<'a> ConvergenceDriver<'a> {
    /// A blind driver: runs report the estimate but no error.
    pub fn new(
        integrand: &'a dyn Integrand,
        distribution: &'a dyn SamplingDistribution,
        range: IntegrationRange,
    ) -> Self {
        Self {
            integrand,
            distribution,
            range,
            truth: None,
            observer: None,
        }
    }

    /// Uses the integrand's antiderivative as the true answer.
    pub fn with_ground_truth(self) -> Self {
        let truth = self.integrand.true_integral(self.range);
        self.with_truth(truth)
    }

    /// Uses `truth` as the true answer.
    pub fn with_truth(mut self, truth: f64) -> Self {
        self.truth = Some(truth);
        self
    }

    /// Calls `callback` whenever a run reaches one of `checkpoints`.
    pub fn with_progress(
        mut self,
        checkpoints: Checkpoints,
        callback: impl FnMut(&Progress) + 'a,
    ) -> Self {
        self.observer = Some(Observer {
            checkpoints,
            callback: Box::new(callback),
        });
        self
    }

    pub fn truth(&self) -> Option<f64> {
        self.truth
    }

    pub fn range(&self) -> IntegrationRange {
        self.range
    }

    fn estimator(&self) -> IncrementalEstimator {
        match self.truth {
            Some(truth) => IncrementalEstimator::with_truth(truth),
            None => IncrementalEstimator::blind(),
        }
    }

    #[inline]
    fn step(&self, source: &mut UniformVariateSource, estimator: &mut IncrementalEstimator) -> f64 {
        let x = self.distribution.generate(source, self.range);
        let fx = self.integrand.evaluate(x);
        let estimate = self.distribution.sample_estimate(fx, x, self.range);
        estimator.fold(estimate)
    }

    fn observe(&mut self, cursor: &mut usize, estimator: &IncrementalEstimator) {
        if let Some(observer) = self.observer.as_mut() {
            observer.notify(cursor, estimator);
        }
    }

    fn report_non_finite(&self, index: usize, value: f64) {
        warn!(
            "estimate of {} under {} became {} at sample {}; the density is zero where the integrand is not",
            self.integrand.name(),
            self.distribution.name(),
            value,
            index
        );
    }

    /// Folds exactly `samples` per-sample estimates.
    pub fn run_fixed(
        &mut self,
        source: &mut UniformVariateSource,
        samples: usize,
    ) -> Result<FixedRun> {
        if samples == 0 {
            return Err(Error::ZeroSampleBudget);
        }
        debug!(
            "integrating {} over [{}, {}] with {} samples of {}",
            self.integrand.name(),
            self.range.min(),
            self.range.max(),
            samples,
            self.distribution.name()
        );

        let mut estimator = self.estimator();
        let mut cursor = 0;
        let mut finite = true;
        for _ in 0..samples {
            let value = self.step(source, &mut estimator);
            if finite && !value.is_finite() {
                finite = false;
                self.report_non_finite(estimator.count(), value);
            }
            self.observe(&mut cursor, &estimator);
        }

        let run = FixedRun {
            termination: Termination::FixedCount,
            value: estimator.value(),
            samples: estimator.count(),
            error: estimator.error(),
            std_dev: estimator.std_dev(),
        };
        debug!("fixed-count run finished: {:?}", run);
        Ok(run)
    }

    /// Samples until `|value - truth| <= target_error`, or until the
    /// iteration cap if one is set.
    ///
    /// Fails with [`Error::GroundTruthRequired`] on a blind driver.
    pub fn run_until(
        &mut self,
        source: &mut UniformVariateSource,
        config: &ThresholdConfig,
    ) -> Result<ThresholdRun> {
        config.validate()?;
        let truth = self.truth.ok_or(Error::GroundTruthRequired)?;
        debug!(
            "integrating {} with {} until error <= {}",
            self.integrand.name(),
            self.distribution.name(),
            config.target_error
        );

        let mut estimator = self.estimator();
        let mut cursor = 0;
        let mut finite = true;
        let termination = loop {
            let value = self.step(source, &mut estimator);
            if finite && !value.is_finite() {
                finite = false;
                self.report_non_finite(estimator.count(), value);
            }
            self.observe(&mut cursor, &estimator);

            if (value - truth).abs() <= config.target_error {
                break Termination::ThresholdMet;
            }
            if config.max_iterations.is_some_and(|cap| estimator.count() >= cap) {
                warn!(
                    "{} under {} did not reach error {} within {} samples",
                    self.integrand.name(),
                    self.distribution.name(),
                    config.target_error,
                    estimator.count()
                );
                break Termination::IterationCapExceeded;
            }
        };

        let run = ThresholdRun {
            termination,
            samples: estimator.count(),
            value: estimator.value(),
            error: estimator.value() - truth,
        };
        debug!("threshold run finished: {:?}", run);
        Ok(run)
    }
}
