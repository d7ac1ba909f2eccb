use num_traits::Float;
use std::fmt::Debug;

/// An exact running mean, updated in O(1) per value with no stored history.
///
/// After `n` folds, `value` is the arithmetic mean of the folded values up to
/// floating-point rounding. Non-finite inputs propagate into the mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningEstimate<T>
where
    T: Float + Debug,
{
    value: T,
    count: usize,
}

impl<T> Default for RunningEstimate<T>
where
    T: Float + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RunningEstimate<T>
where
    T: Float + Debug,
{
    pub fn new() -> Self {
        Self {
            value: T::zero(),
            count: 0,
        }
    }

    /// Folds one value into the mean: `value += (sample - value) / n`.
    #[inline]
    pub fn fold(&mut self, sample: T) -> T {
        self.count += 1;
        let n = T::from(self.count).unwrap_or_else(T::max_value);
        self.value = self.value + (sample - self.value) / n;
        self.value
    }

    /// Combines two means as if every value of `other` had been folded into
    /// `self`. Associative and commutative up to rounding.
    pub fn merge(&self, other: &Self) -> Self {
        if other.count == 0 {
            return *self;
        }
        if self.count == 0 {
            return *other;
        }
        let count = self.count + other.count;
        let weight = T::from(other.count).unwrap_or_else(T::max_value)
            / T::from(count).unwrap_or_else(T::max_value);
        Self {
            value: self.value + (other.value - self.value) * weight,
            count,
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Running mean of the squared deviation of an estimate from a known answer.
///
/// Only meaningful when the true answer is known, which is the case in tests
/// and benchmarks but never in blind integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorTrace {
    truth: f64,
    squared: RunningEstimate<f64>,
}

impl ErrorTrace {
    pub fn new(truth: f64) -> Self {
        Self {
            truth,
            squared: RunningEstimate::new(),
        }
    }

    /// Records the current estimate's squared deviation from the truth.
    #[inline]
    pub fn fold(&mut self, current: f64) {
        let difference = current - self.truth;
        self.squared.fold(difference * difference);
    }

    pub fn truth(&self) -> f64 {
        self.truth
    }

    pub fn mean_squared_error(&self) -> f64 {
        self.squared.value()
    }

    pub fn std_dev(&self) -> f64 {
        self.squared.value().sqrt()
    }
}

/// The integral estimate of one run, with an optional error trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncrementalEstimator {
    estimate: RunningEstimate<f64>,
    trace: Option<ErrorTrace>,
}

impl IncrementalEstimator {
    /// An estimator with no ground truth.
    pub fn blind() -> Self {
        Self {
            estimate: RunningEstimate::new(),
            trace: None,
        }
    }

    /// An estimator that also tracks squared error against `truth`.
    pub fn with_truth(truth: f64) -> Self {
        Self {
            estimate: RunningEstimate::new(),
            trace: Some(ErrorTrace::new(truth)),
        }
    }

    /// Folds one per-sample estimate and returns the updated integral value.
    #[inline]
    pub fn fold(&mut self, sample_estimate: f64) -> f64 {
        let value = self.estimate.fold(sample_estimate);
        if let Some(trace) = self.trace.as_mut() {
            trace.fold(value);
        }
        value
    }

    pub fn value(&self) -> f64 {
        self.estimate.value()
    }

    pub fn count(&self) -> usize {
        self.estimate.count()
    }

    pub fn truth(&self) -> Option<f64> {
        self.trace.map(|trace| trace.truth())
    }

    /// Signed error `value - truth`, when the truth is known.
    pub fn error(&self) -> Option<f64> {
        self.truth().map(|truth| self.value() - truth)
    }

    /// Square root of the running mean squared error, when the truth is known.
    pub fn std_dev(&self) -> Option<f64> {
        self.trace.map(|trace| trace.std_dev())
    }

    pub fn trace(&self) -> Option<&ErrorTrace> {
        self.trace.as_ref()
    }
}
