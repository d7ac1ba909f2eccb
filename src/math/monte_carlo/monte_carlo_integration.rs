use rand::Rng;

use crate::error::{Error, Result};

/// Estimates the integral of `f` over `[a, b]` as the average height of
/// `samples` uniform draws times the width of the interval.
///
/// This is the plain estimator with no importance sampling, no running
/// statistics and no ground truth. It works with any `rand` generator.
pub fn monte_carlo_integration<F, R>(f: F, a: f64, b: f64, samples: usize, rng: &mut R) -> Result<f64>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::NonFiniteRange { min: a, max: b });
    }
    if a >= b {
        return Err(Error::DegenerateRange { min: a, max: b });
    }
    if samples == 0 {
        return Err(Error::ZeroSampleBudget);
    }

    let mut sum = 0.0;
    for _ in 0..samples {
        let x = rng.gen_range(a..b);
        sum += f(x);
    }
    let avg = sum / samples as f64;
    Ok((b - a) * avg)
}
