use std::f64::consts::PI;

use crate::math::monte_carlo::{
    fixed_count_trials, threshold_trials, ConvergenceDriver, IntegrationRange, InverseCdf,
    RunningEstimate, SamplingDistribution, SinShape, SinSquared, SinSquaredShape,
    ThresholdConfig, TrialConfig, Uniform, UniformVariateSource,
};

/// Uniform draws paired with a density that is zero over the upper half of
/// the range, where sin² is not.
struct HalfSupport;

impl SamplingDistribution for HalfSupport {
    fn name(&self) -> &str {
        "PDF y=2/pi on [0, pi/2)"
    }

    fn generate(&self, source: &mut UniformVariateSource, range: IntegrationRange) -> f64 {
        source.next_in(range.min(), range.max())
    }

    fn density(&self, x: f64, range: IntegrationRange) -> f64 {
        let mid = range.min() + range.width() / 2.0;
        if x < mid {
            2.0 / range.width()
        } else {
            0.0
        }
    }
}

#[test]
fn test_uniform_sampling_matches_ground_truth() {
    let range = IntegrationRange::zero_to_pi();
    for seed in [11, 22, 33] {
        let mut source = UniformVariateSource::with_seed(seed);
        let mut driver = ConvergenceDriver::new(&SinSquared, &Uniform, range);
        let run = driver.run_fixed(&mut source, 1_000_000).unwrap();
        assert!(
            (run.value - 1.570796).abs() < 0.01,
            "seed {} gave {}",
            seed,
            run.value
        );
    }
}

#[test]
fn test_incremental_mean_over_deterministic_sequence() {
    let sequence: Vec<f64> = (0..10_000).map(|i| (i as f64 * 0.37).cos() * 10.0).collect();
    let mut estimate = RunningEstimate::new();
    for &e in &sequence {
        estimate.fold(e);
    }
    let mean = sequence.iter().sum::<f64>() / sequence.len() as f64;
    assert!((estimate.value() - mean).abs() < 1e-10);
}

#[test]
fn test_importance_sampling_convergence_ordering() {
    let range = IntegrationRange::zero_to_pi();
    let config = TrialConfig { trials: 200 };
    let mut source = UniformVariateSource::with_seed(2018);

    let uniform =
        fixed_count_trials(&SinSquared, &Uniform, range, 1000, &config, &mut source).unwrap();
    let sin = fixed_count_trials(
        &SinSquared,
        &InverseCdf::new(SinShape),
        range,
        1000,
        &config,
        &mut source,
    )
    .unwrap();
    let sin_squared = fixed_count_trials(
        &SinSquared,
        &InverseCdf::new(SinSquaredShape),
        range,
        1000,
        &config,
        &mut source,
    )
    .unwrap();

    assert!(sin.average() < uniform.average());
    assert!(sin_squared.average() < sin.average());
    assert!(sin_squared.max() < 1e-9);
}

#[test]
fn test_density_mismatch_is_not_suppressed() {
    let mut source = UniformVariateSource::with_seed(4);
    let mut driver =
        ConvergenceDriver::new(&SinSquared, &HalfSupport, IntegrationRange::zero_to_pi())
            .with_ground_truth();
    let run = driver.run_fixed(&mut source, 100).unwrap();
    assert!(!run.value.is_finite());
    assert!(!run.abs_error().unwrap().is_finite());
}

#[test]
fn test_threshold_mode_terminates_within_target() {
    let threshold = ThresholdConfig {
        target_error: 0.0001,
        max_iterations: Some(1_000_000),
    };
    let mut source = UniformVariateSource::with_seed(31);
    let distribution = InverseCdf::new(SinShape);
    let mut driver =
        ConvergenceDriver::new(&SinSquared, &distribution, IntegrationRange::zero_to_pi())
            .with_ground_truth();

    let mut converged = 0;
    for _ in 0..10 {
        let run = driver.run_until(&mut source, &threshold).unwrap();
        if run.converged() {
            converged += 1;
            assert!(run.samples >= 1);
            assert!((run.value - PI / 2.0).abs() <= 0.0001);
        } else {
            assert_eq!(run.samples, 1_000_000);
        }
    }
    assert!(converged > 0);
}

#[test]
fn test_threshold_trials_report_only_valid_runs() {
    let threshold = ThresholdConfig {
        target_error: 0.001,
        max_iterations: Some(2_000_000),
    };
    let mut source = UniformVariateSource::with_seed(8);
    let report = threshold_trials(
        &SinSquared,
        &InverseCdf::new(SinShape),
        IntegrationRange::zero_to_pi(),
        &threshold,
        &TrialConfig { trials: 20 },
        &mut source,
    )
    .unwrap();
    assert_eq!(report.converged() + report.capped, 20);
    assert!(report.samples.min() >= 1.0);
    assert!(report.samples.min() <= report.samples.average());
    assert!(report.samples.average() <= report.samples.max());
}

#[test]
fn test_error_scales_with_inverse_square_root() {
    let range = IntegrationRange::zero_to_pi();
    let config = TrialConfig { trials: 400 };
    let mut source = UniformVariateSource::with_seed(99);

    let coarse = fixed_count_trials(&SinSquared, &Uniform, range, 250, &config, &mut source)
        .unwrap()
        .average();
    let fine = fixed_count_trials(&SinSquared, &Uniform, range, 1000, &config, &mut source)
        .unwrap()
        .average();

    let ratio = coarse / fine;
    assert!(ratio > 1.5 && ratio < 2.7, "ratio {}", ratio);
}
