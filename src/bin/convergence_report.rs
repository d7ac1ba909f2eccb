use importance::math::monte_carlo::{
    fixed_count_trials_parallel, monte_carlo_integration, threshold_trials_parallel, Checkpoints,
    ConvergenceDriver, CosHalfShape, IntegrationRange, Integrand, InverseCdf, PowerShape,
    Progress, SamplingDistribution, SinShape, SinSquared, SinSquaredShape, Sine, ThresholdConfig,
    TrialConfig, Uniform, UniformVariateSource,
};
use importance::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const NUM_SAMPLES: usize = 4 * 1024 * 1024;
const TRIAL_SAMPLES: usize = 10_000;
const TRIALS: usize = 1000;
const SEED: u64 = 2018;

fn print_progress(p: &Progress) {
    let error = p.error.unwrap_or(f64::NAN);
    println!(
        "[{:>10}] {:.6}  ({}{:.6}) (estimate stddev: {:.6})",
        p.sample_index,
        p.estimate,
        if error >= 0.0 { "+" } else { "" },
        error,
        p.std_dev.unwrap_or(f64::NAN)
    );
}

fn report_run(
    integrand: &dyn Integrand,
    distribution: &dyn SamplingDistribution,
    range: IntegrationRange,
    source: &mut UniformVariateSource,
) -> Result<()> {
    let truth = integrand.true_integral(range);
    println!(
        "Integrating {} from {:.6} to {:.6}\nThe actual answer is {:.6}",
        integrand.name(),
        range.min(),
        range.max(),
        truth
    );
    println!(
        "Doing Monte Carlo integration with {} samples, using {}.\nEstimates:",
        NUM_SAMPLES,
        distribution.name()
    );

    ConvergenceDriver::new(integrand, distribution, range)
        .with_ground_truth()
        .with_progress(Checkpoints::fractions_of(NUM_SAMPLES), print_progress)
        .run_fixed(source, NUM_SAMPLES)?;
    println!();
    Ok(())
}

fn main() -> Result<()> {
    let range = IntegrationRange::zero_to_pi();
    let mut source = UniformVariateSource::with_seed(SEED);

    let mut rng = ChaCha20Rng::seed_from_u64(SEED);
    let simple = monte_carlo_integration(|x| x.sin() * x.sin(), 0.0, range.max(), 10_000, &mut rng)?;
    println!("Simple Monte Carlo says: {:.6}\n", simple);

    let distributions: Vec<Box<dyn SamplingDistribution + Send + Sync>> = vec![
        Box::new(Uniform),
        Box::new(InverseCdf::new(SinShape)),
        Box::new(InverseCdf::new(CosHalfShape)),
        Box::new(InverseCdf::new(PowerShape::new(5))),
        Box::new(InverseCdf::new(PowerShape::new(2))),
        Box::new(InverseCdf::new(SinSquaredShape)),
    ];
    for distribution in &distributions {
        report_run(&SinSquared, &**distribution, range, &mut source)?;
    }
    report_run(&Sine, &Uniform, range, &mut source)?;
    report_run(&Sine, &InverseCdf::new(SinShape), range, &mut source)?;

    println!(
        "Error after {} samples, over {} trials:",
        TRIAL_SAMPLES, TRIALS
    );
    let config = TrialConfig { trials: TRIALS };
    for distribution in &distributions {
        let stats = fixed_count_trials_parallel(
            &SinSquared,
            &**distribution,
            range,
            TRIAL_SAMPLES,
            &config,
            SEED,
        )?;
        println!(
            "  {:<28} min {:.8}  max {:.8}  avg {:.8}",
            distribution.name(),
            stats.min(),
            stats.max(),
            stats.average()
        );
    }
    println!();

    let threshold = ThresholdConfig {
        target_error: 0.0001,
        max_iterations: Some(10_000_000),
    };
    println!(
        "Samples to reach error {} (cap {:?}), over 100 trials:",
        threshold.target_error, threshold.max_iterations
    );
    for distribution in distributions.iter().take(2) {
        let report = threshold_trials_parallel(
            &SinSquared,
            &**distribution,
            range,
            &threshold,
            &TrialConfig { trials: 100 },
            SEED,
        )?;
        println!(
            "  {:<28} min {:.0}  max {:.0}  avg {:.1}  capped {}",
            distribution.name(),
            report.samples.min(),
            report.samples.max(),
            report.samples.average(),
            report.capped
        );
    }
    println!("\nThreshold mode knows the true answer; blind integration cannot stop this way.");

    Ok(())
}
