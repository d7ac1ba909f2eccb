use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use importance::math::monte_carlo::{
    fixed_count_trials_parallel, ConvergenceDriver, IntegrationRange, InverseCdf,
    SamplingDistribution, SinShape, SinSquared, SinSquaredShape, TrialConfig, Uniform,
    UniformVariateSource,
};

fn bench_fixed_run(c: &mut Criterion) {
    let range = IntegrationRange::zero_to_pi();
    let distributions: Vec<Box<dyn SamplingDistribution>> = vec![
        Box::new(Uniform),
        Box::new(InverseCdf::new(SinShape)),
        Box::new(InverseCdf::new(SinSquaredShape)),
    ];

    let mut group = c.benchmark_group("fixed_run_10k");
    for distribution in &distributions {
        group.bench_with_input(
            BenchmarkId::from_parameter(distribution.name()),
            distribution,
            |b, distribution| {
                let mut source = UniformVariateSource::with_seed(42);
                let mut driver =
                    ConvergenceDriver::new(&SinSquared, &**distribution, range)
                        .with_ground_truth();
                b.iter(|| driver.run_fixed(&mut source, black_box(10_000)))
            },
        );
    }
    group.finish();
}

fn bench_parallel_trials(c: &mut Criterion) {
    let range = IntegrationRange::zero_to_pi();
    let config = TrialConfig { trials: 256 };
    c.bench_function("parallel_trials_uniform_256x1k", |b| {
        b.iter(|| {
            fixed_count_trials_parallel(&SinSquared, &Uniform, range, black_box(1000), &config, 7)
        })
    });
}

criterion_group!(benches, bench_fixed_run, bench_parallel_trials);
criterion_main!(benches);
