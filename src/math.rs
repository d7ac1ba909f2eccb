pub mod monte_carlo;

pub use monte_carlo::monte_carlo_integration::monte_carlo_integration;
pub use monte_carlo::{
    ConvergenceDriver, IncrementalEstimator, Integrand, IntegrationRange, SamplingDistribution,
    TrialStatistics, UniformVariateSource,
};
