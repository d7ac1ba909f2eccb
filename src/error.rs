use thiserror::Error;

/// Errors raised when an integration run is configured incorrectly.
///
/// Numeric anomalies during a run (a zero density at a drawn point, an
/// integrand that overflows) are not errors: they surface as non-finite
/// values in the run outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("degenerate integration range: min {min} must be less than max {max}")]
    DegenerateRange { min: f64, max: f64 },

    #[error("integration range bounds must be finite, got [{min}, {max}]")]
    NonFiniteRange { min: f64, max: f64 },

    #[error("sample budget must be at least one")]
    ZeroSampleBudget,

    #[error("target error must be positive and finite, got {0}")]
    InvalidTargetError(f64),

    #[error("trial count must be at least one")]
    ZeroTrials,

    #[error("iteration cap must be at least one when set")]
    ZeroIterationCap,

    #[error("threshold mode needs the true answer; the driver was built without ground truth")]
    GroundTruthRequired,

    #[error("unknown integrand: {0}")]
    UnknownIntegrand(String),

    #[error("unknown sampling distribution: {0}")]
    UnknownDistribution(String),
}

/// Result type for integration operations.
pub type Result<T> = std::result::Result<T, Error>;
