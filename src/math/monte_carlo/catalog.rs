//! Name-based lookup of the bundled integrands and densities, for building
//! experiment matrices at runtime.

use super::distribution::{
    CosHalfShape, InverseCdf, PowerShape, SamplingDistribution, SinShape, SinSquaredShape, Uniform,
};
use super::integrand::{Integrand, SinSquared, Sine};
use crate::error::{Error, Result};

pub const INTEGRAND_NAMES: &[&str] = &["sin2", "sin"];

pub const DISTRIBUTION_NAMES: &[&str] = &["uniform", "sin", "cos-half", "pow2", "pow5", "sin2"];

/// Looks up an integrand by short name (see [`INTEGRAND_NAMES`]).
pub fn integrand_by_name(name: &str) -> Result<Box<dyn Integrand + Send + Sync>> {
    match name {
        "sin2" => Ok(Box::new(SinSquared)),
        "sin" => Ok(Box::new(Sine)),
        other => Err(Error::UnknownIntegrand(other.to_string())),
    }
}

/// Looks up a sampling distribution by short name (see [`DISTRIBUTION_NAMES`]).
///
/// `powN` accepts any non-negative integer exponent `N`.
pub fn distribution_by_name(name: &str) -> Result<Box<dyn SamplingDistribution + Send + Sync>> {
    match name {
        "uniform" => Ok(Box::new(Uniform)),
        "sin" => Ok(Box::new(InverseCdf::new(SinShape))),
        "cos-half" => Ok(Box::new(InverseCdf::new(CosHalfShape))),
        "sin2" => Ok(Box::new(InverseCdf::new(SinSquaredShape))),
        other => other
            .strip_prefix("pow")
            .and_then(|exponent| exponent.parse::<u16>().ok())
            .map(|exponent| {
                Box::new(InverseCdf::new(PowerShape::new(exponent)))
                    as Box<dyn SamplingDistribution + Send + Sync>
            })
            .ok_or_else(|| Error::UnknownDistribution(other.to_string())),
    }
}
