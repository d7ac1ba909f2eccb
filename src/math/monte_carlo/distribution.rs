//! Sampling distributions for Monte Carlo integration.
//!
//! Two strategies are provided:
//! - [`Uniform`] draws directly from the integration range.
//! - [`InverseCdf`] draws `u` from `[0, 1)` and pushes it through a closed
//!   form inverse cumulative distribution function.
//!
//! The bundled importance densities implement [`CdfShape`] on the canonical
//! domain `[0, π]`. `InverseCdf` stretches that shape affinely over whatever
//! range is requested, rescaling the density so it still has unit mass. On
//! `[0, π]` the stretch is the identity.

use std::f64::consts::PI;

use super::variate::UniformVariateSource;
use super::IntegrationRange;

/// A density over the integration range together with a way to draw from it.
///
/// Implementations promise that every value returned by `generate` has
/// strictly positive `density`, and that `density` integrates to one over the
/// range. Neither is checked at runtime: a violation shows up as a biased or
/// non-finite estimate.
pub trait SamplingDistribution {
    /// Name used in reports.
    fn name(&self) -> &str;

    /// Draws a variate in `[range.min(), range.max()]`.
    fn generate(&self, source: &mut UniformVariateSource, range: IntegrationRange) -> f64;

    /// Probability density at `x`.
    fn density(&self, x: f64, range: IntegrationRange) -> f64;

    /// The unbiased single-sample estimate `F(x) / p(x)` of the integral.
    fn sample_estimate(&self, fx: f64, x: f64, range: IntegrationRange) -> f64 {
        fx / self.density(x, range)
    }
}

/// Uniform sampling over the range, density `1 / (max - min)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl SamplingDistribution for Uniform {
    fn name(&self) -> &str {
        "uniform"
    }

    fn generate(&self, source: &mut UniformVariateSource, range: IntegrationRange) -> f64 {
        source.next_in(range.min(), range.max())
    }

    fn density(&self, _x: f64, range: IntegrationRange) -> f64 {
        1.0 / range.width()
    }

    // Same value as F(x) / (1 / width), without the division.
    fn sample_estimate(&self, fx: f64, _x: f64, range: IntegrationRange) -> f64 {
        fx * range.width()
    }
}

/// A normalized density on `[0, π]` with its inverse CDF.
///
/// Implementors must guarantee that `inverse_cdf` is monotonic, maps `0` to
/// `0` and `1` to `π`, and that `pdf` integrates to one over `[0, π]`.
pub trait CdfShape {
    fn name(&self) -> &str;

    /// Density at `t ∈ [0, π]`.
    fn pdf(&self, t: f64) -> f64;

    /// Maps `u ∈ [0, 1)` to `t ∈ [0, π]`.
    fn inverse_cdf(&self, u: f64) -> f64;
}

/// Importance sampling through a [`CdfShape`] stretched over the range.
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseCdf<S: CdfShape> {
    shape: S,
}

impl<S: CdfShape> InverseCdf<S> {
    pub fn new(shape: S) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }
}

impl<S: CdfShape> SamplingDistribution for InverseCdf<S> {
    fn name(&self) -> &str {
        self.shape.name()
    }

    fn generate(&self, source: &mut UniformVariateSource, range: IntegrationRange) -> f64 {
        let t = self.shape.inverse_cdf(source.next());
        range.min() + t * (range.width() / PI)
    }

    fn density(&self, x: f64, range: IntegrationRange) -> f64 {
        let t = (x - range.min()) * (PI / range.width());
        self.shape.pdf(t) * (PI / range.width())
    }
}

/// `p(t) = sin(t) / 2`, `CDF⁻¹(u) = 2 asin(√u)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinShape;

impl CdfShape for SinShape {
    fn name(&self) -> &str {
        "PDF y=sin(x)/2"
    }

    fn pdf(&self, t: f64) -> f64 {
        t.sin() / 2.0
    }

    fn inverse_cdf(&self, u: f64) -> f64 {
        2.0 * u.sqrt().asin()
    }
}

/// `p(t) = cos(t/2) / 2`, `CDF⁻¹(u) = 2 asin(u)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosHalfShape;

impl CdfShape for CosHalfShape {
    fn name(&self) -> &str {
        "PDF y=cos(x/2)/2"
    }

    fn pdf(&self, t: f64) -> f64 {
        (t / 2.0).cos() / 2.0
    }

    fn inverse_cdf(&self, u: f64) -> f64 {
        2.0 * u.asin()
    }
}

/// `p(t) = (t/π)^n · (n+1)/π`, `CDF⁻¹(u) = π · u^(1/(n+1))`.
#[derive(Debug, Clone)]
pub struct PowerShape {
    exponent: i32,
    name: String,
}

impl PowerShape {
    /// Creates the shape for exponent `n`. `n = 0` is the uniform density.
    pub fn new(exponent: u16) -> Self {
        let exponent = i32::from(exponent);
        Self {
            exponent,
            name: format!("PDF y=(x/pi)^{} * {}.0 / pi", exponent, exponent + 1),
        }
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }
}

impl CdfShape for PowerShape {
    fn name(&self) -> &str {
        &self.name
    }

    fn pdf(&self, t: f64) -> f64 {
        (t / PI).powi(self.exponent) * f64::from(self.exponent + 1) / PI
    }

    fn inverse_cdf(&self, u: f64) -> f64 {
        PI * u.powf(1.0 / f64::from(self.exponent + 1))
    }
}

/// `p(t) = 2 sin²(t) / π`, the normalized shape of `sin²` itself.
///
/// Its CDF, `(2t - sin 2t) / 2π`, has no closed-form inverse, so
/// `inverse_cdf` solves it with Newton steps kept inside a shrinking
/// bisection bracket.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinSquaredShape;

impl SinSquaredShape {
    const MAX_STEPS: usize = 100;
    const TOLERANCE: f64 = 1e-15;

    pub fn cdf(t: f64) -> f64 {
        (2.0 * t - (2.0 * t).sin()) / (2.0 * PI)
    }
}

impl CdfShape for SinSquaredShape {
    fn name(&self) -> &str {
        "PDF y=sin(x)^2 * 2.0 / pi"
    }

    fn pdf(&self, t: f64) -> f64 {
        let s = t.sin();
        2.0 * s * s / PI
    }

    fn inverse_cdf(&self, u: f64) -> f64 {
        if u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 {
            return PI;
        }

        let (mut lo, mut hi) = (0.0, PI);
        let mut t = PI * u;
        for _ in 0..Self::MAX_STEPS {
            let residual = Self::cdf(t) - u;
            if residual.abs() <= Self::TOLERANCE {
                break;
            }
            if residual < 0.0 {
                lo = t;
            } else {
                hi = t;
            }

            let slope = self.pdf(t);
            let newton = t - residual / slope;
            let next = if slope > 0.0 && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };

            if (next - t).abs() <= f64::EPSILON * PI {
                t = next;
                break;
            }
            t = next;
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shapes() -> Vec<Box<dyn CdfShape>> {
        vec![
            Box::new(SinShape),
            Box::new(CosHalfShape),
            Box::new(PowerShape::new(2)),
            Box::new(PowerShape::new(5)),
            Box::new(SinSquaredShape),
        ]
    }

    fn midpoint_integral(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
        let h = (b - a) / n as f64;
        (0..n).map(|i| f(a + (i as f64 + 0.5) * h)).sum::<f64>() * h
    }

    #[test]
    fn test_shapes_have_unit_mass() {
        for shape in shapes() {
            let mass = midpoint_integral(|t| shape.pdf(t), 0.0, PI, 100_000);
            assert_relative_eq!(mass, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_inverse_cdf_endpoints() {
        for shape in shapes() {
            assert_relative_eq!(shape.inverse_cdf(0.0), 0.0, epsilon = 1e-12);
            assert_relative_eq!(shape.inverse_cdf(1.0), PI, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_inverse_cdf_is_monotonic() {
        for shape in shapes() {
            let mut previous = shape.inverse_cdf(0.0);
            for i in 1..=1000 {
                let t = shape.inverse_cdf(i as f64 / 1000.0);
                assert!(t >= previous, "{} not monotonic at u={}", shape.name(), i);
                previous = t;
            }
        }
    }

    #[test]
    fn test_inverse_cdf_inverts_integrated_pdf() {
        for shape in shapes() {
            for &u in &[0.1, 0.25, 0.5, 0.75, 0.9] {
                let t = shape.inverse_cdf(u);
                let cdf = midpoint_integral(|s| shape.pdf(s), 0.0, t, 20_000);
                assert_relative_eq!(cdf, u, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_sin_squared_inverse_round_trips_cdf() {
        for i in 1..100 {
            let u = i as f64 / 100.0;
            let t = SinSquaredShape.inverse_cdf(u);
            assert_relative_eq!(SinSquaredShape::cdf(t), u, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_power_shape_name() {
        assert_eq!(PowerShape::new(5).name(), "PDF y=(x/pi)^5 * 6.0 / pi");
        assert_eq!(PowerShape::new(2).exponent(), 2);
    }

    #[test]
    fn test_uniform_density_and_estimate() {
        let range = IntegrationRange::new(1.0, 5.0).unwrap();
        assert_eq!(Uniform.density(3.0, range), 0.25);
        assert_eq!(Uniform.sample_estimate(2.0, 3.0, range), 8.0);
    }

    #[test]
    fn test_inverse_cdf_on_canonical_range_is_identity_stretch() {
        let range = IntegrationRange::zero_to_pi();
        let distribution = InverseCdf::new(SinShape);
        let mut a = UniformVariateSource::with_seed(3);
        let mut b = UniformVariateSource::with_seed(3);
        for _ in 0..100 {
            let x = distribution.generate(&mut a, range);
            assert_eq!(x, SinShape.inverse_cdf(b.next()));
            assert_relative_eq!(distribution.density(x, range), x.sin() / 2.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_stretched_density_has_unit_mass() {
        let range = IntegrationRange::new(-1.0, 2.0).unwrap();
        let distribution = InverseCdf::new(PowerShape::new(2));
        let mass = midpoint_integral(|x| distribution.density(x, range), -1.0, 2.0, 100_000);
        assert_relative_eq!(mass, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        let range = IntegrationRange::new(2.0, 3.5).unwrap();
        let mut source = UniformVariateSource::with_seed(11);
        let distributions: Vec<Box<dyn SamplingDistribution>> = vec![
            Box::new(Uniform),
            Box::new(InverseCdf::new(SinShape)),
            Box::new(InverseCdf::new(SinSquaredShape)),
        ];
        for distribution in &distributions {
            for _ in 0..1000 {
                let x = distribution.generate(&mut source, range);
                assert!(x >= range.min() && x <= range.max());
            }
        }
    }
}
