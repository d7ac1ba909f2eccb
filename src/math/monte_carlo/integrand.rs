use super::IntegrationRange;

/// A function to integrate, paired with its closed-form antiderivative.
///
/// The antiderivative is only used to obtain the true answer for error
/// reporting; the estimator itself never looks at it.
pub trait Integrand {
    /// Name used in reports.
    fn name(&self) -> &str;

    /// Evaluates `F(x)`.
    fn evaluate(&self, x: f64) -> f64;

    /// Evaluates the antiderivative `A(x)`.
    fn antiderivative(&self, x: f64) -> f64;

    /// The exact integral over `range`, `A(max) - A(min)`.
    fn true_integral(&self, range: IntegrationRange) -> f64 {
        self.antiderivative(range.max()) - self.antiderivative(range.min())
    }
}

/// `y = sin(x)^2`, antiderivative `x/2 - sin(2x)/4`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinSquared;

impl Integrand for SinSquared {
    fn name(&self) -> &str {
        "y=sin(x)^2"
    }

    fn evaluate(&self, x: f64) -> f64 {
        let s = x.sin();
        s * s
    }

    fn antiderivative(&self, x: f64) -> f64 {
        x / 2.0 - (2.0 * x).sin() / 4.0
    }
}

/// `y = sin(x)`, antiderivative `-cos(x)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sine;

impl Integrand for Sine {
    fn name(&self) -> &str {
        "y=sin(x)"
    }

    fn evaluate(&self, x: f64) -> f64 {
        x.sin()
    }

    fn antiderivative(&self, x: f64) -> f64 {
        -x.cos()
    }
}

/// An integrand assembled at runtime from a pair of closures.
pub struct FnIntegrand<F, A>
where
    F: Fn(f64) -> f64,
    A: Fn(f64) -> f64,
{
    name: String,
    f: F,
    antiderivative: A,
}

impl<F, A> FnIntegrand<F, A>
where
    F: Fn(f64) -> f64,
    A: Fn(f64) -> f64,
{
    pub fn new(name: impl Into<String>, f: F, antiderivative: A) -> Self {
        Self {
            name: name.into(),
            f,
            antiderivative,
        }
    }
}

impl<F, A> Integrand for FnIntegrand<F, A>
where
    F: Fn(f64) -> f64,
    A: Fn(f64) -> f64,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, x: f64) -> f64 {
        (self.f)(x)
    }

    fn antiderivative(&self, x: f64) -> f64 {
        (self.antiderivative)(x)
    }
}
