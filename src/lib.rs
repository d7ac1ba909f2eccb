//! Monte Carlo integration of one-dimensional functions, with importance
//! sampling and tools for measuring how the sampling density affects
//! convergence.

pub mod error;
pub mod math;

pub use error::{Error, Result};
