//! ITRP model parameters
//!
//! Coefficient sets are plain data: the evaluator takes them as an explicit
//! argument, so alternative regressions can be swapped in without touching
//! the model code.

mod coefficients;

pub use coefficients::{CoefficientSet, Harmonic, ModelVersion, Term};
