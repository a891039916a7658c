//! ITRP Arctic sea-ice thickness climatology
//!
//! This crate evaluates the empirical thickness climatology as a polynomial in
//! planar position and a seasonal/trend function of time.
//!
//! # Module Organisation
//!
//! - `parameters`: versioned coefficient sets
//! - `thickness`: the coefficient-driven evaluator
//! - `climatology`: a projected grid evaluated for arbitrary dates
//!
//! Coordinate transforms live in `itrp-core`.

pub mod climatology;
pub mod parameters;
#[cfg(feature = "python")]
pub mod python;
pub mod thickness;

pub use climatology::Climatology;
pub use parameters::{CoefficientSet, Harmonic, ModelVersion, Term};
pub use thickness::{evaluate, evaluate_arrays, evaluate_grid, ThicknessModel};
