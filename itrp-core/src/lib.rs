//! Coordinate adapters for the ITRP Arctic sea-ice thickness climatology
//!
//! - [`projection`]: geographic ↔ NSIDC polar stereographic planar coordinates
//! - [`time`]: calendar dates → fractional years since 2000
//! - [`grid`]: a geographic grid projected once onto the planar surface

pub mod errors;
pub mod grid;
pub mod projection;
#[cfg(feature = "python")]
pub mod python;
pub mod time;

/// Floating point type used for all coordinates and model values
pub type FloatValue = f64;
