//! ITRP: an empirical Arctic sea-ice thickness climatology
//!
//! The climatology is a polynomial in planar position with seasonal and
//! trend terms in time. This crate bundles the model with the coordinate
//! adapters needed to drive it from longitudes, latitudes and dates.
//!
//! ```rust
//! use itrp::{Climatology, TimeCoordinate};
//! use ndarray::array;
//!
//! let lon = array![-45.0, 100.0];
//! let lat = array![88.0, 78.0];
//! let climatology = Climatology::new(lon.view(), lat.view(), None).unwrap();
//!
//! let march = TimeCoordinate::from_ymd(2010, 3, 15).unwrap();
//! let thickness = climatology.for_time_coordinate(&march);
//! assert_eq!(thickness.len(), 2);
//! ```

pub use itrp_core::errors::{ItrpError, ItrpResult};
pub use itrp_core::grid::PlanarGrid;
pub use itrp_core::projection::{GridUnit, PolarStereographic, ProjectionParameters};
pub use itrp_core::time::{DateSpec, TimeCoordinate};
pub use itrp_core::FloatValue;
pub use itrp_model::{
    evaluate, evaluate_arrays, evaluate_grid, Climatology, CoefficientSet, Harmonic,
    ModelVersion, Term, ThicknessModel,
};

#[cfg(feature = "python")]
mod python;
