//! Climatology over a fixed geographic grid
//!
//! A [`Climatology`] projects its longitude/latitude grid once at
//! construction and then evaluates the thickness model for any number of
//! dates. Masked cells are reported as NaN in every result.
//!
//! # Examples
//!
//! ```rust
//! use itrp_model::climatology::Climatology;
//! use ndarray::array;
//!
//! let lon = array![[-45.0, 0.0], [90.0, 180.0]];
//! let lat = array![[85.0, 80.0], [75.0, 70.0]];
//! let land = array![[false, false], [false, true]];
//!
//! let climatology = Climatology::new(lon.view(), lat.view(), Some(land.view())).unwrap();
//! let thickness = climatology.for_time((2015, 3, 15)).unwrap();
//!
//! assert_eq!(thickness.shape(), &[2, 2]);
//! assert!(thickness[[1, 1]].is_nan());
//! assert!(thickness[[0, 0]].is_finite());
//! ```

use crate::parameters::CoefficientSet;
use crate::thickness::ThicknessModel;
use itrp_core::errors::{ensure_same_shape, ItrpResult};
use itrp_core::grid::PlanarGrid;
use itrp_core::projection::PolarStereographic;
use itrp_core::time::{DateSpec, TimeCoordinate};
use itrp_core::FloatValue;
use ndarray::{Array, ArrayView, Dimension, Zip};

/// Thickness climatology bound to a projected grid
#[derive(Debug, Clone)]
pub struct Climatology<D: Dimension> {
    grid: PlanarGrid<D>,
    mask: Option<Array<bool, D>>,
    coefficients: CoefficientSet,
    model: ThicknessModel,
}

impl<D: Dimension> Climatology<D> {
    /// Build a climatology using the revised coefficient set
    ///
    /// # Arguments
    ///
    /// * `longitude` - Longitudes in degrees
    /// * `latitude` - Latitudes in degrees, same shape as `longitude`
    /// * `mask` - Cells set to `true` are excluded from every result
    pub fn new(
        longitude: ArrayView<FloatValue, D>,
        latitude: ArrayView<FloatValue, D>,
        mask: Option<ArrayView<bool, D>>,
    ) -> ItrpResult<Self> {
        Self::with_coefficients(
            longitude,
            latitude,
            mask,
            CoefficientSet::revised().clone(),
        )
    }

    /// Build a climatology with an explicit coefficient set
    pub fn with_coefficients(
        longitude: ArrayView<FloatValue, D>,
        latitude: ArrayView<FloatValue, D>,
        mask: Option<ArrayView<bool, D>>,
        coefficients: CoefficientSet,
    ) -> ItrpResult<Self> {
        if let Some(mask) = &mask {
            ensure_same_shape(longitude.shape(), mask.shape())?;
        }

        let projection = PolarStereographic::nsidc_north();
        let grid = PlanarGrid::project(&projection, longitude, latitude)?;
        let mask = mask.map(|m| m.to_owned());

        log::debug!(
            "Climatology '{}' on grid {:?}: {} cells, {} masked",
            coefficients.name(),
            grid.shape(),
            grid.len(),
            mask.as_ref()
                .map_or(0, |m| m.iter().filter(|masked| **masked).count())
        );

        Ok(Self {
            model: ThicknessModel::new(&coefficients),
            grid,
            mask,
            coefficients,
        })
    }

    /// Thickness over the grid for a date
    ///
    /// Accepts anything convertible to a [`DateSpec`]: a `NaiveDateTime`, a
    /// `NaiveDate`, or a `(year, month, day[, hour])` tuple.
    pub fn for_time(&self, date: impl Into<DateSpec>) -> ItrpResult<Array<FloatValue, D>> {
        let time = TimeCoordinate::new(date)?;
        Ok(self.for_time_coordinate(&time))
    }

    pub fn for_time_coordinate(&self, time: &TimeCoordinate) -> Array<FloatValue, D> {
        log::trace!("Evaluating '{}' for {}", self.coefficients.name(), time);
        self.for_coordinate(time.coordinate())
    }

    /// Thickness over the grid at fractional year `t` (years since 2000)
    pub fn for_coordinate(&self, t: FloatValue) -> Array<FloatValue, D> {
        let mut thickness = Zip::from(self.grid.x())
            .and(self.grid.y())
            .map_collect(|&x, &y| self.model.evaluate(x, y, t));

        if let Some(mask) = &self.mask {
            Zip::from(&mut thickness).and(mask).for_each(|value, &masked| {
                if masked {
                    *value = FloatValue::NAN;
                }
            });
        }
        thickness
    }

    pub fn grid(&self) -> &PlanarGrid<D> {
        &self.grid
    }

    pub fn mask(&self) -> Option<&Array<bool, D>> {
        self.mask.as_ref()
    }

    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thickness::evaluate;
    use itrp_core::errors::ItrpError;
    use ndarray::{array, Array1};

    fn arctic_transect() -> (Array1<FloatValue>, Array1<FloatValue>) {
        (
            array![-45.0, -45.0, 0.0, 90.0, 135.0],
            array![90.0, 80.0, 75.0, 70.0, 65.0],
        )
    }

    #[test]
    fn test_unmasked_matches_model() {
        let (lon, lat) = arctic_transect();
        let climatology = Climatology::new(lon.view(), lat.view(), None).unwrap();
        let time = TimeCoordinate::from_ymd(2010, 4, 1).unwrap();

        let thickness = climatology.for_time_coordinate(&time);
        let grid = climatology.grid();
        for i in 0..lon.len() {
            let expected = evaluate(
                grid.x()[i],
                grid.y()[i],
                time.coordinate(),
                CoefficientSet::revised(),
            );
            assert_eq!(thickness[i], expected);
        }
    }

    #[test]
    fn test_pole_value() {
        let (lon, lat) = arctic_transect();
        let climatology = Climatology::new(lon.view(), lat.view(), None).unwrap();
        let thickness = climatology.for_coordinate(0.0);
        // The pole projects onto the origin
        assert!((thickness[0] - 2.854).abs() < 1e-6);
    }

    #[test]
    fn test_mask_sets_nan() {
        let (lon, lat) = arctic_transect();
        let mask = array![false, true, false, true, false];
        let climatology = Climatology::new(lon.view(), lat.view(), Some(mask.view())).unwrap();
        let unmasked = Climatology::new(lon.view(), lat.view(), None).unwrap();

        let masked_result = climatology.for_time((2015, 10, 1)).unwrap();
        let plain_result = unmasked.for_time((2015, 10, 1)).unwrap();

        for i in 0..mask.len() {
            if mask[i] {
                assert!(masked_result[i].is_nan());
            } else {
                assert_eq!(masked_result[i], plain_result[i]);
            }
        }
    }

    #[test]
    fn test_grid_not_mutated_by_evaluation() {
        let (lon, lat) = arctic_transect();
        let mask = array![true, true, true, true, true];
        let climatology = Climatology::new(lon.view(), lat.view(), Some(mask.view())).unwrap();
        let before = climatology.grid().clone();

        let result = climatology.for_time((2012, 1, 1)).unwrap();
        assert!(result.iter().all(|v| v.is_nan()));
        assert_eq!(climatology.grid(), &before);
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let (lon, lat) = arctic_transect();
        let mask = array![false, true];
        let result = Climatology::new(lon.view(), lat.view(), Some(mask.view()));
        assert!(matches!(result, Err(ItrpError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_invalid_date() {
        let (lon, lat) = arctic_transect();
        let climatology = Climatology::new(lon.view(), lat.view(), None).unwrap();
        let result = climatology.for_time((2015, 13, 1));
        assert!(matches!(result, Err(ItrpError::InvalidInput(_))));
    }

    #[test]
    fn test_explicit_coefficients() {
        let (lon, lat) = arctic_transect();
        let climatology = Climatology::with_coefficients(
            lon.view(),
            lat.view(),
            None,
            CoefficientSet::published().clone(),
        )
        .unwrap();
        assert_eq!(climatology.coefficients().name(), "published");

        let thickness = climatology.for_coordinate(0.0);
        assert!((thickness[0] - (-0.233 + 0.162 + 0.140)).abs() < 1e-6);
    }
}
