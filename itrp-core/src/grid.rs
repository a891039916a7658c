//! Geographic grids and their planar projection
//!
//! A [`PlanarGrid`] bundles the caller's longitude/latitude arrays with the
//! planar coordinates derived from them. It is computed once and never
//! modified; a new grid requires a new projection pass.

use crate::errors::{ensure_same_shape, ItrpResult};
use crate::projection::{PolarStereographic, METERS_PER_MODEL_UNIT};
use crate::FloatValue;
use ndarray::{Array, ArrayView, Dimension};

/// Geographic grid together with its projected planar coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarGrid<D: Dimension> {
    longitude: Array<FloatValue, D>,
    latitude: Array<FloatValue, D>,
    x: Array<FloatValue, D>,
    y: Array<FloatValue, D>,
}

impl<D: Dimension> PlanarGrid<D> {
    /// Project a geographic grid
    ///
    /// # Arguments
    ///
    /// * `projection` - Projection used for the forward transform
    /// * `longitude` - Longitudes in degrees
    /// * `latitude` - Latitudes in degrees, same shape as `longitude`
    pub fn project(
        projection: &PolarStereographic,
        longitude: ArrayView<FloatValue, D>,
        latitude: ArrayView<FloatValue, D>,
    ) -> ItrpResult<Self> {
        ensure_same_shape(longitude.shape(), latitude.shape())?;
        let (x, y) = projection.forward_array(latitude.view(), longitude.view())?;

        Ok(Self {
            longitude: longitude.to_owned(),
            latitude: latitude.to_owned(),
            x,
            y,
        })
    }

    pub fn shape(&self) -> &[usize] {
        self.x.shape()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn longitude(&self) -> &Array<FloatValue, D> {
        &self.longitude
    }

    pub fn latitude(&self) -> &Array<FloatValue, D> {
        &self.latitude
    }

    /// Planar x coordinates (1000 km)
    pub fn x(&self) -> &Array<FloatValue, D> {
        &self.x
    }

    /// Planar y coordinates (1000 km)
    pub fn y(&self) -> &Array<FloatValue, D> {
        &self.y
    }

    /// Physical extent of the grid along x in metres
    ///
    /// NaN coordinates are ignored. Returns 0 for an empty grid.
    pub fn width_m(&self) -> FloatValue {
        METERS_PER_MODEL_UNIT * extent(self.x.view())
    }

    /// Physical extent of the grid along y in metres
    pub fn height_m(&self) -> FloatValue {
        METERS_PER_MODEL_UNIT * extent(self.y.view())
    }
}

fn extent<D: Dimension>(values: ArrayView<FloatValue, D>) -> FloatValue {
    let (min, max) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((FloatValue::INFINITY, FloatValue::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        0.0
    } else {
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_project_keeps_geographic_arrays() {
        let projection = PolarStereographic::nsidc_north();
        let lon = array![[-45.0, 0.0], [45.0, 135.0]];
        let lat = array![[70.0, 75.0], [80.0, 85.0]];

        let grid = PlanarGrid::project(&projection, lon.view(), lat.view()).unwrap();

        assert_eq!(grid.shape(), &[2, 2]);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.longitude(), &lon);
        assert_eq!(grid.latitude(), &lat);

        let (x, y) = projection.forward(80.0, 45.0);
        assert_eq!(grid.x()[[1, 0]], x);
        assert_eq!(grid.y()[[1, 0]], y);
    }

    #[test]
    fn test_extent_in_metres() {
        let projection = PolarStereographic::nsidc_north();
        // Points on the central meridian and its antimeridian
        let lon = array![-45.0, 135.0];
        let lat = array![80.0, 80.0];

        let grid = PlanarGrid::project(&projection, lon.view(), lat.view()).unwrap();
        let (_, y_near) = projection.forward_meters(80.0, -45.0);

        assert!(grid.width_m() < 1e-3);
        assert!((grid.height_m() - 2.0 * y_near.abs()).abs() < 1e-3);
    }

    #[test]
    fn test_extent_of_empty_grid() {
        let projection = PolarStereographic::nsidc_north();
        let empty = ndarray::Array1::<f64>::zeros(0);
        let grid = PlanarGrid::project(&projection, empty.view(), empty.view()).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.width_m(), 0.0);
        assert_eq!(grid.height_m(), 0.0);
    }
}
