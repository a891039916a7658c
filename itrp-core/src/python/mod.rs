//! Python bindings for the coordinate adapters
//!
//! Exposes [`PolarStereographic`] as `Projection` and [`TimeCoordinate`] as
//! `TimeCoordinate`, operating on NumPy arrays of any shape.

use crate::errors::ItrpError;
use crate::projection::{GridUnit, PolarStereographic};
use crate::time::{DateSpec, TimeCoordinate};
use crate::FloatValue;
use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

impl From<ItrpError> for PyErr {
    fn from(err: ItrpError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

type ArrayPair<'py> = (
    Bound<'py, PyArrayDyn<FloatValue>>,
    Bound<'py, PyArrayDyn<FloatValue>>,
);

fn parse_unit(unit: &str) -> PyResult<GridUnit> {
    match unit {
        "model" => Ok(GridUnit::Model),
        "m" | "meters" | "metres" => Ok(GridUnit::Meters),
        _ => Err(PyValueError::new_err(format!(
            "Unknown grid unit '{}'. Expected 'model' or 'meters'.",
            unit
        ))),
    }
}

/// NSIDC polar stereographic projection
///
/// Example:
///     proj = Projection()
///     x, y = proj.forward(lat, lon)
///     lon, lat = proj.inverse(x, y, unit="model")
#[pyclass(name = "Projection", module = "itrp.core")]
#[derive(Debug, Clone)]
pub struct PyProjection(pub PolarStereographic);

#[pymethods]
impl PyProjection {
    /// The northern grid (EPSG:3411)
    #[new]
    fn new() -> Self {
        Self(PolarStereographic::nsidc_north())
    }

    /// The southern grid (EPSG:3412)
    #[staticmethod]
    fn nsidc_south() -> Self {
        Self(PolarStereographic::nsidc_south())
    }

    /// Project latitude/longitude arrays (degrees) to planar x/y (1000 km)
    fn forward<'py>(
        &self,
        py: Python<'py>,
        latitude: PyReadonlyArrayDyn<'py, FloatValue>,
        longitude: PyReadonlyArrayDyn<'py, FloatValue>,
    ) -> PyResult<ArrayPair<'py>> {
        let (x, y) = self
            .0
            .forward_array(latitude.as_array(), longitude.as_array())?;
        Ok((x.into_pyarray_bound(py), y.into_pyarray_bound(py)))
    }

    /// Project planar x/y arrays back to longitude/latitude (degrees)
    #[pyo3(signature = (x, y, unit="model"))]
    fn inverse<'py>(
        &self,
        py: Python<'py>,
        x: PyReadonlyArrayDyn<'py, FloatValue>,
        y: PyReadonlyArrayDyn<'py, FloatValue>,
        unit: &str,
    ) -> PyResult<ArrayPair<'py>> {
        let unit = parse_unit(unit)?;
        let (longitude, latitude) = self.0.inverse_array(x.as_array(), y.as_array(), unit)?;
        Ok((
            longitude.into_pyarray_bound(py),
            latitude.into_pyarray_bound(py),
        ))
    }

    fn __repr__(&self) -> String {
        let params = self.0.parameters();
        format!(
            "Projection(origin_latitude={}, central_longitude={}, true_scale_latitude={})",
            params.origin_latitude, params.central_longitude, params.true_scale_latitude
        )
    }
}

/// Fractional-year time coordinate relative to 2000
#[pyclass(name = "TimeCoordinate", module = "itrp.core")]
#[derive(Debug, Clone)]
pub struct PyTimeCoordinate(pub TimeCoordinate);

#[pymethods]
impl PyTimeCoordinate {
    #[new]
    #[pyo3(signature = (year, month, day, hour=None))]
    fn new(year: i32, month: u32, day: u32, hour: Option<u32>) -> PyResult<Self> {
        let spec = DateSpec::Calendar {
            year,
            month,
            day,
            hour,
        };
        Ok(Self(TimeCoordinate::new(spec)?))
    }

    /// Parse an ISO date (`YYYY-MM-DD`) or datetime (`YYYY-MM-DDTHH:MM:SS`)
    #[staticmethod]
    fn parse(value: &str) -> PyResult<Self> {
        Ok(Self(value.parse()?))
    }

    #[getter]
    fn coordinate(&self) -> FloatValue {
        self.0.coordinate()
    }

    /// The normalised datetime as an ISO 8601 string
    fn isoformat(&self) -> String {
        self.0.as_datetime().format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "TimeCoordinate('{}', coordinate={})",
            self.isoformat(),
            self.0.coordinate()
        )
    }
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyProjection>()?;
    m.add_class::<PyTimeCoordinate>()?;
    Ok(())
}
