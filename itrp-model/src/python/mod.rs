//! Python bindings for the thickness model and climatology

use crate::climatology::Climatology;
use crate::parameters::{CoefficientSet, ModelVersion};
use crate::thickness::ThicknessModel;
use itrp_core::time::{DateSpec, TimeCoordinate};
use itrp_core::FloatValue;
use ndarray::IxDyn;
use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn, ToPyArray};
use pyo3::prelude::*;

/// A named ITRP coefficient set
///
/// Example:
///     coefficients = CoefficientSet.from_dict({
///         "name": "custom",
///         "second_order": {"multiplier": 2, "exponent": 2},
///         "third_order": {"multiplier": 3, "exponent": 1},
///         "coefficients": {"A0": 2.5, "Y": -1.7},
///     })
#[pyclass(name = "CoefficientSet", module = "itrp.model")]
#[derive(Debug, Clone)]
pub struct PyCoefficientSet(pub CoefficientSet);

#[pymethods]
impl PyCoefficientSet {
    #[staticmethod]
    fn published() -> Self {
        Self(CoefficientSet::published().clone())
    }

    #[staticmethod]
    fn revised() -> Self {
        Self(CoefficientSet::revised().clone())
    }

    /// Look up a built-in set by version name ("published" or "revised")
    #[staticmethod]
    fn version(name: &str) -> PyResult<Self> {
        let version: ModelVersion = name.parse()?;
        Ok(Self(version.coefficients().clone()))
    }

    #[staticmethod]
    fn from_dict(value: Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(Self(pythonize::depythonize_bound(value)?))
    }

    fn to_dict(&self, py: Python<'_>) -> PyResult<PyObject> {
        Ok(pythonize::pythonize(py, &self.0)?)
    }

    #[staticmethod]
    fn from_toml(value: &str) -> PyResult<Self> {
        Ok(Self(CoefficientSet::from_toml_str(value)?))
    }

    fn to_toml(&self) -> PyResult<String> {
        Ok(self.0.to_toml_string()?)
    }

    #[getter]
    fn name(&self) -> String {
        self.0.name().to_string()
    }

    /// Coefficient of a term by its table name, e.g. `coefficients["XSIN"]`
    fn __getitem__(&self, term: &str) -> PyResult<FloatValue> {
        Ok(self.0.get(term.parse()?))
    }

    fn __repr__(&self) -> String {
        format!("CoefficientSet(name='{}')", self.0.name())
    }
}

/// Evaluate the thickness model on planar coordinates
///
/// `t` may be a float or an array with the same shape as `x` and `y`.
#[pyfunction]
#[pyo3(signature = (x, y, t, coefficients=None))]
fn evaluate<'py>(
    py: Python<'py>,
    x: PyReadonlyArrayDyn<'py, FloatValue>,
    y: PyReadonlyArrayDyn<'py, FloatValue>,
    t: &Bound<'py, PyAny>,
    coefficients: Option<PyRef<'py, PyCoefficientSet>>,
) -> PyResult<Bound<'py, PyArrayDyn<FloatValue>>> {
    let coefficients = coefficients
        .as_ref()
        .map_or(CoefficientSet::revised(), |c| &c.0);
    let model = ThicknessModel::new(coefficients);

    let thickness = match t.extract::<FloatValue>() {
        Ok(t) => model.evaluate_grid(x.as_array(), y.as_array(), t)?,
        Err(_) => {
            let t: PyReadonlyArrayDyn<'py, FloatValue> = t.extract()?;
            model.evaluate_arrays(x.as_array(), y.as_array(), t.as_array())?
        }
    };
    Ok(thickness.into_pyarray_bound(py))
}

/// Thickness climatology on a fixed longitude/latitude grid
///
/// Example:
///     clim = Climatology(lon, lat, mask=land)
///     thickness = clim.for_time(2015, 10, 1)
#[pyclass(name = "Climatology", module = "itrp.model")]
pub struct PyClimatology(pub Climatology<IxDyn>);

#[pymethods]
impl PyClimatology {
    #[new]
    #[pyo3(signature = (longitude, latitude, mask=None, coefficients=None))]
    fn new<'py>(
        longitude: PyReadonlyArrayDyn<'py, FloatValue>,
        latitude: PyReadonlyArrayDyn<'py, FloatValue>,
        mask: Option<PyReadonlyArrayDyn<'py, bool>>,
        coefficients: Option<PyRef<'py, PyCoefficientSet>>,
    ) -> PyResult<Self> {
        let coefficients = coefficients
            .map_or_else(|| CoefficientSet::revised().clone(), |c| c.0.clone());
        let mask = mask.as_ref().map(|m| m.as_array());
        let climatology = Climatology::with_coefficients(
            longitude.as_array(),
            latitude.as_array(),
            mask,
            coefficients,
        )?;
        Ok(Self(climatology))
    }

    /// Thickness for a calendar date; the hour defaults to midday
    #[pyo3(signature = (year, month, day, hour=None))]
    fn for_time<'py>(
        &self,
        py: Python<'py>,
        year: i32,
        month: u32,
        day: u32,
        hour: Option<u32>,
    ) -> PyResult<Bound<'py, PyArrayDyn<FloatValue>>> {
        let spec = DateSpec::Calendar {
            year,
            month,
            day,
            hour,
        };
        Ok(self.0.for_time(spec)?.into_pyarray_bound(py))
    }

    /// Thickness for an ISO date or datetime string
    fn for_date<'py>(
        &self,
        py: Python<'py>,
        date: &str,
    ) -> PyResult<Bound<'py, PyArrayDyn<FloatValue>>> {
        let time: TimeCoordinate = date.parse()?;
        Ok(self.0.for_time_coordinate(&time).into_pyarray_bound(py))
    }

    /// Thickness at a fractional year since 2000
    fn for_coordinate<'py>(
        &self,
        py: Python<'py>,
        t: FloatValue,
    ) -> Bound<'py, PyArrayDyn<FloatValue>> {
        self.0.for_coordinate(t).into_pyarray_bound(py)
    }

    #[getter]
    fn x<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<FloatValue>> {
        self.0.grid().x().to_pyarray_bound(py)
    }

    #[getter]
    fn y<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<FloatValue>> {
        self.0.grid().y().to_pyarray_bound(py)
    }

    #[getter]
    fn width_m(&self) -> FloatValue {
        self.0.grid().width_m()
    }

    #[getter]
    fn height_m(&self) -> FloatValue {
        self.0.grid().height_m()
    }

    #[getter]
    fn coefficients(&self) -> PyCoefficientSet {
        PyCoefficientSet(self.0.coefficients().clone())
    }
}

#[pymodule]
pub fn model(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCoefficientSet>()?;
    m.add_class::<PyClimatology>()?;
    m.add_function(wrap_pyfunction!(evaluate, m)?)?;
    Ok(())
}
