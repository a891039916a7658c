//! Polar stereographic projection between geographic and planar grid coordinates
//!
//! The climatology is defined on the NSIDC north polar stereographic grid
//! (EPSG:3411): Hughes 1980 ellipsoid, true scale at 70°N and a central
//! meridian of 45°W. Model coordinates are expressed in units of 1000 km, so
//! the native projection output in metres is scaled by [`METERS_PER_MODEL_UNIT`].
//!
//! The ellipsoidal formulas follow Snyder (1987), "Map Projections: A Working
//! Manual", chapter 21. The southern aspect reuses the northern equations with
//! the signs of latitude, longitude and the planar coordinates reversed.
//!
//! # Examples
//!
//! ```rust
//! use itrp_core::projection::{GridUnit, PolarStereographic};
//!
//! let projection = PolarStereographic::nsidc_north();
//!
//! // The pole lies at the origin of the grid
//! let (x, y) = projection.forward(90.0, -45.0);
//! assert!(x.abs() < 1e-9 && y.abs() < 1e-9);
//!
//! let (x, y) = projection.forward(75.0, 10.0);
//! let (lon, lat) = projection.inverse(x, y, GridUnit::Model);
//! assert!((lon - 10.0).abs() < 1e-6);
//! assert!((lat - 75.0).abs() < 1e-6);
//! ```

use crate::errors::{ensure_same_shape, ItrpError, ItrpResult};
use crate::FloatValue;
use ndarray::{Array, ArrayView, Dimension, Zip};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

/// Number of metres in one planar model unit (1000 km)
pub const METERS_PER_MODEL_UNIT: FloatValue = 1_000_000.0;

/// Convergence threshold for the inverse latitude iteration (radians)
const LATITUDE_TOLERANCE: FloatValue = 1e-12;
const MAX_LATITUDE_ITERATIONS: usize = 15;

/// Defining parameters of a polar stereographic projection
///
/// All angles are in degrees and lengths in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParameters {
    /// Latitude of the projection origin, either 90 or -90
    /// unit: degrees
    pub origin_latitude: FloatValue,
    /// Longitude pointing straight down the planar y axis
    /// unit: degrees
    pub central_longitude: FloatValue,
    /// Latitude at which the projection has no scale distortion
    /// unit: degrees
    pub true_scale_latitude: FloatValue,
    /// Ellipsoid semi-major axis
    /// unit: m
    pub semi_major_axis: FloatValue,
    /// Ellipsoid inverse flattening (1/f)
    /// unit: dimensionless
    pub inverse_flattening: FloatValue,
}

impl ProjectionParameters {
    /// NSIDC sea ice polar stereographic north (EPSG:3411)
    pub fn nsidc_north() -> Self {
        Self {
            origin_latitude: 90.0,
            central_longitude: -45.0,
            true_scale_latitude: 70.0,
            semi_major_axis: 6_378_273.0,
            inverse_flattening: 298.2794111,
        }
    }

    /// NSIDC sea ice polar stereographic south (EPSG:3412)
    pub fn nsidc_south() -> Self {
        Self {
            origin_latitude: -90.0,
            central_longitude: 0.0,
            true_scale_latitude: -70.0,
            semi_major_axis: 6_378_273.0,
            inverse_flattening: 298.2794111,
        }
    }

    fn validate(&self) -> ItrpResult<()> {
        let fields = [
            ("origin_latitude", self.origin_latitude),
            ("central_longitude", self.central_longitude),
            ("true_scale_latitude", self.true_scale_latitude),
            ("semi_major_axis", self.semi_major_axis),
            ("inverse_flattening", self.inverse_flattening),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ItrpError::InvalidProjection(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }

        if self.origin_latitude.abs() != 90.0 {
            return Err(ItrpError::InvalidProjection(format!(
                "origin latitude must be 90 or -90 for a polar aspect, got {}",
                self.origin_latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.central_longitude) {
            return Err(ItrpError::InvalidProjection(format!(
                "central longitude must be within [-180, 180], got {}",
                self.central_longitude
            )));
        }
        let same_hemisphere = self.true_scale_latitude * self.origin_latitude > 0.0;
        if !same_hemisphere || self.true_scale_latitude.abs() > 90.0 {
            return Err(ItrpError::InvalidProjection(format!(
                "true scale latitude {} must lie in the hemisphere of the origin ({})",
                self.true_scale_latitude, self.origin_latitude
            )));
        }
        if self.semi_major_axis <= 0.0 {
            return Err(ItrpError::InvalidProjection(format!(
                "semi-major axis must be positive, got {}",
                self.semi_major_axis
            )));
        }
        if self.inverse_flattening <= 1.0 {
            return Err(ItrpError::InvalidProjection(format!(
                "inverse flattening must be greater than 1, got {}",
                self.inverse_flattening
            )));
        }
        Ok(())
    }
}

impl Default for ProjectionParameters {
    fn default() -> Self {
        Self::nsidc_north()
    }
}

/// Unit of planar coordinates passed to [`PolarStereographic::inverse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridUnit {
    /// Model grid units of 1000 km
    #[default]
    Model,
    /// Native projection metres
    Meters,
}

impl GridUnit {
    /// Number of metres represented by one unit
    pub fn meters_per_unit(self) -> FloatValue {
        match self {
            GridUnit::Model => METERS_PER_MODEL_UNIT,
            GridUnit::Meters => 1.0,
        }
    }
}

impl fmt::Display for GridUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridUnit::Model => write!(f, "1000 km"),
            GridUnit::Meters => write!(f, "m"),
        }
    }
}

/// Ellipsoidal polar stereographic projection
///
/// Parameters are validated once in [`PolarStereographic::new`]; the
/// per-point transforms never fail and propagate NaN for non-finite input.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarStereographic {
    parameters: ProjectionParameters,
    /// +1 for the northern aspect, -1 for the southern one
    hemisphere: FloatValue,
    /// Central meridian in radians, already sign-adjusted for the aspect
    lon0: FloatValue,
    /// First eccentricity
    e: FloatValue,
    /// Ratio between rho (m) and the isometric colatitude function t
    rho_scale: FloatValue,
}

impl PolarStereographic {
    /// Build a projection, validating the parameters.
    pub fn new(parameters: ProjectionParameters) -> ItrpResult<Self> {
        parameters.validate()?;

        let hemisphere = parameters.origin_latitude.signum();
        let lon0 = hemisphere * parameters.central_longitude.to_radians();

        let f = 1.0 / parameters.inverse_flattening;
        let e = (2.0 * f - f * f).sqrt();
        let a = parameters.semi_major_axis;

        let phi_c = hemisphere * parameters.true_scale_latitude.to_radians();
        let rho_scale = if (FRAC_PI_2 - phi_c).abs() < 1e-10 {
            // True scale at the pole
            2.0 * a / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
        } else {
            let sin_c = phi_c.sin();
            let m_c = phi_c.cos() / (1.0 - e * e * sin_c * sin_c).sqrt();
            a * m_c / isometric_colatitude(phi_c, e)
        };

        log::debug!(
            "Polar stereographic projection: origin {}°, central meridian {}°, true scale {}°",
            parameters.origin_latitude,
            parameters.central_longitude,
            parameters.true_scale_latitude
        );

        Ok(Self {
            parameters,
            hemisphere,
            lon0,
            e,
            rho_scale,
        })
    }

    /// The NSIDC north polar stereographic grid used by the climatology
    pub fn nsidc_north() -> Self {
        Self::from_known_parameters(ProjectionParameters::nsidc_north())
    }

    /// The NSIDC south polar stereographic grid
    pub fn nsidc_south() -> Self {
        Self::from_known_parameters(ProjectionParameters::nsidc_south())
    }

    fn from_known_parameters(parameters: ProjectionParameters) -> Self {
        match Self::new(parameters) {
            Ok(projection) => projection,
            Err(err) => panic!("built-in projection parameters are invalid: {}", err),
        }
    }

    pub fn parameters(&self) -> &ProjectionParameters {
        &self.parameters
    }

    /// Project geographic coordinates onto the planar grid in model units (1000 km)
    ///
    /// # Arguments
    ///
    /// * `latitude` - Latitude in degrees
    /// * `longitude` - Longitude in degrees
    pub fn forward(&self, latitude: FloatValue, longitude: FloatValue) -> (FloatValue, FloatValue) {
        let (x, y) = self.forward_meters(latitude, longitude);
        (x / METERS_PER_MODEL_UNIT, y / METERS_PER_MODEL_UNIT)
    }

    /// Project geographic coordinates onto the planar grid in metres
    pub fn forward_meters(
        &self,
        latitude: FloatValue,
        longitude: FloatValue,
    ) -> (FloatValue, FloatValue) {
        let h = self.hemisphere;
        let phi = h * latitude.to_radians();
        let lambda = h * longitude.to_radians();

        let rho = self.rho_scale * isometric_colatitude(phi, self.e);
        let (sin_dl, cos_dl) = (lambda - self.lon0).sin_cos();

        (h * rho * sin_dl, -h * rho * cos_dl)
    }

    /// Project planar grid coordinates back to `(longitude, latitude)` in degrees
    ///
    /// Longitudes are returned in the range [-180, 180).
    pub fn inverse(&self, x: FloatValue, y: FloatValue, unit: GridUnit) -> (FloatValue, FloatValue) {
        let h = self.hemisphere;
        let scale = unit.meters_per_unit();
        let x = h * x * scale;
        let y = h * y * scale;

        let rho = x.hypot(y);
        if rho == 0.0 {
            return (
                normalise_longitude(self.parameters.central_longitude),
                self.parameters.origin_latitude,
            );
        }

        let t = rho / self.rho_scale;
        let phi = latitude_from_isometric_colatitude(t, self.e);
        let lambda = self.lon0 + x.atan2(-y);

        (
            normalise_longitude(h * lambda.to_degrees()),
            h * phi.to_degrees(),
        )
    }

    /// Project arrays of geographic coordinates onto the planar grid in model units
    pub fn forward_array<D: Dimension>(
        &self,
        latitude: ArrayView<FloatValue, D>,
        longitude: ArrayView<FloatValue, D>,
    ) -> ItrpResult<(Array<FloatValue, D>, Array<FloatValue, D>)> {
        ensure_same_shape(latitude.shape(), longitude.shape())?;

        let mut x = Array::zeros(latitude.raw_dim());
        let mut y = Array::zeros(latitude.raw_dim());
        Zip::from(&mut x)
            .and(&mut y)
            .and(latitude)
            .and(longitude)
            .for_each(|x, y, &lat, &lon| {
                (*x, *y) = self.forward(lat, lon);
            });
        Ok((x, y))
    }

    /// Project arrays of planar coordinates back to `(longitude, latitude)` arrays
    pub fn inverse_array<D: Dimension>(
        &self,
        x: ArrayView<FloatValue, D>,
        y: ArrayView<FloatValue, D>,
        unit: GridUnit,
    ) -> ItrpResult<(Array<FloatValue, D>, Array<FloatValue, D>)> {
        ensure_same_shape(x.shape(), y.shape())?;

        let mut longitude = Array::zeros(x.raw_dim());
        let mut latitude = Array::zeros(x.raw_dim());
        Zip::from(&mut longitude)
            .and(&mut latitude)
            .and(x)
            .and(y)
            .for_each(|lon, lat, &x, &y| {
                (*lon, *lat) = self.inverse(x, y, unit);
            });
        Ok((longitude, latitude))
    }
}

/// Snyder's t function (eq. 15-9) for latitude `phi` in radians
fn isometric_colatitude(phi: FloatValue, e: FloatValue) -> FloatValue {
    let e_sin = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)
}

/// Invert [`isometric_colatitude`] by fixed-point iteration (Snyder eq. 7-9)
fn latitude_from_isometric_colatitude(t: FloatValue, e: FloatValue) -> FloatValue {
    let mut phi = FRAC_PI_2 - 2.0 * t.atan();
    for _ in 0..MAX_LATITUDE_ITERATIONS {
        let e_sin = e * phi.sin();
        let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)).atan();
        let converged = (next - phi).abs() < LATITUDE_TOLERANCE;
        phi = next;
        if converged {
            break;
        }
    }
    phi
}

fn normalise_longitude(longitude: FloatValue) -> FloatValue {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}
