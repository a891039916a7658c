//! ITRP coefficient sets
//!
//! Coefficients for the spatial and temporal terms of the sea-ice thickness
//! climatology (Table 2 of the publication). Each set is a named record of
//! term coefficients together with the trigonometric form used by the
//! second and third order seasonal terms.
//!
//! # Versions
//!
//! Two versions of the regression are in use. They share the term
//! coefficients but differ in the bias and in the seasonal harmonics:
//!
//! | Version     | $A_0$ | order 2 seasonal       | order 3 seasonal       |
//! |-------------|-------|------------------------|------------------------|
//! | `published` | 0     | $\cos^2\theta$, $\sin^2\theta$   | $\cos^3\theta$, $\sin^3\theta$ |
//! | `revised`   | 2.785 | $\cos^2 2\theta$, $\sin^2 2\theta$ | $\cos 3\theta$, $\sin 3\theta$ |
//!
//! The governing equation does not pin down which seasonal form is intended,
//! so the harmonic multiplier and exponent are explicit fields of each set.

use itrp_core::errors::{ItrpError, ItrpResult};
use itrp_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A single term of the climatology polynomial
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// Static bias
    A0 = 0,
    /// Linear trend in time
    T,
    Y,
    Cos,
    Sin,
    X2,
    Y2,
    /// Second order seasonal cosine
    Cos2,
    /// Second order seasonal sine
    Sin2,
    /// Cross term `x sin θ`
    XSin,
    X2Y,
    XY2,
    /// Cross term `x t²`
    XT2,
    /// Third order seasonal cosine
    Cos3,
    /// Third order seasonal sine
    Sin3,
}

impl Term {
    pub const COUNT: usize = 15;

    pub const ALL: [Term; Term::COUNT] = [
        Term::A0,
        Term::T,
        Term::Y,
        Term::Cos,
        Term::Sin,
        Term::X2,
        Term::Y2,
        Term::Cos2,
        Term::Sin2,
        Term::XSin,
        Term::X2Y,
        Term::XY2,
        Term::XT2,
        Term::Cos3,
        Term::Sin3,
    ];

    /// Name used in the publication's coefficient table
    pub fn name(&self) -> &'static str {
        match self {
            Term::A0 => "A0",
            Term::T => "T",
            Term::Y => "Y",
            Term::Cos => "COS",
            Term::Sin => "SIN",
            Term::X2 => "X2",
            Term::Y2 => "Y2",
            Term::Cos2 => "COS2",
            Term::Sin2 => "SIN2",
            Term::XSin => "XSIN",
            Term::X2Y => "X2Y",
            Term::XY2 => "XY2",
            Term::XT2 => "XT2",
            Term::Cos3 => "COS3",
            Term::Sin3 => "SIN3",
        }
    }

    /// Polynomial order the term is grouped under
    pub fn order(&self) -> usize {
        match self {
            Term::A0 => 0,
            Term::T | Term::Y | Term::Cos | Term::Sin => 1,
            Term::X2 | Term::Y2 | Term::Cos2 | Term::Sin2 | Term::XSin => 2,
            Term::X2Y | Term::XY2 | Term::XT2 | Term::Cos3 | Term::Sin3 => 3,
        }
    }
}

impl From<Term> for usize {
    fn from(t: Term) -> usize {
        t as usize
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Term {
    type Err = ItrpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Term::ALL
            .iter()
            .find(|term| term.name() == normalized)
            .copied()
            .ok_or_else(|| ItrpError::InvalidCoefficients(format!("unknown term '{}'", s)))
    }
}

/// Trigonometric form of a seasonal term: $f(k\theta)^p$
///
/// `multiplier` is the harmonic $k$ and `exponent` the power $p$.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harmonic {
    /// Harmonic multiplier applied to the seasonal phase
    /// unit: dimensionless
    pub multiplier: u32,
    /// Power applied to the trigonometric factor
    /// unit: dimensionless
    pub exponent: u32,
}

impl Harmonic {
    pub const fn new(multiplier: u32, exponent: u32) -> Self {
        Self {
            multiplier,
            exponent,
        }
    }

    /// $\cos(k\theta)^p$
    pub fn cos(&self, theta: FloatValue) -> FloatValue {
        (FloatValue::from(self.multiplier) * theta)
            .cos()
            .powi(self.exponent as i32)
    }

    /// $\sin(k\theta)^p$
    pub fn sin(&self, theta: FloatValue) -> FloatValue {
        (FloatValue::from(self.multiplier) * theta)
            .sin()
            .powi(self.exponent as i32)
    }

    fn validate(&self, order: &str) -> ItrpResult<()> {
        if self.multiplier == 0 || self.exponent == 0 {
            return Err(ItrpError::InvalidCoefficients(format!(
                "{} order harmonic needs a multiplier and exponent of at least 1, got {:?}",
                order, self
            )));
        }
        if self.exponent > i32::MAX as u32 {
            return Err(ItrpError::InvalidCoefficients(format!(
                "{} order harmonic exponent {} is too large",
                order, self.exponent
            )));
        }
        Ok(())
    }
}

/// Serialised layout of a [`CoefficientSet`]
///
/// Term names are kept as plain strings so the same layout works for TOML,
/// JSON and Python dictionaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CoefficientSetConfig {
    name: String,
    #[serde(default)]
    description: String,
    second_order: Harmonic,
    third_order: Harmonic,
    coefficients: BTreeMap<String, FloatValue>,
}

/// A named, versioned set of ITRP coefficients
///
/// Terms that are absent contribute nothing to the model. Sets are validated
/// on construction and are immutable afterwards; derive a modified set with
/// [`CoefficientSet::with_term`] or [`CoefficientSet::without_term`].
///
/// The thickness model is
///
/// $$ H = A_0 + \sum_{n=1}^{3} H_n(x, y, t), \quad \theta = 2\pi t $$
///
/// where $x, y$ are planar coordinates in 1000 km and $t$ is years since 2000.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoefficientSetConfig", into = "CoefficientSetConfig")]
pub struct CoefficientSet {
    name: String,
    description: String,
    coefficients: BTreeMap<Term, FloatValue>,
    second_order: Harmonic,
    third_order: Harmonic,
}

impl CoefficientSet {
    /// Create a validated coefficient set
    ///
    /// # Errors
    ///
    /// `InvalidCoefficients` if a coefficient is not finite or a harmonic has
    /// a zero multiplier or exponent.
    pub fn new(
        name: &str,
        coefficients: impl IntoIterator<Item = (Term, FloatValue)>,
        second_order: Harmonic,
        third_order: Harmonic,
    ) -> ItrpResult<Self> {
        let set = Self {
            name: name.to_string(),
            description: String::new(),
            coefficients: coefficients.into_iter().collect(),
            second_order,
            third_order,
        };
        set.validate()?;
        Ok(set)
    }

    /// Table 2 coefficients as originally published (no bias term)
    pub fn published() -> &'static Self {
        static SET: OnceLock<CoefficientSet> = OnceLock::new();
        SET.get_or_init(|| Self {
            name: "published".to_string(),
            description: "Table 2 regression without bias; squared and cubed seasonal terms"
                .to_string(),
            coefficients: BTreeMap::from(TABLE_2),
            second_order: Harmonic::new(1, 2),
            third_order: Harmonic::new(1, 3),
        })
    }

    /// Table 2 coefficients with the static bias and higher seasonal harmonics
    pub fn revised() -> &'static Self {
        static SET: OnceLock<CoefficientSet> = OnceLock::new();
        SET.get_or_init(|| {
            let mut coefficients = BTreeMap::from(TABLE_2);
            coefficients.insert(Term::A0, 2.785);
            Self {
                name: "revised".to_string(),
                description: "Table 2 regression with bias; 2θ and 3θ seasonal harmonics"
                    .to_string(),
                coefficients,
                second_order: Harmonic::new(2, 2),
                third_order: Harmonic::new(3, 1),
            }
        })
    }

    /// Parse a coefficient set from TOML
    ///
    /// ```rust
    /// use itrp_model::parameters::{CoefficientSet, Term};
    ///
    /// let set = CoefficientSet::from_toml_str(
    ///     r#"
    ///     name = "bias-only"
    ///     second_order = { multiplier = 1, exponent = 2 }
    ///     third_order = { multiplier = 1, exponent = 3 }
    ///
    ///     [coefficients]
    ///     A0 = 1.5
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(set.get(Term::A0), 1.5);
    /// assert_eq!(set.get(Term::Y), 0.0);
    /// ```
    pub fn from_toml_str(s: &str) -> ItrpResult<Self> {
        toml::from_str(s).map_err(|e| ItrpError::InvalidCoefficients(e.to_string()))
    }

    pub fn to_toml_string(&self) -> ItrpResult<String> {
        toml::to_string(self).map_err(|e| ItrpError::InvalidCoefficients(e.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Copy of this set under a different name and description
    pub fn renamed(&self, name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ..self.clone()
        }
    }

    /// Coefficient of `term`, zero when the term is absent
    pub fn get(&self, term: Term) -> FloatValue {
        self.coefficients.get(&term).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, term: Term) -> bool {
        self.coefficients.contains_key(&term)
    }

    /// Present terms in table order
    pub fn iter(&self) -> impl Iterator<Item = (Term, FloatValue)> + '_ {
        self.coefficients.iter().map(|(term, value)| (*term, *value))
    }

    /// Dense coefficients indexed by `Term as usize`, absent terms set to zero
    pub fn weights(&self) -> [FloatValue; Term::COUNT] {
        let mut weights = [0.0; Term::COUNT];
        for (term, value) in self.iter() {
            weights[usize::from(term)] = value;
        }
        weights
    }

    pub fn second_order(&self) -> Harmonic {
        self.second_order
    }

    pub fn third_order(&self) -> Harmonic {
        self.third_order
    }

    /// Copy of this set with `term` set to `value`
    pub fn with_term(&self, term: Term, value: FloatValue) -> ItrpResult<Self> {
        let mut set = self.clone();
        set.coefficients.insert(term, value);
        set.validate()?;
        Ok(set)
    }

    /// Copy of this set with `term` removed
    pub fn without_term(&self, term: Term) -> Self {
        let mut set = self.clone();
        set.coefficients.remove(&term);
        set
    }

    fn validate(&self) -> ItrpResult<()> {
        if let Some((term, value)) = self.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ItrpError::InvalidCoefficients(format!(
                "coefficient {} of '{}' must be finite, got {}",
                term, self.name, value
            )));
        }
        self.second_order.validate("second")?;
        self.third_order.validate("third")
    }
}

impl TryFrom<CoefficientSetConfig> for CoefficientSet {
    type Error = ItrpError;

    fn try_from(config: CoefficientSetConfig) -> Result<Self, Self::Error> {
        let coefficients = config
            .coefficients
            .iter()
            .map(|(name, value)| Ok((name.parse::<Term>()?, *value)))
            .collect::<ItrpResult<Vec<_>>>()?;

        let mut set = Self::new(
            &config.name,
            coefficients,
            config.second_order,
            config.third_order,
        )?;
        set.description = config.description;
        Ok(set)
    }
}

impl From<CoefficientSet> for CoefficientSetConfig {
    fn from(set: CoefficientSet) -> Self {
        Self {
            coefficients: set
                .iter()
                .map(|(term, value)| (term.name().to_string(), value))
                .collect(),
            name: set.name,
            description: set.description,
            second_order: set.second_order,
            third_order: set.third_order,
        }
    }
}

/// Published Table 2 term coefficients
const TABLE_2: [(Term, FloatValue); 14] = [
    // 1st order terms
    (Term::T, -0.079),
    (Term::Y, -1.767),
    (Term::Cos, -0.233),
    (Term::Sin, 0.296),
    // 2nd order terms
    (Term::X2, -0.329),
    (Term::Y2, 0.674),
    (Term::Cos2, 0.162),
    (Term::Sin2, -0.226),
    (Term::XSin, -0.199),
    // 3rd order terms
    (Term::X2Y, 0.398),
    (Term::XY2, 0.253),
    (Term::XT2, -0.002),
    (Term::Cos3, 0.140),
    (Term::Sin3, 0.015),
];

/// Named built-in coefficient sets
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVersion {
    Published,
    #[default]
    Revised,
}

impl ModelVersion {
    pub fn coefficients(self) -> &'static CoefficientSet {
        match self {
            ModelVersion::Published => CoefficientSet::published(),
            ModelVersion::Revised => CoefficientSet::revised(),
        }
    }
}

impl FromStr for ModelVersion {
    type Err = ItrpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "published" => Ok(ModelVersion::Published),
            "revised" => Ok(ModelVersion::Revised),
            _ => Err(ItrpError::InvalidCoefficients(format!(
                "unknown model version '{}'. Expected 'published' or 'revised'",
                s
            ))),
        }
    }
}
