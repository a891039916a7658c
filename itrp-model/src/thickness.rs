//! Sea-ice thickness evaluation
//!
//! Evaluates the ITRP polynomial for planar coordinates $x, y$ (1000 km) and
//! time $t$ (years since 2000). With $\theta = 2\pi t$ and the seasonal forms
//! $h_2, h_3$ of the active [`CoefficientSet`]:
//!
//! $$ H_0 = A_0 $$
//! $$ H_1 = Y y + C \cos\theta + S \sin\theta + T t $$
//! $$ H_2 = X_2 x^2 + Y_2 y^2 + C_2 h_2^{\cos}(\theta) + S_2 h_2^{\sin}(\theta) + X_S x \sin\theta $$
//! $$ H_3 = X_2Y x^2 y + XY_2 x y^2 + XT_2 x t^2 + C_3 h_3^{\cos}(\theta) + S_3 h_3^{\sin}(\theta) $$
//!
//! The model is a statistical fit: it extrapolates outside the Arctic basin
//! without complaint and NaN or infinite inputs propagate to the output.

use crate::parameters::{CoefficientSet, Harmonic, Term};
use itrp_core::errors::{ensure_same_shape, ItrpResult};
use itrp_core::FloatValue;
use ndarray::{Array, ArrayView, Dimension, Zip};
use std::f64::consts::TAU;

/// A coefficient set laid out for repeated evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThicknessModel {
    weights: [FloatValue; Term::COUNT],
    second_order: Harmonic,
    third_order: Harmonic,
}

impl ThicknessModel {
    pub fn new(coefficients: &CoefficientSet) -> Self {
        Self {
            weights: coefficients.weights(),
            second_order: coefficients.second_order(),
            third_order: coefficients.third_order(),
        }
    }

    fn w(&self, term: Term) -> FloatValue {
        self.weights[usize::from(term)]
    }

    /// Thickness at a single point
    pub fn evaluate(&self, x: FloatValue, y: FloatValue, t: FloatValue) -> FloatValue {
        let theta = TAU * t;
        let (sin, cos) = theta.sin_cos();
        let (second, third) = (self.second_order, self.third_order);

        let order0 = self.w(Term::A0);
        let order1 = self.w(Term::Y) * y
            + self.w(Term::Cos) * cos
            + self.w(Term::Sin) * sin
            + self.w(Term::T) * t;
        let order2 = self.w(Term::X2) * x * x
            + self.w(Term::Y2) * y * y
            + self.w(Term::Cos2) * second.cos(theta)
            + self.w(Term::Sin2) * second.sin(theta)
            + self.w(Term::XSin) * x * sin;
        let order3 = self.w(Term::X2Y) * x * x * y
            + self.w(Term::XY2) * x * y * y
            + self.w(Term::XT2) * x * t * t
            + self.w(Term::Cos3) * third.cos(theta)
            + self.w(Term::Sin3) * third.sin(theta);

        order0 + order1 + order2 + order3
    }

    /// Thickness over planar coordinate arrays at a single time
    pub fn evaluate_grid<D: Dimension>(
        &self,
        x: ArrayView<FloatValue, D>,
        y: ArrayView<FloatValue, D>,
        t: FloatValue,
    ) -> ItrpResult<Array<FloatValue, D>> {
        ensure_same_shape(x.shape(), y.shape())?;
        Ok(Zip::from(x)
            .and(y)
            .map_collect(|&x, &y| self.evaluate(x, y, t)))
    }

    /// Thickness over same-shaped coordinate and time arrays
    pub fn evaluate_arrays<D: Dimension>(
        &self,
        x: ArrayView<FloatValue, D>,
        y: ArrayView<FloatValue, D>,
        t: ArrayView<FloatValue, D>,
    ) -> ItrpResult<Array<FloatValue, D>> {
        ensure_same_shape(x.shape(), y.shape())?;
        ensure_same_shape(x.shape(), t.shape())?;
        Ok(Zip::from(x)
            .and(y)
            .and(t)
            .map_collect(|&x, &y, &t| self.evaluate(x, y, t)))
    }
}

impl From<&CoefficientSet> for ThicknessModel {
    fn from(coefficients: &CoefficientSet) -> Self {
        Self::new(coefficients)
    }
}

/// Evaluate the climatology at a single point
///
/// # Arguments
///
/// * `x`, `y` - Planar coordinates in 1000 km
/// * `t` - Years since 2000
/// * `coefficients` - Coefficient set to evaluate
pub fn evaluate(
    x: FloatValue,
    y: FloatValue,
    t: FloatValue,
    coefficients: &CoefficientSet,
) -> FloatValue {
    ThicknessModel::new(coefficients).evaluate(x, y, t)
}

/// Evaluate the climatology over planar coordinate arrays at a single time
pub fn evaluate_grid<D: Dimension>(
    x: ArrayView<FloatValue, D>,
    y: ArrayView<FloatValue, D>,
    t: FloatValue,
    coefficients: &CoefficientSet,
) -> ItrpResult<Array<FloatValue, D>> {
    ThicknessModel::new(coefficients).evaluate_grid(x, y, t)
}

/// Evaluate the climatology elementwise over coordinate and time arrays
pub fn evaluate_arrays<D: Dimension>(
    x: ArrayView<FloatValue, D>,
    y: ArrayView<FloatValue, D>,
    t: ArrayView<FloatValue, D>,
    coefficients: &CoefficientSet,
) -> ItrpResult<Array<FloatValue, D>> {
    ThicknessModel::new(coefficients).evaluate_arrays(x, y, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use itrp_core::errors::ItrpError;
    use ndarray::array;

    fn single_term(term: Term, value: FloatValue) -> CoefficientSet {
        CoefficientSet::new("single", [(term, value)], Harmonic::new(1, 1), Harmonic::new(1, 1))
            .unwrap()
    }

    #[test]
    fn test_origin_at_epoch_revised() {
        // Only the cosine terms survive at x = y = t = 0
        let value = evaluate(0.0, 0.0, 0.0, CoefficientSet::revised());
        assert!(
            is_close!(value, 2.785 - 0.233 + 0.162 + 0.140),
            "Expected 2.854, got {}",
            value
        );
    }

    #[test]
    fn test_origin_at_epoch_without_third_order_cosine() {
        let set = CoefficientSet::revised().without_term(Term::Cos3);
        let value = evaluate(0.0, 0.0, 0.0, &set);
        assert!(is_close!(value, 2.714), "Expected 2.714, got {}", value);
    }

    #[test]
    fn test_origin_at_epoch_published() {
        let value = evaluate(0.0, 0.0, 0.0, CoefficientSet::published());
        assert!(is_close!(value, -0.233 + 0.162 + 0.140));
    }

    #[test]
    fn test_spatial_terms() {
        let cases = [
            (Term::Y, 0.0, 2.0, 2.0),
            (Term::X2, 3.0, 0.0, 9.0),
            (Term::Y2, 0.0, -3.0, 9.0),
            (Term::X2Y, 2.0, 3.0, 12.0),
            (Term::XY2, 2.0, 3.0, 18.0),
        ];
        for (term, x, y, expected) in cases {
            let value = evaluate(x, y, 0.0, &single_term(term, 1.0));
            assert!(
                is_close!(value, expected),
                "{} at ({}, {}) expected {}, got {}",
                term,
                x,
                y,
                expected,
                value
            );
        }
    }

    #[test]
    fn test_time_terms() {
        assert!(is_close!(evaluate(0.0, 0.0, 3.0, &single_term(Term::T, 2.0)), 6.0));
        assert!(is_close!(evaluate(2.0, 0.0, 3.0, &single_term(Term::XT2, 1.0)), 18.0));

        // A quarter year puts the seasonal phase at 90 degrees
        let sin = evaluate(0.0, 0.0, 0.25, &single_term(Term::Sin, 1.0));
        let cos = evaluate(0.0, 0.0, 0.25, &single_term(Term::Cos, 1.0));
        assert!(is_close!(sin, 1.0));
        assert!(cos.abs() < 1e-12);

        let xsin = evaluate(2.0, 0.0, 0.25, &single_term(Term::XSin, 1.0));
        assert!(is_close!(xsin, 2.0));
    }

    #[test]
    fn test_harmonic_multiplier_and_exponent() {
        let t = 0.1;
        let theta = TAU * t;

        let squared = CoefficientSet::new(
            "k1",
            [(Term::Cos2, 1.0), (Term::Sin3, 1.0)],
            Harmonic::new(1, 2),
            Harmonic::new(1, 3),
        )
        .unwrap();
        let harmonic = CoefficientSet::new(
            "k2",
            [(Term::Cos2, 1.0), (Term::Sin3, 1.0)],
            Harmonic::new(2, 2),
            Harmonic::new(3, 1),
        )
        .unwrap();

        let expected_squared = theta.cos().powi(2) + theta.sin().powi(3);
        let expected_harmonic = (2.0 * theta).cos().powi(2) + (3.0 * theta).sin();

        assert!(is_close!(evaluate(0.0, 0.0, t, &squared), expected_squared));
        assert!(is_close!(evaluate(0.0, 0.0, t, &harmonic), expected_harmonic));
    }

    #[test]
    fn test_seasonal_cycle_is_periodic_without_trend() {
        let set = CoefficientSet::revised()
            .without_term(Term::T)
            .without_term(Term::XT2);
        let a = evaluate(0.7, -0.4, 15.3, &set);
        let b = evaluate(0.7, -0.4, 16.3, &set);
        assert!(is_close!(a, b, abs_tol = 1e-9));
    }

    #[test]
    fn test_deterministic() {
        let set = CoefficientSet::revised();
        let first = evaluate(0.31, -1.2, 15.7479, set);
        for _ in 0..10 {
            assert_eq!(evaluate(0.31, -1.2, 15.7479, set).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_nan_propagates() {
        let value = evaluate(f64::NAN, 0.0, 0.0, CoefficientSet::revised());
        assert!(value.is_nan());
    }

    #[test]
    fn test_grid_matches_scalar() {
        let set = CoefficientSet::revised();
        let x = array![[-1.0, 0.0], [0.5, 1.5]];
        let y = array![[0.0, -2.0], [1.0, 0.25]];
        let t = 12.5;

        let result = evaluate_grid(x.view(), y.view(), t, set).unwrap();
        assert_eq!(result.shape(), &[2, 2]);
        for ((idx, value), (&xi, &yi)) in result.indexed_iter().zip(x.iter().zip(y.iter())) {
            assert_eq!(*value, evaluate(xi, yi, t, set), "Mismatch at {:?}", idx);
        }
    }

    #[test]
    fn test_arrays_match_scalar() {
        let set = CoefficientSet::published();
        let x = array![-1.0, 0.0, 2.0];
        let y = array![0.5, -0.5, 1.0];
        let t = array![0.0, 8.25, 16.9];

        let result = evaluate_arrays(x.view(), y.view(), t.view(), set).unwrap();
        for i in 0..3 {
            assert_eq!(result[i], evaluate(x[i], y[i], t[i], set));
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let set = CoefficientSet::revised();
        let x = array![0.0, 1.0];
        let y = array![0.0];
        assert!(matches!(
            evaluate_grid(x.view(), y.view(), 0.0, set),
            Err(ItrpError::ShapeMismatch { .. })
        ));

        let t = array![0.0, 1.0, 2.0];
        assert!(matches!(
            evaluate_arrays(x.view(), x.view(), t.view(), set),
            Err(ItrpError::ShapeMismatch { .. })
        ));
    }
}
