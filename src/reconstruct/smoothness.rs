//! Smoothness indicators: the oscillation quadratic form of a coefficient vector.

use nalgebra::DMatrix;

use crate::field::FieldValue;
use crate::linalg::quadratic_form;

/// `max(0, c^T B c)`.
///
/// Round-off can push the form of a positive semi-definite `B` slightly below
/// zero; such values are clamped. NaN propagates.
pub fn smoothness_indicator(oscillation: &DMatrix<f64>, coeffs: &[f64]) -> f64 {
    let s = quadratic_form(oscillation, coeffs);
    if s < 0.0 { 0.0 } else { s }
}

/// Component `c` of every coefficient.
pub fn component_slice<V: FieldValue>(coeffs: &[V], c: usize) -> Vec<f64> {
    coeffs.iter().map(|v| v.component(c)).collect()
}

/// One indicator per component of `V`.
pub fn component_indicators<V: FieldValue>(oscillation: &DMatrix<f64>, coeffs: &[V]) -> Vec<f64> {
    (0..V::N_COMPONENTS)
        .map(|c| smoothness_indicator(oscillation, &component_slice(coeffs, c)))
        .collect()
}
