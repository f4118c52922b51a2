//! Helpers over `nalgebra` dense matrices for precomputed stencil operators.
//!
//! Operators and oscillation matrices arrive fully formed from the mesh
//! provider; the reconstruction only applies them.

use nalgebra::DMatrix;

use crate::weno_error::WenoError;

/// Build a matrix from nested rows; all rows must have the same length.
pub fn from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, WenoError> {
    let cols = rows.first().map_or(0, Vec::len);
    if let Some(r) = rows.iter().find(|r| r.len() != cols) {
        return Err(WenoError::CoefficientLength {
            expected: cols,
            got: r.len(),
        });
    }
    Ok(DMatrix::from_fn(rows.len(), cols, |i, j| rows[i][j]))
}

/// `x^T * b * x` as a direct double loop.
///
/// # Panics
/// Panics unless `b` is square with `x.len()` rows.
pub fn quadratic_form(b: &DMatrix<f64>, x: &[f64]) -> f64 {
    assert!(b.is_square(), "quadratic form needs a square matrix");
    assert_eq!(x.len(), b.nrows(), "quadratic form: vector length must equal size");
    let mut acc = 0.0;
    for (p, &xp) in x.iter().enumerate() {
        let mut sum_b = 0.0;
        for (q, &xq) in x.iter().enumerate() {
            sum_b += b[(p, q)] * xq;
        }
        acc += xp * sum_b;
    }
    acc
}
