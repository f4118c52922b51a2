//! Monomial ordering shared by every coefficient vector in the crate.
//!
//! Exponent triples `(n, m, l)` are enumerated with `n` outermost and `l`
//! innermost, keeping only `0 < n + m + l <= order` and `n <= dx`, `m <= dy`,
//! `l <= dz`. Least-squares operators, oscillation matrices and blended
//! coefficients are all indexed in this order.

use crate::polynomial::moments::MomentArray;
use crate::weno_error::WenoError;
use itertools::iproduct;

/// Geometric dimension of the mesh.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MeshDim {
    /// One cell layer in z: no `l > 0` monomials.
    Two,
    Three,
}

impl MeshDim {
    #[inline]
    pub fn as_usize(self) -> usize {
        match self {
            MeshDim::Two => 2,
            MeshDim::Three => 3,
        }
    }

    /// Caps used when no axis is collapsed.
    #[inline]
    pub fn full_caps(self, order: usize) -> [usize; 3] {
        match self {
            MeshDim::Two => [order, order, 0],
            MeshDim::Three => [order, order, order],
        }
    }

    /// Number of Taylor coefficients (excluding the constant) of a full basis.
    pub fn n_derivatives(self, order: usize) -> usize {
        let p = order;
        match self {
            MeshDim::Two => (p + 1) * (p + 2) / 2 - 1,
            MeshDim::Three => (p + 1) * (p + 2) * (p + 3) / 6 - 1,
        }
    }
}

/// Ordered monomial exponents for one order and dimensionality triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolynomialBasis {
    order: usize,
    dims: [usize; 3],
    exponents: Vec<[usize; 3]>,
}

impl PolynomialBasis {
    /// Enumerate the basis for `order >= 1` and per-axis caps `dims`.
    pub fn new(order: usize, dims: [usize; 3]) -> Result<Self, WenoError> {
        if order < 1 {
            return Err(WenoError::InvalidDimensionality {
                dims,
                order,
                reason: "polynomial order must be at least 1",
            });
        }
        let exponents = iproduct!(0..=dims[0], 0..=dims[1], 0..=dims[2])
            .filter(|&(n, m, l)| {
                let deg = n + m + l;
                deg > 0 && deg <= order
            })
            .map(|(n, m, l)| [n, m, l])
            .collect();
        Ok(Self {
            order,
            dims,
            exponents,
        })
    }

    /// Full basis of the mesh dimension, no collapsed axis.
    pub fn full(order: usize, mesh_dim: MeshDim) -> Result<Self, WenoError> {
        Self::new(order, mesh_dim.full_caps(order))
    }

    /// Basis length without materializing the exponents.
    pub fn count(order: usize, dims: [usize; 3]) -> usize {
        iproduct!(0..=dims[0], 0..=dims[1], 0..=dims[2])
            .filter(|&(n, m, l)| (1..=order).contains(&(n + m + l)))
            .count()
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.exponents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exponents.is_empty()
    }

    #[inline]
    pub fn exponents(&self) -> &[[usize; 3]] {
        &self.exponents
    }

    /// Position of monomial `(n, m, l)` in the ordering.
    pub fn index_of(&self, exps: [usize; 3]) -> Option<usize> {
        self.exponents.iter().position(|e| *e == exps)
    }

    /// Read `moments` in basis order.
    pub fn flatten(&self, moments: &MomentArray) -> Result<Vec<f64>, WenoError> {
        if !moments.covers(self.dims) {
            return Err(WenoError::MomentShape {
                extents: moments.extents(),
                dims: self.dims,
            });
        }
        Ok(self
            .exponents
            .iter()
            .map(|&[n, m, l]| moments.get(n, m, l))
            .collect())
    }

    /// Place `coeffs` back at their `(n, m, l)` positions, zero elsewhere.
    pub fn unflatten(&self, coeffs: &[f64]) -> Result<MomentArray, WenoError> {
        self.check_len(coeffs.len())?;
        let mut out = MomentArray::zeros(self.dims);
        for (&[n, m, l], &c) in self.exponents.iter().zip(coeffs) {
            out.set(n, m, l, c);
        }
        Ok(out)
    }

    /// Value of `sum_k c_k x^n y^m z^l` at a reference-space offset from the
    /// cell center. The constant term is not included.
    pub fn evaluate(&self, coeffs: &[f64], offset: [f64; 3]) -> Result<f64, WenoError> {
        self.check_len(coeffs.len())?;
        Ok(self
            .exponents
            .iter()
            .zip(coeffs)
            .map(|(&[n, m, l], &c)| {
                c * offset[0].powi(n as i32) * offset[1].powi(m as i32) * offset[2].powi(l as i32)
            })
            .sum())
    }

    /// `sum_k c_k * moment_k`, with moments already flattened in basis order.
    pub fn integrate(&self, coeffs: &[f64], moments: &[f64]) -> Result<f64, WenoError> {
        self.check_len(coeffs.len())?;
        self.check_len(moments.len())?;
        Ok(coeffs.iter().zip(moments).map(|(c, w)| c * w).sum())
    }

    #[inline]
    fn check_len(&self, got: usize) -> Result<(), WenoError> {
        if got == self.len() {
            Ok(())
        } else {
            Err(WenoError::CoefficientLength {
                expected: self.len(),
                got,
            })
        }
    }
}
