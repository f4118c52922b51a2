//! Stencil solve: member differences times the precomputed operator.

use crate::field::FieldValue;
use crate::halo::HaloCache;
use crate::stencil::{MemberRef, StencilCatalog};
use crate::weno_error::WenoError;

/// Applies one stencil's least-squares operator to a field.
#[derive(Clone, Copy, Debug)]
pub struct StencilSolver<'a> {
    catalog: &'a StencilCatalog,
}

impl<'a> StencilSolver<'a> {
    pub fn new(catalog: &'a StencilCatalog) -> Self {
        Self { catalog }
    }

    /// Taylor coefficients of `stencil` around `cell`, in basis order.
    ///
    /// Column `j` of the operator multiplies `value(member_j) - value(cell)`.
    pub fn solve<V: FieldValue>(
        &self,
        cell: usize,
        stencil: usize,
        field: &[V],
        halo: &HaloCache<V>,
    ) -> Result<Vec<V>, WenoError> {
        let st = self.catalog.stencil(cell, stencil)?;
        if !st.is_usable() {
            return Err(WenoError::ExcludedStencil { cell, stencil });
        }
        let a = st.operator();
        let k = st.coefficient_len();
        let n = st.members().len();
        if a.shape() != (k, n) {
            return Err(WenoError::OperatorShape {
                cell,
                stencil,
                rows: a.nrows(),
                cols: a.ncols(),
                expected_rows: k,
                expected_cols: n,
            });
        }
        let center = *field.get(cell).ok_or(WenoError::UnknownCell {
            cell,
            n_cells: field.len(),
        })?;

        let missing = |member| WenoError::MissingMemberValue {
            cell,
            stencil,
            member,
        };
        let diffs = st
            .members()
            .iter()
            .enumerate()
            .map(|(j, m)| {
                let v = match *m {
                    MemberRef::Local(c) => field.get(c).copied(),
                    MemberRef::Halo(slot) => halo.value(slot).ok(),
                };
                v.map(|v| v.sub(&center)).ok_or_else(|| missing(j))
            })
            .collect::<Result<Vec<V>, WenoError>>()?;

        let mut coeffs = vec![V::default(); k];
        for (row, out) in coeffs.iter_mut().enumerate() {
            for (j, d) in diffs.iter().enumerate() {
                let a_ij = a[(row, j)];
                for c in 0..V::N_COMPONENTS {
                    *out.component_mut(c) += a_ij * d.component(c);
                }
            }
        }
        Ok(coeffs)
    }
}

/// Free-function form of [`StencilSolver::solve`].
pub fn solve_stencil<V: FieldValue>(
    catalog: &StencilCatalog,
    cell: usize,
    stencil: usize,
    field: &[V],
    halo: &HaloCache<V>,
) -> Result<Vec<V>, WenoError> {
    StencilSolver::new(catalog).solve(cell, stencil, field, halo)
}
