//! StencilCatalog: frozen per-cell stencil lists with precomputed operators.
//!
//! The catalog is assembled by [`StencilCatalogBuilder`](super::StencilCatalogBuilder),
//! validated once, and then shared read-only (typically behind an `Arc`) by
//! every reconstruction worker.
//!
//! # Invariants
//!
//! - Every local member index is `< n_cells` and differs from the owning cell.
//! - Every halo member points at an existing slot of `halo_cells`.
//! - For usable stencils with basis length `k`: at least `k` members, the
//!   operator is `k x members`, the oscillation matrix is `k x k`.
//! - All usable stencils of a cell share the same basis, monomial by monomial.
//! - Every cell has at least one usable stencil.

use nalgebra::DMatrix;

use crate::debug_invariants::DebugInvariants;
use crate::polynomial::{MeshDim, PolynomialBasis};
use crate::stencil::member::{MemberRef, RemoteCell};
use crate::weno_error::WenoError;

/// Index of the central stencil in every cell's stencil list.
pub const CENTRAL_STENCIL: usize = 0;

/// One candidate stencil of a cell.
#[derive(Clone, Debug)]
pub struct Stencil {
    pub(crate) members: Vec<MemberRef>,
    pub(crate) basis: PolynomialBasis,
    pub(crate) operator: DMatrix<f64>,
    pub(crate) oscillation: DMatrix<f64>,
    pub(crate) usable: bool,
}

impl Stencil {
    /// Members in operator column order (the owning cell is not listed).
    #[inline]
    pub fn members(&self) -> &[MemberRef] {
        &self.members
    }

    #[inline]
    pub fn basis(&self) -> &PolynomialBasis {
        &self.basis
    }

    /// Dimensionality triple `[dx, dy, dz]`.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.basis.dims()
    }

    /// Pseudoinverse mapping member differences to Taylor coefficients.
    #[inline]
    pub fn operator(&self) -> &DMatrix<f64> {
        &self.operator
    }

    /// Quadratic-form matrix of the smoothness indicator.
    #[inline]
    pub fn oscillation(&self) -> &DMatrix<f64> {
        &self.oscillation
    }

    /// `false` if the stencil is flagged unusable for its cell.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.usable
    }

    #[inline]
    pub fn coefficient_len(&self) -> usize {
        self.basis.len()
    }

    #[inline]
    pub fn n_halo_members(&self) -> usize {
        self.members.iter().filter(|m| m.is_halo()).count()
    }
}

/// Read-only catalog of every cell's stencils.
#[derive(Clone, Debug)]
pub struct StencilCatalog {
    pub(crate) n_cells: usize,
    pub(crate) mesh_dim: MeshDim,
    pub(crate) order: usize,
    pub(crate) stencils: Vec<Vec<Stencil>>,
    pub(crate) halo_cells: Vec<RemoteCell>,
}

impl StencilCatalog {
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    #[inline]
    pub fn mesh_dim(&self) -> MeshDim {
        self.mesh_dim
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Distinct remote cells referenced by any stencil, indexed by slot.
    #[inline]
    pub fn halo_cells(&self) -> &[RemoteCell] {
        &self.halo_cells
    }

    #[inline]
    pub fn remote_cell(&self, slot: usize) -> Option<RemoteCell> {
        self.halo_cells.get(slot).copied()
    }

    /// Ordered stencils of `cell`; index 0 is the central stencil.
    pub fn stencils_of(&self, cell: usize) -> Result<&[Stencil], WenoError> {
        self.stencils
            .get(cell)
            .map(Vec::as_slice)
            .ok_or(WenoError::UnknownCell {
                cell,
                n_cells: self.n_cells,
            })
    }

    pub fn stencil(&self, cell: usize, stencil: usize) -> Result<&Stencil, WenoError> {
        self.stencils_of(cell)?
            .get(stencil)
            .ok_or(WenoError::UnknownStencil { cell, stencil })
    }

    /// Members of one stencil with their local/halo classification.
    pub fn members_of(&self, cell: usize, stencil: usize) -> Result<&[MemberRef], WenoError> {
        Ok(self.stencil(cell, stencil)?.members())
    }

    pub fn operator_of(&self, cell: usize, stencil: usize) -> Result<&DMatrix<f64>, WenoError> {
        Ok(self.stencil(cell, stencil)?.operator())
    }

    pub fn oscillation_matrix_of(
        &self,
        cell: usize,
        stencil: usize,
    ) -> Result<&DMatrix<f64>, WenoError> {
        Ok(self.stencil(cell, stencil)?.oscillation())
    }

    pub fn basis_of(&self, cell: usize, stencil: usize) -> Result<&PolynomialBasis, WenoError> {
        Ok(self.stencil(cell, stencil)?.basis())
    }

    /// Coefficient-vector length shared by the usable stencils of `cell`.
    pub fn coefficient_len(&self, cell: usize) -> Result<usize, WenoError> {
        self.stencils_of(cell)?
            .iter()
            .find(|s| s.usable)
            .map(Stencil::coefficient_len)
            .ok_or(WenoError::NoUsableStencil { cell })
    }

    /// Iterate `(stencil index, stencil)` over the usable stencils of `cell`.
    pub fn usable_stencils(
        &self,
        cell: usize,
    ) -> Result<impl Iterator<Item = (usize, &Stencil)>, WenoError> {
        Ok(self
            .stencils_of(cell)?
            .iter()
            .enumerate()
            .filter(|(_, s)| s.usable))
    }

    /// Total number of stencils over all cells, usable or not.
    pub fn n_stencils(&self) -> usize {
        self.stencils.iter().map(Vec::len).sum()
    }

    fn validate_stencil(&self, cell: usize, idx: usize, s: &Stencil) -> Result<(), WenoError> {
        for (j, m) in s.members.iter().enumerate() {
            match *m {
                MemberRef::Local(t) if t >= self.n_cells || t == cell => {
                    return Err(WenoError::InvalidMember {
                        cell,
                        stencil: idx,
                        member: j,
                        target: t,
                    });
                }
                MemberRef::Halo(slot) if slot >= self.halo_cells.len() => {
                    return Err(WenoError::InvalidMember {
                        cell,
                        stencil: idx,
                        member: j,
                        target: slot,
                    });
                }
                _ => {}
            }
        }
        if !s.usable {
            return Ok(());
        }
        let k = s.coefficient_len();
        let n = s.members.len();
        if n < k {
            return Err(WenoError::InsufficientMembers {
                cell,
                stencil: idx,
                members: n,
                required: k,
            });
        }
        if s.operator.shape() != (k, n) {
            return Err(WenoError::OperatorShape {
                cell,
                stencil: idx,
                rows: s.operator.nrows(),
                cols: s.operator.ncols(),
                expected_rows: k,
                expected_cols: n,
            });
        }
        if s.oscillation.shape() != (k, k) {
            return Err(WenoError::OscillationShape {
                cell,
                stencil: idx,
                rows: s.oscillation.nrows(),
                cols: s.oscillation.ncols(),
                expected: k,
            });
        }
        Ok(())
    }
}

impl DebugInvariants for StencilCatalog {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "StencilCatalog");
    }

    fn validate_invariants(&self) -> Result<(), WenoError> {
        if self.stencils.len() != self.n_cells {
            return Err(WenoError::FieldSizeMismatch {
                expected: self.n_cells,
                got: self.stencils.len(),
            });
        }
        for (cell, list) in self.stencils.iter().enumerate() {
            let mut reference: Option<&PolynomialBasis> = None;
            for (idx, s) in list.iter().enumerate() {
                self.validate_stencil(cell, idx, s)?;
                if !s.usable {
                    continue;
                }
                match reference {
                    None => reference = Some(&s.basis),
                    Some(b) if b.exponents() != s.basis.exponents() => {
                        return Err(WenoError::InconsistentBasis {
                            cell,
                            stencil: idx,
                            expected: b.dims(),
                            got: s.dims(),
                        });
                    }
                    _ => {}
                }
            }
            if reference.is_none() {
                return Err(WenoError::NoUsableStencil { cell });
            }
        }
        Ok(())
    }
}
