//! Assembly of a [`StencilCatalog`] from data supplied by the mesh provider.

use std::collections::HashMap;

use nalgebra::DMatrix;

use crate::debug_invariants::DebugInvariants;
use crate::polynomial::{MeshDim, PolynomialBasis};
use crate::stencil::catalog::{Stencil, StencilCatalog};
use crate::stencil::member::{Member, MemberRef, RemoteCell};
use crate::weno_error::WenoError;

/// Raw description of one stencil.
#[derive(Clone, Debug)]
pub struct StencilSpec {
    pub members: Vec<Member>,
    pub dims: [usize; 3],
    pub operator: DMatrix<f64>,
    pub oscillation: DMatrix<f64>,
    pub usable: bool,
}

impl StencilSpec {
    pub fn new(
        members: Vec<Member>,
        dims: [usize; 3],
        operator: DMatrix<f64>,
        oscillation: DMatrix<f64>,
    ) -> Self {
        Self {
            members,
            dims,
            operator,
            oscillation,
            usable: true,
        }
    }

    /// Flag the stencil unusable for its cell (e.g. too few neighbors near a
    /// boundary). Excluded stencils are kept for indexing but never solved.
    pub fn excluded(mut self) -> Self {
        self.usable = false;
        self
    }
}

/// Incremental builder; `build` validates and freezes the catalog.
#[derive(Clone, Debug)]
pub struct StencilCatalogBuilder {
    n_cells: usize,
    mesh_dim: MeshDim,
    order: usize,
    specs: Vec<Vec<StencilSpec>>,
}

impl StencilCatalogBuilder {
    pub fn new(n_cells: usize, mesh_dim: MeshDim, order: usize) -> Self {
        Self {
            n_cells,
            mesh_dim,
            order,
            specs: vec![Vec::new(); n_cells],
        }
    }

    /// Append a stencil to `cell` and return its index. The first stencil
    /// added to a cell is its central stencil.
    pub fn add_stencil(&mut self, cell: usize, spec: StencilSpec) -> Result<usize, WenoError> {
        let n_cells = self.n_cells;
        let list = self
            .specs
            .get_mut(cell)
            .ok_or(WenoError::UnknownCell { cell, n_cells })?;
        list.push(spec);
        Ok(list.len() - 1)
    }

    fn check_dims(&self, cell: usize, stencil: usize, dims: [usize; 3]) -> Result<(), WenoError> {
        let reject = |reason: &'static str| -> Result<(), WenoError> {
            Err(WenoError::StencilDims {
                cell,
                stencil,
                dims,
                reason,
            })
        };
        if self.mesh_dim == MeshDim::Two && dims[2] != 0 {
            return reject("2D mesh requires dz = 0");
        }
        if dims.iter().any(|&d| d > self.order) {
            return reject("axis cap exceeds polynomial order");
        }
        if dims.iter().all(|&d| d == 0) {
            return reject("no monomials available");
        }
        Ok(())
    }

    /// Intern halo members, build bases and validate every stencil.
    pub fn build(self) -> Result<StencilCatalog, WenoError> {
        if self.order < 1 {
            return Err(WenoError::InvalidConfig(format!(
                "catalog order must be >= 1, got {}",
                self.order
            )));
        }
        let mut slots: HashMap<RemoteCell, usize> = HashMap::new();
        let mut halo_cells = Vec::new();
        let mut stencils = Vec::with_capacity(self.n_cells);

        for (cell, list) in self.specs.iter().enumerate() {
            let mut built = Vec::with_capacity(list.len());
            for (idx, spec) in list.iter().enumerate() {
                self.check_dims(cell, idx, spec.dims)?;
                let members = spec
                    .members
                    .iter()
                    .map(|m| match *m {
                        Member::Local(c) => MemberRef::Local(c),
                        Member::Halo { rank, cell } => {
                            let rc = RemoteCell { rank, cell };
                            let slot = *slots.entry(rc).or_insert_with(|| {
                                halo_cells.push(rc);
                                halo_cells.len() - 1
                            });
                            MemberRef::Halo(slot)
                        }
                    })
                    .collect();
                built.push(Stencil {
                    members,
                    basis: PolynomialBasis::new(self.order, spec.dims)?,
                    operator: spec.operator.clone(),
                    oscillation: spec.oscillation.clone(),
                    usable: spec.usable,
                });
            }
            stencils.push(built);
        }

        let catalog = StencilCatalog {
            n_cells: self.n_cells,
            mesh_dim: self.mesh_dim,
            order: self.order,
            stencils,
            halo_cells,
        };
        catalog.validate_invariants()?;
        log::debug!(
            "stencil catalog: {} cells, {} stencils, {} halo cells",
            catalog.n_cells(),
            catalog.n_stencils(),
            catalog.halo_cells().len()
        );
        Ok(catalog)
    }
}
