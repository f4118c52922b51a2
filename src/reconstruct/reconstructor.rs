//! One WENO reconstruction pass over a partition.
//!
//! A pass gathers the halo once, then fits, scores and blends the stencils of
//! every cell independently. The per-cell phase only reads the shared catalog
//! and the frozen halo cache, so it runs as a parallel-for with the `rayon`
//! feature and as a plain loop without it; both give identical output.

use std::sync::Arc;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::WenoConfig;
use crate::debug_invariants::DebugInvariants;
use crate::field::{CellField, FieldValue, TaggedCoefficients, TaggedField};
use crate::halo::{HaloCache, HaloGatherer, HaloTransport};
use crate::reconstruct::coefficients::CoefficientSection;
use crate::reconstruct::smoothness::component_indicators;
use crate::reconstruct::solver::StencilSolver;
use crate::reconstruct::weights::{Blend, StencilFit, WeightCombiner};
use crate::stencil::StencilCatalog;
use crate::weno_error::WenoError;

/// Fits and blend of a single cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellReconstruction<V> {
    pub cell: usize,
    /// One fit per usable stencil, in stencil order.
    pub fits: Vec<StencilFit<V>>,
    pub blend: Blend<V>,
}

/// Owns the shared catalog, the expert factors and the halo gatherer.
#[derive(Debug)]
pub struct WenoReconstructor<T> {
    catalog: Arc<StencilCatalog>,
    config: WenoConfig,
    combiner: WeightCombiner,
    gatherer: HaloGatherer<T>,
}

impl<T: HaloTransport> WenoReconstructor<T> {
    pub fn new(
        catalog: Arc<StencilCatalog>,
        config: WenoConfig,
        transport: T,
    ) -> Result<Self, WenoError> {
        let combiner = config.combiner()?;
        catalog.debug_assert_invariants();
        if config.pol_order != catalog.order() {
            return Err(WenoError::InvalidConfig(format!(
                "pol_order {} does not match catalog order {}",
                config.pol_order,
                catalog.order()
            )));
        }
        log::info!(
            "Reconstruction using WENO{} ({}D version)",
            config.pol_order,
            catalog.mesh_dim().as_usize()
        );
        let gatherer = HaloGatherer::new(&catalog, transport);
        Ok(Self {
            catalog,
            config,
            combiner,
            gatherer,
        })
    }

    /// Exchange halo cell centers along with the values.
    pub fn with_halo_centers(mut self, on: bool) -> Self {
        self.gatherer = self.gatherer.with_centers(on);
        self
    }

    pub fn catalog(&self) -> &Arc<StencilCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &WenoConfig {
        &self.config
    }

    pub fn combiner(&self) -> &WeightCombiner {
        &self.combiner
    }

    pub fn gatherer(&self) -> &HaloGatherer<T> {
        &self.gatherer
    }

    fn check_len<V: FieldValue>(&self, field: &CellField<V>) -> Result<(), WenoError> {
        if field.len() != self.catalog.n_cells() {
            return Err(WenoError::FieldSizeMismatch {
                expected: self.catalog.n_cells(),
                got: field.len(),
            });
        }
        Ok(())
    }

    /// Run the halo round of a pass on its own.
    pub fn gather_halo<V: FieldValue>(
        &mut self,
        field: &CellField<V>,
    ) -> Result<HaloCache<V>, WenoError> {
        self.check_len(field)?;
        self.gatherer.gather(&self.catalog, field)
    }

    /// Blended coefficients of every local cell.
    pub fn reconstruct<V: FieldValue>(
        &mut self,
        field: &CellField<V>,
    ) -> Result<CoefficientSection<V>, WenoError> {
        let halo = self.gather_halo(field)?;
        log::debug!(
            "WENO pass {}: {} cells, {} halo values from {} ranks ({})",
            self.gatherer.passes(),
            self.catalog.n_cells(),
            halo.len(),
            self.gatherer.requests().ranks().count(),
            V::KIND.as_str()
        );

        let catalog = &*self.catalog;
        let combiner = self.combiner;
        let values = field.values();

        #[cfg(feature = "rayon")]
        let per_cell: Result<Vec<Vec<V>>, WenoError> = (0..catalog.n_cells())
            .into_par_iter()
            .map(|cell| {
                fit_cell(catalog, &combiner, cell, values, &halo).map(|r| r.blend.coefficients)
            })
            .collect();
        #[cfg(not(feature = "rayon"))]
        let per_cell: Result<Vec<Vec<V>>, WenoError> = (0..catalog.n_cells())
            .map(|cell| {
                fit_cell(catalog, &combiner, cell, values, &halo).map(|r| r.blend.coefficients)
            })
            .collect();

        Ok(CoefficientSection::from_cells(per_cell?))
    }

    /// Fits, indicators and weights of one cell, given an already gathered halo.
    pub fn reconstruct_cell<V: FieldValue>(
        &self,
        cell: usize,
        field: &CellField<V>,
        halo: &HaloCache<V>,
    ) -> Result<CellReconstruction<V>, WenoError> {
        self.check_len(field)?;
        fit_cell(&self.catalog, &self.combiner, cell, field.values(), halo)
    }

    /// Reconstruct a field of any supported kind.
    pub fn reconstruct_tagged(
        &mut self,
        field: &TaggedField,
    ) -> Result<TaggedCoefficients, WenoError> {
        Ok(match field {
            TaggedField::Scalar(f) => TaggedCoefficients::Scalar(self.reconstruct(f)?),
            TaggedField::Vector(f) => TaggedCoefficients::Vector(self.reconstruct(f)?),
            TaggedField::Tensor(f) => TaggedCoefficients::Tensor(self.reconstruct(f)?),
            TaggedField::SymmTensor(f) => TaggedCoefficients::SymmTensor(self.reconstruct(f)?),
            TaggedField::SphericalTensor(f) => {
                TaggedCoefficients::SphericalTensor(self.reconstruct(f)?)
            }
        })
    }
}

fn fit_cell<V: FieldValue>(
    catalog: &StencilCatalog,
    combiner: &WeightCombiner,
    cell: usize,
    values: &[V],
    halo: &HaloCache<V>,
) -> Result<CellReconstruction<V>, WenoError> {
    let solver = StencilSolver::new(catalog);
    let fits = catalog
        .usable_stencils(cell)?
        .map(|(idx, st)| {
            let coefficients = solver.solve(cell, idx, values, halo)?;
            let indicators = component_indicators(st.oscillation(), &coefficients);
            Ok(StencilFit {
                stencil: idx,
                coefficients,
                indicators,
            })
        })
        .collect::<Result<Vec<_>, WenoError>>()?;
    let blend = combiner.combine(&fits)?;
    Ok(CellReconstruction { cell, fits, blend })
}
