//! Request phase: remote cells grouped by owning rank.

use std::collections::BTreeMap;

use crate::stencil::StencilCatalog;

/// One requested remote cell and the halo slot its value fills.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HaloEntry {
    /// Cell index in the owner's local numbering.
    pub cell: usize,
    /// Catalog halo slot.
    pub slot: usize,
}

/// Every remote cell the catalog references, batched per owning rank.
///
/// Ranks iterate in ascending order and entries of one rank are sorted by
/// cell, so two partitions always agree on the order of a request list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HaloRequestSet {
    by_rank: BTreeMap<usize, Vec<HaloEntry>>,
    n_slots: usize,
}

impl HaloRequestSet {
    pub fn collect(catalog: &StencilCatalog) -> Self {
        let mut by_rank: BTreeMap<usize, Vec<HaloEntry>> = BTreeMap::new();
        for (slot, rc) in catalog.halo_cells().iter().enumerate() {
            by_rank.entry(rc.rank).or_default().push(HaloEntry {
                cell: rc.cell,
                slot,
            });
        }
        for entries in by_rank.values_mut() {
            entries.sort_unstable_by_key(|e| e.cell);
        }
        Self {
            by_rank,
            n_slots: catalog.halo_cells().len(),
        }
    }

    /// Owning ranks, ascending.
    pub fn ranks(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_rank.keys().copied()
    }

    /// Requests addressed to `rank` (empty if none).
    pub fn entries(&self, rank: usize) -> &[HaloEntry] {
        self.by_rank.get(&rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[HaloEntry])> {
        self.by_rank.iter().map(|(&r, e)| (r, e.as_slice()))
    }

    /// Number of halo slots filled by one exchange.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_slots
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_slots == 0
    }
}
