//! Halo transports: the one blocking exchange of a reconstruction pass.
//!
//! A transport receives the batched request set and the packed local field
//! (`stride` scalars per cell) and returns, for every rank that was asked,
//! the requested records in request order.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU16, Ordering};

use crate::algs::communicator::{CommTag, Communicator, HaloCommTags};
use crate::algs::exchange::exchange_records;
use crate::algs::wire::{WireCell, WireCount, WireScalar, WireStatus};
use crate::halo::request::HaloRequestSet;
use crate::weno_error::WenoError;

/// Start of the tag window reserved for halo exchange rounds; see
/// [`HaloCommTags::WINDOW`].
pub const HALO_BASE_TAG: CommTag = CommTag::new(0x4000);

/// Moves halo records between partitions.
pub trait HaloTransport: Send + Sync {
    /// Serve `local` to peers and fetch the records listed in `requests`.
    ///
    /// Called exactly once per pass by every partition, including those that
    /// request nothing. The reply holds `entries(rank).len() * stride` values
    /// per requested rank.
    fn exchange(
        &self,
        requests: &HaloRequestSet,
        stride: usize,
        local: &[f64],
    ) -> Result<BTreeMap<usize, Vec<f64>>, WenoError>;
}

impl<T: HaloTransport + ?Sized> HaloTransport for &T {
    fn exchange(
        &self,
        requests: &HaloRequestSet,
        stride: usize,
        local: &[f64],
    ) -> Result<BTreeMap<usize, Vec<f64>>, WenoError> {
        (**self).exchange(requests, stride, local)
    }
}

fn first_unreachable(requests: &HaloRequestSet, rank: usize) -> WenoError {
    let cell = requests.entries(rank).first().map_or(0, |e| e.cell);
    WenoError::UnreachableHalo { rank, cell }
}

/// Single-partition transport: there is nobody to ask.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialTransport;

impl HaloTransport for SerialTransport {
    fn exchange(
        &self,
        requests: &HaloRequestSet,
        _stride: usize,
        _local: &[f64],
    ) -> Result<BTreeMap<usize, Vec<f64>>, WenoError> {
        match requests.ranks().next() {
            Some(rank) => Err(first_unreachable(requests, rank)),
            None => Ok(BTreeMap::new()),
        }
    }
}

/// Halo exchange over a [`Communicator`].
///
/// Every neighbor takes part in every round, also when nothing is requested
/// from it, so both sides always post matching sends and receives. A round
/// runs four stages (counts, cell ids, status, values) on its own tag epoch.
#[derive(Debug)]
pub struct CommTransport<C> {
    comm: C,
    neighbors: BTreeSet<usize>,
    base: CommTag,
    epoch: AtomicU16,
}

impl<C: Communicator> CommTransport<C> {
    /// Every other rank of the communicator is a neighbor.
    pub fn new(comm: C) -> Self {
        let me = comm.rank();
        let neighbors = (0..comm.size()).filter(|&r| r != me).collect();
        Self {
            comm,
            neighbors,
            base: HALO_BASE_TAG,
            epoch: AtomicU16::new(0),
        }
    }

    /// Restrict the exchange to `neighbors`. Both sides of every pair must
    /// list each other.
    pub fn with_neighbors(mut self, neighbors: impl IntoIterator<Item = usize>) -> Self {
        let me = self.comm.rank();
        self.neighbors = neighbors.into_iter().filter(|&r| r != me).collect();
        self
    }

    pub fn with_base_tag(mut self, base: CommTag) -> Self {
        self.base = base;
        self
    }

    pub fn comm(&self) -> &C {
        &self.comm
    }

    pub fn neighbors(&self) -> &BTreeSet<usize> {
        &self.neighbors
    }

    fn serve(
        &self,
        asked: &BTreeMap<usize, Vec<WireCell>>,
        stride: usize,
        local: &[f64],
    ) -> (BTreeMap<usize, Vec<WireStatus>>, BTreeMap<usize, Vec<WireScalar>>) {
        let n_local = local.len() / stride.max(1);
        let mut status = BTreeMap::new();
        let mut values = BTreeMap::new();
        for (&nbr, cells) in asked {
            let mut st = WireStatus::ok();
            let mut out = Vec::with_capacity(cells.len() * stride);
            for wc in cells {
                let cell = wc.get();
                if cell < n_local {
                    let rec = &local[cell * stride..(cell + 1) * stride];
                    out.extend(rec.iter().map(|&v| WireScalar::of(v)));
                } else {
                    log::warn!(
                        "rank {} asked rank {} for cell {} (only {} local cells)",
                        nbr,
                        self.comm.rank(),
                        cell,
                        n_local
                    );
                    if st.missing_cell().is_none() {
                        st = WireStatus::missing(cell);
                    }
                    out.extend(std::iter::repeat_n(WireScalar::of(f64::NAN), stride));
                }
            }
            status.insert(nbr, vec![st]);
            values.insert(nbr, out);
        }
        (status, values)
    }
}

impl<C: Communicator> HaloTransport for CommTransport<C> {
    fn exchange(
        &self,
        requests: &HaloRequestSet,
        stride: usize,
        local: &[f64],
    ) -> Result<BTreeMap<usize, Vec<f64>>, WenoError> {
        // setup errors are returned only after all four stages have run
        let me = self.comm.rank();
        let mut deferred = requests
            .ranks()
            .find(|&r| r >= self.comm.size() || r == me || !self.neighbors.contains(&r))
            .map(|r| first_unreachable(requests, r));
        if deferred.is_none() && stride > 0 && local.len() % stride != 0 {
            deferred = Some(WenoError::FieldSizeMismatch {
                expected: local.len().div_ceil(stride) * stride,
                got: local.len(),
            });
        }

        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed);
        let tags = HaloCommTags::for_epoch(self.base, epoch);
        let one_each: BTreeMap<usize, usize> = self.neighbors.iter().map(|&n| (n, 1)).collect();

        // 1) how many cells each side wants
        let counts_out: BTreeMap<usize, Vec<WireCount>> = self
            .neighbors
            .iter()
            .map(|&n| (n, vec![WireCount::new(requests.entries(n).len())]))
            .collect();
        let counts_in =
            exchange_records(&self.comm, tags.sizes, &counts_out, &one_each, &self.neighbors)?;

        // 2) which cells
        let ids_out: BTreeMap<usize, Vec<WireCell>> = requests
            .iter()
            .map(|(r, entries)| (r, entries.iter().map(|e| WireCell::of(e.cell)).collect()))
            .collect();
        let ids_expected: BTreeMap<usize, usize> = counts_in
            .iter()
            .map(|(&n, c)| (n, c.first().map_or(0, WireCount::get)))
            .collect();
        let asked = exchange_records(
            &self.comm,
            tags.requests,
            &ids_out,
            &ids_expected,
            &self.neighbors,
        )?;

        // 3) serve, then status and values
        let (status_out, values_out) = self.serve(&asked, stride, local);
        let status_in =
            exchange_records(&self.comm, tags.status, &status_out, &one_each, &self.neighbors)?;
        let values_expected: BTreeMap<usize, usize> = self
            .neighbors
            .iter()
            .map(|&n| (n, requests.entries(n).len() * stride))
            .collect();
        let values_in = exchange_records(
            &self.comm,
            tags.values,
            &values_out,
            &values_expected,
            &self.neighbors,
        )?;

        if let Some(err) = deferred {
            return Err(err);
        }
        for rank in requests.ranks() {
            let missing = status_in
                .get(&rank)
                .and_then(|s| s.first())
                .and_then(WireStatus::missing_cell);
            if let Some(cell) = missing {
                return Err(WenoError::UnreachableHalo { rank, cell });
            }
        }

        Ok(requests
            .ranks()
            .map(|rank| {
                let vals = values_in
                    .get(&rank)
                    .map(|v| v.iter().map(WireScalar::get).collect())
                    .unwrap_or_default();
                (rank, vals)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::{NoComm, RayonComm};
    use crate::polynomial::MeshDim;
    use crate::stencil::{Member, StencilCatalogBuilder, StencilSpec};
    use nalgebra::DMatrix;

    fn requesting(members: Vec<Member>) -> HaloRequestSet {
        let n = members.len();
        let mut b = StencilCatalogBuilder::new(1, MeshDim::Two, 1);
        b.add_stencil(
            0,
            StencilSpec::new(members, [1, 0, 0], DMatrix::zeros(1, n), DMatrix::identity(1, 1)),
        )
        .unwrap();
        HaloRequestSet::collect(&b.build().unwrap())
    }

    #[test]
    fn serial_rejects_any_request() {
        let req = requesting(vec![Member::Halo { rank: 1, cell: 5 }]);
        assert_eq!(
            SerialTransport.exchange(&req, 1, &[0.0]).unwrap_err(),
            WenoError::UnreachableHalo { rank: 1, cell: 5 }
        );
        assert!(SerialTransport
            .exchange(&HaloRequestSet::default(), 1, &[0.0])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn rank_outside_communicator_is_unreachable() {
        let req = requesting(vec![Member::Halo { rank: 3, cell: 0 }]);
        let t = CommTransport::new(NoComm);
        assert!(matches!(
            t.exchange(&req, 1, &[1.0]),
            Err(WenoError::UnreachableHalo { rank: 3, .. })
        ));
    }

    #[test]
    fn two_ranks_serve_each_other() {
        let comms = RayonComm::world(2);
        let out: Vec<_> = std::thread::scope(|s| {
            let hs: Vec<_> = comms
                .iter()
                .cloned()
                .map(|comm| {
                    s.spawn(move || {
                        let me = comm.rank();
                        let t = CommTransport::new(comm);
                        // rank 0 asks for cell 1 of rank 1; rank 1 asks for nothing
                        let req = if me == 0 {
                            requesting(vec![Member::Halo { rank: 1, cell: 1 }])
                        } else {
                            HaloRequestSet::default()
                        };
                        let local = [10.0 * me as f64, 10.0 * me as f64 + 1.0];
                        // two rounds to exercise epoch tags
                        t.exchange(&req, 1, &local).unwrap();
                        t.exchange(&req, 1, &local).unwrap()
                    })
                })
                .collect();
            hs.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(out[0][&1], vec![11.0]);
        assert!(out[1].is_empty());
    }

    #[test]
    fn bad_request_fails_locally_without_stalling_peers() {
        let comms = RayonComm::world(2);
        let out: Vec<_> = std::thread::scope(|s| {
            let hs: Vec<_> = comms
                .iter()
                .cloned()
                .map(|comm| {
                    s.spawn(move || {
                        let me = comm.rank();
                        let t = CommTransport::new(comm);
                        let req = if me == 0 {
                            requesting(vec![Member::Halo { rank: 5, cell: 3 }])
                        } else {
                            HaloRequestSet::default()
                        };
                        let first = t.exchange(&req, 1, &[1.0]);
                        // the next round still lines up on both ranks
                        let second = t.exchange(&HaloRequestSet::default(), 1, &[1.0]);
                        (first, second)
                    })
                })
                .collect();
            hs.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(
            out[0].0.clone().unwrap_err(),
            WenoError::UnreachableHalo { rank: 5, cell: 3 }
        );
        assert!(out[1].0.as_ref().unwrap().is_empty());
        assert!(out[0].1.is_ok() && out[1].1.is_ok());
    }

    #[test]
    fn missing_remote_cell_fails_on_requester() {
        let comms = RayonComm::world(2);
        let out: Vec<_> = std::thread::scope(|s| {
            let hs: Vec<_> = comms
                .iter()
                .cloned()
                .map(|comm| {
                    s.spawn(move || {
                        let me = comm.rank();
                        let t = CommTransport::new(comm);
                        let req = if me == 0 {
                            requesting(vec![Member::Halo { rank: 1, cell: 42 }])
                        } else {
                            HaloRequestSet::default()
                        };
                        t.exchange(&req, 1, &[0.0])
                    })
                })
                .collect();
            hs.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(
            out[0].clone().unwrap_err(),
            WenoError::UnreachableHalo { rank: 1, cell: 42 }
        );
        assert!(out[1].is_ok());
    }
}
