//! Exchange phase: one transport round per pass fills a [`HaloCache`].

use crate::field::{CellField, FieldValue};
use crate::halo::cache::HaloCache;
use crate::halo::request::HaloRequestSet;
use crate::halo::transport::HaloTransport;
use crate::stencil::StencilCatalog;
use crate::weno_error::WenoError;

/// Owns the request set of a catalog and the transport that serves it.
#[derive(Debug)]
pub struct HaloGatherer<T> {
    requests: HaloRequestSet,
    transport: T,
    with_centers: bool,
    passes: u64,
}

impl<T: HaloTransport> HaloGatherer<T> {
    pub fn new(catalog: &StencilCatalog, transport: T) -> Self {
        Self {
            requests: HaloRequestSet::collect(catalog),
            transport,
            with_centers: false,
            passes: 0,
        }
    }

    /// Also exchange cell centers. The gathered field must carry centers.
    pub fn with_centers(mut self, on: bool) -> Self {
        self.with_centers = on;
        self
    }

    pub fn requests(&self) -> &HaloRequestSet {
        &self.requests
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Completed exchange rounds.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run one exchange and unpack the reply into slot order.
    pub fn gather<V: FieldValue>(
        &mut self,
        catalog: &StencilCatalog,
        field: &CellField<V>,
    ) -> Result<HaloCache<V>, WenoError> {
        if catalog.halo_cells().len() != self.requests.len() {
            return Err(WenoError::InvalidConfig(format!(
                "halo gatherer built for {} slots, catalog has {}",
                self.requests.len(),
                catalog.halo_cells().len()
            )));
        }
        let stride = V::N_COMPONENTS + if self.with_centers { 3 } else { 0 };
        let local = field.pack(self.with_centers)?;
        let reply = self.transport.exchange(&self.requests, stride, &local)?;
        self.passes += 1;

        let mut values = vec![V::default(); self.requests.len()];
        let mut centers = self.with_centers.then(|| vec![[0.0; 3]; self.requests.len()]);
        for (rank, entries) in self.requests.iter() {
            let Some(records) = reply.get(&rank) else {
                return Err(WenoError::UnreachableHalo {
                    rank,
                    cell: entries.first().map_or(0, |e| e.cell),
                });
            };
            if records.len() != entries.len() * stride {
                return Err(WenoError::BufferSizeMismatch {
                    neighbor: rank,
                    expected: entries.len() * stride,
                    got: records.len(),
                });
            }
            for (entry, rec) in entries.iter().zip(records.chunks_exact(stride)) {
                values[entry.slot] = V::from_components(&rec[..V::N_COMPONENTS]);
                if let Some(cs) = centers.as_mut() {
                    cs[entry.slot].copy_from_slice(&rec[V::N_COMPONENTS..]);
                }
            }
        }
        Ok(HaloCache { values, centers })
    }
}
