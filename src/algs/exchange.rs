//! Symmetric exchange of fixed-size wire records with every neighbor.
//!
//! Posts all receives, then all sends, then waits for every receive. The first
//! error is remembered but never returned early: every send handle is drained
//! before the function returns, so no buffer is dropped while in flight.

use std::collections::{BTreeMap, BTreeSet};

use bytemuck::Pod;

use crate::algs::communicator::{CommTag, Communicator, Wait};
use crate::algs::wire::{cast_slice, cast_slice_mut};
use crate::weno_error::WenoError;

/// Send `outgoing[nbr]` to every neighbor and receive `expected[nbr]` records
/// back. Neighbors without outgoing data receive an empty message, and
/// neighbors without an expected count are expected to send nothing.
pub fn exchange_records<T, C>(
    comm: &C,
    tag: CommTag,
    outgoing: &BTreeMap<usize, Vec<T>>,
    expected: &BTreeMap<usize, usize>,
    neighbors: &BTreeSet<usize>,
) -> Result<BTreeMap<usize, Vec<T>>, WenoError>
where
    T: Pod,
    C: Communicator,
{
    // 1) post all receives
    let mut recv: BTreeMap<usize, (C::RecvHandle, Vec<T>)> = BTreeMap::new();
    for &nbr in neighbors {
        let n_items = expected.get(&nbr).copied().unwrap_or(0);
        let mut buffer = vec![T::zeroed(); n_items];
        let h = comm.irecv(nbr, tag.as_u16(), cast_slice_mut(&mut buffer));
        recv.insert(nbr, (h, buffer));
    }

    // 2) post all sends and keep buffers alive until completion
    let empty: Vec<T> = Vec::new();
    let mut pending_sends = Vec::with_capacity(neighbors.len());
    for &nbr in neighbors {
        let items = outgoing.get(&nbr).unwrap_or(&empty);
        pending_sends.push(comm.isend(nbr, tag.as_u16(), cast_slice(items)));
    }

    // 3) wait for all recvs (but do not early-return)
    let mut received = BTreeMap::new();
    let mut maybe_err = None;
    for (nbr, (h, mut buffer)) in recv {
        let want = std::mem::size_of_val(buffer.as_slice());
        match h.wait() {
            Some(data) if data.len() == want => {
                if maybe_err.is_none() {
                    cast_slice_mut(&mut buffer).copy_from_slice(&data);
                    received.insert(nbr, buffer);
                }
            }
            Some(data) if maybe_err.is_none() => {
                maybe_err = Some(WenoError::BufferSizeMismatch {
                    neighbor: nbr,
                    expected: want,
                    got: data.len(),
                });
            }
            None if maybe_err.is_none() => {
                maybe_err = Some(WenoError::CommError {
                    neighbor: nbr,
                    message: format!("no data received from rank {nbr} (tag {})", tag.as_u16()),
                });
            }
            _ => {} // already have an error; just drain
        }
    }

    // 4) always drain all send handles before returning
    for send in pending_sends {
        let _ = send.wait();
    }

    match maybe_err {
        Some(err) => Err(err),
        None => Ok(received),
    }
}
