mod util;
use util::*;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use weno_sieve::halo::HaloRequestSet;
use weno_sieve::prelude::*;

fn smooth_and_jump(c: [f64; 3]) -> f64 {
    let jump = if c[0] > 3.0 { 1.5 } else { 0.0 };
    (0.4 * c[0]).sin() + 0.3 * c[1] + jump
}

#[test]
fn two_ranks_match_the_serial_pass() {
    let grid = Grid::new(6, 4, 2);
    let global = grid.sample(smooth_and_jump);

    let mut serial =
        WenoReconstructor::new(Arc::new(grid.catalog()), WenoConfig::new(2), SerialTransport)
            .unwrap();
    let serial = serial.reconstruct(&CellField::new(global.clone())).unwrap();

    let parts = grid.partitioned(2);
    assert!(parts.iter().all(|(cat, _)| !cat.halo_cells().is_empty()));
    let comms = rayons(2);

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = comms
            .iter()
            .cloned()
            .zip(&parts)
            .map(|(comm, (catalog, cells))| {
                let global = &global;
                s.spawn(move || {
                    let mut weno = WenoReconstructor::new(
                        Arc::new(catalog.clone()),
                        WenoConfig::new(2),
                        CommTransport::new(comm),
                    )
                    .unwrap();
                    let field = CellField::new(cells.iter().map(|&g| global[g]).collect());
                    // second pass runs on a fresh tag epoch
                    let first = weno.reconstruct(&field).unwrap();
                    let second = weno.reconstruct(&field).unwrap();
                    assert_eq!(first, second);
                    assert_eq!(weno.gatherer().passes(), 2);
                    second
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for ((_, cells), section) in parts.iter().zip(&results) {
        for (local, &g) in cells.iter().enumerate() {
            let got = section.get(local).unwrap();
            let want = serial.get(g).unwrap();
            for (a, b) in got.iter().zip(want) {
                assert_close(*a, *b, 1e-12);
            }
        }
    }
}

#[test]
fn halo_centers_travel_with_values() {
    let grid = Grid::new(4, 2, 1);
    let parts = grid.partitioned(2);
    let comms = rayons(2);

    let caches: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = comms
            .iter()
            .cloned()
            .zip(&parts)
            .map(|(comm, (catalog, cells))| {
                let grid = &grid;
                s.spawn(move || {
                    let mut weno = WenoReconstructor::new(
                        Arc::new(catalog.clone()),
                        WenoConfig::new(1),
                        CommTransport::new(comm),
                    )
                    .unwrap()
                    .with_halo_centers(true);
                    let field = CellField::new(cells.iter().map(|&g| g as f64).collect())
                        .with_centers(cells.iter().map(|&g| grid.center(g)).collect())
                        .unwrap();
                    let cache = weno.gather_halo(&field).unwrap();
                    (catalog.halo_cells().to_vec(), cache)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (slots, cache) in &caches {
        assert_eq!(cache.len(), slots.len());
        for (slot, rc) in slots.iter().enumerate() {
            let g = parts[rc.rank].1[rc.cell];
            assert_eq!(cache.value(slot).unwrap(), g as f64);
            assert_eq!(cache.center(slot), Some(grid.center(g)));
        }
    }
}

/// Serial transport that counts its rounds.
#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
}

impl HaloTransport for Counting {
    fn exchange(
        &self,
        requests: &HaloRequestSet,
        stride: usize,
        local: &[f64],
    ) -> Result<BTreeMap<usize, Vec<f64>>, WenoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SerialTransport.exchange(requests, stride, local)
    }
}

#[test]
fn one_exchange_per_pass_even_without_requests() {
    let grid = Grid::new(4, 4, 1);
    let counter = Counting::default();
    let mut weno =
        WenoReconstructor::new(Arc::new(grid.catalog()), WenoConfig::new(1), &counter).unwrap();
    assert!(weno.gatherer().requests().is_empty());

    let field = CellField::new(grid.sample(smooth_and_jump));
    for pass in 1..=3 {
        weno.reconstruct(&field).unwrap();
        assert_eq!(counter.calls.load(Ordering::SeqCst), pass);
    }
    weno.reconstruct_tagged(&TaggedField::Scalar(field)).unwrap();
    assert_eq!(counter.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn unreachable_halo_fails_the_pass() {
    let grid = Grid::new(4, 2, 1);
    let (catalog, cells) = grid.partitioned(2).swap_remove(0);
    let mut weno =
        WenoReconstructor::new(Arc::new(catalog), WenoConfig::new(1), SerialTransport).unwrap();
    let field = CellField::new(vec![0.0; cells.len()]);
    assert!(matches!(
        weno.reconstruct(&field),
        Err(WenoError::UnreachableHalo { rank: 1, .. })
    ));
}
