#![allow(dead_code)]
use nalgebra::DMatrix;
use weno_sieve::{
    algs::communicator::RayonComm,
    polynomial::{MeshDim, PolynomialBasis},
    stencil::{Member, StencilCatalog, StencilCatalogBuilder, StencilSpec},
};

/// Index of a stencil in the lists built by [`Grid`].
pub const CENTRAL: usize = 0;
pub const EAST: usize = 1;
pub const WEST: usize = 2;
pub const NORTH: usize = 3;
pub const SOUTH: usize = 4;

/// Structured `nx x ny` grid of unit cells on a 2D mesh.
///
/// Every cell gets five stencils: a central block of Chebyshev radius
/// `order`, then the east, west, north and south half-blocks of the same
/// radius. Operators are point-sampled least-squares pseudoinverses, so a
/// polynomial of degree `<= order` sampled at the centers is fitted exactly.
/// Stencils that cannot determine the basis are flagged excluded.
#[derive(Clone, Copy, Debug)]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
    pub order: usize,
}

impl Grid {
    pub fn new(nx: usize, ny: usize, order: usize) -> Self {
        Self { nx, ny, order }
    }

    pub fn n_cells(&self) -> usize {
        self.nx * self.ny
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    pub fn ij(&self, g: usize) -> (usize, usize) {
        (g % self.nx, g / self.nx)
    }

    pub fn center(&self, g: usize) -> [f64; 3] {
        let (i, j) = self.ij(g);
        [i as f64 + 0.5, j as f64 + 0.5, 0.0]
    }

    /// Caps of every stencil; a single row collapses the y axis.
    pub fn dims(&self) -> [usize; 3] {
        if self.ny == 1 {
            [self.order, 0, 0]
        } else {
            MeshDim::Two.full_caps(self.order)
        }
    }

    pub fn basis(&self) -> PolynomialBasis {
        PolynomialBasis::new(self.order, self.dims()).unwrap()
    }

    /// Global member cells of every stencil of `g`, in stencil order.
    pub fn stencil_cells(&self, g: usize) -> Vec<Vec<usize>> {
        let (i, j) = self.ij(g);
        let r = self.order as isize;
        let (i, j) = (i as isize, j as isize);
        let block = |di: std::ops::RangeInclusive<isize>, dj: std::ops::RangeInclusive<isize>| {
            let mut out = Vec::new();
            for b in dj.clone() {
                for a in di.clone() {
                    let (x, y) = (i + a, j + b);
                    if (a, b) != (0, 0)
                        && x >= 0
                        && y >= 0
                        && (x as usize) < self.nx
                        && (y as usize) < self.ny
                    {
                        out.push(self.index(x as usize, y as usize));
                    }
                }
            }
            out
        };
        vec![
            block(-r..=r, -r..=r),
            block(1..=r, -r..=r),
            block(-r..=-1, -r..=r),
            block(-r..=r, 1..=r),
            block(-r..=r, -r..=-1),
        ]
    }

    /// Stencil of `g` over `members`, each member mapped through `owner`.
    pub fn spec(
        &self,
        g: usize,
        members: &[usize],
        owner: impl Fn(usize) -> Member,
    ) -> StencilSpec {
        let basis = self.basis();
        let k = basis.len();
        let c0 = self.center(g);
        let rows: Vec<Vec<f64>> = members
            .iter()
            .map(|&m| {
                let c = self.center(m);
                let d = [c[0] - c0[0], c[1] - c0[1], c[2] - c0[2]];
                basis
                    .exponents()
                    .iter()
                    .map(|&[n, m, l]| {
                        d[0].powi(n as i32) * d[1].powi(m as i32) * d[2].powi(l as i32)
                    })
                    .collect()
            })
            .collect();
        let mapped: Vec<Member> = members.iter().map(|&m| owner(m)).collect();
        match pseudoinverse(&rows, k) {
            Some(a) => StencilSpec::new(mapped, self.dims(), a, DMatrix::identity(k, k)),
            None => StencilSpec::new(
                mapped,
                self.dims(),
                DMatrix::zeros(k, members.len()),
                DMatrix::identity(k, k),
            )
            .excluded(),
        }
    }

    /// The five stencils of `g` with every member local.
    pub fn cell_specs(&self, g: usize) -> Vec<StencilSpec> {
        self.stencil_cells(g)
            .iter()
            .map(|cells| self.spec(g, cells, Member::Local))
            .collect()
    }

    /// Single-partition catalog of the whole grid.
    pub fn catalog(&self) -> StencilCatalog {
        let mut b = StencilCatalogBuilder::new(self.n_cells(), MeshDim::Two, self.order);
        for g in 0..self.n_cells() {
            for spec in self.cell_specs(g) {
                b.add_stencil(g, spec).unwrap();
            }
        }
        b.build().unwrap()
    }

    /// Owning rank of every cell when columns are split evenly over `n_ranks`.
    pub fn owner_rank(&self, g: usize, n_ranks: usize) -> usize {
        let (i, _) = self.ij(g);
        (i * n_ranks / self.nx).min(n_ranks - 1)
    }

    /// Per-rank catalogs and local-to-global cell maps.
    pub fn partitioned(&self, n_ranks: usize) -> Vec<(StencilCatalog, Vec<usize>)> {
        let owned: Vec<Vec<usize>> = (0..n_ranks)
            .map(|r| {
                (0..self.n_cells())
                    .filter(|&g| self.owner_rank(g, n_ranks) == r)
                    .collect()
            })
            .collect();
        let mut local_of = vec![0; self.n_cells()];
        for cells in &owned {
            for (l, &g) in cells.iter().enumerate() {
                local_of[g] = l;
            }
        }
        owned
            .iter()
            .enumerate()
            .map(|(rank, cells)| {
                let owner = |m: usize| {
                    let r = self.owner_rank(m, n_ranks);
                    if r == rank {
                        Member::Local(local_of[m])
                    } else {
                        Member::Halo {
                            rank: r,
                            cell: local_of[m],
                        }
                    }
                };
                let mut b = StencilCatalogBuilder::new(cells.len(), MeshDim::Two, self.order);
                for (l, &g) in cells.iter().enumerate() {
                    for st in self.stencil_cells(g) {
                        b.add_stencil(l, self.spec(g, &st, owner)).unwrap();
                    }
                }
                (b.build().unwrap(), cells.clone())
            })
            .collect()
    }

    /// Point samples of `f` at every cell center.
    pub fn sample(&self, f: impl Fn([f64; 3]) -> f64) -> Vec<f64> {
        (0..self.n_cells()).map(|g| f(self.center(g))).collect()
    }
}

/// Least-squares pseudoinverse of the `n x k` matrix given by `rows`, or
/// `None` when the matrix does not have full column rank.
pub fn pseudoinverse(rows: &[Vec<f64>], k: usize) -> Option<DMatrix<f64>> {
    if rows.len() < k {
        return None;
    }
    let m = DMatrix::from_fn(rows.len(), k, |i, j| rows[i][j]);
    if m.rank(1e-10) < k {
        return None;
    }
    m.pseudo_inverse(f64::EPSILON * 100.0).ok()
}

/// `size` connected in-process ranks.
pub fn rayons(size: usize) -> Vec<RayonComm> {
    RayonComm::world(size)
}

pub fn assert_close(got: f64, want: f64, tol: f64) {
    assert!(
        (got - want).abs() <= tol * want.abs().max(1.0),
        "got={got} want={want} tol={tol}"
    );
}
