//! Stencil member references: local cells and interned halo slots.

use std::fmt;

/// A cell owned by another partition, named by the owner's local index.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct RemoteCell {
    pub rank: usize,
    pub cell: usize,
}

impl fmt::Display for RemoteCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.cell, self.rank)
    }
}

/// Member as supplied by the mesh provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Member {
    Local(usize),
    Halo { rank: usize, cell: usize },
}

/// Member as stored in the catalog. Halo members point into the catalog's
/// halo slot table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MemberRef {
    Local(usize),
    Halo(usize),
}

impl MemberRef {
    #[inline]
    pub fn is_halo(self) -> bool {
        matches!(self, MemberRef::Halo(_))
    }
}
