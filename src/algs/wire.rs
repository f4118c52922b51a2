//! Fixed, little-endian wire records for halo exchange.

use bytemuck::{Pod, Zeroable};

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

pub fn cast_slice_mut<T: Pod>(v: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(v)
}

/// All multi-byte values in these structs are **little-endian** on the wire.
/// We store them pre-LE with `.to_le()` and decode with `.from_le()`.

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32, // count of following records
}
impl WireCount {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u32).to_le(),
        }
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

/// A cell index in the owner's local numbering.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireCell {
    pub id_le: u64,
}
impl WireCell {
    pub fn of(cell: usize) -> Self {
        Self {
            id_le: (cell as u64).to_le(),
        }
    }
    pub fn get(&self) -> usize {
        u64::from_le(self.id_le) as usize
    }
}

/// One `f64` field component, carried as its bit pattern.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireScalar {
    pub bits_le: u64,
}
impl WireScalar {
    pub fn of(v: f64) -> Self {
        Self {
            bits_le: v.to_bits().to_le(),
        }
    }
    pub fn get(&self) -> f64 {
        f64::from_bits(u64::from_le(self.bits_le))
    }
}

/// Reply header: whether the owner could serve every requested cell.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireStatus {
    pub missing_le: u64, // u64::MAX when all cells were found
}
impl WireStatus {
    const ALL_FOUND: u64 = u64::MAX;

    pub fn ok() -> Self {
        Self {
            missing_le: Self::ALL_FOUND.to_le(),
        }
    }
    pub fn missing(cell: usize) -> Self {
        Self {
            missing_le: (cell as u64).to_le(),
        }
    }
    /// First cell the owner could not serve, if any.
    pub fn missing_cell(&self) -> Option<usize> {
        match u64::from_le(self.missing_le) {
            Self::ALL_FOUND => None,
            c => Some(c as usize),
        }
    }
}

static_assertions::assert_eq_size!(WireCount, u32);
static_assertions::assert_eq_size!(WireCell, u64);
static_assertions::assert_eq_size!(WireScalar, u64);
static_assertions::assert_eq_size!(WireStatus, u64);
