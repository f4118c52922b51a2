//! Halo values of one reconstruction pass.

use crate::field::FieldValue;
use crate::weno_error::WenoError;

/// Field value (and optionally center) of every halo slot.
#[derive(Clone, Debug, PartialEq)]
pub struct HaloCache<V> {
    pub(crate) values: Vec<V>,
    pub(crate) centers: Option<Vec<[f64; 3]>>,
}

impl<V: FieldValue> HaloCache<V> {
    /// Cache of a partition without halo cells.
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            centers: None,
        }
    }

    pub fn from_values(values: Vec<V>) -> Self {
        Self {
            values,
            centers: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, slot: usize) -> Result<V, WenoError> {
        self.values.get(slot).copied().ok_or(WenoError::FieldSizeMismatch {
            expected: slot + 1,
            got: self.values.len(),
        })
    }

    /// Center of the halo cell, if centers were exchanged.
    pub fn center(&self, slot: usize) -> Option<[f64; 3]> {
        self.centers.as_ref().and_then(|c| c.get(slot).copied())
    }
}
