//! Blended coefficients of every cell in one contiguous buffer.

use crate::field::FieldValue;
use crate::weno_error::WenoError;

/// Offset-indexed storage: cell `c` owns `data[offsets[c]..offsets[c + 1]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientSection<V> {
    offsets: Vec<usize>,
    data: Vec<V>,
}

impl<V: FieldValue> CoefficientSection<V> {
    /// Concatenate per-cell coefficient vectors in cell order.
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Vec<V>>,
    {
        let mut offsets = vec![0];
        let mut data = Vec::new();
        for coeffs in cells {
            data.extend(coeffs);
            offsets.push(data.len());
        }
        Self { offsets, data }
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coefficients of `cell` in basis order.
    pub fn get(&self, cell: usize) -> Result<&[V], WenoError> {
        if cell >= self.len() {
            return Err(WenoError::UnknownCell {
                cell,
                n_cells: self.len(),
            });
        }
        Ok(&self.data[self.offsets[cell]..self.offsets[cell + 1]])
    }

    /// `(cell, coefficients)` in cell order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[V])> + '_ {
        self.offsets
            .windows(2)
            .enumerate()
            .map(|(c, w)| (c, &self.data[w[0]..w[1]]))
    }

    /// Component `c` of every coefficient of `cell`.
    pub fn component(&self, cell: usize, c: usize) -> Option<Vec<f64>> {
        if c >= V::N_COMPONENTS {
            return None;
        }
        let coeffs = self.get(cell).ok()?;
        Some(coeffs.iter().map(|v| v.component(c)).collect())
    }

    /// All coefficients, cell after cell.
    pub fn as_flat_slice(&self) -> &[V] {
        &self.data
    }
}
