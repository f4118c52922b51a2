//! Per-cell field values of one partition.

use crate::field::value::FieldValue;
use crate::weno_error::WenoError;

/// Field values of the local cells, optionally with cell centers.
#[derive(Clone, Debug, PartialEq)]
pub struct CellField<V> {
    values: Vec<V>,
    centers: Option<Vec<[f64; 3]>>,
}

impl<V: FieldValue> CellField<V> {
    pub fn new(values: Vec<V>) -> Self {
        Self {
            values,
            centers: None,
        }
    }

    /// Attach cell centers, one per value.
    pub fn with_centers(mut self, centers: Vec<[f64; 3]>) -> Result<Self, WenoError> {
        if centers.len() != self.values.len() {
            return Err(WenoError::FieldSizeMismatch {
                expected: self.values.len(),
                got: centers.len(),
            });
        }
        self.centers = Some(centers);
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    #[inline]
    pub fn centers(&self) -> Option<&[[f64; 3]]> {
        self.centers.as_deref()
    }

    /// Checked value lookup.
    pub fn try_value(&self, cell: usize) -> Result<V, WenoError> {
        self.values
            .get(cell)
            .copied()
            .ok_or(WenoError::UnknownCell {
                cell,
                n_cells: self.values.len(),
            })
    }

    /// Flat buffer of `stride`-sized records: components, then the center
    /// when `with_centers` is set.
    pub(crate) fn pack(&self, with_centers: bool) -> Result<Vec<f64>, WenoError> {
        let centers = if with_centers {
            Some(self.centers.as_deref().ok_or_else(|| {
                WenoError::InvalidConfig("halo centers requested but field carries none".into())
            })?)
        } else {
            None
        };
        let stride = V::N_COMPONENTS + if with_centers { 3 } else { 0 };
        let mut out = Vec::with_capacity(self.values.len() * stride);
        for (i, v) in self.values.iter().enumerate() {
            out.extend((0..V::N_COMPONENTS).map(|c| v.component(c)));
            if let Some(cs) = centers {
                out.extend_from_slice(&cs[i]);
            }
        }
        Ok(out)
    }
}
