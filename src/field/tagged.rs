//! Tagged field storage: one variant per supported value kind.

use crate::field::cell_field::CellField;
use crate::field::value::{FieldKind, SphericalTensor3, SymmTensor3, Tensor3, Vector3};
use crate::reconstruct::coefficients::CoefficientSection;

/// A cell field of any supported value kind.
#[derive(Clone, Debug)]
pub enum TaggedField {
    Scalar(CellField<f64>),
    Vector(CellField<Vector3>),
    Tensor(CellField<Tensor3>),
    SymmTensor(CellField<SymmTensor3>),
    SphericalTensor(CellField<SphericalTensor3>),
}

impl TaggedField {
    pub fn kind(&self) -> FieldKind {
        match self {
            TaggedField::Scalar(_) => FieldKind::Scalar,
            TaggedField::Vector(_) => FieldKind::Vector,
            TaggedField::Tensor(_) => FieldKind::Tensor,
            TaggedField::SymmTensor(_) => FieldKind::SymmTensor,
            TaggedField::SphericalTensor(_) => FieldKind::SphericalTensor,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            TaggedField::Scalar(f) => f.len(),
            TaggedField::Vector(f) => f.len(),
            TaggedField::Tensor(f) => f.len(),
            TaggedField::SymmTensor(f) => f.len(),
            TaggedField::SphericalTensor(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Blended coefficients matching the variant of the reconstructed field.
#[derive(Clone, Debug)]
pub enum TaggedCoefficients {
    Scalar(CoefficientSection<f64>),
    Vector(CoefficientSection<Vector3>),
    Tensor(CoefficientSection<Tensor3>),
    SymmTensor(CoefficientSection<SymmTensor3>),
    SphericalTensor(CoefficientSection<SphericalTensor3>),
}

impl TaggedCoefficients {
    pub fn kind(&self) -> FieldKind {
        match self {
            TaggedCoefficients::Scalar(_) => FieldKind::Scalar,
            TaggedCoefficients::Vector(_) => FieldKind::Vector,
            TaggedCoefficients::Tensor(_) => FieldKind::Tensor,
            TaggedCoefficients::SymmTensor(_) => FieldKind::SymmTensor,
            TaggedCoefficients::SphericalTensor(_) => FieldKind::SphericalTensor,
        }
    }

    /// Component `c` of the coefficients of `cell`, as plain scalars.
    pub fn component(&self, cell: usize, c: usize) -> Option<Vec<f64>> {
        match self {
            TaggedCoefficients::Scalar(s) => s.component(cell, c),
            TaggedCoefficients::Vector(s) => s.component(cell, c),
            TaggedCoefficients::Tensor(s) => s.component(cell, c),
            TaggedCoefficients::SymmTensor(s) => s.component(cell, c),
            TaggedCoefficients::SphericalTensor(s) => s.component(cell, c),
        }
    }
}
