//! Field model: value kinds, per-cell storage and tagged dispatch.

pub mod cell_field;
pub mod tagged;
pub mod value;

pub use cell_field::CellField;
pub use tagged::{TaggedCoefficients, TaggedField};
pub use value::{FieldKind, FieldValue, SphericalTensor3, SymmTensor3, Tensor3, Vector3};
