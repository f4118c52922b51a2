//! Dense linear algebra used to apply precomputed stencil operators.

pub mod dense;

pub use dense::{from_rows, quadratic_form};
pub use nalgebra::DMatrix;
