//! Polynomial basis: monomial ordering, moment arrays and Taylor evaluation.

pub mod basis;
pub mod moments;

pub use basis::{MeshDim, PolynomialBasis};
pub use moments::MomentArray;
