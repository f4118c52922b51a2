//! Per-cell reconstruction: stencil solves, smoothness indicators, nonlinear
//! weights and the pass driver that ties them together.

pub mod coefficients;
pub mod reconstructor;
pub mod smoothness;
pub mod solver;
pub mod weights;

pub use coefficients::CoefficientSection;
pub use reconstructor::{CellReconstruction, WenoReconstructor};
pub use smoothness::{component_indicators, smoothness_indicator};
pub use solver::{StencilSolver, solve_stencil};
pub use weights::{Blend, Candidate, ScalarBlend, StencilFit, WeightCombiner};
