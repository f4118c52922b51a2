#![cfg_attr(docsrs, feature(doc_cfg))]
//! # weno-sieve
//!
//! weno-sieve computes WENO (weighted essentially non-oscillatory) polynomial
//! reconstructions of cell fields on partitioned unstructured meshes. Each cell
//! carries a central stencil and several sectorial stencils with precomputed
//! least-squares operators; their Taylor fits are blended with nonlinear,
//! smoothness-dependent weights.
//!
//! ## Features
//! - Monomial bases for 2D and 3D meshes with flatten/unflatten of moment arrays
//! - A validated, read-only [`StencilCatalog`](stencil::StencilCatalog) shared through `Arc`
//! - Two-phase halo exchange: batched requests, then one exchange per pass
//! - Scalar, vector and tensor fields through one generic per-component routine
//! - Optional Rayon parallel-for over cells (`rayon` feature)
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! weno-sieve = "0.1"
//! # features = ["rayon"]
//! ```
//!
//! A pass looks like:
//!
//! ```ignore
//! let catalog = Arc::new(builder.build()?);
//! let mut weno = WenoReconstructor::new(catalog, WenoConfig::new(2), SerialTransport)?;
//! let coeffs = weno.reconstruct(&CellField::new(values))?;
//! ```

pub mod algs;
pub mod config;
pub mod debug_invariants;
pub mod field;
pub mod halo;
pub mod linalg;
pub mod polynomial;
pub mod reconstruct;
pub mod stencil;
pub mod weno_error;

pub use debug_invariants::DebugInvariants;
pub use weno_error::WenoError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{Communicator, NoComm, RayonComm};
    pub use crate::config::WenoConfig;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::field::{
        CellField, FieldKind, FieldValue, SphericalTensor3, SymmTensor3, TaggedCoefficients,
        TaggedField, Tensor3, Vector3,
    };
    pub use crate::halo::{CommTransport, HaloCache, HaloTransport, SerialTransport};
    pub use crate::linalg::DMatrix;
    pub use crate::polynomial::{MeshDim, MomentArray, PolynomialBasis};
    pub use crate::reconstruct::{CoefficientSection, WeightCombiner, WenoReconstructor};
    pub use crate::stencil::{Member, StencilCatalog, StencilCatalogBuilder, StencilSpec};
    pub use crate::weno_error::WenoError;
}
