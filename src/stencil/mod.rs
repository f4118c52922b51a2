//! Stencil catalog: per-cell candidate stencils and their precomputed operators.

pub mod builder;
pub mod catalog;
pub mod member;

pub use builder::{StencilCatalogBuilder, StencilSpec};
pub use catalog::{CENTRAL_STENCIL, Stencil, StencilCatalog};
pub use member::{Member, MemberRef, RemoteCell};
