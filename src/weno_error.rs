//! WenoError: Unified error type for weno-sieve public APIs
//!
//! Every fallible operation in the crate returns this type. Variants that
//! concern a stencil always carry the cell and stencil index so that a broken
//! catalog or mesh can be diagnosed from the error alone.

use thiserror::Error;

/// Unified error type for WENO reconstruction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WenoError {
    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Dimensionality triple not usable with the requested order or mesh dimension.
    #[error("Invalid dimensionality {dims:?} for order {order}: {reason}")]
    InvalidDimensionality {
        dims: [usize; 3],
        order: usize,
        reason: &'static str,
    },
    /// A stencil's dimensionality triple is unusable on this mesh.
    #[error("Cell {cell}, stencil {stencil}: dimensionality {dims:?} rejected: {reason}")]
    StencilDims {
        cell: usize,
        stencil: usize,
        dims: [usize; 3],
        reason: &'static str,
    },
    /// Cell index outside the local partition.
    #[error("Unknown cell {cell} (partition has {n_cells} cells)")]
    UnknownCell { cell: usize, n_cells: usize },
    /// Stencil index outside the cell's stencil list.
    #[error("Unknown stencil {stencil} for cell {cell}")]
    UnknownStencil { cell: usize, stencil: usize },
    /// A stencil member references an invalid local cell.
    #[error("Cell {cell}, stencil {stencil}: member {member} references invalid local cell {target}")]
    InvalidMember {
        cell: usize,
        stencil: usize,
        member: usize,
        target: usize,
    },
    /// A usable stencil has fewer members than coefficients to determine.
    #[error("Cell {cell}, stencil {stencil}: {members} members cannot determine {required} coefficients")]
    InsufficientMembers {
        cell: usize,
        stencil: usize,
        members: usize,
        required: usize,
    },
    /// Least-squares operator shape inconsistent with basis size and member count.
    #[error(
        "Cell {cell}, stencil {stencil}: operator is {rows}x{cols}, expected {expected_rows}x{expected_cols}"
    )]
    OperatorShape {
        cell: usize,
        stencil: usize,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    /// Oscillation matrix not square with the coefficient length.
    #[error("Cell {cell}, stencil {stencil}: oscillation matrix is {rows}x{cols}, expected {expected}x{expected}")]
    OscillationShape {
        cell: usize,
        stencil: usize,
        rows: usize,
        cols: usize,
        expected: usize,
    },
    /// Usable stencils of one cell disagree on the monomial basis.
    #[error("Cell {cell}, stencil {stencil}: dimensionality {got:?}, other stencils of the cell use {expected:?}")]
    InconsistentBasis {
        cell: usize,
        stencil: usize,
        expected: [usize; 3],
        got: [usize; 3],
    },
    /// A cell has no usable stencil at all.
    #[error("Cell {cell} has no usable stencil")]
    NoUsableStencil { cell: usize },
    /// The weight combiner was handed no candidate stencils.
    #[error("Cannot blend an empty set of candidate stencils")]
    EmptyBlend,
    /// A stencil member has no value in the field or halo cache of the pass.
    #[error("Cell {cell}, stencil {stencil}: no value for member {member}")]
    MissingMemberValue {
        cell: usize,
        stencil: usize,
        member: usize,
    },
    /// An excluded stencil was asked to produce coefficients.
    #[error("Cell {cell}, stencil {stencil} is excluded and cannot be solved")]
    ExcludedStencil { cell: usize, stencil: usize },
    /// Coefficient vector length does not match the basis.
    #[error("Coefficient vector has length {got}, basis has {expected} monomials")]
    CoefficientLength { expected: usize, got: usize },
    /// Moment array too small for the basis caps.
    #[error("Moment array extents {extents:?} cannot hold caps {dims:?}")]
    MomentShape { extents: [usize; 3], dims: [usize; 3] },
    /// A halo cell could not be resolved (stale partition map).
    #[error("Halo cell {cell} on rank {rank} is unreachable")]
    UnreachableHalo { rank: usize, cell: usize },
    /// Field data does not cover the local partition.
    #[error("Field has {got} entries, expected {expected}")]
    FieldSizeMismatch { expected: usize, got: usize },
    /// A message from a neighbor had an unexpected byte length.
    #[error("Buffer size mismatch from rank {neighbor}: expected {expected} bytes, got {got}")]
    BufferSizeMismatch {
        neighbor: usize,
        expected: usize,
        got: usize,
    },
    /// Point-to-point communication with a neighbor failed.
    #[error("Communication error with rank {neighbor}: {message}")]
    CommError { neighbor: usize, message: String },
}
