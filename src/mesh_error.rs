//! MeshError: unified error type for simplex-mesh public APIs
//!
//! Precondition failures (bad handles, wrong arity, attribute type mismatch)
//! are programmer errors and panic. Everything a caller can reasonably
//! recover from, such as a rejected collapse or a malformed cell table, is
//! reported through [`MeshError`] and leaves the mesh untouched.

use thiserror::Error;

use crate::topology::handle::SimplexHandle;
use crate::topology::operation::{CollapseRejection, FlipRejection};
use crate::topology::validation::ManifoldViolation;

/// Unified error type for simplex-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The kernel only builds 1-, 2- and 3-dimensional simplicial complexes.
    #[error("unsupported top dimension {0} (expected 1, 2 or 3)")]
    UnsupportedSimplex(usize),
    /// A live top cell with this vertex set already exists.
    #[error("top simplex {0:?} already exists")]
    DuplicateSimplex(Vec<usize>),
    /// An attribute column of this name is already registered on the dimension.
    #[error("property `{name}` already exists on dimension {dim}")]
    DuplicateProperty { dim: usize, name: String },
    /// `is_edge_collapse_ok` refused the collapse.
    #[error("edge collapse rejected: {0}")]
    CollapseRejected(CollapseRejection),
    /// `is_edge_flip_ok` refused the flip.
    #[error("edge flip rejected: {0}")]
    FlipRejected(FlipRejection),
    /// The cell table cannot describe a simplicial complex.
    #[error("invalid cell table: {0}")]
    InvalidCellTable(String),
    /// A codimension-1 face of the cell table is shared by more than two cells.
    #[error("face {0:?} is shared by more than two cells")]
    NonManifoldInput(Vec<usize>),
    /// Candidate cells failed the validity oracle.
    #[error("manifold check failed: {0}")]
    Manifold(#[from] ManifoldViolation),
    /// A binary matrix header or payload is malformed.
    #[error("matrix format error: {0}")]
    MatrixFormat(String),
    /// Underlying file-system failure.
    #[error("I/O error: {0}")]
    Io(String),
    /// An incidence list references an entity that is tombstoned.
    #[error("{holder} references deleted simplex {target}")]
    DanglingReference {
        holder: SimplexHandle,
        target: SimplexHandle,
    },
    /// Boundary or co-boundary list breaks the structural rules of its dimension.
    #[error("malformed incidence at {0}: {1}")]
    MalformedIncidence(SimplexHandle, String),
    /// Topological index disagrees with the entity store.
    #[error("index mismatch for {handle}: {detail}")]
    IndexMismatch {
        handle: SimplexHandle,
        detail: String,
    },
    /// Attribute column length differs from the entity count of its dimension.
    #[error("property `{name}` on dimension {dim} has {len} slots for {expected} simplices")]
    PropertyLength {
        dim: usize,
        name: String,
        len: usize,
        expected: usize,
    },
}

impl From<std::io::Error> for MeshError {
    fn from(e: std::io::Error) -> Self {
        MeshError::Io(e.to_string())
    }
}

impl From<CollapseRejection> for MeshError {
    fn from(r: CollapseRejection) -> Self {
        MeshError::CollapseRejected(r)
    }
}

impl From<FlipRejection> for MeshError {
    fn from(r: FlipRejection) -> Self {
        MeshError::FlipRejected(r)
    }
}
