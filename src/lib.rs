#![cfg_attr(docsrs, feature(doc_cfg))]
//! # simplex-mesh
//!
//! simplex-mesh is an in-memory store for 1-, 2- and 3-dimensional simplicial
//! complexes. Every vertex, edge, triangle and tetrahedron is a first-class
//! entity with deduplicated boundary and co-boundary incidence, addressed by a
//! compact `(dimension, index)` [`SimplexHandle`](topology::SimplexHandle).
//!
//! ## Features
//! - Arena storage per dimension with tombstoning and explicit compaction
//! - Typed, named attribute columns attached per dimension at runtime
//! - Boundary, co-boundary, adjacency and opposite-vertex queries
//! - Manifold-preserving vertex insertion, edge collapse and edge flip
//! - A standalone validity oracle over raw tetrahedron/triangle lists
//! - Bulk load/store through dense matrices and a small binary container
//!
//! ## Handles and compaction
//!
//! Handles stay valid across insertions and deletions. Only
//! [`TopologyKernel::garbage_collector`](topology::TopologyKernel::garbage_collector)
//! renumbers entities; every handle taken before it must be discarded.
//!
//! ## Threading
//!
//! The kernel is single-writer. To share one mesh between threads wrap it in
//! [`sync::SharedMesh`], which serializes all access behind one lock.
//!
//! ## Invariant checks
//!
//! Debug builds validate the kernel after every mutation. Enable the
//! `check-invariants` or `strict-invariants` feature to keep those checks in
//! release builds.

pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod sync;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use mesh_error::MeshError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::simplex_property::PropertyId;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{DenseMatrix, WriteOptions, read_mesh, write_mesh};
    pub use crate::mesh_error::MeshError;
    pub use crate::sync::SharedMesh;
    pub use crate::topology::operation::{CollapseRejection, FlipRejection, Removal};
    pub use crate::topology::validation::{
        ManifoldCheckOptions, ManifoldViolation, check_manifold, is_manifold,
    };
    pub use crate::topology::{
        CompactionReport, Coord, SimplexHandle, SimplexStatus, TopologyKernel, TopologyOperation,
    };
}
