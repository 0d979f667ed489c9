//! Top-level module for the simplicial topology.
//!
//! This module provides:
//! - [`SimplexHandle`] and the per-simplex [`SimplexStatus`] bits
//! - the entity store ([`Simplex`], [`SimplexManager`]) and the topological index
//! - [`TopologyKernel`], which builds, queries, deletes and compacts simplices
//! - the validity oracle over raw cell lists
//! - local remeshing operations through [`TopologyOperation`]
//!
//! Most users will build a [`TopologyKernel`] and drive it through
//! [`TopologyOperation`].

pub mod handle;
pub mod index;
pub mod invariants;
pub mod kernel;
pub mod operation;
pub mod simplex;
pub mod simplex_manager;
pub mod status;
pub mod traversal;
pub mod validation;

pub use handle::SimplexHandle;
pub use kernel::{CompactionReport, Coord, TopologyKernel};
pub use operation::TopologyOperation;
pub use simplex::Simplex;
pub use simplex_manager::SimplexManager;
pub use status::SimplexStatus;
