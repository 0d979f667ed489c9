//! Mesh I/O: bulk load/store of a [`TopologyKernel`](crate::topology::kernel::TopologyKernel)
//! and the binary matrix container used to persist it.
//!
//! A mesh travels as two matrices: a `3 × N` coordinate matrix and a
//! `(d+1) × M` table of top-cell vertex ids, one column per entity.

pub mod matrix;
pub mod mesh;

pub use matrix::{DenseMatrix, decode_matrix, encode_matrix, read_matrix, write_matrix};
pub use mesh::{
    TetMesh, WriteOptions, read_mesh, remove_extra_nodes, tet_mesh_read, tet_mesh_write,
    write_mesh,
};
