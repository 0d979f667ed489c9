//! Local remeshing: vertex insertion, edge collapse and edge flip.
//!
//! Each operation runs its validity predicate first and returns a rejection
//! without touching the mesh if it fails. Once the predicate passes, the
//! operation removes the star of some simplex with
//! [`TopologyOperation::del_top_simplex`] and rebuilds top cells from a
//! [`plan`]. Between those two steps the mesh is intentionally incomplete;
//! the borrow on the kernel keeps anyone else from observing it.

pub mod collapse;
pub mod flip;
pub mod insert;
pub mod plan;

use thiserror::Error;

use crate::topology::handle::SimplexHandle;
use crate::topology::kernel::TopologyKernel;
use crate::topology::validation::ManifoldViolation;

pub use plan::InsertCase;

/// Why `is_edge_collapse_ok` refused an edge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollapseRejection {
    #[error("edge collapse needs a 2-D or 3-D mesh, top dimension is {0}")]
    UnsupportedDimension(usize),
    /// A simplex in the link of both endpoints is not in the link of the edge.
    #[error("link condition fails on {0:?}")]
    LinkCondition(Vec<usize>),
    /// The cells around the edge are not a manifold patch to begin with.
    #[error("neighbourhood is not a manifold patch: {0}")]
    Neighborhood(ManifoldViolation),
    /// The cells after the collapse would not be a manifold patch.
    #[error("collapsed neighbourhood is not a manifold patch: {0}")]
    Collapsed(ManifoldViolation),
    /// Every cell around the edge would disappear.
    #[error("collapse would leave no cells around the kept vertex")]
    EmptyResult,
}

/// Why `is_edge_flip_ok` refused an edge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlipRejection {
    #[error("edge flip needs a triangle mesh, top dimension is {0}")]
    UnsupportedDimension(usize),
    #[error("edge borders {0} triangles, a flip needs exactly 2")]
    BoundaryEdge(usize),
    #[error("both triangles share the opposite vertex {0}")]
    DegenerateQuad(usize),
    #[error("diagonal {0:?} already exists")]
    DiagonalExists([usize; 2]),
}

/// Result of [`TopologyOperation::del_top_simplex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Sorted vertex ids of the removed target.
    pub verts: Vec<usize>,
    /// For each removed top cell, its vertex ids outside `verts`, sorted.
    pub other_verts: Vec<Vec<usize>>,
}

/// Exclusive handle for mutating a kernel.
pub struct TopologyOperation<'a> {
    mesh: &'a mut TopologyKernel,
}

impl<'a> TopologyOperation<'a> {
    pub fn new(mesh: &'a mut TopologyKernel) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &TopologyKernel {
        &*self.mesh
    }

    /// Remove `target` together with every top cell around it.
    ///
    /// Records what each removed top cell retains outside `target` so the
    /// caller can rebuild. Surviving faces are unlinked from the removed
    /// cells and everything containing `target` is tombstoned.
    pub fn del_top_simplex(&mut self, target: SimplexHandle) -> Removal {
        let mesh = &mut *self.mesh;
        mesh.assert_live(target);
        let target_verts = mesh.vertex_handles(target);
        let top = mesh.top_dim();
        let adj_top = if target.dim() == top {
            vec![target]
        } else {
            mesh.get_k_co_boundary_simplex(target, top)
        };
        let other_verts = adj_top
            .iter()
            .map(|&cell| {
                let mut ids: Vec<usize> = mesh
                    .get_other_verts(cell, &target_verts)
                    .iter()
                    .map(|v| v.idx())
                    .collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        mesh.del_simplex(target);
        let mut verts: Vec<usize> = target_verts.iter().map(|v| v.idx()).collect();
        verts.sort_unstable();
        Removal { verts, other_verts }
    }
}
