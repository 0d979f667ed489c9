//! Vertex insertion into a top cell or one of its faces.

#[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::handle::SimplexHandle;
use crate::topology::kernel::Coord;
use crate::topology::operation::TopologyOperation;
use crate::topology::operation::plan::{InsertCase, insert_plan};

impl TopologyOperation<'_> {
    /// Split `target` (any live simplex of dimension ≥ 1) by a new vertex at
    /// `coord`, rebuilding every top cell around it as a cone over the new
    /// vertex. Returns the new vertex.
    ///
    /// # Errors
    /// [`MeshError::UnsupportedSimplex`] when the mesh's top dimension is
    /// outside 1..=3 or the target is too deep to split.
    ///
    /// # Panics
    /// If `target` is a vertex or not live.
    pub fn insert_vertex(
        &mut self,
        target: SimplexHandle,
        coord: Coord,
    ) -> Result<SimplexHandle, MeshError> {
        assert!(target.dim() > 0, "cannot insert a vertex into vertex {target}");
        self.mesh.assert_live(target);
        let top = self.mesh.top_dim();
        let Some(case) = InsertCase::classify(target.dim(), top) else {
            return Err(MeshError::UnsupportedSimplex(top));
        };

        let v = self.mesh.new_vert(coord);
        let removal = self.del_top_simplex(target);
        let cells = insert_plan(case, v.idx(), &removal.verts, &removal.other_verts);
        log::trace!("insert {v} into {target} ({case:?}): {} cells", cells.len());
        for cell in &cells {
            self.mesh.new_top_simplex(cell)?;
        }
        crate::debug_invariants!(self.mesh.validate_invariants(), "insert_vertex");
        Ok(v)
    }
}
