//! Edge flip in triangle meshes.

#[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::handle::SimplexHandle;
use crate::topology::operation::plan::flip_plan;
use crate::topology::operation::{FlipRejection, TopologyOperation};

impl TopologyOperation<'_> {
    /// Opposite vertices of the two triangles on `edge`, or why the edge
    /// cannot be flipped.
    fn flip_quad(&self, edge: SimplexHandle) -> Result<[usize; 2], FlipRejection> {
        let mesh = self.mesh();
        if mesh.top_dim() != 2 {
            return Err(FlipRejection::UnsupportedDimension(mesh.top_dim()));
        }
        assert_eq!(edge.dim(), 1, "{edge} is not an edge");
        mesh.assert_live(edge);
        let tris = mesh.par_co_boundary(edge);
        if tris.len() != 2 {
            return Err(FlipRejection::BoundaryEdge(tris.len()));
        }
        let ends = mesh.boundary(edge);
        let mut opposite = [0usize; 2];
        for (slot, &t) in opposite.iter_mut().zip(tris) {
            match mesh.get_other_verts(t, ends).as_slice() {
                [o] => *slot = o.idx(),
                other => unreachable!("triangle {t} has {} vertices off its edge", other.len()),
            }
        }
        if opposite[0] == opposite[1] {
            return Err(FlipRejection::DegenerateQuad(opposite[0]));
        }
        Ok(opposite)
    }

    /// Whether `edge` can be replaced by the other diagonal of its quad.
    ///
    /// The diagonal test only counts live edges; a tombstoned diagonal is
    /// simply resurrected by the flip.
    pub fn is_edge_flip_ok(&self, edge: SimplexHandle) -> Result<(), FlipRejection> {
        let [o0, o1] = self.flip_quad(edge)?;
        if self.mesh().get_live_handle(&[o0, o1]).is_some() {
            let mut diag = [o0, o1];
            diag.sort_unstable();
            return Err(FlipRejection::DiagonalExists(diag));
        }
        Ok(())
    }

    /// Replace `edge` and its two triangles by the other diagonal of the
    /// quad and the two triangles on it. Returns the new edge.
    ///
    /// # Errors
    /// [`MeshError::FlipRejected`] if [`is_edge_flip_ok`](Self::is_edge_flip_ok)
    /// refuses; the mesh is unchanged in that case.
    pub fn flip_edge(&mut self, edge: SimplexHandle) -> Result<SimplexHandle, MeshError> {
        if let Err(reason) = self.is_edge_flip_ok(edge) {
            log::warn!("edge flip of {edge} rejected: {reason}");
            return Err(reason.into());
        }
        let removal = self.del_top_simplex(edge);
        for cell in flip_plan(&removal.verts, &removal.other_verts) {
            self.mesh.new_top_simplex(&cell)?;
        }
        let diagonal: Vec<usize> = removal.other_verts.concat();
        let flipped = self
            .mesh
            .get_live_handle(&diagonal)
            .unwrap_or_else(|| unreachable!("diagonal {diagonal:?} not built by the flip"));
        crate::debug_invariants!(self.mesh.validate_invariants(), "flip_edge");
        Ok(flipped)
    }
}
