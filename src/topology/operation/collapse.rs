//! Edge collapse with link-condition and manifold pre-checks.

use std::collections::BTreeSet;

use itertools::Itertools;

#[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::handle::SimplexHandle;
use crate::topology::kernel::{Coord, TopologyKernel};
use crate::topology::operation::plan::{collapse_plan, substitute_vertex};
use crate::topology::operation::{CollapseRejection, TopologyOperation};
use crate::topology::validation::{ManifoldCheckOptions, check_manifold};

/// Endpoints of `edge` as `(removed, kept)`.
fn endpoints(mesh: &TopologyKernel, edge: SimplexHandle) -> (SimplexHandle, SimplexHandle) {
    assert_eq!(edge.dim(), 1, "{edge} is not an edge");
    mesh.assert_live(edge);
    let b = mesh.boundary(edge);
    (b[0], b[1])
}

/// Vertex ids of every live top cell around `v`.
fn star_cells(mesh: &TopologyKernel, v: SimplexHandle) -> Vec<Vec<usize>> {
    mesh.get_k_co_boundary_simplex(v, mesh.top_dim())
        .into_iter()
        .map(|c| mesh.vertex_ids(c))
        .collect()
}

/// Non-empty simplices `σ` with `σ ∪ centre` a cell face, from the cells
/// around `centre`.
fn link(cells: &[Vec<usize>], centre: &[usize]) -> BTreeSet<Vec<usize>> {
    let mut out = BTreeSet::new();
    for cell in cells {
        let rest: Vec<usize> = cell.iter().copied().filter(|v| !centre.contains(v)).collect();
        for k in 1..=rest.len() {
            out.extend(rest.iter().copied().combinations(k));
        }
    }
    out
}

impl TopologyOperation<'_> {
    /// Decide whether collapsing `edge` keeps the mesh a manifold.
    ///
    /// The edge must satisfy the link condition `Lk(a) ∩ Lk(b) ⊆ Lk(ab)`,
    /// and both the current cells around its endpoints and the cells they
    /// would become must pass the validity oracle.
    pub fn is_edge_collapse_ok(&self, edge: SimplexHandle) -> Result<(), CollapseRejection> {
        let mesh = self.mesh();
        let top = mesh.top_dim();
        if top != 2 && top != 3 {
            return Err(CollapseRejection::UnsupportedDimension(top));
        }
        let (a, b) = endpoints(mesh, edge);
        let cells_a = star_cells(mesh, a);
        let cells_b = star_cells(mesh, b);

        let cells_ab: Vec<Vec<usize>> = cells_a
            .iter()
            .filter(|c| c.contains(&b.idx()))
            .cloned()
            .collect();
        let link_ab = link(&cells_ab, &[a.idx(), b.idx()]);
        let link_b = link(&cells_b, &[b.idx()]);
        if let Some(bad) = link(&cells_a, &[a.idx()])
            .into_iter()
            .find(|s| link_b.contains(s) && !link_ab.contains(s))
        {
            log::debug!("collapse of {edge} fails the link condition on {bad:?}");
            return Err(CollapseRejection::LinkCondition(bad));
        }

        let neighborhood: Vec<Vec<usize>> = cells_a
            .iter()
            .chain(&cells_b)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        check_manifold(&neighborhood, ManifoldCheckOptions::neighborhood())
            .map_err(CollapseRejection::Neighborhood)?;

        let collapsed: Vec<Vec<usize>> = substitute_vertex(&neighborhood, a.idx(), b.idx())
            .into_iter()
            .collect();
        if collapsed.is_empty() {
            return Err(CollapseRejection::EmptyResult);
        }
        check_manifold(&collapsed, ManifoldCheckOptions::neighborhood())
            .map_err(CollapseRejection::Collapsed)?;
        Ok(())
    }

    /// Merge the endpoints of `edge` into its second vertex, moved to `coord`.
    ///
    /// Cells on the edge disappear; every other cell around the first vertex
    /// is rebuilt on the kept one (a rebuilt cell that already exists is left
    /// alone). Afterwards any face in the affected region that no longer
    /// bounds a top cell is tombstoned, and the traversal seeds of the
    /// remaining faces are pointed at cells that survived. Returns the kept
    /// vertex.
    ///
    /// # Errors
    /// [`MeshError::CollapseRejected`] if [`is_edge_collapse_ok`](Self::is_edge_collapse_ok)
    /// refuses; the mesh is unchanged in that case.
    pub fn collapse_edge(
        &mut self,
        edge: SimplexHandle,
        coord: Coord,
    ) -> Result<SimplexHandle, MeshError> {
        if let Err(reason) = self.is_edge_collapse_ok(edge) {
            log::warn!("edge collapse of {edge} rejected: {reason}");
            return Err(reason.into());
        }
        let (remove, keep) = endpoints(self.mesh, edge);
        let region = self.collapse_region(remove, keep);

        self.mesh.set_coord(keep, coord);
        let removal = self.del_top_simplex(remove);
        for cell in collapse_plan(keep.idx(), &removal.other_verts) {
            if self.mesh.get_live_handle(&cell).is_some() {
                log::trace!("collapse folds onto existing cell {cell:?}");
                continue;
            }
            self.mesh.new_top_simplex(&cell)?;
        }
        let swept = self.settle_region(&region);
        if swept > 0 {
            log::debug!("collapse of {edge} removed {swept} orphaned simplices");
        }
        crate::debug_invariants!(self.mesh.validate_invariants(), "collapse_edge");
        Ok(keep)
    }

    /// Every face of the cells around either endpoint that does not contain
    /// `remove`, with the top cells that will contain it once the collapse
    /// is done. Computed up front, while the star queries are still exact.
    fn collapse_region(&self, remove: SimplexHandle, keep: SimplexHandle) -> Vec<RegionFace> {
        let mesh = self.mesh();
        let top = mesh.top_dim();
        let mut cells = mesh.get_k_co_boundary_simplex(remove, top);
        cells.extend(mesh.get_k_co_boundary_simplex(keep, top));
        cells.sort_unstable();
        cells.dedup();

        let neighborhood: Vec<Vec<usize>> = cells.iter().map(|&c| mesh.vertex_ids(c)).collect();
        let collapsed = substitute_vertex(&neighborhood, remove.idx(), keep.idx());

        let mut faces: Vec<SimplexHandle> = cells
            .iter()
            .flat_map(|&c| mesh.get_all_boundary_simplex(c))
            .filter(|&f| !mesh.is_belong(remove, f))
            .collect();
        faces.sort_unstable();
        faces.dedup();

        faces
            .into_iter()
            .map(|face| {
                let verts = mesh.vertex_ids(face);
                let mut cells: Vec<Vec<usize>> = mesh
                    .get_k_co_boundary_simplex(face, top)
                    .into_iter()
                    .map(|c| mesh.vertex_ids(c))
                    .filter(|c| !c.contains(&remove.idx()))
                    .collect();
                cells.extend(
                    collapsed
                        .iter()
                        .filter(|c| verts.iter().all(|v| c.contains(v)))
                        .cloned(),
                );
                RegionFace { face, verts, cells }
            })
            .collect()
    }

    /// Tombstone the region faces left without a top cell, then re-seed the
    /// rest from a cell that contains them. Returns the number tombstoned.
    fn settle_region(&mut self, region: &[RegionFace]) -> usize {
        let top = self.mesh.top_dim();
        let mut removed = 0;
        for f in region.iter().filter(|f| f.cells.is_empty()) {
            if self.mesh.is_live(f.face) {
                self.mesh.retire(f.face);
                removed += 1;
            }
        }
        for f in region {
            if f.face.dim() + 1 >= top || !self.mesh.is_live(f.face) {
                continue;
            }
            let Some(cell) = f.cells.first() else {
                continue;
            };
            let Some(&extra) = cell.iter().find(|v| !f.verts.contains(v)) else {
                continue;
            };
            let mut key = f.verts.clone();
            key.push(extra);
            if let Some(seed) = self.mesh.get_live_handle(&key) {
                self.mesh.reseed(f.face, seed);
            }
        }
        removed
    }
}

/// A face around a collapsing edge and the top cells (as sorted vertex ids)
/// that contain it after the collapse.
struct RegionFace {
    face: SimplexHandle,
    verts: Vec<usize>,
    cells: Vec<Vec<usize>>,
}
