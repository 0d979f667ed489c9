//! Topological kernel: construction, tombstoning and compaction of a
//! simplicial complex stored as per-dimension arenas.
//!
//! The kernel composes three stores that always move in lockstep:
//! - [`SimplexManager`]: boundary / partial co-boundary records,
//! - [`PropertyManager`]: attribute columns (`<status>` on every dimension,
//!   `<coordinate>` on vertices, plus anything callers attach),
//! - [`TopologicalIndex`]: vertex tuple → handle, the deduplication key.
//!
//! Simplices of dimension ≥ 1 only come into existence as faces of a top
//! cell built through [`TopologyKernel::new_top_simplex`]. Deletion marks
//! simplices as tombstoned; [`TopologyKernel::garbage_collector`] removes
//! them physically and renumbers the survivors.
//!
//! Incidence queries live in [`crate::topology::traversal`].

use hashbrown::HashSet;
use itertools::Itertools;

use crate::data::property::{BaseProperty, PropertyValue};
use crate::data::property_manager::PropertyManager;
use crate::data::simplex_property::{PropertyId, SimplexProperty};
use crate::mesh_error::MeshError;
use crate::topology::handle::SimplexHandle;
use crate::topology::index::TopologicalIndex;
use crate::topology::simplex::Simplex;
use crate::topology::simplex_manager::SimplexManager;
use crate::topology::status::SimplexStatus;

/// Vertex position. Two-dimensional meshes leave `z` at zero.
pub type Coord = [f64; 3];

/// Name of the status column registered on every dimension.
pub const STATUS_PROPERTY: &str = "<status>";
/// Name of the coordinate column registered on vertices.
pub const COORDINATE_PROPERTY: &str = "<coordinate>";

/// Highest top dimension `new_top_simplex` can build.
pub const MAX_TOP_DIM: usize = 3;

/// Per-dimension summary returned by [`TopologyKernel::garbage_collector`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompactionReport {
    /// `removed[d]`: number of simplices of dimension `d` physically removed.
    pub removed: Vec<usize>,
}

impl CompactionReport {
    pub fn total_removed(&self) -> usize {
        self.removed.iter().sum()
    }
}

#[derive(Clone, Debug)]
pub struct TopologyKernel {
    pub(crate) top_dim: usize,
    pub(crate) sm: SimplexManager,
    pub(crate) pm: PropertyManager,
    pub(crate) index: TopologicalIndex,
    status: Vec<PropertyId<SimplexStatus>>,
    coordinate: PropertyId<Coord>,
}

impl TopologyKernel {
    /// Empty kernel for meshes whose top cells have dimension `top_dim`.
    pub fn new(top_dim: usize) -> Self {
        let mut kernel = Self {
            top_dim,
            sm: SimplexManager::default(),
            pm: PropertyManager::default(),
            index: TopologicalIndex::default(),
            status: Vec::new(),
            coordinate: PropertyId::new(0),
        };
        kernel.set_dim(top_dim);
        kernel
    }

    /// Drop every simplex and every attribute column, then re-register the
    /// built-in columns for `top_dim`.
    pub fn set_dim(&mut self, top_dim: usize) {
        self.top_dim = top_dim;
        self.sm.set_dim(top_dim);
        self.pm.set_dim(top_dim);
        self.index.set_dim(top_dim);
        self.status = (0..=top_dim)
            .map(|d| {
                self.pm
                    .simplex_property_mut(d)
                    .add_property(SimplexStatus::default(), STATUS_PROPERTY)
            })
            .collect::<Result<_, _>>()
            .unwrap_or_else(|e| unreachable!("fresh property store rejected a column: {e}"));
        self.coordinate = self
            .pm
            .simplex_property_mut(0)
            .add_property([0.0; 3], COORDINATE_PROPERTY)
            .unwrap_or_else(|e| unreachable!("fresh property store rejected a column: {e}"));
    }

    #[inline]
    pub fn top_dim(&self) -> usize {
        self.top_dim
    }

    /// Number of stored simplices of `dim`, tombstoned ones included.
    #[inline]
    pub fn n_elements(&self, dim: usize) -> usize {
        self.sm.n_elements(dim)
    }

    /// Number of live simplices of `dim`.
    pub fn n_live(&self, dim: usize) -> usize {
        self.live_simplices(dim).count()
    }

    /// Live simplices of `dim` in index order.
    pub fn live_simplices(&self, dim: usize) -> impl Iterator<Item = SimplexHandle> + '_ {
        let status = self.pm.simplex_property(dim).property(self.status[dim]);
        status
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_deleted())
            .map(move |(i, _)| SimplexHandle::new(dim, i))
    }

    /// Whether `h` addresses a stored simplex (live or tombstoned).
    pub fn is_valid_handle(&self, h: SimplexHandle) -> bool {
        !h.is_null() && h.dim() <= self.top_dim && h.idx() < self.n_elements(h.dim())
    }

    pub fn is_deleted(&self, h: SimplexHandle) -> bool {
        self.status(h).is_deleted()
    }

    pub fn is_live(&self, h: SimplexHandle) -> bool {
        self.is_valid_handle(h) && !self.is_deleted(h)
    }

    /// Whether `h` was on the boundary at the last [`mark_boundary`](Self::mark_boundary).
    pub fn is_boundary(&self, h: SimplexHandle) -> bool {
        self.status(h).is_boundary()
    }

    pub fn status(&self, h: SimplexHandle) -> SimplexStatus {
        *self.pm.get_element_property(h, self.status[h.dim()])
    }

    fn status_mut(&mut self, h: SimplexHandle) -> &mut SimplexStatus {
        let id = self.status[h.dim()];
        self.pm.get_element_property_mut(h, id)
    }

    /// Incidence record of `h`.
    pub fn get_specific_simplex(&self, h: SimplexHandle) -> &Simplex {
        self.sm.get_specific_simplex(h)
    }

    pub fn boundary(&self, h: SimplexHandle) -> &[SimplexHandle] {
        self.sm.get_specific_simplex(h).boundary()
    }

    pub fn par_co_boundary(&self, h: SimplexHandle) -> &[SimplexHandle] {
        self.sm.get_specific_simplex(h).par_co_boundary()
    }

    /// Panics unless `h` is a live simplex of this kernel.
    #[track_caller]
    pub(crate) fn assert_live(&self, h: SimplexHandle) {
        assert!(self.is_valid_handle(h), "invalid simplex handle {h}");
        assert!(!self.is_deleted(h), "simplex {h} is deleted");
    }

    // ------------------------------------------------------------------
    // Vertices and attributes
    // ------------------------------------------------------------------

    /// Append a vertex at `coord`.
    pub fn new_vert(&mut self, coord: Coord) -> SimplexHandle {
        let h = self.push_simplex(0);
        *self.pm.get_element_property_mut(h, self.coordinate) = coord;
        h
    }

    pub fn coord(&self, v: SimplexHandle) -> Coord {
        assert_eq!(v.dim(), 0, "coordinates live on vertices, got {v}");
        *self.pm.get_element_property(v, self.coordinate)
    }

    pub fn set_coord(&mut self, v: SimplexHandle, coord: Coord) {
        assert_eq!(v.dim(), 0, "coordinates live on vertices, got {v}");
        *self.pm.get_element_property_mut(v, self.coordinate) = coord;
    }

    /// Attach a named column of `T` to every simplex of `dim`.
    pub fn add_property<T: PropertyValue>(
        &mut self,
        dim: usize,
        default: T,
        name: &str,
    ) -> Result<PropertyId<T>, MeshError> {
        self.pm.add_property(dim, default, name)
    }

    pub fn find_property<T: PropertyValue>(&self, dim: usize, name: &str) -> Option<PropertyId<T>> {
        self.pm.simplex_property(dim).find_property(name)
    }

    pub fn simplex_property(&self, dim: usize) -> &SimplexProperty {
        self.pm.simplex_property(dim)
    }

    pub fn get_element_property<T: PropertyValue>(&self, h: SimplexHandle, id: PropertyId<T>) -> &T {
        self.pm.get_element_property(h, id)
    }

    pub fn get_element_property_mut<T: PropertyValue>(
        &mut self,
        h: SimplexHandle,
        id: PropertyId<T>,
    ) -> &mut T {
        self.pm.get_element_property_mut(h, id)
    }

    /// Remove a caller-attached column.
    ///
    /// # Panics
    /// Panics when asked to remove one of the kernel's own columns.
    pub fn remove_property<T: PropertyValue>(&mut self, dim: usize, id: PropertyId<T>) -> bool {
        let name = self.pm.simplex_property(dim).property(id).name().to_owned();
        assert!(
            name != STATUS_PROPERTY && !(dim == 0 && name == COORDINATE_PROPERTY),
            "`{name}` is owned by the kernel"
        );
        self.pm.simplex_property_mut(dim).remove_property(id)
    }

    fn push_simplex(&mut self, dim: usize) -> SimplexHandle {
        let i = self.sm.push_back(dim);
        let j = self.pm.simplex_property_mut(dim).push_back();
        debug_assert_eq!(i, j, "entity store and attribute store out of step");
        SimplexHandle::new(dim, i)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Handle of the simplex spanned by `verts` (any order), live or tombstoned.
    pub fn get_handle(&self, verts: &[usize]) -> Option<SimplexHandle> {
        let dim = verts.len().checked_sub(1)?;
        if dim > self.top_dim {
            return None;
        }
        if dim == 0 {
            return (verts[0] < self.n_elements(0)).then(|| SimplexHandle::new(0, verts[0]));
        }
        let mut key = verts.to_vec();
        key.sort_unstable();
        self.index.get(&key)
    }

    /// Like [`get_handle`](Self::get_handle) but ignores tombstoned simplices.
    pub fn get_live_handle(&self, verts: &[usize]) -> Option<SimplexHandle> {
        self.get_handle(verts).filter(|&h| !self.is_deleted(h))
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Build (or resurrect) the top cell spanned by `verts` and every face
    /// below it.
    ///
    /// Faces already present are shared; tombstoned faces are resurrected.
    ///
    /// # Errors
    /// - [`MeshError::UnsupportedSimplex`] if the kernel's top dimension is not 1, 2 or 3.
    /// - [`MeshError::DuplicateSimplex`] if a live top cell on `verts` exists.
    ///
    /// # Panics
    /// On a wrong vertex count, a repeated or unknown vertex, or if a
    /// codimension-1 face would end up bounding more than two top cells.
    pub fn new_top_simplex(&mut self, verts: &[usize]) -> Result<SimplexHandle, MeshError> {
        if !(1..=MAX_TOP_DIM).contains(&self.top_dim) {
            return Err(MeshError::UnsupportedSimplex(self.top_dim));
        }
        assert_eq!(
            verts.len(),
            self.top_dim + 1,
            "a top simplex of dimension {} needs {} vertices, got {verts:?}",
            self.top_dim,
            self.top_dim + 1
        );
        let mut key = verts.to_vec();
        key.sort_unstable();
        assert!(
            key.windows(2).all(|w| w[0] != w[1]),
            "repeated vertex in {verts:?}"
        );
        let n_verts = self.n_elements(0);
        if let Some(&v) = key.iter().find(|&&v| v >= n_verts) {
            panic!("unknown vertex {v} in {verts:?} ({n_verts} vertices stored)");
        }
        if let Some(existing) = self.index.get(&key) {
            if !self.is_deleted(existing) {
                return Err(MeshError::DuplicateSimplex(key));
            }
        }

        for &v in &key {
            self.revive(SimplexHandle::new(0, v));
        }
        let mut top = SimplexHandle::NULL;
        for dim in 1..=self.top_dim {
            for sub in key.iter().copied().combinations(dim + 1) {
                let h = self.fetch_or_create(sub);
                self.link_to_boundary(h);
                top = h;
            }
        }
        log::trace!("top simplex {key:?} -> {top}");
        Ok(top)
    }

    /// [`new_top_simplex`](Self::new_top_simplex) from vertex handles.
    pub fn new_top_simplex_from_handles(
        &mut self,
        verts: &[SimplexHandle],
    ) -> Result<SimplexHandle, MeshError> {
        let ids: Vec<usize> = verts
            .iter()
            .map(|v| {
                assert_eq!(v.dim(), 0, "{v} is not a vertex");
                v.idx()
            })
            .collect();
        self.new_top_simplex(&ids)
    }

    /// Existing (possibly resurrected) simplex for `key`, or a new one whose
    /// boundary is taken from the index. Faces must already be registered.
    fn fetch_or_create(&mut self, key: Vec<usize>) -> SimplexHandle {
        if let Some(h) = self.index.get(&key) {
            self.revive(h);
            return h;
        }
        let dim = key.len() - 1;
        let boundary: Vec<SimplexHandle> = key
            .iter()
            .copied()
            .combinations(dim)
            .filter_map(|face| self.index.get(&face))
            .collect();
        debug_assert_eq!(boundary.len(), dim + 1, "faces of {key:?} not registered");
        let h = self.push_simplex(dim);
        self.sm.get_specific_simplex_mut(h).boundary = boundary;
        self.index.insert(key, h);
        h
    }

    /// Record `h` in the co-boundary list of each of its faces.
    fn link_to_boundary(&mut self, h: SimplexHandle) {
        let faces = self.sm.get_specific_simplex(h).boundary.clone();
        for face in faces {
            let exhaustive = face.dim() + 1 == self.top_dim;
            let record = self.sm.get_specific_simplex_mut(face);
            if exhaustive {
                if !record.has_co_face(h) {
                    record.par_co_boundary.push(h);
                    assert!(
                        record.par_co_boundary.len() <= 2,
                        "non-manifold: {face} would bound {:?}",
                        record.par_co_boundary
                    );
                }
            } else {
                record.set_seed(h);
            }
        }
    }

    /// Clear the tombstone of `h`, purging co-faces that did not come back with it.
    fn revive(&mut self, h: SimplexHandle) {
        if !self.is_deleted(h) {
            return;
        }
        self.status_mut(h).set(SimplexStatus::DELETED, false);
        let stale = std::mem::take(&mut self.sm.get_specific_simplex_mut(h).par_co_boundary);
        let live: Vec<_> = stale.into_iter().filter(|&c| !self.is_deleted(c)).collect();
        self.sm.get_specific_simplex_mut(h).par_co_boundary = live;
        log::debug!("resurrected {h}");
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Tombstone `h` and every simplex that contains it.
    ///
    /// Surviving faces of the removed simplices drop them from their
    /// co-boundary lists; a face whose traversal seed was removed is re-seeded
    /// with a surviving coface when one exists. The replacement is found by
    /// walking the star, so it is only exact on a consistent mesh; operations
    /// that delete from a half-rebuilt region repair seeds themselves.
    /// Returns the tombstoned set, `h` last.
    pub fn del_simplex(&mut self, h: SimplexHandle) -> Vec<SimplexHandle> {
        self.assert_live(h);
        let mut doomed = self.get_all_co_boundary_simplex(h);
        doomed.push(h);
        let doomed_set: HashSet<SimplexHandle> = doomed.iter().copied().collect();

        let mut seen = HashSet::new();
        let survivors: Vec<SimplexHandle> = doomed
            .iter()
            .flat_map(|&d| self.boundary(d).iter().copied())
            .filter(|f| !doomed_set.contains(f) && seen.insert(*f))
            .collect();

        // Replacement seeds must be found while the old seeds still connect the star.
        let reseeds: Vec<(SimplexHandle, Option<SimplexHandle>)> = survivors
            .iter()
            .filter(|&&s| s.dim() + 1 < self.top_dim)
            .filter(|&&s| self.par_co_boundary(s).iter().any(|c| doomed_set.contains(c)))
            .map(|&s| {
                let alt = self
                    .get_k_co_boundary_simplex(s, s.dim() + 1)
                    .into_iter()
                    .find(|c| !doomed_set.contains(c));
                (s, alt)
            })
            .collect();

        for &s in &survivors {
            self.sm
                .get_specific_simplex_mut(s)
                .par_co_boundary
                .retain(|c| !doomed_set.contains(c));
        }
        for (s, alt) in reseeds {
            if let Some(seed) = alt {
                self.sm.get_specific_simplex_mut(s).set_seed(seed);
            }
        }
        for &d in &doomed {
            self.status_mut(d).set(SimplexStatus::DELETED, true);
        }
        log::debug!("tombstoned {} simplices around {h}", doomed.len());
        doomed
    }

    /// Tombstone `h` alone, without touching the lists of its faces.
    ///
    /// Only for simplices that no top cell contains any more; the caller
    /// repairs the seeds of the faces left behind.
    pub(crate) fn retire(&mut self, h: SimplexHandle) {
        debug_assert!(h.dim() < self.top_dim, "top cells go through del_simplex");
        self.status_mut(h).set(SimplexStatus::DELETED, true);
        self.sm.get_specific_simplex_mut(h).par_co_boundary.clear();
    }

    /// Point the traversal seed of `h` at `seed`.
    pub(crate) fn reseed(&mut self, h: SimplexHandle, seed: SimplexHandle) {
        debug_assert!(h.dim() + 1 < self.top_dim, "{h} keeps an exhaustive list");
        debug_assert!(self.boundary(seed).contains(&h), "{seed} is not a coface of {h}");
        self.sm.get_specific_simplex_mut(h).set_seed(seed);
    }

    // ------------------------------------------------------------------
    // Boundary marking
    // ------------------------------------------------------------------

    /// Recompute the `BOUNDARY` status bit: set on every live codimension-1
    /// face with a single top coface and on everything in its closure,
    /// cleared everywhere else.
    pub fn mark_boundary(&mut self) {
        for dim in 0..=self.top_dim {
            for i in 0..self.n_elements(dim) {
                self.status_mut(SimplexHandle::new(dim, i))
                    .set(SimplexStatus::BOUNDARY, false);
            }
        }
        if self.top_dim == 0 {
            return;
        }
        let faces: Vec<SimplexHandle> = self
            .live_simplices(self.top_dim - 1)
            .filter(|&f| self.par_co_boundary(f).len() == 1)
            .collect();
        for f in faces {
            let mut on_boundary = self.get_all_boundary_simplex(f);
            on_boundary.push(f);
            for b in on_boundary {
                self.status_mut(b).set(SimplexStatus::BOUNDARY, true);
            }
        }
    }

    // ------------------------------------------------------------------
    // Compaction
    // ------------------------------------------------------------------

    /// Physically remove tombstoned simplices of every dimension ≥ 1.
    ///
    /// Each dimension is partitioned with two pointers (live to the front)
    /// across the entity store and all attribute columns, then truncated.
    /// Boundary and co-boundary lists and the topological index are then
    /// rewritten to the new numbering. Vertices are never moved.
    ///
    /// Every handle of a dimension that lost simplices is invalidated.
    pub fn garbage_collector(&mut self) -> CompactionReport {
        let mut remaps: Vec<Option<Vec<Option<usize>>>> = vec![None; self.top_dim + 1];
        let mut report = CompactionReport {
            removed: vec![0; self.top_dim + 1],
        };
        for dim in 1..=self.top_dim {
            let n = self.n_elements(dim);
            let mut origin: Vec<usize> = (0..n).collect();
            let (mut i, mut j) = (0, n);
            loop {
                while i < j && !self.is_deleted(SimplexHandle::new(dim, i)) {
                    i += 1;
                }
                while i < j && self.is_deleted(SimplexHandle::new(dim, j - 1)) {
                    j -= 1;
                }
                if i >= j {
                    break;
                }
                self.sm.swap(dim, i, j - 1);
                self.pm.simplex_property_mut(dim).swap(i, j - 1);
                origin.swap(i, j - 1);
                i += 1;
                j -= 1;
            }
            let live = i;
            if live == n {
                continue;
            }
            self.sm.resize(dim, live);
            self.pm.simplex_property_mut(dim).resize(live);
            let mut remap = vec![None; n];
            for (new, &old) in origin[..live].iter().enumerate() {
                remap[old] = Some(new);
            }
            self.index.remap(dim, &remap);
            report.removed[dim] = n - live;
            remaps[dim] = Some(remap);
        }

        if report.total_removed() > 0 {
            let translate = |h: SimplexHandle| match &remaps[h.dim()] {
                None => Some(h),
                Some(m) => m[h.idx()].map(|new| SimplexHandle::new(h.dim(), new)),
            };
            for dim in 0..=self.top_dim {
                for s in self.sm.simplices_mut(dim) {
                    s.boundary = s.boundary.iter().copied().filter_map(translate).collect();
                    s.par_co_boundary = s
                        .par_co_boundary
                        .iter()
                        .copied()
                        .filter_map(translate)
                        .collect();
                }
            }
            log::debug!("compaction removed {:?}", report.removed);
        }
        report
    }

    /// Sorted vertex ids of `h`.
    pub fn vertex_ids(&self, h: SimplexHandle) -> Vec<usize> {
        let mut ids: Vec<usize> = self.vertex_handles(h).iter().map(|v| v.idx()).collect();
        ids.sort_unstable();
        ids
    }
}
