//! Topological index: sorted vertex-id tuple → simplex handle, per dimension.
//!
//! This is the deduplication mechanism of the kernel. Every vertex set ever
//! built keeps exactly one entry here, live or tombstoned, until compaction
//! physically removes the simplex.

use hashbrown::HashMap;

use crate::topology::handle::SimplexHandle;

#[derive(Clone, Debug, Default)]
pub struct TopologicalIndex {
    /// `maps[d]` indexes dimension `d`; slot 0 stays empty (vertices are
    /// addressed directly).
    maps: Vec<HashMap<Vec<usize>, SimplexHandle>>,
}

impl TopologicalIndex {
    pub fn set_dim(&mut self, top_dim: usize) {
        self.maps = vec![HashMap::new(); top_dim + 1];
    }

    /// Look up an already-sorted tuple. The tuple length selects the dimension.
    pub fn get(&self, sorted: &[usize]) -> Option<SimplexHandle> {
        debug_assert!(sorted.is_sorted(), "index key {sorted:?} is not sorted");
        let dim = sorted.len().checked_sub(1)?;
        if dim == 0 {
            return sorted
                .first()
                .map(|&v| SimplexHandle::new(0, v));
        }
        self.maps.get(dim)?.get(sorted).copied()
    }

    /// Register a new tuple. The tuple must not already be present.
    pub fn insert(&mut self, sorted: Vec<usize>, h: SimplexHandle) {
        debug_assert_eq!(sorted.len(), h.dim() + 1);
        let prev = self.maps[h.dim()].insert(sorted, h);
        debug_assert!(prev.is_none(), "tuple registered twice");
    }

    pub fn len(&self, dim: usize) -> usize {
        self.maps.get(dim).map_or(0, HashMap::len)
    }

    pub fn iter(&self, dim: usize) -> impl Iterator<Item = (&[usize], SimplexHandle)> + '_ {
        self.maps
            .get(dim)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, &h)| (k.as_slice(), h)))
    }

    /// Rewrite every handle of `dim` through `remap` (old index → new index),
    /// dropping entries that map to `None`.
    pub fn remap(&mut self, dim: usize, remap: &[Option<usize>]) {
        self.maps[dim].retain(|_, h| match remap[h.idx()] {
            Some(new) => {
                *h = SimplexHandle::new(dim, new);
                true
            }
            None => false,
        });
    }

    pub fn clear(&mut self) {
        for m in &mut self.maps {
            m.clear();
        }
    }
}
