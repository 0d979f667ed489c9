//! Per-dimension arena of [`Simplex`] records.

use crate::topology::handle::SimplexHandle;
use crate::topology::simplex::Simplex;

#[derive(Clone, Debug, Default)]
pub struct SimplexManager {
    per_dim: Vec<Vec<Simplex>>,
}

impl SimplexManager {
    /// Discard all records and allocate empty arrays for `0..=top_dim`.
    pub fn set_dim(&mut self, top_dim: usize) {
        self.per_dim = vec![Vec::new(); top_dim + 1];
    }

    pub fn n_dims(&self) -> usize {
        self.per_dim.len()
    }

    pub fn n_elements(&self, dim: usize) -> usize {
        self.per_dim[dim].len()
    }

    /// Append an empty record and return its index.
    pub fn push_back(&mut self, dim: usize) -> usize {
        let arr = &mut self.per_dim[dim];
        arr.push(Simplex::default());
        arr.len() - 1
    }

    pub fn get_specific_simplex(&self, h: SimplexHandle) -> &Simplex {
        &self.per_dim[h.dim()][h.idx()]
    }

    pub fn get_specific_simplex_mut(&mut self, h: SimplexHandle) -> &mut Simplex {
        &mut self.per_dim[h.dim()][h.idx()]
    }

    pub fn simplices(&self, dim: usize) -> &[Simplex] {
        &self.per_dim[dim]
    }

    pub(crate) fn simplices_mut(&mut self, dim: usize) -> &mut [Simplex] {
        &mut self.per_dim[dim]
    }

    /// Exchange two slots. Handles held elsewhere are not touched.
    pub fn swap(&mut self, dim: usize, i: usize, j: usize) {
        self.per_dim[dim].swap(i, j);
    }

    pub fn resize(&mut self, dim: usize, n: usize) {
        self.per_dim[dim].resize_with(n, Simplex::default);
    }

    pub fn reserve(&mut self, dim: usize, additional: usize) {
        self.per_dim[dim].reserve(additional);
    }

    pub fn clear(&mut self) {
        for arr in &mut self.per_dim {
            arr.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_swap_resize() {
        let mut sm = SimplexManager::default();
        sm.set_dim(2);
        assert_eq!(sm.push_back(1), 0);
        assert_eq!(sm.push_back(1), 1);
        let a = SimplexHandle::new(1, 0);
        sm.get_specific_simplex_mut(a)
            .boundary
            .push(SimplexHandle::new(0, 3));
        sm.swap(1, 0, 1);
        assert!(sm.get_specific_simplex(a).boundary().is_empty());
        assert_eq!(
            sm.get_specific_simplex(SimplexHandle::new(1, 1)).boundary(),
            &[SimplexHandle::new(0, 3)]
        );
        sm.resize(1, 1);
        assert_eq!(sm.n_elements(1), 1);
        assert_eq!(sm.n_elements(2), 0);
    }

    #[test]
    fn seed_replacement_keeps_single_entry() {
        let mut s = Simplex::default();
        s.set_seed(SimplexHandle::new(1, 4));
        s.set_seed(SimplexHandle::new(1, 5));
        assert_eq!(s.par_co_boundary(), &[SimplexHandle::new(1, 5)]);
        assert!(s.has_co_face(SimplexHandle::new(1, 5)));
        assert!(!s.has_co_face(SimplexHandle::new(1, 4)));
    }
}
