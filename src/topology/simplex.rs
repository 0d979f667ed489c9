//! Incidence record stored for every simplex.

use crate::topology::handle::SimplexHandle;

/// Boundary and partial co-boundary of one simplex.
///
/// `boundary` holds the faces one dimension down, in lexicographic order of
/// the sorted vertex sub-tuples: the two vertices of an edge, the three edges
/// `(01, 02, 12)` of a triangle, the four triangles `(012, 013, 023, 123)` of
/// a tetrahedron. It never changes after construction.
///
/// `par_co_boundary` holds cofaces one dimension up. For faces of codimension
/// one it is the exhaustive list (at most two). For deeper simplices it is a
/// single seed from which traversals recover the rest. Top cells keep it
/// empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Simplex {
    pub(crate) boundary: Vec<SimplexHandle>,
    pub(crate) par_co_boundary: Vec<SimplexHandle>,
}

impl Simplex {
    pub fn boundary(&self) -> &[SimplexHandle] {
        &self.boundary
    }

    pub fn par_co_boundary(&self) -> &[SimplexHandle] {
        &self.par_co_boundary
    }

    pub fn has_co_face(&self, h: SimplexHandle) -> bool {
        self.par_co_boundary.contains(&h)
    }

    /// Replace the traversal seed.
    pub(crate) fn set_seed(&mut self, h: SimplexHandle) {
        match self.par_co_boundary.first_mut() {
            Some(seed) => *seed = h,
            None => self.par_co_boundary.push(h),
        }
        self.par_co_boundary.truncate(1);
    }
}
