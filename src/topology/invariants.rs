//! Structural self-check of a [`TopologyKernel`].

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::handle::SimplexHandle;
use crate::topology::kernel::TopologyKernel;

impl DebugInvariants for TopologyKernel {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "TopologyKernel");
    }

    /// Checks, for every dimension:
    /// - every attribute column has one slot per stored simplex;
    /// - live simplices have a boundary of the right size and dimension, made
    ///   of live faces, matching their index key;
    /// - co-boundary lists hold only live cofaces that contain the simplex,
    ///   at most two of them, nothing on top cells and a single seed below
    ///   codimension one.
    fn validate_invariants(&self) -> Result<(), MeshError> {
        for dim in 0..=self.top_dim {
            let expected = self.n_elements(dim);
            for col in self.simplex_property(dim).columns() {
                if col.len() != expected {
                    return Err(MeshError::PropertyLength {
                        dim,
                        name: col.name().to_owned(),
                        len: col.len(),
                        expected,
                    });
                }
            }
        }

        for dim in 0..=self.top_dim {
            for h in self.live_simplices(dim) {
                self.check_boundary(h)?;
                self.check_co_boundary(h)?;
                if dim > 0 {
                    let key = self.vertex_ids(h);
                    if self.index.get(&key) != Some(h) {
                        return Err(MeshError::IndexMismatch {
                            handle: h,
                            detail: format!("vertex set {key:?} maps to {:?}", self.index.get(&key)),
                        });
                    }
                }
            }
            if dim > 0 && self.index.len(dim) != self.n_elements(dim) {
                return Err(MeshError::IndexMismatch {
                    handle: SimplexHandle::NULL,
                    detail: format!(
                        "dimension {dim} has {} index entries for {} simplices",
                        self.index.len(dim),
                        self.n_elements(dim)
                    ),
                });
            }
        }
        Ok(())
    }
}

impl TopologyKernel {
    fn check_boundary(&self, h: SimplexHandle) -> Result<(), MeshError> {
        let boundary = self.boundary(h);
        let expected = if h.dim() == 0 { 0 } else { h.dim() + 1 };
        if boundary.len() != expected {
            return Err(MeshError::MalformedIncidence(
                h,
                format!("boundary has {} entries, expected {expected}", boundary.len()),
            ));
        }
        for &f in boundary {
            if !self.is_valid_handle(f) || f.dim() + 1 != h.dim() {
                return Err(MeshError::MalformedIncidence(
                    h,
                    format!("boundary entry {f} has the wrong dimension"),
                ));
            }
            if self.is_deleted(f) {
                return Err(MeshError::DanglingReference { holder: h, target: f });
            }
        }
        Ok(())
    }

    fn check_co_boundary(&self, h: SimplexHandle) -> Result<(), MeshError> {
        let cofaces = self.par_co_boundary(h);
        let cap = if h.dim() == self.top_dim {
            0
        } else if h.dim() + 1 == self.top_dim {
            2
        } else {
            1
        };
        if cofaces.len() > cap {
            return Err(MeshError::MalformedIncidence(
                h,
                format!("{} co-faces recorded, at most {cap} allowed", cofaces.len()),
            ));
        }
        for (i, &c) in cofaces.iter().enumerate() {
            if cofaces[..i].contains(&c) {
                return Err(MeshError::MalformedIncidence(
                    h,
                    format!("co-face {c} recorded twice"),
                ));
            }
            if !self.is_valid_handle(c) || c.dim() != h.dim() + 1 {
                return Err(MeshError::MalformedIncidence(
                    h,
                    format!("co-boundary entry {c} has the wrong dimension"),
                ));
            }
            if self.is_deleted(c) {
                return Err(MeshError::DanglingReference { holder: h, target: c });
            }
            if !self.boundary(c).contains(&h) {
                return Err(MeshError::MalformedIncidence(
                    h,
                    format!("co-face {c} does not list it as a face"),
                ));
            }
        }
        Ok(())
    }
}
