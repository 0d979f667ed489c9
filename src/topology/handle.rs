//! `SimplexHandle`: a `(dimension, index)` address into the simplex arena
//!
//! Every vertex, edge, triangle and tetrahedron lives in a per-dimension
//! array owned by [`TopologyKernel`](crate::topology::kernel::TopologyKernel).
//! A handle names one slot of one of those arrays. Handles are plain values:
//! they carry no lifetime, are cheap to copy, and order by dimension first
//! so sorted handle lists group naturally by stratum.
//!
//! Handles are **not** stable across
//! [`garbage_collector`](crate::topology::kernel::TopologyKernel::garbage_collector):
//! compaction renumbers every dimension it shrinks.

use std::fmt;

/// Address of a simplex: its dimension and its slot within that dimension.
///
/// The derived ordering compares `dim` before `id`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct SimplexHandle {
    dim: u8,
    id: u32,
}

impl SimplexHandle {
    /// Sentinel that never addresses a stored simplex.
    pub const NULL: SimplexHandle = SimplexHandle {
        dim: u8::MAX,
        id: u32::MAX,
    };

    /// Build a handle for slot `id` of dimension `dim`.
    ///
    /// # Panics
    /// Panics if either field does not fit, or if the pair equals [`Self::NULL`].
    #[inline]
    pub fn new(dim: usize, id: usize) -> Self {
        let dim = u8::try_from(dim).expect("simplex dimension exceeds u8");
        let id = u32::try_from(id).expect("simplex index exceeds u32");
        let h = SimplexHandle { dim, id };
        assert!(!h.is_null(), "handle collides with the null sentinel");
        h
    }

    #[inline]
    pub const fn dim(self) -> usize {
        self.dim as usize
    }

    #[inline]
    pub const fn idx(self) -> usize {
        self.id as usize
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.dim == u8::MAX && self.id == u32::MAX
    }
}

impl Default for SimplexHandle {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for SimplexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("SimplexHandle(NULL)");
        }
        f.debug_tuple("SimplexHandle")
            .field(&self.dim)
            .field(&self.id)
            .finish()
    }
}

/// Prints `(dim, id)`, or `null`.
impl fmt::Display for SimplexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "({}, {})", self.dim, self.id)
        }
    }
}
