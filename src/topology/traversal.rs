//! Incidence queries over the kernel's boundary / partial co-boundary graph.
//!
//! All queries are breadth-first and return simplices in discovery order.
//! Each call owns its visited set, so queries nest freely and leave no state
//! behind.
//!
//! Downward queries follow `boundary` lists, which are complete. Upward
//! queries start from the partial co-boundary of the query simplex and
//! recover the rest of its star by also stepping sideways: from a coface two
//! or more dimensions above the query, its own boundary faces that still
//! contain the query are visited too.

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::topology::handle::SimplexHandle;
use crate::topology::kernel::TopologyKernel;

impl TopologyKernel {
    /// Downward closure of `h` (excluding `h`), breadth first.
    fn down_closure(&self, h: SimplexHandle, min_dim: usize) -> Vec<SimplexHandle> {
        let mut out = Vec::new();
        let mut seen: HashSet<SimplexHandle> = HashSet::new();
        let mut queue: VecDeque<SimplexHandle> = VecDeque::from([h]);
        while let Some(n) = queue.pop_front() {
            for &f in self.boundary(n) {
                if f.dim() >= min_dim && seen.insert(f) {
                    out.push(f);
                    queue.push_back(f);
                }
            }
        }
        out
    }

    /// Every simplex that has `h` as a face, breadth first (excluding `h`).
    fn star(&self, h: SimplexHandle) -> Vec<SimplexHandle> {
        let verts = self.vertex_handles(h);
        let mut out = Vec::new();
        let mut seen: HashSet<SimplexHandle> = HashSet::new();
        seen.insert(h);
        let mut queue: VecDeque<SimplexHandle> = VecDeque::new();
        for &c in self.par_co_boundary(h) {
            if seen.insert(c) {
                out.push(c);
                queue.push_back(c);
            }
        }
        while let Some(n) = queue.pop_front() {
            for &c in self.par_co_boundary(n) {
                if seen.insert(c) {
                    out.push(c);
                    queue.push_back(c);
                }
            }
            if n.dim() < h.dim() + 2 {
                continue;
            }
            for &sibling in self.boundary(n) {
                if !seen.contains(&sibling) && self.contains_vertices(sibling, &verts) {
                    seen.insert(sibling);
                    out.push(sibling);
                    queue.push_back(sibling);
                }
            }
        }
        out
    }

    /// All simplices of dimension exactly `k < dim(h)` in the closure of `h`.
    pub fn get_k_boundary_simplex(&self, h: SimplexHandle, k: usize) -> Vec<SimplexHandle> {
        self.assert_live(h);
        assert!(k < h.dim(), "boundary query of dimension {k} on {h}");
        if k + 1 == h.dim() {
            return self.boundary(h).to_vec();
        }
        self.down_closure(h, k)
            .into_iter()
            .filter(|f| f.dim() == k)
            .collect()
    }

    /// All simplices of every dimension below `h` in its closure.
    pub fn get_all_boundary_simplex(&self, h: SimplexHandle) -> Vec<SimplexHandle> {
        self.assert_live(h);
        self.down_closure(h, 0)
    }

    /// All simplices of dimension exactly `k > dim(h)` having `h` as a face.
    pub fn get_k_co_boundary_simplex(&self, h: SimplexHandle, k: usize) -> Vec<SimplexHandle> {
        self.assert_live(h);
        assert!(
            k > h.dim() && k <= self.top_dim,
            "co-boundary query of dimension {k} on {h}"
        );
        if k == h.dim() + 1 && h.dim() + 1 == self.top_dim {
            return self.par_co_boundary(h).to_vec();
        }
        self.star(h).into_iter().filter(|c| c.dim() == k).collect()
    }

    /// The full upward closure of `h`: everything deleted along with it.
    pub fn get_all_co_boundary_simplex(&self, h: SimplexHandle) -> Vec<SimplexHandle> {
        self.assert_live(h);
        self.star(h)
    }

    /// Simplices of the same dimension as `h` sharing a face with it; for a
    /// vertex, the other endpoints of its edges.
    pub fn get_adjacent_simplex(&self, h: SimplexHandle) -> Vec<SimplexHandle> {
        self.assert_live(h);
        let mut out = Vec::new();
        if h.dim() == 0 {
            if self.top_dim == 0 {
                return out;
            }
            for e in self.get_k_co_boundary_simplex(h, 1) {
                out.extend(self.boundary(e).iter().copied().filter(|&v| v != h));
            }
            return out;
        }
        let mut seen: HashSet<SimplexHandle> = HashSet::new();
        seen.insert(h);
        for &f in self.boundary(h) {
            for c in self.get_k_co_boundary_simplex(f, h.dim()) {
                if seen.insert(c) {
                    out.push(c);
                }
            }
        }
        out
    }

    /// Vertices of `top` that are not among `given`.
    pub fn get_other_verts(&self, top: SimplexHandle, given: &[SimplexHandle]) -> Vec<SimplexHandle> {
        let given: HashSet<SimplexHandle> = given.iter().copied().collect();
        self.vertex_handles(top)
            .into_iter()
            .filter(|v| !given.contains(v))
            .collect()
    }

    /// The face of `cell` that does not contain vertex `v`.
    ///
    /// `None` when `v` is not a vertex of `cell`.
    pub fn get_vertex_opposite_simplex(
        &self,
        v: SimplexHandle,
        cell: SimplexHandle,
    ) -> Option<SimplexHandle> {
        assert_eq!(v.dim(), 0, "{v} is not a vertex");
        self.assert_live(cell);
        let faces = self.boundary(cell);
        let opposite: Vec<SimplexHandle> = faces
            .iter()
            .copied()
            .filter(|&f| !self.is_belong(v, f))
            .collect();
        match opposite.as_slice() {
            [f] if opposite.len() < faces.len() => Some(*f),
            _ => None,
        }
    }

    /// Whether `h` is `s` or a face of `s` at any depth.
    pub fn is_belong(&self, h: SimplexHandle, s: SimplexHandle) -> bool {
        if h.dim() > s.dim() {
            return false;
        }
        if h.dim() == s.dim() {
            return h == s;
        }
        self.contains_vertices(s, &self.vertex_handles(h))
    }

    /// Vertex handles of `h` in boundary discovery order.
    pub fn vertex_handles(&self, h: SimplexHandle) -> Vec<SimplexHandle> {
        match h.dim() {
            0 => vec![h],
            1 => self.boundary(h).to_vec(),
            _ => self
                .down_closure(h, 0)
                .into_iter()
                .filter(|f| f.dim() == 0)
                .collect(),
        }
    }

    fn contains_vertices(&self, s: SimplexHandle, verts: &[SimplexHandle]) -> bool {
        let own = self.vertex_handles(s);
        verts.iter().all(|v| own.contains(v))
    }
}
