//! Closed-form measures of simplices.
//!
//! Vertex order is the sorted vertex-id order of the simplex, so the sign of
//! [`tet_volume`] and the direction of [`face_normal`] follow vertex ids.

use crate::topology::handle::SimplexHandle;
use crate::topology::kernel::{Coord, TopologyKernel};

const EPS: f64 = 1e-12;

fn corners(mesh: &TopologyKernel, h: SimplexHandle, dim: usize) -> Vec<Coord> {
    assert_eq!(h.dim(), dim, "expected a {dim}-simplex, got {h}");
    mesh.assert_live(h);
    mesh.vertex_ids(h)
        .into_iter()
        .map(|v| mesh.coord(SimplexHandle::new(0, v)))
        .collect()
}

pub fn edge_length(mesh: &TopologyKernel, e: SimplexHandle) -> f64 {
    let p = corners(mesh, e, 1);
    norm(sub(p[1], p[0]))
}

pub fn triangle_area(mesh: &TopologyKernel, t: SimplexHandle) -> f64 {
    let p = corners(mesh, t, 2);
    0.5 * norm(cross(sub(p[1], p[0]), sub(p[2], p[0])))
}

/// Signed volume; positive when the sorted vertices are right-handed.
pub fn tet_volume(mesh: &TopologyKernel, t: SimplexHandle) -> f64 {
    let p = corners(mesh, t, 3);
    signed_volume(p[0], p[1], p[2], p[3])
}

/// Unit normal of a triangle, `None` if it is degenerate.
pub fn face_normal(mesh: &TopologyKernel, t: SimplexHandle) -> Option<Coord> {
    let p = corners(mesh, t, 2);
    unit_normal(p[0], p[1], p[2])
}

/// Length, area or absolute volume depending on the dimension of `h`.
pub fn simplex_measure(mesh: &TopologyKernel, h: SimplexHandle) -> f64 {
    match h.dim() {
        0 => 0.0,
        1 => edge_length(mesh, h),
        2 => triangle_area(mesh, h),
        3 => tet_volume(mesh, h).abs(),
        d => panic!("no closed-form measure for dimension {d}"),
    }
}

/// Average of the vertex positions of `h`.
pub fn centroid(mesh: &TopologyKernel, h: SimplexHandle) -> Coord {
    let p = corners(mesh, h, h.dim());
    let n = p.len() as f64;
    let mut c = [0.0; 3];
    for q in &p {
        for k in 0..3 {
            c[k] += q[k] / n;
        }
    }
    c
}

/// Midpoint of an edge.
pub fn midpoint(mesh: &TopologyKernel, e: SimplexHandle) -> Coord {
    assert_eq!(e.dim(), 1, "{e} is not an edge");
    centroid(mesh, e)
}

pub(crate) fn signed_volume(a: Coord, b: Coord, c: Coord, d: Coord) -> f64 {
    let ab = sub(b, a);
    let ac = sub(c, a);
    let ad = sub(d, a);
    dot(ab, cross(ac, ad)) / 6.0
}

fn unit_normal(a: Coord, b: Coord, c: Coord) -> Option<Coord> {
    let n = cross(sub(b, a), sub(c, a));
    let len = norm(n);
    (len > EPS).then(|| [n[0] / len, n[1] / len, n[2] / len])
}

fn sub(a: Coord, b: Coord) -> Coord {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Coord, b: Coord) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Coord, b: Coord) -> Coord {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: Coord) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tet() -> TopologyKernel {
        let mut k = TopologyKernel::new(3);
        for p in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ] {
            k.new_vert(p);
        }
        k.new_top_simplex(&[0, 1, 2, 3]).unwrap();
        k
    }

    #[test]
    fn measures_of_the_unit_tetrahedron() {
        let k = unit_tet();
        let t = k.get_handle(&[0, 1, 2, 3]).unwrap();
        assert!((tet_volume(&k, t) - 1.0 / 6.0).abs() < 1e-15);
        let e = k.get_handle(&[1, 2]).unwrap();
        assert!((edge_length(&k, e) - 2f64.sqrt()).abs() < 1e-15);
        let f = k.get_handle(&[0, 1, 2]).unwrap();
        assert!((triangle_area(&k, f) - 0.5).abs() < 1e-15);
        assert_eq!(face_normal(&k, f), Some([0.0, 0.0, 1.0]));
        let c = centroid(&k, t);
        for x in c {
            assert!((x - 0.25).abs() < 1e-15);
        }
        assert_eq!(midpoint(&k, k.get_handle(&[0, 1]).unwrap()), [0.5, 0.0, 0.0]);
        assert_eq!(simplex_measure(&k, SimplexHandle::new(0, 0)), 0.0);
    }

    #[test]
    fn degenerate_triangle_has_no_normal() {
        let mut k = TopologyKernel::new(2);
        for x in [0.0, 1.0, 2.0] {
            k.new_vert([x, 0.0, 0.0]);
        }
        let t = k.new_top_simplex(&[0, 1, 2]).unwrap();
        assert_eq!(face_normal(&k, t), None);
        assert_eq!(triangle_area(&k, t), 0.0);
    }
}
