#![allow(dead_code)]
use simplex_mesh::topology::{SimplexHandle, TopologyKernel};

pub fn vert(i: usize) -> SimplexHandle {
    SimplexHandle::new(0, i)
}

/// Kernel of dimension `top` with the given vertices and top cells.
pub fn build(top: usize, coords: &[[f64; 3]], cells: &[&[usize]]) -> TopologyKernel {
    let mut k = TopologyKernel::new(top);
    for &p in coords {
        k.new_vert(p);
    }
    for c in cells {
        k.new_top_simplex(c).unwrap();
    }
    k
}

/// Unit square split along the 0–2 diagonal.
pub fn quad() -> TopologyKernel {
    build(
        2,
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        &[&[0, 1, 2], &[0, 2, 3]],
    )
}

/// `n × n` squares, each split along its rising diagonal. Vertex `(i, j)` has
/// id `j * (n + 1) + i`.
pub fn grid(n: usize) -> TopologyKernel {
    grid_in_order(n, &grid_cells(n))
}

/// The vertices of `grid(n)` with `cells` built in the order given.
pub fn grid_in_order(n: usize, cells: &[[usize; 3]]) -> TopologyKernel {
    let coords: Vec<[f64; 3]> = (0..=n)
        .flat_map(|j| (0..=n).map(move |i| [i as f64, j as f64, 0.0]))
        .collect();
    build(2, &coords, &cells.iter().map(|c| &c[..]).collect::<Vec<_>>())
}

/// Triangles of `grid(n)`, row by row.
pub fn grid_cells(n: usize) -> Vec<[usize; 3]> {
    let id = |i: usize, j: usize| j * (n + 1) + i;
    let mut cells = Vec::new();
    for j in 0..n {
        for i in 0..n {
            cells.push([id(i, j), id(i + 1, j), id(i + 1, j + 1)]);
            cells.push([id(i, j), id(i + 1, j + 1), id(i, j + 1)]);
        }
    }
    cells
}

/// Unit cube split into six tetrahedra around its 0–7 diagonal. Corner
/// `(x, y, z)` has id `x + 2y + 4z`.
pub fn cube() -> TopologyKernel {
    let coords: Vec<[f64; 3]> = (0..8)
        .map(|i| [(i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64])
        .collect();
    build(3, &coords, &CUBE_TETS.iter().map(|t| &t[..]).collect::<Vec<_>>())
}

pub const CUBE_TETS: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 1, 5, 7],
    [0, 2, 3, 7],
    [0, 2, 6, 7],
    [0, 4, 5, 7],
    [0, 4, 6, 7],
];

pub const OCTAHEDRON_COORDS: [[f64; 3]; 7] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

/// Octahedron filled with eight tetrahedra around an interior vertex 0.
pub fn octahedron_ball() -> TopologyKernel {
    octahedron_in_order(&octahedron_tets())
}

/// The octahedron ball with `tets` built in the order given.
pub fn octahedron_in_order(tets: &[[usize; 4]]) -> TopologyKernel {
    build(3, &OCTAHEDRON_COORDS, &tets.iter().map(|t| &t[..]).collect::<Vec<_>>())
}

pub fn octahedron_tets() -> Vec<[usize; 4]> {
    let mut tets = Vec::new();
    for x in [1, 2] {
        for y in [3, 4] {
            for z in [5, 6] {
                tets.push([0, x, y, z]);
            }
        }
    }
    tets
}

/// Everything observable about the kernel, for before/after comparisons.
pub fn snapshot(k: &TopologyKernel) -> Vec<String> {
    let mut out = Vec::new();
    for dim in 0..=k.top_dim() {
        for i in 0..k.n_elements(dim) {
            let h = SimplexHandle::new(dim, i);
            let mut line = format!(
                "{h} {:?} b={:?} c={:?}",
                k.status(h),
                k.boundary(h),
                k.par_co_boundary(h)
            );
            if dim == 0 {
                line.push_str(&format!(" at {:?}", k.coord(h)));
            } else if !k.is_deleted(h) {
                line.push_str(&format!(" key={:?}", k.get_handle(&k.vertex_ids(h))));
            }
            out.push(line);
        }
    }
    out
}

/// Every live simplex below the top dimension bounds some live top cell.
pub fn assert_no_orphans(k: &TopologyKernel) {
    let top = k.top_dim();
    for dim in 0..top {
        for h in k.live_simplices(dim) {
            assert!(
                !k.get_k_co_boundary_simplex(h, top).is_empty(),
                "{h} {:?} bounds no top cell",
                k.vertex_ids(h)
            );
        }
    }
}

/// Every face of a live top cell is live, and finds that cell again.
pub fn assert_faces_live(k: &TopologyKernel) {
    let top = k.top_dim();
    for cell in k.live_simplices(top) {
        for f in k.get_all_boundary_simplex(cell) {
            assert!(
                k.is_live(f),
                "{f} {:?} of live cell {:?} is deleted",
                k.vertex_ids(f),
                k.vertex_ids(cell)
            );
            assert!(
                k.get_k_co_boundary_simplex(f, top).contains(&cell),
                "{f} {:?} does not reach its cell {:?}",
                k.vertex_ids(f),
                k.vertex_ids(cell)
            );
        }
    }
}

/// Sorted vertex sets of the live top cells.
pub fn live_cells(k: &TopologyKernel) -> Vec<Vec<usize>> {
    let mut cells: Vec<Vec<usize>> = k
        .live_simplices(k.top_dim())
        .map(|c| k.vertex_ids(c))
        .collect();
    cells.sort();
    cells
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
