//! Bulk load and store of a kernel through coordinate and cell matrices.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use bytemuck::Pod;
use bytes::{Buf, BytesMut};
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use itertools::Itertools;
use num_traits::{NumCast, ToPrimitive};

use crate::io::matrix::{DenseMatrix, decode_matrix, encode_matrix};
use crate::mesh_error::MeshError;
use crate::topology::handle::SimplexHandle;
use crate::topology::kernel::{MAX_TOP_DIM, TopologyKernel};

/// Options for [`write_mesh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Also drop live vertices no live top cell references, renumbering
    /// the rest.
    pub remove_unused_vertices: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            remove_unused_vertices: true,
        }
    }
}

impl WriteOptions {
    /// Emit every live vertex, referenced or not.
    pub fn keep_all() -> Self {
        Self {
            remove_unused_vertices: false,
        }
    }
}

/// Nodes, tetrahedra and optional surface triangles of one tet-mesh file.
#[derive(Clone, Debug, PartialEq)]
pub struct TetMesh {
    pub nodes: DenseMatrix<f64>,
    pub tets: DenseMatrix<usize>,
    pub tris: Option<DenseMatrix<usize>>,
}

/// Reject cell tables the kernel cannot represent, before anything is built.
fn validate_cells(cells: &DenseMatrix<usize>, n_nodes: usize) -> Result<(), MeshError> {
    let top = cells.nrows() - 1;
    let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut facets: HashMap<Vec<usize>, usize> = HashMap::new();
    for (i, col) in cells.columns().enumerate() {
        if let Some(&v) = col.iter().find(|&&v| v >= n_nodes) {
            return Err(MeshError::InvalidCellTable(format!(
                "cell {i} references vertex {v} of {n_nodes}"
            )));
        }
        let mut key = col.to_vec();
        key.sort_unstable();
        if key.windows(2).any(|w| w[0] == w[1]) {
            return Err(MeshError::InvalidCellTable(format!(
                "cell {i} repeats a vertex: {col:?}"
            )));
        }
        for facet in key.iter().copied().combinations(top) {
            match facets.entry(facet) {
                Entry::Occupied(mut e) => {
                    *e.get_mut() += 1;
                    if *e.get() > 2 {
                        return Err(MeshError::NonManifoldInput(e.key().clone()));
                    }
                }
                Entry::Vacant(e) => {
                    e.insert(1);
                }
            }
        }
        if !seen.insert(key) {
            return Err(MeshError::InvalidCellTable(format!(
                "cell {i} duplicates an earlier cell: {col:?}"
            )));
        }
    }
    Ok(())
}

/// Build a kernel from a `3 × N` coordinate matrix and a `(d+1) × M` cell
/// table. The top dimension is `d`; vertices are created first, in column
/// order, then the cells.
///
/// # Errors
/// - [`MeshError::UnsupportedSimplex`] if `d` is not 1, 2 or 3.
/// - [`MeshError::InvalidCellTable`] for malformed shapes, out-of-range or
///   repeated vertices, and duplicate cells.
/// - [`MeshError::NonManifoldInput`] if a codimension-1 face is shared by more
///   than two cells.
pub fn read_mesh(
    nodes: &DenseMatrix<f64>,
    cells: &DenseMatrix<usize>,
) -> Result<TopologyKernel, MeshError> {
    if nodes.nrows() != 3 {
        return Err(MeshError::InvalidCellTable(format!(
            "coordinate matrix has {} rows, expected 3",
            nodes.nrows()
        )));
    }
    if cells.nrows() == 0 {
        return Err(MeshError::InvalidCellTable("cell table has no rows".into()));
    }
    let top = cells.nrows() - 1;
    if !(1..=MAX_TOP_DIM).contains(&top) {
        return Err(MeshError::UnsupportedSimplex(top));
    }
    validate_cells(cells, nodes.ncols())?;

    let mut mesh = TopologyKernel::new(top);
    for p in nodes.columns() {
        mesh.new_vert([p[0], p[1], p[2]]);
    }
    for col in cells.columns() {
        mesh.new_top_simplex(col)?;
    }
    log::debug!(
        "loaded {} vertices and {} {top}-simplices",
        nodes.ncols(),
        cells.ncols()
    );
    Ok(mesh)
}

/// Coordinates of the live vertices and the vertex ids of every live top
/// cell, in the layout [`read_mesh`] accepts.
///
/// Tombstoned vertices are never written; the vertices after them move down
/// to close the gap, so output ids equal kernel ids only while no vertex has
/// been deleted.
pub fn write_mesh(
    mesh: &TopologyKernel,
    options: WriteOptions,
) -> (DenseMatrix<f64>, DenseMatrix<usize>) {
    let live_verts: Vec<SimplexHandle> = mesh.live_simplices(0).collect();
    let mut renumber: HashMap<usize, usize> = HashMap::with_capacity(live_verts.len());
    let mut nodes = DenseMatrix::zeros(3, live_verts.len());
    for (col, &v) in live_verts.iter().enumerate() {
        nodes.column_mut(col).copy_from_slice(&mesh.coord(v));
        renumber.insert(v.idx(), col);
    }

    let top = mesh.top_dim();
    let live: Vec<SimplexHandle> = mesh.live_simplices(top).collect();
    let mut cells = DenseMatrix::zeros(top + 1, live.len());
    for (col, &cell) in live.iter().enumerate() {
        for (row, v) in mesh.get_k_boundary_simplex(cell, 0).into_iter().enumerate() {
            cells.set(row, col, renumber[&v.idx()]);
        }
    }
    if options.remove_unused_vertices {
        remove_extra_nodes(&mut cells, &mut nodes);
    }
    (nodes, cells)
}

/// Drop the columns of `nodes` no cell references and renumber `cells` to
/// match, keeping the surviving vertices in their original order.
///
/// # Panics
/// If a cell references a vertex outside `nodes`.
pub fn remove_extra_nodes(cells: &mut DenseMatrix<usize>, nodes: &mut DenseMatrix<f64>) {
    let used: BTreeSet<usize> = cells.as_slice().iter().copied().collect();
    if let Some(&max) = used.last() {
        assert!(
            max < nodes.ncols(),
            "cell references vertex {max} of {}",
            nodes.ncols()
        );
    }
    let mut kept = DenseMatrix::zeros(nodes.nrows(), used.len());
    let mut renumber: HashMap<usize, usize> = HashMap::with_capacity(used.len());
    for (new, &old) in used.iter().enumerate() {
        kept.column_mut(new).copy_from_slice(nodes.column(old));
        renumber.insert(old, new);
    }
    for v in cells.as_mut_slice() {
        *v = renumber[&*v];
    }
    if kept.ncols() < nodes.ncols() {
        log::debug!("dropped {} unused vertices", nodes.ncols() - kept.ncols());
    }
    *nodes = kept;
}

fn cast_matrix<S, D>(m: &DenseMatrix<S>) -> Result<DenseMatrix<D>, MeshError>
where
    S: Pod + ToPrimitive + std::fmt::Debug,
    D: Pod + NumCast,
{
    let data = m
        .as_slice()
        .iter()
        .map(|&x| {
            <D as NumCast>::from(x).ok_or_else(|| {
                MeshError::MatrixFormat(format!(
                    "value {x:?} does not fit {}",
                    std::any::type_name::<D>()
                ))
            })
        })
        .collect::<Result<Vec<D>, MeshError>>()?;
    Ok(DenseMatrix::from_col_major(m.nrows(), m.ncols(), data))
}

/// Read a tet-mesh file: an `f64` node matrix, an `i32` tetrahedron matrix
/// and, if present, an `i32` triangle matrix.
pub fn tet_mesh_read(path: impl AsRef<Path>) -> Result<TetMesh, MeshError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mut buf = bytes.as_slice();
    let nodes: DenseMatrix<f64> = decode_matrix(&mut buf)?;
    let tets: DenseMatrix<usize> = cast_matrix(&decode_matrix::<i32, _>(&mut buf)?)?;
    let tris = if buf.has_remaining() {
        Some(cast_matrix(&decode_matrix::<i32, _>(&mut buf)?)?)
    } else {
        None
    };
    if !tets.is_empty() && tets.nrows() != 4 {
        return Err(MeshError::InvalidCellTable(format!(
            "tetrahedron matrix has {} rows",
            tets.nrows()
        )));
    }
    if let Some(&v) = tets.as_slice().iter().find(|&&v| v >= nodes.ncols()) {
        return Err(MeshError::InvalidCellTable(format!(
            "tet index {v} beyond {} nodes",
            nodes.ncols()
        )));
    }
    log::debug!(
        "{}: {} nodes, {} tets",
        path.display(),
        nodes.ncols(),
        tets.ncols()
    );
    Ok(TetMesh { nodes, tets, tris })
}

/// Write `mesh` in the layout [`tet_mesh_read`] expects.
pub fn tet_mesh_write(path: impl AsRef<Path>, mesh: &TetMesh) -> Result<(), MeshError> {
    let mut buf = BytesMut::new();
    encode_matrix(&mut buf, &mesh.nodes)?;
    encode_matrix(&mut buf, &cast_matrix::<usize, i32>(&mesh.tets)?)?;
    if let Some(tris) = &mesh.tris {
        encode_matrix(&mut buf, &cast_matrix::<usize, i32>(tris)?)?;
    }
    fs::write(path, &buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> (DenseMatrix<f64>, DenseMatrix<usize>) {
        let nodes = DenseMatrix::from_columns(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let cells = DenseMatrix::from_columns(&[[0, 1, 2], [0, 2, 3]]);
        (nodes, cells)
    }

    #[test]
    fn read_builds_every_face() {
        let (nodes, cells) = two_triangles();
        let mesh = read_mesh(&nodes, &cells).unwrap();
        assert_eq!(mesh.top_dim(), 2);
        assert_eq!(
            (0..=2).map(|d| mesh.n_elements(d)).collect::<Vec<_>>(),
            vec![4, 5, 2]
        );
        assert_eq!(mesh.coord(SimplexHandle::new(0, 2)), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn write_returns_what_was_read() {
        let (nodes, cells) = two_triangles();
        let mesh = read_mesh(&nodes, &cells).unwrap();
        let (n2, c2) = write_mesh(&mesh, WriteOptions::default());
        assert_eq!(n2, nodes);
        assert_eq!(c2, cells);
    }

    #[test]
    fn unused_vertices_are_dropped_on_request() {
        let (nodes, cells) = two_triangles();
        let mut mesh = read_mesh(&nodes, &cells).unwrap();
        let t = mesh.get_handle(&[0, 2, 3]).unwrap();
        mesh.del_simplex(t);

        let (all, _) = write_mesh(&mesh, WriteOptions::keep_all());
        assert_eq!(all.ncols(), 4);
        let (used, cells) = write_mesh(&mesh, WriteOptions::default());
        assert_eq!(used.ncols(), 3);
        assert_eq!(cells.column(0), &[0, 1, 2]);

        mesh.del_simplex(SimplexHandle::new(0, 3));
        let (all, _) = write_mesh(&mesh, WriteOptions::keep_all());
        assert_eq!(all.ncols(), 3);
    }

    #[test]
    fn tombstoned_vertices_are_never_written() {
        let (nodes, cells) = two_triangles();
        let mut mesh = read_mesh(&nodes, &cells).unwrap();
        mesh.del_simplex(SimplexHandle::new(0, 1));

        let (kept, cells) = write_mesh(&mesh, WriteOptions::keep_all());
        assert_eq!(kept.ncols(), 3);
        assert_eq!(kept.column(0), &[0.0, 0.0, 0.0]);
        assert_eq!(kept.column(1), &[1.0, 1.0, 0.0]);
        assert_eq!(cells.ncols(), 1);
        assert_eq!(cells.column(0), &[0, 1, 2]);
        assert_eq!(write_mesh(&mesh, WriteOptions::default()), (kept, cells));
    }

    #[test]
    fn remove_extra_nodes_renumbers_in_order() {
        let mut nodes = DenseMatrix::from_columns(&[
            [0.0, 0.0, 0.0],
            [9.0, 9.0, 9.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let mut cells = DenseMatrix::from_columns(&[[3usize, 0, 2]]);
        remove_extra_nodes(&mut cells, &mut nodes);
        assert_eq!(cells.column(0), &[2, 0, 1]);
        assert_eq!(nodes.ncols(), 3);
        assert_eq!(nodes.column(1), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn malformed_tables_are_rejected_before_building() {
        let (nodes, _) = two_triangles();
        let out_of_range = DenseMatrix::from_columns(&[[0usize, 1, 7]]);
        assert!(matches!(
            read_mesh(&nodes, &out_of_range),
            Err(MeshError::InvalidCellTable(_))
        ));
        let repeated = DenseMatrix::from_columns(&[[0usize, 1, 1]]);
        assert!(matches!(
            read_mesh(&nodes, &repeated),
            Err(MeshError::InvalidCellTable(_))
        ));
        let duplicate = DenseMatrix::from_columns(&[[0usize, 1, 2], [2, 1, 0]]);
        assert!(matches!(
            read_mesh(&nodes, &duplicate),
            Err(MeshError::InvalidCellTable(_))
        ));
        let quads: DenseMatrix<usize> = DenseMatrix::zeros(5, 1);
        assert_eq!(
            read_mesh(&nodes, &quads).unwrap_err(),
            MeshError::UnsupportedSimplex(4)
        );
    }

    #[test]
    fn fin_face_is_reported() {
        let nodes = DenseMatrix::from_columns(&[[0.0; 3]; 5]);
        let fin = DenseMatrix::from_columns(&[[0usize, 1, 2], [0, 1, 3], [0, 1, 4]]);
        assert_eq!(
            read_mesh(&nodes, &fin).unwrap_err(),
            MeshError::NonManifoldInput(vec![0, 1])
        );
    }
}
