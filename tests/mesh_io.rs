mod util;

use std::path::PathBuf;

use simplex_mesh::DebugInvariants;
use simplex_mesh::MeshError;
use simplex_mesh::io::{
    DenseMatrix, TetMesh, WriteOptions, read_matrix, read_mesh, tet_mesh_read, tet_mesh_write,
    write_matrix, write_mesh,
};
use simplex_mesh::topology::TopologyOperation;
use util::*;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("simplex-mesh-{}-{name}", std::process::id()))
}

#[test]
fn matrix_file_round_trip() {
    let path = scratch("matrix.bin");
    let m = DenseMatrix::from_columns(&[[0.25, -1.0, 3.5], [1e300, 0.0, -0.0]]);
    write_matrix(&path, &m).unwrap();
    let back: DenseMatrix<f64> = read_matrix(&path).unwrap();
    assert_eq!((back.nrows(), back.ncols()), (3, 2));
    assert_eq!(back, m);

    let ids = DenseMatrix::from_columns(&[[0usize, 1, 2, 3], [4, 5, 6, 7]]);
    write_matrix(&path, &ids).unwrap();
    assert_eq!(read_matrix::<usize>(&path).unwrap(), ids);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_matrix::<f64>(scratch("does-not-exist")).unwrap_err();
    assert!(matches!(err, MeshError::Io(_)));
}

#[test]
fn kernel_survives_a_tet_mesh_file() {
    let mut k = cube();
    let t = k.get_handle(&[0, 1, 3, 7]).unwrap();
    TopologyOperation::new(&mut k)
        .insert_vertex(t, [0.7, 0.3, 0.1])
        .unwrap();
    let (nodes, tets) = write_mesh(&k, WriteOptions::default());
    assert_eq!((nodes.ncols(), tets.ncols()), (9, 9));

    let path = scratch("cube.tet");
    let file = TetMesh {
        nodes,
        tets,
        tris: None,
    };
    tet_mesh_write(&path, &file).unwrap();
    let back = tet_mesh_read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back, file);

    let k2 = read_mesh(&back.nodes, &back.tets).unwrap();
    k2.validate_invariants().unwrap();
    assert_eq!(live_cells(&k2), live_cells(&k));
    assert_eq!(k2.coord(vert(8)), [0.7, 0.3, 0.1]);
}

#[test]
fn tet_mesh_file_keeps_surface_triangles() {
    let path = scratch("with-tris.tet");
    let file = TetMesh {
        nodes: DenseMatrix::from_columns(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        tets: DenseMatrix::from_columns(&[[0usize, 1, 2, 3]]),
        tris: Some(DenseMatrix::from_columns(&[[1usize, 2, 3]])),
    };
    tet_mesh_write(&path, &file).unwrap();
    let back = tet_mesh_read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back, file);
}

#[test]
fn out_of_range_tet_is_rejected_on_read() {
    let path = scratch("bad.tet");
    let file = TetMesh {
        nodes: DenseMatrix::from_columns(&[[0.0; 3]; 3]),
        tets: DenseMatrix::from_columns(&[[0usize, 1, 2, 5]]),
        tris: None,
    };
    tet_mesh_write(&path, &file).unwrap();
    let err = tet_mesh_read(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, MeshError::InvalidCellTable(_)));
}
