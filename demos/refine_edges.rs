// cargo run --example refine_edges -- in.tet out.tet
//
// Load a tetrahedral mesh, print its simplices, split every edge at its
// midpoint and store the result.
use simplex_mesh::geometry::midpoint;
use simplex_mesh::io::{TetMesh, WriteOptions, read_mesh, tet_mesh_read, tet_mesh_write, write_mesh};
use simplex_mesh::topology::{SimplexHandle, TopologyOperation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, output] = args.as_slice() else {
        eprintln!("usage: refine_edges <input.tet> <output.tet>");
        std::process::exit(1);
    };

    let file = tet_mesh_read(input)?;
    let mut mesh = read_mesh(&file.nodes, &file.tets)?;
    let top = mesh.top_dim();

    for dim in 0..=top {
        println!("*** {} simplices of dimension {dim} ***", mesh.n_elements(dim));
        if dim == 0 {
            continue;
        }
        for h in mesh.live_simplices(dim) {
            let ids: Vec<String> = mesh
                .get_k_boundary_simplex(h, 0)
                .iter()
                .map(|v| v.idx().to_string())
                .collect();
            println!("dim: {dim}  id: {}:   {}", h.idx(), ids.join(" "));
        }
    }

    // Only the edges present before refinement are split.
    let n_edges = mesh.n_elements(1);
    let mut op = TopologyOperation::new(&mut mesh);
    for i in 0..n_edges {
        let e = SimplexHandle::new(1, i);
        if op.mesh().is_deleted(e) {
            continue;
        }
        let p = midpoint(op.mesh(), e);
        op.insert_vertex(e, p)?;
    }

    let (nodes, tets) = write_mesh(&mesh, WriteOptions::default());
    println!(
        "refined: {} vertices, {} tetrahedra",
        nodes.ncols(),
        tets.ncols()
    );
    tet_mesh_write(
        output,
        &TetMesh {
            nodes,
            tets,
            tris: file.tris,
        },
    )?;
    Ok(())
}
