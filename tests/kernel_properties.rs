mod util;

use std::collections::BTreeSet;

use itertools::Itertools;
use proptest::prelude::*;
use proptest::sample::Index;
use simplex_mesh::DebugInvariants;
use simplex_mesh::geometry::centroid;
use simplex_mesh::topology::{SimplexHandle, TopologyKernel, TopologyOperation};
use util::*;

fn counts(k: &TopologyKernel) -> Vec<usize> {
    (0..=k.top_dim()).map(|d| k.n_elements(d)).collect()
}

fn pick(k: &TopologyKernel, dim: usize, at: &Index) -> Option<SimplexHandle> {
    let live: Vec<SimplexHandle> = k.live_simplices(dim).collect();
    (!live.is_empty()).then(|| live[at.index(live.len())])
}

#[test]
fn single_tetrahedron_scenario() {
    let mut k = build(
        3,
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        &[&[0, 1, 2, 3]],
    );
    assert_eq!(counts(&k), vec![4, 6, 4, 1]);
    let cell = k.get_handle(&[0, 1, 2, 3]).unwrap();
    assert_permutation(
        &k.get_k_boundary_simplex(cell, 0),
        &[vert(0), vert(1), vert(2), vert(3)],
    );

    let c = centroid(&k, cell);
    let v = TopologyOperation::new(&mut k).insert_vertex(cell, c).unwrap();
    assert_eq!(k.get_k_co_boundary_simplex(v, 3).len(), 4);
    assert_eq!(k.n_live(3), 4);

    let gone = k.del_simplex(v);
    assert_eq!(gone.last(), Some(&v));
    assert_eq!(k.n_live(3), 0);
    let report = k.garbage_collector();
    assert_eq!(report.removed, vec![0, 4, 6, 5]);
    assert_eq!(k.n_elements(3), 0);
    assert_eq!(counts(&k), vec![5, 6, 4, 0]);
    k.validate_invariants().unwrap();
}

#[test]
fn boundary_and_co_boundary_agree() {
    for k in [cube(), octahedron_ball(), grid(3)] {
        for dim in 1..=k.top_dim() {
            for e in k.live_simplices(dim) {
                for &f in k.boundary(e) {
                    assert!(
                        k.get_k_co_boundary_simplex(f, dim).contains(&e),
                        "{e} missing from the co-boundary of {f}"
                    );
                }
            }
        }
        k.validate_invariants().unwrap();
    }
}

#[test]
fn star_of_the_interior_vertex_is_the_whole_ball() {
    let k = octahedron_ball();
    let star = k.get_all_co_boundary_simplex(vert(0));
    let per_dim = |d: usize| star.iter().filter(|h| h.dim() == d).count();
    assert_eq!((per_dim(1), per_dim(2), per_dim(3)), (6, 12, 8));
    assert_permutation(
        &k.get_adjacent_simplex(vert(0)),
        &(1..7).map(vert).collect::<Vec<_>>(),
    );
}

#[test]
fn cube_queries() {
    let mut k = cube();
    let diag = k.get_handle(&[0, 7]).unwrap();
    assert_eq!(k.get_k_co_boundary_simplex(diag, 3).len(), 6);
    assert_eq!(k.get_k_co_boundary_simplex(diag, 2).len(), 6);

    let t = k.get_handle(&[0, 1, 3, 7]).unwrap();
    let nbrs: Vec<Vec<usize>> = k
        .get_adjacent_simplex(t)
        .into_iter()
        .map(|n| k.vertex_ids(n))
        .sorted()
        .collect();
    assert_eq!(nbrs, vec![vec![0, 1, 5, 7], vec![0, 2, 3, 7]]);

    let opp = k.get_vertex_opposite_simplex(vert(0), t).unwrap();
    assert_eq!(k.vertex_ids(opp), vec![1, 3, 7]);
    assert_eq!(k.get_vertex_opposite_simplex(vert(4), t), None);
    assert!(k.is_belong(vert(3), t));
    assert!(!k.is_belong(k.get_handle(&[0, 4]).unwrap(), t));

    k.mark_boundary();
    assert!((0..8).all(|v| k.is_boundary(vert(v))));
    assert!(!k.is_boundary(diag));
    assert!(!k.is_boundary(k.get_handle(&[0, 1, 7]).unwrap()));
    assert!(k.is_boundary(k.get_handle(&[0, 1, 3]).unwrap()));
    assert!(!k.is_boundary(t));
}

#[test]
fn labels_follow_cells_through_compaction() {
    let mut k = cube();
    let label = k.add_property(3, 0usize, "vertex_sum").unwrap();
    for t in k.live_simplices(3).collect::<Vec<_>>() {
        let sum: usize = k.vertex_ids(t).iter().sum();
        *k.get_element_property_mut(t, label) = sum;
    }
    k.del_simplex(k.get_handle(&[0, 1]).unwrap());
    let report = k.garbage_collector();
    assert_eq!(report.removed[3], 2);
    assert_eq!(k.n_elements(3), 4);
    for t in k.live_simplices(3) {
        assert_eq!(
            *k.get_element_property(t, label),
            k.vertex_ids(t).iter().sum::<usize>()
        );
        assert_eq!(k.get_handle(&k.vertex_ids(t)), Some(t));
    }
    k.validate_invariants().unwrap();
}

proptest! {
    #[test]
    fn faces_are_shared_whatever_the_build_order(
        order in Just(CUBE_TETS.to_vec()).prop_shuffle(),
        turns in proptest::collection::vec(0usize..4, 6),
    ) {
        let mut k = TopologyKernel::new(3);
        for _ in 0..8 {
            k.new_vert([0.0; 3]);
        }
        for (tet, &r) in order.iter().zip(&turns) {
            let mut t = *tet;
            t.rotate_left(r);
            k.new_top_simplex(&t).unwrap();
        }
        for dim in 1..=3 {
            let distinct: BTreeSet<Vec<usize>> = CUBE_TETS
                .iter()
                .flat_map(|t| t.iter().copied().combinations(dim + 1))
                .collect();
            prop_assert_eq!(k.n_elements(dim), distinct.len());
            for key in &distinct {
                let h = k.get_handle(key).unwrap();
                prop_assert!(k.is_live(h));
                prop_assert_eq!(k.vertex_ids(h), key.clone());
            }
        }
        prop_assert!(k.validate_invariants().is_ok());
    }

    #[test]
    fn deletion_removes_exactly_the_star(dim in 0usize..4, at in any::<Index>()) {
        let mut k = cube();
        let h = pick(&k, dim, &at).unwrap();
        let mut closure = k.get_all_co_boundary_simplex(h);
        closure.push(h);
        let before = k.clone();

        k.del_simplex(h);
        for d in 0..=3 {
            for i in 0..k.n_elements(d) {
                let s = SimplexHandle::new(d, i);
                let expect = before.is_deleted(s) || closure.contains(&s);
                prop_assert_eq!(k.is_deleted(s), expect, "{}", s);
            }
        }
        prop_assert!(k.validate_invariants().is_ok());
    }

    #[test]
    fn compaction_is_idempotent(
        picks in proptest::collection::vec((0usize..4, any::<Index>()), 1..4),
    ) {
        let mut k = octahedron_ball();
        for (dim, at) in &picks {
            if let Some(h) = pick(&k, *dim, at) {
                k.del_simplex(h);
            }
        }
        let live: Vec<usize> = (0..=3).map(|d| k.n_live(d)).collect();
        let cells = live_cells(&k);

        k.garbage_collector();
        for d in 1..=3 {
            prop_assert_eq!(k.n_elements(d), live[d]);
        }
        prop_assert_eq!(live_cells(&k), cells);
        prop_assert!(k.validate_invariants().is_ok());

        let once = snapshot(&k);
        let again = k.garbage_collector();
        prop_assert_eq!(again.total_removed(), 0);
        prop_assert_eq!(snapshot(&k), once);
    }
}
