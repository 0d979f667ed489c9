//! Reconstruction plans: which top cells to build after a local removal.
//!
//! Every mutation removes the star of some simplex and rebuilds it. What gets
//! rebuilt depends only on vertex ids, so the rules live here as pure
//! functions over id tuples and are tested without a kernel.

use std::collections::BTreeSet;

/// Where a new vertex is inserted, relative to the mesh's top dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertCase {
    /// Inside a top cell: the cell becomes `top_dim + 1` cells, each replacing
    /// one of its vertices by the new one.
    TopCell,
    /// On a codimension-1 face (an edge of a triangle mesh, a triangle of a
    /// tetrahedral mesh): each of the (at most two) cells on the face splits
    /// into one cell per face vertex.
    Codim1Face,
    /// On an edge of a tetrahedral mesh: each tetrahedron around the edge
    /// splits in two.
    DeeperFace,
}

impl InsertCase {
    /// Case for a target of dimension `target_dim`. Vertices cannot be split.
    pub fn classify(target_dim: usize, top_dim: usize) -> Option<Self> {
        match top_dim.checked_sub(target_dim)? {
            _ if target_dim == 0 => None,
            0 => Some(InsertCase::TopCell),
            1 => Some(InsertCase::Codim1Face),
            2 if top_dim == 3 => Some(InsertCase::DeeperFace),
            _ => None,
        }
    }
}

/// Cells to build after removing the star of the target simplex with vertex
/// ids `target`, where `others[i]` lists the vertices of the i-th removed top
/// cell that are not in `target`.
///
/// All three cases reduce to the same cone: the new vertex, the retained
/// vertices of a removed cell, and the target minus one of its vertices.
/// For `TopCell` the only removed cell is the target itself, so its retained
/// set is empty.
pub fn insert_plan(
    case: InsertCase,
    new_vertex: usize,
    target: &[usize],
    others: &[Vec<usize>],
) -> Vec<Vec<usize>> {
    match case {
        InsertCase::TopCell => {
            debug_assert!(others.iter().all(Vec::is_empty));
            cone_over_target(new_vertex, target, &[Vec::new()])
        }
        InsertCase::Codim1Face => {
            debug_assert!(others.iter().all(|o| o.len() == 1));
            cone_over_target(new_vertex, target, others)
        }
        InsertCase::DeeperFace => {
            debug_assert!(others.iter().all(|o| o.len() == 2));
            cone_over_target(new_vertex, target, others)
        }
    }
}

fn cone_over_target(new_vertex: usize, target: &[usize], others: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut cells = Vec::with_capacity(others.len() * target.len());
    for retained in others {
        for skip in 0..target.len() {
            let mut cell = Vec::with_capacity(retained.len() + target.len());
            cell.push(new_vertex);
            cell.extend_from_slice(retained);
            cell.extend(
                target
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != skip)
                    .map(|(_, &v)| v),
            );
            cell.sort_unstable();
            cells.push(cell);
        }
    }
    cells
}

/// Cells to build after removing vertex `remove` whose star cells retained
/// `others`: each retained set not already containing `keep` is coned to
/// `keep`. Duplicates are dropped.
pub fn collapse_plan(keep: usize, others: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut seen = BTreeSet::new();
    others
        .iter()
        .filter(|o| !o.contains(&keep))
        .filter_map(|o| {
            let mut cell = Vec::with_capacity(o.len() + 1);
            cell.push(keep);
            cell.extend_from_slice(o);
            cell.sort_unstable();
            seen.insert(cell.clone()).then_some(cell)
        })
        .collect()
}

/// The two triangles on the other diagonal of the quad `edge ∪ opposite`.
pub fn flip_plan(edge: &[usize], others: &[Vec<usize>]) -> Vec<Vec<usize>> {
    assert!(
        edge.len() == 2 && others.len() == 2 && others.iter().all(|o| o.len() == 1),
        "flip needs an edge with exactly two opposite vertices"
    );
    let (o0, o1) = (others[0][0], others[1][0]);
    edge.iter()
        .map(|&p| {
            let mut cell = vec![o0, o1, p];
            cell.sort_unstable();
            cell
        })
        .collect()
}

/// Replace `from` by `to` in every cell; cells containing both are dropped
/// and coinciding results merged. Cells come back sorted.
pub fn substitute_vertex(cells: &[Vec<usize>], from: usize, to: usize) -> BTreeSet<Vec<usize>> {
    cells
        .iter()
        .filter(|c| !(c.contains(&from) && c.contains(&to)))
        .map(|c| {
            let mut cell: Vec<usize> = c.iter().map(|&v| if v == from { to } else { v }).collect();
            cell.sort_unstable();
            cell
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_by_codimension() {
        assert_eq!(InsertCase::classify(2, 2), Some(InsertCase::TopCell));
        assert_eq!(InsertCase::classify(1, 2), Some(InsertCase::Codim1Face));
        assert_eq!(InsertCase::classify(0, 2), None);
        assert_eq!(InsertCase::classify(3, 3), Some(InsertCase::TopCell));
        assert_eq!(InsertCase::classify(2, 3), Some(InsertCase::Codim1Face));
        assert_eq!(InsertCase::classify(1, 3), Some(InsertCase::DeeperFace));
        assert_eq!(InsertCase::classify(1, 1), Some(InsertCase::TopCell));
        assert_eq!(InsertCase::classify(3, 2), None);
    }

    #[test]
    fn top_cell_split_replaces_each_vertex() {
        let cells = insert_plan(InsertCase::TopCell, 9, &[0, 1, 2], &[vec![]]);
        assert_eq!(cells, vec![vec![1, 2, 9], vec![0, 2, 9], vec![0, 1, 9]]);
    }

    #[test]
    fn interior_edge_split_in_triangle_mesh() {
        let cells = insert_plan(InsertCase::Codim1Face, 9, &[0, 2], &[vec![1], vec![3]]);
        assert_eq!(
            cells,
            vec![vec![1, 2, 9], vec![0, 1, 9], vec![2, 3, 9], vec![0, 3, 9]]
        );
    }

    #[test]
    fn tet_edge_split_halves_each_tet() {
        let cells = insert_plan(InsertCase::DeeperFace, 9, &[0, 1], &[vec![2, 3], vec![3, 4]]);
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|c| c.len() == 4 && c.contains(&9)));
        assert!(cells.contains(&vec![1, 2, 3, 9]));
        assert!(cells.contains(&vec![0, 3, 4, 9]));
    }

    #[test]
    fn collapse_plan_skips_cells_on_the_edge_and_dedups() {
        // Star of 0 in a fan: cells (0,1,2), (0,2,3), (0,3,4); keep = 1.
        let others = vec![vec![1, 2], vec![2, 3], vec![3, 4], vec![2, 3]];
        assert_eq!(collapse_plan(1, &others), vec![vec![1, 2, 3], vec![1, 3, 4]]);
    }

    #[test]
    fn flip_plan_uses_the_other_diagonal() {
        assert_eq!(
            flip_plan(&[0, 2], &[vec![1], vec![3]]),
            vec![vec![0, 1, 3], vec![1, 2, 3]]
        );
    }

    #[test]
    fn substitution_drops_cells_on_the_edge() {
        let cells = vec![vec![0, 1, 2], vec![0, 2, 3], vec![1, 3, 4], vec![1, 2, 3]];
        let post = substitute_vertex(&cells, 0, 1);
        assert_eq!(
            post.into_iter().collect::<Vec<_>>(),
            vec![vec![1, 2, 3], vec![1, 3, 4]]
        );
    }
}
