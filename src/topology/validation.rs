//! Validity oracle for candidate cell sets.
//!
//! Works on plain vertex-index tuples, not on kernel handles, so it can vet
//! a hypothetical post-edit neighbourhood as easily as an external cell
//! table. Nothing here touches a [`TopologyKernel`](crate::topology::kernel::TopologyKernel).
//!
//! Triangles are checked as a surface directly. Tetrahedra are first reduced
//! to their boundary surface: faces are counted (a face on three or more
//! tetrahedra is malformed), the Euler characteristic is optionally compared
//! with that of a ball, and faces used once are extracted with outward
//! orientation. The surface must then be edge-manifold and connected across
//! interior edges.

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use thiserror::Error;

/// Why a candidate cell set is not an acceptable manifold patch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifoldViolation {
    #[error("no cells to check")]
    Empty,
    /// Only triangles (3) and tetrahedra (4) are understood.
    #[error("cells must have 3 or 4 vertices, found {0}")]
    UnsupportedArity(usize),
    #[error("mixed cell arity: expected {expected}, found {found}")]
    MixedArity { expected: usize, found: usize },
    #[error("cell {0:?} repeats a vertex")]
    DegenerateCell(Vec<usize>),
    /// The same vertex set appears twice, in any order. Carries it sorted.
    #[error("cell {0:?} is listed more than once")]
    DuplicateCell(Vec<usize>),
    /// A triangle bounds three or more tetrahedra.
    #[error("face {0:?} is shared by more than two tetrahedra")]
    NonManifoldFace([usize; 3]),
    /// An edge bounds three or more surface triangles.
    #[error("edge {0:?} is shared by more than two triangles")]
    NonManifoldEdge([usize; 2]),
    #[error("Euler characteristic {0}, expected 1 for a ball")]
    EulerCharacteristic(i64),
    /// Only reported when closed surfaces are required.
    #[error("surface edge {0:?} borders a single triangle")]
    OpenBoundary([usize; 2]),
    #[error("surface is not connected: {reached} of {total} triangles reachable")]
    Disconnected { reached: usize, total: usize },
}

/// Toggles for [`check_manifold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifoldCheckOptions {
    /// For tetrahedra, require `V − E + F − C == 1`.
    pub check_euler: bool,
    /// Reject surfaces with boundary edges (holes).
    pub require_closed: bool,
}

impl Default for ManifoldCheckOptions {
    fn default() -> Self {
        Self::neighborhood()
    }
}

impl ManifoldCheckOptions {
    /// Local patches around an edit: may have a rim, must be a ball or disc.
    pub fn neighborhood() -> Self {
        Self {
            check_euler: true,
            require_closed: false,
        }
    }

    /// Closed shells: no surface edge may border a single triangle.
    pub fn closed_surface() -> Self {
        Self {
            check_euler: false,
            require_closed: true,
        }
    }

    /// Enable every check.
    pub fn all() -> Self {
        Self {
            check_euler: true,
            require_closed: true,
        }
    }
}

/// What a successful check saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSummary {
    pub n_cells: usize,
    pub n_surface_triangles: usize,
    pub n_surface_edges: usize,
    /// Surface edges with a single triangle.
    pub n_open_edges: usize,
    /// `V − E + F − C`, computed for tetrahedra only.
    pub euler: Option<i64>,
}

/// Local faces of a tetrahedron `[v0, v1, v2, v3]`, oriented outward when
/// the tetrahedron has positive orientation.
const TET_FACES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 1], [0, 1, 3], [0, 3, 2]];

fn sorted3(f: [usize; 3]) -> [usize; 3] {
    let mut f = f;
    f.sort_unstable();
    f
}

fn sorted2(a: usize, b: usize) -> [usize; 2] {
    if a < b { [a, b] } else { [b, a] }
}

/// Sorted triangle → (first tetrahedron, second tetrahedron).
#[derive(Debug, Clone, Default)]
pub struct FaceAdjacency {
    faces: HashMap<[usize; 3], (usize, Option<usize>)>,
}

impl FaceAdjacency {
    /// Count every face of every tetrahedron (cells are indexed by position).
    pub fn build<C: AsRef<[usize]>>(tets: &[C]) -> Result<Self, ManifoldViolation> {
        let mut faces: HashMap<[usize; 3], (usize, Option<usize>)> =
            HashMap::with_capacity(tets.len() * 2);
        for (ci, cell) in tets.iter().enumerate() {
            let t = tet_array(cell.as_ref())?;
            for local in TET_FACES {
                let key = sorted3(local.map(|i| t[i]));
                match faces.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert((ci, None));
                    }
                    Entry::Occupied(mut slot) => {
                        let cells = slot.get_mut();
                        if cells.1.is_some() {
                            return Err(ManifoldViolation::NonManifoldFace(key));
                        }
                        cells.1 = Some(ci);
                    }
                }
            }
        }
        Ok(Self { faces })
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Tetrahedra on `face` (any vertex order).
    pub fn cells_of(&self, face: [usize; 3]) -> Option<(usize, Option<usize>)> {
        self.faces.get(&sorted3(face)).copied()
    }

    /// Faces used by a single tetrahedron, oriented as in that tetrahedron,
    /// in cell order.
    pub fn outside_faces<C: AsRef<[usize]>>(&self, tets: &[C]) -> Vec<[usize; 3]> {
        let mut out = Vec::new();
        for cell in tets {
            let t = cell.as_ref();
            for local in TET_FACES {
                let face = local.map(|i| t[i]);
                if let Some((_, None)) = self.faces.get(&sorted3(face)) {
                    out.push(face);
                }
            }
        }
        out
    }

    /// `V − E + F − C` of the tetrahedral complex.
    pub fn euler_characteristic<C: AsRef<[usize]>>(&self, tets: &[C]) -> i64 {
        let mut verts: HashSet<usize> = HashSet::new();
        let mut edges: HashSet<[usize; 2]> = HashSet::new();
        for cell in tets {
            let t = cell.as_ref();
            verts.extend(t.iter().copied());
            for i in 0..t.len() {
                for j in i + 1..t.len() {
                    edges.insert(sorted2(t[i], t[j]));
                }
            }
        }
        verts.len() as i64 - edges.len() as i64 + self.faces.len() as i64 - tets.len() as i64
    }
}

/// Sorted edge → (first triangle, second triangle).
#[derive(Debug, Clone, Default)]
pub struct EdgeAdjacency {
    edges: HashMap<[usize; 2], (usize, Option<usize>)>,
}

impl EdgeAdjacency {
    pub fn build(triangles: &[[usize; 3]]) -> Result<Self, ManifoldViolation> {
        let mut edges: HashMap<[usize; 2], (usize, Option<usize>)> =
            HashMap::with_capacity(triangles.len() * 2);
        for (ti, tri) in triangles.iter().enumerate() {
            for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                let key = sorted2(tri[a], tri[b]);
                match edges.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert((ti, None));
                    }
                    Entry::Occupied(mut slot) => {
                        let tris = slot.get_mut();
                        if tris.1.is_some() {
                            return Err(ManifoldViolation::NonManifoldEdge(key));
                        }
                        tris.1 = Some(ti);
                    }
                }
            }
        }
        Ok(Self { edges })
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn triangles_of(&self, a: usize, b: usize) -> Option<(usize, Option<usize>)> {
        self.edges.get(&sorted2(a, b)).copied()
    }

    /// Edges bordering a single triangle, sorted.
    pub fn open_edges(&self) -> Vec<[usize; 2]> {
        let mut open: Vec<[usize; 2]> = self
            .edges
            .iter()
            .filter(|(_, (_, second))| second.is_none())
            .map(|(&e, _)| e)
            .collect();
        open.sort_unstable();
        open
    }
}

fn tet_array(cell: &[usize]) -> Result<[usize; 4], ManifoldViolation> {
    <[usize; 4]>::try_from(cell).map_err(|_| ManifoldViolation::MixedArity {
        expected: 4,
        found: cell.len(),
    })
}

/// Decide whether `cells` form an acceptable manifold patch.
///
/// # Errors
/// The first [`ManifoldViolation`] found, in the order: input shape and
/// duplicate cells, face sharing, Euler characteristic, edge sharing,
/// closedness, connectivity.
pub fn check_manifold<C: AsRef<[usize]>>(
    cells: &[C],
    options: ManifoldCheckOptions,
) -> Result<SurfaceSummary, ManifoldViolation> {
    let Some(first) = cells.first() else {
        return Err(ManifoldViolation::Empty);
    };
    let arity = first.as_ref().len();
    if arity != 3 && arity != 4 {
        return Err(ManifoldViolation::UnsupportedArity(arity));
    }
    let mut keys: HashSet<Vec<usize>> = HashSet::with_capacity(cells.len());
    for cell in cells {
        let c = cell.as_ref();
        if c.len() != arity {
            return Err(ManifoldViolation::MixedArity {
                expected: arity,
                found: c.len(),
            });
        }
        let distinct: HashSet<usize> = c.iter().copied().collect();
        if distinct.len() != c.len() {
            return Err(ManifoldViolation::DegenerateCell(c.to_vec()));
        }
        let mut key = c.to_vec();
        key.sort_unstable();
        if let Some(dup) = keys.replace(key) {
            return Err(ManifoldViolation::DuplicateCell(dup));
        }
    }

    let (surface, euler) = if arity == 3 {
        let tris: Vec<[usize; 3]> = cells
            .iter()
            .map(|c| {
                let c = c.as_ref();
                [c[0], c[1], c[2]]
            })
            .collect();
        (tris, None)
    } else {
        let adjacency = FaceAdjacency::build(cells)?;
        let chi = adjacency.euler_characteristic(cells);
        if options.check_euler && chi != 1 {
            return Err(ManifoldViolation::EulerCharacteristic(chi));
        }
        (adjacency.outside_faces(cells), Some(chi))
    };

    let edges = EdgeAdjacency::build(&surface)?;
    let open = edges.open_edges();
    if options.require_closed {
        if let Some(&e) = open.first() {
            return Err(ManifoldViolation::OpenBoundary(e));
        }
    }

    let reached = reachable_triangles(&surface, &edges);
    if reached != surface.len() {
        log::debug!("surface split: {reached} of {} triangles reachable", surface.len());
        return Err(ManifoldViolation::Disconnected {
            reached,
            total: surface.len(),
        });
    }

    Ok(SurfaceSummary {
        n_cells: cells.len(),
        n_surface_triangles: surface.len(),
        n_surface_edges: edges.n_edges(),
        n_open_edges: open.len(),
        euler,
    })
}

/// [`check_manifold`] as a predicate.
pub fn is_manifold<C: AsRef<[usize]>>(cells: &[C], options: ManifoldCheckOptions) -> bool {
    check_manifold(cells, options).is_ok()
}

/// Depth-first walk across edges shared by exactly two triangles.
fn reachable_triangles(surface: &[[usize; 3]], edges: &EdgeAdjacency) -> usize {
    if surface.is_empty() {
        return 0;
    }
    let mut seen = vec![false; surface.len()];
    let mut stack = vec![0usize];
    seen[0] = true;
    let mut count = 1;
    while let Some(t) = stack.pop() {
        let tri = surface[t];
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            let Some((first, Some(second))) = edges.triangles_of(tri[a], tri[b]) else {
                continue;
            };
            let next = if first == t { second } else { first };
            if !seen[next] {
                seen[next] = true;
                count += 1;
                stack.push(next);
            }
        }
    }
    count
}
