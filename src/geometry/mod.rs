//! Geometry utilities for simplex-mesh.
//!
//! Measures of live simplices evaluated from the vertex coordinate column.

pub mod metrics;

pub use metrics::{
    centroid, edge_length, face_normal, midpoint, simplex_measure, tet_volume, triangle_area,
};
