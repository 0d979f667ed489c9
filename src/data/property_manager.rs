//! Per-dimension attribute stores addressed by simplex handle.

use crate::data::property::PropertyValue;
use crate::data::simplex_property::{PropertyId, SimplexProperty};
use crate::mesh_error::MeshError;
use crate::topology::handle::SimplexHandle;

/// One [`SimplexProperty`] per dimension `0..=top_dim`.
#[derive(Clone, Debug, Default)]
pub struct PropertyManager {
    per_dim: Vec<SimplexProperty>,
}

impl PropertyManager {
    /// Discard everything and allocate empty stores for `0..=top_dim`.
    pub fn set_dim(&mut self, top_dim: usize) {
        self.per_dim = (0..=top_dim).map(SimplexProperty::new).collect();
    }

    pub fn n_dims(&self) -> usize {
        self.per_dim.len()
    }

    pub fn simplex_property(&self, dim: usize) -> &SimplexProperty {
        &self.per_dim[dim]
    }

    pub fn simplex_property_mut(&mut self, dim: usize) -> &mut SimplexProperty {
        &mut self.per_dim[dim]
    }

    pub fn add_property<T: PropertyValue>(
        &mut self,
        dim: usize,
        default: T,
        name: &str,
    ) -> Result<PropertyId<T>, MeshError> {
        self.per_dim[dim].add_property(default, name)
    }

    pub fn get_element_property<T: PropertyValue>(
        &self,
        h: SimplexHandle,
        id: PropertyId<T>,
    ) -> &T {
        &self.per_dim[h.dim()].property(id)[h.idx()]
    }

    pub fn get_element_property_mut<T: PropertyValue>(
        &mut self,
        h: SimplexHandle,
        id: PropertyId<T>,
    ) -> &mut T {
        &mut self.per_dim[h.dim()].property_mut(id)[h.idx()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimplexProperty> {
        self.per_dim.iter()
    }

    pub fn clear(&mut self) {
        for sp in &mut self.per_dim {
            sp.clear();
        }
    }
}
