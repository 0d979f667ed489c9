//! All attribute columns of one simplex dimension.

use std::fmt;
use std::marker::PhantomData;

use crate::data::property::{BaseProperty, Property, PropertyValue};
use crate::mesh_error::MeshError;

/// Typed slot number of a column inside a [`SimplexProperty`].
///
/// The type parameter records what the column held when the id was issued;
/// every access still re-checks it at runtime.
pub struct PropertyId<T> {
    slot: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PropertyId<T> {
    pub(crate) const fn new(slot: usize) -> Self {
        Self {
            slot,
            _marker: PhantomData,
        }
    }

    pub const fn slot(self) -> usize {
        self.slot
    }
}

impl<T> Clone for PropertyId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyId<T> {}

impl<T> PartialEq for PropertyId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl<T> Eq for PropertyId<T> {}

impl<T> fmt::Debug for PropertyId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId<{}>({})", std::any::type_name::<T>(), self.slot)
    }
}

/// Column set for one dimension. Every column always has exactly
/// `n_elements` slots.
#[derive(Clone, Debug, Default)]
pub struct SimplexProperty {
    dim: usize,
    n_elements: usize,
    columns: Vec<Option<Box<dyn BaseProperty>>>,
}

impl SimplexProperty {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            n_elements: 0,
            columns: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of simplices (slots per column).
    pub fn len(&self) -> usize {
        self.n_elements
    }

    pub fn is_empty(&self) -> bool {
        self.n_elements == 0
    }

    /// Register a new column filled with `default`.
    ///
    /// A name already in use on this dimension is rejected and the store is
    /// left unchanged.
    pub fn add_property<T: PropertyValue>(
        &mut self,
        default: T,
        name: &str,
    ) -> Result<PropertyId<T>, MeshError> {
        if self.position(name).is_some() {
            log::warn!("property `{name}` already exists on dimension {}", self.dim);
            return Err(MeshError::DuplicateProperty {
                dim: self.dim,
                name: name.to_owned(),
            });
        }
        let mut column = Property::new(name, default);
        column.resize(self.n_elements);
        let boxed: Box<dyn BaseProperty> = Box::new(column);
        let slot = match self.columns.iter().position(Option::is_none) {
            Some(free) => {
                self.columns[free] = Some(boxed);
                free
            }
            None => {
                self.columns.push(Some(boxed));
                self.columns.len() - 1
            }
        };
        Ok(PropertyId::new(slot))
    }

    /// Look up a column by name; `None` if absent or holding another type.
    pub fn find_property<T: PropertyValue>(&self, name: &str) -> Option<PropertyId<T>> {
        let slot = self.position(name)?;
        let col = self.columns[slot].as_deref()?;
        col.as_any()
            .is::<Property<T>>()
            .then(|| PropertyId::new(slot))
    }

    /// Drop a column. Other ids stay valid; the freed slot may be reused.
    pub fn remove_property<T>(&mut self, id: PropertyId<T>) -> bool {
        self.columns
            .get_mut(id.slot)
            .and_then(Option::take)
            .is_some()
    }

    /// Typed column access.
    ///
    /// # Panics
    /// Panics if the slot is empty or the stored column is not a `Property<T>`.
    pub fn property<T: PropertyValue>(&self, id: PropertyId<T>) -> &Property<T> {
        let col = self.column(id.slot);
        let found = col.value_type_name();
        col.as_any()
            .downcast_ref::<Property<T>>()
            .unwrap_or_else(|| type_mismatch::<T>(found))
    }

    /// Mutable typed column access. Panics like [`property`](Self::property).
    pub fn property_mut<T: PropertyValue>(&mut self, id: PropertyId<T>) -> &mut Property<T> {
        let col = self.column_mut(id.slot);
        let found = col.value_type_name();
        col.as_any_mut()
            .downcast_mut::<Property<T>>()
            .unwrap_or_else(|| type_mismatch::<T>(found))
    }

    /// Iterate over the registered columns in slot order.
    pub fn columns(&self) -> impl Iterator<Item = &dyn BaseProperty> + '_ {
        self.columns.iter().filter_map(|c| c.as_deref())
    }

    pub fn n_properties(&self) -> usize {
        self.columns.iter().flatten().count()
    }

    pub fn push_back(&mut self) -> usize {
        for col in self.columns.iter_mut().flatten() {
            col.push_default();
        }
        self.n_elements += 1;
        self.n_elements - 1
    }

    pub fn resize(&mut self, n: usize) {
        for col in self.columns.iter_mut().flatten() {
            col.resize(n);
        }
        self.n_elements = n;
    }

    pub fn reserve(&mut self, additional: usize) {
        for col in self.columns.iter_mut().flatten() {
            col.reserve(additional);
        }
    }

    /// Empty every column but keep the column set registered.
    pub fn clear(&mut self) {
        for col in self.columns.iter_mut().flatten() {
            col.clear();
        }
        self.n_elements = 0;
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(
            i < self.n_elements && j < self.n_elements,
            "swap({i}, {j}) out of range for {} simplices",
            self.n_elements
        );
        for col in self.columns.iter_mut().flatten() {
            col.swap(i, j);
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.as_deref().is_some_and(|c| c.name() == name))
    }

    fn column(&self, slot: usize) -> &dyn BaseProperty {
        match self.columns.get(slot) {
            Some(Some(col)) => col.as_ref(),
            _ => panic!("no property in slot {slot} of dimension {}", self.dim),
        }
    }

    fn column_mut(&mut self, slot: usize) -> &mut dyn BaseProperty {
        let dim = self.dim;
        match self.columns.get_mut(slot) {
            Some(Some(col)) => col.as_mut(),
            _ => panic!("no property in slot {slot} of dimension {dim}"),
        }
    }
}

#[cold]
fn type_mismatch<T>(found: &str) -> ! {
    panic!(
        "property type mismatch: requested {}, column holds {found}",
        std::any::type_name::<T>()
    )
}
