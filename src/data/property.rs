//! Type-erased attribute columns.
//!
//! A [`Property<T>`] is a named dense column holding one `T` per simplex of a
//! dimension. The kernel needs to grow, shrink, swap and clone *every* column
//! of a dimension at once without knowing what types callers attached, so
//! columns are stored as `Box<dyn BaseProperty>` and typed access goes through
//! a checked downcast.

use std::any::Any;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Value types that can be stored in an attribute column.
pub trait PropertyValue: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> PropertyValue for T {}

/// Uniform capability over a column of unknown element type.
pub trait BaseProperty: Send + Sync {
    fn name(&self) -> &str;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Grow with the column default, or truncate.
    fn resize(&mut self, n: usize);
    fn reserve(&mut self, additional: usize);
    fn clear(&mut self);
    fn push_default(&mut self);
    fn swap(&mut self, i: usize, j: usize);
    fn clone_box(&self) -> Box<dyn BaseProperty>;
    /// `std::any::type_name` of the element type, for diagnostics.
    fn value_type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn BaseProperty> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl fmt::Debug for dyn BaseProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name())
            .field("type", &self.value_type_name())
            .field("len", &self.len())
            .finish()
    }
}

/// Named dense column of `T`.
#[derive(Clone, Debug)]
pub struct Property<T> {
    name: String,
    default: T,
    data: Vec<T>,
}

impl<T: PropertyValue> Property<T> {
    pub fn new(name: impl Into<String>, default: T) -> Self {
        Self {
            name: name.into(),
            default,
            data: Vec::new(),
        }
    }

    /// Value used to fill slots created by `resize`/`push_default`.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Overwrite every slot with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Index<usize> for Property<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Property<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: PropertyValue> BaseProperty for Property<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn resize(&mut self, n: usize) {
        self.data.resize(n, self.default.clone());
    }

    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn push_default(&mut self) {
        self.data.push(self.default.clone());
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.data.swap(i, j);
    }

    fn clone_box(&self) -> Box<dyn BaseProperty> {
        Box::new(self.clone())
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
