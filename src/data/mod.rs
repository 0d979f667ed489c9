//! Attribute storage: named, typed per-simplex columns grouped by dimension.
//!
//! - [`property`]: the type-erased column trait and the typed `Property<T>`.
//! - [`simplex_property`]: all columns of one dimension, resized and swapped
//!   together.
//! - [`property_manager`]: one column set per dimension, addressed by handle.

pub mod property;
pub mod property_manager;
pub mod simplex_property;
