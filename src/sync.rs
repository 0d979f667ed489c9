//! Exclusive-lock wrapper for sharing one kernel between threads.
//!
//! The kernel edits incidence lists and its index in place, so readers must
//! never observe a mutation halfway through. [`SharedMesh`] serializes every
//! access behind a single `parking_lot::Mutex`; there is no reader/writer
//! split.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::topology::kernel::TopologyKernel;
use crate::topology::operation::TopologyOperation;

/// Cloneable handle to a kernel guarded by one exclusive lock.
#[derive(Clone, Debug)]
pub struct SharedMesh {
    inner: Arc<Mutex<TopologyKernel>>,
}

impl SharedMesh {
    pub fn new(mesh: TopologyKernel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(mesh)),
        }
    }

    /// Run `f` with shared access to the kernel.
    pub fn read<R>(&self, f: impl FnOnce(&TopologyKernel) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    /// Run `f` with exclusive access to the kernel.
    pub fn write<R>(&self, f: impl FnOnce(&mut TopologyKernel) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Run a mutation under the lock.
    pub fn with_operation<R>(&self, f: impl FnOnce(&mut TopologyOperation<'_>) -> R) -> R {
        let mut guard = self.inner.lock();
        let mut op = TopologyOperation::new(&mut guard);
        f(&mut op)
    }

    /// Take the kernel back if this is the last handle.
    pub fn try_unwrap(self) -> Result<TopologyKernel, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<TopologyKernel> for SharedMesh {
    fn from(mesh: TopologyKernel) -> Self {
        Self::new(mesh)
    }
}
