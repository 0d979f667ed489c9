//! Per-simplex status bits stored in the `<status>` attribute column.

use std::fmt;

/// Bitfield attached to every simplex.
///
/// Traversal bookkeeping does not live here; every query owns its visited set.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SimplexStatus(u8);

impl SimplexStatus {
    /// Tombstoned: logically absent, physically retained until compaction.
    pub const DELETED: u8 = 0b0000_0001;
    /// Lies on the mesh boundary (set by `mark_boundary`).
    pub const BOUNDARY: u8 = 0b0000_0010;

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, bit: u8) -> bool {
        self.0 & bit == bit
    }

    #[inline]
    pub fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    #[inline]
    pub const fn is_deleted(self) -> bool {
        self.contains(Self::DELETED)
    }

    #[inline]
    pub const fn is_boundary(self) -> bool {
        self.contains(Self::BOUNDARY)
    }
}

impl fmt::Debug for SimplexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.is_deleted() {
            flags.push("DELETED");
        }
        if self.is_boundary() {
            flags.push("BOUNDARY");
        }
        write!(f, "SimplexStatus({})", flags.join("|"))
    }
}
