//! Scalar type handle.
//!
//! `Idx` indexes the catalog's type table. Types are compared by index
//! equality (O(1)), never structurally.

use std::fmt;

/// A 32-bit index into the catalog's scalar type table.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    /// The universal placeholder type. Every type "is" generic.
    pub const GENERIC: Self = Self(0);

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    /// Create an index from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the type table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the generic placeholder.
    #[inline]
    pub const fn is_generic(self) -> bool {
        self.0 == Self::GENERIC.0
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_generic() {
            write!(f, "Idx::GENERIC")
        } else if self.is_none() {
            write!(f, "Idx::NONE")
        } else {
            write!(f, "Idx({})", self.0)
        }
    }
}

impl Default for Idx {
    fn default() -> Self {
        Self::NONE
    }
}
