//! Stable handles into catalog-owned storage.
//!
//! Operators, conversions and libraries are owned by the catalog. Everything
//! else refers to them through these indices, never through copies.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a handle from an arena position.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Handle to an operator registered in the catalog.
    OperatorId
);

define_id!(
    /// Handle to a declared scalar conversion.
    ConversionId
);

define_id!(
    /// Handle to a library.
    LibraryId
);

impl LibraryId {
    /// The built-in system library, present in every catalog.
    pub const SYSTEM: LibraryId = LibraryId(0);
}
