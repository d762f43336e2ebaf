//! Catalog IR - shared identifiers for operator resolution.
//!
//! This crate holds the small, copyable handles every other catalog crate
//! passes around:
//! - `Name` for interned operator, library and type names
//! - `Idx` for scalar types
//! - `OperatorId`, `ConversionId`, `LibraryId` for catalog-owned objects
//! - `Signature` for overload identity
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), Types → Idx(u32)
//! - **Index, Don't Own**: operators and conversions are owned by the
//!   catalog; everything else holds their ids

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod idx;
mod ids;
mod interner;
mod name;
mod signature;

pub use idx::Idx;
pub use ids::{ConversionId, LibraryId, OperatorId};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use signature::{PassingMode, Signature, SignatureElement};

mod size_asserts {
    use super::{Idx, Name, OperatorId, SignatureElement};
    static_assert_size!(Name, 4);
    static_assert_size!(Idx, 4);
    static_assert_size!(OperatorId, 4);
    // Idx (4) + PassingMode (1), padded
    static_assert_size!(SignatureElement, 8);
}
