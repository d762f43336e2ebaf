//! Operators and overload resolution.
//!
//! # Architecture
//!
//! ```text
//! OperatorMaps (name -> overload set, library-scoped resolve_call)
//!     └── OperatorMap (one name)
//!           └── OperatorSignatures (signature -> operator, scored resolve)
//!                 └── OperatorMatches / OperatorMatch (per-call scoring)
//! ```
//!
//! Operators themselves are owned by the catalog; everything in here holds
//! `OperatorId`s.

mod map;
mod matching;
mod signature;

pub use map::{BoundOperator, OperatorBinding, OperatorMap, OperatorMaps};
pub use matching::{ConversionContext, OperatorMatch, OperatorMatches};
pub use signature::{OperatorSignature, OperatorSignatures};

use catalog_ir::{Idx, LibraryId, Name, OperatorId, Signature};

/// A registered operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operator {
    pub id: OperatorId,
    /// Fully qualified name, e.g. `Math.Add`.
    pub name: Name,
    pub signature: Signature,
    pub return_type: Option<Idx>,
    /// Defining library; `None` for built-in operators.
    pub library: Option<LibraryId>,
}

/// Input for declaring an operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorDef {
    pub name: Name,
    pub signature: Signature,
    pub return_type: Option<Idx>,
    pub library: Option<LibraryId>,
}

impl OperatorDef {
    /// A built-in operator without a return value.
    pub fn new(name: Name, signature: Signature) -> Self {
        OperatorDef {
            name,
            signature,
            return_type: None,
            library: None,
        }
    }

    #[must_use]
    pub fn in_library(mut self, library: LibraryId) -> Self {
        self.library = Some(library);
        self
    }

    #[must_use]
    pub fn returning(mut self, ty: Idx) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Every type the operator mentions.
    pub fn types(&self) -> impl Iterator<Item = Idx> + '_ {
        self.signature.iter().map(|e| e.ty).chain(self.return_type)
    }
}

impl Operator {
    /// Whether `ty` appears in the signature or as the return type.
    pub fn mentions(&self, ty: Idx) -> bool {
        self.signature.mentions(ty) || self.return_type == Some(ty)
    }
}
