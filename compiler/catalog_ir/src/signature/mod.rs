//! Operator signatures.
//!
//! A signature is the ordered list of `(type, passing mode)` slots of one
//! overload. Two signatures are equal iff they have the same length and are
//! element-wise equal, which is what the overload index keys on.

use smallvec::SmallVec;
use std::fmt;

use crate::Idx;

/// How an argument is passed to its parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum PassingMode {
    /// Passed by value into the operator.
    #[default]
    Value,
    /// Written by the operator and handed back by value.
    Out,
    /// Passed by reference. Never implicitly converted.
    Ref,
}

impl PassingMode {
    /// By-reference slots require the exact type.
    #[inline]
    pub const fn is_by_reference(self) -> bool {
        matches!(self, PassingMode::Ref)
    }
}

impl fmt::Display for PassingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassingMode::Value => Ok(()),
            PassingMode::Out => write!(f, "out "),
            PassingMode::Ref => write!(f, "var "),
        }
    }
}

/// One parameter slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureElement {
    pub ty: Idx,
    pub mode: PassingMode,
}

impl SignatureElement {
    /// A by-value slot of the given type.
    #[inline]
    pub const fn value(ty: Idx) -> Self {
        SignatureElement {
            ty,
            mode: PassingMode::Value,
        }
    }

    #[inline]
    pub const fn new(ty: Idx, mode: PassingMode) -> Self {
        SignatureElement { ty, mode }
    }
}

/// Ordered, immutable parameter list identifying one overload.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    elements: SmallVec<[SignatureElement; 4]>,
}

impl Signature {
    /// The empty signature of a niladic operator.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a signature from explicit slots.
    pub fn new(elements: impl IntoIterator<Item = SignatureElement>) -> Self {
        Signature {
            elements: elements.into_iter().collect(),
        }
    }

    /// Build a signature where every slot is passed by value.
    pub fn from_types(types: &[Idx]) -> Self {
        Self::new(types.iter().copied().map(SignatureElement::value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&SignatureElement> {
        self.elements.get(index)
    }

    #[inline]
    pub fn elements(&self) -> &[SignatureElement] {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureElement> {
        self.elements.iter()
    }

    /// Check whether any slot mentions `ty`.
    pub fn mentions(&self, ty: Idx) -> bool {
        self.elements.iter().any(|e| e.ty == ty)
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a SignatureElement;
    type IntoIter = std::slice::Iter<'a, SignatureElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
