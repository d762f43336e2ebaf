//! Catalog errors and resolution failures.
//!
//! Only invariant violations are errors. A call that cannot be bound is a
//! normal outcome and is described by [`ResolutionFailure`].

use catalog_diagnostic::{Diagnostic, ErrorCode, Suggestion};
use catalog_ir::{ConversionId, Idx, LibraryId, Name, OperatorId, Signature, StringInterner};

use crate::types::TypeRegistry;

/// Rejected catalog mutation.
///
/// A mutation that returns an error has left the catalog unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("an overload with the same signature is already registered as {existing:?}")]
    DuplicateSignature { name: Name, existing: OperatorId },
    #[error("unknown operator {0:?}")]
    UnknownOperator(OperatorId),
    #[error("unknown scalar type {0:?}")]
    UnknownScalarType(Idx),
    #[error("unknown conversion {0:?}")]
    UnknownConversion(ConversionId),
    #[error("unknown library {0:?}")]
    UnknownLibrary(LibraryId),
    #[error("name {name:?} is already taken")]
    DuplicateName { name: Name },
    #[error("scalar type {ty:?} is still used by {user:?}")]
    TypeInUse { ty: Idx, user: Name },
    #[error("scalar type {0:?} is reserved")]
    ReservedType(Idx),
    #[error("no free {kind} ids left")]
    CapacityExceeded { kind: &'static str },
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::DuplicateSignature { .. } => ErrorCode::E2001,
            CatalogError::UnknownOperator(_) => ErrorCode::E2002,
            CatalogError::UnknownScalarType(_) => ErrorCode::E2003,
            CatalogError::UnknownConversion(_) => ErrorCode::E2004,
            CatalogError::UnknownLibrary(_) => ErrorCode::E2005,
            CatalogError::DuplicateName { .. } => ErrorCode::E2006,
            CatalogError::TypeInUse { .. } => ErrorCode::E2007,
            CatalogError::ReservedType(_) => ErrorCode::E2008,
            CatalogError::CapacityExceeded { .. } => ErrorCode::E9001,
        }
    }

    /// Convert to a diagnostic with names rendered through the interner.
    pub fn to_diagnostic(&self, interner: &StringInterner) -> Diagnostic {
        let code = self.code();
        match self {
            CatalogError::DuplicateSignature { name, existing } => Diagnostic::error(
                code,
                format!(
                    "operator `{}` already has an overload with this signature",
                    interner.lookup(*name)
                ),
            )
            .with_note(format!("the existing overload is {existing:?}"))
            .with_suggestion(Suggestion::text(
                "drop the existing overload first, or change a parameter type",
                1,
            )),
            CatalogError::DuplicateName { name } => Diagnostic::error(
                code,
                format!("`{}` is already defined in this catalog", interner.lookup(*name)),
            ),
            CatalogError::TypeInUse { ty, user } => {
                Diagnostic::error(code, format!("scalar type {ty:?} is still in use"))
                    .with_note(format!("referenced by `{}`", interner.lookup(*user)))
            }
            CatalogError::UnknownOperator(_)
            | CatalogError::UnknownScalarType(_)
            | CatalogError::UnknownConversion(_)
            | CatalogError::UnknownLibrary(_)
            | CatalogError::ReservedType(_)
            | CatalogError::CapacityExceeded { .. } => Diagnostic::error(code, self.to_string()),
        }
    }
}

/// The overload closest to a failed call, for "did you mean" hints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosestCandidate {
    pub operator: OperatorId,
    pub name: Name,
    pub signature: Signature,
}

/// Why a call could not be bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// No operator map matched the name at all.
    NotFound { name: Name },
    /// The name exists but no overload accepts the arguments.
    NoMatchingSignature {
        name: Name,
        signature: Signature,
        candidates: Vec<Name>,
        closest: Option<ClosestCandidate>,
    },
    /// Several overloads are equally good.
    Ambiguous {
        name: Name,
        signature: Signature,
        candidates: Vec<Name>,
    },
}

impl ResolutionFailure {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolutionFailure::NotFound { .. } => ErrorCode::E1001,
            ResolutionFailure::NoMatchingSignature { .. } => ErrorCode::E1002,
            ResolutionFailure::Ambiguous { .. } => ErrorCode::E1003,
        }
    }

    /// Convert to a diagnostic, rendering signatures with catalog type names.
    pub fn to_diagnostic(&self, interner: &StringInterner, types: &TypeRegistry) -> Diagnostic {
        let code = self.code();
        match self {
            ResolutionFailure::NotFound { name } => Diagnostic::error(
                code,
                format!("unknown operator `{}`", interner.lookup(*name)),
            )
            .with_suggestion(Suggestion::text(
                "check spelling, or require the library that defines it",
                1,
            )),
            ResolutionFailure::NoMatchingSignature {
                name,
                signature,
                candidates,
                closest,
            } => {
                let message = format!(
                    "no overload of `{}` accepts {}",
                    interner.lookup(*name),
                    types.format_signature(signature, interner)
                );
                let diag = Diagnostic::error(code, message)
                    .with_note(candidate_note(candidates, interner));
                match closest {
                    Some(closest) => diag.with_suggestion(Suggestion::did_you_mean(format!(
                        "{}{}",
                        interner.lookup(closest.name),
                        types.format_signature(&closest.signature, interner)
                    ))),
                    None => diag,
                }
            }
            ResolutionFailure::Ambiguous {
                name,
                signature,
                candidates,
            } => Diagnostic::error(
                code,
                format!(
                    "ambiguous call to `{}` with {}",
                    interner.lookup(*name),
                    types.format_signature(signature, interner)
                ),
            )
            .with_note(candidate_note(candidates, interner))
            .with_suggestion(Suggestion::text(
                "convert the arguments explicitly to pick one overload",
                1,
            )),
        }
    }
}

fn candidate_note(candidates: &[Name], interner: &StringInterner) -> String {
    let names: Vec<_> = candidates.iter().map(|n| interner.lookup(*n)).collect();
    format!("candidates: {}", names.join(", "))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
mod tests;
