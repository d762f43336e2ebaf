//! Overload sets.
//!
//! [`OperatorSignatures`] holds every overload of one operator name, keyed
//! by signature. Resolution tries a direct lookup first, since most calls
//! hit an overload exactly, and only then scores every same-arity overload.

use std::hash::{Hash, Hasher};

use catalog_ir::{LibraryId, Name, OperatorId, Signature};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::{ConversionContext, OperatorMatch, OperatorMatches};
use crate::context::ResolveContext;
use crate::CatalogError;

/// One overload: an operator handle plus its signature.
///
/// Equality and hashing use the signature only.
#[derive(Clone, Debug)]
pub struct OperatorSignature {
    pub operator: OperatorId,
    /// Qualified operator name; also the owning map's name.
    pub name: Name,
    pub library: Option<LibraryId>,
    pub signature: Signature,
}

impl PartialEq for OperatorSignature {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for OperatorSignature {}

impl Hash for OperatorSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

/// All overloads of one name. No two share a signature.
#[derive(Clone, Debug, Default)]
pub struct OperatorSignatures {
    entries: Vec<OperatorSignature>,
    index: FxHashMap<Signature, usize>,
}

impl OperatorSignatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an overload. A duplicate signature is rejected and the set is left
    /// untouched.
    pub fn insert(&mut self, entry: OperatorSignature) -> Result<(), CatalogError> {
        if let Some(&existing) = self.index.get(&entry.signature) {
            return Err(CatalogError::DuplicateSignature {
                name: entry.name,
                existing: self.entries[existing].operator,
            });
        }
        self.index.insert(entry.signature.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn remove(&mut self, signature: &Signature) -> Option<OperatorSignature> {
        let position = self.index.remove(signature)?;
        let removed = self.entries.swap_remove(position);
        if let Some(moved) = self.entries.get(position) {
            self.index.insert(moved.signature.clone(), position);
        }
        Some(removed)
    }

    #[inline]
    pub fn get(&self, signature: &Signature) -> Option<&OperatorSignature> {
        self.index.get(signature).map(|&i| &self.entries[i])
    }

    #[inline]
    pub fn contains(&self, signature: &Signature) -> bool {
        self.index.contains_key(signature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperatorSignature> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score every overload against `call` into `matches`.
    pub fn resolve<'a>(
        &'a self,
        ctx: &mut ResolveContext<'_>,
        call: &Signature,
        is_exact: bool,
        matches: &mut OperatorMatches<'a>,
    ) {
        self.resolve_where(ctx, call, is_exact, matches, |_| true);
    }

    /// Like [`resolve`](Self::resolve), considering only overloads accepted by
    /// `admit`.
    pub fn resolve_where<'a>(
        &'a self,
        ctx: &mut ResolveContext<'_>,
        call: &Signature,
        is_exact: bool,
        matches: &mut OperatorMatches<'a>,
        admit: impl Fn(&OperatorSignature) -> bool,
    ) {
        if let Some(exact) = self.get(call).filter(|&s| admit(s)) {
            matches.add(OperatorMatch::exact(exact));
            return;
        }
        if is_exact {
            return;
        }

        let prune = ctx.config().prune_candidates;
        'candidates: for candidate in &self.entries {
            if candidate.signature.len() != call.len()
                || !admit(candidate)
                || matches.contains(candidate.operator)
            {
                continue;
            }

            let mut scored = OperatorMatch::new(candidate);
            for (arg, param) in call.iter().zip(candidate.signature.iter()) {
                if ctx.is(arg.ty, param.ty) {
                    scored.push_compatible();
                } else if arg.mode.is_by_reference() || param.mode.is_by_reference() {
                    scored.push_unconvertible();
                } else {
                    let path = ctx.conversion_path(arg.ty, param.ty);
                    scored.push_conversion(ConversionContext::new(arg.ty, param.ty, path));
                }

                if prune && matches.would_prune(&scored) {
                    trace!(operator = ?candidate.operator, "candidate pruned");
                    continue 'candidates;
                }
            }

            trace!(
                operator = ?candidate.operator,
                is_match = scored.is_match(),
                narrowing_score = scored.narrowing_score(),
                path_length = scored.path_length(),
                "candidate scored"
            );
            matches.add(scored);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
