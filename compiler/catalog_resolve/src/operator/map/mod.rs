//! Catalog-wide operator index and library-scoped call resolution.
//!
//! `resolve_call` walks the caller's name resolution path nearest level
//! first. An exact match at a level binds immediately and shadows every
//! farther level. Partial matches are accumulated across all levels and
//! bound only if one of them is unambiguous overall. Operators outside the
//! path are consulted last.

use std::collections::{BTreeMap, BTreeSet};

use catalog_ir::{LibraryId, Name, OperatorId, SharedInterner, Signature};
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{Operator, OperatorMatch, OperatorMatches, OperatorSignature, OperatorSignatures};
use crate::context::ResolveContext;
use crate::conversion::ScalarConversionPath;
use crate::error::{ClosestCandidate, ResolutionFailure};
use crate::library::NameResolutionPath;
use crate::CatalogError;

/// All overloads sharing one qualified name.
#[derive(Clone, Debug)]
pub struct OperatorMap {
    name: Name,
    library: Option<LibraryId>,
    signatures: OperatorSignatures,
}

impl OperatorMap {
    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    /// Library of the earliest-registered overload still present.
    ///
    /// Informational only: level filtering looks at each overload's own
    /// library.
    #[inline]
    pub fn library(&self) -> Option<LibraryId> {
        self.library
    }

    #[inline]
    pub fn signatures(&self) -> &OperatorSignatures {
        &self.signatures
    }
}

/// Name to overload set index.
#[derive(Clone)]
pub struct OperatorMaps {
    interner: SharedInterner,
    maps: BTreeMap<Name, OperatorMap>,
    /// Last name segment to every qualified name ending in it.
    by_unqualified: FxHashMap<Name, BTreeSet<Name>>,
}

impl OperatorMaps {
    pub fn new(interner: SharedInterner) -> Self {
        OperatorMaps {
            interner,
            maps: BTreeMap::new(),
            by_unqualified: FxHashMap::default(),
        }
    }

    /// Index an operator. On a duplicate signature nothing changes.
    pub fn add_operator(&mut self, operator: &Operator) -> Result<(), CatalogError> {
        let entry = OperatorSignature {
            operator: operator.id,
            name: operator.name,
            library: operator.library,
            signature: operator.signature.clone(),
        };
        if let Some(map) = self.maps.get_mut(&operator.name) {
            return map.signatures.insert(entry);
        }

        let mut signatures = OperatorSignatures::new();
        signatures.insert(entry)?;
        self.maps.insert(
            operator.name,
            OperatorMap {
                name: operator.name,
                library: operator.library,
                signatures,
            },
        );
        let unqualified = self.unqualified(operator.name);
        self.by_unqualified
            .entry(unqualified)
            .or_default()
            .insert(operator.name);
        Ok(())
    }

    /// Remove an operator's overload. Returns `false` if it was not indexed.
    pub fn remove_operator(&mut self, operator: &Operator) -> bool {
        let Some(map) = self.maps.get_mut(&operator.name) else {
            return false;
        };
        if map.signatures.get(&operator.signature).map(|s| s.operator) != Some(operator.id) {
            return false;
        }
        map.signatures.remove(&operator.signature);
        // Operator ids grow with registration, so the smallest is the oldest.
        if let Some(oldest) = map.signatures.iter().min_by_key(|s| s.operator) {
            map.library = oldest.library;
        }

        if map.signatures.is_empty() {
            self.maps.remove(&operator.name);
            let unqualified = self.unqualified(operator.name);
            if let Some(names) = self.by_unqualified.get_mut(&unqualified) {
                names.remove(&operator.name);
                if names.is_empty() {
                    self.by_unqualified.remove(&unqualified);
                }
            }
        }
        true
    }

    pub fn contains_operator(&self, operator: &Operator) -> bool {
        self.maps
            .get(&operator.name)
            .and_then(|m| m.signatures.get(&operator.signature))
            .is_some_and(|s| s.operator == operator.id)
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&OperatorMap> {
        self.maps.get(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperatorMap> {
        self.maps.values()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    fn unqualified(&self, name: Name) -> Name {
        let text = self.interner.lookup(name);
        match text.rsplit_once('.') {
            Some((_, last)) => self.interner.intern(last),
            None => name,
        }
    }

    /// Maps a call name refers to.
    ///
    /// `Add` matches `Add`, `Math.Add` and `A.Math.Add`; `Math.Add` matches
    /// only names ending in `Math.Add`; a leading `.` requires the exact
    /// qualified name.
    pub fn lookup(&self, name: Name) -> Vec<&OperatorMap> {
        let text = self.interner.lookup(name);
        if let Some(rooted) = text.strip_prefix('.') {
            return self
                .interner
                .get(rooted)
                .and_then(|n| self.maps.get(&n))
                .into_iter()
                .collect();
        }

        let last = text.rsplit_once('.').map_or(text, |(_, last)| last);
        let Some(unqualified) = self.interner.get(last) else {
            return Vec::new();
        };
        let Some(names) = self.by_unqualified.get(&unqualified) else {
            return Vec::new();
        };
        names
            .iter()
            .filter(|&&full| {
                let full_text = self.interner.lookup(full);
                full_text == text
                    || full_text
                        .strip_suffix(text)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
            .filter_map(|full| self.maps.get(full))
            .collect()
    }

    /// Bind a call to one operator, or explain why it cannot be bound.
    #[tracing::instrument(level = "debug", skip_all, fields(
        name = ?name,
        arity = signature.len(),
        is_exact = is_exact,
    ))]
    pub fn resolve_call(
        &self,
        ctx: &mut ResolveContext<'_>,
        name: Name,
        path: &NameResolutionPath,
        signature: &Signature,
        is_exact: bool,
    ) -> OperatorBinding {
        let maps = self.lookup(name);
        let mut binding = OperatorBinding::unresolved(name, signature.clone());
        if maps.is_empty() {
            debug!("no operator with this name");
            return binding;
        }

        let mut accumulated = OperatorMatches::new();
        for (depth, level) in path.levels().iter().enumerate() {
            let mut level_matches = OperatorMatches::new();
            for map in &maps {
                let admit = |s: &OperatorSignature| level.admits(s.library);
                if map.signatures.iter().any(admit) {
                    binding.candidate_names.insert(map.name);
                }
                map.signatures
                    .resolve_where(ctx, signature, is_exact, &mut level_matches, admit);
            }

            if level_matches.is_exact() {
                if let Some(best) = level_matches.best_match() {
                    debug!(depth, operator = ?best.operator(), "bound exactly");
                    binding.bind(best);
                    return binding;
                }
            }
            accumulated.merge(level_matches);
        }

        if let Some(best) = accumulated.best_match() {
            debug!(operator = ?best.operator(), "bound with conversions");
            binding.bind(best);
            return binding;
        }

        let mut local = OperatorMatches::new();
        for map in &maps {
            map.signatures.resolve(ctx, signature, is_exact, &mut local);
        }
        if local.is_exact() {
            if let Some(best) = local.best_match() {
                debug!(operator = ?best.operator(), "bound outside resolution path");
                binding.bind(best);
                return binding;
            }
        }

        let local_ambiguous = local.is_ambiguous();
        accumulated.merge(local);
        binding
            .candidate_names
            .extend(maps.iter().map(|m| m.name));
        binding.ambiguous = accumulated.is_ambiguous() || local_ambiguous;
        binding.closest = accumulated.closest_match().map(|m| ClosestCandidate {
            operator: m.operator(),
            name: m.operator_signature().name,
            signature: m.signature().clone(),
        });
        debug!(
            candidates = binding.candidate_names.len(),
            ambiguous = binding.ambiguous,
            "call unresolved"
        );
        binding
    }
}

/// A successfully bound call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundOperator {
    pub operator: OperatorId,
    /// Name of the owning operator map.
    pub map: Name,
    /// Per-argument conversions to apply; `None` where the argument passes
    /// unchanged.
    pub conversions: Vec<Option<ScalarConversionPath>>,
    pub is_exact: bool,
}

/// Outcome of `resolve_call`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorBinding {
    pub name: Name,
    pub signature: Signature,
    pub operator: Option<BoundOperator>,
    /// Operator maps considered, for diagnostics.
    pub candidate_names: BTreeSet<Name>,
    pub closest: Option<ClosestCandidate>,
    pub ambiguous: bool,
}

impl OperatorBinding {
    fn unresolved(name: Name, signature: Signature) -> Self {
        OperatorBinding {
            name,
            signature,
            operator: None,
            candidate_names: BTreeSet::new(),
            closest: None,
            ambiguous: false,
        }
    }

    fn bind(&mut self, best: &OperatorMatch<'_>) {
        self.operator = Some(BoundOperator {
            operator: best.operator(),
            map: best.operator_signature().name,
            conversions: best
                .conversions()
                .iter()
                .map(|c| c.as_ref().and_then(|c| c.path.clone()))
                .collect(),
            is_exact: best.is_exact(),
        });
        self.candidate_names.insert(best.operator_signature().name);
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.operator.is_some()
    }

    /// The bound operator id, if any.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.operator.as_ref().map(|b| b.operator)
    }

    /// Why the call did not bind; `None` when it did.
    pub fn failure(&self) -> Option<ResolutionFailure> {
        if self.is_resolved() {
            return None;
        }
        if self.candidate_names.is_empty() {
            return Some(ResolutionFailure::NotFound { name: self.name });
        }

        let candidates: Vec<Name> = self.candidate_names.iter().copied().collect();
        Some(if self.ambiguous {
            ResolutionFailure::Ambiguous {
                name: self.name,
                signature: self.signature.clone(),
                candidates,
            }
        } else {
            ResolutionFailure::NoMatchingSignature {
                name: self.name,
                signature: self.signature.clone(),
                candidates,
                closest: self.closest.clone(),
            }
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
