//! Per-call candidate scoring.
//!
//! An [`OperatorMatch`] records, position by position, whether a call
//! argument reaches the candidate's parameter and through which conversion.
//! [`OperatorMatches`] aggregates candidates and selects the binding:
//!
//! 1. Highest narrowing score wins (closest to zero).
//! 2. Among those, the shortest total conversion length wins.
//! 3. An exact candidate beats every converting one.
//! 4. Any remaining tie means no binding.

use std::cmp::Reverse;

use catalog_ir::{Idx, OperatorId, Signature};
use smallvec::SmallVec;

use super::OperatorSignature;
use crate::conversion::ScalarConversionPath;

/// Conversion result for one argument position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionContext {
    pub source: Idx,
    pub target: Idx,
    /// The unique best path, or `None` when unconvertible or ambiguous.
    pub path: Option<ScalarConversionPath>,
}

impl ConversionContext {
    pub fn new(source: Idx, target: Idx, path: Option<ScalarConversionPath>) -> Self {
        ConversionContext {
            source,
            target,
            path,
        }
    }

    #[inline]
    pub fn can_convert(&self) -> bool {
        self.path.is_some()
    }

    /// `i32::MIN` when unconvertible.
    pub fn narrowing_score(&self) -> i32 {
        self.path
            .as_ref()
            .map_or(i32::MIN, ScalarConversionPath::narrowing_score)
    }

    /// `usize::MAX` when unconvertible.
    pub fn path_length(&self) -> usize {
        self.path.as_ref().map_or(usize::MAX, ScalarConversionPath::len)
    }
}

/// One candidate overload scored against one call.
#[derive(Clone, Debug)]
pub struct OperatorMatch<'a> {
    signature: &'a OperatorSignature,
    exact: bool,
    can_convert: SmallVec<[bool; 4]>,
    conversions: SmallVec<[Option<ConversionContext>; 4]>,
    /// Running totals; saturate to the sentinels once a position fails.
    narrowing_score: i32,
    path_length: usize,
    /// Totals over convertible positions only, for diagnostics.
    partial_narrowing_score: i32,
    partial_path_length: usize,
}

impl<'a> OperatorMatch<'a> {
    /// A candidate found by direct signature lookup.
    pub fn exact(signature: &'a OperatorSignature) -> Self {
        let arity = signature.signature.len();
        OperatorMatch {
            signature,
            exact: true,
            can_convert: SmallVec::from_elem(true, arity),
            conversions: SmallVec::from_elem(None, arity),
            narrowing_score: 0,
            path_length: 0,
            partial_narrowing_score: 0,
            partial_path_length: 0,
        }
    }

    /// An empty candidate, scored position by position with the `push_*`
    /// methods.
    pub fn new(signature: &'a OperatorSignature) -> Self {
        OperatorMatch {
            signature,
            exact: false,
            can_convert: SmallVec::new(),
            conversions: SmallVec::new(),
            narrowing_score: 0,
            path_length: 0,
            partial_narrowing_score: 0,
            partial_path_length: 0,
        }
    }

    /// The argument already "is" the parameter type.
    pub fn push_compatible(&mut self) {
        self.can_convert.push(true);
        self.conversions.push(None);
    }

    /// The argument cannot reach the parameter at all.
    pub fn push_unconvertible(&mut self) {
        self.can_convert.push(false);
        self.conversions.push(None);
        self.fail();
    }

    /// The argument needs a conversion; `context.path` decides whether one
    /// exists.
    pub fn push_conversion(&mut self, context: ConversionContext) {
        if context.can_convert() {
            let score = context.narrowing_score();
            let length = context.path_length();
            self.narrowing_score = self.narrowing_score.saturating_add(score);
            self.path_length = self.path_length.saturating_add(length);
            self.partial_narrowing_score = self.partial_narrowing_score.saturating_add(score);
            self.partial_path_length = self.partial_path_length.saturating_add(length);
            self.can_convert.push(true);
        } else {
            self.can_convert.push(false);
            self.fail();
        }
        self.conversions.push(Some(context));
    }

    fn fail(&mut self) {
        self.narrowing_score = i32::MIN;
        self.path_length = usize::MAX;
    }

    #[inline]
    pub fn operator(&self) -> OperatorId {
        self.signature.operator
    }

    #[inline]
    pub fn operator_signature(&self) -> &'a OperatorSignature {
        self.signature
    }

    #[inline]
    pub fn signature(&self) -> &'a Signature {
        &self.signature.signature
    }

    /// Every position reaches its parameter.
    pub fn is_match(&self) -> bool {
        self.can_convert.iter().all(|&c| c)
    }

    /// No conversion anywhere.
    pub fn is_exact(&self) -> bool {
        self.exact || (self.is_match() && self.conversions.iter().all(Option::is_none))
    }

    pub fn is_partial(&self) -> bool {
        self.is_match() && !self.is_exact()
    }

    /// Sum of path scores; `i32::MIN` if any position is unconvertible.
    #[inline]
    pub fn narrowing_score(&self) -> i32 {
        self.narrowing_score
    }

    /// Sum of path lengths; `usize::MAX` if any position is unconvertible.
    #[inline]
    pub fn path_length(&self) -> usize {
        self.path_length
    }

    pub fn convertible_count(&self) -> usize {
        self.can_convert.iter().filter(|&&c| c).count()
    }

    pub fn partial_narrowing_score(&self) -> i32 {
        self.partial_narrowing_score
    }

    pub fn partial_path_length(&self) -> usize {
        self.partial_path_length
    }

    /// Per-position conversions; `None` where the argument passes unchanged.
    pub fn conversions(&self) -> &[Option<ConversionContext>] {
        &self.conversions
    }
}

/// The candidates gathered for one call.
#[derive(Clone, Debug)]
pub struct OperatorMatches<'a> {
    matches: Vec<OperatorMatch<'a>>,
    best_narrowing_score: i32,
    /// Indices of full matches attaining `best_narrowing_score`.
    best_matches: Vec<usize>,
    shortest_path_length: usize,
    resolved: Option<usize>,
}

impl Default for OperatorMatches<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> OperatorMatches<'a> {
    pub fn new() -> Self {
        OperatorMatches {
            matches: Vec::new(),
            best_narrowing_score: i32::MIN,
            best_matches: Vec::new(),
            shortest_path_length: usize::MAX,
            resolved: None,
        }
    }

    /// Add a candidate. Returns `false` if its operator is already present.
    pub fn add(&mut self, candidate: OperatorMatch<'a>) -> bool {
        if self.contains(candidate.operator()) {
            return false;
        }
        self.matches.push(candidate);
        self.rank(self.matches.len() - 1);
        self.resolved = self.select();
        true
    }

    /// Move every candidate of `other` into `self`, skipping operators
    /// already present.
    pub fn merge(&mut self, other: OperatorMatches<'a>) {
        for candidate in other.matches {
            self.add(candidate);
        }
    }

    pub fn remove(&mut self, operator: OperatorId) -> Option<OperatorMatch<'a>> {
        let position = self.matches.iter().position(|m| m.operator() == operator)?;
        let removed = self.matches.remove(position);
        self.rebuild();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.matches.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.best_narrowing_score = i32::MIN;
        self.best_matches.clear();
        self.shortest_path_length = usize::MAX;
        for index in 0..self.matches.len() {
            self.rank(index);
        }
        self.resolved = self.select();
    }

    fn rank(&mut self, index: usize) {
        let candidate = &self.matches[index];
        if !candidate.is_match() {
            return;
        }
        let score = candidate.narrowing_score();
        let length = candidate.path_length();
        if self.best_matches.is_empty() || score > self.best_narrowing_score {
            self.best_narrowing_score = score;
            self.best_matches.clear();
            self.best_matches.push(index);
            self.shortest_path_length = length;
        } else if score == self.best_narrowing_score {
            self.best_matches.push(index);
            self.shortest_path_length = self.shortest_path_length.min(length);
        }
    }

    fn select(&self) -> Option<usize> {
        let mut exact = self
            .best_matches
            .iter()
            .copied()
            .filter(|&i| self.matches[i].is_exact());
        if let Some(first) = exact.next() {
            return if exact.next().is_some() {
                None
            } else {
                Some(first)
            };
        }

        let mut shortest = self.shortest();
        let first = shortest.next()?;
        if shortest.next().is_some() {
            None
        } else {
            Some(first)
        }
    }

    fn shortest(&self) -> impl Iterator<Item = usize> + '_ {
        self.best_matches
            .iter()
            .copied()
            .filter(|&i| self.matches[i].path_length() == self.shortest_path_length)
    }

    pub fn contains(&self, operator: OperatorId) -> bool {
        self.matches.iter().any(|m| m.operator() == operator)
    }

    /// The selected candidate, if the call binds.
    pub fn best_match(&self) -> Option<&OperatorMatch<'a>> {
        self.resolved.map(|i| &self.matches[i])
    }

    pub fn is_exact(&self) -> bool {
        self.best_match().is_some_and(OperatorMatch::is_exact)
    }

    pub fn is_partial(&self) -> bool {
        self.best_match().is_some_and(OperatorMatch::is_partial)
    }

    /// Several equally good candidates and no exact winner.
    pub fn is_ambiguous(&self) -> bool {
        !self.is_exact() && self.shortest().nth(1).is_some()
    }

    /// `i32::MIN` while no full match has been added.
    #[inline]
    pub fn best_narrowing_score(&self) -> i32 {
        self.best_narrowing_score
    }

    /// `usize::MAX` while no full match has been added.
    #[inline]
    pub fn shortest_path_length(&self) -> usize {
        self.shortest_path_length
    }

    /// Whether a partially scored candidate can no longer win.
    ///
    /// Scores only get worse as positions are added, so a candidate that is
    /// already behind the current best stays behind.
    pub fn would_prune(&self, candidate: &OperatorMatch<'_>) -> bool {
        if self.best_matches.is_empty() {
            return false;
        }
        let score = candidate.narrowing_score();
        score < self.best_narrowing_score
            || (score == self.best_narrowing_score
                && candidate.path_length() > self.shortest_path_length)
    }

    /// The candidate nearest to matching, for "did you mean" hints. Never
    /// used for binding.
    pub fn closest_match(&self) -> Option<&OperatorMatch<'a>> {
        let key = |m: &OperatorMatch<'_>| {
            (
                m.convertible_count(),
                m.partial_narrowing_score(),
                Reverse(m.partial_path_length()),
            )
        };
        let best = self.matches.iter().map(key).max()?;
        let mut closest = self.matches.iter().filter(|&m| key(m) == best);
        let first = closest.next()?;
        if closest.next().is_some() {
            None
        } else {
            Some(first)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperatorMatch<'a>> {
        self.matches.iter()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
mod tests;
