//! Conversion path search.
//!
//! Overload resolution only consumes search results; the search itself is
//! behind [`ConversionPathFinder`] so hosts can plug in their own. The
//! bundled [`GraphPathFinder`] enumerates acyclic chains of declared
//! conversions up to a configured length.

use catalog_ir::Idx;
use rustc_hash::FxHashSet;

use super::{ConversionRegistry, ScalarConversionPath, ScalarConversionPaths};

/// Finds the best implicit conversion path between two scalar types.
pub trait ConversionPathFinder {
    /// The unique best path from `source` to `target`, or `None` when the
    /// types are unconvertible or the best path is ambiguous.
    fn find_conversion_path(&self, source: Idx, target: Idx) -> Option<ScalarConversionPath>;
}

/// Depth-bounded search over the declared conversion graph.
pub struct GraphPathFinder<'a> {
    conversions: &'a ConversionRegistry,
    max_length: usize,
}

impl<'a> GraphPathFinder<'a> {
    pub fn new(conversions: &'a ConversionRegistry, max_length: usize) -> Self {
        GraphPathFinder {
            conversions,
            max_length,
        }
    }

    /// Collect every acyclic path from `source` to `target`.
    pub fn find_all(&self, source: Idx, target: Idx) -> ScalarConversionPaths {
        let mut paths = ScalarConversionPaths::new(source, target);
        if source == target || self.max_length == 0 {
            return paths;
        }

        let mut visited = FxHashSet::default();
        visited.insert(source);
        let mut current = ScalarConversionPath::new();
        self.walk(source, target, &mut current, &mut visited, &mut paths);
        paths
    }

    fn walk(
        &self,
        at: Idx,
        target: Idx,
        current: &mut ScalarConversionPath,
        visited: &mut FxHashSet<Idx>,
        paths: &mut ScalarConversionPaths,
    ) {
        for conversion in self.conversions.from_source(at) {
            if visited.contains(&conversion.target) {
                continue;
            }
            current.push(conversion.edge());
            if conversion.target == target {
                paths.add(current.clone());
            } else if current.len() < self.max_length {
                visited.insert(conversion.target);
                self.walk(conversion.target, target, current, visited, paths);
                visited.remove(&conversion.target);
            }
            current.pop();
        }
    }
}

impl ConversionPathFinder for GraphPathFinder<'_> {
    fn find_conversion_path(&self, source: Idx, target: Idx) -> Option<ScalarConversionPath> {
        let paths = self.find_all(source, target);
        tracing::trace!(
            ?source,
            ?target,
            alternatives = paths.len(),
            "conversion path search"
        );
        paths.into_best_path()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
