//! Conversion paths and best-path selection.
//!
//! A path is scored by how many narrowing hops it takes (fewer is better)
//! and then by length (shorter is better). A best path exists only when one
//! path strictly wins; a tie means the conversion is ambiguous and callers
//! must treat it as impossible.

use catalog_ir::{ConversionId, Idx};
use smallvec::SmallVec;

use super::ConversionEdge;

/// A chain of conversion edges from one scalar type to another.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScalarConversionPath {
    edges: SmallVec<[ConversionEdge; 2]>,
    /// Negated count of narrowing edges.
    narrowing_score: i32,
}

impl ScalarConversionPath {
    /// An empty path, extended hop by hop during search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from a complete chain of edges.
    pub fn from_edges(edges: impl IntoIterator<Item = ConversionEdge>) -> Self {
        let mut path = Self::new();
        for edge in edges {
            path.push(edge);
        }
        path
    }

    pub fn push(&mut self, edge: ConversionEdge) {
        if edge.narrowing {
            self.narrowing_score -= 1;
        }
        self.edges.push(edge);
    }

    pub fn pop(&mut self) -> Option<ConversionEdge> {
        let edge = self.edges.pop()?;
        if edge.narrowing {
            self.narrowing_score += 1;
        }
        Some(edge)
    }

    #[inline]
    pub fn narrowing_score(&self) -> i32 {
        self.narrowing_score
    }

    #[inline]
    pub fn is_narrowing(&self) -> bool {
        self.narrowing_score < 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> Option<Idx> {
        self.edges.first().map(|e| e.source)
    }

    pub fn target(&self) -> Option<Idx> {
        self.edges.last().map(|e| e.target)
    }

    pub fn edges(&self) -> &[ConversionEdge] {
        &self.edges
    }

    /// Whether any hop starts or ends at `ty`.
    pub fn contains_type(&self, ty: Idx) -> bool {
        self.edges.iter().any(|e| e.source == ty || e.target == ty)
    }

    pub fn contains_conversion(&self, id: ConversionId) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }
}

/// Working set of alternative paths between one `(source, target)` pair.
///
/// Tracks, as paths are added, the best narrowing score, which paths reach
/// it, the shortest length among those, and whether exactly one path is
/// both best-scored and shortest.
#[derive(Clone, Debug)]
pub struct ScalarConversionPaths {
    source: Idx,
    target: Idx,
    paths: Vec<ScalarConversionPath>,
    best_narrowing_score: i32,
    best_paths: Vec<usize>,
    shortest_path_length: usize,
    best_path: Option<usize>,
}

impl ScalarConversionPaths {
    pub fn new(source: Idx, target: Idx) -> Self {
        ScalarConversionPaths {
            source,
            target,
            paths: Vec::new(),
            best_narrowing_score: i32::MIN,
            best_paths: Vec::new(),
            shortest_path_length: usize::MAX,
            best_path: None,
        }
    }

    pub fn add(&mut self, path: ScalarConversionPath) {
        let index = self.paths.len();
        let score = path.narrowing_score();
        let length = path.len();
        self.paths.push(path);

        if score > self.best_narrowing_score {
            self.best_narrowing_score = score;
            self.best_paths.clear();
            self.best_paths.push(index);
            self.shortest_path_length = length;
        } else if score == self.best_narrowing_score {
            self.best_paths.push(index);
            self.shortest_path_length = self.shortest_path_length.min(length);
        } else {
            return;
        }

        self.best_path = self.unique_shortest();
    }

    fn unique_shortest(&self) -> Option<usize> {
        let mut shortest = self
            .best_paths
            .iter()
            .copied()
            .filter(|&i| self.paths[i].len() == self.shortest_path_length);
        let first = shortest.next()?;
        if shortest.next().is_some() {
            None
        } else {
            Some(first)
        }
    }

    #[inline]
    pub fn source(&self) -> Idx {
        self.source
    }

    #[inline]
    pub fn target(&self) -> Idx {
        self.target
    }

    /// `i32::MIN` until a path has been added.
    #[inline]
    pub fn best_narrowing_score(&self) -> i32 {
        self.best_narrowing_score
    }

    /// `usize::MAX` until a path has been added.
    #[inline]
    pub fn shortest_path_length(&self) -> usize {
        self.shortest_path_length
    }

    /// Paths achieving the best narrowing score.
    pub fn best_paths(&self) -> impl Iterator<Item = &ScalarConversionPath> {
        self.best_paths.iter().map(|&i| &self.paths[i])
    }

    /// The unique best path, if there is one.
    pub fn best_path(&self) -> Option<&ScalarConversionPath> {
        self.best_path.map(|i| &self.paths[i])
    }

    pub fn into_best_path(mut self) -> Option<ScalarConversionPath> {
        let index = self.best_path?;
        Some(self.paths.swap_remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScalarConversionPath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
