//! Memoized best conversion paths.
//!
//! The cache never searches. A miss tells the caller to run the path finder
//! and `put` the answer back, including "no path" so failed searches are not
//! repeated. Eviction is coarse: dropping a type or a conversion removes
//! every entry that could depend on it.

use catalog_ir::{ConversionId, Idx};
use rustc_hash::FxHashMap;

use super::ScalarConversionPath;

/// Result of a cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachedPath<'a> {
    /// Never searched, or evicted since.
    Unknown,
    /// Searched; no unique best path exists.
    NoPath,
    Path(&'a ScalarConversionPath),
}

/// Best path per `(source, target)` pair.
#[derive(Clone, Debug, Default)]
pub struct ScalarConversionPathCache {
    entries: FxHashMap<(Idx, Idx), Option<ScalarConversionPath>>,
}

impl ScalarConversionPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: Idx, target: Idx) -> CachedPath<'_> {
        match self.entries.get(&(source, target)) {
            None => CachedPath::Unknown,
            Some(None) => CachedPath::NoPath,
            Some(Some(path)) => CachedPath::Path(path),
        }
    }

    /// Record a search result; `None` records "no path".
    pub fn put(&mut self, source: Idx, target: Idx, path: Option<ScalarConversionPath>) {
        self.entries.insert((source, target), path);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries keyed by `ty` or routed through it. Returns the number of
    /// evicted entries.
    pub fn clear_scalar_type(&mut self, ty: Idx) -> usize {
        self.evict(|&(source, target), path| {
            source == ty
                || target == ty
                || path.as_ref().is_some_and(|p| p.contains_type(ty))
        })
    }

    /// Drop entries whose path uses `conversion`. Returns the number of
    /// evicted entries.
    pub fn clear_conversion(&mut self, conversion: ConversionId) -> usize {
        self.evict(|_, path| {
            path.as_ref()
                .is_some_and(|p| p.contains_conversion(conversion))
        })
    }

    /// Drop every cached "no path" marker. Returns the number of evicted
    /// entries.
    ///
    /// A marker records no edges, yet it may stand for a tie between paths
    /// that a dropped type or conversion has since broken.
    pub fn clear_no_path(&mut self) -> usize {
        self.evict(|_, path| path.is_none())
    }

    fn evict(
        &mut self,
        stale: impl Fn(&(Idx, Idx), &Option<ScalarConversionPath>) -> bool,
    ) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, path| !stale(key, path));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
