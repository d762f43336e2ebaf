//! Resolver configuration.

/// Tunables for call resolution.
///
/// None of these change which operator a call binds to; they trade search
/// effort and memory against repeat lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Longest conversion chain the built-in path finder explores.
    pub max_conversion_path_length: usize,
    /// Abandon candidates as soon as they can no longer beat the current best.
    pub prune_candidates: bool,
    /// Memoize conversion paths between resolutions.
    pub cache_conversion_paths: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_conversion_path_length: 4,
            prune_candidates: true,
            cache_conversion_paths: true,
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn with_max_conversion_path_length(mut self, length: usize) -> Self {
        self.max_conversion_path_length = length;
        self
    }

    #[must_use]
    pub fn with_pruning(mut self, enabled: bool) -> Self {
        self.prune_candidates = enabled;
        self
    }

    #[must_use]
    pub fn with_path_cache(mut self, enabled: bool) -> Self {
        self.cache_conversion_paths = enabled;
        self
    }
}
