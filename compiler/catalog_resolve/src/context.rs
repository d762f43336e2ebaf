//! Per-call resolution context.
//!
//! Bundles the read-only catalog state a resolution needs with the mutable
//! path cache, so scoring code never reaches back into the catalog.

use catalog_ir::Idx;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::conversion::{
    CachedPath, ConversionPathFinder, ScalarConversionPath, ScalarConversionPathCache,
};
use crate::types::TypeRegistry;

/// Everything one `resolve_call` reads or memoizes.
pub struct ResolveContext<'a> {
    types: &'a TypeRegistry,
    finder: &'a dyn ConversionPathFinder,
    cache: &'a mut ScalarConversionPathCache,
    config: &'a ResolverConfig,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        types: &'a TypeRegistry,
        finder: &'a dyn ConversionPathFinder,
        cache: &'a mut ScalarConversionPathCache,
        config: &'a ResolverConfig,
    ) -> Self {
        ResolveContext {
            types,
            finder,
            cache,
            config,
        }
    }

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        self.types
    }

    #[inline]
    pub fn config(&self) -> &ResolverConfig {
        self.config
    }

    /// Compatibility without conversion.
    #[inline]
    pub fn is(&self, ty: Idx, target: Idx) -> bool {
        self.types.is(ty, target)
    }

    /// Best conversion path from `source` to `target`, consulting the cache
    /// first and recording the finder's answer on a miss.
    pub fn conversion_path(&mut self, source: Idx, target: Idx) -> Option<ScalarConversionPath> {
        if !self.config.cache_conversion_paths {
            return self.finder.find_conversion_path(source, target);
        }

        let cached = match self.cache.get(source, target) {
            CachedPath::Unknown => None,
            CachedPath::NoPath => Some(None),
            CachedPath::Path(path) => Some(Some(path.clone())),
        };
        if let Some(hit) = cached {
            return hit;
        }

        debug!(?source, ?target, "conversion cache miss");
        let path = self.finder.find_conversion_path(source, target);
        self.cache.put(source, target, path.clone());
        path
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
