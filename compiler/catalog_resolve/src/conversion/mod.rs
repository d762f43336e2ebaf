//! Declared scalar conversions and the conversion-path machinery.
//!
//! # Architecture
//!
//! ```text
//! ConversionRegistry (declared edges)
//!     └── ConversionPathFinder (search, pluggable)
//!           └── ScalarConversionPaths (candidate chains, best selection)
//!     └── ScalarConversionPathCache (best chain per (source, target))
//! ```

mod cache;
mod finder;
mod path;

pub use cache::{CachedPath, ScalarConversionPathCache};
pub use finder::{ConversionPathFinder, GraphPathFinder};
pub use path::{ScalarConversionPath, ScalarConversionPaths};

use catalog_ir::{ConversionId, Idx, LibraryId, Name, OperatorId};
use rustc_hash::FxHashMap;

use crate::CatalogError;

/// A declared conversion between two scalar types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub id: ConversionId,
    pub name: Name,
    pub source: Idx,
    pub target: Idx,
    /// Narrowing conversions may lose information and are penalized.
    pub narrowing: bool,
    /// The operator performing the transformation.
    pub operator: Option<OperatorId>,
    pub library: Option<LibraryId>,
}

impl Conversion {
    /// The lightweight edge stored in conversion paths.
    #[inline]
    pub fn edge(&self) -> ConversionEdge {
        ConversionEdge {
            id: self.id,
            source: self.source,
            target: self.target,
            narrowing: self.narrowing,
        }
    }
}

/// Input for declaring a conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionDef {
    pub name: Name,
    pub source: Idx,
    pub target: Idx,
    pub narrowing: bool,
    pub operator: Option<OperatorId>,
    pub library: Option<LibraryId>,
}

impl ConversionDef {
    /// A widening conversion with no backing operator yet.
    pub fn widening(name: Name, source: Idx, target: Idx) -> Self {
        ConversionDef {
            name,
            source,
            target,
            narrowing: false,
            operator: None,
            library: None,
        }
    }

    /// A narrowing conversion with no backing operator yet.
    pub fn narrowing(name: Name, source: Idx, target: Idx) -> Self {
        ConversionDef {
            narrowing: true,
            ..Self::widening(name, source, target)
        }
    }

    #[must_use]
    pub fn with_operator(mut self, operator: OperatorId) -> Self {
        self.operator = Some(operator);
        self
    }

    #[must_use]
    pub fn in_library(mut self, library: LibraryId) -> Self {
        self.library = Some(library);
        self
    }
}

/// One hop of a conversion path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversionEdge {
    pub id: ConversionId,
    pub source: Idx,
    pub target: Idx,
    pub narrowing: bool,
}

/// Registry of declared conversions, indexed by source type.
#[derive(Clone, Debug, Default)]
pub struct ConversionRegistry {
    conversions: Vec<Option<Conversion>>,
    by_source: FxHashMap<Idx, Vec<ConversionId>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a conversion. Type and operator validation is the caller's job.
    pub fn register(&mut self, def: ConversionDef) -> Result<ConversionId, CatalogError> {
        let raw = u32::try_from(self.conversions.len())
            .map_err(|_| CatalogError::CapacityExceeded { kind: "conversion" })?;
        let id = ConversionId::new(raw);
        self.by_source.entry(def.source).or_default().push(id);
        self.conversions.push(Some(Conversion {
            id,
            name: def.name,
            source: def.source,
            target: def.target,
            narrowing: def.narrowing,
            operator: def.operator,
            library: def.library,
        }));
        Ok(id)
    }

    pub fn remove(&mut self, id: ConversionId) -> Result<Conversion, CatalogError> {
        let conversion = self
            .conversions
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(CatalogError::UnknownConversion(id))?;
        if let Some(ids) = self.by_source.get_mut(&conversion.source) {
            ids.retain(|&c| c != id);
            if ids.is_empty() {
                self.by_source.remove(&conversion.source);
            }
        }
        Ok(conversion)
    }

    #[inline]
    pub fn get(&self, id: ConversionId) -> Option<&Conversion> {
        self.conversions.get(id.index()).and_then(Option::as_ref)
    }

    /// Conversions leaving `source`, in declaration order.
    pub fn from_source(&self, source: Idx) -> impl Iterator<Item = &Conversion> {
        self.by_source
            .get(&source)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get(id))
    }

    /// Conversions with `ty` at either end.
    pub fn touching(&self, ty: Idx) -> Vec<ConversionId> {
        self.iter()
            .filter(|c| c.source == ty || c.target == ty)
            .map(|c| c.id)
            .collect()
    }

    /// Conversions backed by `operator`.
    pub fn backed_by(&self, operator: OperatorId) -> impl Iterator<Item = &Conversion> {
        self.iter().filter(move |c| c.operator == Some(operator))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.conversions.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
