//! The catalog facade.
//!
//! [`Catalog`] owns every scalar type, conversion, library and operator,
//! plus the operator index and the conversion path cache derived from them.
//! Mutations keep the derived state consistent; resolution reads it.
//!
//! Both mutation and resolution take `&mut Catalog`. Shared use goes
//! through [`SharedCatalog`], whose guard is the only way to reach either,
//! so a resolution can never observe a half-applied mutation.

use std::sync::Arc;

use catalog_diagnostic::Diagnostic;
use catalog_ir::{
    ConversionId, Idx, LibraryId, Name, OperatorId, SharedInterner, Signature, StringInterner,
};
use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::config::ResolverConfig;
use crate::context::ResolveContext;
use crate::conversion::{
    Conversion, ConversionDef, ConversionPathFinder, ConversionRegistry, GraphPathFinder,
    ScalarConversionPathCache,
};
use crate::library::{LibraryGraph, NameResolutionPath};
use crate::operator::{Operator, OperatorBinding, OperatorDef, OperatorMaps};
use crate::types::TypeRegistry;
use crate::CatalogError;

/// Owner of all catalog objects.
pub struct Catalog {
    config: ResolverConfig,
    interner: SharedInterner,
    types: TypeRegistry,
    libraries: LibraryGraph,
    conversions: ConversionRegistry,
    operators: Vec<Option<Operator>>,
    maps: OperatorMaps,
    cache: ScalarConversionPathCache,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl Catalog {
    /// An empty catalog holding only the system library and the generic
    /// placeholder type.
    pub fn new(config: ResolverConfig) -> Self {
        let interner = SharedInterner::new();
        Catalog {
            config,
            types: TypeRegistry::new(&interner),
            libraries: LibraryGraph::new(&interner),
            conversions: ConversionRegistry::new(),
            operators: Vec::new(),
            maps: OperatorMaps::new(interner.clone()),
            cache: ScalarConversionPathCache::new(),
            interner,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn libraries(&self) -> &LibraryGraph {
        &self.libraries
    }

    pub fn conversions(&self) -> &ConversionRegistry {
        &self.conversions
    }

    pub fn maps(&self) -> &OperatorMaps {
        &self.maps
    }

    pub fn cache(&self) -> &ScalarConversionPathCache {
        &self.cache
    }

    #[inline]
    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    // Libraries

    pub fn create_library(
        &mut self,
        name: &str,
        requires: &[LibraryId],
    ) -> Result<LibraryId, CatalogError> {
        let id = self.libraries.register(self.interner.intern(name), requires)?;
        debug!(library = name, ?id, "library created");
        Ok(id)
    }

    pub fn name_resolution_path(
        &self,
        library: LibraryId,
    ) -> Result<NameResolutionPath, CatalogError> {
        self.libraries.name_resolution_path(library)
    }

    fn check_library(&self, library: Option<LibraryId>) -> Result<(), CatalogError> {
        match library {
            Some(id) if self.libraries.get(id).is_none() => Err(CatalogError::UnknownLibrary(id)),
            _ => Ok(()),
        }
    }

    fn check_type(&self, ty: Idx) -> Result<(), CatalogError> {
        if self.types.contains(ty) {
            Ok(())
        } else {
            Err(CatalogError::UnknownScalarType(ty))
        }
    }

    // Scalar types

    pub fn add_scalar_type(
        &mut self,
        name: &str,
        parent: Option<Idx>,
        library: Option<LibraryId>,
    ) -> Result<Idx, CatalogError> {
        self.check_library(library)?;
        let idx = self
            .types
            .register(self.interner.intern(name), parent, library)?;
        debug!(scalar_type = name, ?idx, "scalar type added");
        Ok(idx)
    }

    /// Drop a scalar type and every conversion touching it.
    ///
    /// Rejected while an operator or another type still refers to it.
    pub fn drop_scalar_type(&mut self, ty: Idx) -> Result<(), CatalogError> {
        if ty.is_generic() {
            return Err(CatalogError::ReservedType(ty));
        }
        self.check_type(ty)?;
        if let Some(user) = self.operators().find(|op| op.mentions(ty)) {
            return Err(CatalogError::TypeInUse { ty, user: user.name });
        }
        if let Some((_, child)) = self.types.iter().find(|(_, e)| e.parent == Some(ty)) {
            return Err(CatalogError::TypeInUse {
                ty,
                user: child.name,
            });
        }

        for id in self.conversions.touching(ty) {
            self.conversions.remove(id)?;
        }
        self.types.remove(ty)?;
        let evicted = self.cache.clear_scalar_type(ty) + self.cache.clear_no_path();
        debug!(?ty, evicted, "scalar type dropped");
        Ok(())
    }

    // Conversions

    pub fn add_conversion(&mut self, def: ConversionDef) -> Result<ConversionId, CatalogError> {
        self.check_type(def.source)?;
        self.check_type(def.target)?;
        self.check_library(def.library)?;
        if let Some(operator) = def.operator {
            if self.operator(operator).is_none() {
                return Err(CatalogError::UnknownOperator(operator));
            }
        }

        let id = self.conversions.register(def)?;
        // A new edge can shorten any cached path or connect a "no path" pair.
        self.cache.clear();
        debug!(?id, "conversion added");
        Ok(id)
    }

    pub fn drop_conversion(&mut self, id: ConversionId) -> Result<Conversion, CatalogError> {
        let conversion = self.conversions.remove(id)?;
        let evicted = self.cache.clear_conversion(id) + self.cache.clear_no_path();
        debug!(?id, evicted, "conversion dropped");
        Ok(conversion)
    }

    // Operators

    /// Register an operator. On any error the catalog is unchanged.
    pub fn add_operator(&mut self, def: OperatorDef) -> Result<OperatorId, CatalogError> {
        self.check_library(def.library)?;
        for ty in def.types() {
            self.check_type(ty)?;
        }

        let raw = u32::try_from(self.operators.len())
            .map_err(|_| CatalogError::CapacityExceeded { kind: "operator" })?;
        let operator = Operator {
            id: OperatorId::new(raw),
            name: def.name,
            signature: def.signature,
            return_type: def.return_type,
            library: def.library,
        };
        self.maps.add_operator(&operator)?;
        debug!(id = ?operator.id, name = self.interner.lookup(operator.name), "operator added");
        let id = operator.id;
        self.operators.push(Some(operator));
        Ok(id)
    }

    /// Remove an operator, dropping the conversions it backs. On error the
    /// catalog is unchanged.
    pub fn remove_operator(&mut self, id: OperatorId) -> Result<Operator, CatalogError> {
        if self.operator(id).is_none() {
            return Err(CatalogError::UnknownOperator(id));
        }
        // `backed_by` yields live conversions only, so none of these drops fail.
        let backed: Vec<ConversionId> = self.conversions.backed_by(id).map(|c| c.id).collect();
        for conversion in backed {
            self.drop_conversion(conversion)?;
        }
        let operator = self
            .operators
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(CatalogError::UnknownOperator(id))?;
        self.maps.remove_operator(&operator);
        debug!(?id, "operator removed");
        Ok(operator)
    }

    pub fn contains_operator(&self, id: OperatorId) -> bool {
        self.operator(id)
            .is_some_and(|op| self.maps.contains_operator(op))
    }

    #[inline]
    pub fn operator(&self, id: OperatorId) -> Option<&Operator> {
        self.operators.get(id.index()).and_then(Option::as_ref)
    }

    pub fn operators(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter().filter_map(Option::as_ref)
    }

    // Resolution

    /// Bind a call using the built-in conversion path finder.
    pub fn resolve_call(
        &mut self,
        name: Name,
        path: &NameResolutionPath,
        signature: &Signature,
        is_exact: bool,
    ) -> OperatorBinding {
        let finder =
            GraphPathFinder::new(&self.conversions, self.config.max_conversion_path_length);
        let mut ctx = ResolveContext::new(&self.types, &finder, &mut self.cache, &self.config);
        self.maps
            .resolve_call(&mut ctx, name, path, signature, is_exact)
    }

    /// Bind a call using a caller-supplied conversion path finder.
    ///
    /// Paths found this way are memoized for this call only; the shared
    /// cache holds answers of the built-in finder alone.
    pub fn resolve_call_with(
        &mut self,
        finder: &dyn ConversionPathFinder,
        name: Name,
        path: &NameResolutionPath,
        signature: &Signature,
        is_exact: bool,
    ) -> OperatorBinding {
        let mut scratch = ScalarConversionPathCache::new();
        let mut ctx = ResolveContext::new(&self.types, finder, &mut scratch, &self.config);
        self.maps
            .resolve_call(&mut ctx, name, path, signature, is_exact)
    }

    /// Bind a call made from code compiled inside `library`.
    pub fn resolve_in_library(
        &mut self,
        library: LibraryId,
        name: &str,
        signature: &Signature,
    ) -> Result<OperatorBinding, CatalogError> {
        let path = self.name_resolution_path(library)?;
        let name = self.intern(name);
        Ok(self.resolve_call(name, &path, signature, false))
    }

    /// Diagnostic for an unresolved binding; `None` when it resolved.
    pub fn diagnose(&self, binding: &OperatorBinding) -> Option<Diagnostic> {
        binding
            .failure()
            .map(|failure| failure.to_diagnostic(&self.interner, &self.types))
    }
}

/// Guard proving exclusive access to a shared catalog.
pub type CatalogGuard<'a> = MutexGuard<'a, Catalog>;

/// A catalog shared between threads behind one lock.
#[derive(Clone)]
pub struct SharedCatalog(Arc<Mutex<Catalog>>);

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        SharedCatalog(Arc::new(Mutex::new(catalog)))
    }

    /// Acquire the catalog lock. Hold the guard for the whole resolution or
    /// mutation.
    pub fn lock(&self) -> CatalogGuard<'_> {
        self.0.lock()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
