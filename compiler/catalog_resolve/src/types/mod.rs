//! Scalar type registry.
//!
//! Stores the catalog's scalar types and answers the "is" question used by
//! overload matching: a value of type `a` can be passed where `b` is
//! expected without conversion when `a` is `b`, `b` is an ancestor of `a`,
//! or `b` is the generic placeholder.

use catalog_ir::{Idx, LibraryId, Name, Signature, StringInterner};
use rustc_hash::FxHashMap;

use crate::CatalogError;

/// A registered scalar type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarTypeEntry {
    pub name: Name,
    /// Direct supertype, if this type is declared "like" another one.
    pub parent: Option<Idx>,
    /// Defining library; `None` for built-in types.
    pub library: Option<LibraryId>,
}

/// Registry of scalar types, indexed by `Idx`.
///
/// Slot 0 always holds the generic placeholder. Dropped types leave a hole
/// so existing handles never change meaning.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    entries: Vec<Option<ScalarTypeEntry>>,
    by_name: FxHashMap<Name, Idx>,
}

impl TypeRegistry {
    /// Create a registry holding only the generic placeholder.
    pub fn new(interner: &StringInterner) -> Self {
        let generic = interner.intern("generic");
        let mut by_name = FxHashMap::default();
        by_name.insert(generic, Idx::GENERIC);
        TypeRegistry {
            entries: vec![Some(ScalarTypeEntry {
                name: generic,
                parent: None,
                library: None,
            })],
            by_name,
        }
    }

    /// Register a new scalar type.
    pub fn register(
        &mut self,
        name: Name,
        parent: Option<Idx>,
        library: Option<LibraryId>,
    ) -> Result<Idx, CatalogError> {
        if self.by_name.contains_key(&name) {
            return Err(CatalogError::DuplicateName { name });
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(CatalogError::UnknownScalarType(parent));
            }
        }

        let raw = u32::try_from(self.entries.len())
            .map_err(|_| CatalogError::CapacityExceeded { kind: "scalar type" })?;
        let idx = Idx::from_raw(raw);
        self.entries.push(Some(ScalarTypeEntry {
            name,
            parent,
            library,
        }));
        self.by_name.insert(name, idx);
        Ok(idx)
    }

    /// Remove a scalar type. Fails for the generic placeholder and for types
    /// other types derive from.
    pub fn remove(&mut self, idx: Idx) -> Result<ScalarTypeEntry, CatalogError> {
        if idx.is_generic() {
            return Err(CatalogError::ReservedType(idx));
        }
        if !self.contains(idx) {
            return Err(CatalogError::UnknownScalarType(idx));
        }
        if let Some(child) = self.iter().find(|(_, e)| e.parent == Some(idx)) {
            return Err(CatalogError::TypeInUse {
                ty: idx,
                user: child.1.name,
            });
        }

        let entry = self
            .entries
            .get_mut(idx.index())
            .and_then(Option::take)
            .ok_or(CatalogError::UnknownScalarType(idx))?;
        self.by_name.remove(&entry.name);
        Ok(entry)
    }

    #[inline]
    pub fn get(&self, idx: Idx) -> Option<&ScalarTypeEntry> {
        self.entries.get(idx.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn contains(&self, idx: Idx) -> bool {
        self.get(idx).is_some()
    }

    /// Look up a type by name.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Idx> {
        self.by_name.get(&name).copied()
    }

    /// Name of a type, or `Name::EMPTY` if it is unknown.
    pub fn name(&self, idx: Idx) -> Name {
        self.get(idx).map_or(Name::EMPTY, |e| e.name)
    }

    /// All live types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Idx, &ScalarTypeEntry)> {
        self.entries.iter().enumerate().filter_map(|(i, e)| {
            let raw = u32::try_from(i).ok()?;
            e.as_ref().map(|e| (Idx::from_raw(raw), e))
        })
    }

    /// Number of live types, including the generic placeholder.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compatibility without conversion.
    pub fn is(&self, ty: Idx, target: Idx) -> bool {
        if target.is_generic() {
            return true;
        }

        let mut current = Some(ty);
        while let Some(t) = current {
            if t == target {
                return true;
            }
            current = self.get(t).and_then(|e| e.parent);
        }
        false
    }

    /// Render a signature as `(Integer, var Decimal)`.
    pub fn format_signature(&self, signature: &Signature, interner: &StringInterner) -> String {
        let params: Vec<String> = signature
            .iter()
            .map(|e| format!("{}{}", e.mode, self.format_type(e.ty, interner)))
            .collect();
        format!("({})", params.join(", "))
    }

    fn format_type(&self, idx: Idx, interner: &StringInterner) -> String {
        match self.get(idx) {
            Some(entry) => interner.lookup(entry.name).to_owned(),
            None => format!("{idx:?}"),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
