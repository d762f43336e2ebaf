//! Libraries and name resolution paths.
//!
//! A library sees its own objects first, then those of the libraries it
//! requires (breadth-first, nearest first), and finally the system library.
//! That ordering is the `NameResolutionPath` used to shadow operators.

use catalog_ir::{LibraryId, Name, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::CatalogError;

/// A registered library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryEntry {
    pub name: Name,
    /// Directly required libraries.
    pub requires: Vec<LibraryId>,
}

/// One level of a name resolution path: libraries at the same distance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionLevel {
    libraries: SmallVec<[LibraryId; 4]>,
}

impl ResolutionLevel {
    pub fn new(libraries: impl IntoIterator<Item = LibraryId>) -> Self {
        let mut libraries: SmallVec<[LibraryId; 4]> = libraries.into_iter().collect();
        libraries.sort_unstable();
        libraries.dedup();
        ResolutionLevel { libraries }
    }

    #[inline]
    pub fn contains(&self, library: LibraryId) -> bool {
        self.libraries.binary_search(&library).is_ok()
    }

    /// Built-in objects (no library) are visible at every level.
    #[inline]
    pub fn admits(&self, library: Option<LibraryId>) -> bool {
        library.map_or(true, |l| self.contains(l))
    }

    pub fn libraries(&self) -> &[LibraryId] {
        &self.libraries
    }
}

/// Ordered library sets by increasing distance from the compiling library.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameResolutionPath {
    levels: Vec<ResolutionLevel>,
}

impl NameResolutionPath {
    pub fn new(levels: Vec<ResolutionLevel>) -> Self {
        NameResolutionPath { levels }
    }

    pub fn levels(&self) -> &[ResolutionLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Library registry with dependency edges.
#[derive(Clone, Debug)]
pub struct LibraryGraph {
    libraries: Vec<LibraryEntry>,
    by_name: FxHashMap<Name, LibraryId>,
}

impl LibraryGraph {
    /// Create a graph containing only the system library.
    pub fn new(interner: &StringInterner) -> Self {
        let system = interner.intern("System");
        let mut by_name = FxHashMap::default();
        by_name.insert(system, LibraryId::SYSTEM);
        LibraryGraph {
            libraries: vec![LibraryEntry {
                name: system,
                requires: Vec::new(),
            }],
            by_name,
        }
    }

    /// Register a library. Every library implicitly requires `System`.
    pub fn register(
        &mut self,
        name: Name,
        requires: &[LibraryId],
    ) -> Result<LibraryId, CatalogError> {
        if self.by_name.contains_key(&name) {
            return Err(CatalogError::DuplicateName { name });
        }
        if let Some(&missing) = requires.iter().find(|&&r| self.get(r).is_none()) {
            return Err(CatalogError::UnknownLibrary(missing));
        }

        let raw = u32::try_from(self.libraries.len())
            .map_err(|_| CatalogError::CapacityExceeded { kind: "library" })?;
        let id = LibraryId::new(raw);
        self.libraries.push(LibraryEntry {
            name,
            requires: requires.to_vec(),
        });
        self.by_name.insert(name, id);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: LibraryId) -> Option<&LibraryEntry> {
        self.libraries.get(id.index())
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<LibraryId> {
        self.by_name.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Build the resolution path for code compiled inside `library`.
    ///
    /// Each library appears only at its nearest level; `System` is always the
    /// last level on its own.
    pub fn name_resolution_path(
        &self,
        library: LibraryId,
    ) -> Result<NameResolutionPath, CatalogError> {
        if self.get(library).is_none() {
            return Err(CatalogError::UnknownLibrary(library));
        }
        if library == LibraryId::SYSTEM {
            return Ok(NameResolutionPath::new(vec![ResolutionLevel::new([
                LibraryId::SYSTEM,
            ])]));
        }

        let mut visited = FxHashSet::default();
        visited.insert(library);
        visited.insert(LibraryId::SYSTEM);

        let mut levels = vec![ResolutionLevel::new([library])];
        let mut frontier = vec![library];
        loop {
            let mut next = Vec::new();
            for id in &frontier {
                let Some(entry) = self.get(*id) else { continue };
                for &required in &entry.requires {
                    if visited.insert(required) {
                        next.push(required);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            levels.push(ResolutionLevel::new(next.iter().copied()));
            frontier = next;
        }
        levels.push(ResolutionLevel::new([LibraryId::SYSTEM]));

        Ok(NameResolutionPath::new(levels))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap for brevity"
)]
