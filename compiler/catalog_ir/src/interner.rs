//! Name table for operator, library and type identifiers.
//!
//! Every catalog object is named through one [`StringInterner`]. The table
//! sits behind a `RwLock` so diagnostics can render names from another
//! thread while the catalog itself stays locked for mutation.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Names present in every catalog, interned in this order after `""`.
const PREDEFINED: [&str; 2] = ["System", "generic"];

/// Interning failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Every `u32` id is taken.
    Overflow { count: usize },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternError::Overflow { count } => {
                write!(f, "name table is full ({count} names)")
            }
        }
    }
}

impl std::error::Error for InternError {}

/// Texts are leaked so lookups can hand out `&'static str` without holding
/// the lock. Catalog names are few and live as long as the process.
#[derive(Default)]
struct Table {
    ids: FxHashMap<&'static str, Name>,
    texts: Vec<&'static str>,
}

impl Table {
    fn find(&self, text: &str) -> Option<Name> {
        self.ids.get(text).copied()
    }

    fn insert(&mut self, text: &str) -> Result<Name, InternError> {
        let count = self.texts.len();
        let raw = u32::try_from(count).map_err(|_| InternError::Overflow { count })?;
        let name = Name::from_raw(raw);
        let text: &'static str = Box::leak(text.to_owned().into_boxed_str());
        self.texts.push(text);
        self.ids.insert(text, name);
        Ok(name)
    }
}

/// Maps catalog names to [`Name`] handles and back.
///
/// Id 0 is always the empty string, so [`Name::EMPTY`] needs no lookup.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut table = Table::default();
        for text in std::iter::once("").chain(PREDEFINED) {
            // The first three ids always fit.
            let _ = table.insert(text);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern `text`, reporting a full table instead of panicking.
    pub fn try_intern(&self, text: &str) -> Result<Name, InternError> {
        if let Some(name) = self.table.read().find(text) {
            return Ok(name);
        }
        let mut table = self.table.write();
        // Another writer may have won the race between the two locks.
        match table.find(text) {
            Some(name) => Ok(name),
            None => table.insert(text),
        }
    }

    /// Intern `text`.
    ///
    /// # Panics
    /// Panics once more than `u32::MAX` distinct names exist.
    pub fn intern(&self, text: &str) -> Name {
        self.try_intern(text).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The handle for `text` if it was interned before. Never interns.
    pub fn get(&self, text: &str) -> Option<Name> {
        self.table.read().find(text)
    }

    /// Text of `name`; `""` for a handle this interner never issued.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .texts
            .get(name.index())
            .copied()
            .unwrap_or_default()
    }

    /// Number of names, counting the empty string.
    pub fn len(&self) -> usize {
        self.table.read().texts.len()
    }

    /// True when nothing but the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheaply clonable handle to one interner, shared by the catalog and its
/// operator index.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_names_round_trip() {
        let interner = StringInterner::new();
        let add = interner.intern("Math.Add");
        let subtract = interner.intern("Math.Subtract");

        assert_eq!(interner.intern("Math.Add"), add);
        assert_ne!(add, subtract);
        assert_eq!(interner.lookup(subtract), "Math.Subtract");
    }

    #[test]
    fn empty_text_is_the_reserved_name() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn system_names_exist_up_front() {
        let interner = StringInterner::new();
        assert_eq!(interner.len(), 3);
        assert!(!interner.is_empty());
        assert_eq!(interner.get("System"), Some(Name::from_raw(1)));
        assert_eq!(interner.get("generic"), Some(Name::from_raw(2)));
        assert_eq!(interner.get("Shop.Price"), None);
        assert_eq!(interner.len(), 3, "get must not intern");
    }

    #[test]
    fn foreign_handle_renders_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(Name::from_raw(9_999)), "");
    }

    #[test]
    fn clones_share_one_table() {
        let catalog_side = SharedInterner::new();
        let index_side = catalog_side.clone();

        let name = catalog_side.intern("Shop.Discount");
        assert_eq!(index_side.get("Shop.Discount"), Some(name));
    }
}
