//! Interned identifier names.
//!
//! [`Name`] is a compact `u32` handle for an interned string. Two names are
//! equal exactly when their spellings are equal, so comparisons and hash
//! lookups never touch string data. [`StringInterner`] owns the backing
//! storage and hands out handles.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Interned string handle.
///
/// Allocated sequentially starting from 0. `Name(0)` is always the empty
/// string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Create a name from a raw index.
    ///
    /// Only meaningful when paired with the interner that produced the
    /// index; tests use arbitrary raw names as opaque labels.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-interner storage.
struct InternInner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// String interner with O(1) interning and lookup.
///
/// # Thread Safety
///
/// Uses an `RwLock` so concurrent readers never contend; interning a string
/// that is already present takes only the read lock.
pub struct StringInterner {
    inner: RwLock<InternInner>,
}

impl StringInterner {
    /// Create an interner with the empty string pre-interned at `Name(0)`.
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        let empty: &'static str = "";
        map.insert(empty, 0);
        Self {
            inner: RwLock::new(InternInner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its handle.
    ///
    /// Interning the same spelling twice returns the same [`Name`].
    pub fn intern(&self, text: &str) -> Name {
        if let Some(&id) = self.inner.read().map.get(text) {
            return Name(id);
        }
        let mut inner = self.inner.write();
        // Double-checked: another writer may have interned it between locks.
        if let Some(&id) = inner.map.get(text) {
            return Name(id);
        }
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let id = u32::try_from(inner.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded u32::MAX strings"));
        inner.strings.push(leaked);
        inner.map.insert(leaked, id);
        Name(id)
    }

    /// Resolve a handle back to its spelling.
    ///
    /// # Panics
    ///
    /// Panics if `name` was not produced by this interner.
    pub fn resolve(&self, name: Name) -> &'static str {
        self.inner
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or_else(|| panic!("Name {} not present in this interner", name.raw()))
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_name_zero() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::from_raw(0));
    }

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("deinit");
        let b = interner.intern("deinit");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn distinct_spellings_get_distinct_names() {
        let interner = StringInterner::new();
        assert_ne!(interner.intern("Token"), interner.intern("Handle"));
    }

    #[test]
    fn resolve_round_trips() {
        let interner = StringInterner::new();
        let name = interner.intern("Resource.deinit");
        assert_eq!(interner.resolve(name), "Resource.deinit");
    }

    #[test]
    fn name_raw_and_index() {
        let n = Name::from_raw(42);
        assert_eq!(n.raw(), 42);
        assert_eq!(n.index(), 42);
    }

    #[test]
    fn name_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Name>(), 4);
    }
}
