//! String interner implementation using DashMap for concurrent access.
//!
//! The table maps strings to indices through a lock-free `DashMap` hashed
//! with `ahash`, and resolves indices back to strings through an append-only
//! vector. Strings are leaked to `'static` so handles stay valid for the
//! program lifetime.

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::{LazyLock, RwLock};

use super::{Symbol, KNOWN_SYMBOLS};

/// Global string table instance.
///
/// Initialized on first use via `LazyLock`. All known names are pre-interned
/// during initialization so they have stable, predictable indices.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Thread-safe string table.
///
/// `map` serves intern lookups without locking; `strings` serves index
/// resolution. Both only ever grow.
pub struct StringTable {
    /// Maps interned text to its symbol index.
    map: DashMap<&'static str, u32, RandomState>,

    /// Index-ordered interned strings, for symbol-to-text resolution.
    strings: RwLock<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
            strings: RwLock::new(Vec::new()),
        }
    }

    fn initialize_known_symbols(&self) {
        for (i, s) in KNOWN_SYMBOLS.iter().enumerate() {
            let sym = self.intern(s);
            debug_assert_eq!(sym.0 as usize, i, "known symbol indices must be stable");
        }
    }

    /// Intern a string, returning its symbol.
    pub fn intern(&self, s: &str) -> Symbol {
        if let Some(existing) = self.map.get(s) {
            return Symbol(*existing);
        }

        let mut strings = self.strings.write().unwrap_or_else(|e| e.into_inner());
        // Re-check under the write lock: another thread may have won the race.
        if let Some(existing) = self.map.get(s) {
            return Symbol(*existing);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        self.map.insert(leaked, index);
        Symbol(index)
    }

    /// Resolve a symbol index back to its string.
    ///
    /// Panics on an index that was never handed out, which cannot happen for
    /// any `Symbol` constructed through [`Symbol::intern`].
    pub fn resolve(&self, index: u32) -> &'static str {
        let strings = self.strings.read().unwrap_or_else(|e| e.into_inner());
        strings[index as usize]
    }

    /// Number of unique interned strings.
    pub fn len(&self) -> usize {
        self.strings.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True when nothing has been interned (never observable in practice,
    /// the known names are interned at initialization).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_grows_monotonically() {
        let before = STRING_TABLE.len();
        let _ = Symbol::intern("a_symbol_used_only_in_this_test");
        assert!(STRING_TABLE.len() > before.min(1));
    }

    #[test]
    fn test_concurrent_intern() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Symbol::intern("concurrent_intern_test")))
            .collect();
        let symbols: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
