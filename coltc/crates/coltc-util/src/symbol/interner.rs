//! Global string table backing [`Symbol`].
//!
//! Lock-free lookups via `DashMap` keyed by the interned string itself,
//! hashed with `AHasher`. Interned strings are allocated once and leaked to
//! obtain `'static` references; this is safe because the table lives for
//! the whole program and entries are never removed.

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::{LazyLock, RwLock};

use super::Symbol;

/// The global string table, initialized on first use.
///
/// All language keywords are pre-interned so they have stable, predictable
/// indices.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Thread-safe string table.
pub struct StringTable {
    /// Maps an interned string to its symbol index.
    map: DashMap<&'static str, u32, RandomState>,

    /// Reverse mapping from symbol index to string.
    ///
    /// The write lock is only taken on a cache miss; lookups by index take
    /// the read lock.
    strings: RwLock<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            strings: RwLock::new(Vec::with_capacity(256)),
        }
    }

    /// Pre-intern the empty string and every language keyword.
    ///
    /// Must run exactly once, before any other interning.
    fn initialize_known_symbols(&self) {
        let known_symbols = [
            "",
            // Declarations
            "var", "fn", "extern", "mut",
            // Control flow
            "if", "elif", "else", "for", "while", "break", "continue",
            "return", "switch", "case", "default", "goto",
            // Built-in typenames
            "void", "bool", "char",
            "i8", "i16", "i32", "i64",
            "u8", "u16", "u32", "u64",
            "f32", "f64", "float", "double", "lstring",
            // Type operators
            "PTR", "typeof", "sizeof", "alignof", "alignas",
            "cast", "reinterpret_as", "compile_t",
            // Literals and word operators
            "true", "false", "and", "or",
            // Common identifiers
            "main", "argc", "argv",
        ];

        for symbol in known_symbols {
            self.intern(symbol);
        }
    }

    /// Intern a string, returning its symbol.
    ///
    /// Fast path is a single lock-free map lookup; the slow path takes the
    /// reverse-table write lock, re-checks, then allocates.
    pub fn intern(&self, string: &str) -> Symbol {
        if let Some(entry) = self.map.get(string) {
            return Symbol { index: *entry };
        }

        let mut strings = self.strings.write().unwrap_or_else(|e| e.into_inner());
        // Another thread may have interned the string while we waited
        if let Some(entry) = self.map.get(string) {
            return Symbol { index: *entry };
        }

        let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(interned);
        self.map.insert(interned, index);
        Symbol { index }
    }

    /// Get the string for a symbol, or `None` for an invalid index.
    pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
        let strings = self.strings.read().unwrap_or_else(|e| e.into_inner());
        strings.get(symbol.index as usize).copied()
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        let strings = self.strings.read().unwrap_or_else(|e| e.into_inner());
        strings.len()
    }
}
