//! String interning for names shared across the entity graph.
//!
//! Converts heap-allocated strings into cheap integer handles (`Symbol`).
//! The AST arena uses one interner for every name it stores, and the
//! serializer keeps a second, session-scoped one for its identifier table.
//!
//! An interner serializes as a plain list of strings, so a `Symbol` in a JSON
//! module description is just an index into that list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A lightweight handle to an interned string.
///
/// Symbols are ordered by insertion order, not lexicographically. Use
/// `Interner::resolve` when string ordering matters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(u32);

impl Symbol {
    /// Raw index for serialization/debugging.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create a Symbol from a raw index.
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// String interner. Deduplicates strings and returns cheap Symbol handles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Interner {
    map: HashMap<String, Symbol>,
    strings: Vec<String>,
}

impl From<Vec<String>> for Interner {
    fn from(strings: Vec<String>) -> Self {
        let mut interner = Interner::new();
        for s in strings {
            interner.intern_owned(s);
        }
        interner
    }
}

impl From<Interner> for Vec<String> {
    fn from(interner: Interner) -> Self {
        interner.strings
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its Symbol.
    /// If the string was already interned, returns the existing Symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), sym);
        sym
    }

    /// Intern an owned string, avoiding a clone on hit.
    pub fn intern_owned(&mut self, s: String) -> Symbol {
        if let Some(&sym) = self.map.get(&s) {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.clone());
        self.map.insert(s, sym);
        sym
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    /// Resolve a Symbol back to its string.
    ///
    /// # Panics
    /// Panics if the symbol was not created by this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    /// Try to resolve a Symbol, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.0 as usize).map(|s| s.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all interned strings with their symbols, in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol(i as u32), s.as_str()))
    }

    /// Emit a NUL-terminated string blob and the start offset of every string.
    ///
    /// The blob begins with a single NUL byte, so no string starts at offset 0
    /// and a zero offset can stand for "no string".
    pub fn to_nul_blob(&self) -> (Vec<u8>, Vec<u32>) {
        let total: usize = self.strings.iter().map(|s| s.len() + 1).sum();
        let mut blob = Vec::with_capacity(total + 1);
        let mut offsets = Vec::with_capacity(self.strings.len());

        blob.push(0);
        for s in &self.strings {
            offsets.push(blob.len() as u32);
            blob.extend_from_slice(s.as_bytes());
            blob.push(0);
        }

        (blob, offsets)
    }
}
