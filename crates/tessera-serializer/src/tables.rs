//! Session-scoped ID tables.
//!
//! Every serializable entity gets a dense 1-based ID the first time it is
//! referenced; ID 0 means "no reference". The owning table also remembers
//! where each entity's content was written.

use std::hash::Hash;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tessera_bytecode::format::{EMPTY_OR_BUILTIN_ID, NUM_SPECIAL_IDS};
use tessera_core::ast::DeclId;
use tessera_core::{Interner, Symbol};

use crate::error::Result;
use crate::invariants::ensure_offset_slot;

/// Outcome of interning one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Interned {
    pub id: u32,
    /// The entity was seen for the first time and must be enqueued.
    pub is_new: bool,
}

/// Dense IDs in first-reference order.
#[derive(Debug)]
pub(crate) struct IdTable<K> {
    ids: IndexMap<K, ()>,
}

impl<K> Default for IdTable<K> {
    fn default() -> Self {
        Self {
            ids: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq + Copy> IdTable<K> {
    pub fn intern(&mut self, key: K) -> Interned {
        match self.ids.entry(key) {
            Entry::Occupied(e) => Interned {
                id: e.index() as u32 + 1,
                is_new: false,
            },
            Entry::Vacant(e) => {
                let id = e.index() as u32 + 1;
                e.insert(());
                Interned { id, is_new: true }
            }
        }
    }

    pub fn get(&self, key: K) -> Option<u32> {
        self.ids.get_index_of(&key).map(|i| i as u32 + 1)
    }

    pub fn key(&self, id: u32) -> Option<K> {
        let index = id.checked_sub(1)?;
        self.ids.get_index(index as usize).map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.ids.keys().copied()
    }
}

/// Declaration IDs carry the sticky "serialize even if foreign-looking" flag.
#[derive(Debug, Default)]
pub(crate) struct DeclIdTable {
    ids: IndexMap<DeclId, bool>,
}

impl DeclIdTable {
    pub fn intern(&mut self, decl: DeclId, force: bool) -> Interned {
        match self.ids.entry(decl) {
            Entry::Occupied(mut e) => {
                *e.get_mut() |= force;
                Interned {
                    id: e.index() as u32 + 1,
                    is_new: false,
                }
            }
            Entry::Vacant(e) => {
                let id = e.index() as u32 + 1;
                e.insert(force);
                Interned { id, is_new: true }
            }
        }
    }

    pub fn get(&self, decl: DeclId) -> Option<u32> {
        self.ids.get_index_of(&decl).map(|i| i as u32 + 1)
    }

    pub fn is_forced(&self, decl: DeclId) -> bool {
        self.ids.get(&decl).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Bit offsets of written entities, indexed by `id - 1`.
#[derive(Debug)]
pub(crate) struct OffsetTable {
    name: &'static str,
    offsets: Vec<u64>,
}

impl OffsetTable {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            offsets: Vec::new(),
        }
    }

    /// Record where `id` was written. IDs must arrive in order.
    pub fn record(&mut self, id: u32, bit: u64) -> Result<()> {
        ensure_offset_slot(self.name, id, self.offsets.len())?;
        self.offsets.push(bit);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.offsets
    }
}

/// Identifier IDs. The low IDs are reserved, see `NUM_SPECIAL_IDS`.
#[derive(Debug, Default)]
pub(crate) struct IdentifierTable {
    strings: Interner,
}

impl IdentifierTable {
    pub fn intern(&mut self, text: &str) -> u64 {
        if text.is_empty() {
            return EMPTY_OR_BUILTIN_ID;
        }
        NUM_SPECIAL_IDS + self.strings.intern(text).as_u32() as u64
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn resolve(&self, id: u64) -> Option<&str> {
        let index = id.checked_sub(NUM_SPECIAL_IDS)?;
        let index = u32::try_from(index).ok()?;
        self.strings.try_resolve(Symbol::from_raw(index))
    }

    /// NUL-terminated string data and each identifier's byte offset in it.
    pub fn to_blob(&self) -> (Vec<u8>, Vec<u32>) {
        self.strings.to_nul_blob()
    }
}
