//! Record output with per-block abbreviation lookup.

use std::collections::HashMap;

use tessera_bytecode::format::BlockId;
use tessera_bytecode::{Abbrev, BitWriter};

use crate::error::{Result, SerializeError};

/// Abbreviation IDs registered in one open block, keyed by record code.
#[derive(Debug, Default)]
struct AbbrevRegistry {
    by_code: HashMap<u32, u32>,
}

impl AbbrevRegistry {
    fn lookup(&self, code: u32) -> Result<u32> {
        self.by_code
            .get(&code)
            .copied()
            .ok_or(SerializeError::MissingLayout { code })
    }
}

/// A bit writer plus the abbreviations of each open block.
///
/// Every content record goes through its registered layout; a record
/// without one is a bug in the layout tables.
#[derive(Debug)]
pub(crate) struct RecordSink {
    out: BitWriter,
    registries: Vec<AbbrevRegistry>,
}

impl RecordSink {
    pub fn new() -> Self {
        Self {
            out: BitWriter::new(),
            registries: Vec::new(),
        }
    }

    /// Sink whose output is spliced into a block of `outer` later.
    pub fn detached(outer: BlockId) -> Self {
        Self {
            out: BitWriter::detached(outer.abbrev_width()),
            registries: Vec::new(),
        }
    }

    pub fn position(&self) -> u64 {
        self.out.bit_position()
    }

    pub fn writer(&mut self) -> &mut BitWriter {
        &mut self.out
    }

    pub fn bytes(&self) -> &[u8] {
        self.out.bytes()
    }

    /// Open `block` and define `layouts` before any content. Returns the
    /// bit where the block body starts, right after its length word.
    pub fn enter(&mut self, block: BlockId, layouts: Vec<Abbrev>) -> u64 {
        self.out.enter_subblock(block.as_u32(), block.abbrev_width());
        let body_start = self.out.bit_position();
        let mut registry = AbbrevRegistry::default();
        for layout in layouts {
            let code = layout.code();
            let id = self.out.emit_abbrev(layout);
            if let Some(code) = code {
                registry.by_code.insert(code, id);
            }
        }
        self.registries.push(registry);
        body_start
    }

    pub fn exit(&mut self) {
        self.out.exit_block();
        self.registries.pop();
    }

    pub fn record(&mut self, code: u32, fields: &[u64]) -> Result<()> {
        let abbrev = self.lookup(code)?;
        self.out.emit_record_with_abbrev(abbrev, code, fields, None)?;
        Ok(())
    }

    pub fn record_blob(&mut self, code: u32, fields: &[u64], blob: &[u8]) -> Result<()> {
        let abbrev = self.lookup(code)?;
        self.out
            .emit_record_with_abbrev(abbrev, code, fields, Some(blob))?;
        Ok(())
    }

    /// Splice a finished detached sink, returning the bit where it starts.
    pub fn append(&mut self, other: RecordSink) -> u64 {
        self.out.append_aligned(other.out)
    }

    pub fn finish(self) -> Vec<u8> {
        self.out.finish()
    }

    fn lookup(&self, code: u32) -> Result<u32> {
        match self.registries.last() {
            Some(registry) => registry.lookup(code),
            None => Err(SerializeError::MissingLayout { code }),
        }
    }
}
