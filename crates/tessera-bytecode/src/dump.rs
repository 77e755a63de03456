//! Human-readable dump of module and doc files.
//!
//! Prints the block tree with record names, fields and blobs. The dump works
//! from the bitstream alone and never rebuilds entities.

use std::fmt::Write as _;

use tessera_core::Colors;

use crate::bitstream::{BlockCursor, Entry, ReadError, Record};
use crate::format::records::index;
use crate::format::{BlockId, DOC_SIGNATURE, MODULE_SIGNATURE};

/// Blobs longer than this are summarized by length only.
const MAX_INLINE_BLOB: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DumpError {
    #[error("not a module or doc file (signature {0:02X?})")]
    UnknownSignature(Vec<u8>),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Which kind of file a signature announces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Module,
    Doc,
}

impl FileKind {
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes.get(..4) {
            Some(sig) if sig == MODULE_SIGNATURE => Some(Self::Module),
            Some(sig) if sig == DOC_SIGNATURE => Some(Self::Doc),
            _ => None,
        }
    }

    fn signature(self) -> [u8; 4] {
        match self {
            Self::Module => MODULE_SIGNATURE,
            Self::Doc => DOC_SIGNATURE,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Doc => "doc",
        }
    }
}

/// Byte range of the declarations block body.
#[derive(Clone, Copy, Debug)]
struct DeclsRange {
    start: usize,
    end: usize,
}

struct DumpContext<'a> {
    bytes: &'a [u8],
    colors: Colors,
    out: String,
    blocks: Vec<Option<BlockId>>,
    decls: Option<DeclsRange>,
}

/// Dump a module or doc file.
pub fn dump(bytes: &[u8], colors: Colors) -> Result<String, DumpError> {
    let kind = FileKind::detect(bytes)
        .ok_or_else(|| DumpError::UnknownSignature(bytes.iter().take(4).copied().collect()))?;
    let mut cursor = BlockCursor::after_signature(bytes, kind.signature())?;
    let mut ctx = DumpContext {
        bytes,
        colors,
        out: String::new(),
        blocks: Vec::new(),
        decls: None,
    };
    writeln!(ctx.out, "{} file, {} bytes", kind.label(), bytes.len()).unwrap();

    while let Some(entry) = cursor.next_entry()? {
        match entry {
            Entry::SubBlock {
                block_id,
                abbrev_width,
                length_words,
                start_bit,
            } => {
                let block = BlockId::from_u32(block_id);
                if block == Some(BlockId::DeclsAndTypes) {
                    let start = (cursor.position() / 8) as usize;
                    ctx.decls = Some(DeclsRange {
                        start,
                        end: start + length_words as usize * 4,
                    });
                }
                ctx.block_header(block, block_id, abbrev_width, length_words, start_bit);
                ctx.blocks.push(block);
            }
            Entry::EndBlock => {
                ctx.blocks.pop();
                let indent = ctx.indent();
                writeln!(ctx.out, "{indent}}}").unwrap();
            }
            Entry::Record(record) => ctx.record(&record),
        }
    }
    Ok(ctx.out)
}

impl DumpContext<'_> {
    fn indent(&self) -> String {
        "  ".repeat(self.blocks.len())
    }

    fn block_header(
        &mut self,
        block: Option<BlockId>,
        block_id: u32,
        abbrev_width: u32,
        length_words: u32,
        start_bit: u64,
    ) {
        let c = self.colors;
        let indent = self.indent();
        let name = block
            .map(|b| b.name().to_string())
            .unwrap_or_else(|| format!("BLOCK_{block_id}"));
        writeln!(
            self.out,
            "{indent}{}{name}{} {}@{start_bit} width={abbrev_width} words={length_words}{} {{",
            c.blue, c.reset, c.dim, c.reset
        )
        .unwrap();
    }

    fn record(&mut self, record: &Record<'_>) {
        let c = self.colors;
        let indent = self.indent();
        let block = self.blocks.last().copied().flatten();
        let name = block
            .and_then(|b| b.record_name(record.code))
            .map(str::to_string)
            .unwrap_or_else(|| format!("CODE_{}", record.code));
        let abbrev = match record.abbrev {
            Some(id) => format!("a{id}"),
            None => "u".to_string(),
        };

        let mut line = format!("{indent}{}{name}{} {}{abbrev}{}", c.yellow, c.reset, c.dim, c.reset);
        if !record.fields.is_empty() {
            let fields: Vec<String> = record.fields.iter().map(u64::to_string).collect();
            write!(line, " [{}]", fields.join(", ")).unwrap();
        }
        if let Some(blob) = record.blob {
            line.push(' ');
            line.push_str(&self.blob(blob));
        }
        if block == Some(BlockId::Index) && record.code == index::DECLS_CHECKSUM {
            line.push(' ');
            line.push_str(&self.checksum_status(record.field(0) as u32));
        }
        writeln!(self.out, "{line}").unwrap();
    }

    fn blob(&self, blob: &[u8]) -> String {
        let c = self.colors;
        match std::str::from_utf8(blob) {
            Ok(text) if blob.len() <= MAX_INLINE_BLOB && is_printable(text) => {
                format!("{}{text:?}{}", c.green, c.reset)
            }
            _ => format!("{}<{} bytes>{}", c.dim, blob.len(), c.reset),
        }
    }

    fn checksum_status(&self, stored: u32) -> String {
        let Some(range) = self.decls else {
            return "(no declarations block)".to_string();
        };
        let Some(body) = self.bytes.get(range.start..range.end) else {
            return "(declarations block truncated)".to_string();
        };
        let computed = crc32fast::hash(body);
        if computed == stored {
            "(ok)".to_string()
        } else {
            format!("(mismatch: computed {computed})")
        }
    }
}

fn is_printable(text: &str) -> bool {
    text.chars().all(|ch| !ch.is_control() || ch == '\n' || ch == '\t')
}
