//! Container format for Tessera module files.
//!
//! This crate contains:
//! - The bitstream writer and reader (blocks, abbreviations, records)
//! - Format definitions (signatures, block IDs, record codes, wire enums, layouts)
//! - On-disk hash tables used by the index blocks
//! - The human-readable dump

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bitstream;
pub mod dump;
pub mod format;
pub mod hash_table;


pub use bitstream::{
    Abbrev, AbbrevOp, BitReader, BitWriter, BlockCursor, EncodeError, Entry, ReadError, Record,
};
pub use dump::{DumpError, FileKind, dump};
pub use format::BlockId;
pub use hash_table::{HashTableBuilder, HashTableError, HashTableView, djb_hash};
