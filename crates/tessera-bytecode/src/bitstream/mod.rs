//! Block-structured bitstream container.
//!
//! A stream is a sequence of nested blocks. Each block carries its own
//! abbreviation width and abbreviation list; records inside it are either
//! self-describing (`UNABBREV_RECORD`) or encoded through an abbreviation
//! defined earlier in the same block.

mod abbrev;
mod reader;
mod writer;

#[cfg(test)]
mod reader_tests;
#[cfg(test)]
mod writer_tests;

pub use abbrev::{Abbrev, AbbrevOp};
pub use reader::{BitReader, BlockCursor, Entry, ReadError, Record};
pub use writer::{BitWriter, EncodeError};

/// Builtin abbreviation IDs.
pub const END_BLOCK: u32 = 0;
pub const ENTER_SUBBLOCK: u32 = 1;
pub const DEFINE_ABBREV: u32 = 2;
pub const UNABBREV_RECORD: u32 = 3;
/// First ID handed out by `DEFINE_ABBREV`.
pub const FIRST_APPLICATION_ABBREV: u32 = 4;

/// Abbreviation width outside any block.
pub const TOP_LEVEL_ABBREV_WIDTH: u32 = 2;
