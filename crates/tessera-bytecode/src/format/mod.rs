//! Module file format: signatures, block and record codes, wire enums and
//! the abbreviations each block registers.

mod blocks;
pub mod layouts;
pub mod records;
pub mod wire;

#[cfg(test)]
mod blocks_tests;
#[cfg(test)]
mod layouts_tests;

pub use blocks::BlockId;

/// Leading bytes of a module file.
pub const MODULE_SIGNATURE: [u8; 4] = [0xE2, 0x9C, 0xA8, 0x0E];

/// Leading bytes of a documentation file.
pub const DOC_SIGNATURE: [u8; 4] = [0xE2, 0x9C, 0xA8, 0x07];

pub const VERSION_MAJOR: u16 = 0;
/// Bumped on every incompatible format change.
pub const VERSION_MINOR: u16 = 1;

// Identifier IDs below `NUM_SPECIAL_IDS` never index the identifier table.
pub const EMPTY_OR_BUILTIN_ID: u64 = 0;
pub const CURRENT_MODULE_ID: u64 = 1;
pub const FOREIGN_HEADER_MODULE_ID: u64 = 2;
pub const SUBSCRIPT_ID: u64 = 3;
pub const CONSTRUCTOR_ID: u64 = 4;
pub const DESTRUCTOR_ID: u64 = 5;
pub const NUM_SPECIAL_IDS: u64 = 6;

/// Member-table keys for members without an ordinary base name.
pub const SUBSCRIPT_KEY: &str = "#subscript";
pub const CONSTRUCTOR_KEY: &str = "#init";
pub const DESTRUCTOR_KEY: &str = "#deinit";
