//! Tessera module serializer.
//!
//! Turns the checked entity graph of one module into its binary module
//! file and, optionally, its documentation file:
//! - `serializer` - the session: ID tables, work queues and the fixpoint drain
//! - `records` - one record writer per entity kind
//! - `xref` - cross-references to declarations owned elsewhere
//! - `index` - lookup tables over top-level and nested declarations
//! - `body` - lowered function bodies and their name index
//! - `doc` - the documentation file
//! - `output` - whole-file assembly and atomic artifact writes

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod block_info;
mod body;
mod control;
mod doc;
pub mod error;
mod index;
mod invariants;
pub mod options;
mod output;
mod queues;
mod records;
mod serializer;
mod sink;
mod tables;
mod wire;
mod xref;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod body_tests;
#[cfg(test)]
mod doc_tests;
#[cfg(test)]
mod index_tests;
#[cfg(test)]
mod output_tests;

pub use error::{OutputError, Result, SerializeError};
pub use options::{SearchPath, SerializationOptions};
pub use output::{Artifacts, OutputReport, serialize, write_outputs};
pub use serializer::Serializer;
