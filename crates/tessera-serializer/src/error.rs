//! Errors produced while serializing a module.

use std::io;
use std::path::PathBuf;

use tessera_bytecode::EncodeError;

/// A session-aborting failure. Every variant except `Encode` is a broken
/// invariant in the entity graph or in the serializer's own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// A declaration kind that can never be a member was listed as one.
    #[error("{kind} declaration {decl} cannot be serialized as a member")]
    UnexpectedMember { kind: &'static str, decl: u32 },

    /// A foreign declaration whose position has no structural path.
    #[error("cannot form a cross-reference to {kind} declaration {decl}: {reason}")]
    UnaddressableXref {
        kind: &'static str,
        decl: u32,
        reason: &'static str,
    },

    /// Content was written out of ID order.
    #[error("{table} ID {id} written at offset slot {slot}")]
    OffsetMismatch {
        table: &'static str,
        id: u32,
        slot: usize,
    },

    /// An entity was needed that the graph does not provide.
    #[error("missing {what}")]
    MissingEntity { what: String },

    /// A declaration inside a body was reached through another module.
    #[error("declaration {decl} is local to a body and cannot be cross-referenced")]
    XrefOfLocalDecl { decl: u32 },

    /// A declaration kind with no record of its own was queued for writing.
    #[error("{kind} declaration {decl} has no serialized form")]
    UnserializableDecl { kind: &'static str, decl: u32 },

    /// Error types only exist in invalid programs.
    #[error("type {ty} ({kind}) cannot be serialized")]
    UnserializableType { kind: &'static str, ty: u32 },

    /// A lowered instruction names a value its function never defines.
    #[error("function `{function}` uses undefined value {value}")]
    UndefinedValue { function: String, value: String },

    /// No abbreviation was registered for a record in the current block.
    #[error("no layout registered for record code {code}")]
    MissingLayout { code: u32 },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Failure to write one output artifact.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct OutputError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub type Result<T> = std::result::Result<T, SerializeError>;
