//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use tessera_core::ast::{Decl, DeclId, DeclKind};

use crate::error::{Result, SerializeError};

/// Next offset slot must belong to `id`.
pub(crate) fn ensure_offset_slot(table: &'static str, id: u32, slot: usize) -> Result<()> {
    if id == 0 || (id - 1) as usize != slot {
        return Err(SerializeError::OffsetMismatch { table, id, slot });
    }
    Ok(())
}

/// Whether a member is written at all. Kinds that can never be members fail.
pub(crate) fn ensure_member_serializable(id: DeclId, decl: &Decl) -> Result<bool> {
    match decl.kind {
        DeclKind::Import
        | DeclKind::Operator { .. }
        | DeclKind::TopLevelCode
        | DeclKind::Extension { .. }
        | DeclKind::Module
        | DeclKind::PrecedenceGroup { .. } => Err(SerializeError::UnexpectedMember {
            kind: decl.kind.name(),
            decl: id.as_u32(),
        }),
        DeclKind::IfConfig | DeclKind::EnumCase => Ok(false),
        DeclKind::Struct(_)
        | DeclKind::Enum { .. }
        | DeclKind::Class { .. }
        | DeclKind::Protocol { .. }
        | DeclKind::TypeAlias { .. }
        | DeclKind::GenericTypeParam { .. }
        | DeclKind::AssociatedType { .. }
        | DeclKind::Func { .. }
        | DeclKind::Accessor { .. }
        | DeclKind::Constructor { .. }
        | DeclKind::Destructor { .. }
        | DeclKind::Var { .. }
        | DeclKind::Param { .. }
        | DeclKind::Subscript { .. }
        | DeclKind::EnumElement { .. }
        | DeclKind::PatternBinding { .. } => Ok(true),
    }
}

pub(crate) fn unaddressable(decl: DeclId, kind: &'static str, reason: &'static str) -> SerializeError {
    SerializeError::UnaddressableXref {
        kind,
        decl: decl.as_u32(),
        reason,
    }
}

pub(crate) fn missing(what: impl Into<String>) -> SerializeError {
    SerializeError::MissingEntity { what: what.into() }
}
