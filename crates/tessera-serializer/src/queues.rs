//! Pending work, one FIFO per entity kind.
//!
//! An entity is pushed exactly once, when its ID is first assigned, so
//! popping order equals ID order and offsets line up with IDs.

use std::collections::VecDeque;

use tessera_core::ast::{
    BodyLayoutId, ConformanceId, DeclContext, DeclId, FunctionId, GenericEnvironmentId,
    GenericSignatureId, LocalContextId, TypeId,
};

/// Declarations and types share one queue and one output stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum DeclOrType {
    Decl(DeclId),
    Type(TypeId),
}

#[derive(Debug, Default)]
pub(crate) struct WorkQueues {
    pub decls_and_types: VecDeque<DeclOrType>,
    pub local_contexts: VecDeque<LocalContextId>,
    pub decl_contexts: VecDeque<DeclContext>,
    pub generic_signatures: VecDeque<GenericSignatureId>,
    pub generic_environments: VecDeque<GenericEnvironmentId>,
    pub conformances: VecDeque<ConformanceId>,
    pub body_layouts: VecDeque<BodyLayoutId>,
    /// Lowered functions; drained separately while the body block is open.
    pub functions: VecDeque<FunctionId>,
}

impl WorkQueues {
    /// Whether every queue feeding the declarations block is empty.
    pub fn is_drained(&self) -> bool {
        self.decls_and_types.is_empty()
            && self.local_contexts.is_empty()
            && self.decl_contexts.is_empty()
            && self.generic_signatures.is_empty()
            && self.generic_environments.is_empty()
            && self.conformances.is_empty()
            && self.body_layouts.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.decls_and_types.len()
            + self.local_contexts.len()
            + self.decl_contexts.len()
            + self.generic_signatures.len()
            + self.generic_environments.len()
            + self.conformances.len()
            + self.body_layouts.len()
    }
}
