//! Lexical contexts.

use serde::{Deserialize, Serialize};

use super::ids::{DeclId, FileId, LocalContextId, ModuleId, TypeId};

/// Where a declaration lives.
///
/// Module and file contexts are addressed implicitly and never written by
/// value. Declarations acting as contexts are written as declarations. Local
/// contexts have no declaration of their own and are written separately.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclContext {
    Module(ModuleId),
    File(FileId),
    Decl(DeclId),
    Local(LocalContextId),
}

impl DeclContext {
    pub fn is_module_scope(self) -> bool {
        matches!(self, DeclContext::Module(_) | DeclContext::File(_))
    }

    pub fn as_decl(self) -> Option<DeclId> {
        match self {
            DeclContext::Decl(decl) => Some(decl),
            _ => None,
        }
    }
}

/// A context that exists only inside a body.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LocalContext {
    Closure {
        ty: TypeId,
        #[serde(default)]
        implicit: bool,
        discriminator: u32,
        parent: DeclContext,
    },
    /// Initializer expression of one entry of a pattern binding.
    PatternBindingInitializer { binding: DeclId, index: u32 },
    DefaultArgumentInitializer { parent: DeclContext, index: u32 },
    TopLevelCode { parent: DeclContext },
}
